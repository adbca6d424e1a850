use crate::helpers::spawn_app;
use rocket::http::Status;

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn health_check_works() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.client.get("/health_check").dispatch().await;

    // assert
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await, None);
}
