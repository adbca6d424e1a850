use crate::catchers::ErrorMessage;
use rocket::http::Header;
use rocket::serde::json::Json;

#[catch(401)]
pub fn unauthorized_request_credentials() -> RequestBasicAuth {
    RequestBasicAuth {
        inner: Json(ErrorMessage::new("Valid credentials are required.")),
        basic_auth: Header::new(
            "WWW-Authenticate",
            r#"Basic realm="calendar", charset="UTF-8""#,
        ),
    }
}

#[derive(Responder)]
#[response(status = 401)]
pub struct RequestBasicAuth {
    inner: Json<ErrorMessage>,
    basic_auth: Header<'static>,
}
