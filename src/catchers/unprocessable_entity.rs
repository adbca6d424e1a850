use crate::catchers::ErrorMessage;
use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::Request;

/// Bodies rocket cannot deserialize are a client error like any other validation failure.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> BadRequest<Json<ErrorMessage>> {
    BadRequest(Json(ErrorMessage::new("The request body is malformed.")))
}
