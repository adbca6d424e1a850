use anyhow::{anyhow, Context};
use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::Secret;

/// `Authorization: Basic` credentials. The user name is the account email.
#[derive(Debug)]
pub struct BasicAuth {
    pub(crate) email: String,
    pub(crate) password: Secret<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BasicAuth {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let header_value = match request.headers().get_one("Authorization") {
            Some(value) => value,
            None => {
                return Error((
                    Status::Unauthorized,
                    anyhow!("The 'Authorization' header was missing."),
                ))
            }
        };
        match parse_basic_auth(header_value) {
            Ok(auth) => Success(auth),
            Err(e) => Error((Status::Unauthorized, e)),
        }
    }
}

fn parse_basic_auth(header_value: &str) -> Result<BasicAuth, anyhow::Error> {
    let base64encoded_segment = header_value
        .strip_prefix("Basic ")
        .context("The authorization scheme was not 'Basic'.")?;

    let decoded_bytes = base64::decode_config(base64encoded_segment.trim(), base64::STANDARD)
        .context("Failed to base64-decode 'Basic' credentials.")?;

    let decoded_credentials = String::from_utf8(decoded_bytes)
        .context("The decoded credential string is not valid UTF8.")?;

    let (email, password) = decoded_credentials
        .split_once(':')
        .ok_or_else(|| anyhow!("A password must be provided in 'Basic' auth."))?;

    if email.is_empty() {
        return Err(anyhow!("An email must be provided in 'Basic' auth."));
    }

    Ok(BasicAuth {
        email: email.to_string(),
        password: Secret::new(password.to_string()),
    })
}
