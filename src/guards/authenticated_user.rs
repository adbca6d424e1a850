use crate::guards::BasicAuth;
use crate::startup::CalendarDbConn;
use anyhow::{anyhow, Context};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use diesel::OptionalExtension;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::ExposeSecret;
use uuid::Uuid;

pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let basic_auth = try_outcome!(request.guard::<BasicAuth>().await);
        let conn = try_outcome!(request
            .guard::<CalendarDbConn>()
            .await
            .map_error(|(status, ())| (
                status,
                anyhow!("Failed to retrieve a connection from the DB pool.")
            )));

        match validate_credentials(basic_auth, conn).await {
            Ok(user) => Outcome::Success(user),
            Err(e) => {
                tracing::warn!(error.cause_chain = ?e, "Rejected push subscription credentials.");
                Outcome::Error((Status::Unauthorized, e))
            }
        }
    }
}

#[tracing::instrument(
    name = "Validate credentials",
    skip(basic_auth, conn),
    fields(email = %basic_auth.email)
)]
async fn validate_credentials(
    basic_auth: BasicAuth,
    conn: CalendarDbConn,
) -> Result<AuthenticatedUser, anyhow::Error> {
    conn.run(move |conn: &mut PgConnection| {
        use crate::schema::users;

        let (user_id, password_hash) = users::table
            .select((users::user_id, users::password_hash))
            .filter(users::email.eq(&basic_auth.email))
            .first::<(Uuid, String)>(conn)
            .optional()
            .context("Failed to perform a query to validate auth credentials.")?
            .ok_or_else(|| anyhow!("Unknown email."))?;

        let expected_password_hash = PasswordHash::new(&password_hash)
            .context("Failed to parse hash in PHC string format.")?;
        Argon2::default()
            .verify_password(
                basic_auth.password.expose_secret().as_bytes(),
                &expected_password_hash,
            )
            .context("Invalid password.")?;

        Ok(AuthenticatedUser {
            user_id,
            email: basic_auth.email,
            _private: (),
        })
    })
    .await
}
