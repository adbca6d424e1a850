use crate::catchers::ErrorMessage;
use crate::domain::PushSubscription;
use crate::error::error_chain_fmt;
use crate::guards::AuthenticatedUser;
use crate::startup::{CalendarDbConn, VapidPublicKey};
use anyhow::Context;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};

/// The `PushSubscription.toJSON()` document a browser produces.
#[derive(serde::Deserialize)]
pub struct SubscriptionBody {
    endpoint: String,
    keys: SubscriptionKeysBody,
}

#[derive(serde::Deserialize)]
pub struct SubscriptionKeysBody {
    p256dh: String,
    auth: String,
}

impl TryFrom<SubscriptionBody> for PushSubscription {
    type Error = String;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        PushSubscription::new(body.endpoint, body.keys.p256dh, body.keys.auth)
    }
}

#[derive(serde::Serialize)]
pub struct PublicKeyResponse {
    public_key: String,
}

#[get("/api/notifications/public_key")]
pub fn public_key(key: &State<VapidPublicKey>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: key.0.clone(),
    })
}

#[tracing::instrument(
    name = "Saving a push subscription",
    skip(body, conn, user),
    fields(user_id = %user.user_id)
)]
#[post("/api/notifications/subscribe", data = "<body>")]
pub async fn subscribe(
    body: Json<SubscriptionBody>,
    conn: CalendarDbConn,
    user: AuthenticatedUser,
) -> Result<Status, SubscribeError> {
    let subscription: PushSubscription = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;
    store_subscription(&conn, &user, &subscription)
        .await
        .context("Failed to store the push subscription.")?;
    tracing::info!("Push subscription saved.");
    Ok(Status::Created)
}

#[tracing::instrument(name = "Store a push subscription", skip(conn, user, subscription))]
async fn store_subscription(
    conn: &CalendarDbConn,
    user: &AuthenticatedUser,
    subscription: &PushSubscription,
) -> Result<(), anyhow::Error> {
    use crate::schema::users;

    let user_id = user.user_id;
    let stored = subscription
        .to_json()
        .context("Failed to serialize the push subscription.")?;
    conn.run(move |c: &mut PgConnection| {
        diesel::update(users::table.filter(users::user_id.eq(user_id)))
            .set(users::push_subscription.eq(Some(stored)))
            .execute(c)
    })
    .await
    .context("Failed to update the user's push subscription.")?;
    Ok(())
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for SubscribeError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            SubscribeError::ValidationError(message) => {
                (Status::BadRequest, Json(ErrorMessage::new(message))).respond_to(request)
            }
            SubscribeError::UnexpectedError(_) => {
                tracing::error!(error.cause_chain = ?self, "Failed to save a push subscription.");
                (
                    Status::InternalServerError,
                    Json(ErrorMessage::new("The subscription could not be saved.")),
                )
                    .respond_to(request)
            }
        }
    }
}
