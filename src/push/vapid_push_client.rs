use crate::configuration::PushSettings;
use crate::domain::{NotificationPayload, PushSubscription};
use crate::push::{DeliveryError, PushClient};
use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder,
    WebPushClient, WebPushError, WebPushMessageBuilder,
};

pub struct VapidPushClient {
    http_client: IsahcWebPushClient,
    private_key: Secret<String>,
    subject: String,
    ttl_seconds: u32,
}

impl VapidPushClient {
    pub fn new(settings: &PushSettings) -> Result<Self, anyhow::Error> {
        let http_client = IsahcWebPushClient::new()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Failed to build the web push HTTP client.")?;
        Ok(Self {
            http_client,
            private_key: settings.vapid_private_key.clone(),
            subject: settings.subject_uri(),
            ttl_seconds: settings.ttl_seconds,
        })
    }
}

#[async_trait]
impl PushClient for VapidPushClient {
    #[tracing::instrument(
        name = "Send a push notification",
        skip(self, subscription, payload),
        fields(endpoint = %subscription.endpoint())
    )]
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &NotificationPayload,
    ) -> Result<(), DeliveryError> {
        let subscription_info = SubscriptionInfo::new(
            subscription.endpoint(),
            subscription.p256dh(),
            subscription.auth(),
        );

        let mut signature_builder = VapidSignatureBuilder::from_base64(
            self.private_key.expose_secret(),
            web_push::URL_SAFE_NO_PAD,
            &subscription_info,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("The configured VAPID private key is invalid.")?;
        signature_builder.add_claim("sub", self.subject.as_str());
        let signature = signature_builder.build().map_err(classify)?;

        let content = payload
            .to_json()
            .context("Failed to serialize the notification payload.")?;
        let mut message_builder = WebPushMessageBuilder::new(&subscription_info);
        message_builder.set_payload(ContentEncoding::Aes128Gcm, content.as_bytes());
        message_builder.set_ttl(self.ttl_seconds);
        message_builder.set_vapid_signature(signature);
        let message = message_builder.build().map_err(classify)?;

        self.http_client.send(message).await.map_err(classify)
    }
}

fn classify(error: WebPushError) -> DeliveryError {
    match error {
        WebPushError::EndpointNotFound { .. } => DeliveryError::from_status(404),
        WebPushError::EndpointNotValid { .. } => DeliveryError::from_status(410),
        WebPushError::InvalidUri { .. }
        | WebPushError::InvalidCryptoKeys { .. }
        | WebPushError::MissingCryptoKeys { .. } => {
            DeliveryError::InvalidSubscription(error.to_string())
        }
        other => DeliveryError::Unexpected(anyhow::anyhow!("{}", other)),
    }
}
