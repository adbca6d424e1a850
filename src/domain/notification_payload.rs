/// The JSON document a service worker receives in its `push` event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl NotificationPayload {
    pub fn event_reminder(event_title: &str, icon: &str) -> Self {
        Self {
            title: "Event reminder".into(),
            body: format!("Your event \"{}\" starts in a few minutes.", event_title),
            icon: icon.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
