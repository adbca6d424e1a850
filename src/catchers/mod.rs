mod unauthorized;
mod unprocessable_entity;

pub use unauthorized::*;
pub use unprocessable_entity::*;

#[derive(serde::Serialize)]
pub struct ErrorMessage {
    message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
