mod health_check;
mod notifications;

pub use health_check::*;
pub use notifications::*;
