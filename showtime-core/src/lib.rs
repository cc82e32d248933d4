pub mod repository;
pub mod identity;
pub mod notification;

pub use identity::{IdGenerator, IdStrategy, SequentialIdGenerator, UuidIdGenerator};
pub use notification::{
    EmailNotifier, Notification, NotificationChannel, Notifier, RecordingNotifier, SmsNotifier,
};
pub use repository::ShowCatalog;

/// Errors raised by the collaborators the booking engine calls into.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
