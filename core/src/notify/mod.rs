pub mod coordinator;
pub mod message;

pub use coordinator::{NotificationCoordinator, NotificationSink, NotifyOutcome};
pub use message::{render, Notification, Thumbnails};
