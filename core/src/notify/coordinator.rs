use crate::notify::message::{render, Notification, Thumbnails};
use crate::prelude::SendError;
use crate::tracking::{AircraftRegistry, QualifyingSet};
use async_trait::async_trait;
use log::{error, info};

/// Delivery channel for rendered alerts (SMTP, SMS, ...).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    NothingToNotify,
    /// Number of aircraft included in the delivered alert.
    Sent(usize),
}

/// Sends the qualifying set and records successful deliveries in the registry.
pub struct NotificationCoordinator {
    sink: Box<dyn NotificationSink>,
    subject: String,
}

impl NotificationCoordinator {
    pub fn new(sink: Box<dyn NotificationSink>, subject: impl Into<String>) -> Self {
        Self {
            sink,
            subject: subject.into(),
        }
    }

    /// Registry entries are only marked after the sink reports success, so a
    /// failed send leaves the aircraft eligible for the next cycle.
    pub async fn notify(
        &self,
        qualifying: &QualifyingSet,
        thumbnails: &Thumbnails,
        registry: &mut AircraftRegistry,
    ) -> Result<NotifyOutcome, SendError> {
        if qualifying.is_empty() {
            return Ok(NotifyOutcome::NothingToNotify);
        }

        let notification = render(&self.subject, qualifying, thumbnails);
        if let Err(err) = self.sink.send(&notification).await {
            error!("notification for {} aircraft failed: {}", qualifying.len(), err);
            return Err(err);
        }

        registry.mark_notified(qualifying.keys().map(String::as_str));
        info!("notified {} aircraft", qualifying.len());
        Ok(NotifyOutcome::Sent(qualifying.len()))
    }
}
