pub mod email;
pub mod sms;

use crate::workflow::config::SinkConfig;
use async_trait::async_trait;
use icaocore::notify::{Notification, NotificationSink};
use icaocore::prelude::SendError;
use log::info;

pub use email::EmailSink;
pub use sms::SmsSink;

/// Logs alerts instead of delivering them.
pub struct DryRunSink;

#[async_trait]
impl NotificationSink for DryRunSink {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        info!("[dry-run] {}\n{}", notification.subject, notification.body);
        Ok(())
    }
}

/// Builds the configured sink, or a [`DryRunSink`] when `dry_run` is set.
pub fn build_sink(
    config: &SinkConfig,
    dry_run: bool,
) -> Result<Box<dyn NotificationSink>, SendError> {
    if dry_run {
        return Ok(Box::new(DryRunSink));
    }
    let sink: Box<dyn NotificationSink> = match config {
        SinkConfig::Email(email) => Box::new(EmailSink::new(email.clone())?),
        SinkConfig::Sms(sms) => Box::new(SmsSink::new(sms.clone())?),
    };
    Ok(sink)
}

/// Subject line used by the configured sink.
pub fn subject_for(config: &SinkConfig) -> &str {
    match config {
        SinkConfig::Email(email) => &email.subject,
        SinkConfig::Sms(_) => "Flight Notification",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::SmsConfig;

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        let notification = Notification {
            subject: "s".into(),
            body: "AE1234\n\n".into(),
        };
        assert!(DryRunSink.send(&notification).await.is_ok());
    }

    #[test]
    fn sms_subject_is_fixed() {
        let config = SinkConfig::Sms(SmsConfig {
            account_sid: "AC1".into(),
            auth_token: "t".into(),
            from: "+1555".into(),
            to: "+1666".into(),
            api_base: "https://api.twilio.com".into(),
            timeout_secs: 1,
        });
        assert_eq!(subject_for(&config), "Flight Notification");
        assert!(build_sink(&config, true).is_ok());
    }
}
