use crate::workflow::config::EmailConfig;
use async_trait::async_trait;
use icaocore::notify::{Notification, NotificationSink};
use icaocore::prelude::SendError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tokio::time::timeout;

/// SMTP sink over implicit TLS. Also reaches phones through the
/// email-to-text gateways of most carriers.
pub struct EmailSink {
    config: EmailConfig,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSink {
    pub fn new(config: EmailConfig) -> Result<Self, SendError> {
        let from = parse_mailbox(&config.from)?;
        let to = parse_mailbox(&config.to)?;
        Ok(Self { config, from, to })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    pub fn build_message(&self, notification: &Notification) -> Result<Message, SendError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| SendError::Config(format!("failed to construct email: {}", e)))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, SendError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| SendError::Config(format!("invalid address {:?}: {}", address, e)))
}

#[async_trait]
impl NotificationSink for EmailSink {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let config = &self.config;
        let username = config.username.clone().unwrap_or_else(|| config.from.clone());
        let creds = Credentials::new(username, config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(config.server.as_str())
            .map_err(|e| SendError::Transport(format!("could not connect to SMTP: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .timeout(Some(self.timeout()))
            .build();

        let message = self.build_message(notification)?;
        let response = timeout(self.timeout(), mailer.send(message))
            .await
            .map_err(|_| SendError::Timeout)?
            .map_err(|e| SendError::Transport(e.to_string()))?;

        if response.is_positive() {
            Ok(())
        } else {
            Err(SendError::Rejected(format!("{:?}", response)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_config(from: &str) -> EmailConfig {
        EmailConfig {
            server: "smtp.example.com".into(),
            port: 465,
            from: from.into(),
            to: "me@example.com".into(),
            username: None,
            password: "secret".into(),
            timeout_secs: 1,
            subject: "Flight Notification".into(),
        }
    }

    #[test]
    fn invalid_address_is_a_config_error() {
        assert!(matches!(
            EmailSink::new(email_config("not an address")),
            Err(SendError::Config(_))
        ));
    }

    #[test]
    fn message_carries_subject_and_body() {
        let sink = EmailSink::new(email_config("alerts@example.com")).unwrap();
        let message = sink
            .build_message(&Notification {
                subject: "Flight Notification".into(),
                body: "AE1234, USAF\n\n".into(),
            })
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Flight Notification"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("AE1234, USAF"));
    }
}
