use crate::workflow::config::SmsConfig;
use async_trait::async_trait;
use icaocore::notify::{Notification, NotificationSink};
use icaocore::prelude::SendError;
use std::time::Duration;

/// Twilio REST messaging sink.
pub struct SmsSink {
    client: reqwest::Client,
    config: SmsConfig,
}

impl SmsSink {
    pub fn new(config: SmsConfig) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SendError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl NotificationSink for SmsSink {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let config = &self.config;
        let form = [
            ("To", config.to.as_str()),
            ("From", config.from.as_str()),
            ("Body", notification.body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SendError::Timeout
                } else {
                    SendError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(SendError::Rejected(format!("HTTP {}: {}", status, text)))
        }
    }
}
