pub mod dto;

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::error::AppError;

pub use dto::{Notification, NotificationAction, NotificationKind, Position};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, notification: Notification) -> Result<(), AppError>;
}

/// Fire-and-forget delivery: failures are logged and swallowed.
pub async fn send(notifier: &dyn Notifier, notification: Notification) {
    let title = notification.title.clone();
    if let Err(e) = notifier.show(notification).await {
        warn!("notification {:?} was not delivered: {}", title, e);
    }
}

/// Writes notifications to the log. Used when no webhook is configured.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn show(&self, notification: Notification) -> Result<(), AppError> {
        info!(
            kind = ?notification.kind,
            redirect = ?notification.redirect,
            "{}: {}",
            notification.title,
            notification.description
        );
        Ok(())
    }
}

/// Keeps every notification in memory, newest last.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.sent().pop()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn show(&self, notification: Notification) -> Result<(), AppError> {
        self.sent
            .lock()
            .map_err(|_| AppError::Notify("recording notifier lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}

/// Posts each notification as JSON to a configured endpoint that fans it out
/// to connected browsers.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::Notify(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn show(&self, notification: Notification) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.url)
            .json(&notification)
            .send()
            .await
            .map_err(|e| AppError::Notify(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notify(format!("webhook error {}: {}", status, body)));
        }
        Ok(())
    }
}
