// --- File: crates/bookify_bookings/src/notifier.rs ---
//! Approval email delivery.
//!
//! Without a relay URL the email is only written to the log. With one, it is
//! posted as JSON (`{from, to, subject, text}`) to the relay.

use bookify_common::http::client::{create_client, DEFAULT_TIMEOUT_SECS};
use bookify_common::models::Booking;
use bookify_common::services::{ApprovalEmail, BoxFuture, EmailNotifier, NotifierError};
use bookify_config::EmailConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const APPROVAL_SUBJECT: &str = "Your booking has been approved!";

const DEFAULT_SENDER: &str = "bookings@localhost";

pub fn render_approval_email(booking: &Booking) -> ApprovalEmail {
    let event = &booking.event;
    let text = format!(
        "Dear {name},\n\n\
         We're pleased to inform you that your booking for \"{title}\" has been approved. \
         The event is scheduled for:\n\n\
         Start: {start}\n\
         End: {end}\n\n\
         Event Details:\n\
         {details}\n\n\
         Thank you for choosing our stage!\n",
        name = booking.contact.name,
        title = event.title,
        start = event.start.format("%Y-%m-%d %H:%M UTC"),
        end = event.end.format("%Y-%m-%d %H:%M UTC"),
        details = event.details,
    );

    ApprovalEmail {
        to: booking.contact.email.clone(),
        subject: APPROVAL_SUBJECT.to_string(),
        text,
    }
}

/// Writes approval emails to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogEmailNotifier {
    sender: String,
}

impl LogEmailNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Default for LogEmailNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_SENDER)
    }
}

impl EmailNotifier for LogEmailNotifier {
    fn send_approval<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, (), NotifierError> {
        Box::pin(async move {
            let email = render_approval_email(booking);
            info!(
                booking_id = %booking.id,
                from = %self.sender,
                to = %email.to,
                subject = %email.subject,
                "Approval email (not sent):\n{}",
                email.text
            );
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts approval emails to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpEmailNotifier {
    client: reqwest::Client,
    relay_url: String,
    sender: String,
    api_key: Option<String>,
}

impl HttpEmailNotifier {
    pub fn new(
        relay_url: impl Into<String>,
        sender: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, NotifierError> {
        let client = create_client(timeout_secs, false)
            .map_err(|e| NotifierError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            relay_url: relay_url.into(),
            sender: sender.into(),
            // An unresolved secret marker is as good as no key.
            api_key: api_key.filter(|key| !key.is_empty() && key != "secret_from_env"),
        })
    }
}

impl EmailNotifier for HttpEmailNotifier {
    fn send_approval<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, (), NotifierError> {
        Box::pin(async move {
            let email = render_approval_email(booking);
            let message = RelayMessage {
                from: &self.sender,
                to: &email.to,
                subject: &email.subject,
                text: &email.text,
            };
            debug!("Posting approval email for booking {} to relay", booking.id);

            let mut request = self.client.post(&self.relay_url).json(&message);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| NotifierError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(NotifierError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }

            info!("Approval email for booking {} accepted by relay", booking.id);
            Ok(())
        })
    }
}

/// Picks the notifier for the `[email]` section: the HTTP relay when a
/// `relay_url` is set, otherwise the log notifier.
pub fn notifier_from_config(
    config: Option<&EmailConfig>,
) -> Result<Arc<dyn EmailNotifier>, NotifierError> {
    match config {
        Some(EmailConfig {
            sender,
            relay_url: Some(relay_url),
            api_key,
            timeout_secs,
        }) => {
            info!("Approval emails go to relay {}", relay_url);
            Ok(Arc::new(HttpEmailNotifier::new(
                relay_url.clone(),
                sender.clone(),
                api_key.clone(),
                timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            )?))
        }
        Some(email) => {
            info!("No email relay configured; approval emails are logged");
            Ok(Arc::new(LogEmailNotifier::new(email.sender.clone())))
        }
        None => {
            info!("No email configuration; approval emails are logged");
            Ok(Arc::new(LogEmailNotifier::default()))
        }
    }
}
