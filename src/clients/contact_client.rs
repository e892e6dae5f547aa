//! Contact-form submission.
//!
//! A submission is a single POST. It is never retried and never cancelled,
//! so a page unmounting mid-send does not lose the message.

use crate::framework::{FetchError, Submitter};
use crate::model::ContactMessage;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const CONTACT_PATH: &str = "/api/ContactMessages";

/// Shown after the backend accepted the message.
pub const SENT_STATUS: &str = "Thank you for your message!";

/// Every variant displays as the status line shown under the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill all fields.")]
    Incomplete,

    #[error("Something went wrong. Please try again later.")]
    UnexpectedStatus(u16),

    #[error("Error sending message. Please try again later.")]
    Send(#[from] FetchError),
}

/// Posts [`ContactMessage`]s to one URL.
#[derive(Clone)]
pub struct ContactClient {
    submitter: Arc<dyn Submitter>,
    url: String,
}

impl ContactClient {
    pub fn new(submitter: Arc<dyn Submitter>, url: impl Into<String>) -> Self {
        Self {
            submitter,
            url: url.into(),
        }
    }

    /// Only HTTP 201 counts as delivered.
    #[instrument(skip(self, message), fields(url = %self.url))]
    pub async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        if !message.is_complete() {
            return Err(ContactError::Incomplete);
        }

        let body = json!({
            "name": message.name,
            "email": message.email,
            "message": message.message,
        });
        match self.submitter.post(&self.url, body).await {
            Ok(201) => {
                info!("Contact message sent");
                Ok(())
            }
            Ok(status) => {
                warn!(status, "Unexpected status for contact message");
                Err(ContactError::UnexpectedStatus(status))
            }
            Err(e) => {
                warn!(error = %e, "Error sending message");
                Err(e.into())
            }
        }
    }
}

/// Field values plus the status line of the contact form.
pub struct ContactForm {
    client: ContactClient,
    pub draft: ContactMessage,
    status: String,
}

impl ContactForm {
    pub fn new(client: ContactClient) -> Self {
        Self {
            client,
            draft: ContactMessage::default(),
            status: String::new(),
        }
    }

    /// Empty until the first submit.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Sends the draft and updates the status line. The draft is cleared only
    /// when the message was delivered.
    pub async fn submit(&mut self) -> Result<(), ContactError> {
        let result = self.client.send(&self.draft).await;
        match &result {
            Ok(()) => {
                self.draft = ContactMessage::default();
                self.status = SENT_STATUS.to_string();
            }
            Err(e) => self.status = e.to_string(),
        }
        result
    }
}
