//! Outreach email drafts.

use serde::{Deserialize, Serialize};

/// A drafted outreach email. Never sent by this library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Template used whenever the backend cannot produce a draft.
    pub fn fallback(event_name: &str) -> Self {
        Self {
            subject: format!("Inquiry regarding {}", event_name),
            body: format!(
                "Dear {event_name} Organizing Team,\n\n\
                 I am writing to inquire about exhibiting opportunities at {event_name}. \
                 Could you please share information on booth availability, pricing and \
                 the application process?\n\n\
                 Thank you for your time. I look forward to hearing from you.\n\n\
                 Best regards,"
            ),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }
}
