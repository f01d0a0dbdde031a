//! Contact form intake.
//!
//! Messages are validated, logged once and acknowledged. Nothing is
//! forwarded or stored.

use kanau::processor::Processor;
use thiserror::Error;
use tracing::info;
use wema_sdk::objects::{ContactAck, ContactMessage};

pub const CONTACT_ACK_MESSAGE: &str = "Thanks for reaching out to Wema!";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid email address")]
    InvalidEmail,
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Check required fields are non-blank and the email looks deliverable.
pub fn validate_contact(message: &ContactMessage) -> Result<(), ContactError> {
    let missing: Vec<&'static str> = [
        ("name", &message.name),
        ("email", &message.email),
        ("subject", &message.subject),
        ("message", &message.message),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ContactError::MissingFields(missing));
    }
    if !is_plausible_email(message.email.trim()) {
        return Err(ContactError::InvalidEmail);
    }
    Ok(())
}

pub struct ContactProcessor;

impl Processor<ContactMessage> for ContactProcessor {
    type Output = ContactAck;
    type Error = ContactError;

    async fn process(&self, message: ContactMessage) -> Result<ContactAck, ContactError> {
        validate_contact(&message)?;
        info!(
            name = %message.name.trim(),
            email = %message.email.trim(),
            subject = %message.subject.trim(),
            has_phone = message.phone.as_deref().is_some_and(|p| !p.trim().is_empty()),
            "Contact message received"
        );
        Ok(ContactAck {
            success: true,
            message: CONTACT_ACK_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            subject: "Volunteering".to_string(),
            message: "How can I help?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_message_is_acknowledged() {
        let ack = ContactProcessor.process(message()).await.unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, CONTACT_ACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_fields_are_listed() {
        let mut msg = message();
        msg.name = "   ".to_string();
        msg.message = String::new();

        let err = ContactProcessor.process(msg).await.unwrap_err();
        assert_eq!(err, ContactError::MissingFields(vec!["name", "message"]));
    }

    #[test]
    fn test_email_shape() {
        for good in ["a@b.co", "jane.doe+tag@mail.example.org"] {
            assert!(is_plausible_email(good), "{good}");
        }
        for bad in ["", "jane", "jane@", "@example.com", "jane@example", "jane@.com", "ja ne@x.io", "a@b@c.io", "a@b."] {
            assert!(!is_plausible_email(bad), "{bad}");
        }
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut msg = message();
        msg.email = "not-an-email".to_string();
        assert_eq!(validate_contact(&msg), Err(ContactError::InvalidEmail));
    }
}
