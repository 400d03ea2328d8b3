//! Hands reminder requests off to the configured endpoint.

use crate::api::Mode;
use crate::error::Res;
use crate::Config;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A request to be reminded when a member's next payment is due.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub(crate) struct Reminder {
    name: String,
    email: String,
}

impl Reminder {
    /// Validates `email` and creates the request. The member name is checked against the ledger by
    /// the caller.
    pub(crate) fn new(name: impl Into<String>, email: impl AsRef<str>) -> Res<Self> {
        let name = name.into();
        let email = email.as_ref().trim();
        if name.trim().is_empty() {
            bail!("A reminder needs a member name");
        }
        if email.is_empty() {
            bail!("An email address is required");
        }
        if !is_valid_email(email) {
            bail!("'{email}' is not a valid email address");
        }
        Ok(Self {
            name,
            email: email.to_string(),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn email(&self) -> &str {
        &self.email
    }
}

/// Accepts `local@domain.tld`: exactly one `@`, no whitespace, and a dot inside the domain with
/// something on both sides of it.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(ix, c)| c == '.' && ix > 0 && ix + 1 < domain.len())
}

/// POSTs the reminder as JSON to the configured `reminder_url`. In `Mode::Testing` nothing is sent.
pub(crate) async fn send_reminder(config: &Config, mode: Mode, reminder: &Reminder) -> Res<()> {
    let Some(url) = config.reminder_url() else {
        bail!(
            "No reminder_url is configured in {}",
            config.config_path().display()
        );
    };

    if mode == Mode::Testing {
        info!(
            "Test mode: not sending the reminder for {} at {} to {url}",
            reminder.name(),
            reminder.email()
        );
        return Ok(());
    }

    debug!("POST reminder for {} to {url}", reminder.name());
    let response = reqwest::Client::new()
        .post(url)
        .json(reminder)
        .send()
        .await
        .with_context(|| format!("Failed to send the reminder request to {url}"))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        bail!("The reminder endpoint responded with status {status}: {body}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("eleni@example.com"));
        assert!(is_valid_email("a.b@mail.example.gr"));
        assert!(!is_valid_email("eleni@example"));
        assert!(!is_valid_email("eleni@.com"));
        assert!(!is_valid_email("eleni@example."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("eleni@@example.com"));
        assert!(!is_valid_email("el eni@example.com"));
        assert!(!is_valid_email("eleni.example.com"));
    }

    #[test]
    fn test_empty_and_invalid_email_are_distinct() {
        let empty = Reminder::new("Eleni", "  ").unwrap_err();
        assert!(empty.to_string().contains("required"));
        let invalid = Reminder::new("Eleni", "eleni").unwrap_err();
        assert!(invalid.to_string().contains("not a valid"));
    }

    #[test]
    fn test_reminder_serializes_name_and_email() {
        let reminder = Reminder::new("Eleni", " eleni@example.com ").unwrap();
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Eleni", "email": "eleni@example.com" })
        );
    }

    #[tokio::test]
    async fn test_send_reminder_in_test_mode() {
        let env = TestEnv::new().await;
        let reminder = Reminder::new("Eleni", "eleni@example.com").unwrap();
        send_reminder(env.config(), Mode::Testing, &reminder)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_reminder_without_url() {
        let env = TestEnv::without_reminder_url().await;
        let reminder = Reminder::new("Eleni", "eleni@example.com").unwrap();
        let err = send_reminder(env.config(), Mode::Testing, &reminder)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reminder_url"));
    }
}
