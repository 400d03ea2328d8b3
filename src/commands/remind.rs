use crate::api::{send_reminder, Mode, Reminder};
use crate::args::RemindArgs;
use crate::commands::{load_ledger, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::anyhow;

/// Validates the request against the current snapshot and hands it off to the reminder endpoint.
/// Nothing about the request is kept, and it has no effect on what anyone owes.
pub async fn remind(config: &Config, mode: Mode, args: &RemindArgs) -> Result<Out<()>> {
    if config.reminder_url().is_none() {
        return Err(anyhow!(
            "Reminders are not set up, add a reminder_url to {}",
            config.config_path().display()
        ))
        .pub_result(ErrorType::Config);
    }
    let reminder = Reminder::new(&args.member, &args.email).pub_result(ErrorType::Reminder)?;
    let ledger = load_ledger(config, mode).await?;
    ledger
        .require_member(reminder.name())
        .pub_result(ErrorType::Reminder)?;
    send_reminder(config, mode, &reminder)
        .await
        .pub_result(ErrorType::Reminder)?;
    Ok(format!(
        "Saved a reminder for {} at {}",
        reminder.name(),
        reminder.email()
    )
    .into())
}
