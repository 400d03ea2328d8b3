use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the dues home directory and an initial `config.json` from `args`.
///
/// # Errors
/// - Returns a `Config` error if a URL is unusable or any file operation fails.
pub async fn init(dues_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(
        dues_home,
        args.feed_url(),
        args.feed_format(),
        args.reminder_url(),
    )
    .await?;
    Ok(format!(
        "Successfully created the dues config at {}",
        config.config_path().display()
    )
    .into())
}
