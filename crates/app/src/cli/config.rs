//! The `config` subcommand.

use anyhow::{Context, anyhow, bail};
use wirepad_domain::ClientSettings;
use wirepad_infrastructure::SettingsRepository;

/// Show or change HTTP client settings
#[derive(Debug, clap::Subcommand)]
pub enum Config {
    /// Print the current settings as JSON
    Show,

    /// Print the settings file location
    Path,

    /// Change one setting
    Set {
        /// One of `timeout_ms`, `max_redirects`, `user_agent`, `accept_invalid_certs`
        key: String,
        /// New value
        value: String,
    },

    /// Restore the defaults
    Reset,
}

impl Config {
    pub(super) async fn run(self, repository: &SettingsRepository) -> anyhow::Result<()> {
        match self {
            Self::Show => {
                let settings = repository.load().await?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            Self::Path => {
                let path = repository
                    .path()
                    .ok_or_else(|| anyhow!("No configuration directory on this system"))?;
                println!("{}", path.display());
            }
            Self::Set { key, value } => {
                let mut settings = repository.load().await?;
                set(&mut settings, &key, &value)?;
                repository.save(&settings).await?;
                println!("{key} = {value}");
            }
            Self::Reset => {
                repository.save(&ClientSettings::default()).await?;
                println!("Settings reset to defaults");
            }
        }
        Ok(())
    }
}

fn set(settings: &mut ClientSettings, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "timeout_ms" => {
            settings.timeout_ms = value.parse().with_context(|| {
                format!("timeout_ms must be a number of milliseconds, got '{value}'")
            })?;
        }
        "max_redirects" => {
            settings.max_redirects = value
                .parse()
                .with_context(|| format!("max_redirects must be a number, got '{value}'"))?;
        }
        "user_agent" => value.clone_into(&mut settings.user_agent),
        "accept_invalid_certs" => {
            settings.accept_invalid_certs = value.parse().with_context(|| {
                format!("accept_invalid_certs must be true or false, got '{value}'")
            })?;
        }
        other => bail!(
            "Unknown setting '{other}' \
             (expected timeout_ms, max_redirects, user_agent or accept_invalid_certs)"
        ),
    }
    Ok(())
}
