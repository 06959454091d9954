//! The `send` subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use tracing::{debug, info};
use wirepad_application::ports::ProjectStore;
use wirepad_application::{ExecuteRequest, cancellation};
use wirepad_domain::{ClientSettings, ExecutionOutcome};
use wirepad_infrastructure::{ReqwestHttpClient, SettingsRepository, SystemClock};

use super::store;
use crate::render;

/// Send one request from a project
#[derive(Debug, clap::Args)]
pub struct SendRequest {
    /// Project file
    pub file: PathBuf,

    /// Request id or `Section/Sub/Request` label path
    pub request: String,

    /// Print response headers
    #[arg(short = 'i', long)]
    pub include_headers: bool,

    /// Timeout for this run, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Redirect limit for this run
    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// User-Agent for this run
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Accept invalid TLS certificates for this run
    #[arg(short = 'k', long)]
    pub insecure: bool,
}

impl SendRequest {
    /// Applies the per-run overrides on top of stored settings.
    fn apply(&self, mut settings: ClientSettings) -> ClientSettings {
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if let Some(max_redirects) = self.max_redirects {
            settings.max_redirects = max_redirects;
        }
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent.clone_from(user_agent);
        }
        if self.insecure {
            settings.accept_invalid_certs = true;
        }
        settings
    }

    pub(super) async fn run(self, settings: &SettingsRepository) -> anyhow::Result<()> {
        let project = store()
            .load(&self.file)
            .await
            .with_context(|| format!("Failed to open {}", self.file.display()))?;
        let located = project
            .find_request(&self.request)
            .or_else(|| project.find_request_by_path(&self.request))
            .ok_or_else(|| anyhow!("No request '{}' in {}", self.request, self.file.display()))?;

        let client_settings = self.apply(settings.load().await?);
        debug!(?client_settings, "client settings");
        let client = ReqwestHttpClient::with_settings(client_settings)?;
        let executor = ExecuteRequest::new(Arc::new(client), Arc::new(SystemClock::new()));

        let (token, receiver) = cancellation();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, canceling request");
                token.cancel();
            }
        });

        let result = executor.execute(located.as_location(), receiver).await;
        ctrl_c.abort();

        print!("{}", render::execution(&result, self.include_headers));
        match result.outcome {
            ExecutionOutcome::Completed(_) => Ok(()),
            ExecutionOutcome::Failed { kind, .. } => bail!("{}", kind.title()),
            ExecutionOutcome::Canceled => bail!("Request canceled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let send = SendRequest {
            file: PathBuf::from("p.wrp"),
            request: "r".to_string(),
            include_headers: false,
            timeout_ms: Some(500),
            max_redirects: None,
            user_agent: None,
            insecure: true,
        };
        let settings = send.apply(ClientSettings::default());
        assert_eq!(settings.timeout_ms, 500);
        assert_eq!(settings.max_redirects, ClientSettings::default().max_redirects);
        assert!(settings.accept_invalid_certs);
    }
}
