//! The `serve` subcommand.

use color_eyre::eyre::{WrapErr, eyre};
use folio_config::RelayConfig;
use folio_relay::{Mailer, OutboxMailer, Relay, RelayServer, SmtpMailer};
use tracing_subscriber::EnvFilter;

/// Owner address used by `--dry-run` when no mail account is configured.
const DRY_RUN_OWNER: &str = "owner@localhost.localdomain";

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(config: &RelayConfig, dry_run: bool) -> color_eyre::Result<()> {
    init_tracing();
    tracing::debug!(?config, "mail configuration");

    let owner = owner_address(config, dry_run)?;
    if dry_run {
        tracing::warn!(%owner, "dry run: notifications are kept in memory and never sent");
        return listen(config, Relay::new(OutboxMailer::new(), owner));
    }

    let password = config
        .mail_password
        .as_deref()
        .ok_or_else(|| eyre!("EMAIL_PASSWORD is not set"))?;
    let host = config.smtp_host();
    let mailer = SmtpMailer::new(&host, &owner, password)
        .wrap_err_with(|| format!("failed to set up SMTP transport for {host}"))?;
    tracing::info!(%host, service = %config.mail_service, "using smtp relay");
    listen(config, Relay::new(mailer, owner))
}

/// The account notifications are sent from and to.
///
/// A dry run needs no account and falls back to [`DRY_RUN_OWNER`].
fn owner_address(config: &RelayConfig, dry_run: bool) -> color_eyre::Result<String> {
    match (&config.mail_user, dry_run) {
        (Some(user), _) => Ok(user.clone()),
        (None, true) => Ok(DRY_RUN_OWNER.to_string()),
        (None, false) => Err(eyre!(
            "EMAIL_USER is not set; the relay has no account to send from"
        )),
    }
}

fn listen<M: Mailer>(config: &RelayConfig, relay: Relay<M>) -> color_eyre::Result<()> {
    let server = RelayServer::bind(&config.bind_address(), relay)?;
    server.serve();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_needs_no_account() {
        let config = RelayConfig::default();
        assert_eq!(owner_address(&config, true).unwrap(), DRY_RUN_OWNER);
        assert!(owner_address(&config, false).is_err());
    }

    #[test]
    fn test_configured_account_is_owner() {
        let config = RelayConfig {
            mail_user: Some("me@example.com".to_string()),
            ..RelayConfig::default()
        };
        assert_eq!(owner_address(&config, true).unwrap(), "me@example.com");
        assert_eq!(owner_address(&config, false).unwrap(), "me@example.com");
    }

    #[test]
    fn test_dry_run_owner_is_deliverable() {
        use folio_relay::{Method, RelayRequest, SEND_EMAIL_PATH};

        let relay = Relay::new(OutboxMailer::new(), DRY_RUN_OWNER);
        let response = relay.handle(&RelayRequest::new(
            Method::Post,
            SEND_EMAIL_PATH,
            r#"{"name":"A","email":"a@b.com","message":"hi"}"#,
        ));
        assert_eq!(response.status, 200);
        assert_eq!(relay.mailer().sent()[0].to, DRY_RUN_OWNER);
    }
}
