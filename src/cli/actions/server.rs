use crate::{
    api::{self, EmailSender, LogEmailSender, SmtpEmailSender},
    auth::AuthConfig,
    cli::commands::smtp,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub owner_email: String,
    pub access_secret: SecretString,
    pub refresh_secret: SecretString,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub otp_ttl_seconds: u64,
    pub max_login_failures: u32,
    pub lockout_seconds: u64,
    pub frontend_base_url: String,
    pub smtp: Option<smtp::Options>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the SMTP transport cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = AuthConfig::new(args.owner_email, args.access_secret, args.refresh_secret)
        .with_access_ttl_seconds(args.access_ttl_seconds)
        .with_refresh_ttl_seconds(args.refresh_ttl_seconds)
        .with_otp_ttl_seconds(args.otp_ttl_seconds)
        .with_max_failures(args.max_login_failures)
        .with_lockout_window_seconds(args.lockout_seconds)
        .with_frontend_base_url(args.frontend_base_url);

    let mailer: Arc<dyn EmailSender> = match args.smtp {
        Some(options) => {
            info!(host = %options.host, port = options.port, "using SMTP relay");
            Arc::new(SmtpEmailSender::new(
                &options.host,
                options.port,
                options.username.unwrap_or_default(),
                options
                    .password
                    .unwrap_or_else(|| SecretString::from(String::new())),
                options.from,
            )?)
        }
        None => {
            info!("no SMTP host configured, logging outgoing email");
            Arc::new(LogEmailSender)
        }
    };

    api::new(args.port, args.dsn, config, mailer).await
}
