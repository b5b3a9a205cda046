//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, smtp};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;
    let smtp_opts = smtp::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        dsn,
        owner_email: auth_opts.owner_email,
        access_secret: auth_opts.access_secret,
        refresh_secret: auth_opts.refresh_secret,
        access_ttl_seconds: auth_opts.access_ttl_seconds,
        refresh_ttl_seconds: auth_opts.refresh_ttl_seconds,
        otp_ttl_seconds: auth_opts.otp_ttl_seconds,
        max_login_failures: auth_opts.max_login_failures,
        lockout_seconds: auth_opts.lockout_seconds,
        frontend_base_url: auth_opts.frontend_base_url,
        smtp: smtp_opts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_action_from_args() {
        temp_env::with_vars(
            [
                ("SESAME_DSN", None::<&str>),
                ("SESAME_OWNER_EMAIL", None),
                ("SESAME_ACCESS_SECRET", None),
                ("SESAME_REFRESH_SECRET", None),
                ("SESAME_SMTP_HOST", None),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "sesame",
                    "--dsn",
                    "postgres://user@localhost:5432/sesame",
                    "--owner-email",
                    "owner@example.com",
                    "--access-secret",
                    "access-secret",
                    "--refresh-secret",
                    "refresh-secret",
                    "--lockout-seconds",
                    "300",
                ]);
                let result = handler(&matches);
                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.owner_email, "owner@example.com");
                    assert_eq!(args.lockout_seconds, 300);
                    assert!(args.smtp.is_none());
                }
            },
        );
    }
}
