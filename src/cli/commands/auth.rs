use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_OWNER_EMAIL: &str = "owner-email";
pub const ARG_ACCESS_SECRET: &str = "access-secret";
pub const ARG_REFRESH_SECRET: &str = "refresh-secret";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_OWNER_EMAIL)
                .long(ARG_OWNER_EMAIL)
                .help("Email granted the admin role on registration")
                .env("SESAME_OWNER_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ACCESS_SECRET)
                .long(ARG_ACCESS_SECRET)
                .help("HMAC secret for access tokens")
                .env("SESAME_ACCESS_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_REFRESH_SECRET)
                .long(ARG_REFRESH_SECRET)
                .help("HMAC secret for refresh tokens")
                .env("SESAME_REFRESH_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("access-ttl-seconds")
                .long("access-ttl-seconds")
                .help("Access token TTL in seconds")
                .env("SESAME_ACCESS_TTL_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("refresh-ttl-seconds")
                .long("refresh-ttl-seconds")
                .help("Refresh token TTL in seconds")
                .env("SESAME_REFRESH_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("otp-ttl-seconds")
                .long("otp-ttl-seconds")
                .help("One-time password TTL in seconds")
                .env("SESAME_OTP_TTL_SECONDS")
                .default_value("600")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("max-login-failures")
                .long("max-login-failures")
                .help("Consecutive failures before an identity is locked")
                .env("SESAME_MAX_LOGIN_FAILURES")
                .default_value("5")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("lockout-seconds")
                .long("lockout-seconds")
                .help("Lockout duration in seconds")
                .env("SESAME_LOCKOUT_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("frontend-base-url")
                .long("frontend-base-url")
                .help("Frontend origin allowed by CORS")
                .env("SESAME_FRONTEND_BASE_URL")
                .default_value("http://localhost:3000"),
        )
}

#[derive(Debug)]
pub struct Options {
    pub owner_email: String,
    pub access_secret: SecretString,
    pub refresh_secret: SecretString,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub otp_ttl_seconds: u64,
    pub max_login_failures: u32,
    pub lockout_seconds: u64,
    pub frontend_base_url: String,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let owner_email = matches
            .get_one::<String>(ARG_OWNER_EMAIL)
            .cloned()
            .context("missing required argument: --owner-email")?;
        let access_secret = matches
            .get_one::<String>(ARG_ACCESS_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --access-secret")?;
        let refresh_secret = matches
            .get_one::<String>(ARG_REFRESH_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --refresh-secret")?;

        Ok(Self {
            owner_email,
            access_secret,
            refresh_secret,
            access_ttl_seconds: matches
                .get_one::<i64>("access-ttl-seconds")
                .copied()
                .unwrap_or(900),
            refresh_ttl_seconds: matches
                .get_one::<i64>("refresh-ttl-seconds")
                .copied()
                .unwrap_or(604_800),
            otp_ttl_seconds: matches
                .get_one::<u64>("otp-ttl-seconds")
                .copied()
                .unwrap_or(600),
            max_login_failures: matches
                .get_one::<u32>("max-login-failures")
                .copied()
                .unwrap_or(5),
            lockout_seconds: matches
                .get_one::<u64>("lockout-seconds")
                .copied()
                .unwrap_or(900),
            frontend_base_url: matches
                .get_one::<String>("frontend-base-url")
                .cloned()
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}
