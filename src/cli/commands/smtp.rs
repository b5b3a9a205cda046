use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_SMTP_HOST: &str = "smtp-host";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SMTP_HOST)
                .long(ARG_SMTP_HOST)
                .help("SMTP relay host; when unset, outgoing email is logged instead")
                .env("SESAME_SMTP_HOST"),
        )
        .arg(
            Arg::new("smtp-port")
                .long("smtp-port")
                .help("SMTP relay port")
                .env("SESAME_SMTP_PORT")
                .default_value("587")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("smtp-username")
                .long("smtp-username")
                .help("SMTP username")
                .env("SESAME_SMTP_USERNAME")
                .requires(ARG_SMTP_HOST),
        )
        .arg(
            Arg::new("smtp-password")
                .long("smtp-password")
                .help("SMTP password")
                .env("SESAME_SMTP_PASSWORD")
                .hide_env_values(true)
                .requires(ARG_SMTP_HOST),
        )
        .arg(
            Arg::new("smtp-from")
                .long("smtp-from")
                .help("From address for outgoing email")
                .env("SESAME_SMTP_FROM")
                .requires(ARG_SMTP_HOST),
        )
}

#[derive(Debug)]
pub struct Options {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub from: String,
}

impl Options {
    /// Returns `None` when no SMTP host is configured.
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Option<Self> {
        let host = matches.get_one::<String>(ARG_SMTP_HOST).cloned()?;
        let from = matches
            .get_one::<String>("smtp-from")
            .cloned()
            .unwrap_or_else(|| format!("no-reply@{host}"));
        Some(Self {
            host,
            port: matches.get_one::<u16>("smtp-port").copied().unwrap_or(587),
            username: matches.get_one::<String>("smtp-username").cloned(),
            password: matches
                .get_one::<String>("smtp-password")
                .cloned()
                .map(SecretString::from),
            from,
        })
    }
}
