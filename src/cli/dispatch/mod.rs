use crate::cli::actions::Action;
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Turn parsed arguments into the action to execute.
///
/// # Errors
///
/// Returns an error if a required argument is missing; clap enforces these
/// before we get here, so failures indicate a wiring bug.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let session_secret = matches
        .get_one::<String>("session-secret")
        .map(|secret| SecretString::from(secret.clone()))
        .context("missing required argument: --session-secret")?;

    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        session_secret,
        session_ttl_seconds: matches
            .get_one::<i64>("session-ttl-seconds")
            .copied()
            .unwrap_or(86_400),
    })
}
