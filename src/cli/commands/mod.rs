use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

/// Default session TTL: 24 hours.
const DEFAULT_SESSION_TTL_SECONDS: &str = "86400";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("muster")
        .about("Troop membership and activity tracker")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("MUSTER_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            // Required with no default: without a configured secret the
            // process refuses to start instead of signing with a known key.
            Arg::new("session-secret")
                .long("session-secret")
                .help("Signing secret for session tokens")
                .env("SESSION_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("session-ttl-seconds")
                .long("session-ttl-seconds")
                .help("Session token TTL in seconds")
                .env("MUSTER_SESSION_TTL_SECONDS")
                .default_value(DEFAULT_SESSION_TTL_SECONDS)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .global(true)
                .action(clap::ArgAction::Count),
        )
}
