//! Log level parsing and the stderr subscriber, scoped to this workspace's crates.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Crates whose events follow the `--log` level; everything else only reports errors.
const OWN_CRATES: [&str; 3] = ["cowin_cli", "cowin_core", "cowin_provider_public"];

#[derive(thiserror::Error, Debug)]
#[error("Invalid log value '{0}'")]
pub(crate) struct InvalidLogLevel(String);

/// Parse a level name ignoring case; `critical` and `warning` are accepted as aliases.
pub(crate) fn parse_level(raw: &str) -> Result<LevelFilter, InvalidLogLevel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "critical" | "fatal" => Ok(LevelFilter::ERROR),
        "warning" => Ok(LevelFilter::WARN),
        name => name
            .parse::<LevelFilter>()
            .map_err(|_err| InvalidLogLevel(raw.to_owned())),
    }
}

/// Install the global subscriber, writing to stderr so stdout only carries results.
pub(crate) fn init(level: LevelFilter) {
    let mut directives = vec![String::from("error")];
    directives.extend(OWN_CRATES.iter().map(|name| format!("{name}={level}")));

    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(true)
        .without_time()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::new(directives.join(",").to_lowercase()))
        .init();
}
