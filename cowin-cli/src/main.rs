//! Command line tool that checks for available vaccination slots and prints them as JSON.

mod args;
mod config;
mod logging;
mod output;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use cowin_core::service::SlotService;
use cowin_provider_public::{self as public, PublicSlotPort};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging setup
    let level = match logging::parse_level(&args.log) {
        Ok(level) => level,
        Err(err) => {
            logging::init(LevelFilter::ERROR);
            error!("{err}");
            return Err(err.into());
        }
    };
    logging::init(level);

    // Config
    let path = config::resolve_path(args.config.as_deref()).inspect_err(|err| error!("{err}"))?;
    info!("Parsing config file '{}'...", path.display());
    let config = config::load(&path).inspect_err(|err| {
        error!("{err}");
        error!(
            "Error while trying to find/parse config file at '{}'",
            path.display()
        );
    })?;

    // HTTP + service setup
    let client = public::client()?;
    let service = SlotService::new(Arc::new(PublicSlotPort::new(client)));

    let today = Local::now().date_naive();
    let centers = service
        .available_centers(today, &config)
        .await
        .inspect_err(|err| error!("{err}"))?;

    let rendered = output::render_centers(&centers)?;
    writeln!(io::stdout().lock(), "{rendered}")?;
    info!("{} centers are available", centers.len());

    Ok(())
}
