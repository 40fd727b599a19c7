use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod headless;
mod raster;
mod runner;
mod script;

use runner::{run_headless, RunOptions};

fn main() {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Heartfield starting");
    let options = RunOptions::from_env();
    match run_headless(&options) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Heartfield error: {e}"),
        },
        Err(e) => eprintln!("Heartfield error: {e}"),
    }
}
