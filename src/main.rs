//! habitflow main entrypoint.

use habitflow::run;
use habitflow::ui::messages::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    println!();
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
