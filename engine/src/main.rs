#![deny(warnings)]
#![deny(rust_2018_idioms)]

use std::path::PathBuf;

use clap::Parser;
use engine::{settings::Settings, startup::App};
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Frames to process, in order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let settings = Settings::new().unwrap();
    settings.init_tracer();

    let app = match App::build(&settings, args.frames).await {
        Ok(app) => app,
        Err(e) => {
            error!("failed to start: {e:?}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("run failed: {e:?}");
        std::process::exit(1);
    }
}
