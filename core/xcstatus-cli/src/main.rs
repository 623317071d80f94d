//! xcstatus: one-line Xcode build status for the terminal.
//!
//! ## Subcommands
//!
//! - `status`: one poll pass, prints the rendered line
//! - `watch`: polls on an interval, reprinting the line each pass
//! - `toggle`: flips the `enabled` flag in the status file
//! - `arrange`: positions terminal and main app side by side

mod arrange;
mod logging;

use std::thread::sleep;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::error;

use xcstatus_core::{OsaScriptProbe, StatusEngine, StorageConfig};

#[derive(Parser)]
#[command(name = "xcstatus")]
#[command(about = "Xcode build status line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one poll pass and print the status line
    Status,

    /// Poll repeatedly, printing the status line each pass
    Watch {
        /// Seconds between passes
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },

    /// Enable or disable the status line
    Toggle {
        /// true to enable, false to disable
        #[arg(value_name = "ENABLED")]
        enabled: bool,
    },

    /// Arrange terminal and main app side by side
    Arrange {
        /// Side of the screen for the terminal
        #[arg(value_enum, default_value = "right", ignore_case = true)]
        position: arrange::Position,

        /// Terminal width as a percentage of the screen
        #[arg(long, default_value_t = 25, value_name = "PERCENT")]
        proportion: u8,

        /// App to arrange opposite the terminal (partial match allowed)
        #[arg(long)]
        app: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let storage = StorageConfig::default();

    match cli.command {
        Commands::Status => {
            logging::init();
            let engine = StatusEngine::new(OsaScriptProbe, storage);
            println!("{}", engine.persist_and_render());
        }
        Commands::Watch { interval } => {
            let _guard = logging::init_watch(&storage);
            let engine = StatusEngine::new(OsaScriptProbe, storage);
            loop {
                println!("{}", engine.persist_and_render());
                sleep(Duration::from_secs(interval));
            }
        }
        Commands::Toggle { enabled } => {
            logging::init();
            match xcstatus_core::store::set_enabled(&storage.status_file(), enabled) {
                Ok(true) => println!("Status line enabled"),
                Ok(false) => println!("Status line disabled"),
                Err(err) => {
                    error!(error = %err, "Failed to update status file");
                    std::process::exit(1);
                }
            }
        }
        Commands::Arrange {
            position,
            proportion,
            app,
        } => {
            logging::init();
            if let Err(message) = arrange::run(position, proportion, app.as_deref()) {
                eprintln!("{message}");
                std::process::exit(1);
            }
        }
    }
}
