// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use clap::{crate_version, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use touchdrum::config::{self, Kit};
use touchdrum::midi;
use touchdrum::shutdown::ShutdownHandle;
use tracing::info;

const SYSTEMD_SERVICE: &str = r#"
[Unit]
Description=touch pad drum kit

[Service]
Type=simple
Restart=on-failure
EnvironmentFile=-/etc/default/touchdrum
ExecStart=/usr/local/bin/touchdrum start "$TOUCHDRUM_KIT"

[Install]
WantedBy=multi-user.target
Alias=touchdrum.service
"#;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Turns capacitive touch pads into a MIDI drum kit."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start will play the kit until interrupted.
    Start {
        /// The path to the kit config.
        kit_path: String,
    },
    /// Validates a kit and lists its pads.
    Pads {
        /// The path to the kit config.
        kit_path: String,
    },
    /// Lists the available MIDI output devices.
    MidiDevices {},
    /// Prints a systemd service definition to stdout.
    Systemd {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { kit_path } => {
            let kit = Kit::load(&PathBuf::from(&kit_path))?;
            let mut dispatch = config::init_dispatch(&kit)?;

            let shutdown = ShutdownHandle::new();
            let join = {
                let shutdown = shutdown.clone();
                tokio::task::spawn_blocking(move || dispatch.run(&shutdown))
            };

            tokio::signal::ctrl_c().await?;
            info!("Interrupted, shutting down.");
            shutdown.request();
            join.await?;
        }
        Commands::Pads { kit_path } => {
            let kit = Kit::load(&PathBuf::from(&kit_path))?;
            let pads = kit.to_pads()?;

            println!("Pads (count: {}):", pads.len());
            for pad in pads.iter() {
                println!("- {}", pad);
            }
        }
        Commands::MidiDevices {} => {
            let devices = midi::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Systemd {} => {
            println!("{}", SYSTEMD_SERVICE)
        }
    }

    Ok(())
}
