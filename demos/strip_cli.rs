//! CLI application for controlling LED strip controllers.
//!
//! This example demonstrates a command-line interface over the full control
//! surface: discovery, state queries, power, channel levels, and effects.
//!
//! Run with: cargo run --example strip_cli -- --help

use clap::{Parser, Subcommand};
use magichome_rs::{
    ChannelLevels, Controller, DiscoveryConfig, EffectMode, Speed, discover_controllers,
};

#[derive(Parser)]
#[command(name = "strip-cli")]
#[command(about = "Control MagicHome LED strip controllers from the command line", long_about = None)]
struct Cli {
    /// Host address of the controller (not required for discover command)
    #[arg(short = 'H', long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover all controllers in a broadcast group
    Discover {
        /// Broadcast address of the local network, e.g. 192.168.1.255
        broadcast: String,

        /// Per-reply wait in milliseconds (default: 2000)
        #[arg(short, long, default_value = "2000")]
        timeout: u64,

        /// Number of probe rounds (default: 2)
        #[arg(short, long, default_value = "2")]
        attempts: u32,
    },

    /// Query and print the current device state
    Status,

    /// Turn the controller on
    On,

    /// Turn the controller off
    Off,

    /// Set color channel levels (0-255 each), whites off
    Color {
        /// Red component (0-255)
        red: u8,
        /// Green component (0-255)
        green: u8,
        /// Blue component (0-255)
        blue: u8,
    },

    /// Set white channel levels (0-255 each), color off
    White {
        /// Warm white component (0-255)
        warm: u8,
        /// Cool white component (0-255)
        cool: u8,
    },

    /// Start an effect mode by wire id (0x25-0x38)
    Mode {
        /// Effect id, e.g. 0x25 for the seven-color cross fade
        #[arg(value_parser = parse_effect_id)]
        id: u8,

        /// Animation speed percent, 0 (slowest) to 100 (fastest)
        #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u8).range(0..=100))]
        speed: u8,
    },
}

fn parse_effect_id(arg: &str) -> Result<u8, String> {
    let id = match arg.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => arg.parse(),
    }
    .map_err(|e| e.to_string())?;
    match EffectMode::from_id(id) {
        EffectMode::Unknown | EffectMode::None => Err(format!("no effect with id {id:#04x}")),
        _ => Ok(id),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Discover {
        broadcast,
        timeout,
        attempts,
    } = &cli.command
    {
        let mut config = DiscoveryConfig::new(broadcast.clone());
        config.scan_timeout = std::time::Duration::from_millis(*timeout);
        config.attempts = *attempts;

        let descriptors = discover_controllers(&config).await?;
        println!("Found {} controller(s):", descriptors.len());
        for d in &descriptors {
            println!("  {} mac={} model={}", d.host, d.mac, d.model);
        }
        return Ok(());
    }

    let host = cli
        .host
        .ok_or("--host is required for every command except discover")?;
    let mut controller = Controller::connect(&host).await?;

    match cli.command {
        Commands::Discover { .. } => unreachable!(),
        Commands::Status => {
            let state = controller.query_state().await?;
            println!("power:    {:?}", state.power());
            println!(
                "mode:     {:?} at {}% speed",
                state.mode().mode(),
                state.mode().speed().percent()
            );
            println!("type:     {:?}", state.controller_type());
            let channels = state.channels();
            println!(
                "channels: r={} g={} b={} ww={} cw={}",
                channels.red, channels.green, channels.blue, channels.warm, channels.cool
            );
        }
        Commands::On => {
            let confirmed = controller.turn_on().await?;
            println!("on ({})", if confirmed { "confirmed" } else { "no echo" });
        }
        Commands::Off => {
            let confirmed = controller.turn_off().await?;
            println!("off ({})", if confirmed { "confirmed" } else { "no echo" });
        }
        Commands::Color { red, green, blue } => {
            controller
                .set_channels(&ChannelLevels::rgb(red, green, blue))
                .await?;
            println!("channels set to {red},{green},{blue}");
        }
        Commands::White { warm, cool } => {
            controller
                .set_channels(&ChannelLevels::white(warm, cool))
                .await?;
            println!("white channels set to ww={warm} cw={cool}");
        }
        Commands::Mode { id, speed } => {
            let mode = EffectMode::from_id(id);
            controller.set_mode(mode, Speed::from_percent(speed)?).await?;
            println!("started {mode:?} at {speed}% speed");
        }
    }

    controller.close().await?;
    Ok(())
}
