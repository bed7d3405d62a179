//! # magichome_rs
//!
//! An async Rust library for controlling MagicHome-family WiFi LED strip
//! controllers over TCP.
//!
//! This crate provides a **runtime-agnostic** async API to communicate with
//! the reverse-engineered RGB/DIM controller family on your local network:
//! power switching, output channel levels, built-in animation effects, state
//! queries, and UDP broadcast discovery.
//!
//! ## Quick Start
//!
//! ```ignore
//! use magichome_rs::{ChannelLevels, Controller, DiscoveryConfig, discover_controllers};
//!
//! // Works with any async runtime!
//! async fn orange_everywhere() -> Result<(), Box<dyn std::error::Error>> {
//!     // Find every controller answering on the local /24 network
//!     let config = DiscoveryConfig::new("192.168.1.255");
//!     for descriptor in discover_controllers(&config).await? {
//!         let mut controller = descriptor.connect().await?;
//!         controller.turn_on().await?;
//!         controller.set_channels(&ChannelLevels::rgb(255, 64, 0)).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Runtime Agnostic**: Works with tokio, async-std, or smol async runtimes
//! - **Discovery**: Find controllers on your network with [`discover_controllers`]
//! - **Power Control**: Turn controllers on/off with echo confirmation via [`Controller`]
//! - **Channel Levels**: Drive the five output channels (RGB + two whites) using [`ChannelLevels`]
//! - **Effect Modes**: Start the built-in animations with [`EffectMode`] and [`Speed`]
//! - **State Queries**: Decode the controller's state report into a [`DeviceState`]
//!
//! ## Communication
//!
//! Control traffic is a binary frame protocol over TCP port 5577, one
//! connection per controller; every command frame ends in a modulo-256
//! checksum byte. Discovery broadcasts an ASCII probe on UDP port 48899 and
//! parses the comma-separated replies. The devices must be on the same local
//! network and ideally have static IP addresses assigned.
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using
//! feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! magichome-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! magichome-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! magichome-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod checksum;
mod command;
mod controller;
mod discovery;
mod errors;
pub mod runtime;
mod state;
mod types;

// Re-export public API
pub use checksum::with_checksum;
pub use command::{STATE_QUERY, channel_command, mode_command, power_command};
pub use controller::Controller;
pub use discovery::{DeviceDescriptor, DiscoveryConfig, discover_controllers};
pub use errors::Error;
pub use state::{DeviceState, STATE_FRAME_LEN};
pub use types::{
    ChannelLevels, ControllerType, EffectMode, FunctionalMode, PowerState, Speed,
    level_to_percent, percent_to_level,
};
