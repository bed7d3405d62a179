//! Discover all LED controllers on the network and print their state.
//!
//! This example demonstrates:
//! - Discovery of controllers via UDP broadcast
//! - Opening a session and querying the decoded device state
//!
//! Run with: cargo run --example scan -- 192.168.1.255

use magichome_rs::{DiscoveryConfig, discover_controllers};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let broadcast = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.1.255".to_string());

    println!("Discovering controllers via {broadcast}...");

    let config = DiscoveryConfig::new(broadcast);
    let descriptors = discover_controllers(&config).await?;

    if descriptors.is_empty() {
        println!("No controllers found on the network.");
        return Ok(());
    }

    println!("Found {} controller(s):", descriptors.len());
    for descriptor in &descriptors {
        println!(
            "  - {} mac={} model={}",
            descriptor.host, descriptor.mac, descriptor.model
        );

        match descriptor.connect().await {
            Ok(mut controller) => match controller.query_state().await {
                Ok(state) => println!(
                    "    power={:?} mode={:?} ({}% speed) type={:?} channels={:?}",
                    state.power(),
                    state.mode().mode(),
                    state.mode().speed().percent(),
                    state.controller_type(),
                    state.channels(),
                ),
                Err(e) => eprintln!("    state query failed: {e}"),
            },
            Err(e) => eprintln!("    connect failed: {e}"),
        }
    }

    Ok(())
}
