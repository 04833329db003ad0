//! Audio output device listing command.

use clap::Args;
use klang_io::{default_output_device, list_output_devices};

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_output_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    let default_name = default_output_device()?.map(|d| d.name);

    println!("Available Output Devices");
    println!("========================\n");

    for (idx, device) in devices.iter().enumerate() {
        let marker = if Some(&device.name) == default_name.as_ref() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  [{}] {} ({} ch, {} Hz){}",
            idx, device.name, device.channels, device.default_sample_rate, marker
        );
    }

    println!();
    println!("Tip: Use device index or partial name with --output:");
    println!("  klang play --output 0");
    println!("  klang play --output \"USB\"");

    Ok(())
}
