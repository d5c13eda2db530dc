//! `sensors-emulator` - prints a fake `sensors -j` document
//!
//! Install it as `sensors` on a host without real sensors to exercise the
//! health-check end to end.

use clap::Parser;
use sensorcheck_core::sensors::emulator::{EmulatorSettings, emulate};

/// Emulates `sensors -j` output with random readings
#[derive(Parser, Debug)]
#[command(name = "sensors-emulator", version)]
struct Args {
    /// Accepted for compatibility with `sensors -j`
    #[arg(short = 'j', hide = true)]
    _json: bool,

    /// Number of temperature sensors
    #[arg(long, env = "NUM_TEMPS", default_value_t = 2)]
    temps: usize,

    /// Number of humidity sensors
    #[arg(long, env = "NUM_HUMS", default_value_t = 2)]
    hums: usize,

    /// Chip name
    #[arg(long, default_value = "emulator")]
    chip: String,
}

fn main() {
    let args = Args::parse();
    let settings = EmulatorSettings {
        chip: args.chip,
        temps: args.temps,
        hums: args.hums,
    };
    println!("{}", emulate(&settings, &mut rand::rng()));
}
