//! sound - granulate, crush and play with the sound_kit primitives
//!
//! Run with: cargo run --bin sound -- <command>
//! Logging follows RUST_LOG, e.g. RUST_LOG=debug.

mod clip;
mod crush;
mod fm;
mod granulate;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sound", author, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a granular cloud from a WAV file to another WAV file
    Granulate(GranulateArgs),
    /// Bitcrush live input (or a fallback clip), optionally through a reverb
    Crush(CrushArgs),
    /// Play an enveloped FM tone
    Fm(FmArgs),
}

#[derive(Args, Debug)]
pub struct GranulateArgs {
    /// Source WAV file
    input: PathBuf,
    /// Where to write the rendered cloud
    output: PathBuf,
    /// Playback position as a fraction of the source, 0 to 1
    #[arg(long, default_value_t = 0.0)]
    position: f64,
    /// Number of grains
    #[arg(long, default_value_t = 20)]
    count: usize,
    /// Grain volume
    #[arg(long, default_value_t = 0.75)]
    volume: f32,
    /// Seed for grain placement
    #[arg(long, default_value_t = 2.0, conflicts_with = "no_seed")]
    seed: f64,
    /// Disable randomized placement; every grain reads the position
    #[arg(long)]
    no_seed: bool,
    /// Read window as a fraction of the remaining source
    #[arg(long, default_value_t = 0.9)]
    spread: f64,
    /// Grain length in seconds
    #[arg(long, default_value_t = 0.1)]
    duration: f64,
    /// Onset spacing as a fraction of grain length
    #[arg(long, default_value_t = 1.0)]
    delay: f64,
    /// Pitch shift in octaves
    #[arg(long, default_value_t = 0.0)]
    transpose: f64,
    /// Output channels
    #[arg(long, default_value_t = 2)]
    channels: usize,
}

#[derive(Args, Debug)]
pub struct CrushArgs {
    /// Impulse response for the reverb
    #[arg(long)]
    impulse: Option<PathBuf>,
    /// Clip to loop when live input is unavailable
    #[arg(long)]
    clip: Option<PathBuf>,
    /// Bit depth of the crusher
    #[arg(long, default_value_t = 16)]
    bits: u32,
    /// Hold length in samples
    #[arg(long, default_value_t = 10)]
    period: usize,
    /// How long to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,
}

#[derive(Args, Debug)]
pub struct FmArgs {
    #[arg(long, default_value_t = 440.0)]
    frequency: f32,
    /// Modulator frequency as a multiple of the carrier
    #[arg(long, default_value_t = 1.0)]
    ratio: f32,
    /// Peak frequency deviation in Hz
    #[arg(long, default_value_t = 80.0)]
    depth: f32,
    /// Note length, release included
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    match Cli::parse().command {
        Command::Granulate(args) => granulate::run(args),
        Command::Crush(args) => crush::run(args),
        Command::Fm(args) => fm::run(args),
    }
}
