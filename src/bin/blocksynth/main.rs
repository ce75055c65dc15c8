//! blocksynth - block-based synthesizer player
//!
//! Run with: cargo run -- --bpm 100 --midi-port 0
//! Log level: RUST_LOG=debug

mod app;
mod session;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::App;

#[derive(Debug, Parser)]
#[command(name = "blocksynth")]
#[command(about = "Block-based synthesizer with metronome, loop tracks and MIDI voices", long_about = None)]
pub struct Args {
    /// Metronome tempo in beats per minute
    #[arg(long, default_value_t = 120.0)]
    pub bpm: f64,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    /// Frames per block
    #[arg(long, default_value_t = 960)]
    pub block_size: usize,

    /// Output channels (1 or 2)
    #[arg(long, default_value_t = 1)]
    pub channels: u16,

    /// MIDI input port index (see --list-midi)
    #[arg(long)]
    pub midi_port: Option<usize>,

    /// Only accept this MIDI channel (0-15); all channels by default
    #[arg(long)]
    pub midi_channel: Option<u8>,

    /// Start without the metronome
    #[arg(long)]
    pub no_metronome: bool,

    /// Print the available MIDI input ports and exit
    #[arg(long)]
    pub list_midi: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.list_midi {
        return app::list_midi_ports();
    }

    App::new(&args)?.run()
}
