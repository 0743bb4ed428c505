pub(crate) mod intervaltimer;
pub(crate) mod testsignal;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use config_file::FromConfigFile;

use stripmeter::{MeterEngine, MeterOptions, OlaOutput, PixelSink, SystemClock, TerminalStrip};

use crate::intervaltimer::IntervalTimer;
use crate::testsignal::TestSignal;

/// Runs a peak meter on a made-up signal, drawn in the terminal or sent to OLA.
#[derive(Parser)]
struct Cli {
    /// Meter options file (toml, json, yaml or xml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of pixels on the strip
    #[arg(short, long, default_value_t = 8)]
    pixels: usize,

    /// Meter in dB instead of raw levels
    #[arg(long)]
    db: bool,

    /// Top of the meter on the first pixel
    #[arg(long)]
    reverse: Option<bool>,

    /// OLA OSC address to send the strip to instead of the terminal
    #[arg(long, value_name = "ADDR")]
    ola: Option<SocketAddr>,

    /// DMX universe on the OLA side
    #[arg(long, default_value_t = 0)]
    universe: u16,

    /// Meter updates per second
    #[arg(long, default_value_t = 30.0)]
    rate: f32,
}

fn load_options(args: &Cli) -> anyhow::Result<MeterOptions> {
    let mut options = match &args.config {
        Some(path) => MeterOptions::from_config_file(path)
            .with_context(|| format!("Cannot read meter options from {}", path.display()))?,
        None => MeterOptions {
            reverse: false,
            ..Default::default()
        },
    };

    if args.db {
        options.db = true;
    }
    if let Some(reverse) = args.reverse {
        options.reverse = reverse;
    }
    // The loop below flushes once per tick itself.
    options.show = false;

    log::info!("Meter options: {:?}", options);
    Ok(options)
}

fn create_sink(args: &Cli) -> anyhow::Result<Box<dyn PixelSink>> {
    if let Some(addr) = args.ola {
        let ola = OlaOutput::new(addr, args.universe, args.pixels).context("Cannot set up OLA output")?;
        return Ok(Box::new(ola));
    }

    Ok(Box::new(TerminalStrip::new(io::stdout(), args.pixels, 2)))
}

fn run(args: Cli) -> anyhow::Result<()> {
    let options = load_options(&args)?;
    let mut sink = create_sink(&args)?;
    let mut meter = MeterEngine::new(sink.as_ref(), SystemClock::new(), options)?;
    let mut signal = TestSignal::new(meter.scale(), args.rate);
    let mut timer = IntervalTimer::new(args.rate);

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    ctrlc::set_handler(move || handler_running.store(false, Ordering::SeqCst))
        .context("Cannot install Ctrl-C handler")?;

    while running.load(Ordering::SeqCst) {
        meter.set_value(signal.next_value(), sink.as_mut())?;
        sink.show().context("Cannot show strip")?;
        timer.sleep_until_next_tick();
    }

    log::info!("Stopping, peak was {:.1} at the end", meter.peak());
    sink.clear();
    sink.show().context("Cannot blank strip")?;
    println!();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
