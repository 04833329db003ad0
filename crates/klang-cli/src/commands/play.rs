//! Live keyboard synthesizer command.
//!
//! Opens the output stream, registers the mixer as the per-sample generator,
//! then turns the calling thread into the input poller: crossterm key events
//! become note-on/note-off calls into the shared registry.

use std::io::{Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, ValueEnum};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use klang_io::{OutputStream, StreamConfig};
use klang_synth::{NoteRegistry, channel};

use crate::config::SynthConfig;
use crate::keymap;
use crate::keys::KeyTracker;

#[derive(Args)]
pub struct PlayArgs {
    /// Output device (index, exact name, or partial name)
    #[arg(short, long)]
    output: Option<String>,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,

    /// Buffer size in frames
    #[arg(long, default_value_t = 512)]
    buffer_size: u32,

    /// Instrument voicing newly pressed keys
    #[arg(short, long, value_enum, default_value = "harmonica")]
    instrument: InstrumentArg,

    /// TOML config file with voice and mixer overrides
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InstrumentArg {
    /// Struck bell: no sustain, long ring-out
    Bell,
    /// Harmonica: sustains while held
    Harmonica,
}

impl InstrumentArg {
    fn channel(self) -> usize {
        match self {
            Self::Bell => channel::BELL,
            Self::Harmonica => channel::HARMONICA,
        }
    }
}

/// Raw-mode RAII guard. Also negotiates the keyboard-enhancement protocol,
/// which gives real key-release events on terminals that speak it.
struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enabling raw terminal mode")?;
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .context("enabling keyboard enhancement")?;
        }
        Ok(Self { enhanced })
    }

    /// Whether the terminal delivers real release events.
    fn reports_releases(&self) -> bool {
        self.enhanced
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };

    let registry = Arc::new(NoteRegistry::new());
    let mixer = config.build_mixer(Arc::clone(&registry));

    let mut stream = OutputStream::new(StreamConfig {
        sample_rate: args.sample_rate,
        buffer_size: args.buffer_size,
        output_device: args.output.clone(),
    })?;
    let clock = stream.clock();

    println!(
        "klang — {:?} voice on '{}' at {} Hz",
        args.instrument,
        stream.device_name(),
        stream.sample_rate()
    );
    println!();
    println!("{}", keymap::layout());
    println!("Play with the keys above. Esc or Ctrl+C quits.");
    println!();

    // The stream asks once per channel per frame; compute the mix on the
    // first ask of each frame and replay it for the remaining channels, so
    // the registry lock is taken once per frame.
    let mut last_frame = (f64::NAN, 0.0_f32);
    stream.start(move |_channel, time| {
        if time != last_frame.0 {
            last_frame = (time, mixer.mix(time) as f32);
        }
        last_frame.1
    })?;

    let raw = RawModeGuard::enter()?;
    if !raw.reports_releases() {
        tracing::debug!(
            hold_ms = config.hold_ms(),
            "terminal has no key-release events; emulating via hold timeout"
        );
    }

    let note_channel = args.instrument.channel();
    let mut tracker = KeyTracker::new(config.hold_ms());
    let started = Instant::now();
    let mut last_status = Instant::now();

    loop {
        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(c) => {
                        if let Some(slot) = keymap::slot_for(c) {
                            let now_ms = started.elapsed().as_millis() as u64;
                            match key.kind {
                                KeyEventKind::Press | KeyEventKind::Repeat => {
                                    if tracker.touch(slot, now_ms) {
                                        registry.note_on(slot as i32, note_channel, clock.now());
                                    }
                                }
                                KeyEventKind::Release => {
                                    tracker.clear(slot);
                                    registry.note_off(slot as i32, clock.now());
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        if !raw.reports_releases() {
            let now_ms = started.elapsed().as_millis() as u64;
            for slot in tracker.sweep(now_ms) {
                registry.note_off(slot as i32, clock.now());
            }
        }

        if last_status.elapsed() >= Duration::from_millis(50) {
            print!(
                "\rnotes: {:2}   clock: {:8.2}s ",
                registry.active_notes(),
                clock.now()
            );
            stdout().flush()?;
            last_status = Instant::now();
        }
    }

    drop(raw);
    stream.stop();
    println!();
    println!("Done!");
    Ok(())
}
