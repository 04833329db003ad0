//! Render a bell note offline and print its envelope shape.
//!
//! Run with: cargo run -p klang-synth --example bell_render
//!
//! No audio device needed — this drives the mixer by hand at 44.1 kHz and
//! reports the peak level in each 100 ms window so the strike-and-ring shape
//! is visible in the terminal.

use std::sync::Arc;

use klang_synth::{Mixer, NoteRegistry, channel};

fn main() {
    let sample_rate = 44_100.0_f64;
    let registry = Arc::new(NoteRegistry::new());
    let mixer = Mixer::with_standard_bank(Arc::clone(&registry));

    registry.note_on(0, channel::BELL, 0.0);
    registry.note_off(0, 1.0);

    println!("bell strike at t=0, key up at t=1.0");
    let window = (sample_rate / 10.0) as usize;
    let total = (sample_rate * 2.2) as usize;

    let mut peak = 0.0_f64;
    for i in 0..total {
        let t = i as f64 / sample_rate;
        peak = peak.max(mixer.mix(t).abs());

        if (i + 1) % window == 0 {
            let bar = "#".repeat((peak * 200.0) as usize);
            println!("t={:4.1}s  peak={:.4}  {}", t, peak, bar);
            peak = 0.0;
        }
    }

    println!("notes left in registry: {}", registry.active_notes());
}
