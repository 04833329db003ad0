//! Criterion benchmarks for klang-synth components
//!
//! Run with: cargo bench -p klang-synth
//!
//! The mix benchmarks matter most: `Mixer::mix` runs once per output sample
//! on the audio thread and must finish in well under 1/44100 s.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use klang_synth::{Mixer, NoteRegistry, Vibrato, Waveform, channel, oscillate};

const SAMPLE_RATE: f64 = 44_100.0;

// ============================================================================
// Oscillator benchmarks
// ============================================================================

fn bench_oscillator_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillate");

    let waveforms = [
        ("sine", Waveform::Sine),
        ("square", Waveform::Square),
        ("triangle", Waveform::Triangle),
        ("analog_saw", Waveform::analog_saw()),
        ("digital_saw", Waveform::DigitalSaw),
        ("noise", Waveform::Noise),
    ];

    for (name, waveform) in waveforms {
        group.bench_function(name, |b| {
            let mut i = 0_u32;
            b.iter(|| {
                i = i.wrapping_add(1);
                oscillate(
                    black_box(f64::from(i) / SAMPLE_RATE),
                    black_box(440.0),
                    waveform,
                    Vibrato::new(5.0, 0.001),
                )
            });
        });
    }

    group.finish();
}

// ============================================================================
// Mixer benchmarks
// ============================================================================

fn bench_mix_by_voice_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("mix");

    for voices in [1_i32, 4, 8, 16] {
        let registry = Arc::new(NoteRegistry::new());
        let mixer = Mixer::with_standard_bank(Arc::clone(&registry));
        for id in 0..voices {
            let ch = if id % 2 == 0 {
                channel::BELL
            } else {
                channel::HARMONICA
            };
            registry.note_on(id, ch, 0.0);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(voices),
            &voices,
            |b, _| {
                let mut i = 0_u32;
                b.iter(|| {
                    i = i.wrapping_add(1);
                    mixer.mix(black_box(f64::from(i) / SAMPLE_RATE))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_oscillator_waveforms, bench_mix_by_voice_count);
criterion_main!(benches);
