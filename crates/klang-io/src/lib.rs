//! Audio output layer for the klang synthesizer.
//!
//! This crate provides:
//!
//! - **Real-time output streaming**: [`OutputStream`] invokes a per-sample
//!   callback on the audio thread at a fixed sample rate
//! - **Device enumeration**: [`list_output_devices`] and
//!   [`default_output_device`]
//! - **A monotonic audio clock**: [`SampleClock`], advanced by the stream,
//!   readable from any thread for note timestamps
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use klang_io::{OutputStream, StreamConfig};
//!
//! let mut stream = OutputStream::new(StreamConfig::default())?;
//! let clock = stream.clock();
//!
//! // A 440 Hz test tone on every channel.
//! stream.start(move |_channel, time| {
//!     (2.0 * std::f64::consts::PI * 440.0 * time).sin() as f32 * 0.2
//! })?;
//!
//! // The stream plays until `stop()` or drop; this thread stays free.
//! println!("audio clock at {:.3}s", clock.now());
//! ```

mod clock;
mod stream;

pub use clock::SampleClock;
pub use stream::{
    AudioDevice, OutputStream, StreamConfig, default_output_device, list_output_devices,
};

/// Error types for audio output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
