//! Real-time audio output via cpal.

use crate::clock::SampleClock;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Channel count of the device's default output configuration.
    pub channels: u16,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Output stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Buffer size in frames.
    pub buffer_size: u32,
    /// Output device name or index (uses default if `None`).
    pub output_device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            buffer_size: 512,
            output_device: None,
        }
    }
}

/// List all available audio output devices.
pub fn list_output_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                let (channels, sample_rate) = device
                    .default_output_config()
                    .map(|c| (c.channels(), c.sample_rate()))
                    .unwrap_or((2, 44_100));

                devices.push(AudioDevice {
                    name,
                    channels,
                    default_sample_rate: sample_rate,
                });
            }
        }
    }

    Ok(devices)
}

/// Get the default output device info, if any.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();

    Ok(host.default_output_device().and_then(|d| {
        device_name(&d).ok().map(|name| {
            let (channels, sample_rate) = d
                .default_output_config()
                .map(|c| (c.channels(), c.sample_rate()))
                .unwrap_or((2, 44_100));
            AudioDevice {
                name,
                channels,
                default_sample_rate: sample_rate,
            }
        })
    }))
}

/// Real-time audio output stream driving a per-sample generator callback.
///
/// The generator has the shape `(channel, time) -> sample`: it is invoked
/// once per channel per frame on the audio thread, at the configured sample
/// rate, with `time` taken from the stream's [`SampleClock`]. The clock
/// advances once per frame, so every channel of a frame sees the same
/// timestamp.
pub struct OutputStream {
    #[allow(dead_code)]
    host: Host,
    device: Device,
    config: StreamConfig,
    clock: SampleClock,
    running: Arc<AtomicBool>,
    _stream: Option<Stream>,
}

impl OutputStream {
    /// Resolve the configured output device and prepare a stream.
    pub fn new(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();

        let device = match &config.output_device {
            Some(name) => find_output_device(&host, name)?,
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };

        let clock = SampleClock::new(config.sample_rate);

        Ok(Self {
            host,
            device,
            config,
            clock,
            running: Arc::new(AtomicBool::new(false)),
            _stream: None,
        })
    }

    /// The configured sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// The resolved device's name.
    pub fn device_name(&self) -> String {
        device_name(&self.device).unwrap_or_else(|_| "<unknown>".into())
    }

    /// The output channel count the stream will use.
    pub fn channels(&self) -> u16 {
        self.device
            .default_output_config()
            .map(|c| c.channels())
            .unwrap_or(2)
    }

    /// A handle to the stream's audio clock (clones share the counter).
    pub fn clock(&self) -> SampleClock {
        self.clock.clone()
    }

    /// Start playback with the given per-sample generator.
    ///
    /// Returns immediately; the stream keeps playing on the audio thread
    /// until [`stop`](Self::stop) is called or the stream is dropped, leaving
    /// the calling thread free (for input polling, status display, ...).
    pub fn start<F>(&mut self, mut sample_fn: F) -> Result<()>
    where
        F: FnMut(u16, f64) -> f32 + Send + 'static,
    {
        let channels = usize::from(self.channels());

        let stream_config = cpal::StreamConfig {
            channels: self.channels(),
            sample_rate: self.config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(self.config.buffer_size),
        };

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let clock = self.clock.clone();

        let stream = self
            .device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    for frame in data.chunks_mut(channels) {
                        let time = clock.advance();
                        for (ch, sample) in frame.iter_mut().enumerate() {
                            *sample = sample_fn(ch as u16, time);
                        }
                    }
                },
                |err| tracing::error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            device = %self.device_name(),
            channels,
            sample_rate = self.config.sample_rate,
            buffer_size = self.config.buffer_size,
            "output stream started"
        );

        self._stream = Some(stream);
        Ok(())
    }

    /// Stop the stream. The audio callback outputs silence from the next
    /// buffer on.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the stream is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Find an output device by exact name, partial name, or index.
///
/// The `name_or_index` can be:
/// - A numeric index (e.g., "0", "1")
/// - An exact device name
/// - A partial device name (case-insensitive fuzzy match)
fn find_output_device(host: &Host, name_or_index: &str) -> Result<Device> {
    let devices: Vec<_> = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    // Try parsing as index first
    if let Ok(index) = name_or_index.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "output device index {} (only {} devices available)",
                index,
                devices.len()
            ))
        });
    }

    // Try exact match
    for device in &devices {
        if device_name(device).is_ok_and(|n| n == name_or_index) {
            return Ok(device.clone());
        }
    }

    // Try case-insensitive partial match
    let search_lower = name_or_index.to_lowercase();
    let mut matches: Vec<_> = devices
        .iter()
        .filter_map(|d| {
            device_name(d).ok().and_then(|name| {
                if name.to_lowercase().contains(&search_lower) {
                    Some((d.clone(), name))
                } else {
                    None
                }
            })
        })
        .collect();

    match matches.len() {
        0 => Err(Error::DeviceNotFound(format!(
            "no output device matching '{}'",
            name_or_index
        ))),
        1 => Ok(matches.remove(0).0),
        _ => {
            let names: Vec<_> = matches.iter().map(|(_, n)| n.as_str()).collect();
            tracing::warn!(
                "'{}' matches multiple output devices: {:?}; using {}",
                name_or_index,
                names,
                names[0]
            );
            Ok(matches.remove(0).0)
        }
    }
}
