use crate::audio::AudioBuffer;
use crate::transcribe::PipelineError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Exclusively owned handle to an open device stream. Dropping it releases
/// the device.
pub trait CaptureStream {}

/// A freshly opened capture: the live stream and the buffer it appends into.
pub struct OpenCapture {
    pub buffer: Arc<Mutex<AudioBuffer>>,
    pub stream: Box<dyn CaptureStream>,
}

/// Device acquisition seam. Opening the backend is the permission boundary:
/// a denied or missing device surfaces as `PermissionDenied`.
pub trait CaptureBackend: Send + Sync {
    fn open(&self) -> Result<OpenCapture, PipelineError>;
}

/// Microphone backend on top of cpal.
pub struct MicBackend {
    selected_input_device: Option<String>,
}

struct MicStream {
    _stream: cpal::Stream,
}

impl CaptureStream for MicStream {}

impl MicBackend {
    pub fn new() -> Self {
        Self {
            selected_input_device: None,
        }
    }

    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            selected_input_device: Some(name.into()),
        }
    }

    pub fn list_input_devices() -> Result<Vec<String>, PipelineError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| {
                warn!("Failed to enumerate input devices: {}", e);
                PipelineError::PermissionDenied
            })?
            .map(|device| Self::device_display_name(&device))
            .collect::<Vec<_>>();
        Ok(devices)
    }

    fn pick_input_device(host: &cpal::Host, preferred_name: Option<&str>) -> Option<cpal::Device> {
        if let Some(name) = preferred_name {
            if let Ok(mut devices) = host.input_devices() {
                if let Some(device) = devices.find(|d| Self::device_display_name(d) == name) {
                    return Some(device);
                }
            }
            warn!(
                "Preferred input device '{}' not found, falling back to default",
                name
            );
        }
        host.default_input_device()
    }

    fn device_display_name(device: &cpal::Device) -> String {
        device
            .name()
            .or_else(|_| device.description().map(|d| d.name().to_string()))
            .unwrap_or_else(|_| "Unknown input".to_string())
    }
}

impl Default for MicBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for MicBackend {
    fn open(&self) -> Result<OpenCapture, PipelineError> {
        let host = cpal::default_host();
        let device = Self::pick_input_device(&host, self.selected_input_device.as_deref())
            .ok_or(PipelineError::PermissionDenied)?;

        info!("Input device: {}", Self::device_display_name(&device));

        let config = device.default_input_config().map_err(|e| {
            warn!("Input device refused config query: {}", e);
            PipelineError::PermissionDenied
        })?;

        let buffer = Arc::new(Mutex::new(AudioBuffer::new(
            config.sample_rate(),
            config.channels(),
        )));

        let buffer_clone = buffer.clone();
        let err_fn = |err| error!("an error occurred on stream: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _: &_| write_input_data(data, &buffer_clone),
                err_fn,
                None,
            ),
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _: &_| write_input_data_f32(data, &buffer_clone),
                err_fn,
                None,
            ),
            _ => return Err(PipelineError::InvalidAudio),
        }
        .map_err(|e| {
            warn!("Failed to open input stream: {}", e);
            PipelineError::PermissionDenied
        })?;

        stream.play().map_err(|e| {
            warn!("Failed to start input stream: {}", e);
            PipelineError::PermissionDenied
        })?;

        Ok(OpenCapture {
            buffer,
            stream: Box::new(MicStream { _stream: stream }),
        })
    }
}

fn write_input_data(input: &[i16], buffer: &Arc<Mutex<AudioBuffer>>) {
    if let Ok(mut guard) = buffer.lock() {
        guard.append(input);
    }
}

fn write_input_data_f32(input: &[f32], buffer: &Arc<Mutex<AudioBuffer>>) {
    let samples: Vec<i16> = input
        .iter()
        .map(|&x| (x.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    if let Ok(mut guard) = buffer.lock() {
        guard.append(&samples);
    }
}
