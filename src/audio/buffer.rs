use crate::transcribe::PipelineError;
use serde::{Deserialize, Serialize};

/// Accumulated capture data: an ordered, append-only sequence of samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Cached duration in seconds
    #[serde(skip)]
    pub duration_secs: f32,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
            duration_secs: 0.0,
        }
    }

    /// Recalculate and update duration_secs
    pub fn update_duration(&mut self) {
        if self.sample_rate == 0 {
            self.duration_secs = 0.0;
        } else {
            let channels = self.channels.max(1) as f32;
            self.duration_secs = self.samples.len() as f32 / (self.sample_rate as f32 * channels);
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.duration_secs = 0.0;
    }

    pub fn append(&mut self, data: &[i16]) {
        self.samples.extend_from_slice(data);
        self.update_duration();
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Finalize the buffered samples into a single WAV payload.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        if self.samples.is_empty() {
            return Err(PipelineError::InvalidAudio);
        }

        let mut wav = Vec::with_capacity(44 + self.samples.len() * 2);

        // RIFF header
        wav.extend_from_slice(b"RIFF");
        let file_size = (36 + self.samples.len() * 2) as u32;
        wav.extend_from_slice(&file_size.to_le_bytes());
        wav.extend_from_slice(b"WAVE");

        // fmt chunk
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        wav.extend_from_slice(&self.channels.to_le_bytes());
        wav.extend_from_slice(&self.sample_rate.to_le_bytes());
        let byte_rate = self.sample_rate * self.channels as u32 * 2;
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&(self.channels * 2).to_le_bytes()); // block align
        wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

        // data chunk
        wav.extend_from_slice(b"data");
        let data_size = (self.samples.len() * 2) as u32;
        wav.extend_from_slice(&data_size.to_le_bytes());

        for &sample in &self.samples {
            wav.extend_from_slice(&sample.to_le_bytes());
        }

        Ok(wav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_updates_duration() {
        let mut buffer = AudioBuffer::new(16000, 1);
        buffer.append(&[0i16; 16000]);
        assert!((buffer.duration_secs - 1.0).abs() < 0.001);

        buffer.append(&[0i16; 8000]);
        assert!((buffer.duration_secs - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_clear_resets_duration() {
        let mut buffer = AudioBuffer::new(16000, 1);
        buffer.append(&[0i16; 16000]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration_secs, 0.0);
    }

    #[test]
    fn test_wav_header() {
        let mut buffer = AudioBuffer::new(16000, 1);
        buffer.append(&[0i16; 100]);

        let wav = buffer.to_wav_bytes().unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 200);

        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size, 200);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let buffer = AudioBuffer::new(16000, 1);
        assert!(matches!(
            buffer.to_wav_bytes(),
            Err(PipelineError::InvalidAudio)
        ));
    }
}
