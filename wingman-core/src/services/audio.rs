//! Speech audio decoding
//!
//! Generated speech arrives as raw little-endian signed 16-bit PCM at
//! 24 kHz mono. Clips are kept as normalized samples and written out as WAV.

use crate::domain::result::{Error, Result};

pub const SPEECH_SAMPLE_RATE: u32 = 24_000;
pub const SPEECH_CHANNELS: u16 = 1;

/// Split interleaved PCM16 bytes into per-channel samples in [-1.0, 1.0)
///
/// A trailing odd byte is ignored, as is any incomplete last frame.
pub fn decode_pcm16(bytes: &[u8], channels: u16) -> Vec<Vec<f32>> {
    let channels = usize::from(channels.max(1));
    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let frames = samples.len() / channels;

    (0..channels)
        .map(|channel| {
            (0..frames)
                .map(|frame| f32::from(samples[frame * channels + channel]) / 32768.0)
                .collect()
        })
        .collect()
}

/// A decoded speech clip
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechClip {
    pub sample_rate: u32,
    /// One sample buffer per channel, all the same length
    pub channels: Vec<Vec<f32>>,
}

impl SpeechClip {
    /// Decode a clip from raw PCM16 bytes
    pub fn from_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::validation("Audio data is empty"));
        }
        Ok(Self {
            sample_rate,
            channels: decode_pcm16(bytes, channels),
        })
    }

    /// Decode a clip in the speech model's output format
    pub fn from_speech_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_pcm16(bytes, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS)
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// Encode as a 16-bit PCM RIFF/WAVE file
    pub fn to_wav(&self) -> Vec<u8> {
        let channel_count = self.channels.len().max(1) as u16;
        let frames = self.frame_count();
        let block_align = channel_count * 2;
        let byte_rate = self.sample_rate * u32::from(block_align);
        let data_len = (frames * usize::from(block_align)) as u32;

        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&channel_count.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for frame in 0..frames {
            for channel in &self.channels {
                let sample = (channel[frame] * 32768.0).round().clamp(-32768.0, 32767.0) as i16;
                out.extend_from_slice(&sample.to_le_bytes());
            }
        }
        out
    }
}
