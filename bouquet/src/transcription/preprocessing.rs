use std::io::Cursor;

use rubato::{FftFixedIn, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{BouquetError, Result};

const TARGET_SAMPLE_RATE: u32 = 16000;
const RESAMPLE_CHUNK: usize = 1024;

/// Decoding and resampling to the 16 kHz mono f32 PCM Whisper expects
pub struct AudioPreprocessor;

impl AudioPreprocessor {
    /// Decode an mp3/wav/m4a payload into interleaved f32 samples.
    ///
    /// Returns `(samples, sample_rate, channels)`.
    pub fn decode(bytes: Vec<u8>, extension: Option<&str>) -> Result<(Vec<f32>, u32, usize)> {
        if bytes.is_empty() {
            return Err(BouquetError::Transcription("Empty audio data".to_string()));
        }

        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| BouquetError::Transcription(format!("Unsupported audio: {e}")))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| BouquetError::Transcription("No audio tracks found".to_string()))?;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| BouquetError::Transcription(format!("Unsupported codec: {e}")))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                Err(e) => {
                    return Err(BouquetError::Transcription(format!(
                        "Failed to read audio packet: {e}"
                    )))
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count();

                    let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buffer.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buffer.samples());
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    debug!("Skipping undecodable audio packet: {}", e);
                }
                Err(e) => {
                    return Err(BouquetError::Transcription(format!(
                        "Failed to decode audio: {e}"
                    )))
                }
            }
        }

        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(BouquetError::Transcription(
                "No audio samples decoded".to_string(),
            ));
        }

        debug!(samples = samples.len(), sample_rate, channels, "Decoded audio");

        Ok((samples, sample_rate, channels))
    }

    /// Average interleaved frames down to one channel
    pub fn to_mono(samples: Vec<f32>, channels: usize) -> Vec<f32> {
        if channels <= 1 {
            return samples;
        }

        samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }

    pub fn resample_to_16khz_mono(
        samples: Vec<f32>,
        sample_rate: u32,
        channels: usize,
    ) -> Result<Vec<f32>> {
        if samples.is_empty() {
            return Err(BouquetError::Transcription(
                "Empty samples for resampling".to_string(),
            ));
        }

        let mono = Self::to_mono(samples, channels);
        if sample_rate == TARGET_SAMPLE_RATE {
            return Ok(mono);
        }

        let chunk_size = RESAMPLE_CHUNK.min(mono.len());
        let mut resampler = FftFixedIn::<f32>::new(
            sample_rate as usize,
            TARGET_SAMPLE_RATE as usize,
            chunk_size,
            2,
            1,
        )
        .map_err(|e| BouquetError::Transcription(format!("Failed to create resampler: {e}")))?;

        let expected_len =
            (mono.len() as u64 * TARGET_SAMPLE_RATE as u64 / sample_rate as u64) as usize;
        let mut output = Vec::with_capacity(expected_len);

        for chunk in mono.chunks(chunk_size) {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            let input = vec![padded];
            let resampled = resampler
                .process(&input, None)
                .map_err(|e| BouquetError::Transcription(format!("Resampling failed: {e}")))?;
            output.extend_from_slice(&resampled[0]);
        }

        // Zero padding on the final chunk produces trailing silence
        output.truncate(expected_len);

        Ok(output)
    }
}
