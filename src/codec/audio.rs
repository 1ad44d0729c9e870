//! Audio conversion: container decode to PCM, PCM encode to WAV or MP3.
//!
//! ## Why decode to planar f32?
//!
//! Every supported container (MP3, FLAC, OGG, WAV, M4A, …) decodes through
//! symphonia into the same intermediate: one `Vec<f32>` per channel at the
//! source's native sample rate. The two encoders then quantize from that one
//! representation, so adding an input format never touches the output side.
//!
//! ## Two quantizers, on purpose
//!
//! The WAV writer uses an asymmetric scale (×32768 for negative samples,
//! ×32767 otherwise — see [`crate::codec::wav`]); the MP3 path uses a
//! single-sided saturating ×32767. They are separate code paths with
//! separate tests; do not unify them.

use crate::codec::wav;
use crate::error::ConvertError;
use crate::policy::MP3_BLOCK_FRAMES;
use mp3lame_encoder::{Bitrate, Builder, DualPcm, FlushNoGap, MonoPcm, Quality};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, trace, warn};

/// Decoded audio: one float sample sequence per channel.
///
/// Invariant: all channel vectors have the same length (the frame count).
/// The decoder maintains this by construction; tests may build values
/// directly.
#[derive(Debug, Clone)]
pub struct PcmAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl PcmAudio {
    /// Number of time frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Map a declared audio MIME to a container-extension hint for the probe.
///
/// The hint is advisory; symphonia still sniffs the actual bytes, so a wrong
/// or missing hint costs a little probing time but never misdecodes.
fn extension_hint(declared_mime: &str) -> Option<&'static str> {
    match declared_mime {
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        "audio/ogg" => Some("ogg"),
        "audio/aac" => Some("aac"),
        "audio/mp4" | "audio/x-m4a" => Some("m4a"),
        _ => None,
    }
}

/// Decode an arbitrary audio container into planar f32 PCM.
///
/// # Errors
/// [`ConvertError::Decode`] when the bytes are not a recognisable audio
/// container, contain no decodable track, or decode to zero frames.
pub fn decode(bytes: &[u8], declared_mime: &str) -> Result<PcmAudio, ConvertError> {
    let stream = MediaSourceStream::new(
        Box::new(Cursor::new(bytes.to_vec())),
        Default::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint(declared_mime) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ConvertError::decode(format!("unrecognised audio container: {e}")))?;

    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ConvertError::decode("no decodable audio track in container"))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ConvertError::decode(format!("unsupported audio codec: {e}")))?;

    let mut channels: Vec<Vec<f32>> = Vec::new();
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            // End of stream.
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(ConvertError::decode(format!("audio demux failed: {e}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A corrupt packet is recoverable; skip it and keep going.
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("skipping corrupt audio packet: {e}");
                continue;
            }
            Err(e) => {
                return Err(ConvertError::decode(format!("audio decode failed: {e}")));
            }
        };

        let spec = *decoded.spec();
        if sample_rate == 0 {
            sample_rate = spec.rate;
        }

        let channel_count = spec.channels.count();
        if channels.is_empty() {
            channels.resize(channel_count, Vec::new());
        } else if channels.len() != channel_count {
            return Err(ConvertError::decode(format!(
                "channel count changed mid-stream: {} → {}",
                channels.len(),
                channel_count
            )));
        }

        let buf = sample_buf
            .get_or_insert_with(|| SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        buf.copy_interleaved_ref(decoded);

        // De-interleave this packet's samples into the per-channel vectors.
        for (i, sample) in buf.samples().iter().enumerate() {
            channels[i % channel_count].push(*sample);
        }
    }

    if channels.is_empty() || channels[0].is_empty() {
        return Err(ConvertError::decode("audio stream decoded to zero frames"));
    }
    if sample_rate == 0 {
        return Err(ConvertError::decode("audio stream reports no sample rate"));
    }

    let pcm = PcmAudio {
        channels,
        sample_rate,
    };
    debug!(
        "decoded audio: {} ch, {} Hz, {} frames",
        pcm.channels.len(),
        pcm.sample_rate,
        pcm.frame_count()
    );
    Ok(pcm)
}

/// Re-encode decoded PCM as a WAV byte buffer.
pub fn to_wav(pcm: &PcmAudio) -> Vec<u8> {
    wav::write_wav(pcm)
}

/// Saturating single-sided quantizer for the MP3 path.
fn quantize_mp3(sample: f32) -> i16 {
    (sample * 32767.0).round() as i16
}

/// Block-encode decoded PCM as MP3.
///
/// Samples are quantized to i16, partitioned into [`MP3_BLOCK_FRAMES`]-frame
/// blocks and fed to the LAME encoder one block at a time — a mono call per
/// block for single-channel input, a dual call for stereo. Every non-empty
/// chunk the encoder emits is appended in block order, and one final flush
/// appends the trailing bytes.
///
/// # Errors
/// [`ConvertError::Encode`] when the encoder rejects the stream parameters
/// or reports an unrecoverable error on a block.
pub fn to_mp3(pcm: &PcmAudio) -> Result<Vec<u8>, ConvertError> {
    let frames = pcm.frame_count();
    let stereo = pcm.channels.len() >= 2;

    let mut builder = Builder::new()
        .ok_or_else(|| ConvertError::encode("could not allocate the LAME encoder"))?;
    builder
        .set_num_channels(if stereo { 2 } else { 1 })
        .map_err(|e| ConvertError::encode(format!("encoder channel setup: {e:?}")))?;
    builder
        .set_sample_rate(pcm.sample_rate)
        .map_err(|e| ConvertError::encode(format!("encoder sample rate setup: {e:?}")))?;
    builder
        .set_brate(Bitrate::Kbps192)
        .map_err(|e| ConvertError::encode(format!("encoder bitrate setup: {e:?}")))?;
    builder
        .set_quality(Quality::Good)
        .map_err(|e| ConvertError::encode(format!("encoder quality setup: {e:?}")))?;
    let mut encoder = builder
        .build()
        .map_err(|e| ConvertError::encode(format!("encoder init failed: {e:?}")))?;

    // Channels beyond the second carry no mapping in MP3 and are dropped.
    let left: Vec<i16> = pcm.channels[0].iter().copied().map(quantize_mp3).collect();
    let right: Option<Vec<i16>> = stereo
        .then(|| pcm.channels[1].iter().copied().map(quantize_mp3).collect());

    let mut out = Vec::new();
    let mut offset = 0;
    while offset < frames {
        let end = (offset + MP3_BLOCK_FRAMES).min(frames);
        let written = match &right {
            Some(right) => encoder.encode_to_vec(
                DualPcm {
                    left: &left[offset..end],
                    right: &right[offset..end],
                },
                &mut out,
            ),
            None => encoder.encode_to_vec(MonoPcm(&left[offset..end]), &mut out),
        }
        .map_err(|e| ConvertError::encode(format!("block encode failed: {e:?}")))?;
        trace!("encoded frames {offset}..{end} → {written} bytes");
        offset = end;
    }

    encoder
        .flush_to_vec::<FlushNoGap>(&mut out)
        .map_err(|e| ConvertError::encode(format!("encoder flush failed: {e:?}")))?;

    debug!("encoded {} frames → {} MP3 bytes", frames, out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A short sine tone, the standard synthetic decode fixture.
    fn sine_pcm(seconds: f32, channels: usize, sample_rate: u32) -> PcmAudio {
        let frames = (seconds * sample_rate as f32) as usize;
        let channel: Vec<f32> = (0..frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 0.8
            })
            .collect();
        PcmAudio {
            channels: vec![channel; channels],
            sample_rate,
        }
    }

    #[test]
    fn quantize_mp3_is_single_sided() {
        assert_eq!(quantize_mp3(1.0), 32767);
        // Unlike the WAV quantizer, −1.0 scales by 32767, not 32768.
        assert_eq!(quantize_mp3(-1.0), -32767);
        // Saturation instead of wraparound for out-of-range input.
        assert_eq!(quantize_mp3(4.0), 32767);
        assert_eq!(quantize_mp3(-4.0), -32768);
    }

    #[test]
    fn decode_round_trips_our_own_wav() {
        let original = sine_pcm(0.25, 1, 44_100);
        let bytes = to_wav(&original);

        let decoded = decode(&bytes, "audio/wav").expect("wav must decode");
        assert_eq!(decoded.channels.len(), 1);
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.frame_count(), original.frame_count());

        // 16-bit quantization error is at most 1/32767 ≈ 3.1e-5 per sample.
        for (a, b) in original.channels[0].iter().zip(&decoded.channels[0]) {
            assert!((a - b).abs() < 1e-3, "sample drifted: {a} vs {b}");
        }
    }

    #[test]
    fn decode_stereo_keeps_channels_equal_length() {
        let original = sine_pcm(0.1, 2, 22_050);
        let bytes = to_wav(&original);
        let decoded = decode(&bytes, "audio/wav").expect("wav must decode");
        assert_eq!(decoded.channels.len(), 2);
        assert_eq!(decoded.channels[0].len(), decoded.channels[1].len());
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(b"definitely not audio", "audio/mpeg").unwrap_err();
        assert!(matches!(err, ConvertError::Decode { .. }));
    }

    #[test]
    fn decode_rejects_empty_buffer() {
        let err = decode(&[], "audio/wav").unwrap_err();
        assert!(matches!(err, ConvertError::Decode { .. }));
    }

    #[test]
    fn mp3_encode_produces_frames_for_mono() {
        let pcm = sine_pcm(0.5, 1, 44_100);
        let mp3 = to_mp3(&pcm).expect("mono encode must succeed");
        assert!(!mp3.is_empty());
        // MP3 frame sync: 11 set bits at the start of the first frame header.
        assert_eq!(mp3[0], 0xFF);
        assert_eq!(mp3[1] & 0xE0, 0xE0);
    }

    #[test]
    fn mp3_encode_produces_frames_for_stereo() {
        let pcm = sine_pcm(0.5, 2, 44_100);
        let mp3 = to_mp3(&pcm).expect("stereo encode must succeed");
        assert!(!mp3.is_empty());
    }

    #[test]
    fn mp3_encode_handles_input_shorter_than_one_block() {
        let pcm = PcmAudio {
            channels: vec![vec![0.1; 100]],
            sample_rate: 44_100,
        };
        // 100 frames < one 1152-frame block: the flush must still emit data.
        let mp3 = to_mp3(&pcm).expect("short encode must succeed");
        assert!(!mp3.is_empty());
    }

    #[test]
    fn extension_hints() {
        assert_eq!(extension_hint("audio/mpeg"), Some("mp3"));
        assert_eq!(extension_hint("audio/wav"), Some("wav"));
        assert_eq!(extension_hint("audio/weird"), None);
    }
}
