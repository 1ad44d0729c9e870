//! Hand-built RIFF/WAVE container writer.
//!
//! This is the engine's single bit-exact external contract: the emitted
//! header and sample layout must be reproduced byte-for-byte so that any
//! WAV-reading tool accepts the output. Everything is little-endian.
//!
//! ```text
//! offset  size  field
//!      0     4  "RIFF"
//!      4     4  total length − 8            (u32)
//!      8     4  "WAVE"
//!     12     4  "fmt "
//!     16     4  format chunk size = 16      (u32, uncompressed PCM)
//!     20     2  audio format = 1            (u16, linear PCM)
//!     22     2  channel count               (u16)
//!     24     4  sample rate                 (u32)
//!     28     4  byte rate = rate × ch × 2   (u32)
//!     32     2  block align = ch × 2        (u16)
//!     34     2  bits per sample = 16        (u16)
//!     36     4  "data"
//!     40     4  total length − 44           (u32)
//!     44     …  interleaved i16 samples, channel-major within each frame
//! ```
//!
//! where `total length = frames × channels × 2 + 44`.

use crate::codec::audio::PcmAudio;

/// Byte length of the RIFF + fmt + data headers preceding the sample data.
pub const WAV_HEADER_LEN: usize = 44;

/// Quantize one float sample to signed 16-bit.
///
/// The scale is asymmetric on purpose: the i16 range is [−32768, 32767], so
/// negative samples scale by 32768 and non-negative by 32767. This maps both
/// extremes of the clamped [−1, 1] input range onto the exact integer
/// extremes without overflow.
fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0).round() as i16
    } else {
        (s * 32767.0).round() as i16
    }
}

/// Serialize decoded PCM as a complete WAV file.
///
/// Infallible by construction: the container has no failure modes once the
/// PCM invariant (equal channel lengths) holds, which [`PcmAudio`] maintains.
pub fn write_wav(pcm: &PcmAudio) -> Vec<u8> {
    let frames = pcm.frame_count();
    let channels = pcm.channels.len();
    let total = frames * channels * 2 + WAV_HEADER_LEN;

    let mut out = Vec::with_capacity(total);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((total - 8) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&(channels as u16).to_le_bytes());
    out.extend_from_slice(&pcm.sample_rate.to_le_bytes());
    out.extend_from_slice(&(pcm.sample_rate * channels as u32 * 2).to_le_bytes());
    out.extend_from_slice(&((channels as u16) * 2).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&((total - WAV_HEADER_LEN) as u32).to_le_bytes());

    for frame in 0..frames {
        for channel in &pcm.channels {
            out.extend_from_slice(&quantize(channel[frame]).to_le_bytes());
        }
    }

    debug_assert_eq!(out.len(), total);
    out
}
