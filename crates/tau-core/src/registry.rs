//! Codec registry: three positionally aligned tables.
//!
//! Row `i` of `TAB_CODEC`, `MIME_TYPES` and `TAB_FORMAT` describe the same
//! codec. All three are sized by `CODEC_COUNT`, so a row added to one
//! table without the others does not compile.
//!
//! Row 0 is the `defaultCodec` row and holds `opusWebM`: "default" is an
//! alias for Opus in WebM, and the value appears again at row 17.

use std::path::Path;

use lofty::file::FileType;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TauError};
use crate::models::codec::Codec;

pub const CODEC_COUNT: usize = 19;

pub const TAB_CODEC: [Codec; CODEC_COUNT] = [
    Codec::OpusWebM, // defaultCodec
    Codec::AacAdts,
    Codec::OpusOgg,
    Codec::OpusCaf,
    Codec::Mp3,
    Codec::VorbisOgg,
    Codec::Pcm16,
    Codec::Pcm16Wav,
    Codec::Pcm16Aiff,
    Codec::Pcm16Caf,
    Codec::Flac,
    Codec::AacMp4,
    Codec::AmrNb,
    Codec::AmrWb,
    Codec::Pcm8,
    Codec::PcmFloat32,
    Codec::PcmWebM,
    Codec::OpusWebM,
    Codec::VorbisWebM,
];

pub const MIME_TYPES: [&str; CODEC_COUNT] = [
    "audio/webm;codecs=opus", // defaultCodec
    "audio/aac",
    "audio/opus;codecs=opus",
    "audio/x-caf",
    "audio/mp3",
    "audio/ogg;codecs=vorbis",
    "audio/pcm",
    "audio/wav;codecs=1",
    "audio/aiff",
    "audio/x-caf",
    "audio/x-flac",
    "audio/mp4",
    "audio/AMR",
    "audio/AMR-WB",
    "audio/pcm",
    "audio/pcm",
    "audio/webm;codecs=pcm",
    "audio/webm;codecs=opus",
    "audio/webm;codecs=vorbis",
];

/// Container tags. Empty for raw PCM without a container.
pub const TAB_FORMAT: [&str; CODEC_COUNT] = [
    "opus", // defaultCodec
    "aac",
    "opus",
    "caf",
    "mp3",
    "vorbis",
    "",
    "wav",
    "aiff",
    "caf",
    "flac",
    "mp4",
    "AMR",
    "AMR-WB",
    "",
    "",
    "pcm",
    "opus",
    "webm",
];

/// A table row, addressed by position or by codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecRef {
    Index(usize),
    Codec(Codec),
}

impl CodecRef {
    fn row(self) -> Result<usize> {
        let i = match self {
            CodecRef::Index(i) => i,
            CodecRef::Codec(c) => c.index(),
        };
        if i >= CODEC_COUNT {
            return Err(TauError::OutOfRange {
                index: i as i64,
                len: CODEC_COUNT,
            });
        }
        Ok(i)
    }
}

impl From<usize> for CodecRef {
    fn from(i: usize) -> Self {
        CodecRef::Index(i)
    }
}

impl From<Codec> for CodecRef {
    fn from(c: Codec) -> Self {
        CodecRef::Codec(c)
    }
}

/// One joined row of the three tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecEntry {
    pub index: usize,
    pub codec: Codec,
    pub mime_type: String,
    pub format: String,
}

/// Validate a signed index coming from a host.
pub fn checked_index(index: i64) -> Result<usize> {
    match usize::try_from(index) {
        Ok(i) if i < CODEC_COUNT => Ok(i),
        _ => Err(TauError::OutOfRange {
            index,
            len: CODEC_COUNT,
        }),
    }
}

pub fn codec_at(index: usize) -> Result<Codec> {
    let i = CodecRef::Index(index).row()?;
    Ok(TAB_CODEC[i])
}

pub fn mime_for(codec: impl Into<CodecRef>) -> Result<&'static str> {
    let i = codec.into().row()?;
    Ok(MIME_TYPES[i])
}

/// Container tag for a row. An empty string is a valid result.
pub fn format_for(codec: impl Into<CodecRef>) -> Result<&'static str> {
    let i = codec.into().row()?;
    Ok(TAB_FORMAT[i])
}

pub fn is_containerless(codec: impl Into<CodecRef>) -> Result<bool> {
    format_for(codec).map(str::is_empty)
}

pub fn entries() -> Vec<CodecEntry> {
    (0..CODEC_COUNT)
        .map(|i| CodecEntry {
            index: i,
            codec: TAB_CODEC[i],
            mime_type: MIME_TYPES[i].to_string(),
            format: TAB_FORMAT[i].to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Host capability checks
// ---------------------------------------------------------------------------

/// What the host's recorder or player can handle, asked by MIME type.
pub trait MimeSupport {
    fn is_type_supported(&self, mime_type: &str) -> bool;
}

/// A fixed list of MIME types the host reported as supported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeList(pub Vec<String>);

impl MimeSupport for MimeList {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.0.iter().any(|m| m == mime_type)
    }
}

/// Whether `recorder` can encode `codec`, judged by the codec's MIME type.
pub fn is_encoder_supported(codec: impl Into<CodecRef>, recorder: &impl MimeSupport) -> Result<bool> {
    let mime = mime_for(codec)?;
    let supported = recorder.is_type_supported(mime);
    log::debug!("tau: encoder {} supported: {}", mime, supported);
    Ok(supported)
}

/// Whether `player` can decode `codec`, judged by the codec's MIME type.
pub fn is_decoder_supported(codec: impl Into<CodecRef>, player: &impl MimeSupport) -> Result<bool> {
    let mime = mime_for(codec)?;
    let supported = player.is_type_supported(mime);
    log::debug!("tau: decoder {} supported: {}", mime, supported);
    Ok(supported)
}

// ---------------------------------------------------------------------------
// Inference from recorded files
// ---------------------------------------------------------------------------

pub fn codec_for_file_type(file_type: FileType) -> Option<Codec> {
    match file_type {
        FileType::Aac => Some(Codec::AacAdts),
        FileType::Aiff => Some(Codec::Pcm16Aiff),
        FileType::Flac => Some(Codec::Flac),
        FileType::Mpeg => Some(Codec::Mp3),
        FileType::Mp4 => Some(Codec::AacMp4),
        FileType::Opus => Some(Codec::OpusOgg),
        FileType::Vorbis => Some(Codec::VorbisOgg),
        FileType::Wav => Some(Codec::Pcm16Wav),
        _ => None,
    }
}

/// Guess the codec of a recording from its file extension.
///
/// WebM and CAF are not lofty file types; they map to Opus/WebM and
/// 16-bit PCM/CAF, the codecs recorders write into those containers.
pub fn codec_for_path(path: impl AsRef<Path>) -> Option<Codec> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    match ext.as_str() {
        "webm" => Some(Codec::OpusWebM),
        "caf" => Some(Codec::Pcm16Caf),
        other => FileType::from_ext(other).and_then(codec_for_file_type),
    }
}
