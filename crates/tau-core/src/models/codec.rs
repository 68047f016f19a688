//! Codec identifiers.
//!
//! Variants are declared in table order: a codec's discriminant is its
//! row in the registry tables. Serialized names match the identifiers the
//! host side uses (`"opusWebM"`, `"pcm16WAV"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TauError;

/// Audio encoding scheme. Closed set of 19 members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    #[serde(rename = "defaultCodec")]
    DefaultCodec,
    #[serde(rename = "aacADTS")]
    AacAdts,
    #[serde(rename = "opusOGG")]
    OpusOgg,
    #[serde(rename = "opusCAF")]
    OpusCaf,
    #[serde(rename = "mp3")]
    Mp3,
    #[serde(rename = "vorbisOGG")]
    VorbisOgg,
    #[serde(rename = "pcm16")]
    Pcm16,
    #[serde(rename = "pcm16WAV")]
    Pcm16Wav,
    #[serde(rename = "pcm16AIFF")]
    Pcm16Aiff,
    #[serde(rename = "pcm16CAF")]
    Pcm16Caf,
    #[serde(rename = "flac")]
    Flac,
    #[serde(rename = "aacMP4")]
    AacMp4,
    #[serde(rename = "amrNB")]
    AmrNb,
    #[serde(rename = "amrWB")]
    AmrWb,
    #[serde(rename = "pcm8")]
    Pcm8,
    #[serde(rename = "pcmFloat32")]
    PcmFloat32,
    #[serde(rename = "pcmWebM")]
    PcmWebM,
    #[serde(rename = "opusWebM")]
    OpusWebM,
    #[serde(rename = "vorbisWebM")]
    VorbisWebM,
}

impl Codec {
    /// Every codec, in declaration order.
    pub const ALL: [Codec; 19] = [
        Codec::DefaultCodec,
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

    /// Row of this codec in the registry tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Codec::DefaultCodec => "defaultCodec",
            Codec::AacAdts => "aacADTS",
            Codec::OpusOgg => "opusOGG",
            Codec::OpusCaf => "opusCAF",
            Codec::Mp3 => "mp3",
            Codec::VorbisOgg => "vorbisOGG",
            Codec::Pcm16 => "pcm16",
            Codec::Pcm16Wav => "pcm16WAV",
            Codec::Pcm16Aiff => "pcm16AIFF",
            Codec::Pcm16Caf => "pcm16CAF",
            Codec::Flac => "flac",
            Codec::AacMp4 => "aacMP4",
            Codec::AmrNb => "amrNB",
            Codec::AmrWb => "amrWB",
            Codec::Pcm8 => "pcm8",
            Codec::PcmFloat32 => "pcmFloat32",
            Codec::PcmWebM => "pcmWebM",
            Codec::OpusWebM => "opusWebM",
            Codec::VorbisWebM => "vorbisWebM",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = TauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| TauError::UnknownCodec(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, codec) in Codec::ALL.iter().enumerate() {
            assert_eq!(codec.index(), i, "{} out of place", codec);
        }
    }

    #[test]
    fn names_parse_back() {
        assert_eq!("pcm16WAV".parse::<Codec>().unwrap(), Codec::Pcm16Wav);
        assert_eq!("defaultCodec".parse::<Codec>().unwrap(), Codec::DefaultCodec);
        assert!(matches!(
            "pcm16wav".parse::<Codec>(),
            Err(TauError::UnknownCodec(_))
        ));
    }

    #[test]
    fn serializes_as_identifier() {
        assert_eq!(
            serde_json::to_value(Codec::VorbisWebM).unwrap(),
            serde_json::json!("vorbisWebM")
        );
        let parsed: Codec = serde_json::from_str("\"aacADTS\"").unwrap();
        assert_eq!(parsed, Codec::AacAdts);
    }

    #[test]
    fn serde_and_name_agree() {
        for codec in Codec::ALL {
            assert_eq!(
                serde_json::to_value(codec).unwrap(),
                serde_json::Value::from(codec.name())
            );
        }
    }
}
