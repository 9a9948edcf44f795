use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::format::parse_tag_time;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    /// Anything else ffprobe reports, kept verbatim.
    Other(String),
}

impl CodecType {
    pub fn as_str(&self) -> &str {
        match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Data => "data",
            CodecType::Attachment => "attachment",
            CodecType::Other(s) => s,
        }
    }
}

impl From<String> for CodecType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            "data" => CodecType::Data,
            "attachment" => CodecType::Attachment,
            _ => CodecType::Other(s),
        }
    }
}

impl From<CodecType> for String {
    fn from(t: CodecType) -> Self {
        match t {
            CodecType::Other(s) => s,
            t => t.as_str().to_owned(),
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One elementary stream as reported by ffprobe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_type: Option<CodecType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_time_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_tag_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_tag: Option<String>,

    // video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coded_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coded_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_captions: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_b_frames: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_fmt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_transfer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primaries: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_avc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nal_length_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // timing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_frame_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_frame_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_pts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bit_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits_per_sample: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits_per_raw_sample: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_frames: Option<String>,

    // audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_fmt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmix_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltrt_cmixlev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltrt_surmixlev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loro_cmixlev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loro_surmixlev: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<StreamTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_data_list: Option<Vec<SideData>>,
}

impl StreamDescriptor {
    pub fn is_type(&self, codec_type: &CodecType) -> bool {
        self.codec_type.as_ref() == Some(codec_type)
    }

    /// Frames per second from `r_frame_rate`, else `avg_frame_rate`.
    pub fn frame_rate(&self) -> Option<f64> {
        [&self.r_frame_rate, &self.avg_frame_rate]
            .into_iter()
            .find_map(|rate| parse_rational(rate.as_deref()?))
    }

    pub fn side_data_types(&self) -> impl Iterator<Item = &str> {
        self.side_data_list
            .iter()
            .flatten()
            .filter_map(|s| s.side_data_type.as_deref())
    }
}

/// Parses `N/D` (or a plain number). A zero denominator yields `None`.
pub fn parse_rational(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => text.trim().parse().ok(),
    }
}

/// Role flags; each is an independent 0/1 indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dub: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karaoke: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_impaired: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_impaired: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_effects: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_pic: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed_thumbnails: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_diegetic: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub still_image: Option<u8>,
}

fn flag(v: Option<u8>) -> bool {
    v.unwrap_or(0) != 0
}

impl Disposition {
    pub fn is_default(&self) -> bool {
        flag(self.default)
    }
    pub fn is_forced(&self) -> bool {
        flag(self.forced)
    }
    pub fn is_hearing_impaired(&self) -> bool {
        flag(self.hearing_impaired)
    }
    pub fn is_visual_impaired(&self) -> bool {
        flag(self.visual_impaired)
    }
    pub fn is_attached_pic(&self) -> bool {
        flag(self.attached_pic)
    }
    pub fn is_comment(&self) -> bool {
        flag(self.comment)
    }
}

/// Per-stream tags. Matroska writes its statistics tags either with a
/// language suffix (`DURATION-eng`) or without one (`DURATION`); the two
/// spellings are kept as separate fields and never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_package_umid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,

    #[serde(rename = "BPS-eng", default, skip_serializing_if = "Option::is_none")]
    pub bps_eng: Option<String>,
    #[serde(rename = "DURATION-eng", default, skip_serializing_if = "Option::is_none")]
    pub duration_eng: Option<String>,
    #[serde(
        rename = "NUMBER_OF_FRAMES-eng",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_frames_eng: Option<String>,
    #[serde(
        rename = "NUMBER_OF_BYTES-eng",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_bytes_eng: Option<String>,
    #[serde(
        rename = "_STATISTICS_WRITING_APP-eng",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics_writing_app_eng: Option<String>,
    #[serde(
        rename = "_STATISTICS_WRITING_DATE_UTC-eng",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics_writing_date_utc_eng: Option<String>,
    #[serde(
        rename = "_STATISTICS_TAGS-eng",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics_tags_eng: Option<String>,

    #[serde(rename = "BPS", default, skip_serializing_if = "Option::is_none")]
    pub bps: Option<String>,
    #[serde(rename = "DURATION", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(
        rename = "NUMBER_OF_FRAMES",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_frames: Option<String>,
    #[serde(
        rename = "NUMBER_OF_BYTES",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_bytes: Option<String>,
    #[serde(
        rename = "_STATISTICS_WRITING_APP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics_writing_app: Option<String>,
    #[serde(
        rename = "_STATISTICS_WRITING_DATE_UTC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics_writing_date_utc: Option<String>,
    #[serde(
        rename = "_STATISTICS_TAGS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub statistics_tags: Option<String>,

    /// Tags without a dedicated field.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl StreamTags {
    pub fn creation_time(&self) -> Option<DateTime<FixedOffset>> {
        parse_tag_time(self.creation_time.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_data_type: Option<String>,
}
