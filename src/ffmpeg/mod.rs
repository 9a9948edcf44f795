use std::{fmt, io::Read};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod duration;
pub mod format;
pub mod probe;
pub mod stream;
pub mod timecode;

pub use duration::{DurationStatus, StreamDuration};
pub use format::{FormatDescriptor, FormatTags};
pub use stream::{CodecType, Disposition, SideData, StreamDescriptor, StreamTags};
pub use timecode::{parse_timecode, Timecode};

/// Parsed `ffprobe -show_format -show_streams` output for one file.
///
/// Fields ffprobe did not print stay `None` and are left out again when the
/// descriptor is rendered. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub format: FormatDescriptor,
    /// In the order ffprobe reported them.
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
}

impl MediaDescriptor {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Indented JSON rendering; fields that were absent are omitted.
    pub fn to_pretty_json(&self) -> String {
        self.to_string()
    }

    /// The stream whose reported `index` is `index`, which is not
    /// necessarily `streams[index]`.
    pub fn stream(&self, index: u32) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.index == index)
    }

    pub fn streams_of<'a>(
        &'a self,
        codec_type: &'a CodecType,
    ) -> impl Iterator<Item = &'a StreamDescriptor> + 'a {
        self.streams.iter().filter(move |s| s.is_type(codec_type))
    }

    pub fn format_duration(&self) -> Option<f64> {
        self.format.duration_seconds()
    }
}

impl fmt::Display for MediaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // string keys and plain values only, so this cannot fail
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
