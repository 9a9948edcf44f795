pub mod error;
pub mod ffmpeg;

pub use error::{ProbeError, Result};
pub use ffmpeg::{
    parse_timecode,
    probe::{probe, Prober},
    DurationStatus, MediaDescriptor, StreamDuration,
};
