use std::fmt;

use super::{timecode::parse_timecode, MediaDescriptor};

/// Where a resolved stream duration came from, or why there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationStatus {
    /// The stream's own `duration` field.
    Exact,
    /// Derived from the stream's `DURATION-eng` tag.
    FromTag,
    /// The stream reports nothing; the container duration was used instead.
    FormatFallback { stream: usize },
    /// Neither the stream nor the container reports a duration.
    Unavailable { stream: usize },
    NoStreams,
    OutOfRange { index: usize, last: usize },
    /// A duration field was present but not a number.
    Malformed { value: String, reason: String },
}

impl DurationStatus {
    /// True for [`Exact`](Self::Exact) and [`FromTag`](Self::FromTag).
    pub fn is_ok(&self) -> bool {
        matches!(self, DurationStatus::Exact | DurationStatus::FromTag)
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, DurationStatus::Exact)
    }

    /// False when `seconds` is the `-1` sentinel rather than a duration.
    pub fn has_value(&self) -> bool {
        !matches!(
            self,
            DurationStatus::NoStreams
                | DurationStatus::OutOfRange { .. }
                | DurationStatus::Malformed { .. }
        )
    }
}

impl fmt::Display for DurationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationStatus::Exact => write!(f, "ok"),
            DurationStatus::FromTag => write!(f, "ok, derived from DURATION tag"),
            DurationStatus::FormatFallback { stream } => write!(
                f,
                "stream {} has no duration metadata, using format duration",
                stream
            ),
            DurationStatus::Unavailable { stream } => write!(
                f,
                "stream {} has no duration metadata and neither has the format",
                stream
            ),
            DurationStatus::NoStreams => write!(f, "file has no streams"),
            DurationStatus::OutOfRange { index, last } => write!(
                f,
                "stream index {} is out of [0-{}] range",
                index, last
            ),
            DurationStatus::Malformed { value, reason } => {
                write!(f, "malformed duration value {:?}: {}", value, reason)
            }
        }
    }
}

/// Seconds paired with their provenance.
///
/// `seconds` is `-1` for [`NoStreams`](DurationStatus::NoStreams),
/// [`OutOfRange`](DurationStatus::OutOfRange) and
/// [`Malformed`](DurationStatus::Malformed), `0` for
/// [`Unavailable`](DurationStatus::Unavailable), and a usable value
/// otherwise, including the format-level fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDuration {
    pub seconds: f64,
    pub status: DurationStatus,
}

impl StreamDuration {
    fn new(seconds: f64, status: DurationStatus) -> Self {
        Self { seconds, status }
    }

    fn failed(status: DurationStatus) -> Self {
        Self::new(-1.0, status)
    }
}

/// Parses a decimal seconds value. Text that only parses by overflowing to
/// infinity is rejected; the literal `inf`/`infinity`/`nan` spellings are not.
pub(crate) fn parse_float_text(value: &str) -> Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if parsed.is_finite() {
        return Ok(parsed);
    }
    let literal = value.trim_start_matches(['+', '-']).to_ascii_lowercase();
    match literal.as_str() {
        "inf" | "infinity" | "nan" => Ok(parsed),
        _ => Err("value out of range".to_owned()),
    }
}

fn parse_seconds(value: &str) -> Result<f64, DurationStatus> {
    parse_float_text(value).map_err(|reason| DurationStatus::Malformed {
        value: value.to_owned(),
        reason,
    })
}

impl MediaDescriptor {
    /// Best-effort duration of the stream at position `index` in `streams`.
    ///
    /// Falls back from the stream's `duration` to its `DURATION-eng` tag, then
    /// to the container duration. The status tells the caller which source
    /// was used.
    pub fn resolve_stream_duration(&self, index: usize) -> StreamDuration {
        if self.streams.is_empty() {
            return StreamDuration::failed(DurationStatus::NoStreams);
        }
        let Some(stream) = self.streams.get(index) else {
            return StreamDuration::failed(DurationStatus::OutOfRange {
                index,
                last: self.streams.len() - 1,
            });
        };

        if let Some(duration) = stream.duration.as_deref() {
            return match parse_seconds(duration) {
                Ok(seconds) => StreamDuration::new(seconds, DurationStatus::Exact),
                Err(status) => StreamDuration::failed(status),
            };
        }

        if let Some(tag) = stream.tags.as_ref().and_then(|t| t.duration_eng.as_deref()) {
            return StreamDuration::new(parse_timecode(tag), DurationStatus::FromTag);
        }

        match self.format.duration.as_deref().map(parse_seconds) {
            Some(Ok(seconds)) => {
                StreamDuration::new(seconds, DurationStatus::FormatFallback { stream: index })
            }
            Some(Err(status)) => StreamDuration::failed(status),
            None => StreamDuration::new(0.0, DurationStatus::Unavailable { stream: index }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> MediaDescriptor {
        MediaDescriptor::from_json_str(json).unwrap()
    }

    #[test]
    fn test_no_streams() {
        let d = descriptor(r#"{"format":{"filename":"x.mp4"}}"#);
        for i in [0, 1, 7] {
            let r = d.resolve_stream_duration(i);
            assert_eq!(r.seconds, -1.0);
            assert_eq!(r.status, DurationStatus::NoStreams);
            assert!(!r.status.is_ok());
        }
    }

    #[test]
    fn test_out_of_range() {
        let d = descriptor(r#"{"format":{"filename":"x"},"streams":[{"index":0},{"index":1}]}"#);
        let r = d.resolve_stream_duration(5);
        assert_eq!(r.seconds, -1.0);
        assert_eq!(r.status, DurationStatus::OutOfRange { index: 5, last: 1 });
        let msg = r.status.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("[0-1]"));
    }

    #[test]
    fn test_exact() {
        let d = descriptor(
            r#"{"format":{"filename":"x","duration":"99.0"},"streams":[{"index":0,"duration":"12.5"}]}"#,
        );
        let r = d.resolve_stream_duration(0);
        assert_eq!(r, StreamDuration::new(12.5, DurationStatus::Exact));
        assert!(r.status.is_exact());
        assert_eq!(r.status.to_string(), "ok");
    }

    #[test]
    fn test_malformed_stream_duration() {
        let d = descriptor(r#"{"format":{"filename":"x"},"streams":[{"index":0,"duration":"N/A"}]}"#);
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, -1.0);
        match r.status {
            DurationStatus::Malformed { ref value, ref reason } => {
                assert_eq!(value, "N/A");
                assert!(!reason.is_empty());
            }
            ref other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_from_tag() {
        let d = descriptor(
            r#"{"format":{"filename":"x.mkv","duration":"99.0"},
                "streams":[{"index":0,"tags":{"DURATION-eng":"00:01:02.500000000"}}]}"#,
        );
        let r = d.resolve_stream_duration(0);
        assert_eq!(r, StreamDuration::new(62.5, DurationStatus::FromTag));
        assert!(r.status.is_ok());
        assert!(!r.status.is_exact());
    }

    #[test]
    fn test_unsuffixed_tag_is_not_used() {
        let d = descriptor(
            r#"{"format":{"filename":"x.mkv","duration":"99.0"},
                "streams":[{"index":0,"tags":{"DURATION":"00:01:02.500000000"}}]}"#,
        );
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, 99.0);
        assert_eq!(r.status, DurationStatus::FormatFallback { stream: 0 });
    }

    #[test]
    fn test_format_fallback() {
        let d = descriptor(
            r#"{"format":{"filename":"x","duration":"30.000000"},"streams":[{"index":0},{"index":1}]}"#,
        );
        let r = d.resolve_stream_duration(1);
        assert_eq!(r.seconds, 30.0);
        assert_eq!(r.status, DurationStatus::FormatFallback { stream: 1 });
        assert!(!r.status.is_ok());
        assert!(r.status.to_string().contains("stream 1"));
    }

    #[test]
    fn test_malformed_format_duration() {
        let d = descriptor(r#"{"format":{"filename":"x","duration":"soon"},"streams":[{"index":0}]}"#);
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, -1.0);
        assert!(matches!(r.status, DurationStatus::Malformed { .. }));
    }

    #[test]
    fn test_overflowing_durations_are_malformed() {
        let d = descriptor(r#"{"format":{"filename":"x"},"streams":[{"index":0,"duration":"1e400"}]}"#);
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, -1.0);
        assert_eq!(
            r.status,
            DurationStatus::Malformed {
                value: "1e400".into(),
                reason: "value out of range".into()
            }
        );
        assert!(!r.status.has_value());

        let d = descriptor(r#"{"format":{"filename":"x","duration":"1e400"},"streams":[{"index":0}]}"#);
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, -1.0);
        assert!(matches!(r.status, DurationStatus::Malformed { .. }));
        assert_eq!(d.format_duration(), None);
    }

    #[test]
    fn test_parse_float_text() {
        assert_eq!(parse_float_text("12.5"), Ok(12.5));
        assert_eq!(parse_float_text("-1e400"), Err("value out of range".to_owned()));
        assert_eq!(parse_float_text("inf"), Ok(f64::INFINITY));
        assert_eq!(parse_float_text("-Infinity"), Ok(f64::NEG_INFINITY));
        assert!(parse_float_text("NaN").unwrap().is_nan());
        assert!(parse_float_text("").is_err());
    }

    #[test]
    fn test_empty_text_counts_as_present() {
        let d = descriptor(
            r#"{"format":{"filename":"x","duration":"9.0"},"streams":[{"index":0,"duration":""},{"index":1,"tags":{"DURATION-eng":""}}]}"#,
        );
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, -1.0);
        assert!(matches!(r.status, DurationStatus::Malformed { .. }));
        assert_eq!(d.resolve_stream_duration(1), StreamDuration::new(0.0, DurationStatus::FromTag));
    }

    #[test]
    fn test_has_value() {
        assert!(DurationStatus::Exact.has_value());
        assert!(DurationStatus::FromTag.has_value());
        assert!(DurationStatus::FormatFallback { stream: 0 }.has_value());
        assert!(DurationStatus::Unavailable { stream: 0 }.has_value());
        assert!(!DurationStatus::NoStreams.has_value());
        assert!(!DurationStatus::OutOfRange { index: 2, last: 1 }.has_value());
    }

    #[test]
    fn test_unavailable() {
        let d = descriptor(r#"{"format":{"filename":"x"},"streams":[{"index":0}]}"#);
        let r = d.resolve_stream_duration(0);
        assert_eq!(r.seconds, 0.0);
        assert_eq!(r.status, DurationStatus::Unavailable { stream: 0 });
    }

    #[test]
    fn test_uses_position_not_reported_index() {
        let d = descriptor(
            r#"{"format":{"filename":"x"},"streams":[{"index":3,"duration":"1.5"},{"index":7,"duration":"2.5"}]}"#,
        );
        assert_eq!(d.resolve_stream_duration(1).seconds, 2.5);
        assert!(matches!(
            d.resolve_stream_duration(3).status,
            DurationStatus::OutOfRange { index: 3, last: 1 }
        ));
    }
}
