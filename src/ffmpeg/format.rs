use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::duration::parse_float_text;

/// Container-level section of the probe output.
///
/// Sizes, bit rates and times stay as the text ffprobe printed, since it
/// emits `N/A` for unknown values and sizes can exceed 64 bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_streams: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_programs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<FormatTags>,
}

impl FormatDescriptor {
    /// Comma separated short names, e.g. `mov,mp4,m4a,3gp,3g2,mj2`.
    pub fn format_names(&self) -> impl Iterator<Item = &str> {
        self.format_name
            .as_deref()
            .into_iter()
            .flat_map(|names| names.split(','))
            .filter(|name| !name.is_empty())
    }

    /// Container duration in seconds, if reported and numeric.
    pub fn duration_seconds(&self) -> Option<f64> {
        parse_float_text(self.duration.as_deref()?).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_brands: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(
        rename = "com.apple.finalcutstudio.media.uuid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub finalcutstudio_media_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_package_umid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "iTunEXTC", default, skip_serializing_if = "Option::is_none")]
    pub itunextc: Option<String>,
    #[serde(rename = "iTunMOVI", default, skip_serializing_if = "Option::is_none")]
    pub itunmovi: Option<String>,
    /// Tags without a dedicated field.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl FormatTags {
    pub fn creation_time(&self) -> Option<DateTime<FixedOffset>> {
        parse_tag_time(self.creation_time.as_deref())
    }

    pub fn modification_date(&self) -> Option<DateTime<FixedOffset>> {
        parse_tag_time(self.modification_date.as_deref())
    }

    /// Only full RFC 3339 dates parse; a bare year yields `None`.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        parse_tag_time(self.date.as_deref())
    }
}

pub(crate) fn parse_tag_time(text: Option<&str>) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(json: &str) -> FormatDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_format_names() {
        let f = format(r#"{"filename":"a.mp4","format_name":"mov,mp4,m4a,3gp,3g2,mj2"}"#);
        assert_eq!(
            f.format_names().collect::<Vec<_>>(),
            vec!["mov", "mp4", "m4a", "3gp", "3g2", "mj2"]
        );

        let f = format(r#"{"filename":"a.mp4"}"#);
        assert_eq!(f.format_names().count(), 0);
    }

    #[test]
    fn test_duration_seconds() {
        assert_eq!(
            format(r#"{"filename":"a","duration":"10.010000"}"#).duration_seconds(),
            Some(10.01)
        );
        assert_eq!(format(r#"{"filename":"a","duration":"N/A"}"#).duration_seconds(), None);
        assert_eq!(format(r#"{"filename":"a"}"#).duration_seconds(), None);
        assert_eq!(format(r#"{"filename":"a","duration":"1e400"}"#).duration_seconds(), None);
    }

    #[test]
    fn test_zero_is_not_absent() {
        let f = format(r#"{"filename":"a","nb_programs":0}"#);
        assert_eq!(f.nb_programs, Some(0));
        assert_eq!(f.nb_streams, None);
    }

    #[test]
    fn test_tag_times() {
        let tags: FormatTags = serde_json::from_str(
            r#"{"creation_time":"2019-05-17T10:11:12.000000Z","date":"2019","vendor":"x"}"#,
        )
        .unwrap();
        let created = tags.creation_time().unwrap();
        assert_eq!(created.timestamp(), 1558087872);
        assert_eq!(tags.date.as_deref(), Some("2019"));
        assert_eq!(tags.date(), None);
        assert_eq!(tags.modification_date(), None);
        assert_eq!(tags.other.get("vendor"), Some(&serde_json::json!("x")));
    }
}
