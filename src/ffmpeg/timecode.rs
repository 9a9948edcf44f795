use std::fmt;

/// Converts a `[[H:]M:]S[.ms]` timecode into seconds.
///
/// The text is scanned from the end: a `.` closes the fractional part and a
/// `:` closes a component. One, two or three components are read as
/// seconds, minutes:seconds or hours:minutes:seconds. A component that does
/// not parse as a number counts as zero instead of failing the whole value,
/// so slightly broken tag text still yields a usable duration.
pub fn parse_timecode(text: &str) -> f64 {
    let mut fraction = 0.0;
    let mut components: Vec<&str> = Vec::with_capacity(3);
    let mut end = text.len();

    for (i, b) in text.bytes().enumerate().rev() {
        match b {
            b'.' => {
                fraction = parse_component(&format!(".{}", &text[i + 1..end]));
                end = i;
            }
            b':' => {
                components.push(&text[i + 1..end]);
                end = i;
            }
            _ if i == 0 => components.push(&text[..end]),
            _ => {}
        }
    }

    let (hours, minutes, seconds) = match components.as_slice() {
        [ss] => (0.0, 0.0, parse_component(ss)),
        [ss, mm] => (0.0, parse_component(mm), parse_component(ss)),
        [ss, mm, hh] => (parse_component(hh), parse_component(mm), parse_component(ss)),
        _ => (0.0, 0.0, 0.0),
    };

    hours * 3600.0 + minutes * 60.0 + seconds + fraction
}

fn parse_component(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}

/// A non-negative offset split into whole seconds and milliseconds, printed
/// as `HH:MM:SS.mmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timecode {
    seconds: u64,
    milliseconds: u64,
}

impl Timecode {
    pub const fn zero() -> Self {
        Self {
            seconds: 0,
            milliseconds: 0,
        }
    }

    /// Negative or non-finite input clamps to zero.
    pub fn from_float_seconds(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::zero();
        }
        let mut ret = Self {
            seconds: seconds.floor() as u64,
            milliseconds: ((seconds - seconds.floor()) * 1000.0).round() as u64,
        };
        ret.normalize();
        ret
    }

    pub fn as_float_seconds(&self) -> f64 {
        self.seconds as f64 + self.milliseconds as f64 / 1000.0
    }

    pub fn as_hms(&self) -> (u64, u64, u64) {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds - hours * 3600) / 60;
        let seconds = self.seconds - hours * 3600 - minutes * 60;
        (hours, minutes, seconds)
    }

    fn normalize(&mut self) {
        self.seconds += self.milliseconds / 1000;
        self.milliseconds %= 1000;
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds) = self.as_hms();
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            hours, minutes, seconds, self.milliseconds
        )
    }
}
