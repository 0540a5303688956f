//! Primitive wire formats used throughout VAST: time values, offsets and the two
//! flavours of character data.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A literal that does not match the grammar of its value type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{literal}` is not a valid {expected}")]
pub struct FormatError {
    pub literal: String,
    pub expected: &'static str,
}

impl FormatError {
    fn new(literal: &str, expected: &'static str) -> Self {
        FormatError {
            literal: literal.to_string(),
            expected,
        }
    }
}

const DURATION_GRAMMAR: &str = "duration (HH:MM:SS or HH:MM:SS.mmm)";
const OFFSET_GRAMMAR: &str = "offset (HH:MM:SS[.mmm] or n%)";

/// A VAST time value, `HH:MM:SS` or `HH:MM:SS.mmm`.
///
/// Equality and ordering compare the time span only. Whether the literal carried a
/// millisecond fraction is remembered so that `00:00:30.000` renders back as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Duration {
    millis: u64,
    fractional: bool,
}

impl Duration {
    pub fn from_secs(secs: u64) -> Self {
        Duration {
            millis: secs * 1000,
            fractional: false,
        }
    }

    /// Renders with a millisecond fraction only when `millis` is not a whole second.
    pub fn from_millis(millis: u64) -> Self {
        Duration {
            millis,
            fractional: millis % 1000 != 0,
        }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs(&self) -> u64 {
        self.millis / 1000
    }

    pub fn subsec_millis(&self) -> u64 {
        self.millis % 1000
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Whether the canonical rendering includes the `.mmm` fraction.
    pub fn has_fraction(&self) -> bool {
        self.fractional
    }
}

impl From<Duration> for std::time::Duration {
    fn from(d: Duration) -> Self {
        std::time::Duration::from_millis(d.millis)
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Duration {}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.millis.hash(state);
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Duration {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let err = || FormatError::new(text, DURATION_GRAMMAR);

        let mut parts = text.split(':');
        let (Some(hours), Some(minutes), Some(rest), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        let (seconds, fraction) = match rest.split_once('.') {
            Some((seconds, fraction)) => (seconds, Some(fraction)),
            None => (rest, None),
        };

        if hours.len() < 2 || minutes.len() != 2 || seconds.len() != 2 {
            return Err(err());
        }
        if !all_digits(hours) || !all_digits(minutes) || !all_digits(seconds) {
            return Err(err());
        }

        let hours: u64 = hours.parse().map_err(|_| err())?;
        let minutes: u64 = minutes.parse().map_err(|_| err())?;
        let seconds: u64 = seconds.parse().map_err(|_| err())?;
        if minutes > 59 || seconds > 59 {
            return Err(err());
        }

        let millis = match fraction {
            None => 0,
            Some(f) if all_digits(f) && f.len() <= 3 => {
                // ".5" is half a second, not five milliseconds
                let scale = 10u64.pow(3 - f.len() as u32);
                f.parse::<u64>().map_err(|_| err())? * scale
            }
            Some(_) => return Err(err()),
        };

        let total = hours
            .checked_mul(3_600_000)
            .and_then(|h| h.checked_add(minutes * 60_000 + seconds * 1000 + millis))
            .ok_or_else(err)?;

        Ok(Duration {
            millis: total,
            fractional: fraction.is_some(),
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.millis / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60
        )?;
        if self.fractional {
            write!(f, ".{:03}", self.millis % 1000)?;
        }
        Ok(())
    }
}

/// A point in a creative's timeline, either absolute or relative to its duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    Time(Duration),
    Percent(f64),
}

impl Offset {
    /// Resolves the offset against the creative's total duration.
    pub fn resolve(&self, total: Duration) -> Duration {
        match self {
            Offset::Time(d) => *d,
            Offset::Percent(p) => {
                let millis = (total.as_millis() as f64 * p / 100.0).round() as u64;
                Duration::from_millis(millis)
            }
        }
    }
}

fn is_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((whole, frac)) => all_digits(whole) && all_digits(frac),
        None => all_digits(s),
    }
}

impl FromStr for Offset {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Some(number) = text.strip_suffix('%') {
            if !is_decimal(number) {
                return Err(FormatError::new(text, OFFSET_GRAMMAR));
            }
            // a long enough digit run overflows to infinity, which has no wire form
            return match number.parse::<f64>() {
                Ok(percent) if percent.is_finite() => Ok(Offset::Percent(percent)),
                _ => Err(FormatError::new(text, OFFSET_GRAMMAR)),
            };
        }
        text.parse::<Duration>()
            .map(Offset::Time)
            .map_err(|_| FormatError::new(text, OFFSET_GRAMMAR))
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Time(d) => d.fmt(f),
            Offset::Percent(p) => write!(f, "{}%", p),
        }
    }
}

macro_rules! serde_via_str {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_via_str!(Duration);
serde_via_str!(Offset);

/// Character data carried by a model field, tagged with the wire encoding the
/// writer must use for it. The writer does the escaping, not the type.
pub trait CharData {
    /// `true` when the text is written inside a CDATA section.
    const CDATA: bool;

    fn as_text(&self) -> &str;

    fn from_text(text: String) -> Self;
}

macro_rules! char_data {
    ($(#[$meta:meta])* $name:ident, cdata = $cdata:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(text: impl Into<String>) -> Self {
                $name(text.into())
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl CharData for $name {
            const CDATA: bool = $cdata;

            fn as_text(&self) -> &str {
                &self.0
            }

            fn from_text(text: String) -> Self {
                $name(text)
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                $name(text.to_string())
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                $name(text)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

char_data!(
    /// Text written inside `<![CDATA[ ... ]]>`, typically a URI or an HTML snippet.
    CdataString,
    cdata = true
);

char_data!(
    /// Text written as ordinary, escaped character data.
    PlainString,
    cdata = false
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_second_duration() {
        let d: Duration = "00:00:30".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.subsec_millis(), 0);
        assert_eq!(d.to_string(), "00:00:30");
    }

    #[test]
    fn parses_duration_with_millis() {
        let d: Duration = "00:00:30.500".parse().unwrap();
        assert_eq!(d.as_millis(), 30_500);
        assert_eq!(d.as_secs_f64(), 30.5);
        assert_eq!(d.to_string(), "00:00:30.500");
    }

    #[test]
    fn keeps_explicit_zero_fraction() {
        let d: Duration = "01:02:03.000".parse().unwrap();
        assert_eq!(d, Duration::from_secs(3723));
        assert_eq!(d.to_string(), "01:02:03.000");
    }

    #[test]
    fn short_fraction_is_scaled_to_millis() {
        let d: Duration = "00:00:01.5".parse().unwrap();
        assert_eq!(d.as_millis(), 1500);
        assert_eq!(d.to_string(), "00:00:01.500");
    }

    #[test]
    fn hours_may_exceed_two_digits() {
        let d: Duration = "100:00:00".parse().unwrap();
        assert_eq!(d.as_secs(), 360_000);
        assert_eq!(d.to_string(), "100:00:00");
    }

    #[test]
    fn rejects_malformed_durations() {
        for literal in [
            "30", "", "00:30", "0:00:30", "00:60:00", "00:00:61", "00:00:30.", "00:00:30.1234",
            "aa:bb:cc", "00:00:30:00", "-1:00:00",
        ] {
            let err = literal.parse::<Duration>().unwrap_err();
            assert_eq!(err.expected, DURATION_GRAMMAR, "{literal}");
        }
    }

    #[test]
    fn parses_percent_offset() {
        assert_eq!("50%".parse::<Offset>().unwrap(), Offset::Percent(50.0));
        assert_eq!("12.5%".parse::<Offset>().unwrap(), Offset::Percent(12.5));
        assert_eq!(Offset::Percent(50.0).to_string(), "50%");
        assert_eq!(Offset::Percent(12.5).to_string(), "12.5%");
    }

    #[test]
    fn rejects_percent_too_large_for_f64() {
        let literal = format!("{}%", "9".repeat(400));
        assert!(literal.parse::<Offset>().is_err());

        let large = format!("{}%", "9".repeat(300));
        let offset: Offset = large.parse().unwrap();
        assert_eq!(offset.to_string().parse::<Offset>().unwrap(), offset);
    }

    #[test]
    fn parses_time_offset() {
        assert_eq!(
            "00:01:00".parse::<Offset>().unwrap(),
            Offset::Time(Duration::from_secs(60))
        );
    }

    #[test]
    fn rejects_malformed_offsets() {
        for literal in ["50", "%", "abc%", "1.2.3%", "-5%", "00:01"] {
            assert!(literal.parse::<Offset>().is_err(), "{literal}");
        }
    }

    #[test]
    fn resolves_percent_against_total() {
        let total = Duration::from_secs(30);
        assert_eq!(
            Offset::Percent(50.0).resolve(total),
            Duration::from_millis(15_000)
        );
        assert_eq!(
            Offset::Time(Duration::from_secs(5)).resolve(total),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn char_data_flavours_differ_only_in_encoding() {
        let uri = CdataString::from("http://example.com/?a=1&b=2");
        let title = PlainString::from("Ad <title>");
        assert!(CdataString::CDATA);
        assert!(!PlainString::CDATA);
        assert_eq!(uri.as_text(), "http://example.com/?a=1&b=2");
        assert_eq!(&*title, "Ad <title>");
    }
}
