//! Frame-addressed broadcast timecode.
//!
//! Line-21 and DFXP captions count time in frames, written `HH:MM:SS:FF`, or
//! `HH:MM:SS;FF` when the count skips frame labels to stay on the wall clock.
//!
//! A count kept at an x/1001 rate without dropping labels drifts behind real
//! time: `00:00:10:00` at 29.97 fps is 300 frames, 10.01 s. Drop-frame counts
//! are read as written.

use crate::error::{Result, TimecodeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MICROS_PER_SECOND: u128 = 1_000_000;
const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Frame rate of a timecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameRate {
    /// 24000/1001
    Fps23_976,
    /// 24/1
    Fps24,
    /// 25/1
    Fps25,
    /// 30000/1001, the line-21 caption rate.
    Fps29_97,
    /// 30/1
    Fps30,
    /// 50/1
    Fps50,
    /// 60000/1001
    Fps59_94,
    /// 60/1
    Fps60,
    /// Any other positive ratio.
    Custom {
        /// Frames.
        numerator: u32,
        /// Per this many seconds.
        denominator: u32,
    },
}

/// Named rates with their exact ratio and label.
static NAMED_RATES: [(FrameRate, u32, u32, &str); 8] = [
    (FrameRate::Fps23_976, 24000, 1001, "23.976"),
    (FrameRate::Fps24, 24, 1, "24"),
    (FrameRate::Fps25, 25, 1, "25"),
    (FrameRate::Fps29_97, 30000, 1001, "29.97"),
    (FrameRate::Fps30, 30, 1, "30"),
    (FrameRate::Fps50, 50, 1, "50"),
    (FrameRate::Fps59_94, 60000, 1001, "59.94"),
    (FrameRate::Fps60, 60, 1, "60"),
];

impl FrameRate {
    fn named(&self) -> Option<&'static (FrameRate, u32, u32, &'static str)> {
        NAMED_RATES.iter().find(|(rate, ..)| rate == self)
    }

    /// Exact rate as `(frames, seconds)`.
    #[must_use]
    pub fn as_rational(&self) -> (u32, u32) {
        match (self, self.named()) {
            (_, Some(&(_, num, den, _))) => (num, den),
            (
                Self::Custom {
                    numerator,
                    denominator,
                },
                None,
            ) => (*numerator, *denominator),
            _ => (1, 1),
        }
    }

    /// Frame labels per timecode second; `29.97` counts `00..=29`.
    #[must_use]
    pub fn nominal_fps(&self) -> u32 {
        let (num, den) = self.as_rational();
        ((num as u64 + den as u64 / 2) / (den as u64).max(1)).max(1) as u32
    }

    /// Rate in frames per second.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        let (num, den) = self.as_rational();
        num as f64 / den as f64
    }

    /// Whether `;` timecode is meaningful at this rate.
    #[must_use]
    pub fn is_drop_frame_rate(&self) -> bool {
        matches!(self, Self::Fps29_97 | Self::Fps59_94)
    }

    /// An arbitrary rate. Zero on either side is rejected.
    pub fn custom(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(TimecodeError::invalid_frame_rate(numerator, denominator));
        }
        Ok(Self::from_rational(numerator, denominator))
    }

    /// The named rate equal to `numerator/denominator` after reduction, or
    /// a custom one.
    #[must_use]
    pub fn from_rational(numerator: u32, denominator: u32) -> Self {
        let divisor = gcd(numerator as u64, denominator as u64).max(1) as u32;
        let (num, den) = (numerator / divisor, denominator / divisor);
        NAMED_RATES
            .iter()
            .find(|&&(_, n, d, _)| (n, d) == (num, den))
            .map_or(
                Self::Custom {
                    numerator: num,
                    denominator: den,
                },
                |&(rate, ..)| rate,
            )
    }

    /// Rate after scaling by a DFXP frame multiplier.
    #[must_use]
    pub fn with_multiplier(&self, multiplier: FrameMultiplier) -> Self {
        let (num, den) = self.as_rational();
        let num = num as u64 * multiplier.numerator as u64;
        let den = den as u64 * multiplier.denominator as u64;
        let divisor = gcd(num, den).max(1);
        let (num, den) = (num / divisor, den / divisor);
        match (u32::try_from(num), u32::try_from(den)) {
            (Ok(num), Ok(den)) => Self::from_rational(num, den),
            // Millihertz precision once the exact ratio no longer fits
            _ => Self::Custom {
                numerator: (num as f64 / den as f64 * 1000.0).round() as u32,
                denominator: 1000,
            },
        }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::Fps29_97
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.named() {
            Some((.., label)) => f.write_str(label),
            None => {
                let (num, den) = self.as_rational();
                write!(f, "{num}/{den}")
            }
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Ratio applied to a declared frame rate, written `"1000 1001"` in DFXP's
/// `ttp:frameMultiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameMultiplier {
    /// Top of the ratio.
    pub numerator: u32,
    /// Bottom of the ratio.
    pub denominator: u32,
}

impl FrameMultiplier {
    /// `1 1`, leaves a rate unchanged.
    pub const UNITY: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Builds a multiplier; both terms must be non-zero.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(TimecodeError::invalid_multiplier(format!(
                "{numerator} {denominator}"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }
}

impl Default for FrameMultiplier {
    fn default() -> Self {
        Self::UNITY
    }
}

impl FromStr for FrameMultiplier {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let terms = s
            .split_whitespace()
            .map(str::parse::<u32>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| TimecodeError::invalid_multiplier(s))?;
        match terms[..] {
            [numerator, denominator] => Self::new(numerator, denominator),
            _ => Err(TimecodeError::invalid_multiplier(s)),
        }
    }
}

/// A frame position such as `00:59:58;12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timecode {
    /// 0..=23
    pub hours: u8,
    /// 0..=59
    pub minutes: u8,
    /// 0..=59
    pub seconds: u8,
    /// Below the rate's nominal fps.
    pub frames: u8,
    /// Rate the frames are counted at.
    pub frame_rate: FrameRate,
    /// Written with `;` and read as wall-clock time.
    pub drop_frame: bool,
}

impl Timecode {
    /// A checked non-drop timecode.
    pub fn new(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        frame_rate: FrameRate,
    ) -> Result<Self> {
        let tc = Self {
            hours,
            minutes,
            seconds,
            frames,
            frame_rate,
            drop_frame: false,
        };
        tc.validate()?;
        Ok(tc)
    }

    /// A checked drop-frame timecode. Only 29.97 and 59.94 drop frames.
    pub fn new_drop_frame(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        frame_rate: FrameRate,
    ) -> Result<Self> {
        if !frame_rate.is_drop_frame_rate() {
            let (numerator, denominator) = frame_rate.as_rational();
            return Err(TimecodeError::invalid_frame_rate(numerator, denominator));
        }
        let tc = Self {
            drop_frame: true,
            ..Self::new(hours, minutes, seconds, frames, frame_rate)?
        };
        Ok(tc)
    }

    /// Splits a label count into fields. Counts past the end of the day
    /// stop at the last frame of `23:59:59`.
    #[must_use]
    pub fn from_frame_number(frame_number: u64, frame_rate: FrameRate, drop_frame: bool) -> Self {
        let fps = frame_rate.nominal_fps() as u64;
        let last_frame = SECONDS_PER_DAY * fps - 1;
        let frame_number = frame_number.min(last_frame);
        let (whole_seconds, frames) = (frame_number / fps, frame_number % fps);

        Self {
            hours: (whole_seconds / 3600) as u8,
            minutes: (whole_seconds / 60 % 60) as u8,
            seconds: (whole_seconds % 60) as u8,
            frames: frames as u8,
            frame_rate,
            drop_frame,
        }
    }

    /// Label count from `00:00:00:00`, ignoring dropped labels.
    #[must_use]
    pub fn to_frame_number(&self) -> u64 {
        let fps = self.frame_rate.nominal_fps() as u64;
        let whole_seconds = (self.hours as u64 * 60 + self.minutes as u64) * 60 + self.seconds as u64;
        whole_seconds * fps + self.frames as u64
    }

    /// Steps forward or back by `frames` labels, stopping at the end of the day.
    pub fn add_frames(&self, frames: i64) -> Result<Self> {
        let target = (self.to_frame_number() as i64)
            .checked_add(frames)
            .filter(|n| *n >= 0)
            .ok_or(TimecodeError::Underflow)?;
        Ok(Self::from_frame_number(
            target as u64,
            self.frame_rate,
            self.drop_frame,
        ))
    }

    /// Position on the wall clock, rounded up to the next microsecond so
    /// that [`Timecode::from_microseconds`] lands on this same frame.
    #[must_use]
    pub fn to_microseconds(&self) -> u64 {
        let labels = self.to_frame_number() as u128;
        let (num, den) = if self.drop_frame {
            (self.frame_rate.nominal_fps(), 1)
        } else {
            self.frame_rate.as_rational()
        };
        (labels * MICROS_PER_SECOND * den as u128).div_ceil((num as u128).max(1)) as u64
    }

    /// The last whole frame at or before `microseconds`, as non-drop
    /// timecode.
    #[must_use]
    pub fn from_microseconds(microseconds: u64, frame_rate: FrameRate) -> Self {
        let (num, den) = frame_rate.as_rational();
        let elapsed = microseconds as u128 * num as u128;
        let frames = elapsed / (MICROS_PER_SECOND * (den as u128).max(1));
        Self::from_frame_number(frames as u64, frame_rate, false)
    }

    /// Checks every field against its range.
    pub fn validate(&self) -> Result<()> {
        let frame_limit = self.frame_rate.nominal_fps().min(u8::MAX as u32 + 1) - 1;
        let fields = [
            ("hours", self.hours, 23),
            ("minutes", self.minutes, 59),
            ("seconds", self.seconds, 59),
            ("frames", self.frames, frame_limit),
        ];
        for (name, value, max) in fields {
            if value as u32 > max {
                return Err(TimecodeError::invalid_component(name, value as u32, max));
            }
        }
        Ok(())
    }

    /// `;` for drop-frame, `:` otherwise.
    #[must_use]
    pub fn separator(&self) -> char {
        if self.drop_frame {
            ';'
        } else {
            ':'
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            hours,
            minutes,
            seconds,
            frames,
            ..
        } = self;
        write!(
            f,
            "{hours:02}:{minutes:02}:{seconds:02}{}{frames:02}",
            self.separator()
        )
    }
}

/// Reads line-21 timecode, which is always 29.97 fps.
impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_timecode(s, FrameRate::Fps29_97)
    }
}

/// Reads `HH:MM:SS:FF` at `frame_rate`. Any `;` makes it drop-frame.
pub fn parse_timecode(s: &str, frame_rate: FrameRate) -> Result<Timecode> {
    const FIELDS: [&str; 4] = ["hours", "minutes", "seconds", "frames"];

    let s = s.trim();
    let parts: Vec<&str> = s.split([':', ';']).collect();
    if parts.len() != FIELDS.len() {
        return Err(TimecodeError::invalid_format(format!(
            "'{s}' does not have four fields"
        )));
    }

    let mut values = [0u8; 4];
    for ((value, part), name) in values.iter_mut().zip(&parts).zip(FIELDS) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimecodeError::invalid_format(format!(
                "{name} of '{s}' is not a number"
            )));
        }
        *value = part.parse().map_err(|_| {
            TimecodeError::invalid_format(format!("{name} of '{s}' is too large"))
        })?;
    }

    let [hours, minutes, seconds, frames] = values;
    if s.contains(';') {
        Timecode::new_drop_frame(hours, minutes, seconds, frames, frame_rate)
    } else {
        Timecode::new(hours, minutes, seconds, frames, frame_rate)
    }
}
