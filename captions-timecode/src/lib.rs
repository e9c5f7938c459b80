//! Timecode arithmetic for caption formats.
//!
//! This crate converts between wall-clock microseconds and the two time
//! notations caption files use:
//!
//! - **SMPTE timecode**: `HH:MM:SS:FF` frames at a broadcast frame rate, with
//!   `HH:MM:SS;FF` marking drop-frame timecode
//! - **Clock strings**: `HH:MM:SS.mmm` with a selectable decimal separator
//!
//! # Quick Start
//!
//! ```rust
//! use captions_timecode::{format_clock, Timecode};
//!
//! // Non-drop timecode at 29.97 fps runs 1.001x slower than the wall clock
//! let tc: Timecode = "00:00:10:00".parse().unwrap();
//! assert_eq!(tc.to_microseconds(), 10_010_000);
//!
//! // Drop-frame timecode is wall-clock time
//! let tc: Timecode = "00:00:10;00".parse().unwrap();
//! assert_eq!(tc.to_microseconds(), 10_000_000);
//!
//! assert_eq!(format_clock(10_010_000, ','), "00:00:10,010");
//! ```
//!
//! # Frame Multipliers
//!
//! ```rust
//! use captions_timecode::{FrameMultiplier, FrameRate};
//!
//! let multiplier: FrameMultiplier = "1000 1001".parse().unwrap();
//! assert_eq!(FrameRate::Fps30.with_multiplier(multiplier), FrameRate::Fps29_97);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod smpte;

pub use clock::{format_clock, parse_clock};
pub use error::{Result, TimecodeError};
pub use smpte::{parse_timecode, FrameMultiplier, FrameRate, Timecode};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clock::{format_clock, parse_clock};
    pub use crate::error::{Result, TimecodeError};
    pub use crate::smpte::{parse_timecode, FrameMultiplier, FrameRate, Timecode};
}
