//! # captions
//!
//! Caption document model with readers and writers for broadcast and web
//! caption formats:
//!
//! - SCC (Scenarist closed captions): line-21 control codes with SMPTE
//!   timecodes, decoded through a pop-on, paint-on and roll-up state machine
//! - SRT (SubRip)
//! - WebVTT (Web Video Text Tracks)
//!
//! Every reader produces a [`CaptionSet`]: captions grouped by language, each
//! caption a run of text, line breaks and balanced style markers.
//!
//! ## Quick Start
//!
//! ### Decoding SCC
//!
//! ```rust
//! use captions::prelude::*;
//!
//! let scc = "Scenarist_SCC V1.0\n\n\
//!            00:00:01;00\t94ae 94ae 9420 9420 9470 9470 c8e9 942c 942c 942f 942f\n\n\
//!            00:00:03;00\t942c 942c\n";
//!
//! let set = SccReader::default().read(scc).unwrap();
//! let captions = set.captions(DEFAULT_LANGUAGE);
//! assert_eq!(captions.len(), 1);
//! assert_eq!(captions[0].text(), "Hi");
//! ```
//!
//! ### Converting Between Formats
//!
//! ```rust
//! use captions::{convert, Format};
//!
//! let srt = "1\n00:00:01,000 --> 00:00:04,000\n<i>Hello</i>, world!\n";
//!
//! let vtt = convert::convert(srt, Format::Srt, Format::WebVtt).unwrap();
//! assert!(vtt.starts_with("WEBVTT"));
//!
//! // Or detect the source and encode SCC
//! let scc = convert::ConversionBuilder::new(srt)
//!     .to_format(Format::Scc)
//!     .unwrap();
//! assert!(scc.starts_with("Scenarist_SCC V1.0"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod convert;
pub mod error;
pub mod format;
mod markup;
pub mod model;
pub mod scc;
pub mod srt;
pub mod vtt;

// Re-export commonly used types at the crate root
pub use convert::{detect_format, ConversionBuilder};
pub use error::{CaptionError, Result};
pub use format::{CaptionReader, CaptionWriter, Format};
pub use model::{Caption, CaptionNode, CaptionSet, StyleProps, DEFAULT_LANGUAGE};
pub use scc::{SccReader, SccReaderConfig, SccWriter, SccWriterConfig};
pub use srt::{SrtReader, SrtReaderConfig, SrtWriter};
pub use vtt::{VttReader, VttReaderConfig, VttWriter};

/// Prelude module for convenient imports.
///
/// ```rust
/// use captions::prelude::*;
/// ```
pub mod prelude {
    pub use crate::convert::{self, ConversionBuilder};
    pub use crate::error::{CaptionError, Result};
    pub use crate::format::{CaptionReader, CaptionWriter, Format};
    pub use crate::model::{Caption, CaptionNode, CaptionSet, StyleProps, DEFAULT_LANGUAGE};
    pub use crate::scc::{self, SccReader, SccReaderConfig, SccWriter, SccWriterConfig};
    pub use crate::srt::{self, SrtReader, SrtWriter};
    pub use crate::vtt::{self, VttReader, VttWriter};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cross_format_conversion() {
        let srt = "1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n\n\
                   2\n00:00:05,000 --> 00:00:08,500\nSecond line.\n\n";

        let vtt = convert::convert(srt, Format::Srt, Format::WebVtt).unwrap();
        let back = convert::convert(&vtt, Format::WebVtt, Format::Srt).unwrap();
        assert_eq!(back, srt);
    }

    #[test]
    fn test_reader_configs_deserialize() {
        let config: SccReaderConfig =
            serde_json::from_str(r#"{"offset": 2000000}"#).unwrap();
        assert_eq!(config.offset, 2_000_000);
        assert!(!config.simulate_roll_up);

        let config: SrtReaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.language, DEFAULT_LANGUAGE);
    }
}
