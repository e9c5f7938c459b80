//! Conversions between every pair of supported formats.

use captions::prelude::*;
use pretty_assertions::assert_eq;

const SRT: &str = "1\n00:00:05,000 --> 00:00:07,000\nHello there\n\n\
                   2\n00:00:08,000 --> 00:00:10,500\n<i>Two</i>\nlines\n\n\
                   3\n00:00:20,000 --> 00:00:21,000\nFish & chips\n\n";

const VTT: &str = "WEBVTT\n\n\
                   00:00:05.000 --> 00:00:07.000\nHello there\n\n\
                   00:00:08.000 --> 00:00:10.500\n<i>Two</i>\nlines\n\n\
                   00:00:20.000 --> 00:00:21.000\nFish &amp; chips\n\n";

fn texts(set: &CaptionSet) -> Vec<String> {
    let language = set.first_language().unwrap_or(DEFAULT_LANGUAGE);
    set.captions(language).iter().map(Caption::text).collect()
}

#[test]
fn srt_and_vtt_are_interchangeable() {
    assert_eq!(convert::convert(SRT, Format::Srt, Format::WebVtt).unwrap(), VTT);
    assert_eq!(convert::convert(VTT, Format::WebVtt, Format::Srt).unwrap(), SRT);
}

#[test]
fn srt_through_scc_keeps_text() {
    let scc = convert::convert(SRT, Format::Srt, Format::Scc).unwrap();
    assert_eq!(convert::detect_format(&scc), Some(Format::Scc));

    let set = convert::read(&scc, Format::Scc).unwrap();
    assert_eq!(
        texts(&set),
        vec!["Hello there", "Two\nlines", "Fish & chips"]
    );

    let language = set.first_language().unwrap();
    let captions = set.captions(language);
    let frame = 33_367;
    assert!(captions[0].start.abs_diff(5_000_000) <= frame);
    assert!(captions[2].start.abs_diff(20_000_000) <= frame);
}

#[test]
fn scc_to_text_formats() {
    let scc = "Scenarist_SCC V1.0\n\n\
               00:00:01;00\t94ae 94ae 9420 9420 94d0 94d0 c8e9 9470 9470 f468 e5f2 e580 942c 942c 942f 942f\n\n\
               00:00:03;00\t942c 942c\n";

    let srt = ConversionBuilder::new(scc).to_format(Format::Srt).unwrap();
    assert!(srt.starts_with("1\n00:00:01,"));
    assert!(srt.ends_with("Hi\nthere\n\n"));

    let vtt = ConversionBuilder::new(scc).to_format(Format::WebVtt).unwrap();
    assert!(vtt.starts_with("WEBVTT\n\n00:00:01."));
    assert!(vtt.contains("Hi\nthere"));
}

#[test]
fn auto_detection_picks_reader() {
    assert_eq!(convert::detect_format(SRT), Some(Format::Srt));
    assert_eq!(convert::detect_format(VTT), Some(Format::WebVtt));
    assert_eq!(convert::detect_format("just words"), None);

    let (set, format) = convert::read_auto(VTT).unwrap();
    assert_eq!(format, Format::WebVtt);
    assert_eq!(set.caption_count(), 3);
}

#[test]
fn strip_styling_drops_italics() {
    let srt = ConversionBuilder::new(SRT)
        .strip_styling()
        .to_format(Format::Srt)
        .unwrap();
    assert!(!srt.contains("<i>"));
    assert!(srt.contains("Two\nlines"));
}

#[test]
fn empty_sources_are_errors() {
    for format in Format::ALL {
        let result = convert::read("", format);
        assert!(
            result.as_ref().is_err_and(CaptionError::is_empty_file),
            "{format}: {result:?}"
        );
    }
}
