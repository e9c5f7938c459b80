//! Line-21 character tables and control word classification.
//!
//! Every SCC word is two bytes with odd parity in bit 7. Classification
//! works on the 7-bit values; [`with_parity`] restores the transmitted form.

/// Special characters, second byte `0x30..=0x3F` after `0x11`.
const SPECIAL: [char; 16] = [
    '®', '°', '½', '¿', '™', '¢', '£', '♪', 'à', ' ', 'è', 'â', 'ê', 'î', 'ô', 'û',
];

/// Spanish, miscellaneous and French extended characters after `0x12`.
const EXTENDED_SPANISH_FRENCH: [char; 32] = [
    'Á', 'É', 'Ó', 'Ú', 'Ü', 'ü', '‘', '¡', '*', '’', '—', '©', '℠', '•', '“', '”', //
    'À', 'Â', 'Ç', 'È', 'Ê', 'Ë', 'ë', 'Î', 'Ï', 'ï', 'Ô', 'Ù', 'ù', 'Û', '«', '»',
];

/// Portuguese, German and Danish extended characters after `0x13`.
const EXTENDED_PORTUGUESE_GERMAN: [char; 32] = [
    'Ã', 'ã', 'Í', 'Ì', 'ì', 'Ò', 'ò', 'Õ', 'õ', '{', '}', '\\', '^', '_', '|', '~', //
    'Ä', 'ä', 'Ö', 'ö', 'ß', '¥', '¤', '¦', 'Å', 'å', 'Ø', 'ø', '┌', '┐', '└', '┘',
];

/// Preamble address codes for rows 1 through 15, column 0, white, parity applied.
const PREAMBLE_ROWS: [(u8, u8); 15] = [
    (0x91, 0xd0),
    (0x91, 0x70),
    (0x92, 0xd0),
    (0x92, 0x70),
    (0x15, 0xd0),
    (0x15, 0x70),
    (0x16, 0xd0),
    (0x16, 0x70),
    (0x97, 0xd0),
    (0x97, 0x70),
    (0x10, 0xd0),
    (0x13, 0xd0),
    (0x13, 0x70),
    (0x94, 0xd0),
    (0x94, 0x70),
];

/// Control words the decoder acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Resume caption loading (`9420`).
    PopOn,
    /// Roll-up or direct captioning with the given row capacity.
    PaintOn {
        /// Rows kept on screen, 1 to 4.
        rows: usize,
    },
    /// Erase displayed memory (`942c`).
    EraseDisplayed,
    /// Carriage return (`94ad`).
    CarriageReturn,
    /// Erase non-displayed memory (`94ae`).
    EraseNonDisplayed,
    /// End of caption, flip memories (`942f`).
    EndOfCaption,
    /// Row address; starts a new line.
    Preamble {
        /// The row is styled italic.
        italic: bool,
    },
    /// Style change in the middle of a row.
    MidRow {
        /// True for the italic code, false for any color.
        italic: bool,
    },
    /// Recognised control word with no effect on text.
    Other,
}

/// What a single word means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    /// A control word.
    Command(Command),
    /// A special character from the `0x11` table.
    Special(char),
    /// An extended character; replaces the preceding character.
    Extended(char),
    /// Up to two standard characters.
    Characters(String),
}

/// How one character is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCode {
    /// A single standard character byte.
    Single(u8),
    /// A special character word.
    Special(u8, u8),
    /// An extended character word.
    Extended(u8, u8),
}

/// Sets bit 7 so the byte carries odd parity.
pub fn with_parity(byte: u8) -> u8 {
    let byte = byte & 0x7F;
    if byte.count_ones() % 2 == 0 {
        byte | 0x80
    } else {
        byte
    }
}

fn has_odd_parity(byte: u8) -> bool {
    byte.count_ones() % 2 == 1
}

/// Parses a 4-hex-digit word into its two 7-bit bytes.
///
/// Returns `None` when the word is not hex or either byte fails parity.
pub fn parse_word(word: &str) -> Option<(u8, u8)> {
    if word.len() != 4 || !word.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let b1 = u8::from_str_radix(&word[..2], 16).ok()?;
    let b2 = u8::from_str_radix(&word[2..], 16).ok()?;
    if !has_odd_parity(b1) || !has_odd_parity(b2) {
        return None;
    }
    Some((b1 & 0x7F, b2 & 0x7F))
}

/// Standard character set. `0x00` is padding and decodes to nothing.
fn decode_character(byte: u8) -> Option<&'static str> {
    match byte {
        0x00 => Some(""),
        0x2A => Some("á"),
        0x5C => Some("é"),
        0x5E => Some("í"),
        0x5F => Some("ó"),
        0x60 => Some("ú"),
        0x7B => Some("ç"),
        0x7C => Some("÷"),
        0x7D => Some("Ñ"),
        0x7E => Some("ñ"),
        0x7F => Some("█"),
        0x20..=0x7E => ASCII.get(usize::from(byte - 0x20)..usize::from(byte - 0x1F)),
        _ => None,
    }
}

const ASCII: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

fn decode_pair(b1: u8, b2: u8) -> Option<String> {
    let first = decode_character(b1)?;
    let second = decode_character(b2)?;
    Some(format!("{first}{second}"))
}

fn misc_command(b2: u8) -> Command {
    match b2 {
        0x20 => Command::PopOn,
        0x25 => Command::PaintOn { rows: 2 },
        0x26 => Command::PaintOn { rows: 3 },
        0x27 => Command::PaintOn { rows: 4 },
        0x29 => Command::PaintOn { rows: 1 },
        0x2C => Command::EraseDisplayed,
        0x2D => Command::CarriageReturn,
        0x2E => Command::EraseNonDisplayed,
        0x2F => Command::EndOfCaption,
        _ => Command::Other,
    }
}

/// Classifies a word on the first caption channel.
///
/// Control words for the second channel are recognised but inert.
pub fn classify(b1: u8, b2: u8) -> Option<Code> {
    match (b1, b2) {
        (0x11, 0x30..=0x3F) => Some(Code::Special(SPECIAL[usize::from(b2 - 0x30)])),
        (0x12, 0x20..=0x3F) => Some(Code::Extended(
            EXTENDED_SPANISH_FRENCH[usize::from(b2 - 0x20)],
        )),
        (0x13, 0x20..=0x3F) => Some(Code::Extended(
            EXTENDED_PORTUGUESE_GERMAN[usize::from(b2 - 0x20)],
        )),
        (0x11, 0x20..=0x2F) => Some(Code::Command(Command::MidRow {
            italic: b2 & 0x0E == 0x0E,
        })),
        (0x14, 0x20..=0x2F) => Some(Code::Command(misc_command(b2))),
        (0x10..=0x17, 0x40..=0x7F) => Some(Code::Command(Command::Preamble {
            italic: b2 & 0x1E == 0x0E,
        })),
        // Tab offsets, background attributes and field-2 misc codes.
        (0x17, 0x21..=0x23)
        | (0x17, 0x2D..=0x2F)
        | (0x10, 0x20..=0x2F)
        | (0x15, 0x20..=0x2F) => Some(Code::Command(Command::Other)),
        (0x18..=0x1F, _) => classify(b1 - 0x08, b2).map(|_| Code::Command(Command::Other)),
        (0x00, _) | (0x20..=0x7F, _) => decode_pair(b1, b2).map(Code::Characters),
        _ => None,
    }
}

/// Finds the transmission code for a character.
///
/// The standard set wins over the special set, which wins over the
/// extended sets.
pub fn encode_character(c: char) -> Option<CharCode> {
    if let Some(byte) = (0x20..=0x7F).find(|&b| {
        decode_character(b).is_some_and(|s| s.chars().eq(std::iter::once(c)))
    }) {
        return Some(CharCode::Single(byte));
    }
    if let Some(index) = SPECIAL.iter().position(|&s| s == c) {
        return Some(CharCode::Special(0x11, 0x30 + index as u8));
    }
    if let Some(index) = EXTENDED_SPANISH_FRENCH.iter().position(|&s| s == c) {
        return Some(CharCode::Extended(0x12, 0x20 + index as u8));
    }
    EXTENDED_PORTUGUESE_GERMAN
        .iter()
        .position(|&s| s == c)
        .map(|index| CharCode::Extended(0x13, 0x20 + index as u8))
}

/// Standard character sent ahead of an extended character.
///
/// Decoders that understand the extended set overwrite it.
pub fn extended_fallback(c: char) -> u8 {
    let base = match c {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'ã' | 'ä' | 'å' => 'a',
        'ë' => 'e',
        'ì' | 'ï' => 'i',
        'ò' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ü' => 'u',
        'ß' => 's',
        '¥' => 'Y',
        '‘' | '’' => '\'',
        '“' | '”' | '«' | '»' => '"',
        '—' => '-',
        '¡' => '!',
        '©' => 'c',
        _ => ' ',
    };
    base as u8
}

/// Preamble address code for a 1-based row, parity applied.
pub fn preamble_for_row(row: usize) -> Option<(u8, u8)> {
    row.checked_sub(1)
        .and_then(|index| PREAMBLE_ROWS.get(index))
        .copied()
}

/// Number of addressable rows.
pub const ROW_COUNT: usize = PREAMBLE_ROWS.len();

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parity() {
        assert_eq!(with_parity(0x14), 0x94);
        assert_eq!(with_parity(0x20), 0x20);
        assert_eq!(with_parity(0x00), 0x80);
        assert_eq!(with_parity(0x41), 0xc1);
        assert_eq!(parse_word("942c"), Some((0x14, 0x2C)));
        assert_eq!(parse_word("9470"), Some((0x14, 0x70)));
        // 0x14 without its parity bit has even parity
        assert_eq!(parse_word("142c"), None);
        assert_eq!(parse_word("94zz"), None);
        assert_eq!(parse_word("942"), None);
    }

    #[test]
    fn test_character_decode() {
        assert_eq!(decode_character(0x41), Some("A"));
        assert_eq!(decode_character(0x20), Some(" "));
        assert_eq!(decode_character(0x7D), Some("Ñ"));
        assert_eq!(decode_character(0x2A), Some("á"));
        assert_eq!(decode_character(0x7F), Some("█"));
        assert_eq!(decode_character(0x05), None);
    }

    #[test]
    fn test_classify_commands() {
        assert_eq!(classify(0x14, 0x20), Some(Code::Command(Command::PopOn)));
        assert_eq!(
            classify(0x14, 0x26),
            Some(Code::Command(Command::PaintOn { rows: 3 }))
        );
        assert_eq!(
            classify(0x14, 0x29),
            Some(Code::Command(Command::PaintOn { rows: 1 }))
        );
        assert_eq!(
            classify(0x14, 0x2F),
            Some(Code::Command(Command::EndOfCaption))
        );
        assert_eq!(classify(0x14, 0x21), Some(Code::Command(Command::Other)));
        assert_eq!(classify(0x17, 0x22), Some(Code::Command(Command::Other)));
        assert_eq!(
            classify(0x14, 0x70),
            Some(Code::Command(Command::Preamble { italic: false }))
        );
        assert_eq!(
            classify(0x14, 0x4E),
            Some(Code::Command(Command::Preamble { italic: true }))
        );
        assert_eq!(
            classify(0x11, 0x2E),
            Some(Code::Command(Command::MidRow { italic: true }))
        );
        assert_eq!(
            classify(0x11, 0x20),
            Some(Code::Command(Command::MidRow { italic: false }))
        );
        // Second channel codes do nothing
        assert_eq!(classify(0x1C, 0x2F), Some(Code::Command(Command::Other)));
    }

    #[test]
    fn test_classify_characters() {
        assert_eq!(classify(0x11, 0x37), Some(Code::Special('♪')));
        assert_eq!(classify(0x12, 0x20), Some(Code::Extended('Á')));
        assert_eq!(classify(0x13, 0x3F), Some(Code::Extended('┘')));
        assert_eq!(
            classify(0x48, 0x69),
            Some(Code::Characters("Hi".to_string()))
        );
        assert_eq!(
            classify(0x6B, 0x00),
            Some(Code::Characters("k".to_string()))
        );
        assert_eq!(classify(0x48, 0x05), None);
        assert_eq!(classify(0x01, 0x02), None);
    }

    #[test]
    fn test_encode_character() {
        assert_eq!(encode_character('A'), Some(CharCode::Single(0x41)));
        assert_eq!(encode_character('á'), Some(CharCode::Single(0x2A)));
        assert_eq!(encode_character('♪'), Some(CharCode::Special(0x11, 0x37)));
        assert_eq!(encode_character('*'), Some(CharCode::Extended(0x12, 0x28)));
        assert_eq!(encode_character('\\'), Some(CharCode::Extended(0x13, 0x2B)));
        assert_eq!(encode_character('€'), None);
        assert_eq!(encode_character('`'), None);
    }

    #[test]
    fn test_extended_fallback_is_standard() {
        for c in EXTENDED_SPANISH_FRENCH
            .iter()
            .chain(EXTENDED_PORTUGUESE_GERMAN.iter())
        {
            let base = extended_fallback(*c);
            assert!(decode_character(base).is_some(), "{c}");
        }
    }

    #[test]
    fn test_preamble_rows() {
        assert_eq!(preamble_for_row(15), Some((0x94, 0x70)));
        assert_eq!(preamble_for_row(1), Some((0x91, 0xd0)));
        assert_eq!(preamble_for_row(0), None);
        assert_eq!(preamble_for_row(16), None);
        for row in 1..=ROW_COUNT {
            let (hi, lo) = preamble_for_row(row).unwrap();
            let word = format!("{hi:02x}{lo:02x}");
            let (b1, b2) = parse_word(&word).unwrap();
            assert!(matches!(
                classify(b1, b2),
                Some(Code::Command(Command::Preamble { italic: false }))
            ));
        }
    }
}
