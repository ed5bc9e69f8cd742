use std::fmt;

/// Text encoding of a name or comment field.
///
/// The format predates Unicode: unless general-purpose flag bit 11 marks
/// the entry as UTF-8, name bytes are in the legacy IBM code page 437.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Cp437,
}

/// A text field together with the encoding its header declared.
///
/// The raw bytes are always kept; decoding never loses information and
/// never fails. If the header claims UTF-8 but the bytes are not valid
/// UTF-8, the encoding falls back to CP437 so a structurally valid scan is
/// not aborted over a mislabelled name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipText {
    raw: Vec<u8>,
    encoding: TextEncoding,
}

impl ZipText {
    pub fn new(raw: Vec<u8>, utf8_flag: bool) -> Self {
        let encoding = if utf8_flag && std::str::from_utf8(&raw).is_ok() {
            TextEncoding::Utf8
        } else {
            TextEncoding::Cp437
        };
        Self { raw, encoding }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Decode into an owned string using the declared encoding.
    pub fn decode(&self) -> String {
        match self.encoding {
            TextEncoding::Utf8 => match std::str::from_utf8(&self.raw) {
                Ok(s) => s.to_string(),
                Err(_) => cp437_to_string(&self.raw),
            },
            TextEncoding::Cp437 => cp437_to_string(&self.raw),
        }
    }
}

impl fmt::Display for ZipText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

/// CP437 maps 0x00-0x7f to ASCII; the high half is this table.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

fn cp437_to_string(raw: &[u8]) -> String {
    raw.iter()
        .map(|&b| if b < 0x80 { b as char } else { CP437_HIGH[(b - 0x80) as usize] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_decodes_the_same_under_both_encodings() {
        assert_eq!(ZipText::new(b"a.txt".to_vec(), false).decode(), "a.txt");
        assert_eq!(ZipText::new(b"a.txt".to_vec(), true).decode(), "a.txt");
    }

    #[test]
    fn high_bytes_map_through_cp437_when_the_flag_is_unset() {
        // 0x82 is 'é' in CP437; a naive UTF-8 read would reject it.
        let text = ZipText::new(vec![b'r', 0x82, b's', b'u', b'm', 0x82], false);
        assert_eq!(text.encoding(), TextEncoding::Cp437);
        assert_eq!(text.decode(), "résumé");
    }

    #[test]
    fn utf8_flag_is_honoured() {
        let text = ZipText::new("naïve.txt".as_bytes().to_vec(), true);
        assert_eq!(text.encoding(), TextEncoding::Utf8);
        assert_eq!(text.decode(), "naïve.txt");
    }

    #[test]
    fn mislabelled_utf8_falls_back_to_cp437() {
        let text = ZipText::new(vec![0xff, 0xfe], true);
        assert_eq!(text.encoding(), TextEncoding::Cp437);
        assert_eq!(text.decode(), "\u{a0}■");
    }
}
