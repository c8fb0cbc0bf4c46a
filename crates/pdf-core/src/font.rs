//! Standard (Base-14) font handling
//!
//! Overlay text only uses the fonts every PDF viewer ships with, so nothing
//! is embedded. Text is encoded with WinAnsiEncoding, which covers the
//! Latin-1 range used by Spanish names (Á, É, Ñ, Ü...).

use lopdf::{Dictionary, Object};

/// Standard PDF fonts usable without embedding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StandardFont {
    #[default]
    Helvetica,
}

impl StandardFont {
    /// PostScript name used as `/BaseFont`
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
        }
    }

    /// Font dictionary to add to the document
    pub fn to_pdf_object(&self) -> Object {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(self.base_font().as_bytes().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        Object::Dictionary(dict)
    }

    /// Encode text as a hex string operand (e.g. `<4A55414E>`)
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 2 + 2);
        hex.push('<');
        for byte in encode_win_ansi(text) {
            hex.push_str(&format!("{byte:02X}"));
        }
        hex.push('>');
        hex
    }
}

/// Encode text with WinAnsiEncoding
///
/// Characters without a WinAnsi code are replaced by `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
        _ => match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_font_names() {
        assert_eq!(StandardFont::default().base_font(), "Helvetica");
    }

    #[test]
    fn test_font_dictionary() {
        let obj = StandardFont::Helvetica.to_pdf_object();
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
        assert_eq!(
            dict.get(b"BaseFont").unwrap().as_name().unwrap(),
            b"Helvetica"
        );
        assert_eq!(
            dict.get(b"Encoding").unwrap().as_name().unwrap(),
            b"WinAnsiEncoding"
        );
    }

    #[test]
    fn test_encode_ascii() {
        assert_eq!(encode_win_ansi("GARCIA"), b"GARCIA".to_vec());
        assert_eq!(StandardFont::Helvetica.encode_text_hex("JUAN"), "<4A55414E>");
    }

    #[test]
    fn test_encode_latin1() {
        assert_eq!(encode_win_ansi("GARCÍA"), vec![b'G', b'A', b'R', b'C', 0xCD, b'A']);
        assert_eq!(encode_win_ansi("PEÑA"), vec![b'P', b'E', 0xD1, b'A']);
    }

    #[test]
    fn test_encode_special_and_unknown() {
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(StandardFont::Helvetica.encode_text_hex(""), "<>");
    }
}
