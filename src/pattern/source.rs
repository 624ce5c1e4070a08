// Tue Jan 13 2026 - Alex

use crate::pattern::error::PatternError;
use std::fs;
use std::path::Path;

/// Reads template text from a file.
///
/// Transcriptions are often saved by whatever editor was at hand, so the
/// reader accepts UTF-8 (with or without BOM) and UTF-16 with a BOM. Anything
/// else is decoded lossily; tokens only need to compare equal to each other.
pub struct PatternSource;

impl PatternSource {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<String, PatternError> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| PatternError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let text = Self::decode(&raw);
        let line = Self::first_line(&text).ok_or_else(|| {
            PatternError::InvalidTemplate(format!("{} contains no template", path.display()))
        })?;

        log::debug!("Read template from {}: {:?}", path.display(), line);
        Ok(line.to_string())
    }

    pub fn decode(raw: &[u8]) -> String {
        match raw {
            [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
            [0xFF, 0xFE, rest @ ..] => Self::decode_utf16(rest, u16::from_le_bytes),
            [0xFE, 0xFF, rest @ ..] => Self::decode_utf16(rest, u16::from_be_bytes),
            _ => String::from_utf8_lossy(raw).into_owned(),
        }
    }

    fn decode_utf16(raw: &[u8], unit: fn([u8; 2]) -> u16) -> String {
        let units = raw.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    /// First line that has at least one token.
    pub fn first_line(text: &str) -> Option<&str> {
        text.lines().map(str::trim).find(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_utf8_bom() {
        let raw = [0xEF, 0xBB, 0xBF, b'A', b' ', b'B'];
        assert_eq!(PatternSource::decode(&raw), "A B");
    }

    #[test]
    fn test_decode_utf16() {
        let text = "あ い あ";
        let mut le = vec![0xFF, 0xFE];
        let mut be = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            le.extend_from_slice(&unit.to_le_bytes());
            be.extend_from_slice(&unit.to_be_bytes());
        }

        assert_eq!(PatternSource::decode(&le), text);
        assert_eq!(PatternSource::decode(&be), text);
    }

    #[test]
    fn test_first_line_skips_blank() {
        assert_eq!(PatternSource::first_line("\n  \r\n A B A \nC"), Some("A B A"));
        assert_eq!(PatternSource::first_line(" \n\t\n"), None);
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\nド ラ ド").unwrap();

        assert_eq!(PatternSource::read(file.path()).unwrap(), "ド ラ ド");
    }

    #[test]
    fn test_read_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = PatternSource::read(file.path()).unwrap_err();
        assert!(matches!(err, PatternError::InvalidTemplate(_)));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PatternSource::read(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, PatternError::Unreadable { .. }));
    }
}
