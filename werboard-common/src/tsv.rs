//! Header-less two-column TSV reader shared by reference imports and uploads

use crate::{Error, Result};

/// One non-blank line split at its first tab
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TsvRecord<'a> {
    /// 1-based line number in the source text
    pub line: usize,
    pub id: &'a str,
    /// Second column, `None` when the line has no tab at all
    pub text: Option<&'a str>,
}

/// Decode uploaded bytes as UTF-8, dropping a leading byte-order mark
pub(crate) fn decode(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("File is not valid UTF-8: {}", e)))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Split `text` into records, skipping blank lines
///
/// IDs are trimmed; the second column is kept verbatim apart from the line
/// terminator. An empty ID is rejected.
pub(crate) fn records(text: &str) -> Result<Vec<TsvRecord<'_>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }

        let (id, text) = match line.split_once('\t') {
            Some((id, rest)) => (id.trim(), Some(rest)),
            None => (line.trim(), None),
        };

        if id.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Line {} has an empty ID column",
                idx + 1
            )));
        }

        out.push(TsvRecord {
            line: idx + 1,
            id,
            text,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_split_at_first_tab() {
        let recs = records("1\thello\tworld\n").unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "1");
        assert_eq!(recs[0].text, Some("hello\tworld"));
    }

    #[test]
    fn test_records_skip_blank_and_strip_crlf() {
        let recs = records("a\tx y\r\n\r\n  \nb\tz\r\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].text, Some("x y"));
        assert_eq!(recs[1].id, "b");
        assert_eq!(recs[1].line, 4);
    }

    #[test]
    fn test_records_missing_second_column() {
        let recs = records(" 7 \n").unwrap();
        assert_eq!(recs[0].id, "7");
        assert_eq!(recs[0].text, None);
    }

    #[test]
    fn test_records_reject_empty_id() {
        let err = records("1\tok\n\tno id\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_decode_strips_bom_and_rejects_binary() {
        assert_eq!(decode(b"\xef\xbb\xbf1\ta").unwrap(), "1\ta");
        assert!(matches!(decode(&[0xff, 0xfe, 0x00]), Err(Error::InvalidInput(_))));
    }
}
