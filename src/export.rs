//! `.1pif` export parsing.
//!
//! A 1Password interchange export is a directory holding `data.1pif`. That
//! file is one JSON object per record, with records separated by marker
//! lines such as `***5642bee8-a5ff-11dc-8314-0800200c9a66***`. The file as a
//! whole is not JSON, so it is rebuilt into a JSON array before parsing.
//!
//! # Example
//!
//! ```
//! use pifpwned::export::parse_str;
//!
//! let text = "{\"title\":\"One\"}\n***5642bee8***\n{\"title\":\"Two\"}\n***5642bee8***\n";
//! let items = parse_str(text).unwrap();
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[1].title, "Two");
//! ```

use crate::error::{Error, Result};
use crate::model::Item;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Name of the data file inside an export directory.
pub const EXPORT_FILE: &str = "data.1pif";

static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*\*.*\*\*\*\s*$").expect("delimiter pattern is valid"));

/// Path of the data file for an export directory.
pub fn export_file(dir: &Path) -> PathBuf {
    dir.join(EXPORT_FILE)
}

/// Reads and parses `<dir>/data.1pif`.
///
/// # Errors
///
/// Returns [`Error::MissingExport`] if the data file does not exist, and
/// [`Error::Parse`] if the rebuilt text is not a valid JSON array of items.
pub fn parse(dir: impl AsRef<Path>) -> Result<Vec<Item>> {
    let path = export_file(dir.as_ref());

    if !path.is_file() {
        return Err(Error::MissingExport(path));
    }

    let data = fs::read_to_string(&path)?;
    let items = parse_str(&data)?;
    debug!("Parsed {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Parses the contents of a `data.1pif` file.
pub fn parse_str(data: &str) -> Result<Vec<Item>> {
    let json = to_json_array(data);
    let items: Vec<Item> = serde_json::from_str(&json)?;
    Ok(items)
}

/// Drops delimiter and blank lines, then joins the records into `[a,b,...]`.
fn to_json_array(data: &str) -> String {
    let records: Vec<&str> = data
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !DELIMITER.is_match(line))
        .collect();

    format!("[{}]", records.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MARKER: &str = "***5642bee8-a5ff-11dc-8314-0800200c9a66***";

    fn export_text(records: &[&str]) -> String {
        let mut text = String::new();
        for record in records {
            text.push_str(record);
            text.push('\n');
            text.push_str(MARKER);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_preserves_record_order() {
        let text = export_text(&[
            r#"{"title":"First"}"#,
            r#"{"title":"Second"}"#,
            r#"{"title":"Third"}"#,
        ]);

        let items = parse_str(&text).unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_delimiters_never_leak_into_values() {
        let text = export_text(&[
            r#"{"title":"A","secureContents":{"fields":[{"designation":"password","value":"x"}]}}"#,
            r#"{"title":"B","location":"https://b.example"}"#,
        ]);

        let items = parse_str(&text).unwrap();
        assert_eq!(items.len(), 2);
        for item in &items {
            let json = serde_json::to_string(item).unwrap();
            assert!(!json.contains("***"));
        }
    }

    #[test]
    fn test_parse_tolerates_crlf_and_trailing_whitespace() {
        let text = format!(
            "{{\"title\":\"A\"}}\r\n{}  \r\n\r\n{{\"title\":\"B\"}}\r\n{}\r\n",
            MARKER, MARKER
        );
        let items = parse_str(&text).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_parse_empty_export() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str(&format!("{}\n", MARKER)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_record() {
        let text = export_text(&[r#"{"title":"A""#]);
        assert!(matches!(parse_str(&text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_reads_data_file_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(EXPORT_FILE),
            export_text(&[r#"{"title":"On disk"}"#]),
        )
        .unwrap();

        let items = parse(dir.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "On disk");
    }

    #[test]
    fn test_parse_missing_export() {
        let dir = TempDir::new().unwrap();
        match parse(dir.path()) {
            Err(Error::MissingExport(path)) => assert!(path.ends_with(EXPORT_FILE)),
            other => panic!("expected MissingExport, got {:?}", other),
        }
    }
}
