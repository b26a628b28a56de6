use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use thiserror::Error;

const BUNDLED_NAME: &str = "<bundled us_zips.txt>";
const BUNDLED: &str = include_str!("../../data/us_zips.txt");

#[derive(Debug, Error)]
pub enum ZipTableError {
    #[error("reading zip table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("zip table {path} line {line}: invalid zip code {value:?}")]
    InvalidEntry {
        path: PathBuf,
        line: usize,
        value: String,
    },
    #[error("zip table {0} contains no zip codes")]
    Empty(PathBuf),
}

/// Set of valid zip codes, held as sorted, non-overlapping inclusive ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct ZipTable {
    ranges: Vec<RangeInclusive<u32>>,
}

impl ZipTable {
    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self, ZipTableError> {
        Self::parse(Path::new(BUNDLED_NAME), BUNDLED)
    }

    /// Loads a table with one zip (or `lo-hi` range) per line, or CSV with
    /// the zip in the first column. Lines whose first column is not numeric
    /// (headers, `#` comments) are skipped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ZipTableError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ZipTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, ZipTableError> {
        let mut ranges = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            let first = line
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .trim_matches('"');
            if first.is_empty() || !first.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            let range = parse_entry(first).ok_or_else(|| ZipTableError::InvalidEntry {
                path: path.to_path_buf(),
                line: idx + 1,
                value: first.to_string(),
            })?;
            ranges.push(range);
        }
        if ranges.is_empty() {
            return Err(ZipTableError::Empty(path.to_path_buf()));
        }
        Ok(Self {
            ranges: merge(ranges),
        })
    }

    pub fn contains(&self, zip: &str) -> bool {
        let Some(code) = parse_zip(zip) else {
            return false;
        };
        let idx = self.ranges.partition_point(|r| *r.start() <= code);
        idx > 0 && self.ranges[idx - 1].contains(&code)
    }

    /// Number of distinct codes in the table.
    pub fn code_count(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| (r.end() - r.start() + 1) as usize)
            .sum()
    }
}

fn parse_entry(entry: &str) -> Option<RangeInclusive<u32>> {
    match entry.split_once('-') {
        Some((lo, hi)) => {
            let (lo, hi) = (parse_zip(lo.trim())?, parse_zip(hi.trim())?);
            (lo <= hi).then_some(lo..=hi)
        }
        None => parse_zip(entry).map(|code| code..=code),
    }
}

fn parse_zip(zip: &str) -> Option<u32> {
    if zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit()) {
        zip.parse().ok()
    } else {
        None
    }
}

fn merge(mut ranges: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    ranges.sort_by_key(|r| *r.start());
    let mut out: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match out.last_mut() {
            Some(last) if *range.start() <= last.end() + 1 => {
                let end = (*last.end()).max(*range.end());
                *last = *last.start()..=end;
            }
            _ => out.push(range),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_accepts_known_codes() {
        let table = ZipTable::bundled().unwrap();
        for zip in ["92037", "92122", "00501", "10001", "20500", "99950"] {
            assert!(table.contains(zip), "{zip:?} should be accepted");
        }
    }

    #[test]
    fn bundled_rejects_unassigned_codes_under_valid_prefixes() {
        let table = ZipTable::bundled().unwrap();
        for zip in ["90000", "99999", "99951", "00500"] {
            assert!(!table.contains(zip), "{zip:?} should be rejected");
        }
    }

    #[test]
    fn bundled_rejects_malformed_and_unassigned_prefixes() {
        let table = ZipTable::bundled().unwrap();
        for bad in ["", "9203", "920371", "9203a", "-9203", "00001", "21301", "98765 "] {
            assert!(!table.contains(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn exact_table_from_csv_skips_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zip,city,state").unwrap();
        writeln!(file, "92037,La Jolla,CA").unwrap();
        writeln!(file, "\"92122\",San Diego,CA").unwrap();
        writeln!(file).unwrap();

        let table = ZipTable::from_path(file.path()).unwrap();
        assert_eq!(table.code_count(), 2);
        assert!(table.contains("92037"));
        assert!(table.contains("92122"));
        assert!(!table.contains("10001"));
    }

    #[test]
    fn ranges_are_merged() {
        let table = ZipTable::parse(Path::new("t"), "10001-10010\n10005-10020\n10021\n").unwrap();
        assert_eq!(table.code_count(), 21);
        assert!(table.contains("10021"));
        assert!(!table.contains("10022"));
        assert!(!table.contains("10000"));
    }

    #[test]
    fn exact_table_rejects_bad_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "92037").unwrap();
        writeln!(file, "9212").unwrap();
        let err = ZipTable::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ZipTableError::InvalidEntry { line: 2, .. }));

        let err = ZipTable::parse(Path::new("t"), "92200-92100\n").unwrap_err();
        assert!(matches!(err, ZipTableError::InvalidEntry { line: 1, .. }));
    }

    #[test]
    fn exact_table_must_not_be_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zip").unwrap();
        let err = ZipTable::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ZipTableError::Empty(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ZipTable::from_path("/nonexistent/zips.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/zips.csv"));
    }
}
