//! Attribute join: copy numeric table values onto geographic records by region key.

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::Regex;

use crate::types::{Property, Record, Row};

/// Longest numeric prefix accepted by `parse_float`, after leading whitespace.
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix pattern is valid")
});

/// Leading characters skipped by `parse_float`: Unicode white space (without NEL) plus the BOM.
fn is_leading_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Parse the leading number of `raw` the way browsers parse numeric table cells:
/// leading whitespace is skipped, trailing garbage is ignored, `Infinity` is accepted,
/// and anything without a numeric prefix is NaN.
pub fn parse_float(raw: &str) -> f64 {
    let trimmed = raw.trim_start_matches(is_leading_space);
    let Some(m) = FLOAT_PREFIX.find(trimmed) else { return f64::NAN };
    let text = m.as_str();
    match text.trim_start_matches(['+', '-']) {
        "Infinity" => if text.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY },
        _ => text.parse().unwrap_or(f64::NAN),
    }
}

/// Counts reported by `join_summary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    /// Rows that were written onto a record.
    pub matched: usize,
    /// Rows whose key matched no record.
    pub unmatched_rows: usize,
    /// Rows ignored because an earlier row already supplied the same key.
    pub duplicate_rows: usize,
}

/// Join `attributes` from `rows` into `records`, in place, and return the same records.
///
/// Every requested attribute of a matching row is parsed with `parse_float` and stored as a
/// `Property::Number`, overwriting any previous value; unparsable or empty cells store NaN.
/// Rows with no matching record are skipped. When several rows share a key only the first one
/// is applied, and when several records share a key only the first record receives values.
pub fn join<'a, S: AsRef<str>>(records: &'a mut [Record], rows: &[Row], attributes: &[S]) -> &'a mut [Record] {
    join_summary(records, rows, attributes);
    records
}

/// Same as `join`, returning match statistics instead of the records.
pub fn join_summary<S: AsRef<str>>(records: &mut [Record], rows: &[Row], attributes: &[S]) -> JoinSummary {
    let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        index.entry(record.key.as_str()).or_insert(i);
    }

    // Resolve targets first so the index's borrow of `records` ends before mutation.
    let mut summary = JoinSummary::default();
    let mut seen = vec![false; records.len()];
    let mut targets = Vec::with_capacity(rows.len());
    for row in rows {
        match index.get(row.key.as_str()) {
            Some(&i) if seen[i] => {
                summary.duplicate_rows += 1;
                tracing::debug!("[join] duplicate row for key {}; keeping the first", row.key);
            }
            Some(&i) => {
                seen[i] = true;
                summary.matched += 1;
                targets.push((i, row));
            }
            None => {
                summary.unmatched_rows += 1;
                tracing::trace!("[join] no record for key {}", row.key);
            }
        }
    }

    for (i, row) in targets {
        let record = &mut records[i];
        for attribute in attributes {
            let attribute = attribute.as_ref();
            let value = row.raw(attribute).map_or(f64::NAN, parse_float);
            record.properties.insert(attribute.to_string(), Property::Number(value));
        }
    }

    tracing::debug!(
        "[join] {} rows matched, {} unmatched, {} duplicates across {} records",
        summary.matched, summary.unmatched_rows, summary.duplicate_rows, records.len(),
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(keys: &[&str]) -> Vec<Record> {
        keys.iter().map(|k| Record::new(*k)).collect()
    }

    #[test]
    fn parse_float_prefixes() {
        assert_eq!(parse_float("10"), 10.0);
        assert_eq!(parse_float("  3.5"), 3.5);
        assert_eq!(parse_float("-2e3"), -2000.0);
        assert_eq!(parse_float("12abc"), 12.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("7."), 7.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("").is_nan());
        assert!(parse_float("n/a").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float("NaN").is_nan());
    }

    #[test]
    fn parse_float_ascii_digits_and_bom() {
        assert_eq!(parse_float("12\u{0663}"), 12.0);
        assert!(parse_float("\u{0663}").is_nan());
        assert_eq!(parse_float("\u{FEFF}5"), 5.0);
        assert_eq!(parse_float("\u{00A0}\t7"), 7.0);
        assert!(parse_float("\u{85}7").is_nan());
    }

    #[test]
    fn join_parses_requested_attributes() {
        let mut recs = records(&["A", "B"]);
        let rows = vec![
            Row::new("A").with("pop", "10").with("area", "x").with("other", "5"),
            Row::new("B").with("pop", "20.5"),
        ];

        join(&mut recs, &rows, &["pop", "area"]);

        assert_eq!(recs[0].value("pop"), 10.0);
        assert!(recs[0].value("area").is_nan());
        assert!(!recs[0].properties.contains_key("other"));
        assert_eq!(recs[1].value("pop"), 20.5);
        // Absent column still stores the missing sentinel.
        assert!(matches!(recs[1].properties.get("area"), Some(Property::Number(v)) if v.is_nan()));
    }

    #[test]
    fn join_overwrites_prior_values() {
        let mut recs = records(&["A"]);
        recs[0].set("pop", "old");
        join(&mut recs, &[Row::new("A").with("pop", "3")], &["pop"]);
        assert_eq!(recs[0].properties["pop"], Property::Number(3.0));
    }

    #[test]
    fn unmatched_rows_are_skipped() {
        let mut recs = records(&["A", "B"]);
        let rows = vec![Row::new("Z").with("pop", "99"), Row::new("A").with("pop", "1")];

        let summary = join_summary(&mut recs, &rows, &["pop"]);

        assert_eq!(summary, JoinSummary { matched: 1, unmatched_rows: 1, duplicate_rows: 0 });
        assert_eq!(recs[0].value("pop"), 1.0);
        assert!(recs[1].properties.is_empty());
    }

    #[test]
    fn first_row_wins_on_duplicate_keys() {
        let mut recs = records(&["A"]);
        let rows = vec![Row::new("A").with("pop", "1"), Row::new("A").with("pop", "2")];

        let summary = join_summary(&mut recs, &rows, &["pop"]);

        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(recs[0].value("pop"), 1.0);
    }

    #[test]
    fn only_first_record_with_key_is_joined() {
        let mut recs = records(&["A", "A"]);
        join(&mut recs, &[Row::new("A").with("pop", "4")], &["pop"]);
        assert_eq!(recs[0].value("pop"), 4.0);
        assert!(recs[1].properties.is_empty());
    }

    #[test]
    fn join_returns_same_records() {
        let mut recs = records(&["A"]);
        let out = join(&mut recs, &[Row::new("A").with("pop", "4")], &["pop"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value("pop"), 4.0);
    }
}
