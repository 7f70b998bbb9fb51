//! Result-set assembly.
//!
//! Scan and query results are streamed into a single JSON array of
//! `{"Key": <key>, "Record": <stored bytes>}` objects, in iteration order.

use hvac_state::{QueryResultEntry, StateResult};
use tracing::debug;

use crate::error::ContractResult;

/// Drain `entries` into one JSON array buffer.
///
/// `entries` is consumed; it is dropped (and its store cursor released) on
/// return, including when an entry fails and the partial buffer is thrown
/// away. Record bytes are written verbatim: they are already JSON.
pub fn assemble_results<I>(entries: I) -> ContractResult<Vec<u8>>
where
    I: IntoIterator<Item = StateResult<QueryResultEntry>>,
{
    let mut buffer = Vec::new();
    let mut count = 0usize;

    buffer.push(b'[');
    for entry in entries {
        let entry = entry?;
        if count > 0 {
            buffer.push(b',');
        }
        buffer.extend_from_slice(br#"{"Key":"#);
        serde_json::to_writer(&mut buffer, &entry.key)?;
        buffer.extend_from_slice(br#", "Record":"#);
        buffer.extend_from_slice(&entry.value);
        buffer.push(b'}');
        count += 1;
    }
    buffer.push(b']');

    debug!(entries = count, bytes = buffer.len(), "result set assembled");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use hvac_state::StateError;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::ContractError;

    fn entry(key: &str, value: &str) -> StateResult<QueryResultEntry> {
        Ok(QueryResultEntry {
            key: key.to_string(),
            value: value.as_bytes().to_vec(),
        })
    }

    /// Yields the given items and records when it is dropped.
    struct Cursor {
        items: std::vec::IntoIter<StateResult<QueryResultEntry>>,
        released: Rc<Cell<bool>>,
    }

    impl Iterator for Cursor {
        type Item = StateResult<QueryResultEntry>;

        fn next(&mut self) -> Option<Self::Item> {
            self.items.next()
        }
    }

    impl Drop for Cursor {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    #[test]
    fn empty_source_yields_empty_array() {
        let out = assemble_results(Vec::<StateResult<QueryResultEntry>>::new()).unwrap();
        assert_eq!(out, b"[]");
    }

    #[test]
    fn single_entry_has_no_separator() {
        let out = assemble_results(vec![entry("Maintenance0", r#"{"a":1}"#)]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[{"Key":"Maintenance0", "Record":{"a":1}}]"#
        );
    }

    #[test]
    fn n_entries_have_n_minus_one_separators() {
        let entries: Vec<_> = (0..5)
            .map(|i| entry(&format!("k{i}"), &i.to_string()))
            .collect();
        let out = String::from_utf8(assemble_results(entries).unwrap()).unwrap();

        // Values are bare numbers, so every comma outside the objects is a separator.
        assert_eq!(out.matches("},{").count(), 4);
        assert!(!out.contains(",]"));

        let parsed: Value = serde_json::from_str(&out).unwrap();
        let keys: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["Key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, ["k0", "k1", "k2", "k3", "k4"]);
    }

    #[test]
    fn record_bytes_are_embedded_as_json() {
        let out = assemble_results(vec![
            entry("a", r#"{"Building Id":"500A"}"#),
            entry("b", r#"{"Building Id":"400C"}"#),
        ])
        .unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"Key": "a", "Record": {"Building Id": "500A"}},
                {"Key": "b", "Record": {"Building Id": "400C"}},
            ])
        );
    }

    #[test]
    fn keys_with_quotes_stay_valid_json() {
        let out = assemble_results(vec![entry(r#"odd"key\"#, "{}")]).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["Key"], r#"odd"key\"#);
    }

    #[test]
    fn cursor_released_after_full_drain() {
        let released = Rc::new(Cell::new(false));
        let cursor = Cursor {
            items: vec![entry("a", "{}")].into_iter(),
            released: released.clone(),
        };
        assemble_results(cursor).unwrap();
        assert!(released.get());
    }

    #[test]
    fn mid_scan_failure_aborts_and_releases() {
        let released = Rc::new(Cell::new(false));
        let cursor = Cursor {
            items: vec![
                entry("a", "{}"),
                Err(StateError::Read("cursor broke".to_string())),
                entry("c", "{}"),
            ]
            .into_iter(),
            released: released.clone(),
        };

        let err = assemble_results(cursor).unwrap_err();
        assert!(matches!(err, ContractError::Store(StateError::Read(_))));
        assert_eq!(err.to_string(), "read error: cursor broke");
        assert!(released.get());
    }
}
