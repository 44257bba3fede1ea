use crate::db::kv_store::KeyValueStore;
use crate::error::{TrackerError, TrackerResult};
use crate::models::period::{is_period_data_key, parse_storage_key};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const INVALID_FORMAT: &str = "Invalid data format";

/// The parts of an export document that get written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDocument {
    pub transactions: Map<String, Value>,
    pub income: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub removed: usize,
    pub written: usize,
}

pub fn read_import_file(path: &Path) -> TrackerResult<String> {
    fs::read_to_string(path).map_err(|source| TrackerError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Requires `transactions` and `income` objects at the top level; other
/// fields (`version`, `exportDate`) are not checked.
pub fn parse_import_document(text: &str) -> TrackerResult<ImportDocument> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| TrackerError::validation(format!("{}: {}", INVALID_FORMAT, e)))?;

    let mut root = match value {
        Value::Object(root) => root,
        _ => return Err(TrackerError::validation(INVALID_FORMAT)),
    };
    match (root.remove("transactions"), root.remove("income")) {
        (Some(Value::Object(transactions)), Some(Value::Object(income))) => {
            Ok(ImportDocument { transactions, income })
        }
        _ => Err(TrackerError::validation(INVALID_FORMAT)),
    }
}

/// Replaces all period data with the document's. Not atomic: a failed write
/// leaves the keys removed or written so far as they are.
pub fn apply_import(store: &dyn KeyValueStore, document: &ImportDocument) -> TrackerResult<ImportSummary> {
    let mut summary = ImportSummary { removed: 0, written: 0 };

    for key in store.list_keys()? {
        if is_period_data_key(&key) {
            store.remove(&key)?;
            summary.removed += 1;
        }
    }

    for (key, value) in document.transactions.iter().chain(document.income.iter()) {
        if parse_storage_key(key).is_none() {
            warn!(key = %key, "importing key that does not name a period");
        }
        let json = serde_json::to_string(value)?;
        store.set(key, &json)?;
        summary.written += 1;
    }

    info!(removed = summary.removed, written = summary.written, "imported data");
    Ok(summary)
}

pub fn import_from_file(store: &dyn KeyValueStore, path: &Path) -> TrackerResult<ImportSummary> {
    let text = read_import_file(path)?;
    let document = parse_import_document(&text)?;
    apply_import(store, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::db::income_store::set_income;
    use crate::db::kv_store::{SqliteStore, test_store};
    use crate::db::transaction_store::{add_transaction, sample_transaction};
    use crate::models::period::Period;
    use crate::operations::export::{build_export, write_export};
    use chrono::{Month, Utc};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(contents: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().expect("Failed to create temp file");
        write!(tmp, "{}", contents).expect("Failed to write test JSON");
        tmp
    }

    fn snapshot(store: &SqliteStore) -> Vec<(String, String)> {
        store
            .list_keys()
            .unwrap()
            .into_iter()
            .map(|k| {
                let v = store.get(&k).unwrap().unwrap();
                (k, v)
            })
            .collect()
    }

    #[test]
    fn test_parse_requires_both_sections() {
        let missing_income = parse_import_document(r#"{"transactions": {}}"#);
        assert_eq!(missing_income.unwrap_err().to_string(), "Invalid data format");

        let wrong_type = parse_import_document(r#"{"transactions": [], "income": {}}"#);
        assert_eq!(wrong_type.unwrap_err().to_string(), "Invalid data format");

        let not_object = parse_import_document("[1, 2]");
        assert!(matches!(not_object, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = parse_import_document("{ not json");
        assert!(result.unwrap_err().to_string().starts_with("Invalid data format: "));
    }

    #[test]
    fn test_apply_replaces_period_data_and_keeps_theme() {
        let store = test_store();
        store.set("transactions-January-2025", "[]").unwrap();
        store.set("income-January-2025", "10").unwrap();
        store.set("theme", "dark").unwrap();

        let document = parse_import_document(
            r#"{"version":"2.0","transactions":{"transactions-March-2024":[{"id":9,"description":"Tea","category":"Food","amount":2.5,"date":"2024-03-02","timestamp":"2024-03-02T10:00:00.000Z"}]},"income":{"income-March-2024":800}}"#,
        )
        .unwrap();
        let summary = apply_import(&store, &document).unwrap();

        assert_eq!(summary, ImportSummary { removed: 2, written: 2 });
        assert_eq!(
            store.list_keys().unwrap(),
            vec!["income-March-2024", "theme", "transactions-March-2024"]
        );
        assert_eq!(store.get("income-March-2024").unwrap().as_deref(), Some("800"));

        let imported = crate::db::transaction_store::list_transactions(
            &store,
            &Period::new(Month::March, 2024),
        )
        .unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].description, "Tea");
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let source = test_store();
        let january = Period::new(Month::January, 2025);
        let february = Period::new(Month::February, 2025);
        add_transaction(&source, &january, sample_transaction(1, "Food", 12, 4)).unwrap();
        add_transaction(&source, &january, sample_transaction(2, "Housing", 900, 1)).unwrap();
        add_transaction(&source, &february, sample_transaction(3, "Bills", 75, 9)).unwrap();
        set_income(&source, &january, Decimal::new(250050, 2)).unwrap();
        set_income(&source, &february, Decimal::from(1800)).unwrap();
        let original = snapshot(&source);

        let document = build_export(&source, Utc::now()).unwrap();
        let file = NamedTempFile::new().unwrap();
        write_export(&document, file.path()).unwrap();

        let target = test_store();
        target.set("income-July-2030", "5").unwrap();
        import_from_file(&target, file.path()).unwrap();

        assert_eq!(snapshot(&target), original);
    }

    #[test]
    fn test_round_trip_keeps_exact_number_text() {
        let source = test_store();
        source.set("income-March-2025", "100000000000000000000").unwrap();
        source.set("income-April-2025", "1234.56789012345678901").unwrap();
        source
            .set(
                "transactions-March-2025",
                r#"[{"id":1,"description":"Bonds","category":"Miscellaneous","amount":5e28,"date":"2025-03-01","timestamp":"2025-03-01T00:00:00Z"}]"#,
            )
            .unwrap();
        let original = snapshot(&source);

        let file = NamedTempFile::new().unwrap();
        write_export(&build_export(&source, Utc::now()).unwrap(), file.path()).unwrap();
        let target = test_store();
        import_from_file(&target, file.path()).unwrap();

        assert_eq!(snapshot(&target), original);
        assert_eq!(
            target.get("income-March-2025").unwrap().as_deref(),
            Some("100000000000000000000")
        );
    }

    #[test]
    fn test_quota_hit_midway_leaves_partial_state() {
        let store = SqliteStore::new(establish_test_connection().unwrap(), 100);
        store.set("income-January-2025", "10").unwrap();
        store.set("theme", "dark").unwrap();

        let big = format!(
            r#"[{{"id":2,"description":"{}","category":"Food","amount":1,"date":"2024-04-01","timestamp":"2024-04-01T00:00:00Z"}}]"#,
            "x".repeat(200)
        );
        let document = parse_import_document(&format!(
            r#"{{"transactions":{{"transactions-March-2024":[],"transactions-April-2024":{}}},"income":{{"income-April-2024":5}}}}"#,
            big
        ))
        .unwrap();

        let result = apply_import(&store, &document);
        match result {
            Err(TrackerError::StorageQuotaExceeded { key, quota, .. }) => {
                assert_eq!(key, "transactions-April-2024");
                assert_eq!(quota, 100);
            }
            other => panic!("expected quota error, got {:?}", other),
        }
        // Old period data is gone, keys before the failing one were written.
        assert_eq!(store.list_keys().unwrap(), vec!["theme", "transactions-March-2024"]);
        assert_eq!(store.get("transactions-March-2024").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_import_from_file_invalid_document_changes_nothing() {
        let store = test_store();
        store.set("income-January-2025", "10").unwrap();

        let tmp = write_temp_json(r#"{"transactions": {}}"#);
        let result = import_from_file(&store, tmp.path());

        assert!(matches!(result, Err(TrackerError::Validation(_))));
        assert_eq!(store.get("income-January-2025").unwrap().as_deref(), Some("10"));
    }

    #[test]
    fn test_import_nonexistent_file() {
        let store = test_store();
        let result = import_from_file(&store, Path::new("nonexistent-finance-data.json"));

        match result {
            Err(TrackerError::FileRead { path, .. }) => {
                assert_eq!(path, Path::new("nonexistent-finance-data.json"))
            }
            other => panic!("expected file read error, got {:?}", other),
        }
    }
}
