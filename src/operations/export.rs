use crate::db::kv_store::KeyValueStore;
use crate::error::{TrackerError, TrackerResult};
use crate::models::period::{INCOME_PREFIX, TRANSACTIONS_PREFIX};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_VERSION: &str = "2.0";

/// Snapshot of every period's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub transactions: Map<String, Value>,
    pub income: Map<String, Value>,
    #[serde(rename = "exportDate")]
    pub export_date: String,
    pub version: String,
}

pub fn build_export(store: &dyn KeyValueStore, now: DateTime<Utc>) -> TrackerResult<ExportDocument> {
    let mut document = ExportDocument {
        transactions: Map::new(),
        income: Map::new(),
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        version: EXPORT_VERSION.to_string(),
    };

    for key in store.list_keys()? {
        let section = if key.starts_with(TRANSACTIONS_PREFIX) {
            &mut document.transactions
        } else if key.starts_with(INCOME_PREFIX) {
            &mut document.income
        } else {
            continue;
        };

        let raw = store.get(&key)?.unwrap_or_default();
        let value = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).map_err(|e| TrackerError::corrupted(&key, e))?
        };
        section.insert(key, value);
    }

    Ok(document)
}

/// `finance-data-YYYY-MM-DD.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("finance-data-{}.json", now.format("%Y-%m-%d"))
}

pub fn write_export(document: &ExportDocument, path: &Path) -> TrackerResult<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json).map_err(|source| TrackerError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        transactions = document.transactions.len(),
        income = document.income.len(),
        "exported data"
    );
    Ok(())
}

pub fn export_to_dir(
    store: &dyn KeyValueStore,
    dir: &Path,
    now: DateTime<Utc>,
) -> TrackerResult<PathBuf> {
    let document = build_export(store, now)?;
    let path = dir.join(export_file_name(now));
    write_export(&document, &path)?;
    Ok(path)
}
