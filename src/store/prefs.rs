//! # Preference Store
//!
//! A small persisted record holding sticky cross-session defaults —
//! currently the last-used date format. Updates are an atomic
//! read-merge-write over the persisted JSON object: only the field being
//! changed is touched, so unknown or future preference fields survive the
//! round trip untouched (forward compatibility).
//!
//! Load failures degrade to defaults silently; preferences are never worth
//! crashing over.

use serde::{Deserialize, Serialize};

use super::{PREFERENCES_KEY, StorageBackend};
use crate::card::DateFormat;
use crate::error::QuoteSnapError;

/// Sticky cross-session defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub date_format: DateFormat,
}

/// Read the preference record, degrading to defaults on any failure.
pub fn load<B: StorageBackend>(backend: &B) -> Preferences {
    let raw = match backend.read(PREFERENCES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Preferences::default(),
        Err(e) => {
            println!("[prefs] Failed to read preferences: {e}");
            return Preferences::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(prefs) => prefs,
        Err(e) => {
            println!("[prefs] Ignoring malformed preferences: {e}");
            Preferences::default()
        }
    }
}

/// Persist the date-format preference.
///
/// Read-merge-write: the existing record (or an empty object) is overlaid
/// with the single `dateFormat` field and written back as a union, never
/// truncating unrelated fields.
pub fn store_date_format<B: StorageBackend>(
    backend: &mut B,
    format: DateFormat,
) -> Result<(), QuoteSnapError> {
    let mut record = match backend.read(PREFERENCES_KEY)? {
        Some(raw) => serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .filter(serde_json::Value::is_object)
            .unwrap_or_else(|| serde_json::json!({})),
        None => serde_json::json!({}),
    };

    record["dateFormat"] = serde_json::to_value(format)
        .map_err(|e| QuoteSnapError::Persistence(format!("Failed to encode preference: {e}")))?;

    backend.write(PREFERENCES_KEY, &record.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let mut backend = MemoryBackend::new();
        store_date_format(&mut backend, DateFormat::CnWeekday).unwrap();
        assert_eq!(load(&backend).date_format, DateFormat::CnWeekday);
    }

    #[test]
    fn test_defaults_when_absent_or_malformed() {
        let backend = MemoryBackend::new();
        assert_eq!(load(&backend), Preferences::default());

        let mut backend = MemoryBackend::new();
        backend.write(PREFERENCES_KEY, "not json at all").unwrap();
        assert_eq!(load(&backend).date_format, DateFormat::Iso);
    }

    #[test]
    fn test_merge_preserves_unknown_fields() {
        let mut backend = MemoryBackend::new();
        backend
            .write(
                PREFERENCES_KEY,
                r#"{"dateFormat": "cn", "colorScheme": "dusk", "volume": 7}"#,
            )
            .unwrap();

        store_date_format(&mut backend, DateFormat::DdMmYyyy).unwrap();

        let raw = backend.read(PREFERENCES_KEY).unwrap().unwrap();
        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(record["dateFormat"], "dd_mm_yyyy");
        assert_eq!(record["colorScheme"], "dusk");
        assert_eq!(record["volume"], 7);
    }

    #[test]
    fn test_unknown_stored_format_falls_back_to_iso() {
        let mut backend = MemoryBackend::new();
        backend
            .write(PREFERENCES_KEY, r#"{"dateFormat": "stardate"}"#)
            .unwrap();
        assert_eq!(load(&backend).date_format, DateFormat::Iso);
    }

    #[test]
    fn test_non_object_record_is_replaced() {
        let mut backend = MemoryBackend::new();
        backend.write(PREFERENCES_KEY, "[1, 2, 3]").unwrap();
        store_date_format(&mut backend, DateFormat::Cn).unwrap();
        assert_eq!(load(&backend).date_format, DateFormat::Cn);
    }
}
