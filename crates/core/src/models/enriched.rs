use crate::models::ScannedRecord;
use lensmerge_engine::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;

/// Column under which the resolved card name is attached.
pub const NAME_COLUMN: &str = "name";

/// A scanned row with its card name attached.
///
/// `name` is `None` when the card identifier is missing or has no entry in
/// the name table.
/// That is a normal outcome (e.g. a card newer than the catalogue), not an
/// error.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedRecord {
    record: ScannedRecord,
    name: Option<String>,
}

impl EnrichedRecord {
    pub fn new(record: ScannedRecord, name: Option<String>) -> Self {
        Self { record, name }
    }

    pub fn record(&self) -> &ScannedRecord {
        &self.record
    }

    pub fn card(&self) -> Option<i64> {
        self.record.card()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_matched(&self) -> bool {
        self.name.is_some()
    }

    /// Output columns: every scanned column in order, then [`NAME_COLUMN`].
    ///
    /// If the scanned row already has a column called `name`, the resolved
    /// name takes its place instead of being appended, so each column name
    /// still appears once.
    pub fn columns(&self) -> Vec<(&str, Cow<'_, Value>)> {
        let name = Value::from(self.name.clone());
        let mut columns: Vec<_> = self.record.columns().map(|(column, value)| (column, Cow::Borrowed(value))).collect();
        match columns.iter_mut().find(|(column, _)| *column == NAME_COLUMN) {
            Some(slot) => slot.1 = Cow::Owned(name),
            None => columns.push((NAME_COLUMN, Cow::Owned(name))),
        }
        columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.record.columns().map(|(column, _)| column).collect();
        if !names.contains(&NAME_COLUMN) {
            names.push(NAME_COLUMN);
        }
        names
    }
}

impl Serialize for EnrichedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (name, value) in &columns {
            map.serialize_entry(name, value.as_ref())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_appended() {
        let record = EnrichedRecord::new(ScannedRecord::new(1, [("slot", "A")]), Some("Ace".to_string()));
        assert_eq!(record.column_names(), ["card", "slot", "name"]);
        assert_eq!(record.columns()[2].1.as_ref(), &Value::Text("Ace".to_string()));
        assert!(record.is_matched());
    }

    #[test]
    fn test_unmatched_name_is_null() {
        let record = EnrichedRecord::new(ScannedRecord::new(3, [("slot", "B")]), None);
        assert_eq!(record.name(), None);
        assert!(!record.is_matched());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"card":3,"slot":"B","name":null}"#);
    }

    #[test]
    fn test_existing_name_column_is_replaced_in_place() {
        let scanned = ScannedRecord::new(2, [("name", Value::Integer(99)), ("slot", Value::from("C"))]);
        let record = EnrichedRecord::new(scanned, Some("King".to_string()));
        assert_eq!(record.column_names(), ["card", "name", "slot"]);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"card":2,"name":"King","slot":"C"}"#);
        // The scanned record itself is untouched.
        assert_eq!(record.record().get("name"), Some(&Value::Integer(99)));
    }
}
