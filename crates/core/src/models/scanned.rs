use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use lensmerge_engine::{Row, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column holding the card identifier in a scanned export.
pub const DEFAULT_KEY_COLUMN: &str = "card";

/// One row of scanned data: a required card identifier column plus every
/// other column of the source row, passed through untouched.
///
/// Columns are kept in query order, with the key column at its original
/// position, so a record can be written back out exactly as it was read.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannedRecord {
    card: Option<i64>,
    key: usize,
    columns: Vec<(String, Value)>,
}

impl ScannedRecord {
    /// Build a record with a leading `card` column followed by `fields`.
    pub fn new<I, N, V>(card: i64, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Value>,
    {
        let columns = std::iter::once((DEFAULT_KEY_COLUMN.to_string(), Value::Integer(card)))
            .chain(fields.into_iter().map(|(name, value)| (name.into(), value.into())))
            .collect();
        Self { card: Some(card), key: 0, columns }
    }

    /// Take ownership of a query row, keyed on `key_column`.
    ///
    /// Returns [`ErrorKind::KeyColumn`] if the column is absent. A key cell
    /// that is `NULL` or not an integer is kept; the row simply has no card.
    pub fn from_row(row: Row, key_column: &str) -> Result<Self> {
        let key = row.position(key_column).ok_or_raise(|| ErrorKind::KeyColumn(key_column.to_string()))?;
        let card = row.columns()[key].1.as_integer();
        if card.is_none() {
            tracing::debug!(key_column, "scanned row has no integer card identifier");
        }
        Ok(Self { card, key, columns: row.into_columns() })
    }

    /// The card identifier this row refers to, if its key cell holds one.
    pub fn card(&self) -> Option<i64> {
        self.card
    }

    pub fn key_column(&self) -> &str {
        &self.columns[self.key].0
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.iter().find(|(name, _)| name == column).map(|(_, value)| value)
    }

    /// Every column, key included, in query order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Passthrough columns only (everything except the key).
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns().enumerate().filter(|(index, _)| *index != self.key).map(|(_, column)| column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for ScannedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.columns() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
