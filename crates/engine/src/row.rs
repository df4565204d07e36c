use crate::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _};

/// A result row of arbitrary shape, with columns in query order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }

    /// Position of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(column, _)| column == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|index| &self.columns[index].1)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<(String, Value)> {
        self.columns
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect())
    }
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for Row {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let columns = row
            .columns()
            .iter()
            .map(|column| Ok((column.name().to_string(), Value::decode(row, column.ordinal())?)))
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(Self { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        [("_id", Value::Integer(1)), ("card", Value::Integer(42)), ("condition", Value::from("NM"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_lookup_by_name() {
        let row = row();
        assert_eq!(row.len(), 3);
        assert_eq!(row.position("card"), Some(1));
        assert_eq!(row.get("condition"), Some(&Value::Text("NM".to_string())));
        assert_eq!(row.get("name"), None);
    }

    #[test]
    fn test_first_duplicate_column_wins() {
        let row: Row = [("id", 1_i64), ("id", 2_i64)].into_iter().collect();
        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
    }
}
