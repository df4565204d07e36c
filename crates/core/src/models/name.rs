/// A resolved card name from the archive's catalogue.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameRecord {
    pub id: i64,
    pub name: String,
}

impl NameRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}
