use crate::models::{EnrichedRecord, NameRecord, ScannedRecord};
use std::collections::HashMap;

/// Attach a resolved name to every scanned row.
///
/// The output has exactly one record per scanned row, in the same order.
/// Rows whose card has no entry in `names` get `None`. When `names` holds the
/// same id more than once, the last occurrence wins. Rows without an integer
/// card identifier are passed through unmatched.
pub fn merge(names: &[NameRecord], scanned: &[ScannedRecord]) -> Vec<EnrichedRecord> {
    let lookup: HashMap<i64, &str> = names.iter().map(|record| (record.id, record.name.as_str())).collect();
    scanned
        .iter()
        .map(|record| {
            let name = record.card().and_then(|card| lookup.get(&card)).map(|name| (*name).to_string());
            EnrichedRecord::new(record.clone(), name)
        })
        .collect()
}

/// Match counts over a merged record set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl From<&[EnrichedRecord]> for MergeStats {
    fn from(records: &[EnrichedRecord]) -> Self {
        let matched = records.iter().filter(|record| record.is_matched()).count();
        Self { total: records.len(), matched, unmatched: records.len() - matched }
    }
}
