mod enriched;
mod name;
mod scanned;

pub use self::enriched::{EnrichedRecord, NAME_COLUMN};
pub use self::name::NameRecord;
pub use self::scanned::{DEFAULT_KEY_COLUMN, ScannedRecord};
