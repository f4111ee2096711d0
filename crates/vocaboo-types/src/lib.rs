pub mod progress;
pub mod types;
pub mod word;

pub use progress::{HISTORY_CAPACITY, HistoryEntry, ProgressAggregate};
pub use types::*;
pub use word::{WordId, WordPair, WordStats};
