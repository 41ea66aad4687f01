pub mod catalog;
pub mod error;
pub mod generator;
pub mod types;

pub use catalog::{Catalog, Preset, PresetRegistry, Templates, TopLabels};
pub use error::{Error, Result};
pub use generator::{generate, summarize, top_n, DEFAULT_BATCH_SIZE, TOP_N};
pub use types::{iso_timestamp, ArticleRecord, BatchSummary, NewsBatch, NewsPayload, TopNewsItem};

pub mod prelude {
    pub use crate::{generate, Error, NewsPayload, Preset, PresetRegistry, Result};
}
