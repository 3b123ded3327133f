pub mod error;
pub mod summary_repository;

pub use error::PersistenceError;
pub use summary_repository::{
    InMemorySummaryRepository, JsonLinesSummaryRepository, StoredSummary, SummaryRepository,
};
