pub mod config;
pub mod journal_entry;
pub mod journal_store;
pub mod logging;
pub mod mood_trend;
pub mod quotes;
pub mod storage;
