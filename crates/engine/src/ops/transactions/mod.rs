mod search;
mod write;

pub use search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SearchPage, TransactionSearch};
