//! Layer REST operations

mod definition;
mod edit;
pub mod query;

pub use edit::DEFAULT_ADD_BATCH_SIZE;
