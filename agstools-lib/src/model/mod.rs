//! Typed models

mod definition;
pub(crate) mod edit;
mod feature;

pub use definition::*;
pub use edit::EditError;
pub use edit::EditResult;
pub use feature::*;
