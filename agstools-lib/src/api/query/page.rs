//! Page type for paginated query results.

use crate::model::Feature;

/// One server response of a paginated query.
///
/// Carries the features plus what is needed to decide whether another page
/// follows: the offset it was requested at, the requested record count and
/// the server's `exceededTransferLimit` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    features: Vec<Feature>,
    offset: u64,
    requested: Option<u32>,
    exceeded_transfer_limit: bool,
}

impl Page {
    /// Creates a new page.
    pub fn new(features: Vec<Feature>, offset: u64, requested: Option<u32>) -> Self {
        Self {
            features,
            offset,
            requested,
            exceeded_transfer_limit: false,
        }
    }

    /// Sets the server's `exceededTransferLimit` flag.
    pub fn with_exceeded_transfer_limit(mut self, exceeded: bool) -> Self {
        self.exceeded_transfer_limit = exceeded;
        self
    }

    /// Returns a reference to the features in this page.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Consumes the page and returns the features.
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }

    /// Returns the `resultOffset` this page was requested at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the `resultRecordCount` sent, or `None` if the server default applied.
    pub fn requested(&self) -> Option<u32> {
        self.requested
    }

    /// Returns `true` if the server reported that more records remain.
    pub fn exceeded_transfer_limit(&self) -> bool {
        self.exceeded_transfer_limit
    }

    /// Returns `true` if this page has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the number of features in this page.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if another page should be requested after this one.
    pub fn has_more(&self) -> bool {
        !super::is_last_page(self.len(), self.requested, self.exceeded_transfer_limit)
    }
}
