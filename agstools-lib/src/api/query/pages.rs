//! Async iterator for paginated layer queries.

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::model::Feature;
use crate::response::decode_layer_body;

use super::builder::FeatureQuery;
use super::Page;

/// Decides whether a page ends the query.
///
/// - A page with no features is always the last one.
/// - Otherwise more records remain if the server set `exceededTransferLimit`
///   or the page is full (`received >= requested`).
/// - Without a requested size only the server flag can signal more records.
pub fn is_last_page(received: usize, requested: Option<u32>, exceeded_transfer_limit: bool) -> bool {
    if received == 0 {
        return true;
    }
    if exceeded_transfer_limit {
        return false;
    }
    match requested {
        Some(limit) => received < limit as usize,
        None => true,
    }
}

/// Async iterator that yields the pages of a [`FeatureQuery`].
///
/// Each request is sent only after the previous page has been received;
/// `resultOffset` advances by the number of features actually returned. After
/// the last page, or after the first error, `next` returns `None`. The
/// iterator cannot be rewound: build the query again to start over.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.query().page_size(1000).into_pages()?;
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     for feature in page.features() {
///         println!("{:?}", feature.get("OBJECTID"));
///     }
/// }
/// ```
#[derive(Debug)]
pub struct FeaturePages<'a> {
    /// The query being paged.
    query: FeatureQuery<'a>,
    /// Offset of the next page.
    offset: u64,
    /// Number of pages received so far.
    pages_fetched: usize,
    /// Whether we've exhausted all pages.
    done: bool,
}

impl<'a> FeaturePages<'a> {
    pub(crate) fn new(query: FeatureQuery<'a>) -> Self {
        Self {
            query,
            offset: 0,
            pages_fetched: 0,
            done: false,
        }
    }

    /// Returns the offset the next page will be requested at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the number of pages received so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Returns `true` once the last page has been yielded or an error occurred.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed.
    pub async fn next(&mut self) -> Option<Result<Page, Error>> {
        if self.done {
            return None;
        }

        let page = match self.fetch_page().await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        self.pages_fetched += 1;
        self.offset += page.len() as u64;

        if !page.has_more() {
            self.done = true;
        }

        debug!(
            offset = page.offset(),
            count = page.len(),
            exceeded = page.exceeded_transfer_limit(),
            done = self.done,
            "received page"
        );

        Some(Ok(page))
    }

    async fn fetch_page(&self) -> Result<Page, Error> {
        let client = self.query.client();
        let url = client.operation_url("query")?;
        let params = self.query.form_params(self.offset);

        debug!(offset = self.offset, page_size = ?self.query.page_size_value(), "requesting page");

        let body = client.post_form(url, params).await?;
        let response: QueryResponse = decode_layer_body(&body)?;

        Ok(Page::new(response.features, self.offset, self.query.page_size_value())
            .with_exceeded_transfer_limit(response.exceeded_transfer_limit))
    }
}

/// Query response structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    /// The features in this page.
    features: Vec<Feature>,
    /// Set when more records match than were returned.
    #[serde(default)]
    exceeded_transfer_limit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_is_last() {
        assert!(is_last_page(0, Some(1000), false));
        assert!(is_last_page(0, Some(1000), true));
        assert!(is_last_page(0, None, true));
    }

    #[test]
    fn test_short_page_is_last() {
        assert!(is_last_page(500, Some(1000), false));
        assert!(is_last_page(1, Some(2), false));
    }

    #[test]
    fn test_full_page_continues() {
        assert!(!is_last_page(1000, Some(1000), false));
    }

    #[test]
    fn test_exceeded_flag_continues() {
        // Server capped the page below the requested size.
        assert!(!is_last_page(1000, Some(2000), true));
        // Server default page size.
        assert!(!is_last_page(1000, None, true));
    }

    #[test]
    fn test_server_default_without_flag_is_last() {
        assert!(is_last_page(1000, None, false));
    }

    #[test]
    fn test_page_has_more() {
        let full = Page::new(vec![Feature::new(); 2], 0, Some(2));
        assert!(full.has_more());

        let short = Page::new(vec![Feature::new()], 2, Some(2));
        assert!(!short.has_more());

        let capped = Page::new(vec![Feature::new()], 0, Some(2)).with_exceeded_transfer_limit(true);
        assert!(capped.has_more());
    }
}
