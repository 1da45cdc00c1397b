//! Feature query builder.

use tracing::debug;

use crate::error::ConfigError;
use crate::error::Error;
use crate::model::FeatureCollection;
use crate::FeatureLayerClient;

use super::OutFields;
use super::pages::FeaturePages;

/// Builder for a layer query.
///
/// Use [`FeatureLayerClient::query`] to create one. Defaults: `where 1=1`,
/// all fields, geometry included, server-default page size.
///
/// # Example
///
/// ```ignore
/// let features = client.query()
///     .where_clause("STATUS = 'ACTIVE'")
///     .out_fields("PARCEL_ID, OWNER")
///     .order_by("OBJECTID")
///     .page_size(500)
///     .collect()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct FeatureQuery<'a> {
    client: &'a FeatureLayerClient,
    where_clause: String,
    out_fields: OutFields,
    page_size: Option<u32>,
    return_geometry: bool,
    order_by_fields: Option<String>,
    out_sr: Option<u32>,
}

impl<'a> FeatureQuery<'a> {
    /// Creates a new query selecting every feature.
    pub(crate) fn new(client: &'a FeatureLayerClient) -> Self {
        Self {
            client,
            where_clause: "1=1".to_string(),
            out_fields: OutFields::All,
            page_size: None,
            return_geometry: true,
            order_by_fields: None,
            out_sr: None,
        }
    }

    /// Sets the filter predicate in the server's SQL-like syntax.
    pub fn where_clause(mut self, predicate: impl Into<String>) -> Self {
        self.where_clause = predicate.into();
        self
    }

    /// Sets which fields to return.
    pub fn out_fields(mut self, fields: impl Into<OutFields>) -> Self {
        self.out_fields = fields.into();
        self
    }

    /// Sets the number of records requested per page.
    ///
    /// The server never returns more than its `maxRecordCount`; when it caps a
    /// page it sets `exceededTransferLimit` and paging continues regardless.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Includes or omits geometries. Defaults to `true`.
    pub fn return_geometry(mut self, enabled: bool) -> Self {
        self.return_geometry = enabled;
        self
    }

    /// Sets `orderByFields`, e.g. `"OBJECTID ASC"`.
    ///
    /// Ordering by a unique field keeps page boundaries stable across requests.
    pub fn order_by(mut self, fields: impl Into<String>) -> Self {
        self.order_by_fields = Some(fields.into());
        self
    }

    /// Sets the output spatial reference (WKID).
    pub fn out_sr(mut self, wkid: u32) -> Self {
        self.out_sr = Some(wkid);
        self
    }

    pub(crate) fn client(&self) -> &'a FeatureLayerClient {
        self.client
    }

    pub(crate) fn page_size_value(&self) -> Option<u32> {
        self.page_size
    }

    /// Form parameters for the page starting at `offset`.
    pub(crate) fn form_params(&self, offset: u64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("where", self.where_clause.clone()),
            ("outFields", self.out_fields.to_param()),
            ("returnGeometry", self.return_geometry.to_string()),
            ("resultOffset", offset.to_string()),
        ];

        if let Some(size) = self.page_size {
            params.push(("resultRecordCount", size.to_string()));
        }

        if let Some(order) = &self.order_by_fields {
            params.push(("orderByFields", order.clone()));
        }

        if let Some(wkid) = self.out_sr {
            params.push(("outSR", wkid.to_string()));
        }

        params
    }

    /// Turns the query into a page iterator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the page size is zero.
    pub fn into_pages(self) -> Result<FeaturePages<'a>, Error> {
        if let Some(0) = self.page_size {
            return Err(ConfigError::InvalidPageSize(0).into());
        }
        Ok(FeaturePages::new(self))
    }

    /// Fetches every page and concatenates the features in order.
    ///
    /// All-or-nothing: if any page fails, the pages already received are
    /// dropped and the error is returned.
    pub async fn collect(self) -> Result<FeatureCollection, Error> {
        let mut pages = self.into_pages()?;
        let mut features = FeatureCollection::new();

        while let Some(page) = pages.next().await {
            features.extend(page?.into_features());
        }

        debug!(
            pages = pages.pages_fetched(),
            features = features.len(),
            "query complete"
        );
        Ok(features)
    }
}

// =============================================================================
// Convenience query methods on FeatureLayerClient
// =============================================================================

impl FeatureLayerClient {
    /// Starts building a query against this layer.
    pub fn query(&self) -> FeatureQuery<'_> {
        FeatureQuery::new(self)
    }

    /// Returns every feature matching `where_clause`, paging as needed.
    ///
    /// `fields` is `"*"` or a field list; `page_size` overrides the number of
    /// records requested per page (server default when `None`).
    ///
    /// # Errors
    ///
    /// - [`Error::Query`] if the server rejects the query (e.g. bad `where`)
    /// - [`Error::Authentication`] if the token is rejected on any page
    /// - [`Error::Transport`] if any page request fails
    /// - [`Error::Protocol`] if any page cannot be parsed
    ///
    /// No partial result is returned on failure.
    pub async fn query_features_batch(
        &self,
        where_clause: &str,
        fields: impl Into<OutFields>,
        page_size: Option<u32>,
    ) -> Result<FeatureCollection, Error> {
        let mut query = self.query().where_clause(where_clause).out_fields(fields);
        if let Some(size) = page_size {
            query = query.page_size(size);
        }
        query.collect().await
    }
}
