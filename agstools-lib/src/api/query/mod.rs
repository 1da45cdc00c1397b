//! Feature queries with transparent pagination.
//!
//! ArcGIS caps every query response at the layer's `maxRecordCount`. A
//! [`FeatureQuery`] walks the result set with `resultOffset` /
//! `resultRecordCount`, one [`Page`] at a time, through [`FeaturePages`].
//!
//! # Example
//!
//! ```ignore
//! let mut pages = client.query()
//!     .where_clause("STATUS = 'ACTIVE'")
//!     .out_fields(["PARCEL_ID", "OWNER"])
//!     .page_size(1000)
//!     .into_pages()?;
//!
//! while let Some(page) = pages.next().await {
//!     let page = page?;
//!     println!("{} features at offset {}", page.len(), page.offset());
//! }
//! ```

mod builder;
mod fields;
mod page;
mod pages;

pub use builder::FeatureQuery;
pub use fields::OutFields;
pub use page::Page;
pub use pages::FeaturePages;
pub use pages::is_last_page;
