//! ArcGIS Server REST client library
//!
//! A Rust async client for ArcGIS Server feature services: token generation,
//! paginated feature queries, layer definitions and feature edits.
//!
//! # Example
//!
//! ```ignore
//! use agstools_lib::auth::{AuthConfig, Authenticator};
//! use agstools_lib::FeatureLayerClient;
//!
//! let config = AuthConfig::builder()
//!     .token_url("https://gis.example.com/arcgis/tokens/generateToken")
//!     .username("editor")
//!     .password("secret")
//!     .build()?;
//! let token = Authenticator::new(config)?.get_token().await?;
//!
//! let layer = FeatureLayerClient::builder()
//!     .url("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0")
//!     .token(token)
//!     .build()?;
//!
//! let parcels = layer.query_features_batch("1=1", "*", Some(1000)).await?;
//! println!("{} parcels", parcels.len());
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod process;

mod client;
mod response;
mod transport;

pub use client::*;
pub use error::Error;
