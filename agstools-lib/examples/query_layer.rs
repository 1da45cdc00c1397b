//! Token + paginated query example.
//!
//! Run with: RUST_LOG=agstools_lib=debug cargo run --example query_layer
//!
//! Requires .env file with:
//! - ARCGIS_TOKEN_URL
//! - ARCGIS_USERNAME
//! - ARCGIS_PASSWORD
//! - ARCGIS_LAYER_URL
//! - ARCGIS_CERTIFICATE (optional PEM trust bundle)
//! - ARCGIS_WHERE (optional, defaults to `1=1`)

use std::env;
use std::path::PathBuf;

use agstools_lib::auth::get_token;
use agstools_lib::FeatureLayerClient;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let token_url = env::var("ARCGIS_TOKEN_URL").expect("ARCGIS_TOKEN_URL not set");
    let username = env::var("ARCGIS_USERNAME").expect("ARCGIS_USERNAME not set");
    let password = env::var("ARCGIS_PASSWORD").expect("ARCGIS_PASSWORD not set");
    let layer_url = env::var("ARCGIS_LAYER_URL").expect("ARCGIS_LAYER_URL not set");
    let certificate = env::var("ARCGIS_CERTIFICATE").ok().map(PathBuf::from);
    let where_clause = env::var("ARCGIS_WHERE").unwrap_or_else(|_| "1=1".to_string());

    println!("Requesting token...\n");

    let token = get_token(&token_url, &username, &password, certificate.as_deref()).await?;

    println!("Token issued!");
    println!("Expires at: {:?}", token.expires_at());
    println!("HTTPS only: {}", token.is_ssl_only());

    let mut builder = FeatureLayerClient::builder().url(layer_url).token(token);
    if let Some(path) = certificate {
        builder = builder.certificate(path);
    }
    let client = builder.build()?;

    let definition = client.definition().await?;
    println!("\nLayer: {} ({} fields)", definition.name, definition.fields.len());
    println!("Max record count: {:?}", definition.max_record_count);

    println!("\nQuerying '{}'...", where_clause);

    let mut pages = client
        .query()
        .where_clause(&where_clause)
        .return_geometry(false)
        .into_pages()?;

    let mut total = 0;
    while let Some(page) = pages.next().await {
        let page = page?;
        println!(
            "  page at offset {}: {} features (exceeded limit: {})",
            page.offset(),
            page.len(),
            page.exceeded_transfer_limit()
        );
        total += page.len();
    }

    println!("\nDone: {} features in {} pages", total, pages.pages_fetched());

    Ok(())
}
