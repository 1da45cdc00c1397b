//! Feature processing: attribute mapping and layer-to-layer import

mod importer;
mod mapper;
mod processor;

pub use importer::FeatureImporter;
pub use importer::ImportSummary;
pub use mapper::AttributeMapper;
pub use processor::FeatureProcessor;
