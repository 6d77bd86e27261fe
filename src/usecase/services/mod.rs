pub mod enrichment_service;
pub mod export_service;
pub mod import_service;
