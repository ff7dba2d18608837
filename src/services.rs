pub mod auth;
pub mod lead_service;
pub mod metadata_service;
pub mod pricing;
pub mod totals;
