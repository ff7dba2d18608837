pub mod audit_repo;
pub use audit_repo::{AuditLog, AuditRepository, ConvertAudit};
pub mod filter;
pub mod lead_repo;
pub use lead_repo::{LeadRepository, LeadStore};
pub mod metadata_repo;
pub use metadata_repo::{MetadataRepository, MetadataStore};

#[cfg(test)]
pub mod memory;
