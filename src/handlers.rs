pub mod leads;
pub mod metadata;
pub mod orders;
