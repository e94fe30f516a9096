//! Ingestion boundary: typed records loaded from CSV.

pub mod records;
