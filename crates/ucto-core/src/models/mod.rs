//! Data models for extracted invoices, correction records, and configuration.

pub mod config;
pub mod feedback;
pub mod invoice;
