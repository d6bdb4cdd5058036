//! Outbound adapters implementing the domain's driven ports.

pub mod cache;
pub mod memory;
pub mod persistence;
