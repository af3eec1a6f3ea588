//! APIC driver
//!
//! reqwest-based implementation of the fabric controller adapter against
//! the APIC northbound REST API.

pub mod client;

pub use client::{ApicClient, ApicConfig};
