//! Claim verification against a fixed set of fact-check records.

pub mod records;
pub mod verifier;

pub use verifier::{verify, FactCheckRecord};
