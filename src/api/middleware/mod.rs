//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Rate limiter (reject early)
//! 2. Access logger

pub mod audit;
pub mod rate;
