//! Translation rules, one function per block type.
//!
//! - `expression`: value blocks (logic, math, variable reads, strip queries)
//! - `statement`: control flow, variable writes and strip actions

pub mod expression;
pub mod statement;
