//! Data model: points, field values and time precision.

mod point;
mod precision;

pub use point::*;
pub use precision::*;
