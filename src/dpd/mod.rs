//! IEEE 754-2008 decimal128 values with densely packed decimal
//! significands.

mod bcd;
pub(crate) mod coeff;
mod dpd128;
mod encoding;
pub(crate) mod tables;

pub use coeff::Coefficient;
pub use dpd128::Dpd128;
