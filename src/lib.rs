//! `decquad` converts decimal strings to IEEE 754-2008
//! decimal128 values with densely packed decimal (DPD)
//! coefficients.
//!
//! # Example
//!
//! ```rust
//! use decquad::{Condition, Ctx, Dpd128};
//!
//! let x: Dpd128 = "123.45".parse().unwrap();
//! assert_eq!(x.to_words(), [0x0000_49c5, 0, 0, 0x2207_8000]);
//!
//! // Conditions raised while fitting the literal into the
//! // context are accumulated in `Ctx::status`.
//! let mut ctx = Ctx::new();
//! let y = ctx.encode("1E-6177").unwrap();
//! assert!(y.is_zero());
//! assert!(ctx.status.contains(Condition::UNDERFLOW));
//! ```
//!
//! # Cargo Features
//!
//! - `std`: Include [`std`] support. Implements
//! [`std::error::Error`] for [`ParseError`].
//!
//! The crate never allocates.
//!
//! # Logging
//!
//! Parsing and range decisions are reported through the [`log`]
//! facade at the `trace` and `debug` levels. No logger is
//! installed.
//!
//! [`log`]: https://crates.io/crates/log
//! [`std`]: https://doc.rust-lang.org/std/

#![allow(clippy::unusual_byte_groupings)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(feature = "std", test)), deny(clippy::std_instead_of_core))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_precision_loss)]
#![deny(clippy::cast_sign_loss)]
#![deny(clippy::expect_used)]
#![deny(clippy::implicit_saturating_sub)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::panic)]
#![deny(clippy::ptr_as_ptr)]
#![deny(clippy::string_slice)]
#![deny(clippy::transmute_ptr_to_ptr)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::wildcard_imports)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

mod conv;
mod ctx;
mod decnumber;
mod dectest;
pub mod dpd;
mod encode;
pub mod literal;
mod util;

pub use conv::*;
pub use ctx::*;
pub use dpd::{Coefficient, Dpd128};
pub use encode::{encode, Encoded};
pub use literal::{Category, Literal};

/// Simplifies importing common items.
pub mod prelude {
    pub use super::{encode, Condition, Ctx, Dpd128, Encoded};
}
