#![warn(missing_docs)]

//! Lane masks and integer lane vectors for raylane packets.
//!
//! A packet carries `W` rays side by side. This crate provides the small
//! amount of vector algebra the hit filter protocol needs on top of that:
//!
//! - [`VBool`] - bit-packed boolean per lane (validity and acceptance masks)
//! - [`VInt`] - one `i32` per lane, the representation handed to callbacks
//! - [`select`] - per-lane blend of two arrays under a mask
//! - [`Lanes`] / [`SupportedWidth`] - the widths compiled into this build
//!
//! Widths 1 and 4 are always available. Width 8 and width 16 sit behind the
//! `width8` and `width16` cargo features, so code written against an
//! unsupported width simply fails to compile.
//!
//! # Example
//!
//! ```
//! use raylane_simd::{VBool, VInt};
//!
//! let valid = VBool::<4>::from_array([true, true, false, false]);
//! let accept = VInt::<4>::from_array([1, 0, 7, 0]);
//! let accepted = (accept & valid.mask32()).ne_zero();
//! assert_eq!(accepted, VBool::one_hot(0));
//! ```

mod mask;
mod vint;
mod width;

pub use mask::{select, VBool};
pub use vint::VInt;
pub use width::{supported_widths, Lanes, SupportedWidth, MAX_WIDTH};
