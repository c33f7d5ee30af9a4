#![warn(missing_docs)]

//! Hit filter invocation and commit protocol for raylane.
//!
//! When traversal finds a candidate intersection on a geometry that has a
//! filter callback, it fills a hit packet and calls into this crate. The
//! callback decides per lane whether the candidate is kept; kept candidates
//! are committed to the ray packet and the accepted lanes are returned so
//! traversal can shrink the ray segment (intersection) or stop the ray
//! (occlusion).
//!
//! # Architecture
//!
//! - [`filter`] - the invocation protocol, generic over packet width
//! - [`commit`] - what accepted lanes do to the ray packet
//! - [`Geometry`] - a geometry's callbacks and user data
//! - [`FilterFnN`] / [`FilterArgs`] - the callback ABI and a safe view of it
//! - [`IntersectContext`] - per-query user pointer and diagnostics
//! - [`FilterConfig`] - TOML-loadable settings
//!
//! # Example
//!
//! ```
//! use std::ffi::c_void;
//! use raylane_filter::{run_intersection_filter, FilterArgs, Geometry, IntersectContext};
//! use raylane_packet::{HitK, HitN, HitRecord, RayK, RayN};
//! use raylane_simd::VBool;
//!
//! // Accept candidates closer than 10 units.
//! unsafe extern "C" fn near_only(
//!     valid: *mut i32,
//!     geometry_user_ptr: *mut c_void,
//!     context_user_ptr: *mut c_void,
//!     ray: *mut RayN,
//!     hit: *mut HitN,
//!     n: usize,
//!     accept: *mut i32,
//! ) {
//!     let mut args = FilterArgs::from_raw(
//!         valid, geometry_user_ptr, context_user_ptr, ray, hit, n, accept,
//!     );
//!     for i in args.valid_lanes().collect::<Vec<_>>() {
//!         if args.hit().t(i) < 10.0 {
//!             args.accept(i);
//!         }
//!     }
//! }
//!
//! let geometry = Geometry::new(1).with_intersection_filter(near_only);
//! let mut ray = RayK::<4>::empty();
//! let mut hit = HitK::<4>::empty();
//! hit.set_record(0, &HitRecord::new(1, 0, 4.0));
//! hit.set_record(1, &HitRecord::new(1, 0, 40.0));
//!
//! let valid = VBool::from_bits(0b0011);
//! let accepted = run_intersection_filter(valid, &geometry, &mut ray, &IntersectContext::default(), &mut hit);
//! assert_eq!(accepted, VBool::one_hot(0));
//! assert_eq!(ray.tfar[0], 4.0);
//! ```

mod callback;
pub mod commit;
mod config;
mod context;
mod error;
pub mod filter;
mod geometry;
pub mod isolation;

pub use callback::{FilterArgs, FilterFnN, UserPtr};
pub use commit::{copy_hit_to_ray, mark_occluded, CommitPolicy, IntersectionCommit, OcclusionCommit};
pub use config::FilterConfig;
pub use context::IntersectContext;
pub use error::{FilterError, Result};
pub use filter::{
    run_intersection_filter, run_intersection_filter1, run_intersection_filter_lane, run_occlusion_filter,
    run_occlusion_filter1, run_occlusion_filter_lane,
};
pub use geometry::{FilterKind, Geometry};
pub use isolation::{tampered_lanes, PacketSnapshot};
