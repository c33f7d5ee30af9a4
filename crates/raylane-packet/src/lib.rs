#![warn(missing_docs)]

//! Structure-of-arrays ray and hit packets for raylane.
//!
//! A packet stores `K` rays (or `K` candidate hits) field by field: all `K`
//! origins' x components, then all y components, and so on. Every field is
//! a 4-byte scalar, so field `f` of lane `i` is word `f * K + i` of the
//! packet. That fixed rule is what lets the width-erased [`RayNMut`] and
//! [`HitNMut`] views address a packet whose width is only known at runtime,
//! which is how filter callbacks see packets.
//!
//! - [`RayK`] - `K` rays with their best-known hit
//! - [`HitK`] - `K` candidate hits awaiting a filter decision
//! - [`HitRecord`] - one lane's hit attributes, for building and comparing
//! - [`RayN`] / [`HitN`] - opaque handles crossing the callback boundary

mod hit;
mod ray;
mod view;

pub use hit::{HitField, HitK, HitRecord, HIT_FIELD_COUNT};
pub use ray::{RayField, RayK, RAY_FIELD_COUNT};
pub use view::{HitN, HitNMut, RayN, RayNMut};

/// Geometry id of a lane that has no hit.
pub const INVALID_GEOMETRY_ID: u32 = u32::MAX;

/// Geometry id written into a lane found to be occluded.
///
/// Occlusion queries only need a yes/no answer per lane, so the geometry id
/// field doubles as that answer once the query is done.
pub const OCCLUDED_GEOMETRY_ID: u32 = 0;

/// Single-ray packet.
pub type Ray1 = RayK<1>;
/// Four-wide ray packet.
pub type Ray4 = RayK<4>;
/// Eight-wide ray packet.
#[cfg(feature = "width8")]
pub type Ray8 = RayK<8>;
/// Sixteen-wide ray packet.
#[cfg(feature = "width16")]
pub type Ray16 = RayK<16>;

/// Single hit.
pub type Hit1 = HitK<1>;
/// Four-wide hit packet.
pub type Hit4 = HitK<4>;
/// Eight-wide hit packet.
#[cfg(feature = "width8")]
pub type Hit8 = HitK<8>;
/// Sixteen-wide hit packet.
#[cfg(feature = "width16")]
pub type Hit16 = HitK<16>;
