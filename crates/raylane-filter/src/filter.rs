//! Running a geometry's filter callback on a candidate hit and committing
//! the lanes it accepts.
//!
//! Every entry point follows the same steps:
//!
//! 1. Turn the validity mask into an `i32` lane vector.
//! 2. Zero an accept vector of the same width.
//! 3. Call the geometry's callback for the query kind.
//! 4. Re-mask: a lane counts as accepted only if the callback set it *and*
//!    it was in the validity mask. Whatever the callback did to its copy of
//!    the mask is ignored.
//! 5. Commit the accepted lanes ([`IntersectionCommit`] or
//!    [`OcclusionCommit`]).
//!
//! Single-lane forms run the same steps with a one-hot mask, so a packet
//! narrowed to one live ray takes the packet path rather than a copy of it.
//!
//! Calling a filter on a geometry that has none registered is a contract
//! violation: traversal must check [`Geometry::has_intersection_filter`] /
//! [`Geometry::has_occlusion_filter`] first. Debug builds panic; release
//! builds accept nothing and leave the packets alone.

use log::{error, trace};
use raylane_packet::{Hit1, HitK, Ray1, RayK};
use raylane_simd::{Lanes, SupportedWidth, VBool, VInt};

use crate::commit::{CommitPolicy, IntersectionCommit, OcclusionCommit};
use crate::context::IntersectContext;
use crate::geometry::Geometry;
use crate::isolation::PacketSnapshot;

#[inline]
fn run_filter<P, const W: usize>(
    valid: VBool<W>,
    geometry: &Geometry,
    ray: &mut RayK<W>,
    context: &IntersectContext,
    hit: &mut HitK<W>,
) -> VBool<W>
where
    P: CommitPolicy,
    Lanes<W>: SupportedWidth,
{
    let Some(filter) = geometry.filter(P::KIND) else {
        if cfg!(debug_assertions) {
            panic!("{} filter invoked on geometry {} without a registered callback", P::KIND, geometry.id());
        }
        error!("{} filter invoked on geometry {} without a registered callback", P::KIND, geometry.id());
        return VBool::none();
    };

    let snapshot = context
        .verify_lane_isolation
        .then(|| PacketSnapshot::capture(ray, hit));

    let mut mask = valid.mask32();
    let mut accept = VInt::<W>::zero();
    // SAFETY: the mask and accept vectors hold W lanes each and both packets
    // are exclusively borrowed for the duration of the call, so every pointer
    // is valid for the lane count passed. What the callback does with them
    // is governed by the `FilterFnN` contract.
    unsafe {
        filter(
            mask.as_mut_ptr(),
            geometry.user_data().as_ptr(),
            context.user.as_ptr(),
            ray.as_raw_n(),
            hit.as_raw_n(),
            W,
            accept.as_mut_ptr(),
        );
    }

    if let Some(snapshot) = snapshot {
        snapshot.report(P::KIND, geometry.id(), valid, ray, hit);
    }

    // The callback may have widened `mask`; only the caller's mask counts.
    accept &= valid.mask32();
    let accepted = accept.ne_zero();
    P::commit(accepted, ray, hit);

    trace!(
        "{} filter on geometry {}: valid {:?} accepted {:?}",
        P::KIND,
        geometry.id(),
        valid,
        accepted
    );
    accepted
}

/// Run the intersection filter on the lanes in `valid`.
///
/// Accepted lanes take the candidate from `hit` as their new best hit.
/// Returns the accepted lanes, always a subset of `valid`.
#[inline]
pub fn run_intersection_filter<const W: usize>(
    valid: VBool<W>,
    geometry: &Geometry,
    ray: &mut RayK<W>,
    context: &IntersectContext,
    hit: &mut HitK<W>,
) -> VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    run_filter::<IntersectionCommit, W>(valid, geometry, ray, context, hit)
}

/// Run the occlusion filter on the lanes in `valid`.
///
/// Accepted lanes are marked occluded. Returns the accepted lanes, always a
/// subset of `valid`.
#[inline]
pub fn run_occlusion_filter<const W: usize>(
    valid: VBool<W>,
    geometry: &Geometry,
    ray: &mut RayK<W>,
    context: &IntersectContext,
    hit: &mut HitK<W>,
) -> VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    run_filter::<OcclusionCommit, W>(valid, geometry, ray, context, hit)
}

/// Run the intersection filter on lane `k` of a wider packet only.
///
/// Returns whether lane `k` was accepted.
#[inline]
pub fn run_intersection_filter_lane<const W: usize>(
    geometry: &Geometry,
    ray: &mut RayK<W>,
    k: usize,
    context: &IntersectContext,
    hit: &mut HitK<W>,
) -> bool
where
    Lanes<W>: SupportedWidth,
{
    debug_assert!(k < W, "lane {k} out of range for width {W}");
    run_filter::<IntersectionCommit, W>(VBool::one_hot(k), geometry, ray, context, hit).test(k)
}

/// Run the occlusion filter on lane `k` of a wider packet only.
///
/// Returns whether lane `k` was accepted, i.e. is now occluded.
#[inline]
pub fn run_occlusion_filter_lane<const W: usize>(
    geometry: &Geometry,
    ray: &mut RayK<W>,
    k: usize,
    context: &IntersectContext,
    hit: &mut HitK<W>,
) -> bool
where
    Lanes<W>: SupportedWidth,
{
    debug_assert!(k < W, "lane {k} out of range for width {W}");
    run_filter::<OcclusionCommit, W>(VBool::one_hot(k), geometry, ray, context, hit).test(k)
}

/// Run the intersection filter for a single ray.
#[inline]
pub fn run_intersection_filter1(
    geometry: &Geometry,
    ray: &mut Ray1,
    context: &IntersectContext,
    hit: &mut Hit1,
) -> bool {
    run_filter::<IntersectionCommit, 1>(VBool::all(), geometry, ray, context, hit).as_bool()
}

/// Run the occlusion filter for a single ray.
#[inline]
pub fn run_occlusion_filter1(
    geometry: &Geometry,
    ray: &mut Ray1,
    context: &IntersectContext,
    hit: &mut Hit1,
) -> bool {
    run_filter::<OcclusionCommit, 1>(VBool::all(), geometry, ray, context, hit).as_bool()
}
