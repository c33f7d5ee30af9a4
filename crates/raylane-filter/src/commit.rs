//! Writing accepted candidates into the ray packet.
//!
//! Only lanes in the accepted mask are written. A rejected lane is never
//! touched, so there is nothing to roll back.

use raylane_packet::{HitK, RayK, OCCLUDED_GEOMETRY_ID};
use raylane_simd::{select, Lanes, SupportedWidth, VBool};

use crate::geometry::FilterKind;

/// What a filter query does with the lanes its callback accepted.
pub trait CommitPolicy {
    /// Query this policy serves.
    const KIND: FilterKind;

    /// Apply accepted candidates to `ray`.
    fn commit<const W: usize>(accepted: VBool<W>, ray: &mut RayK<W>, hit: &HitK<W>)
    where
        Lanes<W>: SupportedWidth;
}

/// Accepted candidates become the lane's best-known hit.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionCommit;

/// Accepted candidates mark the lane occluded.
#[derive(Debug, Clone, Copy)]
pub struct OcclusionCommit;

impl CommitPolicy for IntersectionCommit {
    const KIND: FilterKind = FilterKind::Intersection;

    #[inline]
    fn commit<const W: usize>(accepted: VBool<W>, ray: &mut RayK<W>, hit: &HitK<W>)
    where
        Lanes<W>: SupportedWidth,
    {
        if accepted.any() {
            copy_hit_to_ray(accepted, ray, hit);
        }
    }
}

impl CommitPolicy for OcclusionCommit {
    const KIND: FilterKind = FilterKind::Occlusion;

    #[inline]
    fn commit<const W: usize>(accepted: VBool<W>, ray: &mut RayK<W>, _hit: &HitK<W>)
    where
        Lanes<W>: SupportedWidth,
    {
        mark_occluded(accepted, ray);
    }
}

/// Copy distance, barycentrics, normal and ids of accepted lanes from `hit` into `ray`.
#[inline]
pub fn copy_hit_to_ray<const W: usize>(accepted: VBool<W>, ray: &mut RayK<W>, hit: &HitK<W>)
where
    Lanes<W>: SupportedWidth,
{
    ray.tfar = select(accepted, hit.t, ray.tfar);
    ray.u = select(accepted, hit.u, ray.u);
    ray.v = select(accepted, hit.v, ray.v);
    ray.ng_x = select(accepted, hit.ng_x, ray.ng_x);
    ray.ng_y = select(accepted, hit.ng_y, ray.ng_y);
    ray.ng_z = select(accepted, hit.ng_z, ray.ng_z);
    ray.geom_id = select(accepted, hit.geom_id, ray.geom_id);
    ray.prim_id = select(accepted, hit.prim_id, ray.prim_id);
    ray.inst_id = select(accepted, hit.inst_id, ray.inst_id);
}

/// Set the geometry id of accepted lanes to [`OCCLUDED_GEOMETRY_ID`].
#[inline]
pub fn mark_occluded<const W: usize>(accepted: VBool<W>, ray: &mut RayK<W>)
where
    Lanes<W>: SupportedWidth,
{
    ray.geom_id = select(accepted, [OCCLUDED_GEOMETRY_ID; W], ray.geom_id);
}
