//! Ray packets.

use bytemuck::{Pod, Zeroable};
use raylane_simd::{Lanes, SupportedWidth};

use crate::hit::HitRecord;
use crate::view::{RayN, RayNMut};
use crate::INVALID_GEOMETRY_ID;

/// Number of per-lane fields in a ray packet.
pub const RAY_FIELD_COUNT: usize = 19;

/// Per-lane fields of a ray packet, in memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum RayField {
    OrgX,
    OrgY,
    OrgZ,
    DirX,
    DirY,
    DirZ,
    TNear,
    TFar,
    Time,
    Mask,
    Id,
    NgX,
    NgY,
    NgZ,
    U,
    V,
    GeomId,
    PrimId,
    InstId,
}

impl RayField {
    /// Fields that describe the best-known hit; written by an intersection commit.
    pub const HIT: [RayField; 9] = [
        RayField::TFar,
        RayField::NgX,
        RayField::NgY,
        RayField::NgZ,
        RayField::U,
        RayField::V,
        RayField::GeomId,
        RayField::PrimId,
        RayField::InstId,
    ];

    /// Word index of this field within lane-major storage of width `n`.
    #[inline]
    pub fn word(self, n: usize, lane: usize) -> usize {
        self as usize * n + lane
    }
}

/// `K` rays stored field by field.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayK<const K: usize> {
    /// Origin x.
    pub org_x: [f32; K],
    /// Origin y.
    pub org_y: [f32; K],
    /// Origin z.
    pub org_z: [f32; K],
    /// Direction x.
    pub dir_x: [f32; K],
    /// Direction y.
    pub dir_y: [f32; K],
    /// Direction z.
    pub dir_z: [f32; K],
    /// Start of the valid ray segment.
    pub tnear: [f32; K],
    /// End of the valid ray segment; shrinks as closer hits are committed.
    pub tfar: [f32; K],
    /// Motion blur time.
    pub time: [f32; K],
    /// Visibility mask.
    pub mask: [u32; K],
    /// Caller-assigned ray id.
    pub id: [u32; K],
    /// Geometric normal x of the best hit.
    pub ng_x: [f32; K],
    /// Geometric normal y of the best hit.
    pub ng_y: [f32; K],
    /// Geometric normal z of the best hit.
    pub ng_z: [f32; K],
    /// Barycentric u of the best hit.
    pub u: [f32; K],
    /// Barycentric v of the best hit.
    pub v: [f32; K],
    /// Geometry id of the best hit, [`INVALID_GEOMETRY_ID`] if none.
    pub geom_id: [u32; K],
    /// Primitive id of the best hit.
    pub prim_id: [u32; K],
    /// Instance id of the best hit.
    pub inst_id: [u32; K],
}

// SAFETY: `repr(C)` and every field is an array of 4-byte scalars, so the
// struct has no padding and every bit pattern is valid.
unsafe impl<const K: usize> Zeroable for RayK<K> {}
unsafe impl<const K: usize> Pod for RayK<K> {}

impl<const K: usize> RayK<K>
where
    Lanes<K>: SupportedWidth,
{
    /// A packet whose lanes have no hit and an unbounded segment.
    pub fn empty() -> Self {
        Self {
            tfar: [f32::INFINITY; K],
            mask: [u32::MAX; K],
            geom_id: [INVALID_GEOMETRY_ID; K],
            prim_id: [INVALID_GEOMETRY_ID; K],
            inst_id: [INVALID_GEOMETRY_ID; K],
            ..Self::zeroed()
        }
    }

    /// Load a fresh ray into lane `k`, clearing any hit it carried.
    pub fn set_ray(&mut self, k: usize, origin: [f32; 3], direction: [f32; 3], tnear: f32, tfar: f32) {
        [self.org_x[k], self.org_y[k], self.org_z[k]] = origin;
        [self.dir_x[k], self.dir_y[k], self.dir_z[k]] = direction;
        self.tnear[k] = tnear;
        self.tfar[k] = tfar;
        [self.ng_x[k], self.ng_y[k], self.ng_z[k]] = [0.0; 3];
        self.u[k] = 0.0;
        self.v[k] = 0.0;
        self.geom_id[k] = INVALID_GEOMETRY_ID;
        self.prim_id[k] = INVALID_GEOMETRY_ID;
        self.inst_id[k] = INVALID_GEOMETRY_ID;
    }

    /// Best-known hit of lane `k`.
    pub fn hit_record(&self, k: usize) -> HitRecord {
        HitRecord {
            t: self.tfar[k],
            u: self.u[k],
            v: self.v[k],
            ng: [self.ng_x[k], self.ng_y[k], self.ng_z[k]],
            geom_id: self.geom_id[k],
            prim_id: self.prim_id[k],
            inst_id: self.inst_id[k],
        }
    }

    /// Does lane `k` carry a hit?
    #[inline]
    pub fn has_hit(&self, k: usize) -> bool {
        self.geom_id[k] != INVALID_GEOMETRY_ID
    }

    /// The packet as raw words, field-major.
    pub fn words(&self) -> &[u32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }

    /// Every word belonging to lane `k`, in field order.
    pub fn lane_words(&self, k: usize) -> [u32; RAY_FIELD_COUNT] {
        let words = self.words();
        std::array::from_fn(|f| words[f * K + k])
    }

    /// Width-erased view of this packet.
    pub fn as_n_mut(&mut self) -> RayNMut<'_> {
        RayNMut::new(bytemuck::cast_slice_mut(std::slice::from_mut(self)), K)
    }

    /// Opaque handle for the callback boundary.
    #[inline]
    pub fn as_raw_n(&mut self) -> *mut RayN {
        (self as *mut Self).cast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<RayK<1>>(), RAY_FIELD_COUNT * 4);
        assert_eq!(std::mem::size_of::<RayK<4>>(), RAY_FIELD_COUNT * 4 * 4);
        assert_eq!(std::mem::align_of::<RayK<4>>(), 4);
    }

    #[test]
    fn test_field_word_offsets() {
        let mut ray = RayK::<4>::empty();
        ray.geom_id[2] = 77;
        ray.tfar[3] = 1.5;
        let words = ray.words();
        assert_eq!(words[RayField::GeomId.word(4, 2)], 77);
        assert_eq!(f32::from_bits(words[RayField::TFar.word(4, 3)]), 1.5);
    }

    #[test]
    fn test_empty_has_no_hits() {
        let ray = RayK::<4>::empty();
        assert!((0..4).all(|k| !ray.has_hit(k)));
        assert!(ray.tfar.iter().all(|t| t.is_infinite()));
        assert_eq!(ray.mask, [u32::MAX; 4]);
    }

    #[test]
    fn test_set_ray_clears_previous_hit() {
        let mut ray = RayK::<4>::empty();
        ray.geom_id[1] = 3;
        ray.prim_id[1] = 4;
        ray.u[1] = 0.25;
        ray.v[1] = 0.5;
        ray.ng_y[1] = 1.0;
        ray.set_ray(1, [1.0, 2.0, 3.0], [0.0, 0.0, 1.0], 0.0, 10.0);
        assert!(!ray.has_hit(1));
        let record = ray.hit_record(1);
        assert_eq!(record.prim_id, INVALID_GEOMETRY_ID);
        assert_eq!((record.u, record.v), (0.0, 0.0));
        assert_eq!(record.ng, [0.0; 3]);
        assert_eq!(ray.org_y[1], 2.0);
        assert_eq!(ray.dir_z[1], 1.0);
        assert_eq!(ray.tfar[1], 10.0);
    }

    #[test]
    fn test_lane_words_picks_one_lane() {
        let mut ray = RayK::<4>::empty();
        ray.id = [10, 11, 12, 13];
        let lane = ray.lane_words(2);
        assert_eq!(lane[RayField::Id as usize], 12);
        assert_eq!(lane[RayField::GeomId as usize], INVALID_GEOMETRY_ID);
    }
}
