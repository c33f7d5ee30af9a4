//! Candidate hit packets.

use bytemuck::{Pod, Zeroable};
use raylane_simd::{Lanes, SupportedWidth};

use crate::view::{HitN, HitNMut};
use crate::INVALID_GEOMETRY_ID;

/// Number of per-lane fields in a hit packet.
pub const HIT_FIELD_COUNT: usize = 9;

/// Per-lane fields of a hit packet, in memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum HitField {
    NgX,
    NgY,
    NgZ,
    U,
    V,
    T,
    GeomId,
    PrimId,
    InstId,
}

impl HitField {
    /// Word index of this field within lane-major storage of width `n`.
    #[inline]
    pub fn word(self, n: usize, lane: usize) -> usize {
        self as usize * n + lane
    }
}

/// Attributes of a single hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Distance along the ray.
    pub t: f32,
    /// Barycentric u.
    pub u: f32,
    /// Barycentric v.
    pub v: f32,
    /// Unnormalized geometric normal.
    pub ng: [f32; 3],
    /// Geometry id.
    pub geom_id: u32,
    /// Primitive id within the geometry.
    pub prim_id: u32,
    /// Instance id, [`INVALID_GEOMETRY_ID`] when not instanced.
    pub inst_id: u32,
}

impl HitRecord {
    /// A hit on primitive `prim_id` of geometry `geom_id` at distance `t`.
    pub fn new(geom_id: u32, prim_id: u32, t: f32) -> Self {
        Self {
            t,
            u: 0.0,
            v: 0.0,
            ng: [0.0, 0.0, 1.0],
            geom_id,
            prim_id,
            inst_id: INVALID_GEOMETRY_ID,
        }
    }

    /// Same hit with barycentrics `(u, v)`.
    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.u = u;
        self.v = v;
        self
    }

    /// Same hit with geometric normal `ng`.
    pub fn with_normal(mut self, ng: [f32; 3]) -> Self {
        self.ng = ng;
        self
    }

    /// Same hit reached through instance `inst_id`.
    pub fn with_instance(mut self, inst_id: u32) -> Self {
        self.inst_id = inst_id;
        self
    }
}

/// `K` candidate hits stored field by field.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitK<const K: usize> {
    /// Geometric normal x.
    pub ng_x: [f32; K],
    /// Geometric normal y.
    pub ng_y: [f32; K],
    /// Geometric normal z.
    pub ng_z: [f32; K],
    /// Barycentric u.
    pub u: [f32; K],
    /// Barycentric v.
    pub v: [f32; K],
    /// Distance along the ray.
    pub t: [f32; K],
    /// Geometry id.
    pub geom_id: [u32; K],
    /// Primitive id.
    pub prim_id: [u32; K],
    /// Instance id.
    pub inst_id: [u32; K],
}

// SAFETY: `repr(C)` over arrays of 4-byte scalars: no padding, any bit pattern valid.
unsafe impl<const K: usize> Zeroable for HitK<K> {}
unsafe impl<const K: usize> Pod for HitK<K> {}

impl<const K: usize> HitK<K>
where
    Lanes<K>: SupportedWidth,
{
    /// A packet with no candidate in any lane.
    pub fn empty() -> Self {
        Self {
            t: [f32::INFINITY; K],
            geom_id: [INVALID_GEOMETRY_ID; K],
            prim_id: [INVALID_GEOMETRY_ID; K],
            inst_id: [INVALID_GEOMETRY_ID; K],
            ..Self::zeroed()
        }
    }

    /// The same candidate in every lane.
    pub fn splat(hit: &HitRecord) -> Self {
        let mut packet = Self::empty();
        for k in 0..K {
            packet.set_record(k, hit);
        }
        packet
    }

    /// Candidate in lane `k`.
    pub fn record(&self, k: usize) -> HitRecord {
        HitRecord {
            t: self.t[k],
            u: self.u[k],
            v: self.v[k],
            ng: [self.ng_x[k], self.ng_y[k], self.ng_z[k]],
            geom_id: self.geom_id[k],
            prim_id: self.prim_id[k],
            inst_id: self.inst_id[k],
        }
    }

    /// Store `hit` as the candidate of lane `k`.
    pub fn set_record(&mut self, k: usize, hit: &HitRecord) {
        self.t[k] = hit.t;
        self.u[k] = hit.u;
        self.v[k] = hit.v;
        [self.ng_x[k], self.ng_y[k], self.ng_z[k]] = hit.ng;
        self.geom_id[k] = hit.geom_id;
        self.prim_id[k] = hit.prim_id;
        self.inst_id[k] = hit.inst_id;
    }

    /// The packet as raw words, field-major.
    pub fn words(&self) -> &[u32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }

    /// Every word belonging to lane `k`, in field order.
    pub fn lane_words(&self, k: usize) -> [u32; HIT_FIELD_COUNT] {
        let words = self.words();
        std::array::from_fn(|f| words[f * K + k])
    }

    /// Width-erased view of this packet.
    pub fn as_n_mut(&mut self) -> HitNMut<'_> {
        HitNMut::new(bytemuck::cast_slice_mut(std::slice::from_mut(self)), K)
    }

    /// Opaque handle for the callback boundary.
    #[inline]
    pub fn as_raw_n(&mut self) -> *mut HitN {
        (self as *mut Self).cast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<HitK<1>>(), HIT_FIELD_COUNT * 4);
        assert_eq!(std::mem::size_of::<HitK<4>>(), HIT_FIELD_COUNT * 4 * 4);
    }

    #[test]
    fn test_record_round_trip_in_one_lane() {
        let hit = HitRecord::new(5, 12, 3.25)
            .with_uv(0.25, 0.5)
            .with_normal([1.0, 0.0, 0.0])
            .with_instance(2);
        let mut packet = HitK::<4>::empty();
        packet.set_record(3, &hit);
        assert_eq!(packet.record(3), hit);
        assert_eq!(packet.geom_id[0], INVALID_GEOMETRY_ID);
    }

    #[test]
    fn test_splat() {
        let hit = HitRecord::new(1, 0, 2.0);
        let packet = HitK::<4>::splat(&hit);
        assert!((0..4).all(|k| packet.record(k) == hit));
    }

    #[test]
    fn test_field_word_offsets() {
        let mut packet = HitK::<4>::empty();
        packet.prim_id[1] = 99;
        assert_eq!(packet.words()[HitField::PrimId.word(4, 1)], 99);
        assert_eq!(packet.lane_words(1)[HitField::PrimId as usize], 99);
    }
}
