//! Width-erased packet views.
//!
//! A filter callback is compiled once and receives packets of any width, so
//! it cannot name `RayK<K>`. It gets an opaque pointer plus the lane count
//! instead, and reads fields through these views.

use crate::hit::{HitField, HitRecord, HIT_FIELD_COUNT};
use crate::ray::{RayField, RAY_FIELD_COUNT};

/// Opaque handle to a ray packet of some width.
#[repr(C)]
pub struct RayN {
    _opaque: [u8; 0],
}

/// Opaque handle to a hit packet of some width.
#[repr(C)]
pub struct HitN {
    _opaque: [u8; 0],
}

trait LaneWord: Copy {
    fn from_word(word: u32) -> Self;
    fn to_word(self) -> u32;
}

impl LaneWord for f32 {
    #[inline]
    fn from_word(word: u32) -> Self {
        f32::from_bits(word)
    }

    #[inline]
    fn to_word(self) -> u32 {
        self.to_bits()
    }
}

impl LaneWord for u32 {
    #[inline]
    fn from_word(word: u32) -> Self {
        word
    }

    #[inline]
    fn to_word(self) -> u32 {
        self
    }
}

macro_rules! lane_accessors {
    ($field:ident { $($get:ident, $set:ident => $variant:ident: $ty:ty;)* }) => {
        $(
            #[doc = concat!("`", stringify!($get), "` of lane `i`.")]
            #[inline]
            pub fn $get(&self, i: usize) -> $ty {
                <$ty as LaneWord>::from_word(self.word($field::$variant, i))
            }

            #[doc = concat!("Overwrite `", stringify!($get), "` of lane `i`.")]
            #[inline]
            pub fn $set(&mut self, i: usize, value: $ty) {
                self.set_word($field::$variant, i, LaneWord::to_word(value));
            }
        )*
    };
}

/// Mutable view of a ray packet whose width is known only at runtime.
///
/// Lane indices at or beyond [`width`](Self::width) panic.
pub struct RayNMut<'a> {
    words: &'a mut [u32],
    n: usize,
}

impl<'a> RayNMut<'a> {
    /// View `words` as a field-major ray packet of width `n`.
    ///
    /// # Panics
    ///
    /// If `words` does not hold exactly one packet of width `n`.
    pub fn new(words: &'a mut [u32], n: usize) -> Self {
        assert_eq!(words.len(), RAY_FIELD_COUNT * n, "ray packet size mismatch for width {n}");
        Self { words, n }
    }

    /// View the packet behind a raw callback argument.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, 4-byte aligned ray packet of width `n`
    /// that nothing else accesses for `'a`.
    pub unsafe fn from_raw(ptr: *mut RayN, n: usize) -> Self {
        Self {
            words: std::slice::from_raw_parts_mut(ptr.cast::<u32>(), RAY_FIELD_COUNT * n),
            n,
        }
    }

    /// Number of lanes.
    #[inline]
    pub fn width(&self) -> usize {
        self.n
    }

    /// Raw word of `field` in lane `i`.
    #[inline]
    pub fn word(&self, field: RayField, i: usize) -> u32 {
        assert!(i < self.n, "lane {i} out of range for width {}", self.n);
        self.words[field.word(self.n, i)]
    }

    /// Overwrite the raw word of `field` in lane `i`.
    #[inline]
    pub fn set_word(&mut self, field: RayField, i: usize, word: u32) {
        assert!(i < self.n, "lane {i} out of range for width {}", self.n);
        self.words[field.word(self.n, i)] = word;
    }

    /// Best-known hit of lane `i`.
    pub fn hit_record(&self, i: usize) -> HitRecord {
        HitRecord {
            t: self.tfar(i),
            u: self.u(i),
            v: self.v(i),
            ng: [self.ng_x(i), self.ng_y(i), self.ng_z(i)],
            geom_id: self.geom_id(i),
            prim_id: self.prim_id(i),
            inst_id: self.inst_id(i),
        }
    }

    lane_accessors!(RayField {
        org_x, set_org_x => OrgX: f32;
        org_y, set_org_y => OrgY: f32;
        org_z, set_org_z => OrgZ: f32;
        dir_x, set_dir_x => DirX: f32;
        dir_y, set_dir_y => DirY: f32;
        dir_z, set_dir_z => DirZ: f32;
        tnear, set_tnear => TNear: f32;
        tfar, set_tfar => TFar: f32;
        time, set_time => Time: f32;
        mask, set_mask => Mask: u32;
        id, set_id => Id: u32;
        ng_x, set_ng_x => NgX: f32;
        ng_y, set_ng_y => NgY: f32;
        ng_z, set_ng_z => NgZ: f32;
        u, set_u => U: f32;
        v, set_v => V: f32;
        geom_id, set_geom_id => GeomId: u32;
        prim_id, set_prim_id => PrimId: u32;
        inst_id, set_inst_id => InstId: u32;
    });
}

/// Mutable view of a hit packet whose width is known only at runtime.
///
/// Lane indices at or beyond [`width`](Self::width) panic.
pub struct HitNMut<'a> {
    words: &'a mut [u32],
    n: usize,
}

impl<'a> HitNMut<'a> {
    /// View `words` as a field-major hit packet of width `n`.
    ///
    /// # Panics
    ///
    /// If `words` does not hold exactly one packet of width `n`.
    pub fn new(words: &'a mut [u32], n: usize) -> Self {
        assert_eq!(words.len(), HIT_FIELD_COUNT * n, "hit packet size mismatch for width {n}");
        Self { words, n }
    }

    /// View the packet behind a raw callback argument.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, 4-byte aligned hit packet of width `n`
    /// that nothing else accesses for `'a`.
    pub unsafe fn from_raw(ptr: *mut HitN, n: usize) -> Self {
        Self {
            words: std::slice::from_raw_parts_mut(ptr.cast::<u32>(), HIT_FIELD_COUNT * n),
            n,
        }
    }

    /// Number of lanes.
    #[inline]
    pub fn width(&self) -> usize {
        self.n
    }

    /// Raw word of `field` in lane `i`.
    #[inline]
    pub fn word(&self, field: HitField, i: usize) -> u32 {
        assert!(i < self.n, "lane {i} out of range for width {}", self.n);
        self.words[field.word(self.n, i)]
    }

    /// Overwrite the raw word of `field` in lane `i`.
    #[inline]
    pub fn set_word(&mut self, field: HitField, i: usize, word: u32) {
        assert!(i < self.n, "lane {i} out of range for width {}", self.n);
        self.words[field.word(self.n, i)] = word;
    }

    /// Candidate of lane `i`.
    pub fn record(&self, i: usize) -> HitRecord {
        HitRecord {
            t: self.t(i),
            u: self.u(i),
            v: self.v(i),
            ng: [self.ng_x(i), self.ng_y(i), self.ng_z(i)],
            geom_id: self.geom_id(i),
            prim_id: self.prim_id(i),
            inst_id: self.inst_id(i),
        }
    }

    lane_accessors!(HitField {
        ng_x, set_ng_x => NgX: f32;
        ng_y, set_ng_y => NgY: f32;
        ng_z, set_ng_z => NgZ: f32;
        u, set_u => U: f32;
        v, set_v => V: f32;
        t, set_t => T: f32;
        geom_id, set_geom_id => GeomId: u32;
        prim_id, set_prim_id => PrimId: u32;
        inst_id, set_inst_id => InstId: u32;
    });
}

#[cfg(test)]
mod tests {
    use crate::{HitK, HitRecord, RayK};

    #[test]
    fn test_ray_view_reads_typed_packet() {
        let mut ray = RayK::<4>::empty();
        ray.set_ray(2, [1.0, 2.0, 3.0], [0.0, 1.0, 0.0], 0.5, 8.0);
        let view = ray.as_n_mut();
        assert_eq!(view.width(), 4);
        assert_eq!(view.org_z(2), 3.0);
        assert_eq!(view.dir_y(2), 1.0);
        assert_eq!(view.tnear(2), 0.5);
        assert_eq!(view.tfar(2), 8.0);
    }

    #[test]
    fn test_ray_view_writes_land_in_packet() {
        let mut ray = RayK::<4>::empty();
        {
            let mut view = ray.as_n_mut();
            view.set_geom_id(1, 42);
            view.set_tfar(3, 0.75);
        }
        assert_eq!(ray.geom_id, [u32::MAX, 42, u32::MAX, u32::MAX]);
        assert_eq!(ray.tfar[3], 0.75);
    }

    #[test]
    fn test_raw_view_matches_typed_view() {
        let mut hit = HitK::<4>::empty();
        hit.set_record(1, &HitRecord::new(9, 4, 1.25).with_uv(0.1, 0.2));
        let expected = hit.record(1);
        let ptr = hit.as_raw_n();
        // SAFETY: `ptr` comes from a live width-4 packet borrowed for this scope.
        let view = unsafe { super::HitNMut::from_raw(ptr, 4) };
        assert_eq!(view.record(1), expected);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_view_rejects_lane_beyond_width() {
        let mut ray = RayK::<4>::empty();
        let view = ray.as_n_mut();
        let _ = view.geom_id(4);
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn test_view_rejects_wrong_length() {
        let mut words = [0u32; 10];
        let _ = super::RayNMut::new(&mut words, 4);
    }
}
