//! Detecting callbacks that write outside their lane mask.
//!
//! Re-masking the accept vector stops a callback from committing lanes it
//! was not given, but nothing stops it from scribbling over their ray or
//! hit fields. That remains undefined behaviour of the callback; this module
//! only makes it visible.

use log::warn;
use raylane_packet::{HitK, RayK};
use raylane_simd::{Lanes, SupportedWidth, VBool};

use crate::geometry::FilterKind;

/// Copy of both packets taken before a callback runs.
#[derive(Debug, Clone, Copy)]
pub struct PacketSnapshot<const W: usize> {
    ray: RayK<W>,
    hit: HitK<W>,
}

impl<const W: usize> PacketSnapshot<W>
where
    Lanes<W>: SupportedWidth,
{
    /// Capture `ray` and `hit` as they are now.
    pub fn capture(ray: &RayK<W>, hit: &HitK<W>) -> Self {
        Self { ray: *ray, hit: *hit }
    }

    /// Lanes outside `valid` whose ray or hit words differ from the snapshot.
    pub fn tampered_lanes(&self, valid: VBool<W>, ray: &RayK<W>, hit: &HitK<W>) -> VBool<W> {
        let mut tampered = VBool::none();
        for k in (!valid).iter() {
            if self.ray.lane_words(k) != ray.lane_words(k) || self.hit.lane_words(k) != hit.lane_words(k) {
                tampered.set(k);
            }
        }
        tampered
    }

    /// Log every tampered lane; returns the tampered mask.
    pub fn report(
        &self,
        kind: FilterKind,
        geom_id: u32,
        valid: VBool<W>,
        ray: &RayK<W>,
        hit: &HitK<W>,
    ) -> VBool<W> {
        let tampered = self.tampered_lanes(valid, ray, hit);
        if tampered.any() {
            warn!(
                "{kind} filter of geometry {geom_id} modified lanes {:?} outside its mask {:?}",
                tampered.iter().collect::<Vec<_>>(),
                valid
            );
        }
        tampered
    }
}

/// Lanes outside `valid` that differ between the two packet states.
pub fn tampered_lanes<const W: usize>(
    valid: VBool<W>,
    before: (&RayK<W>, &HitK<W>),
    after: (&RayK<W>, &HitK<W>),
) -> VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    PacketSnapshot::capture(before.0, before.1).tampered_lanes(valid, after.0, after.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raylane_packet::HitRecord;

    #[test]
    fn test_untouched_packets_report_nothing() {
        let ray = RayK::<4>::empty();
        let hit = HitK::<4>::splat(&HitRecord::new(1, 1, 1.0));
        let snapshot = PacketSnapshot::capture(&ray, &hit);
        assert!(snapshot.tampered_lanes(VBool::one_hot(0), &ray, &hit).none_set());
    }

    #[test]
    fn test_changes_inside_mask_are_allowed() {
        let mut ray = RayK::<4>::empty();
        let mut hit = HitK::<4>::empty();
        let snapshot = PacketSnapshot::capture(&ray, &hit);
        ray.tfar[1] = 3.0;
        hit.u[1] = 0.5;
        assert!(snapshot.tampered_lanes(VBool::one_hot(1), &ray, &hit).none_set());
    }

    #[test]
    fn test_changes_outside_mask_are_reported() {
        let mut ray = RayK::<4>::empty();
        let mut hit = HitK::<4>::empty();
        let before_ray = ray;
        let before_hit = hit;
        ray.geom_id[3] = 0;
        hit.prim_id[2] = 5;
        let tampered = tampered_lanes(VBool::from_bits(0b0011), (&before_ray, &before_hit), (&ray, &hit));
        assert_eq!(tampered.to_array(), [false, false, true, true]);
    }
}
