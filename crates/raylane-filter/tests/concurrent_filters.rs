//! One geometry shared by many threads filtering their own packets.

use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use raylane_filter::{run_intersection_filter, run_occlusion_filter, FilterArgs, Geometry, IntersectContext, UserPtr};
use raylane_packet::{HitK, HitN, HitRecord, RayK, RayN, OCCLUDED_GEOMETRY_ID};
use raylane_simd::VBool;

/// Accepts candidates whose ray id is odd and counts the lanes it saw.
unsafe extern "C" fn odd_rays(
    valid: *mut i32,
    geometry_user_ptr: *mut c_void,
    context_user_ptr: *mut c_void,
    ray: *mut RayN,
    hit: *mut HitN,
    n: usize,
    accept: *mut i32,
) {
    let mut args = FilterArgs::from_raw(valid, geometry_user_ptr, context_user_ptr, ray, hit, n, accept);
    let lanes: Vec<usize> = args.valid_lanes().collect();
    if let Some(seen) = args.geometry_user_data::<AtomicUsize>() {
        seen.fetch_add(lanes.len(), Ordering::Relaxed);
    }
    for i in lanes {
        if args.ray().id(i) % 2 == 1 {
            args.accept(i);
        }
    }
}

struct Batch {
    ray: RayK<4>,
    hit: HitK<4>,
    valid: VBool<4>,
}

fn batches(count: usize) -> Vec<Batch> {
    (0..count)
        .map(|b| {
            let mut ray = RayK::<4>::empty();
            for k in 0..4 {
                ray.set_ray(k, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.0, 1e6);
                ray.id[k] = (b * 4 + k) as u32;
            }
            let hit = HitK::<4>::splat(&HitRecord::new(9, b as u32, 2.0));
            // Every third batch has its last lane switched off.
            let valid = if b % 3 == 0 { VBool::from_bits(0b0111) } else { VBool::all() };
            Batch { ray, hit, valid }
        })
        .collect()
}

#[test]
fn test_parallel_batches_share_one_geometry() {
    let seen = AtomicUsize::new(0);
    let geometry = Geometry::new(9)
        .with_user_data(UserPtr::from_ref(&seen))
        .with_intersection_filter(odd_rays)
        .with_occlusion_filter(odd_rays);
    let context = IntersectContext::default();

    let mut work = batches(256);
    let expected_lanes: usize = work.iter().map(|b| b.valid.count() as usize).sum();

    let accepted: Vec<VBool<4>> = work
        .par_iter_mut()
        .map(|batch| run_intersection_filter(batch.valid, &geometry, &mut batch.ray, &context, &mut batch.hit))
        .collect();

    assert_eq!(seen.load(Ordering::Relaxed), expected_lanes);
    for (batch, accepted) in work.iter().zip(&accepted) {
        assert!(accepted.is_subset_of(batch.valid));
        for k in 0..4 {
            let should_accept = batch.valid.test(k) && batch.ray.id[k] % 2 == 1;
            assert_eq!(accepted.test(k), should_accept);
            assert_eq!(batch.ray.has_hit(k), should_accept);
        }
    }
}

#[test]
fn test_parallel_occlusion() {
    let geometry = Geometry::new(9).with_occlusion_filter(odd_rays);
    let context = IntersectContext::default();
    let mut work = batches(128);

    let occluded: usize = work
        .par_iter_mut()
        .map(|batch| {
            run_occlusion_filter(batch.valid, &geometry, &mut batch.ray, &context, &mut batch.hit).count() as usize
        })
        .sum();

    let marked: usize = work
        .iter()
        .map(|b| b.ray.geom_id.iter().filter(|&&id| id == OCCLUDED_GEOMETRY_ID).count())
        .sum();
    assert_eq!(occluded, marked);
    assert!(occluded > 0);
}
