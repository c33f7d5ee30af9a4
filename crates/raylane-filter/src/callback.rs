//! The filter callback ABI and a safe view over its arguments.

use std::ffi::c_void;

use raylane_packet::{HitN, HitNMut, RayN, RayNMut};

/// Signature of a user filter callback.
///
/// One callback serves every packet width: it receives the lane count `n`
/// and opaque packet handles rather than typed packets.
///
/// - `valid`: `n` lanes, nonzero where the lane holds a live ray. The callback
///   may write here, but nothing it writes is trusted afterwards.
/// - `geometry_user_ptr`: the user data registered on the geometry.
/// - `context_user_ptr`: the user pointer of the current query.
/// - `ray`, `hit`: the ray packet and the candidate hit packet.
/// - `accept`: `n` lanes, zero on entry; write nonzero to keep a candidate.
///
/// A callback may only touch ray and hit fields of lanes set in `valid`. It
/// can be called concurrently from several threads and must be stateless or
/// synchronize internally.
pub type FilterFnN = unsafe extern "C" fn(
    valid: *mut i32,
    geometry_user_ptr: *mut c_void,
    context_user_ptr: *mut c_void,
    ray: *mut RayN,
    hit: *mut HitN,
    n: usize,
    accept: *mut i32,
);

/// User data pointer carried by a geometry or a query context.
///
/// raylane never dereferences it; it is passed through to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPtr(*mut c_void);

// SAFETY: the pointer is only forwarded, never dereferenced here. Whoever
// registers it is responsible for the pointee being usable from the threads
// that run queries.
unsafe impl Send for UserPtr {}
unsafe impl Sync for UserPtr {}

impl UserPtr {
    /// No user data.
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Wrap a raw pointer.
    pub const fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Point at a value that outlives every query using it.
    pub fn from_ref<T>(value: &T) -> Self {
        Self((value as *const T).cast_mut().cast())
    }

    /// The raw pointer.
    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Is this the null pointer?
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for UserPtr {
    fn default() -> Self {
        Self::null()
    }
}

/// Arguments of one callback invocation, viewed safely.
///
/// Built once at the top of a callback with [`FilterArgs::from_raw`]; the rest
/// of the callback can then be ordinary safe code.
///
/// ```
/// use std::ffi::c_void;
/// use raylane_filter::FilterArgs;
/// use raylane_packet::{HitN, RayN};
///
/// // Keep only candidates on even primitive ids.
/// unsafe extern "C" fn even_prims(
///     valid: *mut i32,
///     geometry_user_ptr: *mut c_void,
///     context_user_ptr: *mut c_void,
///     ray: *mut RayN,
///     hit: *mut HitN,
///     n: usize,
///     accept: *mut i32,
/// ) {
///     let mut args = FilterArgs::from_raw(
///         valid, geometry_user_ptr, context_user_ptr, ray, hit, n, accept,
///     );
///     for i in args.valid_lanes().collect::<Vec<_>>() {
///         if args.hit().prim_id(i) % 2 == 0 {
///             args.accept(i);
///         }
///     }
/// }
/// ```
pub struct FilterArgs<'a> {
    valid: &'a mut [i32],
    accept: &'a mut [i32],
    ray: RayNMut<'a>,
    hit: HitNMut<'a>,
    geometry_user: UserPtr,
    context_user: UserPtr,
}

impl<'a> FilterArgs<'a> {
    /// Wrap the raw arguments a [`FilterFnN`] received.
    ///
    /// # Safety
    ///
    /// All pointers must be the ones passed to the callback by raylane, or
    /// otherwise point to live, unaliased buffers of `n` lanes for `'a`.
    pub unsafe fn from_raw(
        valid: *mut i32,
        geometry_user_ptr: *mut c_void,
        context_user_ptr: *mut c_void,
        ray: *mut RayN,
        hit: *mut HitN,
        n: usize,
        accept: *mut i32,
    ) -> Self {
        Self {
            valid: std::slice::from_raw_parts_mut(valid, n),
            accept: std::slice::from_raw_parts_mut(accept, n),
            ray: RayNMut::from_raw(ray, n),
            hit: HitNMut::from_raw(hit, n),
            geometry_user: UserPtr::new(geometry_user_ptr),
            context_user: UserPtr::new(context_user_ptr),
        }
    }

    /// Number of lanes in the packets.
    pub fn width(&self) -> usize {
        self.valid.len()
    }

    /// Does lane `i` hold a live ray?
    #[inline]
    pub fn is_valid(&self, i: usize) -> bool {
        self.valid[i] != 0
    }

    /// Indices of the live lanes.
    pub fn valid_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| (v != 0).then_some(i))
    }

    /// Raw validity lanes. Writes are allowed and ignored by the caller.
    pub fn valid_mut(&mut self) -> &mut [i32] {
        &mut *self.valid
    }

    /// Keep the candidate of lane `i`.
    #[inline]
    pub fn accept(&mut self, i: usize) {
        self.accept[i] = -1;
    }

    /// Drop the candidate of lane `i`.
    #[inline]
    pub fn reject(&mut self, i: usize) {
        self.accept[i] = 0;
    }

    /// Raw accept lanes.
    pub fn accept_mut(&mut self) -> &mut [i32] {
        &mut *self.accept
    }

    /// The ray packet.
    pub fn ray(&mut self) -> &mut RayNMut<'a> {
        &mut self.ray
    }

    /// The candidate hit packet.
    pub fn hit(&mut self) -> &mut HitNMut<'a> {
        &mut self.hit
    }

    /// Both packets at once.
    pub fn packets(&mut self) -> (&mut RayNMut<'a>, &mut HitNMut<'a>) {
        (&mut self.ray, &mut self.hit)
    }

    /// User data registered on the geometry.
    pub fn geometry_user_ptr(&self) -> *mut c_void {
        self.geometry_user.as_ptr()
    }

    /// User pointer of the current query.
    pub fn context_user_ptr(&self) -> *mut c_void {
        self.context_user.as_ptr()
    }

    /// Geometry user data as a `T`, if any was registered.
    ///
    /// # Safety
    ///
    /// The registered pointer must point to a live `T`.
    pub unsafe fn geometry_user_data<T>(&self) -> Option<&'a T> {
        self.geometry_user.as_ptr().cast::<T>().as_ref()
    }

    /// Query user data as a `T`, if any was supplied.
    ///
    /// # Safety
    ///
    /// The query's user pointer must point to a live `T`.
    pub unsafe fn context_user_data<T>(&self) -> Option<&'a T> {
        self.context_user.as_ptr().cast::<T>().as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raylane_packet::{HitK, HitRecord, RayK};
    use raylane_simd::{VBool, VInt};

    #[test]
    fn test_args_over_typed_packets() {
        let mut ray = RayK::<4>::empty();
        let mut hit = HitK::<4>::splat(&HitRecord::new(3, 8, 2.0));
        let mut valid = VBool::<4>::from_bits(0b0101).mask32();
        let mut accept = VInt::<4>::zero();
        let payload = 17u64;

        {
            // SAFETY: every buffer is live and exclusively borrowed for this block.
            let mut args = unsafe {
                FilterArgs::from_raw(
                    valid.as_mut_ptr(),
                    UserPtr::from_ref(&payload).as_ptr(),
                    std::ptr::null_mut(),
                    ray.as_raw_n(),
                    hit.as_raw_n(),
                    4,
                    accept.as_mut_ptr(),
                )
            };
            assert_eq!(args.width(), 4);
            assert_eq!(args.valid_lanes().collect::<Vec<_>>(), vec![0, 2]);
            // SAFETY: the geometry pointer was built from `payload` above.
            assert_eq!(unsafe { args.geometry_user_data::<u64>() }, Some(&17));
            assert!(unsafe { args.context_user_data::<u64>() }.is_none());
            assert_eq!(args.hit().prim_id(2), 8);
            args.ray().set_u(2, 0.5);
            args.accept(2);
            args.accept(0);
            args.reject(0);
        }

        assert_eq!(accept.to_array(), [0, 0, -1, 0]);
        assert_eq!(ray.u[2], 0.5);
    }

    #[test]
    fn test_user_ptr_null() {
        assert!(UserPtr::default().is_null());
        let value = 1u8;
        assert!(!UserPtr::from_ref(&value).is_null());
    }
}
