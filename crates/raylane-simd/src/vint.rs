//! Integer lane vectors.

use std::ops::{BitAnd, BitAndAssign};

use bytemuck::{Pod, Zeroable};

use crate::mask::VBool;
use crate::width::{Lanes, SupportedWidth};

/// One `i32` per lane.
///
/// This is the shape masks take when they cross the callback boundary: the
/// callback receives a pointer to the first lane and writes through it.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VInt<const W: usize>([i32; W]);

// SAFETY: a transparent wrapper over `[i32; W]`, which is itself `Pod`.
unsafe impl<const W: usize> Zeroable for VInt<W> {}
unsafe impl<const W: usize> Pod for VInt<W> {}

impl<const W: usize> VInt<W>
where
    Lanes<W>: SupportedWidth,
{
    /// All lanes zero.
    #[inline]
    pub fn zero() -> Self {
        Zeroable::zeroed()
    }

    /// All lanes equal to `value`.
    #[inline]
    pub fn splat(value: i32) -> Self {
        Self([value; W])
    }

    /// Wrap a lane array.
    #[inline]
    pub fn from_array(lanes: [i32; W]) -> Self {
        Self(lanes)
    }

    /// Copy out the lanes.
    #[inline]
    pub fn to_array(self) -> [i32; W] {
        self.0
    }

    /// Value of lane `k`.
    #[inline]
    pub fn lane(&self, k: usize) -> i32 {
        self.0[k]
    }

    /// Lanes as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Lanes as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.0
    }

    /// Pointer to lane 0, for handing to external code.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut i32 {
        self.0.as_mut_ptr()
    }

    /// Lanes that are not zero.
    #[inline]
    pub fn ne_zero(self) -> VBool<W> {
        let bits = self
            .0
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &v)| acc | (((v != 0) as u16) << i));
        VBool::from_bits(bits)
    }
}

impl<const W: usize> BitAnd for VInt<W>
where
    Lanes<W>: SupportedWidth,
{
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl<const W: usize> BitAndAssign for VInt<W>
where
    Lanes<W>: SupportedWidth,
{
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs &= rhs;
        }
    }
}

impl<const W: usize> From<VBool<W>> for VInt<W>
where
    Lanes<W>: SupportedWidth,
{
    fn from(mask: VBool<W>) -> Self {
        mask.mask32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(VInt::<4>::zero().to_array(), [0; 4]);
        assert!(VInt::<4>::zero().ne_zero().none_set());
    }

    #[test]
    fn test_ne_zero_any_nonzero_value_counts() {
        let v = VInt::<4>::from_array([0, 1, -1, i32::MIN]);
        assert_eq!(v.ne_zero().to_array(), [false, true, true, true]);
    }

    #[test]
    fn test_and_with_mask_clears_outside_lanes() {
        let accept = VInt::<4>::splat(5);
        let mask = VBool::<4>::from_bits(0b0110).mask32();
        let masked = accept & mask;
        assert_eq!(masked.to_array(), [0, 5, 5, 0]);

        let mut in_place = accept;
        in_place &= mask;
        assert_eq!(in_place, masked);
    }

    #[test]
    fn test_pointer_writes_land_in_lanes() {
        let mut v = VInt::<4>::zero();
        let ptr = v.as_mut_ptr();
        // SAFETY: lane 2 is in bounds of the four-lane vector.
        unsafe { ptr.add(2).write(3) };
        assert_eq!(v.lane(2), 3);
        assert_eq!(v.as_slice(), &[0, 0, 3, 0]);
    }

    #[test]
    fn test_from_mask() {
        let v: VInt<1> = VBool::<1>::all().into();
        assert_eq!(v.to_array(), [-1]);
    }
}
