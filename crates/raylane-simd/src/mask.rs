//! Bit-packed lane masks.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not};

use crate::vint::VInt;
use crate::width::{Lanes, SupportedWidth};

/// A boolean per lane, packed into the low `W` bits of an integer.
///
/// Bits above lane `W - 1` are always clear.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VBool<const W: usize> {
    bits: u16,
}

impl<const W: usize> VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    /// Bits occupied by the `W` lanes.
    const LANE_BITS: u16 = ((1u32 << W) - 1) as u16;

    /// Number of lanes.
    pub const WIDTH: usize = W;

    /// Every lane set.
    #[inline]
    pub fn all() -> Self {
        Self {
            bits: Self::LANE_BITS,
        }
    }

    /// No lane set.
    #[inline]
    pub fn none() -> Self {
        Self { bits: 0 }
    }

    /// Only lane `k` set.
    #[inline]
    pub fn one_hot(k: usize) -> Self {
        debug_assert!(k < W, "lane {k} out of range for width {W}");
        Self::from_bits(1 << k)
    }

    /// Build from a packed bit pattern; bits beyond the lane count are dropped.
    #[inline]
    pub fn from_bits(bits: u16) -> Self {
        Self {
            bits: bits & Self::LANE_BITS,
        }
    }

    /// Build from one `bool` per lane.
    pub fn from_array(lanes: [bool; W]) -> Self {
        let bits = lanes
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &set)| acc | ((set as u16) << i));
        Self { bits }
    }

    /// Packed bit pattern, lane `i` in bit `i`.
    #[inline]
    pub fn bits(self) -> u16 {
        self.bits
    }

    /// One `bool` per lane.
    pub fn to_array(self) -> [bool; W] {
        std::array::from_fn(|i| self.test(i))
    }

    /// Is lane `k` set?
    #[inline]
    pub fn test(self, k: usize) -> bool {
        debug_assert!(k < W, "lane {k} out of range for width {W}");
        (self.bits >> k) & 1 != 0
    }

    /// Set lane `k`.
    #[inline]
    pub fn set(&mut self, k: usize) {
        debug_assert!(k < W, "lane {k} out of range for width {W}");
        self.bits |= 1 << k;
    }

    /// Clear lane `k`.
    #[inline]
    pub fn clear(&mut self, k: usize) {
        debug_assert!(k < W, "lane {k} out of range for width {W}");
        self.bits &= !(1 << k);
    }

    /// Is any lane set?
    #[inline]
    pub fn any(self) -> bool {
        self.bits != 0
    }

    /// Is every lane set?
    #[inline]
    pub fn all_set(self) -> bool {
        self.bits == Self::LANE_BITS
    }

    /// Is no lane set?
    #[inline]
    pub fn none_set(self) -> bool {
        self.bits == 0
    }

    /// Number of set lanes.
    #[inline]
    pub fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// True if every lane set here is also set in `other`.
    #[inline]
    pub fn is_subset_of(self, other: Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Indices of the set lanes, ascending.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let lane = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(lane)
        })
    }

    /// Integer form handed across the callback boundary: `-1` for set lanes, `0` otherwise.
    #[inline]
    pub fn mask32(self) -> VInt<W> {
        VInt::from_array(std::array::from_fn(|i| -((self.bits >> i & 1) as i32)))
    }
}

impl VBool<1> {
    /// The single lane as a plain boolean.
    #[inline]
    pub fn as_bool(self) -> bool {
        self.bits != 0
    }
}

impl From<bool> for VBool<1> {
    fn from(value: bool) -> Self {
        Self { bits: value as u16 }
    }
}

impl From<VBool<1>> for bool {
    fn from(value: VBool<1>) -> Self {
        value.as_bool()
    }
}

impl<const W: usize> BitAnd for VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl<const W: usize> BitAndAssign for VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl<const W: usize> BitOr for VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl<const W: usize> BitOrAssign for VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl<const W: usize> BitXor for VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits ^ rhs.bits,
        }
    }
}

impl<const W: usize> Not for VBool<W>
where
    Lanes<W>: SupportedWidth,
{
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::from_bits(!self.bits)
    }
}

impl<const W: usize> fmt::Debug for VBool<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Lane 0 first, so the output reads in lane order.
        write!(f, "VBool<{W}>[")?;
        for i in 0..W {
            f.write_str(if (self.bits >> i) & 1 != 0 { "1" } else { "0" })?;
        }
        f.write_str("]")
    }
}

/// Per-lane blend: lanes set in `mask` take `if_set`, the rest keep `if_clear`.
#[inline]
pub fn select<T: Copy, const W: usize>(mask: VBool<W>, if_set: [T; W], if_clear: [T; W]) -> [T; W]
where
    Lanes<W>: SupportedWidth,
{
    std::array::from_fn(|i| if mask.test(i) { if_set[i] } else { if_clear[i] })
}
