//! Compile-time lane width selection.

/// Widest packet any build can support.
pub const MAX_WIDTH: usize = 16;

/// Marker type naming a lane count.
///
/// Only `Lanes<W>` for the widths compiled into this build implement
/// [`SupportedWidth`]; everything width-generic in raylane is bounded on it.
#[derive(Debug, Clone, Copy)]
pub struct Lanes<const W: usize>;

mod sealed {
    pub trait Sealed {}
}

/// Implemented for every lane width available in this build.
pub trait SupportedWidth: sealed::Sealed {}

macro_rules! supported_width {
    ($($(#[$attr:meta])* $w:literal),* $(,)?) => {
        $(
            $(#[$attr])*
            impl sealed::Sealed for Lanes<$w> {}
            $(#[$attr])*
            impl SupportedWidth for Lanes<$w> {}
        )*
    };
}

supported_width! {
    1,
    4,
    #[cfg(feature = "width8")]
    8,
    #[cfg(feature = "width16")]
    16,
}

/// Lane widths compiled into this build, ascending.
pub fn supported_widths() -> &'static [usize] {
    &[
        1,
        4,
        #[cfg(feature = "width8")]
        8,
        #[cfg(feature = "width16")]
        16,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_widths_always_present() {
        let widths = supported_widths();
        assert_eq!(&widths[..2], &[1, 4]);
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
        assert!(widths.iter().all(|&w| w <= MAX_WIDTH));
    }

    #[test]
    fn test_feature_widths() {
        let widths = supported_widths();
        assert_eq!(widths.contains(&8), cfg!(feature = "width8"));
        assert_eq!(widths.contains(&16), cfg!(feature = "width16"));
    }
}
