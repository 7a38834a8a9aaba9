//! Float math for std/no_std builds
//!
//! `f64::sqrt` lives in std; `no_std` builds go through libm.

#[cfg(feature = "std")]
#[inline]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(0.25), 0.5);
        assert!(sqrt(-1e-18).is_nan());
    }
}
