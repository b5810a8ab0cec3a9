//! Inclusive numeric bands used by clause applicability conditions.

use serde::Serialize;

/// An inclusive `[min, max]` interval with optional ends.
///
/// A missing end is unbounded. Both ends are inclusive: a value equal to `min` or `max`
/// lies inside the band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Band<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Band<T>
where
    T: Copy + PartialOrd + Into<f64>,
{
    /// A band with no bounds at all.
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    /// `true` when at least one end is present.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Inclusive containment check.
    pub fn contains(&self, value: T) -> bool {
        let above_min = self.min.is_none_or(|min| value >= min);
        let below_max = self.max.is_none_or(|max| value <= max);
        above_min && below_max
    }

    /// Width of the band, `f64::INFINITY` if either end is open.
    pub fn width(&self) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) => max.into() - min.into(),
            (None, Some(max)) => {
                // Floor area and capacity are never negative, so an open lower end is zero.
                max.into()
            }
            _ => f64::INFINITY,
        }
    }

    /// `true` when `min <= max` (or either end is open).
    pub fn is_ordered(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

impl<T> Default for Band<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let band = Band::new(Some(50.0), Some(150.0));
        assert!(band.contains(50.0));
        assert!(band.contains(150.0));
        assert!(!band.contains(150.5));
        assert!(!band.contains(49.9));
    }

    #[test]
    fn open_ends_are_unbounded() {
        let at_least: Band<u32> = Band::new(Some(51), None);
        assert!(at_least.contains(51));
        assert!(at_least.contains(u32::MAX));
        assert!(!at_least.contains(50));
        assert!(Band::<u32>::unbounded().contains(0));
    }

    #[test]
    fn width_treats_open_upper_end_as_infinite() {
        assert_eq!(Band::new(Some(0.0), Some(150.0)).width(), 150.0);
        assert_eq!(Band::new(None, Some(50u32)).width(), 50.0);
        assert!(Band::new(Some(300.0), None).width().is_infinite());
        assert!(Band::<f64>::unbounded().width().is_infinite());
    }

    #[test]
    fn detects_inverted_bands() {
        assert!(!Band::new(Some(200u32), Some(100)).is_ordered());
        assert!(Band::new(Some(100u32), Some(100)).is_ordered());
    }
}
