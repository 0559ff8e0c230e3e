use fixedbitset::FixedBitSet;

/// Required-property tracking for one object decoder.
///
/// Each leaf property owns one bit. The decoder sets a bit in a fresh set
/// whenever it reads the property; at the end of the object every required
/// bit must be present. The check is a block-wise subset test, not a
/// per-property walk.
///
/// ```
/// use jg_codegen::plan::TrackingMask;
///
/// let mut mask = TrackingMask::new(3);
/// mask.require(0);
/// mask.require(2);
///
/// let mut seen = mask.fresh();
/// seen.insert(0);
/// assert!(!mask.is_satisfied(&seen));
/// assert_eq!(mask.first_missing(&seen), Some(2));
///
/// seen.insert(2);
/// assert!(mask.is_satisfied(&seen));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingMask {
    required: FixedBitSet,
}

impl TrackingMask {
    /// A mask over `len` properties with nothing required.
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            required: FixedBitSet::with_capacity(len),
        }
    }

    #[inline]
    pub fn require(&mut self, bit: usize) {
        self.required.insert(bit);
    }

    #[inline]
    pub fn is_required(&self, bit: usize) -> bool {
        self.required.contains(bit)
    }

    /// Number of tracked properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.required.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Whether any property is required at all.
    #[inline]
    pub fn has_requirements(&self) -> bool {
        !self.required.is_clear()
    }

    /// An empty "seen" set sized for this mask.
    #[inline]
    pub fn fresh(&self) -> FixedBitSet {
        FixedBitSet::with_capacity(self.required.len())
    }

    #[inline]
    pub fn is_satisfied(&self, seen: &FixedBitSet) -> bool {
        self.required.is_subset(seen)
    }

    pub fn first_missing(&self, seen: &FixedBitSet) -> Option<usize> {
        self.required.difference(seen).next()
    }
}

#[cfg(test)]
mod tests {
    use super::TrackingMask;

    #[test]
    fn wide_masks() {
        let mut mask = TrackingMask::new(130);
        for bit in [0, 64, 129] {
            mask.require(bit);
        }
        assert!(mask.has_requirements());
        assert_eq!(mask.len(), 130);

        let mut seen = mask.fresh();
        seen.insert_range(0..100);
        assert_eq!(mask.first_missing(&seen), Some(129));
        seen.insert(129);
        assert!(mask.is_satisfied(&seen));
    }

    #[test]
    fn nothing_required() {
        let mask = TrackingMask::new(4);
        assert!(!mask.has_requirements());
        assert!(mask.is_satisfied(&mask.fresh()));
        assert!(!mask.is_required(1));
    }
}
