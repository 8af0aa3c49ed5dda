// src/interval.rs

//! Axis-aligned boxes in grid space (`Interval`) and in continuous space
//! (`RealInterval`).

/// An n-dimensional box of integer positions, `min` and `max` both inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl Interval {
    /// Creates an interval from inclusive corners.
    ///
    /// # Panics
    /// If `min` and `max` differ in length or `min[d] > max[d]` for any `d`.
    pub fn new(min: &[i64], max: &[i64]) -> Self {
        assert_eq!(
            min.len(),
            max.len(),
            "interval corners differ in dimensionality ({} vs {})",
            min.len(),
            max.len()
        );
        for (d, (lo, hi)) in min.iter().zip(max).enumerate() {
            assert!(lo <= hi, "interval is empty along dimension {d}: {lo} > {hi}");
        }
        Interval {
            min: min.to_vec(),
            max: max.to_vec(),
        }
    }

    /// Creates the interval `[0, dims[d])` along every dimension.
    ///
    /// # Panics
    /// If any entry of `dims` is zero or larger than `i64::MAX`.
    pub fn from_dimensions(dims: &[u64]) -> Self {
        let min = vec![0; dims.len()];
        let max: Vec<i64> = dims
            .iter()
            .enumerate()
            .map(|(d, &n)| match i64::try_from(n) {
                Ok(n) => n - 1,
                Err(_) => panic!("dimension {d} has {n} positions, more than an i64 grid can address"),
            })
            .collect();
        Interval::new(&min, &max)
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    #[inline]
    pub fn min(&self) -> &[i64] {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &[i64] {
        &self.max
    }

    /// Number of positions along dimension `d`.
    ///
    /// # Panics
    /// If the extent does not fit in a `u64` (`[i64::MIN, i64::MAX]`).
    #[inline]
    pub fn dimension(&self, d: usize) -> u64 {
        // max >= min, so the difference fits in u64 even when i64 overflows.
        self.max[d]
            .abs_diff(self.min[d])
            .checked_add(1)
            .unwrap_or_else(|| panic!("dimension {d} spans more than u64::MAX positions"))
    }

    /// Total number of positions in the interval.
    ///
    /// # Panics
    /// If the count does not fit in a `usize`.
    pub fn size(&self) -> usize {
        (0..self.num_dimensions()).fold(1usize, |acc, d| {
            usize::try_from(self.dimension(d))
                .ok()
                .and_then(|n| acc.checked_mul(n))
                .unwrap_or_else(|| panic!("interval has more positions than fit in a usize"))
        })
    }

    /// Returns a copy with dimension `d` restricted to `[min, max]`.
    pub(crate) fn with_range(&self, d: usize, min: i64, max: i64) -> Self {
        let mut out = self.clone();
        out.min[d] = min;
        out.max[d] = max;
        Interval::new(&out.min, &out.max)
    }

    /// All positions in flat order, first dimension fastest.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            interval: self,
            next: Some(self.min.clone()),
        }
    }

    /// The same box in continuous coordinates.
    pub fn to_real(&self) -> RealInterval {
        RealInterval {
            min: self.min.iter().map(|&v| v as f64).collect(),
            max: self.max.iter().map(|&v| v as f64).collect(),
        }
    }
}

/// Iterator over the positions of an [`Interval`].
pub struct Positions<'a> {
    interval: &'a Interval,
    next: Option<Vec<i64>>,
}

impl Iterator for Positions<'_> {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Vec<i64>> {
        let current = self.next.take()?;
        let mut following = current.clone();
        for d in 0..following.len() {
            if following[d] < self.interval.max[d] {
                following[d] += 1;
                self.next = Some(following);
                return Some(current);
            }
            following[d] = self.interval.min[d];
        }
        // Wrapped around every dimension: `current` was the last position.
        Some(current)
    }
}

/// An n-dimensional box in continuous space, both ends inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct RealInterval {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl RealInterval {
    /// # Panics
    /// If `min` and `max` differ in length or `min[d] > max[d]` for any `d`.
    pub fn new(min: &[f64], max: &[f64]) -> Self {
        assert_eq!(
            min.len(),
            max.len(),
            "real interval corners differ in dimensionality ({} vs {})",
            min.len(),
            max.len()
        );
        for (d, (lo, hi)) in min.iter().zip(max).enumerate() {
            assert!(lo <= hi, "real interval is empty along dimension {d}: {lo} > {hi}");
        }
        RealInterval {
            min: min.to_vec(),
            max: max.to_vec(),
        }
    }

    /// Like [`RealInterval::new`], but a NaN corner component widens that
    /// side to infinity. Bounds estimators use this so that `0 * inf` and
    /// `inf - inf` give an unbounded axis instead of an invalid box.
    ///
    /// # Panics
    /// Under the same conditions as [`RealInterval::new`] once NaNs are
    /// replaced.
    pub fn widened(min: &[f64], max: &[f64]) -> Self {
        let min: Vec<f64> = min
            .iter()
            .map(|&v| if v.is_nan() { f64::NEG_INFINITY } else { v })
            .collect();
        let max: Vec<f64> = max
            .iter()
            .map(|&v| if v.is_nan() { f64::INFINITY } else { v })
            .collect();
        RealInterval::new(&min, &max)
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    #[inline]
    pub fn real_min(&self) -> &[f64] {
        &self.min
    }

    #[inline]
    pub fn real_max(&self) -> &[f64] {
        &self.max
    }

    /// Whether `position` lies inside the box (boundary included).
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.num_dimensions()
            && position
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(p, (lo, hi))| lo <= p && p <= hi)
    }
}
