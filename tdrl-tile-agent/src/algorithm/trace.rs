//! Sparse accumulating eligibility trace.

/// Accumulating eligibility trace over the weights of a tile code.
///
/// Only a handful of entries are non-zero at any time, so the indices of the
/// live entries are kept next to the dense values. Entries that decay below
/// the threshold are reset to zero and forgotten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EligibilityTrace {
    values: Vec<f32>,
    active: Vec<usize>,
    threshold: f32,
}

impl EligibilityTrace {
    /// Constructs a zero trace over `size` weights.
    pub fn new(size: usize, threshold: f32) -> Self {
        Self {
            values: vec![0.0; size],
            active: vec![],
            threshold,
        }
    }

    /// Multiplies every live entry by `factor`.
    pub fn decay(&mut self, factor: f32) {
        let values = &mut self.values;
        let threshold = self.threshold;
        self.active.retain(|&i| {
            values[i] *= factor;
            if values[i] == 0.0 || values[i].abs() < threshold {
                values[i] = 0.0;
                false
            } else {
                true
            }
        });
    }

    /// Adds one to the entries at `indices`.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range. Feature vectors of the tile code
    /// the trace was built for are always in range.
    pub fn accumulate(&mut self, indices: &[usize]) {
        for &i in indices {
            if self.values[i] == 0.0 {
                self.active.push(i);
            }
            self.values[i] += 1.0;
        }
    }

    /// Iterates over `(index, value)` of the live entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.active.iter().map(move |&i| (i, self.values[i]))
    }

    /// Returns the entry at `i`, zero if out of range.
    pub fn get(&self, i: usize) -> f32 {
        self.values.get(i).copied().unwrap_or(0.0)
    }

    /// Resets every entry to zero.
    pub fn clear(&mut self) {
        for &i in self.active.iter() {
            self.values[i] = 0.0;
        }
        self.active.clear();
    }

    /// Returns the number of live entries.
    pub fn num_active(&self) -> usize {
        self.active.len()
    }

    /// Returns the number of weights the trace covers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the trace covers no weights.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_decay() {
        let mut trace = EligibilityTrace::new(5, 0.01);
        trace.accumulate(&[1, 3]);
        trace.decay(0.5);
        trace.accumulate(&[3]);

        assert_eq!(trace.get(1), 0.5);
        assert_eq!(trace.get(3), 1.5);
        assert_eq!(trace.get(0), 0.0);
        assert_eq!(trace.get(10), 0.0);
        assert_eq!(trace.num_active(), 2);

        let mut entries: Vec<_> = trace.iter().collect();
        entries.sort_by_key(|&(i, _)| i);
        assert_eq!(entries, vec![(1, 0.5), (3, 1.5)]);
    }

    #[test]
    fn test_small_entries_are_dropped() {
        let mut trace = EligibilityTrace::new(3, 0.1);
        trace.accumulate(&[0]);
        trace.decay(0.2);
        assert_eq!(trace.num_active(), 1);
        trace.decay(0.2);
        assert_eq!(trace.num_active(), 0);
        assert_eq!(trace.get(0), 0.0);

        // Zero decay forgets everything regardless of the threshold.
        let mut trace = EligibilityTrace::new(3, 0.0);
        trace.accumulate(&[0, 2]);
        trace.decay(0.0);
        assert_eq!(trace.num_active(), 0);
    }

    #[test]
    fn test_clear() {
        let mut trace = EligibilityTrace::new(4, 0.0);
        trace.accumulate(&[0, 1, 1]);
        assert_eq!(trace.get(1), 2.0);
        assert_eq!(trace.num_active(), 2);
        trace.clear();
        assert_eq!(trace.iter().count(), 0);
        assert_eq!(trace.get(1), 0.0);
        assert_eq!(trace.len(), 4);
    }
}
