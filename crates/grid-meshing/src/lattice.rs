/// Sorted distinct coordinates along one axis.
#[derive(Debug, Clone)]
pub(crate) struct AxisLattice {
    values: Vec<f64>,
    tolerance: f64,
}

impl AxisLattice {
    pub(crate) fn from_values(values: impl IntoIterator<Item = f64>, tolerance: f64) -> Self {
        let mut values: Vec<f64> = values.into_iter().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup_by(|later, kept| (*later - *kept).abs() < tolerance);
        Self { values, tolerance }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn value(&self, i: usize) -> f64 {
        self.values[i]
    }

    pub(crate) fn index_of(&self, x: f64) -> Option<usize> {
        let i = self.values.partition_point(|v| *v < x - self.tolerance);
        match self.values.get(i) {
            Some(v) if (v - x).abs() < self.tolerance => Some(i),
            _ => None,
        }
    }

    pub(crate) fn span(&self) -> f64 {
        match (self.values.first(), self.values.last()) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }
}
