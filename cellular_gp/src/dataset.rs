use ndarray::{Array1, Array2};
use num_traits::Float;

/// A regression sample set: `x` holds one row per sample, `y` the targets.
#[derive(Clone, Debug)]
pub struct Dataset<T: Float> {
    /// Row-major contiguous data with shape `(n_rows, n_features)`.
    pub x: Array2<T>,
    pub y: Array1<T>,
    pub n_rows: usize,
    pub n_features: usize,
    pub variable_names: Vec<String>,
}

impl<T: Float> Dataset<T> {
    pub fn new(x: Array2<T>, y: Array1<T>) -> Self {
        Self::with_names(x, y, Vec::new())
    }

    pub fn with_names(x: Array2<T>, y: Array1<T>, variable_names: Vec<String>) -> Self {
        let x = x.as_standard_layout().to_owned();
        let (n_rows, n_features) = x.dim();
        assert_eq!(y.len(), n_rows, "x and y row counts must match");
        if !variable_names.is_empty() {
            assert_eq!(variable_names.len(), n_features);
        }
        Self {
            x,
            y,
            n_rows,
            n_features,
            variable_names,
        }
    }

    /// Build a dataset from `(inputs, target)` sample tuples.
    pub fn from_samples(samples: &[(Vec<T>, T)]) -> Self {
        assert!(!samples.is_empty(), "sample set must be non-empty");
        let n_features = samples[0].0.len();
        let mut flat = Vec::with_capacity(samples.len() * n_features);
        let mut y = Vec::with_capacity(samples.len());
        for (inputs, target) in samples {
            assert_eq!(inputs.len(), n_features, "ragged sample rows");
            flat.extend(inputs.iter().copied());
            y.push(*target);
        }
        let x = Array2::from_shape_vec((samples.len(), n_features), flat)
            .expect("shape follows from construction");
        Self::new(x, Array1::from_vec(y))
    }

    pub fn y_slice(&self) -> &[T] {
        self.y.as_slice().expect("y is contiguous")
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn from_samples_builds_row_major() {
        let d = Dataset::from_samples(&[(vec![1.0, 2.0], 3.0), (vec![4.0, 5.0], 9.0)]);
        assert_eq!(d.n_rows, 2);
        assert_eq!(d.n_features, 2);
        assert_eq!(d.x, array![[1.0, 2.0], [4.0, 5.0]]);
        assert_eq!(d.y_slice(), &[3.0, 9.0]);
    }
}
