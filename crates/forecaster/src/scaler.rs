use analytics::AnalyticsError;
use ndarray::{Array2, ArrayView2};

/// Ranges narrower than this are treated as constant columns.
const MIN_RANGE: f64 = 1e-10;

/// Per-column min-max normalization to `[0, 1]` over the data it was fitted on.
///
/// Fit it on the training partition only, then reuse it for the test partition and
/// the projection rows. Values outside the fitted range map outside `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    ranges: Vec<f64>,
    fitted: bool,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, data: ArrayView2<f64>) -> Result<(), AnalyticsError> {
        let (n_samples, n_features) = data.dim();
        if n_samples == 0 {
            return Err(AnalyticsError::InternalComputation(
                "cannot fit a scaler on zero rows".to_string(),
            ));
        }

        self.mins = Vec::with_capacity(n_features);
        self.ranges = Vec::with_capacity(n_features);

        for column in data.columns() {
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = max - min;
            self.mins.push(min);
            // Avoid division by zero
            self.ranges.push(if range < MIN_RANGE { 1.0 } else { range });
        }

        self.fitted = true;
        Ok(())
    }

    pub fn transform(&self, data: ArrayView2<f64>) -> Result<Array2<f64>, AnalyticsError> {
        if !self.fitted {
            return Err(AnalyticsError::InternalComputation(
                "scaler must be fitted before transform".to_string(),
            ));
        }
        if data.ncols() != self.mins.len() {
            return Err(AnalyticsError::InternalComputation(format!(
                "scaler was fitted on {} columns, got {}",
                self.mins.len(),
                data.ncols()
            )));
        }

        let mut scaled = data.to_owned();
        for ((mut column, min), range) in scaled
            .columns_mut()
            .into_iter()
            .zip(&self.mins)
            .zip(&self.ranges)
        {
            column.mapv_inplace(|v| (v - min) / range);
        }
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn training_data_maps_onto_unit_interval() {
        let train = array![[1.0, 10.0], [3.0, 30.0], [2.0, 20.0]];
        let mut scaler = MinMaxScaler::new();
        scaler.fit(train.view()).unwrap();

        let scaled = scaler.transform(train.view()).unwrap();
        assert_eq!(scaled, array![[0.0, 0.0], [1.0, 1.0], [0.5, 0.5]]);
    }

    #[test]
    fn unseen_rows_use_training_statistics() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(array![[0.0], [10.0]].view()).unwrap();

        let scaled = scaler.transform(array![[20.0], [-5.0]].view()).unwrap();
        assert!((scaled[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((scaled[[1, 0]] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_shifted_not_divided() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(array![[5.0], [5.0]].view()).unwrap();
        let scaled = scaler.transform(array![[5.0], [6.0]].view()).unwrap();
        assert_eq!(scaled, array![[0.0], [1.0]]);
    }

    #[test]
    fn transform_requires_fit_and_matching_width() {
        let scaler = MinMaxScaler::new();
        assert!(scaler.transform(array![[1.0]].view()).is_err());

        let mut scaler = MinMaxScaler::new();
        scaler.fit(array![[1.0, 2.0]].view()).unwrap();
        assert!(scaler.transform(array![[1.0]].view()).is_err());
    }
}
