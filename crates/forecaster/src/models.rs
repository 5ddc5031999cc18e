use serde::{Deserialize, Serialize};
use std::fmt;

/// The regressors competing for each forecast, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateModel {
    LinearRegression,
    RandomForest,
}

impl CandidateModel {
    pub const ALL: [CandidateModel; 2] = [
        CandidateModel::LinearRegression,
        CandidateModel::RandomForest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CandidateModel::LinearRegression => "Linear Regression",
            CandidateModel::RandomForest => "Random Forest",
        }
    }
}

impl fmt::Display for CandidateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "smartcore")]
pub(crate) use backend::{Regressor, to_dense};

#[cfg(feature = "smartcore")]
mod backend {
    use super::CandidateModel;
    use analytics::AnalyticsError;
    use configuration::ForecastSettings;
    use ndarray::ArrayView2;
    use smartcore::ensemble::random_forest_regressor::{
        RandomForestRegressor, RandomForestRegressorParameters,
    };
    use smartcore::linalg::basic::matrix::DenseMatrix;
    use smartcore::linear::linear_regression::{
        LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
    };

    type Linear = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;
    type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

    /// A fitted candidate.
    pub(crate) enum Regressor {
        Linear(Linear),
        Forest(Forest),
    }

    impl Regressor {
        pub(crate) fn fit(
            model: CandidateModel,
            x: &DenseMatrix<f64>,
            y: &Vec<f64>,
            settings: &ForecastSettings,
        ) -> Result<Self, AnalyticsError> {
            let fitted = match model {
                CandidateModel::LinearRegression => {
                    // SVD copes with the strongly collinear moving-average columns.
                    let params = LinearRegressionParameters::default()
                        .with_solver(LinearRegressionSolverName::SVD);
                    Linear::fit(x, y, params).map(Regressor::Linear)
                }
                CandidateModel::RandomForest => {
                    let mut params = RandomForestRegressorParameters::default()
                        .with_n_trees(settings.n_trees.into())
                        .with_seed(settings.seed);
                    if let Some(depth) = settings.max_depth {
                        params = params.with_max_depth(depth);
                    }
                    Forest::fit(x, y, params).map(Regressor::Forest)
                }
            };

            fitted.map_err(|e| {
                AnalyticsError::InternalComputation(format!("Failed to fit {model}: {e}"))
            })
        }

        pub(crate) fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, AnalyticsError> {
            let predicted = match self {
                Regressor::Linear(m) => m.predict(x),
                Regressor::Forest(m) => m.predict(x),
            };
            predicted.map_err(|e| AnalyticsError::InternalComputation(format!("Prediction failed: {e}")))
        }
    }

    /// Row-major copy of an ndarray matrix into the shape smartcore fits on.
    pub(crate) fn to_dense(data: ArrayView2<f64>) -> Result<DenseMatrix<f64>, AnalyticsError> {
        let values: Vec<f64> = data.iter().copied().collect();
        DenseMatrix::new(data.nrows(), data.ncols(), values, false).map_err(|e| {
            AnalyticsError::InternalComputation(format!("Failed to create DenseMatrix: {e}"))
        })
    }
}
