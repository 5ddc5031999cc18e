use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of already-adjusted OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Absent when the upstream source carries no volume column.
    #[serde(default)]
    pub volume: Option<f64>,
}

impl PriceBar {
    /// A bar where open, high, low and close are all the same price.
    pub fn flat(date: NaiveDate, close: f64, volume: Option<f64>) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn check(&self) -> Result<(), CoreError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in fields
            .into_iter()
            .chain(self.volume.map(|v| ("volume", v)))
        {
            if !value.is_finite() {
                return Err(CoreError::NonFinite {
                    date: self.date,
                    field,
                });
            }
            if value < 0.0 {
                return Err(CoreError::Negative {
                    date: self.date,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    fn anomaly(&self) -> Option<AnomalyKind> {
        if self.high < self.open.max(self.close) {
            Some(AnomalyKind::HighBelowBody)
        } else if self.low > self.open.min(self.close) {
            Some(AnomalyKind::LowAboveBody)
        } else {
            None
        }
    }
}

/// The ways a bar can break the OHLC envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    /// `high < max(open, close)`
    HighBelowBody,
    /// `low > min(open, close)`
    LowAboveBody,
}

/// A tolerated inconsistency found while validating a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarAnomaly {
    pub date: NaiveDate,
    pub kind: AnomalyKind,
}

/// A validated, date-ordered daily price series.
///
/// Validation happens once, in [`PriceSeries::new`]. Hard violations (unordered or
/// duplicate dates, negative or non-finite values) are rejected; OHLC envelope
/// violations are kept and recorded as [`BarAnomaly`]s.
///
/// There is no way to mutate the bars after construction; every analytics component
/// derives new values from a shared `&PriceSeries`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
    anomalies: Vec<BarAnomaly>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, CoreError> {
        let mut anomalies = Vec::new();

        for (i, bar) in bars.iter().enumerate() {
            bar.check()?;

            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(CoreError::UnorderedDates {
                    previous: bars[i - 1].date,
                    current: bar.date,
                });
            }

            if let Some(kind) = bar.anomaly() {
                tracing::warn!(date = %bar.date, ?kind, "OHLC envelope violation in price series");
                anomalies.push(BarAnomaly {
                    date: bar.date,
                    kind,
                });
            }
        }

        Ok(Self { bars, anomalies })
    }

    /// Builds a series from `(date, close)` pairs with no volume.
    pub fn from_closes<I>(closes: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            closes
                .into_iter()
                .map(|(date, close)| PriceBar::flat(date, close, None))
                .collect(),
        )
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last().map(|b| b.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The volume column, or `None` unless every bar carries a volume.
    pub fn volumes(&self) -> Option<Vec<f64>> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn has_volume(&self) -> bool {
        !self.bars.is_empty() && self.bars.iter().all(|b| b.volume.is_some())
    }

    pub fn anomalies(&self) -> &[BarAnomaly] {
        &self.anomalies
    }

    /// Derives the sub-series that starts at the first bar on or after `start`.
    ///
    /// This is how an investment start date is applied to a longer history.
    pub fn since(&self, start: NaiveDate) -> PriceSeries {
        let from = self.bars.partition_point(|b| b.date < start);
        let bars = self.bars[from..].to_vec();
        let anomalies = self
            .anomalies
            .iter()
            .filter(|a| a.date >= start)
            .copied()
            .collect();
        PriceSeries { bars, anomalies }
    }

    /// Calendar days between the first and the last bar.
    pub fn calendar_span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }

    pub fn quality_report(&self) -> DataQualityReport {
        DataQualityReport::for_series(self)
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = CoreError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

/// What validation noticed about a series, for display next to the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub data_points: usize,
    pub anomaly_count: usize,
    pub flat_prices: bool,
    pub missing_volume: bool,
    pub warnings: Vec<String>,
}

impl DataQualityReport {
    fn for_series(series: &PriceSeries) -> Self {
        let mut warnings = Vec::new();

        if series.is_empty() {
            warnings.push("No data available".to_string());
        }

        let flat_prices = series.len() > 1
            && series
                .bars()
                .windows(2)
                .all(|w| w[0].close == w[1].close);
        if flat_prices {
            warnings.push("No price variance detected (flat prices)".to_string());
        }

        let missing_volume = !series.is_empty() && !series.has_volume();
        if missing_volume {
            warnings.push("Volume data missing for some or all records".to_string());
        }

        let anomaly_count = series.anomalies().len();
        if anomaly_count > 0 {
            warnings.push(format!(
                "{anomaly_count} record(s) violate the high/low price envelope"
            ));
        }

        Self {
            data_points: series.len(),
            anomaly_count,
            flat_prices,
            missing_volume,
            warnings,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
