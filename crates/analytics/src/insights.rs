use crate::indicators::IndicatorSet;
use crate::report::ReturnResult;
use configuration::InsightThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a generated insight. Each category has exactly one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    StrongPerformance,
    GoodPerformance,
    PositiveReturns,
    NegativeReturns,
    HighVolatility,
    ModerateVolatility,
    LowVolatility,
    Overbought,
    Oversold,
    AboveTrend,
    BelowTrend,
    TechnologySector,
    HealthcareSector,
    FinancialSector,
    HighDrawdown,
    /// Fallback when the inputs cannot be classified.
    Unavailable,
}

impl InsightKind {
    /// A short, stable tag for the category.
    pub fn tag(&self) -> &'static str {
        match self {
            InsightKind::StrongPerformance => "strong",
            InsightKind::GoodPerformance => "good",
            InsightKind::PositiveReturns => "positive",
            InsightKind::NegativeReturns => "negative",
            InsightKind::HighVolatility => "high volatility",
            InsightKind::ModerateVolatility => "moderate volatility",
            InsightKind::LowVolatility => "low volatility",
            InsightKind::Overbought => "overbought",
            InsightKind::Oversold => "oversold",
            InsightKind::AboveTrend => "above trend",
            InsightKind::BelowTrend => "below trend",
            InsightKind::TechnologySector => "technology",
            InsightKind::HealthcareSector => "healthcare",
            InsightKind::FinancialSector => "financial",
            InsightKind::HighDrawdown => "high drawdown",
            InsightKind::Unavailable => "unavailable",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            InsightKind::StrongPerformance => {
                "Strong Performance: This investment has delivered exceptional returns above 20%."
            }
            InsightKind::GoodPerformance => {
                "Good Performance: Solid returns above 10%, beating most savings accounts."
            }
            InsightKind::PositiveReturns => {
                "Positive Returns: Modest gains, but still outperforming cash."
            }
            InsightKind::NegativeReturns => {
                "Negative Returns: This investment has declined in value."
            }
            InsightKind::HighVolatility => {
                "High Volatility: This stock shows significant price swings. Consider position sizing."
            }
            InsightKind::ModerateVolatility => {
                "Moderate Volatility: Normal price fluctuations for growth stocks."
            }
            InsightKind::LowVolatility => "Low Volatility: Relatively stable price movements.",
            InsightKind::Overbought => {
                "Overbought Territory: RSI above 70 suggests potential pullback ahead."
            }
            InsightKind::Oversold => {
                "Oversold Territory: RSI below 30 suggests potential bounce ahead."
            }
            InsightKind::AboveTrend => {
                "Above Moving Average: Price is trending above 20-day average."
            }
            InsightKind::BelowTrend => {
                "Below Moving Average: Price is trending below 20-day average."
            }
            InsightKind::TechnologySector => {
                "Tech Sector: Consider market cycles and innovation trends."
            }
            InsightKind::HealthcareSector => "Healthcare: Defensive sector with steady demand.",
            InsightKind::FinancialSector => {
                "Financials: Sensitive to interest rates and economic cycles."
            }
            InsightKind::HighDrawdown => {
                "High Drawdown: Maximum decline exceeded 30%. Review risk tolerance."
            }
            InsightKind::Unavailable => "Unable to generate insights at this time.",
        }
    }
}

/// One human-readable observation about a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl From<InsightKind> for Insight {
    fn from(kind: InsightKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sector keywords, checked in order; the first match wins.
const SECTOR_RULES: [(&str, InsightKind); 3] = [
    ("technology", InsightKind::TechnologySector),
    ("healthcare", InsightKind::HealthcareSector),
    ("financial", InsightKind::FinancialSector),
];

/// The rule ladder that turns metrics into insights.
///
/// Rules are evaluated independently and their results concatenated in a fixed order:
/// performance, risk, RSI, trend, sector, drawdown.
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    thresholds: InsightThresholds,
}

impl InsightGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    /// Never fails. Non-finite inputs yield a single [`InsightKind::Unavailable`].
    pub fn generate(
        &self,
        returns: &ReturnResult,
        indicators: &IndicatorSet,
        sector: Option<&str>,
    ) -> Vec<Insight> {
        if !returns.is_finite() {
            tracing::error!(?returns, "Cannot generate insights from non-finite returns");
            return vec![InsightKind::Unavailable.into()];
        }

        let t = &self.thresholds;
        let mut kinds = Vec::with_capacity(6);

        kinds.push(if returns.percent_return > t.strong_return_pct {
            InsightKind::StrongPerformance
        } else if returns.percent_return > t.good_return_pct {
            InsightKind::GoodPerformance
        } else if returns.percent_return > 0.0 {
            InsightKind::PositiveReturns
        } else {
            InsightKind::NegativeReturns
        });

        kinds.push(if returns.volatility_annualized_pct > t.high_volatility_pct {
            InsightKind::HighVolatility
        } else if returns.volatility_annualized_pct > t.moderate_volatility_pct {
            InsightKind::ModerateVolatility
        } else {
            InsightKind::LowVolatility
        });

        if !indicators.is_empty() {
            // Missing RSI reads as neutral.
            let rsi = indicators.rsi.unwrap_or(50.0);
            if rsi > t.rsi_overbought {
                kinds.push(InsightKind::Overbought);
            } else if rsi < t.rsi_oversold {
                kinds.push(InsightKind::Oversold);
            }

            if indicators.price_vs_ma20 > t.trend_band_pct {
                kinds.push(InsightKind::AboveTrend);
            } else if indicators.price_vs_ma20 < -t.trend_band_pct {
                kinds.push(InsightKind::BelowTrend);
            }
        }

        if let Some(kind) = sector.and_then(sector_kind) {
            kinds.push(kind);
        }

        if returns.max_drawdown_pct < t.drawdown_warning_pct {
            kinds.push(InsightKind::HighDrawdown);
        }

        tracing::debug!(count = kinds.len(), "Generated insights");
        kinds.into_iter().map(Insight::from).collect()
    }
}

fn sector_kind(sector: &str) -> Option<InsightKind> {
    let sector = sector.to_lowercase();
    SECTOR_RULES
        .iter()
        .find(|(keyword, _)| sector.contains(keyword))
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn returns(percent_return: f64, volatility: f64, drawdown: f64) -> ReturnResult {
        ReturnResult {
            initial_price: 100.0,
            final_price: 100.0 * (1.0 + percent_return / 100.0),
            shares: 10.0,
            initial_investment: 1000.0,
            final_value: 1000.0 * (1.0 + percent_return / 100.0),
            total_return: 10.0 * percent_return,
            percent_return,
            volatility_annualized_pct: volatility,
            max_drawdown_pct: drawdown,
            days_invested: 100,
        }
    }

    fn indicators(rsi: Option<f64>, price_vs_ma20: f64) -> IndicatorSet {
        IndicatorSet {
            current_price: Some(100.0),
            rsi,
            price_vs_ma20,
            ..IndicatorSet::empty()
        }
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn performance_buckets_use_strict_thresholds() {
        let g = InsightGenerator::new();
        let empty = IndicatorSet::empty();
        let cases = [
            (25.0, InsightKind::StrongPerformance),
            (20.0, InsightKind::GoodPerformance),
            (10.0, InsightKind::PositiveReturns),
            (0.0, InsightKind::NegativeReturns),
            (-5.0, InsightKind::NegativeReturns),
        ];
        for (pct, expected) in cases {
            let out = g.generate(&returns(pct, 10.0, 0.0), &empty, None);
            assert_eq!(out[0].kind, expected, "percent_return = {pct}");
        }
    }

    #[test]
    fn full_ladder_keeps_fixed_order() {
        let out = InsightGenerator::new().generate(
            &returns(30.0, 45.0, -35.0),
            &indicators(Some(75.0), 8.0),
            Some("Information Technology"),
        );
        assert_eq!(
            kinds(&out),
            vec![
                InsightKind::StrongPerformance,
                InsightKind::HighVolatility,
                InsightKind::Overbought,
                InsightKind::AboveTrend,
                InsightKind::TechnologySector,
                InsightKind::HighDrawdown,
            ]
        );
    }

    #[test]
    fn technical_rules_skip_empty_indicators() {
        let out = InsightGenerator::new().generate(
            &returns(5.0, 30.0, -10.0),
            &IndicatorSet::empty(),
            None,
        );
        assert_eq!(
            kinds(&out),
            vec![InsightKind::PositiveReturns, InsightKind::ModerateVolatility]
        );
    }

    #[test]
    fn neutral_rsi_and_trend_emit_nothing() {
        let out = InsightGenerator::new().generate(
            &returns(5.0, 10.0, 0.0),
            &indicators(Some(50.0), 2.0),
            Some("Utilities"),
        );
        assert_eq!(out.len(), 2);

        let missing_rsi = InsightGenerator::new().generate(
            &returns(5.0, 10.0, 0.0),
            &indicators(None, -6.0),
            None,
        );
        assert_eq!(kinds(&missing_rsi)[2], InsightKind::BelowTrend);
    }

    #[test]
    fn oversold_and_sector_match_is_case_insensitive() {
        let out = InsightGenerator::new().generate(
            &returns(-2.0, 10.0, 0.0),
            &indicators(Some(20.0), 0.0),
            Some("FINANCIAL Services"),
        );
        assert!(kinds(&out).contains(&InsightKind::Oversold));
        assert!(kinds(&out).contains(&InsightKind::FinancialSector));
    }

    #[test]
    fn non_finite_returns_fall_back() {
        let out = InsightGenerator::new().generate(
            &returns(f64::NAN, 10.0, 0.0),
            &IndicatorSet::empty(),
            None,
        );
        assert_eq!(kinds(&out), vec![InsightKind::Unavailable]);
        assert_eq!(out[0].to_string(), InsightKind::Unavailable.message());
    }
}
