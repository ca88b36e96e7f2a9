use serde::Serialize;

use super::format::{format_currency, format_percent};
use super::types::{ScenarioSummary, YearRecord};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTone {
    Positive,
    Warning,
    Neutral,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTrend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: &'static str,
    pub title: &'static str,
    pub highlight: String,
    pub description: String,
    pub tone: InsightTone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<InsightTrend>,
}

const COVERAGE_POSITIVE: f64 = 0.95;
const COVERAGE_NEUTRAL: f64 = 0.65;
const WEALTH_POSITIVE: f64 = 1.2;
const WEALTH_NEUTRAL: f64 = 0.85;

/// Derives display insights from a finished projection.
///
/// Returns an empty list when there is no summary (the projection was rejected) or the
/// timeline is empty.
pub fn build_insights(
    summary: Option<&ScenarioSummary>,
    timeline: &[YearRecord],
    retirement_age: u32,
) -> Vec<Insight> {
    let Some(summary) = summary else {
        return Vec::new();
    };
    let Some(peak) = peak_balance(timeline) else {
        return Vec::new();
    };

    let mut insights = Vec::with_capacity(4);
    insights.push(Insight {
        id: "peak-balance",
        title: "最大残高",
        highlight: format_currency(peak.end_balance),
        description: format!(
            "{} 年（{} 歳）の時点で最も多く資産を保有しています。",
            peak.year, peak.age
        ),
        tone: InsightTone::Positive,
        trend: Some(InsightTrend::Up),
    });

    let retirement_years = timeline
        .iter()
        .filter(|record| record.age >= retirement_age)
        .count();
    if retirement_years > 0 {
        let ratio = summary.years_funded_after_retirement as f64 / retirement_years as f64;
        insights.push(Insight {
            id: "retirement-coverage",
            title: "退職後の資金カバレッジ",
            highlight: format_percent(clamp_ratio(ratio)),
            description: format!(
                "退職後 {retirement_years} 年のうち {} 年で生活費を満額引き出せています。",
                summary.years_funded_after_retirement
            ),
            tone: coverage_tone(ratio),
            trend: coverage_trend(ratio),
        });
    }

    if summary.total_contributions > 0.0 {
        let multiple = summary.final_balance / summary.total_contributions;
        let (tone, trend) = wealth_tone(multiple);
        insights.push(Insight {
            id: "wealth-multiple",
            title: "資産成長倍率",
            highlight: format!("{multiple:.2}x"),
            description: format!(
                "累計積立額 {} に対し、最終残高は {} です。",
                format_currency(summary.total_contributions),
                format_currency(summary.final_balance)
            ),
            tone,
            trend,
        });
    }

    insights.push(match summary.shortfall_year {
        Some(year) => Insight {
            id: "shortfall-warning",
            title: "不足発生日",
            highlight: format!("{year} 年"),
            description: "この年以降は生活費を満額引き出せません。積立額や支出条件を見直しましょう。"
                .to_string(),
            tone: InsightTone::Warning,
            trend: Some(InsightTrend::Down),
        },
        None => Insight {
            id: "shortfall-none",
            title: "不足なし",
            highlight: "最後まで生活費を確保".to_string(),
            description: "全期間を通じて生活費を満額引き出せています。".to_string(),
            tone: InsightTone::Positive,
            trend: Some(InsightTrend::Up),
        },
    });

    insights
}

// Earliest record wins ties.
fn peak_balance(timeline: &[YearRecord]) -> Option<&YearRecord> {
    let (first, rest) = timeline.split_first()?;
    Some(rest.iter().fold(first, |peak, record| {
        if record.end_balance > peak.end_balance {
            record
        } else {
            peak
        }
    }))
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

fn coverage_tone(ratio: f64) -> InsightTone {
    if ratio >= COVERAGE_POSITIVE {
        InsightTone::Positive
    } else if ratio >= COVERAGE_NEUTRAL {
        InsightTone::Neutral
    } else {
        InsightTone::Warning
    }
}

fn coverage_trend(ratio: f64) -> Option<InsightTrend> {
    if ratio >= COVERAGE_POSITIVE {
        Some(InsightTrend::Up)
    } else if ratio < COVERAGE_NEUTRAL {
        Some(InsightTrend::Down)
    } else {
        None
    }
}

fn wealth_tone(multiple: f64) -> (InsightTone, Option<InsightTrend>) {
    if multiple >= WEALTH_POSITIVE {
        (InsightTone::Positive, Some(InsightTrend::Up))
    } else if multiple >= WEALTH_NEUTRAL {
        (InsightTone::Neutral, None)
    } else {
        (InsightTone::Warning, Some(InsightTrend::Down))
    }
}
