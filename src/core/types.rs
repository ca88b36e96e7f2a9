use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy_age: u32,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    /// Fractional yearly return, e.g. 0.04 for 4%.
    pub annual_return_rate: f64,
    /// Spending target in the first retirement year, before inflation.
    pub annual_retirement_spending: f64,
    pub annual_contribution_growth_rate: f64,
    pub annual_inflation_rate: f64,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            current_age: 32,
            retirement_age: 65,
            life_expectancy_age: 90,
            current_savings: 5_000_000.0,
            monthly_contribution: 60_000.0,
            annual_return_rate: 0.04,
            annual_retirement_spending: 3_600_000.0,
            annual_contribution_growth_rate: 0.03,
            annual_inflation_rate: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub age: u32,
    pub year: i32,
    pub contribution: f64,
    pub investment_growth: f64,
    pub withdrawal: f64,
    pub end_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub total_contributions: f64,
    pub total_withdrawals: f64,
    pub final_balance: f64,
    pub shortfall_year: Option<i32>,
    pub years_funded_after_retirement: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub timeline: Vec<YearRecord>,
    pub summary: ScenarioSummary,
}
