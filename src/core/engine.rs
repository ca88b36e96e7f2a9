use chrono::Datelike;

use super::error::ProjectionError;
use super::types::{Projection, ScenarioInput, ScenarioSummary, YearRecord};

#[derive(Debug, Clone, Copy)]
struct YearFlow {
    contribution: f64,
    investment_growth: f64,
    withdrawal: f64,
    end_balance: f64,
}

#[derive(Debug, Default)]
struct Totals {
    contributions: f64,
    withdrawals: f64,
    shortfall_year: Option<i32>,
}

/// Projects `input` year by year from `base_year` until the life-expectancy age.
///
/// The running balance is carried at full precision; only the emitted records and
/// summary totals are rounded to two decimals.
pub fn project(input: &ScenarioInput, base_year: i32) -> Result<Projection, ProjectionError> {
    validate(input)?;
    last_year(input, base_year)?;

    let total_years = input.life_expectancy_age - input.current_age;
    let mut timeline = Vec::with_capacity(total_years as usize + 1);
    let mut totals = Totals::default();
    let mut balance = input.current_savings;

    for offset in 0..=total_years {
        let age = input.current_age + offset;
        let year = base_year + offset as i32;

        let flow = simulate_year(input, age, offset, balance, year, &mut totals);
        balance = flow.end_balance;

        timeline.push(YearRecord {
            age,
            year,
            contribution: round2(flow.contribution),
            investment_growth: round2(flow.investment_growth),
            withdrawal: round2(flow.withdrawal),
            end_balance: round2(flow.end_balance),
        });
    }

    let years_funded_after_retirement = timeline
        .iter()
        .filter(|record| record.age >= input.retirement_age && record.withdrawal > 0.0)
        .count() as u32;

    Ok(Projection {
        timeline,
        summary: ScenarioSummary {
            total_contributions: round2(totals.contributions),
            total_withdrawals: round2(totals.withdrawals),
            final_balance: round2(balance),
            shortfall_year: totals.shortfall_year,
            years_funded_after_retirement,
        },
    })
}

/// Same as [`project`] with the local calendar year as the base year.
pub fn project_current_year(input: &ScenarioInput) -> Result<Projection, ProjectionError> {
    project(input, current_year())
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn last_year(input: &ScenarioInput, base_year: i32) -> Result<i32, ProjectionError> {
    i32::try_from(input.life_expectancy_age - input.current_age)
        .ok()
        .and_then(|span| base_year.checked_add(span))
        .ok_or(ProjectionError::BaseYearOutOfRange)
}

fn validate(input: &ScenarioInput) -> Result<(), ProjectionError> {
    if input.retirement_age < input.current_age {
        return Err(ProjectionError::InvalidRetirementAge);
    }
    if input.life_expectancy_age <= input.current_age {
        return Err(ProjectionError::InvalidLifeExpectancy);
    }
    Ok(())
}

// Contribution, then growth on the post-contribution balance, then withdrawal.
fn simulate_year(
    input: &ScenarioInput,
    age: u32,
    offset: u32,
    prior_balance: f64,
    year: i32,
    totals: &mut Totals,
) -> YearFlow {
    let is_working = age < input.retirement_age;
    let contribution = if is_working {
        annual_contribution(input, offset)
    } else {
        0.0
    };

    let balance_after_contribution = prior_balance + contribution;
    let investment_growth = balance_after_contribution * input.annual_return_rate;
    let available = balance_after_contribution + investment_growth;

    let withdrawal = if is_working {
        0.0
    } else {
        let planned = planned_withdrawal(input, age - input.retirement_age);
        let actual = available.min(planned);
        if actual < planned && totals.shortfall_year.is_none() {
            totals.shortfall_year = Some(year);
        }
        actual
    };

    totals.contributions += contribution;
    totals.withdrawals += withdrawal;

    YearFlow {
        contribution,
        investment_growth,
        withdrawal,
        end_balance: (available - withdrawal).max(0.0),
    }
}

// Growth compounds from the first simulated year, not from the first working year.
fn annual_contribution(input: &ScenarioInput, offset: u32) -> f64 {
    input.monthly_contribution
        * 12.0
        * (1.0 + input.annual_contribution_growth_rate).powi(offset as i32)
}

fn planned_withdrawal(input: &ScenarioInput, years_since_retirement: u32) -> f64 {
    input.annual_retirement_spending
        * (1.0 + input.annual_inflation_rate).powi(years_since_retirement as i32)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
