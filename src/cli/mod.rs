use clap::{Args, Parser, Subcommand};
use std::fmt::{self, Write as _};
use tracing::debug;

use crate::api::{ApiRequest, ProjectResponse, build_project_response};
use crate::core::{
    FieldKey, ScenarioInput, current_year, definition, format_currency, is_within_bounds,
};

#[derive(Parser, Debug)]
#[command(
    name = "lifeplan",
    about = "Deterministic retirement savings projection (contributions, returns, inflation-adjusted spending)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Project one scenario and print the yearly timeline
    Project(ProjectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(long, default_value_t = 32)]
    pub current_age: u32,
    #[arg(long, default_value_t = 65)]
    pub retirement_age: u32,
    #[arg(long, default_value_t = 90, help = "Last age to project through")]
    pub life_expectancy_age: u32,
    #[arg(long, default_value_t = 5_000_000.0, help = "Current savings in yen")]
    pub current_savings: f64,
    #[arg(
        long,
        default_value_t = 60_000.0,
        help = "Monthly contribution in yen while working"
    )]
    pub monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Expected annual investment return in percent, e.g. 4"
    )]
    pub annual_return_rate: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual growth of contributions in percent (e.g. pay rises)"
    )]
    pub annual_contribution_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 3_600_000.0,
        help = "Annual spending in the first retirement year, in today's yen"
    )]
    pub annual_retirement_spending: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Annual inflation of retirement spending in percent"
    )]
    pub annual_inflation_rate: f64,
    #[arg(long, help = "First projected calendar year; defaults to the current year")]
    pub base_year: Option<i32>,
    #[arg(long, help = "Print the JSON response body instead of a table")]
    pub json: bool,
}

impl Default for ProjectArgs {
    fn default() -> Self {
        let input = ScenarioInput::default();
        Self {
            current_age: input.current_age,
            retirement_age: input.retirement_age,
            life_expectancy_age: input.life_expectancy_age,
            current_savings: input.current_savings,
            monthly_contribution: input.monthly_contribution,
            annual_return_rate: input.annual_return_rate * 100.0,
            annual_contribution_growth_rate: input.annual_contribution_growth_rate * 100.0,
            annual_retirement_spending: input.annual_retirement_spending,
            annual_inflation_rate: input.annual_inflation_rate * 100.0,
            base_year: None,
            json: false,
        }
    }
}

/// Validates flag values against the field bounds and converts percentages to fractions.
pub fn build_input(args: &ProjectArgs) -> Result<ScenarioInput, String> {
    let flags = [
        ("--current-age", FieldKey::CurrentAge, args.current_age as f64),
        ("--retirement-age", FieldKey::RetirementAge, args.retirement_age as f64),
        (
            "--life-expectancy-age",
            FieldKey::LifeExpectancyAge,
            args.life_expectancy_age as f64,
        ),
        ("--current-savings", FieldKey::CurrentSavings, args.current_savings),
        (
            "--monthly-contribution",
            FieldKey::MonthlyContribution,
            args.monthly_contribution,
        ),
        (
            "--annual-return-rate",
            FieldKey::AnnualReturnRate,
            args.annual_return_rate / 100.0,
        ),
        (
            "--annual-contribution-growth-rate",
            FieldKey::AnnualContributionGrowthRate,
            args.annual_contribution_growth_rate / 100.0,
        ),
        (
            "--annual-retirement-spending",
            FieldKey::AnnualRetirementSpending,
            args.annual_retirement_spending,
        ),
        (
            "--annual-inflation-rate",
            FieldKey::AnnualInflationRate,
            args.annual_inflation_rate / 100.0,
        ),
    ];

    let mut input = ScenarioInput::default();
    for (flag, key, value) in flags {
        if !is_within_bounds(key, value) {
            return Err(bounds_message(flag, key));
        }
        input.set_field(key, value);
    }
    Ok(input)
}

fn bounds_message(flag: &str, key: FieldKey) -> String {
    let field = definition(key);
    let shown = |bound: f64| {
        if key.is_rate() {
            // Rates are entered in percent on the command line.
            (bound * 100.0 * 1_000.0).round() / 1_000.0
        } else {
            bound
        }
    };
    match field.max {
        Some(max) => format!(
            "{flag} must be between {} and {}",
            shown(field.min),
            shown(max)
        ),
        None => format!("{flag} must be >= {}", shown(field.min)),
    }
}

/// Runs a projection for the parsed flags and renders it for the terminal.
pub fn run_project(args: &ProjectArgs) -> Result<String, String> {
    let request = ApiRequest {
        input: build_input(args)?,
        base_year: args.base_year.unwrap_or_else(current_year),
    };
    debug!(base_year = request.base_year, "projecting scenario from CLI");

    let response = build_project_response(&request).map_err(|e| e.to_string())?;
    if args.json {
        serde_json::to_string_pretty(&response).map_err(|e| format!("Failed to encode JSON: {e}"))
    } else {
        Ok(render_report(&response))
    }
}

pub fn render_report(response: &ProjectResponse) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_report(&mut out, response).map(|()| out).unwrap_or_default()
}

fn write_report(out: &mut String, response: &ProjectResponse) -> fmt::Result {
    writeln!(
        out,
        "{:>4} {:>6} {:>16} {:>16} {:>16} {:>18}",
        "Age", "Year", "Contribution", "Growth", "Withdrawal", "End balance"
    )?;
    writeln!(out, "{}", "-".repeat(81))?;
    for record in &response.timeline {
        let marker = if record.age == response.conditions.retirement_age {
            " *"
        } else {
            ""
        };
        writeln!(
            out,
            "{:>4} {:>6} {:>16} {:>16} {:>16} {:>18}{marker}",
            record.age,
            record.year,
            format_currency(record.contribution),
            format_currency(record.investment_growth),
            format_currency(record.withdrawal),
            format_currency(record.end_balance),
        )?;
    }

    let summary = &response.summary;
    writeln!(out)?;
    writeln!(
        out,
        "Total contributions: {}",
        format_currency(summary.total_contributions)
    )?;
    writeln!(
        out,
        "Total withdrawals:   {}",
        format_currency(summary.total_withdrawals)
    )?;
    writeln!(
        out,
        "Final balance:       {}",
        format_currency(summary.final_balance)
    )?;
    let shortfall = summary
        .shortfall_year
        .map_or_else(|| "none".to_string(), |year| year.to_string());
    writeln!(out, "Shortfall year:      {shortfall}")?;
    writeln!(
        out,
        "Funded retirement years: {}",
        summary.years_funded_after_retirement
    )?;

    if !response.insights.is_empty() {
        writeln!(out)?;
        for insight in &response.insights {
            writeln!(
                out,
                "[{:?}] {}: {} ({})",
                insight.tone, insight.title, insight.highlight, insight.description
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_args_match_default_scenario() {
        let input = build_input(&ProjectArgs::default()).expect("valid defaults");
        assert_eq!(input.current_age, 32);
        assert_approx(input.annual_return_rate, 0.04);
        assert_approx(input.annual_contribution_growth_rate, 0.03);
        assert_approx(input.annual_inflation_rate, 0.02);
    }

    #[test]
    fn parses_project_flags_in_percent() {
        let cli = Cli::try_parse_from([
            "lifeplan",
            "project",
            "--current-age",
            "35",
            "--annual-return-rate",
            "5",
            "--annual-inflation-rate",
            "1.5",
            "--base-year",
            "2025",
        ])
        .expect("flags should parse");
        let Command::Project(args) = cli.command else {
            panic!("expected project subcommand");
        };

        let input = build_input(&args).expect("valid inputs");
        assert_eq!(input.current_age, 35);
        assert_approx(input.annual_return_rate, 0.05);
        assert_approx(input.annual_inflation_rate, 0.015);
        assert_eq!(args.base_year, Some(2025));
    }

    #[test]
    fn serve_port_defaults_to_8080() {
        let cli = Cli::try_parse_from(["lifeplan", "serve"]).expect("serve should parse");
        assert!(matches!(cli.command, Command::Serve { port: 8080 }));
    }

    #[test]
    fn build_input_rejects_out_of_range_return() {
        let args = ProjectArgs {
            annual_return_rate: 30.0,
            ..ProjectArgs::default()
        };
        let err = build_input(&args).expect_err("must reject 30% return");
        assert_eq!(err, "--annual-return-rate must be between 0 and 25");
    }

    #[test]
    fn build_input_rejects_non_finite_savings() {
        let args = ProjectArgs {
            current_savings: f64::NAN,
            ..ProjectArgs::default()
        };
        let err = build_input(&args).expect_err("must reject NaN");
        assert!(err.contains("--current-savings"));
    }

    #[test]
    fn run_project_surfaces_engine_message() {
        let args = ProjectArgs {
            current_age: 50,
            retirement_age: 40,
            base_year: Some(2025),
            ..ProjectArgs::default()
        };
        let err = run_project(&args).expect_err("must reject retirement before current age");
        assert_eq!(err, "退職年齢は現在の年齢以上である必要があります。");
    }

    #[test]
    fn report_lists_every_year_and_summary() {
        let args = ProjectArgs {
            current_age: 60,
            retirement_age: 62,
            life_expectancy_age: 64,
            base_year: Some(2030),
            ..ProjectArgs::default()
        };
        let report = run_project(&args).expect("valid scenario");

        for year in 2030..=2034 {
            assert!(report.contains(&year.to_string()), "missing {year}");
        }
        assert!(report.contains("End balance"));
        assert!(report.contains("Final balance:"));
        assert!(report.contains("Shortfall year:"));
        assert!(report.contains("最大残高"));
    }

    #[test]
    fn run_project_rejects_overflowing_base_year() {
        let args = ProjectArgs {
            base_year: Some(i32::MAX),
            ..ProjectArgs::default()
        };
        let err = run_project(&args).expect_err("last year overflows");
        assert_eq!(err, "開始年が計算可能な範囲を超えています。");
    }

    #[test]
    fn report_ends_with_summary_and_insights() {
        let args = ProjectArgs {
            base_year: Some(2025),
            ..ProjectArgs::default()
        };
        let report = run_project(&args).expect("valid scenario");
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0].split_whitespace().next(), Some("Age"));
        assert!(lines.iter().any(|l| l.starts_with("Funded retirement years: ")));
        assert!(lines.last().is_some_and(|l| l.starts_with('[')));
    }

    #[test]
    fn json_output_is_the_api_response() {
        let args = ProjectArgs {
            base_year: Some(2025),
            json: true,
            ..ProjectArgs::default()
        };
        let out = run_project(&args).expect("valid scenario");
        let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(value["baseYear"], 2025);
        assert_eq!(value["timeline"][0]["age"], 32);
    }
}
