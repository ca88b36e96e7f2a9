//! Editable scenario fields: labels, bounds and grouping used by the presentation layers.

use serde::{Deserialize, Serialize};

use super::types::ScenarioInput;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    CurrentAge,
    RetirementAge,
    LifeExpectancyAge,
    CurrentSavings,
    MonthlyContribution,
    AnnualReturnRate,
    AnnualContributionGrowthRate,
    AnnualRetirementSpending,
    AnnualInflationRate,
}

impl FieldKey {
    /// Fractional rates, as opposed to ages and yen amounts.
    pub fn is_rate(self) -> bool {
        matches!(
            self,
            FieldKey::AnnualReturnRate
                | FieldKey::AnnualContributionGrowthRate
                | FieldKey::AnnualInflationRate
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub label: &'static str,
    pub step: f64,
    pub min: f64,
    pub max: Option<f64>,
    pub unit: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub field_keys: &'static [FieldKey],
}

pub const FORM_HELPER_TEXT: &str =
    "※ 利回りやインフレ率は割合を小数で入力します（例: 4% → 0.04）。";

pub static FIELDS: [FieldDefinition; 9] = [
    FieldDefinition {
        key: FieldKey::CurrentAge,
        label: "現在の年齢",
        step: 1.0,
        min: 18.0,
        max: Some(80.0),
        unit: "歳",
        description: "シミュレーションの開始時点となる年齢です。",
    },
    FieldDefinition {
        key: FieldKey::RetirementAge,
        label: "退職予定の年齢",
        step: 1.0,
        min: 18.0,
        max: Some(80.0),
        unit: "歳",
        description: "就業を終える想定年齢を入力してください。",
    },
    FieldDefinition {
        key: FieldKey::LifeExpectancyAge,
        label: "シミュレーションする最終年齢",
        step: 1.0,
        min: 40.0,
        max: Some(110.0),
        unit: "歳",
        description: "試算を行う最終年齢（想定寿命）です。",
    },
    FieldDefinition {
        key: FieldKey::CurrentSavings,
        label: "現在の貯蓄額 (円)",
        step: 100_000.0,
        min: 0.0,
        max: Some(200_000_000.0),
        unit: "円",
        description: "現在保有している金融資産の総額を入力します。",
    },
    FieldDefinition {
        key: FieldKey::MonthlyContribution,
        label: "毎月の積立額 (円)",
        step: 1_000.0,
        min: 0.0,
        max: Some(1_000_000.0),
        unit: "円",
        description: "就業期間中に毎月積み立てる金額です。",
    },
    FieldDefinition {
        key: FieldKey::AnnualReturnRate,
        label: "年間利回り (例: 0.04)",
        step: 0.005,
        min: 0.0,
        max: Some(0.25),
        unit: "割合",
        description: "資産運用の想定利回りを小数で入力します（例: 0.04 = 4%）。",
    },
    FieldDefinition {
        key: FieldKey::AnnualContributionGrowthRate,
        label: "積立増加率 (例: 0.03)",
        step: 0.005,
        min: 0.0,
        max: Some(0.15),
        unit: "割合",
        description: "毎年の積立額がどれほど増加するかの割合です。",
    },
    FieldDefinition {
        key: FieldKey::AnnualRetirementSpending,
        label: "退職後の年間支出 (円)",
        step: 100_000.0,
        min: 0.0,
        max: Some(20_000_000.0),
        unit: "円",
        description: "退職後に一年間で必要となる生活費です。",
    },
    FieldDefinition {
        key: FieldKey::AnnualInflationRate,
        label: "インフレ率 (例: 0.02)",
        step: 0.005,
        min: 0.0,
        max: Some(0.1),
        unit: "割合",
        description: "生活費が毎年どの程度上昇するかの想定値です。",
    },
];

pub static FIELD_GROUPS: [FieldGroup; 3] = [
    FieldGroup {
        id: "profile",
        title: "ライフイベント",
        description: "ライフイベントに関する前提条件を設定します。",
        field_keys: &[
            FieldKey::CurrentAge,
            FieldKey::RetirementAge,
            FieldKey::LifeExpectancyAge,
        ],
    },
    FieldGroup {
        id: "accumulation",
        title: "積立・運用条件",
        description: "就業期間中の積立額や運用利回りを調整します。",
        field_keys: &[
            FieldKey::CurrentSavings,
            FieldKey::MonthlyContribution,
            FieldKey::AnnualContributionGrowthRate,
            FieldKey::AnnualReturnRate,
        ],
    },
    FieldGroup {
        id: "retirement",
        title: "退職後の支出条件",
        description: "退職後の生活費とインフレ率を指定します。",
        field_keys: &[FieldKey::AnnualRetirementSpending, FieldKey::AnnualInflationRate],
    },
];

pub fn definition(key: FieldKey) -> &'static FieldDefinition {
    // FIELDS is declared in FieldKey variant order.
    &FIELDS[key as usize]
}

pub fn clamp_to_bounds(key: FieldKey, value: f64) -> f64 {
    let field = definition(key);
    let raised = value.max(field.min);
    match field.max {
        Some(max) => raised.min(max),
        None => raised,
    }
}

pub fn is_within_bounds(key: FieldKey, value: f64) -> bool {
    let field = definition(key);
    value.is_finite() && value >= field.min && field.max.is_none_or(|max| value <= max)
}

impl ScenarioInput {
    pub fn field(&self, key: FieldKey) -> f64 {
        match key {
            FieldKey::CurrentAge => self.current_age as f64,
            FieldKey::RetirementAge => self.retirement_age as f64,
            FieldKey::LifeExpectancyAge => self.life_expectancy_age as f64,
            FieldKey::CurrentSavings => self.current_savings,
            FieldKey::MonthlyContribution => self.monthly_contribution,
            FieldKey::AnnualReturnRate => self.annual_return_rate,
            FieldKey::AnnualContributionGrowthRate => self.annual_contribution_growth_rate,
            FieldKey::AnnualRetirementSpending => self.annual_retirement_spending,
            FieldKey::AnnualInflationRate => self.annual_inflation_rate,
        }
    }

    /// Stores `value` clamped to the field's bounds. Ages are rounded to whole years.
    pub fn set_field(&mut self, key: FieldKey, value: f64) {
        let clamped = clamp_to_bounds(key, value);
        let age = clamped.round() as u32;
        match key {
            FieldKey::CurrentAge => self.current_age = age,
            FieldKey::RetirementAge => self.retirement_age = age,
            FieldKey::LifeExpectancyAge => self.life_expectancy_age = age,
            FieldKey::CurrentSavings => self.current_savings = clamped,
            FieldKey::MonthlyContribution => self.monthly_contribution = clamped,
            FieldKey::AnnualReturnRate => self.annual_return_rate = clamped,
            FieldKey::AnnualContributionGrowthRate => {
                self.annual_contribution_growth_rate = clamped
            }
            FieldKey::AnnualRetirementSpending => self.annual_retirement_spending = clamped,
            FieldKey::AnnualInflationRate => self.annual_inflation_rate = clamped,
        }
    }

    pub fn with_field(mut self, key: FieldKey, value: f64) -> Self {
        self.set_field(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn groups_cover_every_field_exactly_once() {
        let defined: HashSet<FieldKey> = FIELDS.iter().map(|f| f.key).collect();
        let grouped: Vec<FieldKey> = FIELD_GROUPS
            .iter()
            .flat_map(|g| g.field_keys.iter().copied())
            .collect();

        assert_eq!(defined.len(), FIELDS.len());
        assert_eq!(grouped.len(), FIELDS.len());
        let grouped_set: HashSet<FieldKey> = grouped.iter().copied().collect();
        assert_eq!(grouped_set, defined);
    }

    #[test]
    fn definition_lookup_returns_catalogue_entry() {
        for field in FIELDS.iter() {
            assert_eq!(definition(field.key).key, field.key);
            assert!(std::ptr::eq(definition(field.key), field));
        }
    }

    #[test]
    fn clamp_respects_min_and_max() {
        assert_eq!(clamp_to_bounds(FieldKey::CurrentAge, 5.0), 18.0);
        assert_eq!(clamp_to_bounds(FieldKey::LifeExpectancyAge, 150.0), 110.0);
        assert_eq!(clamp_to_bounds(FieldKey::AnnualReturnRate, 0.3), 0.25);
        assert_eq!(clamp_to_bounds(FieldKey::AnnualReturnRate, 0.07), 0.07);
        assert_eq!(clamp_to_bounds(FieldKey::CurrentSavings, -10.0), 0.0);
    }

    #[test]
    fn bounds_check_rejects_non_finite_values() {
        assert!(is_within_bounds(FieldKey::AnnualInflationRate, 0.1));
        assert!(!is_within_bounds(FieldKey::AnnualInflationRate, 0.11));
        assert!(!is_within_bounds(FieldKey::CurrentSavings, f64::NAN));
        assert!(!is_within_bounds(FieldKey::CurrentSavings, f64::INFINITY));
    }

    #[test]
    fn set_field_clamps_and_rounds_ages() {
        let input = ScenarioInput::default()
            .with_field(FieldKey::RetirementAge, 64.6)
            .with_field(FieldKey::CurrentAge, 3.0)
            .with_field(FieldKey::MonthlyContribution, 5_000_000.0);

        assert_eq!(input.retirement_age, 65);
        assert_eq!(input.current_age, 18);
        assert_eq!(input.monthly_contribution, 1_000_000.0);
    }

    #[test]
    fn field_reads_back_what_set_field_stored() {
        let mut input = ScenarioInput::default();
        for field in FIELDS.iter() {
            let value = field.max.unwrap_or(field.min);
            input.set_field(field.key, value);
            assert_eq!(input.field(field.key), value);
        }
    }

    #[test]
    fn rate_fields_are_flagged() {
        let rates: Vec<FieldKey> = FIELDS
            .iter()
            .map(|f| f.key)
            .filter(|k| k.is_rate())
            .collect();
        assert_eq!(
            rates,
            vec![
                FieldKey::AnnualReturnRate,
                FieldKey::AnnualContributionGrowthRate,
                FieldKey::AnnualInflationRate
            ]
        );
        for key in rates {
            assert_eq!(definition(key).unit, "割合");
        }
    }

    #[test]
    fn default_scenario_sits_inside_bounds() {
        let input = ScenarioInput::default();
        for field in FIELDS.iter() {
            assert!(is_within_bounds(field.key, input.field(field.key)));
        }
    }
}
