mod engine;
mod error;
mod fields;
mod format;
mod insights;
mod types;

pub use engine::{current_year, project, project_current_year};
pub use error::ProjectionError;
pub use fields::{
    FIELD_GROUPS, FIELDS, FORM_HELPER_TEXT, FieldDefinition, FieldGroup, FieldKey,
    clamp_to_bounds, definition, is_within_bounds,
};
pub use format::{format_currency, format_percent};
pub use insights::{Insight, InsightTone, InsightTrend, build_insights};
pub use types::{Projection, ScenarioInput, ScenarioSummary, YearRecord};
