use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    FIELD_GROUPS, FIELDS, FORM_HELPER_TEXT, FieldDefinition, FieldGroup, FieldKey, Insight,
    ProjectionError, ScenarioInput, ScenarioSummary, YearRecord, build_insights, current_year,
    project,
};

/// Scenario edits as sent by a client. Absent fields keep the default scenario.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPayload {
    current_age: Option<f64>,
    retirement_age: Option<f64>,
    life_expectancy_age: Option<f64>,
    current_savings: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_return_rate: Option<f64>,
    annual_retirement_spending: Option<f64>,
    annual_contribution_growth_rate: Option<f64>,
    annual_inflation_rate: Option<f64>,
    base_year: Option<i32>,
}

impl ProjectPayload {
    fn edits(&self) -> [(FieldKey, Option<f64>); 9] {
        [
            (FieldKey::CurrentAge, self.current_age),
            (FieldKey::RetirementAge, self.retirement_age),
            (FieldKey::LifeExpectancyAge, self.life_expectancy_age),
            (FieldKey::CurrentSavings, self.current_savings),
            (FieldKey::MonthlyContribution, self.monthly_contribution),
            (FieldKey::AnnualReturnRate, self.annual_return_rate),
            (FieldKey::AnnualRetirementSpending, self.annual_retirement_spending),
            (
                FieldKey::AnnualContributionGrowthRate,
                self.annual_contribution_growth_rate,
            ),
            (FieldKey::AnnualInflationRate, self.annual_inflation_rate),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApiRequest {
    pub input: ScenarioInput,
    pub base_year: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub base_year: i32,
    pub conditions: ScenarioInput,
    pub timeline: Vec<YearRecord>,
    pub summary: ScenarioSummary,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldsResponse {
    fields: &'static [FieldDefinition],
    groups: &'static [FieldGroup],
    helper_text: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/fields", get(fields_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "lifeplan HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, router()).await
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn fields_handler() -> Response {
    json_response(
        StatusCode::OK,
        FieldsResponse {
            fields: &FIELDS,
            groups: &FIELD_GROUPS,
            helper_text: FORM_HELPER_TEXT,
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = api_request_from_payload(payload, current_year());
    debug!(
        current_age = request.input.current_age,
        retirement_age = request.input.retirement_age,
        life_expectancy_age = request.input.life_expectancy_age,
        base_year = request.base_year,
        "projecting scenario"
    );

    match build_project_response(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            warn!(error = %err, "scenario rejected");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

/// Applies payload edits over the default scenario, clamping each to its field bounds.
pub fn api_request_from_payload(payload: ProjectPayload, default_base_year: i32) -> ApiRequest {
    let mut input = ScenarioInput::default();
    for (key, value) in payload.edits() {
        if let Some(v) = value {
            input.set_field(key, v);
        }
    }

    ApiRequest {
        input,
        base_year: payload.base_year.unwrap_or(default_base_year),
    }
}

pub fn build_project_response(request: &ApiRequest) -> Result<ProjectResponse, ProjectionError> {
    let projection = project(&request.input, request.base_year)?;
    let insights = build_insights(
        Some(&projection.summary),
        &projection.timeline,
        request.input.retirement_age,
    );

    Ok(ProjectResponse {
        base_year: request.base_year,
        conditions: request.input,
        timeline: projection.timeline,
        summary: projection.summary,
        insights,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str, default_base_year: i32) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(api_request_from_payload(payload, default_base_year))
}
