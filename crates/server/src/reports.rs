//! Cash-flow and reporting endpoints, including the CSV downloads.

use api_types::report::{MonthQuery, WindowQuery, YearQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;

use crate::{ServerError, server::ServerState};
use engine::{
    CashFlowSeries, CategorySummary, ClientProfit, MonthlyProfitability, ProjectProfit,
    ProjectionPoint, ReportSummary, ReportWindow,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    income: Vec<CategorySummary>,
    expense: Vec<CategorySummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityResponse {
    projects: Vec<ProjectProfit>,
    clients: Vec<ClientProfit>,
}

fn window(query: WindowQuery) -> ReportWindow {
    ReportWindow {
        from: query.from,
        to: query.to,
    }
}

pub async fn cash_flow_monthly(
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CashFlowSeries>, ServerError> {
    Ok(Json(
        state
            .engine
            .read()
            .await
            .cash_flow_monthly(query.year, query.month),
    ))
}

pub async fn cash_flow_yearly(
    State(state): State<ServerState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<CashFlowSeries>, ServerError> {
    Ok(Json(state.engine.read().await.cash_flow_yearly(query.year)))
}

pub async fn cash_flow_projection(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProjectionPoint>>, ServerError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.engine.read().await.cash_flow_projection(today)))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ReportSummary>, ServerError> {
    Ok(Json(state.engine.read().await.report_summary(window(query))))
}

pub async fn categories(
    State(state): State<ServerState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let engine = state.engine.read().await;
    let window = window(query);
    Ok(Json(CategoriesResponse {
        income: engine.income_by_category(window),
        expense: engine.expense_by_category(window),
    }))
}

pub async fn profitability(
    State(state): State<ServerState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ProfitabilityResponse>, ServerError> {
    let engine = state.engine.read().await;
    let window = window(query);
    Ok(Json(ProfitabilityResponse {
        projects: engine.project_profitability(window),
        clients: engine.client_profitability(window),
    }))
}

pub async fn monthly_profitability(
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyProfitability>, ServerError> {
    Ok(Json(
        state
            .engine
            .read()
            .await
            .monthly_profitability(query.year, query.month),
    ))
}

fn csv_response(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

pub async fn ledger_csv(
    State(state): State<ServerState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let body = state.engine.read().await.ledger_csv(window(query))?;
    Ok(csv_response("laporan-keuangan.csv", body))
}

pub async fn profitability_csv(
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let body = state
        .engine
        .read()
        .await
        .profitability_csv(query.year, query.month)?;
    Ok(csv_response("laporan-profitabilitas.csv", body))
}
