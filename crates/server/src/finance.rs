//! Ledger endpoints: transactions, pockets and the monthly budget cycle.

use api_types::finance::{
    CloseBudget, ManagePocket, PocketActionKind, PocketNew, TransactionNew, TransactionQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};
use engine::{
    BudgetStatus, FinancialPocket, PocketAction, PocketType, Summary, Transaction,
    TransactionFilter, TransactionType,
};

fn filter_from_query(query: TransactionQuery) -> TransactionFilter {
    let mut filter = TransactionFilter {
        date_from: query.date_from,
        date_to: query.date_to,
        search: query.search,
        ..TransactionFilter::default()
    };
    // The drill-down is single-select; an expense pick wins over income.
    if query.expense_category.is_some() {
        filter.select_expense_category(query.expense_category);
    } else if query.income_category.is_some() {
        filter.select_income_category(query.income_category);
    }
    filter
}

pub async fn list_transactions(
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, ServerError> {
    let filter = filter_from_query(query);
    Ok(Json(state.engine.read().await.transactions(&filter)))
}

pub async fn create_transaction(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<Transaction>), ServerError> {
    let tx = Transaction::new(
        payload.date,
        payload.description,
        payload.amount,
        TransactionType::try_from(payload.transaction_type.as_str())?,
        payload.category,
        payload.method,
        payload.pocket_id,
        payload.project_id,
    )?;
    let created = state.engine.write().await.add_transaction(tx).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_transaction(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<Transaction>,
) -> Result<Json<Transaction>, ServerError> {
    payload.id = id;
    let updated = state.engine.write().await.update_transaction(payload).await?;
    Ok(Json(updated))
}

pub async fn delete_transaction(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.write().await.delete_transaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_pockets(
    State(state): State<ServerState>,
) -> Result<Json<Vec<FinancialPocket>>, ServerError> {
    Ok(Json(state.engine.read().await.pockets()))
}

pub async fn create_pocket(
    State(state): State<ServerState>,
    Json(payload): Json<PocketNew>,
) -> Result<(StatusCode, Json<FinancialPocket>), ServerError> {
    let pocket = FinancialPocket::new(
        payload.name,
        payload.description,
        payload.icon,
        PocketType::try_from(payload.pocket_type.as_str())?,
        payload.amount,
        payload.goal_amount,
        payload.lock_end_date,
        payload.members,
    )?;
    let today = Utc::now().date_naive();
    let created = state.engine.write().await.create_pocket(pocket, today).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_pocket(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<FinancialPocket>,
) -> Result<Json<FinancialPocket>, ServerError> {
    payload.id = id;
    let updated = state.engine.write().await.update_pocket(payload).await?;
    Ok(Json(updated))
}

pub async fn delete_pocket(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let today = Utc::now().date_naive();
    state.engine.write().await.delete_pocket(&id, today).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn manage_pocket(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ManagePocket>,
) -> Result<Json<FinancialPocket>, ServerError> {
    let action = match payload.action {
        PocketActionKind::TopUp => PocketAction::TopUp,
        PocketActionKind::Withdraw => PocketAction::Withdraw,
    };
    let today = Utc::now().date_naive();
    let pocket = state
        .engine
        .write()
        .await
        .manage_pocket(&id, action, payload.amount, today)
        .await?;
    Ok(Json(pocket))
}

pub async fn budget_status(
    State(state): State<ServerState>,
) -> Result<Json<Option<BudgetStatus>>, ServerError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.engine.read().await.budget_status(today)))
}

pub async fn close_budget(
    State(state): State<ServerState>,
    Json(payload): Json<CloseBudget>,
) -> Result<Json<Transaction>, ServerError> {
    let today = Utc::now().date_naive();
    let transfer = state
        .engine
        .write()
        .await
        .close_budget(&payload.destination_id, today)
        .await?;
    Ok(Json(transfer))
}

pub async fn summary(State(state): State<ServerState>) -> Result<Json<Summary>, ServerError> {
    Ok(Json(state.engine.read().await.summary()))
}
