use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use tokio::sync::RwLock;

use std::sync::Arc;

use crate::{entities, finance, intake, reports, settings};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<RwLock<Engine>>,
}

/// Basic-auth guard over the operator API. Credentials must match one
/// stored user exactly; the matched user rides along as an extension.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = {
        let engine = state.engine.read().await;
        engine
            .user_by_credentials(auth_header.username(), auth_header.password())
            .cloned()
    };
    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        // Entity records
        .route("/clients", get(entities::clients::list).post(entities::clients::create))
        .route(
            "/clients/{id}",
            put(entities::clients::update).delete(entities::clients::delete),
        )
        .route("/projects", get(entities::projects::list).post(entities::projects::create))
        .route(
            "/projects/{id}",
            put(entities::projects::update).delete(entities::projects::delete),
        )
        .route(
            "/teamMembers",
            get(entities::team_members::list).post(entities::team_members::create),
        )
        .route(
            "/teamMembers/{id}",
            put(entities::team_members::update).delete(entities::team_members::delete),
        )
        .route("/packages", get(entities::packages::list).post(entities::packages::create))
        .route(
            "/packages/{id}",
            put(entities::packages::update).delete(entities::packages::delete),
        )
        .route("/addOns", get(entities::add_ons::list).post(entities::add_ons::create))
        .route(
            "/addOns/{id}",
            put(entities::add_ons::update).delete(entities::add_ons::delete),
        )
        .route(
            "/teamProjectPayments",
            get(entities::team_project_payments::list).post(entities::team_project_payments::create),
        )
        .route(
            "/teamProjectPayments/{id}",
            put(entities::team_project_payments::update)
                .delete(entities::team_project_payments::delete),
        )
        .route(
            "/teamPaymentRecords",
            get(entities::team_payment_records::list).post(entities::team_payment_records::create),
        )
        .route(
            "/teamPaymentRecords/{id}",
            put(entities::team_payment_records::update)
                .delete(entities::team_payment_records::delete),
        )
        .route(
            "/rewardLedgerEntries",
            get(entities::reward_ledger_entries::list).post(entities::reward_ledger_entries::create),
        )
        .route(
            "/rewardLedgerEntries/{id}",
            put(entities::reward_ledger_entries::update)
                .delete(entities::reward_ledger_entries::delete),
        )
        .route("/leads", get(entities::leads::list).post(entities::leads::create))
        .route(
            "/leads/{id}",
            put(entities::leads::update).delete(entities::leads::delete),
        )
        .route("/users", get(entities::users::list).post(entities::users::create))
        .route(
            "/users/{id}",
            put(entities::users::update).delete(entities::users::delete),
        )
        // Profile and categories
        .route("/profile", get(settings::get_profile).put(settings::save_profile))
        .route("/profile/categories", post(settings::add_category))
        .route("/profile/categories/rename", post(settings::rename_category))
        .route("/profile/categories/delete", post(settings::remove_category))
        // Ledger
        .route("/transactions", get(finance::list_transactions).post(finance::create_transaction))
        .route(
            "/transactions/{id}",
            put(finance::update_transaction).delete(finance::delete_transaction),
        )
        .route("/pockets", get(finance::list_pockets).post(finance::create_pocket))
        .route(
            "/pockets/{id}",
            put(finance::update_pocket).delete(finance::delete_pocket),
        )
        .route("/pockets/{id}/manage", post(finance::manage_pocket))
        .route("/budget", get(finance::budget_status))
        .route("/budget/close", post(finance::close_budget))
        .route("/summary", get(finance::summary))
        // Cash flow and reports
        .route("/cashFlow/monthly", get(reports::cash_flow_monthly))
        .route("/cashFlow/yearly", get(reports::cash_flow_yearly))
        .route("/cashFlow/projection", get(reports::cash_flow_projection))
        .route("/reports/summary", get(reports::summary))
        .route("/reports/categories", get(reports::categories))
        .route("/reports/profitability", get(reports::profitability))
        .route("/reports/profitability/monthly", get(reports::monthly_profitability))
        .route("/reports/ledger.csv", get(reports::ledger_csv))
        .route("/reports/profitability.csv", get(reports::profitability_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        // Public intake endpoint, no credentials.
        .route("/suggestion", post(intake::suggestion_new))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(RwLock::new(engine)),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
