//! CRUD endpoints for the plain record collections.
//!
//! Every collection gets the same four handlers. Create assigns the id
//! server-side; update takes the id from the path, overriding whatever the
//! body carries.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

macro_rules! crud_handlers {
    ($mod_name:ident, $ty:ty, $list:ident, $create:ident, $update:ident, $delete:ident) => {
        pub mod $mod_name {
            use super::*;

            pub async fn list(
                State(state): State<ServerState>,
            ) -> Result<Json<Vec<$ty>>, ServerError> {
                Ok(Json(state.engine.read().await.$list()))
            }

            pub async fn create(
                State(state): State<ServerState>,
                Json(payload): Json<$ty>,
            ) -> Result<(StatusCode, Json<$ty>), ServerError> {
                let created = state.engine.write().await.$create(payload).await?;
                Ok((StatusCode::CREATED, Json(created)))
            }

            pub async fn update(
                State(state): State<ServerState>,
                Path(id): Path<String>,
                Json(mut payload): Json<$ty>,
            ) -> Result<Json<$ty>, ServerError> {
                payload.id = id;
                let updated = state.engine.write().await.$update(payload).await?;
                Ok(Json(updated))
            }

            pub async fn delete(
                State(state): State<ServerState>,
                Path(id): Path<String>,
            ) -> Result<StatusCode, ServerError> {
                state.engine.write().await.$delete(&id).await?;
                Ok(StatusCode::NO_CONTENT)
            }
        }
    };
}

crud_handlers!(clients, engine::Client, clients, create_client, update_client, delete_client);
crud_handlers!(projects, engine::Project, projects, create_project, update_project, delete_project);
crud_handlers!(
    team_members,
    engine::TeamMember,
    team_members,
    create_team_member,
    update_team_member,
    delete_team_member
);
crud_handlers!(
    packages,
    engine::Package,
    packages,
    create_package,
    update_package,
    delete_package
);
crud_handlers!(add_ons, engine::AddOn, add_ons, create_add_on, update_add_on, delete_add_on);
crud_handlers!(
    team_project_payments,
    engine::TeamProjectPayment,
    team_project_payments,
    create_team_project_payment,
    update_team_project_payment,
    delete_team_project_payment
);
crud_handlers!(
    team_payment_records,
    engine::TeamPaymentRecord,
    team_payment_records,
    create_team_payment_record,
    update_team_payment_record,
    delete_team_payment_record
);
crud_handlers!(
    reward_ledger_entries,
    engine::RewardLedgerEntry,
    reward_ledger_entries,
    create_reward_ledger_entry,
    update_reward_ledger_entry,
    delete_reward_ledger_entry
);
crud_handlers!(leads, engine::Lead, leads, create_lead, update_lead, delete_lead);
crud_handlers!(users, engine::User, users, create_user, update_user, delete_user);
