//! Freelancer records: team members, their per-project fees, payment
//! records, and the reward ledger.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub standard_fee: i64,
    pub reward_balance: i64,
}

pub mod members {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "team_members")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub role: String,
        pub email: String,
        pub phone: String,
        pub standard_fee: i64,
        pub reward_balance: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&TeamMember> for members::ActiveModel {
    fn from(member: &TeamMember) -> Self {
        Self {
            id: ActiveValue::Set(member.id.clone()),
            name: ActiveValue::Set(member.name.clone()),
            role: ActiveValue::Set(member.role.clone()),
            email: ActiveValue::Set(member.email.clone()),
            phone: ActiveValue::Set(member.phone.clone()),
            standard_fee: ActiveValue::Set(member.standard_fee),
            reward_balance: ActiveValue::Set(member.reward_balance),
        }
    }
}

impl From<members::Model> for TeamMember {
    fn from(model: members::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            role: model.role,
            email: model.email,
            phone: model.phone,
            standard_fee: model.standard_fee,
            reward_balance: model.reward_balance,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamPaymentStatus {
    Paid,
    Unpaid,
}

impl TeamPaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        }
    }
}

impl TryFrom<&str> for TeamPaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Paid" => Ok(Self::Paid),
            "Unpaid" => Ok(Self::Unpaid),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid team payment status: {other}"
            ))),
        }
    }
}

/// One freelancer fee for one project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProjectPayment {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    pub team_member_name: String,
    pub team_member_id: String,
    pub date: Date,
    pub status: TeamPaymentStatus,
    pub fee: i64,
    pub reward: Option<i64>,
}

pub mod project_payments {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "team_project_payments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub project_id: String,
        pub team_member_name: String,
        pub team_member_id: String,
        pub date: Date,
        pub status: String,
        pub fee: i64,
        pub reward: Option<i64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&TeamProjectPayment> for project_payments::ActiveModel {
    fn from(payment: &TeamProjectPayment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.clone()),
            project_id: ActiveValue::Set(payment.project_id.clone()),
            team_member_name: ActiveValue::Set(payment.team_member_name.clone()),
            team_member_id: ActiveValue::Set(payment.team_member_id.clone()),
            date: ActiveValue::Set(payment.date),
            status: ActiveValue::Set(payment.status.as_str().to_string()),
            fee: ActiveValue::Set(payment.fee),
            reward: ActiveValue::Set(payment.reward),
        }
    }
}

impl TryFrom<project_payments::Model> for TeamProjectPayment {
    type Error = EngineError;

    fn try_from(model: project_payments::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            project_id: model.project_id,
            team_member_name: model.team_member_name,
            team_member_id: model.team_member_id,
            date: model.date,
            status: TeamPaymentStatus::try_from(model.status.as_str())?,
            fee: model.fee,
            reward: model.reward,
        })
    }
}

/// A payment slip: the set of project payments settled in one go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPaymentRecord {
    #[serde(default)]
    pub id: String,
    pub record_number: String,
    pub team_member_id: String,
    pub date: Date,
    pub project_payment_ids: serde_json::Value,
    pub total_amount: i64,
}

pub mod payment_records {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "team_payment_records")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub record_number: String,
        pub team_member_id: String,
        pub date: Date,
        pub project_payment_ids: Json,
        pub total_amount: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&TeamPaymentRecord> for payment_records::ActiveModel {
    fn from(record: &TeamPaymentRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.clone()),
            record_number: ActiveValue::Set(record.record_number.clone()),
            team_member_id: ActiveValue::Set(record.team_member_id.clone()),
            date: ActiveValue::Set(record.date),
            project_payment_ids: ActiveValue::Set(record.project_payment_ids.clone()),
            total_amount: ActiveValue::Set(record.total_amount),
        }
    }
}

impl From<payment_records::Model> for TeamPaymentRecord {
    fn from(model: payment_records::Model) -> Self {
        Self {
            id: model.id,
            record_number: model.record_number,
            team_member_id: model.team_member_id,
            date: model.date,
            project_payment_ids: model.project_payment_ids,
            total_amount: model.total_amount,
        }
    }
}

/// One line of a freelancer's reward balance history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardLedgerEntry {
    #[serde(default)]
    pub id: String,
    pub team_member_id: String,
    pub date: Date,
    pub description: String,
    pub amount: i64,
    pub project_id: Option<String>,
}

pub mod reward_entries {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "reward_ledger_entries")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub team_member_id: String,
        pub date: Date,
        pub description: String,
        pub amount: i64,
        pub project_id: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&RewardLedgerEntry> for reward_entries::ActiveModel {
    fn from(entry: &RewardLedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.clone()),
            team_member_id: ActiveValue::Set(entry.team_member_id.clone()),
            date: ActiveValue::Set(entry.date),
            description: ActiveValue::Set(entry.description.clone()),
            amount: ActiveValue::Set(entry.amount),
            project_id: ActiveValue::Set(entry.project_id.clone()),
        }
    }
}

impl From<reward_entries::Model> for RewardLedgerEntry {
    fn from(model: reward_entries::Model) -> Self {
        Self {
            id: model.id,
            team_member_id: model.team_member_id,
            date: model.date,
            description: model.description,
            amount: model.amount,
            project_id: model.project_id,
        }
    }
}
