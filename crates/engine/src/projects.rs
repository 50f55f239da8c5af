//! Project records.
//!
//! Projects feed the cash-flow projection (Confirmed/Preparation projects
//! contribute `total_cost - amount_paid`) and the profitability reports.
//! Team assignments and selected add-ons are stored as the client sent
//! them; the engine never computes over their contents.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Tertunda")]
    Pending,
    #[serde(rename = "Persiapan")]
    Preparation,
    #[serde(rename = "Dikonfirmasi")]
    Confirmed,
    #[serde(rename = "Editing")]
    Editing,
    #[serde(rename = "Cetak")]
    Printing,
    #[serde(rename = "Selesai")]
    Completed,
    #[serde(rename = "Dibatalkan")]
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Tertunda",
            Self::Preparation => "Persiapan",
            Self::Confirmed => "Dikonfirmasi",
            Self::Editing => "Editing",
            Self::Printing => "Cetak",
            Self::Completed => "Selesai",
            Self::Cancelled => "Dibatalkan",
        }
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Tertunda" => Ok(Self::Pending),
            "Persiapan" => Ok(Self::Preparation),
            "Dikonfirmasi" => Ok(Self::Confirmed),
            "Editing" => Ok(Self::Editing),
            "Cetak" => Ok(Self::Printing),
            "Selesai" => Ok(Self::Completed),
            "Dibatalkan" => Ok(Self::Cancelled),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid project status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Lunas")]
    Paid,
    #[serde(rename = "DP Terbayar")]
    DownPaymentPaid,
    #[serde(rename = "Belum Bayar")]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Lunas",
            Self::DownPaymentPaid => "DP Terbayar",
            Self::Unpaid => "Belum Bayar",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Lunas" => Ok(Self::Paid),
            "DP Terbayar" => Ok(Self::DownPaymentPaid),
            "Belum Bayar" => Ok(Self::Unpaid),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub project_name: String,
    pub client_name: String,
    pub client_id: String,
    pub project_type: String,
    pub package_name: String,
    pub package_id: String,
    pub add_ons: serde_json::Value,
    pub date: Date,
    pub deadline_date: Option<Date>,
    pub location: String,
    pub progress: i32,
    pub status: ProjectStatus,
    pub total_cost: i64,
    pub amount_paid: i64,
    pub payment_status: PaymentStatus,
    pub team: serde_json::Value,
    pub notes: Option<String>,
    pub accommodation: Option<String>,
    pub drive_link: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl Project {
    /// Outstanding amount feeding the income projection.
    pub fn unpaid_balance(&self) -> i64 {
        self.total_cost - self.amount_paid
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_name: String,
    pub client_name: String,
    pub client_id: String,
    pub project_type: String,
    pub package_name: String,
    pub package_id: String,
    pub add_ons: Json,
    pub date: Date,
    pub deadline_date: Option<Date>,
    pub location: String,
    pub progress: i32,
    pub status: String,
    pub total_cost: i64,
    pub amount_paid: i64,
    pub payment_status: String,
    pub team: Json,
    pub notes: Option<String>,
    pub accommodation: Option<String>,
    pub drive_link: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.clone()),
            project_name: ActiveValue::Set(project.project_name.clone()),
            client_name: ActiveValue::Set(project.client_name.clone()),
            client_id: ActiveValue::Set(project.client_id.clone()),
            project_type: ActiveValue::Set(project.project_type.clone()),
            package_name: ActiveValue::Set(project.package_name.clone()),
            package_id: ActiveValue::Set(project.package_id.clone()),
            add_ons: ActiveValue::Set(project.add_ons.clone()),
            date: ActiveValue::Set(project.date),
            deadline_date: ActiveValue::Set(project.deadline_date),
            location: ActiveValue::Set(project.location.clone()),
            progress: ActiveValue::Set(project.progress),
            status: ActiveValue::Set(project.status.as_str().to_string()),
            total_cost: ActiveValue::Set(project.total_cost),
            amount_paid: ActiveValue::Set(project.amount_paid),
            payment_status: ActiveValue::Set(project.payment_status.as_str().to_string()),
            team: ActiveValue::Set(project.team.clone()),
            notes: ActiveValue::Set(project.notes.clone()),
            accommodation: ActiveValue::Set(project.accommodation.clone()),
            drive_link: ActiveValue::Set(project.drive_link.clone()),
            start_time: ActiveValue::Set(project.start_time.clone()),
            end_time: ActiveValue::Set(project.end_time.clone()),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            project_name: model.project_name,
            client_name: model.client_name,
            client_id: model.client_id,
            project_type: model.project_type,
            package_name: model.package_name,
            package_id: model.package_id,
            add_ons: model.add_ons,
            date: model.date,
            deadline_date: model.deadline_date,
            location: model.location,
            progress: model.progress,
            status: ProjectStatus::try_from(model.status.as_str())?,
            total_cost: model.total_cost,
            amount_paid: model.amount_paid,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            team: model.team,
            notes: model.notes,
            accommodation: model.accommodation,
            drive_link: model.drive_link,
            start_time: model.start_time,
            end_time: model.end_time,
        })
    }
}
