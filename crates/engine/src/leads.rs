//! Prospect leads, including the public suggestion-form intake.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactChannel {
    WhatsApp,
    Instagram,
    Website,
    #[serde(rename = "Telepon")]
    Phone,
    #[serde(rename = "Referensi")]
    Referral,
    #[serde(rename = "Form Saran")]
    SuggestionForm,
    #[serde(rename = "Lainnya")]
    Other,
}

impl ContactChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Instagram => "Instagram",
            Self::Website => "Website",
            Self::Phone => "Telepon",
            Self::Referral => "Referensi",
            Self::SuggestionForm => "Form Saran",
            Self::Other => "Lainnya",
        }
    }
}

impl TryFrom<&str> for ContactChannel {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "WhatsApp" => Ok(Self::WhatsApp),
            "Instagram" => Ok(Self::Instagram),
            "Website" => Ok(Self::Website),
            "Telepon" => Ok(Self::Phone),
            "Referensi" => Ok(Self::Referral),
            "Form Saran" => Ok(Self::SuggestionForm),
            "Lainnya" => Ok(Self::Other),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid contact channel: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "Baru Masuk")]
    New,
    #[serde(rename = "Sedang Diskusi")]
    InDiscussion,
    #[serde(rename = "Menunggu Follow Up")]
    AwaitingFollowUp,
    #[serde(rename = "Dikonversi")]
    Converted,
    #[serde(rename = "Ditolak")]
    Rejected,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "Baru Masuk",
            Self::InDiscussion => "Sedang Diskusi",
            Self::AwaitingFollowUp => "Menunggu Follow Up",
            Self::Converted => "Dikonversi",
            Self::Rejected => "Ditolak",
        }
    }
}

impl TryFrom<&str> for LeadStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Baru Masuk" => Ok(Self::New),
            "Sedang Diskusi" => Ok(Self::InDiscussion),
            "Menunggu Follow Up" => Ok(Self::AwaitingFollowUp),
            "Dikonversi" => Ok(Self::Converted),
            "Ditolak" => Ok(Self::Rejected),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid lead status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub contact_channel: ContactChannel,
    pub location: String,
    pub status: LeadStatus,
    pub date: Date,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub contact_channel: String,
    pub location: String,
    pub status: String,
    pub date: Date,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Lead> for ActiveModel {
    fn from(lead: &Lead) -> Self {
        Self {
            id: ActiveValue::Set(lead.id.clone()),
            name: ActiveValue::Set(lead.name.clone()),
            contact_channel: ActiveValue::Set(lead.contact_channel.as_str().to_string()),
            location: ActiveValue::Set(lead.location.clone()),
            status: ActiveValue::Set(lead.status.as_str().to_string()),
            date: ActiveValue::Set(lead.date),
            notes: ActiveValue::Set(lead.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Lead {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            contact_channel: ContactChannel::try_from(model.contact_channel.as_str())?,
            location: model.location,
            status: LeadStatus::try_from(model.status.as_str())?,
            date: model.date,
            notes: model.notes,
        })
    }
}
