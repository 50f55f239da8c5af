//! Client records.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    #[serde(rename = "Prospek")]
    Prospect,
    #[serde(rename = "Aktif")]
    Active,
    #[serde(rename = "Tidak Aktif")]
    Inactive,
    #[serde(rename = "Hilang")]
    Lost,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prospect => "Prospek",
            Self::Active => "Aktif",
            Self::Inactive => "Tidak Aktif",
            Self::Lost => "Hilang",
        }
    }
}

impl TryFrom<&str> for ClientStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Prospek" => Ok(Self::Prospect),
            "Aktif" => Ok(Self::Active),
            "Tidak Aktif" => Ok(Self::Inactive),
            "Hilang" => Ok(Self::Lost),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid client status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub since: Date,
    pub instagram: Option<String>,
    pub status: ClientStatus,
    pub last_contact: Date,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub since: Date,
    pub instagram: Option<String>,
    pub status: String,
    pub last_contact: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Client> for ActiveModel {
    fn from(client: &Client) -> Self {
        Self {
            id: ActiveValue::Set(client.id.clone()),
            name: ActiveValue::Set(client.name.clone()),
            email: ActiveValue::Set(client.email.clone()),
            phone: ActiveValue::Set(client.phone.clone()),
            since: ActiveValue::Set(client.since),
            instagram: ActiveValue::Set(client.instagram.clone()),
            status: ActiveValue::Set(client.status.as_str().to_string()),
            last_contact: ActiveValue::Set(client.last_contact),
        }
    }
}

impl TryFrom<Model> for Client {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            since: model.since,
            instagram: model.instagram,
            status: ClientStatus::try_from(model.status.as_str())?,
            last_contact: model.last_contact,
        })
    }
}
