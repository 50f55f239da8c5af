//! Service packages and add-ons offered to clients.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub price: i64,
    pub description: String,
}

pub mod packages {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "packages")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub price: i64,
        pub description: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&Package> for packages::ActiveModel {
    fn from(package: &Package) -> Self {
        Self {
            id: ActiveValue::Set(package.id.clone()),
            name: ActiveValue::Set(package.name.clone()),
            price: ActiveValue::Set(package.price),
            description: ActiveValue::Set(package.description.clone()),
        }
    }
}

impl From<packages::Model> for Package {
    fn from(model: packages::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub price: i64,
}

pub mod addons {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "addons")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub price: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<&AddOn> for addons::ActiveModel {
    fn from(addon: &AddOn) -> Self {
        Self {
            id: ActiveValue::Set(addon.id.clone()),
            name: ActiveValue::Set(addon.name.clone()),
            price: ActiveValue::Set(addon.price),
        }
    }
}

impl From<addons::Model> for AddOn {
    fn from(model: addons::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
        }
    }
}
