//! The single studio profile row, including the editable category lists
//! used by the finance and project forms.
//!
//! The row id is fixed: the profile is a singleton created on first save.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{
    EngineError, ResultEngine,
    transactions::{Transaction, TransactionType},
};

pub const PROFILE_ID: &str = "main_profile";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKind {
    Income,
    Expense,
    ProjectType,
    EventType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub website: String,
    pub address: String,
    pub bank_account: String,
    pub bio: String,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub project_types: Vec<String>,
    pub event_types: Vec<String>,
    pub notification_settings: serde_json::Value,
    pub security_settings: serde_json::Value,
}

/// Canonical form for category comparison: NFC-normalized, lowercased,
/// trimmed. "Gaji" and "gaji" are the same category.
fn canonical(name: &str) -> String {
    name.trim().nfc().collect::<String>().to_lowercase()
}

impl Profile {
    pub fn categories(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::Income => &self.income_categories,
            CategoryKind::Expense => &self.expense_categories,
            CategoryKind::ProjectType => &self.project_types,
            CategoryKind::EventType => &self.event_types,
        }
    }

    fn categories_mut(&mut self, kind: CategoryKind) -> &mut Vec<String> {
        match kind {
            CategoryKind::Income => &mut self.income_categories,
            CategoryKind::Expense => &mut self.expense_categories,
            CategoryKind::ProjectType => &mut self.project_types,
            CategoryKind::EventType => &mut self.event_types,
        }
    }

    pub fn add_category(&mut self, kind: CategoryKind, name: &str) -> ResultEngine<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidAmount(
                "category name must not be empty".to_string(),
            ));
        }
        let key = canonical(name);
        let list = self.categories_mut(kind);
        if list.iter().any(|existing| canonical(existing) == key) {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        list.push(name.to_string());
        Ok(())
    }

    pub fn rename_category(
        &mut self,
        kind: CategoryKind,
        from: &str,
        to: &str,
    ) -> ResultEngine<()> {
        let to = to.trim();
        if to.is_empty() {
            return Err(EngineError::InvalidAmount(
                "category name must not be empty".to_string(),
            ));
        }
        let from_key = canonical(from);
        let to_key = canonical(to);
        let list = self.categories_mut(kind);
        if to_key != from_key && list.iter().any(|existing| canonical(existing) == to_key) {
            return Err(EngineError::ExistingKey(to.to_string()));
        }
        let entry = list
            .iter_mut()
            .find(|existing| canonical(existing) == from_key)
            .ok_or_else(|| EngineError::KeyNotFound(from.to_string()))?;
        *entry = to.to_string();
        Ok(())
    }

    /// Removes a category. Income/expense categories still referenced by a
    /// transaction of the matching type cannot be removed.
    pub fn remove_category(
        &mut self,
        kind: CategoryKind,
        name: &str,
        transactions: &[Transaction],
    ) -> ResultEngine<()> {
        let guarded_type = match kind {
            CategoryKind::Income => Some(TransactionType::Income),
            CategoryKind::Expense => Some(TransactionType::Expense),
            CategoryKind::ProjectType | CategoryKind::EventType => None,
        };
        if let Some(tx_type) = guarded_type {
            let key = canonical(name);
            let in_use = transactions
                .iter()
                .any(|tx| tx.transaction_type == tx_type && canonical(&tx.category) == key);
            if in_use {
                return Err(EngineError::CategoryInUse(name.to_string()));
            }
        }

        let key = canonical(name);
        let list = self.categories_mut(kind);
        let index = list
            .iter()
            .position(|existing| canonical(existing) == key)
            .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))?;
        list.remove(index);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub website: String,
    pub address: String,
    pub bank_account: String,
    pub bio: String,
    pub income_categories: Json,
    pub expense_categories: Json,
    pub project_types: Json,
    pub event_types: Json,
    pub notification_settings: Json,
    pub security_settings: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn string_list(value: Json) -> ResultEngine<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|err| sea_orm::DbErr::Type(format!("invalid category list: {err}")).into())
}

fn json_list(list: &[String]) -> Json {
    serde_json::Value::Array(
        list.iter()
            .map(|s| serde_json::Value::String(s.clone()))
            .collect(),
    )
}

impl From<&Profile> for ActiveModel {
    fn from(profile: &Profile) -> Self {
        Self {
            id: ActiveValue::Set(PROFILE_ID.to_string()),
            full_name: ActiveValue::Set(profile.full_name.clone()),
            email: ActiveValue::Set(profile.email.clone()),
            phone: ActiveValue::Set(profile.phone.clone()),
            company_name: ActiveValue::Set(profile.company_name.clone()),
            website: ActiveValue::Set(profile.website.clone()),
            address: ActiveValue::Set(profile.address.clone()),
            bank_account: ActiveValue::Set(profile.bank_account.clone()),
            bio: ActiveValue::Set(profile.bio.clone()),
            income_categories: ActiveValue::Set(json_list(&profile.income_categories)),
            expense_categories: ActiveValue::Set(json_list(&profile.expense_categories)),
            project_types: ActiveValue::Set(json_list(&profile.project_types)),
            event_types: ActiveValue::Set(json_list(&profile.event_types)),
            notification_settings: ActiveValue::Set(profile.notification_settings.clone()),
            security_settings: ActiveValue::Set(profile.security_settings.clone()),
        }
    }
}

impl TryFrom<Model> for Profile {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            company_name: model.company_name,
            website: model.website,
            address: model.address,
            bank_account: model.bank_account,
            bio: model.bio,
            income_categories: string_list(model.income_categories)?,
            expense_categories: string_list(model.expense_categories)?,
            project_types: string_list(model.project_types)?,
            event_types: string_list(model.event_types)?,
            notification_settings: model.notification_settings,
            security_settings: model.security_settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            full_name: "Vena".to_string(),
            email: "vena@example.com".to_string(),
            phone: String::new(),
            company_name: "Vena Pictures".to_string(),
            website: String::new(),
            address: String::new(),
            bank_account: String::new(),
            bio: String::new(),
            income_categories: vec!["DP Proyek".to_string(), "Pelunasan Proyek".to_string()],
            expense_categories: vec!["Gaji Freelancer".to_string()],
            project_types: vec!["Pernikahan".to_string()],
            event_types: vec!["Meeting Klien".to_string()],
            notification_settings: serde_json::json!({}),
            security_settings: serde_json::json!({}),
        }
    }

    #[test]
    fn duplicate_category_rejected_ignoring_case_and_form() {
        let mut profile = profile();
        let err = profile
            .add_category(CategoryKind::Income, "dp proyek")
            .unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));

        // NFC vs NFD spelling of the same name.
        profile
            .add_category(CategoryKind::Expense, "Caf\u{e9}")
            .unwrap();
        let err = profile
            .add_category(CategoryKind::Expense, "Cafe\u{301}")
            .unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));
    }

    #[test]
    fn rename_keeps_position_and_checks_duplicates() {
        let mut profile = profile();
        profile
            .rename_category(CategoryKind::Income, "DP Proyek", "Uang Muka")
            .unwrap();
        assert_eq!(profile.income_categories[0], "Uang Muka");

        let err = profile
            .rename_category(CategoryKind::Income, "Uang Muka", "pelunasan proyek")
            .unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));

        // Recasing a category onto itself is fine.
        profile
            .rename_category(CategoryKind::Income, "Uang Muka", "UANG MUKA")
            .unwrap();
    }

    #[test]
    fn category_in_use_cannot_be_removed() {
        let mut profile = profile();
        let tx = Transaction::new(
            "2024-03-01".parse().unwrap(),
            "Gaji".to_string(),
            100_000,
            TransactionType::Expense,
            "Gaji Freelancer".to_string(),
            "Tunai".to_string(),
            None,
            None,
        )
        .unwrap();

        let err = profile
            .remove_category(CategoryKind::Expense, "Gaji Freelancer", &[tx])
            .unwrap_err();
        assert!(matches!(err, EngineError::CategoryInUse(_)));

        profile
            .remove_category(CategoryKind::Expense, "Gaji Freelancer", &[])
            .unwrap();
        assert!(profile.expense_categories.is_empty());
    }
}
