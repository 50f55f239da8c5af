//! Financial pockets: sub-accounts carved out of the main balance.
//!
//! `amount` means "current balance" for Saving/Locked/Shared pockets and
//! "cumulative spend this tracking cycle" for the Expense (budget) pocket.
//! The budget amount is a pure aggregate over referencing expense
//! transactions, recomputed by the ledger, never adjusted incrementally.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PocketType {
    #[serde(rename = "Nabung & Bayar")]
    Saving,
    #[serde(rename = "Terkunci")]
    Locked,
    #[serde(rename = "Bersama")]
    Shared,
    #[serde(rename = "Anggaran Pengeluaran")]
    Expense,
}

impl PocketType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saving => "Nabung & Bayar",
            Self::Locked => "Terkunci",
            Self::Shared => "Bersama",
            Self::Expense => "Anggaran Pengeluaran",
        }
    }

    /// Pockets whose `amount` is a real balance (counted in total assets
    /// for Saving/Locked, adjusted by transfers).
    pub fn holds_balance(self) -> bool {
        !matches!(self, Self::Expense)
    }
}

impl TryFrom<&str> for PocketType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Nabung & Bayar" => Ok(Self::Saving),
            "Terkunci" => Ok(Self::Locked),
            "Bersama" => Ok(Self::Shared),
            "Anggaran Pengeluaran" => Ok(Self::Expense),
            other => Err(EngineError::InvalidPocket(format!(
                "invalid pocket type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPocket {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub pocket_type: PocketType,
    pub amount: i64,
    pub goal_amount: Option<i64>,
    pub lock_end_date: Option<Date>,
    /// Shared-pocket member list, stored as the client sent it.
    pub members: Option<serde_json::Value>,
}

impl FinancialPocket {
    pub fn new(
        name: String,
        description: String,
        icon: String,
        pocket_type: PocketType,
        amount: i64,
        goal_amount: Option<i64>,
        lock_end_date: Option<Date>,
        members: Option<serde_json::Value>,
    ) -> ResultEngine<Self> {
        if amount < 0 {
            return Err(EngineError::InvalidAmount(
                "opening amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            icon,
            pocket_type,
            // Budget pockets track spend, which starts at zero.
            amount: if pocket_type == PocketType::Expense {
                0
            } else {
                amount
            },
            goal_amount,
            lock_end_date,
            members,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "financial_pockets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[sea_orm(column_name = "type")]
    pub pocket_type: String,
    pub amount: i64,
    pub goal_amount: Option<i64>,
    pub lock_end_date: Option<Date>,
    pub members: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FinancialPocket> for ActiveModel {
    fn from(pocket: &FinancialPocket) -> Self {
        Self {
            id: ActiveValue::Set(pocket.id.clone()),
            name: ActiveValue::Set(pocket.name.clone()),
            description: ActiveValue::Set(pocket.description.clone()),
            icon: ActiveValue::Set(pocket.icon.clone()),
            pocket_type: ActiveValue::Set(pocket.pocket_type.as_str().to_string()),
            amount: ActiveValue::Set(pocket.amount),
            goal_amount: ActiveValue::Set(pocket.goal_amount),
            lock_end_date: ActiveValue::Set(pocket.lock_end_date),
            members: ActiveValue::Set(pocket.members.clone()),
        }
    }
}

impl TryFrom<Model> for FinancialPocket {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            icon: model.icon,
            pocket_type: PocketType::try_from(model.pocket_type.as_str())?,
            amount: model.amount,
            goal_amount: model.goal_amount,
            lock_end_date: model.lock_end_date,
            members: model.members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_pocket_starts_at_zero() {
        let pocket = FinancialPocket::new(
            "Anggaran Operasional".to_string(),
            String::new(),
            "clipboard-list".to_string(),
            PocketType::Expense,
            750_000,
            Some(2_000_000),
            None,
            None,
        )
        .unwrap();
        assert_eq!(pocket.amount, 0);
    }

    #[test]
    fn saving_pocket_keeps_opening_amount() {
        let pocket = FinancialPocket::new(
            "Liburan".to_string(),
            String::new(),
            "piggy-bank".to_string(),
            PocketType::Saving,
            1_000_000,
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(pocket.amount, 1_000_000);
    }

    #[test]
    fn negative_opening_amount_rejected() {
        let err = FinancialPocket::new(
            "Liburan".to_string(),
            String::new(),
            "piggy-bank".to_string(),
            PocketType::Saving,
            -1,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
