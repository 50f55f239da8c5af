//! Transaction primitives.
//!
//! A `Transaction` is one ledger line: whole-rupiah amount, always stored
//! positive, with the sign implied by its [`TransactionType`].

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Category used for every system-generated pocket transfer. Transactions in
/// this category are managed by the pocket commands and cannot be edited.
pub const TRANSFER_CATEGORY: &str = "Transfer Antar Kantong";

/// Payment method recorded for system-generated transactions.
pub const SYSTEM_METHOD: &str = "Sistem";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Pemasukan")]
    Income,
    #[serde(rename = "Pengeluaran")]
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Pemasukan",
            Self::Expense => "Pengeluaran",
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Pemasukan" => Ok(Self::Income),
            "Pengeluaran" => Ok(Self::Expense),
            other => Err(EngineError::InvalidTransaction(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub method: String,
    pub pocket_id: Option<String>,
    pub project_id: Option<String>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: String,
        amount: i64,
        transaction_type: TransactionType,
        category: String,
        method: String,
        pocket_id: Option<String>,
        project_id: Option<String>,
    ) -> ResultEngine<Self> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            date,
            description,
            amount,
            transaction_type,
            category,
            method,
            pocket_id,
            project_id,
        })
    }

    /// Signed effect on the main balance: `+amount` for income, `-amount`
    /// for expense.
    pub fn signed_amount(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.category == TRANSFER_CATEGORY
    }
}

/// Ledger view filter.
///
/// Date window is inclusive and day-granular; search is a case-insensitive
/// substring over description and category. All set criteria compose with
/// logical AND. The category drill-down is a mutually exclusive
/// single-select: picking an income category clears the expense one and
/// vice versa.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub income_category: Option<String>,
    pub expense_category: Option<String>,
}

impl TransactionFilter {
    pub fn select_income_category(&mut self, category: Option<String>) {
        self.income_category = category;
        self.expense_category = None;
    }

    pub fn select_expense_category(&mut self, category: Option<String>) {
        self.expense_category = category;
        self.income_category = None;
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(from) = self.date_from
            && tx.date < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && tx.date > to
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !tx.description.to_lowercase().contains(&needle)
                && !tx.category.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(category) = &self.expense_category {
            return tx.transaction_type == TransactionType::Expense && tx.category == *category;
        }
        if let Some(category) = &self.income_category {
            return tx.transaction_type == TransactionType::Income && tx.category == *category;
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: Date,
    pub description: String,
    pub amount: i64,
    #[sea_orm(column_name = "type")]
    pub transaction_type: String,
    pub category: String,
    pub method: String,
    pub pocket_id: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.clone()),
            date: ActiveValue::Set(tx.date),
            description: ActiveValue::Set(tx.description.clone()),
            amount: ActiveValue::Set(tx.amount),
            transaction_type: ActiveValue::Set(tx.transaction_type.as_str().to_string()),
            category: ActiveValue::Set(tx.category.clone()),
            method: ActiveValue::Set(tx.method.clone()),
            pocket_id: ActiveValue::Set(tx.pocket_id.clone()),
            project_id: ActiveValue::Set(tx.project_id.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            description: model.description,
            amount: model.amount,
            transaction_type: TransactionType::try_from(model.transaction_type.as_str())?,
            category: model.category,
            method: model.method,
            pocket_id: model.pocket_id,
            project_id: model.project_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, description: &str, category: &str, kind: TransactionType) -> Transaction {
        Transaction::new(
            date.parse().unwrap(),
            description.to_string(),
            100_000,
            kind,
            category.to_string(),
            "Tunai".to_string(),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_non_positive_amount() {
        let err = Transaction::new(
            "2024-01-01".parse().unwrap(),
            "DP".to_string(),
            0,
            TransactionType::Income,
            "DP Proyek".to_string(),
            "Tunai".to_string(),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn filter_window_is_inclusive() {
        let filter = TransactionFilter {
            date_from: Some("2024-03-01".parse().unwrap()),
            date_to: Some("2024-03-31".parse().unwrap()),
            ..Default::default()
        };

        assert!(filter.matches(&tx("2024-03-01", "a", "Lainnya", TransactionType::Income)));
        assert!(filter.matches(&tx("2024-03-31", "b", "Lainnya", TransactionType::Income)));
        assert!(!filter.matches(&tx("2024-02-29", "c", "Lainnya", TransactionType::Income)));
        assert!(!filter.matches(&tx("2024-04-01", "d", "Lainnya", TransactionType::Income)));
    }

    #[test]
    fn filter_search_is_case_insensitive() {
        let filter = TransactionFilter {
            search: Some("sewa".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&tx(
            "2024-03-01",
            "Biaya Sewa Studio",
            "Operasional",
            TransactionType::Expense
        )));
        assert!(filter.matches(&tx(
            "2024-03-01",
            "x",
            "Sewa Alat",
            TransactionType::Expense
        )));
        assert!(!filter.matches(&tx(
            "2024-03-01",
            "Gaji",
            "Gaji Freelancer",
            TransactionType::Expense
        )));
    }

    #[test]
    fn category_selection_is_mutually_exclusive() {
        let mut filter = TransactionFilter::default();
        filter.select_income_category(Some("DP Proyek".to_string()));
        filter.select_expense_category(Some("Operasional".to_string()));

        assert!(filter.income_category.is_none());
        assert_eq!(filter.expense_category.as_deref(), Some("Operasional"));

        assert!(filter.matches(&tx("2024-03-01", "x", "Operasional", TransactionType::Expense)));
        assert!(!filter.matches(&tx("2024-03-01", "x", "Operasional", TransactionType::Income)));
        assert!(!filter.matches(&tx("2024-03-01", "x", "DP Proyek", TransactionType::Income)));
    }
}
