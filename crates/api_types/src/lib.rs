//! Request and query types shared between the HTTP server and its clients.
//!
//! Entity payloads (clients, projects, transactions, ...) travel as the
//! engine's own serialized shapes; this crate only holds the commands and
//! query strings that have no engine counterpart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod finance {
    use super::*;

    /// Query string for the ledger listing. Dates are inclusive; the two
    /// category fields are a mutually exclusive drill-down.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionQuery {
        pub date_from: Option<NaiveDate>,
        pub date_to: Option<NaiveDate>,
        pub search: Option<String>,
        pub income_category: Option<String>,
        pub expense_category: Option<String>,
    }

    /// Request body for creating a ledger transaction. The id is assigned
    /// server-side.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub date: NaiveDate,
        pub description: String,
        pub amount: i64,
        /// "Pemasukan" or "Pengeluaran".
        #[serde(rename = "type")]
        pub transaction_type: String,
        pub category: String,
        pub method: String,
        pub pocket_id: Option<String>,
        pub project_id: Option<String>,
    }

    /// Request body for creating a pocket.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PocketNew {
        pub name: String,
        #[serde(default)]
        pub description: String,
        pub icon: String,
        /// One of the pocket type labels ("Nabung & Bayar", "Terkunci",
        /// "Bersama", "Anggaran Pengeluaran").
        #[serde(rename = "type")]
        pub pocket_type: String,
        #[serde(default)]
        pub amount: i64,
        pub goal_amount: Option<i64>,
        pub lock_end_date: Option<NaiveDate>,
        pub members: Option<serde_json::Value>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum PocketActionKind {
        TopUp,
        Withdraw,
    }

    /// Request body for a pocket top-up or withdrawal.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ManagePocket {
        pub action: PocketActionKind,
        pub amount: i64,
    }

    /// Request body for the monthly budget close-out.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CloseBudget {
        /// Saving or locked pocket receiving the unspent remainder.
        pub destination_id: String,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WindowQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }

    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthQuery {
        pub year: i32,
        pub month: u32,
    }

    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct YearQuery {
        pub year: i32,
    }
}

pub mod settings {
    use super::*;

    /// Which of the profile's category lists a command targets.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum CategoryKind {
        Income,
        Expense,
        ProjectType,
        EventType,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryAdd {
        pub kind: CategoryKind,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryRename {
        pub kind: CategoryKind,
        pub from: String,
        pub to: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryRemove {
        pub kind: CategoryKind,
        pub name: String,
    }
}

pub mod intake {
    use super::*;

    /// Public suggestion-form submission; lands as a new lead.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Suggestion {
        pub name: String,
        pub whatsapp: String,
        pub message: String,
    }
}
