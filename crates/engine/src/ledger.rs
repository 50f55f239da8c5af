//! In-memory ledger: the transaction list plus the financial pockets.
//!
//! Every mutation is split in two steps. A `plan_*` method validates the
//! command against the current state and returns a plan (new rows plus the
//! resulting pocket amounts) without touching anything. The matching
//! `apply_*` method commits the plan to memory. The engine persists the plan
//! inside one database transaction between the two steps, so memory never
//! runs ahead of the store.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    EngineError, ResultEngine,
    pockets::{FinancialPocket, PocketType},
    transactions::{
        SYSTEM_METHOD, TRANSFER_CATEGORY, Transaction, TransactionFilter, TransactionType,
    },
};

/// Resulting amount for one pocket after a planned mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PocketUpdate {
    pub id: String,
    pub amount: i64,
}

/// Plan for adding or editing one transaction.
#[derive(Clone, Debug)]
pub struct TransactionPlan {
    pub transaction: Transaction,
    pub pocket_updates: Vec<PocketUpdate>,
}

/// Plan for removing one transaction.
#[derive(Clone, Debug)]
pub struct DeletePlan {
    pub transaction: Transaction,
    pub pocket_updates: Vec<PocketUpdate>,
}

/// Plan for creating a pocket, with the opening transfer when the pocket
/// starts funded.
#[derive(Clone, Debug)]
pub struct NewPocketPlan {
    pub pocket: FinancialPocket,
    pub opening_transaction: Option<Transaction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PocketAction {
    TopUp,
    Withdraw,
}

/// Plan for a pocket top-up or withdrawal.
#[derive(Clone, Debug)]
pub struct ManagePlan {
    pub transaction: Transaction,
    pub pocket_update: PocketUpdate,
}

/// Plan for deleting a pocket.
///
/// Saving/Locked/Shared pockets return their balance through a closing
/// income transaction and purge their transfer history; budget pockets keep
/// history and only detach the references.
#[derive(Clone, Debug)]
pub struct PocketClosePlan {
    pub pocket_id: String,
    pub closing_transaction: Option<Transaction>,
    pub purged_transaction_ids: Vec<String>,
    pub detached_transaction_ids: Vec<String>,
}

/// Plan for the monthly budget close-out.
#[derive(Clone, Debug)]
pub struct CloseBudgetPlan {
    pub transaction: Transaction,
    pub remaining: i64,
    pub pocket_updates: Vec<PocketUpdate>,
}

/// Derived totals over the whole ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub main_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub pockets_total: i64,
    pub total_assets: i64,
}

/// Current-cycle state of the budget pocket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub pocket_id: String,
    pub name: String,
    pub goal_amount: i64,
    pub spent_this_month: i64,
    pub remaining: i64,
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    /// Kept sorted descending by date.
    pub transactions: Vec<Transaction>,
    pub pockets: Vec<FinancialPocket>,
}

impl Ledger {
    pub fn new(mut transactions: Vec<Transaction>, pockets: Vec<FinancialPocket>) -> Self {
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            transactions,
            pockets,
        }
    }

    pub fn pocket(&self, id: &str) -> ResultEngine<&FinancialPocket> {
        self.pockets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn transaction(&self, id: &str) -> ResultEngine<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn filtered(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .collect()
    }

    pub fn main_balance(&self) -> i64 {
        self.transactions.iter().map(Transaction::signed_amount).sum()
    }

    pub fn summary(&self) -> Summary {
        let total_income = self
            .transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Income)
            .map(|t| t.amount)
            .sum();
        let total_expense = self
            .transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Expense)
            .map(|t| t.amount)
            .sum::<i64>();
        let main_balance = total_income - total_expense;
        let pockets_total = self
            .pockets
            .iter()
            .filter(|p| matches!(p.pocket_type, PocketType::Saving | PocketType::Locked))
            .map(|p| p.amount)
            .sum();
        Summary {
            main_balance,
            total_income,
            total_expense,
            pockets_total,
            total_assets: main_balance + pockets_total,
        }
    }

    /// State of the (at most one) budget pocket for the calendar month of
    /// `today`, or `None` when no budget pocket exists.
    pub fn budget_status(&self, today: NaiveDate) -> Option<BudgetStatus> {
        let budget = self
            .pockets
            .iter()
            .find(|p| p.pocket_type == PocketType::Expense)?;
        let spent_this_month = self
            .transactions
            .iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Expense
                    && t.pocket_id.as_deref() == Some(budget.id.as_str())
                    && t.date.year() == today.year()
                    && t.date.month() == today.month()
            })
            .map(|t| t.amount)
            .sum::<i64>();
        let goal_amount = budget.goal_amount.unwrap_or(0);
        Some(BudgetStatus {
            pocket_id: budget.id.clone(),
            name: budget.name.clone(),
            goal_amount,
            spent_this_month,
            remaining: goal_amount - spent_this_month,
        })
    }

    // ── Transactions ───────────────────────────────────────────────────

    pub fn plan_add_transaction(&self, tx: &Transaction) -> ResultEngine<TransactionPlan> {
        if tx.amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        if tx.is_transfer() {
            return Err(EngineError::InvalidTransaction(format!(
                "category \"{TRANSFER_CATEGORY}\" is reserved for pocket commands"
            )));
        }

        let mut updates = Vec::new();
        if let Some(pocket_id) = &tx.pocket_id {
            let pocket = self.pocket(pocket_id)?;
            if pocket.pocket_type.holds_balance() {
                updates.push(PocketUpdate {
                    id: pocket.id.clone(),
                    amount: pocket.amount + tx.signed_amount(),
                });
            }
        }

        let after = self.transactions.iter().chain(std::iter::once(tx));
        updates.extend(self.budget_updates(after));

        Ok(TransactionPlan {
            transaction: tx.clone(),
            pocket_updates: updates,
        })
    }

    /// Plans an edit of an existing transaction.
    ///
    /// Pocket transfers are system-managed: the pocket commands that created
    /// them are the only ones allowed to touch them, so balance reversal can
    /// always trust the stored `type`. Editing a transaction into the
    /// transfer category is rejected for the same reason.
    pub fn plan_update_transaction(&self, updated: &Transaction) -> ResultEngine<TransactionPlan> {
        let old = self.transaction(&updated.id)?;
        if old.is_transfer() {
            return Err(EngineError::InvalidTransaction(
                "pocket transfers are system managed".to_string(),
            ));
        }
        if updated.is_transfer() {
            return Err(EngineError::InvalidTransaction(format!(
                "category \"{TRANSFER_CATEGORY}\" is reserved for pocket commands"
            )));
        }
        if updated.amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        let mut updates: Vec<PocketUpdate> = Vec::new();
        let mut adjust = |pocket: &FinancialPocket, delta: i64| {
            match updates.iter_mut().find(|u| u.id == pocket.id) {
                Some(update) => update.amount += delta,
                None => updates.push(PocketUpdate {
                    id: pocket.id.clone(),
                    amount: pocket.amount + delta,
                }),
            }
        };

        if let Some(pocket_id) = &old.pocket_id {
            let pocket = self.pocket(pocket_id)?;
            if pocket.pocket_type.holds_balance() {
                adjust(pocket, -old.signed_amount());
            }
        }
        if let Some(pocket_id) = &updated.pocket_id {
            let pocket = self.pocket(pocket_id)?;
            if pocket.pocket_type.holds_balance() {
                adjust(pocket, updated.signed_amount());
            }
        }

        let after = self
            .transactions
            .iter()
            .filter(|t| t.id != updated.id)
            .chain(std::iter::once(updated));
        updates.extend(self.budget_updates(after));

        Ok(TransactionPlan {
            transaction: updated.clone(),
            pocket_updates: updates,
        })
    }

    pub fn plan_delete_transaction(&self, id: &str) -> ResultEngine<DeletePlan> {
        let tx = self.transaction(id)?.clone();

        let mut updates = Vec::new();
        if tx.is_transfer()
            && let Some(pocket_id) = &tx.pocket_id
            && let Ok(pocket) = self.pocket(pocket_id)
            && pocket.pocket_type.holds_balance()
        {
            // Reverse the transfer: deleting a top-up takes the money back
            // out (floored at zero), deleting a withdrawal puts it back.
            let amount = match tx.transaction_type {
                TransactionType::Expense => (pocket.amount - tx.amount).max(0),
                TransactionType::Income => pocket.amount + tx.amount,
            };
            updates.push(PocketUpdate {
                id: pocket.id.clone(),
                amount,
            });
        }

        let after = self.transactions.iter().filter(|t| t.id != id);
        updates.extend(self.budget_updates(after));

        Ok(DeletePlan {
            transaction: tx,
            pocket_updates: updates,
        })
    }

    pub fn apply_add_transaction(&mut self, plan: TransactionPlan) -> ResultEngine<()> {
        self.insert_sorted(plan.transaction);
        self.apply_pocket_updates(&plan.pocket_updates)
    }

    pub fn apply_update_transaction(&mut self, plan: TransactionPlan) -> ResultEngine<()> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == plan.transaction.id)
            .ok_or_else(|| EngineError::KeyNotFound(plan.transaction.id.clone()))?;
        self.transactions.remove(index);
        self.insert_sorted(plan.transaction);
        self.apply_pocket_updates(&plan.pocket_updates)
    }

    pub fn apply_delete_transaction(&mut self, plan: &DeletePlan) -> ResultEngine<()> {
        self.transactions.retain(|t| t.id != plan.transaction.id);
        self.apply_pocket_updates(&plan.pocket_updates)
    }

    // ── Pockets ────────────────────────────────────────────────────────

    /// Plans pocket creation.
    ///
    /// A funded Saving/Locked/Shared pocket synthesizes an offsetting
    /// expense transfer dated `today`, so the main-balance invariant holds
    /// without special-casing opening balances. At most one budget pocket
    /// may exist.
    pub fn plan_new_pocket(
        &self,
        pocket: FinancialPocket,
        today: NaiveDate,
    ) -> ResultEngine<NewPocketPlan> {
        if pocket.pocket_type == PocketType::Expense
            && self
                .pockets
                .iter()
                .any(|p| p.pocket_type == PocketType::Expense)
        {
            return Err(EngineError::ExistingKey(pocket.name.clone()));
        }

        let opening_transaction = if pocket.pocket_type.holds_balance() && pocket.amount > 0 {
            Some(Transaction::new(
                today,
                format!("Saldo awal kantong: {}", pocket.name),
                pocket.amount,
                TransactionType::Expense,
                TRANSFER_CATEGORY.to_string(),
                SYSTEM_METHOD.to_string(),
                Some(pocket.id.clone()),
                None,
            )?)
        } else {
            None
        };

        Ok(NewPocketPlan {
            pocket,
            opening_transaction,
        })
    }

    pub fn plan_manage_pocket(
        &self,
        pocket_id: &str,
        action: PocketAction,
        amount: i64,
        today: NaiveDate,
    ) -> ResultEngine<ManagePlan> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        let pocket = self.pocket(pocket_id)?;
        if !pocket.pocket_type.holds_balance() {
            return Err(EngineError::InvalidPocket(
                "budget pockets are recomputed from transactions".to_string(),
            ));
        }

        let (transaction, new_amount) = match action {
            PocketAction::TopUp => (
                Transaction::new(
                    today,
                    format!("Top up kantong: {}", pocket.name),
                    amount,
                    TransactionType::Expense,
                    TRANSFER_CATEGORY.to_string(),
                    SYSTEM_METHOD.to_string(),
                    Some(pocket.id.clone()),
                    None,
                )?,
                pocket.amount + amount,
            ),
            PocketAction::Withdraw => {
                if amount > pocket.amount {
                    return Err(EngineError::InsufficientFunds(pocket.name.clone()));
                }
                (
                    Transaction::new(
                        today,
                        format!("Tarik dana kantong: {}", pocket.name),
                        amount,
                        TransactionType::Income,
                        TRANSFER_CATEGORY.to_string(),
                        SYSTEM_METHOD.to_string(),
                        Some(pocket.id.clone()),
                        None,
                    )?,
                    pocket.amount - amount,
                )
            }
        };

        Ok(ManagePlan {
            transaction,
            pocket_update: PocketUpdate {
                id: pocket.id.clone(),
                amount: new_amount,
            },
        })
    }

    pub fn plan_delete_pocket(
        &self,
        pocket_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<PocketClosePlan> {
        let pocket = self.pocket(pocket_id)?;

        if pocket.pocket_type.holds_balance() {
            let closing_transaction = if pocket.amount > 0 {
                Some(Transaction::new(
                    today,
                    format!("Penutupan kantong: {}", pocket.name),
                    pocket.amount,
                    TransactionType::Income,
                    TRANSFER_CATEGORY.to_string(),
                    SYSTEM_METHOD.to_string(),
                    None,
                    None,
                )?)
            } else {
                None
            };
            let purged_transaction_ids = self
                .transactions
                .iter()
                .filter(|t| t.is_transfer() && t.pocket_id.as_deref() == Some(pocket_id))
                .map(|t| t.id.clone())
                .collect();
            Ok(PocketClosePlan {
                pocket_id: pocket.id.clone(),
                closing_transaction,
                purged_transaction_ids,
                detached_transaction_ids: Vec::new(),
            })
        } else {
            // Budget pocket: keep history, drop the budget link.
            let detached_transaction_ids = self
                .transactions
                .iter()
                .filter(|t| t.pocket_id.as_deref() == Some(pocket_id))
                .map(|t| t.id.clone())
                .collect();
            Ok(PocketClosePlan {
                pocket_id: pocket.id.clone(),
                closing_transaction: None,
                purged_transaction_ids: Vec::new(),
                detached_transaction_ids,
            })
        }
    }

    /// Plans the monthly close-out: whatever is left of the budget goal this
    /// calendar month moves into a Saving/Locked destination pocket.
    pub fn plan_close_budget(
        &self,
        destination_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<CloseBudgetPlan> {
        let status = self
            .budget_status(today)
            .ok_or_else(|| EngineError::KeyNotFound("budget pocket".to_string()))?;
        if status.remaining <= 0 {
            return Err(EngineError::InvalidAmount(
                "no remaining budget to close".to_string(),
            ));
        }

        let destination = self.pocket(destination_id)?;
        if !matches!(
            destination.pocket_type,
            PocketType::Saving | PocketType::Locked
        ) {
            return Err(EngineError::InvalidPocket(
                "destination must be a saving or locked pocket".to_string(),
            ));
        }

        let transaction = Transaction::new(
            today,
            format!("Penutupan anggaran bulanan: {}", status.name),
            status.remaining,
            TransactionType::Expense,
            TRANSFER_CATEGORY.to_string(),
            SYSTEM_METHOD.to_string(),
            Some(status.pocket_id.clone()),
            None,
        )?;

        let mut pocket_updates = vec![PocketUpdate {
            id: destination.id.clone(),
            amount: destination.amount + status.remaining,
        }];
        let after = self
            .transactions
            .iter()
            .chain(std::iter::once(&transaction));
        pocket_updates.extend(self.budget_updates(after));

        Ok(CloseBudgetPlan {
            transaction,
            remaining: status.remaining,
            pocket_updates,
        })
    }

    pub fn apply_new_pocket(&mut self, plan: NewPocketPlan) -> ResultEngine<()> {
        self.pockets.push(plan.pocket);
        if let Some(tx) = plan.opening_transaction {
            self.insert_sorted(tx);
        }
        Ok(())
    }

    pub fn apply_manage_pocket(&mut self, plan: ManagePlan) -> ResultEngine<()> {
        self.insert_sorted(plan.transaction);
        self.apply_pocket_updates(std::slice::from_ref(&plan.pocket_update))
    }

    pub fn apply_delete_pocket(&mut self, plan: PocketClosePlan) -> ResultEngine<()> {
        self.transactions
            .retain(|t| !plan.purged_transaction_ids.contains(&t.id));
        for tx in &mut self.transactions {
            if plan.detached_transaction_ids.contains(&tx.id) {
                tx.pocket_id = None;
            }
        }
        if let Some(tx) = plan.closing_transaction {
            self.insert_sorted(tx);
        }
        self.pockets.retain(|p| p.id != plan.pocket_id);
        Ok(())
    }

    pub fn apply_close_budget(&mut self, plan: CloseBudgetPlan) -> ResultEngine<()> {
        self.insert_sorted(plan.transaction);
        self.apply_pocket_updates(&plan.pocket_updates)
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Recomputed totals for the budget pockets over a hypothetical
    /// transaction set; only changed pockets are returned, so running it
    /// twice over the same set yields nothing the second time.
    fn budget_updates<'a, I>(&self, transactions: I) -> Vec<PocketUpdate>
    where
        I: Iterator<Item = &'a Transaction>,
    {
        let budgets: Vec<&FinancialPocket> = self
            .pockets
            .iter()
            .filter(|p| p.pocket_type == PocketType::Expense)
            .collect();
        if budgets.is_empty() {
            return Vec::new();
        }

        let mut totals = vec![0i64; budgets.len()];
        for tx in transactions {
            if tx.transaction_type != TransactionType::Expense {
                continue;
            }
            let Some(pocket_id) = &tx.pocket_id else {
                continue;
            };
            if let Some(i) = budgets.iter().position(|p| p.id == *pocket_id) {
                totals[i] += tx.amount;
            }
        }

        budgets
            .iter()
            .zip(totals)
            .filter(|(pocket, total)| pocket.amount != *total)
            .map(|(pocket, total)| PocketUpdate {
                id: pocket.id.clone(),
                amount: total,
            })
            .collect()
    }

    fn apply_pocket_updates(&mut self, updates: &[PocketUpdate]) -> ResultEngine<()> {
        for update in updates {
            let pocket = self
                .pockets
                .iter_mut()
                .find(|p| p.id == update.id)
                .ok_or_else(|| EngineError::KeyNotFound(update.id.clone()))?;
            pocket.amount = update.amount;
        }
        Ok(())
    }

    fn insert_sorted(&mut self, tx: Transaction) {
        let index = self
            .transactions
            .iter()
            .position(|t| t.date <= tx.date)
            .unwrap_or(self.transactions.len());
        self.transactions.insert(index, tx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pockets::FinancialPocket;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn income(day: &str, amount: i64) -> Transaction {
        Transaction::new(
            date(day),
            "Pelunasan proyek".to_string(),
            amount,
            TransactionType::Income,
            "Pelunasan Proyek".to_string(),
            "Transfer Bank".to_string(),
            None,
            None,
        )
        .unwrap()
    }

    fn expense(day: &str, amount: i64, pocket_id: Option<&str>) -> Transaction {
        Transaction::new(
            date(day),
            "Operasional".to_string(),
            amount,
            TransactionType::Expense,
            "Operasional Kantor".to_string(),
            "Tunai".to_string(),
            pocket_id.map(|s| s.to_string()),
            None,
        )
        .unwrap()
    }

    fn saving_pocket(name: &str, amount: i64) -> FinancialPocket {
        FinancialPocket::new(
            name.to_string(),
            String::new(),
            "piggy-bank".to_string(),
            PocketType::Saving,
            amount,
            None,
            None,
            None,
        )
        .unwrap()
    }

    fn budget_pocket(goal: i64) -> FinancialPocket {
        FinancialPocket::new(
            "Anggaran Operasional".to_string(),
            String::new(),
            "clipboard-list".to_string(),
            PocketType::Expense,
            0,
            Some(goal),
            None,
            None,
        )
        .unwrap()
    }

    fn add(ledger: &mut Ledger, tx: Transaction) {
        let plan = ledger.plan_add_transaction(&tx).unwrap();
        ledger.apply_add_transaction(plan).unwrap();
    }

    #[test]
    fn main_balance_is_income_minus_expense() {
        let mut ledger = Ledger::default();
        add(&mut ledger, income("2024-03-01", 5_000_000));
        add(&mut ledger, expense("2024-03-02", 1_200_000, None));
        add(&mut ledger, income("2024-03-10", 500_000));

        let summary = ledger.summary();
        assert_eq!(summary.total_income, 5_500_000);
        assert_eq!(summary.total_expense, 1_200_000);
        assert_eq!(summary.main_balance, 4_300_000);
        assert_eq!(ledger.main_balance(), 4_300_000);
    }

    #[test]
    fn ledger_stays_sorted_descending() {
        let mut ledger = Ledger::default();
        add(&mut ledger, income("2024-03-05", 100));
        add(&mut ledger, income("2024-03-01", 100));
        add(&mut ledger, income("2024-03-10", 100));

        let dates: Vec<NaiveDate> = ledger.transactions.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-03-10"), date("2024-03-05"), date("2024-03-01")]
        );
    }

    #[test]
    fn funded_saving_pocket_synthesizes_opening_transfer() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(saving_pocket("Liburan", 1_000_000), date("2024-03-01"))
            .unwrap();
        let opening = plan.opening_transaction.clone().unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        assert_eq!(opening.amount, 1_000_000);
        assert_eq!(opening.transaction_type, TransactionType::Expense);
        assert_eq!(opening.category, TRANSFER_CATEGORY);
        assert_eq!(opening.pocket_id.as_deref(), Some(pocket_id.as_str()));
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 1_000_000);
        assert_eq!(ledger.main_balance(), -1_000_000);
    }

    #[test]
    fn second_budget_pocket_rejected() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(budget_pocket(2_000_000), date("2024-03-01"))
            .unwrap();
        ledger.apply_new_pocket(plan).unwrap();

        let err = ledger
            .plan_new_pocket(budget_pocket(1_000_000), date("2024-03-01"))
            .unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));
    }

    #[test]
    fn saving_balance_tracks_signed_transfers() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(saving_pocket("Liburan", 1_000_000), date("2024-03-01"))
            .unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        let topup = ledger
            .plan_manage_pocket(&pocket_id, PocketAction::TopUp, 500_000, date("2024-03-05"))
            .unwrap();
        ledger.apply_manage_pocket(topup).unwrap();
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 1_500_000);

        let withdraw = ledger
            .plan_manage_pocket(
                &pocket_id,
                PocketAction::Withdraw,
                300_000,
                date("2024-03-08"),
            )
            .unwrap();
        ledger.apply_manage_pocket(withdraw).unwrap();
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 1_200_000);

        // opening + topup - withdraw, all as signed transfers
        let signed: i64 = ledger
            .transactions
            .iter()
            .filter(|t| t.is_transfer() && t.pocket_id.as_deref() == Some(pocket_id.as_str()))
            .map(|t| -t.signed_amount())
            .sum();
        assert_eq!(signed, 1_200_000);
    }

    #[test]
    fn over_balance_withdrawal_rejected_without_changes() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(saving_pocket("Liburan", 200_000), date("2024-03-01"))
            .unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        let before_txs = ledger.transactions.clone();
        let before_pockets = ledger.pockets.clone();

        let err = ledger
            .plan_manage_pocket(
                &pocket_id,
                PocketAction::Withdraw,
                500_000,
                date("2024-03-02"),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds(_)));
        assert_eq!(ledger.transactions, before_txs);
        assert_eq!(ledger.pockets, before_pockets);
    }

    #[test]
    fn budget_pocket_amount_is_recomputed_aggregate() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(budget_pocket(2_000_000), date("2024-03-01"))
            .unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        add(&mut ledger, expense("2024-03-03", 700_000, Some(&pocket_id)));
        add(&mut ledger, expense("2024-03-10", 500_000, Some(&pocket_id)));
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 1_200_000);

        // Recompute is idempotent: nothing changes when totals already match.
        assert!(ledger.budget_updates(ledger.transactions.iter()).is_empty());

        let delete = ledger
            .plan_delete_transaction(&ledger.transactions.last().unwrap().id.clone())
            .unwrap();
        ledger.apply_delete_transaction(&delete).unwrap();
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 500_000);
    }

    #[test]
    fn deleting_saving_pocket_closes_and_purges() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(saving_pocket("Liburan", 500_000), date("2024-03-01"))
            .unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        let close = ledger
            .plan_delete_pocket(&pocket_id, date("2024-04-01"))
            .unwrap();
        assert_eq!(close.purged_transaction_ids.len(), 1);
        let closing = close.closing_transaction.clone().unwrap();
        assert_eq!(closing.amount, 500_000);
        assert_eq!(closing.transaction_type, TransactionType::Income);
        assert_eq!(closing.category, TRANSFER_CATEGORY);
        ledger.apply_delete_pocket(close).unwrap();

        assert!(ledger.pocket(&pocket_id).is_err());
        assert!(
            ledger
                .transactions
                .iter()
                .all(|t| t.pocket_id.as_deref() != Some(pocket_id.as_str()))
        );
        // Opening transfer purged, closing income remains: net main balance
        // is back to the closing amount.
        assert_eq!(ledger.main_balance(), 500_000);
    }

    #[test]
    fn deleting_budget_pocket_detaches_history() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(budget_pocket(2_000_000), date("2024-03-01"))
            .unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();
        add(&mut ledger, expense("2024-03-03", 700_000, Some(&pocket_id)));

        let close = ledger
            .plan_delete_pocket(&pocket_id, date("2024-04-01"))
            .unwrap();
        assert!(close.closing_transaction.is_none());
        assert_eq!(close.detached_transaction_ids.len(), 1);
        ledger.apply_delete_pocket(close).unwrap();

        assert_eq!(ledger.transactions.len(), 1);
        assert!(ledger.transactions[0].pocket_id.is_none());
    }

    #[test]
    fn monthly_budget_close_out() {
        let mut ledger = Ledger::default();
        let budget = ledger
            .plan_new_pocket(budget_pocket(2_000_000), date("2024-03-01"))
            .unwrap();
        let budget_id = budget.pocket.id.clone();
        ledger.apply_new_pocket(budget).unwrap();

        let saving = ledger
            .plan_new_pocket(saving_pocket("Dana Darurat", 0), date("2024-03-01"))
            .unwrap();
        let saving_id = saving.pocket.id.clone();
        ledger.apply_new_pocket(saving).unwrap();

        add(&mut ledger, expense("2024-03-05", 1_200_000, Some(&budget_id)));

        let status = ledger.budget_status(date("2024-03-28")).unwrap();
        assert_eq!(status.spent_this_month, 1_200_000);
        assert_eq!(status.remaining, 800_000);

        let plan = ledger
            .plan_close_budget(&saving_id, date("2024-03-28"))
            .unwrap();
        assert_eq!(plan.remaining, 800_000);
        ledger.apply_close_budget(plan).unwrap();

        assert_eq!(ledger.pocket(&saving_id).unwrap().amount, 800_000);
        // Closing expense counts toward the all-time aggregate.
        assert_eq!(ledger.pocket(&budget_id).unwrap().amount, 2_000_000);

        // A new month restarts the cycle at zero spent.
        let next = ledger.budget_status(date("2024-04-02")).unwrap();
        assert_eq!(next.spent_this_month, 0);
        assert_eq!(next.remaining, 2_000_000);

        // Nothing left to close in the old month either.
        let err = ledger
            .plan_close_budget(&saving_id, date("2024-03-29"))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn editing_transfer_transaction_rejected() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(saving_pocket("Liburan", 100_000), date("2024-03-01"))
            .unwrap();
        let opening_id = plan.opening_transaction.as_ref().unwrap().id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        let mut edited = ledger.transaction(&opening_id).unwrap().clone();
        edited.amount = 50_000;
        let err = ledger.plan_update_transaction(&edited).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransaction(_)));
    }

    #[test]
    fn update_adjusts_pocket_balances_both_ways() {
        let mut ledger = Ledger::default();
        let plan = ledger
            .plan_new_pocket(saving_pocket("Liburan", 0), date("2024-03-01"))
            .unwrap();
        let pocket_id = plan.pocket.id.clone();
        ledger.apply_new_pocket(plan).unwrap();

        // Regular income attributed to the pocket.
        let tx = Transaction::new(
            date("2024-03-05"),
            "Hadiah".to_string(),
            400_000,
            TransactionType::Income,
            "Lainnya".to_string(),
            "Tunai".to_string(),
            Some(pocket_id.clone()),
            None,
        )
        .unwrap();
        add(&mut ledger, tx.clone());
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 400_000);

        let mut edited = tx;
        edited.amount = 250_000;
        let plan = ledger.plan_update_transaction(&edited).unwrap();
        ledger.apply_update_transaction(plan).unwrap();
        assert_eq!(ledger.pocket(&pocket_id).unwrap().amount, 250_000);
    }
}
