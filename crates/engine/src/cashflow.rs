//! Cash-flow aggregation: daily and monthly buckets with a running
//! balance, plus the three-month projection shown on the dashboard.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::transactions::{Transaction, TransactionType};

/// Expense assumed for projected months when there is no spending history
/// to average.
pub const FALLBACK_MONTHLY_EXPENSE: i64 = 5_000_000;

pub const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowBucket {
    pub label: String,
    pub income: i64,
    pub expense: i64,
    /// Running balance at the end of the bucket.
    pub balance: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSeries {
    pub beginning_balance: i64,
    pub buckets: Vec<CashFlowBucket>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month_label: String,
    pub projected_income: i64,
    pub projected_expense: i64,
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

/// First day of the month `offset` months away from `date`. Saturates at
/// the chrono date range limits, which is far beyond any ledger date.
pub fn add_months(date: NaiveDate, offset: i32) -> NaiveDate {
    let months = date.year() * 12 + date.month0() as i32 + offset;
    let (year, month0) = (months.div_euclid(12), months.rem_euclid(12));
    NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1)
        .unwrap_or(if offset < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX);
    add_months(first, 1).signed_duration_since(first).num_days() as u32
}

fn signed_sum_before(transactions: &[Transaction], start: NaiveDate) -> i64 {
    transactions
        .iter()
        .filter(|tx| tx.date < start)
        .map(Transaction::signed_amount)
        .sum()
}

/// One bucket per day of the given calendar month.
pub fn monthly_series(transactions: &[Transaction], year: i32, month: u32) -> CashFlowSeries {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return CashFlowSeries {
            beginning_balance: 0,
            buckets: Vec::new(),
        };
    };
    let beginning_balance = signed_sum_before(transactions, first);
    let mut balance = beginning_balance;
    let buckets = (1..=days_in_month(year, month))
        .map(|day| {
            let (mut income, mut expense) = (0, 0);
            for tx in transactions
                .iter()
                .filter(|tx| tx.date.year() == year && tx.date.month() == month)
                .filter(|tx| tx.date.day() == day)
            {
                match tx.transaction_type {
                    TransactionType::Income => income += tx.amount,
                    TransactionType::Expense => expense += tx.amount,
                }
            }
            balance += income - expense;
            CashFlowBucket {
                label: day.to_string(),
                income,
                expense,
                balance,
            }
        })
        .collect();
    CashFlowSeries {
        beginning_balance,
        buckets,
    }
}

/// One bucket per month of the given year.
pub fn yearly_series(transactions: &[Transaction], year: i32) -> CashFlowSeries {
    let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return CashFlowSeries {
            beginning_balance: 0,
            buckets: Vec::new(),
        };
    };
    let beginning_balance = signed_sum_before(transactions, first);
    let mut balance = beginning_balance;
    let buckets = (1..=12u32)
        .map(|month| {
            let (mut income, mut expense) = (0, 0);
            for tx in transactions
                .iter()
                .filter(|tx| tx.date.year() == year && tx.date.month() == month)
            {
                match tx.transaction_type {
                    TransactionType::Income => income += tx.amount,
                    TransactionType::Expense => expense += tx.amount,
                }
            }
            balance += income - expense;
            CashFlowBucket {
                label: MONTH_NAMES[month as usize - 1].to_string(),
                income,
                expense,
                balance,
            }
        })
        .collect();
    CashFlowSeries {
        beginning_balance,
        buckets,
    }
}

/// Projects the next three calendar months after `today`.
///
/// Income per month is the unpaid balance of Confirmed and Preparation
/// projects whose event date falls in that month. Expense is the average
/// actual spend over the three months preceding `today`'s month, or the
/// fallback when that window is empty.
pub fn projection(
    transactions: &[Transaction],
    projects: &[crate::projects::Project],
    today: NaiveDate,
) -> Vec<ProjectionPoint> {
    use crate::projects::ProjectStatus;

    let window_start = add_months(today, -3);
    let current_start = add_months(today, 0);
    let history: i64 = transactions
        .iter()
        .filter(|tx| tx.transaction_type == TransactionType::Expense)
        .filter(|tx| tx.date >= window_start && tx.date < current_start)
        .map(|tx| tx.amount)
        .sum();
    let projected_expense = if history > 0 {
        history / 3
    } else {
        FALLBACK_MONTHLY_EXPENSE
    };

    (1..=3)
        .map(|offset| {
            let month_start = add_months(today, offset);
            let month_end = add_months(today, offset + 1);
            let projected_income = projects
                .iter()
                .filter(|p| {
                    matches!(p.status, ProjectStatus::Confirmed | ProjectStatus::Preparation)
                })
                .filter(|p| p.date >= month_start && p.date < month_end)
                .map(|p| p.unpaid_balance())
                .sum();
            ProjectionPoint {
                month_label: month_label(month_start),
                projected_income,
                projected_expense,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::{PaymentStatus, Project, ProjectStatus};

    fn tx(date: &str, amount: i64, tx_type: TransactionType) -> Transaction {
        Transaction::new(
            date.parse().unwrap(),
            "tx".to_string(),
            amount,
            tx_type,
            "Lainnya".to_string(),
            "Tunai".to_string(),
            None,
            None,
        )
        .unwrap()
    }

    fn project(date: &str, status: ProjectStatus, total: i64, paid: i64) -> Project {
        Project {
            id: "p1".to_string(),
            project_name: "Pernikahan A".to_string(),
            client_name: "Klien A".to_string(),
            client_id: "c1".to_string(),
            project_type: "Pernikahan".to_string(),
            package_name: "Silver".to_string(),
            package_id: "pkg1".to_string(),
            add_ons: serde_json::json!([]),
            date: date.parse().unwrap(),
            deadline_date: None,
            location: String::new(),
            progress: 0,
            status,
            total_cost: total,
            amount_paid: paid,
            payment_status: PaymentStatus::DownPaymentPaid,
            team: serde_json::json!([]),
            notes: None,
            accommodation: None,
            drive_link: None,
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn running_balance_carries_the_beginning_balance() {
        let txs = vec![
            tx("2024-02-20", 1_000_000, TransactionType::Income),
            tx("2024-03-05", 400_000, TransactionType::Expense),
            tx("2024-03-05", 250_000, TransactionType::Income),
        ];
        let series = monthly_series(&txs, 2024, 3);
        assert_eq!(series.beginning_balance, 1_000_000);
        assert_eq!(series.buckets.len(), 31);
        let day5 = &series.buckets[4];
        assert_eq!(day5.income, 250_000);
        assert_eq!(day5.expense, 400_000);
        assert_eq!(day5.balance, 850_000);
        // Quiet days keep the running balance.
        assert_eq!(series.buckets[30].balance, 850_000);
    }

    #[test]
    fn yearly_series_buckets_by_month() {
        let txs = vec![
            tx("2023-12-31", 5_000_000, TransactionType::Income),
            tx("2024-01-10", 2_000_000, TransactionType::Income),
            tx("2024-06-01", 750_000, TransactionType::Expense),
        ];
        let series = yearly_series(&txs, 2024);
        assert_eq!(series.beginning_balance, 5_000_000);
        assert_eq!(series.buckets[0].label, "Januari");
        assert_eq!(series.buckets[0].balance, 7_000_000);
        assert_eq!(series.buckets[5].expense, 750_000);
        assert_eq!(series.buckets[11].balance, 6_250_000);
    }

    #[test]
    fn projection_uses_unpaid_confirmed_projects() {
        let today: NaiveDate = "2024-03-15".parse().unwrap();
        let projects = vec![
            project("2024-04-20", ProjectStatus::Confirmed, 10_000_000, 4_000_000),
            project("2024-04-25", ProjectStatus::Preparation, 3_000_000, 0),
            // Pending projects and past-month dates are ignored.
            project("2024-04-10", ProjectStatus::Pending, 8_000_000, 0),
            project("2024-06-05", ProjectStatus::Confirmed, 2_000_000, 500_000),
        ];
        let points = projection(&[], &projects, today);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].month_label, "April 2024");
        assert_eq!(points[0].projected_income, 9_000_000);
        assert_eq!(points[1].projected_income, 0);
        assert_eq!(points[2].projected_income, 1_500_000);
        assert_eq!(points[0].projected_expense, FALLBACK_MONTHLY_EXPENSE);
    }

    #[test]
    fn projection_averages_recent_spending() {
        let today: NaiveDate = "2024-03-15".parse().unwrap();
        let txs = vec![
            tx("2023-12-10", 3_000_000, TransactionType::Expense),
            tx("2024-01-10", 2_000_000, TransactionType::Expense),
            tx("2024-02-10", 1_000_000, TransactionType::Expense),
            // Current month spend is not part of the trailing window.
            tx("2024-03-10", 9_000_000, TransactionType::Expense),
        ];
        let points = projection(&txs, &[], today);
        assert_eq!(points[0].projected_expense, 2_000_000);
    }
}
