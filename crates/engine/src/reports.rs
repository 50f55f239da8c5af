//! Reporting: windowed summaries with previous-period comparison,
//! category breakdowns, project and client profitability, and the two
//! CSV exports.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};

use crate::{
    EngineError, ResultEngine,
    money::MoneyIdr,
    pockets::FinancialPocket,
    projects::{Project, ProjectStatus},
    transactions::{Transaction, TransactionType},
};

/// Inclusive report date window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// The window of the same length immediately before this one, used for
    /// the comparison deltas.
    pub fn previous(&self) -> ReportWindow {
        let length = self.to.signed_duration_since(self.from);
        let to = self.from - Duration::days(1);
        ReportWindow { from: to - length, to }
    }
}

/// Change against the previous window. `New` when the previous window had
/// no value to compare against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delta {
    New,
    Percent(i64),
}

impl Delta {
    fn between(current: i64, previous: i64) -> Delta {
        if previous == 0 {
            Delta::New
        } else {
            Delta::Percent((current - previous) * 100 / previous.abs())
        }
    }
}

impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::New => serializer.serialize_str("new"),
            Self::Percent(percent) => serializer.serialize_i64(*percent),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub window: ReportWindow,
    pub total_income: i64,
    pub total_expense: i64,
    pub net: i64,
    pub income_change: Delta,
    pub expense_change: Delta,
    pub net_change: Delta,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub total: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfit {
    pub project_id: String,
    pub project_name: String,
    pub client_name: String,
    pub income: i64,
    pub expense: i64,
    pub profit: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfit {
    pub client_name: String,
    pub income: i64,
    pub expense: i64,
    pub profit: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfitDetail {
    #[serde(flatten)]
    pub profit: ProjectProfit,
    pub transactions: Vec<Transaction>,
}

/// Per-project breakdown of Completed projects dated in one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProfitability {
    pub month_label: String,
    pub projects: Vec<ProjectProfitDetail>,
    pub total_income: i64,
    pub total_expense: i64,
    pub total_profit: i64,
}

fn totals(transactions: &[Transaction], window: ReportWindow) -> (i64, i64) {
    let (mut income, mut expense) = (0, 0);
    for tx in transactions.iter().filter(|tx| window.contains(tx.date)) {
        match tx.transaction_type {
            TransactionType::Income => income += tx.amount,
            TransactionType::Expense => expense += tx.amount,
        }
    }
    (income, expense)
}

pub fn summary(transactions: &[Transaction], window: ReportWindow) -> ReportSummary {
    let (total_income, total_expense) = totals(transactions, window);
    let (prev_income, prev_expense) = totals(transactions, window.previous());
    let net = total_income - total_expense;
    let prev_net = prev_income - prev_expense;
    ReportSummary {
        window,
        total_income,
        total_expense,
        net,
        income_change: Delta::between(total_income, prev_income),
        expense_change: Delta::between(total_expense, prev_expense),
        net_change: Delta::between(net, prev_net),
    }
}

fn by_category(
    transactions: &[Transaction],
    window: ReportWindow,
    tx_type: TransactionType,
) -> Vec<CategorySummary> {
    let mut buckets: BTreeMap<&str, i64> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.transaction_type == tx_type && window.contains(tx.date))
    {
        *buckets.entry(tx.category.as_str()).or_default() += tx.amount;
    }
    let mut summaries: Vec<CategorySummary> = buckets
        .into_iter()
        .map(|(category, total)| CategorySummary {
            category: category.to_string(),
            total,
        })
        .collect();
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

pub fn income_by_category(transactions: &[Transaction], window: ReportWindow) -> Vec<CategorySummary> {
    by_category(transactions, window, TransactionType::Income)
}

pub fn expense_by_category(transactions: &[Transaction], window: ReportWindow) -> Vec<CategorySummary> {
    by_category(transactions, window, TransactionType::Expense)
}

fn profit_for<'a, I>(project: &Project, transactions: I) -> ProjectProfit
where
    I: Iterator<Item = &'a Transaction>,
{
    let (mut income, mut expense) = (0, 0);
    for tx in transactions {
        match tx.transaction_type {
            TransactionType::Income => income += tx.amount,
            TransactionType::Expense => expense += tx.amount,
        }
    }
    ProjectProfit {
        project_id: project.id.clone(),
        project_name: project.project_name.clone(),
        client_name: project.client_name.clone(),
        income,
        expense,
        profit: income - expense,
    }
}

/// Projects with at least one transaction in the window, most profitable
/// first.
pub fn project_profitability(
    transactions: &[Transaction],
    projects: &[Project],
    window: ReportWindow,
) -> Vec<ProjectProfit> {
    let mut profits: Vec<ProjectProfit> = projects
        .iter()
        .map(|project| {
            profit_for(
                project,
                transactions.iter().filter(|tx| {
                    tx.project_id.as_deref() == Some(project.id.as_str())
                        && window.contains(tx.date)
                }),
            )
        })
        .filter(|profit| profit.income != 0 || profit.expense != 0)
        .collect();
    profits.sort_by(|a, b| b.profit.cmp(&a.profit));
    profits
}

/// Project profitability rolled up per client name.
pub fn client_profitability(
    transactions: &[Transaction],
    projects: &[Project],
    window: ReportWindow,
) -> Vec<ClientProfit> {
    let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for profit in project_profitability(transactions, projects, window) {
        let entry = buckets.entry(profit.client_name).or_default();
        entry.0 += profit.income;
        entry.1 += profit.expense;
    }
    let mut clients: Vec<ClientProfit> = buckets
        .into_iter()
        .map(|(client_name, (income, expense))| ClientProfit {
            client_name,
            income,
            expense,
            profit: income - expense,
        })
        .collect();
    clients.sort_by(|a, b| b.profit.cmp(&a.profit));
    clients
}

/// Completed projects dated in the given month, with per-transaction
/// detail. Transactions are matched by project id regardless of their own
/// date: late costs still count against the project.
pub fn monthly_profitability(
    transactions: &[Transaction],
    projects: &[Project],
    year: i32,
    month: u32,
) -> MonthlyProfitability {
    let month_label = NaiveDate::from_ymd_opt(year, month, 1)
        .map(crate::cashflow::month_label)
        .unwrap_or_default();
    let details: Vec<ProjectProfitDetail> = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .filter(|p| p.date.year() == year && p.date.month() == month)
        .map(|project| {
            let mut rows: Vec<Transaction> = transactions
                .iter()
                .filter(|tx| tx.project_id.as_deref() == Some(project.id.as_str()))
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.date.cmp(&b.date));
            let profit = profit_for(project, rows.iter());
            ProjectProfitDetail {
                profit,
                transactions: rows,
            }
        })
        .collect();
    let total_income = details.iter().map(|d| d.profit.income).sum();
    let total_expense = details.iter().map(|d| d.profit.expense).sum();
    MonthlyProfitability {
        month_label,
        projects: details,
        total_income,
        total_expense,
        total_profit: total_income - total_expense,
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> ResultEngine<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| EngineError::Export(err.to_string()))
}

fn write_row(writer: &mut csv::Writer<Vec<u8>>, row: &[&str]) -> ResultEngine<()> {
    writer
        .write_record(row)
        .map_err(|err| EngineError::Export(err.to_string()))
}

/// General ledger export over a date window, newest first, with a totals
/// footer.
pub fn ledger_csv(
    transactions: &[Transaction],
    projects: &[Project],
    pockets: &[FinancialPocket],
    window: ReportWindow,
) -> ResultEngine<String> {
    let project_name = |id: Option<&str>| {
        id.and_then(|id| projects.iter().find(|p| p.id == id))
            .map(|p| p.project_name.as_str())
            .unwrap_or("")
    };
    let pocket_name = |id: Option<&str>| {
        id.and_then(|id| pockets.iter().find(|p| p.id == id))
            .map(|p| p.name.as_str())
            .unwrap_or("")
    };

    // Footer rows are shorter than the header row.
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Tanggal",
            "Deskripsi",
            "Kategori",
            "Proyek",
            "Jenis",
            "Jumlah",
            "Metode",
            "Kantong Anggaran",
        ],
    )?;

    let (mut income, mut expense) = (0, 0);
    for tx in transactions.iter().filter(|tx| window.contains(tx.date)) {
        match tx.transaction_type {
            TransactionType::Income => income += tx.amount,
            TransactionType::Expense => expense += tx.amount,
        }
        write_row(
            &mut writer,
            &[
                &tx.date.to_string(),
                &tx.description,
                &tx.category,
                project_name(tx.project_id.as_deref()),
                tx.transaction_type.as_str(),
                &MoneyIdr::new(tx.amount).to_string(),
                &tx.method,
                pocket_name(tx.pocket_id.as_deref()),
            ],
        )?;
    }

    write_row(&mut writer, &["", "", "", "", "", "", "", ""])?;
    write_row(
        &mut writer,
        &["Total Pemasukan", &MoneyIdr::new(income).to_string()],
    )?;
    write_row(
        &mut writer,
        &["Total Pengeluaran", &MoneyIdr::new(expense).to_string()],
    )?;
    write_row(
        &mut writer,
        &["Saldo", &MoneyIdr::new(income - expense).to_string()],
    )?;
    finish_csv(writer)
}

/// Per-project profitability export for one month: a header row per
/// project, its transactions, a per-project subtotal, and grand totals.
pub fn profitability_csv(report: &MonthlyProfitability) -> ResultEngine<String> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    write_row(
        &mut writer,
        &["Proyek", "Klien", "Tanggal", "Deskripsi", "Jenis", "Jumlah"],
    )?;

    for detail in &report.projects {
        write_row(
            &mut writer,
            &[
                &detail.profit.project_name,
                &detail.profit.client_name,
                "",
                "",
                "",
                "",
            ],
        )?;
        for tx in &detail.transactions {
            write_row(
                &mut writer,
                &[
                    "",
                    "",
                    &tx.date.to_string(),
                    &tx.description,
                    tx.transaction_type.as_str(),
                    &MoneyIdr::new(tx.amount).to_string(),
                ],
            )?;
        }
        write_row(
            &mut writer,
            &[
                "",
                "",
                "",
                "Laba Proyek",
                "",
                &MoneyIdr::new(detail.profit.profit).to_string(),
            ],
        )?;
    }

    write_row(&mut writer, &["", "", "", "", "", ""])?;
    write_row(
        &mut writer,
        &[
            "Total",
            "",
            "",
            "",
            "",
            &MoneyIdr::new(report.total_profit).to_string(),
        ],
    )?;
    finish_csv(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::PaymentStatus;

    fn tx(
        date: &str,
        amount: i64,
        tx_type: TransactionType,
        project_id: Option<&str>,
    ) -> Transaction {
        Transaction::new(
            date.parse().unwrap(),
            "tx".to_string(),
            amount,
            tx_type,
            match tx_type {
                TransactionType::Income => "DP Proyek".to_string(),
                TransactionType::Expense => "Gaji Freelancer".to_string(),
            },
            "Transfer Bank".to_string(),
            None,
            project_id.map(str::to_string),
        )
        .unwrap()
    }

    fn project(id: &str, name: &str, client: &str, date: &str, status: ProjectStatus) -> Project {
        Project {
            id: id.to_string(),
            project_name: name.to_string(),
            client_name: client.to_string(),
            client_id: "c1".to_string(),
            project_type: "Pernikahan".to_string(),
            package_name: "Silver".to_string(),
            package_id: "pkg1".to_string(),
            add_ons: serde_json::json!([]),
            date: date.parse().unwrap(),
            deadline_date: None,
            location: String::new(),
            progress: 100,
            status,
            total_cost: 10_000_000,
            amount_paid: 10_000_000,
            payment_status: PaymentStatus::Paid,
            team: serde_json::json!([]),
            notes: None,
            accommodation: None,
            drive_link: None,
            start_time: None,
            end_time: None,
        }
    }

    fn window(from: &str, to: &str) -> ReportWindow {
        ReportWindow {
            from: from.parse().unwrap(),
            to: to.parse().unwrap(),
        }
    }

    #[test]
    fn previous_window_has_the_same_length() {
        let current = window("2024-03-01", "2024-03-31");
        let previous = current.previous();
        assert_eq!(previous.to, "2024-02-29".parse().unwrap());
        assert_eq!(previous.from, "2024-01-30".parse().unwrap());
        assert_eq!(
            previous.to.signed_duration_since(previous.from),
            current.to.signed_duration_since(current.from)
        );
    }

    #[test]
    fn summary_reports_percent_change_or_new() {
        let txs = vec![
            tx("2024-02-10", 1_000_000, TransactionType::Income, None),
            tx("2024-03-10", 1_500_000, TransactionType::Income, None),
            tx("2024-03-12", 400_000, TransactionType::Expense, None),
        ];
        let report = summary(&txs, window("2024-03-01", "2024-03-31"));
        assert_eq!(report.total_income, 1_500_000);
        assert_eq!(report.income_change, Delta::Percent(50));
        // No expense in February to compare against.
        assert_eq!(report.expense_change, Delta::New);
        assert_eq!(report.net_change, Delta::Percent(10));
    }

    #[test]
    fn profitability_groups_by_project_and_client() {
        let projects = vec![
            project("p1", "Pernikahan A", "Klien A", "2024-03-02", ProjectStatus::Completed),
            project("p2", "Prewedding B", "Klien A", "2024-03-20", ProjectStatus::Completed),
        ];
        let txs = vec![
            tx("2024-03-05", 6_000_000, TransactionType::Income, Some("p1")),
            tx("2024-03-06", 2_000_000, TransactionType::Expense, Some("p1")),
            tx("2024-03-21", 3_000_000, TransactionType::Income, Some("p2")),
            tx("2024-03-22", 500_000, TransactionType::Expense, None),
        ];
        let win = window("2024-03-01", "2024-03-31");

        let per_project = project_profitability(&txs, &projects, win);
        assert_eq!(per_project.len(), 2);
        assert_eq!(per_project[0].project_id, "p1");
        assert_eq!(per_project[0].profit, 4_000_000);

        let per_client = client_profitability(&txs, &projects, win);
        assert_eq!(per_client.len(), 1);
        assert_eq!(per_client[0].client_name, "Klien A");
        assert_eq!(per_client[0].profit, 7_000_000);
    }

    #[test]
    fn monthly_profitability_only_counts_completed_projects() {
        let projects = vec![
            project("p1", "Pernikahan A", "Klien A", "2024-03-02", ProjectStatus::Completed),
            project("p2", "Prewedding B", "Klien B", "2024-03-20", ProjectStatus::Editing),
        ];
        let txs = vec![
            tx("2024-03-05", 6_000_000, TransactionType::Income, Some("p1")),
            // A cost booked after the event month still counts.
            tx("2024-04-02", 1_000_000, TransactionType::Expense, Some("p1")),
            tx("2024-03-21", 3_000_000, TransactionType::Income, Some("p2")),
        ];
        let report = monthly_profitability(&txs, &projects, 2024, 3);
        assert_eq!(report.month_label, "Maret 2024");
        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.projects[0].transactions.len(), 2);
        assert_eq!(report.total_profit, 5_000_000);
    }

    #[test]
    fn ledger_csv_has_headers_and_totals() {
        let projects = vec![project(
            "p1",
            "Pernikahan A",
            "Klien A",
            "2024-03-02",
            ProjectStatus::Completed,
        )];
        let txs = vec![
            tx("2024-03-05", 6_000_000, TransactionType::Income, Some("p1")),
            tx("2024-03-06", 2_000_000, TransactionType::Expense, None),
        ];
        let csv = ledger_csv(&txs, &projects, &[], window("2024-03-01", "2024-03-31")).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Tanggal,Deskripsi,Kategori,Proyek,Jenis,Jumlah,Metode,Kantong Anggaran"
        );
        assert!(csv.contains("Pernikahan A"));
        assert!(csv.contains("Total Pemasukan,Rp6.000.000"));
        assert!(csv.contains("Saldo,Rp4.000.000"));
    }
}
