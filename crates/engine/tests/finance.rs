use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CategoryKind, Client, ClientStatus, Engine, EngineError, FinancialPocket, LeadStatus,
    PocketAction, PocketType, Profile, Transaction, TransactionFilter, TransactionType, User,
    UserRole,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn rebuild(db: &DatabaseConnection) -> Engine {
    Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn income(day: &str, description: &str, amount: i64) -> Transaction {
    Transaction::new(
        date(day),
        description.to_string(),
        amount,
        TransactionType::Income,
        "DP Proyek".to_string(),
        "Transfer Bank".to_string(),
        None,
        None,
    )
    .unwrap()
}

fn expense(day: &str, description: &str, amount: i64, pocket_id: Option<String>) -> Transaction {
    Transaction::new(
        date(day),
        description.to_string(),
        amount,
        TransactionType::Expense,
        "Operasional".to_string(),
        "Tunai".to_string(),
        pocket_id,
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

#[tokio::test]
async fn transactions_survive_a_rebuild() {
    let (mut engine, db) = engine_with_db().await;

    engine
        .add_transaction(income("2024-03-01", "DP Pernikahan A", 5_000_000))
        .await
        .unwrap();
    engine
        .add_transaction(expense("2024-03-10", "Sewa studio", 1_500_000, None))
        .await
        .unwrap();

    assert_eq!(engine.summary().main_balance, 3_500_000);

    let reloaded = rebuild(&db).await;
    assert_eq!(reloaded.summary().main_balance, 3_500_000);
    let listed = reloaded.transactions(&TransactionFilter::default());
    assert_eq!(listed.len(), 2);
    // Newest first.
    assert_eq!(listed[0].description, "Sewa studio");
}

#[tokio::test]
async fn funded_pocket_moves_money_out_of_the_main_balance() {
    let (mut engine, db) = engine_with_db().await;
    engine
        .add_transaction(income("2024-03-01", "Pelunasan", 10_000_000))
        .await
        .unwrap();

    let pocket = engine
        .create_pocket(saving_pocket("Dana Darurat", 4_000_000), date("2024-03-02"))
        .await
        .unwrap();

    assert_eq!(engine.summary().main_balance, 6_000_000);
    assert_eq!(engine.summary().pockets_total, 4_000_000);
    assert_eq!(engine.summary().total_assets, 10_000_000);

    engine
        .manage_pocket(&pocket.id, PocketAction::TopUp, 1_000_000, date("2024-03-05"))
        .await
        .unwrap();
    engine
        .manage_pocket(&pocket.id, PocketAction::Withdraw, 500_000, date("2024-03-06"))
        .await
        .unwrap();

    let err = engine
        .manage_pocket(&pocket.id, PocketAction::Withdraw, 99_000_000, date("2024-03-07"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let reloaded = rebuild(&db).await;
    let pockets = reloaded.pockets();
    assert_eq!(pockets.len(), 1);
    assert_eq!(pockets[0].amount, 4_500_000);
    assert_eq!(reloaded.summary().main_balance, 5_500_000);
}

#[tokio::test]
async fn deleting_a_saving_pocket_returns_its_balance() {
    let (mut engine, db) = engine_with_db().await;
    engine
        .add_transaction(income("2024-03-01", "Pelunasan", 10_000_000))
        .await
        .unwrap();
    let pocket = engine
        .create_pocket(saving_pocket("Dana Darurat", 4_000_000), date("2024-03-02"))
        .await
        .unwrap();

    engine.delete_pocket(&pocket.id, date("2024-04-01")).await.unwrap();

    // The opening transfer is purged and the closing income remains, so
    // the main balance ends up at 10M + 4M.
    assert_eq!(engine.summary().main_balance, 14_000_000);
    assert!(engine.pockets().is_empty());
    let listed = engine.transactions(&TransactionFilter::default());
    assert_eq!(listed.len(), 2);

    let reloaded = rebuild(&db).await;
    assert_eq!(reloaded.summary().main_balance, 14_000_000);
    assert_eq!(reloaded.transactions(&TransactionFilter::default()).len(), 2);
}

#[tokio::test]
async fn budget_pocket_tracks_spend_and_closes_monthly() {
    let (mut engine, db) = engine_with_db().await;
    engine
        .add_transaction(income("2024-03-01", "Pelunasan", 20_000_000))
        .await
        .unwrap();
    let budget = engine
        .create_pocket(budget_pocket(3_000_000), date("2024-03-01"))
        .await
        .unwrap();
    let saving = engine
        .create_pocket(saving_pocket("Dana Darurat", 0), date("2024-03-01"))
        .await
        .unwrap();

    engine
        .add_transaction(expense(
            "2024-03-10",
            "Listrik",
            1_000_000,
            Some(budget.id.clone()),
        ))
        .await
        .unwrap();
    engine
        .add_transaction(expense(
            "2024-03-15",
            "Internet",
            800_000,
            Some(budget.id.clone()),
        ))
        .await
        .unwrap();

    let status = engine.budget_status(date("2024-03-20")).unwrap();
    assert_eq!(status.spent_this_month, 1_800_000);
    assert_eq!(status.remaining, 1_200_000);

    let transfer = engine
        .close_budget(&saving.id, date("2024-03-31"))
        .await
        .unwrap();
    assert_eq!(transfer.amount, 1_200_000);

    let reloaded = rebuild(&db).await;
    let pockets = reloaded.pockets();
    let saving = pockets.iter().find(|p| p.id == saving.id).unwrap();
    assert_eq!(saving.amount, 1_200_000);
    // New month, new cycle.
    let status = reloaded.budget_status(date("2024-04-02")).unwrap();
    assert_eq!(status.spent_this_month, 0);
}

#[tokio::test]
async fn editing_a_transaction_readjusts_its_pocket() {
    let (mut engine, db) = engine_with_db().await;
    engine
        .add_transaction(income("2024-03-01", "Pelunasan", 10_000_000))
        .await
        .unwrap();
    let budget = engine
        .create_pocket(budget_pocket(3_000_000), date("2024-03-01"))
        .await
        .unwrap();
    let tx = engine
        .add_transaction(expense(
            "2024-03-10",
            "Listrik",
            1_000_000,
            Some(budget.id.clone()),
        ))
        .await
        .unwrap();

    let mut edited = tx.clone();
    edited.amount = 400_000;
    engine.update_transaction(edited).await.unwrap();
    assert_eq!(engine.pockets()[0].amount, 400_000);

    engine.delete_transaction(&tx.id).await.unwrap();
    assert_eq!(engine.pockets()[0].amount, 0);

    let reloaded = rebuild(&db).await;
    assert_eq!(reloaded.pockets()[0].amount, 0);
    assert_eq!(reloaded.summary().main_balance, 10_000_000);
}

#[tokio::test]
async fn system_transfers_cannot_be_edited() {
    let (mut engine, _db) = engine_with_db().await;
    engine
        .add_transaction(income("2024-03-01", "Pelunasan", 10_000_000))
        .await
        .unwrap();
    engine
        .create_pocket(saving_pocket("Dana Darurat", 2_000_000), date("2024-03-02"))
        .await
        .unwrap();

    let transfer = engine
        .transactions(&TransactionFilter::default())
        .into_iter()
        .find(|tx| tx.is_transfer())
        .unwrap();
    let mut edited = transfer.clone();
    edited.amount = 1;
    let err = engine.update_transaction(edited).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransaction(_)));
}

#[tokio::test]
async fn client_records_round_trip() {
    let (mut engine, db) = engine_with_db().await;
    let client = engine
        .create_client(Client {
            id: String::new(),
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            phone: "0812".to_string(),
            since: date("2024-01-15"),
            instagram: Some("@budi".to_string()),
            status: ClientStatus::Active,
            last_contact: date("2024-03-01"),
        })
        .await
        .unwrap();
    assert!(!client.id.is_empty());

    let mut renamed = client.clone();
    renamed.name = "Budi S.".to_string();
    engine.update_client(renamed).await.unwrap();

    let reloaded = rebuild(&db).await;
    assert_eq!(reloaded.clients()[0].name, "Budi S.");

    let err = engine.delete_client("missing").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("missing".to_string()));
    engine.delete_client(&client.id).await.unwrap();
    assert!(engine.clients().is_empty());
}

#[tokio::test]
async fn duplicate_user_email_is_rejected() {
    let (mut engine, _db) = engine_with_db().await;
    let user = User {
        id: String::new(),
        email: "admin@vena.pictures".to_string(),
        password: "rahasia".to_string(),
        full_name: "Admin".to_string(),
        role: UserRole::Admin,
    };
    engine.create_user(user.clone()).await.unwrap();
    let err = engine
        .create_user(User {
            email: "Admin@vena.pictures".to_string(),
            ..user
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    assert!(
        engine
            .user_by_credentials("admin@vena.pictures", "rahasia")
            .is_some()
    );
    assert!(
        engine
            .user_by_credentials("admin@vena.pictures", "salah")
            .is_none()
    );
}

#[tokio::test]
async fn profile_categories_are_guarded_by_usage() {
    let (mut engine, db) = engine_with_db().await;
    engine
        .save_profile(Profile {
            full_name: "Vena".to_string(),
            email: "vena@example.com".to_string(),
            phone: String::new(),
            company_name: "Vena Pictures".to_string(),
            website: String::new(),
            address: String::new(),
            bank_account: String::new(),
            bio: String::new(),
            income_categories: vec!["DP Proyek".to_string()],
            expense_categories: vec!["Operasional".to_string()],
            project_types: vec!["Pernikahan".to_string()],
            event_types: vec![],
            notification_settings: serde_json::json!({"newProject": true}),
            security_settings: serde_json::json!({}),
        })
        .await
        .unwrap();

    engine
        .add_transaction(expense("2024-03-10", "Listrik", 500_000, None))
        .await
        .unwrap();

    let err = engine
        .remove_category(CategoryKind::Expense, "Operasional")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CategoryInUse(_)));

    engine
        .add_category(CategoryKind::Income, "Pelunasan Proyek")
        .await
        .unwrap();
    engine
        .rename_category(CategoryKind::ProjectType, "Pernikahan", "Wedding")
        .await
        .unwrap();

    let reloaded = rebuild(&db).await;
    let profile = reloaded.profile().unwrap();
    assert_eq!(profile.income_categories.len(), 2);
    assert_eq!(profile.project_types[0], "Wedding");
}

#[tokio::test]
async fn suggestion_becomes_a_new_lead() {
    let (mut engine, db) = engine_with_db().await;
    let lead = engine
        .submit_suggestion(
            "Citra".to_string(),
            "0812000".to_string(),
            "Tertarik paket prewedding".to_string(),
            date("2024-03-20"),
        )
        .await
        .unwrap();
    assert_eq!(lead.status, LeadStatus::New);

    let reloaded = rebuild(&db).await;
    assert_eq!(reloaded.leads().len(), 1);
    assert_eq!(
        reloaded.leads()[0].contact_channel,
        engine::ContactChannel::SuggestionForm
    );
}

#[tokio::test]
async fn ledger_export_covers_the_window() {
    let (mut engine, _db) = engine_with_db().await;
    engine
        .add_transaction(income("2024-03-01", "DP Pernikahan A", 5_000_000))
        .await
        .unwrap();
    engine
        .add_transaction(expense("2024-04-02", "Sewa studio", 1_500_000, None))
        .await
        .unwrap();

    let csv = engine
        .ledger_csv(engine::ReportWindow {
            from: date("2024-03-01"),
            to: date("2024-03-31"),
        })
        .unwrap();
    assert!(csv.starts_with("Tanggal,"));
    assert!(csv.contains("DP Pernikahan A"));
    assert!(!csv.contains("Sewa studio"));
    assert!(csv.contains("Saldo,Rp5.000.000"));
}
