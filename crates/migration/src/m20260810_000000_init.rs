//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for the studio backend:
//!
//! - `users`: operator accounts
//! - `clients`, `leads`: customer book and prospect intake
//! - `projects`, `packages`, `addons`: the work being sold
//! - `team_members`, `team_project_payments`, `team_payment_records`,
//!   `reward_ledger_entries`: freelancer fees and rewards
//! - `transactions`, `financial_pockets`: the money ledger
//! - `profile`: the singleton studio profile and its category lists
//!
//! Cross-table references are plain string ids; the engine keeps them
//! consistent, so transactions can outlive the pocket or project that
//! spawned them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Password,
    FullName,
    Role,
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Since,
    Instagram,
    Status,
    LastContact,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    ProjectName,
    ClientName,
    ClientId,
    ProjectType,
    PackageName,
    PackageId,
    AddOns,
    Date,
    DeadlineDate,
    Location,
    Progress,
    Status,
    TotalCost,
    AmountPaid,
    PaymentStatus,
    Team,
    Notes,
    Accommodation,
    DriveLink,
    StartTime,
    EndTime,
}

#[derive(Iden)]
enum TeamMembers {
    Table,
    Id,
    Name,
    Role,
    Email,
    Phone,
    StandardFee,
    RewardBalance,
}

#[derive(Iden)]
enum Packages {
    Table,
    Id,
    Name,
    Price,
    Description,
}

#[derive(Iden)]
enum Addons {
    Table,
    Id,
    Name,
    Price,
}

#[derive(Iden)]
enum TeamProjectPayments {
    Table,
    Id,
    ProjectId,
    TeamMemberName,
    TeamMemberId,
    Date,
    Status,
    Fee,
    Reward,
}

#[derive(Iden)]
enum TeamPaymentRecords {
    Table,
    Id,
    RecordNumber,
    TeamMemberId,
    Date,
    ProjectPaymentIds,
    TotalAmount,
}

#[derive(Iden)]
enum Leads {
    Table,
    Id,
    Name,
    ContactChannel,
    Location,
    Status,
    Date,
    Notes,
}

#[derive(Iden)]
enum RewardLedgerEntries {
    Table,
    Id,
    TeamMemberId,
    Date,
    Description,
    Amount,
    ProjectId,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Date,
    Description,
    Amount,
    Type,
    Category,
    Method,
    PocketId,
    ProjectId,
}

#[derive(Iden)]
enum FinancialPockets {
    Table,
    Id,
    Name,
    Description,
    Icon,
    Type,
    Amount,
    GoalAmount,
    LockEndDate,
    Members,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    CompanyName,
    Website,
    Address,
    BankAccount,
    Bio,
    IncomeCategories,
    ExpenseCategories,
    ProjectTypes,
    EventTypes,
    NotificationSettings,
    SecuritySettings,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Clients & leads
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string().not_null())
                    .col(ColumnDef::new(Clients::Phone).string().not_null())
                    .col(ColumnDef::new(Clients::Since).date().not_null())
                    .col(ColumnDef::new(Clients::Instagram).string())
                    .col(ColumnDef::new(Clients::Status).string().not_null())
                    .col(ColumnDef::new(Clients::LastContact).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Leads::Name).string().not_null())
                    .col(ColumnDef::new(Leads::ContactChannel).string().not_null())
                    .col(ColumnDef::new(Leads::Location).string().not_null())
                    .col(ColumnDef::new(Leads::Status).string().not_null())
                    .col(ColumnDef::new(Leads::Date).date().not_null())
                    .col(ColumnDef::new(Leads::Notes).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Projects, packages and add-ons
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::ProjectName).string().not_null())
                    .col(ColumnDef::new(Projects::ClientName).string().not_null())
                    .col(ColumnDef::new(Projects::ClientId).string().not_null())
                    .col(ColumnDef::new(Projects::ProjectType).string().not_null())
                    .col(ColumnDef::new(Projects::PackageName).string().not_null())
                    .col(ColumnDef::new(Projects::PackageId).string().not_null())
                    .col(ColumnDef::new(Projects::AddOns).json().not_null())
                    .col(ColumnDef::new(Projects::Date).date().not_null())
                    .col(ColumnDef::new(Projects::DeadlineDate).date())
                    .col(ColumnDef::new(Projects::Location).string().not_null())
                    .col(ColumnDef::new(Projects::Progress).integer().not_null())
                    .col(ColumnDef::new(Projects::Status).string().not_null())
                    .col(ColumnDef::new(Projects::TotalCost).big_integer().not_null())
                    .col(
                        ColumnDef::new(Projects::AmountPaid)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Projects::Team).json().not_null())
                    .col(ColumnDef::new(Projects::Notes).string())
                    .col(ColumnDef::new(Projects::Accommodation).string())
                    .col(ColumnDef::new(Projects::DriveLink).string())
                    .col(ColumnDef::new(Projects::StartTime).string())
                    .col(ColumnDef::new(Projects::EndTime).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Packages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Packages::Name).string().not_null())
                    .col(ColumnDef::new(Packages::Price).big_integer().not_null())
                    .col(ColumnDef::new(Packages::Description).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Addons::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Addons::Name).string().not_null())
                    .col(ColumnDef::new(Addons::Price).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Freelancer payroll
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMembers::Name).string().not_null())
                    .col(ColumnDef::new(TeamMembers::Role).string().not_null())
                    .col(ColumnDef::new(TeamMembers::Email).string().not_null())
                    .col(ColumnDef::new(TeamMembers::Phone).string().not_null())
                    .col(
                        ColumnDef::new(TeamMembers::StandardFee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamMembers::RewardBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamProjectPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamProjectPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeamProjectPayments::ProjectId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamProjectPayments::TeamMemberName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamProjectPayments::TeamMemberId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeamProjectPayments::Date).date().not_null())
                    .col(
                        ColumnDef::new(TeamProjectPayments::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamProjectPayments::Fee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeamProjectPayments::Reward).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamPaymentRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamPaymentRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeamPaymentRecords::RecordNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamPaymentRecords::TeamMemberId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeamPaymentRecords::Date).date().not_null())
                    .col(
                        ColumnDef::new(TeamPaymentRecords::ProjectPaymentIds)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamPaymentRecords::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewardLedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardLedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RewardLedgerEntries::TeamMemberId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RewardLedgerEntries::Date).date().not_null())
                    .col(
                        ColumnDef::new(RewardLedgerEntries::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardLedgerEntries::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RewardLedgerEntries::ProjectId).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Ledger
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Description).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Type).string().not_null())
                    .col(ColumnDef::new(Transactions::Category).string().not_null())
                    .col(ColumnDef::new(Transactions::Method).string().not_null())
                    .col(ColumnDef::new(Transactions::PocketId).string())
                    .col(ColumnDef::new(Transactions::ProjectId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-date")
                    .table(Transactions::Table)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-pocket_id")
                    .table(Transactions::Table)
                    .col(Transactions::PocketId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FinancialPockets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialPockets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FinancialPockets::Name).string().not_null())
                    .col(
                        ColumnDef::new(FinancialPockets::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialPockets::Icon).string().not_null())
                    .col(ColumnDef::new(FinancialPockets::Type).string().not_null())
                    .col(
                        ColumnDef::new(FinancialPockets::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialPockets::GoalAmount).big_integer())
                    .col(ColumnDef::new(FinancialPockets::LockEndDate).date())
                    .col(ColumnDef::new(FinancialPockets::Members).json())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Profile
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::FullName).string().not_null())
                    .col(ColumnDef::new(Profile::Email).string().not_null())
                    .col(ColumnDef::new(Profile::Phone).string().not_null())
                    .col(ColumnDef::new(Profile::CompanyName).string().not_null())
                    .col(ColumnDef::new(Profile::Website).string().not_null())
                    .col(ColumnDef::new(Profile::Address).string().not_null())
                    .col(ColumnDef::new(Profile::BankAccount).string().not_null())
                    .col(ColumnDef::new(Profile::Bio).string().not_null())
                    .col(
                        ColumnDef::new(Profile::IncomeCategories)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profile::ExpenseCategories)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Profile::ProjectTypes).json().not_null())
                    .col(ColumnDef::new(Profile::EventTypes).json().not_null())
                    .col(
                        ColumnDef::new(Profile::NotificationSettings)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profile::SecuritySettings)
                            .json()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FinancialPockets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RewardLedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamPaymentRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamProjectPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
