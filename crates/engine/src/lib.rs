//! Business engine for the studio: entity records, the transaction
//! ledger with its financial pockets, and the reporting layer.
//!
//! All state lives in memory and is backed by the database. Mutations are
//! planned against the in-memory state first, persisted inside a single
//! database transaction, and applied to memory only after the commit, so
//! the two never diverge.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, DatabaseTransaction, EntityTrait,
    TransactionTrait,
};
use uuid::Uuid;

pub use cashflow::{CashFlowBucket, CashFlowSeries, ProjectionPoint};
pub use clients::{Client, ClientStatus};
pub use error::EngineError;
pub use leads::{ContactChannel, Lead, LeadStatus};
pub use ledger::{BudgetStatus, Ledger, PocketAction, Summary};
pub use money::MoneyIdr;
pub use packages::{AddOn, Package};
pub use pockets::{FinancialPocket, PocketType};
pub use profile::{CategoryKind, Profile};
pub use projects::{PaymentStatus, Project, ProjectStatus};
pub use reports::{
    CategorySummary, ClientProfit, Delta, MonthlyProfitability, ProjectProfit, ProjectProfitDetail,
    ReportSummary, ReportWindow,
};
pub use team::{
    RewardLedgerEntry, TeamMember, TeamPaymentRecord, TeamPaymentStatus, TeamProjectPayment,
};
pub use transactions::{
    SYSTEM_METHOD, TRANSFER_CATEGORY, Transaction, TransactionFilter, TransactionType,
};
pub use users::{User, UserRole};

mod cashflow;
mod clients;
mod error;
mod leads;
mod ledger;
mod money;
mod packages;
mod pockets;
mod profile;
mod projects;
mod reports;
mod team;
mod transactions;
mod users;

pub type ResultEngine<T> = Result<T, EngineError>;

/// All studio records held in memory.
#[derive(Debug, Default, Clone)]
struct Studio {
    clients: Vec<Client>,
    projects: Vec<Project>,
    team_members: Vec<TeamMember>,
    packages: Vec<Package>,
    add_ons: Vec<AddOn>,
    team_project_payments: Vec<TeamProjectPayment>,
    team_payment_records: Vec<TeamPaymentRecord>,
    reward_ledger_entries: Vec<RewardLedgerEntry>,
    leads: Vec<Lead>,
    users: Vec<User>,
    profile: Option<Profile>,
    ledger: Ledger,
}

#[derive(Debug)]
pub struct Engine {
    studio: Studio,
    database: DatabaseConnection,
}

/// Generates list/create/update/delete for one plain record collection.
/// Create assigns a fresh id; update and delete key on the stored id.
macro_rules! crud_ops {
    (
        $field:ident, $ty:ty, $active:ty, $entity:ty,
        $list:ident, $create:ident, $update:ident, $delete:ident
    ) => {
        impl Engine {
            pub fn $list(&self) -> Vec<$ty> {
                self.studio.$field.clone()
            }

            pub async fn $create(&mut self, mut item: $ty) -> ResultEngine<$ty> {
                item.id = Uuid::new_v4().to_string();
                let db_tx = self.database.begin().await?;
                <$active>::from(&item).insert(&db_tx).await?;
                db_tx.commit().await?;
                self.studio.$field.push(item.clone());
                Ok(item)
            }

            pub async fn $update(&mut self, item: $ty) -> ResultEngine<$ty> {
                let index = self
                    .studio
                    .$field
                    .iter()
                    .position(|stored| stored.id == item.id)
                    .ok_or_else(|| EngineError::KeyNotFound(item.id.clone()))?;
                let db_tx = self.database.begin().await?;
                <$active>::from(&item).update(&db_tx).await?;
                db_tx.commit().await?;
                self.studio.$field[index] = item.clone();
                Ok(item)
            }

            pub async fn $delete(&mut self, id: &str) -> ResultEngine<()> {
                if !self.studio.$field.iter().any(|stored| stored.id == id) {
                    return Err(EngineError::KeyNotFound(id.to_string()));
                }
                let db_tx = self.database.begin().await?;
                <$entity>::delete_by_id(id.to_string()).exec(&db_tx).await?;
                db_tx.commit().await?;
                self.studio.$field.retain(|stored| stored.id != id);
                Ok(())
            }
        }
    };
}

crud_ops!(
    clients, Client, clients::ActiveModel, clients::Entity,
    clients, create_client, update_client, delete_client
);
crud_ops!(
    projects, Project, projects::ActiveModel, projects::Entity,
    projects, create_project, update_project, delete_project
);
crud_ops!(
    team_members, TeamMember, team::members::ActiveModel, team::members::Entity,
    team_members, create_team_member, update_team_member, delete_team_member
);
crud_ops!(
    packages, Package, packages::packages::ActiveModel, packages::packages::Entity,
    packages, create_package, update_package, delete_package
);
crud_ops!(
    add_ons, AddOn, packages::addons::ActiveModel, packages::addons::Entity,
    add_ons, create_add_on, update_add_on, delete_add_on
);
crud_ops!(
    team_project_payments, TeamProjectPayment,
    team::project_payments::ActiveModel, team::project_payments::Entity,
    team_project_payments, create_team_project_payment,
    update_team_project_payment, delete_team_project_payment
);
crud_ops!(
    team_payment_records, TeamPaymentRecord,
    team::payment_records::ActiveModel, team::payment_records::Entity,
    team_payment_records, create_team_payment_record,
    update_team_payment_record, delete_team_payment_record
);
crud_ops!(
    reward_ledger_entries, RewardLedgerEntry,
    team::reward_entries::ActiveModel, team::reward_entries::Entity,
    reward_ledger_entries, create_reward_ledger_entry,
    update_reward_ledger_entry, delete_reward_ledger_entry
);
crud_ops!(
    leads, Lead, leads::ActiveModel, leads::Entity,
    leads, create_lead, update_lead, delete_lead
);

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    // ── Users ──────────────────────────────────────────────────────────

    pub fn users(&self) -> Vec<User> {
        self.studio.users.clone()
    }

    pub fn user_by_credentials(&self, email: &str, password: &str) -> Option<&User> {
        self.studio
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email) && user.password == password)
    }

    pub async fn create_user(&mut self, mut user: User) -> ResultEngine<User> {
        if self
            .studio
            .users
            .iter()
            .any(|stored| stored.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(EngineError::ExistingKey(user.email.clone()));
        }
        user.id = Uuid::new_v4().to_string();
        let db_tx = self.database.begin().await?;
        users::ActiveModel::from(&user).insert(&db_tx).await?;
        db_tx.commit().await?;
        self.studio.users.push(user.clone());
        Ok(user)
    }

    pub async fn update_user(&mut self, user: User) -> ResultEngine<User> {
        let index = self
            .studio
            .users
            .iter()
            .position(|stored| stored.id == user.id)
            .ok_or_else(|| EngineError::KeyNotFound(user.id.clone()))?;
        if self
            .studio
            .users
            .iter()
            .any(|stored| stored.id != user.id && stored.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(EngineError::ExistingKey(user.email.clone()));
        }
        let db_tx = self.database.begin().await?;
        users::ActiveModel::from(&user).update(&db_tx).await?;
        db_tx.commit().await?;
        self.studio.users[index] = user.clone();
        Ok(user)
    }

    pub async fn delete_user(&mut self, id: &str) -> ResultEngine<()> {
        if !self.studio.users.iter().any(|stored| stored.id == id) {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        let db_tx = self.database.begin().await?;
        users::Entity::delete_by_id(id.to_string()).exec(&db_tx).await?;
        db_tx.commit().await?;
        self.studio.users.retain(|stored| stored.id != id);
        Ok(())
    }

    // ── Profile & categories ───────────────────────────────────────────

    pub fn profile(&self) -> Option<Profile> {
        self.studio.profile.clone()
    }

    /// Saves the singleton profile, creating it on first save.
    pub async fn save_profile(&mut self, profile: Profile) -> ResultEngine<Profile> {
        let model = profile::ActiveModel::from(&profile);
        let db_tx = self.database.begin().await?;
        if self.studio.profile.is_some() {
            model.update(&db_tx).await?;
        } else {
            model.insert(&db_tx).await?;
        }
        db_tx.commit().await?;
        self.studio.profile = Some(profile.clone());
        Ok(profile)
    }

    fn profile_or_not_found(&self) -> ResultEngine<Profile> {
        self.studio
            .profile
            .clone()
            .ok_or_else(|| EngineError::KeyNotFound("profile".to_string()))
    }

    async fn persist_profile(&mut self, profile: Profile) -> ResultEngine<Profile> {
        let db_tx = self.database.begin().await?;
        profile::ActiveModel::from(&profile).update(&db_tx).await?;
        db_tx.commit().await?;
        self.studio.profile = Some(profile.clone());
        Ok(profile)
    }

    pub async fn add_category(&mut self, kind: CategoryKind, name: &str) -> ResultEngine<Profile> {
        let mut profile = self.profile_or_not_found()?;
        profile.add_category(kind, name)?;
        self.persist_profile(profile).await
    }

    pub async fn rename_category(
        &mut self,
        kind: CategoryKind,
        from: &str,
        to: &str,
    ) -> ResultEngine<Profile> {
        let mut profile = self.profile_or_not_found()?;
        profile.rename_category(kind, from, to)?;
        self.persist_profile(profile).await
    }

    pub async fn remove_category(
        &mut self,
        kind: CategoryKind,
        name: &str,
    ) -> ResultEngine<Profile> {
        let mut profile = self.profile_or_not_found()?;
        profile.remove_category(kind, name, &self.studio.ledger.transactions)?;
        self.persist_profile(profile).await
    }

    // ── Public intake ──────────────────────────────────────────────────

    /// Files a suggestion-form submission as a fresh lead.
    pub async fn submit_suggestion(
        &mut self,
        name: String,
        whatsapp: String,
        message: String,
        today: NaiveDate,
    ) -> ResultEngine<Lead> {
        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            name,
            contact_channel: ContactChannel::SuggestionForm,
            location: String::new(),
            status: LeadStatus::New,
            date: today,
            notes: Some(format!("WhatsApp: {whatsapp}\n{message}")),
        };
        let db_tx = self.database.begin().await?;
        leads::ActiveModel::from(&lead).insert(&db_tx).await?;
        db_tx.commit().await?;
        self.studio.leads.push(lead.clone());
        Ok(lead)
    }

    // ── Finance ────────────────────────────────────────────────────────

    pub fn transactions(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.studio
            .ledger
            .filtered(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn pockets(&self) -> Vec<FinancialPocket> {
        self.studio.ledger.pockets.clone()
    }

    pub fn summary(&self) -> Summary {
        self.studio.ledger.summary()
    }

    pub fn budget_status(&self, today: NaiveDate) -> Option<BudgetStatus> {
        self.studio.ledger.budget_status(today)
    }

    pub async fn add_transaction(&mut self, tx: Transaction) -> ResultEngine<Transaction> {
        let plan = self.studio.ledger.plan_add_transaction(&tx)?;
        let db_tx = self.database.begin().await?;
        transactions::ActiveModel::from(&plan.transaction)
            .insert(&db_tx)
            .await?;
        Self::persist_pocket_updates(&db_tx, &plan.pocket_updates).await?;
        db_tx.commit().await?;
        let stored = plan.transaction.clone();
        self.studio.ledger.apply_add_transaction(plan)?;
        Ok(stored)
    }

    pub async fn update_transaction(&mut self, tx: Transaction) -> ResultEngine<Transaction> {
        let plan = self.studio.ledger.plan_update_transaction(&tx)?;
        let db_tx = self.database.begin().await?;
        transactions::ActiveModel::from(&plan.transaction)
            .update(&db_tx)
            .await?;
        Self::persist_pocket_updates(&db_tx, &plan.pocket_updates).await?;
        db_tx.commit().await?;
        let stored = plan.transaction.clone();
        self.studio.ledger.apply_update_transaction(plan)?;
        Ok(stored)
    }

    pub async fn delete_transaction(&mut self, id: &str) -> ResultEngine<()> {
        let plan = self.studio.ledger.plan_delete_transaction(id)?;
        let db_tx = self.database.begin().await?;
        transactions::Entity::delete_by_id(plan.transaction.id.clone())
            .exec(&db_tx)
            .await?;
        Self::persist_pocket_updates(&db_tx, &plan.pocket_updates).await?;
        db_tx.commit().await?;
        self.studio.ledger.apply_delete_transaction(&plan)?;
        Ok(())
    }

    pub async fn create_pocket(
        &mut self,
        pocket: FinancialPocket,
        today: NaiveDate,
    ) -> ResultEngine<FinancialPocket> {
        let plan = self.studio.ledger.plan_new_pocket(pocket, today)?;
        let db_tx = self.database.begin().await?;
        pockets::ActiveModel::from(&plan.pocket).insert(&db_tx).await?;
        if let Some(opening) = &plan.opening_transaction {
            transactions::ActiveModel::from(opening).insert(&db_tx).await?;
        }
        db_tx.commit().await?;
        let stored = plan.pocket.clone();
        self.studio.ledger.apply_new_pocket(plan)?;
        Ok(stored)
    }

    /// Edits pocket metadata. The type is fixed at creation and the amount
    /// is owned by the ledger, so both are rejected here.
    pub async fn update_pocket(
        &mut self,
        updated: FinancialPocket,
    ) -> ResultEngine<FinancialPocket> {
        let stored = self.studio.ledger.pocket(&updated.id)?;
        if stored.pocket_type != updated.pocket_type {
            return Err(EngineError::InvalidPocket(
                "pocket type cannot change".to_string(),
            ));
        }
        let pocket = FinancialPocket {
            amount: stored.amount,
            ..updated
        };
        let db_tx = self.database.begin().await?;
        pockets::ActiveModel::from(&pocket).update(&db_tx).await?;
        db_tx.commit().await?;
        let slot = self
            .studio
            .ledger
            .pockets
            .iter_mut()
            .find(|p| p.id == pocket.id)
            .ok_or_else(|| EngineError::KeyNotFound(pocket.id.clone()))?;
        *slot = pocket.clone();
        Ok(pocket)
    }

    pub async fn manage_pocket(
        &mut self,
        pocket_id: &str,
        action: PocketAction,
        amount: i64,
        today: NaiveDate,
    ) -> ResultEngine<FinancialPocket> {
        let plan = self
            .studio
            .ledger
            .plan_manage_pocket(pocket_id, action, amount, today)?;
        let db_tx = self.database.begin().await?;
        transactions::ActiveModel::from(&plan.transaction)
            .insert(&db_tx)
            .await?;
        Self::persist_pocket_updates(&db_tx, std::slice::from_ref(&plan.pocket_update)).await?;
        db_tx.commit().await?;
        self.studio.ledger.apply_manage_pocket(plan)?;
        self.studio.ledger.pocket(pocket_id).map(Clone::clone)
    }

    pub async fn delete_pocket(&mut self, pocket_id: &str, today: NaiveDate) -> ResultEngine<()> {
        let plan = self.studio.ledger.plan_delete_pocket(pocket_id, today)?;
        let db_tx = self.database.begin().await?;
        for id in &plan.purged_transaction_ids {
            transactions::Entity::delete_by_id(id.clone()).exec(&db_tx).await?;
        }
        for id in &plan.detached_transaction_ids {
            let detach = transactions::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                pocket_id: ActiveValue::Set(None),
                ..Default::default()
            };
            detach.update(&db_tx).await?;
        }
        if let Some(closing) = &plan.closing_transaction {
            transactions::ActiveModel::from(closing).insert(&db_tx).await?;
        }
        pockets::Entity::delete_by_id(plan.pocket_id.clone())
            .exec(&db_tx)
            .await?;
        db_tx.commit().await?;
        self.studio.ledger.apply_delete_pocket(plan)?;
        Ok(())
    }

    /// Moves this month's unspent budget into a saving or locked pocket and
    /// returns the transfer that carried it.
    pub async fn close_budget(
        &mut self,
        destination_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<Transaction> {
        let plan = self.studio.ledger.plan_close_budget(destination_id, today)?;
        let db_tx = self.database.begin().await?;
        transactions::ActiveModel::from(&plan.transaction)
            .insert(&db_tx)
            .await?;
        Self::persist_pocket_updates(&db_tx, &plan.pocket_updates).await?;
        db_tx.commit().await?;
        let transfer = plan.transaction.clone();
        self.studio.ledger.apply_close_budget(plan)?;
        Ok(transfer)
    }

    async fn persist_pocket_updates(
        db_tx: &DatabaseTransaction,
        updates: &[ledger::PocketUpdate],
    ) -> ResultEngine<()> {
        for update in updates {
            let model = pockets::ActiveModel {
                id: ActiveValue::Set(update.id.clone()),
                amount: ActiveValue::Set(update.amount),
                ..Default::default()
            };
            model.update(db_tx).await?;
        }
        Ok(())
    }

    // ── Cash flow & reports ────────────────────────────────────────────

    pub fn cash_flow_monthly(&self, year: i32, month: u32) -> CashFlowSeries {
        cashflow::monthly_series(&self.studio.ledger.transactions, year, month)
    }

    pub fn cash_flow_yearly(&self, year: i32) -> CashFlowSeries {
        cashflow::yearly_series(&self.studio.ledger.transactions, year)
    }

    pub fn cash_flow_projection(&self, today: NaiveDate) -> Vec<ProjectionPoint> {
        cashflow::projection(&self.studio.ledger.transactions, &self.studio.projects, today)
    }

    pub fn report_summary(&self, window: ReportWindow) -> ReportSummary {
        reports::summary(&self.studio.ledger.transactions, window)
    }

    pub fn income_by_category(&self, window: ReportWindow) -> Vec<CategorySummary> {
        reports::income_by_category(&self.studio.ledger.transactions, window)
    }

    pub fn expense_by_category(&self, window: ReportWindow) -> Vec<CategorySummary> {
        reports::expense_by_category(&self.studio.ledger.transactions, window)
    }

    pub fn project_profitability(&self, window: ReportWindow) -> Vec<ProjectProfit> {
        reports::project_profitability(
            &self.studio.ledger.transactions,
            &self.studio.projects,
            window,
        )
    }

    pub fn client_profitability(&self, window: ReportWindow) -> Vec<ClientProfit> {
        reports::client_profitability(
            &self.studio.ledger.transactions,
            &self.studio.projects,
            window,
        )
    }

    pub fn monthly_profitability(&self, year: i32, month: u32) -> MonthlyProfitability {
        reports::monthly_profitability(
            &self.studio.ledger.transactions,
            &self.studio.projects,
            year,
            month,
        )
    }

    pub fn ledger_csv(&self, window: ReportWindow) -> ResultEngine<String> {
        reports::ledger_csv(
            &self.studio.ledger.transactions,
            &self.studio.projects,
            &self.studio.ledger.pockets,
            window,
        )
    }

    pub fn profitability_csv(&self, year: i32, month: u32) -> ResultEngine<String> {
        reports::profitability_csv(&self.monthly_profitability(year, month))
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Load every table and construct `Engine`.
    pub async fn build(self) -> ResultEngine<Engine> {
        let transactions = transactions::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let pockets = pockets::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(FinancialPocket::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let clients = clients::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let projects = projects::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Project::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let team_members = team::members::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(TeamMember::from)
            .collect();
        let packages = packages::packages::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Package::from)
            .collect();
        let add_ons = packages::addons::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(AddOn::from)
            .collect();
        let team_project_payments = team::project_payments::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(TeamProjectPayment::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let team_payment_records = team::payment_records::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(TeamPaymentRecord::from)
            .collect();
        let reward_ledger_entries = team::reward_entries::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(RewardLedgerEntry::from)
            .collect();
        let leads = leads::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Lead::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let users = users::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let profile = match profile::Entity::find().one(&self.database).await? {
            Some(model) => Some(Profile::try_from(model)?),
            None => None,
        };

        Ok(Engine {
            studio: Studio {
                clients,
                projects,
                team_members,
                packages,
                add_ons,
                team_project_payments,
                team_payment_records,
                reward_ledger_entries,
                leads,
                users,
                profile,
                ledger: Ledger::new(transactions, pockets),
            },
            database: self.database,
        })
    }
}
