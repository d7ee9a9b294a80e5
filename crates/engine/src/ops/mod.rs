use sea_orm::DatabaseConnection;

use crate::{ResultEngine, events::ActivitySender, recurring::RecurrencePolicy};

mod access;
mod aggregates;
mod budgets;
mod categories;
mod debts;
mod goals;
mod ledger;
mod recurring;
mod reports;
mod transactions;
mod transfer;
mod users;
mod wallets;

pub use aggregates::{CategorySpending, DayTotals, Summary};
pub use recurring::{CatchUpReport, MAX_OCCURRENCES_PER_CALL};
pub use reports::{CategoryChange, DashboardSummary, MonthlyReport};
pub use transactions::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SearchPage, TransactionSearch};
pub use transfer::TransferPair;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    events: Option<ActivitySender>,
    recurrence: RecurrencePolicy,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn recurrence_policy(&self) -> RecurrencePolicy {
        self.recurrence
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    events: Option<ActivitySender>,
    recurrence: RecurrencePolicy,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Publish activity events on `sender` after transactions are recorded.
    pub fn events(mut self, sender: ActivitySender) -> EngineBuilder {
        self.events = Some(sender);
        self
    }

    /// How recurring backlogs are replayed.
    pub fn recurrence(mut self, policy: RecurrencePolicy) -> EngineBuilder {
        self.recurrence = policy;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            events: self.events,
            recurrence: self.recurrence,
        })
    }
}
