//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Optional fields on the `Update*`
//! commands are patches: `None` keeps the stored value.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{DebtKind, Frequency, Period, TransactionKind, fx::Conversion};

/// Record an income or an expense.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: Uuid,
    pub category_id: Uuid,
    /// Defaults to the user's default wallet, then to any wallet they own.
    pub wallet_id: Option<Uuid>,
    pub kind: TransactionKind,
    /// Positive amount in base minor units.
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
    pub proof_ref: Option<String>,
    /// Present when the amount was converted from a foreign currency.
    pub conversion: Option<Conversion>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        category_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            category_id,
            wallet_id: None,
            kind,
            amount_minor,
            date,
            description: String::new(),
            notes: None,
            proof_ref: None,
            conversion: None,
        }
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn proof_ref(mut self, proof_ref: impl Into<String>) -> Self {
        self.proof_ref = Some(proof_ref.into());
        self
    }

    /// Use the converted base amount and keep the original as metadata.
    #[must_use]
    pub fn converted(mut self, conversion: Conversion) -> Self {
        self.amount_minor = conversion.amount_minor;
        self.conversion = Some(conversion);
        self
    }
}

/// Patch an existing transaction.
#[derive(Clone, Debug, Default)]
pub struct UpdateTransactionCmd {
    pub user_id: Uuid,
    pub transaction_id: Uuid,
    pub category_id: Option<Uuid>,
    pub wallet_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    /// `Some("")` clears the notes.
    pub notes: Option<String>,
    pub proof_ref: Option<String>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: Uuid, transaction_id: Uuid) -> Self {
        Self {
            user_id,
            transaction_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Move money between two wallets of the same user.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub user_id: Uuid,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// Define a recurring rule.
#[derive(Clone, Debug)]
pub struct NewRecurringCmd {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: String,
    pub frequency: Frequency,
    /// First occurrence; may lie in the past.
    pub start_date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct NewWalletCmd {
    pub user_id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
}

impl NewWalletCmd {
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            icon: None,
            color: None,
            is_default: false,
        }
    }

    #[must_use]
    pub fn default_wallet(mut self) -> Self {
        self.is_default = true;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateWalletCmd {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Only `Some(true)` has an effect: the default moves, it is never unset.
    pub is_default: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub user_id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_essential: bool,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            user_id,
            name: name.into(),
            kind,
            icon: None,
            color: None,
            is_essential: false,
        }
    }

    #[must_use]
    pub fn essential(mut self) -> Self {
        self.is_essential = true;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateCategoryCmd {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_essential: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct NewBudgetCmd {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub period: Period,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateBudgetCmd {
    pub amount_minor: Option<i64>,
    pub period: Option<Period>,
}

#[derive(Clone, Debug)]
pub struct NewGoalCmd {
    pub user_id: Uuid,
    pub name: String,
    pub target_amount_minor: i64,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateGoalCmd {
    pub name: Option<String>,
    pub target_amount_minor: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Put money aside towards a goal.
#[derive(Clone, Debug)]
pub struct GoalFundsCmd {
    pub user_id: Uuid,
    pub goal_id: Uuid,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct NewDebtCmd {
    pub user_id: Uuid,
    pub kind: DebtKind,
    pub person_name: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateDebtCmd {
    pub person_name: Option<String>,
    pub amount_minor: Option<i64>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}
