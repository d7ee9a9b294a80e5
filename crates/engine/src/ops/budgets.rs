use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetProgress, DateRange, EngineError, NewBudgetCmd, Period, ResultEngine,
    UpdateBudgetCmd, budgets, categories, stats::percent_of, util::parse_uuid,
};

use super::{Engine, with_tx};

fn require_limit(amount_minor: i64) -> ResultEngine<i64> {
    if amount_minor < 0 {
        return Err(EngineError::InvalidAmount(
            "budget amount must be >= 0".to_string(),
        ));
    }
    Ok(amount_minor)
}

fn require_budget_period(period: Period) -> ResultEngine<Period> {
    match period {
        Period::Daily => Err(EngineError::InvalidInput(
            "budget period must be weekly, monthly or yearly".to_string(),
        )),
        Period::Weekly | Period::Monthly | Period::Yearly => Ok(period),
    }
}

impl Engine {
    /// Create a budget; one per category and period.
    pub async fn new_budget(&self, cmd: NewBudgetCmd) -> ResultEngine<Budget> {
        let amount_minor = require_limit(cmd.amount_minor)?;
        require_budget_period(cmd.period)?;
        with_tx!(self, |db_tx| {
            let category = self
                .require_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;
            if category.is_transfer {
                return Err(EngineError::InvalidInput(
                    "transfers cannot be budgeted".to_string(),
                ));
            }
            Self::ensure_unique_budget(&db_tx, cmd.user_id, cmd.category_id, cmd.period, None)
                .await?;

            let budget = Budget {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                category_id: cmd.category_id,
                amount_minor,
                period: cmd.period,
                created_at: Utc::now(),
            };
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            Ok(budget)
        })
    }

    pub async fn budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            Budget::try_from(model)
        })
    }

    pub async fn budgets(&self, user_id: Uuid) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            let models = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(budgets::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Budget::try_from).collect()
        })
    }

    pub async fn update_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        cmd: UpdateBudgetCmd,
    ) -> ResultEngine<Budget> {
        let amount_minor = cmd.amount_minor.map(require_limit).transpose()?;
        let period = cmd.period.map(require_budget_period).transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            if let Some(period) = period {
                let category_id = parse_uuid(&model.category_id, "category")?;
                Self::ensure_unique_budget(&db_tx, user_id, category_id, period, Some(&model.id))
                    .await?;
            }

            let mut active = model.into_active_model();
            if let Some(amount_minor) = amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(period) = period {
                active.period = ActiveValue::Set(period.as_str().to_string());
            }
            let model = active.update(&db_tx).await?;
            Budget::try_from(model)
        })
    }

    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            budgets::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Every budget of the user with its spending over `range`.
    pub async fn budgets_with_spending(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<Vec<BudgetProgress>> {
        with_tx!(self, |db_tx| {
            self.budget_progress_in(&db_tx, user_id, range).await
        })
    }

    pub(super) async fn budget_progress_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<Vec<BudgetProgress>> {
        let rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .find_also_related(categories::Entity)
            .order_by_asc(budgets::Column::CreatedAt)
            .all(db)
            .await?;
        let spent = self.expense_by_category_in(db, user_id, range).await?;

        rows.into_iter()
            .map(|(model, category)| {
                let spent_minor = spent.get(&model.category_id).copied().unwrap_or(0);
                let budget = Budget::try_from(model)?;
                Ok(BudgetProgress {
                    category_name: category.map(|c| c.name).unwrap_or_default(),
                    spent_minor,
                    remaining_minor: budget.amount_minor - spent_minor,
                    percentage: percent_of(spent_minor, budget.amount_minor),
                    budget,
                })
            })
            .collect()
    }

    async fn ensure_unique_budget(
        db: &DatabaseTransaction,
        user_id: Uuid,
        category_id: Uuid,
        period: Period,
        except_id: Option<&str>,
    ) -> ResultEngine<()> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .filter(budgets::Column::CategoryId.eq(category_id.to_string()))
            .filter(budgets::Column::Period.eq(period.as_str()));
        if let Some(except_id) = except_id {
            query = query.filter(budgets::Column::Id.ne(except_id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(format!(
                "{} budget for category {category_id}",
                period.as_str()
            )));
        }
        Ok(())
    }
}
