use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    NewRecurringCmd, RecurringRule, ResultEngine, Transaction,
    fx::BASE_CURRENCY,
    recurring::{self, AUTO_SUFFIX, RecurrencePolicy},
    util::{parse_uuid, require_positive},
};

use super::{Engine, with_tx};

/// Upper bound of occurrences replayed for one rule in one catch-up call.
pub const MAX_OCCURRENCES_PER_CALL: usize = 400;

/// Outcome of a catch-up run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatchUpReport {
    /// Occurrences turned into transactions.
    pub materialized: usize,
    /// Rules whose materialization failed; their `next_run_date` is unchanged.
    pub failed: Vec<Uuid>,
}

impl Engine {
    /// Define a recurring rule, then run catch-up so a past start date fires
    /// right away.
    pub async fn new_recurring(
        &self,
        cmd: NewRecurringCmd,
        today: NaiveDate,
    ) -> ResultEngine<RecurringRule> {
        let amount_minor = require_positive(cmd.amount_minor, "amount")?;
        let rule = with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, cmd.user_id, cmd.wallet_id)
                .await?;
            self.require_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;

            let rule = RecurringRule {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                wallet_id: cmd.wallet_id,
                category_id: cmd.category_id,
                kind: cmd.kind,
                amount_minor,
                description: cmd.description.trim().to_string(),
                frequency: cmd.frequency,
                start_date: cmd.start_date,
                next_run_date: cmd.start_date,
                last_run_date: None,
                is_active: true,
                created_at: Utc::now(),
            };
            recurring::ActiveModel::from(&rule).insert(&db_tx).await?;
            Ok(rule)
        })?;

        // The rule is committed; a failed catch-up is retried on the next read.
        match self.catch_up(cmd.user_id, today).await {
            Ok(report) => {
                tracing::debug!(rule_id = %rule.id, materialized = report.materialized, "recurring rule created");
            }
            Err(err) => {
                tracing::warn!(rule_id = %rule.id, "catch-up after rule creation failed: {err}");
                return Ok(rule);
            }
        }

        match self.recurring_rule(cmd.user_id, rule.id).await {
            Ok(rule) => Ok(rule),
            Err(err) => {
                tracing::warn!(rule_id = %rule.id, "reloading created rule failed: {err}");
                Ok(rule)
            }
        }
    }

    /// List the user's rules after catching up on due occurrences.
    pub async fn recurring_rules(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<Vec<RecurringRule>> {
        self.catch_up(user_id, today).await?;
        with_tx!(self, |db_tx| {
            let models = recurring::Entity::find()
                .filter(recurring::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(recurring::Column::NextRunDate)
                .order_by_asc(recurring::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(RecurringRule::try_from).collect()
        })
    }

    pub async fn recurring_rule(&self, user_id: Uuid, rule_id: Uuid) -> ResultEngine<RecurringRule> {
        with_tx!(self, |db_tx| {
            let model = self.require_recurring(&db_tx, user_id, rule_id).await?;
            RecurringRule::try_from(model)
        })
    }

    /// Pause or resume a rule. Paused rules are skipped by catch-up.
    pub async fn set_recurring_active(
        &self,
        user_id: Uuid,
        rule_id: Uuid,
        is_active: bool,
    ) -> ResultEngine<RecurringRule> {
        with_tx!(self, |db_tx| {
            let model = self.require_recurring(&db_tx, user_id, rule_id).await?;
            let mut active = model.into_active_model();
            active.is_active = ActiveValue::Set(is_active);
            let model = active.update(&db_tx).await?;
            RecurringRule::try_from(model)
        })
    }

    /// Delete a rule. Transactions it already produced are kept.
    pub async fn delete_recurring(&self, user_id: Uuid, rule_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_recurring(&db_tx, user_id, rule_id).await?;
            recurring::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Materialize the user's due occurrences.
    ///
    /// Each occurrence is its own DB transaction. A failing rule is logged and
    /// skipped without touching its pointer; the remaining rules still run.
    pub async fn catch_up(&self, user_id: Uuid, today: NaiveDate) -> ResultEngine<CatchUpReport> {
        let due = with_tx!(self, |db_tx| {
            let models = recurring::Entity::find()
                .filter(recurring::Column::UserId.eq(user_id.to_string()))
                .filter(recurring::Column::IsActive.eq(true))
                .filter(recurring::Column::NextRunDate.lte(today))
                .order_by_asc(recurring::Column::NextRunDate)
                .all(&db_tx)
                .await?;
            Ok(models)
        })?;

        let per_rule = match self.recurrence {
            RecurrencePolicy::SingleStep => 1,
            RecurrencePolicy::CatchUp => MAX_OCCURRENCES_PER_CALL,
        };

        let mut report = CatchUpReport::default();
        for model in due {
            let rule_id = parse_uuid(&model.id, "recurring")?;
            for _ in 0..per_rule {
                match self.materialize_next(rule_id, today).await {
                    Ok(true) => report.materialized += 1,
                    Ok(false) => break,
                    Err(err) => {
                        tracing::warn!(%rule_id, "recurring occurrence failed: {err}");
                        report.failed.push(rule_id);
                        break;
                    }
                }
            }
        }

        if report.materialized > 0 || !report.failed.is_empty() {
            tracing::debug!(
                %user_id,
                materialized = report.materialized,
                failed = report.failed.len(),
                "recurring catch-up"
            );
        }
        Ok(report)
    }

    /// Turn the rule's next occurrence into a transaction dated `today`.
    ///
    /// Returns `false` when the rule is no longer due. The pointer is advanced
    /// with a compare-and-set on its previous value, so a concurrent catch-up
    /// cannot materialize the same occurrence twice.
    async fn materialize_next(&self, rule_id: Uuid, today: NaiveDate) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let Some(model) = recurring::Entity::find_by_id(rule_id.to_string())
                .one(&db_tx)
                .await?
            else {
                return Ok(false);
            };
            let rule = RecurringRule::try_from(model)?;
            if !rule.is_due(today) {
                return Ok(false);
            }

            let next_run_date = rule
                .frequency
                .advance(rule.next_run_date, rule.start_date.day())?;
            let advanced = recurring::Entity::update_many()
                .col_expr(recurring::Column::NextRunDate, Expr::value(next_run_date))
                .col_expr(recurring::Column::LastRunDate, Expr::value(today))
                .filter(recurring::Column::Id.eq(rule.id.to_string()))
                .filter(recurring::Column::NextRunDate.eq(rule.next_run_date))
                .exec(&db_tx)
                .await?;
            if advanced.rows_affected != 1 {
                return Ok(false);
            }

            let now = Utc::now();
            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: rule.user_id,
                category_id: rule.category_id,
                wallet_id: rule.wallet_id,
                kind: rule.kind,
                amount_minor: rule.amount_minor,
                original_amount_minor: None,
                currency: BASE_CURRENCY,
                exchange_rate: 1.0,
                description: format!("{}{AUTO_SUFFIX}", rule.description),
                notes: None,
                date: today,
                proof_ref: None,
                created_at: now,
                updated_at: now,
            };
            self.record_transaction(&db_tx, &tx).await?;
            Ok(true)
        })
    }
}
