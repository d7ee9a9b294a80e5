use chrono::Utc;
use sea_orm::{
    ActiveValue, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, Goal, GoalContribution, GoalFundsCmd, GoalStatus, NewGoalCmd, ResultEngine,
    UpdateGoalCmd, goal_contributions, goals,
    util::{normalize_optional_text, normalize_required_name, require_positive},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn new_goal(&self, cmd: NewGoalCmd) -> ResultEngine<Goal> {
        let name = normalize_required_name(&cmd.name, "goal")?;
        let target_amount_minor = require_positive(cmd.target_amount_minor, "target amount")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            let goal = Goal {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                name,
                target_amount_minor,
                current_amount_minor: 0,
                deadline: cmd.deadline,
                icon: normalize_optional_text(cmd.icon.as_deref()),
                color: normalize_optional_text(cmd.color.as_deref()),
                status: GoalStatus::Active,
                created_at: Utc::now(),
            };
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, user_id, goal_id).await?;
            Goal::try_from(model)
        })
    }

    pub async fn goals(&self, user_id: Uuid) -> ResultEngine<Vec<Goal>> {
        with_tx!(self, |db_tx| {
            let models = goals::Entity::find()
                .filter(goals::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(goals::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Goal::try_from).collect()
        })
    }

    /// Patch a goal. Changing the target re-evaluates the status.
    pub async fn update_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        cmd: UpdateGoalCmd,
    ) -> ResultEngine<Goal> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "goal"))
            .transpose()?;
        let target = cmd
            .target_amount_minor
            .map(|amount| require_positive(amount, "target amount"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, user_id, goal_id).await?;
            let current_amount_minor = model.current_amount_minor;

            let mut active = model.into_active_model();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(target) = target {
                active.target_amount_minor = ActiveValue::Set(target);
                active.status = ActiveValue::Set(
                    GoalStatus::for_amounts(current_amount_minor, target)
                        .as_str()
                        .to_string(),
                );
            }
            if cmd.deadline.is_some() {
                active.deadline = ActiveValue::Set(cmd.deadline);
            }
            if let Some(icon) = cmd.icon.as_deref() {
                active.icon = ActiveValue::Set(normalize_optional_text(Some(icon)));
            }
            if let Some(color) = cmd.color.as_deref() {
                active.color = ActiveValue::Set(normalize_optional_text(Some(color)));
            }
            let model = active.update(&db_tx).await?;
            Goal::try_from(model)
        })
    }

    /// Delete a goal and its contributions.
    pub async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, user_id, goal_id).await?;
            goal_contributions::Entity::delete_many()
                .filter(goal_contributions::Column::GoalId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            goals::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Record a contribution and raise the goal's current amount.
    ///
    /// The goal flips to `completed` once the target is reached.
    pub async fn add_goal_funds(&self, cmd: GoalFundsCmd) -> ResultEngine<Goal> {
        let amount_minor = require_positive(cmd.amount_minor, "amount")?;
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, cmd.user_id, cmd.goal_id).await?;

            let contribution = GoalContribution {
                id: Uuid::new_v4(),
                goal_id: cmd.goal_id,
                user_id: cmd.user_id,
                amount_minor,
                note: normalize_optional_text(cmd.note.as_deref()),
                date: cmd.date,
                created_at: Utc::now(),
            };
            goal_contributions::ActiveModel::from(&contribution)
                .insert(&db_tx)
                .await?;

            let updated = goals::Entity::update_many()
                .col_expr(
                    goals::Column::CurrentAmountMinor,
                    Expr::col(goals::Column::CurrentAmountMinor).add(amount_minor),
                )
                .filter(goals::Column::Id.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            if updated.rows_affected != 1 {
                return Err(EngineError::DependencyFailure(format!(
                    "goal {} was not updated",
                    cmd.goal_id
                )));
            }

            let model = self.require_goal(&db_tx, cmd.user_id, cmd.goal_id).await?;
            let status = GoalStatus::for_amounts(model.current_amount_minor, model.target_amount_minor);
            let model = if status.as_str() != model.status {
                let mut active = model.into_active_model();
                active.status = ActiveValue::Set(status.as_str().to_string());
                active.update(&db_tx).await?
            } else {
                model
            };
            Goal::try_from(model)
        })
    }

    /// Contributions of a goal, newest first.
    pub async fn goal_contributions(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
    ) -> ResultEngine<Vec<GoalContribution>> {
        with_tx!(self, |db_tx| {
            let goal = self.require_goal(&db_tx, user_id, goal_id).await?;
            let models = goal_contributions::Entity::find()
                .filter(goal_contributions::Column::GoalId.eq(goal.id))
                .order_by_desc(goal_contributions::Column::Date)
                .order_by_desc(goal_contributions::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(GoalContribution::try_from).collect()
        })
    }
}
