use chrono::Utc;
use sea_orm::{ActiveValue, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Debt, DebtStatus, NewDebtCmd, ResultEngine, UpdateDebtCmd, debts,
    util::{normalize_optional_text, normalize_required_name, require_positive},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn new_debt(&self, cmd: NewDebtCmd) -> ResultEngine<Debt> {
        let person_name = normalize_required_name(&cmd.person_name, "person")?;
        let amount_minor = require_positive(cmd.amount_minor, "amount")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            let now = Utc::now();
            let debt = Debt {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                kind: cmd.kind,
                person_name,
                amount_minor,
                description: normalize_optional_text(cmd.description.as_deref()),
                due_date: cmd.due_date,
                status: DebtStatus::Unpaid,
                created_at: now,
                updated_at: now,
            };
            debts::ActiveModel::from(&debt).insert(&db_tx).await?;
            Ok(debt)
        })
    }

    /// List debts, optionally filtered by status, soonest due first.
    pub async fn debts(&self, user_id: Uuid, status: Option<DebtStatus>) -> ResultEngine<Vec<Debt>> {
        with_tx!(self, |db_tx| {
            let mut query =
                debts::Entity::find().filter(debts::Column::UserId.eq(user_id.to_string()));
            if let Some(status) = status {
                query = query.filter(debts::Column::Status.eq(status.as_str()));
            }
            let models = query
                .order_by_asc(debts::Column::DueDate)
                .order_by_asc(debts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Debt::try_from).collect()
        })
    }

    pub async fn debt(&self, user_id: Uuid, debt_id: Uuid) -> ResultEngine<Debt> {
        with_tx!(self, |db_tx| {
            let model = self.require_debt(&db_tx, user_id, debt_id).await?;
            Debt::try_from(model)
        })
    }

    pub async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        cmd: UpdateDebtCmd,
    ) -> ResultEngine<Debt> {
        let person_name = cmd
            .person_name
            .as_deref()
            .map(|name| normalize_required_name(name, "person"))
            .transpose()?;
        let amount_minor = cmd
            .amount_minor
            .map(|amount| require_positive(amount, "amount"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_debt(&db_tx, user_id, debt_id).await?;
            let mut active = model.into_active_model();
            if let Some(person_name) = person_name {
                active.person_name = ActiveValue::Set(person_name);
            }
            if let Some(amount_minor) = amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }
            if cmd.due_date.is_some() {
                active.due_date = ActiveValue::Set(cmd.due_date);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Debt::try_from(model)
        })
    }

    /// Mark a debt as settled.
    pub async fn mark_debt_paid(&self, user_id: Uuid, debt_id: Uuid) -> ResultEngine<Debt> {
        with_tx!(self, |db_tx| {
            let model = self.require_debt(&db_tx, user_id, debt_id).await?;
            let mut active = model.into_active_model();
            active.status = ActiveValue::Set(DebtStatus::Paid.as_str().to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Debt::try_from(model)
        })
    }

    pub async fn delete_debt(&self, user_id: Uuid, debt_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_debt(&db_tx, user_id, debt_id).await?;
            debts::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
