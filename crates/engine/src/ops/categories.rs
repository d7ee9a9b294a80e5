use sea_orm::{
    ActiveValue, DatabaseTransaction, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, NewCategoryCmd, ResultEngine, TransactionKind, UpdateCategoryCmd,
    budgets,
    categories::{self, TRANSFER_CATEGORY_NAME},
    recurring, transactions,
    util::{is_transfer_name, name_key, normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// List the user's categories, optionally only one kind.
    pub async fn categories(
        &self,
        user_id: Uuid,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query =
                categories::Entity::find().filter(categories::Column::UserId.eq(user_id.to_string()));
            if let Some(kind) = kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }
            let models = query
                .order_by_asc(categories::Column::Kind)
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Category::try_from).collect()
        })
    }

    /// Create a category.
    ///
    /// Names are unique per user and kind, compared case- and
    /// accent-insensitively. "Transfer", "Transfer in" and "Transfer out" create
    /// a transfer category.
    pub async fn new_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            Self::ensure_unique_category_name(&db_tx, cmd.user_id, cmd.kind, &name, None).await?;

            let mut category = Category::new(cmd.user_id, name, cmd.kind);
            category.icon = normalize_optional_text(cmd.icon.as_deref());
            category.color = normalize_optional_text(cmd.color.as_deref());
            category.is_essential = cmd.is_essential;
            category.is_transfer = is_transfer_name(&category.name);
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    /// Update display fields of a category.
    ///
    /// The transfer flag is fixed at creation and survives renames.
    pub async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        cmd: UpdateCategoryCmd,
    ) -> ResultEngine<Category> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "category"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            let kind = TransactionKind::try_from(model.kind.as_str())?;
            if let Some(name) = name.as_deref() {
                Self::ensure_unique_category_name(&db_tx, user_id, kind, name, Some(&model.id))
                    .await?;
            }

            let mut active = model.into_active_model();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(icon) = cmd.icon.as_deref() {
                active.icon = ActiveValue::Set(normalize_optional_text(Some(icon)));
            }
            if let Some(color) = cmd.color.as_deref() {
                active.color = ActiveValue::Set(normalize_optional_text(Some(color)));
            }
            if let Some(is_essential) = cmd.is_essential {
                active.is_essential = ActiveValue::Set(is_essential);
            }
            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Delete a category and its budgets.
    ///
    /// Default categories, the transfer category and categories still used by
    /// transactions or recurring rules are kept (`Conflict`).
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            if model.is_default {
                return Err(EngineError::Conflict(
                    "default categories cannot be deleted".to_string(),
                ));
            }
            if model.is_transfer {
                return Err(EngineError::Conflict(
                    "the transfer category cannot be deleted".to_string(),
                ));
            }

            let used_by_transactions = transactions::Entity::find()
                .filter(transactions::Column::CategoryId.eq(model.id.clone()))
                .count(&db_tx)
                .await?;
            let used_by_rules = recurring::Entity::find()
                .filter(recurring::Column::CategoryId.eq(model.id.clone()))
                .count(&db_tx)
                .await?;
            if used_by_transactions > 0 || used_by_rules > 0 {
                return Err(EngineError::Conflict(
                    "category is still in use".to_string(),
                ));
            }

            budgets::Entity::delete_many()
                .filter(budgets::Column::CategoryId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Return the user's transfer category, creating it on first use.
    ///
    /// The id is cached on the user row; a user-created category carrying
    /// the transfer flag is adopted before a new one is made.
    pub(super) async fn transfer_category(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        let user = self.require_user(db, user_id).await?;
        if let Some(cached) = user.transfer_category_id.clone()
            && let Some(model) = categories::Entity::find_by_id(cached).one(db).await?
            && model.user_id == user.id
        {
            return Ok(model);
        }

        let existing = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user.id.clone()))
            .filter(categories::Column::IsTransfer.eq(true))
            .order_by_asc(categories::Column::CreatedAt)
            .one(db)
            .await?;
        let model = match existing {
            Some(model) => model,
            None => {
                let mut category = Category::new(
                    user_id,
                    TRANSFER_CATEGORY_NAME.to_string(),
                    TransactionKind::Expense,
                );
                category.is_transfer = true;
                categories::ActiveModel::from(&category).insert(db).await?
            }
        };

        let mut active = user.into_active_model();
        active.transfer_category_id = ActiveValue::Set(Some(model.id.clone()));
        active.update(db).await?;
        Ok(model)
    }

    async fn ensure_unique_category_name(
        db: &DatabaseTransaction,
        user_id: Uuid,
        kind: TransactionKind,
        name: &str,
        except_id: Option<&str>,
    ) -> ResultEngine<()> {
        let key = name_key(name);
        let siblings = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .filter(categories::Column::Kind.eq(kind.as_str()))
            .all(db)
            .await?;
        let clash = siblings
            .iter()
            .filter(|model| Some(model.id.as_str()) != except_id)
            .any(|model| name_key(&model.name) == key);
        if clash {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
