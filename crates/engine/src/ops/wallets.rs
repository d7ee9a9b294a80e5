use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, NewWalletCmd, ResultEngine, UpdateWalletCmd, Wallet, recurring, transactions,
    util::{normalize_optional_text, normalize_required_name},
    wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// List the user's wallets, default first.
    pub async fn wallets(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let models = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(wallets::Column::IsDefault)
                .order_by_asc(wallets::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Wallet::try_from).collect()
        })
    }

    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            Wallet::try_from(model)
        })
    }

    /// Add a new wallet with a zero balance.
    ///
    /// The first wallet of a user is always the default one.
    pub async fn new_wallet(&self, cmd: NewWalletCmd) -> ResultEngine<Wallet> {
        let name = normalize_required_name(&cmd.name, "wallet")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            let owned = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(cmd.user_id.to_string()))
                .count(&db_tx)
                .await?;

            let is_default = cmd.is_default || owned == 0;
            if is_default {
                Self::clear_default_wallet(&db_tx, cmd.user_id).await?;
            }

            let mut wallet = Wallet::new(cmd.user_id, name, is_default);
            wallet.icon = normalize_optional_text(cmd.icon.as_deref());
            wallet.color = normalize_optional_text(cmd.color.as_deref());
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Rename, restyle, or make a wallet the default one.
    ///
    /// The balance is never writable here; it only moves through transactions.
    pub async fn update_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
        cmd: UpdateWalletCmd,
    ) -> ResultEngine<Wallet> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "wallet"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            let becomes_default = cmd.is_default == Some(true) && !model.is_default;
            if becomes_default {
                Self::clear_default_wallet(&db_tx, user_id).await?;
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
            if becomes_default {
                active.is_default = ActiveValue::Set(true);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Wallet::try_from(model)
        })
    }

    /// Delete a wallet together with its transactions and recurring rules.
    ///
    /// The last wallet of a user cannot be deleted. When the default wallet
    /// goes, the oldest remaining wallet becomes the default.
    pub async fn delete_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            let owned = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .count(&db_tx)
                .await?;
            if owned < 2 {
                return Err(EngineError::Conflict(
                    "cannot delete the last wallet".to_string(),
                ));
            }

            transactions::Entity::delete_many()
                .filter(transactions::Column::WalletId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            recurring::Entity::delete_many()
                .filter(recurring::Column::WalletId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            wallets::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;

            if model.is_default {
                let successor = wallets::Entity::find()
                    .filter(wallets::Column::UserId.eq(user_id.to_string()))
                    .order_by_asc(wallets::Column::CreatedAt)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
                let mut active = successor.into_active_model();
                active.is_default = ActiveValue::Set(true);
                active.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Pick the wallet a transaction lands on: the requested one (owner
    /// checked), else the default wallet, else any wallet of the user.
    pub(super) async fn resolve_wallet(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        wallet_id: Option<Uuid>,
    ) -> ResultEngine<wallets::Model> {
        if let Some(wallet_id) = wallet_id
            && !wallet_id.is_nil()
        {
            return self.require_wallet(db, user_id, wallet_id).await;
        }

        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(wallets::Column::IsDefault)
            .order_by_asc(wallets::Column::CreatedAt)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }

    async fn clear_default_wallet(db: &DatabaseTransaction, user_id: Uuid) -> ResultEngine<()> {
        wallets::Entity::update_many()
            .col_expr(wallets::Column::IsDefault, Expr::value(false))
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .filter(wallets::Column::IsDefault.eq(true))
            .exec(db)
            .await?;
        Ok(())
    }
}
