use chrono::Utc;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, User, Wallet, categories, categories::DEFAULT_CATEGORIES,
    users, util::normalize_required_name, wallets,
};

use super::{Engine, with_tx};

/// Name of the wallet provisioned at signup.
pub(super) const DEFAULT_WALLET_NAME: &str = "Main Wallet";

impl Engine {
    /// Register a user with a default wallet and the default categories.
    ///
    /// An empty `display_name` falls back to the username.
    pub async fn new_user(&self, username: &str, display_name: &str) -> ResultEngine<User> {
        let username = normalize_required_name(username, "user")?;
        let display_name = match display_name.trim() {
            "" => username.clone(),
            other => other.to_string(),
        };

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let user = User {
                id: Uuid::new_v4(),
                username: username.clone(),
                display_name,
                created_at: Utc::now(),
            };
            users::ActiveModel::from(&user).insert(&db_tx).await?;

            let wallet = Wallet::new(user.id, DEFAULT_WALLET_NAME.to_string(), true);
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;

            for (name, kind, is_essential) in DEFAULT_CATEGORIES {
                let mut category = Category::new(user.id, name.to_string(), kind);
                category.is_essential = is_essential;
                category.is_default = true;
                categories::ActiveModel::from(&category)
                    .insert(&db_tx)
                    .await?;
            }

            tracing::info!(user_id = %user.id, username = %user.username, "user provisioned");
            Ok(user)
        })
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            User::try_from(model)
        })
    }
}
