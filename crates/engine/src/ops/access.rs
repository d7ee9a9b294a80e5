use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, budgets, categories, debts, goals, recurring, transactions, users,
    wallets,
};

use super::Engine;

/// Generates a `require_*` lookup that loads a row by id and checks that it
/// belongs to the caller.
///
/// A missing row is `KeyNotFound`; a row owned by someone else is `Forbidden`.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $entity:path, $model:path, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            id: Uuid,
        ) -> ResultEngine<$model> {
            let model = <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(concat!($label, " not exists").to_string()))?;
            if model.user_id != user_id.to_string() {
                return Err(EngineError::Forbidden(
                    concat!($label, " belongs to another user").to_string(),
                ));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_owned_lookup!(require_wallet, wallets::Entity, wallets::Model, "wallet");

    impl_owned_lookup!(
        require_category,
        categories::Entity,
        categories::Model,
        "category"
    );

    impl_owned_lookup!(
        require_transaction,
        transactions::Entity,
        transactions::Model,
        "transaction"
    );

    impl_owned_lookup!(
        require_recurring,
        recurring::Entity,
        recurring::Model,
        "recurring transaction"
    );

    impl_owned_lookup!(require_budget, budgets::Entity, budgets::Model, "budget");

    impl_owned_lookup!(require_goal, goals::Entity, goals::Model, "goal");

    impl_owned_lookup!(require_debt, debts::Entity, debts::Model, "debt");

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
