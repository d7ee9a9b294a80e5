use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{Direction, EngineError, ResultEngine, wallets};

use super::{Engine, with_tx};

impl Engine {
    /// Move a wallet balance by `magnitude` in `direction`.
    ///
    /// The change is a single `UPDATE ... SET balance = balance + delta`, so
    /// concurrent deltas on the same wallet never overwrite each other. Any
    /// storage error, or an update that does not hit exactly one row, is a
    /// `DependencyFailure` and must abort the caller's transaction.
    pub(super) async fn apply_delta(
        &self,
        db: &DatabaseTransaction,
        wallet_id: Uuid,
        magnitude: i64,
        direction: Direction,
    ) -> ResultEngine<()> {
        if magnitude <= 0 {
            return Err(EngineError::InvalidAmount(
                "ledger delta must be > 0".to_string(),
            ));
        }
        let delta = direction.signed(magnitude);

        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(delta),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .exec(db)
            .await
            .map_err(|err| {
                EngineError::DependencyFailure(format!(
                    "ledger delta on wallet {wallet_id} failed: {err}"
                ))
            })?;

        if result.rows_affected != 1 {
            return Err(EngineError::DependencyFailure(format!(
                "ledger delta on wallet {wallet_id} matched {} rows",
                result.rows_affected
            )));
        }
        Ok(())
    }

    /// Sum of every wallet balance of the user (net worth).
    pub async fn total_balance(&self, user_id: Uuid) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| self.total_balance_in(&db_tx, user_id).await)
    }

    pub(super) async fn total_balance_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<i64> {
        let total: Option<Option<i64>> = wallets::Entity::find()
            .select_only()
            .column_as(Expr::col(wallets::Column::Balance).sum(), "total")
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .into_tuple()
            .one(db)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }
}
