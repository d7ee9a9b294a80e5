use chrono::Utc;
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    NewTransactionCmd, ResultEngine, Transaction, UpdateTransactionCmd,
    events::ActivityEvent,
    fx::BASE_CURRENCY,
    transactions,
    util::{normalize_optional_text, parse_uuid, require_positive},
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Record an income or expense and move the wallet balance accordingly.
    ///
    /// Row insert and ledger delta commit together. On success a
    /// `TransactionRecorded` event is published.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let amount_minor = require_positive(cmd.amount_minor, "amount")?;
        let tx = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            self.require_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;
            let wallet = self
                .resolve_wallet(&db_tx, cmd.user_id, cmd.wallet_id)
                .await?;

            let now = Utc::now();
            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                category_id: cmd.category_id,
                wallet_id: parse_uuid(&wallet.id, "wallet")?,
                kind: cmd.kind,
                amount_minor,
                original_amount_minor: cmd.conversion.map(|c| c.original_amount_minor),
                currency: cmd.conversion.map_or(BASE_CURRENCY, |c| c.currency),
                exchange_rate: cmd.conversion.map_or(1.0, |c| c.rate),
                description: cmd.description.trim().to_string(),
                notes: normalize_optional_text(cmd.notes.as_deref()),
                date: cmd.date,
                proof_ref: normalize_optional_text(cmd.proof_ref.as_deref()),
                created_at: now,
                updated_at: now,
            };
            self.record_transaction(&db_tx, &tx).await?;
            Ok(tx)
        })?;

        self.publish(ActivityEvent::TransactionRecorded {
            user_id: tx.user_id,
            date: tx.date,
        });
        Ok(tx)
    }

    /// Return a transaction owned by `user_id`.
    pub async fn transaction(&self, user_id: Uuid, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// Patch a transaction.
    ///
    /// The old contribution (old wallet, amount and kind) is reversed before
    /// the row is rewritten, then the new one is applied, so a wallet change
    /// moves both balances.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = cmd.amount_minor {
            require_positive(amount_minor, "amount")?;
        }
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, cmd.user_id, cmd.transaction_id)
                .await?;
            let old = Transaction::try_from(model)?;

            if let Some(category_id) = cmd.category_id {
                self.require_category(&db_tx, cmd.user_id, category_id)
                    .await?;
            }
            if let Some(wallet_id) = cmd.wallet_id {
                self.require_wallet(&db_tx, cmd.user_id, wallet_id).await?;
            }

            self.apply_delta(
                &db_tx,
                old.wallet_id,
                old.amount_minor,
                old.kind.direction().reverse(),
            )
            .await?;

            let mut updated = old.clone();
            updated.category_id = cmd.category_id.unwrap_or(old.category_id);
            updated.wallet_id = cmd.wallet_id.unwrap_or(old.wallet_id);
            updated.kind = cmd.kind.unwrap_or(old.kind);
            updated.date = cmd.date.unwrap_or(old.date);
            if let Some(amount_minor) = cmd.amount_minor {
                // A new amount is in base currency; the old conversion no
                // longer describes it.
                updated.amount_minor = amount_minor;
                updated.original_amount_minor = None;
                updated.currency = BASE_CURRENCY;
                updated.exchange_rate = 1.0;
            }
            if let Some(description) = cmd.description.as_deref() {
                updated.description = description.trim().to_string();
            }
            if let Some(notes) = cmd.notes.as_deref() {
                updated.notes = normalize_optional_text(Some(notes));
            }
            if let Some(proof_ref) = cmd.proof_ref.as_deref() {
                updated.proof_ref = normalize_optional_text(Some(proof_ref));
            }
            updated.updated_at = Utc::now();
            transactions::ActiveModel::from(&updated)
                .update(&db_tx)
                .await?;

            self.apply_delta(
                &db_tx,
                updated.wallet_id,
                updated.amount_minor,
                updated.kind.direction(),
            )
            .await?;
            Ok(updated)
        })
    }

    /// Reverse a transaction's contribution and remove it.
    pub async fn delete_transaction(&self, user_id: Uuid, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let old = Transaction::try_from(model)?;
            self.apply_delta(
                &db_tx,
                old.wallet_id,
                old.amount_minor,
                old.kind.direction().reverse(),
            )
            .await?;
            transactions::Entity::delete_by_id(old.id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Insert `tx` and apply its ledger delta.
    pub(crate) async fn record_transaction(
        &self,
        db: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        transactions::ActiveModel::from(tx).insert(db).await?;
        self.apply_delta(db, tx.wallet_id, tx.amount_minor, tx.kind.direction())
            .await
    }

    fn publish(&self, event: ActivityEvent) {
        let Some(sender) = &self.events else {
            return;
        };
        if let Err(err) = sender.send(event) {
            tracing::warn!("activity event dropped: {err}");
        }
    }
}
