use chrono::Utc;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, TransferCmd,
    fx::BASE_CURRENCY,
    util::{normalize_optional_text, parse_uuid, require_positive},
};

use super::{Engine, with_tx};

/// The two legs written by a transfer.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferPair {
    /// Expense on the source wallet.
    pub debit: Transaction,
    /// Income on the target wallet.
    pub credit: Transaction,
}

impl Engine {
    /// Move `amount_minor` from one wallet of the user to another.
    ///
    /// Writes an expense on the source and an income on the target, both in
    /// the transfer category, and applies both ledger deltas. Either all four
    /// writes commit or none does.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<TransferPair> {
        let amount_minor = require_positive(cmd.amount_minor, "amount")?;
        if cmd.from_wallet_id == cmd.to_wallet_id {
            return Err(EngineError::InvalidInput(
                "source and target wallet must differ".to_string(),
            ));
        }
        let note = normalize_optional_text(cmd.note.as_deref());

        with_tx!(self, |db_tx| {
            let source = self
                .require_wallet(&db_tx, cmd.user_id, cmd.from_wallet_id)
                .await?;
            let target = self
                .require_wallet(&db_tx, cmd.user_id, cmd.to_wallet_id)
                .await?;
            let category = self.transfer_category(&db_tx, cmd.user_id).await?;
            let category_id = parse_uuid(&category.id, "category")?;

            let leg = |wallet_id: Uuid, kind: TransactionKind, description: String| {
                let now = Utc::now();
                Transaction {
                    id: Uuid::new_v4(),
                    user_id: cmd.user_id,
                    category_id,
                    wallet_id,
                    kind,
                    amount_minor,
                    original_amount_minor: None,
                    currency: BASE_CURRENCY,
                    exchange_rate: 1.0,
                    description,
                    notes: note.clone(),
                    date: cmd.date,
                    proof_ref: None,
                    created_at: now,
                    updated_at: now,
                }
            };

            let debit = leg(
                cmd.from_wallet_id,
                TransactionKind::Expense,
                format!("Transfer to {}", target.name),
            );
            let credit = leg(
                cmd.to_wallet_id,
                TransactionKind::Income,
                format!("Transfer from {}", source.name),
            );
            self.record_transaction(&db_tx, &debit).await?;
            self.record_transaction(&db_tx, &credit).await?;

            Ok(TransferPair { debit, credit })
        })
    }
}
