mod common;

use common::*;
use engine::{DateRange, EngineError, NewTransactionCmd, TransactionKind, TransferCmd};
use uuid::Uuid;

fn transfer(user_id: Uuid, from: Uuid, to: Uuid, amount_minor: i64) -> TransferCmd {
    TransferCmd {
        user_id,
        from_wallet_id: from,
        to_wallet_id: to,
        amount_minor,
        date: date(2026, 3, 10),
        note: Some("rainy day".to_string()),
    }
}

#[tokio::test]
async fn transfer_writes_symmetric_legs() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let main = default_wallet(&engine, alice.id).await;
    let savings = add_wallet(&engine, alice.id, "Savings").await;

    let pair = engine
        .transfer(transfer(alice.id, main.id, savings.id, 40_000))
        .await
        .unwrap();
    assert_eq!(pair.debit.kind, TransactionKind::Expense);
    assert_eq!(pair.debit.wallet_id, main.id);
    assert_eq!(pair.credit.kind, TransactionKind::Income);
    assert_eq!(pair.credit.wallet_id, savings.id);
    assert_eq!(pair.debit.amount_minor, pair.credit.amount_minor);
    assert_eq!(pair.debit.date, pair.credit.date);
    assert_eq!(pair.debit.category_id, pair.credit.category_id);
    assert_eq!(pair.debit.notes.as_deref(), Some("rainy day"));

    assert_eq!(balance(&engine, alice.id, main.id).await, -40_000);
    assert_eq!(balance(&engine, alice.id, savings.id).await, 40_000);
    assert_eq!(engine.total_balance(alice.id).await.unwrap(), 0);
    assert_eq!(transaction_count(&engine, alice.id).await, 2);
}

#[tokio::test]
async fn transfer_category_is_created_once_and_flagged() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let main = default_wallet(&engine, alice.id).await;
    let savings = add_wallet(&engine, alice.id, "Savings").await;

    let first = engine
        .transfer(transfer(alice.id, main.id, savings.id, 1_000))
        .await
        .unwrap();
    let second = engine
        .transfer(transfer(alice.id, savings.id, main.id, 500))
        .await
        .unwrap();
    assert_eq!(first.debit.category_id, second.credit.category_id);

    let transfer_categories: Vec<_> = engine
        .categories(alice.id, None)
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.is_transfer)
        .collect();
    assert_eq!(transfer_categories.len(), 1);
    assert_eq!(transfer_categories[0].id, first.debit.category_id);

    assert!(matches!(
        engine
            .delete_category(alice.id, transfer_categories[0].id)
            .await,
        Err(EngineError::Conflict(_))
    ));
}

#[tokio::test]
async fn transfers_are_left_out_of_aggregates() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let main = default_wallet(&engine, alice.id).await;
    let savings = add_wallet(&engine, alice.id, "Savings").await;
    let food = category_id(&engine, alice.id, TransactionKind::Expense, "Food").await;

    engine
        .create_transaction(NewTransactionCmd::new(
            alice.id,
            food,
            TransactionKind::Expense,
            15_000,
            date(2026, 3, 10),
        ))
        .await
        .unwrap();
    engine
        .transfer(transfer(alice.id, main.id, savings.id, 40_000))
        .await
        .unwrap();

    let march = DateRange::month(2026, 3).unwrap();
    let summary = engine.summary(alice.id, march).await.unwrap();
    assert_eq!(summary.income_minor, 0);
    assert_eq!(summary.expense_minor, 15_000);
    assert_eq!(summary.transaction_count, 1);

    let spending = engine.category_spending(alice.id, march).await.unwrap();
    assert_eq!(spending.len(), 1);
    assert_eq!(spending[0].category_id, food);
    assert_eq!(spending[0].percentage, 100.0);

    let trend = engine.daily_trend(alice.id, march).await.unwrap();
    let tenth = trend.iter().find(|d| d.date == date(2026, 3, 10)).unwrap();
    assert_eq!(tenth.income_minor, 0);
    assert_eq!(tenth.expense_minor, 15_000);
}

#[tokio::test]
async fn user_named_transfer_category_counts_as_transfer() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let transfer_out = engine
        .new_category(engine::NewCategoryCmd::new(
            alice.id,
            "Transfer Out",
            TransactionKind::Expense,
        ))
        .await
        .unwrap();
    assert!(transfer_out.is_transfer);

    engine
        .create_transaction(NewTransactionCmd::new(
            alice.id,
            transfer_out.id,
            TransactionKind::Expense,
            9_000,
            date(2026, 3, 10),
        ))
        .await
        .unwrap();
    let summary = engine
        .summary(alice.id, DateRange::month(2026, 3).unwrap())
        .await
        .unwrap();
    assert_eq!(summary.expense_minor, 0);
}

#[tokio::test]
async fn invalid_transfers_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let bob = signup(&engine, "bob").await;
    let main = default_wallet(&engine, alice.id).await;
    let bob_wallet = default_wallet(&engine, bob.id).await;

    assert!(matches!(
        engine.transfer(transfer(alice.id, main.id, main.id, 1_000)).await,
        Err(EngineError::InvalidInput(_))
    ));
    assert!(matches!(
        engine
            .transfer(transfer(alice.id, main.id, bob_wallet.id, 1_000))
            .await,
        Err(EngineError::Forbidden(_))
    ));
    let savings = add_wallet(&engine, alice.id, "Savings").await;
    assert!(matches!(
        engine.transfer(transfer(alice.id, main.id, savings.id, 0)).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .transfer(transfer(alice.id, main.id, Uuid::new_v4(), 1_000))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));

    assert_eq!(balance(&engine, alice.id, main.id).await, 0);
    assert_eq!(balance(&engine, bob.id, bob_wallet.id).await, 0);
    assert_eq!(transaction_count(&engine, alice.id).await, 0);
}

#[tokio::test]
async fn failed_credit_rolls_back_the_debit() {
    let (engine, db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let main = default_wallet(&engine, alice.id).await;
    let savings = add_wallet(&engine, alice.id, "Savings").await;

    install_trigger(
        &db,
        &format!(
            "CREATE TRIGGER credit_offline BEFORE UPDATE OF balance ON wallets \
             WHEN NEW.id = '{}' BEGIN SELECT RAISE(ABORT, 'ledger offline'); END;",
            savings.id
        ),
    )
    .await;

    let err = engine
        .transfer(transfer(alice.id, main.id, savings.id, 40_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DependencyFailure(_)));
    drop_trigger(&db, "credit_offline").await;

    assert_eq!(balance(&engine, alice.id, main.id).await, 0);
    assert_eq!(balance(&engine, alice.id, savings.id).await, 0);
    assert_eq!(transaction_count(&engine, alice.id).await, 0);
}
