mod common;

use chrono::NaiveDate;
use common::*;
use engine::{
    AUTO_SUFFIX, Engine, EngineError, Frequency, NewRecurringCmd, RecurrencePolicy, RecurringRule,
    TransactionKind, TransactionSearch, User,
};
use sea_orm::ConnectionTrait;

async fn monthly_bill(
    engine: &Engine,
    user: &User,
    amount_minor: i64,
    start_date: NaiveDate,
    today: NaiveDate,
) -> RecurringRule {
    let wallet = default_wallet(engine, user.id).await;
    let bills = category_id(engine, user.id, TransactionKind::Expense, "Bills").await;
    engine
        .new_recurring(
            NewRecurringCmd {
                user_id: user.id,
                wallet_id: wallet.id,
                category_id: bills,
                kind: TransactionKind::Expense,
                amount_minor,
                description: "Rent".to_string(),
                frequency: Frequency::Monthly,
                start_date,
            },
            today,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn catch_up_replays_every_missed_occurrence() {
    let (engine, _db) = engine_with_policy(RecurrencePolicy::CatchUp).await;
    let alice = signup(&engine, "alice").await;
    let today = date(2026, 3, 15);

    let rule = monthly_bill(&engine, &alice, 100_000, date(2026, 1, 1), today).await;
    assert_eq!(rule.next_run_date, date(2026, 4, 1));
    assert_eq!(rule.last_run_date, Some(today));

    let page = engine
        .search_transactions(alice.id, TransactionSearch::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    for tx in &page.transactions {
        assert_eq!(tx.date, today);
        assert_eq!(tx.description, format!("Rent{AUTO_SUFFIX}"));
    }
    let wallet = default_wallet(&engine, alice.id).await;
    assert_eq!(wallet.balance, -300_000);

    let report = engine.catch_up(alice.id, today).await.unwrap();
    assert_eq!(report.materialized, 0);
    assert_eq!(transaction_count(&engine, alice.id).await, 3);
}

#[tokio::test]
async fn single_step_advances_one_period_per_call() {
    let (engine, _db) = engine_with_policy(RecurrencePolicy::SingleStep).await;
    let alice = signup(&engine, "alice").await;
    let today = date(2026, 3, 15);

    let rule = monthly_bill(&engine, &alice, 100_000, date(2026, 1, 1), today).await;
    assert_eq!(rule.next_run_date, date(2026, 2, 1));
    assert_eq!(transaction_count(&engine, alice.id).await, 1);

    let report = engine.catch_up(alice.id, today).await.unwrap();
    assert_eq!(report.materialized, 1);
    let report = engine.catch_up(alice.id, today).await.unwrap();
    assert_eq!(report.materialized, 1);
    let report = engine.catch_up(alice.id, today).await.unwrap();
    assert_eq!(report.materialized, 0);

    let rule = engine.recurring_rule(alice.id, rule.id).await.unwrap();
    assert_eq!(rule.next_run_date, date(2026, 4, 1));
    assert_eq!(transaction_count(&engine, alice.id).await, 3);
}

#[tokio::test]
async fn future_rule_waits_for_its_start_date() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;

    let rule = monthly_bill(&engine, &alice, 50_000, date(2026, 4, 1), date(2026, 3, 15)).await;
    assert_eq!(rule.next_run_date, date(2026, 4, 1));
    assert_eq!(rule.last_run_date, None);
    assert_eq!(transaction_count(&engine, alice.id).await, 0);

    let rules = engine
        .recurring_rules(alice.id, date(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(rules[0].next_run_date, date(2026, 5, 1));
    assert_eq!(transaction_count(&engine, alice.id).await, 1);
}

#[tokio::test]
async fn month_end_anchor_is_kept() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;

    let rule = monthly_bill(&engine, &alice, 10_000, date(2026, 1, 31), date(2026, 4, 1)).await;
    // Jan 31, Feb 28, Mar 31 have fired.
    assert_eq!(rule.next_run_date, date(2026, 4, 30));
    assert_eq!(transaction_count(&engine, alice.id).await, 3);
}

#[tokio::test]
async fn paused_rules_are_skipped() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;

    let rule = monthly_bill(&engine, &alice, 10_000, date(2026, 3, 1), date(2026, 3, 1)).await;
    assert_eq!(transaction_count(&engine, alice.id).await, 1);

    let paused = engine
        .set_recurring_active(alice.id, rule.id, false)
        .await
        .unwrap();
    assert!(!paused.is_active);
    let report = engine.catch_up(alice.id, date(2026, 6, 1)).await.unwrap();
    assert_eq!(report.materialized, 0);

    engine
        .set_recurring_active(alice.id, rule.id, true)
        .await
        .unwrap();
    let report = engine.catch_up(alice.id, date(2026, 6, 1)).await.unwrap();
    // Apr, May and Jun.
    assert_eq!(report.materialized, 3);
}

#[tokio::test]
async fn failing_rule_does_not_block_the_others() {
    let (engine, db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let today = date(2026, 3, 15);

    install_trigger(
        &db,
        "CREATE TRIGGER reject_666 BEFORE INSERT ON transactions \
         WHEN NEW.amount_minor = 666 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .await;

    let broken = monthly_bill(&engine, &alice, 666, date(2026, 3, 1), today).await;
    let healthy = monthly_bill(&engine, &alice, 1_000, date(2026, 3, 1), today).await;

    assert_eq!(broken.next_run_date, date(2026, 3, 1));
    assert_eq!(broken.last_run_date, None);
    assert_eq!(healthy.next_run_date, date(2026, 4, 1));

    let report = engine.catch_up(alice.id, today).await.unwrap();
    assert_eq!(report.materialized, 0);
    assert_eq!(report.failed, vec![broken.id]);

    let wallet = default_wallet(&engine, alice.id).await;
    assert_eq!(wallet.balance, -1_000);
    assert_eq!(transaction_count(&engine, alice.id).await, 1);

    drop_trigger(&db, "reject_666").await;
    let report = engine.catch_up(alice.id, today).await.unwrap();
    assert_eq!(report.materialized, 1);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn deleting_a_rule_keeps_its_transactions() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let bob = signup(&engine, "bob").await;

    let rule = monthly_bill(&engine, &alice, 10_000, date(2026, 3, 1), date(2026, 3, 1)).await;
    assert!(matches!(
        engine.delete_recurring(bob.id, rule.id).await,
        Err(EngineError::Forbidden(_))
    ));

    engine.delete_recurring(alice.id, rule.id).await.unwrap();
    assert!(matches!(
        engine.recurring_rule(alice.id, rule.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(transaction_count(&engine, alice.id).await, 1);
}

#[tokio::test]
async fn rule_with_invalid_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let wallet = default_wallet(&engine, alice.id).await;
    let bills = category_id(&engine, alice.id, TransactionKind::Expense, "Bills").await;

    let err = engine
        .new_recurring(
            NewRecurringCmd {
                user_id: alice.id,
                wallet_id: wallet.id,
                category_id: bills,
                kind: TransactionKind::Expense,
                amount_minor: 0,
                description: "Rent".to_string(),
                frequency: Frequency::Weekly,
                start_date: date(2026, 3, 1),
            },
            date(2026, 3, 1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn created_rule_is_returned_when_catch_up_fails() {
    let (engine, db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let wallet = default_wallet(&engine, alice.id).await;
    let bills = category_id(&engine, alice.id, TransactionKind::Expense, "Bills").await;

    // A due row whose date cannot be decoded makes the due-rule query fail.
    db.execute_unprepared(&format!(
        "INSERT INTO recurring_transactions \
         (id, user_id, wallet_id, category_id, kind, amount_minor, description, frequency, \
          start_date, next_run_date, is_active, created_at) \
         VALUES ('corrupt', '{}', '{}', '{}', 'expense', 100, 'broken', 'monthly', \
          '2026-01-01', '0000-bad', 1, '2026-01-01T00:00:00Z')",
        alice.id, wallet.id, bills
    ))
    .await
    .unwrap();

    let today = date(2026, 3, 15);
    let rule = monthly_bill(&engine, &alice, 50_000, date(2026, 1, 1), today).await;
    assert_eq!(rule.next_run_date, date(2026, 1, 1));
    assert_eq!(rule.last_run_date, None);
    assert_eq!(transaction_count(&engine, alice.id).await, 0);

    db.execute_unprepared("DELETE FROM recurring_transactions WHERE id = 'corrupt'")
        .await
        .unwrap();
    let rules = engine.recurring_rules(alice.id, today).await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id, rule.id);
    assert_eq!(rules[0].next_run_date, date(2026, 4, 1));
    assert_eq!(transaction_count(&engine, alice.id).await, 3);
}
