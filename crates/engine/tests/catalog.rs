mod common;

use common::*;
use engine::{
    DebtKind, DebtStatus, EngineError, GoalFundsCmd, GoalStatus, NewCategoryCmd, NewDebtCmd,
    NewGoalCmd, NewTransactionCmd, NewWalletCmd, TransactionKind, UpdateCategoryCmd,
    UpdateDebtCmd, UpdateGoalCmd, UpdateWalletCmd,
};

#[tokio::test]
async fn signup_provisions_wallet_and_default_categories() {
    let (engine, _db) = engine_with_db().await;
    let alice = engine.new_user("  alice ", "").await.unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.display_name, "alice");

    let wallets = engine.wallets(alice.id).await.unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].name, "Main Wallet");
    assert!(wallets[0].is_default);

    let categories = engine.categories(alice.id, None).await.unwrap();
    assert_eq!(categories.len(), engine::DEFAULT_CATEGORIES.len());
    assert!(categories.iter().all(|c| c.is_default && !c.is_transfer));
    let income = engine
        .categories(alice.id, Some(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(income.len(), 3);

    assert!(matches!(
        engine.new_user("alice", "Alice").await,
        Err(EngineError::ExistingKey(_))
    ));
    assert!(matches!(
        engine.new_user("   ", "").await,
        Err(EngineError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn default_wallet_moves_and_is_promoted_on_delete() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let main = default_wallet(&engine, alice.id).await;

    let savings = engine
        .new_wallet(NewWalletCmd::new(alice.id, "Savings").default_wallet())
        .await
        .unwrap();
    assert!(savings.is_default);
    assert!(!engine.wallet(alice.id, main.id).await.unwrap().is_default);

    let renamed = engine
        .update_wallet(
            alice.id,
            main.id,
            UpdateWalletCmd {
                name: Some("Cash".to_string()),
                ..UpdateWalletCmd::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Cash");
    assert!(!renamed.is_default);

    engine.delete_wallet(alice.id, savings.id).await.unwrap();
    let left = engine.wallets(alice.id).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, main.id);
    assert!(left[0].is_default);

    assert!(matches!(
        engine.delete_wallet(alice.id, main.id).await,
        Err(EngineError::Conflict(_))
    ));
}

#[tokio::test]
async fn deleting_a_wallet_removes_its_transactions() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let bob = signup(&engine, "bob").await;
    let travel = add_wallet(&engine, alice.id, "Travel").await;
    let food = category_id(&engine, alice.id, TransactionKind::Expense, "Food").await;
    engine
        .create_transaction(
            NewTransactionCmd::new(alice.id, food, TransactionKind::Expense, 8_000, date(2026, 3, 2))
                .wallet_id(travel.id),
        )
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_wallet(bob.id, travel.id).await,
        Err(EngineError::Forbidden(_))
    ));
    engine.delete_wallet(alice.id, travel.id).await.unwrap();
    assert_eq!(transaction_count(&engine, alice.id).await, 0);
    assert_eq!(engine.total_balance(alice.id).await.unwrap(), 0);
}

#[tokio::test]
async fn category_names_are_unique_per_kind() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;

    assert!(matches!(
        engine
            .new_category(NewCategoryCmd::new(alice.id, "  food ", TransactionKind::Expense))
            .await,
        Err(EngineError::ExistingKey(_))
    ));
    // Same name, other kind.
    let refunds = engine
        .new_category(NewCategoryCmd::new(alice.id, "Food", TransactionKind::Income))
        .await
        .unwrap();
    assert!(!refunds.is_default);

    let cafe = engine
        .new_category(NewCategoryCmd::new(alice.id, "Café", TransactionKind::Expense).essential())
        .await
        .unwrap();
    assert!(cafe.is_essential);
    assert!(matches!(
        engine
            .new_category(NewCategoryCmd::new(alice.id, "CAFE", TransactionKind::Expense))
            .await,
        Err(EngineError::ExistingKey(_))
    ));
    assert!(matches!(
        engine
            .update_category(
                alice.id,
                cafe.id,
                UpdateCategoryCmd {
                    name: Some("Bills".to_string()),
                    ..UpdateCategoryCmd::default()
                },
            )
            .await,
        Err(EngineError::ExistingKey(_))
    ));
}

#[tokio::test]
async fn category_delete_conflicts() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let food = category_id(&engine, alice.id, TransactionKind::Expense, "Food").await;
    assert!(matches!(
        engine.delete_category(alice.id, food).await,
        Err(EngineError::Conflict(_))
    ));

    let pets = engine
        .new_category(NewCategoryCmd::new(alice.id, "Pets", TransactionKind::Expense))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(NewTransactionCmd::new(
            alice.id,
            pets.id,
            TransactionKind::Expense,
            4_000,
            date(2026, 3, 2),
        ))
        .await
        .unwrap();
    assert!(matches!(
        engine.delete_category(alice.id, pets.id).await,
        Err(EngineError::Conflict(_))
    ));

    engine.delete_transaction(alice.id, tx.id).await.unwrap();
    engine.delete_category(alice.id, pets.id).await.unwrap();
    assert!(
        !engine
            .categories(alice.id, None)
            .await
            .unwrap()
            .iter()
            .any(|c| c.id == pets.id)
    );
}

#[tokio::test]
async fn goal_completes_when_target_is_reached() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let bob = signup(&engine, "bob").await;

    let goal = engine
        .new_goal(NewGoalCmd {
            user_id: alice.id,
            name: "Laptop".to_string(),
            target_amount_minor: 1_000_000,
            deadline: Some(date(2026, 12, 31)),
            icon: None,
            color: None,
        })
        .await
        .unwrap();
    assert_eq!(goal.status, GoalStatus::Active);
    assert_eq!(goal.current_amount_minor, 0);

    let funds = |amount_minor, day| GoalFundsCmd {
        user_id: alice.id,
        goal_id: goal.id,
        amount_minor,
        note: None,
        date: date(2026, 3, day),
    };
    let goal_after = engine.add_goal_funds(funds(400_000, 1)).await.unwrap();
    assert_eq!(goal_after.current_amount_minor, 400_000);
    assert_eq!(goal_after.status, GoalStatus::Active);
    let goal_after = engine.add_goal_funds(funds(600_000, 2)).await.unwrap();
    assert_eq!(goal_after.status, GoalStatus::Completed);

    let contributions = engine.goal_contributions(alice.id, goal.id).await.unwrap();
    assert_eq!(contributions.len(), 2);
    assert_eq!(contributions[0].date, date(2026, 3, 2));

    // Raising the target reopens the goal.
    let raised = engine
        .update_goal(
            alice.id,
            goal.id,
            UpdateGoalCmd {
                target_amount_minor: Some(2_000_000),
                ..UpdateGoalCmd::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(raised.status, GoalStatus::Active);

    assert!(matches!(
        engine.add_goal_funds(funds(0, 3)).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .add_goal_funds(GoalFundsCmd {
                user_id: bob.id,
                ..funds(1_000, 3)
            })
            .await,
        Err(EngineError::Forbidden(_))
    ));

    engine.delete_goal(alice.id, goal.id).await.unwrap();
    assert!(engine.goals(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn debts_can_be_listed_by_status_and_settled() {
    let (engine, _db) = engine_with_db().await;
    let alice = signup(&engine, "alice").await;
    let bob = signup(&engine, "bob").await;

    let lent = engine
        .new_debt(NewDebtCmd {
            user_id: alice.id,
            kind: DebtKind::Receivable,
            person_name: " Budi ".to_string(),
            amount_minor: 150_000,
            description: Some("concert tickets".to_string()),
            due_date: Some(date(2026, 4, 1)),
        })
        .await
        .unwrap();
    assert_eq!(lent.person_name, "Budi");
    assert_eq!(lent.status, DebtStatus::Unpaid);

    let owed = engine
        .new_debt(NewDebtCmd {
            user_id: alice.id,
            kind: DebtKind::Payable,
            person_name: "Sari".to_string(),
            amount_minor: 50_000,
            description: None,
            due_date: Some(date(2026, 3, 20)),
        })
        .await
        .unwrap();

    let unpaid = engine
        .debts(alice.id, Some(DebtStatus::Unpaid))
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 2);
    assert_eq!(unpaid[0].id, owed.id);

    let paid = engine.mark_debt_paid(alice.id, owed.id).await.unwrap();
    assert_eq!(paid.status, DebtStatus::Paid);
    let unpaid = engine
        .debts(alice.id, Some(DebtStatus::Unpaid))
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(engine.debts(alice.id, None).await.unwrap().len(), 2);

    let updated = engine
        .update_debt(
            alice.id,
            lent.id,
            UpdateDebtCmd {
                amount_minor: Some(120_000),
                ..UpdateDebtCmd::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 120_000);

    assert!(matches!(
        engine.mark_debt_paid(bob.id, lent.id).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine
            .new_debt(NewDebtCmd {
                user_id: alice.id,
                kind: DebtKind::Payable,
                person_name: "Sari".to_string(),
                amount_minor: 0,
                description: None,
                due_date: None,
            })
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    engine.delete_debt(alice.id, lent.id).await.unwrap();
    assert!(matches!(
        engine.debt(alice.id, lent.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
