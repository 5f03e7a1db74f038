use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, EngineError, MoneyCents, RestockCmd, Translations};
use migration::MigratorTrait;

async fn seed_users(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    for (name, roles, balance) in [
        ("alice", "staff,admin", 500i64),
        ("bob", "staff", 80),
        ("carol", "staff", 0),
    ] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (name, password, roles, balance, drinks) VALUES (?, ?, ?, ?, 0)",
            vec![name.into(), "password".into(), roles.into(), balance.into()],
        ))
        .await
        .unwrap();
    }
}

fn translations() -> Translations {
    [("coffee".to_string(), "Café".to_string())]
        .into_iter()
        .collect()
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed_users(&db).await;
    let engine = Engine::builder()
        .database(db.clone())
        .translations(translations())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    // One pooled connection: concurrent transactions queue on checkout
    // instead of tripping over SQLite's single-writer lock.
    let mut options = ConnectOptions::new(url);
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed_users(&db).await;
    let engine = Engine::builder()
        .database(db.clone())
        .translations(translations())
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

#[tokio::test]
async fn buy_drink_debits_and_counts() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 10)
        .await
        .unwrap();

    let tx = engine.buy_drink("bob", "coffee", Utc::now()).await.unwrap();
    assert_eq!(tx.description, "Café");
    assert_eq!(tx.amount.cents(), 50);

    let bob = engine.user("bob").await.unwrap();
    assert_eq!(bob.balance.cents(), 30);
    assert_eq!(bob.drinks, 1);

    let drinks = engine.list_drinks().await.unwrap();
    assert_eq!(drinks[0].stock, 9);

    let history = engine.list_transactions("bob").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, tx.id);
}

#[tokio::test]
async fn description_falls_back_to_drink_name() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "mate", MoneyCents::new(80), 5)
        .await
        .unwrap();

    let tx = engine.buy_drink("bob", "mate", Utc::now()).await.unwrap();
    assert_eq!(tx.description, "mate");
}

#[tokio::test]
async fn buying_unknown_drink_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .buy_drink("bob", "kombucha", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownDrink("kombucha".to_string()));
}

#[tokio::test]
async fn buying_with_empty_shelf_fails_and_rolls_back() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 0)
        .await
        .unwrap();

    let err = engine
        .buy_drink("bob", "coffee", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::OutOfStock("coffee".to_string()));

    // Nothing committed: no debit, no counter bump, no record.
    let bob = engine.user("bob").await.unwrap();
    assert_eq!(bob.balance.cents(), 80);
    assert_eq!(bob.drinks, 0);
    assert!(engine.list_transactions("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn balance_may_go_negative() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 10)
        .await
        .unwrap();

    engine.buy_drink("bob", "coffee", Utc::now()).await.unwrap();
    engine.buy_drink("bob", "coffee", Utc::now()).await.unwrap();

    let bob = engine.user("bob").await.unwrap();
    assert_eq!(bob.balance.cents(), -20);
    assert_eq!(bob.drinks, 2);
}

#[tokio::test]
async fn concurrent_purchases_never_lose_an_update() {
    let (engine, _db, path) = engine_with_file_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 10)
        .await
        .unwrap();

    let engine = Arc::new(engine);
    let first = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.buy_drink("bob", "coffee", Utc::now()).await })
    };
    let second = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.buy_drink("bob", "coffee", Utc::now()).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Both debits took effect: 80 -> 30 -> -20, in some order.
    let bob = engine.user("bob").await.unwrap();
    assert_eq!(bob.balance.cents(), -20);
    assert_eq!(bob.drinks, 2);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn restocking_credits_every_contributor_exactly() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 2)
        .await
        .unwrap();

    let cmd = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 24,
        contributors: vec![
            "carol".to_string(),
            "alice".to_string(),
            "bob".to_string(),
        ],
        total: MoneyCents::new(300),
        occurred_at: Utc::now(),
    };
    let restocking = engine.restock("alice", cmd).await.unwrap();

    let sum: i64 = restocking
        .contributions
        .iter()
        .map(|c| c.share.cents())
        .sum();
    assert_eq!(sum, 300);

    assert_eq!(engine.user("alice").await.unwrap().balance.cents(), 600);
    assert_eq!(engine.user("bob").await.unwrap().balance.cents(), 180);
    assert_eq!(engine.user("carol").await.unwrap().balance.cents(), 100);

    let drinks = engine.list_drinks().await.unwrap();
    assert_eq!(drinks[0].stock, 26);
}

#[tokio::test]
async fn restocking_remainder_is_deterministic() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 0)
        .await
        .unwrap();

    let cmd = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 1,
        contributors: vec![
            "carol".to_string(),
            "bob".to_string(),
            "alice".to_string(),
        ],
        total: MoneyCents::new(301),
        occurred_at: Utc::now(),
    };
    let restocking = engine.restock("alice", cmd).await.unwrap();

    // Shares are assigned in name order; alice carries the extra cent.
    let shares: Vec<(String, i64)> = restocking
        .contributions
        .iter()
        .map(|c| (c.user_id.clone(), c.share.cents()))
        .collect();
    assert_eq!(
        shares,
        vec![
            ("alice".to_string(), 101),
            ("bob".to_string(), 100),
            ("carol".to_string(), 100),
        ]
    );

    let sum: i64 = shares.iter().map(|(_, cents)| cents).sum();
    assert_eq!(sum, 301);
}

#[tokio::test]
async fn restocking_requires_contributors_and_positive_total() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 0)
        .await
        .unwrap();

    let empty = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 1,
        contributors: vec![],
        total: MoneyCents::new(100),
        occurred_at: Utc::now(),
    };
    assert_eq!(
        engine.restock("alice", empty).await.unwrap_err(),
        EngineError::NoContributors
    );

    let zero_total = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 1,
        contributors: vec!["alice".to_string()],
        total: MoneyCents::new(0),
        occurred_at: Utc::now(),
    };
    assert!(matches!(
        engine.restock("alice", zero_total).await.unwrap_err(),
        EngineError::InvalidAmount(_)
    ));
}

#[tokio::test]
async fn restocking_is_admin_only() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 0)
        .await
        .unwrap();

    let cmd = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 1,
        contributors: vec!["bob".to_string()],
        total: MoneyCents::new(100),
        occurred_at: Utc::now(),
    };
    assert!(matches!(
        engine.restock("bob", cmd).await.unwrap_err(),
        EngineError::Forbidden(_)
    ));
}

#[tokio::test]
async fn restocking_with_unknown_contributor_rolls_back() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 3)
        .await
        .unwrap();

    let cmd = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 12,
        contributors: vec!["bob".to_string(), "mallory".to_string()],
        total: MoneyCents::new(200),
        occurred_at: Utc::now(),
    };
    let err = engine.restock("alice", cmd).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("mallory".to_string()));

    // All-or-nothing: no credits, no stock change, no record.
    assert_eq!(engine.user("bob").await.unwrap().balance.cents(), 80);
    let drinks = engine.list_drinks().await.unwrap();
    assert_eq!(drinks[0].stock, 3);
    assert!(engine.list_restockings().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_restockings_returns_contributions() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 0)
        .await
        .unwrap();

    let cmd = RestockCmd {
        drink_name: "coffee".to_string(),
        quantity: 6,
        contributors: vec!["bob".to_string()],
        total: MoneyCents::new(600),
        occurred_at: Utc::now(),
    };
    engine.restock("alice", cmd).await.unwrap();

    let restockings = engine.list_restockings().await.unwrap();
    assert_eq!(restockings.len(), 1);
    assert_eq!(restockings[0].total.cents(), 600);
    assert_eq!(restockings[0].contributions.len(), 1);
    assert_eq!(restockings[0].contributions[0].share.cents(), 600);
}

#[tokio::test]
async fn admin_credits_and_resets() {
    let (engine, _db) = engine_with_db().await;

    let bob = engine
        .credit_user("alice", "bob", MoneyCents::new(1000))
        .await
        .unwrap();
    assert_eq!(bob.balance.cents(), 1080);

    assert!(matches!(
        engine
            .credit_user("bob", "carol", MoneyCents::new(100))
            .await
            .unwrap_err(),
        EngineError::Forbidden(_)
    ));
    assert!(matches!(
        engine
            .credit_user("alice", "bob", MoneyCents::new(-100))
            .await
            .unwrap_err(),
        EngineError::InvalidAmount(_)
    ));

    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 10)
        .await
        .unwrap();
    engine.buy_drink("bob", "coffee", Utc::now()).await.unwrap();
    let bob = engine.reset_drinks("alice", "bob").await.unwrap();
    assert_eq!(bob.drinks, 0);
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.list_users("bob").await.unwrap_err(),
        EngineError::Forbidden(_)
    ));

    let users = engine.list_users("alice").await.unwrap();
    assert_eq!(users.len(), 3);

    let dave = engine
        .new_user("alice", "dave", "secret", &[engine::Role::Staff])
        .await
        .unwrap();
    assert_eq!(dave.balance.cents(), 0);
    assert_eq!(dave.drinks, 0);

    assert_eq!(
        engine
            .new_user("alice", "dave", "secret", &[engine::Role::Staff])
            .await
            .unwrap_err(),
        EngineError::ExistingKey("dave".to_string())
    );
}

#[tokio::test]
async fn new_drink_is_admin_only_and_unique() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine
            .new_drink("bob", "coffee", MoneyCents::new(50), 0)
            .await
            .unwrap_err(),
        EngineError::Forbidden(_)
    ));

    engine
        .new_drink("alice", "coffee", MoneyCents::new(50), 0)
        .await
        .unwrap();
    assert_eq!(
        engine
            .new_drink("alice", "coffee", MoneyCents::new(60), 0)
            .await
            .unwrap_err(),
        EngineError::ExistingKey("coffee".to_string())
    );
}
