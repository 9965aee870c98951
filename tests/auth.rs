mod common;

use chrono::{Duration, Utc};
use cinema_booking::models::{Session, User};
use common::test_db;

#[tokio::test]
async fn register_login_logout_flow() {
    let db = test_db().await;

    let hash = bcrypt::hash("secret123", bcrypt::DEFAULT_COST).unwrap();
    let user_id = User::create("Ann", "ann@example.com", &hash, &db).await.unwrap();

    let user = User::find_by_email("ann@example.com", &db).await.unwrap().unwrap();
    assert_eq!(user.id, user_id);
    assert!(!user.is_admin);
    assert!(user.verify_password("secret123"));
    assert!(!user.verify_password("wrong"));

    // Логин выдает валидный токен
    let token = Session::create(user_id, 24, &db).await.unwrap();
    let resolved = Session::resolve_user(&token, &db).await.unwrap().unwrap();
    assert_eq!(resolved.id, user_id);

    // Logout инвалидирует токен
    Session::delete(&token, &db).await.unwrap();
    assert!(Session::resolve_user(&token, &db).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = test_db().await;
    let hash = bcrypt::hash("secret123", bcrypt::DEFAULT_COST).unwrap();

    User::create("Ann", "ann@example.com", &hash, &db).await.unwrap();
    let err = User::create("Other Ann", "ann@example.com", &hash, &db).await;
    assert!(err.is_err(), "unique email constraint must hold");
}

#[tokio::test]
async fn expired_sessions_do_not_resolve_and_get_purged() {
    let db = test_db().await;
    let hash = bcrypt::hash("secret123", bcrypt::DEFAULT_COST).unwrap();
    let user_id = User::create("Ann", "ann@example.com", &hash, &db).await.unwrap();

    // Сессия с истекшим сроком, вставленная напрямую
    let expired_at = Utc::now().naive_utc() - Duration::hours(1);
    sqlx::query("INSERT INTO sessions (user_id, token, expires_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind("stale-token")
        .bind(expired_at)
        .execute(&db.pool)
        .await
        .unwrap();

    assert!(Session::resolve_user("stale-token", &db).await.unwrap().is_none());

    let live = Session::create(user_id, 24, &db).await.unwrap();
    let purged = Session::purge_expired(&db).await.unwrap();
    assert_eq!(purged, 1);

    // Живая сессия переживает чистку
    assert!(Session::resolve_user(&live, &db).await.unwrap().is_some());
}

#[tokio::test]
async fn ensure_admin_user_is_idempotent() {
    let db = test_db().await;

    db.ensure_admin_user("admin@example.com", "admin123").await.unwrap();
    db.ensure_admin_user("admin@example.com", "admin123").await.unwrap();

    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = 1")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(admins, 1);

    let admin = User::find_by_email("admin@example.com", &db).await.unwrap().unwrap();
    assert!(admin.is_admin);
    assert!(admin.verify_password("admin123"));
}
