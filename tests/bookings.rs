mod common;

use cinema_booking::models::{Identity, SeatPos};
use cinema_booking::services::BookingError;
use common::{add_movie, booked_count, guest, seats, test_app};

#[tokio::test]
async fn booking_marks_exactly_the_requested_seats() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "Inception", 13.99).await;

    let before = booked_count(&app.db, movie_id).await;
    app.engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["1-2", "1-3", "1-4"]), &guest())
        .await
        .unwrap();

    let after = booked_count(&app.db, movie_id).await;
    assert_eq!(after, before + 3);

    // Кеш согласован с базой
    let cached = app.cache.get(movie_id).await.unwrap();
    assert_eq!(cached.seats.booked(), 3);
    assert!(cached.seats.is_booked(SeatPos::new(1, 2)));
    assert!(!cached.seats.is_booked(SeatPos::new(1, 5)));
}

#[tokio::test]
async fn overlapping_concurrent_bookings_cannot_both_succeed() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "The Matrix", 12.99).await;

    let ann_seats = seats(&["3-3", "3-4"]);
    let bob_seats = seats(&["3-4", "3-5"]);
    let ann_identity = guest();
    let bob_identity = guest();
    let first = app.engine.create_booking(
        movie_id,
        "Ann",
        "ann@example.com",
        &ann_seats,
        &ann_identity,
    );
    let second = app.engine.create_booking(
        movie_id,
        "Bob",
        "bob@example.com",
        &bob_seats,
        &bob_identity,
    );

    let (r1, r2) = tokio::join!(first, second);
    assert!(
        r1.is_ok() != r2.is_ok(),
        "exactly one of two overlapping bookings may commit: {:?} / {:?}",
        r1,
        r2
    );
    // Ровно места победителя помечены занятыми
    assert_eq!(booked_count(&app.db, movie_id).await, 2);
}

#[tokio::test]
async fn disjoint_bookings_for_different_movies_both_succeed() {
    let app = test_app().await;
    let movie_a = add_movie(&app, "Movie A", 10.0).await;
    let movie_b = add_movie(&app, "Movie B", 10.0).await;

    let ann_seats = seats(&["0-0"]);
    let bob_seats = seats(&["0-0"]);
    let ann_identity = guest();
    let bob_identity = guest();
    let (r1, r2) = tokio::join!(
        app.engine
            .create_booking(movie_a, "Ann", "ann@example.com", &ann_seats, &ann_identity),
        app.engine
            .create_booking(movie_b, "Bob", "bob@example.com", &bob_seats, &bob_identity),
    );
    assert!(r1.is_ok() && r2.is_ok());
}

#[tokio::test]
async fn cancellation_frees_exactly_the_held_seats() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "Parasite", 13.99).await;
    let identity = Identity {
        user_id: None,
        email: Some("ann@example.com".to_string()),
        is_admin: false,
    };

    let kept = app
        .engine
        .create_booking(movie_id, "Bob", "bob@example.com", &seats(&["5-5"]), &guest())
        .await
        .unwrap();
    let cancelled = app
        .engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["2-2", "2-3"]), &identity)
        .await
        .unwrap();

    assert_eq!(booked_count(&app.db, movie_id).await, 3);

    app.engine.cancel_booking(cancelled, &identity).await.unwrap();

    assert_eq!(booked_count(&app.db, movie_id).await, 1);
    let cached = app.cache.get(movie_id).await.unwrap();
    assert!(!cached.seats.is_booked(SeatPos::new(2, 2)));
    assert!(!cached.seats.is_booked(SeatPos::new(2, 3)));
    assert!(cached.seats.is_booked(SeatPos::new(5, 5)));

    // Вторая отмена той же брони - not found
    assert!(matches!(
        app.engine.cancel_booking(kept + 100, &identity).await,
        Err(BookingError::BookingNotFound(_))
    ));
}

#[tokio::test]
async fn grid_boundary_coordinates() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "Interstellar", 15.99).await;

    // Последнее место сетки бронируется
    app.engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["7-9"]), &guest())
        .await
        .unwrap();

    // Ряд и колонка сразу за границей отклоняются
    let err = app
        .engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["8-0"]), &guest())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::SeatOutOfBounds(_)));

    let err = app
        .engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["0-10"]), &guest())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::SeatOutOfBounds(_)));

    assert_eq!(booked_count(&app.db, movie_id).await, 1);
}

#[tokio::test]
async fn validation_failures_leave_no_side_effects() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "Pulp Fiction", 13.50).await;

    let cases: Vec<BookingError> = vec![
        app.engine
            .create_booking(movie_id, "", "ann@example.com", &seats(&["0-0"]), &guest())
            .await
            .unwrap_err(),
        app.engine
            .create_booking(movie_id, "Ann", "", &seats(&["0-0"]), &guest())
            .await
            .unwrap_err(),
        app.engine
            .create_booking(movie_id, "Ann", "ann@example.com", &[], &guest())
            .await
            .unwrap_err(),
        app.engine
            .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["0-0", "0-0"]), &guest())
            .await
            .unwrap_err(),
    ];
    for err in cases {
        assert!(matches!(err, BookingError::Validation(_)), "got {:?}", err);
    }

    let err = app
        .engine
        .create_booking(movie_id + 1, "Ann", "ann@example.com", &seats(&["0-0"]), &guest())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::MovieNotFound(_)));

    assert_eq!(booked_count(&app.db, movie_id).await, 0);
}

#[tokio::test]
async fn cancellation_requires_admin_owner_or_matching_email() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "The Dark Knight", 14.50).await;
    let owner = Identity {
        user_id: None,
        email: Some("ann@example.com".to_string()),
        is_admin: false,
    };

    let booking_id = app
        .engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["4-4"]), &owner)
        .await
        .unwrap();

    // Чужой email - отказ без мутаций
    let stranger = Identity {
        user_id: None,
        email: Some("mallory@example.com".to_string()),
        is_admin: false,
    };
    assert!(matches!(
        app.engine.cancel_booking(booking_id, &stranger).await,
        Err(BookingError::Unauthorized)
    ));
    assert!(matches!(
        app.engine.cancel_booking(booking_id, &guest()).await,
        Err(BookingError::Unauthorized)
    ));
    assert_eq!(booked_count(&app.db, movie_id).await, 1);

    // Админ может отменить любую бронь
    app.engine
        .cancel_booking(booking_id, &common::admin())
        .await
        .unwrap();
    assert_eq!(booked_count(&app.db, movie_id).await, 0);
}

#[tokio::test]
async fn book_conflict_cancel_rebook_scenario() {
    let app = test_app().await;
    let movie_id = add_movie(&app, "Matinee", 10.0).await;
    let identity = Identity {
        user_id: None,
        email: Some("ann@example.com".to_string()),
        is_admin: false,
    };

    // Бронируем 0-0 и 0-1, ожидаем total 20.00 и ровно два занятых места
    let booking_id = app
        .engine
        .create_booking(movie_id, "Ann", "ann@example.com", &seats(&["0-0", "0-1"]), &identity)
        .await
        .unwrap();

    let total: f64 = sqlx::query_scalar("SELECT total FROM bookings WHERE id = $1")
        .bind(booking_id)
        .fetch_one(&app.db.pool)
        .await
        .unwrap();
    assert_eq!(total, 20.0);
    assert_eq!(booked_count(&app.db, movie_id).await, 2);

    // Повторная попытка на 0-0 называет конкретное место
    let err = app
        .engine
        .create_booking(movie_id, "Bob", "bob@example.com", &seats(&["0-0"]), &guest())
        .await
        .unwrap_err();
    match &err {
        BookingError::SeatUnavailable(pos) => assert_eq!(pos.to_string(), "0-0"),
        other => panic!("expected SeatUnavailable, got {:?}", other),
    }
    assert!(err.to_string().contains("0-0"));

    // После отмены место снова доступно
    app.engine.cancel_booking(booking_id, &identity).await.unwrap();
    app.engine
        .create_booking(movie_id, "Bob", "bob@example.com", &seats(&["0-0"]), &guest())
        .await
        .unwrap();
}
