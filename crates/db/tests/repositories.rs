//! Integration tests for the repository layer against a real database.
//!
//! - Owner scoping on user-owned tables
//! - Idempotent reminder recording
//! - Social post status transitions
//! - Daily aggregates for food logs and meditation progress

#![cfg(feature = "db-tests")]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rats_core::roles::ROLE_MEMBER;
use rats_core::social::{POST_CANCELLED, POST_FAILED, POST_POSTED, POST_PUBLISHING};
use rats_db::models::event::{CreateEvent, EventSocial, UpdateEvent};
use rats_db::models::food_log::{CreateFoodLog, UpdateFoodLog};
use rats_db::models::meditation::{CreateMeditation, CreateMeditationCourse, CreateMeditationProgress};
use rats_db::models::nutrition_profile::UpsertNutritionProfile;
use rats_db::models::social::{CreateSocialPost, UpsertSocialAccount};
use rats_db::models::user::CreateUser;
use rats_db::repositories::{
    EventReminderRepo, EventRepo, FoodLogRepo, LeaderboardMetric, LeaderboardRepo,
    MeditationCourseRepo, MeditationProgressRepo, MeditationRepo, NutritionProfileRepo, RoleRepo,
    SocialAccountRepo, SocialPostRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    let role_id = RoleRepo::find_id_by_name(pool, ROLE_MEMBER)
        .await
        .unwrap()
        .expect("member role is seeded");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            display_name: email.split('@').next().unwrap().to_string(),
            role_id,
        },
    )
    .await
    .unwrap()
    .id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_food_log(name: &str, calories: f64, log_date: NaiveDate) -> CreateFoodLog {
    CreateFoodLog {
        food_name: name.to_string(),
        meal_type: "lunch".to_string(),
        calories: Some(calories),
        protein_g: Some(10.0),
        carbs_g: None,
        fat_g: None,
        fiber_g: None,
        serving_size: None,
        log_date,
        source: "manual".to_string(),
        notes: None,
    }
}

fn new_event(title: &str, days: Vec<i32>) -> CreateEvent {
    CreateEvent {
        title: title.to_string(),
        description: None,
        location: Some("Studio".to_string()),
        starts_at: Utc::now() + Duration::days(10),
        reminder_days: days,
        social: EventSocial {
            twitter: Some("rats_app".to_string()),
            auto_post: true,
            ..Default::default()
        },
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "dup@example.com").await;
    let role_id = RoleRepo::find_id_by_name(&pool, ROLE_MEMBER).await.unwrap().unwrap();

    let err = UserRepo::create(
        &pool,
        &CreateUser {
            email: "dup@example.com".to_string(),
            password_hash: "x".to_string(),
            display_name: "Dup".to_string(),
            role_id,
        },
    )
    .await
    .unwrap_err();

    match err {
        sqlx::Error::Database(db) => assert_eq!(db.constraint(), Some("uq_users_email")),
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_email_is_case_insensitive(pool: PgPool) {
    let id = new_user(&pool, "Calm@Example.com").await;
    let found = UserRepo::find_by_email(&pool, "calm@example.COM").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_login_after_expired_lock_starts_fresh_count(pool: PgPool) {
    let id = new_user(&pool, "lapsed@example.com").await;
    sqlx::query(
        "UPDATE users SET failed_login_count = 5, locked_until = NOW() - INTERVAL '1 minute'
         WHERE id = $1",
    )
    .bind(id)
    .execute(&pool)
    .await
    .unwrap();

    let lock_until = Utc::now() + Duration::minutes(15);
    let count = UserRepo::record_failed_login(&pool, id, 5, lock_until).await.unwrap();
    assert_eq!(count, 1);

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 1);
    assert!(user.locked_until.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_logins_lock_at_threshold(pool: PgPool) {
    let id = new_user(&pool, "tries@example.com").await;
    let lock_until = Utc::now() + Duration::minutes(15);

    for expected in 1..=4 {
        let count = UserRepo::record_failed_login(&pool, id, 5, lock_until).await.unwrap();
        assert_eq!(count, expected);
    }
    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(user.locked_until.is_none());

    UserRepo::record_failed_login(&pool, id, 5, lock_until).await.unwrap();
    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(user.locked_until.is_some_and(|t| t > Utc::now()));
}

// ---------------------------------------------------------------------------
// Events and reminders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_events_are_scoped_to_owner(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    let event = EventRepo::create(&pool, alice, &new_event("Retreat", vec![1, 7]))
        .await
        .unwrap();

    assert!(EventRepo::find_for_user(&pool, bob, event.id).await.unwrap().is_none());
    assert!(!EventRepo::delete(&pool, bob, event.id).await.unwrap());

    let update = UpdateEvent {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert!(EventRepo::update(&pool, bob, event.id, &update).await.unwrap().is_none());

    let mine = EventRepo::find_for_user(&pool, alice, event.id).await.unwrap().unwrap();
    assert_eq!(mine.title, "Retreat");
    assert_eq!(mine.reminder_days, vec![1, 7]);
    assert!(mine.social.auto_post);
    assert_eq!(mine.social.twitter.as_deref(), Some("rats_app"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_event_keeps_unspecified_fields(pool: PgPool) {
    let user = new_user(&pool, "u@example.com").await;
    let event = EventRepo::create(&pool, user, &new_event("Yoga", vec![0])).await.unwrap();

    let updated = EventRepo::update(
        &pool,
        user,
        event.id,
        &UpdateEvent {
            location: Some("Beach".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Yoga");
    assert_eq!(updated.location.as_deref(), Some("Beach"));
    assert_eq!(updated.reminder_days, vec![0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reminder_recording_is_idempotent(pool: PgPool) {
    let user = new_user(&pool, "r@example.com").await;
    let event = EventRepo::create(&pool, user, &new_event("Run", vec![1])).await.unwrap();
    let fire = date(2026, 5, 19);

    let first = EventReminderRepo::record(&pool, event.id, user, 1, fire).await.unwrap();
    let second = EventReminderRepo::record(&pool, event.id, user, 1, fire).await.unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(EventReminderRepo::list_for_event(&pool, event.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scheduler_window_skips_events_without_reminders(pool: PgPool) {
    let user = new_user(&pool, "w@example.com").await;
    let with = EventRepo::create(&pool, user, &new_event("With", vec![3])).await.unwrap();
    EventRepo::create(&pool, user, &new_event("Without", vec![])).await.unwrap();

    let now = Utc::now();
    let found = EventRepo::list_with_reminders_between(&pool, now, now + Duration::days(31))
        .await
        .unwrap();
    assert_eq!(found.iter().map(|e| e.id).collect::<Vec<_>>(), vec![with.id]);
}

// ---------------------------------------------------------------------------
// Food logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_food_log_daily_calories(pool: PgPool) {
    let user = new_user(&pool, "f@example.com").await;
    let day1 = date(2026, 3, 1);
    let day2 = date(2026, 3, 3);
    FoodLogRepo::create(&pool, user, &new_food_log("Oats", 300.0, day1)).await.unwrap();
    FoodLogRepo::create(&pool, user, &new_food_log("Soup", 250.0, day1)).await.unwrap();
    FoodLogRepo::create(&pool, user, &new_food_log("Salad", 180.0, day2)).await.unwrap();

    let history = FoodLogRepo::daily_calories(&pool, user, day1, day2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].log_date, day1);
    assert_eq!(history[0].calories, 550.0);
    assert_eq!(history[0].entries, 2);
    assert_eq!(history[1].calories, 180.0);

    let on_day1 = FoodLogRepo::list_for_date(&pool, user, day1).await.unwrap();
    assert_eq!(on_day1.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_food_log_partial_update(pool: PgPool) {
    let user = new_user(&pool, "p@example.com").await;
    let log = FoodLogRepo::create(&pool, user, &new_food_log("Toast", 120.0, date(2026, 3, 1)))
        .await
        .unwrap();

    let updated = FoodLogRepo::update(
        &pool,
        user,
        log.id,
        &UpdateFoodLog {
            calories: Some(150.0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.calories, Some(150.0));
    assert_eq!(updated.food_name, "Toast");
    assert_eq!(updated.protein_g, Some(10.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_food_log_rejects_unknown_meal_type(pool: PgPool) {
    let user = new_user(&pool, "m@example.com").await;
    let mut input = new_food_log("Cake", 400.0, date(2026, 3, 1));
    input.meal_type = "brunch".to_string();
    assert!(FoodLogRepo::create(&pool, user, &input).await.is_err());
}

// ---------------------------------------------------------------------------
// Meditation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_course_sessions_in_position_order(pool: PgPool) {
    let course = MeditationCourseRepo::create(
        &pool,
        &CreateMeditationCourse {
            title: "Foundations".to_string(),
            description: None,
            level: None,
            cover_image_url: None,
            is_published: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(course.level, "beginner");
    assert!(course.is_published);

    for (pos, title) in [(2, "Day 3"), (0, "Day 1"), (1, "Day 2")] {
        MeditationRepo::create(
            &pool,
            &CreateMeditation {
                course_id: Some(course.id),
                position: Some(pos),
                title: title.to_string(),
                description: None,
                category: "mindfulness".to_string(),
                duration_secs: 600,
                audio_url: None,
            },
        )
        .await
        .unwrap();
    }

    let sessions = MeditationRepo::list_for_course(&pool, course.id).await.unwrap();
    let titles: Vec<&str> = sessions.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Day 1", "Day 2", "Day 3"]);

    let filtered = MeditationRepo::list(&pool, Some("sleep"), false).await.unwrap();
    assert!(filtered.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sessions_of_unpublished_course_are_hidden(pool: PgPool) {
    let draft = MeditationCourseRepo::create(
        &pool,
        &CreateMeditationCourse {
            title: "Draft".to_string(),
            description: None,
            level: None,
            cover_image_url: None,
            is_published: Some(false),
        },
    )
    .await
    .unwrap();
    let session = |course_id: Option<i64>, title: &str| CreateMeditation {
        course_id,
        position: None,
        title: title.to_string(),
        description: None,
        category: "mindfulness".to_string(),
        duration_secs: 300,
        audio_url: None,
    };
    let hidden = MeditationRepo::create(&pool, &session(Some(draft.id), "Hidden"))
        .await
        .unwrap();
    let standalone = MeditationRepo::create(&pool, &session(None, "Standalone"))
        .await
        .unwrap();

    let visible = MeditationRepo::list(&pool, None, false).await.unwrap();
    let titles: Vec<&str> = visible.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Standalone"]);
    assert_eq!(MeditationRepo::list(&pool, None, true).await.unwrap().len(), 2);

    assert!(MeditationRepo::find_by_id(&pool, hidden.id, false).await.unwrap().is_none());
    assert!(MeditationRepo::find_by_id(&pool, hidden.id, true).await.unwrap().is_some());
    assert!(MeditationRepo::find_by_id(&pool, standalone.id, false).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_daily_practice_groups_by_utc_day(pool: PgPool) {
    let user = new_user(&pool, "zen@example.com").await;
    let times = [
        Utc.with_ymd_and_hms(2026, 3, 1, 7, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 1, 21, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap(),
    ];
    for at in times {
        MeditationProgressRepo::create(
            &pool,
            user,
            &CreateMeditationProgress {
                meditation_id: None,
                custom_meditation_id: None,
                duration_secs: 600,
                completed_at: Some(at),
            },
        )
        .await
        .unwrap();
    }

    let rows = MeditationProgressRepo::daily_practice(&pool, user, date(2026, 3, 1), date(2026, 3, 7))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].day, date(2026, 3, 1));
    assert_eq!(rows[0].total_secs, 1200);
    assert_eq!(rows[0].sessions, 2);

    let dates = MeditationProgressRepo::practice_dates(&pool, user).await.unwrap();
    assert_eq!(dates, vec![date(2026, 3, 1), date(2026, 3, 2)]);
}

// ---------------------------------------------------------------------------
// Nutrition profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nutrition_profile_upsert_replaces(pool: PgPool) {
    let user = new_user(&pool, "n@example.com").await;
    let mut input = UpsertNutritionProfile {
        sex: "female".to_string(),
        age: 30,
        height_cm: 165.0,
        weight_kg: 60.0,
        activity_level: "moderate".to_string(),
        goal: "maintain".to_string(),
        dietary_preferences: vec!["vegetarian".to_string()],
        calorie_target_override: None,
    };
    let first = NutritionProfileRepo::upsert(&pool, user, &input).await.unwrap();

    input.weight_kg = 58.5;
    input.dietary_preferences.clear();
    let second = NutritionProfileRepo::upsert(&pool, user, &input).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.weight_kg, 58.5);
    assert!(second.dietary_preferences.is_empty());
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_social_account_relink_replaces_tokens(pool: PgPool) {
    let user = new_user(&pool, "s@example.com").await;
    let mut input = UpsertSocialAccount {
        platform: "twitter".to_string(),
        external_account_id: "111".to_string(),
        handle: Some("first".to_string()),
        access_token: "sealed-1".to_string(),
        refresh_token: None,
        token_expires_at: None,
    };
    SocialAccountRepo::upsert(&pool, user, &input).await.unwrap();
    input.access_token = "sealed-2".to_string();
    input.handle = Some("second".to_string());
    SocialAccountRepo::upsert(&pool, user, &input).await.unwrap();

    let accounts = SocialAccountRepo::list_for_user(&pool, user).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].access_token, "sealed-2");
    assert_eq!(accounts[0].handle.as_deref(), Some("second"));

    assert!(SocialAccountRepo::delete(&pool, user, "twitter").await.unwrap());
    assert!(!SocialAccountRepo::delete(&pool, user, "twitter").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_social_post_transitions_leave_scheduled_once(pool: PgPool) {
    let user = new_user(&pool, "post@example.com").await;
    let past = Utc::now() - Duration::minutes(5);
    let make = |content: &str| CreateSocialPost {
        event_id: None,
        platform: "twitter".to_string(),
        content: content.to_string(),
        scheduled_for: past,
    };
    let a = SocialPostRepo::create(&pool, user, &make("a")).await.unwrap();
    let b = SocialPostRepo::create(&pool, user, &make("b")).await.unwrap();
    let c = SocialPostRepo::create(&pool, user, &make("c")).await.unwrap();

    // Unclaimed posts cannot be marked.
    assert!(!SocialPostRepo::mark_posted(&pool, a.id, "ext-0").await.unwrap());

    let cancelled = SocialPostRepo::cancel(&pool, user, c.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, POST_CANCELLED);

    let claimed = SocialPostRepo::claim_due(&pool, Utc::now(), 10).await.unwrap();
    let ids: Vec<i64> = claimed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
    assert!(claimed.iter().all(|p| p.status == POST_PUBLISHING));

    // Claimed posts are neither claimable again nor cancellable.
    assert!(SocialPostRepo::claim_due(&pool, Utc::now(), 10).await.unwrap().is_empty());
    assert!(SocialPostRepo::cancel(&pool, user, a.id).await.unwrap().is_none());

    assert!(SocialPostRepo::mark_posted(&pool, a.id, "ext-1").await.unwrap());
    assert!(!SocialPostRepo::mark_posted(&pool, a.id, "ext-2").await.unwrap());
    assert!(SocialPostRepo::mark_failed(&pool, b.id, "rate limited").await.unwrap());
    assert!(!SocialPostRepo::mark_posted(&pool, b.id, "ext-3").await.unwrap());

    let a = SocialPostRepo::find_for_user(&pool, user, a.id).await.unwrap().unwrap();
    assert_eq!(a.status, POST_POSTED);
    assert_eq!(a.external_post_id.as_deref(), Some("ext-1"));
    assert!(a.posted_at.is_some());
    let b = SocialPostRepo::find_for_user(&pool, user, b.id).await.unwrap().unwrap();
    assert_eq!(b.status, POST_FAILED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_claims_split_due_posts(pool: PgPool) {
    let user = new_user(&pool, "claims@example.com").await;
    let past = Utc::now() - Duration::minutes(1);
    for i in 0..6 {
        SocialPostRepo::create(
            &pool,
            user,
            &CreateSocialPost {
                event_id: None,
                platform: "twitter".to_string(),
                content: format!("post {i}"),
                scheduled_for: past,
            },
        )
        .await
        .unwrap();
    }

    let now = Utc::now();
    let (first, second) = tokio::join!(
        SocialPostRepo::claim_due(&pool, now, 10),
        SocialPostRepo::claim_due(&pool, now, 10),
    );
    let mut ids: Vec<i64> = first
        .unwrap()
        .into_iter()
        .chain(second.unwrap())
        .map(|p| p.id)
        .collect();
    ids.sort_unstable();
    let total = ids.len();
    ids.dedup();

    assert_eq!(total, 6);
    assert_eq!(ids.len(), 6);
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaderboard_ranks_by_minutes(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    new_user(&pool, "idle@example.com").await;

    for (user, secs) in [(alice, 600), (bob, 1800), (alice, 300)] {
        MeditationProgressRepo::create(
            &pool,
            user,
            &CreateMeditationProgress {
                meditation_id: None,
                custom_meditation_id: None,
                duration_secs: secs,
                completed_at: None,
            },
        )
        .await
        .unwrap();
    }

    let since = Utc::now().date_naive() - Duration::days(6);
    let top = LeaderboardRepo::top(&pool, LeaderboardMetric::MeditationMinutes, since, 20)
        .await
        .unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].display_name, "bob");
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[0].score, 30.0);
    assert_eq!(top[1].display_name, "alice");
    assert_eq!(top[1].score, 15.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaderboard_logging_days_stay_inside_window(pool: PgPool) {
    let user = new_user(&pool, "daily@example.com").await;
    let today = Utc::now().date_naive();
    for offset in 0..10 {
        let day = today - Duration::days(offset);
        FoodLogRepo::create(&pool, user, &new_food_log("Oats", 300.0, day))
            .await
            .unwrap();
    }

    let since = today - Duration::days(6);
    let top = LeaderboardRepo::top(&pool, LeaderboardMetric::LoggingDays, since, 20)
        .await
        .unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].score, 7.0);
}
