//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. User-owned tables take the
//! owner id on every query so rows of other users are never visible.

pub mod custom_meditation_repo;
pub mod event_reminder_repo;
pub mod event_repo;
pub mod food_log_repo;
pub mod leaderboard_repo;
pub mod meditation_course_repo;
pub mod meditation_progress_repo;
pub mod meditation_repo;
pub mod nutrition_profile_repo;
pub mod role_repo;
pub mod session_repo;
pub mod sleep_content_repo;
pub mod social_account_repo;
pub mod social_post_repo;
pub mod user_repo;

pub use custom_meditation_repo::CustomMeditationRepo;
pub use event_reminder_repo::EventReminderRepo;
pub use event_repo::EventRepo;
pub use food_log_repo::FoodLogRepo;
pub use leaderboard_repo::{LeaderboardMetric, LeaderboardRepo};
pub use meditation_course_repo::MeditationCourseRepo;
pub use meditation_progress_repo::MeditationProgressRepo;
pub use meditation_repo::MeditationRepo;
pub use nutrition_profile_repo::NutritionProfileRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use sleep_content_repo::SleepContentRepo;
pub use social_account_repo::SocialAccountRepo;
pub use social_post_repo::SocialPostRepo;
pub use user_repo::UserRepo;
