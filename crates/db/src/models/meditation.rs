//! Meditation catalog, custom meditation, and progress models.

use chrono::NaiveDate;
use rats_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// A row from the `meditation_courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeditationCourse {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course with its ordered sessions, for the course detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MeditationCourseDetail {
    #[serde(flatten)]
    pub course: MeditationCourse,
    pub sessions: Vec<Meditation>,
    pub total_duration_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMeditationCourse {
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeditationCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_published: Option<bool>,
}

// ---------------------------------------------------------------------------
// Single meditations
// ---------------------------------------------------------------------------

/// A row from the `meditations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Meditation {
    pub id: DbId,
    pub course_id: Option<DbId>,
    pub position: i32,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub duration_secs: i32,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateMeditation {
    pub course_id: Option<DbId>,
    pub position: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub duration_secs: i32,
    pub audio_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeditation {
    pub course_id: Option<DbId>,
    pub position: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub duration_secs: Option<i32>,
    pub audio_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Sleep content
// ---------------------------------------------------------------------------

/// A row from the `sleep_content` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SleepContent {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub duration_secs: i32,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSleepContent {
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub duration_secs: i32,
    pub audio_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSleepContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub duration_secs: Option<i32>,
    pub audio_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Custom meditations
// ---------------------------------------------------------------------------

/// A row from the `custom_meditations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomMeditation {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub intention: Option<String>,
    pub mood: Option<String>,
    pub duration_mins: i32,
    pub script: String,
    pub steps: Json<Vec<String>>,
    pub breathing_pattern: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateCustomMeditation {
    pub title: String,
    pub intention: Option<String>,
    pub mood: Option<String>,
    pub duration_mins: i32,
    pub script: String,
    pub steps: Vec<String>,
    pub breathing_pattern: Option<String>,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// A row from the `meditation_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeditationProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub meditation_id: Option<DbId>,
    pub custom_meditation_id: Option<DbId>,
    pub duration_secs: i32,
    pub completed_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateMeditationProgress {
    pub meditation_id: Option<DbId>,
    pub custom_meditation_id: Option<DbId>,
    pub duration_secs: i32,
    pub completed_at: Option<Timestamp>,
}

/// Per-day practice aggregate, used for streaks and the heatmap.
#[derive(Debug, Clone, FromRow)]
pub struct DailyPracticeRow {
    pub day: NaiveDate,
    pub total_secs: i64,
    pub sessions: i64,
}
