//! Nutrition profile model and DTOs.

use rats_core::error::CoreError;
use rats_core::nutrition::{ActivityLevel, BodyProfile, Goal, Sex};
use rats_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `nutrition_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NutritionProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub sex: String,
    pub age: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal: String,
    pub dietary_preferences: Vec<String>,
    pub calorie_target_override: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NutritionProfile {
    /// Parse the stored text columns into the typed profile used for targets.
    pub fn body_profile(&self) -> Result<BodyProfile, CoreError> {
        Ok(BodyProfile {
            sex: Sex::parse(&self.sex)?,
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: ActivityLevel::parse(&self.activity_level)?,
            goal: Goal::parse(&self.goal)?,
            calorie_target_override: self.calorie_target_override,
        })
    }
}

/// DTO for inserting or replacing a profile.
#[derive(Debug)]
pub struct UpsertNutritionProfile {
    pub sex: String,
    pub age: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal: String,
    pub dietary_preferences: Vec<String>,
    pub calorie_target_override: Option<f64>,
}
