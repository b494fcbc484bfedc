//! Repository for the `nutrition_profiles` table.

use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::nutrition_profile::{NutritionProfile, UpsertNutritionProfile};

const COLUMNS: &str = "id, user_id, sex, age, height_cm, weight_kg, activity_level, goal, \
                        dietary_preferences, calorie_target_override, created_at, updated_at";

/// One profile per user, replaced wholesale on update.
pub struct NutritionProfileRepo;

impl NutritionProfileRepo {
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NutritionProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nutrition_profiles WHERE user_id = $1");
        sqlx::query_as::<_, NutritionProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert the user's profile or overwrite the existing one.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertNutritionProfile,
    ) -> Result<NutritionProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO nutrition_profiles
                (user_id, sex, age, height_cm, weight_kg, activity_level, goal,
                 dietary_preferences, calorie_target_override)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_nutrition_profiles_user_id DO UPDATE SET
                sex = EXCLUDED.sex,
                age = EXCLUDED.age,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                dietary_preferences = EXCLUDED.dietary_preferences,
                calorie_target_override = EXCLUDED.calorie_target_override
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NutritionProfile>(&query)
            .bind(user_id)
            .bind(&input.sex)
            .bind(input.age)
            .bind(input.height_cm)
            .bind(input.weight_kg)
            .bind(&input.activity_level)
            .bind(&input.goal)
            .bind(&input.dietary_preferences)
            .bind(input.calorie_target_override)
            .fetch_one(pool)
            .await
    }
}
