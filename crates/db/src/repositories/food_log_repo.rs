//! Repository for the `food_logs` table.

use chrono::NaiveDate;
use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::food_log::{CreateFoodLog, DailyCalories, FoodLog, UpdateFoodLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, food_name, meal_type, calories, protein_g, carbs_g, \
                        fat_g, fiber_g, serving_size, log_date, source, notes, \
                        created_at, updated_at";

/// Provides CRUD operations for food logs.
pub struct FoodLogRepo;

impl FoodLogRepo {
    /// Insert a new food log owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateFoodLog,
    ) -> Result<FoodLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO food_logs
                (user_id, food_name, meal_type, calories, protein_g, carbs_g, fat_g,
                 fiber_g, serving_size, log_date, source, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FoodLog>(&query)
            .bind(user_id)
            .bind(&input.food_name)
            .bind(&input.meal_type)
            .bind(input.calories)
            .bind(input.protein_g)
            .bind(input.carbs_g)
            .bind(input.fat_g)
            .bind(input.fiber_g)
            .bind(&input.serving_size)
            .bind(input.log_date)
            .bind(&input.source)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a food log by id, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<FoodLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM food_logs WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, FoodLog>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All entries for a single day, in the order they were logged.
    pub async fn list_for_date(
        pool: &PgPool,
        user_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<FoodLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM food_logs
             WHERE user_id = $1 AND log_date = $2
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, FoodLog>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Per-day calorie totals in `[from, to]`. Days without entries are omitted.
    pub async fn daily_calories(
        pool: &PgPool,
        user_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyCalories>, sqlx::Error> {
        sqlx::query_as::<_, DailyCalories>(
            "SELECT log_date,
                    COALESCE(SUM(calories), 0)::DOUBLE PRECISION AS calories,
                    COUNT(*) AS entries
             FROM food_logs
             WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
             GROUP BY log_date
             ORDER BY log_date ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Update a food log. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateFoodLog,
    ) -> Result<Option<FoodLog>, sqlx::Error> {
        let query = format!(
            "UPDATE food_logs SET
                food_name = COALESCE($3, food_name),
                meal_type = COALESCE($4, meal_type),
                calories = COALESCE($5, calories),
                protein_g = COALESCE($6, protein_g),
                carbs_g = COALESCE($7, carbs_g),
                fat_g = COALESCE($8, fat_g),
                fiber_g = COALESCE($9, fiber_g),
                serving_size = COALESCE($10, serving_size),
                log_date = COALESCE($11, log_date),
                notes = COALESCE($12, notes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FoodLog>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.food_name)
            .bind(&input.meal_type)
            .bind(input.calories)
            .bind(input.protein_g)
            .bind(input.carbs_g)
            .bind(input.fat_g)
            .bind(input.fiber_g)
            .bind(&input.serving_size)
            .bind(input.log_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a food log. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM food_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
