//! Food log model and DTOs.

use chrono::NaiveDate;
use rats_core::nutrition::NutrientSource;
use rats_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `food_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FoodLog {
    pub id: DbId,
    pub user_id: DbId,
    pub food_name: String,
    pub meal_type: String,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub serving_size: Option<String>,
    pub log_date: NaiveDate,
    pub source: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NutrientSource for FoodLog {
    fn calories(&self) -> Option<f64> {
        self.calories
    }
    fn protein_g(&self) -> Option<f64> {
        self.protein_g
    }
    fn carbs_g(&self) -> Option<f64> {
        self.carbs_g
    }
    fn fat_g(&self) -> Option<f64> {
        self.fat_g
    }
    fn fiber_g(&self) -> Option<f64> {
        self.fiber_g
    }
}

/// DTO for inserting a food log.
#[derive(Debug, Clone)]
pub struct CreateFoodLog {
    pub food_name: String,
    pub meal_type: String,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub serving_size: Option<String>,
    pub log_date: NaiveDate,
    pub source: String,
    pub notes: Option<String>,
}

/// DTO for updating a food log. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodLog {
    pub food_name: Option<String>,
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub serving_size: Option<String>,
    pub log_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Calorie total for a single day, from the history query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyCalories {
    pub log_date: NaiveDate,
    pub calories: f64,
    pub entries: i64,
}
