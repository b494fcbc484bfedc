//! Nutrition math: daily totals, macro split, and calorie targets.
//!
//! Targets use the Mifflin-St Jeor resting energy equation scaled by an
//! activity factor, then shifted by the user's goal.

use serde::{Deserialize, Serialize};

use crate::error::{validate_known_value, CoreError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Kilocalories per gram of protein.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Kilocalories per gram of carbohydrate.
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Kilocalories per gram of fat.
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Lowest calorie target ever recommended.
pub const MIN_CALORIE_TARGET: f64 = 1200.0;

/// Share of the calorie target assigned to protein.
pub const PROTEIN_SHARE: f64 = 0.30;
/// Share of the calorie target assigned to carbohydrates.
pub const CARBS_SHARE: f64 = 0.40;
/// Share of the calorie target assigned to fat.
pub const FAT_SHARE: f64 = 0.30;

pub const MEAL_BREAKFAST: &str = "breakfast";
pub const MEAL_LUNCH: &str = "lunch";
pub const MEAL_DINNER: &str = "dinner";
pub const MEAL_SNACK: &str = "snack";

/// All valid meal types.
pub const VALID_MEAL_TYPES: &[&str] = &[MEAL_BREAKFAST, MEAL_LUNCH, MEAL_DINNER, MEAL_SNACK];

/// Food log written by hand.
pub const SOURCE_MANUAL: &str = "manual";
/// Food log created from an AI analysis.
pub const SOURCE_AI: &str = "ai";

pub fn validate_meal_type(meal_type: &str) -> Result<(), CoreError> {
    validate_known_value(meal_type, VALID_MEAL_TYPES, "meal_type")
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Anything that carries per-entry nutrient values.
///
/// Every accessor returns `None` when the value was never recorded; those
/// entries contribute zero to the totals.
pub trait NutrientSource {
    fn calories(&self) -> Option<f64>;
    fn protein_g(&self) -> Option<f64>;
    fn carbs_g(&self) -> Option<f64>;
    fn fat_g(&self) -> Option<f64>;
    fn fiber_g(&self) -> Option<f64>;
}

/// Summed nutrient values for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// Sum every entry into a single [`MacroTotals`].
pub fn daily_totals<'a, T, I>(entries: I) -> MacroTotals
where
    T: NutrientSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries
        .into_iter()
        .fold(MacroTotals::default(), |acc, e| MacroTotals {
            calories: acc.calories + e.calories().unwrap_or(0.0),
            protein_g: acc.protein_g + e.protein_g().unwrap_or(0.0),
            carbs_g: acc.carbs_g + e.carbs_g().unwrap_or(0.0),
            fat_g: acc.fat_g + e.fat_g().unwrap_or(0.0),
            fiber_g: acc.fiber_g + e.fiber_g().unwrap_or(0.0),
        })
}

/// Percentage of macro calories coming from each macronutrient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

/// Compute the macro split of `totals`, rounded to one decimal place.
///
/// Returns all zeros when the macros contribute no calories.
pub fn macro_percentages(totals: &MacroTotals) -> MacroSplit {
    let protein_kcal = totals.protein_g.max(0.0) * KCAL_PER_G_PROTEIN;
    let carbs_kcal = totals.carbs_g.max(0.0) * KCAL_PER_G_CARBS;
    let fat_kcal = totals.fat_g.max(0.0) * KCAL_PER_G_FAT;
    let sum = protein_kcal + carbs_kcal + fat_kcal;

    if sum <= 0.0 {
        return MacroSplit::default();
    }

    MacroSplit {
        protein_pct: round1(protein_kcal / sum * 100.0),
        carbs_pct: round1(carbs_kcal / sum * 100.0),
        fat_pct: round1(fat_kcal / sum * 100.0),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Profiles and targets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(CoreError::Validation(format!(
                "Invalid sex '{other}'. Must be one of: male, female"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Multiplier applied to resting energy expenditure.
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            other => Err(CoreError::Validation(format!(
                "Invalid activity_level '{other}'. Must be one of: \
                 sedentary, light, moderate, active, very_active"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    /// Daily calorie offset applied on top of maintenance.
    pub fn adjustment_kcal(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 300.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            other => Err(CoreError::Validation(format!(
                "Invalid goal '{other}'. Must be one of: lose, maintain, gain"
            ))),
        }
    }
}

/// Inputs needed to compute nutrition targets.
#[derive(Debug, Clone, Copy)]
pub struct BodyProfile {
    pub sex: Sex,
    pub age: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub calorie_target_override: Option<f64>,
}

/// Recommended daily intake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionTargets {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Resting energy expenditure (Mifflin-St Jeor), in kcal/day.
pub fn bmr(sex: Sex, weight_kg: f64, height_cm: f64, age: i32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Compute daily calorie and macro targets for a profile.
pub fn compute_targets(profile: &BodyProfile) -> NutritionTargets {
    let calories = match profile.calorie_target_override {
        Some(c) => c,
        None => {
            let maintenance = bmr(
                profile.sex,
                profile.weight_kg,
                profile.height_cm,
                profile.age,
            ) * profile.activity_level.factor();
            (maintenance + profile.goal.adjustment_kcal()).max(MIN_CALORIE_TARGET)
        }
    }
    .round();

    NutritionTargets {
        calories,
        protein_g: (calories * PROTEIN_SHARE / KCAL_PER_G_PROTEIN).round(),
        carbs_g: (calories * CARBS_SHARE / KCAL_PER_G_CARBS).round(),
        fat_g: (calories * FAT_SHARE / KCAL_PER_G_FAT).round(),
    }
}

/// Target minus consumed for each macro. Negative values mean over target.
pub fn remaining(targets: &NutritionTargets, totals: &MacroTotals) -> NutritionTargets {
    NutritionTargets {
        calories: targets.calories - totals.calories,
        protein_g: targets.protein_g - totals.protein_g,
        carbs_g: targets.carbs_g - totals.carbs_g,
        fat_g: targets.fat_g - totals.fat_g,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
