//! Analysis result types, prompt builders and static fallbacks.

use rats_core::nutrition::{MacroTotals, NutritionTargets};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Food analysis
// ---------------------------------------------------------------------------

/// Nutrition estimate for a described or photographed food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub food_name: String,
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    /// Model confidence in `0.0..=1.0`.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FoodAnalysis {
    /// Zero-valued estimate returned when the model reply is unusable.
    pub fn fallback(description: Option<&str>) -> Self {
        let food_name = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("Unknown food")
            .to_string();
        Self {
            food_name,
            serving_size: None,
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            fiber_g: 0.0,
            confidence: 0.0,
            notes: Some(
                "Automatic analysis was unavailable. Please enter nutrition values manually."
                    .to_string(),
            ),
        }
    }

    /// Clamp negative or non-finite numbers to zero and confidence into `0..=1`.
    pub fn sanitized(mut self) -> Self {
        for v in [
            &mut self.calories,
            &mut self.protein_g,
            &mut self.carbs_g,
            &mut self.fat_g,
            &mut self.fiber_g,
        ] {
            if !v.is_finite() || *v < 0.0 {
                *v = 0.0;
            }
        }
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

const FOOD_JSON_SHAPE: &str = r#"{"food_name": string, "serving_size": string, "calories": number, "protein_g": number, "carbs_g": number, "fat_g": number, "fiber_g": number, "confidence": number between 0 and 1, "notes": string}"#;

pub fn food_text_prompt(description: &str) -> String {
    format!(
        "You are a nutrition assistant. Estimate the nutrition of this food as eaten: \
         \"{description}\". Respond with only a JSON object of the form {FOOD_JSON_SHAPE}."
    )
}

pub fn food_image_prompt(hint: Option<&str>) -> String {
    let hint = hint
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| format!(" The user describes it as: \"{h}\"."))
        .unwrap_or_default();
    format!(
        "You are a nutrition assistant. Identify the food in this photo and estimate the \
         nutrition of the visible portion.{hint} Respond with only a JSON object of the form \
         {FOOD_JSON_SHAPE}."
    )
}

// ---------------------------------------------------------------------------
// Meditation guidance
// ---------------------------------------------------------------------------

/// What the user asked a custom meditation to address.
#[derive(Debug, Clone)]
pub struct MeditationRequest {
    pub mood: Option<String>,
    pub focus: Option<String>,
    pub duration_mins: i32,
}

/// A generated meditation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeditationGuidance {
    pub title: String,
    #[serde(default)]
    pub intention: String,
    pub script: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub breathing_pattern: Option<String>,
}

impl MeditationGuidance {
    /// A generic breathing meditation sized to the requested duration.
    pub fn fallback(req: &MeditationRequest) -> Self {
        let focus = req
            .focus
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or("calm");
        Self {
            title: format!("{}-Minute Calming Breath", req.duration_mins),
            intention: format!("Settle the body and return attention to {focus}."),
            script: "Find a comfortable position and let your eyes close. Breathe in slowly \
                     through the nose, and breathe out through the mouth. Each time the mind \
                     wanders, notice it kindly and come back to the breath."
                .to_string(),
            steps: vec![
                "Settle into a comfortable posture".to_string(),
                "Take three deep, slow breaths".to_string(),
                "Follow the natural rhythm of the breath".to_string(),
                "Scan the body from head to toe".to_string(),
                "Gently return to the room".to_string(),
            ],
            breathing_pattern: Some("4-7-8".to_string()),
        }
    }
}

pub fn meditation_prompt(req: &MeditationRequest) -> String {
    let mood = req.mood.as_deref().unwrap_or("neutral");
    let focus = req.focus.as_deref().unwrap_or("general relaxation");
    format!(
        "You are a meditation teacher. Write a guided meditation of about {} minutes for \
         someone who feels {mood} and wants to focus on {focus}. Respond with only a JSON \
         object of the form {{\"title\": string, \"intention\": string, \"script\": string, \
         \"steps\": [string], \"breathing_pattern\": string}}.",
        req.duration_mins
    )
}

// ---------------------------------------------------------------------------
// Nutrition coaching
// ---------------------------------------------------------------------------

/// Inputs for a coaching request.
#[derive(Debug, Clone, Default)]
pub struct CoachingContext {
    pub targets: Option<NutritionTargets>,
    pub totals: MacroTotals,
    pub goal: Option<String>,
    pub dietary_preferences: Vec<String>,
    pub question: Option<String>,
}

/// Coaching advice for the rest of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionAdvice {
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub suggested_meals: Vec<String>,
}

impl NutritionAdvice {
    pub fn fallback() -> Self {
        Self {
            summary: "Personalised advice is unavailable right now. Keep logging your meals \
                      and aim for balanced plates."
                .to_string(),
            recommendations: vec![
                "Fill half your plate with vegetables".to_string(),
                "Include a source of lean protein at every meal".to_string(),
                "Drink water regularly through the day".to_string(),
            ],
            suggested_meals: Vec::new(),
        }
    }
}

pub fn coaching_prompt(ctx: &CoachingContext) -> String {
    let t = &ctx.totals;
    let mut prompt = format!(
        "You are a nutrition coach. Today the user has eaten {:.0} kcal, {:.0} g protein, \
         {:.0} g carbs and {:.0} g fat.",
        t.calories, t.protein_g, t.carbs_g, t.fat_g
    );
    if let Some(targets) = &ctx.targets {
        prompt.push_str(&format!(
            " Their daily targets are {:.0} kcal, {:.0} g protein, {:.0} g carbs and {:.0} g fat.",
            targets.calories, targets.protein_g, targets.carbs_g, targets.fat_g
        ));
    }
    if let Some(goal) = &ctx.goal {
        prompt.push_str(&format!(" Their goal is to {goal} weight."));
    }
    if !ctx.dietary_preferences.is_empty() {
        prompt.push_str(&format!(
            " Dietary preferences: {}.",
            ctx.dietary_preferences.join(", ")
        ));
    }
    if let Some(q) = ctx.question.as_deref().filter(|q| !q.trim().is_empty()) {
        prompt.push_str(&format!(" They ask: \"{}\".", q.trim()));
    }
    prompt.push_str(
        " Respond with only a JSON object of the form {\"summary\": string, \
         \"recommendations\": [string], \"suggested_meals\": [string]}.",
    );
    prompt
}
