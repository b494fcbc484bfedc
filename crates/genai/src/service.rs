//! The AI seam the API depends on.

use async_trait::async_trait;

use crate::analysis::{
    coaching_prompt, food_image_prompt, food_text_prompt, meditation_prompt, CoachingContext,
    FoodAnalysis, MeditationGuidance, MeditationRequest, NutritionAdvice,
};
use crate::client::{GenAiClient, GenAiError, InlineImage};
use crate::parse::parse_or_fallback;

/// An analysis result and whether it is the static fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct AiOutcome<T> {
    pub result: T,
    pub fallback: bool,
}

impl<T> AiOutcome<T> {
    pub fn fresh(result: T) -> Self {
        Self {
            result,
            fallback: false,
        }
    }

    pub fn fallback(result: T) -> Self {
        Self {
            result,
            fallback: true,
        }
    }
}

/// AI-backed analyses.
///
/// Transport failures are errors. Unparseable model output is not: it
/// produces the fallback with `fallback = true`.
#[async_trait]
pub trait AiAnalyzer: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn analyze_food_text(
        &self,
        description: &str,
    ) -> Result<AiOutcome<FoodAnalysis>, GenAiError>;

    async fn analyze_food_image(
        &self,
        image: &InlineImage,
        hint: Option<&str>,
    ) -> Result<AiOutcome<FoodAnalysis>, GenAiError>;

    async fn meditation_guidance(
        &self,
        req: &MeditationRequest,
    ) -> Result<AiOutcome<MeditationGuidance>, GenAiError>;

    async fn nutrition_advice(
        &self,
        ctx: &CoachingContext,
    ) -> Result<AiOutcome<NutritionAdvice>, GenAiError>;
}

/// [`AiAnalyzer`] backed by [`GenAiClient`].
pub struct GenAiService {
    client: GenAiClient,
}

impl GenAiService {
    pub fn new(client: GenAiClient) -> Self {
        Self { client }
    }
}

fn outcome<T>((result, fallback): (T, bool)) -> AiOutcome<T> {
    if fallback {
        AiOutcome::fallback(result)
    } else {
        AiOutcome::fresh(result)
    }
}

#[async_trait]
impl AiAnalyzer for GenAiService {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    async fn analyze_food_text(
        &self,
        description: &str,
    ) -> Result<AiOutcome<FoodAnalysis>, GenAiError> {
        let reply = self
            .client
            .generate(&food_text_prompt(description), None)
            .await?;
        let mut out = outcome(parse_or_fallback(
            &reply,
            FoodAnalysis::fallback(Some(description)),
        ));
        out.result = out.result.sanitized();
        Ok(out)
    }

    async fn analyze_food_image(
        &self,
        image: &InlineImage,
        hint: Option<&str>,
    ) -> Result<AiOutcome<FoodAnalysis>, GenAiError> {
        let reply = self
            .client
            .generate(&food_image_prompt(hint), Some(image))
            .await?;
        let mut out = outcome(parse_or_fallback(&reply, FoodAnalysis::fallback(hint)));
        out.result = out.result.sanitized();
        Ok(out)
    }

    async fn meditation_guidance(
        &self,
        req: &MeditationRequest,
    ) -> Result<AiOutcome<MeditationGuidance>, GenAiError> {
        let reply = self.client.generate(&meditation_prompt(req), None).await?;
        Ok(outcome(parse_or_fallback(
            &reply,
            MeditationGuidance::fallback(req),
        )))
    }

    async fn nutrition_advice(
        &self,
        ctx: &CoachingContext,
    ) -> Result<AiOutcome<NutritionAdvice>, GenAiError> {
        let reply = self.client.generate(&coaching_prompt(ctx), None).await?;
        Ok(outcome(parse_or_fallback(&reply, NutritionAdvice::fallback())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_reply_is_fresh_and_fallback_is_flagged() {
        let parsed = outcome(("ok", false));
        assert_eq!(parsed, AiOutcome::fresh("ok"));
        assert!(!parsed.fallback);

        let fallback = outcome(("static", true));
        assert_eq!(fallback, AiOutcome::fallback("static"));
        assert!(fallback.fallback);
    }
}
