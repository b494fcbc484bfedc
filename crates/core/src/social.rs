//! Social platform rules: handles, post limits, and reminder post text.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Post status constants
// ---------------------------------------------------------------------------

pub const POST_SCHEDULED: &str = "scheduled";
/// Claimed by the dispatcher; the publish call is in flight.
pub const POST_PUBLISHING: &str = "publishing";
pub const POST_POSTED: &str = "posted";
pub const POST_FAILED: &str = "failed";
pub const POST_CANCELLED: &str = "cancelled";

// ---------------------------------------------------------------------------
// Platforms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Twitter,
    Facebook,
    Instagram,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [
        SocialPlatform::Twitter,
        SocialPlatform::Facebook,
        SocialPlatform::Instagram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Instagram => "instagram",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "twitter" => Ok(SocialPlatform::Twitter),
            "facebook" => Ok(SocialPlatform::Facebook),
            "instagram" => Ok(SocialPlatform::Instagram),
            other => Err(CoreError::Validation(format!(
                "Unsupported platform '{other}'. Must be one of: twitter, facebook, instagram"
            ))),
        }
    }

    /// Maximum post length in characters.
    pub fn max_post_length(self) -> usize {
        match self {
            SocialPlatform::Twitter => 280,
            SocialPlatform::Facebook => 63_206,
            SocialPlatform::Instagram => 2_200,
        }
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{1,30}$").expect("valid handle regex"));

/// Validate a social handle and return it without a leading `@`.
pub fn validate_handle(handle: &str) -> Result<String, CoreError> {
    let trimmed = handle.trim();
    let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
    if HANDLE_RE.is_match(bare) {
        Ok(bare.to_string())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid social handle '{handle}'. Use 1-30 letters, digits, '_' or '.'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Post composition
// ---------------------------------------------------------------------------

/// Event details needed to compose a reminder post.
#[derive(Debug, Clone)]
pub struct ReminderPostInput<'a> {
    pub title: &'a str,
    pub event_date: NaiveDate,
    pub location: Option<&'a str>,
    pub days_before: i32,
}

fn when_phrase(days_before: i32) -> String {
    match days_before {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {n} days"),
    }
}

/// Compose the text of an auto-posted reminder for `platform`.
pub fn compose_reminder_post(
    platform: SocialPlatform,
    input: &ReminderPostInput<'_>,
    handle: Option<&str>,
) -> String {
    let mut text = format!(
        "Reminder: {} is {} ({})",
        input.title,
        when_phrase(input.days_before),
        input.event_date.format("%b %-d, %Y"),
    );
    if let Some(location) = input.location.filter(|l| !l.trim().is_empty()) {
        text.push_str(&format!(" at {}", location.trim()));
    }
    text.push('.');
    if let Some(handle) = handle {
        text.push_str(&format!(" @{handle}"));
    }
    text.push_str(" #RATS #wellness");

    truncate_with_ellipsis(&text, platform.max_post_length())
}

/// Truncate `text` to at most `max_chars` characters, ending with `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Validate free-form post content for a platform.
pub fn validate_post_content(platform: SocialPlatform, content: &str) -> Result<(), CoreError> {
    let len = content.chars().count();
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Post content must not be empty".into()));
    }
    if len > platform.max_post_length() {
        return Err(CoreError::Validation(format!(
            "Post is {len} characters; {platform} allows at most {}",
            platform.max_post_length()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, days_before: i32) -> ReminderPostInput<'_> {
        ReminderPostInput {
            title,
            event_date: NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
            location: Some("Riverside Park"),
            days_before,
        }
    }

    #[test]
    fn platform_parsing() {
        for p in SocialPlatform::ALL {
            assert_eq!(SocialPlatform::parse(p.as_str()).unwrap(), p);
        }
        assert!(SocialPlatform::parse("myspace").is_err());
    }

    #[test]
    fn handle_strips_at_sign() {
        assert_eq!(validate_handle("@rats.app").unwrap(), "rats.app");
        assert_eq!(validate_handle(" calm_mind ").unwrap(), "calm_mind");
    }

    #[test]
    fn handle_rejects_bad_characters() {
        assert!(validate_handle("bad handle").is_err());
        assert!(validate_handle("@").is_err());
        assert!(validate_handle(&"x".repeat(31)).is_err());
    }

    #[test]
    fn reminder_post_mentions_timing_and_place() {
        let text = compose_reminder_post(SocialPlatform::Facebook, &input("Yoga Morning", 1), None);
        assert_eq!(
            text,
            "Reminder: Yoga Morning is tomorrow (Jun 5, 2026) at Riverside Park. #RATS #wellness"
        );
    }

    #[test]
    fn reminder_post_includes_handle() {
        let text =
            compose_reminder_post(SocialPlatform::Instagram, &input("Run", 7), Some("calm_mind"));
        assert!(text.contains("in 7 days"));
        assert!(text.contains("@calm_mind"));
    }

    #[test]
    fn reminder_post_respects_twitter_limit() {
        let long_title = "Mindful ".repeat(60);
        let text = compose_reminder_post(SocialPlatform::Twitter, &input(&long_title, 0), None);
        assert_eq!(text.chars().count(), 280);
        assert!(text.ends_with('…'));
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdef", 4), "abc…");
    }

    #[test]
    fn post_content_validation() {
        assert!(validate_post_content(SocialPlatform::Twitter, "   ").is_err());
        assert!(validate_post_content(SocialPlatform::Twitter, &"a".repeat(281)).is_err());
        assert!(validate_post_content(SocialPlatform::Facebook, &"a".repeat(281)).is_ok());
    }
}
