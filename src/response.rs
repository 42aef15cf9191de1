//! Response formatting for break tools.
//!
//! The text layout is a contract with clients, which scrape the levels
//! back out with regular expressions:
//!
//! ```text
//! 😴 Taking a short break to relax
//!
//! Break Summary: Taking a short break to relax
//! Stress Level: 25
//! Boss Alert Level: 2
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{BOSS_ALERT_MAX, STRESS_MAX};
use crate::state::Levels;

/// Outcome of one break tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakReport {
    /// What the break consisted of
    pub summary: String,
    /// Emoji for the activity
    pub emoji: String,
    /// Levels after the break
    pub levels: Levels,
}

impl BreakReport {
    /// Create a new report.
    pub fn new(summary: impl Into<String>, emoji: impl Into<String>, levels: Levels) -> Self {
        Self {
            summary: summary.into(),
            emoji: emoji.into(),
            levels,
        }
    }
}

/// Render a report into the client-facing text block.
#[must_use]
pub fn format_response_text(report: &BreakReport) -> String {
    format!(
        "{emoji} {summary}\n\nBreak Summary: {summary}\nStress Level: {stress}\nBoss Alert Level: {alert}",
        emoji = report.emoji,
        summary = report.summary,
        stress = report.levels.stress,
        alert = report.levels.boss_alert,
    )
}

fn levels_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Stress Level:\s*(\d{1,3})\s*\nBoss Alert Level:\s*(\d)").ok())
        .as_ref()
}

/// Extract the levels from a rendered response, if both are present and
/// in range.
#[must_use]
pub fn parse_levels(text: &str) -> Option<Levels> {
    let captures = levels_pattern()?.captures(text)?;
    let stress = captures[1].parse::<u8>().ok().filter(|s| *s <= STRESS_MAX)?;
    let alert = captures[2].parse::<u8>().ok().filter(|a| *a <= BOSS_ALERT_MAX)?;
    Some(Levels::new(stress, alert))
}

/// One content block of an MCP tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text
    Text { text: String },
}

/// MCP `tools/call` result body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content blocks
    pub content: Vec<Content>,
    /// Set when the tool itself failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Successful result carrying a rendered break report.
    #[must_use]
    pub fn from_report(report: &BreakReport) -> Self {
        Self {
            content: vec![Content::Text {
                text: format_response_text(report),
            }],
            is_error: false,
        }
    }

    /// Tool-level failure with a message for the client.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}
