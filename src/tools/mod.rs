//! Break tools exposed over MCP.
//!
//! Each tool picks a stress relief amount (fixed, or uniform in `1..=100`),
//! runs it through [`StateEngine::apply_break`], and reports the resulting
//! levels with its flavor text.

pub mod catalog;

use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{ChillError, Result};
use crate::response::BreakReport;
use crate::state::StateEngine;

/// Bounds of a random stress relief draw, inclusive on both ends.
pub const RANDOM_RELIEF_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// How much stress a tool relieves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relief {
    /// Always the same amount
    Fixed(i64),
    /// Uniform draw from [`RANDOM_RELIEF_RANGE`]
    Random,
}

impl Relief {
    /// Resolve to a concrete amount.
    pub fn amount<R: Rng>(&self, rng: &mut R) -> i64 {
        match self {
            Self::Fixed(amount) => *amount,
            Self::Random => rng.gen_range(RANDOM_RELIEF_RANGE),
        }
    }
}

/// The catalog of break tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakTool {
    TakeABreak,
    WatchNetflix,
    ShowMeme,
    BathroomBreak,
    CoffeeMission,
    UrgentCall,
    DeepThinking,
    EmailOrganizing,
    ChimacBreak,
    ImmediateLeave,
    CompanyDinner,
}

impl BreakTool {
    /// Every tool, in listing order.
    pub const ALL: [BreakTool; 11] = [
        Self::TakeABreak,
        Self::WatchNetflix,
        Self::ShowMeme,
        Self::BathroomBreak,
        Self::CoffeeMission,
        Self::UrgentCall,
        Self::DeepThinking,
        Self::EmailOrganizing,
        Self::ChimacBreak,
        Self::ImmediateLeave,
        Self::CompanyDinner,
    ];

    /// Wire name of the tool.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TakeABreak => "take_a_break",
            Self::WatchNetflix => "watch_netflix",
            Self::ShowMeme => "show_meme",
            Self::BathroomBreak => "bathroom_break",
            Self::CoffeeMission => "coffee_mission",
            Self::UrgentCall => "urgent_call",
            Self::DeepThinking => "deep_thinking",
            Self::EmailOrganizing => "email_organizing",
            Self::ChimacBreak => "chimac_break",
            Self::ImmediateLeave => "immediate_leave",
            Self::CompanyDinner => "company_dinner",
        }
    }

    /// Human-readable description for `tools/list`.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::TakeABreak => "Take a short break to relax and reduce stress.",
            Self::WatchNetflix => "Watch a randomly picked series on Netflix to unwind.",
            Self::ShowMeme => "Browse a relatable developer meme to boost mood.",
            Self::BathroomBreak => "Take a bathroom break (actually browsing the phone).",
            Self::CoffeeMission => "Go on a coffee mission and take the scenic route.",
            Self::UrgentCall => "Take an 'urgent' phone call to escape work pressure.",
            Self::DeepThinking => "Pretend to be deep in thought while daydreaming.",
            Self::EmailOrganizing => "Organize emails (actually online shopping).",
            Self::ChimacBreak => "Enjoy a chicken and beer break.",
            Self::ImmediateLeave => "Leave work immediately. The best break is going home.",
            Self::CompanyDinner => "Attend a company dinner, for better or worse.",
        }
    }

    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::TakeABreak => "😴",
            Self::WatchNetflix => "📺",
            Self::ShowMeme => "😂",
            Self::BathroomBreak => "🛁",
            Self::CoffeeMission => "☕",
            Self::UrgentCall => "📞",
            Self::DeepThinking => "🤔",
            Self::EmailOrganizing => "📧",
            Self::ChimacBreak => "🍗",
            Self::ImmediateLeave => "🏃",
            Self::CompanyDinner => "🍻",
        }
    }

    /// How much stress this tool relieves.
    #[must_use]
    pub fn relief(&self) -> Relief {
        match self {
            Self::ImmediateLeave => Relief::Fixed(100),
            _ => Relief::Random,
        }
    }

    fn flavor(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Self::TakeABreak => None,
            Self::WatchNetflix => Some(("Watching Netflix", catalog::NETFLIX_SERIES)),
            Self::ShowMeme => Some(("Browsing memes", catalog::MEMES)),
            Self::BathroomBreak => Some(("Bathroom break", catalog::BATHROOM_ACTIVITIES)),
            Self::CoffeeMission => Some(("Coffee mission", catalog::COFFEE_ROUTES)),
            Self::UrgentCall => Some(("Urgent call", catalog::CALL_EXCUSES)),
            Self::DeepThinking => Some(("Deep thinking", catalog::THINKING_TOPICS)),
            Self::EmailOrganizing => Some(("Organizing emails", catalog::SHOPPING_ACTIVITIES)),
            Self::ChimacBreak => Some(("Chimac break", catalog::CHIMAC_COMBOS)),
            Self::ImmediateLeave => Some(("Leaving work immediately", catalog::LEAVE_PLANS)),
            Self::CompanyDinner => Some(("Company dinner", catalog::DINNER_EVENTS)),
        }
    }

    /// Summary line for one invocation, with a flavor item picked from the
    /// tool's table.
    pub fn summary<R: Rng>(&self, rng: &mut R) -> String {
        match self.flavor() {
            None => "Taking a short break to relax".to_string(),
            Some((prefix, table)) => match table.choose(rng) {
                Some(item) => format!("{prefix} - {item}"),
                None => prefix.to_string(),
            },
        }
    }

    /// Look a tool up by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Listing entry for `tools/list`.
    #[must_use]
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: json!({ "type": "object", "properties": {} }),
        }
    }

    /// Take this break against `engine`.
    ///
    /// The relief amount and summary are drawn before the engine is
    /// entered, so the random draws never happen under the guard.
    ///
    /// # Errors
    ///
    /// Propagates engine input errors; none occur for catalog amounts.
    pub async fn invoke(&self, engine: &StateEngine) -> Result<BreakReport> {
        let (amount, summary) = {
            let mut rng = rand::thread_rng();
            (self.relief().amount(&mut rng), self.summary(&mut rng))
        };

        debug!(tool = self.name(), amount, "Invoking break tool");
        let levels = engine.apply_break(amount).await?;
        Ok(BreakReport::new(summary, self.emoji(), levels))
    }
}

impl std::fmt::Display for BreakTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BreakTool {
    type Err = ChillError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| ChillError::unknown_tool(s))
    }
}

/// Tool entry as listed over MCP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}
