//! Matchup advice generation.
//!
//! Advice comes from a pluggable [`AdviceGenerator`] backend. The app never
//! surfaces a generator failure to the user: [`advice_or_fallback`] maps
//! every failure class to a canned coach line, so the advice panel always
//! has something to say.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use ringside_common::types::{Move, Stats, Wrestler, WrestlerStyle};

/// Canned line shown when no generator credential is configured.
const FALLBACK_NO_CREDENTIAL: &str = "Coach's corner is closed right now: no advice service is \
     configured. Work the fundamentals and wear them down.";

/// Canned line shown when the generator cannot be reached.
const FALLBACK_OFFLINE: &str = "The coach is offline. Stick to the game plan: control the pace, \
     target a limb, and save your finisher for when it counts.";

/// Canned line shown when the generator returns nothing usable.
const FALLBACK_EMPTY: &str = "The coach had nothing to add this time. Trust your instincts and \
     keep the pressure on.";

/// Errors from an advice backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdviceError {
    /// No credential configured for the backend.
    #[error("advice backend credential is not configured")]
    MissingCredential,

    /// The backend could not be reached or refused the request.
    #[error("advice backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an empty or whitespace-only body.
    #[error("advice backend returned an empty response")]
    EmptyResponse,
}

impl AdviceError {
    /// The canned line to show in place of generated advice.
    #[must_use]
    pub const fn fallback_text(&self) -> &'static str {
        match self {
            Self::MissingCredential => FALLBACK_NO_CREDENTIAL,
            Self::Unavailable(_) => FALLBACK_OFFLINE,
            Self::EmptyResponse => FALLBACK_EMPTY,
        }
    }
}

/// Everything a backend needs to know about one matchup.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupSummary {
    /// Ring name of the wrestler being played.
    pub name: String,
    /// Nickname, when one exists.
    pub alias: Option<String>,
    /// In-ring style.
    pub style: WrestlerStyle,
    /// Attribute block.
    pub stats: Stats,
    /// Move names in list order.
    pub moves: Vec<String>,
    /// Opponent's style, when the matchup is known.
    pub opponent_style: Option<WrestlerStyle>,
}

impl MatchupSummary {
    /// Summarize a wrestler and their move list.
    #[must_use]
    pub fn from_wrestler(wrestler: &Wrestler, moves: &[Move]) -> Self {
        Self {
            name: wrestler.name.clone(),
            alias: wrestler.alias.clone(),
            style: wrestler.style,
            stats: wrestler.stats,
            moves: moves.iter().map(|m| m.name.clone()).collect(),
            opponent_style: None,
        }
    }

    /// Set the opponent's style.
    #[must_use]
    pub fn against(mut self, style: WrestlerStyle) -> Self {
        self.opponent_style = Some(style);
        self
    }

    /// Render the summary as the prompt sent to a text backend.
    #[must_use]
    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            "You are a pro wrestling coach. Give short, practical match advice.\n\
             Wrestler: {}",
            self.name
        );
        if let Some(alias) = &self.alias {
            prompt.push_str(&format!(" \"{alias}\""));
        }
        prompt.push_str(&format!(
            "\nStyle: {}\nOverall: {} (STR {}, AGI {}, TEC {}, SPD {}, DEF {}, RES {})",
            self.style,
            self.stats.overall,
            self.stats.strength,
            self.stats.agility,
            self.stats.technique,
            self.stats.speed,
            self.stats.defense,
            self.stats.resilience,
        ));
        if !self.moves.is_empty() {
            prompt.push_str(&format!("\nMoves: {}", self.moves.join(", ")));
        }
        if let Some(opponent) = self.opponent_style {
            prompt.push_str(&format!("\nOpponent style: {opponent}"));
        }
        prompt
    }
}

/// A backend that turns a matchup summary into coaching text.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Backend name, for logging.
    fn name(&self) -> &str;

    /// Generate advice for one matchup.
    async fn advise(&self, summary: &MatchupSummary) -> Result<String, AdviceError>;
}

/// Ask a backend for advice, substituting a canned line on any failure.
///
/// A whitespace-only success is treated as [`AdviceError::EmptyResponse`].
pub async fn advice_or_fallback(
    generator: &dyn AdviceGenerator,
    summary: &MatchupSummary,
) -> String {
    let result = match generator.advise(summary).await {
        Ok(text) if text.trim().is_empty() => Err(AdviceError::EmptyResponse),
        other => other,
    };
    match result {
        Ok(text) => text,
        Err(err) => {
            warn!(backend = generator.name(), error = %err, "advice generation failed, using fallback");
            err.fallback_text().to_string()
        }
    }
}

/// Offline backend producing deterministic style-based advice.
///
/// Used when no external backend is configured, and as the test double.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleBookGenerator;

impl StyleBookGenerator {
    /// Playbook line for one style.
    const fn playbook(style: WrestlerStyle) -> &'static str {
        match style {
            WrestlerStyle::Striker => "Keep the match standing and chain strikes into your signature.",
            WrestlerStyle::Powerhouse => "Slow the pace, absorb hits, and land the big slams.",
            WrestlerStyle::Technician => "Ground them early and work submissions on a weakened limb.",
            WrestlerStyle::HighFlyer => "Stay mobile, use the ropes, and dive only when they are down.",
            WrestlerStyle::Manager => "Stay out of exchanges and let interference set up the win.",
        }
    }
}

#[async_trait]
impl AdviceGenerator for StyleBookGenerator {
    fn name(&self) -> &str {
        "style-book"
    }

    async fn advise(&self, summary: &MatchupSummary) -> Result<String, AdviceError> {
        let mut advice = format!(
            "{}: {}",
            summary.name,
            Self::playbook(summary.style)
        );
        if let Some(opponent) = summary.opponent_style {
            advice.push_str(&format!(
                " Against a {opponent}, expect them to {}",
                match opponent {
                    WrestlerStyle::Striker => "trade strikes; close the distance.",
                    WrestlerStyle::Powerhouse => "overpower you; do not grapple head-on.",
                    WrestlerStyle::Technician => "hunt submissions; break holds early.",
                    WrestlerStyle::HighFlyer => "take to the air; keep them cornered.",
                    WrestlerStyle::Manager => "play for time; force the action.",
                }
            ));
        }
        Ok(advice)
    }
}
