//! Catalog data model.
//!
//! This module provides the static reference types shared across Ringside:
//! - Brand and wrestling style classifications
//! - Attribute stat blocks
//! - Wrestler and move records

use serde::{Deserialize, Serialize};

// ============================================================================
// Brands and styles
// ============================================================================

/// Roster brand a wrestler belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Brand {
    /// Monday flagship show.
    #[default]
    Raw,
    /// Friday flagship show.
    SmackDown,
    /// Developmental show.
    Nxt,
    /// Retired greats, unlockable roster.
    Legend,
}

impl Brand {
    /// All brands in display order.
    pub const ALL: [Self; 4] = [Self::Raw, Self::SmackDown, Self::Nxt, Self::Legend];

    /// Human-readable brand name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::SmackDown => "SmackDown",
            Self::Nxt => "NXT",
            Self::Legend => "Legend",
        }
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// In-ring style archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WrestlerStyle {
    /// Stand-up strikes and kicks.
    #[default]
    Striker,
    /// Slams and raw power.
    Powerhouse,
    /// Chain wrestling and submissions.
    Technician,
    /// Aerial offense from the ropes.
    HighFlyer,
    /// Ringside tactician, rarely wrestles.
    Manager,
}

impl WrestlerStyle {
    /// All styles in display order.
    pub const ALL: [Self; 5] = [
        Self::Striker,
        Self::Powerhouse,
        Self::Technician,
        Self::HighFlyer,
        Self::Manager,
    ];

    /// Human-readable style name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Striker => "Striker",
            Self::Powerhouse => "Powerhouse",
            Self::Technician => "Technician",
            Self::HighFlyer => "High Flyer",
            Self::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for WrestlerStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Attribute block for a wrestler, all values on a 0-99 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    /// Overall rating.
    pub overall: u8,
    /// Raw power.
    pub strength: u8,
    /// Mobility and balance.
    pub agility: u8,
    /// Hold and counter proficiency.
    pub technique: u8,
    /// Movement and strike speed.
    pub speed: u8,
    /// Damage mitigation.
    pub defense: u8,
    /// Comeback and kick-out capacity.
    pub resilience: u8,
}

impl Stats {
    /// Maximum value for any attribute.
    pub const MAX: u8 = 99;

    /// Create a stat block with an explicit overall rating.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        overall: u8,
        strength: u8,
        agility: u8,
        technique: u8,
        speed: u8,
        defense: u8,
        resilience: u8,
    ) -> Self {
        Self {
            overall,
            strength,
            agility,
            technique,
            speed,
            defense,
            resilience,
        }
    }

    /// Create a stat block whose overall is the rounded mean of the six
    /// attributes, the formula used for user-created wrestlers.
    #[must_use]
    pub fn with_computed_overall(
        strength: u8,
        agility: u8,
        technique: u8,
        speed: u8,
        defense: u8,
        resilience: u8,
    ) -> Self {
        let sum = u32::from(strength)
            + u32::from(agility)
            + u32::from(technique)
            + u32::from(speed)
            + u32::from(defense)
            + u32::from(resilience);
        // Integer round-half-up of sum / 6.
        let overall = ((sum + 3) / 6) as u8;
        Self::new(
            overall, strength, agility, technique, speed, defense, resilience,
        )
    }

    /// True when every attribute is within the 0-99 scale.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.overall <= Self::MAX
            && self.strength <= Self::MAX
            && self.agility <= Self::MAX
            && self.technique <= Self::MAX
            && self.speed <= Self::MAX
            && self.defense <= Self::MAX
            && self.resilience <= Self::MAX
    }
}

// ============================================================================
// Wrestlers
// ============================================================================

/// A roster entry: built-in or user-created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wrestler {
    /// Stable identifier; user-created entries use the `custom_` prefix.
    pub id: String,
    /// Ring name.
    pub name: String,
    /// Nickname shown alongside the ring name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Roster brand.
    pub brand: Brand,
    /// In-ring style.
    pub style: WrestlerStyle,
    /// Portrait image location.
    pub image_url: String,
    /// Billed country.
    pub country: String,
    /// Billed height in centimeters.
    pub height_cm: u16,
    /// Billed weight in kilograms.
    pub weight_kg: u16,
    /// Short biography.
    pub bio: String,
    /// Attribute block.
    pub stats: Stats,
}

impl Wrestler {
    /// Id prefix for user-created entries.
    pub const CUSTOM_PREFIX: &'static str = "custom_";

    /// True when this entry was authored by the user rather than shipped
    /// with the catalog.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.id.starts_with(Self::CUSTOM_PREFIX)
    }

    /// Display name including the alias when one exists.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} \"{}\"", self.name, alias),
            None => self.name.clone(),
        }
    }

    /// Case-insensitive match against ring name or alias, used by catalog
    /// search.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        if self.name.to_lowercase().contains(&query) {
            return true;
        }
        self.alias
            .as_ref()
            .is_some_and(|alias| alias.to_lowercase().contains(&query))
    }
}

// ============================================================================
// Moves
// ============================================================================

/// Classification of a move within a wrestler's move list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    /// Match-ending move.
    Finisher,
    /// Trademark move, weaker than a finisher.
    Signature,
    /// Chained strike sequence.
    Combo,
    /// Front-facing grapple.
    GrappleFront,
    /// Rear grapple.
    GrappleBack,
    /// Running attack.
    Running,
    /// Top-rope or springboard attack.
    Diving,
    /// Attack on a grounded opponent.
    Ground,
}

impl MoveCategory {
    /// Human-readable category name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Finisher => "Finisher",
            Self::Signature => "Signature",
            Self::Combo => "Combo",
            Self::GrappleFront => "Front Grapple",
            Self::GrappleBack => "Back Grapple",
            Self::Running => "Running",
            Self::Diving => "Diving",
            Self::Ground => "Ground",
        }
    }
}

impl std::fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single move in a wrestler's move list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Stable identifier.
    pub id: String,
    /// Owning wrestler's id.
    pub wrestler_id: String,
    /// Move name.
    pub name: String,
    /// Move classification.
    pub category: MoveCategory,
    /// Controller input sequence, e.g. `["RT", "A"]`.
    pub input: Vec<String>,
    /// Optional flavor description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Damage rating, 0-100.
    pub damage: u8,
}

impl Move {
    /// Input sequence rendered for display, e.g. `RT + A`.
    #[must_use]
    pub fn input_display(&self) -> String {
        self.input.join(" + ")
    }
}
