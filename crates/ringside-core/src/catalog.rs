//! Static roster and move catalog.
//!
//! The catalog is read-only reference data loaded at startup: a curated
//! roster of current stars plus a legends table synthesized from name and
//! style pairs. Legend stats come from a per-name seeded RNG, so the same
//! roster is produced on every run and every device.

use ringside_common::types::{Brand, Move, MoveCategory, Stats, Wrestler, WrestlerStyle};

/// Damage rating of a synthesized finisher.
const FINISHER_DAMAGE: u8 = 90;
/// Damage rating of a synthesized signature move.
const SIGNATURE_DAMAGE: u8 = 85;
/// Damage rating of the shared striking combo.
const COMBO_DAMAGE: u8 = 70;

/// Display name used when a move's owner is not in the catalog.
pub const UNKNOWN_WRESTLER: &str = "Unknown";

/// A move joined with its owner's display name, for the moves library.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveListing {
    /// Ring name of the owning wrestler, or [`UNKNOWN_WRESTLER`].
    pub wrestler_name: String,
    /// The move itself.
    pub mv: Move,
}

/// The three basic moves every roster member ships with.
#[must_use]
pub fn basic_move_set(wrestler_id: &str, name: &str) -> Vec<Move> {
    vec![
        Move {
            id: format!("m-{wrestler_id}-f"),
            wrestler_id: wrestler_id.to_string(),
            name: format!("{name} Finisher"),
            category: MoveCategory::Finisher,
            input: vec!["RT".to_string(), "A".to_string()],
            description: None,
            damage: FINISHER_DAMAGE,
        },
        Move {
            id: format!("m-{wrestler_id}-s"),
            wrestler_id: wrestler_id.to_string(),
            name: format!("{name} Signature"),
            category: MoveCategory::Signature,
            input: vec!["RT".to_string(), "X".to_string()],
            description: None,
            damage: SIGNATURE_DAMAGE,
        },
        Move {
            id: format!("m-{wrestler_id}-c"),
            wrestler_id: wrestler_id.to_string(),
            name: "Striking Combo".to_string(),
            category: MoveCategory::Combo,
            input: vec![
                "X".to_string(),
                "X".to_string(),
                "X".to_string(),
                "A".to_string(),
            ],
            description: None,
            damage: COMBO_DAMAGE,
        },
    ]
}

/// Read-only wrestler and move catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    wrestlers: Vec<Wrestler>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Build the shipped catalog: curated roster plus synthesized legends,
    /// sorted by ring name.
    #[must_use]
    pub fn new() -> Self {
        let mut wrestlers = curated_roster();
        wrestlers.extend(
            LEGEND_TABLE
                .iter()
                .map(|&(name, style)| synthesize_legend(name, style)),
        );
        Self::from_wrestlers(wrestlers)
    }

    /// Build a catalog over an explicit roster, sorted by ring name.
    #[must_use]
    pub fn from_wrestlers(mut wrestlers: Vec<Wrestler>) -> Self {
        wrestlers.sort_by(|a, b| a.name.cmp(&b.name));
        Self { wrestlers }
    }

    /// Number of roster entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wrestlers.len()
    }

    /// True for an empty catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wrestlers.is_empty()
    }

    /// The full roster in name order.
    #[must_use]
    pub fn wrestlers(&self) -> &[Wrestler] {
        &self.wrestlers
    }

    /// Look up a wrestler by id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Wrestler> {
        self.wrestlers.iter().find(|w| w.id == id)
    }

    /// Roster entries matching a case-insensitive name/alias query and
    /// optional brand and style filters. An empty query matches everyone.
    #[must_use]
    pub fn search(
        &self,
        query: &str,
        brand: Option<Brand>,
        style: Option<WrestlerStyle>,
    ) -> Vec<&Wrestler> {
        self.wrestlers
            .iter()
            .filter(|w| w.matches_query(query))
            .filter(|w| brand.map_or(true, |b| w.brand == b))
            .filter(|w| style.map_or(true, |s| w.style == s))
            .collect()
    }

    /// A wrestler's move list. Unknown ids have no moves.
    #[must_use]
    pub fn moves_for(&self, wrestler_id: &str) -> Vec<Move> {
        self.by_id(wrestler_id)
            .map(|w| basic_move_set(&w.id, &w.name))
            .unwrap_or_default()
    }

    /// Every move in the catalog joined with its owner's name, filtered by
    /// a case-insensitive move-name query. An empty query lists everything.
    #[must_use]
    pub fn all_moves(&self, query: &str) -> Vec<MoveListing> {
        let query = query.to_lowercase();
        self.wrestlers
            .iter()
            .flat_map(|w| {
                basic_move_set(&w.id, &w.name)
                    .into_iter()
                    .map(|mv| MoveListing {
                        wrestler_name: self
                            .by_id(&mv.wrestler_id)
                            .map_or_else(|| UNKNOWN_WRESTLER.to_string(), |w| w.name.clone()),
                        mv,
                    })
            })
            .filter(|listing| query.is_empty() || listing.mv.name.to_lowercase().contains(&query))
            .collect()
    }

    /// The highest-rated roster entries by overall, descending.
    #[must_use]
    pub fn top_by_overall(&self, limit: usize) -> Vec<&Wrestler> {
        let mut ranked: Vec<&Wrestler> = self.wrestlers.iter().collect();
        ranked.sort_by(|a, b| b.stats.overall.cmp(&a.stats.overall));
        ranked.truncate(limit);
        ranked
    }
}

/// Stable per-name seed for legend synthesis (FNV-1a over the name).
fn name_seed(name: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in name.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Catalog id for a synthesized entry: lowercased name, spaces to
/// underscores, everything else alphanumeric-only.
fn legend_id(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("w_{slug}")
}

/// Deterministically synthesize a legend entry from its name and style.
fn synthesize_legend(name: &str, style: WrestlerStyle) -> Wrestler {
    let mut rng = fastrand::Rng::with_seed(name_seed(name));
    let base: u8 = 85;
    let mut roll = |penalty: u8| -> u8 { (base + rng.u8(0..10) - penalty).min(Stats::MAX) };

    let stats = Stats::new(
        roll(0),
        roll(0),
        roll(5),
        roll(0),
        roll(5),
        roll(0),
        roll(0),
    );
    let height_cm = 180 + rng.u16(0..20);
    let weight_kg = 90 + rng.u16(0..40);

    Wrestler {
        id: legend_id(name),
        name: name.to_string(),
        alias: None,
        brand: Brand::Legend,
        style,
        image_url: String::new(),
        country: "USA".to_string(),
        height_cm,
        weight_kg,
        bio: format!("Legendary superstar {name}, known for shaping the industry."),
        stats,
    }
}

/// Shorthand for a curated roster entry.
#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    alias: Option<&str>,
    brand: Brand,
    style: WrestlerStyle,
    country: &str,
    height_cm: u16,
    weight_kg: u16,
    bio: &str,
    stats: Stats,
) -> Wrestler {
    Wrestler {
        id: id.to_string(),
        name: name.to_string(),
        alias: alias.map(ToString::to_string),
        brand,
        style,
        image_url: String::new(),
        country: country.to_string(),
        height_cm,
        weight_kg,
        bio: bio.to_string(),
        stats,
    }
}

/// Hand-written current roster.
fn curated_roster() -> Vec<Wrestler> {
    use Brand::{Nxt, Raw, SmackDown};
    use WrestlerStyle::{HighFlyer, Manager, Powerhouse, Striker, Technician};

    vec![
        entry(
            "raw_002",
            "Seth Rollins",
            Some("The Visionary"),
            Raw,
            Technician,
            "USA",
            185,
            98,
            "The Visionary and Revolutionary.",
            Stats::new(95, 82, 92, 96, 88, 85, 95),
        ),
        entry(
            "raw_015",
            "Asuka",
            Some("The Empress of Tomorrow"),
            Raw,
            Striker,
            "Japan",
            160,
            62,
            "Nobody is ready for Asuka.",
            Stats::new(90, 75, 88, 92, 85, 85, 90),
        ),
        entry(
            "raw_018",
            "Becky Lynch",
            Some("The Man"),
            Raw,
            Technician,
            "Ireland",
            168,
            61,
            "Big Time Becks.",
            Stats::new(93, 76, 82, 94, 80, 88, 98),
        ),
        entry(
            "raw_025",
            "CM Punk",
            Some("Best in the World"),
            Raw,
            Striker,
            "USA",
            188,
            99,
            "The voice of the voiceless.",
            Stats::new(94, 80, 82, 92, 78, 88, 96),
        ),
        entry(
            "raw_034",
            "Gunther",
            Some("The Ring General"),
            Raw,
            Powerhouse,
            "Austria",
            193,
            113,
            "Chops first, questions later.",
            Stats::new(96, 95, 70, 94, 75, 95, 98),
        ),
        entry(
            "raw_060",
            "Rey Mysterio",
            Some("The Master of the 619"),
            Raw,
            HighFlyer,
            "USA",
            168,
            79,
            "The greatest underdog in history.",
            Stats::new(88, 60, 95, 90, 92, 75, 85),
        ),
        entry(
            "raw_062",
            "Rhea Ripley",
            Some("Mami"),
            Raw,
            Striker,
            "Australia",
            171,
            75,
            "Brutality never looked so good.",
            Stats::new(96, 94, 80, 85, 80, 90, 95),
        ),
        entry(
            "raw_010",
            "Adam Pearce",
            None,
            Raw,
            Manager,
            "USA",
            188,
            110,
            "General manager keeping the locker room in line.",
            Stats::new(72, 70, 60, 80, 55, 65, 65),
        ),
        entry(
            "sd_001",
            "Cody Rhodes",
            Some("The American Nightmare"),
            SmackDown,
            Technician,
            "USA",
            185,
            100,
            "Finished the story.",
            Stats::new(95, 84, 86, 90, 84, 86, 96),
        ),
        entry(
            "sd_002",
            "Roman Reigns",
            Some("The Tribal Chief"),
            SmackDown,
            Powerhouse,
            "USA",
            191,
            120,
            "Head of the table.",
            Stats::new(97, 95, 78, 85, 80, 92, 98),
        ),
        entry(
            "sd_003",
            "Jacob Fatu",
            Some("The Samoan Werewolf"),
            SmackDown,
            Powerhouse,
            "USA",
            185,
            113,
            "Unchained and unhinged.",
            Stats::new(89, 92, 84, 75, 82, 84, 92),
        ),
        entry(
            "sd_004",
            "Bianca Belair",
            Some("The EST"),
            SmackDown,
            Powerhouse,
            "USA",
            170,
            73,
            "The strongest, fastest, roughest, toughest.",
            Stats::new(92, 90, 90, 82, 90, 82, 90),
        ),
        entry(
            "nxt_001",
            "Oba Femi",
            Some("The Ruler"),
            Nxt,
            Powerhouse,
            "Nigeria",
            193,
            122,
            "Developmental's immovable champion.",
            Stats::new(86, 95, 75, 72, 74, 85, 88),
        ),
        entry(
            "nxt_002",
            "Roxanne Perez",
            Some("The Prodigy"),
            Nxt,
            HighFlyer,
            "USA",
            157,
            52,
            "Youngest champion in brand history.",
            Stats::new(84, 62, 90, 85, 88, 74, 84),
        ),
    ]
}

/// Legend roster synthesized at startup: (name, style) pairs.
const LEGEND_TABLE: [(&str, WrestlerStyle); 24] = [
    ("Stone Cold Steve Austin", WrestlerStyle::Striker),
    ("The Rock", WrestlerStyle::Striker),
    ("Hulk Hogan", WrestlerStyle::Powerhouse),
    ("Undertaker", WrestlerStyle::Powerhouse),
    ("Kane", WrestlerStyle::Powerhouse),
    ("Shawn Michaels", WrestlerStyle::HighFlyer),
    ("Bret Hart", WrestlerStyle::Technician),
    ("Kurt Angle", WrestlerStyle::Technician),
    ("Eddie Guerrero", WrestlerStyle::HighFlyer),
    ("Rob Van Dam", WrestlerStyle::HighFlyer),
    ("Ricky Steamboat", WrestlerStyle::Technician),
    ("Mr. Perfect", WrestlerStyle::Technician),
    ("Macho Man Randy Savage", WrestlerStyle::HighFlyer),
    ("Ultimate Warrior", WrestlerStyle::Powerhouse),
    ("Yokozuna", WrestlerStyle::Powerhouse),
    ("Vader", WrestlerStyle::Powerhouse),
    ("Goldberg", WrestlerStyle::Powerhouse),
    ("Kevin Nash", WrestlerStyle::Powerhouse),
    ("Razor Ramon", WrestlerStyle::Striker),
    ("Mick Foley", WrestlerStyle::Striker),
    ("Lita", WrestlerStyle::HighFlyer),
    ("Trish Stratus", WrestlerStyle::Striker),
    ("Jimmy Hart", WrestlerStyle::Manager),
    ("Paul Bearer", WrestlerStyle::Manager),
];
