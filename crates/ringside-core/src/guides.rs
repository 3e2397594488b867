//! Built-in guide tables.
//!
//! One [`GuideDef`] per tracked game mode, consumed by the generic
//! evaluator. The tables encode every gating shape the modes use: ALL-OF
//! chapters, grouped pick-one ANY-OF chapters, a one-per-side conjunction,
//! single-mission chapters, a grouped dual-path finale, an ungated
//! dual-path terminal, and a flat achievement checklist.

use ringside_common::rules::{ChapterRule, ChecklistItem, GuideDef, UnlockPredicate};

/// Category key for the story-mode guide.
pub const MYRISE: &str = "myrise";
/// Category key for the general-manager guide.
pub const MYGM: &str = "mygm";
/// Category key for the showcase guide.
pub const SHOWCASE: &str = "showcase";
/// Category key for the island guide.
pub const THE_ISLAND: &str = "the-island";
/// Category key for the flat achievements checklist.
pub const ACHIEVEMENTS: &str = "achievements";

/// Keys of every built-in guide, in display order.
pub const ALL_KEYS: [&str; 5] = [MYRISE, MYGM, SHOWCASE, THE_ISLAND, ACHIEVEMENTS];

/// All built-in guides, in display order.
#[must_use]
pub fn builtin_guides() -> Vec<GuideDef> {
    vec![
        myrise_guide(),
        mygm_guide(),
        showcase_guide(),
        island_guide(),
        achievements_guide(),
    ]
}

/// Look up a built-in guide by category key.
#[must_use]
pub fn builtin_guide(key: &str) -> Option<GuideDef> {
    builtin_guides().into_iter().find(|guide| guide.key == key)
}

/// Story mode: nine chapters ending in a two-path finale where choosing a
/// path locks the other until it is unchecked.
#[must_use]
pub fn myrise_guide() -> GuideDef {
    let ch2 = ["c2-m1", "c2-m2", "c2-m3"];
    let ch3 = ["c3-m1", "c3-m2", "c3-m3"];
    let ch4 = ["c4-ma", "c4-mb", "c4-mc", "c4-fa", "c4-fb", "c4-fc"];
    let ch6_male = ["c6-m1", "c6-m2", "c6-m3", "c6-m4"];
    let ch6_female = ["c6-f1", "c6-f2", "c6-f3", "c6-f4"];
    let ch9_reclaim = ["c9r-a", "c9r-b", "c9r-c"];
    let ch9_conquer = ["c9c-m1", "c9c-m2"];
    let ch9_all = ["c9r-a", "c9r-b", "c9r-c", "c9c-m1", "c9c-m2"];

    let mut guide = GuideDef::new(MYRISE, "MyRISE")
        .with_item(
            ChecklistItem::new("c1-m1", "Draft Night")
                .with_description("Pick your first character's personality.")
                .with_reward("Starter outfits"),
        )
        .with_item(
            ChecklistItem::new("c1-m2", "Target: Number One")
                .with_description("Choose the rival-promotion opening to unlock the Japan Dome.")
                .with_reward("Mutiny shirt"),
        );

    // Chapters 2 and 3 are pick-one story branches: checking one locks the
    // other two until it is unchecked.
    let ch2_titles = [
        ("Story A: The Rival Arrives", "Rival promotion background."),
        ("Story B: Indie Accomplice", "Independent circuit background."),
        ("Story C: MMA Assist", "MMA background."),
    ];
    for (id, (title, desc)) in ch2.iter().zip(ch2_titles) {
        guide = guide.with_item(
            ChecklistItem::new(*id, title)
                .with_description(desc)
                .with_group(ch2),
        );
    }
    let ch3_titles = [
        ("Story A: Kidnapped", "Bold and brash personality."),
        ("Story B: Unify and Join", "Comedic personality."),
        ("Story C: Pull the Trick", "Calculated personality."),
    ];
    for (id, (title, desc)) in ch3.iter().zip(ch3_titles) {
        guide = guide.with_item(
            ChecklistItem::new(*id, title)
                .with_description(desc)
                .with_group(ch3),
        );
    }

    // Chapter 4: six stories across two sides, one pick total.
    let ch4_titles = [
        "Male A: Breaking the Competition",
        "Male B: Clowning Around",
        "Male C: Third-Party Candidate",
        "Female A: The Filing Job",
        "Female B: The Unholy Trinity",
        "Female C: False Flag",
    ];
    for (id, title) in ch4.iter().zip(ch4_titles) {
        guide = guide.with_item(ChecklistItem::new(*id, title).with_group(ch4));
    }

    guide = guide.with_item(
        ChecklistItem::new("c5-m1", "Are You Ready?")
            .with_description("Unlocks with any personality.")
            .with_reward("No Mercy arena"),
    );

    // Chapter 6 needs one helper from each side; picks are exclusive only
    // within their own side.
    let ch6_male_titles = ["Drew McIntyre", "Jey Uso", "Seth Rollins", "Cody Rhodes"];
    for (id, title) in ch6_male.iter().zip(ch6_male_titles) {
        guide = guide.with_item(ChecklistItem::new(*id, title).with_group(ch6_male));
    }
    let ch6_female_titles = ["Becky Lynch", "Jade Cargill", "Charlotte Flair", "Rhea Ripley"];
    for (id, title) in ch6_female.iter().zip(ch6_female_titles) {
        guide = guide.with_item(ChecklistItem::new(*id, title).with_group(ch6_female));
    }

    guide = guide
        .with_item(ChecklistItem::new("c7-m1", "Alliance on the March"))
        .with_item(
            ChecklistItem::new("c8-m1", "Survival of the Fittest")
                .with_description("Complete Survivor Series.")
                .with_reward("Survivor Series arena"),
        );

    // Finale: two mutually exclusive endings. Reclaim allies are one pick
    // of three; the Conquer missions are linear with each other but locked
    // against the whole Reclaim side (and vice versa).
    let ch9_reclaim_titles = [
        ("Ally A: Legends", "Legend characters, convention arena"),
        ("Ally B: Indies", "Indie characters"),
        ("Ally C: 2K Past", "Previous MyPlayers, mocap studio"),
    ];
    for (id, (title, reward)) in ch9_reclaim.iter().zip(ch9_reclaim_titles) {
        guide = guide.with_item(
            ChecklistItem::new(*id, title)
                .with_reward(reward)
                .with_group(ch9_all),
        );
    }
    guide = guide
        .with_item(
            ChecklistItem::new("c9c-m1", "Welcome to the Mutiny")
                .with_description("Continue with your second character.")
                .with_group(ch9_reclaim),
        )
        .with_item(
            ChecklistItem::new("c9c-m2", "MutinyMania")
                .with_description("Final Conquer mission.")
                .with_reward("MutinyMania arena")
                .with_group(ch9_reclaim),
        );

    guide
        .with_chapter(ChapterRule::all_of("A New Era", ["c1-m1", "c1-m2"]))
        .with_chapter(ChapterRule::any_of("Mutiny", ch2))
        .with_chapter(ChapterRule::any_of("Unite", ch3))
        .with_chapter(ChapterRule::any_of("Investigate", ch4))
        .with_chapter(ChapterRule::all_of("Defend", ["c5-m1"]))
        .with_chapter(ChapterRule::new(
            "Reunite",
            UnlockPredicate::each_group_any([ch6_male.to_vec(), ch6_female.to_vec()]),
        ))
        .with_chapter(ChapterRule::all_of("Attack", ["c7-m1"]))
        .with_chapter(ChapterRule::all_of("Survive", ["c8-m1"]))
        .with_chapter(ChapterRule::any_of("The Finale", ch9_all))
}

/// General-manager mode: four strictly linear ALL-OF phases.
#[must_use]
pub fn mygm_guide() -> GuideDef {
    GuideDef::new(MYGM, "MyGM")
        .with_item(ChecklistItem::new("gm-p1-1", "Command Selection"))
        .with_item(ChecklistItem::new("gm-p1-2", "Smart Draft"))
        .with_item(ChecklistItem::new("gm-p1-3", "Opening Contracts"))
        .with_item(ChecklistItem::new("gm-p2-1", "Level 4 Rivalries"))
        .with_item(ChecklistItem::new("gm-p2-2", "Power Cards"))
        .with_item(ChecklistItem::new("gm-p2-3", "Ratings War"))
        .with_item(ChecklistItem::new("gm-p3-1", "Legends Draft"))
        .with_item(ChecklistItem::new("gm-p3-2", "Logistics Upgrades"))
        .with_item(
            ChecklistItem::new("gm-p4-hof", "Legendary Career")
                .with_description("Enter the Hall of Fame in first place."),
        )
        .with_chapter(ChapterRule::all_of(
            "The Draft and Setup",
            ["gm-p1-1", "gm-p1-2", "gm-p1-3"],
        ))
        .with_chapter(ChapterRule::all_of(
            "Season One",
            ["gm-p2-1", "gm-p2-2", "gm-p2-3"],
        ))
        .with_chapter(ChapterRule::all_of(
            "Global Expansion",
            ["gm-p3-1", "gm-p3-2"],
        ))
        .with_chapter(ChapterRule::all_of("Hall of Fame", ["gm-p4-hof"]))
}

/// Showcase mode: six single-objective matches in a strict chain.
#[must_use]
pub fn showcase_guide() -> GuideDef {
    let matches = [
        ("sh-m1-obj", "WrestleMania I: Hogan vs. Piper"),
        ("sh-m2-obj", "WrestleMania III: Hogan vs. Andre"),
        ("sh-m3-obj", "WrestleMania X: Razor vs. Shawn"),
        ("sh-m4-obj", "WrestleMania 13: Austin vs. Bret"),
        ("sh-m5-obj", "WrestleMania X-Seven: Rock vs. Austin"),
        ("sh-m6-obj", "Bonus: The Streak Ends"),
    ];

    let mut guide = GuideDef::new(SHOWCASE, "Showcase");
    for (id, title) in matches {
        guide = guide
            .with_item(
                ChecklistItem::new(id, title)
                    .with_description("Complete every in-match objective."),
            )
            .with_chapter(ChapterRule::all_of(title, [id]));
    }
    guide
}

/// Island mode: three ALL-OF zones and a throne room offering two
/// independent terminal bosses. The boss pair is deliberately ungrouped:
/// either can be checked, and checking one does not lock the other.
#[must_use]
pub fn island_guide() -> GuideDef {
    GuideDef::new(THE_ISLAND, "The Island")
        .with_item(ChecklistItem::new("i-z1-1", "Match 1: The Welcome"))
        .with_item(ChecklistItem::new("i-z1-2", "Match 2: Quicksand"))
        .with_item(ChecklistItem::new("i-z1-3", "Zone Boss: The Guardian"))
        .with_item(ChecklistItem::new("i-z2-1", "Match 1: Predators"))
        .with_item(ChecklistItem::new("i-z2-2", "Match 2: The Hunt"))
        .with_item(ChecklistItem::new("i-z2-3", "Zone Boss: The Beast"))
        .with_item(ChecklistItem::new("i-z3-1", "Match 1: Extreme Heat"))
        .with_item(ChecklistItem::new("i-z3-2", "Match 2: Eruption"))
        .with_item(ChecklistItem::new("i-z3-3", "Zone Boss: The Demon"))
        .with_item(
            ChecklistItem::new("i-z4-boss", "Final Battle: Tribal Chief")
                .with_description("Challenge the island's ruler."),
        )
        .with_item(
            ChecklistItem::new("i-z4-rival", "Final Battle: The Usurper")
                .with_description("Back the challenger instead."),
        )
        .with_chapter(ChapterRule::all_of(
            "The Beach",
            ["i-z1-1", "i-z1-2", "i-z1-3"],
        ))
        .with_chapter(ChapterRule::all_of(
            "The Jungle",
            ["i-z2-1", "i-z2-2", "i-z2-3"],
        ))
        .with_chapter(ChapterRule::all_of(
            "The Volcano",
            ["i-z3-1", "i-z3-2", "i-z3-3"],
        ))
        .with_chapter(ChapterRule::any_of(
            "The Throne",
            ["i-z4-boss", "i-z4-rival"],
        ))
}

/// Flat achievements checklist: no chapters, completion percentage derives
/// from the actual item count.
#[must_use]
pub fn achievements_guide() -> GuideDef {
    let achievements: [(&str, &str); 36] = [
        ("ach-show-1", "Day 1 Ish"),
        ("ach-show-2", "BANZAI!"),
        ("ach-show-3", "I Did It For The People"),
        ("ach-show-4", "The N.T.C"),
        ("ach-show-5", "The O.T.C"),
        ("ach-show-6", "Head of the Table"),
        ("ach-uni-1", "Mic'd Up"),
        ("ach-uni-2", "Enough Talk"),
        ("ach-uni-3", "Open Season"),
        ("ach-uni-4", "Wrestling Royalty"),
        ("ach-uni-5", "Biggest Nights of the Year"),
        ("ach-play-1", "Going Solo"),
        ("ach-play-2", "Underground Reign"),
        ("ach-play-3", "Back By Popular Demand"),
        ("ach-play-4", "This Is New"),
        ("ach-play-5", "Miraculous Comeback"),
        ("ach-play-6", "Impeccable Ring Awareness"),
        ("ach-play-7", "Recovery Deferred"),
        ("ach-fac-1", "Faction Wars Champion"),
        ("ach-fac-2", "Rise Through the Ranks"),
        ("ach-fac-3", "Loyalty Confirmed"),
        ("ach-fac-4", "Taste of Victory"),
        ("ach-fac-5", "Journey of a Lifetime"),
        ("ach-fac-6", "United States Champion"),
        ("ach-fac-7", "Live Event Legend"),
        ("ach-gm-1", "Host With The Most"),
        ("ach-gm-2", "GM Punk"),
        ("ach-gm-3", "Medical Bill"),
        ("ach-gm-4", "The 1%"),
        ("ach-isl-1", "Let's Go!"),
        ("ach-isl-2", "The Road to Glory"),
        ("ach-isl-3", "Terminally Online"),
        ("ach-rise-1", "The Draft and the Furious"),
        ("ach-rise-2", "Bold Moves"),
        ("ach-rise-3", "Legends Assemble"),
        ("ach-rise-4", "Mutiny Mastermind"),
    ];

    let mut guide = GuideDef::new(ACHIEVEMENTS, "Road to Platinum");
    for (id, title) in achievements {
        guide = guide.with_item(ChecklistItem::new(id, title));
    }
    guide
}
