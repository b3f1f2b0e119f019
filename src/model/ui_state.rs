use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::tab::{LifeJobSlot, Tab, MAX_LIFE_JOBS};
use crate::model::tactical::{PersonaMode, TacticalState};

/// Marker prepended to every line the player submits.
pub const PLAYER_MARKER: &str = "> ";

/* =========================
   Shell State
   ========================= */

/// Everything the shell renders. Stats, inventory and narration are
/// placeholders until a real engine feeds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub active_tab: Tab,
    pub character: CharacterSummary,
    pub world: WorldSnapshot,
    pub inventory: InventorySnapshot,
    pub skills: Vec<Skill>,
    pub regions: Vec<Region>,
    pub npcs: Vec<Npc>,
    pub life_jobs: Vec<LifeJob>,

    /// Recipe picked on a life-job tab, waiting for cancel/execute.
    #[serde(default)]
    pub pending_recipe: Option<usize>,
}

impl UiState {
    pub fn life_job(&self, slot: LifeJobSlot) -> Option<&LifeJob> {
        self.life_jobs.iter().take(MAX_LIFE_JOBS).nth(slot.index())
    }

    /// Append a player line, evicting the oldest entries past `limit`.
    pub fn push_input(&mut self, text: &str, limit: usize) {
        let log = &mut self.world.input_log;
        log.push(format!("{PLAYER_MARKER}{text}"));
        self.trim_input_log(limit);
    }

    /// Drop the oldest entries until at most `limit` remain.
    pub fn trim_input_log(&mut self, limit: usize) {
        let log = &mut self.world.input_log;
        if log.len() > limit {
            let overflow = log.len() - limit;
            log.drain(..overflow);
        }
    }

    /// One turn passes for every active skill on cooldown.
    pub fn tick_cooldowns(&mut self) {
        for skill in self.skills.iter_mut().filter(|s| s.kind == SkillKind::Active) {
            skill.cooldown_remaining = skill.cooldown_remaining.saturating_sub(1);
        }
    }
}

/* =========================
   Character
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub name: String,
    pub titles: Vec<String>,
    pub level: u32,
    pub xp: u32,
    pub xp_required: u32,
    pub hp: i32,
    pub mp: i32,

    /// STR, AGI, VIT, ...
    pub attributes: BTreeMap<String, i32>,
    pub combat: CombatStats,
    pub fatigue: FatiguePool,
    pub conditions: Vec<String>,

    /// Slot → item name
    pub equipped: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: i32,
    pub defense: i32,
    pub crit_rate: u32,
    pub evasion: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatiguePool {
    pub current: u32,
    pub max: u32,
}

/* =========================
   World
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub location: String,
    pub facing: String,
    pub time_12h: String,
    pub date: String,
    pub world_tick: u64,
    pub environment: String,
    pub prose: Vec<String>,
    pub persona: PersonaMode,
    pub tactical: TacticalState,

    /// Player-submitted lines only.
    pub input_log: Vec<String>,
}

/* =========================
   Inventory
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub currency_name: String,
    pub currency: u64,
    pub categories: BTreeMap<String, Vec<ItemStack>>,
    pub recent_changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub quantity: u32,
}

/* =========================
   Skills
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Active,
    Passive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub mastery: String,
    pub kind: SkillKind,

    /// Turns, not seconds.
    pub cooldown_remaining: u32,
    pub cooldown_max: u32,
}

/* =========================
   Maps / NPCs
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub discovered: bool,
    #[serde(default)]
    pub children: Vec<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Neutral,
    Ally,
    Friend,
    Rival,
    Nemesis,
    Lover,
}

impl Relation {
    pub fn label(self) -> &'static str {
        match self {
            Relation::Neutral => "Neutral",
            Relation::Ally => "Ally",
            Relation::Friend => "Friend",
            Relation::Rival => "Rival",
            Relation::Nemesis => "Nemesis",
            Relation::Lover => "Lover",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub role: String,
    pub relation: Relation,
}

/* =========================
   Life Jobs
   ========================= */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeJob {
    pub name: String,
    pub unlocked: bool,
    pub advisory: Vec<String>,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub requirements: String,
    /// Percent, 0..=100
    pub success_odds: u8,
}

/* =========================
   Defaults
   ========================= */

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_tab: Tab::World,
            character: CharacterSummary::default(),
            world: WorldSnapshot::default(),
            inventory: InventorySnapshot::default(),
            skills: vec![
                Skill {
                    name: "Piercing Lunge".into(),
                    description: "Fast linear thrust with increased crit rate.".into(),
                    mastery: "Novice".into(),
                    kind: SkillKind::Active,
                    cooldown_remaining: 0,
                    cooldown_max: 3,
                },
                Skill {
                    name: "Flame Coil".into(),
                    description: "Mid-range fire arc that can Ignite.".into(),
                    mastery: "Novice".into(),
                    kind: SkillKind::Active,
                    cooldown_remaining: 2,
                    cooldown_max: 4,
                },
                Skill {
                    name: "Night Sight".into(),
                    description: "See shapes clearly in low light.".into(),
                    mastery: "Novice".into(),
                    kind: SkillKind::Passive,
                    cooldown_remaining: 0,
                    cooldown_max: 0,
                },
            ],
            regions: vec![Region {
                name: "Eldrith Wilds".into(),
                discovered: true,
                children: vec![
                    Region {
                        name: "Whispering Thicket".into(),
                        discovered: true,
                        children: vec![Region {
                            name: "Hollow Stump".into(),
                            discovered: false,
                            children: Vec::new(),
                        }],
                    },
                    Region {
                        name: "Ashen Ford".into(),
                        discovered: false,
                        children: Vec::new(),
                    },
                ],
            }],
            npcs: vec![
                Npc {
                    name: "Old Marrow".into(),
                    role: "Herbalist".into(),
                    relation: Relation::Neutral,
                },
                Npc {
                    name: "Sable".into(),
                    role: "Wandering Blade".into(),
                    relation: Relation::Rival,
                },
            ],
            life_jobs: vec![LifeJob {
                name: "Alchemy".into(),
                unlocked: false,
                advisory: vec![
                    "The sharp smell of tincture clings to your fingers; vials clink softly in your pack."
                        .into(),
                    "Choose what you brew like you choose who you trust: sparingly.".into(),
                ],
                recipes: vec![
                    Recipe {
                        name: "Minor Healing Draught".into(),
                        requirements: "Herb ×2, Vial ×1".into(),
                        success_odds: 42,
                    },
                    Recipe {
                        name: "Bitter Tonic".into(),
                        requirements: "Root ×1, Vial ×1".into(),
                        success_odds: 55,
                    },
                ],
            }],
            pending_recipe: None,
        }
    }
}

impl Default for CharacterSummary {
    fn default() -> Self {
        let attributes = ["STR", "AGI", "VIT", "INT", "DEX", "LUK"]
            .into_iter()
            .map(|k| (k.to_string(), 10))
            .collect();

        let mut equipped = BTreeMap::new();
        equipped.insert("Mainhand".into(), "Iron Dagger".into());
        equipped.insert("Offhand".into(), "Empty".into());

        Self {
            name: "MC".into(),
            titles: Vec::new(),
            level: 1,
            xp: 0,
            xp_required: 135,
            hp: 30,
            mp: 10,
            attributes,
            combat: CombatStats {
                attack: 12,
                defense: 8,
                crit_rate: 5,
                evasion: 4,
            },
            fatigue: FatiguePool { current: 0, max: 100 },
            conditions: Vec::new(),
            equipped,
        }
    }
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            location: "Whispering Thicket".into(),
            facing: "NorthEast".into(),
            time_12h: "09:00 PM".into(),
            date: "Day 1, Cycle 1".into(),
            world_tick: 0,
            environment: "Midnight-green fog, wet bark, and distant insect-chime.".into(),
            prose: vec![
                "The thicket breathes in slow waves, leaves slick with cold dew.".into(),
                "Somewhere deeper, something small scrapes stone, then stops.".into(),
                "Your own footsteps feel too loud, as if the forest is counting them.".into(),
            ],
            persona: PersonaMode::Kyra,
            tactical: TacticalState::default(),
            input_log: Vec::new(),
        }
    }
}

impl Default for InventorySnapshot {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            "Consumables".to_string(),
            vec![ItemStack {
                name: "Healing Potion".into(),
                quantity: 2,
            }],
        );
        categories.insert(
            "Weapons".to_string(),
            vec![ItemStack {
                name: "Iron Dagger".into(),
                quantity: 1,
            }],
        );

        Self {
            currency_name: "Hypotites".into(),
            currency: 10,
            categories,
            recent_changes: Vec::new(),
        }
    }
}
