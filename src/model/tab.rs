use serde::{Deserialize, Serialize};

use crate::model::ui_state::LifeJob;

/// At most two life jobs ever get a tab.
pub const MAX_LIFE_JOBS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeJobSlot {
    First,
    Second,
}

impl LifeJobSlot {
    pub fn index(self) -> usize {
        match self {
            LifeJobSlot::First => 0,
            LifeJobSlot::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(LifeJobSlot::First),
            1 => Some(LifeJobSlot::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Tab {
    #[default]
    World,
    Status,
    Inventory,
    Skills,
    Maps,
    Npc,
    LifeJob(LifeJobSlot),
}

impl Tab {
    pub const TOP_ROW: [Tab; 4] = [Tab::World, Tab::Status, Tab::Inventory, Tab::Skills];
    pub const FIXED_BOTTOM_ROW: [Tab; 2] = [Tab::Maps, Tab::Npc];

    /// Stable identifier used in the persisted state.
    pub fn id(self) -> &'static str {
        match self {
            Tab::World => "WORLD",
            Tab::Status => "STATUS",
            Tab::Inventory => "INVENTORY",
            Tab::Skills => "SKILLS",
            Tab::Maps => "MAPS",
            Tab::Npc => "NPC",
            Tab::LifeJob(LifeJobSlot::First) => "LIFE_JOB_1",
            Tab::LifeJob(LifeJobSlot::Second) => "LIFE_JOB_2",
        }
    }

    pub fn is_life_job(self) -> bool {
        matches!(self, Tab::LifeJob(_))
    }

    /// Case-insensitive lookup of canonical ids and legacy aliases.
    /// Life-job names are not known here; see [`normalize_tab`].
    fn from_alias(raw: &str) -> Option<Tab> {
        let tab = match raw.trim().to_ascii_uppercase().as_str() {
            "WORLD" | "MAIN" | "HOME" => Tab::World,
            "STATUS" | "CHAR" | "CHARACTER" | "STATS" => Tab::Status,
            "INVENTORY" | "INV" | "ITEMS" => Tab::Inventory,
            "SKILLS" | "SKILL" => Tab::Skills,
            "MAPS" | "MAP" => Tab::Maps,
            "NPC" | "NPCS" => Tab::Npc,
            "LIFE_JOB_1" | "LIFE1" => Tab::LifeJob(LifeJobSlot::First),
            "LIFE_JOB_2" | "LIFE2" => Tab::LifeJob(LifeJobSlot::Second),
            _ => return None,
        };
        Some(tab)
    }
}

impl From<Tab> for String {
    fn from(tab: Tab) -> Self {
        tab.id().to_string()
    }
}

// Unknown ids fall back to World; gating happens in `normalize_tab`.
impl From<String> for Tab {
    fn from(raw: String) -> Self {
        Tab::from_alias(&raw).unwrap_or_default()
    }
}

/// Resolve any tab identifier (canonical, legacy alias, or life-job name)
/// to a tab that may actually be shown. Unknown ids and locked or missing
/// life jobs resolve to [`Tab::World`].
pub fn normalize_tab(raw: &str, life_jobs: &[LifeJob]) -> Tab {
    let trimmed = raw.trim();

    let tab = Tab::from_alias(trimmed).or_else(|| {
        life_jobs
            .iter()
            .take(MAX_LIFE_JOBS)
            .position(|job| job.name.eq_ignore_ascii_case(trimmed))
            .and_then(LifeJobSlot::from_index)
            .map(Tab::LifeJob)
    });

    gate(tab.unwrap_or_default(), life_jobs)
}

/// Redirect gated-out tabs to the default tab.
pub fn gate(tab: Tab, life_jobs: &[LifeJob]) -> Tab {
    match tab {
        Tab::LifeJob(slot) => match life_jobs.get(slot.index()) {
            Some(job) if job.unlocked => tab,
            _ => Tab::World,
        },
        other => other,
    }
}
