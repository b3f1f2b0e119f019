//! Pure view models. Nothing here touches egui, storage or the network;
//! `ui::center_panel` paints whatever these functions return.

use crate::model::tab::{gate, LifeJobSlot, Tab, MAX_LIFE_JOBS};
use crate::model::tactical::{format_cooldown, format_runtime_hhmm};
use crate::model::ui_state::{Region, SkillKind, UiState};

const PROMPT_LINE: &str = "What will you do?";
const MAX_PROSE_LINES: usize = 4;
const MAX_RECENT_CHANGES: usize = 3;
const BOTTOM_ROW_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLimits {
    /// How many player lines the world log block shows.
    pub world_log_visible: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            world_log_visible: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabButton {
    pub tab: Tab,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLayout {
    pub top: Vec<TabButton>,
    pub bottom: Vec<TabButton>,
}

impl TabLayout {
    pub fn contains(&self, tab: Tab) -> bool {
        self.top.iter().chain(&self.bottom).any(|b| b.tab == tab)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Plain,
    Muted,
    /// Each line is a pickable option.
    Choice { selected: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelBlock {
    pub title: String,
    pub lines: Vec<String>,
    pub style: BlockStyle,
}

impl PanelBlock {
    fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            style: BlockStyle::Plain,
        }
    }

    fn muted(mut self) -> Self {
        self.style = BlockStyle::Muted;
        self
    }
}

/// Which of the two mutually exclusive bottom bars is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottomBar {
    Input,
    Actions,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub layout: TabLayout,
    pub active: Tab,
    pub blocks: Vec<PanelBlock>,
    pub log: Option<PanelBlock>,
    pub bottom_bar: BottomBar,
}

pub fn tab_layout(state: &UiState) -> TabLayout {
    let button = |tab: Tab| TabButton {
        tab,
        label: tab.id().to_string(),
    };

    let top = Tab::TOP_ROW.into_iter().map(button).collect();

    let mut bottom: Vec<TabButton> = Tab::FIXED_BOTTOM_ROW.into_iter().map(button).collect();
    for (index, job) in state.life_jobs.iter().take(MAX_LIFE_JOBS).enumerate() {
        if !job.unlocked {
            continue;
        }
        if let Some(slot) = LifeJobSlot::from_index(index) {
            bottom.push(TabButton {
                tab: Tab::LifeJob(slot),
                label: job.name.to_uppercase(),
            });
        }
    }
    bottom.truncate(BOTTOM_ROW_WIDTH);

    TabLayout { top, bottom }
}

pub fn bottom_bar_for(tab: Tab) -> BottomBar {
    match tab {
        Tab::World => BottomBar::Input,
        Tab::LifeJob(_) => BottomBar::Actions,
        _ => BottomBar::Hidden,
    }
}

/// Scroll area height once the visible bars are taken out.
pub fn viewport_height(container: f32, top_bar: f32, bottom_bar: Option<f32>) -> f32 {
    (container - top_bar - bottom_bar.unwrap_or(0.0)).max(0.0)
}

pub fn compose(state: &UiState, limits: ViewLimits) -> PanelView {
    let layout = tab_layout(state);
    let mut active = gate(state.active_tab, &state.life_jobs);
    if !layout.contains(active) {
        active = Tab::World;
    }

    let (blocks, log) = match active {
        Tab::World => {
            let (block, log) = compose_world(state, limits);
            (vec![block], Some(log))
        }
        Tab::Status => (vec![compose_status(state)], None),
        Tab::Inventory => (compose_inventory(state), None),
        Tab::Skills => (compose_skills(state), None),
        Tab::Maps => (vec![compose_maps(state)], None),
        Tab::Npc => (vec![compose_npcs(state)], None),
        Tab::LifeJob(slot) => (compose_life_job(state, slot), None),
    };

    PanelView {
        layout,
        active,
        blocks,
        log,
        bottom_bar: bottom_bar_for(active),
    }
}

/* =========================
   World
   ========================= */

pub fn compose_world(state: &UiState, limits: ViewLimits) -> (PanelBlock, PanelBlock) {
    let w = &state.world;
    let c = &state.character;

    let mut lines = vec![format!("Environment: {}", w.environment)];
    lines.push(format!(
        "Location: {} | RunTime: {} | Time: {} | Date: {} | Facing: {}",
        w.location,
        format_runtime_hhmm(w.world_tick),
        w.time_12h,
        w.date,
        w.facing
    ));
    lines.extend(w.prose.iter().take(MAX_PROSE_LINES).cloned());
    lines.push(format!("[{}]", w.persona.label()));
    lines.extend(w.persona.advisory(&w.tactical));
    lines.push(PROMPT_LINE.to_string());
    lines.push(format!(
        "Lv {} | XP {}/{} | HP {} | MP {} | Fatigue {}/{} | Conditions {}",
        c.level,
        c.xp,
        c.xp_required,
        c.hp,
        c.mp,
        c.fatigue.current,
        c.fatigue.max,
        join_or(&c.conditions, "None")
    ));

    let skip = w.input_log.len().saturating_sub(limits.world_log_visible);
    let log = w.input_log.iter().skip(skip).cloned().collect();

    (
        PanelBlock::new("WORLD", lines),
        PanelBlock::new("LOG", log).muted(),
    )
}

/* =========================
   View-only tabs
   ========================= */

fn compose_status(state: &UiState) -> PanelBlock {
    let c = &state.character;

    let attributes = c
        .attributes
        .iter()
        .map(|(k, v)| format!("{k} {v}"))
        .collect::<Vec<_>>()
        .join(" | ");

    let equipped = c
        .equipped
        .iter()
        .map(|(slot, item)| format!("{slot}: {item}"))
        .collect::<Vec<_>>()
        .join(" | ");

    PanelBlock::new(
        "STATUS",
        vec![
            format!("Name: {}", c.name),
            format!("Titles: {}", join_or(&c.titles, "None")),
            format!("Level {} | XP {}/{}", c.level, c.xp, c.xp_required),
            format!("Attributes: {attributes}"),
            format!(
                "Combat: ATK {} | DEF {} | Crit {}% | Evasion {}%",
                c.combat.attack, c.combat.defense, c.combat.crit_rate, c.combat.evasion
            ),
            format!("Equipped: {equipped}"),
            format!(
                "Resources: HP {} | MP {} | Fatigue {}/{} | Conditions {}",
                c.hp,
                c.mp,
                c.fatigue.current,
                c.fatigue.max,
                join_or(&c.conditions, "None")
            ),
        ],
    )
}

fn compose_inventory(state: &UiState) -> Vec<PanelBlock> {
    let inv = &state.inventory;
    let mut blocks = Vec::new();

    blocks.push(PanelBlock::new(
        "CURRENCY",
        vec![format!("{} × {}", inv.currency_name, inv.currency)],
    ));

    let recent: Vec<String> = inv
        .recent_changes
        .iter()
        .take(MAX_RECENT_CHANGES)
        .cloned()
        .collect();
    if !recent.is_empty() {
        blocks.push(PanelBlock::new("RECENT CHANGES", recent));
    }

    let mut any = false;
    for (category, items) in &inv.categories {
        if items.is_empty() {
            continue;
        }
        any = true;
        let mut items = items.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        blocks.push(PanelBlock::new(
            category.to_uppercase(),
            items
                .iter()
                .map(|i| format!("{} × {}", i.name, i.quantity))
                .collect(),
        ));
    }

    if !any {
        blocks.push(PanelBlock::new("INVENTORY", vec!["(Empty)".to_string()]));
    }

    blocks
}

fn compose_skills(state: &UiState) -> Vec<PanelBlock> {
    let active: Vec<String> = state
        .skills
        .iter()
        .filter(|s| s.kind == SkillKind::Active)
        .map(|s| {
            format!(
                "{} | {} | Mastery: {} {}",
                s.name,
                s.description,
                s.mastery,
                format_cooldown(s.cooldown_remaining)
            )
        })
        .collect();

    let passive: Vec<String> = state
        .skills
        .iter()
        .filter(|s| s.kind == SkillKind::Passive)
        .map(|s| format!("{} | {} | Mastery: {}", s.name, s.description, s.mastery))
        .collect();

    vec![
        PanelBlock::new("ACTIVE SKILLS", none_if_empty(active)),
        PanelBlock::new("PASSIVE SKILLS", none_if_empty(passive)),
    ]
}

fn compose_maps(state: &UiState) -> PanelBlock {
    fn walk(region: &Region, depth: usize, out: &mut Vec<String>) {
        let name = if region.discovered { region.name.as_str() } else { "???" };
        out.push(format!("{}{}", "  ".repeat(depth), name));
        for child in &region.children {
            walk(child, depth + 1, out);
        }
    }

    let mut lines = Vec::new();
    for region in &state.regions {
        walk(region, 0, &mut lines);
    }

    PanelBlock::new("MAPS", none_if_empty(lines))
}

fn compose_npcs(state: &UiState) -> PanelBlock {
    let lines = state
        .npcs
        .iter()
        .map(|n| format!("{} | {} | {}", n.name, n.role, n.relation.label()))
        .collect();

    PanelBlock::new("NPC", none_if_empty(lines))
}

/* =========================
   Life Jobs
   ========================= */

fn compose_life_job(state: &UiState, slot: LifeJobSlot) -> Vec<PanelBlock> {
    let Some(job) = state.life_job(slot) else {
        return vec![PanelBlock::new(slot_title(slot), vec!["(No data)".to_string()])];
    };
    let name = job.name.to_uppercase();

    let recipes = job
        .recipes
        .iter()
        .map(|r| format!("{} | Req: {} | Odds: {}%", r.name, r.requirements, r.success_odds))
        .collect();

    let result = match state.pending_recipe.and_then(|i| job.recipes.get(i)) {
        Some(recipe) => format!("Selected: {}. Awaiting execute.", recipe.name),
        None => "(No craft executed yet.)".to_string(),
    };

    vec![
        PanelBlock::new(format!("{name} — ADVISORY"), job.advisory.clone()),
        PanelBlock {
            title: format!("{name} — RECIPES"),
            lines: none_if_empty(recipes),
            style: BlockStyle::Choice {
                selected: state.pending_recipe,
            },
        },
        PanelBlock::new(format!("{name} — RESULTS"), vec![result]).muted(),
    ]
}

fn slot_title(slot: LifeJobSlot) -> &'static str {
    Tab::LifeJob(slot).id()
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn none_if_empty(lines: Vec<String>) -> Vec<String> {
    if lines.is_empty() {
        vec!["(None)".to_string()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked() -> UiState {
        let mut state = UiState::default();
        state.life_jobs[0].unlocked = true;
        state
    }

    #[test]
    fn bars_are_mutually_exclusive() {
        assert_eq!(bottom_bar_for(Tab::World), BottomBar::Input);
        assert_eq!(bottom_bar_for(Tab::LifeJob(LifeJobSlot::First)), BottomBar::Actions);
        for tab in [Tab::Status, Tab::Inventory, Tab::Skills, Tab::Maps, Tab::Npc] {
            assert_eq!(bottom_bar_for(tab), BottomBar::Hidden);
        }
    }

    #[test]
    fn locked_life_jobs_have_no_tab() {
        let state = UiState::default();
        let layout = tab_layout(&state);
        assert_eq!(layout.top.len(), 4);
        assert_eq!(layout.bottom.len(), 2);

        let layout = tab_layout(&unlocked());
        assert_eq!(layout.bottom.len(), 3);
        assert_eq!(layout.bottom[2].label, "ALCHEMY");
    }

    #[test]
    fn gated_active_tab_renders_world() {
        let mut state = UiState::default();
        state.active_tab = Tab::LifeJob(LifeJobSlot::First);
        let view = compose(&state, ViewLimits::default());
        assert_eq!(view.active, Tab::World);
        assert_eq!(view.bottom_bar, BottomBar::Input);
        assert!(view.log.is_some());
    }

    #[test]
    fn world_block_reads_top_to_bottom() {
        let mut state = UiState::default();
        state.world.world_tick = 6;
        let (block, _) = compose_world(&state, ViewLimits::default());

        assert!(block.lines[0].starts_with("Environment: "));
        assert_eq!(
            block.lines[1],
            "Location: Whispering Thicket | RunTime: 00:01 | Time: 09:00 PM | Date: Day 1, Cycle 1 | Facing: NorthEast"
        );
        assert!(block.lines.contains(&"Recommendation: HOLD.".to_string()));
        assert_eq!(block.lines[block.lines.len() - 2], PROMPT_LINE);
        assert_eq!(
            block.lines.last().unwrap(),
            "Lv 1 | XP 0/135 | HP 30 | MP 10 | Fatigue 0/100 | Conditions None"
        );
    }

    #[test]
    fn log_block_shows_most_recent_player_lines() {
        let mut state = UiState::default();
        for i in 0..20 {
            state.push_input(&format!("m{i}"), 40);
        }
        let (_, log) = compose_world(&state, ViewLimits { world_log_visible: 3 });
        assert_eq!(log.lines, vec!["> m17", "> m18", "> m19"]);
    }

    #[test]
    fn skills_show_cooldowns_in_turns() {
        let view = compose(
            &UiState {
                active_tab: Tab::Skills,
                ..UiState::default()
            },
            ViewLimits::default(),
        );
        let active = &view.blocks[0];
        assert!(active.lines[0].ends_with("(Ready)"));
        assert!(active.lines[1].ends_with("(Cooldown: 2 turns)"));
        assert_eq!(view.bottom_bar, BottomBar::Hidden);
    }

    #[test]
    fn maps_hide_undiscovered_regions() {
        let block = compose_maps(&UiState::default());
        assert_eq!(block.lines[0], "Eldrith Wilds");
        assert_eq!(block.lines[1], "  Whispering Thicket");
        assert_eq!(block.lines[2], "    ???");
    }

    #[test]
    fn inventory_empty_placeholder() {
        let mut state = UiState::default();
        state.inventory.categories.clear();
        let blocks = compose_inventory(&state);
        assert_eq!(blocks.last().unwrap().lines, vec!["(Empty)"]);
    }

    #[test]
    fn life_job_shows_recipes_and_action_bar() {
        let mut state = unlocked();
        state.active_tab = Tab::LifeJob(LifeJobSlot::First);
        state.pending_recipe = Some(1);

        let view = compose(&state, ViewLimits::default());
        assert_eq!(view.bottom_bar, BottomBar::Actions);
        assert_eq!(view.blocks.len(), 3);
        assert_eq!(
            view.blocks[1].lines[0],
            "Minor Healing Draught | Req: Herb ×2, Vial ×1 | Odds: 42%"
        );
        assert_eq!(view.blocks[1].style, BlockStyle::Choice { selected: Some(1) });
        assert_eq!(view.blocks[2].lines[0], "Selected: Bitter Tonic. Awaiting execute.");
    }

    #[test]
    fn viewport_never_negative() {
        assert_eq!(viewport_height(600.0, 80.0, Some(70.0)), 450.0);
        assert_eq!(viewport_height(600.0, 80.0, None), 520.0);
        assert_eq!(viewport_height(100.0, 80.0, Some(70.0)), 0.0);
    }
}
