use crate::engine::compose::{compose, PanelView, ViewLimits};
use crate::engine::persist::{load_state, save_state, LoadOutcome, StateStore};
use crate::model::tab::{normalize_tab, Tab};
use crate::model::tactical::PersonaMode;
use crate::model::ui_state::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellLimits {
    pub input_log_limit: usize,
    pub view: ViewLimits,
}

impl Default for ShellLimits {
    fn default() -> Self {
        Self {
            input_log_limit: 40,
            view: ViewLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input; nothing changed.
    Ignored,
    Accepted,
}

/// Owns the shell state and is the only place it is mutated.
/// Every mutation ends with a full save.
pub struct Shell<S: StateStore> {
    state: UiState,
    store: S,
    limits: ShellLimits,
}

impl<S: StateStore> Shell<S> {
    pub fn open(store: S, limits: ShellLimits) -> (Self, LoadOutcome) {
        let outcome = load_state(&store);
        match &outcome {
            LoadOutcome::Restored(_) => log::info!("Restored saved shell state"),
            LoadOutcome::Fresh { reason, .. } => {
                log::info!("Starting from default shell state ({reason:?})")
            }
        }

        // The saved log may predate a lower configured limit.
        let mut state = outcome.clone().into_state();
        state.trim_input_log(limits.input_log_limit);

        let shell = Self {
            state,
            store,
            limits,
        };
        (shell, outcome)
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> PanelView {
        compose(&self.state, self.limits.view)
    }

    fn persist(&mut self) {
        save_state(&mut self.store, &self.state);
    }

    /// Accepts canonical ids, legacy aliases and life-job names.
    pub fn select_tab(&mut self, raw: &str) -> Tab {
        let tab = normalize_tab(raw, &self.state.life_jobs);
        if tab != self.state.active_tab {
            self.state.pending_recipe = None;
        }
        self.state.active_tab = tab;
        self.persist();
        tab
    }

    pub fn set_persona(&mut self, mode: PersonaMode) {
        self.state.world.persona = mode;
        self.persist();
    }

    /// Pick a recipe on the active life-job tab. Ignored anywhere else.
    pub fn select_recipe(&mut self, index: usize) {
        let Tab::LifeJob(slot) = self.state.active_tab else {
            return;
        };
        let known = self
            .state
            .life_job(slot)
            .is_some_and(|job| index < job.recipes.len());
        if !known {
            return;
        }

        self.state.pending_recipe = Some(index);
        self.persist();
    }

    /// Submit the draft as one turn. Only the Send control calls this;
    /// line breaks in the draft are kept as typed.
    pub fn submit(&mut self, draft: &mut String) -> SubmitOutcome {
        let text = draft.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.state.push_input(text, self.limits.input_log_limit);
        self.state.tick_cooldowns();
        self.state.world.world_tick = self.state.world.world_tick.saturating_add(1);
        self.state.active_tab = Tab::World;
        draft.clear();

        self.persist();
        SubmitOutcome::Accepted
    }

    pub fn cancel_life_job(&mut self) {
        self.state.pending_recipe = None;
        self.state.active_tab = Tab::World;
        self.persist();
    }

    /// Recipe resolution belongs to the game engine; until one is wired in
    /// this only closes the life-job tab.
    pub fn execute_life_job(&mut self) {
        if let Some(index) = self.state.pending_recipe {
            log::info!("Execute requested for recipe #{index}; no engine attached");
        }
        self.state.pending_recipe = None;
        self.state.active_tab = Tab::World;
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compose::BottomBar;
    use crate::engine::persist::{save_state, FreshReason, MemoryStore};
    use crate::model::tab::LifeJobSlot;
    use crate::model::ui_state::PLAYER_MARKER;

    fn shell() -> Shell<MemoryStore> {
        Shell::open(MemoryStore::default(), ShellLimits::default()).0
    }

    fn shell_with_alchemy() -> Shell<MemoryStore> {
        let mut s = shell();
        s.state.life_jobs[0].unlocked = true;
        s
    }

    #[test]
    fn opens_fresh_without_saved_state() {
        let (shell, outcome) = Shell::open(MemoryStore::default(), ShellLimits::default());
        assert!(matches!(
            outcome,
            LoadOutcome::Fresh {
                reason: FreshReason::Missing,
                ..
            }
        ));
        assert_eq!(shell.state(), &UiState::default());
        assert_eq!(shell.store().writes, 0);
    }

    #[test]
    fn reopens_what_was_saved() {
        let mut first = shell();
        first.select_tab("SKILLS");
        let mut draft = "look around".to_string();
        first.submit(&mut draft);

        let (second, outcome) = Shell::open(first.store, ShellLimits::default());
        assert!(matches!(outcome, LoadOutcome::Restored(_)));
        assert_eq!(second.state().world.input_log, vec!["> look around"]);
    }

    #[test]
    fn blank_submissions_change_nothing() {
        let mut s = shell();
        for input in ["", "   ", "\n\t\n"] {
            let mut draft = input.to_string();
            assert_eq!(s.submit(&mut draft), SubmitOutcome::Ignored);
            assert_eq!(draft, input);
        }
        assert!(s.state().world.input_log.is_empty());
        assert_eq!(s.store().writes, 0);
    }

    #[test]
    fn each_submission_is_one_turn() {
        let mut s = shell();
        s.state.skills[0].cooldown_remaining = 3;
        s.state.skills[1].cooldown_remaining = 1;
        let n = 2;

        for i in 0..n {
            let mut draft = format!("  attack {i}\nthen wait  ");
            assert_eq!(s.submit(&mut draft), SubmitOutcome::Accepted);
            assert!(draft.is_empty());
        }

        let log = &s.state().world.input_log;
        assert_eq!(log.len(), n);
        assert!(log.iter().all(|l| l.starts_with(PLAYER_MARKER)));
        assert_eq!(log[1], "> attack 1\nthen wait");
        assert_eq!(s.state().skills[0].cooldown_remaining, 1);
        assert_eq!(s.state().skills[1].cooldown_remaining, 0);
        assert_eq!(s.state().world.world_tick, n as u64);
        assert_eq!(s.store().writes, n);
    }

    #[test]
    fn submit_returns_to_world() {
        let mut s = shell();
        s.select_tab("MAPS");
        let mut draft = "go north".to_string();
        s.submit(&mut draft);
        assert_eq!(s.state().active_tab, Tab::World);
        assert_eq!(s.view().bottom_bar, BottomBar::Input);
    }

    #[test]
    fn input_log_is_capped() {
        let (mut s, _) = Shell::open(
            MemoryStore::default(),
            ShellLimits {
                input_log_limit: 3,
                ..Default::default()
            },
        );
        for i in 0..5 {
            let mut draft = format!("m{i}");
            s.submit(&mut draft);
        }
        assert_eq!(s.state().world.input_log, vec!["> m2", "> m3", "> m4"]);
    }

    #[test]
    fn reopening_with_a_lower_limit_trims_the_log() {
        let mut first = shell();
        for i in 0..40 {
            let mut draft = format!("m{i}");
            first.submit(&mut draft);
        }
        assert_eq!(first.state().world.input_log.len(), 40);

        let (second, outcome) = Shell::open(
            first.store,
            ShellLimits {
                input_log_limit: 5,
                ..Default::default()
            },
        );
        assert!(matches!(outcome, LoadOutcome::Restored(_)));
        let log = &second.state().world.input_log;
        assert_eq!(log.len(), 5);
        assert_eq!(log[0], "> m35");
        assert_eq!(log[4], "> m39");
    }

    #[test]
    fn huge_saved_world_tick_does_not_overflow() {
        let mut saved = UiState::default();
        saved.world.world_tick = u64::MAX / 2;
        let mut store = MemoryStore::default();
        save_state(&mut store, &saved);

        let (mut s, outcome) = Shell::open(store, ShellLimits::default());
        assert!(matches!(outcome, LoadOutcome::Restored(_)));
        assert!(!s.view().blocks.is_empty());

        s.state.world.world_tick = u64::MAX;
        let mut draft = "wait".to_string();
        assert_eq!(s.submit(&mut draft), SubmitOutcome::Accepted);
        assert_eq!(s.state().world.world_tick, u64::MAX);
        assert!(!s.view().blocks.is_empty());
    }

    #[test]
    fn locked_life_job_redirects_to_world() {
        let mut s = shell();
        assert_eq!(s.select_tab("ALCHEMY"), Tab::World);
        assert_eq!(s.select_tab("LIFE_JOB_1"), Tab::World);
        assert_eq!(s.store().writes, 2);
    }

    #[test]
    fn cancel_keeps_log_and_returns_to_world() {
        let mut s = shell_with_alchemy();
        let mut draft = "brew".to_string();
        s.submit(&mut draft);

        assert_eq!(s.select_tab("alchemy"), Tab::LifeJob(LifeJobSlot::First));
        assert_eq!(s.view().bottom_bar, BottomBar::Actions);
        s.select_recipe(1);
        assert_eq!(s.state().pending_recipe, Some(1));

        s.cancel_life_job();
        assert_eq!(s.state().active_tab, Tab::World);
        assert_eq!(s.state().pending_recipe, None);
        assert_eq!(s.state().world.input_log, vec!["> brew"]);
    }

    #[test]
    fn execute_is_a_placeholder() {
        let mut s = shell_with_alchemy();
        s.select_tab("ALCHEMY");
        s.select_recipe(0);
        let before = s.state().inventory.clone();

        s.execute_life_job();
        assert_eq!(s.state().active_tab, Tab::World);
        assert_eq!(s.state().pending_recipe, None);
        assert_eq!(s.state().inventory, before);
        assert!(s.state().world.input_log.is_empty());
    }

    #[test]
    fn recipe_selection_outside_life_job_is_ignored() {
        let mut s = shell_with_alchemy();
        s.select_recipe(0);
        assert_eq!(s.state().pending_recipe, None);

        s.select_tab("ALCHEMY");
        s.select_recipe(9);
        assert_eq!(s.state().pending_recipe, None);
    }

    #[test]
    fn persona_changes_advisory_length() {
        let mut s = shell();
        let base = s.view().blocks[0].lines.len();
        s.set_persona(PersonaMode::Vaela);
        assert_eq!(s.view().blocks[0].lines.len(), base + 2);
        assert_eq!(s.store().writes, 1);
    }
}
