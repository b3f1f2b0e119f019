use serde::{Deserialize, Serialize};
use std::fmt;

/* =========================
   Tactical State
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalState {
    /// 0..=100
    pub threat: i32,
    /// -100..=100
    pub advantage: i32,
    /// 0..=100
    pub strain: i32,
}

impl Default for TacticalState {
    fn default() -> Self {
        Self {
            threat: 30,
            advantage: 10,
            strain: 15,
        }
    }
}

impl TacticalState {
    pub fn risk(&self) -> RiskBand {
        risk_band(self.threat, self.advantage)
    }

    pub fn recommendation(&self) -> Recommendation {
        recommend(self.risk(), self.strain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBand {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskBand::Low => "LOW",
            RiskBand::Medium => "MEDIUM",
            RiskBand::High => "HIGH",
            RiskBand::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    Advance,
    Hold,
    Recover,
    Retreat,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Advance => "ADVANCE",
            Recommendation::Hold => "HOLD",
            Recommendation::Recover => "RECOVER",
            Recommendation::Retreat => "RETREAT",
        };
        f.write_str(s)
    }
}

/// Bands are checked from most to least severe; the first match wins.
pub fn risk_band(threat: i32, advantage: i32) -> RiskBand {
    let threat = threat.clamp(0, 100);
    let advantage = advantage.clamp(-100, 100);
    let score = threat - advantage.max(0);

    if threat >= 80 || score >= 70 {
        RiskBand::Critical
    } else if threat >= 55 || score >= 45 {
        RiskBand::High
    } else if threat >= 30 || score >= 20 {
        RiskBand::Medium
    } else {
        RiskBand::Low
    }
}

pub fn recommend(band: RiskBand, strain: i32) -> Recommendation {
    match band {
        RiskBand::Critical => Recommendation::Retreat,
        RiskBand::High if strain >= 60 => Recommendation::Recover,
        RiskBand::High => Recommendation::Retreat,
        RiskBand::Medium if strain >= 70 => Recommendation::Recover,
        RiskBand::Medium => Recommendation::Hold,
        RiskBand::Low if strain >= 80 => Recommendation::Recover,
        RiskBand::Low => Recommendation::Advance,
    }
}

/* =========================
   Persona
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonaMode {
    #[default]
    Kyra,
    Seris,
    Vaela,
}

impl PersonaMode {
    pub const ALL: [PersonaMode; 3] = [PersonaMode::Kyra, PersonaMode::Seris, PersonaMode::Vaela];

    pub fn label(self) -> &'static str {
        match self {
            PersonaMode::Kyra => "KYRA",
            PersonaMode::Seris => "SERIS",
            PersonaMode::Vaela => "VAELA",
        }
    }

    /// Kyra reports, Seris coaches, Vaela narrates.
    pub fn advisory(self, tactical: &TacticalState) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Risk: {} | Advantage: {} | Strain: {}%",
                tactical.risk(),
                format_signed(tactical.advantage),
                tactical.strain
            ),
            format!("Recommendation: {}.", tactical.recommendation()),
        ];

        match self {
            PersonaMode::Kyra => {}
            PersonaMode::Seris => {
                lines.push("Don't chase noise. Control the next exchange.".into());
            }
            PersonaMode::Vaela => {
                lines.push(
                    "The air tastes like warning. Your timing matters more than your courage."
                        .into(),
                );
                lines.push("Hold your breath, then move when the world blinks.".into());
            }
        }

        lines
    }
}

/* =========================
   Formatting
   ========================= */

pub const SECONDS_PER_TICK: u64 = 10;

pub fn format_runtime_hhmm(world_tick: u64) -> String {
    let total = world_tick.saturating_mul(SECONDS_PER_TICK);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    format!("{hours:02}:{minutes:02}")
}

pub fn format_cooldown(remaining: u32) -> String {
    match remaining {
        0 => "(Ready)".to_string(),
        1 => "(Cooldown: 1 turn)".to_string(),
        n => format!("(Cooldown: {n} turns)"),
    }
}

pub fn format_signed(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
