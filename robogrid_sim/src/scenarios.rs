//! Round scripts for the simulation harness.

/// Cells of the planted run used by [`ScenarioId::Planted`], as `(column, row)`.
pub const PLANTED_RUN: [(usize, usize); 4] = [(3, 1), (4, 1), (5, 1), (6, 1)];

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    /// One layout, scanned as rows 0..2 and then rows 2..10
    Walkthrough,

    /// Three fresh layouts, each scanned over every row
    Reroll,

    /// Fresh layout with a run planted across a separator in row 1
    Planted,

    /// Walkthrough, Reroll and Planted back to back on one world
    Showcase,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Walkthrough,
            ScenarioId::Reroll,
            ScenarioId::Planted,
            ScenarioId::Showcase,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Walkthrough => "walkthrough",
            ScenarioId::Reroll => "reroll",
            ScenarioId::Planted => "planted",
            ScenarioId::Showcase => "showcase",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Walkthrough => "Scan the first two rows closely, then sweep the rest",
            ScenarioId::Reroll => "Three new layouts, full sweep each, no run expected",
            ScenarioId::Planted => "Plant four robots at row 1 columns 3-6, run must be found",
            ScenarioId::Showcase => "All rounds in order on one seed",
        }
    }

    /// Returns true if the final scan of this scenario must find a run.
    pub fn expects_match(&self) -> bool {
        matches!(self, ScenarioId::Planted | ScenarioId::Showcase)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walkthrough" | "walk_through" => Ok(ScenarioId::Walkthrough),
            "reroll" | "re_roll" => Ok(ScenarioId::Reroll),
            "planted" | "plant" => Ok(ScenarioId::Planted),
            "showcase" | "all_rounds" => Ok(ScenarioId::Showcase),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
