//! Factions, careers and the static rosters that bind them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two opposing sides of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    #[serde(rename = "order")]
    Order,
    #[serde(rename = "destro")]
    Destruction,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Order, Faction::Destruction];

    /// Position of this faction in the scenario `points` tally.
    pub fn index(&self) -> usize {
        match self {
            Faction::Order => 0,
            Faction::Destruction => 1,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Order => write!(f, "order"),
            Faction::Destruction => write!(f, "destro"),
        }
    }
}

/// A character class identifier, e.g. `SWORDMASTER`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Career(String);

impl Career {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Career({})", self.0)
    }
}

impl From<&str> for Career {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Career {
    fn from(s: String) -> Self {
        Self(s)
    }
}

pub const ORDER_CAREERS: [&str; 12] = [
    "SWORDMASTER",
    "IRONBREAKER",
    "KNIGHT",
    "WHITE_LION",
    "SLAYER",
    "WITCH_HUNTER",
    "ENGINEER",
    "SHADOW_WARRIOR",
    "BRIGHT_WIZARD",
    "ARCHMAGE",
    "RUNE_PRIEST",
    "WARRIOR_PRIEST",
];

pub const DESTRO_CAREERS: [&str; 12] = [
    "BLACK_ORC",
    "BLACKGUARD",
    "CHOSEN",
    "MARAUDER",
    "CHOPPA",
    "WITCH_ELF",
    "MAGUS",
    "SQUIG_HERDER",
    "SORCERER",
    "SHAMAN",
    "ZEALOT",
    "DISCIPLE",
];

pub const ORDER_TANKS: [&str; 3] = ["SWORDMASTER", "IRONBREAKER", "KNIGHT"];

pub const DESTRO_TANKS: [&str; 3] = ["BLACK_ORC", "BLACKGUARD", "CHOSEN"];

/// Fixed per-faction career lists, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    order: Vec<Career>,
    destruction: Vec<Career>,
}

impl Roster {
    pub fn new(order: Vec<Career>, destruction: Vec<Career>) -> Self {
        Self { order, destruction }
    }

    /// Build a roster from plain string slices.
    pub fn from_names<S: AsRef<str>>(order: &[S], destruction: &[S]) -> Self {
        Self::new(
            order.iter().map(|c| Career::new(c.as_ref())).collect(),
            destruction.iter().map(|c| Career::new(c.as_ref())).collect(),
        )
    }

    pub fn careers(&self, faction: Faction) -> &[Career] {
        match faction {
            Faction::Order => &self.order,
            Faction::Destruction => &self.destruction,
        }
    }

    /// The faction a career belongs to, if it is on this roster at all.
    pub fn faction_of(&self, career: &Career) -> Option<Faction> {
        Faction::ALL
            .into_iter()
            .find(|faction| self.careers(*faction).contains(career))
    }

    pub fn contains(&self, career: &Career) -> bool {
        self.faction_of(career).is_some()
    }

    /// Careers listed more than once, either within a faction or across both.
    pub fn duplicates(&self) -> Vec<&Career> {
        let mut seen = std::collections::HashSet::new();
        self.order
            .iter()
            .chain(self.destruction.iter())
            .filter(|career| !seen.insert(*career))
            .collect()
    }

    /// Careers of `self` that `other` does not place in the same faction.
    pub fn not_within<'a>(&'a self, other: &Roster) -> Vec<&'a Career> {
        Faction::ALL
            .into_iter()
            .flat_map(|faction| {
                self.careers(faction)
                    .iter()
                    .filter(move |career| other.faction_of(career) != Some(faction))
            })
            .collect()
    }
}

/// The full roster used for faction lookup plus the tank roster used by the
/// support analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rosters {
    pub full: Roster,
    pub support: Roster,
}

impl Rosters {
    pub fn new(full: Roster, support: Roster) -> Self {
        Self { full, support }
    }

    /// Roster whose careers form the rows and columns of a role's matrices.
    pub fn for_role(&self, role: super::AnalysisRole) -> &Roster {
        match role {
            super::AnalysisRole::Offense => &self.full,
            super::AnalysisRole::Support => &self.support,
        }
    }
}

impl Default for Rosters {
    fn default() -> Self {
        Self {
            full: Roster::from_names(&ORDER_CAREERS, &DESTRO_CAREERS),
            support: Roster::from_names(&ORDER_TANKS, &DESTRO_TANKS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisRole;

    #[test]
    fn test_faction_of() {
        let rosters = Rosters::default();
        assert_eq!(
            rosters.full.faction_of(&Career::from("KNIGHT")),
            Some(Faction::Order)
        );
        assert_eq!(
            rosters.full.faction_of(&Career::from("SHAMAN")),
            Some(Faction::Destruction)
        );
        assert_eq!(rosters.full.faction_of(&Career::from("GOBLIN")), None);
    }

    #[test]
    fn test_support_roster_is_tanks_only() {
        let rosters = Rosters::default();
        assert!(rosters.support.contains(&Career::from("CHOSEN")));
        assert!(!rosters.support.contains(&Career::from("SORCERER")));
        assert_eq!(rosters.for_role(AnalysisRole::Support).careers(Faction::Order).len(), 3);
        assert_eq!(rosters.for_role(AnalysisRole::Offense).careers(Faction::Order).len(), 12);
    }

    #[test]
    fn test_default_rosters_are_consistent() {
        let rosters = Rosters::default();
        assert!(rosters.full.duplicates().is_empty());
        assert!(rosters.support.not_within(&rosters.full).is_empty());
    }

    #[test]
    fn test_duplicates_across_factions() {
        let roster = Roster::from_names(&["A", "B"], &["B", "C"]);
        assert_eq!(roster.duplicates(), vec![&Career::from("B")]);
    }

    #[test]
    fn test_not_within_detects_wrong_faction() {
        let full = Roster::from_names(&["A", "B"], &["C", "D"]);
        let support = Roster::from_names(&["A", "C"], &["D"]);
        assert_eq!(support.not_within(&full), vec![&Career::from("C")]);
    }

    #[test]
    fn test_faction_serialization() {
        assert_eq!(serde_json::to_string(&Faction::Order).unwrap(), "\"order\"");
        assert_eq!(
            serde_json::to_string(&Faction::Destruction).unwrap(),
            "\"destro\""
        );
        assert_eq!(format!("{}", Faction::Destruction), "destro");
    }

    #[test]
    fn test_career_display_and_debug() {
        let career = Career::from("SLAYER");
        assert_eq!(format!("{}", career), "SLAYER");
        assert_eq!(format!("{:?}", career), "Career(SLAYER)");
    }
}
