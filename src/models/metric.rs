//! Metrics extracted from scoreboard entries and the analysis roles that
//! select which entries count towards them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParticipantEntry;

/// Rounding applied to reconstructed absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Nearest whole number (damage-like totals).
    Integer,
    /// One decimal place (small counts such as deathblows).
    Tenths,
}

impl Precision {
    pub fn round(&self, value: f64) -> f64 {
        match self {
            Precision::Integer => value.round(),
            Precision::Tenths => (value * 10.0).round() / 10.0,
        }
    }
}

/// A performance metric taken from a scoreboard entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Damage,
    #[serde(rename = "deathblows")]
    DeathBlows,
    KillDamage,
    Healing,
    Protection,
    ProtectionHealing,
    DamageProtectionHealing,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Damage,
        Metric::DeathBlows,
        Metric::KillDamage,
        Metric::Healing,
        Metric::Protection,
        Metric::ProtectionHealing,
        Metric::DamageProtectionHealing,
    ];

    /// Raw value of this metric for one entry. Composites are plain sums.
    pub fn value(&self, entry: &ParticipantEntry) -> f64 {
        match self {
            Metric::Damage => entry.damage,
            Metric::DeathBlows => entry.death_blows,
            Metric::KillDamage => entry.kill_damage,
            Metric::Healing => entry.healing,
            Metric::Protection => entry.protection,
            Metric::ProtectionHealing => entry.protection + entry.healing,
            Metric::DamageProtectionHealing => entry.damage + entry.protection + entry.healing,
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            Metric::DeathBlows => Precision::Tenths,
            _ => Precision::Integer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Damage => "damage",
            Metric::DeathBlows => "deathblows",
            Metric::KillDamage => "kill_damage",
            Metric::Healing => "healing",
            Metric::Protection => "protection",
            Metric::ProtectionHealing => "protection_healing",
            Metric::DamageProtectionHealing => "damage_protection_healing",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '+'], "_");
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = Metric::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown metric '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// The lens an analysis looks through: damage dealers or tanks/supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisRole {
    #[default]
    Offense,
    Support,
}

impl AnalysisRole {
    /// Metrics analysed when none are configured explicitly.
    pub fn default_metrics(&self) -> &'static [Metric] {
        match self {
            AnalysisRole::Offense => &[Metric::Damage, Metric::DeathBlows, Metric::KillDamage],
            AnalysisRole::Support => &[
                Metric::Protection,
                Metric::Healing,
                Metric::ProtectionHealing,
                Metric::DamageProtectionHealing,
            ],
        }
    }

    /// The value compared against the faction's top performer when
    /// discarding late joiners.
    pub fn performance(&self, entry: &ParticipantEntry) -> f64 {
        match self {
            AnalysisRole::Offense => entry.damage,
            AnalysisRole::Support => entry.protection_healing(),
        }
    }

    /// Whether the entry is specced for this role at all.
    pub fn is_specced_for(&self, entry: &ParticipantEntry) -> bool {
        match self {
            AnalysisRole::Offense => entry.protection_healing() < entry.damage,
            AnalysisRole::Support => entry.damage < entry.protection_healing(),
        }
    }
}

impl fmt::Display for AnalysisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisRole::Offense => write!(f, "offense"),
            AnalysisRole::Support => write!(f, "support"),
        }
    }
}

impl FromStr for AnalysisRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "offense" | "dd" | "damage" => Ok(AnalysisRole::Offense),
            "support" | "tank" => Ok(AnalysisRole::Support),
            other => Err(format!(
                "unknown role '{}', expected 'offense' or 'support'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Career;

    fn entry(damage: f64, healing: f64, protection: f64) -> ParticipantEntry {
        ParticipantEntry {
            career: Career::from("KNIGHT"),
            damage,
            healing,
            protection,
            death_blows: 3.0,
            kill_damage: 1200.0,
            renown_rank: 80.0,
        }
    }

    #[test]
    fn test_metric_values() {
        let e = entry(1000.0, 200.0, 300.0);
        assert_eq!(Metric::Damage.value(&e), 1000.0);
        assert_eq!(Metric::DeathBlows.value(&e), 3.0);
        assert_eq!(Metric::KillDamage.value(&e), 1200.0);
        assert_eq!(Metric::ProtectionHealing.value(&e), 500.0);
        assert_eq!(Metric::DamageProtectionHealing.value(&e), 1500.0);
    }

    #[test]
    fn test_precision() {
        assert_eq!(Metric::DeathBlows.precision(), Precision::Tenths);
        assert_eq!(Metric::Damage.precision(), Precision::Integer);
        assert_eq!(Precision::Tenths.round(2.345), 2.3);
        assert_eq!(Precision::Integer.round(74.6), 75.0);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("damage".parse::<Metric>().unwrap(), Metric::Damage);
        assert_eq!("DeathBlows".parse::<Metric>().unwrap(), Metric::DeathBlows);
        assert_eq!(
            "protection+healing".parse::<Metric>().unwrap(),
            Metric::ProtectionHealing
        );
        assert_eq!(
            "damage-protection-healing".parse::<Metric>().unwrap(),
            Metric::DamageProtectionHealing
        );
        assert!("mana".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_serialization_matches_display() {
        for metric in Metric::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric));
        }
    }

    #[test]
    fn test_role_speccing_rejects_all_zero_entry() {
        let idle = entry(0.0, 0.0, 0.0);
        assert!(!AnalysisRole::Offense.is_specced_for(&idle));
        assert!(!AnalysisRole::Support.is_specced_for(&idle));
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("support".parse::<AnalysisRole>().unwrap(), AnalysisRole::Support);
        assert_eq!("Offense".parse::<AnalysisRole>().unwrap(), AnalysisRole::Offense);
        assert!("healer".parse::<AnalysisRole>().is_err());
    }

    #[test]
    fn test_role_presets() {
        assert_eq!(AnalysisRole::Offense.default_metrics().len(), 3);
        assert!(AnalysisRole::Support
            .default_metrics()
            .contains(&Metric::ProtectionHealing));
    }
}
