//! Metric extraction with optional progression normalization.

use crate::models::{Metric, ParticipantEntry};

/// Renown rank at which a character is fully progressed.
pub const MAX_RENOWN_RANK: f64 = 80.0;

/// Factor that lifts a partially progressed character to full rank.
///
/// Ranks are capped at [`MAX_RENOWN_RANK`]; ranks below 1 count as 1.
pub fn progression_scale(renown_rank: f64) -> f64 {
    MAX_RENOWN_RANK / renown_rank.clamp(1.0, MAX_RENOWN_RANK)
}

/// Pulls metric values out of qualifying entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricExtractor {
    normalize_by_progression: bool,
}

impl MetricExtractor {
    pub fn new(normalize_by_progression: bool) -> Self {
        Self {
            normalize_by_progression,
        }
    }

    pub fn extract(&self, entry: &ParticipantEntry, metric: Metric) -> f64 {
        let value = metric.value(entry);
        if self.normalize_by_progression {
            value * progression_scale(entry.renown_rank)
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Career;

    fn entry(renown_rank: f64) -> ParticipantEntry {
        ParticipantEntry {
            career: Career::from("MAGUS"),
            damage: 1_000.0,
            healing: 200.0,
            protection: 300.0,
            death_blows: 4.0,
            kill_damage: 600.0,
            renown_rank,
        }
    }

    #[test]
    fn test_full_rank_is_noop() {
        assert_eq!(progression_scale(80.0), 1.0);
        let extractor = MetricExtractor::new(true);
        assert_eq!(extractor.extract(&entry(80.0), Metric::Damage), 1_000.0);
    }

    #[test]
    fn test_half_rank_doubles() {
        let extractor = MetricExtractor::new(true);
        assert_eq!(extractor.extract(&entry(40.0), Metric::Damage), 2_000.0);
        assert_eq!(extractor.extract(&entry(40.0), Metric::DeathBlows), 8.0);
    }

    #[test]
    fn test_rank_above_cap_is_capped() {
        assert_eq!(progression_scale(100.0), 1.0);
    }

    #[test]
    fn test_non_positive_rank_is_guarded() {
        assert_eq!(progression_scale(0.0), 80.0);
        assert_eq!(progression_scale(-5.0), 80.0);
        assert!(MetricExtractor::new(true)
            .extract(&entry(0.0), Metric::Damage)
            .is_finite());
    }

    #[test]
    fn test_composite_normalizes_the_sum() {
        let extractor = MetricExtractor::new(true);
        assert_eq!(
            extractor.extract(&entry(40.0), Metric::ProtectionHealing),
            1_000.0
        );
        assert_eq!(
            extractor.extract(&entry(40.0), Metric::DamageProtectionHealing),
            3_000.0
        );
    }

    #[test]
    fn test_disabled_normalization_returns_raw() {
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract(&entry(10.0), Metric::KillDamage), 600.0);
    }
}
