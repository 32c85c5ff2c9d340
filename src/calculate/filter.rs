//! Participation filter.
//!
//! Decides which scoreboard entries of a match count for an analysis role:
//! entries not specced for the role are dropped, then entries far below their
//! faction's top performer are treated as late joiners and dropped as well.

use crate::models::{AnalysisRole, Faction, MatchRecord, ParticipantEntry, Rosters};

use super::AnalysisError;

/// A scoreboard entry that qualified, tagged with its faction.
#[derive(Debug, Clone, Copy)]
pub struct QualifiedEntry<'a> {
    pub faction: Faction,
    pub entry: &'a ParticipantEntry,
}

/// Entries of `record` that qualify for `role`.
///
/// Every career must be on the full roster; an unknown career fails the run
/// since its faction cannot be determined.
pub fn qualifying_entries<'a>(
    record: &'a MatchRecord,
    role: AnalysisRole,
    rosters: &Rosters,
    late_join_threshold: f64,
) -> Result<Vec<QualifiedEntry<'a>>, AnalysisError> {
    let mut candidates = Vec::with_capacity(record.entries.len());

    for entry in &record.entries {
        let faction = rosters.full.faction_of(&entry.career).ok_or_else(|| {
            AnalysisError::UnknownCareer {
                match_id: record.id.clone(),
                career: entry.career.to_string(),
            }
        })?;

        if !role.is_specced_for(entry) {
            continue;
        }

        if role == AnalysisRole::Support && !rosters.support.contains(&entry.career) {
            continue;
        }

        candidates.push(QualifiedEntry { faction, entry });
    }

    // Top performer per faction among the remaining entries; stays 0 when a
    // faction has none, which admits everything (there is nothing to admit).
    let mut top = [0.0_f64; 2];
    for candidate in &candidates {
        let slot = &mut top[candidate.faction.index()];
        *slot = slot.max(role.performance(candidate.entry));
    }

    candidates.retain(|candidate| {
        role.performance(candidate.entry) >= top[candidate.faction.index()] * late_join_threshold
    });

    Ok(candidates)
}
