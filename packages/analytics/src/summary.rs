//! Headline statistics over a filtered population.

use std::collections::{BTreeMap, HashSet};

use crash_report_analytics_models::SummaryStats;
use crash_report_crash_models::{Borough, CrashRecord, InjurySeverity, PersonType};

use crate::ratio;

/// Computes totals, injury counts and the most affected borough.
///
/// Collisions are counted by distinct id, people by row.
#[must_use]
pub fn summarize(rows: &[&CrashRecord]) -> SummaryStats {
    let mut collisions: HashSet<&str> = HashSet::new();
    let mut pedestrian_collisions: HashSet<&str> = HashSet::new();
    let mut boroughs: BTreeMap<Borough, u64> = BTreeMap::new();
    let mut injured = 0u64;
    let mut killed = 0u64;

    for row in rows {
        collisions.insert(&row.collision_id);
        if row.person_type == PersonType::Pedestrian {
            pedestrian_collisions.insert(&row.collision_id);
        }
        match row.injury_severity {
            InjurySeverity::Injury => injured += 1,
            InjurySeverity::Fatality => killed += 1,
            InjurySeverity::NoInjury => {}
        }
        if let Some(borough) = row.borough {
            *boroughs.entry(borough).or_default() += 1;
        }
    }

    let total = rows.len() as u64;

    // Ties go to the alphabetically first borough.
    let most_affected_borough = boroughs
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.label().cmp(a.0.label())))
        .map(|(borough, _)| *borough);

    SummaryStats {
        total_records: total,
        distinct_collisions: collisions.len() as u64,
        injured_persons: injured,
        killed_persons: killed,
        pedestrian_collisions: pedestrian_collisions.len() as u64,
        severity_rate: ratio(injured + killed, total),
        most_affected_borough,
    }
}
