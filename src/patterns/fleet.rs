//! Fleet-wide consolidation across plants.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::types::{Metric, Pattern, PatternType};

/// A (pattern type, metric) pair seen at `min_plants` or more plants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetPattern {
    pub pattern_type: PatternType,
    #[serde(rename = "metric_name")]
    pub metric: Metric,
    pub plants: Vec<String>,
}

/// Mark patterns whose type and metric recur across at least `min_plants`
/// plants. Every such pattern gets `is_fleet_wide = true` and the full,
/// sorted list of plants in `affected_plants`.
pub fn consolidate_fleet(
    patterns_by_plant: &mut BTreeMap<String, Vec<Pattern>>,
    min_plants: usize,
) -> Vec<FleetPattern> {
    let mut seen: BTreeMap<(PatternType, Metric), BTreeSet<String>> = BTreeMap::new();
    for pattern in patterns_by_plant.values().flatten() {
        seen.entry((pattern.pattern_type, pattern.metric))
            .or_default()
            .insert(pattern.plant_id.clone());
    }

    let fleet: Vec<FleetPattern> = seen
        .into_iter()
        .filter(|(_, plants)| plants.len() >= min_plants)
        .map(|((pattern_type, metric), plants)| FleetPattern {
            pattern_type,
            metric,
            plants: plants.into_iter().collect(),
        })
        .collect();

    for group in &fleet {
        for pattern in patterns_by_plant
            .values_mut()
            .flatten()
            .filter(|p| p.pattern_type == group.pattern_type && p.metric == group.metric)
        {
            pattern.is_fleet_wide = true;
            pattern.affected_plants.clone_from(&group.plants);
        }
        info!(
            kind = %group.pattern_type,
            metric = %group.metric,
            plants = group.plants.len(),
            "Fleet-wide pattern"
        );
    }
    fleet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternFrequency;
    use chrono::NaiveDate;

    fn pattern(plant: &str, pattern_type: PatternType) -> Pattern {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Pattern {
            pattern_id: format!("PAT_{}_{plant}", pattern_type.id_tag()),
            plant_id: plant.to_string(),
            pattern_type,
            metric: Metric::PowerOutputKwh,
            description: String::new(),
            frequency: PatternFrequency::Annual,
            amplitude: None,
            significance_score: 50.0,
            confidence_pct: 80.0,
            first_observed_date: day,
            last_observed_date: day,
            occurrence_count: 2,
            affected_plants: vec![plant.to_string()],
            is_fleet_wide: false,
        }
    }

    #[test]
    fn test_shared_pattern_marked_fleet_wide() {
        let mut by_plant = BTreeMap::new();
        by_plant.insert("PLANT_B".to_string(), vec![pattern("PLANT_B", PatternType::Seasonal)]);
        by_plant.insert(
            "PLANT_A".to_string(),
            vec![
                pattern("PLANT_A", PatternType::Seasonal),
                pattern("PLANT_A", PatternType::Degradation),
            ],
        );

        let fleet = consolidate_fleet(&mut by_plant, 2);
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].plants, vec!["PLANT_A", "PLANT_B"]);

        let a = &by_plant["PLANT_A"];
        assert!(a[0].is_fleet_wide);
        assert_eq!(a[0].affected_plants, vec!["PLANT_A", "PLANT_B"]);
        assert!(!a[1].is_fleet_wide, "degradation only seen at one plant");
        assert_eq!(a[1].affected_plants, vec!["PLANT_A"]);
        assert!(by_plant["PLANT_B"][0].is_fleet_wide);
    }

    #[test]
    fn test_single_plant_never_fleet_wide() {
        let mut by_plant = BTreeMap::new();
        by_plant.insert("PLANT_A".to_string(), vec![pattern("PLANT_A", PatternType::WeeklyCycle)]);
        assert!(consolidate_fleet(&mut by_plant, 2).is_empty());
        assert!(!by_plant["PLANT_A"][0].is_fleet_wide);
    }
}
