//! Aggregation for the women-in-parliament time series: per-country yearly
//! percentages are filtered down to countries with enough coverage, then
//! ranked by their value in a fixed reference year.

use log::{debug, info};

use crate::round1;

/// One defined observation. Years without a numeric value never appear.
#[derive(PartialEq, Debug, Clone)]
pub struct YearValue {
    pub year: u16,
    pub value: f64,
}

/// The yearly observations for one country, ascending by year.
#[derive(PartialEq, Debug, Clone)]
pub struct EntitySeries {
    pub name: String,
    pub code: String,
    pub values: Vec<YearValue>,
}

impl EntitySeries {
    pub fn value_in(&self, year: u16) -> Option<f64> {
        self.values.iter().find(|v| v.year == year).map(|v| v.value)
    }
}

/// One entry of the reference-year ranking.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedEntity {
    pub name: String,
    pub value: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SeriesRules {
    pub first_year: u16,
    pub last_year: u16,
    /// Countries with fewer defined observations than this are dropped.
    pub min_points: usize,
    pub reference_year: u16,
}

impl SeriesRules {
    pub const DEFAULT_RULES: SeriesRules = SeriesRules {
        first_year: 1990,
        last_year: 2019,
        min_points: 5,
        reference_year: 2019,
    };
}

/// Keeps the entities with at least `min_points` defined observations,
/// preserving input order.
pub fn filter_series(raw: Vec<EntitySeries>, rules: &SeriesRules) -> Vec<EntitySeries> {
    let total = raw.len();
    let kept: Vec<EntitySeries> = raw
        .into_iter()
        .filter(|s| s.values.len() >= rules.min_points)
        .collect();
    info!(
        "filter_series: kept {:?} of {:?} entities (min {:?} points)",
        kept.len(),
        total,
        rules.min_points
    );
    kept
}

/// Ranks the entities by their value in the reference year, descending.
/// Entities without a defined value in that year are left out.
///
/// Ties keep the input order: the sort is stable and the source never
/// defined a tie-break beyond that, so the behavior is inherited as-is.
pub fn rank_by_reference_year(series: &[EntitySeries], year: u16) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = series
        .iter()
        .filter_map(|s| {
            s.value_in(year).map(|value| RankedEntity {
                name: s.name.clone(),
                value,
            })
        })
        .collect();
    // JSON numbers cannot be NaN, so the comparison is total in practice.
    ranked.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debug!("rank_by_reference_year: {:?} entities in {:?}", ranked.len(), year);
    ranked
}

/// The 1-based rank of the named entity, if it is in the ranking.
pub fn rank_of(ranking: &[RankedEntity], name: &str) -> Option<usize> {
    ranking.iter().position(|r| r.name == name).map(|i| i + 1)
}

/// Last defined value minus first defined value, rounded to one decimal.
/// `None` for a series with no observations.
pub fn net_change(series: &EntitySeries) -> Option<f64> {
    match (series.values.first(), series.values.last()) {
        (Some(first), Some(last)) => Some(round1(last.value - first.value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, points: &[(u16, f64)]) -> EntitySeries {
        EntitySeries {
            name: name.to_string(),
            code: name[..1.min(name.len())].to_string(),
            values: points
                .iter()
                .map(|(year, value)| YearValue {
                    year: *year,
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn filter_drops_sparse_entities() {
        let rules = SeriesRules::DEFAULT_RULES;
        let raw = vec![
            series(
                "A",
                &[
                    (1990, 1.0),
                    (1995, 2.0),
                    (2000, 3.0),
                    (2005, 4.0),
                    (2010, 5.0),
                ],
            ),
            series("B", &[(1990, 1.0), (2019, 2.0)]),
        ];
        let kept = filter_series(raw, &rules);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "A");
    }

    #[test]
    fn ranking_example() {
        let all = vec![
            series("A", &[(2019, 40.0)]),
            series("B", &[(2019, 55.0)]),
            series("C", &[(2019, 20.0)]),
        ];
        let ranking = rank_by_reference_year(&all, 2019);
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(rank_of(&ranking, "A"), Some(2));
        assert_eq!(rank_of(&ranking, "Z"), None);
    }

    #[test]
    fn ranking_skips_undefined_reference_year() {
        let all = vec![
            series("A", &[(2019, 40.0)]),
            series("B", &[(2018, 55.0)]),
        ];
        let ranking = rank_by_reference_year(&all, 2019);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].name, "A");
    }

    #[test]
    fn ties_keep_input_order() {
        // Inherited behavior: no tie-break beyond the stable sort.
        let all = vec![
            series("First", &[(2019, 30.0)]),
            series("Second", &[(2019, 30.0)]),
            series("Top", &[(2019, 31.0)]),
        ];
        let ranking = rank_by_reference_year(&all, 2019);
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "First", "Second"]);
    }

    #[test]
    fn net_change_first_to_last() {
        let s = series("A", &[(1990, 4.9), (2005, 16.0), (2019, 23.0)]);
        assert_eq!(net_change(&s), Some(18.1));
        let empty = series("B", &[]);
        assert_eq!(net_change(&empty), None);
    }
}
