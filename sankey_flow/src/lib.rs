mod config;
pub mod builder;
pub mod manual;
pub mod series;

use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

/// Summary of one flow-graph build: the presentation-ready graph plus the
/// headline statistics for the chart copy.
#[derive(PartialEq, Debug, Clone)]
pub struct FlowResult {
    pub graph: ScaledFlowGraph,
    pub total_records: u64,
    pub distinct_parties: usize,
    /// Share of female candidates in percent, one decimal. `None` when there
    /// are no records (an "N/A" for the caller, never a NaN).
    pub female_share: Option<f64>,
}

/// Builds the flow graph for the given records and applies the gender-side
/// emphasis exactly once.
///
/// This is the entry point callers should use; it guarantees the rescale and
/// the statistics are computed from the same record list.
pub fn run_flow_stats(
    records: &[CandidateRecord],
    style: &StyleConfig,
    rules: &FlowRules,
) -> FlowResult {
    info!(
        "run_flow_stats: processing {:?} records, rules: {:?}",
        records.len(),
        rules
    );
    let graph = build_flow_graph(records, style);
    let female_count = records.iter().filter(|r| r.gender == "F").count() as u64;
    let total_records = records.len() as u64;
    FlowResult {
        graph: graph.emphasize(rules.side_emphasis),
        total_records,
        distinct_parties: distinct_parties(records),
        female_share: share_percent(female_count, total_records),
    }
}

/// Reduces the record list into the raw bipartite party -> gender flow graph.
///
/// Node ids are dense and start at 0: one node per party in first-seen order,
/// then one node per gender with a strictly positive tally. The gender side
/// follows the fixed `M`, `F` universe order; codes outside the universe are
/// appended in first-seen order and take the fallback color. Edges carry the
/// per-pair counts in pair first-seen order; pairs that were never observed
/// produce no edge.
///
/// Empty input produces an empty graph. This is the "no data" state, not an
/// error.
pub fn build_flow_graph(records: &[CandidateRecord], style: &StyleConfig) -> FlowGraph {
    // One pass for the three tallies. The maps carry the counts, the vectors
    // pin the emission order.
    let mut party_counts: HashMap<String, u64> = HashMap::new();
    let mut party_order: Vec<String> = Vec::new();
    let mut gender_counts: HashMap<String, u64> = HashMap::new();
    let mut gender_order: Vec<String> = style.gender_universe();
    let mut pair_counts: HashMap<(String, String), u64> = HashMap::new();
    let mut pair_order: Vec<(String, String)> = Vec::new();

    for g in gender_order.iter() {
        gender_counts.insert(g.clone(), 0);
    }

    for r in records.iter() {
        let pc = party_counts.entry(r.party.clone()).or_insert(0);
        if *pc == 0 {
            party_order.push(r.party.clone());
        }
        *pc += 1;

        if !gender_counts.contains_key(&r.gender) {
            gender_order.push(r.gender.clone());
        }
        *gender_counts.entry(r.gender.clone()).or_insert(0) += 1;

        let pair = (r.party.clone(), r.gender.clone());
        let cc = pair_counts.entry(pair.clone()).or_insert(0);
        if *cc == 0 {
            pair_order.push(pair);
        }
        *cc += 1;
    }
    debug!(
        "build_flow_graph: parties: {:?} genders: {:?} pairs: {:?}",
        party_counts, gender_counts, pair_counts
    );

    let mut nodes: Vec<FlowNode> = Vec::new();
    let mut node_ids: HashMap<String, usize> = HashMap::new();

    for party in party_order.iter() {
        let id = nodes.len();
        nodes.push(FlowNode {
            id,
            name: party.clone(),
            side: NodeSide::Party,
            value: party_counts[party],
            color: style.party_color(party).to_string(),
        });
        node_ids.insert(party.clone(), id);
    }

    // Gender keys with a zero tally get no node and no edges.
    for gender in gender_order.iter() {
        let count = gender_counts[gender];
        if count > 0 {
            let id = nodes.len();
            nodes.push(FlowNode {
                id,
                name: style.gender_name(gender).to_string(),
                side: NodeSide::Gender,
                value: count,
                color: style.gender_color(gender).to_string(),
            });
            node_ids.insert(gender.clone(), id);
        }
    }

    let edges: Vec<FlowEdge> = pair_order
        .iter()
        .map(|pair| FlowEdge {
            source: node_ids[&pair.0],
            target: node_ids[&pair.1],
            value: pair_counts[pair],
        })
        .collect();

    info!(
        "build_flow_graph: {:?} nodes, {:?} edges",
        nodes.len(),
        edges.len()
    );
    FlowGraph { nodes, edges }
}

impl FlowGraph {
    /// Rescales the gender side so its values sum to `emphasis` times the
    /// party total, keeping the party side untouched.
    ///
    /// The party side naturally splits the same total across many small nodes
    /// while the gender side concentrates it in two; without this step a
    /// proportional-flow rendering draws the gender side far too thin.
    ///
    /// Consumes the raw graph: the factor can only ever be applied once.
    /// If either side is empty the graph passes through with factor 1.0.
    pub fn emphasize(self, emphasis: f64) -> ScaledFlowGraph {
        let total_party: u64 = side_total(&self, NodeSide::Party);
        let total_gender: u64 = side_total(&self, NodeSide::Gender);

        let scale_factor = if total_party == 0 || total_gender == 0 {
            1.0
        } else {
            (total_party as f64) * emphasis / (total_gender as f64)
        };
        debug!(
            "emphasize: party total {:?}, gender total {:?}, factor {:?}",
            total_party, total_gender, scale_factor
        );

        let nodes = self
            .nodes
            .into_iter()
            .map(|n| {
                let value = match n.side {
                    NodeSide::Party => n.value as f64,
                    NodeSide::Gender => n.value as f64 * scale_factor,
                };
                ScaledFlowNode {
                    id: n.id,
                    name: n.name,
                    side: n.side,
                    value,
                    color: n.color,
                }
            })
            .collect();

        // Every edge targets a gender node, so every edge is rescaled.
        let edges = self
            .edges
            .into_iter()
            .map(|e| ScaledFlowEdge {
                source: e.source,
                target: e.target,
                value: e.value as f64 * scale_factor,
            })
            .collect();

        ScaledFlowGraph {
            nodes,
            edges,
            scale_factor,
        }
    }
}

fn side_total(graph: &FlowGraph, side: NodeSide) -> u64 {
    graph
        .nodes
        .iter()
        .filter(|n| n.side == side)
        .map(|n| n.value)
        .sum()
}

/// `100 * count / total`, rounded to one decimal.
///
/// Returns `None` when `total` is zero so the caller renders an explicit
/// "N/A" instead of dividing by zero.
pub fn share_percent(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(round1(100.0 * count as f64 / total as f64))
    }
}

/// The number of distinct party codes observed across the records.
pub fn distinct_parties(records: &[CandidateRecord]) -> usize {
    let parties: HashSet<&str> = records.iter().map(|r| r.party.as_str()).collect();
    parties.len()
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[(&str, &str)]) -> Vec<CandidateRecord> {
        rows.iter()
            .map(|(p, g)| CandidateRecord::new(p, g))
            .collect()
    }

    fn side_sum(graph: &FlowGraph, side: NodeSide) -> u64 {
        graph
            .nodes
            .iter()
            .filter(|n| n.side == side)
            .map(|n| n.value)
            .sum()
    }

    #[test]
    fn three_record_example() {
        let style = StyleConfig::default();
        let recs = records(&[("PAP", "F"), ("PAP", "M"), ("WP", "F")]);
        let graph = build_flow_graph(&recs, &style);

        let names: Vec<(&str, u64)> = graph
            .nodes
            .iter()
            .map(|n| (n.name.as_str(), n.value))
            .collect();
        assert_eq!(
            names,
            vec![("PAP", 2), ("WP", 1), ("Male", 1), ("Female", 2)]
        );

        // Pair first-seen order: PAP-F, PAP-M, WP-F.
        let male = 2;
        let female = 3;
        assert_eq!(
            graph.edges,
            vec![
                FlowEdge {
                    source: 0,
                    target: female,
                    value: 1
                },
                FlowEdge {
                    source: 0,
                    target: male,
                    value: 1
                },
                FlowEdge {
                    source: 1,
                    target: female,
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn totals_match_record_count() {
        let style = StyleConfig::default();
        let recs = records(&[
            ("PAP", "F"),
            ("PAP", "M"),
            ("WP", "F"),
            ("PSP", "M"),
            ("PAP", "M"),
            ("WP", "M"),
        ]);
        let graph = build_flow_graph(&recs, &style);
        assert_eq!(side_sum(&graph, NodeSide::Party), 6);
        assert_eq!(side_sum(&graph, NodeSide::Gender), 6);
        let edge_sum: u64 = graph.edges.iter().map(|e| e.value).sum();
        assert_eq!(edge_sum, 6);
        // 5 distinct observed pairs: PAP-F, PAP-M, WP-F, PSP-M, WP-M.
        assert_eq!(graph.edges.len(), 5);
    }

    #[test]
    fn single_gender_side() {
        let style = StyleConfig::default();
        let recs = records(&[("PAP", "M"), ("WP", "M")]);
        let graph = build_flow_graph(&recs, &style);
        // No female node, and no id gap.
        let gender_nodes: Vec<&FlowNode> = graph
            .nodes
            .iter()
            .filter(|n| n.side == NodeSide::Gender)
            .collect();
        assert_eq!(gender_nodes.len(), 1);
        assert_eq!(gender_nodes[0].name, "Male");
        assert_eq!(gender_nodes[0].id, 2);
    }

    #[test]
    fn unknown_codes_use_fallback_color() {
        let style = StyleConfig::default();
        let recs = records(&[("XYZ", "F"), ("XYZ", "X")]);
        let graph = build_flow_graph(&recs, &style);
        let xyz = &graph.nodes[0];
        assert_eq!(xyz.color, FALLBACK_COLOR);
        assert_eq!(xyz.value, 2);
        // The unknown gender code appends after the M/F universe.
        let last = graph.nodes.last().unwrap();
        assert_eq!(last.name, "X");
        assert_eq!(last.color, FALLBACK_COLOR);
        assert_eq!(side_sum(&graph, NodeSide::Gender), 2);
    }

    #[test]
    fn empty_records_empty_graph() {
        let style = StyleConfig::default();
        let graph = build_flow_graph(&[], &style);
        assert!(graph.is_empty());
        assert!(graph.edges.is_empty());
        // The rescale on an empty graph is a no-op.
        let scaled = graph.emphasize(8.0);
        assert!(scaled.is_empty());
        assert_eq!(scaled.scale_factor, 1.0);
    }

    #[test]
    fn emphasize_scales_gender_side_only() {
        let style = StyleConfig::default();
        let recs = records(&[("PAP", "F"), ("PAP", "M"), ("WP", "F")]);
        let scaled = build_flow_graph(&recs, &style).emphasize(8.0);

        let party_total: f64 = scaled
            .nodes
            .iter()
            .filter(|n| n.side == NodeSide::Party)
            .map(|n| n.value)
            .sum();
        let gender_total: f64 = scaled
            .nodes
            .iter()
            .filter(|n| n.side == NodeSide::Gender)
            .map(|n| n.value)
            .sum();
        assert_eq!(party_total, 3.0);
        assert!((gender_total - 8.0 * party_total).abs() < 1e-9);
        // All edges target the gender side, so all of them carry the factor.
        for e in scaled.edges.iter() {
            assert!((e.value - 8.0).abs() < 1e-9);
        }
    }

    #[test]
    fn run_flow_stats_applies_factor_once() {
        let recs = records(&[
            ("PAP", "F"),
            ("PAP", "M"),
            ("WP", "F"),
            ("PSP", "M"),
            ("PAP", "M"),
            ("WP", "M"),
        ]);
        let res = run_flow_stats(&recs, &StyleConfig::default(), &FlowRules::DEFAULT_RULES);
        let gender_total: f64 = res
            .graph
            .nodes
            .iter()
            .filter(|n| n.side == NodeSide::Gender)
            .map(|n| n.value)
            .sum();
        // 8x the party total, not 64x: the emphasis ran exactly once.
        assert!((gender_total - 48.0).abs() < 1e-9);
        assert_eq!(res.total_records, 6);
        assert_eq!(res.distinct_parties, 3);
        assert_eq!(res.female_share, Some(33.3));
    }

    #[test]
    fn share_percent_rounds_to_one_decimal() {
        assert_eq!(share_percent(1, 3), Some(33.3));
        assert_eq!(share_percent(2, 3), Some(66.7));
        assert_eq!(share_percent(0, 5), Some(0.0));
        assert_eq!(share_percent(5, 5), Some(100.0));
    }

    #[test]
    fn share_percent_of_nothing_is_undefined() {
        assert_eq!(share_percent(0, 0), None);
        let res = run_flow_stats(&[], &StyleConfig::default(), &FlowRules::DEFAULT_RULES);
        assert_eq!(res.female_share, None);
        assert_eq!(res.distinct_parties, 0);
    }

    #[test]
    fn distinct_parties_counts_keys_once() {
        let recs = records(&[("PAP", "F"), ("PAP", "M"), ("WP", "F"), ("PAP", "F")]);
        assert_eq!(distinct_parties(&recs), 2);
    }
}
