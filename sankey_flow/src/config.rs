// ********* Input data structures ***********

/// One candidate row from the election roster.
///
/// Source files usually carry more fields (name, constituency, ...); only the
/// two grouping keys matter for the flow graph and the readers drop the rest.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct CandidateRecord {
    /// Party code, e.g. `"PAP"`. Codes outside the known palette are kept.
    pub party: String,
    /// Gender code, normally `"M"` or `"F"`. Unknown codes are kept.
    pub gender: String,
}

impl CandidateRecord {
    pub fn new(party: &str, gender: &str) -> CandidateRecord {
        CandidateRecord {
            party: party.to_string(),
            gender: gender.to_string(),
        }
    }
}

// ******** Output data structures *********

/// The two disjoint sides of the bipartite flow graph.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NodeSide {
    Party,
    Gender,
}

/// A node of the raw (un-rescaled) flow graph. Values are plain counts.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FlowNode {
    /// Dense index starting at 0: party nodes first, then gender nodes.
    pub id: usize,
    pub name: String,
    pub side: NodeSide,
    pub value: u64,
    pub color: String,
}

/// A directed party -> gender edge of the raw flow graph.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

/// The raw bipartite flow graph, values in record counts.
///
/// For non-empty input, the party values, the gender values and the edge
/// values each sum to the number of input records.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// The "no data" state. Callers render a placeholder, this is not an error.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A node after the gender side has been rescaled for presentation.
#[derive(PartialEq, Debug, Clone)]
pub struct ScaledFlowNode {
    pub id: usize,
    pub name: String,
    pub side: NodeSide,
    pub value: f64,
    pub color: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ScaledFlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// The flow graph after [FlowGraph::emphasize] has been applied.
///
/// There is deliberately no operation that rescales a `ScaledFlowGraph`:
/// applying the factor twice would corrupt the proportions, so the one-shot
/// step is enforced by the type instead of by call-site discipline.
#[derive(PartialEq, Debug, Clone)]
pub struct ScaledFlowGraph {
    pub nodes: Vec<ScaledFlowNode>,
    pub edges: Vec<ScaledFlowEdge>,
    /// The factor that was applied to the gender side.
    pub scale_factor: f64,
}

impl ScaledFlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ********* Configuration **********

/// The fallback color for party or gender codes outside the known tables.
pub const FALLBACK_COLOR: &str = "#95A5A6";

const PARTY_COLORS: &[(&str, &str)] = &[
    ("PAP", "#FF6B6B"),
    ("WP", "#4ECDC4"),
    ("PSP", "#45B7D1"),
    ("SDP", "#96CEB4"),
    ("NSP", "#FFEAA7"),
    ("RP", "#DDA0DD"),
    ("PV", "#FFB347"),
    ("SDA", "#98D8C8"),
    ("RDU", "#F7DC6F"),
    ("SPP", "#BB8FCE"),
];

const GENDER_COLORS: &[(&str, &str)] = &[("M", "#74B9FF"), ("F", "#FD79A8")];

const PARTY_NAMES: &[(&str, &str)] = &[
    ("PAP", "People's Action Party"),
    ("WP", "Workers' Party"),
    ("PSP", "Progress Singapore Party"),
    ("SDP", "Singapore Democratic Party"),
    ("NSP", "National Solidarity Party"),
    ("RP", "Reform Party"),
    ("PV", "People's Voice"),
    ("SDA", "Singapore Democratic Alliance"),
    ("RDU", "Red Dot United"),
    ("SPP", "Singapore People's Party"),
];

/// The fixed color and display-name tables.
///
/// Lookups never fail: unknown keys get [FALLBACK_COLOR] and display as
/// their raw code.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StyleConfig {
    party_colors: Vec<(String, String)>,
    gender_colors: Vec<(String, String)>,
    party_names: Vec<(String, String)>,
    fallback_color: String,
}

impl StyleConfig {
    pub fn party_color(&self, code: &str) -> &str {
        lookup(&self.party_colors, code).unwrap_or(&self.fallback_color)
    }

    pub fn gender_color(&self, code: &str) -> &str {
        lookup(&self.gender_colors, code).unwrap_or(&self.fallback_color)
    }

    /// The full display name of a party, or the code itself if unknown.
    pub fn party_name<'a>(&'a self, code: &'a str) -> &'a str {
        lookup(&self.party_names, code).unwrap_or(code)
    }

    /// The gender node label: `M` -> `Male`, `F` -> `Female`, other codes as-is.
    pub fn gender_name<'a>(&self, code: &'a str) -> &'a str {
        match code {
            "M" => "Male",
            "F" => "Female",
            x => x,
        }
    }

    /// The gender key universe, in the order the nodes should be considered.
    pub fn gender_universe(&self) -> Vec<String> {
        self.gender_colors.iter().map(|(g, _)| g.clone()).collect()
    }
}

fn lookup<'a>(table: &'a [(String, String)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl Default for StyleConfig {
    fn default() -> StyleConfig {
        fn own(table: &[(&str, &str)]) -> Vec<(String, String)> {
            table
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        }
        StyleConfig {
            party_colors: own(PARTY_COLORS),
            gender_colors: own(GENDER_COLORS),
            party_names: own(PARTY_NAMES),
            fallback_color: FALLBACK_COLOR.to_string(),
        }
    }
}

/// Tuning knobs for the flow-graph build.
#[derive(PartialEq, Debug, Clone)]
pub struct FlowRules {
    /// The emphasis constant applied to the gender side: after the rescale,
    /// the gender values sum to `side_emphasis` times the party values.
    /// This is a presentation knob, not a derived invariant.
    pub side_emphasis: f64,
}

impl FlowRules {
    pub const DEFAULT_RULES: FlowRules = FlowRules { side_emphasis: 8.0 };
}
