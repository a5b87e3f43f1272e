pub use crate::config::*;
use crate::{run_flow_stats, FlowResult};

/// A builder for assembling records one at a time.
///
/// Convenient when the records do not arrive as a ready-made slice, for
/// example when decoding rows from a spreadsheet.
///
/// ```
/// pub use sankey_flow::builder::Builder;
/// pub use sankey_flow::FlowRules;
///
/// let mut builder = Builder::new(&FlowRules::DEFAULT_RULES);
/// builder.add_record("PAP", "F");
/// builder.add_record("WP", "M");
///
/// let result = builder.build();
/// assert_eq!(result.total_records, 2);
/// ```
pub struct Builder {
    pub(crate) _rules: FlowRules,
    pub(crate) _style: StyleConfig,
    pub(crate) _records: Vec<CandidateRecord>,
}

impl Builder {
    pub fn new(rules: &FlowRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _style: StyleConfig::default(),
            _records: Vec::new(),
        }
    }

    pub fn style(self, style: &StyleConfig) -> Builder {
        Builder {
            _rules: self._rules,
            _style: style.clone(),
            _records: self._records,
        }
    }

    pub fn add_record(&mut self, party: &str, gender: &str) {
        self._records.push(CandidateRecord::new(party, gender));
    }

    pub fn add_records(&mut self, records: &[CandidateRecord]) {
        self._records.extend_from_slice(records);
    }

    /// Builds the graph and applies the emphasis once.
    pub fn build(&self) -> FlowResult {
        run_flow_stats(&self._records, &self._style, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_matches_direct_call() {
        let mut builder = Builder::new(&FlowRules::DEFAULT_RULES);
        builder.add_record("PAP", "F");
        builder.add_record("PAP", "M");
        builder.add_record("WP", "F");
        let from_builder = builder.build();

        let records = vec![
            CandidateRecord::new("PAP", "F"),
            CandidateRecord::new("PAP", "M"),
            CandidateRecord::new("WP", "F"),
        ];
        let direct = run_flow_stats(
            &records,
            &StyleConfig::default(),
            &FlowRules::DEFAULT_RULES,
        );
        assert_eq!(from_builder, direct);
    }
}
