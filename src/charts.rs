use log::{info, warn};

use sankey_flow::series::{
    filter_series, net_change, rank_by_reference_year, rank_of, EntitySeries, RankedEntity,
    SeriesRules,
};
use sankey_flow::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::charts::config_reader::*;

pub mod config_reader;
pub mod io_candidates;
pub mod io_series;

#[derive(Debug, Snafu)]
pub enum ChartError {
    #[snafu(display("Error opening spreadsheet {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display(""))]
    EmptyExcel {},
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    ParsingJsonNumber {},
    #[snafu(display(""))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ChartResult<T> = Result<T, ChartError>;

/// The rules after validation: raw JSON fields parsed into their types,
/// defaults filled in.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartRules {
    pub side_emphasis: f64,
    pub focus_entity: Option<String>,
    pub series: SeriesRules,
}

pub fn validate_rules(raw: &RawRules) -> ChartResult<ChartRules> {
    let defaults = SeriesRules::DEFAULT_RULES;
    let side_emphasis = read_js_f64(&raw.side_emphasis, FlowRules::DEFAULT_RULES.side_emphasis)?;
    if side_emphasis <= 0.0 {
        whatever!("sideEmphasis must be strictly positive: {:?}", side_emphasis);
    }
    let series = SeriesRules {
        first_year: read_js_u16(&raw.first_year, defaults.first_year)?,
        last_year: read_js_u16(&raw.last_year, defaults.last_year)?,
        min_points: read_js_usize(&raw.min_data_points, defaults.min_points)?,
        reference_year: read_js_u16(&raw.reference_year, defaults.reference_year)?,
    };
    if series.first_year > series.last_year {
        whatever!(
            "firstYear {:?} is after lastYear {:?}",
            series.first_year,
            series.last_year
        );
    }
    Ok(ChartRules {
        side_emphasis,
        focus_entity: raw.focus_entity.clone(),
        series,
    })
}

// All numeric values in the summary are rendered as strings: whole values
// without a decimal point, everything else with one decimal.
fn format_count(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

fn format_pct(v: f64) -> String {
    format!("{:.1}", v)
}

fn side_label(side: NodeSide) -> &'static str {
    match side {
        NodeSide::Party => "party",
        NodeSide::Gender => "gender",
    }
}

fn sankey_summary_js(res: &FlowResult, style: &StyleConfig) -> JSValue {
    let nodes: Vec<JSValue> = res
        .graph
        .nodes
        .iter()
        .map(|n| {
            json!({
                "color": n.color,
                "id": n.id,
                "name": n.name,
                "side": side_label(n.side),
                "value": format_count(n.value),
            })
        })
        .collect();

    let links: Vec<JSValue> = res
        .graph
        .edges
        .iter()
        .map(|e| {
            let source = &res.graph.nodes[e.source];
            json!({
                "source": e.source,
                "sourceName": style.party_name(&source.name),
                "target": e.target,
                "value": format_count(e.value),
            })
        })
        .collect();

    let stats = json!({
        "distinctParties": res.distinct_parties.to_string(),
        "femaleShare": res.female_share.map(format_pct).unwrap_or_else(|| "N/A".to_string()),
        "totalCandidates": res.total_records.to_string(),
    });

    json!({"links": links, "nodes": nodes, "stats": stats})
}

fn seats_summary_js(raw: &[EntitySeries], rules: &ChartRules) -> JSValue {
    let kept = filter_series(raw.to_vec(), &rules.series);
    let ranking = rank_by_reference_year(&kept, rules.series.reference_year);

    let ranked_entry = |r: &RankedEntity| json!({"country": r.name, "value": format_pct(r.value)});
    let highest = ranking.first().map(ranked_entry);
    let lowest = ranking.last().map(ranked_entry);

    let (focus_js, change_js) = match rules.focus_entity.as_deref() {
        Some(name) => {
            let focus_js = match (
                rank_of(&ranking, name),
                ranking.iter().find(|r| r.name == name),
            ) {
                (Some(rank), Some(entry)) => {
                    json!({"country": name, "rank": rank, "value": format_pct(entry.value)})
                }
                _ => JSValue::Null,
            };
            // The net change is measured on the raw series, before the
            // coverage filter.
            let change = raw.iter().find(|s| s.name == name).and_then(net_change);
            let change_js = json!(change
                .map(|c| format!("{}%", format_pct(c)))
                .unwrap_or_else(|| "N/A".to_string()));
            (focus_js, change_js)
        }
        None => (JSValue::Null, json!("N/A")),
    };

    json!({
        "change": change_js,
        "countries": ranking.len(),
        "focus": focus_js,
        "highest": highest,
        "lowest": lowest,
        "referenceYear": rules.series.reference_year,
        "tracked": kept.len(),
    })
}

/// Runs the configured charts end to end: read, aggregate, emit the summary,
/// optionally check it against a reference.
pub fn run_charts(
    config_path: String,
    out_path: Option<String>,
    check_summary_path: Option<String>,
) -> ChartResult<()> {
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningJsonSnafu {
        path: config_path.clone(),
    })?;
    let config: ChartConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {
        path: config_path.clone(),
    })?;
    info!("config: {:?}", config);

    let rules = validate_rules(&config.rules)?;
    let style = StyleConfig::default();

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let root = root_p.to_string_lossy().to_string();

    let mut summary: JSMap<String, JSValue> = JSMap::new();
    summary.insert(
        "config".to_string(),
        json!(OutputConfig {
            chart: config.output_settings.chart_name.clone(),
            subtitle: config.output_settings.chart_subtitle.clone(),
            emphasis: Some(format_count(rules.side_emphasis)),
        }),
    );

    if !config.candidate_file_sources.is_empty() {
        let mut records: Vec<CandidateRecord> = Vec::new();
        for cfs in config.candidate_file_sources.iter() {
            let mut file_records = io_candidates::read_candidate_file(root.clone(), cfs)?;
            records.append(&mut file_records);
        }
        if records.is_empty() {
            // Not an error: the summary carries the no-data placeholder.
            warn!("No candidate records found in the configured sources");
        }
        let res = run_flow_stats(
            &records,
            &style,
            &FlowRules {
                side_emphasis: rules.side_emphasis,
            },
        );
        summary.insert("sankey".to_string(), sankey_summary_js(&res, &style));
    }

    if let Some(sfs) = config.seats_file_source.as_ref() {
        let raw = io_series::read_seats_file(root.clone(), sfs, &rules.series)?;
        summary.insert("seats".to_string(), seats_summary_js(&raw, &rules));
    }

    let result_js = JSValue::Object(summary);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js)
        .whatever_context("Failed to render the summary")?;
    println!("summary:{}", pretty_js_stats);

    let out = out_path.or_else(|| {
        config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| format!("{}/summary.json", d))
    });
    match out {
        Some(p) if p != "stdout" => {
            fs::write(p.clone(), &pretty_js_stats).context(WritingSummarySnafu { path: p })?;
        }
        _ => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref = serde_json::to_string_pretty(&summary_ref)
            .whatever_context("Failed to render the reference summary")?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_chart_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    use snafu::ErrorCompat;

    let test_dir = option_env!("CHART_TEST_DIR").unwrap_or("test_data");
    info!("Running test {}", test_name);
    let res = run_charts(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        None,
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    );
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(e) {
            eprintln!("trace: {}", bt);
        }
    }
    assert!(res.is_ok(), "test {} failed: {:?}", test_name, res.err());
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_chart_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {

    use super::{run_charts, test_wrapper};

    #[test]
    fn candidates_demo() {
        test_wrapper("candidates_demo");
    }

    #[test]
    fn xlsx_demo() {
        test_wrapper("xlsx_demo");
    }

    #[test]
    fn summary_write_error_names_the_target() {
        let test_dir = option_env!("CHART_TEST_DIR").unwrap_or("test_data");
        let res = run_charts(
            format!("{}/candidates_demo/candidates_demo_config.json", test_dir),
            Some(format!("{}/candidates_demo/no_such_dir/summary.json", test_dir)),
            None,
        );
        let message = format!("{}", res.err().unwrap());
        assert!(message.contains("Error writing summary"), "{}", message);
    }

    #[test]
    fn seats_demo() {
        test_wrapper("seats_demo");
    }

    #[test]
    fn combined_demo() {
        test_wrapper("combined_demo");
    }

    #[test]
    fn no_data_demo() {
        test_wrapper("no_data_demo");
    }
}
