// Reader for the parliamentary-seats time series.

use log::{debug, info, warn};

use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use std::path::PathBuf;

use sankey_flow::series::{EntitySeries, SeriesRules, YearValue};

use crate::charts::config_reader::SeatsSource;
use crate::charts::*;

pub fn read_seats_file(
    root_path: String,
    source: &SeatsSource,
    rules: &SeriesRules,
) -> ChartResult<Vec<EntitySeries>> {
    let p: PathBuf = [root_path, source.file_path.clone()].iter().collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read seats file {:?}", p2);
    match source.provider.as_str() {
        "json" => read_json_series(p2, rules),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn read_json_series(path: String, rules: &SeriesRules) -> ChartResult<Vec<EntitySeries>> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu {
        path: path.clone(),
    })?;
    let rows: Vec<JSMap<String, JSValue>> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;

    let mut res: Vec<EntitySeries> = Vec::new();
    for row in rows.iter() {
        let name = match row.get("Country Name").and_then(|v| v.as_str()) {
            Some(s) => s.to_string(),
            None => {
                warn!("read_json_series: skipping a row without a country name");
                continue;
            }
        };
        let code = row
            .get("Country Code")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let mut values: Vec<YearValue> = Vec::new();
        for year in rules.first_year..=rules.last_year {
            // null, absent and non-numeric years are not observations
            if let Some(value) = row.get(&year.to_string()).and_then(|v| v.as_f64()) {
                values.push(YearValue { year, value });
            }
        }
        debug!(
            "read_json_series: {:?}: {:?} observations",
            name,
            values.len()
        );
        res.push(EntitySeries { name, code, values });
    }
    Ok(res)
}
