use log::debug;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;

use crate::charts::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "chartName")]
    pub chart_name: String,
    #[serde(rename = "chartSubtitle")]
    pub chart_subtitle: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// The configuration echo at the top of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub chart: String,
    pub subtitle: Option<String>,
    pub emphasis: Option<String>,
}

/// One candidate data source. `provider` is `json` or `xlsx`.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// (xlsx) The worksheet to read; defaults to the first one.
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
    #[serde(rename = "partyColumnIndex")]
    _party_column_index: Option<JSValue>,
    #[serde(rename = "genderColumnIndex")]
    _gender_column_index: Option<JSValue>,
}

impl FileSource {
    /// (xlsx) 0-based party column, if configured. The configuration uses
    /// 1-based indexes to respect most conventions in the excel world.
    pub fn party_column_index(&self) -> ChartResult<Option<usize>> {
        read_js_column(&self._party_column_index)
    }

    pub fn gender_column_index(&self) -> ChartResult<Option<usize>> {
        read_js_column(&self._gender_column_index)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SeatsSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

/// The rules as they appear in the configuration file. Values may be JSON
/// numbers or strings; [crate::charts::validate_rules] parses them and fills
/// in the defaults.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawRules {
    #[serde(rename = "sideEmphasis")]
    pub side_emphasis: Option<JSValue>,
    #[serde(rename = "minDataPoints")]
    pub min_data_points: Option<JSValue>,
    #[serde(rename = "referenceYear")]
    pub reference_year: Option<JSValue>,
    #[serde(rename = "firstYear")]
    pub first_year: Option<JSValue>,
    #[serde(rename = "lastYear")]
    pub last_year: Option<JSValue>,
    #[serde(rename = "focusEntity")]
    pub focus_entity: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "candidateFileSources", default)]
    pub candidate_file_sources: Vec<FileSource>,
    #[serde(rename = "seatsFileSource")]
    pub seats_file_source: Option<SeatsSource>,
    pub rules: RawRules,
}

pub fn read_summary(path: String) -> ChartResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu {
        path: path.clone(),
    })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

fn read_js_int(x: &JSValue) -> ChartResult<usize> {
    match x {
        JSValue::Number(n) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        JSValue::String(s) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

fn read_js_column(x: &Option<JSValue>) -> ChartResult<Option<usize>> {
    match x {
        None => Ok(None),
        Some(v) => match read_js_int(v)? {
            0 => whatever!("Column indexes are 1-based, got 0"),
            i => Ok(Some(i - 1)),
        },
    }
}

pub fn read_js_f64(x: &Option<JSValue>, default: f64) -> ChartResult<f64> {
    match x {
        None => Ok(default),
        Some(JSValue::Number(n)) => n.as_f64().context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.parse::<f64>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

pub fn read_js_u16(x: &Option<JSValue>, default: u16) -> ChartResult<u16> {
    match x {
        None => Ok(default),
        Some(v) => {
            let i = read_js_int(v)?;
            u16::try_from(i).ok().context(ParsingJsonNumberSnafu {})
        }
    }
}

pub fn read_js_usize(x: &Option<JSValue>, default: usize) -> ChartResult<usize> {
    match x {
        None => Ok(default),
        Some(v) => read_js_int(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(js: &str) -> FileSource {
        serde_json::from_str(js).unwrap()
    }

    #[test]
    fn column_indexes_convert_from_one_based() {
        // Numbers and strings are both accepted, as everywhere in the config.
        let src = source(
            r#"{"provider": "xlsx", "filePath": "f.xlsx",
                "partyColumnIndex": 2, "genderColumnIndex": "3"}"#,
        );
        assert_eq!(src.party_column_index().unwrap(), Some(1));
        assert_eq!(src.gender_column_index().unwrap(), Some(2));
    }

    #[test]
    fn column_index_zero_is_rejected() {
        let src = source(r#"{"provider": "xlsx", "filePath": "f.xlsx", "partyColumnIndex": 0}"#);
        assert!(src.party_column_index().is_err());
        assert_eq!(src.gender_column_index().unwrap(), None);
    }
}
