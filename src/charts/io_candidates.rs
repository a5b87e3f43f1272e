// Readers for the candidate roster files.

use log::{debug, info};

use calamine::{open_workbook, Reader, Xlsx};
use serde::Deserialize;
use snafu::prelude::*;
use std::fs;
use std::path::PathBuf;

use sankey_flow::CandidateRecord;

use crate::charts::config_reader::FileSource;
use crate::charts::*;

/// One row of the candidates JSON file. Source files carry more fields
/// (name, constituency, ...); everything else is dropped here.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct CandidateRow {
    party: String,
    gender: String,
}

pub fn read_candidate_file(
    root_path: String,
    cfs: &FileSource,
) -> ChartResult<Vec<CandidateRecord>> {
    let p: PathBuf = [root_path, cfs.file_path.clone()].iter().collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read candidate file {:?}", p2);
    match cfs.provider.as_str() {
        "json" => read_json_candidates(p2),
        "xlsx" => read_xlsx_candidates(p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn read_json_candidates(path: String) -> ChartResult<Vec<CandidateRecord>> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu {
        path: path.clone(),
    })?;
    let rows: Vec<CandidateRow> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_json_candidates: {:?} rows", rows.len());
    Ok(rows
        .iter()
        .map(|r| CandidateRecord::new(&r.party, &r.gender))
        .collect())
}

fn read_xlsx_candidates(path: String, cfs: &FileSource) -> ChartResult<Vec<CandidateRecord>> {
    let p = path.clone();
    let mut workbook: Xlsx<_> = open_workbook(p).context(OpeningExcelSnafu { path: path.clone() })?;
    let wrange = match cfs.worksheet_name.clone() {
        Some(name) => workbook
            .worksheet_range(name.as_str())
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu {})?;
    debug!("header: {:?}", header);

    let party_idx = match cfs.party_column_index()? {
        Some(idx) => idx,
        None => find_column(header, "party")?,
    };
    let gender_idx = match cfs.gender_column_index()? {
        Some(idx) => idx,
        None => find_column(header, "gender")?,
    };

    let mut res: Vec<CandidateRecord> = Vec::new();
    for row in rows {
        let party = read_cell_string(row.get(party_idx))?;
        let gender = read_cell_string(row.get(gender_idx))?;
        // Exported spreadsheets commonly end with blank rows.
        if party.is_empty() && gender.is_empty() {
            continue;
        }
        res.push(CandidateRecord::new(&party, &gender));
    }
    debug!("read_xlsx_candidates: {:?} rows", res.len());
    Ok(res)
}

fn find_column(header: &[calamine::DataType], name: &str) -> ChartResult<usize> {
    let found = header.iter().position(|c| match c {
        calamine::DataType::String(s) => s.trim().eq_ignore_ascii_case(name),
        _ => false,
    });
    match found {
        Some(idx) => Ok(idx),
        None => whatever!("Missing column {:?} in header row {:?}", name, header),
    }
}

fn read_cell_string(cell: Option<&calamine::DataType>) -> ChartResult<String> {
    match cell {
        Some(calamine::DataType::String(s)) => Ok(s.trim().to_string()),
        Some(calamine::DataType::Empty) | None => Ok("".to_string()),
        Some(c) => whatever!("read_cell_string: could not understand cell {:?}", c),
    }
}
