// Primitives for writing the report tables as CSV files.

use snafu::ResultExt;
use std::path::{Path, PathBuf};

use csv::Writer;
use duty_roster::{FairnessAnalysis, RawRecord, RosterReport};

use crate::fairness::{DfResult, WritingCsvSnafu};

const RAW_HEADER: [&str; 6] = ["Arquivo", "Data", "Dia", "Posto", "Nome", "Companhia"];
const ANALYSIS_HEADER: [&str; 3] = ["Nome", "Contagem", "Detalhes"];

fn open_writer(path: &Path) -> DfResult<Writer<std::fs::File>> {
    Writer::from_path(path).context(WritingCsvSnafu {
        path: path.display().to_string(),
    })
}

pub fn write_raw_table(path: &Path, rows: &[RawRecord]) -> DfResult<()> {
    let p = path.display().to_string();
    let mut wtr = open_writer(path)?;
    wtr.write_record(RAW_HEADER)
        .context(WritingCsvSnafu { path: p.clone() })?;
    for row in rows.iter() {
        wtr.write_record(row.columns())
            .context(WritingCsvSnafu { path: p.clone() })?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(WritingCsvSnafu { path: p })
}

/// The summary row comes first, above the header.
pub fn write_analysis_table(path: &Path, analysis: &FairnessAnalysis) -> DfResult<()> {
    let p = path.display().to_string();
    let mut wtr = open_writer(path)?;
    let summary = analysis.summary_header();
    wtr.write_record([summary.as_str(), "", ""])
        .context(WritingCsvSnafu { path: p.clone() })?;
    wtr.write_record(ANALYSIS_HEADER)
        .context(WritingCsvSnafu { path: p.clone() })?;
    for person in analysis.persons.iter() {
        let count = person.count.to_string();
        let details = person.details();
        wtr.write_record([person.display_name.as_str(), count.as_str(), details.as_str()])
            .context(WritingCsvSnafu { path: p.clone() })?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(WritingCsvSnafu { path: p })
}

/// Writes both tables in `out_dir`. Returns the paths of the raw table and of
/// the analysis table.
pub fn write_report(
    out_dir: &Path,
    report_name: &str,
    report: &RosterReport,
) -> DfResult<(PathBuf, PathBuf)> {
    let raw_path = out_dir.join(format!("{}_Dados_Brutos.csv", report_name));
    let analysis_path = out_dir.join(format!("{}_Analise.csv", report_name));
    write_raw_table(&raw_path, &report.raw)?;
    write_analysis_table(&analysis_path, &report.analysis)?;
    Ok((raw_path, analysis_path))
}
