mod config_reader;
mod io_common;
mod io_csv;
mod io_pdf;
mod io_text;

use log::{debug, info, warn};

use duty_roster::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::fairness::config_reader::*;
use crate::fairness::io_common::{list_documents, read_documents, InputProvider};

const DEFAULT_REPORT_NAME: &str = "Relatorio_Escala_Justa";

#[derive(Debug, Snafu)]
pub enum DfError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error listing the folder {path}"))]
    OpeningFolder {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No .{extension} document found in {path}"))]
    EmptyInput { path: String, extension: String },
    #[snafu(display("No input folder: use --input or inputSettings.folder in the configuration"))]
    MissingInput {},
    #[snafu(display("Error reading PDF document {path}: {source}"))]
    OpeningPdf {
        source: lopdf::Error,
        path: String,
    },
    #[snafu(display("Error extracting the text of PDF document {path}: {reason}"))]
    ExtractingPdf { path: String, reason: String },
    #[snafu(display("Error reading text document {path}: {source}"))]
    OpeningText {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Analysis { source: AnalysisErrors },
    #[snafu(display("Error writing the table {path}: {source}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing the summary {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DfResult<T> = Result<T, DfError>;

/// Everything a run needs, once the configuration file and the command line
/// have been merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub folder: PathBuf,
    pub provider: InputProvider,
    pub skip_unreadable: bool,
    pub tables: VocabularyTables,
    pub rules: AnalysisRules,
    pub output_directory: Option<PathBuf>,
    pub report_name: String,
    pub summary: Option<String>,
    pub reference: Option<String>,
}

fn parse_breakdown_order(s: &str) -> DfResult<BreakdownOrder> {
    match s {
        "rendered" | "renderedString" => Ok(BreakdownOrder::RenderedString),
        "post" | "postName" => Ok(BreakdownOrder::PostName),
        x => whatever!("Unknown breakdown order: {:?}", x),
    }
}

fn breakdown_order_name(order: BreakdownOrder) -> &'static str {
    match order {
        BreakdownOrder::RenderedString => "renderedString",
        BreakdownOrder::PostName => "postName",
    }
}

/// Merges the configuration file (if any) with the command line. The command
/// line wins.
pub fn resolve_settings(args: &Args) -> DfResult<RunSettings> {
    let (config, root_p): (DfConfig, Option<PathBuf>) = match args.config.clone() {
        Some(config_path) => {
            let config = read_config(&config_path)?;
            info!("config: {:?}", config);
            let root_p = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.to_path_buf());
            (config, root_p)
        }
        None => (DfConfig::default(), None),
    };
    let input_settings = config.input_settings.clone().unwrap_or_default();
    let output_settings = config.output_settings.clone().unwrap_or_default();

    // Relative paths in the configuration are relative to the configuration file.
    let resolve = |p: &str| -> PathBuf {
        match &root_p {
            Some(root) if Path::new(p).is_relative() => root.join(p),
            _ => PathBuf::from(p),
        }
    };

    let folder: PathBuf = match (&args.input, &input_settings.folder) {
        (Some(input), _) => PathBuf::from(input),
        (None, Some(folder)) => resolve(folder),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let provider_name = args
        .input_type
        .clone()
        .or_else(|| input_settings.provider.clone())
        .unwrap_or_else(|| "pdf".to_string());
    let provider = InputProvider::from_name(&provider_name)?;

    let breakdown_order = match args
        .breakdown_order
        .clone()
        .or_else(|| output_settings.breakdown_order.clone())
    {
        Some(s) => parse_breakdown_order(&s)?,
        None => AnalysisRules::DEFAULT_RULES.breakdown_order,
    };

    let output_directory: Option<PathBuf> = match (&args.out, &output_settings.output_directory)
    {
        (Some(out), _) => Some(PathBuf::from(out)),
        (None, Some(dir)) => Some(resolve(dir)),
        (None, None) => None,
    };

    Ok(RunSettings {
        folder,
        provider,
        skip_unreadable: args.skip_unreadable || input_settings.skip_unreadable.unwrap_or(false),
        tables: config.vocabulary_tables(),
        rules: AnalysisRules { breakdown_order },
        output_directory,
        report_name: output_settings
            .report_name
            .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string()),
        summary: args.summary.clone(),
        reference: args.reference.clone(),
    })
}

/// Reads all the documents of the input folder and runs the analysis.
pub fn analyze_folder(settings: &RunSettings) -> DfResult<RosterReport> {
    let paths = list_documents(&settings.folder, settings.provider)?;
    info!(
        "Found {} {:?} documents in {}",
        paths.len(),
        settings.provider,
        settings.folder.display()
    );

    let batch = read_documents(&paths, settings.provider);
    let documents = batch.into_documents(settings.skip_unreadable)?;

    let vocab = Vocabulary::compile(&settings.tables).context(AnalysisSnafu {})?;
    run_roster_analysis(&documents, &vocab, &settings.rules).context(AnalysisSnafu {})
}

fn analysis_to_json(analysis: &FairnessAnalysis) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for p in analysis.persons.iter() {
        let breakdown: Vec<JSValue> = p
            .breakdown
            .iter()
            .map(|b| {
                json!({
                    "post": b.post,
                    "count": b.local_count,
                    "opportunity": b.opportunity,
                    "ratio": format!("{:.1}", b.ratio()),
                })
            })
            .collect();
        l.push(json!({
            "name": p.display_name,
            "count": p.count,
            "details": p.details(),
            "breakdown": breakdown,
        }));
    }
    l
}

fn build_summary_js(settings: &RunSettings, report: &RosterReport) -> JSValue {
    let mut opportunities: JSMap<String, JSValue> = JSMap::new();
    for (post, days) in report.analysis.opportunities.iter() {
        opportunities.insert(post.clone(), json!(days));
    }
    json!({
        "config": {
            "reportName": settings.report_name,
            "provider": settings.provider.name(),
            "breakdownOrder": breakdown_order_name(settings.rules.breakdown_order),
        },
        "summary": report.analysis.summary_header(),
        "totalDays": report.analysis.total_days,
        "rawRows": report.raw.len(),
        "opportunities": opportunities,
        "results": analysis_to_json(&report.analysis),
    })
}

fn write_summary(destination: &str, pretty_js: &str) -> DfResult<()> {
    if destination == "stdout" {
        println!("{}", pretty_js);
    } else {
        fs::write(destination, pretty_js).context(WritingSummarySnafu {
            path: destination.to_string(),
        })?;
        info!("Summary written to {}", destination);
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> DfResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingSummarySnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("The analysis matches the reference {}", reference_path);
    Ok(())
}

/// Runs the analysis and writes all the requested outputs.
///
/// Outputs are written only after the whole analysis succeeded.
pub fn run_settings(settings: &RunSettings) -> DfResult<RosterReport> {
    let report = analyze_folder(settings)?;

    let out_dir = settings
        .output_directory
        .clone()
        .unwrap_or_else(|| settings.folder.clone());
    let (raw_path, analysis_path) = io_csv::write_report(&out_dir, &settings.report_name, &report)?;
    info!(
        "Report written to {} and {}",
        raw_path.display(),
        analysis_path.display()
    );

    let result_js = build_summary_js(settings, &report);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingSummarySnafu {})?;

    if let Some(summary_p) = &settings.summary {
        write_summary(summary_p, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_p) = &settings.reference {
        check_reference(reference_p, &pretty_js_stats)?;
    }

    Ok(report)
}

pub fn run(args: &Args) -> DfResult<()> {
    let settings = resolve_settings(args)?;
    debug!("settings: {:?}", settings);
    let report = run_settings(&settings)?;
    info!(
        "{}: {} persons",
        report.analysis.summary_header(),
        report.analysis.persons.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn text_args(dir: &TempDir) -> Args {
        Args {
            input: Some(dir.path().display().to_string()),
            input_type: Some("text".to_string()),
            ..Default::default()
        }
    }

    const BOLETIM_A: &str = "BOLETIM INTERNO Nº 42\n\
        PARA O DIA 5 DE MARÇO DE 2024 (TERÇA-FEIRA)\n\
        Policial de Dia à Gu CG: 2º SGT INF JOÃO SILVA - 1ª CIA\n\
        Corneteiro: SD PEDRO LIMA - CCAP.\n";

    const BOLETIM_B: &str = "PARA O DIA 9 DE MARÇO DE 2024 (SÁBADO)\n\
        Policial de Dia à Gu CG: 1º SGT INF JOÃO SILVA - 1ª CIA\n";

    #[test]
    fn empty_folder() {
        init();
        let dir = TempDir::new().unwrap();
        let settings = resolve_settings(&text_args(&dir)).unwrap();
        let res = analyze_folder(&settings);
        assert!(matches!(res, Err(DfError::EmptyInput { .. })));
    }

    #[test]
    fn other_extensions_are_not_documents() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "notas.md", BOLETIM_A);
        let settings = resolve_settings(&text_args(&dir)).unwrap();
        assert!(matches!(
            analyze_folder(&settings),
            Err(DfError::EmptyInput { .. })
        ));
    }

    #[test]
    fn no_heading_no_data() {
        init();
        let dir = TempDir::new().unwrap();
        write(dir.path(), "vazio.txt", "Sem escala\nCorneteiro: SD ANA - CCAP\n");
        let settings = resolve_settings(&text_args(&dir)).unwrap();
        let res = analyze_folder(&settings);
        assert!(matches!(
            res,
            Err(DfError::Analysis {
                source: AnalysisErrors::NoDataExtracted
            })
        ));
    }

    #[test]
    fn two_documents() {
        init();
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", BOLETIM_B);
        write(dir.path(), "a.txt", BOLETIM_A);
        let settings = resolve_settings(&text_args(&dir)).unwrap();
        let report = analyze_folder(&settings).unwrap();

        // Documents are read in file name order.
        assert_eq!(report.raw[0].columns()[0], "a.txt");
        assert_eq!(report.raw.len(), 3);
        assert_eq!(report.raw[1].columns()[5], "CCAP");

        let analysis = &report.analysis;
        assert_eq!(analysis.summary_header(), "Total Dias: 2");
        assert_eq!(analysis.persons[0].display_name, "2º SGT INF JOÃO SILVA");
        assert_eq!(analysis.persons[0].details(), "Policial de Dia: 2/2 (100.0%)");
        assert_eq!(analysis.persons[1].details(), "Corneteiro: 1/1 (100.0%)");
    }

    #[test]
    fn report_tables_are_written() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(dir.path(), "a.txt", BOLETIM_A);
        write(dir.path(), "sem_data.txt", "nada");
        let mut args = text_args(&dir);
        args.out = Some(out.path().display().to_string());
        let settings = resolve_settings(&args).unwrap();
        run_settings(&settings).unwrap();

        let raw = fs::read_to_string(
            out.path()
                .join("Relatorio_Escala_Justa_Dados_Brutos.csv"),
        )
        .unwrap();
        let raw_lines: Vec<&str> = raw.lines().collect();
        assert_eq!(raw_lines[0], "Arquivo,Data,Dia,Posto,Nome,Companhia");
        assert_eq!(
            raw_lines[1],
            "a.txt,05/03/2024,TERÇA-FEIRA,Policial de Dia,2º SGT INF JOÃO SILVA,1ª CIA"
        );
        assert_eq!(raw_lines[3], "sem_data.txt,N/A,N/A,N/A,N/A,N/A");

        let analysis =
            fs::read_to_string(out.path().join("Relatorio_Escala_Justa_Analise.csv")).unwrap();
        let analysis_lines: Vec<&str> = analysis.lines().collect();
        assert_eq!(analysis_lines[0], "Total Dias: 1,,");
        assert_eq!(analysis_lines[1], "Nome,Contagem,Detalhes");
        assert_eq!(analysis_lines.len(), 4);
    }

    #[test]
    fn configuration_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("boletins")).unwrap();
        write(
            &dir.path().join("boletins"),
            "a.txt",
            "PARA O DIA 1 DE JULHO DE 2024 (SEGUNDA-FEIRA)\n\
             Sentinela do Portão: RECRUTA MARIA LIMA - 3ª CIA\n",
        );
        write(
            dir.path(),
            "config.json",
            r#"{
                "inputSettings": { "folder": "boletins", "provider": "text" },
                "outputSettings": { "outputDirectory": "saida", "reportName": "teste",
                                    "breakdownOrder": "postName" },
                "posts": [ { "alias": "Sentinela do Portão", "name": "Sentinela" } ],
                "rankTokens": [ "RECRUTA" ]
            }"#,
        );
        fs::create_dir(dir.path().join("saida")).unwrap();
        let args = Args {
            config: Some(dir.path().join("config.json").display().to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.folder, dir.path().join("boletins"));
        assert_eq!(settings.rules.breakdown_order, BreakdownOrder::PostName);

        let report = run_settings(&settings).unwrap();
        assert_eq!(report.analysis.persons[0].canonical_key, "MARIA LIMA");
        assert_eq!(report.analysis.persons[0].details(), "Sentinela: 1/1 (100.0%)");
        assert!(dir.path().join("saida").join("teste_Analise.csv").exists());
    }

    #[test]
    fn unreadable_pdf_fails_the_batch() {
        init();
        let dir = TempDir::new().unwrap();
        write(dir.path(), "corrompido.pdf", "this is not a pdf");
        let args = Args {
            input: Some(dir.path().display().to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert!(matches!(
            analyze_folder(&settings),
            Err(DfError::OpeningPdf { .. })
        ));

        let skipping = RunSettings {
            skip_unreadable: true,
            ..settings
        };
        assert!(matches!(
            analyze_folder(&skipping),
            Err(DfError::Analysis {
                source: AnalysisErrors::EmptyInput
            })
        ));
    }

    #[test]
    fn pdf_documents() {
        init();
        let dir = TempDir::new().unwrap();
        io_pdf::write_roster_pdf(
            &dir.path().join("b.pdf"),
            &[&[
                "PARA O DIA 4 DE MAIO DE 2024 (SABADO)",
                "Corneteiro: SD ANA LIMA - CCAP",
                "Adj Of Dia: 1o TEN PAULO REIS - 2 CIA",
            ]],
        );
        io_pdf::write_roster_pdf(
            &dir.path().join("a.pdf"),
            &[
                &[
                    "PARA O DIA 2 DE MAIO DE 2024 (QUINTA-FEIRA)",
                    "Corneteiro: CB ANA LIMA - CCAP",
                ],
                &[
                    "PARA O DIA 3 DE MAIO DE 2024 (SEXTA-FEIRA)",
                    "Corneteiro: SD RUI COSTA - CCAP",
                    "Adj Of Dia: 1o TEN PAULO REIS - 2 CIA",
                ],
            ],
        );
        // The default provider.
        let args = Args {
            input: Some(dir.path().display().to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.provider, InputProvider::Pdf);
        let report = analyze_folder(&settings).unwrap();

        let dates: Vec<&str> = report.raw.iter().map(|r| r.columns()[1]).collect();
        assert_eq!(
            dates,
            vec!["02/05/2024", "03/05/2024", "03/05/2024", "04/05/2024", "04/05/2024"]
        );
        assert_eq!(report.raw[2].columns()[5], "2 CIA");

        let analysis = &report.analysis;
        assert_eq!(analysis.summary_header(), "Total Dias: 3");
        assert_eq!(analysis.persons[0].details(), "Adj Of Dia: 2/2 (100.0%)");
        assert_eq!(analysis.persons[1].display_name, "CB ANA LIMA");
        assert_eq!(analysis.persons[1].details(), "Corneteiro: 2/3 (66.7%)");
        assert_eq!(analysis.persons[2].details(), "Corneteiro: 1/3 (33.3%)");
    }

    #[test]
    fn tables_default_to_the_input_folder() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", BOLETIM_A);
        let settings = resolve_settings(&text_args(&dir)).unwrap();
        assert_eq!(settings.output_directory, None);
        run_settings(&settings).unwrap();
        assert!(dir
            .path()
            .join("Relatorio_Escala_Justa_Dados_Brutos.csv")
            .exists());
        assert!(dir.path().join("Relatorio_Escala_Justa_Analise.csv").exists());
    }

    #[test]
    fn reference_summary() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(dir.path(), "a.txt", BOLETIM_A);
        let summary_p = out.path().join("summary.json").display().to_string();

        let mut args = text_args(&dir);
        args.out = Some(out.path().display().to_string());
        args.summary = Some(summary_p.clone());
        run(&args).unwrap();

        // The summary just written is a valid reference.
        args.reference = Some(summary_p.clone());
        args.summary = None;
        run(&args).unwrap();

        // A different analysis no longer matches it.
        write(dir.path(), "b.txt", BOLETIM_B);
        let res = run(&args);
        assert!(matches!(res, Err(DfError::Whatever { .. })));
    }

    #[test]
    fn unknown_provider() {
        let args = Args {
            input: Some(".".to_string()),
            input_type: Some("docx".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_settings(&args),
            Err(DfError::Whatever { .. })
        ));
    }

    #[test]
    fn missing_input() {
        assert!(matches!(
            resolve_settings(&Args::default()),
            Err(DfError::MissingInput {})
        ));
    }
}
