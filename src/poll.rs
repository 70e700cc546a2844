mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_json;

use log::{debug, info, warn};

use poll_statistics::builder::Builder;
use poll_statistics::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::poll::config_reader::*;

#[derive(Debug, Snafu)]
pub enum PollError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The excel file is empty"))]
    EmptyExcel {},
    #[snafu(display("Cannot find worksheet {worksheet} in {path}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("{path} has several worksheets, the worksheet name must be provided"))]
    TooManyWorksheets { path: String },
    #[snafu(display("Line {lineno}: cannot read the cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot read an index from {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    LineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: cannot read the count {content:?}"))]
    InvalidCount { lineno: usize, content: String },
    #[snafu(display("The counts of {name:?} are too large to be added up"))]
    CountOverflow { name: String },
    #[snafu(display("Cannot read the working directory"))]
    WorkingDir { source: std::io::Error },
    #[snafu(display("The counter {name:?} is not declared in the poll"))]
    UndeclaredCounter { name: String },
    #[snafu(display("No source of counts: provide an input file or a configuration file"))]
    MissingSources {},
    #[snafu(display("Provider not implemented: {provider:?}"))]
    UnknownProvider { provider: String },
    #[snafu(display("The poll statistics could not be computed"))]
    Statistics { source: StatsErrors },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PollResult<T> = Result<T, PollError>;

/// A line of counts, as read by the readers.
/// This is before checking the names against the declared counters.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedCount {
    pub id: String,
    pub name: String,
    // None if the cell was empty.
    pub count: Option<u64>,
}

fn result_stats_to_json(stats: &PollStatistics) -> Vec<JSValue> {
    stats
        .counters
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "count": c.count.to_string(),
                "percent": c.percent.to_string()
            })
        })
        .collect()
}

fn build_summary_js(stats: &PollStatistics) -> JSValue {
    let c = OutputConfig {
        title: stats.title.clone(),
        description: stats.description.clone(),
        total: stats.total.to_string(),
    };
    json!({
        "config": c,
        "results": result_stats_to_json(stats),
        "balanced": stats.resolution.is_balanced() })
}

fn read_counts(root_path: &Path, cfs: &FileSource) -> PollResult<Vec<ParsedCount>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read count file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_counts(p2, cfs),
        "json" => io_json::read_json_counts(p2),
        "xlsx" | "excel" => io_excel::read_excel_counts(p2, cfs),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

/// Checks the parsed lines against the declared counters and sums them by name.
///
/// If no counter is declared, the counters are all the names found, in the order
/// they first appear.
fn validate_counts(
    parsed_counts: &[ParsedCount],
    counters: &[ConfigCounter],
) -> PollResult<Vec<(String, u64)>> {
    let excluded: HashSet<&str> = counters
        .iter()
        .filter(|c| c.excluded.unwrap_or(false))
        .map(|c| c.name.as_str())
        .collect();
    let declared: Vec<String> = counters
        .iter()
        .filter(|c| !c.excluded.unwrap_or(false))
        .map(|c| c.name.clone())
        .collect();
    let infer_names = counters.is_empty();

    let mut res: Vec<(String, u64)> = declared.iter().map(|n| (n.clone(), 0)).collect();
    for pc in parsed_counts.iter() {
        let count = match pc.count {
            Some(x) => x,
            None => {
                warn!("validate_counts: {}: skipping {:?} with no count", pc.id, pc.name);
                continue;
            }
        };
        if excluded.contains(pc.name.as_str()) {
            debug!("validate_counts: {}: {:?} is excluded", pc.id, pc.name);
            continue;
        }
        match res.iter_mut().find(|(n, _)| *n == pc.name) {
            Some((_, c)) => {
                *c = c
                    .checked_add(count)
                    .context(CountOverflowSnafu { name: &pc.name })?;
            }
            None if infer_names => {
                res.push((pc.name.clone(), count));
            }
            None => {
                return UndeclaredCounterSnafu {
                    name: pc.name.clone(),
                }
                .fail();
            }
        }
    }
    debug!("validate_counts: {:?}", res);
    Ok(res)
}

fn build_poll(config: &PollConfig, counts: &[(String, u64)]) -> PollResult<Poll> {
    let names: Vec<String> = counts.iter().map(|(n, _)| n.clone()).collect();
    let mut builder = Builder::new(&config.output_settings.poll_title)
        .context(StatisticsSnafu {})?
        .description(
            config
                .output_settings
                .poll_description
                .as_deref()
                .unwrap_or_default(),
        )
        .counters(&names)
        .context(StatisticsSnafu {})?;
    for (name, count) in counts.iter() {
        builder.count(name, *count).context(StatisticsSnafu {})?;
    }
    Ok(builder.build())
}

/// Reads all the sources of a poll and computes its statistics.
///
/// Relative file paths are resolved against `root_path`.
pub fn run_poll_config(config: &PollConfig, root_path: &Path) -> PollResult<PollStatistics> {
    ensure!(!config.count_sources.is_empty(), MissingSourcesSnafu {});

    let mut data: Vec<ParsedCount> = Vec::new();
    for cfs in config.count_sources.iter() {
        let mut file_data = read_counts(root_path, cfs)?;
        data.append(&mut file_data);
    }
    debug!("data: {:?}", data);

    let counts = validate_counts(&data, &config.counters)?;
    let poll = build_poll(config, &counts)?;
    run_poll_stats(&poll).context(StatisticsSnafu {})
}

fn config_from_args(args: &Args) -> PollResult<(PollConfig, PathBuf)> {
    let (mut config, root_path) = match args.config.clone() {
        Some(config_path) => {
            let config = read_config(&config_path)?;
            let root_p = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root_p)
        }
        None => (
            PollConfig {
                output_settings: OutputSettings {
                    poll_title: args.title.clone().unwrap_or_else(|| "Poll".to_string()),
                    poll_description: args.description.clone(),
                    output_directory: None,
                },
                count_sources: vec![],
                counters: vec![],
            },
            PathBuf::new(),
        ),
    };

    // The command line takes precedence over the configuration file.
    if let Some(input) = args.input.clone() {
        let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
        // Relative to the working directory, not to the configuration file.
        let input_path = std::env::current_dir()
            .context(WorkingDirSnafu {})?
            .join(input);
        config.count_sources = vec![FileSource::new(
            &provider,
            &input_path.display().to_string(),
            args.excel_worksheet_name.clone(),
        )];
    }
    if let Some(names) = args.counters.clone() {
        config.counters = names
            .iter()
            .map(|name| ConfigCounter {
                name: name.clone(),
                excluded: None,
            })
            .collect();
    }
    Ok((config, root_path))
}

fn write_summary(
    pretty_js_stats: &str,
    out: Option<String>,
    config: &PollConfig,
    root_path: &Path,
) -> PollResult<()> {
    let out_path: Option<PathBuf> = match out.as_deref() {
        Some("stdout") => None,
        Some(p) => Some(PathBuf::from(p)),
        None => config
            .output_settings
            .output_directory
            .as_ref()
            .map(|dir| root_path.join(dir).join("summary.json")),
    };
    match out_path {
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {:?}", path);
            if let Some(dir) = p.parent() {
                fs::create_dir_all(dir).context(WritingOutputSnafu { path: &path })?;
            }
            fs::write(p, pretty_js_stats).context(WritingOutputSnafu { path })
        }
        None => {
            println!("{}", pretty_js_stats);
            Ok(())
        }
    }
}

fn check_reference(pretty_js_stats: &str, check_summary_path: String) -> PollResult<()> {
    let summary_ref = read_summary(check_summary_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("The summary matches the reference");
    Ok(())
}

pub fn run_poll(args: &Args) -> PollResult<()> {
    let (config, root_path) = config_from_args(args)?;
    info!("config: {:?}", config);

    let stats = run_poll_config(&config, &root_path)?;
    if !stats.resolution.is_balanced() {
        warn!(
            "All the counters are tied, the percentages do not add up to 100: {:?}",
            stats.resolution
        );
    }

    let result_js = build_summary_js(&stats);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, args.out.clone(), &config, &root_path)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        check_reference(&pretty_js_stats, summary_p)?;
    }
    Ok(())
}
