use clap::Parser;

/// This is a poll statistics program: it turns the counts of a poll into percentages
/// that add up to 100.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the poll description and its sources of counts.
    /// Only JSON poll descriptions are supported.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the statistics of a poll in JSON format. If provided,
    /// pollstats will check that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the poll will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the file containing the counts of the poll. Setting this option overrides the
    /// sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, json or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (list of values or not specified) If specified, the names of the counters, in display order.
    /// If not specified, the names are taken from the input, in the order they are first seen.
    #[clap(long, value_parser)]
    pub counters: Option<Vec<String>>,

    /// The title of the poll, when no configuration file is provided.
    #[clap(long, value_parser)]
    pub title: Option<String>,

    /// The description of the poll, when no configuration file is provided.
    #[clap(long, value_parser)]
    pub description: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
