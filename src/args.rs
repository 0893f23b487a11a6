use clap::Parser;

/// This is a duty roster fairness audit program.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file with the input and output settings, and
    /// optionally the post names and rank abbreviations to use instead of the builtin ones.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (folder path) The folder containing the duty documents. Setting this option overrides
    /// the folder that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default pdf) The type of the documents: 'pdf' or 'text' (already extracted .txt files).
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (folder path, optional) The folder where the raw table and the analysis table are
    /// written as CSV files. By default, they are written in the input folder.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the analysis will be written in JSON format
    /// to the given location.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference file containing the analysis in JSON format. If provided, dutyfair
    /// will check that the computed analysis matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default rendered) The order of the per-post entries of each person: 'rendered' (sorted
    /// as text, the historical layout of the report) or 'post' (sorted by post name).
    #[clap(long, value_parser)]
    pub breakdown_order: Option<String>,

    /// If passed as an argument, documents that cannot be read are skipped instead of failing
    /// the whole run.
    #[clap(long, takes_value = false)]
    pub skip_unreadable: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
