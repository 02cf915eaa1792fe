//! Defines the command-line interface for the application.

use clap::Parser;
use md_inject_lib::markers::{TagPair, DEFAULT_TAG_ID};
use md_inject_lib::template::DEFAULT_TEMPLATE;
use std::ffi::OsString;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  $ cat foo.txt | md-inject README.md
  $ ./foo --help 2>&1 | md-inject --template=$'```text\\n{{ stdin }}```' README.md
  $ ls -1 | md-inject --fail-on-diff README.md";

#[derive(Parser, Debug)]
#[command(
    name = "md-inject",
    version,
    about = "Inject text from stdin into Markdown files and keep it up to date.",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// The file to inject content into, e.g. 'README.md'.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Identifier for the tags to inject content between.
    #[arg(long, value_name = "ID", default_value = DEFAULT_TAG_ID)]
    pub id: String,

    /// Exit with code 2 instead of writing if the file would be changed.
    #[arg(long)]
    pub fail_on_diff: bool,

    /// Print the final output to stdout without writing to the file.
    #[arg(long)]
    pub print_only: bool,

    /// MiniJinja template applied to stdin before injecting. The input is bound to `stdin`.
    #[arg(
        long,
        value_name = "TEMPLATE",
        default_value = DEFAULT_TEMPLATE,
        allow_hyphen_values = true
    )]
    pub template: String,
}

/// Options for a single run, resolved once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub id: String,
    pub fail_on_diff: bool,
    pub print_only: bool,
    pub template: String,
    pub file: PathBuf,
}

impl Config {
    /// The marker pair selected by `--id`.
    pub fn tags(&self) -> TagPair {
        TagPair::for_id(&self.id)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let Cli {
            file,
            id,
            fail_on_diff,
            print_only,
            template,
        } = cli;

        Self {
            id,
            fail_on_diff,
            print_only,
            template,
            file,
        }
    }
}

/// Parses `args` (including the program name) into a [`Config`].
///
/// `--help` and `--version` are reported as errors too; check
/// [`clap::Error::use_stderr`] to tell them apart from usage mistakes.
pub fn parse_args<I, T>(args: I) -> Result<Config, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map(Config::from)
}
