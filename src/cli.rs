use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Full text search over TestRail test cases.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// TestRail server URL, e.g. https://example.testrail.io
    #[clap(short, long, value_parser)]
    pub server: Option<String>,

    /// TestRail login (e-mail address)
    #[clap(short, long, value_parser)]
    pub username: Option<String>,

    /// Password or API key; asked for when omitted
    #[clap(long, value_parser, env = "TESTRAIL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip the project prompt
    #[clap(long, value_parser)]
    pub project: Option<u64>,

    /// Skip the suite prompt
    #[clap(long, value_parser)]
    pub suite: Option<u64>,

    /// Lines shown before asking to continue
    #[clap(long, value_parser)]
    pub page_size: Option<NonZeroUsize>,

    /// Config file to use instead of the default locations
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    /// Accept invalid TLS certificates
    #[clap(long, value_parser, default_value_t = false)]
    pub insecure: bool,

    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,
}
