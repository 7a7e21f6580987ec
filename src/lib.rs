pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pager;
pub mod prompt;
pub mod record;
pub mod search;

pub use crate::error::{Result, TrsearchError};
pub use app::{App, SessionOptions};
pub use clap::Parser;
pub use cli::Cli;
pub use client::{CaseSource, Credentials, TestRailClient};
pub use config::Config;
pub use pager::{PageOutcome, Pager};
pub use prompt::{ConsolePrompt, Continuation, LinePrompt, Prompt};
pub use record::{Case, CaseId, Project, Step, Suite};
pub use search::{find_in_cases, SearchEngine, SearchField};
