//! The interactive search session: log in, pick a project and suite, then
//! search and page through the hits until the user quits.

use crate::client::{CaseSource, Credentials};
use crate::error::{Result, TrsearchError};
use crate::metrics::Metrics;
use crate::pager::{Named, PageOutcome, Pager};
use crate::prompt::{is_quit, Prompt};
use crate::search::SearchEngine;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::Write;
use std::time::Duration;

pub const MENU: [&str; 4] = [
    "p - select project",
    "s - select suite",
    "q - exit",
    "any key to next searching",
];

const WRONG_CREDENTIALS: &str = "wrong credentials, hit any key to continue or press q to quit";
const WRONG_SERVER: &str = "wrong server url, hit any key to continue or press q to quit";

/// Startup values; anything missing is asked for interactively.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub project_id: Option<u64>,
    pub suite_id: Option<u64>,
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SelectProject,
    SelectSuite,
    Quit,
    SearchAgain,
}

impl MenuChoice {
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "p" => MenuChoice::SelectProject,
            "s" => MenuChoice::SelectSuite,
            "q" => MenuChoice::Quit,
            _ => MenuChoice::SearchAgain,
        }
    }
}

/// Index typed at a "number:" prompt, if it names one of `len` items.
pub fn parse_selection(answer: &str, len: usize) -> Option<usize> {
    answer.trim().parse::<usize>().ok().filter(|&index| index < len)
}

pub struct App<S, F, P, W> {
    connect: F,
    prompt: P,
    out: W,
    options: SessionOptions,
    engine: SearchEngine,
    metrics: Metrics,
    _source: std::marker::PhantomData<S>,
}

impl<S, F, P, W> App<S, F, P, W>
where
    S: CaseSource,
    F: FnMut(&Credentials) -> Result<S>,
    P: Prompt,
    W: Write,
{
    /// `connect` builds a case source for a set of credentials; it is called
    /// again whenever the user corrects the server or the login.
    pub fn new(connect: F, prompt: P, out: W, options: SessionOptions) -> Self {
        let metrics = Metrics::new();
        Self {
            connect,
            prompt,
            out,
            options,
            engine: SearchEngine::with_metrics(metrics.clone()),
            metrics,
            _source: std::marker::PhantomData,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "{} - v{}",
            "TestRail-Searcher".bold(),
            env!("CARGO_PKG_VERSION")
        )?;

        let Some((source, base_url)) = self.login()? else {
            info!("Login abandoned by user");
            return Ok(());
        };

        let mut project_id = self.options.project_id;
        let mut suite_id = self.options.suite_id;
        loop {
            let project = match project_id {
                Some(id) => id,
                None => {
                    let projects = source.projects()?;
                    let index = self.select(&projects, "project number: ", "projects")?;
                    *project_id.insert(projects[index].id)
                }
            };
            let suite = match suite_id {
                Some(id) => id,
                None => {
                    let suites = source.suites(project)?;
                    let index = self.select(&suites, "suite number: ", "suites")?;
                    *suite_id.insert(suites[index].id)
                }
            };

            self.search_once(&source, project, suite, &base_url)?;

            self.pager().page_menu(&MENU)?;
            match MenuChoice::from_answer(&self.prompt.ask("menu: ")?) {
                MenuChoice::Quit => break,
                MenuChoice::SelectProject => {
                    project_id = None;
                    suite_id = None;
                }
                MenuChoice::SelectSuite => suite_id = None,
                MenuChoice::SearchAgain => {}
            }
        }

        info!("Session finished");
        Ok(())
    }

    fn pager(&mut self) -> Pager<'_, P, W> {
        Pager::new(&mut self.prompt, &mut self.out, self.options.page_size)
    }

    /// Returns the connected source and its base URL, or `None` once the user
    /// gives up.
    fn login(&mut self) -> Result<Option<(S, String)>> {
        let mut server = match self.options.server.take() {
            Some(server) => server,
            None => self.prompt.ask("server: ")?,
        };
        let mut user = match self.options.user.take() {
            Some(user) => user,
            None => self.prompt.ask("username: ")?,
        };
        let mut password = match self.options.password.take() {
            Some(password) => password,
            None => self.prompt.ask_secret("password: ")?,
        };

        loop {
            match self.try_login(&server, &user, &password) {
                Ok((source, base_url, email)) => {
                    writeln!(self.out, "logged as: {email}")?;
                    return Ok(Some((source, base_url)));
                }
                Err(TrsearchError::Authentication(message)) => {
                    warn!("Login rejected for {user}: {message}");
                    if is_quit(&self.prompt.ask(WRONG_CREDENTIALS)?) {
                        return Ok(None);
                    }
                    user = self.prompt.ask("username: ")?;
                    password = self.prompt.ask_secret("password: ")?;
                }
                Err(e) if e.is_server_problem() => {
                    warn!("No TestRail API at {server}: {e}");
                    if is_quit(&self.prompt.ask(WRONG_SERVER)?) {
                        return Ok(None);
                    }
                    server = self.prompt.ask("server: ")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn try_login(
        &mut self,
        server: &str,
        user: &str,
        password: &str,
    ) -> Result<(S, String, String)> {
        let credentials = Credentials::new(server, user, password)?;
        let source = (self.connect)(&credentials)?;
        let account = source.login()?;
        info!("Logged in to {} as {}", credentials.base_url, account.email);
        Ok((source, credentials.base_url, account.email))
    }

    fn select<T: Named>(
        &mut self,
        items: &[T],
        question: &str,
        what: &'static str,
    ) -> Result<usize> {
        if items.is_empty() {
            return Err(TrsearchError::NothingToSelect(what));
        }
        self.pager().page_basic(items)?;

        loop {
            let answer = self.prompt.ask(question)?;
            if let Some(index) = parse_selection(&answer, items.len()) {
                debug!("Selected {what} #{index}: {}", items[index].name());
                return Ok(index);
            }
        }
    }

    fn search_once(
        &mut self,
        source: &S,
        project_id: u64,
        suite_id: u64,
        base_url: &str,
    ) -> Result<PageOutcome> {
        let text = self.prompt.ask("text: ")?;
        writeln!(self.out, "searching...")?;

        let spinner = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        spinner.set_message(format!("Fetching cases of suite {suite_id}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let cases = source.cases(project_id, suite_id);
        spinner.finish_and_clear();

        let cases = cases?;
        self.metrics.cases_fetched.inc_by(cases.len() as u64);
        debug!(
            "Fetched {} cases from project {project_id}, suite {suite_id}",
            cases.len()
        );

        let found = self.engine.search(&cases, &text);
        writeln!(self.out, "found test cases: {}", found.len())?;
        Ok(self.pager().page_results(&found, base_url)?)
    }
}
