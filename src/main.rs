use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{debug, info};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::num::NonZeroUsize;
use std::time::Instant;
use trsearch::error::{Result as TrsearchResult, TrsearchError};
use trsearch::metrics::Metrics;
use trsearch::{
    App, CaseSource, Cli, Config, ConsolePrompt, Credentials, LinePrompt, Prompt, SessionOptions,
    TestRailClient,
};

fn main() -> TrsearchResult<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let start_time = Instant::now();
    info!("Application started");

    let config = Config::load(cli.config.as_deref())?;
    debug!("Effective config: {config:?}");

    let mut http = config.http.clone();
    if cli.insecure {
        http.accept_invalid_certs = true;
    }

    let options = SessionOptions {
        server: cli.server.or(config.server.url),
        user: cli.username.or(config.server.username),
        password: cli.password,
        project_id: cli.project,
        suite_id: cli.suite,
        page_size: cli
            .page_size
            .map_or(config.display.page_size, NonZeroUsize::get),
    };
    let connect = |credentials: &Credentials| TestRailClient::new(credentials.clone(), &http);

    let metrics = if io::stdin().is_terminal() {
        run_session(connect, ConsolePrompt, options)?
    } else {
        info!("stdin is not a terminal, reading answers line by line");
        let prompt = LinePrompt::new(io::stdin().lock(), io::stdout());
        run_session(connect, prompt, options)?
    };

    debug!("Session metrics:\n{}", metrics.gather());
    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

fn run_session<S, F, P>(connect: F, prompt: P, options: SessionOptions) -> TrsearchResult<Metrics>
where
    S: CaseSource,
    F: FnMut(&Credentials) -> TrsearchResult<S>,
    P: Prompt,
{
    let mut app = App::new(connect, prompt, io::stdout(), options);
    app.run()?;
    Ok(app.metrics().clone())
}

fn setup_logging(cli: &Cli) -> TrsearchResult<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir).map_err(TrsearchError::Io)?;
            }
        }
        let log_file = fs::File::create(log_path).map_err(TrsearchError::Io)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| TrsearchError::Other(e.to_string()))?;
    Ok(())
}
