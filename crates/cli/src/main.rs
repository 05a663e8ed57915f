mod config;
mod error;
mod operator;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use runtime::{AnthropicBackend, Operator, Registry, Session};
use toolbox::ToolboxConfig;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};
use operator::StdinOperator;

const CONFIG_FILE: &str = "billdozer.toml";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Parser)]
#[command(name = "billdozer")]
#[command(about = "An interactive coding agent that reads, edits and checks your project", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./billdozer.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model to use, overriding the config file
    #[arg(short, long)]
    model: Option<String>,

    /// Command definitions file (default: <workdir>/.agent-commands.toml)
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Directory the tools operate in (default: current directory)
    #[arg(short, long)]
    workdir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let operator = Arc::new(StdinOperator::default());
    if let Err(e) = run(Arc::clone(&operator)).await {
        operator.show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with the conversation.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(operator: Arc<StdinOperator>) -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_FILE)?,
    };
    if let Some(model) = cli.model {
        config.backend.model = model;
    }

    let workdir = match cli.workdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !workdir.is_dir() {
        return Err(Error::InvalidWorkdir { path: workdir });
    }
    let toolbox = ToolboxConfig {
        commands_path: cli
            .commands
            .unwrap_or_else(|| workdir.join(toolbox::command::DEFAULT_COMMANDS_FILE)),
        workdir,
    };

    let auth = config.auth(std::env::var(API_KEY_ENV).ok())?;
    let backend = build_backend(&config, auth);

    let registry = Registry::new();
    toolbox::register_all(&registry, &toolbox).map_err(runtime::Error::from)?;
    tracing::info!(%backend, tools = registry.len(), "assembled session");

    println!("billdozer v{}", env!("CARGO_PKG_VERSION"));
    println!("Model: {}", config.backend.model);
    println!("Working directory: {}", toolbox.workdir.display());
    println!("Chat with Claude (use 'ctrl-d' to quit)\n");

    let mut session = Session::new(backend, Arc::new(registry), operator);
    let outcome = session.run().await;

    let usage = session.usage();
    tracing::debug!(
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        messages = session.history().len(),
        "session ended"
    );

    outcome?;
    Ok(())
}

fn build_backend(config: &Config, auth: runtime::AnthropicAuth) -> AnthropicBackend {
    let backend = &config.backend;
    let mut builder =
        AnthropicBackend::builder(auth, &backend.model).max_tokens(backend.max_tokens);
    if let Some(system) = &backend.system {
        builder = builder.system(system);
    }
    if let Some(base_url) = &backend.base_url {
        builder = builder.base_url(base_url);
    }
    builder.build()
}
