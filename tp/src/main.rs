//! TaskPlanner - goal-to-task breakdown service
//!
//! CLI entry point for the HTTP server and one-shot generation.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info};

use taskplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use taskplanner::config::Config;
use taskplanner::domain::TaskRecord;
use taskplanner::llm::create_client;
use taskplanner::planning::{GOAL_REQUIRED, ResponseParser, TaskGenerator};
use taskplanner::prompts::{PromptBuilder, PromptLoader};
use taskplanner::server::{self, AppState};
use taskplanner::state::StateManager;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve { listen } => cmd_serve(config, listen).await,
        Command::Generate { goal, format } => cmd_generate(&config, &goal, format).await,
        Command::Prompt { goal } => cmd_prompt(&config, &goal),
    }
}

fn load_prompts(config: &Config) -> Result<PromptBuilder> {
    PromptLoader::new(&config.prompts.dir)
        .load_builder()
        .context("Failed to load prompt template")
}

fn build_generator(config: &Config) -> Result<TaskGenerator> {
    config.validate()?;
    let client = create_client(&config.llm)?;
    Ok(TaskGenerator::with_parts(client, load_prompts(config)?, ResponseParser::new()))
}

fn require_goal(goal: &str) -> Result<&str> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(eyre::eyre!(GOAL_REQUIRED));
    }
    Ok(goal)
}

async fn cmd_serve(mut config: Config, listen: Option<std::net::SocketAddr>) -> Result<()> {
    debug!(?listen, "cmd_serve: called");
    if let Some(addr) = listen {
        config.server.listen = addr;
    }

    let generator = build_generator(&config)?;
    let store = StateManager::spawn(&config.storage.db_path).context("Failed to open task store")?;

    let listener = TcpListener::bind(config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    println!("taskplanner listening on http://{}", listener.local_addr()?);

    server::serve(listener, AppState::new(generator, store.clone()))
        .await
        .context("Server terminated with error")?;

    store.shutdown().await?;
    Ok(())
}

async fn cmd_generate(config: &Config, goal: &str, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_generate: called");
    let goal = require_goal(goal)?;
    let generator = build_generator(config)?;

    let tasks = generator.generate_tasks(goal).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
        OutputFormat::Text => print!("{}", render_text(&tasks)),
    }
    Ok(())
}

fn cmd_prompt(config: &Config, goal: &str) -> Result<()> {
    debug!("cmd_prompt: called");
    let goal = require_goal(goal)?;
    print!("{}", load_prompts(config)?.build_prompt(goal));
    Ok(())
}

fn render_text(tasks: &[TaskRecord]) -> String {
    let mut out = String::new();
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("{}. {} [{}]\n", i + 1, task.heading, task.priority));
        out.push_str(&format!("   Timeline:     {}\n", task.timeline));
        if !task.has_no_dependencies() {
            out.push_str(&format!("   Dependencies: {}\n", task.dependencies));
        }
        out.push_str(&format!("   Due Date:     {}\n", task.due_date));
        out.push_str(&format!("   {}\n\n", task.matter));
    }
    out
}
