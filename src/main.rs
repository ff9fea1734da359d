// Contract Review - command-line entry point

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contract_review::services::export::{default_report_file_name, save_report};
use contract_review::{PipelineEvent, ReviewSession, SettingsStore, SettingsUpdate};

#[derive(Parser)]
#[command(name = "contract-review", version, about = "LLM-assisted contract review")]
struct Cli {
    /// Settings file (defaults to ~/.contract-review/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a contract (.txt, .docx or .pdf) and save the combined report
    Review {
        file: PathBuf,
        /// Report destination; .md and .html select the format
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show or change the analysis settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current settings with the API key masked
    Show,
    /// Update one or more settings
    Set {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// Restore the default settings
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut store = match &cli.config {
        Some(path) => SettingsStore::open(path),
        None => SettingsStore::new(),
    }
    .context("failed to open settings")?;

    match cli.command {
        Commands::Review { file, output } => review(&store, &file, output).await,
        Commands::Settings { command } => settings(&mut store, command),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contract_review=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn review(store: &SettingsStore, file: &Path, output: Option<PathBuf>) -> Result<()> {
    let session = ReviewSession::from_store(store);
    let chars = session
        .load_contract(file)
        .await
        .with_context(|| format!("failed to load {}", file.display()))?;
    eprintln!("已加载合同: {} ({} 字)", file.display(), chars);

    let mut handle = session.start_review().await?;
    let run_id = handle.id();
    let cancel = handle.cancellation_token();
    let mut cancel_requested = false;
    let mut completed = None;

    loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(PipelineEvent::Progress { percent, message, .. }) => {
                    eprintln!("[{:>3}%] {}", percent, message);
                }
                Some(PipelineEvent::Completed { result }) => completed = Some(result),
                Some(PipelineEvent::Failed { message, .. }) => {
                    session.abandon_review(run_id).await;
                    bail!(message);
                }
                Some(PipelineEvent::Cancelled) => {
                    session.abandon_review(run_id).await;
                    bail!("审查已取消");
                }
                None => break,
            },
            signal = tokio::signal::ctrl_c(), if !cancel_requested => {
                signal.context("failed to listen for Ctrl-C")?;
                eprintln!("正在取消，当前阶段完成后停止...");
                cancel.cancel();
                cancel_requested = true;
            }
        }
    }

    let Some(result) = completed else {
        bail!("审查未返回结果");
    };
    session.finish_review(run_id, result.clone()).await;

    for stage in result.parse_failures() {
        eprintln!("警告: {} 阶段的响应无法解析为JSON", stage);
    }

    let now = Local::now().naive_local();
    let path = output.unwrap_or_else(|| PathBuf::from(default_report_file_name(now)));
    save_report(&result, &path, now)
        .with_context(|| format!("failed to save report to {}", path.display()))?;
    println!("报告已保存到: {}", path.display());
    Ok(())
}

fn settings(store: &mut SettingsStore, command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Show => {}
        SettingsCommands::Set {
            api_key,
            base_url,
            model,
            temperature,
            max_tokens,
        } => {
            let update = SettingsUpdate {
                api_key,
                base_url,
                model,
                temperature,
                max_tokens,
                proxy: None,
            };
            if update.is_empty() {
                bail!("nothing to update; pass at least one setting");
            }
            store.update_config(update)?;
        }
        SettingsCommands::Reset => store.reset()?,
    }

    let config = store.get_config();
    println!("settings file: {}", store.path().display());
    println!("base URL:      {}", config.base_url);
    println!("model:         {}", config.model);
    println!("temperature:   {}", config.temperature);
    println!("max tokens:    {}", config.max_tokens);
    println!("API key:       {}", config.masked_api_key());
    if let Some(proxy) = &config.proxy {
        println!("proxy:         {}", proxy.url());
    }
    Ok(())
}
