mod output;
mod theme;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use forumcat::{Categories, CategoryHooks, ForumConfig, RedisStore};
use serde_json::Value;

use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "forumcat")]
#[command(version = "0.1.0")]
#[command(about = "Read and update forum category hashes stored in Redis")]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to a forumcat.toml; defaults apply when omitted
    #[arg(short = 'c', long, env = "FORUMCAT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one normalized category
    Get(GetArgs),
    /// List every registered category
    List(FieldsArgs),
    /// Show one field of one category
    Field { cid: i64, field: String },
    /// Write one raw field (no normalization)
    Set { cid: i64, field: String, value: String },
    /// Atomically add DELTA to an integer field
    Incr {
        cid: i64,
        field: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
}

#[derive(Args)]
struct GetArgs {
    cid: i64,
    #[command(flatten)]
    fields: FieldsArgs,
}

#[derive(Args)]
struct FieldsArgs {
    /// Restrict to these fields (comma separated)
    #[arg(short = 'f', long, value_delimiter = ',')]
    fields: Vec<String>,
}

impl FieldsArgs {
    fn as_strs(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        no_color: cli.no_color,
    });
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = execute(cli, &output).await {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ForumConfig::load(path)?,
        None => ForumConfig::default(),
    };
    let url = config.redis_url()?;
    log::debug!("connecting to {url}");
    let store = RedisStore::connect(&url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    let categories = Categories::new(store, CategoryHooks::default(), config);

    match cli.command {
        Commands::Get(args) => {
            let category = categories.get_category_fields(args.cid, &args.fields.as_strs()).await?;
            output.category(args.cid, category.as_ref())?;
        }
        Commands::List(args) => {
            let all = categories.get_all_category_fields(&args.as_strs()).await?;
            output.categories(&all, &args.fields)?;
        }
        Commands::Field { cid, field } => {
            let value = categories.get_category_field(cid, &field).await?;
            output.value(cid, &field, value.as_ref())?;
        }
        Commands::Set { cid, field, value } => {
            categories.set_category_field(cid, &field, Value::String(value)).await?;
            output.success(&format!("category {cid}: {field} updated"));
        }
        Commands::Incr { cid, field, delta } => {
            let updated = categories.increment_category_field_by(cid, &field, delta).await?;
            output.success(&format!("category {cid}: {field} = {updated}"));
        }
    }

    Ok(())
}
