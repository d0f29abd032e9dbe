//! Recipe Calculator
//!
//! Browse a crafting recipe catalog with raw material breakdowns.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::{info, warn};

use recipe_calculator::{
    ApiClient, BreakdownResolver, Config, RecipeCatalog, RecipeTable, TableRenderer, ViewKind,
    create_recipe, fetch_view, parse_materials,
};

#[derive(Parser)]
#[command(name = "recipe-calculator")]
#[command(about = "Crafting recipe catalog with raw material breakdowns")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the recipe service (overrides the config file)
    #[arg(long, global = true, env = "RECIPE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a recipe table with raw material breakdowns
    List {
        /// Which recipes to show: base, custom or all
        view: ViewKind,
    },

    /// Show a recipe table, then recalculate rows from `<row> <quantity>` lines on stdin
    Browse {
        /// Which recipes to show: base, custom or all
        view: ViewKind,
    },

    /// Create a custom recipe from a free-text material list
    Create {
        /// Recipe name; its id is derived from it
        #[arg(short, long)]
        name: String,

        /// Materials, e.g. "iron plate: 2, 3 gear"
        #[arg(short, long)]
        materials: String,
    },

    /// Delete a custom recipe
    Delete {
        /// Recipe ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Parse a material list and print the canonical quantities
    Parse {
        /// Materials, e.g. "iron plate: 2, 3 gear"
        text: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { view } => {
            let (api, renderer) = connect(cli.config, cli.api_url)?;
            let table = render_view(api.as_ref(), &renderer, view).await?;
            print!("{}", table);
        }

        Commands::Browse { view } => {
            let (api, renderer) = connect(cli.config, cli.api_url)?;
            let table = render_view(api.as_ref(), &renderer, view).await?;
            print!("{}", table);
            browse(table).await?;
        }

        Commands::Create { name, materials } => {
            let (api, renderer) = connect(cli.config, cli.api_url)?;
            let recipe = create_recipe(api.as_ref(), &name, &materials)
                .await
                .context("Error creating recipe")?;
            println!("Recipe '{}' created successfully!", recipe.id);

            let table = render_view(api.as_ref(), &renderer, ViewKind::Custom).await?;
            print!("{}", table);
        }

        Commands::Delete { id, yes } => {
            let (api, renderer) = connect(cli.config, cli.api_url)?;
            if !yes && !confirm_delete(api.as_ref(), &id).await? {
                println!("Cancelled.");
                return Ok(());
            }

            api.delete(&id)
                .await
                .context("Failed to delete the recipe. Please check your backend.")?;
            println!("Recipe with ID '{}' deleted successfully.", id);

            let table = render_view(api.as_ref(), &renderer, ViewKind::Custom).await?;
            print!("{}", table);
        }

        Commands::Parse { text } => {
            let materials = parse_materials(&text);
            println!("{}", serde_json::to_string_pretty(&materials)?);
        }
    }

    Ok(())
}

/// Build the HTTP client and table renderer from config and CLI overrides
fn connect(
    config_path: Option<PathBuf>,
    api_url: Option<String>,
) -> Result<(Arc<ApiClient>, TableRenderer)> {
    let mut config = Config::load_or_default(config_path.as_deref())?;
    if let Some(url) = api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let api = Arc::new(ApiClient::new(config.base_url()?, config.timeout())?);
    info!("Using recipe service at {}", api.base_url());

    let resolver: Arc<dyn BreakdownResolver> = api.clone();
    let renderer = TableRenderer::new(resolver, Arc::new(config.friendly_names()))
        .surface_resolver_errors(config.display.surface_resolver_errors);

    Ok((api, renderer))
}

async fn render_view(
    catalog: &dyn RecipeCatalog,
    renderer: &TableRenderer,
    view: ViewKind,
) -> Result<RecipeTable> {
    let recipes = fetch_view(catalog, view)
        .await
        .with_context(|| format!("Failed to fetch {} recipes. Please check your backend.", view))?;
    Ok(renderer.render(&recipes, view).await)
}

async fn confirm_delete(catalog: &dyn RecipeCatalog, id: &str) -> Result<bool> {
    let name = fetch_view(catalog, ViewKind::Custom)
        .await
        .ok()
        .and_then(|recipes| recipes.into_iter().find(|r| r.id == id))
        .map(|r| r.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| id.to_string());

    eprint!("Are you sure you want to delete the recipe \"{}\"? [y/N] ", name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Read quantity edits from stdin; each one recalculates its row independently
async fn browse(table: RecipeTable) -> Result<()> {
    if table.rows().is_empty() {
        return Ok(());
    }
    eprintln!("Enter '<row> <quantity>' to recalculate a row, 'q' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut edits = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" || line == "quit" {
            edits.abort_all();
            break;
        }

        let (index, quantity) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let row = match index
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| table.row(i))
        {
            Some(row) => row.clone(),
            None => {
                eprintln!("No row '{}' (rows 1-{})", index, table.rows().len());
                continue;
            }
        };

        reap_finished(&mut edits);
        let quantity = quantity.trim().to_string();
        edits.spawn(async move {
            row.commit_quantity(&quantity).await;
            println!("{}", row);
        });
    }

    while let Some(result) = edits.join_next().await {
        log_edit_result(result);
    }
    Ok(())
}

/// Collect edits that already finished, without waiting on the rest
fn reap_finished(edits: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(result) = edits.try_join_next() {
        log_edit_result(result);
        reaped += 1;
    }
    reaped
}

fn log_edit_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            warn!("Quantity edit failed: {}", e);
        }
    }
}
