// ============================================================================
// my-dice - CLI front end for the dice avatar customization engine
// ============================================================================
// Usage:
//   my-dice catalog [--category C] [--user U]      List ranked options
//   my-dice show --user U                           Show a user's selection
//   my-dice select --user U <category> <ref|none>   Change one category
//   my-dice layers --user U [--json]                Print the render manifest
//   my-dice reset --user U                          Delete a saved selection
//   my-dice stats                                   Show database statistics
// ============================================================================

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use dice_core::catalog::{display_name, CATALOG_ENV_VAR};
use dice_core::{Catalog, Category, DiceDb, EngineConfig, RenderManifest, RuleBook, Session};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Dice avatar customization tool
#[derive(Parser)]
#[command(name = "my-dice", version, about = "Customize a dice avatar from the command line")]
struct Cli {
    /// Path to the database file (default: ~/.my-dice/selections.redb)
    #[arg(long, global = true)]
    db_path: Option<String>,

    /// Catalog JSON file (default: $MY_DICE_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Rules and rank tables JSON file (default: $MY_DICE_CONFIG, else built-in)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List options in display order with level and availability
    Catalog {
        /// Only this category (background, dice, pattern, accessory, hat, item, companion, title)
        #[arg(long)]
        category: Option<String>,

        /// Flag options blocked under this user's dice
        #[arg(long)]
        user: Option<String>,
    },

    /// Show the current selection and layer stack
    Show {
        #[arg(long)]
        user: String,
    },

    /// Change one category, or clear it with "none"
    Select {
        #[arg(long)]
        user: String,

        category: String,

        resource_ref: String,
    },

    /// Print the layers to draw and the title
    Layers {
        #[arg(long)]
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a user's saved selection
    Reset {
        #[arg(long)]
        user: String,
    },

    /// Show database statistics
    Stats,
}

fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).ok_or_else(|| {
        anyhow!(
            "Unknown category '{}'. Valid values: background, dice, pattern, accessory, hat, item, companion, title",
            s
        )
    })
}

fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("(invalid: {})", ts))
}

fn init_logging(verbose: bool) -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Could not load .env file: {}", e);
        }
    }

    let level = if verbose { "debug" } else { "info" };
    let core: Directive = format!("dice_core={}", level).parse()?;
    let cli: Directive = format!("my_dice={}", level).parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(core).add_directive(cli))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Catalog and rules shared by every command that touches a selection
struct Engine {
    catalog: Catalog,
    rules: RuleBook,
}

impl Engine {
    fn load(cli: &Cli) -> Result<Self> {
        let config = EngineConfig::resolve(cli.config.as_deref())?;

        let catalog_path = match &cli.catalog {
            Some(p) => p.clone(),
            None => match std::env::var(CATALOG_ENV_VAR) {
                Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
                _ => anyhow::bail!(
                    "No catalog file. Pass --catalog or set {}",
                    CATALOG_ENV_VAR
                ),
            },
        };
        let catalog = Catalog::load(&catalog_path, &config.rank_tables)?;

        Ok(Self {
            catalog,
            rules: config.rules,
        })
    }

    fn open_session(&self, db: &DiceDb, user: &str) -> Result<Session> {
        Session::open(db, user, self.catalog.clone(), self.rules.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let db = DiceDb::open(cli.db_path.as_deref())?;

    match &cli.command {
        Commands::Catalog { category, user } => {
            let engine = Engine::load(&cli)?;
            cmd_catalog(&db, &engine, category.as_deref(), user.as_deref())
        }
        Commands::Show { user } => cmd_show(&db, &Engine::load(&cli)?, user),
        Commands::Select {
            user,
            category,
            resource_ref,
        } => cmd_select(&db, &Engine::load(&cli)?, user, category, resource_ref),
        Commands::Layers { user, json } => cmd_layers(&db, &Engine::load(&cli)?, user, *json),
        Commands::Reset { user } => cmd_reset(&db, user),
        Commands::Stats => cmd_stats(&db),
    }
}

fn cmd_catalog(
    db: &DiceDb,
    engine: &Engine,
    category: Option<&str>,
    user: Option<&str>,
) -> Result<()> {
    let categories = match category {
        Some(c) => vec![parse_category(c)?],
        None => Category::ALL.to_vec(),
    };

    let base = match user {
        Some(u) => engine
            .open_session(db, u)?
            .manager()
            .selection()
            .base
            .clone(),
        None => None,
    };

    for category in categories {
        let options = engine
            .catalog
            .option_states(category, base.as_deref(), &engine.rules);

        println!("=== {} ===", category.label());
        if options.is_empty() {
            println!("  (no items)\n");
            continue;
        }

        println!("{:<4}  {:<24}  {:<6}  {:<8}  {}", "#", "NAME", "LEVEL", "STATUS", "REF");
        println!("{}", "-".repeat(80));
        for (idx, option) in options.iter().enumerate() {
            let level = option
                .required_level
                .filter(|l| *l > 0)
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".into());
            let status = if option.blocked {
                "blocked"
            } else if option.locked {
                "locked"
            } else {
                "ok"
            };
            println!(
                "{:<4}  {:<24}  {:<6}  {:<8}  {}",
                idx + 1,
                option.display_name,
                level,
                status,
                option.resource_ref
            );
            if let Some(desc) = &option.reward_description {
                println!("      {}", desc);
            }
        }
        println!();
    }

    Ok(())
}

fn cmd_show(db: &DiceDb, engine: &Engine, user: &str) -> Result<()> {
    let session = engine.open_session(db, user)?;
    let manager = session.manager();

    println!("=== Selection for {} ===", user);
    for (category, value) in manager.selection().entries() {
        let shown = match value.and_then(|r| manager.catalog().find(category, r)) {
            Some(item) => format!("{} ({})", display_name(&item.name), item.resource_ref),
            None => category.none_label().to_string(),
        };
        println!("{:<16} {}", category.label(), shown);
    }

    if !session.repairs().is_empty() {
        println!("\nCleared on load:");
        for entry in session.repairs() {
            println!("  - {} {} ({:?})", entry.category, entry.resource_ref, entry.reason);
        }
    }

    println!("\nLayers (bottom first):");
    for (idx, layer) in manager.layers().iter().enumerate() {
        println!("  {}. {}", idx + 1, layer);
    }
    Ok(())
}

fn cmd_select(
    db: &DiceDb,
    engine: &Engine,
    user: &str,
    category: &str,
    resource_ref: &str,
) -> Result<()> {
    let category = parse_category(category)?;
    let value = if resource_ref.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(resource_ref)
    };

    let mut session = engine.open_session(db, user)?;
    let manager = session.manager_mut();

    if category == Category::Base {
        let cleared = manager
            .set_base(value)
            .map_err(|e| anyhow!("Rejected: {}", e))?;
        for entry in &cleared {
            println!("Cleared {} {} ({:?})", entry.category, entry.resource_ref, entry.reason);
        }
    } else {
        manager
            .select(category, value)
            .map_err(|e| anyhow!("Rejected: {}", e))?;
    }

    if session.commit(db)? {
        info!("Selection for {} updated", user);
        println!("Saved {} = {}", category, value.unwrap_or("none"));
    } else {
        println!("No change.");
    }
    Ok(())
}

fn cmd_layers(db: &DiceDb, engine: &Engine, user: &str, json: bool) -> Result<()> {
    let session = engine.open_session(db, user)?;
    let manifest = RenderManifest::from_selection(session.manager().selection());

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    for (idx, layer) in manifest.layers.iter().enumerate() {
        println!("{}. {}", idx + 1, layer);
    }
    println!("Title: {}", manifest.title.as_deref().unwrap_or("-"));
    Ok(())
}

fn cmd_reset(db: &DiceDb, user: &str) -> Result<()> {
    if db.delete_selection(user)? {
        println!("Deleted saved selection for {}", user);
    } else {
        println!("No saved selection for {}", user);
    }
    Ok(())
}

fn cmd_stats(db: &DiceDb) -> Result<()> {
    let stats = db.stats()?;

    println!("=== My Dice Database Stats ===");
    println!("Database:   {}", db.path().display());
    println!();
    println!("Selections: {}", stats.total_selections);
    println!(
        "Last saved: {}",
        stats
            .last_saved_at
            .map(format_timestamp)
            .unwrap_or_else(|| "never".into())
    );
    Ok(())
}
