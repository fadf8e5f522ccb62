use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use gamelog_core::schema::Database;
use gamelog_tracker::{Config, Tracker};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "gamelog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/gamelog/library.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Add a finished (or planned) game
    Add {
        /// Display title
        name: String,

        #[command(flatten)]
        fields: GameFields,
    },
    /// Change an existing game
    ///
    /// Only the options given are changed. Use --clear-date or --clear-score
    /// to remove a value.
    Edit {
        /// Game id (see `gamelog list`)
        id: i64,

        /// New display title
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: GameFields,

        /// Remove the completion date
        #[arg(long, conflicts_with = "completed")]
        clear_date: bool,

        /// Remove the rating or Metacritic score
        #[arg(long, conflicts_with_all = ["rating", "metacritic"])]
        clear_score: bool,
    },
    /// Delete a game
    Delete {
        /// Game id
        id: i64,
    },
    /// List games grouped by completion year
    List,
    /// Show everything recorded about one game
    Show {
        /// Game id
        id: i64,
    },
    /// Manage a game's cover image
    Cover {
        #[command(subcommand)]
        action: CoverAction,
    },
    /// Manage platforms
    Platform {
        #[command(subcommand)]
        action: PlatformAction,
    },
    /// Show or change how games are sorted within a year
    Sort {
        /// completionDate, platform, name, rating or metacriticScore
        by: Option<String>,

        /// asc or desc
        order: Option<String>,
    },
    /// Export the whole library to a JSON file
    ///
    /// Covers are embedded as data URIs so the file stands alone. Without a
    /// path the file is written to the current directory as
    /// game-tracker-data-<date>.json.
    Export {
        /// Output file
        path: Option<PathBuf>,
    },
    /// Replace the library with the contents of an export file
    ///
    /// The file is checked in full first; if anything is wrong nothing is
    /// changed.
    Import {
        /// Export file to read
        path: PathBuf,
    },
    /// Delete all games and covers and restore the default platforms
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show store statistics
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Editable game fields shared by `add` and `edit`.
#[derive(Debug, clap::Args)]
struct GameFields {
    /// Original (untranslated) title
    #[arg(long)]
    original_name: Option<String>,

    /// Platform label, e.g. "PS5"
    #[arg(long)]
    platform: Option<String>,

    /// Completion date (YYYY-MM-DD)
    #[arg(long)]
    completed: Option<NaiveDate>,

    /// Personal rating from 1 to 10
    #[arg(long, conflicts_with = "metacritic")]
    rating: Option<u8>,

    /// Metacritic score
    #[arg(long)]
    metacritic: Option<String>,

    /// Short comment (at most 20 characters)
    #[arg(long)]
    comment: Option<String>,

    /// Image file to use as the cover
    #[arg(long)]
    cover: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum CoverAction {
    /// Set a game's cover from an image file
    Set { id: i64, path: PathBuf },
    /// Detach a game's cover
    Remove { id: i64 },
    /// Write a game's cover to a file
    Save { id: i64, path: PathBuf },
}

#[derive(Debug, clap::Subcommand)]
enum PlatformAction {
    /// List platforms in display order
    List,
    /// Append a new platform
    Add {
        /// Name for the new platform
        name: Option<String>,

        /// Badge color, e.g. "#667eea"
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename or recolor a platform
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a platform (games keep their labels)
    Delete { id: String },
    /// Set the display order; every platform id must be given once
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(path) => Config::load_with_db_path(path)?,
        None => Config::load()?,
    };

    twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {:?}", e))?;

    // Config commands never touch the database.
    let command = match cli.command {
        Commands::Config { action } => return run_config(&config, action),
        command => command,
    };

    let mut tracker = open_tracker(&config)?;

    match command {
        Commands::Add { name, fields } => {
            commands::games::add(&mut tracker, &config, name, fields)?;
        }
        Commands::Edit {
            id,
            name,
            fields,
            clear_date,
            clear_score,
        } => {
            let edit = commands::games::Edit {
                name,
                fields,
                clear_date,
                clear_score,
            };
            commands::games::edit(&mut tracker, &config, id, edit)?;
        }
        Commands::Delete { id } => commands::games::delete(&mut tracker, id)?,
        Commands::List => commands::games::list(&tracker),
        Commands::Show { id } => commands::games::show(&tracker, id)?,
        Commands::Cover { action } => match action {
            CoverAction::Set { id, path } => {
                commands::games::set_cover(&mut tracker, &config, id, &path)?;
            }
            CoverAction::Remove { id } => commands::games::remove_cover(&mut tracker, id)?,
            CoverAction::Save { id, path } => commands::games::save_cover(&tracker, id, &path)?,
        },
        Commands::Platform { action } => match action {
            PlatformAction::List => commands::platform::list(&tracker),
            PlatformAction::Add { name, color } => {
                commands::platform::add(&mut tracker, name, color)?;
            }
            PlatformAction::Edit { id, name, color } => {
                commands::platform::edit(&mut tracker, &id, name, color)?;
            }
            PlatformAction::Delete { id } => commands::platform::delete(&mut tracker, &id)?,
            PlatformAction::Reorder { ids } => commands::platform::reorder(&mut tracker, &ids)?,
        },
        Commands::Sort { by, order } => commands::sort::run(&mut tracker, by, order)?,
        Commands::Export { path } => commands::transfer::export(&tracker, path)?,
        Commands::Import { path } => commands::transfer::import(&mut tracker, &path)?,
        Commands::Clear { yes } => commands::clear::run(&mut tracker, yes)?,
        Commands::Status => commands::status::show_status(&tracker, &config)?,
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn run_config(config: &Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(config),
        ConfigAction::Get { key } => commands::config::get_config(config, key),
        ConfigAction::Set { key, value } => commands::config::set_config(&key, &value),
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(),
    }
}

fn open_tracker(config: &Config) -> Result<Tracker> {
    let db_path = &config.database_path;

    // Ensure database directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let db = Database::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    Ok(Tracker::open(db)?)
}
