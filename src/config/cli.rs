use crate::config::AppConfig;
use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::models::Category;
use crate::transfer::{DropTarget, Surface};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "housing-shortlist")]
#[command(about = "Search a property catalog and keep a shortlist of favourites")]
pub struct Cli {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Catalog path or http(s) URL")]
    pub catalog: Option<String>,

    #[arg(long, global = true, help = "Directory for favourites and saved filters")]
    pub data_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter the catalog
    Search(SearchArgs),
    /// Show one listing in full
    Show { id: String },
    /// Manage the favourites shortlist
    #[command(subcommand)]
    Favourites(FavouritesCommand),
    /// Move a listing between the results and favourites views
    Drag(DragArgs),
}

#[derive(Debug, Default, Args)]
pub struct SearchArgs {
    #[arg(long = "type", help = "House, Flat, Bungalow or Penthouse")]
    pub category: Option<Category>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub min_bedrooms: Option<u32>,

    #[arg(long)]
    pub max_bedrooms: Option<u32>,

    #[arg(long, help = "Earliest added date, YYYY-MM-DD")]
    pub added_after: Option<NaiveDate>,

    #[arg(long, help = "Location or postcode fragment")]
    pub location: Option<String>,

    #[arg(
        long,
        help = "Re-run the last submitted search",
        conflicts_with_all = ["category", "min_price", "max_price", "min_bedrooms", "max_bedrooms", "added_after", "location"]
    )]
    pub last: bool,
}

impl SearchArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            max_bedrooms: self.max_bedrooms,
            added_after: self.added_after,
            location: self.location.clone().filter(|l| !l.trim().is_empty()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum FavouritesCommand {
    List,
    Add { id: String },
    Remove { id: String },
    Clear,
}

#[derive(Debug, Args)]
pub struct DragArgs {
    pub id: String,

    #[arg(long, value_enum)]
    pub from: SurfaceArg,

    #[arg(long, value_enum)]
    pub to: TargetArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceArg {
    Results,
    Favourites,
}

impl From<SurfaceArg> for Surface {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Results => Surface::Results,
            SurfaceArg::Favourites => Surface::Favourites,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Results,
    Favourites,
    Outside,
}

impl From<TargetArg> for DropTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Results => DropTarget::Surface(Surface::Results),
            TargetArg::Favourites => DropTarget::Surface(Surface::Favourites),
            TargetArg::Outside => DropTarget::Outside,
        }
    }
}

impl Cli {
    /// Layer configuration: file (or defaults), then environment, then flags
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_env_overrides();

        if let Some(catalog) = &self.catalog {
            config.catalog.source = catalog.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.storage.dir = dir.clone();
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;

        config.validate()?;
        Ok(config)
    }
}
