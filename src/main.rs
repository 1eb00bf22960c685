use anyhow::Context;
use clap::Parser;
use housing_shortlist::catalog::{self, CatalogLoader};
use housing_shortlist::config::cli::{Cli, Command, FavouritesCommand, SearchArgs};
use housing_shortlist::{
    logging, DropOutcome, FileStore, PropertyId, PropertyRecord, Session, Surface,
};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    logging::init(config.logging.verbose, config.logging.json);
    debug!("Resolved config: {:?}", config);

    let storage = FileStore::new(&config.storage.dir);
    let mut session = Session::open_with_keys(
        storage,
        &config.storage.favourites_key,
        &config.storage.criteria_key,
    );

    if needs_catalog(&cli.command) {
        let source = catalog::source_for(&config.catalog.source, config.catalog_timeout())
            .context("Failed to create catalog source")?;
        let loader = CatalogLoader::new(source);
        session.load_catalog(&loader).await;
    }

    match cli.command {
        Command::Search(args) => search(&mut session, &args),
        Command::Show { id } => show(&session, &PropertyId::new(id)),
        Command::Favourites(command) => favourites(&mut session, command),
        Command::Drag(args) => {
            let id = PropertyId::new(args.id);
            if let Err(e) = session.on_pick_up(&id, args.from.into()) {
                println!("Nothing to drag: {}", e);
                return Ok(());
            }
            session.on_hover(args.to.into());
            match session.on_drop(args.to.into()) {
                DropOutcome::Added(id) => println!("⭐ {} added to favourites", id),
                DropOutcome::Removed(id) => println!("{} removed from favourites", id),
                DropOutcome::Unchanged(id) => println!("{}: favourites unchanged", id),
                DropOutcome::Cancelled => println!("Drop cancelled, nothing changed"),
                DropOutcome::Failed => println!("❌ Favourites could not be saved"),
            }
            print_favourites(&session);
        }
    }

    Ok(())
}

fn needs_catalog(command: &Command) -> bool {
    match command {
        Command::Search(_) | Command::Show { .. } => true,
        Command::Favourites(FavouritesCommand::Add { .. }) => true,
        Command::Favourites(_) => false,
        Command::Drag(args) => Surface::from(args.from) == Surface::Results,
    }
}

fn search(session: &mut Session<FileStore>, args: &SearchArgs) {
    let criteria = if args.last {
        info!("Re-running last search");
        session.criteria().clone()
    } else {
        args.criteria()
    };

    let results = session.apply_filters(criteria);
    if results.is_empty() {
        println!("No properties match these filters.");
        return;
    }

    for (i, property) in results.iter().enumerate() {
        println!("{}. {}", i + 1, property.summary());
    }
}

fn show(session: &Session<FileStore>, id: &PropertyId) {
    match session.property(id) {
        Some(property) => print_details(property, session.favourites().contains(id)),
        None => println!("No property with id {}", id),
    }
}

fn favourites(session: &mut Session<FileStore>, command: FavouritesCommand) {
    match command {
        FavouritesCommand::List => {}
        FavouritesCommand::Add { id } => {
            if let Err(e) = session.add_favourite(&PropertyId::new(id)) {
                println!("❌ {}", e);
            }
        }
        FavouritesCommand::Remove { id } => {
            session.remove_favourite(&PropertyId::new(id));
        }
        FavouritesCommand::Clear => {
            session.clear_favourites();
        }
    }
    print_favourites(session);
}

fn print_favourites(session: &Session<FileStore>) {
    let favourites = session.favourites();
    if favourites.is_empty() {
        println!("No favourites yet.");
        return;
    }

    println!("My favourites ({}):", favourites.len());
    for (i, property) in favourites.iter().enumerate() {
        println!("{}. {}", i + 1, property.summary());
    }
}

fn print_details(property: &PropertyRecord, is_favourite: bool) {
    println!("{} ({})", property.category, property.id);
    println!("   Price: {:.0}", property.price);
    println!("   Bedrooms: {}", property.bedrooms);
    println!("   Location: {}", property.location);
    println!("   Added: {}", property.added);
    if let Some(description) = property
        .description
        .as_deref()
        .or(property.short_description.as_deref())
    {
        println!("   {}", description);
    }
    if !property.images.is_empty() {
        println!("   Images: {}", property.images.join(", "));
    }
    if let Some(plan) = &property.floor_plan {
        println!("   Floor plan: {}", plan);
    }
    if is_favourite {
        println!("   ⭐ In favourites");
    }
}
