use housing_shortlist::filter;
use housing_shortlist::{
    AddedDate, Catalog, Category, DropOutcome, DropTarget, FavouritesStore, FileStore,
    FilterCriteria, PropertyId, PropertyRecord, Session, Surface, TransferPayload,
    TransferProtocol,
};
use tempfile::TempDir;

fn scenario_catalog() -> Vec<PropertyRecord> {
    vec![
        PropertyRecord::new(
            "1",
            Category::House,
            200_000.0,
            2,
            "BR1",
            AddedDate::new(1, "Jan", 2025),
        ),
        PropertyRecord::new(
            "2",
            Category::House,
            800_000.0,
            4,
            "BR3",
            AddedDate::new(1, "Jan", 2025),
        ),
    ]
}

#[test]
fn test_house_over_400k_matches_only_the_expensive_house() {
    let criteria = FilterCriteria {
        category: Some(Category::House),
        min_price: Some(400_000.0),
        ..Default::default()
    };

    let result = filter::apply(&scenario_catalog(), &criteria);
    assert_eq!(result, vec![scenario_catalog()[1].clone()]);
}

#[test]
fn test_add_and_remove_survive_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = FileStore::new(dir.path());
    let record = scenario_catalog()[0].clone();

    let mut store = FavouritesStore::load(storage.clone(), "favourites");
    assert_eq!(store.add(record.clone()).unwrap().records(), &[record.clone()]);

    let reloaded = FavouritesStore::load(storage.clone(), "favourites");
    assert_eq!(reloaded.collection(), store.collection());

    assert!(store.remove(&PropertyId::new("1")).unwrap().is_empty());
    let reloaded = FavouritesStore::load(storage, "favourites");
    assert!(reloaded.collection().is_empty());
}

#[test]
fn test_corrupt_file_on_disk_starts_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("favourites.json"), "[{\"id\":").unwrap();

    let mut store = FavouritesStore::load(FileStore::new(dir.path()), "favourites");
    assert!(store.collection().is_empty());

    // The next mutation replaces the corrupt snapshot with a complete one.
    store.add(scenario_catalog()[1].clone()).unwrap();
    let content = std::fs::read_to_string(dir.path().join("favourites.json")).unwrap();
    let parsed: Vec<PropertyRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_repeated_drop_event_adds_once() {
    let dir = TempDir::new().unwrap();
    let mut store = FavouritesStore::load(FileStore::new(dir.path()), "favourites");
    let payload = TransferPayload::encode(&scenario_catalog()[0]).unwrap();
    let target = DropTarget::Surface(Surface::Favourites);

    for _ in 0..2 {
        TransferProtocol::drop_raw(Some(payload.as_str()), Surface::Results, target, &mut store);
    }

    assert_eq!(store.collection().len(), 1);
    assert!(store.collection().contains(&PropertyId::new("1")));
}

#[test]
fn test_session_round_trip_across_restarts() {
    let dir = TempDir::new().unwrap();
    let storage = FileStore::new(dir.path());

    {
        let mut session = Session::open(storage.clone());
        session.set_catalog(Catalog::new(scenario_catalog()));

        session.on_pick_up(&PropertyId::new("2"), Surface::Results).unwrap();
        assert_eq!(
            session.on_drop(DropTarget::Surface(Surface::Favourites)),
            DropOutcome::Added(PropertyId::new("2"))
        );
        session.add_favourite(&PropertyId::new("1")).unwrap();
        session.apply_filters(FilterCriteria {
            max_bedrooms: Some(3),
            ..Default::default()
        });
    }

    let mut session = Session::open(storage);
    let ids: Vec<&str> = session.favourites().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(session.criteria().max_bedrooms, Some(3));

    let results = session.set_catalog(Catalog::new(scenario_catalog()));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id.as_str(), "1");

    // Dragging a favourite out to nowhere leaves it in place.
    session.on_pick_up(&PropertyId::new("1"), Surface::Favourites).unwrap();
    assert_eq!(session.on_drop(DropTarget::Outside), DropOutcome::Cancelled);
    assert_eq!(session.favourites().len(), 2);

    assert!(session.clear_favourites().is_empty());
    let reopened = Session::open(FileStore::new(dir.path()));
    assert!(reopened.favourites().is_empty());
}
