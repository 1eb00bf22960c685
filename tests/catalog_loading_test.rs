use housing_shortlist::catalog::{self, CatalogLoader, FileCatalogSource, HttpCatalogSource};
use housing_shortlist::{FilterCriteria, MemoryStore, Session};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

fn catalog_json() -> serde_json::Value {
    serde_json::json!({
        "properties": [
            {
                "id": "prop1",
                "type": "House",
                "bedrooms": 3,
                "price": 750000,
                "location": "Petts Wood Road, Petts Wood, Orpington BR5",
                "picture": "images/prop1pic1small.jpg",
                "shortDescription": "Attractive three bedroom semi-detached family house",
                "added": {"month": "October", "day": 12, "year": 2022}
            },
            {
                "id": "prop2",
                "type": "Flat",
                "bedrooms": 2,
                "price": 399995,
                "location": "Crofton Road Orpington BR6",
                "added": {"month": "September", "day": 14, "year": 2022}
            },
            {
                "id": "prop3",
                "type": "Flat",
                "location": "Missing price and bedrooms"
            }
        ]
    })
}

#[tokio::test]
async fn test_load_catalog_over_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/properties.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_json());
    });

    let source = HttpCatalogSource::new(server.url("/properties.json"), Duration::from_secs(5))
        .unwrap();
    let catalog = CatalogLoader::new(Box::new(source)).load().await;

    api_mock.assert();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.quarantined(), 1);
    assert_eq!(
        catalog.records()[0].short_description.as_deref(),
        Some("Attractive three bedroom semi-detached family house")
    );
}

#[tokio::test]
async fn test_http_failure_surfaces_empty_catalog() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/properties.json");
        then.status(500);
    });

    let source = HttpCatalogSource::new(server.url("/properties.json"), Duration::from_secs(5))
        .unwrap();
    let loader = CatalogLoader::new(Box::new(source));

    assert!(loader.try_load().await.is_err());
    assert!(loader.load().await.is_empty());
    api_mock.assert_hits(2);
}

#[tokio::test]
async fn test_load_catalog_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("properties.json");
    std::fs::write(&path, catalog_json().to_string()).unwrap();

    let source = catalog::source_for(path.to_str().unwrap(), Duration::from_secs(1)).unwrap();
    let catalog = CatalogLoader::new(source).load().await;
    assert_eq!(catalog.len(), 2);

    let missing = CatalogLoader::new(Box::new(FileCatalogSource::new(
        dir.path().join("nope.json"),
    )));
    assert!(missing.load().await.is_empty());
}

#[tokio::test]
async fn test_session_filters_loaded_catalog() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/properties.json");
        then.status(200).json_body(catalog_json());
    });

    let source = HttpCatalogSource::new(server.url("/properties.json"), Duration::from_secs(5))
        .unwrap();
    let loader = CatalogLoader::new(Box::new(source));

    let storage = MemoryStore::new();
    let mut session = Session::open(&storage);
    assert!(session.results().is_empty());

    assert_eq!(session.load_catalog(&loader).await.len(), 2);

    let criteria = FilterCriteria {
        location: Some("br6".to_string()),
        ..Default::default()
    };
    let results = session.apply_filters(criteria);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id.as_str(), "prop2");
}
