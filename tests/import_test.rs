//! File import integration tests

use anyhow::Result;
use mtgcards::config::{ColorKey, ConflictPolicy, ImportOptions, MissingReferencePolicy};
use mtgcards::database::entities::*;
use mtgcards::database::{seed_data, setup_database};
use mtgcards::errors::ImportError;
use mtgcards::services::{CardService, ImportService};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use std::io::Write;
use tempfile::NamedTempFile;

async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;
    seed_data::seed_colors(&db).await?;

    editions::ActiveModel {
        name: Set("Limited Edition Alpha".to_string()),
        code: Set("LEA".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    Ok((db, temp_file))
}

fn write_records(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

const CARDS_JSON: &str = r#"[
    {
        "id": "a",
        "name": "Shivan Dragon",
        "mana_cost": "{4}{R}{R}",
        "type": "Creature - Dragon",
        "power": "5",
        "toughness": "5",
        "rarity": "Rare",
        "set": "LEA",
        "set_name": "Limited Edition Alpha",
        "image_url": "http://example.com/shivan.jpg",
        "colors": ["Red"]
    },
    {
        "id": "b",
        "name": "Sol Ring",
        "type": "Artifact",
        "rarity": "Uncommon",
        "set": "LEA",
        "colors": []
    }
]"#;

#[tokio::test]
async fn test_import_file() -> Result<()> {
    let (db, _db_file) = setup_test_db().await?;
    let input = write_records(CARDS_JSON)?;

    let service = ImportService::new(db.clone(), ImportOptions::default());
    let report = service.import_file(input.path()).await?;

    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 0);

    let cards = CardService::new(db.clone());
    let dragon = cards.get_card("a").await?;
    assert_eq!(dragon.card.name, "Shivan Dragon");
    assert_eq!(dragon.color_count, 1);
    assert_eq!(dragon.edition.code, "LEA");

    let ring = cards.get_card("b").await?;
    assert_eq!(ring.color_count, 0);
    assert_eq!(ring.card.set_name, "Limited Edition Alpha");
    assert_eq!(ring.card.power, "");

    Ok(())
}

#[tokio::test]
async fn test_reimport_replaces_cards() -> Result<()> {
    let (db, _db_file) = setup_test_db().await?;
    let input = write_records(CARDS_JSON)?;
    let service = ImportService::new(db.clone(), ImportOptions::default());

    service.import_file(input.path()).await?;
    service.import_file(input.path()).await?;

    assert_eq!(cards::Entity::find().count(&db).await?, 2);
    assert_eq!(card_colors::Entity::find().count(&db).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_reject_duplicates() -> Result<()> {
    let (db, _db_file) = setup_test_db().await?;
    let input = write_records(CARDS_JSON)?;

    ImportService::new(db.clone(), ImportOptions::default())
        .import_file(input.path())
        .await?;

    let options = ImportOptions {
        conflict_policy: ConflictPolicy::Reject,
        ..ImportOptions::default()
    };
    let report = ImportService::new(db.clone(), options)
        .import_file(input.path())
        .await?;
    assert_eq!(report.imported, 0);
    assert_eq!(report.skipped_ids(), vec!["a", "b"]);
    assert_eq!(cards::Entity::find().count(&db).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_unknown_color_by_code() -> Result<()> {
    let (db, _db_file) = setup_test_db().await?;
    let input = write_records(
        r#"[
            { "id": "a", "name": "A", "set": "LEA", "colors": ["R"] },
            { "id": "b", "name": "B", "set": "LEA", "colors": ["Purple"] }
        ]"#,
    )?;

    let options = ImportOptions {
        color_key: ColorKey::Code,
        ..ImportOptions::default()
    };
    let result = ImportService::new(db.clone(), options)
        .import_file(input.path())
        .await;

    match result {
        Err(ImportError::UnknownColor { index, id, reference }) => {
            assert_eq!(index, 1);
            assert_eq!(id, "b");
            assert_eq!(reference, "Purple");
        }
        other => panic!("expected unknown color, got {:?}", other),
    }

    // The failing record left no card behind
    assert!(cards::Entity::find_by_id("a".to_string()).one(&db).await?.is_some());
    assert!(cards::Entity::find_by_id("b".to_string()).one(&db).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_skip_missing_references() -> Result<()> {
    let (db, _db_file) = setup_test_db().await?;
    let input = write_records(
        r#"[
            { "id": "a", "name": "A", "set": "XXX" },
            { "id": "b", "name": "B", "set": "LEA" }
        ]"#,
    )?;

    let options = ImportOptions {
        missing_reference: MissingReferencePolicy::Skip,
        ..ImportOptions::default()
    };
    let report = ImportService::new(db.clone(), options)
        .import_file(input.path())
        .await?;

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped_ids(), vec!["a"]);

    Ok(())
}

#[tokio::test]
async fn test_malformed_file() -> Result<()> {
    let (db, _db_file) = setup_test_db().await?;
    let input = write_records("{ not json")?;

    let result = ImportService::new(db, ImportOptions::default())
        .import_file(input.path())
        .await;
    assert!(matches!(result, Err(ImportError::InvalidJson(_))));

    Ok(())
}
