//! Database functionality tests
//!
//! Migrations, entity relations and the foreign-key behaviour cards rely on

use anyhow::Result;
use mtgcards::database::entities::*;
use mtgcards::database::{seed_data, setup_database};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set,
};
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

async fn create_edition(db: &DatabaseConnection) -> Result<editions::Model> {
    Ok(editions::ActiveModel {
        name: Set("Standard Edition".to_string()),
        code: Set("STD".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

fn card(id: &str, name: &str, edition_id: i32) -> cards::ActiveModel {
    cards::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        mana_cost: Set(Some("{5}".to_string())),
        text: Set(None),
        flavor: Set(None),
        card_type: Set("Artifact".to_string()),
        power: Set(String::new()),
        toughness: Set(String::new()),
        rarity: Set("Rare".to_string()),
        set_name: Set("Test Set".to_string()),
        image_url: Set("http://example.com/card3.png".to_string()),
        edition_id: Set(edition_id),
    }
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    assert_eq!(colors::Entity::find().count(&db).await?, 0);
    assert_eq!(editions::Entity::find().count(&db).await?, 0);
    assert_eq!(cards::Entity::find().count(&db).await?, 0);
    assert_eq!(card_colors::Entity::find().count(&db).await?, 0);

    // Running them again is a no-op
    setup_database(&db).await?;

    Ok(())
}

#[tokio::test]
async fn test_card_colors_many_to_many() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    seed_data::seed_colors(&db).await?;
    let edition = create_edition(&db).await?;

    let artifact = card("card-3", "Test Card 3", edition.id).insert(&db).await?;
    assert_eq!(artifact.color_count(&db).await?, 0);

    let red = colors::Entity::find()
        .filter(colors::Column::Code.eq(ColorCode::Red))
        .one(&db)
        .await?
        .expect("Red should be seeded");
    let blue = colors::Entity::find()
        .filter(colors::Column::Code.eq(ColorCode::Blue))
        .one(&db)
        .await?
        .expect("Blue should be seeded");

    for color in [&red, &blue] {
        card_colors::ActiveModel {
            card_id: Set(artifact.id.clone()),
            color_id: Set(color.id),
        }
        .insert(&db)
        .await?;
    }

    assert_eq!(artifact.color_count(&db).await?, 2);

    // And from the other side
    let red_cards = red.find_related(cards::Entity).all(&db).await?;
    assert_eq!(red_cards, vec![artifact.clone()]);

    let (_, found_edition) = cards::Entity::find_by_id(artifact.id.clone())
        .find_also_related(editions::Entity)
        .one(&db)
        .await?
        .expect("Card should exist");
    assert_eq!(found_edition, Some(edition));

    Ok(())
}

#[tokio::test]
async fn test_card_requires_existing_edition() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let result = card("orphan", "Orphan", 42).insert(&db).await;
    assert!(result.is_err());
    assert_eq!(cards::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_deleting_edition_cascades_to_cards() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let edition = create_edition(&db).await?;
    card("card-1", "Test Card 1", edition.id).insert(&db).await?;

    edition.delete(&db).await?;

    assert_eq!(cards::Entity::find().count(&db).await?, 0);
    Ok(())
}
