use anyhow::Result;
use sea_orm::*;
use tracing::info;

use crate::database::entities::{colors, ColorCode};

/// Insert the five mana colors that are not present yet. Returns how many
/// were created.
pub async fn seed_colors(db: &DatabaseConnection) -> Result<usize> {
    let existing: Vec<ColorCode> = colors::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|color| color.code)
        .collect();

    let missing: Vec<colors::ActiveModel> = ColorCode::iter()
        .filter(|code| !existing.contains(code))
        .map(|code| colors::ActiveModel {
            name: Set(code.display_name().to_string()),
            code: Set(code),
            ..Default::default()
        })
        .collect();

    if missing.is_empty() {
        info!("Colors already seeded, skipping");
        return Ok(0);
    }

    let created = missing.len();
    colors::Entity::insert_many(missing).exec(db).await?;
    info!("Created {} colors", created);

    Ok(created)
}
