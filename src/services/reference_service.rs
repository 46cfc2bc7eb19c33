use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::database::entities::{colors, editions};
use crate::errors::ReferenceResult;
use crate::services::validation::{NewColor, NewEdition, ValidationService};

/// Colors and editions: the lookup records cards point at.
#[derive(Clone)]
pub struct ReferenceService {
    db: DatabaseConnection,
}

impl ReferenceService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_colors(&self) -> Result<Vec<colors::Model>, DbErr> {
        colors::Entity::find()
            .order_by_asc(colors::Column::Id)
            .all(&self.db)
            .await
    }

    /// Editions ordered by name
    pub async fn list_editions(&self) -> Result<Vec<editions::Model>, DbErr> {
        editions::Entity::find()
            .order_by_asc(editions::Column::Name)
            .order_by_asc(editions::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn create_edition(&self, input: &NewEdition) -> ReferenceResult<editions::Model> {
        let input = ValidationService::validate_new_edition(input)?;

        let edition = editions::ActiveModel {
            name: Set(input.name),
            code: Set(input.code),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created edition {}", edition);
        Ok(edition)
    }

    pub async fn create_color(&self, input: &NewColor) -> ReferenceResult<colors::Model> {
        let (name, code) = ValidationService::validate_new_color(input)?;

        let color = colors::ActiveModel {
            name: Set(name),
            code: Set(code),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created color {} ({})", color, color.code.code());
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::ColorCode;
    use crate::database::test_utils::setup_test_db;
    use crate::errors::ReferenceError;

    fn edition(name: &str, code: &str) -> NewEdition {
        NewEdition {
            name: name.to_string(),
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_editions_listed_by_name() {
        let service = ReferenceService::new(setup_test_db().await);

        for (name, code) in [("Beta", "LEB"), ("Alpha", "LEA"), ("Zendikar", "ZEN")] {
            service.create_edition(&edition(name, code)).await.unwrap();
        }

        let names: Vec<String> = service
            .list_editions()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Zendikar"]);
    }

    #[tokio::test]
    async fn test_create_color_accepts_name_or_code() {
        let service = ReferenceService::new(setup_test_db().await);

        let blue = service
            .create_color(&NewColor {
                name: "Blue".to_string(),
                code: "U".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(blue.code, ColorCode::Blue);

        let colors = service.list_colors().await.unwrap();
        assert_eq!(colors, vec![blue]);
    }

    #[tokio::test]
    async fn test_create_color_rejects_unknown_code() {
        let service = ReferenceService::new(setup_test_db().await);

        let err = service
            .create_color(&NewColor {
                name: "Purple".to_string(),
                code: "P".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReferenceError::Validation(_)));
        assert!(service.list_colors().await.unwrap().is_empty());
    }
}
