use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub mana_cost: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub flavor: Option<String>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub card_type: String,
    // Free-form: non-creatures have no numeric power or toughness
    pub power: String,
    pub toughness: String,
    pub rarity: String,
    pub set_name: String,
    pub image_url: String,
    pub edition_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::editions::Entity",
        from = "Column::EditionId",
        to = "super::editions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Edition,
    #[sea_orm(has_many = "super::card_colors::Entity")]
    CardColors,
}

impl Related<super::editions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Edition.def()
    }
}

impl Related<super::card_colors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardColors.def()
    }
}

impl Related<super::colors::Entity> for Entity {
    fn to() -> RelationDef {
        super::card_colors::Relation::Color.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::card_colors::Relation::Card.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Number of colors currently linked to this card.
    pub async fn color_count<C: ConnectionTrait>(&self, db: &C) -> Result<u64, DbErr> {
        self.find_related(super::colors::Entity).count(db).await
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
