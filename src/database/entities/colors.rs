use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "colors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: ColorCode,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::card_colors::Entity")]
    CardColors,
}

impl Related<super::card_colors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardColors.def()
    }
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        super::card_colors::Relation::Card.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::card_colors::Relation::Color.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The five mana colors, stored as their single-letter code.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(3))")]
pub enum ColorCode {
    #[sea_orm(string_value = "R")]
    #[serde(rename = "R")]
    Red,
    #[sea_orm(string_value = "G")]
    #[serde(rename = "G")]
    Green,
    #[sea_orm(string_value = "U")]
    #[serde(rename = "U")]
    Blue,
    #[sea_orm(string_value = "W")]
    #[serde(rename = "W")]
    White,
    #[sea_orm(string_value = "B")]
    #[serde(rename = "B")]
    Black,
}

impl ColorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ColorCode::Red => "R",
            ColorCode::Green => "G",
            ColorCode::Blue => "U",
            ColorCode::White => "W",
            ColorCode::Black => "B",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ColorCode::Red => "Red",
            ColorCode::Green => "Green",
            ColorCode::Blue => "Blue",
            ColorCode::White => "White",
            ColorCode::Black => "Black",
        }
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ColorCode {
    type Err = String;

    /// Accepts either the letter code or the color name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        <ColorCode as sea_orm::Iterable>::iter()
            .find(|code| {
                code.code().eq_ignore_ascii_case(trimmed)
                    || code.display_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("Unknown color code: {}", s))
    }
}
