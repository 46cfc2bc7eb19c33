use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, Order, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::entities::{card_colors, cards, colors, editions};
use crate::errors::{CardError, CardResult, FieldErrors};
use crate::services::reference_service::ReferenceService;
use crate::services::validation::{unknown_choice, CardForm, ValidationService, INVALID_CHOICE};

/// Upper bound on the homepage sample.
pub const SAMPLE_SIZE: u64 = 9;

/// A card with its edition and colors resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDetails {
    #[serde(flatten)]
    pub card: cards::Model,
    pub edition: editions::Model,
    pub colors: Vec<colors::Model>,
    pub color_count: u64,
}

/// What a create form can offer for its edition and color fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormChoices {
    pub editions: Vec<editions::Model>,
    pub colors: Vec<colors::Model>,
}

/// Exact-match filters; unset fields don't constrain.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardFilter {
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub rarity: Option<String>,
    pub set_name: Option<String>,
}

#[derive(Clone)]
pub struct CardService {
    db: DatabaseConnection,
    references: ReferenceService,
}

impl CardService {
    pub fn new(db: DatabaseConnection) -> Self {
        let references = ReferenceService::new(db.clone());
        Self { db, references }
    }

    /// Validate a submitted form and persist it under a fresh identifier.
    ///
    /// Field problems and dangling edition/color references are reported
    /// together; if there are any, nothing is written.
    pub async fn create_card(&self, form: &CardForm) -> CardResult<CardDetails> {
        let (validated, choices, mut errors) = match ValidationService::validate_card_form(form) {
            Ok(card) => {
                let choices = card.choices();
                (Some(card), choices, FieldErrors::new())
            }
            Err(invalid) => (None, invalid.choices, invalid.errors),
        };

        let edition = match choices.edition_id {
            Some(edition_id) => {
                let edition = editions::Entity::find_by_id(edition_id)
                    .one(&self.db)
                    .await?;
                if edition.is_none() {
                    errors.add("edition", INVALID_CHOICE);
                }
                edition
            }
            None => None,
        };

        let colors = self.resolve_colors(&choices.color_ids, &mut errors).await?;

        let (Some(card), Some(edition)) = (validated, edition) else {
            return Err(CardError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(CardError::Validation(errors));
        }

        let txn = self.db.begin().await?;

        let card = cards::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(card.name),
            mana_cost: Set(card.mana_cost),
            text: Set(card.text),
            flavor: Set(card.flavor),
            card_type: Set(card.card_type),
            power: Set(card.power),
            toughness: Set(card.toughness),
            rarity: Set(card.rarity),
            set_name: Set(card.set_name),
            image_url: Set(card.image_url),
            edition_id: Set(edition.id),
        }
        .insert(&txn)
        .await?;

        let color_ids: Vec<i32> = colors.iter().map(|color| color.id).collect();
        link_colors(&txn, &card.id, &color_ids).await?;

        txn.commit().await?;
        info!("Created card '{}' ({})", card.name, card.id);

        Ok(CardDetails {
            card,
            edition,
            color_count: colors.len() as u64,
            colors,
        })
    }

    pub async fn get_card(&self, id: &str) -> CardResult<CardDetails> {
        let (card, edition) = cards::Entity::find_by_id(id.to_string())
            .find_also_related(editions::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| CardError::NotFound(id.to_string()))?;

        let edition = edition.ok_or_else(|| {
            DbErr::RecordNotFound(format!("edition {} of card {}", card.edition_id, card.id))
        })?;

        let colors = card
            .find_related(colors::Entity)
            .order_by_asc(colors::Column::Id)
            .all(&self.db)
            .await?;

        Ok(CardDetails {
            color_count: colors.len() as u64,
            card,
            edition,
            colors,
        })
    }

    pub async fn color_count(&self, id: &str) -> CardResult<u64> {
        let card = self.find_card(id).await?;
        Ok(card.color_count(&self.db).await?)
    }

    /// Link colors to an existing card, ignoring ones already linked.
    /// Returns the resulting color count.
    pub async fn attach_colors(&self, id: &str, color_ids: &[i32]) -> CardResult<u64> {
        let card = self.find_card(id).await?;

        let mut distinct: Vec<i32> = Vec::with_capacity(color_ids.len());
        for id in color_ids {
            if !distinct.contains(id) {
                distinct.push(*id);
            }
        }

        let mut errors = FieldErrors::new();
        let colors = self.resolve_colors(&distinct, &mut errors).await?;
        if !errors.is_empty() {
            return Err(CardError::Validation(errors));
        }

        let linked: Vec<i32> = card_colors::Entity::find()
            .filter(card_colors::Column::CardId.eq(card.id.as_str()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.color_id)
            .collect();

        let new_ids: Vec<i32> = colors
            .iter()
            .map(|color| color.id)
            .filter(|color_id| !linked.contains(color_id))
            .collect();
        link_colors(&self.db, &card.id, &new_ids).await?;

        Ok(card.color_count(&self.db).await?)
    }

    /// Unlink every color from a card. Returns how many links were removed.
    pub async fn clear_colors(&self, id: &str) -> CardResult<u64> {
        let card = self.find_card(id).await?;
        Ok(unlink_colors(&self.db, &card.id).await?)
    }

    /// Up to [`SAMPLE_SIZE`] cards picked at random by the database. Two calls
    /// need not return the same cards or the same order.
    pub async fn random_sample(&self) -> Result<Vec<cards::Model>, DbErr> {
        cards::Entity::find()
            .order_by(Expr::cust("RANDOM()"), Order::Asc)
            .limit(SAMPLE_SIZE)
            .all(&self.db)
            .await
    }

    pub async fn filter_cards(&self, filter: &CardFilter) -> Result<Vec<cards::Model>, DbErr> {
        let mut query = cards::Entity::find();

        if let Some(card_type) = &filter.card_type {
            query = query.filter(cards::Column::CardType.eq(card_type.as_str()));
        }
        if let Some(rarity) = &filter.rarity {
            query = query.filter(cards::Column::Rarity.eq(rarity.as_str()));
        }
        if let Some(set_name) = &filter.set_name {
            query = query.filter(cards::Column::SetName.eq(set_name.as_str()));
        }

        query
            .order_by_asc(cards::Column::Name)
            .all(&self.db)
            .await
    }

    pub async fn form_choices(&self) -> Result<FormChoices, DbErr> {
        Ok(FormChoices {
            editions: self.references.list_editions().await?,
            colors: self.references.list_colors().await?,
        })
    }

    async fn find_card(&self, id: &str) -> CardResult<cards::Model> {
        cards::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| CardError::NotFound(id.to_string()))
    }

    /// Look up distinct color ids, keeping input order. Unknown ids are
    /// reported under `colors`.
    async fn resolve_colors(
        &self,
        color_ids: &[i32],
        errors: &mut FieldErrors,
    ) -> Result<Vec<colors::Model>, DbErr> {
        if color_ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = colors::Entity::find()
            .filter(colors::Column::Id.is_in(color_ids.iter().copied()))
            .all(&self.db)
            .await?;

        let mut resolved: Vec<colors::Model> = Vec::with_capacity(found.len());
        for id in color_ids {
            match found.iter().find(|color| color.id == *id) {
                Some(color) => resolved.push(color.clone()),
                None => errors.add("colors", unknown_choice(id)),
            }
        }

        Ok(resolved)
    }
}

pub(crate) async fn link_colors<C: ConnectionTrait>(
    conn: &C,
    card_id: &str,
    color_ids: &[i32],
) -> Result<(), DbErr> {
    if color_ids.is_empty() {
        return Ok(());
    }

    let links = color_ids.iter().map(|color_id| card_colors::ActiveModel {
        card_id: Set(card_id.to_string()),
        color_id: Set(*color_id),
    });
    card_colors::Entity::insert_many(links).exec(conn).await?;
    debug!("Linked {} colors to card {}", color_ids.len(), card_id);

    Ok(())
}

pub(crate) async fn unlink_colors<C: ConnectionTrait>(conn: &C, card_id: &str) -> Result<u64, DbErr> {
    let result = card_colors::Entity::delete_many()
        .filter(card_colors::Column::CardId.eq(card_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
