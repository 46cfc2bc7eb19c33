use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::database::entities::ColorCode;
use crate::errors::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_URL: &str = "Enter a valid URL.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Message for one value of a multiple choice that isn't available.
pub fn unknown_choice(value: impl fmt::Display) -> String {
    format!(
        "Select a valid choice. {} is not one of the available choices.",
        value
    )
}

/// A submitted choice: an id, or whatever was sent that cannot be one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Choice {
    Id(i32),
    Invalid(String),
}

impl Choice {
    fn from_value(value: &Value) -> Self {
        let id = match value {
            Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };

        match (id, value) {
            (Some(id), _) => Choice::Id(id),
            (None, Value::String(s)) => Choice::Invalid(s.clone()),
            (None, other) => Choice::Invalid(other.to_string()),
        }
    }
}

impl From<i32> for Choice {
    fn from(id: i32) -> Self {
        Choice::Id(id)
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Choice::from_value(&value))
    }
}

/// Text input takes any scalar as its string form, so a bad value ends up
/// as a field error rather than an unreadable body.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A lone value counts as a one-element list.
fn deserialize_choices<'de, D>(deserializer: D) -> Result<Vec<Choice>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(Choice::from_value).collect(),
        Some(other) => vec![Choice::from_value(&other)],
    })
}

/// Submitted values for a new card, everything but the identifier.
///
/// `edition` is an edition id and `colors` a list of color ids, as picked
/// from the choices a create form offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardForm {
    #[serde(deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub mana_cost: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub flavor: Option<String>,
    #[serde(rename = "type", deserialize_with = "deserialize_text")]
    pub card_type: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub power: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub toughness: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub rarity: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub set_name: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub image_url: Option<String>,
    pub edition: Option<Choice>,
    #[serde(deserialize_with = "deserialize_choices")]
    pub colors: Vec<Choice>,
}

/// Edition and color ids a form selected, duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardChoices {
    pub edition_id: Option<i32>,
    pub color_ids: Vec<i32>,
}

/// A form that passed field validation. References are not checked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCard {
    pub name: String,
    pub mana_cost: Option<String>,
    pub text: Option<String>,
    pub flavor: Option<String>,
    pub card_type: String,
    pub power: String,
    pub toughness: String,
    pub rarity: String,
    pub set_name: String,
    pub image_url: String,
    pub edition_id: i32,
    pub color_ids: Vec<i32>,
}

impl ValidatedCard {
    pub fn choices(&self) -> CardChoices {
        CardChoices {
            edition_id: Some(self.edition_id),
            color_ids: self.color_ids.clone(),
        }
    }
}

/// A form that failed field validation. The choices that did parse are kept
/// so their references can still be checked and reported with the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidCardForm {
    pub errors: FieldErrors,
    pub choices: CardChoices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEdition {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewColor {
    pub name: String,
    pub code: String,
}

/// Service for field-level validation of submitted records
pub struct ValidationService;

impl ValidationService {
    /// Check every field of a card form, collecting all problems at once.
    pub fn validate_card_form(form: &CardForm) -> Result<ValidatedCard, InvalidCardForm> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", form.name.as_deref(), 100);
        let mana_cost = optional_text(&mut errors, "mana_cost", form.mana_cost.as_deref(), Some(100));
        let text = optional_text(&mut errors, "text", form.text.as_deref(), None);
        let flavor = optional_text(&mut errors, "flavor", form.flavor.as_deref(), None);
        let card_type = required_text(&mut errors, "type", form.card_type.as_deref(), 100);
        let power = required_text(&mut errors, "power", form.power.as_deref(), 5);
        let toughness = required_text(&mut errors, "toughness", form.toughness.as_deref(), 5);
        let rarity = required_text(&mut errors, "rarity", form.rarity.as_deref(), 20);
        let set_name = required_text(&mut errors, "set_name", form.set_name.as_deref(), 50);

        let image_url = required_text(&mut errors, "image_url", form.image_url.as_deref(), 300)
            .filter(|url| match Self::validate_url(url) {
                Ok(()) => true,
                Err(message) => {
                    errors.add("image_url", message);
                    false
                }
            });

        let edition_id = match &form.edition {
            Some(Choice::Id(id)) => Some(*id),
            Some(Choice::Invalid(_)) => {
                errors.add("edition", INVALID_CHOICE);
                None
            }
            None => {
                errors.add("edition", REQUIRED);
                None
            }
        };

        let mut color_ids = Vec::with_capacity(form.colors.len());
        for choice in &form.colors {
            match choice {
                Choice::Id(id) if !color_ids.contains(id) => color_ids.push(*id),
                Choice::Id(_) => {}
                Choice::Invalid(value) => errors.add("colors", unknown_choice(value)),
            }
        }

        match (
            name, card_type, power, toughness, rarity, set_name, image_url, edition_id,
        ) {
            (
                Some(name),
                Some(card_type),
                Some(power),
                Some(toughness),
                Some(rarity),
                Some(set_name),
                Some(image_url),
                Some(edition_id),
            ) if errors.is_empty() => Ok(ValidatedCard {
                name,
                mana_cost,
                text,
                flavor,
                card_type,
                power,
                toughness,
                rarity,
                set_name,
                image_url,
                edition_id,
                color_ids,
            }),
            _ => Err(InvalidCardForm {
                errors,
                choices: CardChoices {
                    edition_id,
                    color_ids,
                },
            }),
        }
    }

    /// Absolute http(s)/ftp(s) URL with a host.
    pub fn validate_url(value: &str) -> Result<(), &'static str> {
        let url = Url::parse(value.trim()).map_err(|_| INVALID_URL)?;

        if !URL_SCHEMES.contains(&url.scheme()) {
            return Err(INVALID_URL);
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(INVALID_URL),
        }
    }

    pub fn validate_new_edition(input: &NewEdition) -> Result<NewEdition, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", Some(&input.name), 100);
        let code = required_text(&mut errors, "code", Some(&input.code), 3);

        match (name, code) {
            (Some(name), Some(code)) => Ok(NewEdition { name, code }),
            _ => Err(errors),
        }
    }

    pub fn validate_new_color(input: &NewColor) -> Result<(String, ColorCode), FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", Some(&input.name), 20);
        let code = match input.code.parse::<ColorCode>() {
            Ok(code) => Some(code),
            Err(_) => {
                errors.add("code", unknown_choice(&input.code));
                None
            }
        };

        match (name, code) {
            (Some(name), Some(code)) => Ok((name, code)),
            _ => Err(errors),
        }
    }
}

fn too_long(max: usize, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        max, actual
    )
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }

    let length = trimmed.chars().count();
    if length > max {
        errors.add(field, too_long(max, length));
        return None;
    }

    Some(trimmed.to_string())
}

fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: Option<usize>,
) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;

    if let Some(max) = max {
        let length = trimmed.chars().count();
        if length > max {
            errors.add(field, too_long(max, length));
            return None;
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CardForm {
        CardForm {
            name: Some("Test Card Form".to_string()),
            mana_cost: Some("{3}{R}".to_string()),
            text: None,
            flavor: None,
            card_type: Some("Creature".to_string()),
            power: Some("2".to_string()),
            toughness: Some("2".to_string()),
            rarity: Some("Common".to_string()),
            set_name: Some("Form Test Set".to_string()),
            image_url: Some("http://example.com/formcard.png".to_string()),
            edition: Some(1.into()),
            colors: vec![1.into()],
        }
    }

    #[test]
    fn test_valid_form() {
        let card = ValidationService::validate_card_form(&valid_form()).unwrap();
        assert_eq!(card.name, "Test Card Form");
        assert_eq!(card.mana_cost.as_deref(), Some("{3}{R}"));
        assert_eq!(card.edition_id, 1);
        assert_eq!(card.color_ids, vec![1]);
    }

    fn clear_field(form: &mut CardForm, field: &str) {
        match field {
            "name" => form.name = None,
            "type" => form.card_type = None,
            "power" => form.power = None,
            "toughness" => form.toughness = None,
            "rarity" => form.rarity = None,
            "set_name" => form.set_name = None,
            "image_url" => form.image_url = None,
            "edition" => form.edition = None,
            other => panic!("no such field: {other}"),
        }
    }

    #[test]
    fn test_each_missing_required_field_is_reported_alone() {
        let required = [
            "name",
            "type",
            "power",
            "toughness",
            "rarity",
            "set_name",
            "image_url",
            "edition",
        ];

        for field in required {
            let mut form = valid_form();
            clear_field(&mut form, field);

            let errors = ValidationService::validate_card_form(&form).unwrap_err().errors;
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field]);
            assert_eq!(errors.get(field).unwrap(), [REQUIRED.to_string()]);
        }
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut form = valid_form();
        form.name = Some("   ".to_string());

        let errors = ValidationService::validate_card_form(&form).unwrap_err().errors;
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let mut form = valid_form();
        form.mana_cost = None;
        form.text = Some(String::new());
        form.flavor = None;

        let card = ValidationService::validate_card_form(&form).unwrap();
        assert_eq!(card.mana_cost, None);
        assert_eq!(card.text, None);
    }

    #[test]
    fn test_malformed_url_rejected() {
        for bad in ["not-a-url", "http://", "mailto:someone@example.com", "/card.png"] {
            let mut form = valid_form();
            form.image_url = Some(bad.to_string());

            let errors = ValidationService::validate_card_form(&form).unwrap_err().errors;
            assert_eq!(
                errors.get("image_url").unwrap(),
                [INVALID_URL.to_string()],
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_well_formed_urls_accepted() {
        for good in [
            "http://example.com/card1.png",
            "https://cards.example.org/img?id=42",
            "ftp://files.example.com/scan.jpg",
        ] {
            assert!(ValidationService::validate_url(good).is_ok(), "{good}");
        }
    }

    #[test]
    fn test_length_limits() {
        let mut form = valid_form();
        form.power = Some("123456".to_string());

        let errors = ValidationService::validate_card_form(&form).unwrap_err().errors;
        assert_eq!(
            errors.get("power").unwrap(),
            ["Ensure this value has at most 5 characters (it has 6).".to_string()]
        );
    }

    #[test]
    fn test_duplicate_colors_collapse() {
        let mut form = valid_form();
        form.colors = vec![2.into(), 1.into(), 2.into()];

        let card = ValidationService::validate_card_form(&form).unwrap();
        assert_eq!(card.color_ids, vec![2, 1]);
    }

    #[test]
    fn test_form_uses_type_key() {
        let form: CardForm = serde_json::from_value(serde_json::json!({
            "name": "Grizzly Bears",
            "type": "Creature",
            "colors": [3]
        }))
        .unwrap();
        assert_eq!(form.card_type.as_deref(), Some("Creature"));
        assert_eq!(form.colors, vec![Choice::Id(3)]);
        assert_eq!(form.edition, None);
    }

    #[test]
    fn test_form_input_is_lenient() {
        let form: CardForm = serde_json::from_value(serde_json::json!({
            "name": "Serra Angel",
            "power": 4,
            "toughness": 4,
            "mana_cost": null,
            "edition": "7",
            "colors": 5
        }))
        .unwrap();
        assert_eq!(form.power.as_deref(), Some("4"));
        assert_eq!(form.mana_cost, None);
        assert_eq!(form.edition, Some(Choice::Id(7)));
        assert_eq!(form.colors, vec![Choice::Id(5)]);
    }

    #[test]
    fn test_malformed_choices_are_field_errors() {
        let form: CardForm = serde_json::from_value(serde_json::json!({
            "name": "Serra Angel",
            "type": "Creature",
            "power": "4",
            "toughness": "4",
            "rarity": "Uncommon",
            "set_name": "Alpha",
            "image_url": "http://example.com/serra.png",
            "edition": "abc",
            "colors": [2, "white", 2, true]
        }))
        .unwrap();

        let invalid = ValidationService::validate_card_form(&form).unwrap_err();
        assert_eq!(
            invalid.errors.fields().collect::<Vec<_>>(),
            vec!["colors", "edition"]
        );
        assert_eq!(invalid.errors.get("edition").unwrap(), [INVALID_CHOICE.to_string()]);
        assert_eq!(
            invalid.errors.get("colors").unwrap(),
            [unknown_choice("white"), unknown_choice("true")]
        );
        // Ids that did parse are kept for the reference checks
        assert_eq!(
            invalid.choices,
            CardChoices {
                edition_id: None,
                color_ids: vec![2],
            }
        );
    }

    #[test]
    fn test_new_color_rejects_unknown_code() {
        let input = NewColor {
            name: "Purple".to_string(),
            code: "P".to_string(),
        };
        let errors = ValidationService::validate_new_color(&input).unwrap_err();
        assert!(errors.contains("code"));
    }

    #[test]
    fn test_new_edition_code_length() {
        let input = NewEdition {
            name: "Alpha".to_string(),
            code: "ALPHA".to_string(),
        };
        let errors = ValidationService::validate_new_edition(&input).unwrap_err();
        assert!(errors.contains("code"));
        assert!(!errors.contains("name"));
    }
}
