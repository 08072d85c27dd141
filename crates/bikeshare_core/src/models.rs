use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{FieldError, InvalidFields};

/// A model which may carry only part of the information a complete record
/// needs.
///
/// Implementors provide the two primitive predicates; the rest are derived
/// from them.
pub trait PartialModel {
    /// The model has no key and does not refer to a stored record.
    fn is_new(&self) -> bool;

    /// The model has every field required for creation or replacement.
    fn is_valid(&self) -> bool;

    fn is_incomplete(&self) -> bool {
        !self.is_valid()
    }

    fn is_complete(&self) -> bool {
        self.is_valid()
    }

    /// The model has a key referring to an existing record.
    fn is_existing(&self) -> bool {
        !self.is_new()
    }
}

/// Fields of a station, as named in field errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationField {
    Identifier,
    Name,
    Language,
}

impl StationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationField::Identifier => "id",
            StationField::Name => "name",
            StationField::Language => "lang",
        }
    }
}

impl fmt::Display for StationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bike-sharing station.
///
/// Every field may be absent so the same type carries both complete records
/// and partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Language tag of `name`, e.g. `fi`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Station {
    pub fn new(id: Option<u32>, name: impl Into<String>, lang: impl Into<String>) -> Self {
        Station {
            id,
            name: Some(name.into()),
            lang: Some(lang.into()),
        }
    }

    /// Returns a copy of this station carrying `id`.
    pub fn with_id(&self, id: u32) -> Self {
        Station {
            id: Some(id),
            ..self.clone()
        }
    }

    /// Field errors for every required field that is absent or blank, or
    /// `None` when the station is complete.
    pub(crate) fn missing_fields(&self) -> Option<InvalidFields> {
        let missing = [
            (StationField::Name, &self.name, "name is required"),
            (StationField::Language, &self.lang, "language is required"),
        ];
        missing
            .into_iter()
            .filter(|(_, value, _)| present(value).is_none())
            .map(|(field, _, description)| FieldError::station(field, description))
            .fold(None, |invalid: Option<InvalidFields>, error| match invalid {
                None => Some(InvalidFields::new(error)),
                Some(mut invalid) => {
                    invalid.push(error);
                    Some(invalid)
                }
            })
    }

    /// Copies the non-blank fields of `partial` over this station's name and
    /// language. The identifier is left untouched.
    pub(crate) fn merge(&mut self, partial: &Station) {
        if let Some(name) = present(&partial.name) {
            self.name = Some(name.to_owned());
        }
        if let Some(lang) = present(&partial.lang) {
            self.lang = Some(lang.to_owned());
        }
    }
}

impl PartialModel for Station {
    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn is_valid(&self) -> bool {
        present(&self.name).is_some() && present(&self.lang).is_some()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_ignores_identifier() {
        assert!(Station::new(None, "Kamppi", "fi").is_valid());
        assert!(Station::new(Some(7), "Kamppi", "fi").is_valid());
    }

    #[test]
    fn test_blank_fields_are_incomplete() {
        let blank_name = Station::new(Some(1), "  ", "fi");
        assert!(blank_name.is_incomplete());
        assert!(!blank_name.is_complete());

        let no_lang = Station {
            id: Some(1),
            name: Some("Kamppi".into()),
            lang: None,
        };
        assert!(no_lang.is_incomplete());
        assert!(Station::default().is_incomplete());
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(Station::new(None, "Kamppi", "fi").missing_fields(), None);

        let nameless = Station {
            id: Some(7),
            name: Some(" ".into()),
            lang: Some("fi".into()),
        };
        let invalid = nameless.missing_fields().unwrap();
        assert_eq!(invalid.invalid_fields(), vec!["name"]);

        let invalid = Station::default().missing_fields().unwrap();
        assert_eq!(invalid.invalid_fields(), vec!["name", "lang"]);
        assert_eq!(invalid.errors_for("lang"), vec!["language is required"]);
    }

    #[test]
    fn test_new_and_existing() {
        let fresh = Station::new(None, "Töölöntori", "fi");
        assert!(fresh.is_new());
        assert!(!fresh.is_existing());

        let stored = fresh.with_id(3);
        assert!(!stored.is_new());
        assert!(stored.is_existing());
        assert_eq!(stored.name, fresh.name);
    }

    #[test]
    fn test_merge_keeps_unsupplied_fields() {
        let mut stored = Station::new(Some(3), "Kamppi", "sv");
        stored.merge(&Station {
            id: Some(99),
            name: Some("NewName".into()),
            lang: None,
        });
        assert_eq!(stored, Station::new(Some(3), "NewName", "sv"));

        stored.merge(&Station {
            id: None,
            name: Some(" ".into()),
            lang: Some("fi".into()),
        });
        assert_eq!(stored, Station::new(Some(3), "NewName", "fi"));
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let json = serde_json::to_string(&Station::new(None, "Kamppi", "fi")).unwrap();
        assert_eq!(json, r#"{"name":"Kamppi","lang":"fi"}"#);

        let partial: Station = serde_json::from_str(r#"{"id": 5, "name": "Uusi"}"#).unwrap();
        assert_eq!(partial.id, Some(5));
        assert_eq!(partial.lang, None);
    }
}
