//! Domain DTOs for the contacts API.
//!
//! # Design
//! Wire names follow the backing API (`nom`, `numero`), while the form-side
//! type (`ContactFormData`) keeps the names the input layer uses (`name`,
//! `phoneNumber`). The mock-server crate defines its own copies of the wire
//! types; integration tests catch any schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::strip_whitespace;

/// Identifier of a stored contact.
///
/// The API assigns integers, but string tokens are accepted as well so a
/// backend with opaque ids still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Int(i64),
    Text(String),
}

impl ContactId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ContactId::Int(n) => Some(*n),
            ContactId::Text(_) => None,
        }
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactId::Int(n) => write!(f, "{n}"),
            ContactId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ContactId {
    fn from(n: i64) -> Self {
        ContactId::Int(n)
    }
}

impl From<&str> for ContactId {
    /// Numeric strings become `Int` so ids typed on a command line match
    /// ids returned by the API.
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map(ContactId::Int)
            .unwrap_or_else(|_| ContactId::Text(s.to_string()))
    }
}

/// A single contact as stored in the list and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub nom: String,
    pub numero: u32,
}

impl Contact {
    /// Re-expresses the stored record as form input, e.g. to pre-fill an
    /// edit form or to re-validate after a merge.
    pub fn to_form_data(&self) -> ContactFormData {
        ContactFormData {
            name: self.nom.clone(),
            phone_number: self.numero.to_string(),
        }
    }
}

/// Request payload for creating a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContact {
    pub nom: String,
    pub numero: u32,
}

impl NewContact {
    pub fn with_id(self, id: ContactId) -> Contact {
        Contact {
            id,
            nom: self.nom,
            numero: self.numero,
        }
    }
}

/// Request payload for updating an existing contact. Only the fields present
/// in the JSON are applied; omitted fields remain unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<u32>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.nom.is_none() && self.numero.is_none()
    }

    /// Shallow merge: every present field overwrites the contact's value.
    pub fn apply_to(&self, contact: &Contact) -> Contact {
        Contact {
            id: contact.id.clone(),
            nom: self.nom.clone().unwrap_or_else(|| contact.nom.clone()),
            numero: self.numero.unwrap_or(contact.numero),
        }
    }
}

/// Raw form input. `phone_number` may still carry display grouping spaces;
/// they are stripped before validation and storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
    pub name: String,
    pub phone_number: String,
}

impl ContactFormData {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Copy with display formatting removed from the phone number.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.clone(),
            phone_number: strip_whitespace(&self.phone_number),
        }
    }

    /// Converts validated input into the create payload.
    ///
    /// Returns `None` if the phone number is not numeric; callers are
    /// expected to have run the schema first.
    pub fn to_new_contact(&self) -> Option<NewContact> {
        let numero = strip_whitespace(&self.phone_number).parse::<u32>().ok()?;
        Some(NewContact {
            nom: self.name.clone(),
            numero,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_id_deserializes_numbers_and_strings() {
        let n: ContactId = serde_json::from_str("42").unwrap();
        assert_eq!(n, ContactId::Int(42));
        let s: ContactId = serde_json::from_str(r#""abc-1""#).unwrap();
        assert_eq!(s, ContactId::Text("abc-1".to_string()));
    }

    #[test]
    fn contact_id_from_str_prefers_integers() {
        assert_eq!(ContactId::from("17"), ContactId::Int(17));
        assert_eq!(ContactId::from("x17"), ContactId::Text("x17".to_string()));
    }

    #[test]
    fn contact_uses_wire_field_names() {
        let contact = Contact {
            id: ContactId::Int(1),
            nom: "Mamadou Diallo".to_string(),
            numero: 624123456,
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["nom"], "Mamadou Diallo");
        assert_eq!(json["numero"], 624123456);
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = ContactPatch {
            nom: Some("Ada".to_string()),
            numero: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["nom"], "Ada");
        assert!(json.get("numero").is_none());
    }

    #[test]
    fn patch_apply_is_shallow_overwrite() {
        let contact = Contact {
            id: ContactId::Int(3),
            nom: "Ibrahima Sow".to_string(),
            numero: 622345678,
        };
        let patch = ContactPatch {
            nom: None,
            numero: Some(699999999),
        };
        let merged = patch.apply_to(&contact);
        assert_eq!(merged.id, ContactId::Int(3));
        assert_eq!(merged.nom, "Ibrahima Sow");
        assert_eq!(merged.numero, 699999999);
        assert!(ContactPatch::default().is_empty());
    }

    #[test]
    fn form_data_uses_camel_case() {
        let form: ContactFormData =
            serde_json::from_str(r#"{"name":"Jean","phoneNumber":"612345678"}"#).unwrap();
        assert_eq!(form.phone_number, "612345678");
    }

    #[test]
    fn form_data_strips_grouping_before_conversion() {
        let form = ContactFormData::new("Jean Dupont", "612 34 56 78");
        assert_eq!(form.normalized().phone_number, "612345678");
        let new = form.to_new_contact().unwrap();
        assert_eq!(new.numero, 612345678);
        assert_eq!(new.nom, "Jean Dupont");
    }

    #[test]
    fn form_data_rejects_non_numeric_phone() {
        assert!(ContactFormData::new("Jean", "6x2").to_new_contact().is_none());
    }
}
