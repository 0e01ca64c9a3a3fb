//! Fixture Data Module
//!
//! Static records served by the API. Nothing here is stored or mutated; every
//! request gets fresh copies built from the constant tables below.

use serde::{Deserialize, Serialize, Serializer};

/// Path parameter value that forces a not-found response.
pub const NOT_FOUND_SENTINEL: &str = "404";

/// Masked e-mail returned by the login stub and the guardian record.
pub const MASKED_EMAIL: &str = "jo****e@hotmail.com";

// ============================================================================
// RECORD STRUCTURES
// ============================================================================

/// Name fields shared by guardians and students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// First name (serialized as `name`)
    #[serde(rename = "name")]
    pub first_name: String,
    pub last_name: String,
}

/// Legal guardian of a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    #[serde(flatten)]
    pub person: Person,
    /// Tax document number (serialized as `document`)
    #[serde(rename = "document")]
    pub document_id: String,
    pub email: String,
}

/// Student enrolled under a guardian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(flatten)]
    pub person: Person,
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    /// Registration number (serialized as `ra`)
    #[serde(rename = "ra")]
    pub registration_id: String,
}

/// Enrollment offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: u32,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Whole amounts are written without a fractional part (`32000`, not `32000.0`)
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
}

fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if price.fract() == 0.0 && price.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

// ============================================================================
// FIXTURE TABLES
// ============================================================================

// (id, name, class, price)
const OFFER_TABLE: [(u32, &str, &str, f64); 4] = [
    (1, "Oferta 1", "6o ano Manhã", 32000.00),
    (2, "Oferta 2", "6o ano Tarde", 36000.00),
    (3, "Oferta 2 10% Desc", "6o ano Tarde", 29000.00),
    (4, "Oferta 3", "6o ano Noite", 25000.00),
];

/// Returns the fixed offer list.
pub fn offers() -> Vec<Offer> {
    OFFER_TABLE
        .iter()
        .map(|&(id, name, class_name, price)| Offer {
            id,
            name: name.to_string(),
            class_name: class_name.to_string(),
            price,
        })
        .collect()
}

/// Returns the fixed guardian record.
pub fn guardian() -> Guardian {
    Guardian {
        person: Person {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
        },
        document_id: "123.456.789-12".to_string(),
        email: MASKED_EMAIL.to_string(),
    }
}

/// Returns the fixed student record with its registration number set to `registration_id`.
pub fn student(registration_id: &str) -> Student {
    Student {
        person: Person {
            first_name: "James".to_string(),
            last_name: "Smith".to_string(),
        },
        birth_date: "20/01/2015".to_string(),
        registration_id: registration_id.to_string(),
    }
}

/// Whether a path parameter is the not-found sentinel.
pub fn is_not_found_sentinel(value: &str) -> bool {
    value == NOT_FOUND_SENTINEL
}
