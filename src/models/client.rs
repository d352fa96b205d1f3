use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ClientId;

/// A customer as returned by `GET /Consulta`.
///
/// Only the number and name are read; contact and metadata fields are kept
/// untouched in `extra` so cached copies stay faithful to the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "Número")]
    pub number: Option<ClientId>,
    #[serde(rename = "Nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "Apellido")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A customer ready to be listed and searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub id: ClientId,
    /// Number padded to three digits, e.g. `007`.
    pub padded_number: String,
    /// `Apellido, Nombre`, skipping blank parts.
    pub full_name: String,
    /// `007 - Apellido, Nombre`.
    pub label: String,
}

impl ClientEntry {
    /// Returns `None` for records without a number or without any name.
    pub fn from_record(record: &ClientRecord) -> Option<Self> {
        let id = record.number?;
        let first_name = record.first_name.as_deref().map(str::trim).unwrap_or_default();
        let last_name = record.last_name.as_deref().map(str::trim).unwrap_or_default();

        if first_name.is_empty() && last_name.is_empty() {
            return None;
        }

        let full_name = [last_name, first_name]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let padded_number = format!("{id:03}");
        let label = format!("{padded_number} - {full_name}");

        Some(Self {
            id,
            padded_number,
            full_name,
            label,
        })
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        let lowered = query.to_lowercase();

        self.label.to_lowercase().contains(&lowered)
            || self.padded_number.contains(query)
            || self.full_name.to_lowercase().contains(&lowered)
    }
}
