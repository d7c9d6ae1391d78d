use super::StorageFormat;
use crate::domain::model::{Catalog, CatalogEntry, ReleaseDate, DEFAULT_NOTE, POSTER_SENTINEL};
use crate::domain::ports::CatalogCodec;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Object-of-objects keyed by title.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    date: ReleaseDate,
    rating: f64,
    #[serde(default = "default_poster")]
    poster_url: String,
    #[serde(default = "default_note")]
    note: String,
}

fn default_poster() -> String {
    POSTER_SENTINEL.to_string()
}

fn default_note() -> String {
    DEFAULT_NOTE.to_string()
}

impl CatalogCodec for JsonCodec {
    fn format(&self) -> StorageFormat {
        StorageFormat::Json
    }

    fn encode(&self, catalog: &Catalog) -> Result<Vec<u8>> {
        let mut object = Map::new();
        for entry in catalog {
            let record = EntryRecord {
                date: entry.date.clone(),
                rating: entry.rating,
                poster_url: entry.poster_url.clone(),
                note: entry.note.clone(),
            };
            object.insert(entry.title.clone(), serde_json::to_value(record)?);
        }

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        Value::Object(object).serialize(&mut serializer)?;
        Ok(buffer)
    }

    fn decode(&self, data: &[u8]) -> Result<Catalog> {
        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Catalog::new());
        }

        let object: Map<String, Value> = serde_json::from_slice(data)?;
        let mut catalog = Catalog::new();
        for (title, value) in object {
            let record: EntryRecord = serde_json::from_value(value)?;
            catalog.insert(CatalogEntry {
                title,
                date: record.date,
                rating: record.rating,
                poster_url: record.poster_url,
                note: record.note,
            });
        }
        Ok(catalog)
    }
}
