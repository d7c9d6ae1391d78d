use super::StorageFormat;
use crate::domain::model::{Catalog, CatalogEntry, ReleaseDate};
use crate::domain::ports::CatalogCodec;
use crate::utils::error::Result;
use crate::utils::validation::validate_rating;
use ::csv::{ReaderBuilder, StringRecord, WriterBuilder};

/// Headerless rows of `title,date,rating,poster_url,note`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

pub const CSV_COLUMNS: usize = 5;

/// Outcome of decoding CSV rows: the usable entries plus how many rows were
/// dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowsDecoded {
    pub catalog: Catalog,
    pub skipped: usize,
}

fn row_to_entry(record: &StringRecord) -> std::result::Result<CatalogEntry, String> {
    if record.len() != CSV_COLUMNS {
        return Err(format!("expected {} fields, found {}", CSV_COLUMNS, record.len()));
    }

    let title = record[0].trim();
    if title.is_empty() {
        return Err("empty title".to_string());
    }

    let year: i32 = record[1]
        .trim()
        .parse()
        .map_err(|_| format!("non-numeric date '{}'", &record[1]))?;

    let rating: f64 = record[2]
        .trim()
        .parse()
        .map_err(|_| format!("non-numeric rating '{}'", &record[2]))?;
    validate_rating(rating).map_err(|_| format!("rating out of range '{}'", &record[2]))?;

    Ok(CatalogEntry {
        title: title.to_string(),
        date: ReleaseDate::Year(year),
        rating,
        poster_url: record[3].to_string(),
        note: record[4].to_string(),
    })
}

/// Decodes rows one by one; malformed rows are logged and skipped instead
/// of failing the whole load.
pub fn rows_to_catalog(data: &[u8]) -> RowsDecoded {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut decoded = RowsDecoded::default();
    for (idx, row) in reader.records().enumerate() {
        let line = idx + 1;
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable CSV row {}: {}", line, e);
                decoded.skipped += 1;
                continue;
            }
        };

        match row_to_entry(&record) {
            Ok(entry) => {
                decoded.catalog.insert(entry);
            }
            Err(reason) => {
                tracing::warn!("Skipping CSV row {}: {}", line, reason);
                decoded.skipped += 1;
            }
        }
    }
    decoded
}

impl CatalogCodec for CsvCodec {
    fn format(&self) -> StorageFormat {
        StorageFormat::Csv
    }

    fn encode(&self, catalog: &Catalog) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        for entry in catalog {
            writer.write_record([
                entry.title.as_str(),
                entry.date.to_string().as_str(),
                entry.rating.to_string().as_str(),
                entry.poster_url.as_str(),
                entry.note.as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }

    fn decode(&self, data: &[u8]) -> Result<Catalog> {
        let decoded = rows_to_catalog(data);
        if decoded.skipped > 0 {
            tracing::warn!(
                "CSV load kept {} rows, skipped {} malformed rows",
                decoded.catalog.len(),
                decoded.skipped
            );
        }
        Ok(decoded.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_malformed_rows() {
        let data = b"Alien,1979,8.5,NA,No Notes\n\
Heat,1995,8.3\n\
,2001,7.0,NA,No Notes\n\
Zodiac,soon,7.7,NA,No Notes\n\
Ronin,1998,high,NA,No Notes\n\
Brazil,1985,NaN,NA,No Notes\n\
Tron,1982,inf,NA,No Notes\n\
Dune,1984,55,NA,No Notes\n\
Se7en,1995,8.6,http://img/se7en.jpg,dark\n";

        let decoded = rows_to_catalog(data);

        assert_eq!(decoded.skipped, 7);
        let titles: Vec<_> = decoded.catalog.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Se7en"]);
        let se7en = decoded.catalog.get("Se7en").unwrap();
        assert_eq!(se7en.poster_url, "http://img/se7en.jpg");
        assert_eq!(se7en.note, "dark");
    }

    #[test]
    fn test_encode_quotes_commas_and_keeps_order() {
        let catalog: Catalog = vec![
            CatalogEntry::new("Crouching Tiger, Hidden Dragon", 2000, 7.9),
            CatalogEntry::new("Alien", 1979, 8.0),
        ]
        .into_iter()
        .collect();

        let text = String::from_utf8(CsvCodec.encode(&catalog).unwrap()).unwrap();

        assert_eq!(
            text,
            "\"Crouching Tiger, Hidden Dragon\",2000,7.9,NA,No Notes\nAlien,1979,8,NA,No Notes\n"
        );
        assert_eq!(CsvCodec.decode(text.as_bytes()).unwrap(), catalog);
    }

    #[test]
    fn test_legacy_text_date_is_coerced_to_year() {
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(
            "Inception",
            ReleaseDate::Text("2010".to_string()),
            8.8,
        ));

        let encoded = CsvCodec.encode(&catalog).unwrap();
        let reloaded = CsvCodec.decode(&encoded).unwrap();

        assert_eq!(reloaded.get("Inception").unwrap().date, ReleaseDate::Year(2010));
    }
}
