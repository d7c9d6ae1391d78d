use serde::{Deserialize, Serialize};
use std::fmt;

pub const POSTER_SENTINEL: &str = "NA";
pub const DEFAULT_NOTE: &str = "No Notes";

/// Release date as encoded by the backend. Older JSON files carry the year
/// as a string, so both shapes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseDate {
    Year(i32),
    Text(String),
}

impl ReleaseDate {
    pub fn year(&self) -> Option<i32> {
        match self {
            ReleaseDate::Year(year) => Some(*year),
            ReleaseDate::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDate::Year(year) => write!(f, "{}", year),
            ReleaseDate::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<i32> for ReleaseDate {
    fn from(year: i32) -> Self {
        ReleaseDate::Year(year)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub date: ReleaseDate,
    pub rating: f64,
    pub poster_url: String,
    pub note: String,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, date: impl Into<ReleaseDate>, rating: f64) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            rating,
            poster_url: POSTER_SENTINEL.to_string(),
            note: DEFAULT_NOTE.to_string(),
        }
    }

    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = poster_url.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn year(&self) -> Option<i32> {
        self.date.year()
    }
}

/// Title-keyed mapping that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.title == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut CatalogEntry> {
        self.entries.iter_mut().find(|entry| entry.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Replaces an existing entry in place, otherwise appends.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        match self.entries.iter().position(|e| e.title == entry.title) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx], entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn remove(&mut self, title: &str) -> Option<CatalogEntry> {
        let idx = self.entries.iter().position(|e| e.title == title)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resolves a user-supplied title to the stored one: an exact match
    /// wins, then the first case-insensitive match.
    pub fn find_title(&self, query: &str) -> Option<&str> {
        if let Some(entry) = self.get(query) {
            return Some(&entry.title);
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.title.to_lowercase() == needle)
            .map(|entry| entry.title.as_str())
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Record returned by the metadata lookup service.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: Option<String>,
    pub note: Option<String>,
}

impl NewEntry {
    pub fn new(title: impl Into<String>, year: i32, rating: f64) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster_url: None,
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryUpdate {
    Rating(f64),
    Note(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterCriteria {
    pub min_rating: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats<'a> {
    pub best: Vec<&'a CatalogEntry>,
    pub worst: Vec<&'a CatalogEntry>,
    pub median: f64,
    pub mean: f64,
}
