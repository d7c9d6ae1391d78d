use crate::core::store::{CatalogStore, LoadStatus, SyncStatus};
use crate::domain::model::{
    CatalogEntry, CatalogStats, EntryUpdate, FilterCriteria, NewEntry, DEFAULT_NOTE, POSTER_SENTINEL,
};
use crate::domain::ports::{MetadataLookup, Storage};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{
    current_year, validate_rating, validate_title, validate_year, FILM_START,
};
use regex::RegexBuilder;

/// Mutation, query and validation logic over the store's catalog.
///
/// Titles supplied by the caller are resolved with [`Catalog::find_title`]:
/// exact match first, then case-insensitive. Every successful mutation is
/// saved immediately.
///
/// [`Catalog::find_title`]: crate::domain::model::Catalog::find_title
pub struct CatalogService<S: Storage> {
    store: CatalogStore<S>,
}

impl<S: Storage> CatalogService<S> {
    pub fn new(store: CatalogStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore<S> {
        &self.store
    }

    pub fn load(&mut self) -> LoadStatus {
        self.store.load()
    }

    pub fn save(&self) -> Result<SyncStatus> {
        self.store.save()
    }

    fn persist(&self, action: &str, title: &str) -> Result<SyncStatus> {
        self.store.save().inspect_err(|e| {
            tracing::error!("An error occurred while saving after {} '{}': {}", action, title, e);
        })
    }

    fn resolve(&self, title: &str) -> Option<String> {
        self.store.catalog().find_title(title.trim()).map(str::to_string)
    }

    pub fn list(&self) -> Vec<&CatalogEntry> {
        self.store.catalog().iter().collect()
    }

    pub fn add_entry(&mut self, new_entry: NewEntry) -> Result<SyncStatus> {
        let title = validate_title(&new_entry.title)?;
        let year = validate_year(new_entry.year)?;
        let rating = validate_rating(new_entry.rating)?;

        if let Some(existing) = self.resolve(&title) {
            tracing::info!("Add rejected, movie exists in db: {}", existing);
            return Err(CatalogError::Duplicate { title: existing });
        }

        let entry = CatalogEntry::new(title.clone(), year, rating)
            .with_poster(new_entry.poster_url.unwrap_or_else(|| POSTER_SENTINEL.to_string()))
            .with_note(new_entry.note.unwrap_or_else(|| DEFAULT_NOTE.to_string()));
        self.store.insert(entry);
        tracing::info!("New movie added: Title: {}, Date: {}, Rating: {}", title, year, rating);

        self.persist("adding", &title)
    }

    /// Resolves the title through the lookup service first, so the
    /// duplicate check runs against the canonical title it returns.
    pub async fn add_from_lookup(
        &mut self,
        lookup: &dyn MetadataLookup,
        title: &str,
        note: Option<String>,
    ) -> Result<SyncStatus> {
        let query = validate_title(title)?;
        let metadata = lookup
            .lookup(&query)
            .await?
            .ok_or_else(|| CatalogError::LookupNotFound { title: query.clone() })?;
        let rating = validate_rating(metadata.rating).inspect_err(|_| {
            tracing::warn!(
                "Lookup returned an unusable rating for {}: {}",
                metadata.title,
                metadata.rating
            );
        })?;

        if let Some(existing) = self.resolve(&metadata.title) {
            tracing::info!("Add rejected, movie exists in db: {}", existing);
            return Err(CatalogError::Duplicate { title: existing });
        }

        let entry = CatalogEntry::new(metadata.title.clone(), metadata.year, rating)
            .with_poster(metadata.poster_url)
            .with_note(note.unwrap_or_else(|| DEFAULT_NOTE.to_string()));
        self.store.insert(entry);
        tracing::info!(
            "New movie added from lookup: Title: {}, Date: {}, Rating: {}",
            metadata.title,
            metadata.year,
            rating
        );

        self.persist("adding", &metadata.title)
    }

    pub fn delete_entry(&mut self, title: &str) -> Result<SyncStatus> {
        let Some(canonical) = self.resolve(title) else {
            return Err(CatalogError::NotFound {
                title: title.trim().to_string(),
            });
        };

        tracing::info!("Attempting to remove film from memory: {}", canonical);
        if self.store.remove(&canonical).is_none() {
            tracing::error!("Failed to remove film '{}': vanished after lookup", canonical);
            return Err(CatalogError::unexpected(format!(
                "'{}' disappeared before it could be removed",
                canonical
            )));
        }
        tracing::info!("Film removed successfully: {}", canonical);

        self.persist("deleting", &canonical)
    }

    pub fn update_entry(&mut self, title: &str, update: EntryUpdate) -> Result<SyncStatus> {
        let Some(canonical) = self.resolve(title) else {
            return Err(CatalogError::NotFound {
                title: title.trim().to_string(),
            });
        };
        if let EntryUpdate::Rating(rating) = &update {
            validate_rating(*rating)?;
        }

        let entry = self.store.get_mut(&canonical).ok_or_else(|| {
            CatalogError::unexpected(format!("'{}' disappeared before it could be updated", canonical))
        })?;
        match update {
            EntryUpdate::Rating(rating) => {
                tracing::info!(
                    "Film {} : rating updated from {} to {}",
                    canonical,
                    entry.rating,
                    rating
                );
                entry.rating = rating;
            }
            EntryUpdate::Note(note) => {
                tracing::info!("Film {} : note updated", canonical);
                entry.note = note;
            }
        }

        self.persist("updating", &canonical)
    }

    /// Case-insensitive regular expression matched anywhere in the title.
    pub fn search(&self, pattern: &str) -> Result<Vec<&CatalogEntry>> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .inspect_err(|e| tracing::error!("Invalid regex search term: {} - Error: {}", pattern, e))?;

        Ok(self
            .store
            .catalog()
            .iter()
            .filter(|entry| regex.is_match(&entry.title))
            .collect())
    }

    /// Highest rating first; ties keep catalog order.
    pub fn sort_by_rating(&self) -> Vec<&CatalogEntry> {
        let mut entries = self.list();
        entries.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        entries
    }

    pub fn filter(&self, criteria: FilterCriteria) -> Vec<&CatalogEntry> {
        let min_rating = criteria.min_rating.unwrap_or(0.0);
        let min_year = criteria.min_year.unwrap_or(FILM_START);
        let max_year = criteria.max_year.unwrap_or_else(current_year);

        let mut entries: Vec<(i32, &CatalogEntry)> = self
            .store
            .catalog()
            .iter()
            .filter_map(|entry| entry.year().map(|year| (year, entry)))
            .filter(|(year, entry)| {
                entry.rating >= min_rating && min_year <= *year && *year <= max_year
            })
            .collect();
        entries.sort_by_key(|(year, _)| *year);

        if entries.is_empty() {
            tracing::warn!(
                "No filtered movies for rating >= {}, years {}..={}",
                min_rating,
                min_year,
                max_year
            );
        }
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// `None` for an empty catalog.
    pub fn stats(&self) -> Option<CatalogStats<'_>> {
        let catalog = self.store.catalog();
        let first = catalog.iter().next()?;

        let (mut min, mut max, mut sum) = (first.rating, first.rating, 0.0);
        for entry in catalog {
            min = min.min(entry.rating);
            max = max.max(entry.rating);
            sum += entry.rating;
        }

        let mut ratings: Vec<f64> = catalog.iter().map(|entry| entry.rating).collect();
        ratings.sort_by(f64::total_cmp);
        let mid = ratings.len() / 2;
        let median = if ratings.len() % 2 == 0 {
            (ratings[mid - 1] + ratings[mid]) / 2.0
        } else {
            ratings[mid]
        };

        Some(CatalogStats {
            best: catalog.iter().filter(|entry| entry.rating == max).collect(),
            worst: catalog.iter().filter(|entry| entry.rating == min).collect(),
            median,
            mean: sum / ratings.len() as f64,
        })
    }
}
