use crate::app::web_page;
use crate::core::service::CatalogService;
use crate::domain::model::{CatalogEntry, EntryUpdate, FilterCriteria, NewEntry};
use crate::domain::ports::{MetadataLookup, Storage};
use crate::utils::error::{CatalogError, ErrorSeverity, Result};
use crate::utils::validation::{parse_rating, parse_year};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const RULE: &str = "----------------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Quit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Search,
    SortByRating,
    Filter,
    WebPage,
}

impl MenuAction {
    pub const ALL: [MenuAction; 10] = [
        MenuAction::Quit,
        MenuAction::List,
        MenuAction::Add,
        MenuAction::Delete,
        MenuAction::Update,
        MenuAction::Stats,
        MenuAction::Search,
        MenuAction::SortByRating,
        MenuAction::Filter,
        MenuAction::WebPage,
    ];

    pub fn from_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        Self::ALL.get(index).copied()
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuAction::Quit => "Exit MovieMadness",
            MenuAction::List => "List movies",
            MenuAction::Add => "Add new movie",
            MenuAction::Delete => "Delete movie from database",
            MenuAction::Update => "Update movie rating or note",
            MenuAction::Stats => "Print statistics",
            MenuAction::Search => "Search for movie",
            MenuAction::SortByRating => "List movies by rating",
            MenuAction::Filter => "Filter movies by rating and date",
            MenuAction::WebPage => "Generate web page",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebPageSettings {
    pub template: PathBuf,
    pub output: Option<PathBuf>,
    pub title: String,
}

/// Interactive front end over any line reader and writer.
pub struct Menu<'a, S: Storage, R: BufRead, W: Write> {
    service: &'a mut CatalogService<S>,
    lookup: Option<&'a dyn MetadataLookup>,
    web: WebPageSettings,
    input: R,
    output: W,
}

impl<'a, S: Storage, R: BufRead, W: Write> Menu<'a, S, R, W> {
    pub fn new(
        service: &'a mut CatalogService<S>,
        lookup: Option<&'a dyn MetadataLookup>,
        web: WebPageSettings,
        input: R,
        output: W,
    ) -> Self {
        Self {
            service,
            lookup,
            web,
            input,
            output,
        }
    }

    /// Runs until Quit or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.display_menu()?;
            let Some(choice) = self.read_line("\n\nWhat do you want to do ?   ")? else {
                tracing::info!("Input closed, leaving menu");
                return Ok(());
            };

            let Some(action) = MenuAction::from_choice(&choice) else {
                writeln!(
                    self.output,
                    "invalid option, choose an option between 0 and {}",
                    MenuAction::ALL.len() - 1
                )?;
                tracing::warn!("Invalid menu option chosen: {:?}", choice);
                continue;
            };

            tracing::info!("Option executed: {}", action.description());
            if action == MenuAction::Quit {
                writeln!(self.output, "Exiting MovieMadness...\nBye!!")?;
                return Ok(());
            }
            self.dispatch(action).await?;
        }
    }

    async fn dispatch(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::Quit => Ok(()),
            MenuAction::List => self.list_movies(),
            MenuAction::Add => self.add_movie().await,
            MenuAction::Delete => self.delete_movie(),
            MenuAction::Update => self.update_movie(),
            MenuAction::Stats => self.display_stats(),
            MenuAction::Search => self.search_movie(),
            MenuAction::SortByRating => self.sort_movies(),
            MenuAction::Filter => self.filter_movies(),
            MenuAction::WebPage => self.generate_web_page(),
        }
    }

    fn display_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n\nWelcome to MovieMadness ! - the movie app with meaning!")?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "{:<8} {:<30}", "OPTION", "DESCRIPTION")?;
        writeln!(self.output, "{}", RULE)?;
        for (idx, action) in MenuAction::ALL.iter().enumerate() {
            writeln!(self.output, "{:<8} {:<30}", idx, action.description())?;
        }
        Ok(())
    }

    /// `None` once the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_title(&mut self) -> Result<Option<String>> {
        loop {
            let Some(title) = self.read_line("Enter movie TITLE (\"exit\" to cancel): ")? else {
                return Ok(None);
            };
            if title.eq_ignore_ascii_case("exit") {
                writeln!(self.output, "Movie operation canceled.")?;
                return Ok(None);
            }
            if title.is_empty() {
                writeln!(self.output, "Title cannot be empty. Please try again.")?;
                continue;
            }
            return Ok(Some(title));
        }
    }

    /// Re-asks until `parse` accepts the input. Blank input yields
    /// `Some(None)` when `optional`, `None` means the input ended.
    fn prompt_value<T>(
        &mut self,
        prompt: &str,
        optional: bool,
        parse: fn(&str) -> Result<T>,
    ) -> Result<Option<Option<T>>> {
        loop {
            let Some(raw) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if raw.is_empty() {
                if optional {
                    return Ok(Some(None));
                }
                writeln!(self.output, "Value cannot be empty. Please try again.")?;
                continue;
            }
            match parse(&raw) {
                Ok(value) => return Ok(Some(Some(value))),
                Err(e) => writeln!(self.output, "{}", e.user_friendly_message())?,
            }
        }
    }

    fn report_error(&mut self, error: &CatalogError) -> Result<()> {
        match error.severity() {
            ErrorSeverity::Low => tracing::info!("{} ({:?})", error, error.category()),
            ErrorSeverity::Medium => tracing::warn!("{} ({:?})", error, error.category()),
            ErrorSeverity::High | ErrorSeverity::Critical => tracing::error!(
                "{} (Category: {:?}, Severity: {:?})",
                error,
                error.category(),
                error.severity()
            ),
        }
        writeln!(self.output, "{}", error.user_friendly_message())?;
        Ok(())
    }

    fn print_movies(&mut self, heading: &str, movies: &[&CatalogEntry]) -> Result<()> {
        writeln!(self.output, "{}", heading)?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(
            self.output,
            "{:<5} {:<50} {:<5} {:<6} {:<30} {}",
            "NR.", "MOVIE", "YEAR", "RATING", "POSTER URL", "NOTE"
        )?;
        for (idx, movie) in movies.iter().enumerate() {
            writeln!(
                self.output,
                "{:<5} {:<50} {:<5} {:<6} {:<30} {}",
                idx + 1,
                movie.title,
                movie.date.to_string(),
                movie.rating,
                movie.poster_url,
                movie.note
            )?;
        }
        Ok(())
    }

    fn list_movies(&mut self) -> Result<()> {
        let movies = self.service.list();
        if movies.is_empty() {
            tracing::warn!("Listing requested but the catalog is empty");
            writeln!(self.output, "No movies in DB")?;
            return Ok(());
        }
        let heading = format!("{} movies in total", movies.len());
        let movies: Vec<CatalogEntry> = movies.into_iter().cloned().collect();
        self.print_movies(&heading, &movies.iter().collect::<Vec<_>>())
    }

    async fn add_movie(&mut self) -> Result<()> {
        writeln!(self.output, "Adding Movie ...")?;
        let Some(title) = self.prompt_title()? else {
            return Ok(());
        };

        let outcome = match self.lookup {
            Some(lookup) => {
                let Some(note) = self.read_line("Enter a NOTE (leave blank for none): ")? else {
                    return Ok(());
                };
                let note = (!note.is_empty()).then_some(note);
                self.service.add_from_lookup(lookup, &title, note).await
            }
            None => {
                if self.service.store().catalog().find_title(&title).is_some() {
                    writeln!(self.output, "Movie exists in db")?;
                    return Ok(());
                }
                let Some(Some(year)) =
                    self.prompt_value("Enter movie DATE (e.g. 1990): ", false, parse_year)?
                else {
                    return Ok(());
                };
                let Some(Some(rating)) =
                    self.prompt_value("Enter movie RATING: ", false, parse_rating)?
                else {
                    return Ok(());
                };
                self.service.add_entry(NewEntry::new(title.clone(), year, rating))
            }
        };

        match outcome {
            Ok(_) => writeln!(self.output, "Movie has been successfully added.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn delete_movie(&mut self) -> Result<()> {
        writeln!(self.output, "Deleting Movie... ")?;
        let Some(title) = self.prompt_title()? else {
            return Ok(());
        };
        match self.service.delete_entry(&title) {
            Ok(_) => writeln!(self.output, "Movie deleted. '{}'", title)?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn update_movie(&mut self) -> Result<()> {
        writeln!(self.output, "Updating Movie ...")?;
        let Some(title) = self.prompt_title()? else {
            return Ok(());
        };
        if self.service.store().catalog().find_title(&title).is_none() {
            let error = CatalogError::NotFound { title };
            return self.report_error(&error);
        }

        let Some(rating) = self.prompt_value(
            "Enter new RATING (leave blank to keep): ",
            true,
            parse_rating,
        )?
        else {
            return Ok(());
        };
        let Some(note) = self.read_line("Enter new NOTE (leave blank to keep): ")? else {
            return Ok(());
        };

        let mut updates = Vec::new();
        if let Some(rating) = rating {
            updates.push(EntryUpdate::Rating(rating));
        }
        if !note.is_empty() {
            updates.push(EntryUpdate::Note(note));
        }
        if updates.is_empty() {
            writeln!(self.output, "Nothing to update")?;
            return Ok(());
        }

        for update in updates {
            if let Err(e) = self.service.update_entry(&title, update) {
                return self.report_error(&e);
            }
        }
        writeln!(self.output, "'{}' updated", title)?;
        Ok(())
    }

    fn display_stats(&mut self) -> Result<()> {
        let Some(stats) = self.service.stats() else {
            tracing::warn!("No films in memory for statistics");
            writeln!(self.output, "No data for statistics")?;
            return Ok(());
        };

        let best: Vec<(String, f64)> = stats.best.iter().map(|e| (e.title.clone(), e.rating)).collect();
        let worst: Vec<(String, f64)> = stats.worst.iter().map(|e| (e.title.clone(), e.rating)).collect();
        let (median, mean) = (stats.median, stats.mean);

        for (heading, movies) in [("Best rated movies:", best), ("Worst rated movies:", worst)] {
            writeln!(self.output, "\n\n{}", heading)?;
            writeln!(self.output, "{}", RULE)?;
            writeln!(self.output, "{:<50} {:<5}", "MOVIE", "RATING")?;
            for (title, rating) in movies {
                writeln!(self.output, "{:<50} {:<5}", title, rating)?;
            }
        }

        writeln!(self.output, "\n\nRatings:")?;
        writeln!(self.output, "---------------")?;
        writeln!(self.output, "{:<10} {:>5.2}", "Median", median)?;
        writeln!(self.output, "{:<10} {:>5.2}", "Average", mean)?;
        Ok(())
    }

    fn search_movie(&mut self) -> Result<()> {
        let Some(pattern) = self.prompt_title()? else {
            return Ok(());
        };
        writeln!(self.output, "Searching for movies matching: {}", pattern)?;

        let matches: Vec<CatalogEntry> = match self.service.search(&pattern) {
            Ok(found) => found.into_iter().cloned().collect(),
            Err(e) => return self.report_error(&e),
        };
        if matches.is_empty() {
            writeln!(self.output, "No movies found matching your search.")?;
            return Ok(());
        }
        self.print_movies("Search results", &matches.iter().collect::<Vec<_>>())
    }

    fn sort_movies(&mut self) -> Result<()> {
        let sorted: Vec<CatalogEntry> = self.service.sort_by_rating().into_iter().cloned().collect();
        if sorted.is_empty() {
            writeln!(self.output, "No movies in DB")?;
            return Ok(());
        }
        self.print_movies("Movies sorted by rating: Highest first", &sorted.iter().collect::<Vec<_>>())
    }

    fn filter_movies(&mut self) -> Result<()> {
        writeln!(self.output, "Filtering movies...")?;
        if self.service.store().is_empty() {
            writeln!(self.output, "No films in db to filter!")?;
            return Ok(());
        }

        let Some(min_rating) = self.prompt_value(
            "Enter minimum RATING (leave blank for all): ",
            true,
            parse_rating,
        )?
        else {
            return Ok(());
        };
        let Some(min_year) = self.prompt_value(
            "Enter start YEAR (leave blank for 1888): ",
            true,
            parse_year,
        )?
        else {
            return Ok(());
        };
        let Some(max_year) = self.prompt_value(
            "Enter end YEAR (leave blank for this year): ",
            true,
            parse_year,
        )?
        else {
            return Ok(());
        };

        let filtered: Vec<CatalogEntry> = self
            .service
            .filter(FilterCriteria {
                min_rating,
                min_year,
                max_year,
            })
            .into_iter()
            .cloned()
            .collect();
        if filtered.is_empty() {
            writeln!(self.output, "No movies with that criteria")?;
            return Ok(());
        }
        self.print_movies("Filtered movies, oldest first", &filtered.iter().collect::<Vec<_>>())
    }

    fn generate_web_page(&mut self) -> Result<()> {
        let outcome = web_page::generate_web_page(
            self.service.store().catalog(),
            &self.web.template,
            self.web.output.as_deref(),
            &self.web.title,
        );
        match outcome {
            Ok(path) => writeln!(self.output, "Website was generated successfully: {}", path.display())?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }
}
