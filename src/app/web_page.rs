use crate::domain::model::{Catalog, CatalogEntry};
use crate::utils::error::{CatalogError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";
pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const DEFAULT_OUTPUT_NAME: &str = "index.html";

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn has_poster(entry: &CatalogEntry) -> bool {
    !matches!(entry.poster_url.trim(), "" | "NA" | "N/A")
}

fn render_movie(entry: &CatalogEntry) -> String {
    let poster = if has_poster(entry) {
        format!(
            "<img class=\"movie-poster\" src=\"{}\" title=\"{}\"/>",
            escape_html(&entry.poster_url),
            escape_html(&entry.note)
        )
    } else {
        format!(
            "<div class=\"movie-poster movie-poster-missing\" title=\"{}\"></div>",
            escape_html(&entry.note)
        )
    };

    format!(
        "        <li>\n            <div class=\"movie\">\n                {}\n                \
<div class=\"movie-title\">{}</div>\n                <div class=\"movie-year\">{}</div>\n                \
<div class=\"movie-rating\">{}</div>\n            </div>\n        </li>\n",
        poster,
        escape_html(&entry.title),
        escape_html(&entry.date.to_string()),
        entry.rating
    )
}

pub fn render_movie_grid(catalog: &Catalog) -> String {
    catalog.iter().map(render_movie).collect()
}

pub fn render_page(template: &str, page_title: &str, catalog: &Catalog) -> Result<String> {
    if !template.contains(GRID_PLACEHOLDER) {
        return Err(CatalogError::TemplateError {
            message: format!("template has no {} placeholder", GRID_PLACEHOLDER),
        });
    }

    Ok(template
        .replace(TITLE_PLACEHOLDER, &escape_html(page_title))
        .replace(GRID_PLACEHOLDER, &render_movie_grid(catalog)))
}

/// Writes the rendered page next to the template unless an explicit output
/// path is given. Nothing is written when the template cannot be used.
pub fn generate_web_page(
    catalog: &Catalog,
    template_path: &Path,
    output_path: Option<&Path>,
    page_title: &str,
) -> Result<PathBuf> {
    tracing::info!("Generating web page from {}", template_path.display());

    let template = fs::read_to_string(template_path).map_err(|e| CatalogError::TemplateError {
        message: format!("cannot read {}: {}", template_path.display(), e),
    })?;
    let page = render_page(&template, page_title, catalog)?;

    let output = match output_path {
        Some(path) => path.to_path_buf(),
        None => template_path.with_file_name(DEFAULT_OUTPUT_NAME),
    };
    fs::write(&output, page)?;

    tracing::info!("Web page written to {} ({} movies)", output.display(), catalog.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Catalog {
        vec![
            CatalogEntry::new("Alien", 1979, 8.5).with_poster("https://img.example/alien.jpg"),
            CatalogEntry::new("Tom & Jerry <Movie>", 1992, 5.5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_escapes_and_skips_missing_posters() {
        let grid = render_movie_grid(&sample());

        assert!(grid.contains("src=\"https://img.example/alien.jpg\""));
        assert!(grid.contains("Tom &amp; Jerry &lt;Movie&gt;"));
        assert!(grid.contains("movie-poster-missing"));
        assert_eq!(grid.matches("<li>").count(), 2);
    }

    #[test]
    fn test_generate_writes_sibling_index() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("index_template.html");
        fs::write(
            &template,
            "<html><h1>__TEMPLATE_TITLE__</h1><ol>__TEMPLATE_MOVIE_GRID__</ol></html>",
        )
        .unwrap();

        let output = generate_web_page(&sample(), &template, None, "My Movies").unwrap();

        assert_eq!(output, dir.path().join("index.html"));
        let page = fs::read_to_string(output).unwrap();
        assert!(page.contains("<h1>My Movies</h1>"));
        assert!(page.contains("movie-title\">Alien<"));
        assert!(!page.contains(GRID_PLACEHOLDER));
    }

    #[test]
    fn test_missing_placeholder_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("index_template.html");
        fs::write(&template, "<html></html>").unwrap();

        let err = generate_web_page(&sample(), &template, None, "My Movies").unwrap_err();

        assert!(matches!(err, CatalogError::TemplateError { .. }));
        assert!(!dir.path().join("index.html").exists());
    }

    #[test]
    fn test_missing_template_is_reported() {
        let dir = TempDir::new().unwrap();

        let err = generate_web_page(&sample(), &dir.path().join("nope.html"), None, "x").unwrap_err();

        assert!(matches!(err, CatalogError::TemplateError { .. }));
        assert!(!dir.path().join("index.html").exists());
    }
}
