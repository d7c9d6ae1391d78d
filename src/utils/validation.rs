use crate::utils::error::{CatalogError, Result};
use chrono::Datelike;
use url::Url;

/// Historical start of films.
pub const FILM_START: i32 = 1888;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation("Title cannot be empty. Please try again."));
    }
    Ok(trimmed.to_string())
}

pub fn validate_year(year: i32) -> Result<i32> {
    let max = current_year();
    if !(FILM_START..=max).contains(&year) {
        return Err(CatalogError::validation(format!(
            "{} needs to be between {} and {}",
            year, FILM_START, max
        )));
    }
    Ok(year)
}

pub fn validate_rating(rating: f64) -> Result<f64> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CatalogError::validation(format!(
            "Rating needs to be a value between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating)
}

pub fn parse_year(input: &str) -> Result<i32> {
    let year = input
        .trim()
        .parse::<i32>()
        .map_err(|_| CatalogError::validation("Invalid input. Date needs to be an integer."))?;
    validate_year(year)
}

pub fn parse_rating(input: &str) -> Result<f64> {
    let rating = input
        .trim()
        .parse::<f64>()
        .map_err(|_| CatalogError::validation("Rating needs to be a float"))?;
    validate_rating(rating)
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CatalogError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("lookup.endpoint", "https://example.com").is_ok());
        assert!(validate_url("lookup.endpoint", "http://www.omdbapi.com/").is_ok());
        assert!(validate_url("lookup.endpoint", "").is_err());
        assert!(validate_url("lookup.endpoint", "invalid-url").is_err());
        assert!(validate_url("lookup.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Inception ").unwrap(), "Inception");
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn test_year_bounds() {
        assert!(validate_year(1888).is_ok());
        assert!(validate_year(current_year()).is_ok());
        assert!(validate_year(1887).is_err());
        assert!(validate_year(current_year() + 1).is_err());
        assert!(parse_year("nineteen").is_err());
        assert_eq!(parse_year(" 1999 ").unwrap(), 1999);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.0).is_ok());
        assert!(validate_rating(10.1).is_err());
        assert!(validate_rating(-0.5).is_err());
        assert!(validate_rating(f64::NAN).is_err());
        assert_eq!(parse_rating("8.5").unwrap(), 8.5);
        assert!(parse_rating("great").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("lookup.timeout_seconds", 10u64, 1, 120).is_ok());
        assert!(validate_range("lookup.timeout_seconds", 0u64, 1, 120).is_err());
    }
}
