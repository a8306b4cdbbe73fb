//! Grammar for the one-line addresses NCES prints in listings and on detail
//! pages: `[street,] city, ST 12345[-6789]`.
//!
//! Parsing is strict about the trailing state and zip tokens so that a row
//! with an unexpected layout is reported instead of yielding garbage tokens.

use std::fmt;

use thiserror::Error;

/// Why an address line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("expected at least two comma-separated segments")]
    TooFewSegments,

    #[error("city segment is empty")]
    EmptyCity,

    #[error("last segment must hold a state and a zip code")]
    MissingStateOrZip,

    #[error("invalid state code '{0}'")]
    InvalidState(String),

    #[error("invalid zip code '{0}'")]
    InvalidZip(String),
}

/// A parsed `city, ST zip` address with optional leading street text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    /// Everything before the city segment, comma-joined. Empty when absent.
    pub street: String,
    pub city: String,
    /// Two-letter code, upper-cased.
    pub state: String,
    /// Five-digit zip body.
    pub zip: String,
    /// Four-digit ZIP+4 suffix, if printed.
    pub zip_suffix: Option<String>,
}

impl PostalAddress {
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let segments: Vec<&str> = raw.split(',').collect();
        if segments.len() < 2 {
            return Err(AddressError::TooFewSegments);
        }

        let last = segments[segments.len() - 1];
        let city = segments[segments.len() - 2].trim();
        if city.is_empty() {
            return Err(AddressError::EmptyCity);
        }

        let tokens: Vec<&str> = last.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(AddressError::MissingStateOrZip);
        }
        let state = tokens[tokens.len() - 2];
        let zip_token = tokens[tokens.len() - 1];

        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AddressError::InvalidState(state.to_string()));
        }
        let (zip, zip_suffix) = split_zip(zip_token)?;

        let street = segments[..segments.len() - 2]
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            street,
            city: city.to_string(),
            state: state.to_ascii_uppercase(),
            zip,
            zip_suffix,
        })
    }

    pub fn city_matches(&self, city: &str) -> bool {
        self.city.to_lowercase() == city.trim().to_lowercase()
    }

    pub fn state_matches(&self, state: &str) -> bool {
        self.state.eq_ignore_ascii_case(state.trim())
    }

    pub fn zip_matches(&self, zip: &str) -> bool {
        self.zip == zip.trim()
    }
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.street.is_empty() {
            write!(f, "{}, ", self.street)?;
        }
        write!(f, "{}, {} {}", self.city, self.state, self.zip)?;
        if let Some(suffix) = &self.zip_suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

fn split_zip(token: &str) -> Result<(String, Option<String>), AddressError> {
    let invalid = || AddressError::InvalidZip(token.to_string());
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    let (body, suffix) = match token.split_once('-') {
        Some((body, suffix)) => (body, Some(suffix)),
        None => (token, None),
    };
    if body.len() != 5 || !all_digits(body) {
        return Err(invalid());
    }
    match suffix {
        None => Ok((body.to_string(), None)),
        Some(s) if s.len() == 4 && all_digits(s) => Ok((body.to_string(), Some(s.to_string()))),
        Some(_) => Err(invalid()),
    }
}
