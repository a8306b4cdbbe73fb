use url::Url;

use crate::error::AppError;
use crate::models::SourceType;

pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://nces.ed.gov/ccd/schoolsearch/";
pub const DEFAULT_PRIVATE_BASE_URL: &str = "https://nces.ed.gov/surveys/pss/privateschoolsearch/";
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Search roots of the two NCES directories.
///
/// Listing, detail and next-page links are all resolved against these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub public_base: Url,
    pub private_base: Url,
}

impl Endpoints {
    pub fn new(public_base: &str, private_base: &str) -> Result<Self, AppError> {
        Ok(Self {
            public_base: parse_base(public_base)?,
            private_base: parse_base(private_base)?,
        })
    }

    pub fn base(&self, source: SourceType) -> &Url {
        match source {
            SourceType::Public => &self.public_base,
            SourceType::Private => &self.private_base,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            public_base: Url::parse(DEFAULT_PUBLIC_BASE_URL).expect("valid default public URL"),
            private_base: Url::parse(DEFAULT_PRIVATE_BASE_URL).expect("valid default private URL"),
        }
    }
}

/// Parse a search root, forcing a trailing slash so relative links join
/// under it rather than replacing its last segment.
fn parse_base(raw: &str) -> Result<Url, AppError> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::ConfigError(format!(
            "Base URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Upper bound on listing pages fetched per source.
    pub max_pages: usize,
    pub endpoints: Endpoints,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            endpoints: Endpoints::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_max_pages(mut self, max_pages: usize) -> Result<Self, AppError> {
        if max_pages == 0 {
            return Err(AppError::ConfigError("max_pages must be at least 1".into()));
        }
        self.max_pages = max_pages;
        Ok(self)
    }

    /// Read configuration from environment variables.
    ///
    /// - `NCES_MAX_PAGES` (optional, defaults to 50)
    /// - `NCES_PUBLIC_BASE_URL` (optional)
    /// - `NCES_PRIVATE_BASE_URL` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("NCES_MAX_PAGES") {
            let parsed: usize = raw.trim().parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid NCES_MAX_PAGES '{raw}': must be a positive integer"
                ))
            })?;
            config = config.with_max_pages(parsed)?;
        }

        let public = lookup("NCES_PUBLIC_BASE_URL");
        let private = lookup("NCES_PRIVATE_BASE_URL");
        if public.is_some() || private.is_some() {
            config.endpoints = Endpoints::new(
                public.as_deref().unwrap_or(DEFAULT_PUBLIC_BASE_URL),
                private.as_deref().unwrap_or(DEFAULT_PRIVATE_BASE_URL),
            )?;
        }

        Ok(config)
    }
}
