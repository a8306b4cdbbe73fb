pub mod address;
pub mod config;
pub mod error;
pub mod labels;
pub mod listing;
pub mod models;
pub mod profile;
pub mod query;
pub mod resolver;
pub mod scoring;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use address::{AddressError, PostalAddress};
pub use config::{Endpoints, ResolverConfig};
pub use error::AppError;
pub use models::{LocationHints, NcesId, Resolution, SearchQuery, SourceType};
pub use profile::{ProfileService, SchoolProfile, extract_profile};
pub use resolver::SchoolResolver;
pub use traits::{DocumentParser, Fetcher, QueryableDocument};
