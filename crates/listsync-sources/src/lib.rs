pub mod error;
pub mod http;
pub mod imdb;
pub mod traits;
pub mod trakt;

pub use error::SourceError;
pub use imdb::ImdbClient;
pub use traits::{CatalogSource, TrackerDestination};
pub use trakt::TraktClient;
