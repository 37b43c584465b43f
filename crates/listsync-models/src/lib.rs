pub mod imdb_item;
pub mod list;
pub mod trakt_item;

pub use imdb_item::{ImdbItem, ImdbList, TitleType};
pub use list::{DataPair, ListPair, ListTarget, WATCHLIST_NAME};
pub use trakt_item::{TraktIds, TraktItem, TraktItemKind, TraktItemSpec, TraktList, TraktListIds};
