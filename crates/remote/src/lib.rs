//! Storage backends for sliced files.
//!
//! - [`DirectoryStore`]: a local directory, one file per stored object
//! - [`HttpObjectFetcher`]: objects served over HTTP(S) by id
//! - [`JsonListing`]: a listing kept in a JSON file, paired with a fetcher

mod directory;
mod http;
mod listing;
mod lister;

pub use directory::DirectoryStore;
pub use http::HttpObjectFetcher;
pub use lister::{ListFuture, ObjectLister};
pub use listing::JsonListing;
