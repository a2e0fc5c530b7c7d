use std::sync::Arc;

use anyhow::{Context, bail};
use slicestore_reassembly::ObjectFetcher;
use slicestore_remote::{DirectoryStore, HttpObjectFetcher, JsonListing, ObjectLister};
use slicestore_slicing::StoredObjectRef;

use crate::cli::SourceArgs;

/// A storage backend selected on the command line.
pub struct Source {
    lister: Box<dyn ObjectLister>,
    fetcher: Option<Arc<dyn ObjectFetcher>>,
}

impl Source {
    /// Opens the source named by `args`. `fetch_url` is only needed with a
    /// JSON listing, and only to fetch.
    pub fn open(args: &SourceArgs, fetch_url: Option<&str>) -> anyhow::Result<Self> {
        if let Some(dir) = &args.dir {
            return Ok(Self::directory(DirectoryStore::new(dir)));
        }
        let Some(listing) = &args.listing else {
            bail!("either --dir or --listing is required");
        };

        let fetcher = match fetch_url {
            Some(url) => {
                let http = HttpObjectFetcher::new(url)
                    .with_context(|| format!("failed to create HTTP client for {url}"))?;
                Some(Arc::new(http) as Arc<dyn ObjectFetcher>)
            }
            None => None,
        };
        Ok(Self {
            lister: Box::new(JsonListing::new(listing)),
            fetcher,
        })
    }

    pub fn directory(store: DirectoryStore) -> Self {
        Self {
            lister: Box::new(store.clone()),
            fetcher: Some(Arc::new(store)),
        }
    }

    pub async fn list(&self) -> anyhow::Result<Vec<StoredObjectRef>> {
        self.lister
            .list()
            .await
            .context("failed to list stored objects")
    }

    pub fn fetcher(&self) -> anyhow::Result<Arc<dyn ObjectFetcher>> {
        self.fetcher
            .clone()
            .context("--fetch-url (or fetch_url in the config) is required with --listing")
    }
}
