use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "List and reconstruct sliced files", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the per-user slicestore/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every sliced file in a source and whether it can be rebuilt
    List {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Rebuild one sliced file and write it to disk
    Get {
        /// Original name of the file to rebuild
        name: String,
        #[command(flatten)]
        source: SourceArgs,
        /// Base URL objects are fetched from (with --listing)
        #[arg(long)]
        fetch_url: Option<String>,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Per-slice timeout in seconds (0 disables it)
        #[arg(long)]
        timeout: Option<u64>,
        /// Maximum slices fetched at once (0 = all at once)
        #[arg(long)]
        max_concurrent: Option<usize>,
    },
}

/// Where stored objects come from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Directory holding the stored objects
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// JSON listing of stored objects
    #[arg(long)]
    pub listing: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_with_listing() {
        let cli = Cli::try_parse_from([
            "slicestore",
            "get",
            "report.pdf",
            "--listing",
            "objects.json",
            "--fetch-url",
            "https://store.example/o",
            "--timeout",
            "5",
        ])
        .unwrap();

        let Command::Get {
            name,
            source,
            fetch_url,
            timeout,
            max_concurrent,
            ..
        } = cli.command
        else {
            panic!("expected get");
        };
        assert_eq!(name, "report.pdf");
        assert_eq!(source.listing, Some(PathBuf::from("objects.json")));
        assert!(source.dir.is_none());
        assert_eq!(fetch_url.as_deref(), Some("https://store.example/o"));
        assert_eq!(timeout, Some(5));
        assert_eq!(max_concurrent, None);
    }

    #[test]
    fn source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["slicestore", "list"]).is_err());
        assert!(
            Cli::try_parse_from(["slicestore", "list", "--dir", "a", "--listing", "b"]).is_err()
        );
        assert!(Cli::try_parse_from(["slicestore", "list", "--dir", "a"]).is_ok());
    }
}
