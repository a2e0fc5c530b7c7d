use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, bail};
use slicestore_reassembly::{
    FetchOptions, FetchProgress, ObjectFetcher, ProgressCallback, Reassembler, ThroughputMeter,
    validate_output_name,
};
use slicestore_slicing::{ChunkGroup, GroupDefect, GroupSummary, group_slices, summarize, verify};
use tokio::io::BufWriter;
use tracing::{info, warn};

use crate::digest::DigestWriter;
use crate::source::Source;

/// One row of `slicestore list`.
pub struct ListEntry {
    pub summary: GroupSummary,
    pub status: String,
}

/// Groups every sliced file in `source`, sorted by original name.
pub async fn list(source: &Source) -> anyhow::Result<Vec<ListEntry>> {
    let objects = source.list().await?;
    let mut entries: Vec<ListEntry> = group_slices(&objects)
        .values()
        .map(|group| ListEntry {
            summary: summarize(group),
            status: status(verify(group).err().as_ref()),
        })
        .collect();
    entries.sort_by(|a, b| a.summary.original_name.cmp(&b.summary.original_name));
    Ok(entries)
}

fn status(defect: Option<&GroupDefect>) -> String {
    match defect {
        None => "complete".into(),
        Some(GroupDefect::Empty { .. }) => "empty".into(),
        Some(GroupDefect::InconsistentTotal { .. }) => "inconsistent total".into(),
        Some(GroupDefect::DuplicateIndex { indices, .. }) => {
            format!("duplicate index {}", join(indices))
        }
        Some(GroupDefect::IncompleteGroup {
            missing,
            missing_count,
            ..
        }) => {
            let shown = u32::try_from(missing.len()).unwrap_or(u32::MAX);
            match missing_count.saturating_sub(shown) {
                0 => format!("missing {}", join(missing)),
                more => format!("missing {} and {more} more", join(missing)),
            }
        }
    }
}

fn join(indices: &[u32]) -> String {
    indices
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// A file written by `slicestore get`.
#[derive(Debug)]
pub struct Written {
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
}

/// Rebuilds `name` from `source` into `out_dir`.
///
/// Bytes are streamed to `<name>.partial` and renamed once complete; the
/// partial file is removed on failure. Ctrl-C cancels the operation.
pub async fn get(
    source: &Source,
    name: &str,
    out_dir: &Path,
    options: FetchOptions,
) -> anyhow::Result<Written> {
    validate_output_name(name)?;

    let objects = source.list().await?;
    let Some(group) = group_slices(&objects).remove(name) else {
        bail!("no sliced file named {name}");
    };

    let reassembler = Reassembler::new(source.fetcher()?)
        .with_options(options)
        .with_progress(progress_logger(name));

    let cancel = reassembler.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            cancel.cancel();
        }
    });

    let path = out_dir.join(name);
    let partial = out_dir.join(format!("{name}.partial"));
    let result = write_group(&reassembler, &group, &path, &partial).await;
    interrupt.abort();

    match result {
        Ok((size, sha256)) => {
            info!(name, path = %path.display(), size, sha256 = %sha256, "file written");
            Ok(Written { path, size, sha256 })
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            Err(e)
        }
    }
}

async fn write_group(
    reassembler: &Reassembler<dyn ObjectFetcher>,
    group: &ChunkGroup,
    path: &Path,
    partial: &Path,
) -> anyhow::Result<(u64, String)> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = tokio::fs::File::create(partial)
        .await
        .with_context(|| format!("failed to create {}", partial.display()))?;
    let mut writer = DigestWriter::new(BufWriter::new(file));
    let size = reassembler.reassemble_into(group, &mut writer).await?;

    let (file, sha256) = writer.finish();
    file.into_inner()
        .sync_all()
        .await
        .with_context(|| format!("failed to sync {}", partial.display()))?;
    tokio::fs::rename(partial, path)
        .await
        .with_context(|| format!("failed to move output to {}", path.display()))?;
    Ok((size, sha256))
}

/// Logs every completed slice with the current download rate.
fn progress_logger(name: &str) -> ProgressCallback {
    let name = name.to_string();
    let meter = ThroughputMeter::default();
    let last_bytes = AtomicU64::new(0);

    Box::new(move |p: FetchProgress| {
        let previous = last_bytes.swap(p.bytes, Ordering::Relaxed);
        meter.record(p.bytes.saturating_sub(previous));
        info!(
            name = %name,
            completed = p.completed,
            total = p.total,
            bytes = p.bytes,
            percent = (p.fraction() * 100.0).round(),
            bytes_per_sec = meter.bytes_per_second().round() as u64,
            "slice received"
        );
    })
}
