//! Per-file upload pass.
//!
//! Root files go to the container root; directories are descended exactly one
//! level and their files keep the directory name as a blob prefix. Uploads run
//! as tasks in a `JoinSet` with at most `max_concurrent` in flight, and the
//! pass returns only after every task has been joined.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::content_type::{infer_headers, FileHeaders};
use crate::copy_tool::{CopyOptions, CopyTool};
use crate::error::DeployError;
use crate::sas::Destination;
use crate::workflow::Workflow;

/// One local file and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    /// `<source>/<name>` or `<source>/<dir>/<name>`, as handed to the copy tool.
    pub local: String,
    /// Destination URL, with credentials.
    pub remote: String,
    pub headers: FileHeaders,
}

#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub files: usize,
    pub invocations: usize,
    /// Local paths of files where any invocation failed.
    pub failed: Vec<String>,
}

/// Source path as a string without trailing separators, for building child paths.
pub(crate) fn source_str(source: &Path) -> String {
    let s = source.to_string_lossy();
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        s.into_owned()
    } else {
        trimmed.to_string()
    }
}

async fn sorted_entries(dir: &Path) -> Result<Vec<(String, bool)>, DeployError> {
    let mut read = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| DeployError::io(format!("read directory {}", dir.display()), e))?;
    let mut entries = Vec::new();
    while let Some(entry) = read
        .next_entry()
        .await
        .map_err(|e| DeployError::io(format!("read directory {}", dir.display()), e))?
    {
        let path = entry.path();
        // Symlinks are not followed, matching lstat.
        let meta = tokio::fs::symlink_metadata(&path)
            .await
            .map_err(|e| DeployError::io(format!("stat {}", path.display()), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, meta.is_dir()));
    }
    entries.sort();
    Ok(entries)
}

/// Lists the files to upload, in name order.
pub async fn plan_uploads(
    source: &Path,
    dest: &Destination,
) -> Result<Vec<UploadJob>, DeployError> {
    let root = source_str(source);
    let mut jobs = Vec::new();

    for (name, is_dir) in sorted_entries(source).await? {
        let local = format!("{root}/{name}");
        if !is_dir {
            jobs.push(UploadJob {
                headers: infer_headers(&local),
                local,
                remote: dest.url(),
            });
            continue;
        }

        for (sub_name, sub_is_dir) in sorted_entries(&source.join(&name)).await? {
            let sub_local = format!("{local}/{sub_name}");
            if sub_is_dir {
                tracing::debug!(path = %sub_local, "skipping directory below upload depth");
                continue;
            }
            jobs.push(UploadJob {
                headers: infer_headers(&sub_local),
                remote: dest.object_url(&name, &sub_name),
                local: sub_local,
            });
        }
    }

    Ok(jobs)
}

/// Uploads one file: a copy carrying the content type, then a second copy
/// carrying the content encoding when one was inferred. Returns the number of
/// invocations made and whether all of them succeeded.
async fn upload_one(tool: Arc<dyn CopyTool>, job: &UploadJob) -> (usize, bool) {
    let mut invocations = 0;
    let mut ok = true;

    let typed = CopyOptions {
        content_type: job.headers.content_type.map(str::to_string),
        ..Default::default()
    };
    invocations += 1;
    ok &= check(tool.copy(&job.local, &job.remote, &typed).await, &job.local);

    if let Some(encoding) = job.headers.content_encoding {
        let encoded = CopyOptions {
            content_encoding: Some(encoding.to_string()),
            ..Default::default()
        };
        invocations += 1;
        ok &= check(tool.copy(&job.local, &job.remote, &encoded).await, &job.local);
    }

    (invocations, ok)
}

fn check(result: Result<i32, DeployError>, local: &str) -> bool {
    match result {
        Ok(0) => true,
        Ok(code) => {
            tracing::warn!(path = %local, code, "upload failed");
            false
        }
        Err(e) => {
            tracing::warn!(path = %local, "upload could not run: {}", e);
            false
        }
    }
}

pub async fn run_uploads(
    tool: Arc<dyn CopyTool>,
    jobs: Vec<UploadJob>,
    max_concurrent: usize,
    console: &mut Workflow,
) -> UploadOutcome {
    let max_concurrent = max_concurrent.max(1);
    let mut outcome = UploadOutcome::default();
    let mut pending = jobs.into_iter();
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < max_concurrent {
            let Some(job) = pending.next() else {
                break;
            };
            console.info(&job.local);
            let tool = Arc::clone(&tool);
            join_set.spawn(async move {
                let (invocations, ok) = upload_one(tool, &job).await;
                (job.local, invocations, ok)
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok((local, invocations, ok)) => {
                outcome.files += 1;
                outcome.invocations += invocations;
                if !ok {
                    outcome.failed.push(local);
                }
            }
            Err(e) => {
                tracing::error!("upload task panicked or was cancelled: {}", e);
                outcome.failed.push("<upload task>".to_string());
            }
        }
    }

    outcome.failed.sort();
    outcome
}
