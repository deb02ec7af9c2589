//! Bounded fan-out of the download worker across the worklist

use crate::types::{LookupResult, Worklist};
use crate::worker::DownloadWorker;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;

/// Default number of CAS numbers processed at once
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Run `worker` over every CAS number in `worklist`, at most `pool_size` at a time.
///
/// Results come back in completion order. A task that panics is logged and
/// left out; everything else is returned.
pub async fn fan_out(
    worker: Arc<DownloadWorker>,
    worklist: &Worklist,
    pool_size: usize,
) -> Vec<LookupResult> {
    run_bounded(worklist.iter().cloned(), pool_size, move |cas_nr| {
        let worker = Arc::clone(&worker);
        async move { worker.process(&cas_nr).await }
    })
    .await
}

/// Spawn `task` for each item with bounded concurrency and collect the outputs
/// of the tasks that finished.
async fn run_bounded<I, F, Fut, T>(items: I, pool_size: usize, task: F) -> Vec<T>
where
    I: IntoIterator<Item = String>,
    F: Fn(String) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let results: Vec<_> = stream::iter(items)
        .map(|cas_nr| {
            let handle = tokio::spawn(task(cas_nr.clone()));
            async move { (cas_nr, handle.await) }
        })
        .buffer_unordered(pool_size.max(1))
        .collect()
        .await;

    results
        .into_iter()
        .filter_map(|(cas_nr, joined)| match joined {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(cas_nr = %cas_nr, error = %e, "Lookup task failed");
                None
            }
        })
        .collect()
}
