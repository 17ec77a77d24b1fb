// src/harvest/pass.rs

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::harvest::{dedup::DedupIndex, row, RawRowSnapshot, Record};

/// Permits for the per-pass parse pool. Workers are spun up and torn down
/// inside one pass; nothing persists between passes.
const PARSE_WORKERS: usize = 8;

/// Run one extraction pass over the currently rendered rows.
///
/// Each snapshot is parsed independently on a semaphore-bounded worker pool.
/// The dedup check happens at collection, so a key is admitted at most once
/// no matter how many windows it appears in. A failed or panicked row is
/// logged and skipped, never fatal. The pass always completes and returns
/// whatever subset succeeded, in no particular order.
pub async fn extract_new(snapshots: Vec<RawRowSnapshot>, dedup: &mut DedupIndex) -> Vec<Record> {
    let sem = Arc::new(Semaphore::new(PARSE_WORKERS));
    let mut handles = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        let sem = Arc::clone(&sem);
        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire().await.ok()?;
            match row::parse_row(&snapshot) {
                Ok(record) => Some(record),
                Err(rejection) => {
                    debug!(%rejection, "dropped rendered row");
                    None
                }
            }
        }));
    }

    let mut fresh = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(Some(record)) => {
                if !dedup.seen(&record.city) {
                    dedup.mark_seen(&record.city);
                    fresh.push(record);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("row worker failed: {}", e),
        }
    }
    fresh
}
