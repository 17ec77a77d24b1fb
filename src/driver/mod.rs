// src/driver/mod.rs

use std::path::PathBuf;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::harvest::{pass, DedupIndex, View};
use crate::sink::CsvSink;
use crate::surface::Surface;

/// Outcome of one view's harvest.
#[derive(Debug)]
pub struct ViewReport {
    pub view: View,
    pub rows_written: u64,
    /// Path of the finalized CSV; `None` when no rows were written.
    pub output: Option<PathBuf>,
}

/// Drives one view through its scroll budget: reset to the top, then for
/// each step issue a page-advance, settle, extract the newly rendered rows
/// and append them to the view's sink.
pub struct ScrollDriver<'a, S> {
    surface: &'a S,
    cfg: &'a Config,
}

impl<'a, S: Surface> ScrollDriver<'a, S> {
    pub fn new(surface: &'a S, cfg: &'a Config) -> Self {
        Self { surface, cfg }
    }

    pub async fn harvest_view(&self, view: View) -> ViewReport {
        let mut dedup = DedupIndex::new();
        let mut sink = CsvSink::new(self.cfg.out_dir.join(view.file_name()));
        let mut rows_written = 0u64;

        info!(%view, "positioning at the top of the ranking list");
        if let Err(e) = self.surface.reset_to_top() {
            warn!(%view, error = %e, "reset to top failed; harvesting from current position");
        }
        sleep(self.cfg.position_settle).await;

        // A fixed budget bounds the run against a list whose total row
        // count is not reliably knowable; no convergence detection.
        for step in 1..=self.cfg.scroll_steps {
            if let Err(e) = self.surface.scroll_step() {
                warn!(%view, step, error = %e, "scroll input failed");
            }
            sleep(self.cfg.scroll_settle).await;

            let snapshots = match self.surface.row_snapshots() {
                Ok(snapshots) => snapshots,
                Err(e) => {
                    warn!(%view, step, error = %e, "surface read failed; skipping step");
                    Vec::new()
                }
            };
            let fresh = pass::extract_new(snapshots, &mut dedup).await;
            info!(
                %view,
                step,
                budget = self.cfg.scroll_steps,
                new = fresh.len(),
                total = dedup.len(),
                "scroll step complete"
            );

            if fresh.is_empty() {
                continue;
            }
            match sink.append(&fresh) {
                Ok(()) => rows_written += fresh.len() as u64,
                // The batch is already deduplicated, so it will not come
                // around again; losing it is the documented trade-off.
                Err(e) => error!(%view, step, error = %e, "append failed; batch dropped"),
            }
        }

        let output = (rows_written > 0).then(|| sink.path().to_path_buf());
        ViewReport {
            view,
            rows_written,
            output,
        }
    }
}

/// Harvest City Center, switch to Metro Area, harvest that too.
///
/// A failed switch ends the run with City Center's output only: the
/// diagnostic screenshot is saved best-effort and the partial result is
/// still a process-level success.
pub async fn harvest_all_views<S: Surface>(surface: &S, cfg: &Config) -> Vec<ViewReport> {
    let driver = ScrollDriver::new(surface, cfg);
    let mut reports = vec![driver.harvest_view(View::CityCenter).await];

    info!("switching to {}", View::MetroArea);
    match surface.activate_view(View::MetroArea) {
        Ok(()) => {
            sleep(cfg.switch_settle).await;
            reports.push(driver.harvest_view(View::MetroArea).await);
        }
        Err(e) => {
            error!(error = %e, "view switch failed; keeping partial result");
            save_switch_diagnostic(surface, cfg);
        }
    }
    reports
}

fn save_switch_diagnostic<S: Surface>(surface: &S, cfg: &Config) {
    match surface.capture_screenshot() {
        Ok(png) => {
            let path = cfg.out_dir.join("metro_area_error.png");
            match std::fs::write(&path, &png) {
                Ok(()) => info!(path = %path.display(), "wrote switch diagnostic screenshot"),
                Err(e) => warn!(error = %e, "could not write switch diagnostic"),
            }
        }
        Err(e) => warn!(error = %e, "could not capture switch diagnostic"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::RawRowSnapshot;
    use crate::surface::NavigationError;
    use anyhow::Result;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    fn test_config(out_dir: &Path, scroll_steps: u32) -> Config {
        Config {
            ranking_url: "http://localhost/unused".to_string(),
            out_dir: out_dir.to_path_buf(),
            bucket: None,
            headless: true,
            scroll_steps,
            scroll_settle: Duration::ZERO,
            position_settle: Duration::ZERO,
            switch_settle: Duration::ZERO,
            switch_timeout: Duration::ZERO,
            page_timeout: Duration::ZERO,
        }
    }

    fn full_row(rank: &str, city: &str, country: &str) -> RawRowSnapshot {
        RawRowSnapshot::new(
            [rank, "1", city, country, "30 min", "+1 min", "40%", "100 hours"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
    }

    /// Fixed windows of rendered rows; `scroll_step` slides the window.
    struct MockSurface {
        windows: Vec<Vec<RawRowSnapshot>>,
        position: Mutex<usize>,
        switch_ok: bool,
        scrolls: Mutex<u32>,
    }

    impl MockSurface {
        fn new(windows: Vec<Vec<RawRowSnapshot>>, switch_ok: bool) -> Self {
            Self {
                windows,
                position: Mutex::new(0),
                switch_ok,
                scrolls: Mutex::new(0),
            }
        }
    }

    impl Surface for MockSurface {
        fn row_snapshots(&self) -> Result<Vec<RawRowSnapshot>> {
            // The window shown after scroll step N is windows[N - 1]; the
            // last window stays rendered once the list bottoms out.
            let position = *self.position.lock().unwrap();
            let index = position
                .saturating_sub(1)
                .min(self.windows.len().saturating_sub(1));
            Ok(self.windows.get(index).cloned().unwrap_or_default())
        }

        fn reset_to_top(&self) -> Result<()> {
            *self.position.lock().unwrap() = 0;
            Ok(())
        }

        fn scroll_step(&self) -> Result<()> {
            *self.position.lock().unwrap() += 1;
            *self.scrolls.lock().unwrap() += 1;
            Ok(())
        }

        fn activate_view(&self, view: View) -> Result<(), NavigationError> {
            if self.switch_ok {
                Ok(())
            } else {
                Err(NavigationError::NotActionable {
                    view,
                    timeout: Duration::from_secs(10),
                })
            }
        }

        fn capture_screenshot(&self) -> Result<Vec<u8>> {
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    /// Surface that renders a never-before-seen row on every read.
    struct AlwaysFreshSurface {
        scrolls: Mutex<u32>,
        reads: Mutex<u32>,
    }

    impl Surface for AlwaysFreshSurface {
        fn row_snapshots(&self) -> Result<Vec<RawRowSnapshot>> {
            let mut reads = self.reads.lock().unwrap();
            *reads += 1;
            Ok(vec![full_row("1", &format!("City {}", *reads), "Nowhere")])
        }

        fn reset_to_top(&self) -> Result<()> {
            Ok(())
        }

        fn scroll_step(&self) -> Result<()> {
            *self.scrolls.lock().unwrap() += 1;
            Ok(())
        }

        fn activate_view(&self, _view: View) -> Result<(), NavigationError> {
            Ok(())
        }

        fn capture_screenshot(&self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn overlapping_windows_write_each_city_once() {
        let dir = tempdir().unwrap();
        let cfg = test_config(dir.path(), 2);

        // Window 2 overlaps window 1; Dublin re-renders with a rank prefix.
        let surface = MockSurface::new(
            vec![
                vec![
                    full_row("1", "Dublin", "Ireland"),
                    full_row("2", "Lima", "Peru"),
                ],
                vec![
                    full_row("2", "7, Dublin", "Ireland"),
                    full_row("3", "Bogota", "Colombia"),
                ],
            ],
            true,
        );

        let driver = ScrollDriver::new(&surface, &cfg);
        let report = driver.harvest_view(View::CityCenter).await;
        assert_eq!(report.rows_written, 3);

        let contents =
            std::fs::read_to_string(dir.path().join(View::CityCenter.file_name())).unwrap();
        assert_eq!(contents.matches("Dublin").count(), 1);
        assert_eq!(contents.matches("Bogota").count(), 1);
    }

    #[tokio::test]
    async fn stops_exactly_at_the_step_budget() {
        let dir = tempdir().unwrap();
        let cfg = test_config(dir.path(), 5);
        let surface = AlwaysFreshSurface {
            scrolls: Mutex::new(0),
            reads: Mutex::new(0),
        };

        let driver = ScrollDriver::new(&surface, &cfg);
        let report = driver.harvest_view(View::CityCenter).await;

        // Every read produced a fresh row, yet the driver stopped at the
        // budget rather than chasing convergence.
        assert_eq!(*surface.scrolls.lock().unwrap(), 5);
        assert_eq!(report.rows_written, 5);
    }

    #[tokio::test]
    async fn failed_switch_keeps_first_view_output() {
        let dir = tempdir().unwrap();
        let cfg = test_config(dir.path(), 1);
        let surface = MockSurface::new(
            vec![vec![full_row("1", "Dublin", "Ireland")]],
            false,
        );

        let reports = harvest_all_views(&surface, &cfg).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].view, View::CityCenter);
        assert_eq!(reports[0].rows_written, 1);

        assert!(dir.path().join(View::CityCenter.file_name()).exists());
        assert!(!dir.path().join(View::MetroArea.file_name()).exists());
        assert!(dir.path().join("metro_area_error.png").exists());
    }

    #[tokio::test]
    async fn successful_switch_harvests_both_views_independently() {
        let dir = tempdir().unwrap();
        let cfg = test_config(dir.path(), 1);
        // Same city renders in both views; each view has its own dedup
        // space, so it is written to both files.
        let surface = MockSurface::new(
            vec![vec![full_row("1", "Dublin", "Ireland")]],
            true,
        );

        let reports = harvest_all_views(&surface, &cfg).await;
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.rows_written == 1));
        assert!(dir.path().join(View::CityCenter.file_name()).exists());
        assert!(dir.path().join(View::MetroArea.file_name()).exists());
    }

    #[tokio::test]
    async fn empty_surface_produces_no_file() {
        let dir = tempdir().unwrap();
        let cfg = test_config(dir.path(), 3);
        let surface = MockSurface::new(vec![Vec::new()], true);

        let driver = ScrollDriver::new(&surface, &cfg);
        let report = driver.harvest_view(View::CityCenter).await;
        assert_eq!(report.rows_written, 0);
        assert!(report.output.is_none());
        assert!(!dir.path().join(View::CityCenter.file_name()).exists());
    }
}
