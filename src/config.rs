// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RANKING_URL: &str = "https://www.tomtom.com/traffic-index/ranking/";
pub const DEFAULT_SCROLL_STEPS: u32 = 50;

/// Run configuration, read once from the environment at startup and passed
/// by reference to every component. No process-wide singletons.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ranking page to harvest (`TRAFFIC_INDEX_URL`).
    pub ranking_url: String,
    /// Directory CSV files and diagnostics land in (`TRAFFIC_INDEX_OUT_DIR`).
    pub out_dir: PathBuf,
    /// Upload bucket (`TRAFFIC_INDEX_BUCKET`); unset skips upload.
    pub bucket: Option<String>,
    /// Run the browser headless (`HEADLESS`, default true).
    pub headless: bool,
    /// Fixed scroll budget per view (`SCROLL_STEPS`). This is a budget,
    /// not a convergence check. Rows never scrolled into view before it
    /// runs out are accepted losses.
    pub scroll_steps: u32,
    /// Wait after each scroll input for the virtualization layer to render.
    pub scroll_settle: Duration,
    /// Wait after resetting to the top of the list.
    pub position_settle: Duration,
    /// Wait after a successful view switch before harvesting.
    pub switch_settle: Duration,
    /// Bound on waiting for the view-switch control to become actionable.
    pub switch_timeout: Duration,
    /// Bound on waiting for the ranking table on initial navigation.
    pub page_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            ranking_url: env::var("TRAFFIC_INDEX_URL")
                .unwrap_or_else(|_| DEFAULT_RANKING_URL.to_string()),
            out_dir: env::var("TRAFFIC_INDEX_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            bucket: env::var("TRAFFIC_INDEX_BUCKET")
                .ok()
                .filter(|b| !b.is_empty()),
            headless: env::var("HEADLESS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            scroll_steps: env::var("SCROLL_STEPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SCROLL_STEPS),
            scroll_settle: Duration::from_secs(1),
            position_settle: Duration::from_secs(3),
            switch_settle: Duration::from_secs(5),
            switch_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(60),
        }
    }
}
