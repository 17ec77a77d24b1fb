// src/surface/chrome.rs

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::debug;

use crate::config::Config;
use crate::harvest::{RawRowSnapshot, View};
use crate::surface::{NavigationError, Surface};

// The ranking table is a ReactVirtualized list: each visible row is an
// anchor whose ordered <span> children carry the cell texts.
const TABLE_SELECTOR: &str = "div.ReactVirtualized__Table";
const ROW_SELECTOR: &str = "div.ReactVirtualized__Table a";
const CELL_SELECTOR: &str = "span";

/// [`Surface`] implementation over a headless Chrome tab showing the
/// ranking page. The tab is owned for the whole run and driven strictly
/// sequentially; only snapshot reads happen during an extraction pass.
pub struct ChromeSurface {
    tab: Arc<Tab>,
    switch_timeout: Duration,
}

impl ChromeSurface {
    /// Launch a browser and navigate to the ranking page, waiting for the
    /// virtualized table to appear. Failure here is fatal to the run; the
    /// browser process is torn down when the returned handle drops,
    /// whichever way the run ends.
    pub fn open(cfg: &Config) -> Result<(Browser, Self)> {
        let browser = Browser::new(LaunchOptions {
            headless: cfg.headless,
            window_size: Some((1920, 1080)),
            ..Default::default()
        })
        .context("launching chrome")?;

        let tab = browser.new_tab().context("opening tab")?;
        tab.navigate_to(&cfg.ranking_url)
            .with_context(|| format!("navigating to {}", cfg.ranking_url))?;
        tab.wait_until_navigated().context("waiting for navigation")?;
        tab.wait_for_element_with_custom_timeout(TABLE_SELECTOR, cfg.page_timeout)
            .context("waiting for the ranking table to render")?;

        Ok((
            browser,
            Self {
                tab,
                switch_timeout: cfg.switch_timeout,
            },
        ))
    }
}

impl Surface for ChromeSurface {
    fn row_snapshots(&self) -> Result<Vec<RawRowSnapshot>> {
        let rows = self
            .tab
            .find_elements(ROW_SELECTOR)
            .context("enumerating rendered rows")?;

        let mut snapshots = Vec::with_capacity(rows.len());
        'rows: for row in rows {
            // The virtualization layer recycles nodes while we read; a row
            // that vanishes mid-read is skipped whole, never half-captured.
            let cells = match row.find_elements(CELL_SELECTOR) {
                Ok(cells) => cells,
                Err(e) => {
                    debug!("row vanished before cell lookup: {}", e);
                    continue;
                }
            };
            let mut values = Vec::with_capacity(cells.len());
            for cell in &cells {
                match cell.get_inner_text() {
                    Ok(text) => values.push(text),
                    Err(e) => {
                        debug!("cell vanished mid-read: {}", e);
                        continue 'rows;
                    }
                }
            }
            snapshots.push(RawRowSnapshot::new(values));
        }
        Ok(snapshots)
    }

    fn reset_to_top(&self) -> Result<()> {
        self.tab
            .evaluate("window.scrollTo(0, 0);", false)
            .context("scrolling to top")?;
        Ok(())
    }

    fn scroll_step(&self) -> Result<()> {
        self.tab.press_key("PageDown").context("pressing PageDown")?;
        Ok(())
    }

    fn activate_view(&self, view: View) -> Result<(), NavigationError> {
        let control = self
            .tab
            .wait_for_element_with_custom_timeout(view.switch_selector(), self.switch_timeout)
            .map_err(|_| NavigationError::NotActionable {
                view,
                timeout: self.switch_timeout,
            })?;
        control
            .click()
            .map_err(|cause| NavigationError::Interaction { view, cause })?;
        Ok(())
    }

    fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .context("capturing screenshot")
    }
}
