// src/surface/mod.rs

use std::time::Duration;

use anyhow::Result;
use thiserror::Error;

use crate::harvest::{RawRowSnapshot, View};

pub mod chrome;

pub use chrome::ChromeSurface;

/// A failed transition between ranking views. Ends that view's harvest only;
/// the run keeps whatever earlier views produced.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("control for {view} not actionable within {timeout:?}")]
    NotActionable { view: View, timeout: Duration },
    #[error("activating {view} failed: {cause}")]
    Interaction { view: View, cause: anyhow::Error },
}

/// The live rendered ranking list, as far as the harvester is concerned.
///
/// The page virtualizes its rows, so `row_snapshots` only ever sees the
/// window near the viewport; the driver pages through the list with
/// `scroll_step` and reads again after each settle delay. Reads are
/// best-effort snapshots and the surface may repaint underneath them.
pub trait Surface {
    /// Capture the cell texts of every currently rendered row. Rows that
    /// disappear mid-read are skipped, not errors.
    fn row_snapshots(&self) -> Result<Vec<RawRowSnapshot>>;

    /// Return the list to its origin before the first scroll step.
    fn reset_to_top(&self) -> Result<()>;

    /// Issue one page-advance input.
    fn scroll_step(&self) -> Result<()>;

    /// Click the control that switches the page to `view`, waiting a bounded
    /// time for it to become actionable.
    fn activate_view(&self, view: View) -> Result<(), NavigationError>;

    /// Capture a PNG of the current page for post-mortem diagnostics.
    fn capture_screenshot(&self) -> Result<Vec<u8>>;
}
