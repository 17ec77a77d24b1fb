// src/harvest/mod.rs

use std::fmt;

pub mod dedup;
pub mod pass;
pub mod row;

pub use dedup::DedupIndex;
pub use row::{parse_row, RawRowSnapshot, Record, RowRejection};

/// One selectable ranking dataset on the source page. Each view is an
/// independent row space: it gets its own output file and its own
/// [`DedupIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    CityCenter,
    MetroArea,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::CityCenter => "City Center",
            View::MetroArea => "Metro Area",
        }
    }

    /// Base name of the CSV file this view's harvest is appended to.
    pub fn file_name(&self) -> &'static str {
        match self {
            View::CityCenter => "tomtom_traffic_index_city_center.csv",
            View::MetroArea => "tomtom_traffic_index_metro_area.csv",
        }
    }

    /// CSS selector for the control that activates this view. The styled
    /// radio input itself does not take clicks; the wrapping label does.
    pub fn switch_selector(&self) -> &'static str {
        match self {
            View::CityCenter => "label:has(input[value='city'])",
            View::MetroArea => "label:has(input[value='metro'])",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
