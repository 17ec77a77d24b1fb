// src/harvest/row.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of cells a rendered row must carry: rank, world rank,
/// city, country, average travel time, change, congestion level, time lost.
pub const MIN_FIELDS: usize = 8;

/// Ordered cell texts captured from one rendered row at one instant.
/// Ephemeral; discarded after parsing.
#[derive(Debug, Clone)]
pub struct RawRowSnapshot {
    cells: Vec<String>,
}

impl RawRowSnapshot {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One harmonized ranking row. All fields stay as trimmed strings; numeric
/// coercion happens downstream in the warehouse, not here.
///
/// The serde renames give the exact CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Rank by filter")]
    pub rank: String,
    #[serde(rename = "World rank")]
    pub world_rank: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Average travel time per 6 mi")]
    pub average_travel_time: String,
    #[serde(rename = "Change from 2023")]
    pub change_from_prior: String,
    #[serde(rename = "Congestion level %")]
    pub congestion_level_percent: String,
    #[serde(rename = "Time lost per year at rush hours")]
    pub time_lost_per_year: String,
}

/// Why a snapshot was dropped. A rejection is a value, never an abort: the
/// surrounding extraction pass logs it and moves on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowRejection {
    #[error("row has {got} cells, expected at least 8")]
    TooFewFields { got: usize },
}

// Virtualized rows sometimes render the numeric rank into the city cell,
// e.g. "12, Chicago". The prefix varies between scroll windows, so it must
// be stripped before the city can serve as an identity key.
static RANK_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s*,?\s*").expect("rank prefix pattern should be valid"));

/// Build the identity key for a row: `"<city>, <country>"` with any leading
/// rank digits and stray punctuation stripped from the front.
pub fn normalize_city(city: &str, country: &str) -> String {
    let country = country.trim();
    let combined = if country.is_empty() {
        city.trim().to_string()
    } else {
        format!("{}, {}", city.trim(), country)
    };
    RANK_PREFIX.replace(&combined, "").trim().to_string()
}

/// Parse one rendered-row snapshot into a [`Record`]. Pure; no side effects.
pub fn parse_row(snapshot: &RawRowSnapshot) -> Result<Record, RowRejection> {
    let cells = &snapshot.cells;
    if cells.len() < MIN_FIELDS {
        return Err(RowRejection::TooFewFields { got: cells.len() });
    }

    Ok(Record {
        rank: cells[0].trim().to_string(),
        world_rank: cells[1].trim().to_string(),
        city: normalize_city(&cells[2], &cells[3]),
        average_travel_time: cells[4].trim().to_string(),
        change_from_prior: cells[5].trim().to_string(),
        congestion_level_percent: cells[6].trim().to_string(),
        time_lost_per_year: cells[7].trim().to_string(),
    })
}
