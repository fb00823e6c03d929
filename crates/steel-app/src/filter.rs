//! Choosing which Jira quick filter to press for a winner.

use std::fmt;

/// A quick filter button as found on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub label: String,
    pub pressed: bool,
}

impl FilterButton {
    pub fn new(label: impl Into<String>, pressed: bool) -> Self {
        Self {
            label: label.into(),
            pressed,
        }
    }
}

/// Result shown to the user after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Selected(String),
    NotFound(String),
    NoButtons,
}

impl fmt::Display for FilterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected(name) => write!(f, "Selected: {}", name),
            Self::NotFound(name) => write!(f, "Could not find filter for \"{}\"", name),
            Self::NoButtons => f.write_str("Could not find filter buttons on this board"),
        }
    }
}

/// Buttons to click, by index into the scanned button list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPlan {
    /// Currently pressed buttons, clicked first to clear them.
    pub deselect: Vec<usize>,
    /// Button matching the winner, clicked afterwards.
    pub select: Option<usize>,
    pub outcome: FilterOutcome,
}

/// Plan the clicks that leave only `name`'s filter active.
///
/// Labels match after trimming, ignoring case.
pub fn plan_filter(buttons: &[FilterButton], name: &str) -> FilterPlan {
    if buttons.is_empty() {
        return FilterPlan {
            deselect: Vec::new(),
            select: None,
            outcome: FilterOutcome::NoButtons,
        };
    }

    let deselect = buttons
        .iter()
        .enumerate()
        .filter(|(_, b)| b.pressed)
        .map(|(i, _)| i)
        .collect();

    let wanted = name.to_lowercase();
    let select = buttons
        .iter()
        .position(|b| b.label.trim().to_lowercase() == wanted);

    let outcome = match select {
        Some(_) => FilterOutcome::Selected(name.to_string()),
        None => FilterOutcome::NotFound(name.to_string()),
    };

    FilterPlan {
        deselect,
        select,
        outcome,
    }
}
