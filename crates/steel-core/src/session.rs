//! Per-board name list and pick history.

use crate::roster::Roster;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted record for one board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    #[serde(default)]
    pub names: Vec<String>,
    /// Names not yet picked. Missing means "all of them".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_names: Option<Vec<String>>,
    #[serde(default)]
    pub last_winner: Option<String>,
}

impl BoardData {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Whether the wheel can be spun, and what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No names configured at all.
    Empty,
    /// Every name has been picked.
    Exhausted,
    Ready { active: usize, total: usize },
}

impl SessionStatus {
    pub fn can_spin(self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Text for the spin button.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Exhausted => "Done",
            _ => "Spin",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("No names - click Edit"),
            Self::Exhausted => f.write_str("Reset to spin again"),
            Self::Ready { active, total } => write!(f, "{}/{}", active, total),
        }
    }
}

/// Working state of a board: the full roster, who is still in the draw,
/// and the most recent pick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSession {
    names: Vec<String>,
    active_names: Vec<String>,
    last_winner: Option<String>,
}

impl BoardSession {
    /// Fresh session with every name active.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            active_names: names.clone(),
            names,
            last_winner: None,
        }
    }

    /// Build a session from stored data.
    ///
    /// Returns the session and whether it had to be repaired (and so should
    /// be saved back): an empty active list with names present starts a new
    /// round.
    pub fn from_data(data: BoardData) -> (Self, bool) {
        let active_names = data.active_names.unwrap_or_else(|| data.names.clone());
        let mut session = Self {
            names: data.names,
            active_names,
            last_winner: data.last_winner,
        };
        let repaired = session.active_names.is_empty() && !session.names.is_empty();
        if repaired {
            session.active_names = session.names.clone();
        }
        (session, repaired)
    }

    pub fn to_data(&self) -> BoardData {
        BoardData {
            names: self.names.clone(),
            active_names: Some(self.active_names.clone()),
            last_winner: self.last_winner.clone(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn active_names(&self) -> &[String] {
        &self.active_names
    }

    /// The names still in the draw, as a wheel roster.
    pub fn active_roster(&self) -> Roster {
        Roster::from(self.active_names.clone())
    }

    pub fn last_winner(&self) -> Option<&str> {
        self.last_winner.as_deref()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_names.iter().any(|n| n == name)
    }

    /// Remember `winner` and take it out of the draw.
    pub fn record_winner(&mut self, winner: &str) {
        self.last_winner = Some(winner.to_string());
        self.active_names.retain(|n| n != winner);
    }

    /// Flip a name in or out of the draw.
    ///
    /// Returns the new active state, or `None` if `name` is not on the board.
    pub fn toggle_name(&mut self, name: &str) -> Option<bool> {
        if !self.names.iter().any(|n| n == name) {
            return None;
        }
        if self.is_active(name) {
            self.active_names.retain(|n| n != name);
            Some(false)
        } else {
            self.active_names.push(name.to_string());
            Some(true)
        }
    }

    /// Put every name back in the draw and forget the last pick.
    pub fn reset(&mut self) {
        self.active_names = self.names.clone();
        self.last_winner = None;
    }

    /// Replace the roster from newline-separated text.
    ///
    /// A changed roster starts a new round. Returns whether it changed.
    pub fn replace_names(&mut self, text: &str) -> bool {
        let names = Roster::parse_lines(text).into_vec();
        let changed = names != self.names;
        if changed {
            self.active_names = names.clone();
        }
        self.names = names;
        changed
    }

    /// Names as newline-separated text, for editing.
    pub fn names_text(&self) -> String {
        self.names.join("\n")
    }

    pub fn status(&self) -> SessionStatus {
        if self.names.is_empty() {
            SessionStatus::Empty
        } else if self.active_names.is_empty() {
            SessionStatus::Exhausted
        } else {
            SessionStatus::Ready {
                active: self.active_names.len(),
                total: self.names.len(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_active_defaults_to_names() {
        let data = BoardData::from_json(r#"{"names":["A","B"]}"#).unwrap();
        let (session, repaired) = BoardSession::from_data(data);
        assert!(!repaired);
        assert_eq!(session.active_names(), &["A", "B"]);
        assert_eq!(session.last_winner(), None);
    }

    #[test]
    fn test_empty_active_is_repaired() {
        let data = BoardData {
            names: names(&["A", "B"]),
            active_names: Some(Vec::new()),
            last_winner: Some("B".into()),
        };
        let (session, repaired) = BoardSession::from_data(data);
        assert!(repaired);
        assert_eq!(session.active_names(), &["A", "B"]);
        assert_eq!(session.last_winner(), Some("B"));
    }

    #[test]
    fn test_empty_board_not_repaired() {
        let (session, repaired) = BoardSession::from_data(BoardData::default());
        assert!(!repaired);
        assert_eq!(session.status(), SessionStatus::Empty);
    }

    #[test]
    fn test_record_winner_removes_all_copies() {
        let mut session = BoardSession::new(names(&["A", "B", "A", "C"]));
        session.record_winner("A");
        assert_eq!(session.active_names(), &["B", "C"]);
        assert_eq!(session.last_winner(), Some("A"));
        assert_eq!(session.names().len(), 4);
    }

    #[test]
    fn test_toggle_name() {
        let mut session = BoardSession::new(names(&["A", "B"]));
        assert_eq!(session.toggle_name("A"), Some(false));
        assert_eq!(session.active_names(), &["B"]);
        assert_eq!(session.toggle_name("A"), Some(true));
        assert_eq!(session.active_names(), &["B", "A"]);
        assert_eq!(session.toggle_name("Z"), None);
    }

    #[test]
    fn test_reset_clears_winner() {
        let mut session = BoardSession::new(names(&["A", "B"]));
        session.record_winner("B");
        session.reset();
        assert_eq!(session.active_names(), &["A", "B"]);
        assert_eq!(session.last_winner(), None);
    }

    #[test]
    fn test_replace_names_resets_round_when_changed() {
        let mut session = BoardSession::new(names(&["A", "B"]));
        session.record_winner("A");

        assert!(!session.replace_names("A\n B \n"));
        assert_eq!(session.active_names(), &["B"]);

        assert!(session.replace_names("A\nB\nC"));
        assert_eq!(session.active_names(), &["A", "B", "C"]);
        assert_eq!(session.names_text(), "A\nB\nC");
    }

    #[test]
    fn test_status_messages() {
        let mut session = BoardSession::new(names(&["A", "B", "C"]));
        session.record_winner("C");
        let status = session.status();
        assert!(status.can_spin());
        assert_eq!(status.to_string(), "2/3");
        assert_eq!(status.button_label(), "Spin");

        session.record_winner("A");
        session.record_winner("B");
        let status = session.status();
        assert_eq!(status, SessionStatus::Exhausted);
        assert!(!status.can_spin());
        assert_eq!(status.button_label(), "Done");
        assert_eq!(status.to_string(), "Reset to spin again");

        assert_eq!(BoardSession::default().status().to_string(), "No names - click Edit");
    }

    #[test]
    fn test_data_json_field_names() {
        let mut session = BoardSession::new(names(&["A"]));
        session.record_winner("A");
        let json = session.to_data().to_json().unwrap();
        assert!(json.contains("\"activeNames\":[]"));
        assert!(json.contains("\"lastWinner\":\"A\""));
    }
}
