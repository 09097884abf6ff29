//! People-search card types.
//!
//! A network-search send produces a transient card of personnel
//! candidates bound to the user message that triggered it. Cards are not
//! persisted and are cleared whenever the active session changes.

use serde::{Deserialize, Serialize};

/// A read-only projection of one backend people-search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A people-search result card keyed by the id of the user message that
/// triggered it.
///
/// Created in the loading state when the network send is dispatched and
/// populated when the independent people-search call resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleCard {
    /// Card identifier, distinct from the parent message id.
    pub id: String,
    /// The query text the card answers.
    pub query: String,
    /// Candidate results; empty while loading or when nothing matched.
    pub items: Vec<Candidate>,
    /// Optional narrative summary returned alongside the candidates.
    pub narrative: Option<String>,
    /// True from creation until the people-search call resolves.
    pub is_loading: bool,
}

impl PeopleCard {
    /// Creates a card in the loading state.
    pub fn loading(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            items: Vec::new(),
            narrative: None,
            is_loading: true,
        }
    }
}
