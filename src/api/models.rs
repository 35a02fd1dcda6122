//! Wire models for the follower and roster endpoints.

use crate::db::RosterEntry;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Body of the follower list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowsResponse {
    /// Total follower count reported by the API (may exceed `follows.len()`).
    #[serde(rename = "_total")]
    pub total: u64,
    #[serde(default)]
    pub follows: Vec<FollowEntry>,
}

/// One element of `follows`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowEntry {
    /// ISO-8601 follow timestamp.
    pub created_at: String,
    pub user: FollowUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub display_name: String,
}

/// Opaque user identifier. Some API versions send it as a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Text(String),
    Number(u64),
}

impl UserId {
    pub fn into_string(self) -> String {
        match self {
            UserId::Text(s) => s,
            UserId::Number(n) => n.to_string(),
        }
    }
}

/// Body of the chat roster endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChattersResponse {
    pub chatter_count: u64,
    /// Group name (e.g. `moderators`, `viewers`) to usernames.
    #[serde(default)]
    pub chatters: BTreeMap<String, Vec<String>>,
}

impl ChattersResponse {
    /// Flatten the groups into one entry per username.
    ///
    /// A username listed under several groups is kept once, under the first
    /// group in name order, so it is never credited twice in a cycle.
    pub fn entries(&self) -> Vec<RosterEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (group, names) in &self.chatters {
            for name in names {
                if seen.insert(name.as_str()) {
                    entries.push(RosterEntry::new(name.as_str(), group.as_str()));
                }
            }
        }
        entries
    }
}
