use std::fmt::Display;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub screen_name: String,
    pub description: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub statuses_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserLegacy {
    name: String,
    screen_name: String,
    description: String,
    followers_count: u64,
    friends_count: u64,
    statuses_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserCore {
    name: String,
    screen_name: String,
}

impl User {
    /// Builds a user from a GraphQL `user_results.result` object.
    pub(crate) fn from_result(result: &Value) -> Option<Self> {
        if result.get("__typename").and_then(Value::as_str) == Some("UserUnavailable") {
            return None;
        }

        let id = result.get("rest_id")?.as_str()?.to_string();
        let legacy: UserLegacy = result
            .get("legacy")
            .and_then(|legacy| UserLegacy::deserialize(legacy).ok())
            .unwrap_or_default();
        // Newer payloads moved the handle out of `legacy`.
        let core: UserCore = result
            .get("core")
            .and_then(|core| UserCore::deserialize(core).ok())
            .unwrap_or_default();

        Some(Self {
            id,
            name: pick(legacy.name, core.name),
            screen_name: pick(legacy.screen_name, core.screen_name),
            description: legacy.description,
            followers_count: legacy.followers_count,
            following_count: legacy.friends_count,
            statuses_count: legacy.statuses_count,
        })
    }
}

fn pick(preferred: String, fallback: String) -> String {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name: {} (@{})", self.name, self.screen_name)?;
        writeln!(f, "Bio: {}", self.description)?;
        writeln!(f, "Followers: {}", self.followers_count)?;
        writeln!(f, "Following: {}", self.following_count)?;
        write!(f, "Tweets: {}", self.statuses_count)
    }
}
