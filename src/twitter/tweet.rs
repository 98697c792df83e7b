use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value;

use crate::twitter::user::User;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TweetLegacy {
    id_str: String,
    full_text: String,
    created_at: String,
    favorite_count: u64,
    retweet_count: u64,
}

/// Which tab of the search page to query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchProduct {
    Top,
    #[default]
    Latest,
    Media,
}

impl SearchProduct {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchProduct::Top => "Top",
            SearchProduct::Latest => "Latest",
            SearchProduct::Media => "Media",
        }
    }
}

impl Tweet {
    /// Builds a tweet from a GraphQL `tweet_results.result` object.
    pub(crate) fn from_result(result: &Value) -> Option<Self> {
        let result = match result.get("__typename").and_then(Value::as_str) {
            Some("TweetWithVisibilityResults") => result.get("tweet")?,
            Some("TweetTombstone") | Some("TweetUnavailable") => return None,
            _ => result,
        };

        let legacy = TweetLegacy::deserialize(result.get("legacy")?).ok()?;
        let id = result
            .get("rest_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(legacy.id_str);
        if id.is_empty() {
            return None;
        }

        // Long posts keep the untruncated body in `note_tweet`.
        let text = result
            .pointer("/note_tweet/note_tweet_results/result/text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(legacy.full_text);

        let user = result
            .pointer("/core/user_results/result")
            .and_then(User::from_result)
            .unwrap_or_default();

        Some(Self {
            id,
            text,
            created_at: legacy.created_at,
            favorite_count: legacy.favorite_count,
            retweet_count: legacy.retweet_count,
            user,
        })
    }
}
