use serde_json::Value;

use crate::{error::ApiError, twitter::tweet::Tweet};

/// Follows the first pointer in `paths` that resolves to an instructions array.
pub(crate) fn instructions<'a>(json: &'a Value, paths: &[&str]) -> Result<&'a [Value], ApiError> {
    paths
        .iter()
        .find_map(|path| json.pointer(path).and_then(Value::as_array))
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::shape(format!("timeline instructions missing at {}", paths[0])))
}

/// Tweets from every `TimelineAddEntries` instruction, in order. Cursors and
/// promoted modules without tweets are skipped.
pub(crate) fn tweets(instructions: &[Value]) -> Vec<Tweet> {
    instructions
        .iter()
        .filter(|instruction| {
            instruction.get("type").and_then(Value::as_str) == Some("TimelineAddEntries")
        })
        .filter_map(|instruction| instruction.get("entries").and_then(Value::as_array))
        .flatten()
        .flat_map(entry_tweets)
        .collect()
}

fn entry_tweets(entry: &Value) -> Vec<Tweet> {
    let Some(content) = entry.get("content") else {
        return vec![];
    };

    if let Some(result) = content.pointer("/itemContent/tweet_results/result") {
        return Tweet::from_result(result).into_iter().collect();
    }

    // Conversation modules carry several tweets.
    content
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.pointer("/item/itemContent/tweet_results/result"))
                .filter_map(Tweet::from_result)
                .collect()
        })
        .unwrap_or_default()
}
