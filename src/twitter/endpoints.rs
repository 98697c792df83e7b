use serde_json::{Value, json};

pub const GRAPHQL: &str = "https://x.com/i/api/graphql";
pub const GUIDE: &str = "https://x.com/i/api/2/guide.json";
pub const GUEST_ACTIVATE: &str = "https://api.x.com/1.1/guest/activate.json";
pub const ONBOARDING_TASK: &str = "https://api.x.com/1.1/onboarding/task.json";

pub const SEARCH_TIMELINE: &str = "flaR-PUMshxFWZWPNpq4zA/SearchTimeline";
pub const USER_BY_SCREEN_NAME: &str = "NimuplG1OB7Fd2btCLdBOw/UserByScreenName";
pub const USER_TWEETS: &str = "QWF3SzpHmykQHsQMixG0cg/UserTweets";
pub const CREATE_TWEET: &str = "SiM_cAu83R0wnrpmKQQSEw/CreateTweet";
pub const HOME_TIMELINE: &str = "-X_hcgQzmHGl29-UXxz4sw/HomeTimeline";

pub fn graphql_url(operation: &str) -> String {
    format!("{GRAPHQL}/{operation}")
}

/// `queryId` half of an operation path.
pub fn query_id(operation: &str) -> &str {
    operation.split('/').next().unwrap_or(operation)
}

pub fn features() -> Value {
    json!({
        "creator_subscriptions_tweet_preview_api_enabled": true,
        "c9s_tweet_anatomy_moderator_badge_enabled": true,
        "tweetypie_unmention_optimization_enabled": true,
        "responsive_web_edit_tweet_api_enabled": true,
        "graphql_is_translatable_rweb_tweet_is_translatable_enabled": true,
        "view_counts_everywhere_api_enabled": true,
        "longform_notetweets_consumption_enabled": true,
        "responsive_web_twitter_article_tweet_consumption_enabled": true,
        "tweet_awards_web_tipping_enabled": false,
        "longform_notetweets_rich_text_read_enabled": true,
        "longform_notetweets_inline_media_enabled": true,
        "rweb_video_timestamps_enabled": true,
        "responsive_web_graphql_exclude_directive_enabled": true,
        "verified_phone_label_enabled": false,
        "freedom_of_speech_not_reach_fetch_enabled": true,
        "standardized_nudges_misinfo": true,
        "tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled": true,
        "responsive_web_media_download_video_enabled": false,
        "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
        "responsive_web_graphql_timeline_navigation_enabled": true,
        "responsive_web_enhance_cards_enabled": false,
        "hidden_profile_likes_enabled": true,
        "hidden_profile_subscriptions_enabled": true,
        "highlights_tweets_tab_ui_enabled": true,
        "subscriptions_verification_info_verified_since_enabled": true,
        "subscriptions_verification_info_is_identity_verified_enabled": true,
        "rweb_tipjar_consumption_enabled": true,
        "communities_web_enable_tweet_community_results_fetch": true,
        "articles_preview_enabled": true,
        "creator_subscriptions_quote_tweet_preview_enabled": false
    })
}
