pub mod endpoints;
pub mod login;
pub mod timeline;
pub mod trend;
pub mod tweet;
pub mod user;

use serde_json::{Value, json};

use crate::{
    api::client::{ApiClient, HttpClient},
    config::Config,
    error::{ApiError, Result},
    session::CookieBundle,
};

pub use trend::Trend;
pub use tweet::{SearchProduct, Tweet};
pub use user::User;

const USER_TWEETS_PAGE: usize = 40;
const TIMELINE_PAGE: usize = 20;

/// Everything the command dispatcher needs from a Twitter client.
#[allow(async_fn_in_trait)]
pub trait TwitterApi {
    async fn login(&mut self, config: &Config) -> Result<()>;

    fn load_cookies(&mut self, bundle: &CookieBundle);

    fn save_cookies(&self) -> CookieBundle;

    async fn search_tweet(
        &self,
        query: &str,
        product: SearchProduct,
        count: usize,
    ) -> Result<Vec<Tweet>>;

    async fn get_trends(&self, category: &str) -> Result<Vec<Trend>>;

    async fn get_user_by_screen_name(&self, screen_name: &str) -> Result<User>;

    async fn get_user_tweets(&self, user: &User) -> Result<Vec<Tweet>>;

    async fn create_tweet(&self, text: &str) -> Result<Tweet>;

    async fn get_timeline(&self) -> Result<Vec<Tweet>>;
}

/// Cookie-session client for the x.com web API.
#[derive(Debug, Clone)]
pub struct XClient<H = ApiClient> {
    http: H,
}

impl XClient {
    pub fn new(language: &str) -> Result<Self> {
        Ok(Self::with_transport(ApiClient::new(language)?))
    }
}

impl<H: HttpClient> XClient<H> {
    pub fn with_transport(http: H) -> Self {
        Self { http }
    }

    async fn graphql_get(&self, operation: &str, variables: Value) -> Result<Value> {
        let query = [
            ("variables", variables.to_string()),
            ("features", endpoints::features().to_string()),
        ];
        let json = self
            .http
            .get_json(&endpoints::graphql_url(operation), &query)
            .await?;
        Ok(json)
    }

    async fn graphql_post(&self, operation: &str, variables: Value) -> Result<Value> {
        let body = json!({
            "variables": variables,
            "features": endpoints::features(),
            "queryId": endpoints::query_id(operation),
        });
        let json = self
            .http
            .post_json(&endpoints::graphql_url(operation), &body)
            .await?;
        Ok(json)
    }
}

impl<H: HttpClient> TwitterApi for XClient<H> {
    async fn login(&mut self, config: &Config) -> Result<()> {
        login::run(&mut self.http, config).await?;
        Ok(())
    }

    fn load_cookies(&mut self, bundle: &CookieBundle) {
        self.http.import_cookies(bundle);
    }

    fn save_cookies(&self) -> CookieBundle {
        self.http.export_cookies()
    }

    async fn search_tweet(
        &self,
        query: &str,
        product: SearchProduct,
        count: usize,
    ) -> Result<Vec<Tweet>> {
        let variables = json!({
            "rawQuery": query,
            "count": count,
            "querySource": "typed_query",
            "product": product.as_str(),
        });
        let json = self
            .graphql_get(endpoints::SEARCH_TIMELINE, variables)
            .await?;
        let instructions = timeline::instructions(
            &json,
            &["/data/search_by_raw_query/search_timeline/timeline/instructions"],
        )?;

        Ok(timeline::tweets(instructions))
    }

    async fn get_trends(&self, category: &str) -> Result<Vec<Trend>> {
        let query = [
            ("count", "20".to_string()),
            ("include_page_configuration", "false".to_string()),
            ("initial_tab_id", category.to_string()),
        ];
        let json = self.http.get_json(endpoints::GUIDE, &query).await?;

        Ok(trend::parse_guide(&json))
    }

    async fn get_user_by_screen_name(&self, screen_name: &str) -> Result<User> {
        let variables = json!({
            "screen_name": screen_name,
            "withSafetyModeUserFields": false,
        });
        let json = self
            .graphql_get(endpoints::USER_BY_SCREEN_NAME, variables)
            .await?;

        let user = json
            .pointer("/data/user/result")
            .and_then(User::from_result)
            .ok_or_else(|| ApiError::NotFound {
                what: format!("user @{screen_name}"),
            })?;

        Ok(user)
    }

    async fn get_user_tweets(&self, user: &User) -> Result<Vec<Tweet>> {
        let variables = json!({
            "userId": user.id,
            "count": USER_TWEETS_PAGE,
            "includePromotedContent": true,
            "withQuickPromoteEligibilityTweetFields": true,
            "withVoice": true,
            "withV2Timeline": true,
        });
        let json = self.graphql_get(endpoints::USER_TWEETS, variables).await?;
        let instructions = timeline::instructions(
            &json,
            &[
                "/data/user/result/timeline_v2/timeline/instructions",
                "/data/user/result/timeline/timeline/instructions",
            ],
        )?;

        Ok(timeline::tweets(instructions))
    }

    async fn create_tweet(&self, text: &str) -> Result<Tweet> {
        let variables = json!({
            "tweet_text": text,
            "dark_request": false,
            "media": {"media_entities": [], "possibly_sensitive": false},
            "semantic_annotation_ids": [],
        });
        let json = self
            .graphql_post(endpoints::CREATE_TWEET, variables)
            .await?;

        let tweet = json
            .pointer("/data/create_tweet/tweet_results/result")
            .and_then(Tweet::from_result)
            .ok_or_else(|| ApiError::shape("created tweet missing from CreateTweet response"))?;

        Ok(tweet)
    }

    async fn get_timeline(&self) -> Result<Vec<Tweet>> {
        let variables = json!({
            "count": TIMELINE_PAGE,
            "includePromotedContent": true,
            "latestControlAvailable": true,
            "requestContext": "launch",
            "withCommunity": true,
        });
        let json = self
            .graphql_post(endpoints::HOME_TIMELINE, variables)
            .await?;
        let instructions =
            timeline::instructions(&json, &["/data/home/home_timeline_urt/instructions"])?;

        Ok(timeline::tweets(instructions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::client::mock::MockHttp, twitter::tweet::tests::tweet_result};

    fn entries(results: &[Value]) -> Value {
        let entries: Vec<Value> = results
            .iter()
            .map(|result| {
                json!({"entryId": "tweet", "content": {"itemContent": {"tweet_results": {"result": result}}}})
            })
            .collect();
        json!([{"type": "TimelineAddEntries", "entries": entries}])
    }

    fn variables(http: &MockHttp) -> Value {
        let request = http.request(0);
        match request.method {
            "GET" => serde_json::from_str(&request.query["variables"]).unwrap(),
            _ => request.body["variables"].clone(),
        }
    }

    fn client(reply: Value) -> XClient<MockHttp> {
        XClient::with_transport(MockHttp::default().reply(reply))
    }

    #[test]
    fn client_restores_saved_cookies() {
        let mut client = XClient::new("en-US").unwrap();
        let mut bundle = CookieBundle::default();
        bundle.insert("auth_token", "token");
        bundle.insert("ct0", "csrf");

        client.load_cookies(&bundle);

        assert_eq!(client.save_cookies(), bundle);
    }

    #[tokio::test]
    async fn search_reads_search_timeline() {
        let client = client(json!({"data": {"search_by_raw_query": {"search_timeline": {
            "timeline": {"instructions": entries(&[
                tweet_result("1", "rust is fun", "ferris"),
                tweet_result("2", "so is tokio", "carl"),
            ])}
        }}}}));

        let tweets = client
            .search_tweet("foo bar", SearchProduct::Latest, 20)
            .await
            .unwrap();

        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[1].user.screen_name, "carl");

        let request = client.http.request(0);
        assert_eq!(request.method, "GET");
        assert!(request.url.ends_with("/SearchTimeline"));
        assert!(request.query.contains_key("features"));
        let variables = variables(&client.http);
        assert_eq!(variables["rawQuery"], "foo bar");
        assert_eq!(variables["product"], "Latest");
        assert_eq!(variables["count"], 20);
    }

    #[tokio::test]
    async fn trends_read_guide() {
        let client = client(json!({"timeline": {"instructions": [
            {"addEntries": {"entries": [
                {"content": {"timelineModule": {"items": [
                    {"item": {"content": {"trend": {"name": "#RustLang"}}}},
                    {"item": {"content": {"trend": {"name": "Ferris"}}}}
                ]}}}
            ]}}
        ]}}));

        let trends = client.get_trends("trending").await.unwrap();

        let names: Vec<&str> = trends.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["#RustLang", "Ferris"]);

        let request = client.http.request(0);
        assert_eq!(request.url, endpoints::GUIDE);
        assert_eq!(request.query["initial_tab_id"], "trending");
        assert_eq!(request.query["count"], "20");
    }

    #[tokio::test]
    async fn user_lookup_reads_user_result() {
        let client = client(json!({"data": {"user": {"result": {
            "__typename": "User",
            "rest_id": "12",
            "legacy": {"name": "jack", "screen_name": "jack", "followers_count": 7}
        }}}}));

        let user = client.get_user_by_screen_name("jack").await.unwrap();

        assert_eq!(user.id, "12");
        assert_eq!(user.followers_count, 7);
        assert!(client.http.request(0).url.ends_with("/UserByScreenName"));
        assert_eq!(variables(&client.http)["screen_name"], "jack");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let client = client(json!({"data": {}}));

        let err = client.get_user_by_screen_name("nobody").await.unwrap_err();

        assert!(matches!(
            err,
            crate::error::AppError::Api(ApiError::NotFound { what }) if what == "user @nobody"
        ));
    }

    #[tokio::test]
    async fn user_tweets_read_either_timeline_path() {
        let user = User {
            id: "12".to_string(),
            ..User::default()
        };
        let v2 = client(json!({"data": {"user": {"result": {
            "timeline_v2": {"timeline": {"instructions": entries(&[tweet_result("5", "v2", "jack")])}}
        }}}}));
        let v1 = client(json!({"data": {"user": {"result": {
            "timeline": {"timeline": {"instructions": entries(&[tweet_result("6", "v1", "jack")])}}
        }}}}));

        assert_eq!(v2.get_user_tweets(&user).await.unwrap()[0].id, "5");
        assert_eq!(v1.get_user_tweets(&user).await.unwrap()[0].id, "6");
        assert!(v2.http.request(0).url.ends_with("/UserTweets"));
        assert_eq!(variables(&v2.http)["userId"], "12");
    }

    #[tokio::test]
    async fn create_tweet_posts_text_and_reads_result() {
        let client = client(json!({"data": {"create_tweet": {"tweet_results": {
            "result": tweet_result("777", "hello", "me")
        }}}}));

        let tweet = client.create_tweet("hello").await.unwrap();

        assert_eq!(tweet.id, "777");
        let request = client.http.request(0);
        assert_eq!(request.method, "POST");
        assert!(request.url.ends_with("/CreateTweet"));
        assert_eq!(request.body["queryId"], endpoints::query_id(endpoints::CREATE_TWEET));
        assert_eq!(variables(&client.http)["tweet_text"], "hello");
    }

    #[tokio::test]
    async fn create_tweet_without_result_is_a_shape_error() {
        let client = client(json!({"data": {"create_tweet": {"tweet_results": {}}}}));

        let err = client.create_tweet("hello").await.unwrap_err();

        assert!(matches!(
            err,
            crate::error::AppError::Api(ApiError::UnexpectedShape { .. })
        ));
    }

    #[tokio::test]
    async fn timeline_posts_home_timeline() {
        let client = client(json!({"data": {"home": {"home_timeline_urt": {
            "instructions": entries(&[tweet_result("9", "gm", "friend")])
        }}}}));

        let tweets = client.get_timeline().await.unwrap();

        assert_eq!(tweets[0].text, "gm");
        let request = client.http.request(0);
        assert_eq!(request.method, "POST");
        assert!(request.url.ends_with("/HomeTimeline"));
        assert_eq!(variables(&client.http)["count"], 20);
    }

    #[tokio::test]
    async fn login_goes_through_the_transport() {
        let mut client = XClient::with_transport(
            MockHttp::default()
                .reply(json!({"guest_token": "1"}))
                .reply_setting_cookie(
                    json!({"flow_token": "t", "subtasks": [{"subtask_id": "LoginSuccessSubtask"}]}),
                    "auth_token",
                    "secret",
                ),
        );

        client.login(&Config::template()).await.unwrap();

        assert_eq!(client.save_cookies().get("auth_token"), Some("secret"));
    }
}
