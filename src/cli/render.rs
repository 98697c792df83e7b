use std::io::{self, Write};

use crate::{
    twitter::{Trend, Tweet, User},
    utils::excerpt,
};

pub const USER_TWEETS_SHOWN: usize = 5;
pub const USER_TWEET_EXCERPT: usize = 100;
pub const TIMELINE_SHOWN: usize = 20;
pub const TIMELINE_EXCERPT: usize = 200;

pub fn search_results<W: Write>(out: &mut W, tweets: &[Tweet]) -> io::Result<()> {
    for (i, tweet) in tweets.iter().enumerate() {
        writeln!(out, "\n--- Tweet {} ---", i + 1)?;
        writeln!(out, "@{}: {}", tweet.user.screen_name, tweet.text)?;
        counts(out, tweet)?;
        writeln!(out, "  ID: {} | {}", tweet.id, tweet.created_at)?;
    }
    Ok(())
}

pub fn trends<W: Write>(out: &mut W, trends: &[Trend]) -> io::Result<()> {
    for (i, trend) in trends.iter().enumerate() {
        writeln!(out, "{}. {trend}", i + 1)?;
    }
    Ok(())
}

pub fn user_profile<W: Write>(out: &mut W, user: &User, tweets: &[Tweet]) -> io::Result<()> {
    writeln!(out, "{user}")?;
    writeln!(out, "\nRecent tweets:")?;
    for (i, tweet) in tweets.iter().take(USER_TWEETS_SHOWN).enumerate() {
        writeln!(
            out,
            "  {}. {}",
            i + 1,
            excerpt(&tweet.text, USER_TWEET_EXCERPT)
        )?;
    }
    Ok(())
}

pub fn posted<W: Write>(out: &mut W, tweet: &Tweet) -> io::Result<()> {
    writeln!(out, "Tweet posted! ID: {}", tweet.id)
}

pub fn timeline<W: Write>(out: &mut W, tweets: &[Tweet]) -> io::Result<()> {
    for (i, tweet) in tweets.iter().take(TIMELINE_SHOWN).enumerate() {
        writeln!(out, "\n--- {} ---", i + 1)?;
        writeln!(
            out,
            "@{}: {}",
            tweet.user.screen_name,
            excerpt(&tweet.text, TIMELINE_EXCERPT)
        )?;
        counts(out, tweet)?;
    }
    Ok(())
}

fn counts<W: Write>(out: &mut W, tweet: &Tweet) -> io::Result<()> {
    writeln!(
        out,
        "  Likes: {} | RT: {}",
        tweet.favorite_count, tweet.retweet_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(id: usize, text: &str) -> Tweet {
        Tweet {
            id: id.to_string(),
            text: text.to_string(),
            created_at: "Wed Oct 10 20:19:24 +0000 2018".to_string(),
            favorite_count: 4,
            retweet_count: 2,
            user: User {
                screen_name: "jack".to_string(),
                ..Default::default()
            },
        }
    }

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn search_result_layout() {
        let output = rendered(|out| search_results(out, &[tweet(7, "hello")]));

        assert_eq!(
            output,
            "\n--- Tweet 1 ---\n@jack: hello\n  Likes: 4 | RT: 2\n  ID: 7 | Wed Oct 10 20:19:24 +0000 2018\n"
        );
    }

    #[test]
    fn trends_are_numbered() {
        let list = [
            Trend {
                name: "#rust".into(),
            },
            Trend {
                name: "cargo".into(),
            },
        ];

        assert_eq!(rendered(|out| trends(out, &list)), "1. #rust\n2. cargo\n");
    }

    #[test]
    fn timeline_stops_at_twenty() {
        let tweets: Vec<Tweet> = (1..=25).map(|i| tweet(i, "post")).collect();
        let output = rendered(|out| timeline(out, &tweets));

        assert!(output.contains("--- 20 ---"));
        assert!(!output.contains("--- 21 ---"));
        assert_eq!(output.matches("@jack: ").count(), TIMELINE_SHOWN);
    }

    #[test]
    fn timeline_excerpt_boundary() {
        let exact = "x".repeat(200);
        let over = format!("{}TAIL", "y".repeat(200));
        let output = rendered(|out| timeline(out, &[tweet(1, &exact), tweet(2, &over)]));

        assert!(output.contains(&format!("@jack: {exact}\n")));
        assert!(output.contains(&format!("@jack: {}\n", "y".repeat(200))));
        assert!(!output.contains("TAIL"));
    }

    #[test]
    fn user_profile_shows_five_excerpts() {
        let user = User {
            id: "1".into(),
            name: "Jack".into(),
            screen_name: "jack".into(),
            description: "bio".into(),
            followers_count: 1,
            following_count: 2,
            statuses_count: 3,
        };
        let exact = "a".repeat(100);
        let over = format!("{}b", "a".repeat(100));
        let mut tweets = vec![tweet(1, &exact), tweet(2, &over)];
        tweets.extend((3..=8).map(|i| tweet(i, "short")));

        let output = rendered(|out| user_profile(out, &user, &tweets));

        assert!(output.starts_with("Name: Jack (@jack)\nBio: bio\n"));
        assert!(output.contains("\nRecent tweets:\n"));
        assert!(output.contains(&format!("  1. {exact}\n")));
        assert!(output.contains(&format!("  2. {exact}\n")));
        assert!(output.contains("  5. short\n"));
        assert!(!output.contains("  6. "));
    }

    #[test]
    fn posted_prints_id() {
        assert_eq!(
            rendered(|out| posted(out, &tweet(42, "hi"))),
            "Tweet posted! ID: 42\n"
        );
    }
}
