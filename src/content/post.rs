//! Post models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Reading speed used for the "N min read" estimate
pub const WORDS_PER_MINUTE: usize = 225;

/// The validated front matter of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Post title
    pub title: String,

    /// URL identifier, unique across posts
    pub slug: String,

    /// Publication date (calendar day, UTC)
    pub date: NaiveDate,

    /// One-line summary used in listings and feeds
    pub description: String,

    /// Tags in the order the author wrote them, never empty
    pub tags: Vec<String>,

    /// Path or URL of the cover image
    pub cover_image: String,
}

/// A post as shown in listings: the record plus derived fields, no body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(flatten)]
    pub record: PostRecord,

    /// Estimated minutes to read, at least 1
    pub reading_time_minutes: u32,
}

impl PostSummary {
    pub fn new(record: PostRecord, body: &str) -> Self {
        Self {
            record,
            reading_time_minutes: reading_time(body),
        }
    }

    /// Path of this post's page
    pub fn path(&self) -> String {
        format!("/posts/{}", self.slug)
    }
}

impl Deref for PostSummary {
    type Target = PostRecord;

    fn deref(&self) -> &PostRecord {
        &self.record
    }
}

/// A single post with its Markdown body and rendered HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,

    /// Raw Markdown body
    pub content: String,

    /// Rendered body
    pub html: String,
}

impl Deref for Post {
    type Target = PostSummary;

    fn deref(&self) -> &PostSummary {
        &self.summary
    }
}

/// Minutes needed to read `body`, rounded up, never below one
pub fn reading_time(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        "word ".repeat(n)
    }

    #[test]
    fn test_reading_time_boundaries() {
        assert_eq!(reading_time(&words(225)), 1);
        assert_eq!(reading_time(&words(226)), 2);
        assert_eq!(reading_time(&words(450)), 2);
        assert_eq!(reading_time(&words(451)), 3);
    }

    #[test]
    fn test_reading_time_floor() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("  \n\t  "), 1);
    }

    #[test]
    fn test_reading_time_collapses_whitespace() {
        let body = format!("{}\n\n\t{}", words(200), "more   words ".repeat(13));
        assert_eq!(reading_time(&body), 2);
    }

    #[test]
    fn test_summary_serializes_flat() {
        let record = PostRecord {
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description: "First post".to_string(),
            tags: vec!["intro".to_string()],
            cover_image: "/img.png".to_string(),
        };
        let summary = PostSummary::new(record, "a b c");
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["coverImage"], "/img.png");
        assert_eq!(json["readingTimeMinutes"], 1);
        assert_eq!(summary.path(), "/posts/hello");
    }
}
