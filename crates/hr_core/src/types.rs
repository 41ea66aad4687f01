use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One synthetic article. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub rank: u32,
    pub title: String,
    pub source: String,
    pub summary: String,
    pub date: NaiveDate,
    pub views: u64,
    pub shares: u64,
    pub comments: u64,
    pub category: String,
    pub is_current: bool,
    /// Age in days relative to the reference time the batch was generated at.
    #[serde(skip)]
    pub days_ago: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_views: u64,
    pub total_shares: u64,
    pub total_comments: u64,
    #[serde(rename = "current_news")]
    pub current_count: usize,
    pub avg_views: u64,
    pub top_category: String,
    pub top_source: String,
}

/// Reduced view of a record used in the `top_5_news` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopNewsItem {
    pub rank: u32,
    pub title: String,
    pub source: String,
    pub date: NaiveDate,
    pub views: u64,
    pub category: String,
}

impl From<&ArticleRecord> for TopNewsItem {
    fn from(record: &ArticleRecord) -> Self {
        Self {
            rank: record.rank,
            title: record.title.clone(),
            source: record.source.clone(),
            date: record.date,
            views: record.views,
            category: record.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsBatch {
    pub records: Vec<ArticleRecord>,
    pub summary: BatchSummary,
}

/// Body of `GET /api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPayload {
    pub success: bool,
    pub timestamp: String,
    pub news_count: usize,
    pub stats: BatchSummary,
    pub top_5_news: Vec<TopNewsItem>,
}

/// Millisecond precision, `Z` suffix: `2024-01-31T00:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
