use chrono::{DateTime, Datelike, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Preset, TopLabels};
use crate::types::{iso_timestamp, ArticleRecord, BatchSummary, NewsBatch, NewsPayload, TopNewsItem};
use crate::{Error, Result};

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const TOP_N: usize = 5;

/// Articles are dated up to this many days before the reference time (exclusive).
pub const MAX_AGE_DAYS: u32 = 30;
/// Articles at most this old are flagged `is_current`.
pub const CURRENT_WINDOW_DAYS: u32 = 7;

const VIEWS_CEILING: u64 = 50_000;
const VIEWS_FLOOR: u64 = 3_000;
const VIEWS_DECAY_PER_DAY: u64 = 1_000;
const VIEWS_JITTER: u64 = 5_000;
const MIN_SHARES: u64 = 30;
const MIN_COMMENTS: u64 = 5;

/// Lowest view count an article of the given age can get.
pub fn views_floor(days_ago: u32) -> u64 {
    VIEWS_CEILING
        .saturating_sub(u64::from(days_ago) * VIEWS_DECAY_PER_DAY)
        .max(VIEWS_FLOOR)
}

pub fn shares_for(views: u64) -> u64 {
    (views / 100).max(MIN_SHARES)
}

pub fn comments_for(views: u64) -> u64 {
    (views / 500).max(MIN_COMMENTS)
}

/// Generates `batch_size` synthetic articles dated relative to `reference`
/// and summarizes them.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    batch_size: usize,
    reference: DateTime<Utc>,
    preset: &Preset,
) -> Result<NewsBatch> {
    if batch_size == 0 {
        return Err(Error::invalid_input("batch size must be positive"));
    }
    preset.validate()?;

    let catalog = &preset.catalog;
    let year = reference.year();
    let mut records = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        let days_ago = rng.gen_range(0..MAX_AGE_DAYS);
        let date = reference
            .checked_sub_signed(Duration::days(i64::from(days_ago)))
            .ok_or_else(|| {
                Error::invalid_input(format!("reference time {} is too early to date articles", reference))
            })?
            .date_naive();

        let source = pick(rng, &catalog.sources, "sources")?;
        let category = pick(rng, &catalog.categories, "categories")?;
        let topic = pick(rng, &catalog.topics, "topics")?;

        let views = views_floor(days_ago) + rng.gen_range(0..VIEWS_JITTER);

        records.push(ArticleRecord {
            rank: (i + 1) as u32,
            title: preset.templates.render_title(topic, year),
            source: source.clone(),
            summary: preset.templates.render_summary(topic, year),
            date,
            views,
            shares: shares_for(views),
            comments: comments_for(views),
            category: category.clone(),
            is_current: days_ago <= CURRENT_WINDOW_DAYS,
            days_ago,
        });
    }

    let summary = summarize(&records, &preset.top_labels);
    tracing::debug!(
        preset = %preset.name,
        count = records.len(),
        total_views = summary.total_views,
        "generated news batch"
    );

    Ok(NewsBatch { records, summary })
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &'a [String], field: &str) -> Result<&'a String> {
    values
        .choose(rng)
        .ok_or_else(|| Error::invalid_input(format!("catalog `{}` must not be empty", field)))
}

/// Aggregates a batch. An empty slice yields zeroed totals.
pub fn summarize(records: &[ArticleRecord], labels: &TopLabels) -> BatchSummary {
    let total_views: u64 = records.iter().map(|r| r.views).sum();
    let total_shares: u64 = records.iter().map(|r| r.shares).sum();
    let total_comments: u64 = records.iter().map(|r| r.comments).sum();
    let current_count = records.iter().filter(|r| r.is_current).count();
    let avg_views = if records.is_empty() {
        0
    } else {
        total_views / records.len() as u64
    };

    let (top_category, top_source) = match labels {
        TopLabels::Fixed { category, source } => (category.clone(), source.clone()),
        TopLabels::MostViewed => (
            most_viewed(records, |r| &r.category),
            most_viewed(records, |r| &r.source),
        ),
    };

    BatchSummary {
        total_views,
        total_shares,
        total_comments,
        current_count,
        avg_views,
        top_category,
        top_source,
    }
}

/// Key with the largest summed views; ties go to the key seen first.
fn most_viewed<F>(records: &[ArticleRecord], key: F) -> String
where
    F: Fn(&ArticleRecord) -> &String,
{
    let mut totals: Vec<(&String, u64)> = Vec::new();
    for record in records {
        let name = key(record);
        match totals.iter_mut().find(|(n, _)| *n == name) {
            Some((_, views)) => *views += record.views,
            None => totals.push((name, record.views)),
        }
    }

    let mut best: Option<(&String, u64)> = None;
    for (name, views) in totals {
        if best.map_or(true, |(_, b)| views > b) {
            best = Some((name, views));
        }
    }
    best.map(|(name, _)| name.clone()).unwrap_or_default()
}

/// First `n` records by rank, projected to the reduced field set.
pub fn top_n(records: &[ArticleRecord], n: usize) -> Vec<TopNewsItem> {
    let mut ranked: Vec<&ArticleRecord> = records.iter().collect();
    ranked.sort_by_key(|r| r.rank);
    ranked.into_iter().take(n).map(TopNewsItem::from).collect()
}

impl NewsPayload {
    pub fn from_batch(batch: &NewsBatch, generated_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            timestamp: iso_timestamp(generated_at),
            news_count: batch.records.len(),
            stats: batch.summary.clone(),
            top_5_news: top_n(&batch.records, TOP_N),
        }
    }
}
