use std::cmp::Ordering;

use anyhow::bail;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Front-matter block at the top of a post source file.
#[derive(Deserialize, Debug, Clone)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub snippet: String,
}

/// Persisted metadata of a single post. `slug` is the source file stem.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub snippet: String,
}

impl Meta {
    pub fn from_front_matter(slug: &str, front: FrontMatter) -> anyhow::Result<Self> {
        Ok(Self {
            slug: slug.to_string(),
            date: parse_date(&front.date)?,
            title: front.title,
            description: front.description,
            snippet: front.snippet,
        })
    }
}

/// A post ready for rendering: metadata plus the prebuilt HTML fragment.
#[derive(Serialize, Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub snippet: String,
    /// trusted markup, rendered unescaped
    pub content: String,
}

impl Post {
    pub fn new(meta: Meta, content: String) -> Self {
        Self {
            slug: meta.slug,
            title: meta.title,
            description: meta.description,
            date: meta.date,
            snippet: meta.snippet,
            content,
        }
    }
}

/// Parses a front-matter date. RFC 3339 with or without fractional seconds,
/// naive date-times (taken as UTC) and bare dates are accepted.
pub fn parse_date(value: &str) -> anyhow::Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, layout) {
            return Ok(date.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(date) = date.and_hms_opt(0, 0, 0) {
            return Ok(date.and_utc());
        }
    }
    bail!("Invalid date format: {:?}", value)
}

pub fn sort_meta(a: &Meta, b: &Meta) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
}

/// Newest first.
pub fn sort_metas(metas: &mut [Meta]) {
    metas.sort_by(sort_meta);
}

pub fn latest(metas: &[Meta], n: usize) -> &[Meta] {
    &metas[..n.min(metas.len())]
}
