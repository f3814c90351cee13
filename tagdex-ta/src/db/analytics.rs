//! Derived analytics over the association tables
//!
//! Every view is recomputed from the store per query; results are
//! read-only and safe to cache.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tagdex_common::time::{now_ms, MS_PER_DAY};
use tagdex_common::Result;

use crate::typo::TagUse;

/// Round to 4 decimal places (association metrics)
fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Round to 3 decimal places (day spans)
fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}

/// Most-used tags across all associations, `uses DESC, tag ASC`
pub async fn suggestions(pool: &SqlitePool, limit: i64) -> Result<Vec<TagUse>> {
    let rows = sqlx::query(
        "SELECT tag, COUNT(*) AS uses FROM media_tags
         GROUP BY tag ORDER BY uses DESC, tag ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TagUse {
            tag: row.get("tag"),
            uses: row.get("uses"),
        })
        .collect())
}

/// One unordered tag pair with association metrics
#[derive(Debug, Serialize)]
pub struct CooccurrencePair {
    pub a: String,
    pub b: String,
    pub count: i64,
    pub jaccard: f64,
    pub lift: f64,
}

/// Pairwise tag co-occurrence with Jaccard and lift.
///
/// Pairs are unordered with `a < b`, ranked `count DESC, a ASC, b ASC`.
/// Supports and the lift denominator are computed over the media carrying
/// the tags involved in the returned pairs, not the whole corpus.
pub async fn cooccurrence(pool: &SqlitePool, limit: i64) -> Result<Vec<CooccurrencePair>> {
    let pair_rows = sqlx::query(
        r#"
        SELECT a.tag AS tag_a, b.tag AS tag_b, COUNT(*) AS pair_count
        FROM media_tags a
        JOIN media_tags b ON b.media_id = a.media_id AND a.tag < b.tag
        GROUP BY a.tag, b.tag
        ORDER BY pair_count DESC, a.tag ASC, b.tag ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    if pair_rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut tags: Vec<String> = Vec::new();
    for row in &pair_rows {
        for tag in [row.get::<String, _>("tag_a"), row.get::<String, _>("tag_b")] {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    let marks = vec!["?"; tags.len()].join(", ");
    let support_sql = format!(
        "SELECT tag, COUNT(DISTINCT media_id) AS support FROM media_tags
         WHERE tag IN ({}) GROUP BY tag",
        marks
    );
    let mut support_query = sqlx::query(&support_sql);
    for tag in &tags {
        support_query = support_query.bind(tag);
    }
    let supports: HashMap<String, i64> = support_query
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| (row.get("tag"), row.get("support")))
        .collect();

    let total_sql = format!(
        "SELECT COUNT(DISTINCT media_id) FROM media_tags WHERE tag IN ({})",
        marks
    );
    let mut total_query = sqlx::query_scalar::<_, i64>(&total_sql);
    for tag in &tags {
        total_query = total_query.bind(tag);
    }
    // Floor at 1: the lift denominator must never divide by zero
    let total_media = total_query.fetch_one(pool).await?.max(1);

    Ok(pair_rows
        .iter()
        .map(|row| {
            let a: String = row.get("tag_a");
            let b: String = row.get("tag_b");
            let count: i64 = row.get("pair_count");
            let support_a = supports.get(&a).copied().unwrap_or(count).max(1);
            let support_b = supports.get(&b).copied().unwrap_or(count).max(1);
            let union = (support_a + support_b - count).max(1);
            CooccurrencePair {
                jaccard: round4(count as f64 / union as f64),
                lift: round4((count * total_media) as f64 / (support_a * support_b) as f64),
                a,
                b,
                count,
            }
        })
        .collect())
}

/// One histogram bucket: how many media items carry `tag_count` tags
#[derive(Debug, Serialize)]
pub struct CoverageBucket {
    pub tag_count: i64,
    pub items: i64,
}

/// An untagged media item surfaced for operator triage
#[derive(Debug, Serialize)]
pub struct UntaggedSample {
    pub guid: String,
    pub title: Option<String>,
}

/// Tag-count distribution across the media set
#[derive(Debug, Serialize)]
pub struct CoverageReport {
    pub total: i64,
    pub with_min: i64,
    pub percent: f64,
    pub distribution: Vec<CoverageBucket>,
    pub top_untagged_sample: Vec<UntaggedSample>,
}

/// Compute the coverage histogram.
///
/// `limit` caps the number of media rows scanned; `full` scans the whole
/// media set. Zero-tag items are included via the left join.
pub async fn coverage(pool: &SqlitePool, min: i64, limit: i64, full: bool) -> Result<CoverageReport> {
    // SQLite treats LIMIT -1 as unlimited
    let scan_limit = if full { -1 } else { limit };

    let rows = sqlx::query(
        r#"
        SELECT m.guid, m.title, COUNT(mt.tag) AS tag_count
        FROM media m
        LEFT JOIN media_tags mt ON mt.media_id = m.id
        GROUP BY m.id
        ORDER BY m.id ASC
        LIMIT ?
        "#,
    )
    .bind(scan_limit)
    .fetch_all(pool)
    .await?;

    let mut histogram: BTreeMap<i64, i64> = BTreeMap::new();
    let mut with_min = 0i64;
    let mut sample = Vec::new();
    for row in &rows {
        let tag_count: i64 = row.get("tag_count");
        *histogram.entry(tag_count).or_insert(0) += 1;
        if tag_count >= min {
            with_min += 1;
        }
        if tag_count == 0 && sample.len() < 10 {
            sample.push(UntaggedSample {
                guid: row.get("guid"),
                title: row.get("title"),
            });
        }
    }

    let total = rows.len() as i64;
    let percent = if total == 0 {
        0.0
    } else {
        round4(with_min as f64 / total as f64)
    };

    Ok(CoverageReport {
        total,
        with_min,
        percent,
        distribution: histogram
            .into_iter()
            .map(|(tag_count, items)| CoverageBucket { tag_count, items })
            .collect(),
        top_untagged_sample: sample,
    })
}

/// Candidate pool for typo clustering: tags with at least `min_uses`
/// uses, most used first, capped at `pool_cap`
pub async fn typo_candidates(pool: &SqlitePool, min_uses: i64, pool_cap: i64) -> Result<Vec<TagUse>> {
    let rows = sqlx::query(
        "SELECT tag, COUNT(*) AS uses FROM media_tags
         GROUP BY tag HAVING uses >= ? ORDER BY uses DESC, tag ASC LIMIT ?",
    )
    .bind(min_uses)
    .bind(pool_cap)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TagUse {
            tag: row.get("tag"),
            uses: row.get("uses"),
        })
        .collect())
}

/// A tag's first/last use and derived spans
#[derive(Debug, Serialize)]
pub struct RecencyEntry {
    pub tag: String,
    pub uses: i64,
    pub first_used: i64,
    pub last_used: i64,
    pub span_days: f64,
    pub age_days: f64,
}

/// Tags by most recent use, with first/last timestamps and day spans
pub async fn recency(pool: &SqlitePool, limit: i64) -> Result<Vec<RecencyEntry>> {
    let rows = sqlx::query(
        "SELECT tag, COUNT(*) AS uses,
                MIN(created_at) AS first_used, MAX(created_at) AS last_used
         FROM media_tags
         GROUP BY tag ORDER BY last_used DESC, tag ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let now = now_ms();
    Ok(rows
        .iter()
        .map(|row| {
            let first_used: i64 = row.get("first_used");
            let last_used: i64 = row.get("last_used");
            RecencyEntry {
                tag: row.get("tag"),
                uses: row.get("uses"),
                first_used,
                last_used,
                span_days: round3((last_used - first_used).max(0) as f64 / MS_PER_DAY),
                age_days: round3((now - first_used).max(0) as f64 / MS_PER_DAY),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::associations::add_tag;
    use crate::db::testutil::{media_fixture, memory_pool};

    #[test]
    fn test_rounding() {
        assert_eq!(round4(8.0 / 9.0), 0.8889);
        assert_eq!(round3(1.0 / 3.0), 0.333);
    }

    #[tokio::test]
    async fn test_empty_corpus_yields_empty_views() {
        let pool = memory_pool().await;

        assert!(suggestions(&pool, 20).await.unwrap().is_empty());
        assert!(cooccurrence(&pool, 50).await.unwrap().is_empty());
        assert!(typo_candidates(&pool, 1, 400).await.unwrap().is_empty());
        assert!(recency(&pool, 50).await.unwrap().is_empty());

        let report = coverage(&pool, 1, 2000, false).await.unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(report.with_min, 0);
        assert_eq!(report.percent, 0.0);
    }

    #[tokio::test]
    async fn test_cooccurrence_bounds() {
        let pool = memory_pool().await;
        let m1 = media_fixture(&pool, "M1").await;
        let m2 = media_fixture(&pool, "M2").await;
        let m3 = media_fixture(&pool, "M3").await;

        for (media, tags) in [
            (m1, vec!["alpha", "beta"]),
            (m2, vec!["alpha", "beta", "gamma"]),
            (m3, vec!["alpha"]),
        ] {
            for tag in tags {
                add_tag(&pool, media, tag, None).await.unwrap();
            }
        }

        // support: alpha=3, beta=2, gamma=1
        let pairs = cooccurrence(&pool, 50).await.unwrap();
        assert!(!pairs.is_empty());
        for pair in &pairs {
            assert!(pair.count >= 1);
            assert!((0.0..=1.0).contains(&pair.jaccard));
            assert!(pair.lift > 0.0);
            assert!(pair.a < pair.b);
        }
        let ab = pairs.iter().find(|p| p.a == "alpha" && p.b == "beta").unwrap();
        // count <= min(support(a), support(b))
        assert!(ab.count <= 2);
    }

    #[tokio::test]
    async fn test_coverage_with_min_monotonic() {
        let pool = memory_pool().await;
        for (title, tag_count) in [("A", 0), ("B", 1), ("C", 2), ("D", 3), ("E", 5)] {
            let id = media_fixture(&pool, title).await;
            for i in 0..tag_count {
                add_tag(&pool, id, &format!("tag-{}", i), None).await.unwrap();
            }
        }

        let mut last = i64::MAX;
        for min in 1..=10 {
            let report = coverage(&pool, min, 2000, false).await.unwrap();
            assert!(report.with_min <= last, "with_min grew at min={}", min);
            last = report.with_min;
        }
    }

    #[tokio::test]
    async fn test_typo_candidates_respect_min_uses() {
        let pool = memory_pool().await;
        let m1 = media_fixture(&pool, "M1").await;
        let m2 = media_fixture(&pool, "M2").await;

        add_tag(&pool, m1, "color", None).await.unwrap();
        add_tag(&pool, m2, "color", None).await.unwrap();
        add_tag(&pool, m1, "colour", None).await.unwrap();

        let candidates = typo_candidates(&pool, 2, 400).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].tag, "color");
        assert_eq!(candidates[0].uses, 2);
    }
}
