//! Keyword discovery workflow.
//!
//! Expands seed keywords through the labs keyword-ideas endpoint, enriches
//! the ideas with twelve months of search-volume history, filters by the
//! caller's volume floor, and scores every surviving keyword.

use std::collections::HashMap;
use std::time::Duration;

use rankscout_analysis::{
    opportunity_score, seasonality, CompetitionLevel, SearchIntent, SeasonalityLevel,
    TrendDirection,
};
use rankscout_core::ResearchDepth;
use rankscout_provider::adapters::keywords::{
    search_volume_payload, KeywordVolumeItem, VolumeRequest,
};
use rankscout_provider::adapters::labs::{
    keyword_ideas_payload, KeywordIdeaItem, KeywordIdeasRequest,
};
use rankscout_provider::adapters::TaskKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::workflows::{
    await_tasks, checkpoint, parse_items, parse_params, submit_and_record, summarize_and_persist,
    WorkflowContext,
};

/// Two provider stages run back to back, so each gets a ten-minute budget.
const WAIT_TIMEOUT: Duration = Duration::from_secs(600);
const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
pub struct KeywordDiscoveryParams {
    pub seed_keywords: Vec<String>,
    #[serde(default)]
    pub min_search_volume: Option<i64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub location_code: Option<u32>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub depth: ResearchDepth,
}

/// One scored keyword in the "keyword list" dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub search_volume: i64,
    pub competition: CompetitionLevel,
    pub intent: SearchIntent,
    pub trend: TrendDirection,
    pub seasonality: SeasonalityLevel,
    pub peak_months: Vec<usize>,
    pub opportunity_score: u32,
}

pub(super) async fn run(
    ctx: &WorkflowContext,
    query_id: Uuid,
    params: &serde_json::Value,
) -> Result<(), EngineError> {
    let params: KeywordDiscoveryParams = parse_params(params)?;
    if params.seed_keywords.is_empty() {
        return Err(EngineError::Validation(
            "seed_keywords must not be empty".to_owned(),
        ));
    }

    checkpoint(ctx, query_id, 10).await;

    let mut ideas_request = KeywordIdeasRequest::new(params.seed_keywords.clone());
    ideas_request.limit = params.limit;
    ideas_request.location_code = params.location_code;
    ideas_request.language_code = params.language_code.clone();

    let ideas_task = submit_and_record(
        ctx,
        query_id,
        TaskKind::KeywordIdeas,
        keyword_ideas_payload(&ideas_request),
    )
    .await?;
    checkpoint(ctx, query_id, 20).await;

    let results = await_tasks(ctx, &[ideas_task], WAIT_TIMEOUT, POLL_INTERVAL).await?;
    let ideas: Vec<KeywordIdeaItem> = results
        .get(&ideas_task)
        .map(parse_items)
        .unwrap_or_default();
    checkpoint(ctx, query_id, 40).await;

    if ideas.is_empty() {
        tracing::info!(query_id = %query_id, "no keyword ideas returned; writing empty dataset");
        persist_keyword_dataset(ctx, query_id, &[]).await?;
        return Ok(());
    }

    let mut volume_request =
        VolumeRequest::new(ideas.iter().map(|i| i.keyword.clone()).collect());
    volume_request.location_code = params.location_code;
    volume_request.language_code = params.language_code.clone();

    let volume_task = submit_and_record(
        ctx,
        query_id,
        TaskKind::KeywordVolume,
        search_volume_payload(&volume_request),
    )
    .await?;
    checkpoint(ctx, query_id, 50).await;

    let results = await_tasks(ctx, &[volume_task], WAIT_TIMEOUT, POLL_INTERVAL).await?;
    let volumes: Vec<KeywordVolumeItem> = results
        .get(&volume_task)
        .map(parse_items)
        .unwrap_or_default();
    checkpoint(ctx, query_id, 70).await;

    let entries =
        build_keyword_entries(&ideas, &volumes, params.min_search_volume.unwrap_or(0));
    persist_keyword_dataset(ctx, query_id, &entries).await?;
    checkpoint(ctx, query_id, 85).await;

    if params.depth.wants_summary() {
        let vars = summary_vars(&params.seed_keywords, &entries);
        summarize_and_persist(ctx, query_id, "keyword_discovery", &vars).await?;
        checkpoint(ctx, query_id, 95).await;
    }

    Ok(())
}

/// Combine ideas with their volume history into scored entries.
///
/// Keywords below `min_volume` are dropped. Volume history wins over the
/// idea's point-in-time volume when both are present; seasonality and the
/// trend tier come from the monthly series.
fn build_keyword_entries(
    ideas: &[KeywordIdeaItem],
    volumes: &[KeywordVolumeItem],
    min_volume: i64,
) -> Vec<KeywordEntry> {
    let by_keyword: HashMap<&str, &KeywordVolumeItem> =
        volumes.iter().map(|v| (v.keyword.as_str(), v)).collect();

    let mut entries: Vec<KeywordEntry> = ideas
        .iter()
        .filter_map(|idea| {
            let volume_item = by_keyword.get(idea.keyword.as_str());
            let search_volume =
                volume_item.map_or(idea.search_volume, |v| v.search_volume);
            if search_volume < min_volume {
                return None;
            }

            let monthly = volume_item.map(|v| v.monthly_volumes()).unwrap_or_default();
            let season = seasonality(&monthly);

            let competition = idea
                .competition
                .as_deref()
                .or_else(|| volume_item.and_then(|v| v.competition.as_deref()))
                .and_then(CompetitionLevel::from_provider)
                .unwrap_or(CompetitionLevel::High);
            let intent = idea
                .search_intent
                .as_deref()
                .and_then(SearchIntent::from_provider)
                .unwrap_or(SearchIntent::Informational);

            Some(KeywordEntry {
                keyword: idea.keyword.clone(),
                search_volume,
                competition,
                intent,
                trend: season.trend,
                seasonality: season.level,
                peak_months: season.peak_months.clone(),
                opportunity_score: opportunity_score(search_volume, competition, intent, season.trend),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.opportunity_score
            .cmp(&a.opportunity_score)
            .then(b.search_volume.cmp(&a.search_volume))
    });
    entries
}

async fn persist_keyword_dataset(
    ctx: &WorkflowContext,
    query_id: Uuid,
    entries: &[KeywordEntry],
) -> Result<(), EngineError> {
    let data = serde_json::to_value(entries)
        .map_err(|e| EngineError::Validation(format!("dataset serialization failed: {e}")))?;
    rankscout_db::insert_dataset(
        &ctx.pool,
        &rankscout_db::NewDataset {
            query_id,
            task_id: None,
            name: "keyword list".to_owned(),
            kind: "keyword_list".to_owned(),
            data,
        },
    )
    .await?;
    Ok(())
}

fn summary_vars(seeds: &[String], entries: &[KeywordEntry]) -> HashMap<String, String> {
    let top_keywords = entries
        .iter()
        .take(5)
        .map(|e| {
            format!(
                "- {} (score {}, volume {})",
                e.keyword, e.opportunity_score, e.search_volume
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HashMap::from([
        ("seed_keywords".to_owned(), seeds.join(", ")),
        ("keyword_count".to_owned(), entries.len().to_string()),
        ("top_keywords".to_owned(), top_keywords),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankscout_provider::adapters::keywords::MonthlySearch;

    fn idea(keyword: &str, volume: i64) -> KeywordIdeaItem {
        KeywordIdeaItem {
            keyword: keyword.to_owned(),
            search_volume: volume,
            competition: Some("MEDIUM".to_owned()),
            search_intent: Some("commercial".to_owned()),
        }
    }

    fn volume_item(keyword: &str, volume: i64, monthly: &[i64]) -> KeywordVolumeItem {
        KeywordVolumeItem {
            keyword: keyword.to_owned(),
            search_volume: volume,
            competition: Some("MEDIUM".to_owned()),
            monthly_searches: monthly
                .iter()
                .enumerate()
                .map(|(i, &v)| MonthlySearch {
                    year: 2025,
                    month: u32::try_from(i + 1).unwrap(),
                    search_volume: v,
                })
                .collect(),
        }
    }

    #[test]
    fn volume_floor_filters_entries() {
        let ideas = vec![idea("a", 50), idea("b", 500), idea("c", 5000)];
        let volumes = vec![
            volume_item("a", 50, &[50; 12]),
            volume_item("b", 500, &[500; 12]),
            volume_item("c", 5000, &[5000; 12]),
        ];

        let entries = build_keyword_entries(&ideas, &volumes, 100);
        assert_eq!(entries.len(), 2, "volume 50 must be filtered out");

        let kept: Vec<&str> = entries.iter().map(|e| e.keyword.as_str()).collect();
        assert!(kept.contains(&"b") && kept.contains(&"c"));
        for entry in &entries {
            assert!(entry.opportunity_score <= 100);
        }
    }

    #[test]
    fn entries_sort_by_score_descending() {
        let ideas = vec![idea("small", 200), idea("big", 20_000)];
        let volumes = vec![
            volume_item("small", 200, &[200; 12]),
            volume_item("big", 20_000, &[20_000; 12]),
        ];

        let entries = build_keyword_entries(&ideas, &volumes, 0);
        assert_eq!(entries[0].keyword, "big");
        assert!(entries[0].opportunity_score > entries[1].opportunity_score);
    }

    #[test]
    fn seasonal_history_sets_trend_and_peaks() {
        let ideas = vec![idea("gift guide", 2000)];
        let volumes = vec![volume_item(
            "gift guide",
            2000,
            &[100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 1000],
        )];

        let entries = build_keyword_entries(&ideas, &volumes, 0);
        assert_eq!(entries[0].seasonality, SeasonalityLevel::High);
        assert_eq!(entries[0].peak_months, vec![11]);
        assert_eq!(entries[0].trend, TrendDirection::Increasing);
    }

    #[test]
    fn idea_without_volume_history_uses_its_own_volume() {
        let ideas = vec![idea("orphan", 1500)];
        let entries = build_keyword_entries(&ideas, &[], 100);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].search_volume, 1500);
        assert_eq!(entries[0].trend, TrendDirection::Stable);
    }

    #[test]
    fn unknown_competition_defaults_conservatively() {
        let mut bare = idea("bare", 1000);
        bare.competition = None;
        bare.search_intent = None;
        let entries = build_keyword_entries(&[bare], &[], 0);
        assert_eq!(entries[0].competition, CompetitionLevel::High);
        assert_eq!(entries[0].intent, SearchIntent::Informational);
    }
}
