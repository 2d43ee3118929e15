//! Competitor research workflow.
//!
//! Pulls the ranked-keyword footprint for the target and each competitor,
//! labels every domain's competitive strength, and classifies the keywords
//! competitors rank for that the target does not.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rankscout_analysis::{classify_gap, estimate_traffic, strength_label, GapLevel, StrengthLabel};
use rankscout_core::ResearchDepth;
use rankscout_provider::adapters::labs::{
    ranked_keywords_payload, RankedKeywordItem, RankedKeywordsRequest,
};
use rankscout_provider::adapters::TaskKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::workflows::{
    await_tasks, checkpoint, parse_items, parse_params, submit_and_record, summarize_and_persist,
    WorkflowContext,
};

/// Ranked-keyword tasks are the provider's slowest; give the stage the
/// longest budget and the laziest poll cadence.
const WAIT_TIMEOUT: Duration = Duration::from_secs(900);
const POLL_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
pub struct CompetitorResearchParams {
    pub target: String,
    pub competitors: Vec<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub location_code: Option<u32>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub depth: ResearchDepth,
}

/// Competitive profile of one domain in the "competitor analysis" dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainProfile {
    pub domain: String,
    pub is_target: bool,
    pub keyword_count: usize,
    pub estimated_traffic: i64,
    pub avg_position: f64,
    pub strength: StrengthLabel,
}

/// One competitor-only keyword in the "keyword gaps" dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGap {
    pub keyword: String,
    pub search_volume: i64,
    /// Best position any competitor holds for the keyword.
    pub best_position: u32,
    pub competitors_ranking: usize,
    pub opportunity: GapLevel,
}

pub(super) async fn run(
    ctx: &WorkflowContext,
    query_id: Uuid,
    params: &serde_json::Value,
) -> Result<(), EngineError> {
    let params: CompetitorResearchParams = parse_params(params)?;
    if params.target.trim().is_empty() {
        return Err(EngineError::Validation("target must not be empty".to_owned()));
    }
    if params.competitors.is_empty() {
        return Err(EngineError::Validation(
            "competitors must not be empty".to_owned(),
        ));
    }

    checkpoint(ctx, query_id, 10).await;

    let mut domain_tasks: Vec<(String, Uuid)> = Vec::new();
    for domain in std::iter::once(&params.target).chain(params.competitors.iter()) {
        let mut request = RankedKeywordsRequest::new(domain.clone());
        request.limit = params.limit;
        request.location_code = params.location_code;
        request.language_code = params.language_code.clone();

        let task_id = submit_and_record(
            ctx,
            query_id,
            TaskKind::RankedKeywords,
            ranked_keywords_payload(&request),
        )
        .await?;
        domain_tasks.push((domain.clone(), task_id));
    }
    checkpoint(ctx, query_id, 30).await;

    let task_ids: Vec<Uuid> = domain_tasks.iter().map(|(_, id)| *id).collect();
    let results = await_tasks(ctx, &task_ids, WAIT_TIMEOUT, POLL_INTERVAL).await?;
    checkpoint(ctx, query_id, 60).await;

    let mut ranked: Vec<(String, Vec<RankedKeywordItem>)> = Vec::new();
    for (domain, task_id) in &domain_tasks {
        let items = results.get(task_id).map(parse_items).unwrap_or_default();
        ranked.push((domain.clone(), items));
    }

    let (target_domain, target_items) = &ranked[0];
    let competitor_ranked = &ranked[1..];

    let mut profiles = vec![build_profile(target_domain, target_items, true)];
    profiles.extend(
        competitor_ranked
            .iter()
            .map(|(domain, items)| build_profile(domain, items, false)),
    );

    let gaps = build_keyword_gaps(target_items, competitor_ranked);

    persist_dataset(ctx, query_id, "competitor analysis", "competitor_analysis", &profiles).await?;
    persist_dataset(ctx, query_id, "keyword gaps", "keyword_gaps", &gaps).await?;
    checkpoint(ctx, query_id, 85).await;

    if params.depth.wants_summary() {
        let vars = summary_vars(&params.target, &profiles, &gaps);
        summarize_and_persist(ctx, query_id, "competitor_research", &vars).await?;
        checkpoint(ctx, query_id, 95).await;
    }

    Ok(())
}

/// Profile one domain from its ranked keywords.
fn build_profile(domain: &str, items: &[RankedKeywordItem], is_target: bool) -> DomainProfile {
    let keyword_count = items.len();
    let estimated_traffic = items
        .iter()
        .map(|item| estimate_traffic(item.search_volume, item.position))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_position = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|item| f64::from(item.position)).sum::<f64>() / items.len() as f64
    };

    DomainProfile {
        domain: domain.to_owned(),
        is_target,
        keyword_count,
        estimated_traffic,
        avg_position,
        strength: strength_label(estimated_traffic, avg_position, keyword_count),
    }
}

/// Keywords at least one competitor ranks for that the target does not,
/// classified by opportunity and sorted best-first.
fn build_keyword_gaps(
    target_items: &[RankedKeywordItem],
    competitors: &[(String, Vec<RankedKeywordItem>)],
) -> Vec<KeywordGap> {
    let target_keywords: HashSet<&str> =
        target_items.iter().map(|item| item.keyword.as_str()).collect();

    // keyword → (best position, competitor count, volume)
    let mut candidates: HashMap<&str, (u32, usize, i64)> = HashMap::new();
    for (_, items) in competitors {
        let mut seen_here: HashSet<&str> = HashSet::new();
        for item in items {
            if target_keywords.contains(item.keyword.as_str()) {
                continue;
            }
            if item.position == 0 {
                continue;
            }
            // A domain ranking the same keyword at several URLs counts once.
            let first_for_domain = seen_here.insert(item.keyword.as_str());
            let entry = candidates
                .entry(item.keyword.as_str())
                .or_insert((item.position, 0, item.search_volume));
            entry.0 = entry.0.min(item.position);
            if first_for_domain {
                entry.1 += 1;
            }
            entry.2 = entry.2.max(item.search_volume);
        }
    }

    let mut gaps: Vec<KeywordGap> = candidates
        .into_iter()
        .map(|(keyword, (best_position, competitors_ranking, search_volume))| KeywordGap {
            keyword: keyword.to_owned(),
            search_volume,
            best_position,
            competitors_ranking,
            opportunity: classify_gap(best_position, competitors_ranking, search_volume),
        })
        .collect();

    gaps.sort_by(|a, b| {
        gap_rank(a.opportunity)
            .cmp(&gap_rank(b.opportunity))
            .then(b.search_volume.cmp(&a.search_volume))
    });
    gaps
}

fn gap_rank(level: GapLevel) -> u8 {
    match level {
        GapLevel::High => 0,
        GapLevel::Medium => 1,
        GapLevel::Low => 2,
    }
}

async fn persist_dataset<T: Serialize>(
    ctx: &WorkflowContext,
    query_id: Uuid,
    name: &str,
    kind: &str,
    data: &T,
) -> Result<(), EngineError> {
    let data = serde_json::to_value(data)
        .map_err(|e| EngineError::Validation(format!("dataset serialization failed: {e}")))?;
    rankscout_db::insert_dataset(
        &ctx.pool,
        &rankscout_db::NewDataset {
            query_id,
            task_id: None,
            name: name.to_owned(),
            kind: kind.to_owned(),
            data,
        },
    )
    .await?;
    Ok(())
}

fn summary_vars(
    target: &str,
    profiles: &[DomainProfile],
    gaps: &[KeywordGap],
) -> HashMap<String, String> {
    let competitor_summary = profiles
        .iter()
        .filter(|p| !p.is_target)
        .map(|p| {
            format!(
                "- {}: {} ({} keywords, ~{} visits/month)",
                p.domain, p.strength, p.keyword_count, p.estimated_traffic
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let top_gaps = gaps
        .iter()
        .take(5)
        .map(|g| {
            format!(
                "- {} ({} opportunity, volume {}, best position {})",
                g.keyword, g.opportunity, g.search_volume, g.best_position
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HashMap::from([
        ("target".to_owned(), target.to_owned()),
        ("competitor_summary".to_owned(), competitor_summary),
        ("gap_count".to_owned(), gaps.len().to_string()),
        ("top_gaps".to_owned(), top_gaps),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(keyword: &str, position: u32, volume: i64) -> RankedKeywordItem {
        RankedKeywordItem {
            keyword: keyword.to_owned(),
            position,
            search_volume: volume,
            url: None,
        }
    }

    #[test]
    fn single_competitor_gap_is_medium() {
        let target: Vec<RankedKeywordItem> = vec![item("running shoes", 3, 10_000)];
        let competitors = vec![(
            "rival.com".to_owned(),
            vec![item("best running shoes", 5, 3000)],
        )];

        let gaps = build_keyword_gaps(&target, &competitors);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].keyword, "best running shoes");
        assert_eq!(gaps[0].opportunity, GapLevel::Medium);
        assert_eq!(gaps[0].competitors_ranking, 1);
    }

    #[test]
    fn two_competitors_good_position_high_volume_is_high() {
        let target: Vec<RankedKeywordItem> = Vec::new();
        let competitors = vec![
            ("a.com".to_owned(), vec![item("trail shoes", 8, 1200)]),
            ("b.com".to_owned(), vec![item("trail shoes", 8, 1200)]),
        ];

        let gaps = build_keyword_gaps(&target, &competitors);
        assert_eq!(gaps[0].opportunity, GapLevel::High);
        assert_eq!(gaps[0].competitors_ranking, 2);
    }

    #[test]
    fn keywords_the_target_already_ranks_are_not_gaps() {
        let target = vec![item("running shoes", 4, 10_000)];
        let competitors = vec![("a.com".to_owned(), vec![item("running shoes", 2, 10_000)])];

        assert!(build_keyword_gaps(&target, &competitors).is_empty());
    }

    #[test]
    fn duplicate_rankings_from_one_domain_count_once() {
        let competitors = vec![(
            "a.com".to_owned(),
            vec![item("trail shoes", 9, 2000), item("trail shoes", 14, 2000)],
        )];

        let gaps = build_keyword_gaps(&[], &competitors);
        assert_eq!(gaps[0].competitors_ranking, 1);
        assert_eq!(gaps[0].best_position, 9);
        // One competitor caps this at Medium even with strong volume.
        assert_eq!(gaps[0].opportunity, GapLevel::Medium);
    }

    #[test]
    fn gaps_sort_high_first_then_volume() {
        let competitors = vec![
            (
                "a.com".to_owned(),
                vec![
                    item("low one", 30, 100),
                    item("big high", 5, 8000),
                    item("medium one", 15, 900),
                ],
            ),
            ("b.com".to_owned(), vec![item("big high", 6, 8000)]),
        ];

        let gaps = build_keyword_gaps(&[], &competitors);
        assert_eq!(gaps[0].keyword, "big high");
        assert_eq!(gaps[0].opportunity, GapLevel::High);
        assert_eq!(gaps.last().map(|g| g.opportunity), Some(GapLevel::Low));
    }

    #[test]
    fn profile_aggregates_traffic_and_average_position() {
        let items = vec![item("a", 1, 1000), item("b", 3, 2000)];
        let profile = build_profile("rival.com", &items, false);

        // 1000 × 28 % + 2000 × 11 % = 280 + 220.
        assert_eq!(profile.estimated_traffic, 500);
        assert!((profile.avg_position - 2.0).abs() < f64::EPSILON);
        assert_eq!(profile.keyword_count, 2);
    }

    #[test]
    fn empty_profile_is_weak() {
        let profile = build_profile("ghost.com", &[], true);
        assert_eq!(profile.strength, StrengthLabel::Weak);
        assert!(profile.avg_position.abs() < f64::EPSILON);
    }
}
