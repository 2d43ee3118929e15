//! SERP analysis workflow.
//!
//! Analyzes the results page for one keyword: organic results plus search
//! volume, with an extra local-pack task when the keyword reads as local
//! intent. Produces difficulty, content-type mix, and per-position traffic
//! estimates.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use rankscout_analysis::estimate_traffic;
use rankscout_core::ResearchDepth;
use rankscout_provider::adapters::keywords::{
    search_volume_payload, KeywordVolumeItem, VolumeRequest,
};
use rankscout_provider::adapters::serp::{
    classify_content, difficulty_proxy, is_local_intent, local_pack_payload, organic_payload,
    ContentType, OrganicItem, SerpTaskRequest,
};
use rankscout_provider::adapters::TaskKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::workflows::{
    await_tasks, checkpoint, collect_items, parse_items, parse_params, submit_and_record,
    summarize_and_persist, WorkflowContext,
};

/// SERP tasks usually finish inside a minute or two; poll tightly.
const WAIT_TIMEOUT: Duration = Duration::from_secs(600);
const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
pub struct SerpAnalysisParams {
    pub keyword: String,
    #[serde(default)]
    pub location_code: Option<u32>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub depth: ResearchDepth,
}

/// One analyzed organic result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpResultEntry {
    pub position: u32,
    pub domain: String,
    pub url: String,
    pub content_type: ContentType,
    pub estimated_traffic: i64,
}

/// The "serp analysis" dataset payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpReport {
    pub keyword: String,
    pub search_volume: i64,
    pub local_intent: bool,
    pub difficulty: u32,
    /// Result count per content bucket, keyed by bucket label.
    pub content_mix: BTreeMap<String, usize>,
    pub results: Vec<SerpResultEntry>,
    pub local_pack_results: usize,
}

pub(super) async fn run(
    ctx: &WorkflowContext,
    query_id: Uuid,
    params: &serde_json::Value,
) -> Result<(), EngineError> {
    let params: SerpAnalysisParams = parse_params(params)?;
    if params.keyword.trim().is_empty() {
        return Err(EngineError::Validation("keyword must not be empty".to_owned()));
    }

    checkpoint(ctx, query_id, 10).await;
    let local = is_local_intent(&params.keyword);

    let mut serp_request = SerpTaskRequest::new(params.keyword.clone());
    serp_request.location_code = params.location_code;
    serp_request.language_code = params.language_code.clone();

    let mut volume_request = VolumeRequest::new(vec![params.keyword.clone()]);
    volume_request.location_code = params.location_code;
    volume_request.language_code = params.language_code.clone();

    let organic_task = submit_and_record(
        ctx,
        query_id,
        TaskKind::SerpOrganic,
        organic_payload(&serp_request),
    )
    .await?;
    let volume_task = submit_and_record(
        ctx,
        query_id,
        TaskKind::KeywordVolume,
        search_volume_payload(&volume_request),
    )
    .await?;

    let mut stage_tasks = vec![organic_task, volume_task];
    let mut local_task = None;
    if local {
        let id = submit_and_record(
            ctx,
            query_id,
            TaskKind::SerpLocalPack,
            local_pack_payload(&serp_request),
        )
        .await?;
        local_task = Some(id);
        stage_tasks.push(id);
    }
    checkpoint(ctx, query_id, 30).await;

    let results = await_tasks(ctx, &stage_tasks, WAIT_TIMEOUT, POLL_INTERVAL).await?;
    checkpoint(ctx, query_id, 60).await;

    let organic: Vec<OrganicItem> = results
        .get(&organic_task)
        .map(parse_items)
        .unwrap_or_default();
    let search_volume = results
        .get(&volume_task)
        .map(parse_items::<KeywordVolumeItem>)
        .unwrap_or_default()
        .first()
        .map_or(0, |v| v.search_volume);
    let local_pack_results = local_task
        .and_then(|id| results.get(&id))
        .map_or(0, |value| collect_items(value).len());

    let report = build_serp_report(
        &params.keyword,
        search_volume,
        &organic,
        local,
        local_pack_results,
    );

    let data = serde_json::to_value(&report)
        .map_err(|e| EngineError::Validation(format!("dataset serialization failed: {e}")))?;
    rankscout_db::insert_dataset(
        &ctx.pool,
        &rankscout_db::NewDataset {
            query_id,
            task_id: None,
            name: "serp analysis".to_owned(),
            kind: "serp_analysis".to_owned(),
            data,
        },
    )
    .await?;
    checkpoint(ctx, query_id, 85).await;

    if params.depth.wants_summary() {
        let vars = summary_vars(&report);
        summarize_and_persist(ctx, query_id, "serp_analysis", &vars).await?;
        checkpoint(ctx, query_id, 95).await;
    }

    Ok(())
}

/// Derive the full report from normalized results. Pure so the shape of the
/// analysis is testable without provider traffic.
fn build_serp_report(
    keyword: &str,
    search_volume: i64,
    organic: &[OrganicItem],
    local_intent: bool,
    local_pack_results: usize,
) -> SerpReport {
    let mut content_mix: BTreeMap<String, usize> = BTreeMap::new();
    let results: Vec<SerpResultEntry> = organic
        .iter()
        .map(|item| {
            let content_type = classify_content(&item.title, &item.description);
            *content_mix.entry(content_type.as_str().to_owned()).or_insert(0) += 1;
            SerpResultEntry {
                position: item.position,
                domain: item.domain.clone(),
                url: item.url.clone(),
                content_type,
                estimated_traffic: estimate_traffic(search_volume, item.position),
            }
        })
        .collect();

    SerpReport {
        keyword: keyword.to_owned(),
        search_volume,
        local_intent,
        difficulty: difficulty_proxy(organic),
        content_mix,
        results,
        local_pack_results,
    }
}

fn summary_vars(report: &SerpReport) -> HashMap<String, String> {
    let content_mix = report
        .content_mix
        .iter()
        .map(|(bucket, count)| format!("{bucket}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    HashMap::from([
        ("keyword".to_owned(), report.keyword.clone()),
        ("difficulty".to_owned(), report.difficulty.to_string()),
        ("local_intent".to_owned(), report.local_intent.to_string()),
        ("content_mix".to_owned(), content_mix),
    ])
}
