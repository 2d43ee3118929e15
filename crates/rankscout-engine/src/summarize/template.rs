//! Prompt templates for the summarization backend.
//!
//! A template declares the variables it needs; rendering validates that
//! every declared variable was supplied before any backend call happens.
//! An unreplaced `{{...}}` placeholder never leaves this module.

use std::collections::HashMap;

use crate::error::EngineError;

/// A named prompt template with `{{variable}}` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct SummaryTemplate {
    pub id: &'static str,
    pub system: &'static str,
    pub prompt: &'static str,
    pub required_vars: &'static [&'static str],
}

const SYSTEM_INSTRUCTION: &str = "You are an SEO research analyst. Respond with a single JSON \
object containing: \"summary\" (string), \"insights\" (array of strings), \"recommendations\" \
(array of objects with title, description, priority [high|medium|low], effort \
[quick|moderate|significant], impact [high|medium|low]), and optionally \"keyMetrics\" and \
\"nextSteps\". Respond with JSON only, no prose around it.";

const TEMPLATES: &[SummaryTemplate] = &[
    SummaryTemplate {
        id: "keyword_discovery",
        system: SYSTEM_INSTRUCTION,
        prompt: "Summarize this keyword research.\n\nSeed keywords: {{seed_keywords}}\n\
Keywords found: {{keyword_count}}\nTop keywords by opportunity score:\n{{top_keywords}}\n\n\
Highlight the strongest opportunities and any seasonal patterns worth planning around.",
        required_vars: &["seed_keywords", "keyword_count", "top_keywords"],
    },
    SummaryTemplate {
        id: "serp_analysis",
        system: SYSTEM_INSTRUCTION,
        prompt: "Summarize this SERP analysis for \"{{keyword}}\".\n\n\
Keyword difficulty: {{difficulty}}/100\nLocal intent: {{local_intent}}\n\
Content type mix: {{content_mix}}\n\n\
Recommend the content format most likely to rank and how hard the fight will be.",
        required_vars: &["keyword", "difficulty", "local_intent", "content_mix"],
    },
    SummaryTemplate {
        id: "competitor_research",
        system: SYSTEM_INSTRUCTION,
        prompt: "Summarize this competitor research for {{target}}.\n\n\
Competitor strength:\n{{competitor_summary}}\n\nKeyword gaps found: {{gap_count}}\n\
Highest-opportunity gaps:\n{{top_gaps}}\n\n\
Recommend which gaps to pursue first and why.",
        required_vars: &["target", "competitor_summary", "gap_count", "top_gaps"],
    },
];

/// Look up a template by id.
#[must_use]
pub fn template(id: &str) -> Option<&'static SummaryTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Substitute all `{{var}}` occurrences in the template's prompt.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] naming every declared-but-missing
/// variable, or any placeholder left unreplaced after substitution.
pub fn render(
    template: &SummaryTemplate,
    vars: &HashMap<String, String>,
) -> Result<String, EngineError> {
    let mut missing: Vec<&str> = template
        .required_vars
        .iter()
        .filter(|v| !vars.contains_key(**v))
        .copied()
        .collect();
    missing.sort_unstable();
    if !missing.is_empty() {
        return Err(EngineError::Validation(format!(
            "template '{}' is missing variables: {}",
            template.id,
            missing.join(", ")
        )));
    }

    let mut rendered = template.prompt.to_owned();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{{{name}}}}}"), value);
    }

    if rendered.contains("{{") {
        return Err(EngineError::Validation(format!(
            "template '{}' rendered with unreplaced placeholders",
            template.id
        )));
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn every_template_declares_all_its_placeholders() {
        for t in TEMPLATES {
            let filled = vars(
                &t.required_vars
                    .iter()
                    .map(|v| (*v, "x"))
                    .collect::<Vec<_>>(),
            );
            let rendered = render(t, &filled)
                .unwrap_or_else(|e| panic!("template '{}' failed to render: {e}", t.id));
            assert!(
                !rendered.contains("{{"),
                "template '{}' has an undeclared placeholder",
                t.id
            );
        }
    }

    #[test]
    fn render_substitutes_all_occurrences() {
        let t = template("serp_analysis").expect("template should exist");
        let rendered = render(
            t,
            &vars(&[
                ("keyword", "running shoes"),
                ("difficulty", "65"),
                ("local_intent", "false"),
                ("content_mix", "article: 6, video: 2"),
            ]),
        )
        .expect("render should succeed");
        assert!(rendered.contains("\"running shoes\""));
        assert!(rendered.contains("65/100"));
    }

    #[test]
    fn missing_variables_are_listed_sorted() {
        let t = template("keyword_discovery").expect("template should exist");
        let err = render(t, &vars(&[("keyword_count", "12")])).unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("seed_keywords, top_keywords"),
            "missing vars not listed: {message}"
        );
    }

    #[test]
    fn unknown_template_id_is_none() {
        assert!(template("weekly_report").is_none());
    }
}
