//! Batch input parser.
//!
//! Turns the two raw text fields — the prompt box and the reference box —
//! into either a single work item or an ordered batch. The input is
//! whatever users paste: a plain prompt, a bare URL, newline/comma lists,
//! or JSON objects with `infos`, `infos1`, `url_list`, and `title` keys,
//! frequently with trailing commas.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use vgen_models::WorkItem;

use crate::error::ParseError;

/// Template applied to the first item of a titled batch.
const TITLE_TEMPLATE_PREFIX: &str = "画面中央有标题：";
const TITLE_TEMPLATE_SUFFIX: &str = "，从0s就有标题字出现。";

/// Result of parsing the two raw input fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// One work item, processed without the queue wrapper.
    Single(WorkItem),
    /// An ordered batch. Any title has already been folded into the
    /// first item's prompt.
    Batch { items: Vec<WorkItem> },
}

/// Batch keys extracted from the prompt field when it holds JSON.
#[derive(Debug, Default)]
struct PromptSpec {
    prompts: Vec<String>,
    audios: Vec<String>,
    urls: Vec<String>,
    title: Option<String>,
    has_batch_prompt: bool,
}

/// Parse the prompt and reference fields into a work list.
pub fn parse_input(prompt_field: &str, reference_field: &str) -> Result<ParsedInput, ParseError> {
    let trimmed_prompt = prompt_field.trim();
    let trimmed_ref = reference_field.trim();

    let spec = parse_prompt_spec(trimmed_prompt);
    let url_list = resolve_references(&spec, trimmed_ref);

    if !url_list.is_empty() {
        let items = url_list
            .into_iter()
            .enumerate()
            .map(|(idx, url)| {
                let prompt = if spec.has_batch_prompt {
                    spec.prompts
                        .get(idx)
                        .or_else(|| spec.prompts.first())
                        .cloned()
                        .unwrap_or_default()
                } else {
                    trimmed_prompt.to_string()
                };
                let prompt = match (&spec.title, idx) {
                    (Some(title), 0) => {
                        format!("{TITLE_TEMPLATE_PREFIX}{title}{TITLE_TEMPLATE_SUFFIX}{prompt}")
                    }
                    _ => prompt,
                };
                let mut item = WorkItem::new(url, prompt);
                item.audio_ref = spec.audios.get(idx).cloned();
                item
            })
            .collect();
        return Ok(ParsedInput::Batch { items });
    }

    if spec.has_batch_prompt {
        return Err(ParseError::BatchPromptWithoutBatchRefs);
    }

    if trimmed_prompt.is_empty() {
        return Err(ParseError::MissingPrompt);
    }

    Ok(ParsedInput::Single(WorkItem::new(trimmed_ref, trimmed_prompt)))
}

/// Extract batch keys from the prompt field, if it holds a JSON object.
/// Anything that fails to parse is silently treated as a normal prompt.
fn parse_prompt_spec(trimmed_prompt: &str) -> PromptSpec {
    let mut spec = PromptSpec::default();

    if !trimmed_prompt.starts_with('{') {
        return spec;
    }
    let Some(json) = parse_lenient_json(trimmed_prompt) else {
        return spec;
    };

    if let Some(prompts) = string_array(&json, "infos") {
        spec.prompts = prompts;
        spec.has_batch_prompt = true;
    }
    if let Some(audios) = string_array(&json, "infos1") {
        spec.audios = audios;
    }
    if let Some(urls) = string_array(&json, "url_list") {
        spec.urls = urls.iter().map(|u| strip_backticks(u)).collect();
    }
    if let Some(titles) = string_array(&json, "title") {
        spec.title = titles.into_iter().next();
    }

    spec
}

/// Resolve the ordered reference list.
///
/// A `url_list` pasted into the prompt box takes precedence; otherwise the
/// reference field is inspected when it looks like more than one literal
/// reference (JSON object, or newline/comma separated). A failed JSON
/// parse falls back to treating the whole field as one literal reference.
fn resolve_references(spec: &PromptSpec, trimmed_ref: &str) -> Vec<String> {
    if !spec.urls.is_empty() {
        return spec.urls.clone();
    }

    if trimmed_ref.starts_with('{') {
        return parse_lenient_json(trimmed_ref)
            .and_then(|json| string_array(&json, "url_list"))
            .unwrap_or_default();
    }

    if trimmed_ref.contains('\n') || trimmed_ref.contains(',') {
        return trimmed_ref
            .split(['\n', ','])
            .map(strip_backticks)
            .filter(|u| u.starts_with("http"))
            .collect();
    }

    Vec::new()
}

/// Parse JSON after stripping trailing commas before `}` / `]`.
fn parse_lenient_json(raw: &str) -> Option<Value> {
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_COMMA.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("static regex"));
    let cleaned = re.replace_all(raw, "$1");
    serde_json::from_str(&cleaned).ok()
}

/// Extract a list-valued key of strings; `None` if absent or not a list.
fn string_array(json: &Value, key: &str) -> Option<Vec<String>> {
    let array = json.get(key)?.as_array()?;
    Some(
        array
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

fn strip_backticks(piece: &str) -> String {
    piece.replace('`', "").trim().to_string()
}
