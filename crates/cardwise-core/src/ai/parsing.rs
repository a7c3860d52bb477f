//! JSON parsing helpers for generator replies
//!
//! Models often wrap the JSON payload in prose or code fences, so the
//! extractor slices from the first `{` to the last `}` before parsing.

use crate::error::{Error, Result};

use super::types::AdviceReply;

const RAW_PREVIEW_LEN: usize = 200;

/// Parse and validate an advice reply
pub fn parse_advice(response: &str) -> Result<AdviceReply> {
    let json_str = extract_json(response)?;

    let reply: AdviceReply = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid advice JSON from generator: {} | Raw: {}",
            e,
            preview(json_str)
        ))
    })?;

    validate_advice(reply)
}

/// Slice the outermost `{...}` out of a reply
pub fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in generator reply | Raw: {}",
            preview(response)
        ))),
    }
}

fn validate_advice(mut reply: AdviceReply) -> Result<AdviceReply> {
    reply.spending_insights.retain(|s| !s.trim().is_empty());
    reply.reward_optimization_tips.retain(|s| !s.trim().is_empty());

    if reply.spending_insights.is_empty() {
        return Err(Error::InvalidData("spending_insights is empty".into()));
    }
    if reply.reward_optimization_tips.is_empty() {
        return Err(Error::InvalidData(
            "reward_optimization_tips is empty".into(),
        ));
    }
    if reply.smart_card_usage_advice.trim().is_empty() {
        return Err(Error::InvalidData(
            "smart_card_usage_advice is blank".into(),
        ));
    }

    Ok(reply)
}

/// Truncate long replies for error messages, on a char boundary
fn preview(s: &str) -> String {
    match s.char_indices().nth(RAW_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"spending_insights": ["You spend most on dining."],
        "smart_card_usage_advice": "Use Regions for dining.",
        "reward_optimization_tips": ["Pay in full."]}"#;

    #[test]
    fn test_parse_plain_json() {
        let reply = parse_advice(VALID).unwrap();
        assert_eq!(reply.spending_insights, vec!["You spend most on dining."]);
        assert_eq!(reply.smart_card_usage_advice, "Use Regions for dining.");
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let wrapped = format!("Sure! Here is the analysis:\n```json\n{}\n```\nHope it helps.", VALID);
        let reply = parse_advice(&wrapped).unwrap();
        assert_eq!(reply.reward_optimization_tips, vec!["Pay in full."]);
    }

    #[test]
    fn test_no_json() {
        let err = parse_advice("I cannot help with that.").unwrap_err();
        assert!(err.to_string().contains("No JSON found"));

        assert!(parse_advice("} backwards {").is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_advice("{ not json }").is_err());
    }

    #[test]
    fn test_missing_field() {
        let reply = r#"{"spending_insights": ["a"], "smart_card_usage_advice": "b"}"#;
        assert!(parse_advice(reply).is_err());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let empty_insights = r#"{"spending_insights": [], "smart_card_usage_advice": "b",
            "reward_optimization_tips": ["c"]}"#;
        assert!(parse_advice(empty_insights).is_err());

        let blank_advice = r#"{"spending_insights": ["a"], "smart_card_usage_advice": "  ",
            "reward_optimization_tips": ["c"]}"#;
        assert!(parse_advice(blank_advice).is_err());

        let blank_tips = r#"{"spending_insights": ["a"], "smart_card_usage_advice": "b",
            "reward_optimization_tips": [""]}"#;
        assert!(parse_advice(blank_tips).is_err());
    }

    #[test]
    fn test_preview_is_char_safe() {
        let long = "é".repeat(500);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), RAW_PREVIEW_LEN + 3);
    }
}
