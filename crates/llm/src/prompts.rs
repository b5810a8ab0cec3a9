//! Prompt construction.
//!
//! The system prompt fixes the report structure; the user prompt carries the business
//! profile, the formatted clause context and the highest-priority requirements.

use regubiz_core::matcher::Priority;
use regubiz_core::ReportRequest;
use std::fmt::Write;

/// Number of top-priority requirements quoted verbatim in the user prompt.
const PRIORITY_EXCERPTS: usize = 5;

pub fn system_prompt() -> &'static str {
    "You are an expert in fire-safety regulation for restaurants and food businesses. \
Write a clear, practical compliance report for the business owner.\n\
\n\
Guidelines:\n\
- Translate legal wording into plain business language\n\
- Give concrete, actionable recommendations\n\
- Order the report by urgency: critical, then important, then recommended\n\
- Add a rough cost estimate where one is reasonable\n\
- Spell out the next steps the owner must take\n\
\n\
Report structure:\n\
1. Executive summary (two or three lines)\n\
2. Urgent requirements\n\
3. Mandatory requirements\n\
4. Recommended requirements\n\
5. Implementation plan\n\
6. Who to contact (authorities or consultants)\n\
\n\
Keep a professional but friendly tone. Only cite requirements that appear in the \
regulatory context you are given."
}

pub fn user_prompt(request: &ReportRequest) -> String {
    let context = &request.context;
    let business = &context.business;
    let mut out = String::new();

    let _ = writeln!(out, "Business details:");
    let _ = writeln!(out, "- Type: {}", business.business_type);
    let _ = writeln!(
        out,
        "- Name: {}",
        business.business_name.as_deref().unwrap_or("not given")
    );
    let _ = writeln!(out, "- Floor area: {} sqm", business.area_sqm);
    let _ = writeln!(out, "- Capacity: {} people", business.capacity_people);
    let features = if business.feature_labels.is_empty() {
        "none".to_string()
    } else {
        business.feature_labels.join(", ")
    };
    let _ = writeln!(out, "- Special features: {features}");
    if let Some(notes) = &business.additional_info {
        let _ = writeln!(out, "- Owner notes: {notes}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Regulatory context that applies to this business:");
    let _ = writeln!(out, "{}", context.formatted_text.trim_end());

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "{}", context.prompt_context().trim_end());

    let critical: Vec<_> = context
        .requirements
        .iter()
        .filter(|r| r.priority == Priority::Critical)
        .take(PRIORITY_EXCERPTS)
        .collect();
    if !critical.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top-priority requirements:");
        for requirement in critical {
            let _ = writeln!(out, "- {}: {}", requirement.id, requirement.content);
        }
    }

    let _ = writeln!(out);
    let _ = write!(
        out,
        "Based on this information, write a personalised report for the business owner."
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regubiz_core::{BusinessProfile, ComplianceService, Corpus, FeatureFlag};
    use std::sync::Arc;

    const DOC: &str = r#"{"requirements": [
        {"requirement_id": "FIRE_1", "category": "fire_equipment", "content": "Install a 6 kg extinguisher."},
        {"requirement_id": "GEN_1", "category": "general", "content": "Keep aisles clear."}
    ]}"#;

    #[test]
    fn user_prompt_carries_profile_context_and_priorities() {
        let corpus = Corpus::from_json(DOC).expect("corpus");
        let service = ComplianceService::new(Arc::new(corpus));
        let profile = BusinessProfile::new(90.0, 25, [FeatureFlag::Meat])
            .expect("profile")
            .with_additional_info(Some("Open late"));
        let request = ReportRequest {
            context: service.build_context(&profile),
            profile,
        };

        let prompt = user_prompt(&request);
        assert!(prompt.contains("- Name: not given"));
        assert!(prompt.contains("- Special features: serves meat"));
        assert!(prompt.contains("- Owner notes: Open late"));
        assert!(prompt.contains("[fire_equipment]"));
        assert!(prompt.contains("Top-priority requirements:\n- FIRE_1: Install a 6 kg extinguisher."));
        assert!(!prompt.contains("- GEN_1:"));
    }
}
