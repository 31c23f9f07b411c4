//! System instruction template for the consultant persona

use crate::profile::entities::BusinessProfile;

/// Builds the system instruction sent when a conversation context is created.
pub struct ConsultantPrompt;

impl ConsultantPrompt {
    pub const DEFAULT_INDUSTRY: &'static str = "General Business";
    pub const DEFAULT_COMPANY_SIZE: &'static str = "Not specified";
    pub const DEFAULT_TARGET_MARKET: &'static str = "General Market";
    pub const DEFAULT_GOAL: &'static str = "Sustainability and Growth";

    /// Interpolate the profile into the consultant instruction.
    ///
    /// Empty profile fields fall back to neutral defaults so the model never
    /// sees a blank context line.
    pub fn system_instruction(profile: &BusinessProfile) -> String {
        format!(
            r#"You are a world-class Business Strategy Consultant and AI Advisor.
Your goal is to help the user grow their business through actionable, data-driven insights.

CURRENT BUSINESS CONTEXT:
- Industry: {industry}
- Company Size: {size}
- Target Market: {market}
- Primary Goal: {goal}

RESPONSE GUIDELINES:
1. Clarity over Buzzwords: Use plain, powerful language.
2. Frameworks: Use business frameworks like SWOT, AARRR Pirate Metrics, 4Ps, or Cost-Value Matrices where appropriate.
3. Actionable Steps: Every major insight must end with 1-3 concrete "Next Steps".
4. Structured Output: Use markdown headers, bullet points, and bold text for readability.
5. Contextual: Tailor all advice strictly to the provided industry and company size.
6. Assumptions: If you lack data to make a specific recommendation, clearly state your assumptions.

Maintain a professional, encouraging, and analytical tone."#,
            industry = or_default(&profile.industry, Self::DEFAULT_INDUSTRY),
            size = or_default(&profile.company_size, Self::DEFAULT_COMPANY_SIZE),
            market = or_default(&profile.target_market, Self::DEFAULT_TARGET_MARKET),
            goal = or_default(&profile.business_goal, Self::DEFAULT_GOAL),
        )
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_defaults() {
        let prompt = ConsultantPrompt::system_instruction(&BusinessProfile::default());
        assert!(prompt.contains("- Industry: General Business"));
        assert!(prompt.contains("- Company Size: Not specified"));
        assert!(prompt.contains("- Target Market: General Market"));
        assert!(prompt.contains("- Primary Goal: Sustainability and Growth"));
    }

    #[test]
    fn test_profile_values_are_interpolated() {
        let profile = BusinessProfile {
            industry: "Healthcare".to_string(),
            company_size: "Growth (51-200)".to_string(),
            target_market: "Rural clinics".to_string(),
            business_goal: "Expand to 3 new states".to_string(),
        };
        let prompt = ConsultantPrompt::system_instruction(&profile);
        assert!(prompt.contains("- Industry: Healthcare"));
        assert!(prompt.contains("- Company Size: Growth (51-200)"));
        assert!(prompt.contains("- Target Market: Rural clinics"));
        assert!(prompt.contains("- Primary Goal: Expand to 3 new states"));
        assert!(!prompt.contains("General Business"));
    }

    #[test]
    fn test_guidelines_present() {
        let prompt = ConsultantPrompt::system_instruction(&BusinessProfile::default());
        assert!(prompt.contains("SWOT"));
        assert!(prompt.contains("Next Steps"));
        assert!(prompt.contains("state your assumptions"));
        assert!(prompt.ends_with("analytical tone."));
    }
}
