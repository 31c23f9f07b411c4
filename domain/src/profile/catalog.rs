//! Fixed choices offered by the profile editor and the welcome screen.

/// Industries selectable for [`ProfileField::Industry`](super::entities::ProfileField::Industry).
pub const INDUSTRIES: &[&str] = &[
    "SaaS / Technology",
    "Retail / E-commerce",
    "Healthcare",
    "Finance",
    "Real Estate",
    "Manufacturing",
    "Consulting",
    "Food & Beverage",
    "Education",
    "Other",
];

/// Company sizes selectable for [`ProfileField::CompanySize`](super::entities::ProfileField::CompanySize).
pub const COMPANY_SIZES: &[&str] = &[
    "Solopreneur",
    "Small (2-10)",
    "Medium (11-50)",
    "Growth (51-200)",
    "Enterprise (200+)",
];

/// A quick-action prompt shown when the chat log is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedPrompt {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const SUGGESTED_PROMPTS: &[SuggestedPrompt] = &[
    SuggestedPrompt {
        label: "SWOT Analysis",
        prompt: "Perform a comprehensive SWOT analysis for my business based on my profile.",
    },
    SuggestedPrompt {
        label: "Growth Strategy",
        prompt: "Give me 3 actionable strategies to increase our monthly recurring revenue (MRR).",
    },
    SuggestedPrompt {
        label: "Cost Optimization",
        prompt: "Identify potential areas for cost optimization without sacrificing product quality.",
    },
    SuggestedPrompt {
        label: "Sales Pitch Review",
        prompt: "Help me refine my sales pitch for my target market.",
    },
];

/// Resolve a catalogue entry from a 1-based index or a case-insensitive name.
pub fn resolve_choice(choices: &[&'static str], input: &str) -> Option<&'static str> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| choices.get(i)).copied();
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(input))
        .copied()
}

/// Look up a suggested prompt by its 1-based position.
pub fn suggested_prompt(number: usize) -> Option<&'static SuggestedPrompt> {
    number.checked_sub(1).and_then(|i| SUGGESTED_PROMPTS.get(i))
}
