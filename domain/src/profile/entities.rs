//! Business profile entity

use super::catalog::{COMPANY_SIZES, INDUSTRIES, resolve_choice};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user's business context (Entity, singleton per session).
///
/// Every field defaults to the empty string, meaning "not provided".
/// Serialized with camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessProfile {
    pub industry: String,
    pub company_size: String,
    pub target_market: String,
    pub business_goal: String,
}

/// A single editable field of [`BusinessProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Industry,
    CompanySize,
    TargetMarket,
    BusinessGoal,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Industry,
        ProfileField::CompanySize,
        ProfileField::TargetMarket,
        ProfileField::BusinessGoal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Industry => "industry",
            ProfileField::CompanySize => "size",
            ProfileField::TargetMarket => "market",
            ProfileField::BusinessGoal => "goal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Industry => "Industry",
            ProfileField::CompanySize => "Company Size",
            ProfileField::TargetMarket => "Target Market",
            ProfileField::BusinessGoal => "Primary Goal",
        }
    }

    /// Catalogue for select-style fields; `None` for free text.
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            ProfileField::Industry => Some(INDUSTRIES),
            ProfileField::CompanySize => Some(COMPANY_SIZES),
            ProfileField::TargetMarket | ProfileField::BusinessGoal => None,
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProfileField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "industry" => Ok(ProfileField::Industry),
            "size" | "company-size" | "companysize" => Ok(ProfileField::CompanySize),
            "market" | "target-market" | "targetmarket" => Ok(ProfileField::TargetMarket),
            "goal" | "business-goal" | "businessgoal" => Ok(ProfileField::BusinessGoal),
            other => Err(DomainError::UnknownProfileField(other.to_string())),
        }
    }
}

impl BusinessProfile {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Industry => &self.industry,
            ProfileField::CompanySize => &self.company_size,
            ProfileField::TargetMarket => &self.target_market,
            ProfileField::BusinessGoal => &self.business_goal,
        }
    }

    /// Set one field. Select-style fields accept a catalogue entry (by
    /// 1-based index or name) or an empty value to unset.
    pub fn set(&mut self, field: ProfileField, value: &str) -> Result<(), DomainError> {
        let value = value.trim();
        let resolved = match field.choices() {
            Some(_) if value.is_empty() => String::new(),
            Some(choices) => resolve_choice(choices, value)
                .ok_or_else(|| DomainError::InvalidProfileValue {
                    field: field.as_str(),
                    value: value.to_string(),
                })?
                .to_string(),
            None => value.to_string(),
        };

        let slot = match field {
            ProfileField::Industry => &mut self.industry,
            ProfileField::CompanySize => &mut self.company_size,
            ProfileField::TargetMarket => &mut self.target_market,
            ProfileField::BusinessGoal => &mut self.business_goal,
        };
        *slot = resolved;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        ProfileField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}
