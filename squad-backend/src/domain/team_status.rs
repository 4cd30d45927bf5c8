// squad-backend/src/domain/team_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Draft,
    Active,
}

impl TeamStatus {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Draft, Self::Active]
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The transition is monotonic: a team goes draft -> active exactly once
    /// and never reverts.
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        match (self, new_status) {
            (current, new) if current == &new => true,
            (Self::Draft, Self::Active) => true,
            _ => false,
        }
    }
}

impl Default for TeamStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TeamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid team status: '{}'. Valid statuses are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<TeamStatus> for String {
    fn from(status: TeamStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for TeamStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for TeamStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
