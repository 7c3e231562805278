use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as displayed (12.5 = 12.5%), already multiplied by 100.
pub type Rate = Decimal;

/// Multiples (e.g., 3.2x ROAS)
pub type Multiple = Decimal;

/// Non-negative funnel counts (leads, calls, sales, students)
pub type Count = u64;

/// Lead-quality classification used throughout the qualification funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[serde(alias = "diamante")]
    Diamond,
    #[serde(alias = "ouro")]
    Gold,
    #[serde(alias = "prata")]
    Silver,
    Bronze,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Diamond, Tier::Gold, Tier::Silver, Tier::Bronze];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Diamond => "diamond",
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the English tier names and the legacy Portuguese keys.
impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diamond" | "diamante" => Ok(Tier::Diamond),
            "gold" | "ouro" => Ok(Tier::Gold),
            "silver" | "prata" => Ok(Tier::Silver),
            "bronze" => Ok(Tier::Bronze),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// One count per tier. Totals are always derived from the four slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCounts {
    pub diamond: Count,
    pub gold: Count,
    pub silver: Count,
    pub bronze: Count,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> Count {
        match tier {
            Tier::Diamond => self.diamond,
            Tier::Gold => self.gold,
            Tier::Silver => self.silver,
            Tier::Bronze => self.bronze,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut Count {
        match tier {
            Tier::Diamond => &mut self.diamond,
            Tier::Gold => &mut self.gold,
            Tier::Silver => &mut self.silver,
            Tier::Bronze => &mut self.bronze,
        }
    }

    /// Sum of the four slots, saturating at `Count::MAX`.
    pub fn total(&self) -> Count {
        Tier::ALL
            .into_iter()
            .fold(0, |acc: Count, t| acc.saturating_add(self.get(t)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, Count)> + '_ {
        Tier::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

impl AddAssign for TierCounts {
    fn add_assign(&mut self, rhs: Self) {
        for tier in Tier::ALL {
            let slot = self.get_mut(tier);
            *slot = slot.saturating_add(rhs.get(tier));
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
