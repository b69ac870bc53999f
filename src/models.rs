use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One day's recorded measurements. Every field except the date is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub calories: Option<i64>,
    pub steps: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "Within Goal")]
    WithinGoal,
    #[serde(rename = "Over Goal")]
    OverGoal,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinGoal => "Within Goal",
            Self::OverGoal => "Over Goal",
            Self::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub status: GoalStatus,
}

/// Parallel series aligned by index, oldest entry first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub weights: Vec<Option<f64>>,
    pub calories: Vec<i64>,
    pub steps: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub entries: Vec<AnnotatedEntry>,
    pub calorie_goal: Option<i64>,
    pub over_goal_flags: BTreeMap<String, bool>,
    pub chart: ChartSeries,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    pub date: Option<String>,
    pub weight: Option<String>,
    pub calories: Option<String>,
    pub steps: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalForm {
    pub calorie_goal: Option<String>,
}
