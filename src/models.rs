use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub estimated_time: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub due_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from_email: String,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(deserialize_with = "null_as_default")]
    pub engagement_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub deal_value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleItem {
    #[serde(deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub task: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyPlan {
    #[serde(deserialize_with = "null_as_default")]
    pub total_tasks: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_minutes: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub schedule: Vec<ScheduleItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DebtBreakdown {
    #[serde(deserialize_with = "null_as_default")]
    pub overdue: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub due_today: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub due_this_week: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeDebt {
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pending_hours: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_overdue_hours: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub breakdown: DebtBreakdown,
}

/// Wire shape shared by every backend response: `{success, ...payload}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<P> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(flatten)]
    pub payload: P,
}

#[derive(Debug, Deserialize, Default)]
pub struct TasksPayload {
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ContactPayload {
    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlanPayload {
    #[serde(default)]
    pub plan: Option<DailyPlan>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeDebtPayload {
    #[serde(default)]
    pub time_debt: Option<TimeDebt>,
}

/// Reads an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => value,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
