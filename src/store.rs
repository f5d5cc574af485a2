use crate::models::{Contact, DailyPlan, Task, TimeDebt};
use serde::Serialize;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Inbox,
    Tasks,
    Crm,
    Plan,
    Debt,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Inbox, Tab::Tasks, Tab::Crm, Tab::Plan, Tab::Debt];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Inbox => "inbox",
            Tab::Tasks => "tasks",
            Tab::Crm => "crm",
            Tab::Plan => "plan",
            Tab::Debt => "debt",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == value)
            .ok_or_else(|| format!("unknown tab '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Session cache slot for data that is fetched lazily on tab activation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cached<T> {
    #[default]
    Absent,
    Fresh(T),
    /// Held value that a refresh has invalidated; still shown until replaced.
    Stale(T),
}

impl<T> Cached<T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Cached::Fresh(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Cached::Absent => None,
            Cached::Fresh(value) | Cached::Stale(value) => Some(value),
        }
    }

    pub fn store(&mut self, value: T) {
        *self = Cached::Fresh(value);
    }

    pub fn invalidate(&mut self) {
        *self = match std::mem::replace(self, Cached::Absent) {
            Cached::Fresh(value) | Cached::Stale(value) => Cached::Stale(value),
            Cached::Absent => Cached::Absent,
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub tab: Tab,
    pub tasks: Vec<Task>,
    pub contact: Option<Contact>,
    pub crm_query: String,
    pub plan: Cached<DailyPlan>,
    pub time_debt: Cached<TimeDebt>,
    pub theme: Theme,
    pub task_filter: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            task_filter: "all".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_names_round_trip_through_from_str() {
        for tab in Tab::ALL {
            assert_eq!(tab.as_str().parse::<Tab>(), Ok(tab));
        }
        assert!("settings".parse::<Tab>().is_err());
        assert!("Inbox".parse::<Tab>().is_err());
    }

    #[test]
    fn new_state_starts_on_inbox_in_dark_mode() {
        let state = ViewState::new();
        assert_eq!(state.tab, Tab::Inbox);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.task_filter, "all");
        assert_eq!(state.plan, Cached::Absent);
    }

    #[test]
    fn invalidate_keeps_value_but_drops_freshness() {
        let mut cache = Cached::Absent;
        cache.invalidate();
        assert_eq!(cache, Cached::Absent);

        cache.store(7);
        assert!(cache.is_fresh());

        cache.invalidate();
        assert_eq!(cache, Cached::Stale(7));
        assert_eq!(cache.value(), Some(&7));
        assert!(!cache.is_fresh());
    }
}
