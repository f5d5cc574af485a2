use crate::api::{Backend, FetchResult, Fetched};
use crate::format::{plan_date, Toast, ToastKind};
use crate::models::{Contact, DailyPlan, Task, TimeDebt};
use crate::render::{
    crm_failed, crm_not_found, crm_prompt, crm_searching, debt_failed, debt_loading,
    debt_unavailable, pending_count, plan_failed, plan_loading, plan_unavailable, render_contact,
    render_inbox, render_plan, render_tasks, render_time_debt, Markup, TaskList,
};
use crate::store::{Tab, Theme, ViewState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

const TOAST_HISTORY: usize = 16;

/// Rendered page regions, one slot per element the page shell fills in.
#[derive(Debug, Clone)]
pub struct Document {
    pub tasks_list: TaskList,
    pub inbox_list: Markup,
    pub inbox_count: usize,
    pub crm_content: Markup,
    pub plan_content: Markup,
    pub debt_content: Markup,
    pub plan_date: String,
    pub light_mode: bool,
    pub sun_icon_hidden: bool,
    pub moon_icon_hidden: bool,
    pub toast: Option<Toast>,
}

impl Document {
    fn new(theme: Theme) -> Self {
        Self {
            tasks_list: TaskList::Empty,
            inbox_list: render_inbox(&[]),
            inbox_count: 0,
            crm_content: crm_prompt(),
            plan_content: plan_loading(),
            debt_content: debt_loading(),
            plan_date: String::new(),
            light_mode: !theme.is_dark(),
            sun_icon_hidden: !theme.is_dark(),
            moon_icon_hidden: theme.is_dark(),
            toast: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewSnapshot {
    pub tab: Tab,
    pub theme: Theme,
    pub booted: bool,
    pub pending_requests: usize,
    pub task_count: usize,
    pub inbox_count: usize,
    pub visible_task_ids: Vec<String>,
    pub task_filter: String,
    pub has_contact: bool,
    pub plan_cached: bool,
    pub time_debt_cached: bool,
    pub toast: Option<ToastSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ToastSnapshot {
    pub message: String,
    pub kind: ToastKind,
}

/// Everything a reader of the page sees. Only ever locked for short,
/// synchronous updates; backend requests run with the lock released.
#[derive(Debug)]
pub struct View {
    state: ViewState,
    doc: Document,
    toasts: VecDeque<Toast>,
    booted: bool,
    pending_requests: usize,
}

impl View {
    fn new() -> Self {
        let state = ViewState::new();
        Self {
            doc: Document::new(state.theme),
            state,
            toasts: VecDeque::with_capacity(TOAST_HISTORY),
            booted: false,
            pending_requests: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Most recent notifications, oldest first.
    pub fn recent_toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn visible_toast(&self, now: Instant) -> Option<&Toast> {
        self.doc.toast.as_ref().filter(|toast| toast.is_visible_at(now))
    }

    pub fn snapshot(&self, now: Instant) -> ViewSnapshot {
        ViewSnapshot {
            tab: self.state.tab,
            theme: self.state.theme,
            booted: self.booted,
            pending_requests: self.pending_requests,
            task_count: self.state.tasks.len(),
            inbox_count: self.doc.inbox_count,
            visible_task_ids: self
                .doc
                .tasks_list
                .cards()
                .iter()
                .filter(|card| card.visible)
                .map(|card| card.id.clone())
                .collect(),
            task_filter: self.state.task_filter.clone(),
            has_contact: self.state.contact.is_some(),
            plan_cached: self.state.plan.is_fresh(),
            time_debt_cached: self.state.time_debt.is_fresh(),
            toast: self.visible_toast(now).map(|toast| ToastSnapshot {
                message: toast.message.clone(),
                kind: toast.kind,
            }),
        }
    }

    fn begin_requests(&mut self, count: usize) {
        self.pending_requests += count;
    }

    fn end_requests(&mut self, count: usize) {
        self.pending_requests = self.pending_requests.saturating_sub(count);
    }

    fn notify(&mut self, message: &str, kind: ToastKind) {
        let toast = Toast::new(message, kind);
        if self.toasts.len() == TOAST_HISTORY {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast.clone());
        self.doc.toast = Some(toast);
    }

    /// Re-renders a tab from state already in memory. Never fetches.
    fn render_held(&mut self, tab: Tab, now: DateTime<Utc>) {
        match tab {
            Tab::Inbox | Tab::Tasks => self.render_task_views(now),
            Tab::Plan => {
                if let Some(plan) = self.state.plan.value() {
                    self.doc.plan_content = render_plan(plan);
                }
            }
            Tab::Debt => {
                if let Some(debt) = self.state.time_debt.value() {
                    self.doc.debt_content = render_time_debt(debt);
                }
            }
            // The CRM region keeps the outcome of the last search.
            Tab::Crm => {}
        }
    }

    fn apply_filter(&mut self) {
        let filter = self.state.task_filter.as_str();
        for card in self.doc.tasks_list.cards_mut() {
            card.visible = filter == "all" || card.badge.to_lowercase() == filter;
        }
    }

    fn render_task_views(&mut self, now: DateTime<Utc>) {
        self.doc.tasks_list = render_tasks(&self.state.tasks, now);
        self.apply_filter();
        self.doc.inbox_list = render_inbox(&self.state.tasks);
        self.doc.inbox_count = pending_count(&self.state.tasks);
    }

    fn apply_tasks(&mut self, result: FetchResult<Vec<Task>>, now: DateTime<Utc>) {
        match result {
            Ok(Fetched::Data(tasks)) => {
                info!(count = tasks.len(), "tasks loaded");
                self.state.tasks = tasks;
                self.render_task_views(now);
            }
            Ok(Fetched::Declined) => warn!("tasks request declined, keeping previous tasks"),
            Err(err) => {
                error!("error loading tasks: {err}");
                self.notify("Failed to load tasks", ToastKind::Error);
            }
        }
    }

    fn apply_contact(&mut self, email: &str, result: FetchResult<Contact>, now: DateTime<Utc>) {
        match result {
            Ok(Fetched::Data(contact)) => {
                info!(%email, "contact found");
                self.doc.crm_content = render_contact(&contact, now);
                self.state.contact = Some(contact);
            }
            Ok(Fetched::Declined) => {
                info!(%email, "contact not found");
                self.state.contact = None;
                self.doc.crm_content = crm_not_found();
            }
            Err(err) => {
                error!("error searching CRM: {err}");
                self.doc.crm_content = crm_failed();
                self.notify("Failed to search contact", ToastKind::Error);
            }
        }
    }

    fn apply_plan(&mut self, result: FetchResult<DailyPlan>) {
        match result {
            Ok(Fetched::Data(plan)) => {
                info!(tasks = plan.total_tasks, "daily plan loaded");
                self.doc.plan_content = render_plan(&plan);
                self.state.plan.store(plan);
            }
            Ok(Fetched::Declined) => {
                warn!("daily plan request declined");
                self.doc.plan_content = match self.state.plan.value() {
                    Some(plan) => render_plan(plan),
                    None => plan_unavailable(),
                };
            }
            Err(err) => {
                error!("error loading daily plan: {err}");
                self.doc.plan_content = plan_failed();
                self.notify("Failed to generate daily plan", ToastKind::Error);
            }
        }
    }

    fn apply_time_debt(&mut self, result: FetchResult<TimeDebt>) {
        match result {
            Ok(Fetched::Data(debt)) => {
                info!(score = debt.score, "time debt loaded");
                self.doc.debt_content = render_time_debt(&debt);
                self.state.time_debt.store(debt);
            }
            Ok(Fetched::Declined) => {
                warn!("time debt request declined");
                self.doc.debt_content = match self.state.time_debt.value() {
                    Some(debt) => render_time_debt(debt),
                    None => debt_unavailable(),
                };
            }
            Err(err) => {
                error!("error loading time debt: {err}");
                self.doc.debt_content = debt_failed();
                self.notify("Failed to calculate time debt", ToastKind::Error);
            }
        }
    }
}

/// Turns UI events into view updates and backend fetches.
///
/// Each event updates the view under a short lock (loading markup, cache
/// invalidation), releases it for the request, then locks again to apply the
/// result. Overlapping events therefore interleave, and the last result to
/// arrive for a region is the one shown.
pub struct Dashboard {
    view: Mutex<View>,
    backend: Arc<dyn Backend>,
    clock: fn() -> DateTime<Utc>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            view: Mutex::new(View::new()),
            backend,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn view(&self) -> MutexGuard<'_, View> {
        self.view.lock().await
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Initial page load: tasks feed both the tasks list and the inbox.
    pub async fn boot(&self) {
        info!("loading initial data");
        {
            let mut view = self.view.lock().await;
            view.doc.plan_date = plan_date(self.now().date_naive());
            view.begin_requests(1);
        }

        let result = self.backend.fetch_tasks().await;

        let mut view = self.view.lock().await;
        view.end_requests(1);
        view.apply_tasks(result, self.now());
        view.booted = true;
    }

    pub async fn switch_tab(&self, tab: Tab) {
        let fetch = {
            let mut view = self.view.lock().await;
            debug!(from = %view.state.tab, to = %tab, "switching tab");
            view.state.tab = tab;

            let fetch = match tab {
                Tab::Plan if !view.state.plan.is_fresh() => {
                    view.doc.plan_content = plan_loading();
                    true
                }
                Tab::Debt if !view.state.time_debt.is_fresh() => {
                    view.doc.debt_content = debt_loading();
                    true
                }
                _ => {
                    view.render_held(tab, self.now());
                    false
                }
            };
            if fetch {
                view.begin_requests(1);
            }
            fetch
        };
        if !fetch {
            return;
        }

        match tab {
            Tab::Plan => {
                let result = self.backend.fetch_daily_plan().await;
                let mut view = self.view.lock().await;
                view.end_requests(1);
                view.apply_plan(result);
            }
            Tab::Debt => {
                let result = self.backend.fetch_time_debt().await;
                let mut view = self.view.lock().await;
                view.end_requests(1);
                view.apply_time_debt(result);
            }
            _ => {}
        }
    }

    pub async fn toggle_theme(&self) {
        let mut view = self.view.lock().await;
        view.state.theme = view.state.theme.toggled();
        let dark = view.state.theme.is_dark();
        view.doc.light_mode = !dark;
        view.doc.sun_icon_hidden = !dark;
        view.doc.moon_icon_hidden = dark;

        info!(theme = ?view.state.theme, "theme toggled");
        let message = if dark {
            "Dark mode enabled"
        } else {
            "Light mode enabled"
        };
        view.notify(message, ToastKind::Success);
    }

    /// Shows only task cards whose badge text matches `priority`; `all` shows
    /// every card. Works on the rendered cards and never refetches.
    pub async fn filter_tasks(&self, priority: &str) {
        let priority = priority.trim().to_lowercase();
        let mut view = self.view.lock().await;
        view.state.task_filter = if priority.is_empty() {
            "all".to_string()
        } else {
            priority
        };
        view.apply_filter();
    }

    pub async fn search_contact(&self, query: &str) {
        let email = query.trim().to_string();
        {
            let mut view = self.view.lock().await;
            view.state.crm_query = email.clone();
            if email.is_empty() {
                return;
            }
            view.doc.crm_content = crm_searching(&email);
            view.begin_requests(1);
        }

        let result = self.backend.fetch_contact(&email).await;

        let mut view = self.view.lock().await;
        view.end_requests(1);
        view.apply_contact(&email, result, self.now());
    }

    /// Repeats the last contact search, if there was one.
    pub async fn refresh_contact(&self) {
        let query = self.view.lock().await.state.crm_query.clone();
        if query.is_empty() {
            return;
        }
        self.search_contact(&query).await;
    }

    /// Re-fetches tasks, plus the plan or time debt when that tab is active.
    /// Fetches run concurrently; each result only touches its own slice.
    pub async fn refresh(&self) {
        let (tab, requests) = {
            let mut view = self.view.lock().await;
            view.notify("Refreshing data...", ToastKind::Success);
            let tab = view.state.tab;
            let requests = match tab {
                Tab::Plan => {
                    view.state.plan.invalidate();
                    2
                }
                Tab::Debt => {
                    view.state.time_debt.invalidate();
                    2
                }
                _ => 1,
            };
            view.begin_requests(requests);
            (tab, requests)
        };

        let backend = &self.backend;
        let (tasks, plan, debt) = tokio::join!(
            backend.fetch_tasks(),
            async {
                match tab {
                    Tab::Plan => Some(backend.fetch_daily_plan().await),
                    _ => None,
                }
            },
            async {
                match tab {
                    Tab::Debt => Some(backend.fetch_time_debt().await),
                    _ => None,
                }
            },
        );

        let mut view = self.view.lock().await;
        view.end_requests(requests);
        view.apply_tasks(tasks, self.now());
        if let Some(result) = plan {
            view.apply_plan(result);
        }
        if let Some(result) = debt {
            view.apply_time_debt(result);
        }
        view.notify("Data refreshed successfully!", ToastKind::Success);
    }
}
