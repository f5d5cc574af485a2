use crate::format::{grouped, preview, relative_date};
use crate::models::{Contact, DailyPlan, ScheduleItem, Task, TimeDebt};
use chrono::{DateTime, Utc};
use std::fmt;

/// Arc length of the full time-debt gauge path.
pub const GAUGE_ARC: f64 = 251.2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const TASKS_ICON: &str = r#"<svg width="64" height="64" viewBox="0 0 24 24" fill="none"><path d="M9 12L11 14L15 10" stroke="currentColor" stroke-width="2"/><rect x="3" y="3" width="18" height="18" rx="4" stroke="currentColor" stroke-width="2"/></svg>"#;
const INBOX_ICON: &str = r#"<svg width="64" height="64" viewBox="0 0 24 24" fill="none"><rect x="3" y="5" width="18" height="14" rx="2" stroke="currentColor" stroke-width="2"/><path d="M3 7L12 13L21 7" stroke="currentColor" stroke-width="2"/></svg>"#;
const CONTACT_ICON: &str = r#"<svg width="64" height="64" viewBox="0 0 24 24" fill="none"><circle cx="12" cy="8" r="4" stroke="currentColor" stroke-width="1.5"/><path d="M6 21V19C6 16.79 7.79 15 10 15H14C16.21 15 18 16.79 18 19V21" stroke="currentColor" stroke-width="1.5"/></svg>"#;
const PLAN_ICON: &str = r#"<svg width="64" height="64" viewBox="0 0 24 24" fill="none"><rect x="3" y="4" width="18" height="17" rx="2" stroke="currentColor" stroke-width="2"/><path d="M3 9H21M8 2V6M16 2V6" stroke="currentColor" stroke-width="2"/></svg>"#;
const GAUGE_ICON: &str = r#"<svg width="64" height="64" viewBox="0 0 24 24" fill="none"><path d="M4 16A8 8 0 0 1 20 16" stroke="currentColor" stroke-width="2"/><path d="M12 16L16 10" stroke="currentColor" stroke-width="2"/></svg>"#;
const CLOCK_ICON: &str = r#"<svg width="14" height="14" viewBox="0 0 24 24" fill="none"><circle cx="12" cy="12" r="9" stroke="currentColor" stroke-width="2"/><path d="M12 6V12L16 14" stroke="currentColor" stroke-width="2"/></svg>"#;
const MAIL_ICON: &str = r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none"><rect x="3" y="5" width="18" height="14" rx="2" stroke="currentColor" stroke-width="2"/><path d="M3 7L12 13L21 7" stroke="currentColor" stroke-width="2"/></svg>"#;
const INFO_ICON: &str = r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none"><circle cx="12" cy="12" r="9" stroke="currentColor" stroke-width="2"/><path d="M12 8V12M12 16H12.01" stroke="currentColor" stroke-width="2" stroke-linecap="round"/></svg>"#;

fn empty_state(icon: &str, message: &str) -> Markup {
    Markup(format!(
        r#"<div class="empty-state">{icon}<p>{}</p></div>"#,
        escape(message)
    ))
}

fn loading_state(message: &str) -> Markup {
    Markup(format!(
        r#"<div class="loading-state"><div class="loader"></div><p>{}</p></div>"#,
        escape(message)
    ))
}

/// Text shown inside a priority badge.
pub fn badge_text(priority: &str) -> &str {
    priority
}

fn priority_badge(priority: &str) -> String {
    format!(
        r#"<span class="priority-badge {}">{}</span>"#,
        escape(priority),
        escape(badge_text(priority))
    )
}

/// A rendered task card. The filter only ever reads `badge` and flips `visible`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    pub id: String,
    pub badge: String,
    pub visible: bool,
    body: Markup,
}

impl TaskCard {
    pub fn to_markup(&self) -> Markup {
        let display = if self.visible { "block" } else { "none" };
        Markup(format!(
            r#"<div class="task-card" data-id="{}" style="display: {display}">{}</div>"#,
            escape(&self.id),
            self.body
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskList {
    Empty,
    Cards(Vec<TaskCard>),
}

impl TaskList {
    pub fn cards_mut(&mut self) -> &mut [TaskCard] {
        match self {
            TaskList::Empty => &mut [],
            TaskList::Cards(cards) => cards,
        }
    }

    pub fn cards(&self) -> &[TaskCard] {
        match self {
            TaskList::Empty => &[],
            TaskList::Cards(cards) => cards,
        }
    }

    pub fn to_markup(&self) -> Markup {
        match self {
            TaskList::Empty => empty_state(TASKS_ICON, "No tasks yet. Create one from an email!"),
            TaskList::Cards(cards) => Markup(cards.iter().map(|card| card.to_markup().0).collect()),
        }
    }
}

pub fn render_tasks(tasks: &[Task], now: DateTime<Utc>) -> TaskList {
    if tasks.is_empty() {
        return TaskList::Empty;
    }

    let cards = tasks
        .iter()
        .map(|task| {
            let body = format!(
                concat!(
                    r#"<div class="task-header"><h3 class="task-title">{title}</h3>{badge}</div>"#,
                    r#"<p class="task-description">{description}</p>"#,
                    r#"<div class="task-meta"><span class="task-time">{clock} {minutes} min</span>"#,
                    r#"<span class="task-date">Due: {due}</span></div>"#,
                ),
                title = escape(&task.title),
                badge = priority_badge(&task.priority),
                description = escape(&task.description),
                clock = CLOCK_ICON,
                minutes = task.estimated_time,
                due = escape(&relative_date(&task.due_date, now)),
            );
            TaskCard {
                id: task.id.clone(),
                badge: badge_text(&task.priority).to_string(),
                visible: true,
                body: Markup(body),
            }
        })
        .collect();

    TaskList::Cards(cards)
}

pub fn pending_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| task.is_pending()).count()
}

pub fn render_inbox(tasks: &[Task]) -> Markup {
    let items: String = tasks
        .iter()
        .filter(|task| task.is_pending())
        .map(inbox_item)
        .collect();

    if items.is_empty() {
        return empty_state(INBOX_ICON, "Inbox is empty. Great job!");
    }
    Markup(items)
}

fn inbox_item(task: &Task) -> String {
    format!(
        concat!(
            r#"<div class="inbox-item" data-id="{id}"><div class="inbox-icon">{icon}</div>"#,
            r#"<div class="inbox-content"><div class="inbox-header">"#,
            r#"<span class="inbox-sender">{sender}</span>{badge}</div>"#,
            r#"<h4 class="inbox-subject">{subject}</h4>"#,
            r#"<p class="inbox-preview">{preview}</p></div></div>"#,
        ),
        id = escape(&task.id),
        icon = MAIL_ICON,
        sender = escape(&task.from_email),
        badge = priority_badge(&task.priority),
        subject = escape(&task.title),
        preview = escape(&preview(&task.description)),
    )
}

pub fn avatar_initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|first| first.to_uppercase().collect())
        .unwrap_or_default()
}

pub fn render_contact(contact: &Contact, now: DateTime<Utc>) -> Markup {
    let detail = |label: &str, value: String| {
        format!(
            r#"<div class="crm-detail-item"><span class="detail-label">{label}</span><span class="detail-value">{value}</span></div>"#
        )
    };

    let details = [
        detail("Company", escape(&contact.company)),
        detail("Position", escape(&contact.position)),
        detail(
            "Engagement Score",
            format!(r#"<span class="score-badge">{}/100</span>"#, contact.engagement_score),
        ),
        detail("Deal Value", format!("${}", grouped(contact.deal_value))),
        detail("Last Contact", escape(&relative_date(&contact.last_contact, now))),
    ]
    .concat();

    Markup(format!(
        concat!(
            r#"<div class="crm-card"><div class="crm-header">"#,
            r#"<div class="crm-avatar">{initial}</div>"#,
            r#"<div class="crm-info"><h3 class="crm-name">{name}</h3><p class="crm-email">{email}</p></div>"#,
            r#"</div><div class="crm-details">{details}</div></div>"#,
        ),
        initial = escape(&avatar_initial(&contact.name)),
        name = escape(&contact.name),
        email = escape(&contact.email),
        details = details,
    ))
}

pub fn crm_prompt() -> Markup {
    empty_state(CONTACT_ICON, "Search for a contact by email")
}

pub fn crm_searching(email: &str) -> Markup {
    loading_state(&format!("Searching for {email}..."))
}

pub fn crm_not_found() -> Markup {
    empty_state(CONTACT_ICON, "Contact not found")
}

pub fn crm_failed() -> Markup {
    empty_state(CONTACT_ICON, "Failed to search contact")
}

pub fn total_hours(total_minutes: u32) -> u64 {
    (f64::from(total_minutes) / 60.0).round() as u64
}

fn schedule_item(item: &ScheduleItem) -> String {
    format!(
        concat!(
            r#"<div class="schedule-item"><div class="schedule-time">{start}</div>"#,
            r#"<div class="schedule-task"><h4>{task}</h4>{badge}"#,
            r#"<span class="schedule-duration">{duration} min</span></div></div>"#,
        ),
        start = escape(&item.start_time),
        task = escape(&item.task),
        badge = priority_badge(&item.priority),
        duration = item.duration,
    )
}

pub fn render_plan(plan: &DailyPlan) -> Markup {
    let schedule: String = plan.schedule.iter().map(schedule_item).collect();
    Markup(format!(
        concat!(
            r#"<div class="plan-summary">"#,
            r#"<div class="plan-stat"><span class="stat-value">{tasks}</span><span class="stat-label">Tasks Today</span></div>"#,
            r#"<div class="plan-stat"><span class="stat-value">{hours}h</span><span class="stat-label">Total Time</span></div>"#,
            r#"</div><div class="plan-recommendation">{icon}<p>{recommendation}</p></div>"#,
            r#"<div class="plan-schedule">{schedule}</div>"#,
        ),
        tasks = plan.total_tasks,
        hours = total_hours(plan.total_minutes),
        icon = INFO_ICON,
        recommendation = escape(&plan.recommendation),
        schedule = schedule,
    ))
}

pub fn plan_loading() -> Markup {
    loading_state("Generating your plan...")
}

pub fn plan_unavailable() -> Markup {
    empty_state(PLAN_ICON, "No plan available for today")
}

pub fn plan_failed() -> Markup {
    empty_state(PLAN_ICON, "Failed to generate daily plan")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeTier {
    Success,
    Warning,
    Danger,
}

impl GaugeTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            GaugeTier::Success
        } else if score >= 60.0 {
            GaugeTier::Warning
        } else {
            GaugeTier::Danger
        }
    }

    pub fn stroke(self) -> &'static str {
        match self {
            GaugeTier::Success => "var(--accent-blue)",
            GaugeTier::Warning => "var(--accent-warning)",
            GaugeTier::Danger => "var(--accent-danger)",
        }
    }
}

pub fn gauge_arc(score: f64) -> f64 {
    score.clamp(0.0, 100.0) / 100.0 * GAUGE_ARC
}

pub fn render_time_debt(debt: &TimeDebt) -> Markup {
    let tier = GaugeTier::for_score(debt.score);
    let overdue_class = if debt.total_overdue_hours > 0.0 {
        "stat-value text-danger"
    } else {
        "stat-value"
    };
    let breakdown = |label: &str, count: u32| {
        format!(
            r#"<div class="breakdown-item"><span>{label}</span><span class="breakdown-count">{count}</span></div>"#
        )
    };

    Markup(format!(
        concat!(
            r#"<div class="debt-score-container"><div class="debt-gauge"><svg viewBox="0 0 200 120">"#,
            r#"<path d="M 20 100 A 80 80 0 0 1 180 100" fill="none" stroke="var(--border)" stroke-width="20"/>"#,
            r#"<path d="M 20 100 A 80 80 0 0 1 180 100" fill="none" stroke="{stroke}" stroke-width="20" stroke-dasharray="{arc:.2} {full}"/>"#,
            r#"</svg><div class="gauge-value"><span class="score-number">{score}</span>"#,
            r#"<span class="score-status">{status}</span></div></div>"#,
            r#"<div class="debt-stats">"#,
            r#"<div class="debt-stat"><span class="stat-label">Pending Tasks</span><span class="stat-value">{pending}h</span></div>"#,
            r#"<div class="debt-stat"><span class="stat-label">Overdue</span><span class="{overdue_class}">{overdue}h</span></div>"#,
            r#"</div></div>"#,
            r#"<div class="debt-recommendation"><h4>Recommendation</h4><p>{recommendation}</p></div>"#,
            r#"<div class="debt-breakdown"><h4>Task Breakdown</h4><div class="breakdown-list">{breakdown}</div></div>"#,
        ),
        stroke = tier.stroke(),
        arc = gauge_arc(debt.score),
        full = GAUGE_ARC,
        score = debt.score,
        status = escape(&debt.status),
        pending = debt.total_pending_hours,
        overdue_class = overdue_class,
        overdue = debt.total_overdue_hours,
        recommendation = escape(&debt.recommendation),
        breakdown = [
            breakdown("Overdue", debt.breakdown.overdue),
            breakdown("Due Today", debt.breakdown.due_today),
            breakdown("Due This Week", debt.breakdown.due_this_week),
        ]
        .concat(),
    ))
}

pub fn debt_loading() -> Markup {
    loading_state("Calculating time debt...")
}

pub fn debt_unavailable() -> Markup {
    empty_state(GAUGE_ICON, "No time debt data yet")
}

pub fn debt_failed() -> Markup {
    empty_state(GAUGE_ICON, "Failed to calculate time debt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DebtBreakdown;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn task(id: &str, priority: &str, status: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: "Follow up on the quarterly numbers".to_string(),
            priority: priority.to_string(),
            status: status.to_string(),
            estimated_time: 30,
            due_date: "2026-10-19T12:00:00Z".to_string(),
            from_email: "ops@example.com".to_string(),
        }
    }

    #[test]
    fn task_cards_show_every_field() {
        let list = render_tasks(&[task("1", "high", "pending")], now());
        let markup = list.to_markup();
        let html = markup.as_str();

        assert_eq!(list.cards().len(), 1);
        assert!(html.contains(r#"<h3 class="task-title">Task 1</h3>"#));
        assert!(html.contains(r#"<span class="priority-badge high">high</span>"#));
        assert!(html.contains("30 min"));
        assert!(html.contains("Due: Tomorrow"));
        assert!(html.contains("Follow up on the quarterly numbers"));
    }

    #[test]
    fn renderers_are_idempotent() {
        let tasks = vec![task("1", "low", "pending"), task("2", "high", "done")];
        assert_eq!(render_tasks(&tasks, now()), render_tasks(&tasks, now()));
        assert_eq!(render_inbox(&tasks), render_inbox(&tasks));
    }

    #[test]
    fn empty_collections_render_distinct_placeholders() {
        let tasks = render_tasks(&[], now()).to_markup();
        let inbox = render_inbox(&[]);

        assert!(tasks.as_str().contains("No tasks yet. Create one from an email!"));
        assert!(inbox.as_str().contains("Inbox is empty. Great job!"));
        assert!(tasks.as_str().contains("empty-state"));
        assert_ne!(tasks, inbox);
    }

    #[test]
    fn inbox_lists_only_pending_tasks() {
        let tasks = vec![
            task("1", "low", "pending"),
            task("2", "high", "completed"),
            task("3", "medium", "pending"),
        ];
        let html = render_inbox(&tasks);

        assert_eq!(pending_count(&tasks), 2);
        assert_eq!(html.as_str().matches(r#"class="inbox-item""#).count(), 2);
        assert!(!html.as_str().contains(r#"data-id="2""#));
        assert!(html.as_str().contains(r#"<span class="inbox-sender">ops@example.com</span>"#));
    }

    #[test]
    fn inbox_with_no_pending_tasks_is_empty_state() {
        let html = render_inbox(&[task("1", "low", "completed")]);
        assert!(html.as_str().contains("Inbox is empty. Great job!"));
    }

    #[test]
    fn inbox_preview_truncates_long_descriptions() {
        let mut long = task("1", "low", "pending");
        long.description = "x".repeat(150);
        let html = render_inbox(&[long]);
        let expected = format!(r#"<p class="inbox-preview">{}...</p>"#, "x".repeat(100));
        assert!(html.as_str().contains(&expected));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mut hostile = task("1", "low", "pending");
        hostile.title = "<script>alert(1)</script>".to_string();
        let html = render_tasks(&[hostile], now()).to_markup();
        assert!(!html.as_str().contains("<script>"));
        assert!(html.as_str().contains("&lt;script&gt;"));
    }

    #[test]
    fn contact_card_uses_uppercase_initial() {
        let contact = Contact {
            name: "ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: "Analytical Engines".to_string(),
            position: "Founder".to_string(),
            engagement_score: 87.0,
            deal_value: 125000.0,
            last_contact: "2026-10-15T12:00:00Z".to_string(),
        };
        let html = render_contact(&contact, now());

        assert!(html.as_str().contains(r#"<div class="crm-avatar">A</div>"#));
        assert!(html.as_str().contains("87/100"));
        assert!(html.as_str().contains("$125,000"));
        assert!(html.as_str().contains("3 days ago"));
        assert_eq!(avatar_initial(""), "");
    }

    #[test]
    fn plan_keeps_server_order_and_rounds_hours() {
        let plan = DailyPlan {
            total_tasks: 2,
            total_minutes: 150,
            recommendation: "Start with the proposal".to_string(),
            schedule: vec![
                ScheduleItem {
                    start_time: "11:00".to_string(),
                    task: "Later item".to_string(),
                    priority: "low".to_string(),
                    duration: 30,
                },
                ScheduleItem {
                    start_time: "09:00".to_string(),
                    task: "Earlier item".to_string(),
                    priority: "high".to_string(),
                    duration: 120,
                },
            ],
        };
        let html = render_plan(&plan);
        let text = html.as_str();

        assert!(text.contains(r#"<span class="stat-value">3h</span>"#));
        assert!(text.find("Later item").unwrap() < text.find("Earlier item").unwrap());
        assert!(text.contains("120 min"));
        assert_eq!(total_hours(89), 1);
        assert_eq!(total_hours(90), 2);
        assert_eq!(total_hours(0), 0);
    }

    #[test]
    fn gauge_tiers_follow_thresholds() {
        assert_eq!(GaugeTier::for_score(80.0), GaugeTier::Success);
        assert_eq!(GaugeTier::for_score(100.0), GaugeTier::Success);
        assert_eq!(GaugeTier::for_score(79.9), GaugeTier::Warning);
        assert_eq!(GaugeTier::for_score(60.0), GaugeTier::Warning);
        assert_eq!(GaugeTier::for_score(59.0), GaugeTier::Danger);
        assert_eq!(GaugeTier::for_score(0.0), GaugeTier::Danger);
    }

    #[test]
    fn gauge_arc_is_proportional_and_clamped() {
        assert!((gauge_arc(50.0) - 125.6).abs() < 1e-9);
        assert!((gauge_arc(80.0) - 200.96).abs() < 1e-9);
        assert_eq!(gauge_arc(0.0), 0.0);
        assert!((gauge_arc(140.0) - GAUGE_ARC).abs() < 1e-9);
        assert_eq!(gauge_arc(-5.0), 0.0);
    }

    #[test]
    fn time_debt_markup_shows_gauge_and_breakdown() {
        let debt = TimeDebt {
            score: 55.0,
            status: "Overloaded".to_string(),
            total_pending_hours: 12.5,
            total_overdue_hours: 3.0,
            recommendation: "Drop two meetings".to_string(),
            breakdown: DebtBreakdown {
                overdue: 2,
                due_today: 4,
                due_this_week: 9,
            },
        };
        let html = render_time_debt(&debt);
        let text = html.as_str();

        assert!(text.contains(r#"stroke="var(--accent-danger)""#));
        assert!(text.contains(r#"stroke-dasharray="138.16 251.2""#));
        assert!(text.contains(r#"<span class="score-number">55</span>"#));
        assert!(text.contains(r#"<span class="stat-value text-danger">3h</span>"#));
        assert!(text.contains("12.5h"));
        assert!(text.contains(r#"<span>Due This Week</span><span class="breakdown-count">9</span>"#));
    }
}
