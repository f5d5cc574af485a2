use crate::dispatch::View;
use crate::format::ToastKind;
use crate::render::escape;
use crate::store::Tab;
use std::time::Instant;

const PRIORITY_OPTIONS: [(&str, &str); 4] = [
    ("all", "All priorities"),
    ("high", "High"),
    ("medium", "Medium"),
    ("low", "Low"),
];

fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Inbox => "Inbox",
        Tab::Tasks => "Tasks",
        Tab::Crm => "CRM",
        Tab::Plan => "Daily Plan",
        Tab::Debt => "Time Debt",
    }
}

fn active_class(active: bool) -> &'static str {
    if active { " active" } else { "" }
}

fn hidden_class(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

fn render_tab_buttons(current: Tab, inbox_count: usize) -> String {
    Tab::ALL
        .into_iter()
        .map(|tab| {
            let count = if tab == Tab::Inbox {
                format!(r#" <span id="inbox-count" class="count">{inbox_count}</span>"#)
            } else {
                String::new()
            };
            format!(
                r#"<form method="post" action="/tab/{name}"><button class="tab-btn{active}" data-tab="{name}" type="submit">{label}{count}</button></form>"#,
                name = tab.as_str(),
                active = active_class(tab == current),
                label = tab_label(tab),
            )
        })
        .collect()
}

fn render_filter_options(selected: &str) -> String {
    PRIORITY_OPTIONS
        .iter()
        .map(|(value, label)| {
            let marker = if *value == selected { " selected" } else { "" };
            format!(r#"<option value="{value}"{marker}>{label}</option>"#)
        })
        .collect()
}

pub fn render_index(view: &View, now: Instant) -> String {
    let state = view.state();
    let doc = view.document();
    let panel = |tab: Tab| active_class(state.tab == tab);

    let (toast_class, toast_message) = match view.visible_toast(now) {
        Some(toast) => (
            match toast.kind {
                ToastKind::Success => "toast success",
                ToastKind::Error => "toast error",
            },
            escape(&toast.message),
        ),
        None => ("toast hidden", String::new()),
    };

    let tabs = render_tab_buttons(state.tab, doc.inbox_count);
    let filter_options = render_filter_options(&state.task_filter);
    let crm_query = escape(&state.crm_query);
    let plan_date = escape(&doc.plan_date);
    let tasks_list = doc.tasks_list.to_markup();

    fill(
        INDEX_HTML,
        &[
            ("BODY_CLASS", if doc.light_mode { "light-mode" } else { "" }),
            ("SUN_HIDDEN", hidden_class(doc.sun_icon_hidden)),
            ("MOON_HIDDEN", hidden_class(doc.moon_icon_hidden)),
            ("TABS", tabs.as_str()),
            ("INBOX_ACTIVE", panel(Tab::Inbox)),
            ("TASKS_ACTIVE", panel(Tab::Tasks)),
            ("CRM_ACTIVE", panel(Tab::Crm)),
            ("PLAN_ACTIVE", panel(Tab::Plan)),
            ("DEBT_ACTIVE", panel(Tab::Debt)),
            ("FILTER_OPTIONS", filter_options.as_str()),
            ("CRM_QUERY", crm_query.as_str()),
            ("PLAN_DATE", plan_date.as_str()),
            ("TOAST_CLASS", toast_class),
            ("TOAST_MESSAGE", toast_message.as_str()),
            ("INBOX_LIST", doc.inbox_list.as_str()),
            ("TASKS_LIST", tasks_list.as_str()),
            ("CRM_CONTENT", doc.crm_content.as_str()),
            ("PLAN_CONTENT", doc.plan_content.as_str()),
            ("DEBT_CONTENT", doc.debt_content.as_str()),
        ],
    )
}

/// Substitutes `{{KEY}}` slots in one pass, so text inserted into a slot is
/// never scanned for further slots. Unknown keys are left as written.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match slots.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>TaskFlow AI</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap');

    :root {
      --bg: #0f1419;
      --card: #1a2029;
      --ink: #e6e8eb;
      --muted: #8b95a1;
      --border: #2a3441;
      --accent-blue: #4a9eff;
      --accent-warning: #f5a524;
      --accent-danger: #f05252;
    }

    body.light-mode {
      --bg: #f6f7f9;
      --card: #ffffff;
      --ink: #1d232b;
      --muted: #5f6b78;
      --border: #dde2e8;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    form {
      margin: 0;
    }

    .app {
      width: min(920px, 100%);
      margin: 0 auto;
      padding: 28px 18px 48px;
      display: grid;
      gap: 22px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .header-actions {
      display: flex;
      gap: 8px;
    }

    button, select, input {
      font: inherit;
      color: inherit;
    }

    .icon-btn {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 12px;
      padding: 8px 10px;
      cursor: pointer;
    }

    .hidden {
      display: none !important;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: var(--card);
      border-radius: 999px;
    }

    .tab-btn {
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      color: var(--muted);
      cursor: pointer;
    }

    .tab-btn.active {
      background: var(--accent-blue);
      color: white;
    }

    .count {
      background: var(--accent-danger);
      color: white;
      border-radius: 999px;
      padding: 0 7px;
      font-size: 0.8rem;
    }

    .panel {
      display: none;
      gap: 14px;
    }

    .panel.active {
      display: grid;
    }

    .panel-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .task-card, .inbox-item, .crm-card, .schedule-item, .debt-score-container,
    .debt-recommendation, .debt-breakdown, .plan-recommendation, .plan-stat {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 16px;
      padding: 16px;
    }

    .task-header, .inbox-header, .crm-header, .task-meta {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 10px;
    }

    .inbox-item {
      display: flex;
      gap: 12px;
    }

    .priority-badge {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.8rem;
      text-transform: capitalize;
      border: 1px solid var(--border);
    }

    .priority-badge.high {
      color: var(--accent-danger);
    }

    .priority-badge.medium {
      color: var(--accent-warning);
    }

    .priority-badge.low {
      color: var(--accent-blue);
    }

    .empty-state, .loading-state {
      display: grid;
      place-items: center;
      padding: 36px 12px;
      color: var(--muted);
      text-align: center;
    }

    .crm-avatar {
      width: 48px;
      height: 48px;
      border-radius: 50%;
      background: var(--accent-blue);
      color: white;
      display: grid;
      place-items: center;
      font-weight: 600;
    }

    .crm-detail-item, .breakdown-item {
      display: flex;
      justify-content: space-between;
      padding: 8px 0;
      border-bottom: 1px solid var(--border);
    }

    .plan-summary, .debt-stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .stat-value {
      display: block;
      font-size: 1.6rem;
      font-weight: 600;
    }

    .stat-label, .detail-label, .plan-date {
      color: var(--muted);
    }

    .text-danger {
      color: var(--accent-danger);
    }

    .debt-gauge {
      position: relative;
      max-width: 240px;
      margin: 0 auto;
      text-align: center;
    }

    .score-number {
      display: block;
      font-size: 2.4rem;
      font-weight: 600;
    }

    .toast {
      position: fixed;
      right: 20px;
      bottom: 20px;
      background: var(--card);
      border: 1px solid var(--border);
      border-left: 4px solid var(--accent-blue);
      border-radius: 12px;
      padding: 12px 16px;
    }

    .toast.error {
      border-left-color: var(--accent-danger);
    }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <main class="app">
    <header>
      <h1>TaskFlow AI</h1>
      <div class="header-actions">
        <form method="post" action="/theme">
          <button id="theme-toggle" class="icon-btn" type="submit" aria-label="Toggle theme">
            <span class="sun-icon{{SUN_HIDDEN}}">&#9728;</span>
            <span class="moon-icon{{MOON_HIDDEN}}">&#9790;</span>
          </button>
        </form>
        <form method="post" action="/refresh">
          <button id="refresh-btn" class="icon-btn" type="submit" aria-label="Refresh">&#8635;</button>
        </form>
      </div>
    </header>

    <nav class="tabs">{{TABS}}</nav>

    <section id="inbox-panel" class="panel{{INBOX_ACTIVE}}">
      <div id="inbox-list">{{INBOX_LIST}}</div>
    </section>

    <section id="tasks-panel" class="panel{{TASKS_ACTIVE}}">
      <div class="panel-header">
        <h2>Tasks</h2>
        <form method="post" action="/tasks/filter">
          <select id="task-filter" name="priority">{{FILTER_OPTIONS}}</select>
          <noscript><button type="submit">Filter</button></noscript>
        </form>
      </div>
      <div id="tasks-list">{{TASKS_LIST}}</div>
    </section>

    <section id="crm-panel" class="panel{{CRM_ACTIVE}}">
      <div class="panel-header">
        <form method="post" action="/crm/search">
          <input id="crm-search" name="email" type="email" placeholder="contact@company.com" value="{{CRM_QUERY}}" />
          <button type="submit">Search</button>
        </form>
        <form method="post" action="/crm/refresh">
          <button id="refresh-crm" class="icon-btn" type="submit" aria-label="Search again">&#8635;</button>
        </form>
      </div>
      <div id="crm-content">{{CRM_CONTENT}}</div>
    </section>

    <section id="plan-panel" class="panel{{PLAN_ACTIVE}}">
      <div class="panel-header">
        <h2>Daily Plan</h2>
        <span id="plan-date" class="plan-date">{{PLAN_DATE}}</span>
      </div>
      <div id="plan-content">{{PLAN_CONTENT}}</div>
    </section>

    <section id="debt-panel" class="panel{{DEBT_ACTIVE}}">
      <h2>Time Debt</h2>
      <div id="debt-content">{{DEBT_CONTENT}}</div>
    </section>
  </main>

  <div id="toast" class="{{TOAST_CLASS}}"><span id="toast-message">{{TOAST_MESSAGE}}</span></div>

  <script>
    const toast = document.getElementById('toast');
    if (!toast.classList.contains('hidden')) {
      setTimeout(() => toast.classList.add('hidden'), 3000);
    }

    const taskFilter = document.getElementById('task-filter');
    taskFilter.addEventListener('change', () => taskFilter.form.submit());
  </script>
</body>
</html>
"#;
