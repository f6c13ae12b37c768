//! Server-rendered HTML pages.
//!
//! DESIGN
//! ======
//! Pages are plain strings: a shared layout template with `{{...}}` slots,
//! filled with fragments built here. Every value that came from the backend
//! or the request goes through `html_escape` before it is placed.
//! `{{CONTENT}}` is always substituted last so placeholder-shaped text in
//! data is never expanded.

use std::fmt::Write as _;

use crate::services::logout::Notice;
use crate::services::records::{Proof, User, display_date};
use crate::services::statistics::{CHART_HEIGHT, CHART_WIDTH, GrowthChart, Statistics};

const LAYOUT_TEMPLATE: &str = include_str!("../templates/layout.html");
const LOGIN_TEMPLATE: &str = include_str!("../templates/login.html");

pub const LOGIN_FAILED: &str = "Invalid credentials. Please try again.";
pub const LOGIN_UNAVAILABLE: &str = "Login service unavailable. Please try again later.";

const NAV_ITEMS: &[(&str, &str)] = &[
    ("/dashboard/statistics", "Statistics"),
    ("/dashboard/users", "Users"),
    ("/dashboard/proofs", "Proofs"),
];

/// Escape text for HTML content and quoted attributes. The invoice crate
/// keeps its own copy so it builds without the dashboard.
#[must_use]
pub fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, active: &str, content: &str) -> String {
    let nav = NAV_ITEMS
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { " class=\"active\"" } else { "" };
            format!("        <a href=\"{href}\"{class}>{label}</a>")
        })
        .collect::<Vec<_>>()
        .join("\n");

    LAYOUT_TEMPLATE
        .replace("{{TITLE}}", &html_escape(title))
        .replace("{{NAV}}", &nav)
        .replace("{{CONTENT}}", content)
}

fn error_card(message: &str) -> String {
    format!("<div class=\"card\"><p class=\"error\">{}</p></div>", html_escape(message))
}

fn search_form(action: &str, placeholder: &str, query: &str) -> String {
    format!(
        "<form class=\"search\" method=\"get\" action=\"{action}\">\
         <input type=\"search\" name=\"search\" placeholder=\"{placeholder}\" value=\"{}\">\
         </form>",
        html_escape(query)
    )
}

fn cell(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => html_escape(v),
        None => "-".to_owned(),
    }
}

// =============================================================================
// LOGIN
// =============================================================================

/// Login page with an optional notice (e.g. session expired) and error.
#[must_use]
pub fn login_page(email: &str, error: Option<&str>, notice: Option<Notice>) -> String {
    let mut messages = String::new();
    if let Some(notice) = notice {
        let _ = writeln!(messages, "    <div class=\"notice info\">{}</div>", html_escape(notice.message()));
    }
    if let Some(error) = error {
        let _ = writeln!(messages, "    <div class=\"notice error\">{}</div>", html_escape(error));
    }

    LOGIN_TEMPLATE
        .replace("{{EMAIL}}", &html_escape(email))
        .replace("{{MESSAGES}}", &messages)
}

// =============================================================================
// USERS
// =============================================================================

#[must_use]
pub fn users_page(users: &[&User], search: &str) -> String {
    let rows = if users.is_empty() {
        "<tr><td class=\"empty\" colspan=\"5\">No users found</td></tr>".to_owned()
    } else {
        users.iter().map(|u| user_row(u)).collect::<Vec<_>>().join("\n")
    };

    let content = format!(
        "<div class=\"card\">\
         <h3>Users</h3><p class=\"description\">Manage and view all registered users</p>\
         {search}\
         <table><thead><tr><th>Name</th><th>Email</th><th>Status</th><th>Onboarding</th><th>Registered</th></tr></thead>\
         <tbody>\n{rows}\n</tbody></table></div>",
        search = search_form("/dashboard/users", "Search users...", search),
    );
    layout("Users", "/dashboard/users", &content)
}

fn user_row(user: &User) -> String {
    let status_class = if user.is_premium() { "green" } else { "gray" };
    let (onboarding_class, onboarding) = if user.onboarding_data.onboarding_done {
        ("blue", "Completed")
    } else {
        ("yellow", "Pending")
    };
    format!(
        "<tr><td>{name}</td><td>{email}</td>\
         <td><span class=\"badge {status_class}\">{status}</span></td>\
         <td><span class=\"badge {onboarding_class}\">{onboarding}</span></td>\
         <td>{registered}</td></tr>",
        name = cell(Some(&user.name)),
        email = cell(Some(&user.email)),
        status = cell(Some(&user.membership_status)),
        registered = cell(display_date(user.registration_date.as_deref())),
    )
}

// =============================================================================
// PROOFS
// =============================================================================

#[must_use]
pub fn proofs_page(proofs: &[&Proof], search: &str) -> String {
    let rows = if proofs.is_empty() {
        "<tr><td class=\"empty\" colspan=\"4\">No proofs found</td></tr>".to_owned()
    } else {
        proofs
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    cell(p.title.as_deref()),
                    cell(p.proof_type.as_deref()),
                    cell(p.country_code.as_deref()),
                    cell(display_date(p.inserted_at.as_deref())),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        "<div class=\"card\">\
         <h3>Proofs</h3><p class=\"description\">View and manage user proofs</p>\
         {search}\
         <table><thead><tr><th>Title</th><th>Type</th><th>Country</th><th>Date</th></tr></thead>\
         <tbody>\n{rows}\n</tbody></table></div>",
        search = search_form("/dashboard/proofs", "Search proofs...", search),
    );
    layout("Proofs", "/dashboard/proofs", &content)
}

// =============================================================================
// STATISTICS
// =============================================================================

#[must_use]
pub fn statistics_page(stats: &Statistics) -> String {
    let u = &stats.user_types;
    let cards = [
        summary_card("Total Users", &u.total_users.to_string(), &format!("{} new this month", stats.recent_activity.new_users_this_month)),
        summary_card("Premium Users", &u.premium.to_string(), &format!("{} conversion rate", stats.conversion_rate())),
        summary_card("Freemium Users", &u.freemium.to_string(), &format!("{} new today", stats.recent_activity.new_users_today)),
        summary_card(
            "Onboarding Success",
            &stats.completion_rate(),
            &format!("{} completed", stats.onboarding_success.completed),
        ),
    ]
    .concat();

    let bars = stats
        .country_bars()
        .iter()
        .map(|bar| {
            format!(
                "<div class=\"country\"><span class=\"name\">{}</span>\
                 <div class=\"track\"><div class=\"fill\" style=\"width: {:.1}%\"></div></div>\
                 <span class=\"value\">{}</span></div>",
                html_escape(&bar.country),
                bar.percent,
                bar.label(),
            )
        })
        .collect::<String>();

    let content = format!(
        "<div class=\"grid cards\">{cards}</div>\
         <div class=\"grid charts\">\
         <div class=\"card\"><h3>User Growth</h3><p class=\"description\">Premium vs Freemium users over time</p>{chart}</div>\
         <div class=\"card\"><h3>Top Countries</h3><p class=\"description\">User distribution by country</p>{bars}</div>\
         </div>",
        chart = growth_svg(&stats.growth_chart()),
    );
    layout("Statistics", "/dashboard/statistics", &content)
}

fn summary_card(title: &str, value: &str, detail: &str) -> String {
    format!(
        "<div class=\"card\"><p class=\"muted\">{}</p><div class=\"metric\">{}</div><p class=\"muted\">{}</p></div>",
        html_escape(title),
        html_escape(value),
        html_escape(detail)
    )
}

fn growth_svg(chart: &GrowthChart) -> String {
    let mut svg = format!("<svg class=\"chart\" viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" role=\"img\" aria-label=\"User growth\">");
    for (y, value) in &chart.y_ticks {
        let _ = write!(
            svg,
            "<line class=\"grid-line\" x1=\"30\" x2=\"{x2}\" y1=\"{y:.1}\" y2=\"{y:.1}\"/>\
             <text x=\"26\" y=\"{y:.1}\" text-anchor=\"end\">{value}</text>",
            x2 = CHART_WIDTH - 30.0,
        );
    }
    for (x, month) in &chart.months {
        let _ = write!(
            svg,
            "<text x=\"{x:.1}\" y=\"{y}\" text-anchor=\"middle\">{}</text>",
            html_escape(month),
            y = CHART_HEIGHT - 10.0,
        );
    }
    let _ = write!(
        svg,
        "<polyline class=\"premium\" fill=\"none\" stroke-width=\"2\" points=\"{}\"/>\
         <polyline class=\"freemium\" fill=\"none\" stroke-width=\"2\" points=\"{}\"/></svg>",
        GrowthChart::polyline(&chart.premium),
        GrowthChart::polyline(&chart.freemium),
    );
    svg
}

/// Page for a view whose data could not be loaded.
#[must_use]
pub fn failed_page(title: &str, active: &str, message: &str) -> String {
    layout(title, active, &error_card(message))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
