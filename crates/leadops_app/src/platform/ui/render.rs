use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use leadops_core::{AppViewModel, BrowserView, FieldValue, MissionView};

/// Shown in place of a missing or sentinel contact field.
pub(crate) const ABSENT: &str = "—";

const BAR_WIDTH: usize = 30;

pub(crate) fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    render_mission(&mut out, &view.mission);
    out.push('\n');
    render_browser(&mut out, &view.browser);

    if let Some(stats) = view.stats {
        out.push_str(&format!(
            "Totals: {} leads across {} locations\n",
            stats.total_leads, stats.locations_count
        ));
    }
    if let Some(notice) = &view.notice {
        out.push_str(&format!("! {notice}\n"));
    }
    if let Some(prompt) = &view.confirmation_prompt {
        out.push_str(&format!("? {prompt} [y/n]\n"));
    }
    out
}

fn render_mission(out: &mut String, mission: &MissionView) {
    out.push_str(&format!("== Mission Control == {}\n", mission.phase));
    out.push_str(&format!("Keywords:  {}\n", numbered(&mission.keywords)));
    out.push_str(&format!("Locations: {}\n", numbered(&mission.locations)));

    match &mission.job {
        Some(job) => {
            out.push_str(&format!(
                "Task {} [{}] {:>3}% {}\n",
                job.task_id,
                progress_bar(job.progress),
                job.progress,
                job.status
            ));
            if let Some(found) = job.leads_found {
                out.push_str(&format!("Leads found: {found}\n"));
            }
            if !job.message.is_empty() {
                out.push_str(&format!("{}\n", job.message));
            }
            if mission.can_dismiss {
                out.push_str("(dismiss to clear)\n");
            }
        }
        None if mission.can_launch => out.push_str("Ready to launch\n"),
        None => {}
    }
}

fn render_browser(out: &mut String, browser: &BrowserView) {
    let filter = browser.keyword_filter.as_deref().unwrap_or("all");
    out.push_str(&format!(
        "== Leads == {}-{} of {} | page {}/{} | search \"{}\" | keyword {}",
        browser.showing_from,
        browser.showing_to,
        browser.total_count,
        browser.page,
        browser.total_pages.max(1),
        browser.search,
        filter
    ));
    if browser.selected_count > 0 {
        out.push_str(&format!(" | {} selected", browser.selected_count));
    }
    if browser.loading {
        out.push_str(" | loading");
    }
    if browser.bulk_deleting {
        out.push_str(" | deleting");
    }
    out.push('\n');

    if !browser.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", browser.keywords.join(", ")));
    }

    if browser.rows.is_empty() {
        out.push_str("No leads\n");
        return;
    }
    out.push_str(&lead_table(browser).to_string());
    out.push('\n');
}

fn lead_table(browser: &BrowserView) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#", "Sel", "Name", "Phone", "Email", "Website", "Address", "City", "Country",
            "Keyword",
        ]);
    for (i, row) in browser.rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(if row.selected { "[x]" } else { "[ ]" }),
            Cell::new(display(&row.name)),
            Cell::new(display(&row.phone)),
            Cell::new(display(&row.email)),
            Cell::new(display(&row.website)),
            Cell::new(display(&row.address)),
            Cell::new(display(&row.city)),
            Cell::new(display(&row.country)),
            Cell::new(display(&row.keyword)),
        ]);
    }
    table
}

pub(crate) fn display(value: &FieldValue) -> &str {
    value.present().unwrap_or(ABSENT)
}

fn numbered(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}) {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("  ")
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
