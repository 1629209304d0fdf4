use notary_core::{AccountView, AppViewModel, HistoryRowView};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn render(view: &AppViewModel) -> Vec<String> {
    let tool = match view.tool_available {
        None => "checking",
        Some(true) => "available",
        Some(false) => "NOT AVAILABLE",
    };
    let accounts = if view.accounts.is_empty() {
        "-".to_string()
    } else {
        view.accounts.join(", ")
    };

    let mut lines = vec![format!("Tool: {} | Accounts: {}", tool, accounts)];
    match &view.active {
        Some(active) => render_account(active, &mut lines),
        None => lines.push("No account selected".to_string()),
    }
    lines
}

fn render_account(active: &AccountView, lines: &mut Vec<String>) {
    let activity = match (active.loading, active.refreshing, active.enriching) {
        (true, _, _) => " [loading]",
        (false, true, true) => " [refreshing, enriching]",
        (false, true, false) => " [refreshing]",
        (false, false, true) => " [enriching]",
        (false, false, false) => "",
    };
    lines.push(format!(
        "{}: {} submission(s){}",
        active.account,
        active.rows.len(),
        activity
    ));
    lines.extend(active.rows.iter().map(format_row));
}

fn format_row(row: &HistoryRowView) -> String {
    let outcome = if row.success { "ok" } else { "FAILED" };
    let mut line = format!(
        "  {}  {}  {:<6} {} ({})",
        row.submitted_at.format(TIMESTAMP_FORMAT),
        row.uuid,
        outcome,
        row.status_message,
        row.status_code
    );
    if let Some(url) = &row.detail_url {
        line.push_str("  ");
        line.push_str(url);
    }
    line
}
