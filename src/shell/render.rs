use chrono::NaiveDate;

use crate::directory::DirectoryListing;
use crate::engine::ClientStatement;
use crate::models::OFFLINE_NOTICE;
use crate::report::{HEADERS, INITIAL_BALANCE_LABEL};
use crate::shell::NO_MOVEMENTS_MESSAGE;
use crate::types::{format_currency, round_for_display};

pub const OFFLINE_BANNER: &str = "Working offline";

/// Plain-text view of a statement, most recent movement first.
pub fn render_statement(statement: &ClientStatement, today: NaiveDate) -> String {
    let mut lines = vec![format!("Movimientos del Cliente {}", statement.client_id)];

    if statement.is_empty() {
        lines.push(NO_MOVEMENTS_MESSAGE.to_string());
        return join_lines(&lines)
    }

    let headline = format_currency(round_for_display(statement.current_balance()).abs());
    lines.push(format!("Saldo Actual: {headline} (al {})", today.format("%d/%m/%Y")));

    if statement.from_cache {
        lines.push(match &statement.last_update {
            Some(last_update) => format!("{OFFLINE_NOTICE} (data as of {last_update})"),
            None => OFFLINE_NOTICE.to_string(),
        });
    }

    lines.push(String::new());
    lines.push(table_line(&HEADERS));

    for movement in &statement.movements {
        let amount = format_currency(round_for_display(movement.amount.abs()));
        let balance = format_currency(round_for_display(movement.running_balance));
        let category = movement.category.to_string();

        lines.push(table_line(&[
            movement.display_date.as_str(),
            category.as_str(),
            amount.as_str(),
            movement.payment_method_label(),
            balance.as_str(),
        ]));
    }

    if let Some(balance) = &statement.initial_balance {
        lines.push(String::new());
        lines.push(format!(
            "{INITIAL_BALANCE_LABEL}: {} ({})",
            format_currency(round_for_display(balance.amount)),
            balance.date
        ));
    }

    join_lines(&lines)
}

/// Every line newline-terminated.
fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn table_line(cells: &[&str; 5]) -> String {
    let [date, category, amount, payment_method, balance] = cells;

    format!("{date:<12}{category:<22}{amount:>16}  {payment_method:<16}{balance:>16}")
        .trim_end()
        .to_string()
}

pub fn render_listing(listing: &DirectoryListing, query: &str) -> String {
    let matches = listing.search(query);
    let mut lines: Vec<String> = matches.iter().map(|entry| entry.label.clone()).collect();

    if matches.is_empty() {
        lines.push(format!("No clients match [{query}]"));
    }

    if listing.from_cache {
        if let Some(last_update) = &listing.last_update {
            lines.push(format!("Client list last updated: {last_update}"));
        }
    }

    join_lines(&lines)
}

/// Connectivity line shown above the prompt, if any.
pub fn render_connection(connected: bool, statement: Option<&ClientStatement>) -> Option<String> {
    if connected {
        return None
    }

    let banner = match statement.and_then(|statement| statement.last_update.as_deref()) {
        Some(last_update) => format!("{OFFLINE_BANNER} (client data last updated: {last_update})"),
        None => OFFLINE_BANNER.to_string(),
    };

    Some(banner)
}
