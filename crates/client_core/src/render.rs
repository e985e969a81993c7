//! Presentation helpers shared by the CLI and the GUI.

use shared::domain::Customer;

use crate::list_store::{FetchState, ListSnapshot};

pub const BUSINESS_NAME_PLACEHOLDER: &str = "-";
pub const LOADING_TEXT: &str = "Loading...";
pub const COLUMN_HEADERS: [&str; 4] = ["First Name", "Last Name", "Email", "Business Name"];
const CELL_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    /// Row identity; the email within a single fetch result.
    pub key: String,
    pub cells: [String; 4],
}

impl CustomerRow {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            key: customer.email.clone(),
            cells: [
                customer.first_name.clone(),
                customer.last_name.clone(),
                customer.email.clone(),
                display_business_name(customer.business_name.as_deref()).to_string(),
            ],
        }
    }

    pub fn to_line(&self) -> String {
        self.cells.join(CELL_SEPARATOR)
    }
}

/// Absent, empty and whitespace-only names all render as the placeholder.
pub fn display_business_name(business_name: Option<&str>) -> &str {
    match business_name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => BUSINESS_NAME_PLACEHOLDER,
    }
}

pub fn rows(customers: &[Customer]) -> Vec<CustomerRow> {
    customers.iter().map(CustomerRow::from_customer).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Error(String),
    Table(Vec<CustomerRow>),
}

impl ListView {
    pub fn from_snapshot(snapshot: &ListSnapshot) -> Self {
        match &snapshot.state {
            FetchState::Loading => Self::Loading,
            FetchState::Error(err) => Self::Error(format!("Error: {}", err.message)),
            FetchState::Ready(customers) => Self::Table(rows(customers)),
        }
    }
}

/// Plain-text table with aligned columns, header first.
pub fn render_table(rows: &[CustomerRow]) -> String {
    let mut widths = COLUMN_HEADERS.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR)
            .trim_end()
            .to_string()
    };

    let mut out = format_line(&COLUMN_HEADERS);
    out.push('\n');
    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("-+-");
    out.push_str(&rule);
    out.push('\n');
    for row in rows {
        let cells = row.cells.each_ref().map(String::as_str);
        out.push_str(&format_line(&cells));
        out.push('\n');
    }
    out
}

pub fn render_view(view: &ListView) -> String {
    match view {
        ListView::Loading => format!("{LOADING_TEXT}\n"),
        ListView::Error(message) => format!("{message}\n"),
        ListView::Table(rows) => render_table(rows),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
