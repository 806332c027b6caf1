//! Fixed-width text rendering of a receipt draft, as a thermal printer would
//! lay it out.

use crate::draft::{DraftError, ReceiptDraft};

/// Characters per line on 58 mm paper.
pub const RECEIPT_WIDTH: usize = 32;

const ADDRESS_LINES: [&str; 2] = ["123 Main Street", "City, ST 12345"];
const FOOTER_LINES: [&str; 2] = ["Thank you for your business!", "Powered by Square"];

/// Fails only when the draft's amounts are out of range.
pub fn render_receipt(draft: &ReceiptDraft, width: usize) -> Result<String, DraftError> {
    let width = width.max(16);
    let rule = "-".repeat(width);
    let totals = draft.totals()?;
    let mut lines: Vec<String> = Vec::new();

    lines.push(center(&draft.store_name.to_uppercase(), width));
    lines.extend(ADDRESS_LINES.iter().map(|line| center(line, width)));
    lines.push(rule.clone());
    lines.push(columns("Order:", &draft.order_number, width));
    lines.push(columns("Date:", &draft.date.format("%-m/%-d/%Y").to_string(), width));
    lines.push(columns("Customer:", &draft.customer, width));
    lines.push(rule.clone());
    for item in &draft.items {
        let line_total = item.line_total().ok_or(DraftError::TooLarge)?;
        let label = match item.quantity() {
            1 => item.name.clone(),
            qty => format!("{qty} x {}", item.name),
        };
        lines.push(columns(&label, &format!("${line_total}"), width));
    }
    lines.push(rule);
    lines.push(columns("Subtotal:", &format!("${}", totals.subtotal), width));
    lines.push(columns("Tax:", &format!("${}", totals.tax), width));
    lines.push(columns("Total:", &format!("${}", totals.total), width));
    lines.push(String::new());
    lines.extend(FOOTER_LINES.iter().map(|line| center(line, width)));

    let mut out = lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    Ok(out)
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Left label and right-aligned value. Labels that would collide with the
/// value are cut short.
fn columns(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len + 1);
    let left: String = left.chars().take(room).collect();
    let pad = width.saturating_sub(left.chars().count() + right_len);
    format!("{left}{}{right}", " ".repeat(pad.max(1)))
}
