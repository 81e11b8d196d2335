//! CLI Output Formatting Module
//! Provides consistent, colorized output for terminal UX

use crate::engine::rbac::{Action, PermissionSet};
use colored::Colorize;

pub struct CliFormatter;

impl CliFormatter {
    /// Print an allow decision
    pub fn allowed(message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    /// Print a deny decision
    pub fn denied(message: &str) {
        println!("{} {}", "✗".red().bold(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    /// Print a section header
    pub fn header(title: &str) {
        println!("\n{}", title.bright_cyan().bold());
        println!("{}", "─".repeat(title.chars().count()).bright_black());
    }

    /// Print a key-value pair
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", key.bright_white().bold(), value);
    }

    /// Print a list item
    pub fn item(text: &str) {
        println!("  {} {}", "•".bright_black(), text);
    }

    /// Print a table header
    pub fn table_header(columns: &[String]) {
        println!("  {}", columns.join(" │ ").bright_white().bold());
        let width: usize = columns.iter().map(|c| c.chars().count()).sum::<usize>() + 3 * columns.len().saturating_sub(1);
        println!("  {}", "─".repeat(width).bright_black());
    }

    /// Print a table row
    pub fn table_row(values: &[String]) {
        println!("  {}", values.join(" │ "));
    }
}

/// Compact `rwd` rendering of a permission set, `-` for each missing action
pub fn permission_cell(set: PermissionSet) -> String {
    Action::ALL
        .iter()
        .map(|a| {
            if set.contains(*a) {
                a.as_str()[..1].to_string()
            } else {
                "-".to_string()
            }
        })
        .collect()
}

/// Pad to a fixed column width
pub fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_cell() {
        assert_eq!(permission_cell(PermissionSet::FULL), "rwd");
        assert_eq!(permission_cell(PermissionSet::READ), "r--");
        assert_eq!(permission_cell(PermissionSet::NONE), "---");
        assert_eq!(permission_cell(PermissionSet::of(&[Action::Read, Action::Delete])), "r-d");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("lab", 6), "lab   ");
        assert_eq!(pad("medical_records", 4), "medical_records");
    }
}
