//! Console formatting for provisioning reports

use colored::Colorize;
use std::fmt::Display;

/// A formatted section title
#[derive(Debug)]
pub(crate) struct SectionTitle(pub(crate) &'static str);

impl Display for SectionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self.0.bold().underline())
    }
}

/// Format a section header
pub(crate) const fn section_title(title: &'static str) -> SectionTitle {
    SectionTitle(title)
}

/// Format a success message
pub(crate) fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a failure message
pub(crate) fn failure(message: &str) -> String {
    format!("❌ {}", message.red().bold())
}

/// Format a warning message
pub(crate) fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format a key-value section
pub(crate) fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("  {}", title.bold());

    for (key, value) in items {
        result.push_str(&format!("\n    {}: {}", key.bold(), value));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_box_lists_items() {
        colored::control::set_override(false);
        let rendered = key_value_box("Status", vec![("PIN retries", "3".to_string())]);
        assert_eq!(rendered, "  Status\n    PIN retries: 3");
    }
}
