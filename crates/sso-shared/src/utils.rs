//! Utility functions

/// True when the string is empty or whitespace only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Masks a principal or attribute value for log output.
pub fn mask_identifier(value: &str) -> String {
    let visible: String = value.chars().take(2).collect();
    if visible.is_empty() {
        "***".to_string()
    } else {
        format!("{}***", visible)
    }
}
