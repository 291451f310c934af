//! Stateless helpers for record conversion.

/// First non-blank of `display_name`, `name`, falling back to `id`.
pub fn derive_display_name(id: &str, display_name: Option<&str>, name: Option<&str>) -> String {
    [display_name, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(id)
        .to_string()
}
