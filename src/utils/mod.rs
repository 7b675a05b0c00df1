pub mod logging;

/// Turns an attribute name into a label: `"username_attr"` becomes
/// `"Username attr"`, `"account_id"` becomes `"Account"`.
pub fn humanize(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field);
    let spaced = base.replace('_', " ").trim().to_lowercase();

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
