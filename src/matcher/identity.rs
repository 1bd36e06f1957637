use crate::page::dom_model::FormControl;

/// Trim and lower-case. Idempotent.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Text of every associated label joined by a single space, trimmed.
pub fn label_text<C: FormControl + ?Sized>(control: &C) -> String {
    control.labels().join(" ").trim().to_string()
}

/// Composite signature: labels, aria-label, placeholder, name, id.
///
/// Always produced, even when every part is empty.
pub fn field_signature<C: FormControl + ?Sized>(control: &C) -> String {
    let parts = [
        label_text(control),
        control.get_attribute("aria-label").unwrap_or("").to_string(),
        control.get_attribute("placeholder").unwrap_or("").to_string(),
        control.name().to_string(),
        control.id().to_string(),
    ];
    normalize_key(&parts.join(" "))
}

/// Candidate keys for a control: signature, then name, then id.
///
/// Deduplicated in first-seen order, empty keys dropped. Every key resolves
/// to the same captured entry.
pub fn field_keys<C: FormControl + ?Sized>(control: &C) -> Vec<String> {
    let mut candidates = vec![field_signature(control)];

    if !control.name().is_empty() {
        candidates.push(normalize_key(control.name()));
    }
    if !control.id().is_empty() {
        candidates.push(normalize_key(control.id()));
    }

    let mut keys: Vec<String> = Vec::with_capacity(candidates.len());
    for key in candidates {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
