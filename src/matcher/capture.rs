use tracing::debug;

use crate::matcher::identity::field_keys;
use crate::page::dom_model::{ControlTag, Document, FormControl};
use crate::profile::profile_model::{FieldEntry, FieldType, FieldValue, Profile};

/// Semantic kind of a control, deciding how it is captured and filled.
pub fn control_kind<C: FormControl + ?Sized>(control: &C) -> FieldType {
    if control.tag() == ControlTag::Select {
        return FieldType::Select;
    }

    match control.input_type().as_str() {
        "checkbox" => FieldType::Checkbox,
        "radio" => FieldType::Radio,
        _ => FieldType::Text,
    }
}

/// Value worth capturing from a single control, if any.
pub fn capture_entry<C: FormControl + ?Sized>(control: &C) -> Option<FieldEntry> {
    if control.disabled() {
        return None;
    }

    match control_kind(control) {
        FieldType::Select => (!control.value().is_empty())
            .then(|| FieldEntry::new(control.value(), FieldType::Select)),
        // Unchecked boxes mean "leave as-is", never "set false".
        FieldType::Checkbox => control
            .checked()
            .then(|| FieldEntry::new(FieldValue::Bool(true), FieldType::Checkbox)),
        FieldType::Radio => control
            .checked()
            .then(|| FieldEntry::new(control.value(), FieldType::Radio)),
        FieldType::Text => {
            let value = control.value().trim();
            (!value.is_empty()).then(|| FieldEntry::new(value, FieldType::Text))
        }
    }
}

/// Scan every control in DOM order and build a profile.
///
/// A key produced by two controls belongs to the later one.
pub fn collect_fields<D: Document + ?Sized>(document: &D) -> Profile {
    let mut profile = Profile::new();
    let mut captured = 0usize;

    for control in document.controls() {
        let Some(entry) = capture_entry(control) else {
            continue;
        };

        let keys = field_keys(control);
        if keys.is_empty() {
            continue;
        }

        profile.register(&keys, entry);
        captured += 1;
    }

    debug!(
        controls = document.controls().len(),
        captured,
        keys = profile.len(),
        "collected fields"
    );
    profile
}
