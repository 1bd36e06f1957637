use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::matcher::capture::control_kind;
use crate::matcher::identity::field_keys;
use crate::page::dom_model::{ControlEvent, Document, FormControl};
use crate::profile::profile_model::{FieldEntry, FieldType, FieldValue, Profile};

/// When matched controls receive `input` / `change` notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Every matched control, even when applying the entry changed nothing.
    #[default]
    Always,
    /// Only controls whose value or checked state actually changed.
    OnChange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub matched: usize,
    pub changed: usize,
}

fn select_option<C: FormControl + ?Sized>(control: &mut C, entry: &FieldEntry) -> bool {
    if !entry.value.is_truthy() {
        return false;
    }
    let Some(wanted) = entry.value.as_text() else {
        return false;
    };

    let found = control
        .options()
        .iter()
        .find(|option| option.value == wanted || option.text.trim() == wanted)
        .map(|option| option.value.clone());

    match found {
        Some(value) if value != control.value() => {
            control.set_value(&value);
            true
        }
        _ => false,
    }
}

/// Apply one entry to a control without destroying anything the user entered.
///
/// Returns whether the control's value or checked state changed.
pub fn apply_entry<C: FormControl + ?Sized>(control: &mut C, entry: &FieldEntry) -> bool {
    match control_kind(&*control) {
        FieldType::Select => {
            if control.value().is_empty() || control.value() == control.default_value() {
                select_option(control, entry)
            } else {
                false
            }
        }
        FieldType::Checkbox => {
            if !control.checked() && entry.value == FieldValue::Bool(true) {
                control.set_checked(true);
                true
            } else {
                false
            }
        }
        FieldType::Radio => {
            let matches = entry.value.is_truthy() && entry.value.as_text() == Some(control.value());
            if matches && !control.checked() {
                control.set_checked(true);
                true
            } else {
                false
            }
        }
        FieldType::Text => {
            if !control.value().is_empty() {
                return false;
            }
            let value = entry.value.to_fill_text();
            let changed = !value.is_empty();
            control.set_value(&value);
            changed
        }
    }
}

/// Fill every enabled, writable control that matches a profile entry.
pub fn fill_inputs<D: Document + ?Sized>(
    document: &mut D,
    profile: &Profile,
    policy: NotifyPolicy,
) -> FillReport {
    let mut report = FillReport::default();

    for control in document.controls_mut() {
        if control.disabled() || control.read_only() {
            continue;
        }

        let keys = field_keys(&*control);
        let Some(entry) = profile.lookup(&keys) else {
            continue;
        };

        report.matched += 1;
        let changed = apply_entry(control, entry);
        if changed {
            report.changed += 1;
        }

        if changed || policy == NotifyPolicy::Always {
            control.dispatch(ControlEvent::Input);
            control.dispatch(ControlEvent::Change);
        }

        trace!(keys = ?keys, changed, "filled control");
    }

    debug!(matched = report.matched, changed = report.changed, "fill complete");
    report
}
