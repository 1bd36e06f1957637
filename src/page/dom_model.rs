use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Capability interface over a page's form controls
// ============================================================================

/// Element tag of a fillable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlTag {
    Input,
    Select,
    Textarea,
}

/// Synthetic notifications dispatched to a control after filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlEvent {
    Input,
    Change,
}

/// One `<option>` of a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub text: String,
}

/// What the field matcher needs from a form control.
///
/// A live page, a JSON snapshot and a test double all look the same through
/// this trait.
pub trait FormControl {
    fn tag(&self) -> ControlTag;

    /// Raw attribute lookup: `type`, `name`, `id`, `placeholder`, `aria-label`.
    fn get_attribute(&self, name: &str) -> Option<&str>;

    /// Visible text of every associated `<label>`, in document order.
    fn labels(&self) -> Vec<&str>;

    fn value(&self) -> &str;
    fn default_value(&self) -> &str;
    fn checked(&self) -> bool;
    fn disabled(&self) -> bool;
    fn read_only(&self) -> bool;

    /// Options of a select control; empty for everything else.
    fn options(&self) -> &[SelectOption];

    fn set_value(&mut self, value: &str);
    fn set_checked(&mut self, checked: bool);
    fn dispatch(&mut self, event: ControlEvent);

    fn name(&self) -> &str {
        self.get_attribute("name").unwrap_or("")
    }

    fn id(&self) -> &str {
        self.get_attribute("id").unwrap_or("")
    }

    /// Effective input type: the `type` attribute lower-cased, `text` when absent.
    fn input_type(&self) -> String {
        self.get_attribute("type")
            .filter(|t| !t.is_empty())
            .unwrap_or("text")
            .to_lowercase()
    }
}

/// The set of `input`, `select` and `textarea` elements of a page, in DOM order.
pub trait Document {
    type Control: FormControl;

    fn controls(&self) -> &[Self::Control];
    fn controls_mut(&mut self) -> &mut [Self::Control];
}

// ============================================================================
// JSON page snapshot
// ============================================================================

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to access page snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page snapshot {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A form control as captured by a DOM extraction script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomControl {
    pub tag: ControlTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dispatched: Vec<ControlEvent>,
}

impl DomControl {
    pub fn new(tag: ControlTag) -> Self {
        DomControl {
            tag,
            r#type: None,
            name: None,
            id: None,
            placeholder: None,
            aria_label: None,
            labels: Vec::new(),
            value: String::new(),
            default_value: String::new(),
            checked: false,
            disabled: false,
            read_only: false,
            options: Vec::new(),
            dispatched: Vec::new(),
        }
    }

    pub fn input(input_type: &str) -> Self {
        let mut control = Self::new(ControlTag::Input);
        control.r#type = Some(input_type.to_string());
        control
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.labels.push(label.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_aria_label(mut self, aria_label: &str) -> Self {
        self.aria_label = Some(aria_label.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_default_value(mut self, value: &str) -> Self {
        self.default_value = value.to_string();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_option(mut self, value: &str, text: &str) -> Self {
        self.options.push(SelectOption {
            value: value.to_string(),
            text: text.to_string(),
        });
        self
    }
}

impl FormControl for DomControl {
    fn tag(&self) -> ControlTag {
        self.tag
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        match name {
            "type" => self.r#type.as_deref(),
            "name" => self.name.as_deref(),
            "id" => self.id.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "aria-label" => self.aria_label.as_deref(),
            _ => None,
        }
    }

    fn labels(&self) -> Vec<&str> {
        self.labels.iter().map(String::as_str).collect()
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn default_value(&self) -> &str {
        &self.default_value
    }

    fn checked(&self) -> bool {
        self.checked
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn options(&self) -> &[SelectOption] {
        &self.options
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    fn dispatch(&mut self, event: ControlEvent) {
        self.dispatched.push(event);
    }
}

/// Snapshot of a page's form controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub controls: Vec<DomControl>,
}

impl DomPage {
    pub fn new(controls: Vec<DomControl>) -> Self {
        DomPage {
            url: None,
            title: String::new(),
            controls,
        }
    }

    /// Load a snapshot as a fresh page: event logs saved by an earlier
    /// session are dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PageError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PageError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut page: DomPage = serde_json::from_str(&content).map_err(|e| PageError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        for control in &mut page.controls {
            control.dispatched.clear();
        }
        Ok(page)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PageError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| PageError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| PageError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

impl Document for DomPage {
    type Control = DomControl;

    fn controls(&self) -> &[DomControl] {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut [DomControl] {
        &mut self.controls
    }
}
