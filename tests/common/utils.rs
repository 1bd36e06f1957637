use std::path::PathBuf;

use lightning_fill::page::dom_model::{ControlTag, DomControl, DomPage};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> DomPage {
    DomPage::load(fixture_path(name)).expect("fixture should load")
}

pub fn page(controls: Vec<DomControl>) -> DomPage {
    DomPage::new(controls)
}

pub fn text_input(name: &str) -> DomControl {
    DomControl::input("text").with_name(name)
}

pub fn checkbox(name: &str, checked: bool) -> DomControl {
    DomControl::input("checkbox").with_name(name).with_checked(checked)
}

pub fn radio(name: &str, id: &str, value: &str, checked: bool) -> DomControl {
    DomControl::input("radio")
        .with_name(name)
        .with_id(id)
        .with_value(value)
        .with_checked(checked)
}

pub fn select(name: &str, options: &[(&str, &str)]) -> DomControl {
    options
        .iter()
        .fold(DomControl::new(ControlTag::Select).with_name(name), |control, (value, text)| {
            control.with_option(value, text)
        })
}

pub fn textarea(name: &str) -> DomControl {
    DomControl::new(ControlTag::Textarea).with_name(name)
}
