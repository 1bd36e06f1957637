use lightning_fill::matcher::identity::{field_keys, field_signature, label_text, normalize_key};
use lightning_fill::page::dom_model::{ControlTag, DomControl, FormControl};

// =========================================================================
// normalize_key
// =========================================================================

#[test]
fn normalize_key_trims_and_lowercases() {
    assert_eq!(normalize_key("  Email Address "), "email address");
    assert_eq!(normalize_key("\tFIRST_NAME\n"), "first_name");
    assert_eq!(normalize_key("   "), "", "Whitespace only normalizes to empty");
}

#[test]
fn normalize_key_is_idempotent() {
    for raw in ["  Email ", "MiXeD Case", "", "  ", "already normal", "Ünïcode  "] {
        let once = normalize_key(raw);
        assert_eq!(normalize_key(&once), once, "normalize twice differs for {:?}", raw);
    }
}

// =========================================================================
// Label text and composite signature
// =========================================================================

#[test]
fn label_text_joins_all_labels() {
    let control = DomControl::input("text")
        .with_label("First")
        .with_label("Name ");
    assert_eq!(label_text(&control), "First Name");
}

#[test]
fn signature_combines_parts_in_fixed_order() {
    let control = DomControl::input("email")
        .with_label("E-mail")
        .with_aria_label("Work email")
        .with_placeholder("you@corp.com")
        .with_name("Email")
        .with_id("EmailField");

    assert_eq!(
        field_signature(&control),
        "e-mail work email you@corp.com email emailfield"
    );
}

#[test]
fn signature_of_bare_control_is_empty() {
    let control = DomControl::new(ControlTag::Textarea);
    assert_eq!(field_signature(&control), "");
    assert!(field_keys(&control).is_empty(), "Empty keys are dropped");
}

#[test]
fn signature_keeps_inner_spacing_of_missing_parts() {
    // label and aria-label missing: parts are still joined by spaces
    let control = DomControl::input("text")
        .with_placeholder("City")
        .with_id("city");
    assert_eq!(field_signature(&control), "city  city");
}

#[test]
fn signature_keeps_one_space_per_empty_middle_part() {
    // aria-label and placeholder empty: three spaces between label and name
    let control = DomControl::input("text")
        .with_label("Full name")
        .with_name("full_name")
        .with_id("full-name");

    assert_eq!(field_signature(&control), "full name   full_name full-name");
    assert_ne!(field_signature(&control), "full name full_name full-name");
    assert_eq!(
        field_keys(&control),
        vec![
            "full name   full_name full-name".to_string(),
            "full_name".to_string(),
            "full-name".to_string()
        ]
    );
}

// =========================================================================
// field_keys
// =========================================================================

#[test]
fn name_and_id_without_labels_give_three_keys() {
    let control = DomControl::input("text").with_name("Email").with_id("user-email");
    let keys = field_keys(&control);

    assert_eq!(
        keys,
        vec![
            "email user-email".to_string(),
            "email".to_string(),
            "user-email".to_string()
        ]
    );
}

#[test]
fn equal_name_and_id_are_deduplicated() {
    let control = DomControl::input("text").with_name("Phone").with_id("phone");
    let keys = field_keys(&control);

    assert_eq!(keys, vec!["phone phone".to_string(), "phone".to_string()]);
}

#[test]
fn name_only_signature_collapses_into_name_key() {
    let control = DomControl::input("text").with_name("  Zip ");
    let keys = field_keys(&control);

    assert_eq!(keys, vec!["zip".to_string()], "Signature equals name; one key remains");
}

#[test]
fn label_only_control_has_single_signature_key() {
    let control = DomControl::input("text").with_label("Favourite colour");
    assert_eq!(field_keys(&control), vec!["favourite colour".to_string()]);
}

#[test]
fn whitespace_name_is_not_a_key() {
    let control = DomControl::input("text").with_name("   ").with_id("nick");
    let keys = field_keys(&control);

    assert!(!keys.iter().any(|k| k.is_empty()));
    assert_eq!(keys, vec!["nick".to_string()]);
}

#[test]
fn keys_are_order_stable() {
    let control = DomControl::input("text")
        .with_label("Last name")
        .with_name("surname")
        .with_id("ln");

    assert_eq!(field_keys(&control), field_keys(&control));
    assert_eq!(field_keys(&control)[0], "last name   surname ln");
}

#[test]
fn input_type_defaults_to_text() {
    let mut control = DomControl::new(ControlTag::Input);
    assert_eq!(control.input_type(), "text");

    control.r#type = Some("CheckBox".into());
    assert_eq!(control.input_type(), "checkbox");
}
