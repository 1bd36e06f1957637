use lightning_fill::cli::commands::{cmd_capture, cmd_clear, cmd_fill, cmd_show};
use lightning_fill::cli::config::AppConfig;
use lightning_fill::controller::popup::StatusMessage;
use lightning_fill::matcher::fill::NotifyPolicy;
use lightning_fill::page::dom_model::{ControlEvent, DomPage};
use lightning_fill::profile::store::{FileStore, ProfileStore};

use crate::common::utils::{fixture_path, text_input};

mod common;

struct Workspace {
    dir: tempfile::TempDir,
    config: AppConfig,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.trace.path = Some(dir.path().join("actions.jsonl").display().to_string());
        Workspace { dir, config }
    }

    fn store_path(&self) -> String {
        self.dir.path().join("storage.json").display().to_string()
    }

    fn copy_fixture(&self, name: &str) -> String {
        let target = self.dir.path().join(name);
        std::fs::copy(fixture_path(name), &target).unwrap();
        target.display().to_string()
    }
}

#[tokio::test]
async fn capture_then_fill_blank_page() {
    let ws = Workspace::new();
    let source = ws.copy_fixture("contact_form.json");
    let blank = ws.copy_fixture("contact_form_blank.json");
    let filled = ws.dir.path().join("filled.json").display().to_string();

    let status = cmd_capture(&ws.config, &ws.store_path(), Some(source.as_str()), 0).await.unwrap();
    assert_eq!(status, StatusMessage::FieldsSaved);

    let status = cmd_fill(
        &ws.config,
        &ws.store_path(),
        Some(blank.as_str()),
        Some(filled.as_str()),
        NotifyPolicy::Always,
        0,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusMessage::AutofillSent);

    let page = DomPage::load(&filled).unwrap();
    let email = page
        .controls
        .iter()
        .find(|c| c.name.as_deref() == Some("email"))
        .unwrap();
    assert_eq!(email.value, "ada@example.com");
    assert_eq!(email.dispatched, vec![ControlEvent::Input, ControlEvent::Change]);

    let untouched = DomPage::load(&blank).unwrap();
    let email = untouched
        .controls
        .iter()
        .find(|c| c.name.as_deref() == Some("email"))
        .unwrap();
    assert_eq!(email.value, "", "--output leaves the source alone");
}

#[tokio::test]
async fn fill_without_output_overwrites_page() {
    let ws = Workspace::new();
    let source = ws.copy_fixture("contact_form.json");
    let blank = ws.copy_fixture("contact_form_blank.json");

    cmd_capture(&ws.config, &ws.store_path(), Some(source.as_str()), 0).await.unwrap();
    cmd_fill(&ws.config, &ws.store_path(), Some(blank.as_str()), None, NotifyPolicy::OnChange, 0)
        .await
        .unwrap();

    let page = DomPage::load(&blank).unwrap();
    let terms = page
        .controls
        .iter()
        .find(|c| c.name.as_deref() == Some("terms"))
        .unwrap();
    assert!(!terms.checked);
    assert!(terms.dispatched.is_empty());
}

#[tokio::test]
async fn repeated_fill_in_place_logs_one_round_of_events() {
    let ws = Workspace::new();
    let source = ws.copy_fixture("contact_form.json");
    let blank = ws.copy_fixture("contact_form_blank.json");

    cmd_capture(&ws.config, &ws.store_path(), Some(source.as_str()), 0).await.unwrap();
    for _ in 0..3 {
        let status = cmd_fill(&ws.config, &ws.store_path(), Some(blank.as_str()), None, NotifyPolicy::Always, 0)
            .await
            .unwrap();
        assert_eq!(status, StatusMessage::AutofillSent);
    }

    let page = DomPage::load(&blank).unwrap();
    assert!(page.controls.iter().all(|c| c.dispatched.is_empty()), "Loading starts a fresh page");

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&blank).unwrap()).unwrap();
    let email = saved["controls"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "email")
        .unwrap();
    assert_eq!(email["dispatched"], serde_json::json!(["input", "change"]));
}

#[test]
fn loaded_snapshot_drops_saved_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.json");

    let mut page = DomPage::new(vec![text_input("email")]);
    page.controls[0].dispatched = vec![ControlEvent::Input, ControlEvent::Change];
    page.save(&path).unwrap();

    let reloaded = DomPage::load(&path).unwrap();
    assert!(reloaded.controls[0].dispatched.is_empty());
    assert_eq!(reloaded.controls[0].name.as_deref(), Some("email"));
}

#[tokio::test]
async fn fill_before_capture_asks_to_save_first() {
    let ws = Workspace::new();
    let blank = ws.copy_fixture("contact_form_blank.json");
    let before = std::fs::read_to_string(&blank).unwrap();

    let status = cmd_fill(&ws.config, &ws.store_path(), Some(blank.as_str()), None, NotifyPolicy::Always, 0)
        .await
        .unwrap();

    assert_eq!(status, StatusMessage::SaveFirst);
    assert_eq!(std::fs::read_to_string(&blank).unwrap(), before, "Page not touched");
}

#[tokio::test]
async fn capture_without_page_has_no_active_tab() {
    let ws = Workspace::new();
    let status = cmd_capture(&ws.config, &ws.store_path(), None, 0).await.unwrap();
    assert_eq!(status, StatusMessage::NoActiveTab);
    assert!(status.is_failure());
}

#[tokio::test]
async fn capture_of_missing_snapshot_is_an_error() {
    let ws = Workspace::new();
    let missing = ws.dir.path().join("missing.json").display().to_string();
    assert!(cmd_capture(&ws.config, &ws.store_path(), Some(missing.as_str()), 0).await.is_err());
}

#[tokio::test]
async fn clear_then_show_reports_zero() {
    let ws = Workspace::new();
    let source = ws.copy_fixture("contact_form.json");

    cmd_capture(&ws.config, &ws.store_path(), Some(source.as_str()), 0).await.unwrap();
    let status = cmd_clear(&ws.config, &ws.store_path(), 0).await.unwrap();
    assert_eq!(status, StatusMessage::Cleared);

    let store = ProfileStore::new(FileStore::new(ws.store_path()));
    assert_eq!(store.load().await.unwrap(), None);
    cmd_show(&ws.config, &ws.store_path()).await.unwrap();
}

#[tokio::test]
async fn actions_are_journaled() {
    let ws = Workspace::new();
    let source = ws.copy_fixture("contact_form.json");

    cmd_capture(&ws.config, &ws.store_path(), Some(source.as_str()), 0).await.unwrap();
    cmd_clear(&ws.config, &ws.store_path(), 0).await.unwrap();

    let journal = std::fs::read_to_string(ws.dir.path().join("actions.jsonl")).unwrap();
    let actions: Vec<String> = journal
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["action"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(actions, vec!["capture", "clear"]);
}
