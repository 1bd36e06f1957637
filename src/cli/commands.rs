use crate::cli::config::{AppConfig, build_popup_settings};
use crate::controller::popup::{Popup, StatusMessage};
use crate::matcher::fill::NotifyPolicy;
use crate::messaging::content::LocalChannel;
use crate::page::dom_model::DomPage;
use crate::profile::profile_model::profile_count_label;
use crate::profile::store::{FileStore, ProfileStore};
use crate::trace::logger::TraceLogger;

type CliPopup = Popup<FileStore, LocalChannel<DomPage>>;

/// Open the page snapshot as the active tab, or report no active tab.
fn open_channel(
    page: Option<&str>,
    policy: NotifyPolicy,
) -> Result<LocalChannel<DomPage>, Box<dyn std::error::Error>> {
    match page {
        Some(path) => Ok(LocalChannel::new(DomPage::load(path)?, policy)),
        None => Ok(LocalChannel::without_tab()),
    }
}

fn build_popup(config: &AppConfig, store_path: &str, channel: LocalChannel<DomPage>) -> CliPopup {
    let store = ProfileStore::with_key(FileStore::new(store_path), &config.storage.key);
    Popup::new(store, channel)
        .with_settings(build_popup_settings(config))
        .with_journal(TraceLogger::open(config.trace.path.as_deref()))
}

/// Initial load; a failure is printed but does not stop the action.
async fn open_popup(popup: &mut CliPopup, verbose: u8) {
    if let Some(status) = popup.load().await {
        eprintln!("{}", status);
    } else if verbose > 0 {
        eprintln!("Saved profile: {}", popup.count_label());
    }
}

fn print_outcome(popup: &CliPopup, status: StatusMessage) {
    println!("{}", status);
    println!("{}", popup.count_label());
}

// ============================================================================
// capture subcommand
// ============================================================================

pub async fn cmd_capture(
    config: &AppConfig,
    store_path: &str,
    page: Option<&str>,
    verbose: u8,
) -> Result<StatusMessage, Box<dyn std::error::Error>> {
    let channel = open_channel(page, config.fill.notify)?;
    let mut popup = build_popup(config, store_path, channel);
    open_popup(&mut popup, verbose).await;

    let status = popup.capture().await;
    print_outcome(&popup, status);
    Ok(status)
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Fill the snapshot and write it back (to `output`, or over `page`).
pub async fn cmd_fill(
    config: &AppConfig,
    store_path: &str,
    page: Option<&str>,
    output: Option<&str>,
    policy: NotifyPolicy,
    verbose: u8,
) -> Result<StatusMessage, Box<dyn std::error::Error>> {
    let channel = open_channel(page, policy)?;
    let mut popup = build_popup(config, store_path, channel);
    open_popup(&mut popup, verbose).await;

    let status = popup.fill().await;

    if status == StatusMessage::AutofillSent {
        if let Some(target) = output.or(page) {
            if let Some(saved) = popup.channel().with_page(|p| p.save(target)) {
                saved?;
            }
            if verbose > 0 {
                eprintln!("Wrote filled page to {}", target);
            }
        }
    }

    print_outcome(&popup, status);
    Ok(status)
}

// ============================================================================
// clear subcommand
// ============================================================================

pub async fn cmd_clear(
    config: &AppConfig,
    store_path: &str,
    verbose: u8,
) -> Result<StatusMessage, Box<dyn std::error::Error>> {
    let mut popup = build_popup(config, store_path, LocalChannel::without_tab());
    open_popup(&mut popup, verbose).await;

    let status = popup.clear().await;
    print_outcome(&popup, status);
    Ok(status)
}

// ============================================================================
// show subcommand
// ============================================================================

pub async fn cmd_show(config: &AppConfig, store_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::with_key(FileStore::new(store_path), &config.storage.key);
    let profile = store.load().await?;

    println!("{}", profile_count_label(profile.as_ref()));
    if let Some(profile) = &profile {
        for (key, entry) in &profile.entries {
            println!("  {} [{:?}] = {}", key, entry.field_type, serde_json::to_string(&entry.value)?);
        }
    }
    Ok(())
}
