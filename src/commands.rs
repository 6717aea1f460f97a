// Tauri commands invoked by the chrome frontend (ui/chrome.js).

use tauri::{AppHandle, Emitter, State};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::error::{BrowserError, Result};
use crate::modules::browser::{Browser, ChromeSnapshot, APP_NAME};
use crate::settings::Settings;
use crate::shell;
use crate::state::AppState;

#[tauri::command]
pub fn chrome_ready(app: AppHandle) -> Result<ChromeSnapshot> {
    log::debug!("[Chrome] Frontend ready");
    shell::with_browser(&app, |browser| browser.snapshot())
}

#[tauri::command]
pub fn navigate(app: AppHandle, input: String) -> Result<()> {
    shell::perform(&app, |browser| browser.navigate(&input))
}

#[tauri::command]
pub fn go_back(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::go_back)
}

#[tauri::command]
pub fn go_forward(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::go_forward)
}

#[tauri::command]
pub fn reload(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::reload)
}

#[tauri::command]
pub fn stop(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::stop)
}

#[tauri::command]
pub fn go_home(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::go_home)
}

#[tauri::command]
pub fn zoom_in(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::zoom_in)
}

#[tauri::command]
pub fn zoom_out(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::zoom_out)
}

#[tauri::command]
pub fn reset_zoom(app: AppHandle) -> Result<()> {
    shell::perform(&app, Browser::reset_zoom)
}

// Async so the child webview is not created from a blocking IPC handler,
// which deadlocks on Windows.
#[tauri::command]
pub async fn new_tab(app: AppHandle, url: Option<String>) -> Result<()> {
    shell::perform(&app, |browser| browser.open_tab(url.as_deref()))
}

#[tauri::command]
pub fn close_tab(app: AppHandle, tab_id: String) -> Result<()> {
    shell::perform(&app, |browser| browser.close_tab(&tab_id))
}

#[tauri::command]
pub fn activate_tab(app: AppHandle, tab_id: String) -> Result<()> {
    shell::perform(&app, |browser| browser.activate_tab(&tab_id))
}

#[tauri::command]
pub fn reorder_tabs(app: AppHandle, new_order: Vec<String>) -> Result<()> {
    log::debug!("[Tabs] Reorder requested: {:?}", new_order);
    let changed = shell::with_browser(&app, |browser| browser.reorder_tabs(&new_order))?;
    if changed {
        shell::emit_chrome(&app)?;
    }
    Ok(())
}

#[tauri::command]
pub fn copy_current_url(app: AppHandle) -> Result<()> {
    copy_page_address(&app)
}

#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> Result<Settings> {
    Ok(state.settings.read()?.clone())
}

#[tauri::command]
pub fn save_settings(app: AppHandle, state: State<'_, AppState>, settings: Settings) -> Result<()> {
    settings.save(&app)?;
    state.browser.lock()?.update_settings(&settings);
    *state.settings.write()? = settings;
    app.emit("settings-changed", ())?;
    Ok(())
}

#[tauri::command]
pub fn show_about(app: AppHandle) {
    show_about_dialog(&app);
}

pub fn copy_page_address(app: &AppHandle) -> Result<()> {
    let url = shell::with_browser(app, |browser| browser.active_url())?
        .ok_or(BrowserError::NoActiveTab)?;
    app.clipboard()
        .write_text(url)
        .map_err(|e| BrowserError::Clipboard(e.to_string()))?;
    Ok(())
}

pub fn show_about_dialog(app: &AppHandle) {
    let body = format!(
        "Web Browser\n\nA modern web browser built with Rust and the system webview.\n\nVersion {}",
        env!("CARGO_PKG_VERSION")
    );
    app.dialog()
        .message(body)
        .title(format!("About {}", APP_NAME))
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}
