// WebBrowser library entry point.
// Exposes all modules so they can be imported by main.rs and tested independently.

use tauri::{AppHandle, LogicalSize, Manager, WindowEvent};

pub mod cli;
pub mod commands;
pub mod error;
pub mod menu;
pub mod settings;
pub mod shell;

// Shared state
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

use cli::Cli;
use error::BrowserError;
use settings::Settings;
use state::AppState;

/// A second launch forwards its argv here: open its URL in a new tab.
fn handle_second_instance(app: &AppHandle, argv: Vec<String>) {
    let url = Cli::from_forwarded_args(&argv).and_then(|cli| cli.url);
    log::info!("[App] Second instance forwarded url {:?}", url);

    if let Err(e) = shell::perform(app, |browser| browser.open_tab(url.as_deref())) {
        log::error!("[App] Failed to open forwarded tab: {}", e);
    }
    if let Some(window) = app.get_window(shell::MAIN_WINDOW) {
        if let Err(e) = window.unminimize() {
            log::warn!("[App] Failed to unminimize window: {}", e);
        }
        if let Err(e) = window.set_focus() {
            log::warn!("[App] Failed to focus window: {}", e);
        }
    }
}

pub fn run(cli: Cli) {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, argv, _cwd| {
            handle_second_instance(app, argv);
        }))
        .plugin(tauri_plugin_log::Builder::default().level(log_level).build())
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(move |app| {
            let handle = app.handle().clone();

            let settings = Settings::load(&handle);
            log::info!("[App] Starting with homepage {}", settings.homepage);
            let (width, height) = (settings.window_width, settings.window_height);
            app.manage(AppState::new(settings));

            let window = app
                .get_window(shell::MAIN_WINDOW)
                .ok_or_else(|| BrowserError::WindowNotFound(shell::MAIN_WINDOW.to_string()))?;
            window.set_size(LogicalSize::new(f64::from(width), f64::from(height)))?;

            // --- Native menu ---
            app.set_menu(menu::build_menu(&handle)?)?;
            app.on_menu_event(|app_handle, event| {
                menu::handle_menu_event(app_handle, event.id().0.as_str());
            });

            // --- Keep surfaces sized to the content area ---
            let resize_handle = handle.clone();
            window.on_window_event(move |event| {
                if let WindowEvent::Resized(size) = event {
                    if let Err(e) = shell::layout_surfaces(&resize_handle, *size) {
                        log::warn!("[App] Relayout failed: {}", e);
                    }
                }
            });

            // --- Initial tab ---
            shell::perform(&handle, |browser| browser.open_tab(cli.url.as_deref()))?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::chrome_ready,
            commands::navigate,
            commands::go_back,
            commands::go_forward,
            commands::reload,
            commands::stop,
            commands::go_home,
            commands::zoom_in,
            commands::zoom_out,
            commands::reset_zoom,
            commands::new_tab,
            commands::close_tab,
            commands::activate_tab,
            commands::reorder_tabs,
            commands::copy_current_url,
            commands::get_settings,
            commands::save_settings,
            commands::show_about
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
