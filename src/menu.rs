// Native menu bar and the mapping from menu ids to browser actions.

use tauri::menu::{Menu, MenuBuilder, MenuItemBuilder, PredefinedMenuItem, SubmenuBuilder};
use tauri::{AppHandle, Wry};

use crate::commands::{copy_page_address, show_about_dialog};
use crate::error::Result;
use crate::modules::browser::Browser;
use crate::shell;

pub fn build_menu(app: &AppHandle) -> Result<Menu<Wry>> {
    let file_menu = SubmenuBuilder::new(app, "File")
        .item(&MenuItemBuilder::with_id("new_tab", "New Tab").accelerator("CmdOrCtrl+T").build(app)?)
        .item(&MenuItemBuilder::with_id("close_tab", "Close Tab").accelerator("CmdOrCtrl+W").build(app)?)
        .separator()
        .item(&PredefinedMenuItem::quit(app, Some("Quit"))?)
        .build()?;

    let edit_menu = SubmenuBuilder::new(app, "Edit")
        .item(&PredefinedMenuItem::cut(app, Some("Cut"))?)
        .item(&PredefinedMenuItem::copy(app, Some("Copy"))?)
        .item(&PredefinedMenuItem::paste(app, Some("Paste"))?)
        .item(&PredefinedMenuItem::select_all(app, Some("Select All"))?)
        .separator()
        .item(&MenuItemBuilder::with_id("copy_url", "Copy Page Address").accelerator("CmdOrCtrl+Shift+C").build(app)?)
        .build()?;

    let view_menu = SubmenuBuilder::new(app, "View")
        .item(&MenuItemBuilder::with_id("zoom_in", "Zoom In").accelerator("CmdOrCtrl+=").build(app)?)
        .item(&MenuItemBuilder::with_id("zoom_out", "Zoom Out").accelerator("CmdOrCtrl+-").build(app)?)
        .item(&MenuItemBuilder::with_id("reset_zoom", "Reset Zoom").accelerator("CmdOrCtrl+0").build(app)?)
        .separator()
        .item(&MenuItemBuilder::with_id("reload", "Reload Page").accelerator("CmdOrCtrl+R").build(app)?)
        .item(&MenuItemBuilder::with_id("stop", "Stop").build(app)?)
        .item(&MenuItemBuilder::with_id("focus_location", "Open Location").accelerator("CmdOrCtrl+L").build(app)?)
        .build()?;

    let history_menu = SubmenuBuilder::new(app, "History")
        .item(&MenuItemBuilder::with_id("go_back", "Back").accelerator("Alt+Left").build(app)?)
        .item(&MenuItemBuilder::with_id("go_forward", "Forward").accelerator("Alt+Right").build(app)?)
        .item(&MenuItemBuilder::with_id("go_home", "Home").accelerator("Alt+Home").build(app)?)
        .build()?;

    let help_menu = SubmenuBuilder::new(app, "Help")
        .item(&MenuItemBuilder::with_id("about", "About").build(app)?)
        .build()?;

    let menu = MenuBuilder::new(app)
        .items(&[&file_menu, &edit_menu, &view_menu, &history_menu, &help_menu])
        .build()?;
    Ok(menu)
}

pub fn handle_menu_event(app: &AppHandle, id: &str) {
    let result = match id {
        "new_tab" => shell::perform(app, |browser| browser.open_tab(None)),
        "close_tab" => shell::perform(app, Browser::close_active_tab),
        "copy_url" => copy_page_address(app),
        "zoom_in" => shell::perform(app, Browser::zoom_in),
        "zoom_out" => shell::perform(app, Browser::zoom_out),
        "reset_zoom" => shell::perform(app, Browser::reset_zoom),
        "reload" => shell::perform(app, Browser::reload),
        "stop" => shell::perform(app, Browser::stop),
        "focus_location" => shell::focus_address_bar(app),
        "go_back" => shell::perform(app, Browser::go_back),
        "go_forward" => shell::perform(app, Browser::go_forward),
        "go_home" => shell::perform(app, Browser::go_home),
        "about" => {
            show_about_dialog(app);
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        log::warn!("[Menu] '{}' failed: {}", id, e);
    }
}
