// Engine adapter. The only module that touches webviews: it carries out the
// surface commands the browser state machine produces, and turns webview
// callbacks back into engine events.

use std::time::Duration;

use tauri::webview::{PageLoadEvent, PageLoadPayload};
use tauri::{
    AppHandle, Emitter, Manager, PhysicalPosition, PhysicalSize, Rect, Webview, WebviewBuilder,
    WebviewUrl, Window,
};
use url::Url;

use crate::error::{BrowserError, Result};
use crate::modules::browser::{Browser, EngineEvent, SurfaceCommand, STATUS_TIMEOUT_MS};
use crate::modules::navigation::{favicon_url, load_succeeded};
use crate::state::AppState;

pub const MAIN_WINDOW: &str = "main";
pub const CHROME_WEBVIEW: &str = "main";
pub const CHROME_STATE_EVENT: &str = "chrome-state";

// Tab strip (32) + toolbar (44), in logical pixels.
const CHROME_HEIGHT_LOGICAL: f64 = 76.0;
const STATUS_BAR_HEIGHT_LOGICAL: f64 = 24.0;
const MIN_CONTENT_HEIGHT: u32 = 100;

/// Where page surfaces go inside a window of `size` at `scale`.
pub fn content_rect(size: PhysicalSize<u32>, scale: f64) -> (PhysicalPosition<i32>, PhysicalSize<u32>) {
    let top = (CHROME_HEIGHT_LOGICAL * scale) as u32;
    let bottom = (STATUS_BAR_HEIGHT_LOGICAL * scale) as u32;
    let height = size
        .height
        .saturating_sub(top + bottom)
        .max(MIN_CONTENT_HEIGHT);
    (
        PhysicalPosition::new(0, top as i32),
        PhysicalSize::new(size.width, height),
    )
}

fn main_window(app: &AppHandle) -> Result<Window> {
    app.get_window(MAIN_WINDOW)
        .ok_or_else(|| BrowserError::WindowNotFound(MAIN_WINDOW.to_string()))
}

/// Runs `f` against the locked browser state.
pub fn with_browser<T>(app: &AppHandle, f: impl FnOnce(&mut Browser) -> T) -> Result<T> {
    let state = app.state::<AppState>();
    let mut browser = state.browser.lock()?;
    Ok(f(&mut *browser))
}

/// Applies a user action: mutate state, drive the surfaces, re-render chrome.
pub fn perform(
    app: &AppHandle,
    action: impl FnOnce(&mut Browser) -> Vec<SurfaceCommand>,
) -> Result<()> {
    let commands = with_browser(app, action)?;
    // The lock is released here; surface callbacks may fire while we execute.
    execute(app, commands)?;
    emit_chrome(app)
}

pub fn execute(app: &AppHandle, commands: Vec<SurfaceCommand>) -> Result<()> {
    for command in commands {
        log::debug!("[Shell] {:?}", command);
        match command {
            SurfaceCommand::Create { label, url, zoom } => {
                if let Err(e) = create_surface(app, &label, &url, zoom) {
                    log::error!("[Shell] Could not create surface {} for {}: {}", label, url, e);
                    let restore = with_browser(app, |browser| browser.abandon_surface(&label))?;
                    execute(app, restore)?;
                    emit_chrome(app)?;
                    return Err(e);
                }
            }
            SurfaceCommand::Destroy { label } => {
                if let Some(webview) = app.get_webview(&label) {
                    webview.close()?;
                }
            }
            SurfaceCommand::Show { label } => {
                if let Some(webview) = app.get_webview(&label) {
                    webview.show()?;
                }
            }
            SurfaceCommand::Hide { label } => {
                if let Some(webview) = app.get_webview(&label) {
                    webview.hide()?;
                }
            }
            SurfaceCommand::Load { label, url } => {
                if let Some(webview) = app.get_webview(&label) {
                    webview.navigate(Url::parse(&url)?)?;
                }
            }
            SurfaceCommand::Back { label } => eval_in(app, &label, "window.history.back()")?,
            SurfaceCommand::Forward { label } => eval_in(app, &label, "window.history.forward()")?,
            SurfaceCommand::Reload { label } => eval_in(app, &label, "window.location.reload()")?,
            SurfaceCommand::Stop { label } => eval_in(app, &label, "window.stop()")?,
            SurfaceCommand::SetZoom { label, factor } => {
                if let Some(webview) = app.get_webview(&label) {
                    webview.set_zoom(factor)?;
                }
            }
            SurfaceCommand::CloseWindow => main_window(app)?.close()?,
        }
    }
    Ok(())
}

fn eval_in(app: &AppHandle, label: &str, script: &str) -> Result<()> {
    if let Some(webview) = app.get_webview(label) {
        webview.eval(script)?;
    }
    Ok(())
}

fn create_surface(app: &AppHandle, label: &str, url: &str, zoom: f64) -> Result<()> {
    let window = main_window(app)?;
    let (position, size) = content_rect(window.inner_size()?, window.scale_factor()?);

    let builder = WebviewBuilder::new(label, WebviewUrl::External(Url::parse(url)?))
        .on_page_load(|webview, payload| on_page_load(&webview, &payload))
        .on_document_title_changed(|webview, title| {
            dispatch(webview.app_handle(), webview.label(), vec![EngineEvent::TitleChanged(title)]);
        });

    let webview = window.add_child(builder, position, size)?;
    if (zoom - 1.0).abs() > f64::EPSILON {
        webview.set_zoom(zoom)?;
    }
    log::info!("[Shell] Created surface {} for {}", label, url);
    Ok(())
}

fn on_page_load(webview: &Webview, payload: &PageLoadPayload<'_>) {
    let url = payload.url().to_string();
    let events = match payload.event() {
        PageLoadEvent::Started => vec![
            EngineEvent::UrlChanged(url),
            EngineEvent::LoadStarted,
            EngineEvent::LoadProgress(10),
        ],
        PageLoadEvent::Finished => vec![
            EngineEvent::UrlChanged(url.clone()),
            EngineEvent::LoadProgress(100),
            EngineEvent::LoadFinished { success: load_succeeded(&url) },
            EngineEvent::IconChanged(favicon_url(&url)),
        ],
    };
    dispatch(webview.app_handle(), webview.label(), events);
}

/// Feeds engine events from surface `label` into the browser state.
pub fn dispatch(app: &AppHandle, label: &str, events: Vec<EngineEvent>) {
    let outcome = with_browser(app, |browser| {
        let mut refresh = false;
        let mut posted = Vec::new();
        for event in events {
            let effect = browser.handle_engine_event(label, event);
            refresh |= effect.refresh;
            posted.extend(effect.status_posted);
        }
        (refresh, posted)
    });

    match outcome {
        Ok((refresh, posted)) => {
            if refresh {
                if let Err(e) = emit_chrome(app) {
                    log::warn!("[Shell] Failed to refresh chrome: {}", e);
                }
            }
            for id in posted {
                schedule_status_expiry(app.clone(), id);
            }
        }
        Err(e) => log::error!("[Shell] Dropped events from {}: {}", label, e),
    }
}

fn schedule_status_expiry(app: AppHandle, id: u64) {
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(Duration::from_millis(STATUS_TIMEOUT_MS)).await;
        match with_browser(&app, |browser| browser.expire_status(id)) {
            Ok(true) => {
                if let Err(e) = emit_chrome(&app) {
                    log::warn!("[Shell] Failed to refresh chrome: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => log::error!("[Shell] Status expiry failed: {}", e),
        }
    });
}

/// Pushes the current chrome snapshot to the chrome webview and the title bar.
pub fn emit_chrome(app: &AppHandle) -> Result<()> {
    let snapshot = with_browser(app, |browser| browser.snapshot())?;
    main_window(app)?.set_title(&snapshot.window_title)?;
    app.emit(CHROME_STATE_EVENT, &snapshot)?;
    Ok(())
}

/// Keeps every page surface filling the content area as the window resizes.
pub fn layout_surfaces(app: &AppHandle, size: PhysicalSize<u32>) -> Result<()> {
    let scale = main_window(app)?.scale_factor()?;
    let (position, content_size) = content_rect(size, scale);
    let labels: Vec<String> = with_browser(app, |browser| {
        browser
            .strip()
            .tabs()
            .iter()
            .map(|t| t.webview_label.clone())
            .collect()
    })?;

    for label in labels {
        if let Some(webview) = app.get_webview(&label) {
            webview.set_bounds(Rect {
                position: tauri::Position::Physical(position),
                size: tauri::Size::Physical(content_size),
            })?;
        }
    }
    Ok(())
}

pub fn focus_address_bar(app: &AppHandle) -> Result<()> {
    main_window(app)?.set_focus()?;
    if let Some(chrome) = app.get_webview(CHROME_WEBVIEW) {
        chrome.set_focus()?;
    }
    app.emit("focus-url-bar", ())?;
    Ok(())
}
