// Zoom factor stepping for page surfaces.

pub const DEFAULT_ZOOM: f64 = 1.0;
pub const ZOOM_STEP: f64 = 0.1;
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 5.0;

fn clamp_and_round(factor: f64) -> f64 {
    let rounded = (factor * 100.0).round() / 100.0;
    rounded.clamp(MIN_ZOOM, MAX_ZOOM)
}

pub fn zoom_in(current: f64) -> f64 {
    clamp_and_round(current + ZOOM_STEP)
}

pub fn zoom_out(current: f64) -> f64 {
    clamp_and_round(current - ZOOM_STEP)
}

/// Sanitizes a configured default zoom. Non-finite values fall back to 1.0.
pub fn normalize(factor: f64) -> f64 {
    if factor.is_finite() {
        clamp_and_round(factor)
    } else {
        DEFAULT_ZOOM
    }
}

pub fn percent(factor: f64) -> u32 {
    (factor * 100.0).round() as u32
}
