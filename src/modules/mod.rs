// Module exports for pure logic
pub mod browser;          // Engine events -> chrome state, user actions -> surface commands
pub mod navigation;
pub mod session_history;  // Per-tab back/forward list
pub mod tabs;             // Tab strip ordering and lifecycle
pub mod zoom;
