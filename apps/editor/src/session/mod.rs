// Editing sessions and the dashboard counters.

pub mod editor;
pub mod handlers;
pub mod registry;
pub mod stats;

pub use editor::{EditorSession, SessionSnapshot};
pub use registry::SessionRegistry;
pub use stats::{DashboardStats, StatsTicker};
