mod engine;
mod settings;

pub use engine::{PomodoroEngine, TimerMode};
pub use settings::{SettingsUpdate, TimerSettings};
