pub mod config;
pub mod library;
pub mod note;
pub mod playlist;
pub mod queue;
pub mod search;
pub mod stats;
pub mod task;
pub mod timer;

use studystation_core::session::{SessionCoordinator, SessionState};
use studystation_core::storage::Store;
use studystation_core::StderrSink;

/// Key the CLI stashes the transient session snapshot under so queue,
/// active selection, and the running countdown carry across invocations.
const SESSION_KEY: &str = "session_state";

/// Open the store and rebuild the coordinator, restoring the previous
/// invocation's session snapshot when one exists.
pub fn open_session() -> Result<SessionCoordinator, Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let mut coordinator = SessionCoordinator::open(store, Box::new(StderrSink));
    if let Ok(Some(json)) = coordinator.store().kv_get(SESSION_KEY) {
        if let Ok(state) = serde_json::from_str::<SessionState>(&json) {
            coordinator.restore(state);
        }
    }
    Ok(coordinator)
}

/// Persist the session snapshot for the next invocation.
pub fn save_session(
    coordinator: &SessionCoordinator,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(&coordinator.snapshot())?;
    coordinator.store().kv_set(SESSION_KEY, &json)?;
    Ok(())
}

/// Print any value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
