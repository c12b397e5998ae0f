use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use studystation_core::timer::{SettingsUpdate, TimerMode, TimerSettings};
use studystation_core::SessionCoordinator;

use super::{open_session, print_json, save_session};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Focus,
    ShortBreak,
    LongBreak,
}

impl From<ModeArg> for TimerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Focus => TimerMode::Focus,
            ModeArg::ShortBreak => TimerMode::ShortBreak,
            ModeArg::LongBreak => TimerMode::LongBreak,
        }
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (entering focus mode for a focus interval)
    Start,
    /// Pause the countdown
    Pause,
    /// Toggle between running and paused
    Toggle,
    /// Skip to the next mode without counting the session
    Skip,
    /// Switch to an explicit mode (resets the countdown, paused)
    Mode { mode: ModeArg },
    /// Toggle focus-mode presence tracking
    Focus,
    /// Print the current timer state as JSON
    Status,
    /// Run the 1 Hz driver loop, printing events as they happen
    Watch,
    /// Update timer settings; invalid values are dropped field by field
    Set {
        #[arg(long)]
        focus: Option<i64>,
        #[arg(long)]
        short_break: Option<i64>,
        #[arg(long)]
        long_break: Option<i64>,
        #[arg(long)]
        interval: Option<i64>,
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        #[arg(long)]
        auto_start_focus: Option<bool>,
        #[arg(long)]
        sound: Option<bool>,
    },
}

/// Timer state as printed by `timer status`.
#[derive(Serialize)]
struct TimerStatus<'a> {
    mode: TimerMode,
    mode_label: &'static str,
    is_running: bool,
    time_left_secs: u64,
    time_left: String,
    focus_mode: bool,
    elapsed_focus_secs: u64,
    completed_focus_sessions: u64,
    sessions_until_long_break: u64,
    settings: &'a TimerSettings,
}

fn status(coordinator: &SessionCoordinator) -> TimerStatus<'_> {
    let timer = coordinator.timer();
    TimerStatus {
        mode: timer.mode(),
        mode_label: timer.mode().label(),
        is_running: timer.is_running(),
        time_left_secs: timer.time_left_secs(),
        time_left: format_clock(timer.time_left_secs()),
        focus_mode: coordinator.focus_mode(),
        elapsed_focus_secs: coordinator.elapsed_focus_secs(),
        completed_focus_sessions: timer.completed_focus_sessions(),
        sessions_until_long_break: timer.sessions_until_long_break(),
        settings: timer.settings(),
    }
}

/// "MM:SS" for countdown display.
fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = open_session()?;

    match action {
        TimerAction::Start => {
            let events = coordinator.start_timer();
            print_json(&events)?;
        }
        TimerAction::Pause => {
            let events: Vec<_> = coordinator.pause_timer().into_iter().collect();
            print_json(&events)?;
        }
        TimerAction::Toggle => {
            let events = coordinator.toggle_timer();
            print_json(&events)?;
        }
        TimerAction::Skip => {
            let event = coordinator.skip_timer();
            print_json(&event)?;
        }
        TimerAction::Mode { mode } => {
            let event = coordinator.change_timer_mode(mode.into());
            print_json(&event)?;
        }
        TimerAction::Focus => {
            let events = coordinator.toggle_focus_mode();
            print_json(&events)?;
        }
        TimerAction::Status => {
            // Drive one tick so the countdown reflects wall-clock time;
            // a completion that came due while we were away fires here.
            let events = coordinator.tick();
            for event in &events {
                eprintln!("{}", serde_json::to_string(event)?);
            }
            print_json(&status(&coordinator))?;
        }
        TimerAction::Watch => {
            watch(&mut coordinator)?;
        }
        TimerAction::Set {
            focus,
            short_break,
            long_break,
            interval,
            auto_start_breaks,
            auto_start_focus,
            sound,
        } => {
            let update = SettingsUpdate {
                focus_minutes: focus,
                short_break_minutes: short_break,
                long_break_minutes: long_break,
                long_break_interval: interval,
                auto_start_breaks,
                auto_start_focus,
                sound_enabled: sound,
            };
            coordinator.update_timer_settings(&update);
            print_json(coordinator.timer().settings())?;
        }
    }

    save_session(&coordinator)?;
    Ok(())
}

fn watch(coordinator: &mut SessionCoordinator) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("watching timer (ctrl-c to stop)");
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
        for event in coordinator.tick() {
            println!("{}", serde_json::to_string(&event)?);
        }
        save_session(coordinator)?;
        if !coordinator.timer().is_running() && !coordinator.focus_mode() {
            // Nothing left to drive.
            print_json(&status(coordinator))?;
            return Ok(());
        }
    }
}
