//! Player boundary state.
//!
//! The actual player is external (an embedded web player, a GUI shell);
//! the core only mirrors its state and speaks to it in values:
//! [`PlayerCommand`]s go out, [`PlayerEvent`]s come in. Volume/mute follow
//! the station rules: dragging volume to zero mutes, raising it while
//! muted unmutes.

use serde::{Deserialize, Serialize};

/// Instructions for the external player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    Play,
    Pause,
    Seek { position_secs: f64 },
    SetVolume { level: u32 },
    Mute,
    Unmute,
}

/// Reports from the external player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    Ready { duration_secs: f64 },
    Progress { position_secs: f64 },
    Played,
    Paused,
    Ended,
}

/// Mirrored player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub playing: bool,
    /// 0..=100
    pub volume: u32,
    pub muted: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            playing: false,
            volume: 50,
            muted: false,
            position_secs: 0.0,
            duration_secs: 0.0,
        }
    }
}

impl PlayerState {
    pub fn with_volume(volume: u32) -> Self {
        Self {
            volume: volume.min(100),
            ..Self::default()
        }
    }

    /// Percent played, 0.0..=100.0.
    pub fn progress_pct(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs * 100.0).clamp(0.0, 100.0)
    }

    /// Set the volume level, deriving mute: zero mutes, any audible level
    /// unmutes. Returns the commands to forward.
    pub fn set_volume(&mut self, level: u32) -> Vec<PlayerCommand> {
        self.volume = level.min(100);
        let mut commands = vec![PlayerCommand::SetVolume { level: self.volume }];
        if self.volume == 0 && !self.muted {
            self.muted = true;
            commands.push(PlayerCommand::Mute);
        } else if self.volume > 0 && self.muted {
            self.muted = false;
            commands.push(PlayerCommand::Unmute);
        }
        commands
    }

    pub fn toggle_mute(&mut self) -> PlayerCommand {
        self.muted = !self.muted;
        if self.muted {
            PlayerCommand::Mute
        } else {
            PlayerCommand::Unmute
        }
    }

    pub fn toggle_play(&mut self) -> PlayerCommand {
        self.playing = !self.playing;
        if self.playing {
            PlayerCommand::Play
        } else {
            PlayerCommand::Pause
        }
    }

    /// Seek to a position given as percent of the known duration. Returns
    /// `None` before the duration is known.
    pub fn seek_pct(&mut self, pct: f64) -> Option<PlayerCommand> {
        if self.duration_secs <= 0.0 {
            return None;
        }
        let pct = pct.clamp(0.0, 100.0);
        self.position_secs = pct / 100.0 * self.duration_secs;
        Some(PlayerCommand::Seek {
            position_secs: self.position_secs,
        })
    }

    /// Fold a player report into the mirrored state.
    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready { duration_secs } => {
                self.duration_secs = duration_secs.max(0.0);
                self.position_secs = 0.0;
            }
            PlayerEvent::Progress { position_secs } => {
                self.position_secs = position_secs.max(0.0);
            }
            PlayerEvent::Played => self.playing = true,
            PlayerEvent::Paused => self.playing = false,
            PlayerEvent::Ended => {
                self.playing = false;
                self.position_secs = 0.0;
            }
        }
    }
}

/// "3:05"-style display for track positions.
pub fn format_track_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = secs as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
