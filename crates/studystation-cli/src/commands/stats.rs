use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use studystation_core::stats::{format_duration_secs, TimeFrame};

use super::{open_session, print_json};

#[derive(Clone, Copy, ValueEnum)]
pub enum FrameArg {
    Week,
    Month,
    All,
}

impl From<FrameArg> for TimeFrame {
    fn from(value: FrameArg) -> Self {
        match value {
            FrameArg::Week => TimeFrame::Week,
            FrameArg::Month => TimeFrame::Month,
            FrameArg::All => TimeFrame::All,
        }
    }
}

#[derive(Subcommand)]
pub enum StatsAction {
    /// Analytics summary for a time frame
    Summary {
        #[arg(long, value_enum, default_value = "week")]
        frame: FrameArg,
    },
    /// List recorded study sessions
    Sessions,
}

#[derive(Serialize)]
struct SummaryDisplay {
    #[serde(flatten)]
    summary: studystation_core::AnalyticsSummary,
    total_focus: String,
    total_break: String,
    daily_average: String,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = open_session()?;

    match action {
        StatsAction::Summary { frame } => {
            let summary = coordinator.analytics(frame.into());
            let display = SummaryDisplay {
                total_focus: format_duration_secs(summary.total_focus_secs),
                total_break: format_duration_secs(summary.total_break_secs),
                daily_average: format_duration_secs(summary.daily_average_secs),
                summary,
            };
            print_json(&display)?;
        }
        StatsAction::Sessions => {
            print_json(&coordinator.accumulator().study_sessions)?;
        }
    }

    Ok(())
}
