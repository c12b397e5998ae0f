use clap::{Subcommand, ValueEnum};
use studystation_core::search::{SearchResults, SearchType, YoutubeSearch};
use studystation_core::storage::Config;

use super::print_json;

#[derive(Clone, Copy, ValueEnum)]
pub enum TypeArg {
    All,
    Lectures,
    Tutorials,
    Pomodoro,
}

impl From<TypeArg> for SearchType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::All => SearchType::All,
            TypeArg::Lectures => SearchType::Lectures,
            TypeArg::Tutorials => SearchType::Tutorials,
            TypeArg::Pomodoro => SearchType::Pomodoro,
        }
    }
}

#[derive(Subcommand)]
pub enum SearchAction {
    /// Search for videos
    Query {
        terms: Vec<String>,
        #[arg(long, value_enum, default_value = "all")]
        r#type: TypeArg,
        /// Override the configured educational-focus bias
        #[arg(long)]
        plain: bool,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Fetch details for one video id
    Details { id: String },
}

pub fn run(action: SearchAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Runtime::new()?;

    match action {
        SearchAction::Query {
            terms,
            r#type,
            plain,
            max,
        } => {
            let query = terms.join(" ");
            let educational = !plain && config.search.educational_focus;
            let max_results = max.unwrap_or(config.search.max_results);

            // Any search failure renders as "no results", never as a
            // process failure.
            let results = match YoutubeSearch::from_config(&config) {
                Ok(client) => runtime
                    .block_on(client.search(&query, r#type.into(), educational, max_results))
                    .unwrap_or_else(|e| {
                        eprintln!("search failed: {e}");
                        SearchResults::default()
                    }),
                Err(e) => {
                    eprintln!("search unavailable: {e}");
                    SearchResults::default()
                }
            };
            print_json(&results)?;
        }
        SearchAction::Details { id } => {
            let client = YoutubeSearch::from_config(&config)?;
            match runtime.block_on(client.video_details(&id)) {
                Ok(item) => print_json(&item)?,
                Err(e) => {
                    eprintln!("lookup failed: {e}");
                    print_json(&Option::<studystation_core::MediaItem>::None)?;
                }
            }
        }
    }

    Ok(())
}
