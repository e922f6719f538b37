use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gmaps")]
#[command(about = "Google Maps agents: place search and geocoding in natural language", long_about = None)]
pub struct Cli {
    /// TOML file overriding models, temperatures, timeout and language
    #[arg(short, long, global = true, env = "GMAPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// User ID for the session
    #[arg(short, long, global = true, default_value = "cli_user")]
    pub user_id: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single request and print the answer
    Ask {
        /// The request, e.g. "강남역 근처 카페 알려줘"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run an interactive console session
    Console,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["gmaps", "ask", "강남역", "카페"]).unwrap();
        match cli.command {
            Commands::Ask { text } => assert_eq!(text, vec!["강남역", "카페"]),
            Commands::Console => panic!("expected ask"),
        }
        assert_eq!(cli.user_id, "cli_user");
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_console_with_globals() {
        let cli =
            Cli::try_parse_from(["gmaps", "console", "--json", "--config", "agents.toml", "-u", "me"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Console));
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("agents.toml")));
        assert_eq!(cli.user_id, "me");
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Cli::try_parse_from(["gmaps", "ask"]).is_err());
    }
}
