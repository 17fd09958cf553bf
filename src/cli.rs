//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// geolocator - IP geolocation over HTTP backed by a MaxMind database
#[derive(Parser, Debug)]
#[command(name = "geolocator")]
#[command(version)]
#[command(about = "Resolve IP addresses to geographic attributes", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Look up one IP address in the local database and print the JSON result
    Lookup {
        /// IP address to resolve
        ip: String,

        /// Language code for localized names (default: geoip.default_language)
        #[arg(long)]
        lang: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate a sample configuration file
    Generate {
        /// Output file path (default: config.example.toml)
        output_path: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["geolocator"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_lookup_with_lang() {
        let cli =
            Cli::try_parse_from(["geolocator", "lookup", "81.2.69.142", "--lang", "de"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Lookup {
                ip: "81.2.69.142".to_string(),
                lang: Some("de".to_string()),
            })
        );
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["geolocator", "serve", "-c", "/etc/geo.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config.as_deref(), Some("/etc/geo.toml"));
    }

    #[test]
    fn test_config_generate() {
        let cli = Cli::try_parse_from(["geolocator", "config", "generate", "out.toml"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".to_string()),
                },
            })
        );
    }

    #[test]
    fn test_lookup_requires_ip() {
        assert!(Cli::try_parse_from(["geolocator", "lookup"]).is_err());
    }
}
