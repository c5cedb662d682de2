//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using
//! the `clap` crate. Setting overrides are merged on top of the configuration
//! file and environment through the figment `Provider` implementation.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Compose notifications and dispatch them to the configured channels.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level (overrides the configuration file).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log notifications as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Prepend the signature to every message.
    #[arg(long)]
    pub sign: bool,

    /// Prepend the current time to every message.
    #[arg(long)]
    pub timestamp: bool,

    /// Signature text used with `--sign`.
    #[arg(long, value_name = "TEXT")]
    pub signature: Option<String>,

    /// The messages to send, in order.
    #[arg(value_name = "MESSAGE", required = true)]
    pub messages: Vec<String>,
}

fn insert_nested(dict: &mut Dict, section: &str, key: &str, value: Value) {
    let entry = dict
        .entry(section.to_string())
        .or_insert_with(|| Value::Dict(Tag::Default, Dict::new()));
    if let Value::Dict(_, inner) = entry {
        inner.insert(key.to_string(), value);
    }
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        // Only an explicit `--json` overrides; its absence leaves the file's choice.
        if self.json {
            insert_nested(&mut dict, "observers", "log_format", Value::from("Json"));
        }

        if let Some(signature) = &self.signature {
            insert_nested(
                &mut dict,
                "decoration",
                "signature",
                Value::from(signature.clone()),
            );
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags_and_messages() {
        let cli = Cli::parse_from([
            "notifier",
            "--sign",
            "--timestamp",
            "--signature",
            "Ops team",
            "first",
            "second",
        ]);
        assert!(cli.sign);
        assert!(cli.timestamp);
        assert_eq!(cli.signature.as_deref(), Some("Ops team"));
        assert_eq!(cli.messages, vec!["first", "second"]);
    }

    #[test]
    fn test_messages_are_required() {
        assert!(Cli::try_parse_from(["notifier"]).is_err());
    }

    #[test]
    fn test_provider_only_emits_given_overrides() {
        let cli = Cli::default();
        let data = cli.data().unwrap();
        assert!(data[&Profile::Default].is_empty());

        let cli = Cli {
            json: true,
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let data = cli.data().unwrap();
        let dict = &data[&Profile::Default];
        assert_eq!(dict["log_level"].as_str(), Some("debug"));
        let observers = dict["observers"].as_dict().unwrap();
        assert_eq!(observers["log_format"].as_str(), Some("Json"));
    }
}
