//! Command-line interface for breathship.
//!
//! This module provides the CLI structure for the `breathship` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

pub use commands::{
    AccessArgs, BlogArgs, BlogsCommand, ConfigCommand, ContentCommand, FormsCommand,
    OutputFormat, PatchArgs, SessionArgs, SessionsCommand, TestimonialArgs, TestimonialsCommand,
};

use crate::logging::Verbosity;
use crate::model::Record;

/// breathship - Manage the Breathship site content
///
/// Reads and edits site copy, sessions, blog posts and testimonials in the
/// configured backend, and submits the site's forms.
#[derive(Debug, Parser)]
#[command(name = "breathship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read or edit site content
    #[command(subcommand)]
    Content(ContentCommand),

    /// Manage sessions
    #[command(subcommand)]
    Sessions(SessionsCommand),

    /// Manage blog posts
    #[command(subcommand)]
    Blogs(BlogsCommand),

    /// Manage testimonials
    #[command(subcommand)]
    Testimonials(TestimonialsCommand),

    /// Submit a site form
    #[command(subcommand)]
    Forms(FormsCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Turn `FIELD=VALUE` assignments into a patch record.
///
/// # Errors
///
/// Returns a message naming the first assignment without `=` or with an
/// empty field name.
pub fn parse_assignments(assignments: &[String]) -> Result<Record, String> {
    let mut patch = Record::new();
    for assignment in assignments {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got '{assignment}'"))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in '{assignment}'"));
        }
        if field == "id" {
            return Err("the id of a record cannot be changed".to_string());
        }
        patch.insert(field.to_string(), Value::String(value.to_string()));
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "breathship");
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::parse_from(["breathship", "-q", "content", "show"]);
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::parse_from(["breathship", "-vv", "content", "show"]);
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_content_set() {
        let cli = Cli::parse_from([
            "breathship",
            "content",
            "set",
            "hero_text",
            "Breathe in",
            "--code",
            "1234",
        ]);
        match cli.command {
            Command::Content(ContentCommand::Set {
                field,
                value,
                access,
            }) => {
                assert_eq!(field, "hero_text");
                assert_eq!(value, "Breathe in");
                assert_eq!(access.code, "1234");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_mutating_command_requires_code() {
        let result = Cli::try_parse_from(["breathship", "sessions", "delete", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_sessions_update() {
        let cli = Cli::parse_from([
            "breathship",
            "sessions",
            "update",
            "2",
            "--set",
            "price=$60",
            "--set",
            "time=6:00 PM",
            "--code",
            "1234",
        ]);
        let Command::Sessions(SessionsCommand::Update { id, patch, .. }) = cli.command else {
            panic!("expected sessions update");
        };
        assert_eq!(id, "2");
        let record = parse_assignments(&patch.set).unwrap();
        assert_eq!(record["price"], "$60");
        assert_eq!(record["time"], "6:00 PM");
    }

    #[test]
    fn test_parse_assignments_errors() {
        assert!(parse_assignments(&["nope".to_string()]).is_err());
        assert!(parse_assignments(&["=x".to_string()]).is_err());
        assert!(parse_assignments(&["id=7".to_string()]).is_err());
        let record = parse_assignments(&["excerpt=a=b".to_string()]).unwrap();
        assert_eq!(record["excerpt"], "a=b");
    }

    #[test]
    fn test_config_path_flag() {
        let cli = Cli::parse_from(["breathship", "-c", "/tmp/b.toml", "config", "path"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/b.toml")));
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }
}
