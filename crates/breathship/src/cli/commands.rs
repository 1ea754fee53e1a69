//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Admin access code required by mutating commands.
#[derive(Debug, Clone, Args)]
pub struct AccessArgs {
    /// Four-digit admin access code
    #[arg(long, value_name = "CODE")]
    pub code: String,
}

/// Field assignments for update commands.
#[derive(Debug, Clone, Args)]
pub struct PatchArgs {
    /// Field to change, as FIELD=VALUE (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
    pub set: Vec<String>,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Site content commands.
#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// Print the resolved content map
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print one content value
    Get {
        /// Content key (field name)
        key: String,
    },

    /// Change one content value
    Set {
        /// Content key (field name)
        field: String,
        /// New value
        value: String,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Activate or deactivate a content field
    Toggle {
        /// Content key (field name)
        field: String,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Write every content field back to its built-in value
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// List every content row, inactive ones included
    Fields {
        /// Only rows of this section
        #[arg(short, long)]
        section: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Export all content rows to a JSON file
    Export {
        /// Output file (defaults to breathship-content.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Import content values from an exported JSON file
    Import {
        /// File produced by `content export`
        file: PathBuf,
        #[command(flatten)]
        access: AccessArgs,
    },
}

/// Fields of a new session.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session title
    #[arg(long)]
    pub title: String,
    /// Description
    #[arg(long, default_value = "")]
    pub description: String,
    /// Date (e.g. 2024-02-15)
    #[arg(long, default_value = "")]
    pub date: String,
    /// Start time (e.g. "10:00 AM")
    #[arg(long, default_value = "")]
    pub time: String,
    /// Duration (e.g. "90 minutes")
    #[arg(long, default_value = "")]
    pub duration: String,
    /// Price (e.g. "$45")
    #[arg(long, default_value = "")]
    pub price: String,
    /// Card image URL
    #[arg(long, default_value = "")]
    pub image_link: String,
    /// Category (Beginner, Advanced, Corporate, One-on-One, Group, Workshop)
    #[arg(long)]
    pub tag: Option<String>,
    /// Booking/payment link
    #[arg(long, default_value = "")]
    pub payment_link: String,
    /// Store the session hidden
    #[arg(long)]
    pub hidden: bool,
}

/// Session commands.
#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List sessions
    List {
        /// Only sessions with this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Include hidden sessions
        #[arg(long)]
        all: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a session
    Add {
        #[command(flatten)]
        session: SessionArgs,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Change fields of a session
    Update {
        /// Session id
        id: String,
        #[command(flatten)]
        patch: PatchArgs,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Remove a session
    Delete {
        /// Session id
        id: String,
        #[command(flatten)]
        access: AccessArgs,
    },
}

/// Fields of a new blog post.
#[derive(Debug, Args)]
pub struct BlogArgs {
    /// Post title
    #[arg(long)]
    pub title: String,
    /// Short summary
    #[arg(long, default_value = "")]
    pub excerpt: String,
    /// HTML body
    #[arg(long, default_value = "", conflicts_with = "content_file")]
    pub content: String,
    /// Read the HTML body from a file
    #[arg(long, value_name = "FILE")]
    pub content_file: Option<PathBuf>,
    /// Card image URL
    #[arg(long, default_value = "")]
    pub image_link: String,
    /// Store the post unpublished
    #[arg(long)]
    pub draft: bool,
}

/// Blog commands.
#[derive(Debug, Subcommand)]
pub enum BlogsCommand {
    /// List posts
    List {
        /// Include unpublished posts
        #[arg(long)]
        all: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print one post
    Show {
        /// Post id
        id: String,
    },

    /// Add a post
    Add {
        #[command(flatten)]
        blog: BlogArgs,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Change fields of a post
    Update {
        /// Post id
        id: String,
        #[command(flatten)]
        patch: PatchArgs,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Remove a post
    Delete {
        /// Post id
        id: String,
        #[command(flatten)]
        access: AccessArgs,
    },
}

/// Fields of a new testimonial.
#[derive(Debug, Args)]
pub struct TestimonialArgs {
    /// Client name
    #[arg(long)]
    pub name: String,
    /// Testimonial text
    #[arg(long)]
    pub text: String,
    /// Portrait URL
    #[arg(long, default_value = "")]
    pub image_link: String,
    /// Mark as featured
    #[arg(long)]
    pub featured: bool,
    /// Store the testimonial hidden
    #[arg(long)]
    pub hidden: bool,
}

/// Testimonial commands.
#[derive(Debug, Subcommand)]
pub enum TestimonialsCommand {
    /// List testimonials
    List {
        /// Only featured testimonials
        #[arg(long)]
        featured: bool,
        /// Include hidden testimonials
        #[arg(long)]
        all: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a testimonial
    Add {
        #[command(flatten)]
        testimonial: TestimonialArgs,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Change fields of a testimonial
    Update {
        /// Testimonial id
        id: String,
        #[command(flatten)]
        patch: PatchArgs,
        #[command(flatten)]
        access: AccessArgs,
    },

    /// Remove a testimonial
    Delete {
        /// Testimonial id
        id: String,
        #[command(flatten)]
        access: AccessArgs,
    },
}

/// Form submission commands.
#[derive(Debug, Subcommand)]
pub enum FormsCommand {
    /// Send the contact form
    Contact {
        /// Your name
        #[arg(long)]
        name: String,
        /// Reply address
        #[arg(long)]
        email: String,
        /// Message
        #[arg(long)]
        message: String,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Session you are asking about
        #[arg(long)]
        session_type: Option<String>,
        /// Preferred date
        #[arg(long)]
        preferred_date: Option<String>,
    },

    /// Subscribe to the newsletter
    Newsletter {
        /// Subscriber address
        email: String,
    },

    /// Request a session booking
    Book {
        /// Your name
        #[arg(long)]
        name: String,
        /// Reply address
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Session to book
        #[arg(long)]
        session_type: String,
        /// Preferred date
        #[arg(long)]
        preferred_date: String,
        /// Preferred time
        #[arg(long)]
        preferred_time: String,
        /// Optional note
        #[arg(long)]
        message: Option<String>,
    },

    /// Send a corporate programme inquiry
    Corporate {
        /// Company name
        #[arg(long)]
        company_name: String,
        /// Contact person
        #[arg(long)]
        contact_name: String,
        /// Reply address
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Company size
        #[arg(long, default_value = "")]
        company_size: String,
        /// Programme of interest
        #[arg(long, default_value = "")]
        program_type: String,
        /// Message
        #[arg(long, default_value = "")]
        message: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
