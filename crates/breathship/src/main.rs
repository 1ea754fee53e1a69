//! `breathship` - CLI for the Breathship content engine
//!
//! This binary reads and edits site content, sessions, blog posts and
//! testimonials in the configured backend and submits the site's forms.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use breathship::cli::{
    parse_assignments, AccessArgs, BlogArgs, BlogsCommand, Cli, Command, ConfigCommand,
    ContentCommand, FormsCommand, OutputFormat, SessionArgs, SessionsCommand, TestimonialArgs,
    TestimonialsCommand,
};
use breathship::forms::{BookingForm, ContactForm, CorporateForm, NewsletterForm};
use breathship::{
    init_logging, AdminConsole, AdminGate, Blog, BlogStore, Config, ContentResolver, DataSource,
    Feedback, FormSubmission, FormsClient, Record, RefreshBus, Session, SessionStore, SessionTag,
    Testimonial, TestimonialStore, VisibilityFlag,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Config commands inspect the file themselves, so a broken file can
    // still be shown and validated.
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Forms(forms_cmd) => handle_forms(&config, forms_cmd).await,
        Command::Content(content_cmd) => {
            let source = breathship::connect(&config)?;
            handle_content(&config, source, content_cmd).await
        }
        Command::Sessions(sessions_cmd) => {
            let source = breathship::connect(&config)?;
            handle_sessions(&config, source, sessions_cmd).await
        }
        Command::Blogs(blogs_cmd) => {
            let source = breathship::connect(&config)?;
            handle_blogs(&config, source, blogs_cmd).await
        }
        Command::Testimonials(testimonials_cmd) => {
            let source = breathship::connect(&config)?;
            handle_testimonials(&config, source, testimonials_cmd).await
        }
        Command::Config(_) => unreachable!("handled above"),
    }
}

fn unlocked_console(
    config: &Config,
    source: Arc<dyn DataSource>,
    access: &AccessArgs,
) -> anyhow::Result<AdminConsole> {
    let bus = RefreshBus::new(config.events.capacity);
    let mut console = AdminConsole::new(source, bus, AdminGate::from_config(config));
    report(console.unlock(&access.code))?;
    Ok(console)
}

/// Print successful feedback; turn failures into an error exit.
fn report(feedback: Feedback) -> anyhow::Result<()> {
    if feedback.is_success() {
        println!("{feedback}");
        Ok(())
    } else {
        bail!("{feedback}")
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn warn_fallback(error: Option<&str>) {
    if let Some(error) = error {
        eprintln!("warning: backend unavailable, showing built-in data ({error})");
    }
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

async fn handle_content(
    config: &Config,
    source: Arc<dyn DataSource>,
    cmd: ContentCommand,
) -> anyhow::Result<()> {
    let bus = RefreshBus::new(config.events.capacity);

    match cmd {
        ContentCommand::Show { format } => {
            let mut resolver = ContentResolver::new(source, bus);
            let view = resolver.resolve().await;
            warn_fallback(view.error.as_deref());
            match format {
                OutputFormat::Json => print_json(&view.content)?,
                OutputFormat::Table => {
                    for (key, value) in &view.content {
                        println!("{key:<32} {}", shorten(value, 80));
                    }
                }
            }
        }
        ContentCommand::Get { key } => {
            let mut resolver = ContentResolver::new(source, bus);
            resolver.resolve().await;
            println!("{}", resolver.text(&key));
        }
        ContentCommand::Set {
            field,
            value,
            access,
        } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(console.update_content(&field, &value).await)?;
        }
        ContentCommand::Toggle { field, access } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(console.toggle_content_field(&field).await)?;
        }
        ContentCommand::Reset { yes, access } => {
            if !yes {
                println!("This will reset all content to the built-in defaults.");
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let mut console = unlocked_console(config, source, &access)?;
            report(console.reset_content().await)?;
        }
        ContentCommand::Fields { section, format } => {
            let resolver = ContentResolver::new(source, bus);
            let fields: Vec<_> = resolver
                .all_fields()
                .await
                .into_iter()
                .filter(|f| section.as_deref().map_or(true, |s| f.section == s))
                .collect();
            match format {
                OutputFormat::Json => print_json(&fields)?,
                OutputFormat::Table => {
                    println!(
                        "{:<18} {:>3}  {:<32} {:<8} {:<6} VALUE",
                        "SECTION", "#", "FIELD", "TYPE", "ACTIVE"
                    );
                    for field in &fields {
                        println!(
                            "{:<18} {:>3}  {:<32} {:<8} {:<6} {}",
                            field.section,
                            field.display_order,
                            field.field_name,
                            field.field_type.to_string(),
                            if field.is_active.is_visible() { "yes" } else { "no" },
                            shorten(&field.field_value, 48)
                        );
                    }
                }
            }
        }
        ContentCommand::Export { output, access } => {
            let console = unlocked_console(config, source, &access)?;
            report(console.export_content(output.as_deref()).await)?;
        }
        ContentCommand::Import { file, access } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mut console = unlocked_console(config, source, &access)?;
            report(console.import_content(&json).await)?;
        }
    }
    Ok(())
}

fn visibility(hidden: bool) -> VisibilityFlag {
    VisibilityFlag::from(!hidden)
}

fn session_from_args(args: SessionArgs) -> Session {
    Session {
        title: args.title,
        description: args.description,
        date: args.date,
        time: args.time,
        duration: args.duration,
        price: args.price,
        image_link: args.image_link,
        session_tag: args.tag.as_deref().map(SessionTag::parse),
        payment_link: args.payment_link,
        is_active: visibility(args.hidden),
        ..Session::default()
    }
}

fn patch_from(set: &[String]) -> anyhow::Result<Record> {
    parse_assignments(set).map_err(anyhow::Error::msg)
}

async fn handle_sessions(
    config: &Config,
    source: Arc<dyn DataSource>,
    cmd: SessionsCommand,
) -> anyhow::Result<()> {
    match cmd {
        SessionsCommand::List { tag, all, format } => {
            let mut store = SessionStore::new(source);
            if all {
                store.load_all().await;
            } else {
                store.load().await;
            }
            warn_fallback(store.error());

            let sessions: Vec<&Session> = match tag.as_deref().map(SessionTag::parse) {
                Some(tag) => store.by_tag(&tag),
                None => store.items().iter().collect(),
            };
            match format {
                OutputFormat::Json => print_json(&sessions)?,
                OutputFormat::Table => {
                    for s in sessions {
                        println!(
                            "{:>4}  {:<10} {:<9} {:<11} {}",
                            s.id,
                            s.date,
                            s.time,
                            s.session_tag.as_ref().map_or("", |t| t.as_str()),
                            s.title
                        );
                    }
                }
            }
        }
        SessionsCommand::Add { session, access } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(console.create_session(&session_from_args(session)).await)?;
        }
        SessionsCommand::Update { id, patch, access } => {
            let patch = patch_from(&patch.set)?;
            let mut console = unlocked_console(config, source, &access)?;
            report(console.update_session(&id, patch).await)?;
        }
        SessionsCommand::Delete { id, access } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(console.delete_session(&id).await)?;
        }
    }
    Ok(())
}

fn blog_from_args(args: BlogArgs) -> anyhow::Result<Blog> {
    let content = match &args.content_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => args.content,
    };
    Ok(Blog {
        title: args.title,
        excerpt: args.excerpt,
        content,
        image_link: args.image_link,
        is_published: visibility(args.draft),
        ..Blog::default()
    })
}

async fn handle_blogs(
    config: &Config,
    source: Arc<dyn DataSource>,
    cmd: BlogsCommand,
) -> anyhow::Result<()> {
    match cmd {
        BlogsCommand::List { all, format } => {
            let mut store = BlogStore::new(source);
            let blogs = if all {
                store.load_all().await
            } else {
                store.load().await
            };
            match format {
                OutputFormat::Json => print_json(blogs)?,
                OutputFormat::Table => {
                    for b in blogs {
                        println!(
                            "{:>4}  {:<26} {}",
                            b.id,
                            b.created_at.as_deref().unwrap_or(""),
                            b.title
                        );
                    }
                }
            }
            warn_fallback(store.error());
        }
        BlogsCommand::Show { id } => {
            let mut store = BlogStore::new(source);
            store.load().await;
            let Some(blog) = store.find(&id) else {
                bail!("blog post '{id}' not found");
            };
            println!("{}", blog.title);
            println!("{}", "=".repeat(blog.title.chars().count()));
            if !blog.excerpt.is_empty() {
                println!();
                println!("{}", blog.excerpt);
            }
            println!();
            println!("{}", blog.content);
        }
        BlogsCommand::Add { blog, access } => {
            let draft = blog_from_args(blog)?;
            let mut console = unlocked_console(config, source, &access)?;
            report(console.create_blog(&draft).await)?;
        }
        BlogsCommand::Update { id, patch, access } => {
            let patch = patch_from(&patch.set)?;
            let mut console = unlocked_console(config, source, &access)?;
            report(console.update_blog(&id, patch).await)?;
        }
        BlogsCommand::Delete { id, access } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(console.delete_blog(&id).await)?;
        }
    }
    Ok(())
}

fn testimonial_from_args(args: TestimonialArgs) -> Testimonial {
    Testimonial {
        name: args.name,
        text: args.text,
        image_link: args.image_link,
        is_featured: args.featured,
        is_active: visibility(args.hidden),
        ..Testimonial::default()
    }
}

async fn handle_testimonials(
    config: &Config,
    source: Arc<dyn DataSource>,
    cmd: TestimonialsCommand,
) -> anyhow::Result<()> {
    match cmd {
        TestimonialsCommand::List {
            featured,
            all,
            format,
        } => {
            let mut store = TestimonialStore::new(source);
            if all {
                store.load_all().await;
            } else {
                store.load().await;
            }
            warn_fallback(store.error());

            let testimonials: Vec<&Testimonial> = if featured {
                store.featured()
            } else {
                store.items().iter().collect()
            };
            match format {
                OutputFormat::Json => print_json(&testimonials)?,
                OutputFormat::Table => {
                    for t in testimonials {
                        println!(
                            "{:>4}  {:<20} {}{}",
                            t.id,
                            t.name,
                            if t.is_featured { "* " } else { "" },
                            shorten(&t.text, 60)
                        );
                    }
                }
            }
        }
        TestimonialsCommand::Add {
            testimonial,
            access,
        } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(
                console
                    .create_testimonial(&testimonial_from_args(testimonial))
                    .await,
            )?;
        }
        TestimonialsCommand::Update { id, patch, access } => {
            let patch = patch_from(&patch.set)?;
            let mut console = unlocked_console(config, source, &access)?;
            report(console.update_testimonial(&id, patch).await)?;
        }
        TestimonialsCommand::Delete { id, access } => {
            let mut console = unlocked_console(config, source, &access)?;
            report(console.delete_testimonial(&id).await)?;
        }
    }
    Ok(())
}

async fn handle_forms(config: &Config, cmd: FormsCommand) -> anyhow::Result<()> {
    let client = FormsClient::from_config(config)?;

    let submission = match cmd {
        FormsCommand::Contact {
            name,
            email,
            message,
            phone,
            session_type,
            preferred_date,
        } => FormSubmission::Contact(ContactForm {
            name,
            email,
            phone,
            message,
            session_type,
            preferred_date,
        }),
        FormsCommand::Newsletter { email } => {
            FormSubmission::Newsletter(NewsletterForm { email })
        }
        FormsCommand::Book {
            name,
            email,
            phone,
            session_type,
            preferred_date,
            preferred_time,
            message,
        } => FormSubmission::Booking(BookingForm {
            name,
            email,
            phone,
            session_type,
            preferred_date,
            preferred_time,
            message,
        }),
        FormsCommand::Corporate {
            company_name,
            contact_name,
            email,
            phone,
            company_size,
            program_type,
            message,
        } => FormSubmission::Corporate(CorporateForm {
            company_name,
            contact_name,
            email,
            phone,
            company_size,
            program_type,
            message,
        }),
    };

    let outcome = client.submit(&submission).await;
    if outcome.success {
        println!("{}", outcome.message);
        Ok(())
    } else {
        bail!("{}", outcome.message)
    }
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                print_json(&config.redacted())?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Source]");
                println!("  Backend:            {}", config.source.backend);
                println!();
                println!("[REST]");
                println!("  Base URL:           {}", config.rest.base_url);
                println!(
                    "  API key:            {}",
                    if config.rest.api_key.is_empty() { "(not set)" } else { "(set)" }
                );
                println!("  Timeout (secs):     {}", config.rest.timeout_secs);
                println!();
                println!("[Local]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Sheet]");
                println!("  Base URL:           {}", config.sheet.base_url);
                println!("  Content sheet:      {}", config.sheet.content_sheet);
                println!("  Sessions sheet:     {}", config.sheet.sessions_sheet);
                println!("  Blogs sheet:        {}", config.sheet.blogs_sheet);
                println!("  Testimonials sheet: {}", config.sheet.testimonials_sheet);
                println!();
                println!("[Forms]");
                println!("  Endpoint:           {}", config.forms.endpoint);
                println!("  Source label:       {}", config.forms.source);
                println!();
                println!("[Events]");
                println!("  Capacity:           {}", config.events.capacity);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
