//! `breathship` - content engine for the Breathship breathwork site
//!
//! This library resolves editable site copy, sessions, blog posts and
//! testimonials from one of several backends (a `PostgREST` service, an
//! embedded local store, or published spreadsheets), falls back to built-in
//! content whenever a backend cannot be read, and provides the gated admin
//! surface that edits them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod admin;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod events;
pub mod forms;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod source;
pub mod store;

pub use admin::{AdminConsole, AdminGate, Feedback, FeedbackKind};
pub use config::{Backend, Config};
pub use error::{Error, Result};
pub use events::{RefreshBus, RefreshEvent};
pub use forms::{FormOutcome, FormSubmission, FormsClient};
pub use logging::init_logging;
pub use model::{
    Blog, ContentField, ContentMap, Entity, EntityKind, FieldType, Record, Session, SessionTag,
    Testimonial, VisibilityFlag,
};
pub use resolver::{ContentResolver, ContentView, ImportReport, UpdateOutcome};
pub use source::{connect, DataSource, LocalStore, RestSource, SheetSource};
pub use store::{BlogStore, EntityStore, SessionStore, TestimonialStore};
