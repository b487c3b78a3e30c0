//! Segment model and editing core for word-error-rate annotation.
//!
//! Raw transcript text is split into [`segment::Line`]s of
//! [`segment::Segment`]s by the [`tokenizer`]. A [`session::Session`] owns
//! the live lines and the selection and routes every edit through the
//! [`history`] before the [`editor`] applies it. [`search`] and [`preview`]
//! derive read-only views for whatever draws the segments.

pub mod batch;
pub mod command;
pub mod config;
pub mod editor;
pub mod history;
pub mod messages;
pub mod preview;
pub mod search;
pub mod segment;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tokenizer;
