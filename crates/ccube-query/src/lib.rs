//! # ccube-query
//!
//! Read-side components of the C-Cube QA store.
//!
//! Includes:
//! - [`QuestionRepository`]: question reads, view recording, listing, related questions
//! - [`AnswerAggregator`]: ordered answers with statistics
//! - [`VoteAggregator`]: vote lists with summaries
//! - [`TagAggregator`] and [`StatsAggregator`]: tag listings and site statistics
//! - Result formatter (JSON, Table, Markdown)
//!
//! The components do not share state; each reads the store afresh per call.

pub mod answers;
pub mod formatter;
pub mod questions;
pub mod stats;
pub mod tags;
pub mod votes;

#[cfg(test)]
mod test_support;

pub use answers::{AnswerAggregator, AnswerListing};
pub use formatter::{format_json, format_results, OutputFormat, Tabular};
pub use questions::{ListQuery, QuestionDetail, QuestionListing, QuestionRepository, QuestionSort};
pub use stats::{SiteStats, StatsAggregator};
pub use tags::{TagAggregator, TagListing, TagQuery};
pub use votes::{parse_target, VoteAggregator, VoteListing, VoteSummary};
