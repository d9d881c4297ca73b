//! # ccube-core
//!
//! Core types for the C-Cube QA store.
//!
//! This crate defines the foundational types used across the other crates:
//! - [`Question`], [`Answer`], [`Vote`], [`Tag`]: persisted records
//! - [`AnswerVotes`]: the two on-disk answer vote representations
//! - [`Clock`]: injectable time source
//! - Ranking formulas ([`scoring`]) and [`pagination`]
//! - Error hierarchy ([`QaError`], [`ErrorKind`])

pub mod answer;
pub mod clock;
pub mod error;
pub mod lenient;
pub mod pagination;
pub mod question;
pub mod scoring;
pub mod tag;
pub mod vote;

pub use answer::{Answer, AnswerSource, AnswerStatistics, AnswerVotes, ComprehensiveBundle};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorKind, QaError, Result};
pub use pagination::{paginate, Pagination};
pub use question::{Question, RelatedQuestion, TrendingQuestion};
pub use tag::Tag;
pub use vote::{Vote, VoteTarget, VoteType, VoteView};
