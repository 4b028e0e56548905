//! Document metadata for Folio.
//!
//! Two independent, pure helpers used by the document loader:
//!
//! - [`parse_front_matter`] splits a `---` delimited `key: value` block off the
//!   head of a document.
//! - [`word_count`] and [`reading_time`] derive text metrics from the body.
//!
//! # Example
//!
//! ```
//! use folio_meta::{parse_front_matter, reading_time, word_count};
//!
//! let (meta, body) = parse_front_matter("---\ntitle: Hello\n---\nOne two three.\n");
//! assert_eq!(meta.get("title"), Some("Hello"));
//! assert_eq!(word_count(body), 3);
//! assert_eq!(reading_time(word_count(body)), 1);
//! ```

mod front_matter;
mod metrics;

pub use front_matter::{FrontMatter, normalize_source, parse_front_matter};
pub use metrics::{WORDS_PER_MINUTE, reading_time, word_count};
