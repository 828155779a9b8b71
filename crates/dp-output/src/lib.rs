//! `dp-output` — the transition log and its validator.
//!
//! Every state change is written as one line:
//!
//! ```text
//! Philosopher <id>: <STATE>        STATE ∈ {THINKING, HUNGRY, EATING}
//! ```
//!
//! The format is a contract with external tooling, so it lives in one place
//! ([`line`]) and is used both to write ([`LogSink`]) and to read back
//! ([`ExclusionValidator`]).
//!
//! # Usage
//!
//! ```rust,ignore
//! use dp_output::{LogSink, validate_reader};
//!
//! let table = TableBuilder::new(config).observer(LogSink::stdout()).build()?;
//! // … later, on a captured log:
//! let verdict = validate_reader(ring, BufReader::new(File::open("dinner.log")?))?;
//! assert!(verdict.is_ok());
//! ```

pub mod error;
pub mod line;
pub mod sink;
pub mod validator;


pub use error::{OutputError, OutputResult};
pub use line::{format_line, parse_line};
pub use sink::LogSink;
pub use validator::{ExclusionValidator, Verdict, Violation, validate_reader};
