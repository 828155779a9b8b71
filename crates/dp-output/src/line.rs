//! The `Philosopher <id>: <STATE>` line format.

use std::sync::LazyLock;

use dp_core::{AgentId, AgentState};
use dp_protocol::Transition;
use regex::Regex;

/// Matches anywhere in the line so prefixed output (timestamps, thread
/// names) still parses.
static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Philosopher ([0-9]+): ([A-Z]+)").expect("static pattern compiles")
});

pub fn format_line(id: AgentId, state: AgentState) -> String {
    format!("Philosopher {id}: {state}")
}

/// Parse one log line.
///
/// Returns `None` for lines that are not transitions at all, and
/// `Some(Err(reason))` for lines that look like a transition but name an
/// unknown state or an id that does not fit.
pub fn parse_line(line: &str) -> Option<Result<Transition, String>> {
    let caps = LINE.captures(line)?;
    let id = match caps[1].parse::<u32>() {
        Ok(id) => AgentId(id),
        Err(e) => return Some(Err(format!("bad philosopher id {:?}: {e}", &caps[1]))),
    };
    Some(
        caps[2]
            .parse::<AgentState>()
            .map(|state| Transition { id, state })
            .map_err(|e| e.to_string()),
    )
}
