//! Mutual-exclusion validator for transition logs.
//!
//! Replays a log against a ring, tracking the last known state of every
//! philosopher, and flags every `EATING` line that lands while a neighbor is
//! still eating.  The verdict is a pure function of the line sequence: the
//! same log always yields the same verdict, however it is split into chunks.

use std::io::BufRead;

use dp_core::{AgentId, AgentState, Ring};
use dp_protocol::Transition;

use crate::{OutputError, OutputResult, parse_line};

/// An `EATING` transition observed while a neighbor was eating.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Violation {
    /// Zero-based index of the offending transition in the log.
    pub step:     usize,
    pub id:       AgentId,
    pub neighbor: AgentId,
}

/// Outcome of validating a whole log.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Verdict {
    pub transitions: usize,
    /// `EATING` lines per philosopher.
    pub meals:       Vec<u64>,
    pub violations:  Vec<Violation>,
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Incremental validator.  Feed transitions or raw lines in log order.
pub struct ExclusionValidator {
    ring:       Ring,
    states:     Vec<AgentState>,
    meals:      Vec<u64>,
    violations: Vec<Violation>,
    steps:      usize,
    lines:      usize,
}

impl ExclusionValidator {
    /// Everyone starts out thinking.
    pub fn new(ring: Ring) -> Self {
        Self {
            ring,
            states:     vec![AgentState::Thinking; ring.size()],
            meals:      vec![0; ring.size()],
            violations: Vec::new(),
            steps:      0,
            lines:      0,
        }
    }

    /// Forget everything seen so far.
    pub fn reset(&mut self) {
        *self = Self::new(self.ring);
    }

    /// Apply one transition.  Returns the violations it caused (one per
    /// eating neighbor).
    ///
    /// # Panics
    /// Panics if `t.id` is not on the ring; [`feed_line`](Self::feed_line)
    /// checks ids before calling this.
    pub fn feed(&mut self, t: Transition) -> Vec<Violation> {
        let step = self.steps;
        self.steps += 1;

        let mut found = Vec::new();
        if t.state == AgentState::Eating {
            for n in self.ring.neighbors(t.id) {
                if self.states[n.index()] == AgentState::Eating {
                    found.push(Violation { step, id: t.id, neighbor: n });
                }
            }
            self.meals[t.id.index()] += 1;
        }
        self.states[t.id.index()] = t.state;
        self.violations.extend_from_slice(&found);
        found
    }

    /// Parse and apply one raw log line.  Lines that are not transitions are
    /// skipped.
    pub fn feed_line(&mut self, line: &str) -> OutputResult<Vec<Violation>> {
        self.lines += 1;
        let line_no = self.lines;
        let Some(parsed) = parse_line(line) else {
            return Ok(Vec::new());
        };
        let t = parsed.map_err(|reason| OutputError::Parse { line: line_no, reason })?;
        if self.ring.check(t.id).is_err() {
            return Err(OutputError::UnknownAgent {
                line: line_no,
                id:   t.id,
                size: self.ring.size(),
            });
        }
        Ok(self.feed(t))
    }

    /// Feed every line of `reader`.
    pub fn feed_reader<R: BufRead>(&mut self, reader: R) -> OutputResult<()> {
        for line in reader.lines() {
            self.feed_line(&line?)?;
        }
        Ok(())
    }

    /// Current state of `id` as reconstructed from the log.
    pub fn state_of(&self, id: AgentId) -> Option<AgentState> {
        self.states.get(id.index()).copied()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict {
            transitions: self.steps,
            meals:       self.meals.clone(),
            violations:  self.violations.clone(),
        }
    }
}

/// Validate a complete log in one call.
pub fn validate_reader<R: BufRead>(ring: Ring, reader: R) -> OutputResult<Verdict> {
    let mut validator = ExclusionValidator::new(ring);
    validator.feed_reader(reader)?;
    Ok(validator.verdict())
}
