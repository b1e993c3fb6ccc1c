//! Leveled message sink with a pending buffer.
//!
//! Messages raised before the caller's verbosity is known are held back and
//! released in one go once [`Messages::set_verbosity`] is called. Messages
//! that pass the verbosity filter are forwarded to `tracing`; solver log text
//! goes to the `msk::solver` target so it can be filtered separately.

use std::cell::RefCell;
use tracing::{debug, error, info, warn};

/// Message classes, ordered by how much verbosity they need to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 1,
    Solver = 2,
    Warning = 3,
    Info = 4,
    Debug = 50,
    All = 100,
}

impl Level {
    fn threshold(self) -> f64 {
        self as i32 as f64
    }
}

#[derive(Debug, Default)]
struct State {
    /// `None` until the caller configures it; messages stay pending meanwhile.
    verbosity: Option<f64>,
    pending: Vec<(Level, String)>,
    warnings: usize,
}

/// Per-context message sink.
#[derive(Debug, Default)]
pub struct Messages {
    state: RefCell<State>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the verbosity and the warning count; drop pending messages.
    pub fn reset(&self) {
        *self.state.borrow_mut() = State::default();
    }

    /// Set the verbosity and flush everything that was pending.
    pub fn set_verbosity(&self, verbosity: f64) {
        self.state.borrow_mut().verbosity = Some(verbosity);
        self.flush_pending();
    }

    pub fn verbosity(&self) -> Option<f64> {
        self.state.borrow().verbosity
    }

    /// Release pending messages unconditionally.
    ///
    /// If no verbosity was ever set, everything is shown under a header so
    /// messages that led up to a failure are not lost.
    pub fn force_pending(&self) {
        let unset = self.state.borrow().verbosity.is_none();
        if unset {
            self.state.borrow_mut().verbosity = Some(Level::All.threshold());
            self.output(Level::Error, "----- PENDING MESSAGES -----");
        }
        self.flush_pending();
    }

    pub fn clear_pending(&self) {
        self.state.borrow_mut().pending.clear();
    }

    pub fn pending_len(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Number of warnings raised since the last reset.
    pub fn warnings(&self) -> usize {
        self.state.borrow().warnings
    }

    pub fn error(&self, msg: &str) {
        self.output(Level::Error, &format!("ERROR: {}", msg));
    }

    pub fn warning(&self, msg: &str) {
        self.state.borrow_mut().warnings += 1;
        self.output(Level::Warning, &format!("WARNING: {}", msg));
    }

    pub fn info(&self, msg: &str) {
        self.output(Level::Info, msg);
    }

    pub fn debug(&self, msg: &str) {
        self.output(Level::Debug, msg);
    }

    /// Log text produced by the native library's streams.
    pub fn solver(&self, text: &str) {
        self.output(Level::Solver, text);
    }

    /// Emit `msg` at `level`, or buffer it if verbosity is still unknown.
    pub fn output(&self, level: Level, msg: &str) {
        let verbosity = {
            let mut state = self.state.borrow_mut();
            match state.verbosity {
                Some(v) => v,
                None => {
                    state.pending.push((level, msg.to_string()));
                    return;
                }
            }
        };
        if verbosity >= level.threshold() {
            dispatch(level, msg);
        }
    }

    fn flush_pending(&self) {
        let pending = std::mem::take(&mut self.state.borrow_mut().pending);
        for (level, msg) in pending {
            self.output(level, &msg);
        }
    }
}

fn dispatch(level: Level, msg: &str) {
    let msg = msg.trim_end_matches('\n');
    match level {
        Level::Error => error!("{}", msg),
        Level::Solver => info!(target: "msk::solver", "{}", msg),
        Level::Warning => warn!("{}", msg),
        Level::Info => info!("{}", msg),
        Level::Debug | Level::All => debug!("{}", msg),
    }
}
