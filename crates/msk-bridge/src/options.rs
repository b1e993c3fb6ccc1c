//! Per-call options.
//!
//! Options arrive as a host struct next to the problem. Unspecified values
//! take the defaults of the entry point being called: `mosek` uses
//! [`Options::default`], while `mosek_read` and `mosek_write` start from
//! [`Options::for_files`].

use crate::error::BridgeResult;
use crate::host::{Fields, Seek};
use crate::messages::Messages;

/// Host-facing option keys.
pub const OPTION_KEYS: [&str; 5] = ["useparam", "usesol", "verbose", "writebefore", "writeafter"];

/// Options controlling one interface call.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Transfer parameter tables to and from the task.
    pub useparam: bool,

    /// Transfer the initial or final solution to and from the task.
    pub usesol: bool,

    /// Message verbosity (1 errors, 2 solver log, 3 warnings, 4 info, 50 debug).
    pub verbose: f64,

    /// Dump the task to this file before optimizing (empty = off).
    pub writebefore: String,

    /// Dump the task and its solution to this file after optimizing (empty = off).
    pub writeafter: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            useparam: true,
            usesol: true,
            verbose: 10.0,
            writebefore: String::new(),
            writeafter: String::new(),
        }
    }
}

impl Options {
    /// Defaults for the file entry points, which move only the problem.
    pub fn for_files() -> Self {
        Self {
            useparam: false,
            usesol: false,
            ..Self::default()
        }
    }

    /// Read options from a host struct on top of `defaults`.
    ///
    /// `verbose` is applied to `msgs` as soon as it is known, which also
    /// releases any messages held back so far.
    pub fn from_fields(fields: &Fields, defaults: Options, msgs: &Messages) -> BridgeResult<Self> {
        msgs.debug("Reading options");
        let seek = Seek::new(fields);
        let mut opts = defaults;

        if let Some(verbose) = seek.optional::<f64>("verbose")? {
            opts.verbose = verbose;
        }
        msgs.set_verbosity(opts.verbose);

        if let Some(v) = seek.optional::<bool>("useparam")? {
            opts.useparam = v;
        }
        if let Some(v) = seek.optional::<bool>("usesol")? {
            opts.usesol = v;
        }
        if let Some(v) = seek.optional::<String>("writebefore")? {
            opts.writebefore = v;
        }
        if let Some(v) = seek.optional::<String>("writeafter")? {
            opts.writeafter = v;
        }

        seek.only(&OPTION_KEYS)?;
        Ok(opts)
    }
}
