//! The `{code, msg}` response and the result of one interface call.

use crate::error::{BridgeError, Rescode};
use crate::host::{Fields, Value};
use crate::library::Library;
use crate::messages::Messages;

/// Uniform outcome of a top-level call.
#[derive(Debug, Clone)]
pub struct Response {
    /// Native response code, or NaN for errors raised by the interface itself.
    pub code: f64,
    pub msg: String,
}

impl Response {
    /// Response for a native code, with its symbol and description.
    pub fn from_code<L: Library>(lib: &L, code: Rescode) -> Self {
        let (symbol, description) = lib.code_description(code);
        Self {
            code: code.0 as f64,
            msg: format!("{}: {}", symbol, description),
        }
    }

    pub fn from_error(err: &BridgeError) -> Self {
        Self {
            code: err.code().map(f64::from).unwrap_or(f64::NAN),
            msg: err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Rescode::OK.0 as f64
    }

    pub fn to_value(&self) -> Value {
        let mut f = Fields::new();
        f.insert("code".into(), Value::Scalar(self.code));
        f.insert("msg".into(), Value::text(&self.msg));
        Value::Struct(f)
    }
}

/// Everything an interface call hands back to the host.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub response: Option<Response>,
    /// Solutions keyed by kind (`mosek`).
    pub sol: Option<Value>,
    /// The problem read from a file (`mosek_read`).
    pub prob: Option<Value>,
    locked: bool,
}

impl Outcome {
    /// Store `response`; without `overwrite` an existing response is kept.
    pub fn set_response(&mut self, response: Response, overwrite: bool) {
        if self.response.is_some() && (!overwrite || self.locked) {
            return;
        }
        self.response = Some(response);
    }

    /// Keep the current response from here on, even against overwrites.
    ///
    /// Set once the optimizer has reported its termination code, so later
    /// failures while extracting the solution leave that code in place.
    pub fn lock_response(&mut self) {
        self.locked = self.response.is_some();
    }

    pub fn into_value(self) -> Value {
        let mut f = Fields::new();
        if let Some(response) = &self.response {
            f.insert("response".into(), response.to_value());
        }
        if let Some(sol) = self.sol {
            f.insert("sol".into(), sol);
        }
        if let Some(prob) = self.prob {
            f.insert("prob".into(), prob);
        }
        Value::Struct(f)
    }
}

/// Close a call that ran to completion: add the OK response unless one is
/// already set, and drop whatever is still pending.
pub fn terminate_successfully<L: Library>(lib: &L, out: &mut Outcome, msgs: &Messages) {
    out.set_response(Response::from_code(lib, Rescode::OK), false);
    msgs.clear_pending();
}

/// Close a call that failed: release held-back messages so the lead-up to
/// the failure is visible, report the error and let it replace any
/// response already set.
pub fn terminate_unsuccessfully<L: Library>(
    lib: &L,
    out: &mut Outcome,
    msgs: &Messages,
    err: &BridgeError,
) {
    msgs.force_pending();
    msgs.error(&err.to_string());
    out.set_response(Response::from_error(err), true);
    terminate_successfully(lib, out, msgs);
}
