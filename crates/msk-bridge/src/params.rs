//! Parameter translation between host tables and native parameter ids.

use crate::error::{BridgeError, BridgeResult};
use crate::handles::Task;
use crate::host::{Fields, Value};
use crate::library::Library;
use crate::messages::Messages;
use std::collections::BTreeMap;

/// Prefix of symbolic constant values (e.g. `MSK_ON`).
pub const VALUE_PREFIX: &str = "MSK_";

/// Parameter classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Int,
    Float,
    Str,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [ParamKind::Int, ParamKind::Float, ParamKind::Str];

    /// Canonical name prefix of parameters of this class.
    pub fn prefix(&self) -> &'static str {
        match self {
            ParamKind::Int => "MSK_IPAR_",
            ParamKind::Float => "MSK_DPAR_",
            ParamKind::Str => "MSK_SPAR_",
        }
    }

    /// Host table holding parameters of this class.
    pub fn table(&self) -> &'static str {
        match self {
            ParamKind::Int => "iparam",
            ParamKind::Float => "dparam",
            ParamKind::Str => "sparam",
        }
    }
}

/// Complete `s` with the part of `prefix` it does not already start with.
///
/// Finds the longest suffix of `prefix` that is also a prefix of `s`,
/// scanning left to right and restarting the match on a mismatch, then
/// prepends only the unmatched head of `prefix`. `"IPAR_LOG"` becomes
/// `"MSK_IPAR_LOG"` and an already canonical name is left alone.
///
/// An empty `s` gets the whole prefix.
pub fn append_prefix(s: &str, prefix: &str) -> String {
    let s_bytes = s.as_bytes();
    let p_bytes = prefix.as_bytes();

    let mut inclusion = 0;
    let mut j = 0;
    for (i, &p) in p_bytes.iter().enumerate() {
        if s_bytes.get(j) == Some(&p) {
            j += 1;
            if j >= s_bytes.len() {
                inclusion = p_bytes.len();
                break;
            }
        } else {
            j = 0;
            inclusion = i + 1;
        }
    }

    let mut out = String::with_capacity(inclusion + s.len());
    out.push_str(&prefix[..inclusion]);
    out.push_str(s);
    out
}

/// Strip `prefix` from `s` if `s` is strictly longer and starts with it.
pub fn remove_prefix(s: &str, prefix: &str) -> String {
    if s.len() > prefix.len() {
        if let Some(rest) = s.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    s.to_string()
}

/// Upper-case and complete a user-supplied name.
pub fn normalize(name: &str, prefix: &str) -> String {
    append_prefix(&name.to_uppercase(), prefix)
}

/// Convert a host scalar to a native integer.
///
/// Infinities of either sign saturate to `i32::MAX`; a fractional part is
/// truncated with a warning.
pub fn scalar_to_int(x: f64, msgs: &Messages) -> i32 {
    if x.is_infinite() {
        return i32::MAX;
    }
    let truncated = x as i32;
    let err = x - truncated as f64;
    if err.abs() >= 1e-6 {
        msgs.warning("A scalar with fractional value was truncated to an integer.");
    }
    truncated
}

/// Set a single parameter from a host value.
pub fn set_parameter<L: Library>(
    task: &mut Task<'_, L>,
    kind: ParamKind,
    name: &str,
    value: &Value,
    msgs: &Messages,
) -> BridgeResult<()> {
    let table = kind.table();
    if value.is_empty() {
        msgs.warning(&format!(
            "The parameter '{}' from {} was ignored due to an empty definition.",
            name, table
        ));
        return Ok(());
    }
    if !matches!(value, Value::Text(_)) && value.numel() >= 2 {
        return Err(BridgeError::input(format!(
            "The parameter '{}' from {} had more than one element in its definition.",
            name, table
        )));
    }

    let canonical = normalize(name, kind.prefix());
    let found = task.query(|lib, t| lib.which_param(t, &canonical))?;
    let idx = match found {
        Some((native, idx)) if native == kind => idx,
        _ => {
            return Err(BridgeError::value(format!(
                "Parameter '{}' from {} was not recognized.",
                name, table
            )))
        }
    };
    msgs.debug(&format!("Setting {} = {:?}", canonical, value));

    match kind {
        ParamKind::Int => {
            let v = match value {
                Value::Text(sym) => {
                    let sym = normalize(sym, VALUE_PREFIX);
                    task.library().sym_name_to_value(&sym).ok_or_else(|| {
                        BridgeError::value(format!(
                            "The value of parameter '{}' from {} was not recognized",
                            name, table
                        ))
                    })?
                }
                other => match other.as_scalar() {
                    Some(x) => scalar_to_int(x, msgs),
                    None => {
                        return Err(BridgeError::input(format!(
                            "The value of parameter '{}' from {} should be an integer or string",
                            name, table
                        )))
                    }
                },
            };
            task.call(|lib, t| lib.put_int_param(t, idx, v))
        }
        ParamKind::Float => {
            let v = value.as_scalar().ok_or_else(|| {
                BridgeError::input(format!(
                    "The value of parameter '{}' from {} should be a double",
                    name, table
                ))
            })?;
            task.call(|lib, t| lib.put_dou_param(t, idx, v))
        }
        ParamKind::Str => {
            let v = value.as_str().ok_or_else(|| {
                BridgeError::input(format!(
                    "The value of parameter '{}' from {} should be a string",
                    name, table
                ))
            })?;
            task.call(|lib, t| lib.put_str_param(t, idx, v))
        }
    }
}

/// Apply the three host parameter tables in order.
pub fn append_parameters<L: Library>(
    task: &mut Task<'_, L>,
    iparam: &Fields,
    dparam: &Fields,
    sparam: &Fields,
    msgs: &Messages,
) -> BridgeResult<()> {
    for (kind, table) in [
        (ParamKind::Int, iparam),
        (ParamKind::Float, dparam),
        (ParamKind::Str, sparam),
    ] {
        for (name, value) in table {
            set_parameter(task, kind, name, value, msgs)?;
        }
    }
    Ok(())
}

/// Read the solver's full catalog of one parameter class.
///
/// Names are returned without their class prefix. Integer values that have
/// a symbolic name are returned as that name without `MSK_`.
pub fn get_all_parameters<L: Library>(
    task: &Task<'_, L>,
    kind: ParamKind,
) -> BridgeResult<BTreeMap<String, Value>> {
    let count = task.query(|lib, t| lib.num_params(t, kind))?;
    let mut out = BTreeMap::new();

    for idx in 0..count {
        let full = task.query(|lib, t| lib.param_name(t, kind, idx))?;
        let name = remove_prefix(&full, kind.prefix());

        let value = match kind {
            ParamKind::Int => {
                let v = task.query(|lib, t| lib.get_int_param(t, idx))?;
                let sym = task.query_env(|lib, env, _| lib.int_param_symbol(env, idx, v))?;
                let sym = remove_prefix(&sym, VALUE_PREFIX);
                if sym.is_empty() {
                    Value::Scalar(v as f64)
                } else {
                    Value::Text(sym)
                }
            }
            ParamKind::Float => Value::Scalar(task.query(|lib, t| lib.get_dou_param(t, idx))?),
            ParamKind::Str => {
                let len = task.query(|lib, t| lib.str_param_len(t, idx))?;
                // Terminator is not counted in the reported length
                Value::Text(task.query(|lib, t| lib.get_str_param(t, idx, len + 1))?)
            }
        };
        out.insert(name, value);
    }
    Ok(out)
}
