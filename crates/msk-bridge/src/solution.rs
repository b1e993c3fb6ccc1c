//! Solution extraction and initial-solution loading.

use std::collections::BTreeMap;

use crate::bounds::BoundKey;
use crate::error::{BridgeError, BridgeResult};
use crate::handles::Task;
use crate::host::{check_cell_len, check_len, Fields, Seek, Value};
use crate::library::{Accessor, Library, SolItem, SolType, SolutionPoint, StatusKey};
use crate::messages::Messages;

/// One solution kind as read from a task.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionEntry {
    pub prosta: String,
    pub solsta: String,
    /// Constraint status keys.
    pub skc: Vec<String>,
    /// Variable status keys.
    pub skx: Vec<String>,
    /// Applicable value slices for this kind.
    pub items: BTreeMap<SolItem, Vec<f64>>,
}

impl SolutionEntry {
    pub fn to_value(&self) -> Value {
        let mut f = Fields::new();
        f.insert("prosta".into(), Value::text(&self.prosta));
        f.insert("solsta".into(), Value::text(&self.solsta));
        f.insert("skc".into(), keys_to_cell(&self.skc));
        f.insert("skx".into(), keys_to_cell(&self.skx));
        for (item, values) in &self.items {
            f.insert(item.name().into(), Value::Row(values.clone()));
        }
        Value::Struct(f)
    }
}

fn keys_to_cell(keys: &[String]) -> Value {
    Value::Cell(keys.iter().map(Value::text).collect())
}

/// Host fields of all solutions, keyed by kind name.
pub fn solutions_to_fields(solutions: &BTreeMap<SolType, SolutionEntry>) -> Fields {
    solutions
        .iter()
        .map(|(sol, entry)| (sol.name().to_string(), entry.to_value()))
        .collect()
}

/// Read every solution kind the task has defined.
///
/// Undefined kinds are left out entirely. Which items appear is decided by
/// [`SolItem::is_defined`] alone.
pub fn get_solution<L: Library>(
    task: &Task<'_, L>,
) -> BridgeResult<BTreeMap<SolType, SolutionEntry>> {
    let numcon = task.query(|lib, t| lib.get_num_con(t))?;
    let numvar = task.query(|lib, t| lib.get_num_var(t))?;
    let mut out = BTreeMap::new();

    for sol in SolType::ALL {
        if !task.query(|lib, t| lib.solution_def(t, sol))? {
            continue;
        }

        let (prosta, solsta) = task.query(|lib, t| lib.get_solution_status(t, sol))?;
        let prosta = task.query(|lib, t| lib.prosta_to_str(t, prosta))?;
        let solsta = task.query(|lib, t| lib.solsta_to_str(t, solsta))?;

        let skc = status_names(task, Accessor::Con, sol, numcon)?;
        let skx = status_names(task, Accessor::Var, sol, numvar)?;

        let mut items = BTreeMap::new();
        for item in SolItem::ALL {
            if !item.is_defined(sol) {
                continue;
            }
            let n = match item.accessor() {
                Accessor::Con => numcon,
                Accessor::Var => numvar,
            };
            let values = task.query(|lib, t| lib.get_solution_slice(t, sol, item, n))?;
            items.insert(item, values);
        }

        out.insert(
            sol,
            SolutionEntry {
                prosta,
                solsta,
                skc,
                skx,
                items,
            },
        );
    }
    Ok(out)
}

fn status_names<L: Library>(
    task: &Task<'_, L>,
    acc: Accessor,
    sol: SolType,
    n: i32,
) -> BridgeResult<Vec<String>> {
    let keys = task.query(|lib, t| lib.get_status_keys(t, acc, sol, n))?;
    keys.into_iter()
        .map(|sk| task.query(|lib, t| lib.sk_to_str(t, sk)))
        .collect()
}

/// Host-side solution fields of one kind, all optional.
struct InitialSolution {
    skc: Option<Vec<Value>>,
    xc: Option<Vec<f64>>,
    slc: Option<Vec<f64>>,
    suc: Option<Vec<f64>>,
    skx: Option<Vec<Value>>,
    xx: Option<Vec<f64>>,
    slx: Option<Vec<f64>>,
    sux: Option<Vec<f64>>,
    snx: Option<Vec<f64>>,
}

impl InitialSolution {
    fn from_fields(fields: &Fields, numcon: usize, numvar: usize) -> BridgeResult<Self> {
        let seek = Seek::new(fields);
        let cell = |name: &str, len: usize| -> BridgeResult<Option<Vec<Value>>> {
            let v = seek.optional::<Vec<Value>>(name)?;
            if let Some(v) = &v {
                check_cell_len(v.len(), name, len)?;
            }
            Ok(v)
        };
        let row = |name: &str, len: usize| -> BridgeResult<Option<Vec<f64>>> {
            let v = seek.optional::<Vec<f64>>(name)?;
            if let Some(v) = &v {
                check_len(v.len(), name, len)?;
            }
            Ok(v)
        };

        Ok(Self {
            skc: cell("skc", numcon)?,
            xc: row("xc", numcon)?,
            slc: row("slc", numcon)?,
            suc: row("suc", numcon)?,
            skx: cell("skx", numvar)?,
            xx: row("xx", numvar)?,
            slx: row("slx", numvar)?,
            sux: row("sux", numvar)?,
            snx: row("snx", numvar)?,
        })
    }

    fn any_con(&self) -> bool {
        self.skc.is_some() || self.xc.is_some() || self.slc.is_some() || self.suc.is_some()
    }

    fn any_var(&self) -> bool {
        self.skx.is_some()
            || self.xx.is_some()
            || self.slx.is_some()
            || self.sux.is_some()
            || self.snx.is_some()
    }
}

fn at(values: &Option<Vec<f64>>, i: usize) -> f64 {
    values.as_ref().and_then(|v| v.get(i).copied()).unwrap_or(0.0)
}

/// Load initial solutions keyed by kind name into the task.
///
/// Unknown or empty kinds are skipped with a warning. Absent values default
/// to 0 and absent status keys to unknown; an absent primal variable value is
/// taken from the variable's bounds.
pub fn append_initial_solution<L: Library>(
    task: &mut Task<'_, L>,
    sol: &Fields,
    numcon: usize,
    numvar: usize,
    msgs: &Messages,
) -> BridgeResult<()> {
    for (name, value) in sol {
        msgs.debug(&format!("Reading the initial solution '{}'", name));

        let Some(kind) = SolType::from_name(name) else {
            msgs.warning(&format!("The initial solution '{}' was not recognized.", name));
            continue;
        };
        if value.is_empty() {
            msgs.warning(&format!("The initial solution \"{}\" was ignored.", name));
            continue;
        }
        let fields = value.as_struct().ok_or_else(|| {
            BridgeError::input(format!(
                "The initial solution \"{}\" should be a 'struct'",
                name
            ))
        })?;
        let init = InitialSolution::from_fields(fields, numcon, numvar)?;

        if init.any_con() {
            for i in 0..numcon {
                // Constraint status keys are never parsed: any supplied
                // collection resets every row to unknown.
                let point = SolutionPoint {
                    sk: StatusKey::UNKNOWN,
                    x: at(&init.xc, i),
                    sl: at(&init.slc, i),
                    su: at(&init.suc, i),
                    sn: 0.0,
                };
                task.call(|lib, t| lib.put_solution_i(t, Accessor::Con, i as i32, kind, point))?;
            }
        }

        if init.any_var() {
            for j in 0..numvar {
                let sk = variable_status(task, init.skx.as_deref(), j, name)?;
                let x = match &init.xx {
                    Some(xx) => xx[j],
                    None => {
                        let (key, bl, bu) =
                            task.query(|lib, t| lib.get_bound(t, Accessor::Var, j as i32))?;
                        match key {
                            BoundKey::Fixed | BoundKey::LowerOnly | BoundKey::Ranged => bl,
                            BoundKey::UpperOnly => bu,
                            BoundKey::Free => 0.0,
                        }
                    }
                };
                let point = SolutionPoint {
                    sk,
                    x,
                    sl: at(&init.slx, j),
                    su: at(&init.sux, j),
                    sn: at(&init.snx, j),
                };
                task.call(|lib, t| lib.put_solution_i(t, Accessor::Var, j as i32, kind, point))?;
            }
        }

        if !init.any_con() && !init.any_var() {
            msgs.warning(&format!("The initial solution '{}' was ignored.", name));
        }
    }
    Ok(())
}

fn variable_status<L: Library>(
    task: &Task<'_, L>,
    skx: Option<&[Value]>,
    j: usize,
    name: &str,
) -> BridgeResult<StatusKey> {
    let entry = match skx.and_then(|keys| keys.get(j)) {
        Some(entry) if !entry.is_empty() => entry,
        _ => return Ok(StatusKey::UNKNOWN),
    };
    let symbol = entry.as_str().ok_or_else(|| {
        BridgeError::input(format!(
            "The status keys of variables in the initial solution \"{}\" should be strings",
            name
        ))
    })?;
    task.query(|lib, t| lib.str_to_sk(t, symbol))
}
