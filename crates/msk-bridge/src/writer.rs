//! Populating a task from a [`Problem`].

use std::borrow::Cow;

use crate::bounds::BoundKey;
use crate::cones::write_cones;
use crate::error::{BridgeError, BridgeResult};
use crate::handles::Task;
use crate::library::{Accessor, Library, ObjSense, VarType};
use crate::messages::Messages;
use crate::options::Options;
use crate::params::append_parameters;
use crate::problem::Problem;
use crate::solution::append_initial_solution;

/// Convert a dimension or index to the native integer type.
pub(crate) fn native_index(n: usize) -> BridgeResult<i32> {
    i32::try_from(n).map_err(|_| {
        BridgeError::input(format!("Dimension {} exceeds the solver's index range", n))
    })
}

/// Initialize the environment and `task`, then load `problem` into it.
///
/// The initial solution and the parameter tables follow when `opts` enables
/// them. On failure the task is left partially populated; dropping it
/// releases it.
pub fn load_problem<L: Library>(
    task: &mut Task<'_, L>,
    problem: &Problem,
    opts: &Options,
    msgs: &Messages,
) -> BridgeResult<()> {
    msgs.debug("Started writing problem input");

    let bkc = derive_keys(&problem.blc, &problem.buc)?;
    let bkx = derive_keys(&problem.blx, &problem.bux)?;

    task.environment().init()?;

    if let Err(e) = populate(task, problem, &bkc, &bkx) {
        msgs.error("An error occurred while setting up the problem.");
        return Err(e);
    }

    if opts.usesol {
        append_initial_solution(task, &problem.sol, problem.numcon(), problem.numvar(), msgs)?;
    }
    if opts.useparam {
        append_parameters(task, &problem.iparam, &problem.dparam, &problem.sparam, msgs)?;
    }

    msgs.debug("Finished writing problem input");
    Ok(())
}

fn derive_keys(lower: &[f64], upper: &[f64]) -> BridgeResult<Vec<BoundKey>> {
    lower
        .iter()
        .zip(upper)
        .map(|(&l, &u)| BoundKey::derive(l, u))
        .collect()
}

fn populate<L: Library>(
    task: &mut Task<'_, L>,
    problem: &Problem,
    bkc: &[BoundKey],
    bkx: &[BoundKey],
) -> BridgeResult<()> {
    let numcon = native_index(problem.numcon())?;
    let numvar = native_index(problem.numvar())?;
    let numanz = native_index(problem.numanz())?;

    task.init(numcon, numvar)?;

    task.call(|lib, t| lib.put_max_num_var(t, numvar))?;
    task.call(|lib, t| lib.put_max_num_con(t, numcon))?;
    task.call(|lib, t| lib.put_max_num_anz(t, numanz))?;

    task.call(|lib, t| lib.append(t, Accessor::Con, numcon))?;
    task.call(|lib, t| lib.append(t, Accessor::Var, numvar))?;

    task.call(|lib, t| lib.put_cfix(t, problem.c0))?;

    let a: Cow<'_, sprs::CsMat<f64>> = if problem.a.is_csc() {
        Cow::Borrowed(&problem.a)
    } else {
        Cow::Owned(problem.a.to_csc())
    };

    for (j, &key) in bkx.iter().enumerate() {
        let col = j as i32;
        task.call(|lib, t| lib.put_cj(t, col, problem.c[j]))?;
        task.call(|lib, t| {
            lib.put_bound(t, Accessor::Var, col, key, problem.blx[j], problem.bux[j])
        })?;

        let (sub, val): (Vec<i32>, Vec<f64>) = match a.outer_view(j) {
            Some(column) => column.iter().map(|(i, &v)| (i as i32, v)).unzip(),
            None => (Vec::new(), Vec::new()),
        };
        task.call(|lib, t| lib.put_avec(t, Accessor::Var, col, &sub, &val))?;
    }

    for (i, &key) in bkc.iter().enumerate() {
        let row = i as i32;
        task.call(|lib, t| {
            lib.put_bound(t, Accessor::Con, row, key, problem.blc[i], problem.buc[i])
        })?;
    }

    write_cones(task, &problem.cones)?;

    for &j in &problem.intsub {
        task.call(|lib, t| lib.put_var_type(t, j - 1, VarType::Integer))?;
    }

    // An undefined sense leaves the task's default in place
    if problem.sense != ObjSense::Undefined {
        task.call(|lib, t| lib.put_obj_sense(t, problem.sense))?;
    }
    Ok(())
}
