//! Reading a [`Problem`] back out of a populated task.

use sprs::TriMat;

use crate::cones::read_cones;
use crate::error::{BridgeError, BridgeResult};
use crate::handles::Task;
use crate::host::Fields;
use crate::library::{Accessor, Library, VarType};
use crate::messages::Messages;
use crate::options::Options;
use crate::params::{get_all_parameters, ParamKind};
use crate::problem::Problem;
use crate::solution::{get_solution, solutions_to_fields};

/// Produce a fresh [`Problem`] from the task's current contents.
///
/// Parameter catalogs are read in full when `opts.useparam` is set, and the
/// stored solutions when `opts.usesol` is set.
pub fn read_problem<L: Library>(
    task: &Task<'_, L>,
    opts: &Options,
    msgs: &Messages,
) -> BridgeResult<Problem> {
    msgs.debug("Started reading problem output");

    let numanz = task.query(|lib, t| lib.get_num_anz(t))?;
    let numcon = task.query(|lib, t| lib.get_num_con(t))?;
    let numvar = task.query(|lib, t| lib.get_num_var(t))?;
    let numintvar = task.query(|lib, t| lib.get_num_int_var(t))?;
    let numcones = task.query(|lib, t| lib.get_num_cone(t))?;

    msgs.debug("Reading objective");
    let sense = task.query(|lib, t| lib.get_obj_sense(t))?;
    let c0 = task.query(|lib, t| lib.get_cfix(t))?;
    let c = task.query(|lib, t| lib.get_c(t, numvar))?;

    msgs.debug("Reading constraint matrix");
    let slice = task.query(|lib, t| lib.get_a_columns(t, numvar, numanz))?;
    let (m, n) = (numcon.max(0) as usize, numvar.max(0) as usize);
    let mut tri = TriMat::with_capacity((m, n), slice.val.len());
    for j in 0..n {
        let (start, end) = match (slice.ptr.get(j), slice.ptr.get(j + 1)) {
            (Some(&s), Some(&e)) => (s as usize, e as usize),
            _ => return Err(BridgeError::internal("column pointers are shorter than numvar + 1")),
        };
        for k in start..end {
            tri.add_triplet(slice.sub[k] as usize, j, slice.val[k]);
        }
    }
    let a = tri.to_csc();

    msgs.debug("Reading bounds");
    let (blc, buc) = read_bounds(task, Accessor::Con, numcon)?;
    let (blx, bux) = read_bounds(task, Accessor::Var, numvar)?;

    let cones = if numcones > 0 {
        msgs.debug("Reading cones");
        read_cones(task)?
    } else {
        Vec::new()
    };

    let mut intsub = Vec::with_capacity(numintvar.max(0) as usize);
    if numintvar > 0 {
        msgs.debug("Reading integer variables");
        for j in 0..numvar {
            if task.query(|lib, t| lib.get_var_type(t, j))? == VarType::Integer {
                intsub.push(j + 1);
                if intsub.len() >= numintvar as usize {
                    break;
                }
            }
        }
    }

    let (mut iparam, mut dparam, mut sparam) = (Fields::new(), Fields::new(), Fields::new());
    if opts.useparam {
        msgs.debug("Reading parameters");
        iparam = get_all_parameters(task, ParamKind::Int)?;
        dparam = get_all_parameters(task, ParamKind::Float)?;
        sparam = get_all_parameters(task, ParamKind::Str)?;
    }

    let mut sol = Fields::new();
    if opts.usesol {
        msgs.debug("Reading solutions");
        sol = solutions_to_fields(&get_solution(task)?);
    }

    Ok(Problem {
        sense,
        c,
        c0,
        a,
        blc,
        buc,
        blx,
        bux,
        cones,
        intsub,
        sol,
        iparam,
        dparam,
        sparam,
    })
}

fn read_bounds<L: Library>(
    task: &Task<'_, L>,
    acc: Accessor,
    n: i32,
) -> BridgeResult<(Vec<f64>, Vec<f64>)> {
    let slice = task.query(|lib, t| lib.get_bound_slice(t, acc, 0, n))?;
    let (lower, upper) = slice
        .keys
        .iter()
        .zip(slice.lower.iter().zip(&slice.upper))
        .map(|(key, (&l, &u))| key.expand(l, u))
        .unzip();
    Ok((lower, upper))
}
