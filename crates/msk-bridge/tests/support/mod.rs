//! In-memory stand-in for the MOSEK library.
//!
//! Stores everything a task is given and hands it back, "optimizes" by
//! picking a bound-feasible point, and keeps a shared record of lifecycle
//! events so tests can check what was allocated and released.

#![allow(dead_code)]

use msk_bridge::library::{
    Accessor, BoundSlice, ColumnSlice, NativeResult, ObjSense, ProgressFn, SolItem, SolType,
    SolutionPoint, StatusKey, StreamSink, VarType,
};
use msk_bridge::{BoundKey, Interrupt, Library, ParamKind, Rescode, Value};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::rc::Rc;

pub const RES_ERR_LICENSE: i32 = 1000;
pub const RES_ERR_FILE_OPEN: i32 = 1052;
pub const RES_ERR_IN_ARGUMENT: i32 = 1200;
pub const RES_ERR_INDEX: i32 = 1235;
pub const RES_TRM_MAX_ITERATIONS: i32 = 10000;
pub const RES_TRM_USER_CALLBACK: i32 = 10007;

const IPARAMS: [(&str, i32); 5] = [
    ("MSK_IPAR_LOG", 10),
    ("MSK_IPAR_OPF_WRITE_SOLUTIONS", 0),
    ("MSK_IPAR_WRITE_DATA_PARAM", 0),
    ("MSK_IPAR_OPF_WRITE_PARAMETERS", 0),
    ("MSK_IPAR_INTPNT_MAX_ITERATIONS", 400),
];
const DPARAMS: [(&str, f64); 2] = [
    ("MSK_DPAR_OPTIMIZER_MAX_TIME", -1.0),
    ("MSK_DPAR_INTPNT_TOL_PFEAS", 1e-8),
];
const SPARAMS: [(&str, &str); 1] = [("MSK_SPAR_PARAM_WRITE_FILE_NAME", "")];

const IPAR_OPF_WRITE_SOLUTIONS: usize = 1;
const IPAR_WRITE_DATA_PARAM: usize = 2;

const STATUS_KEYS: [&str; 7] = ["UNK", "BS", "SB", "LL", "UL", "FX", "INF"];
const SK_BS: i32 = 1;
const SK_LL: i32 = 3;
const SK_UL: i32 = 4;
const SK_FX: i32 = 5;

const PROSTA_PRIMAL_AND_DUAL_FEASIBLE: i32 = 1;
const PROSTA_PRIMAL_FEASIBLE: i32 = 2;
const SOLSTA_OPTIMAL: i32 = 1;
const SOLSTA_INTEGER_OPTIMAL: i32 = 2;

/// Behavior switches and observations shared between a test and the
/// library it handed to the bridge.
#[derive(Default)]
pub struct Shared {
    /// Make `link_env_stream` fail with this code.
    pub fail_link_env_stream: Cell<Option<i32>>,
    /// Make `init_env` fail with this code.
    pub fail_init_env: Cell<Option<i32>>,
    /// Make `link_task_stream` fail with this code.
    pub fail_link_task_stream: Cell<Option<i32>>,
    /// Make `optimize` fail with this code.
    pub fail_optimize: Cell<Option<i32>>,
    /// Make `get_solution_slice` fail with this code.
    pub fail_solution_slice: Cell<Option<i32>>,
    /// Termination code reported by a successful `optimize`.
    pub trm_code: Cell<i32>,
    /// Request this flag from inside `optimize`, as a signal handler would.
    pub interrupt_during_optimize: RefCell<Option<Interrupt>>,
    /// Lifecycle calls in order.
    pub events: RefCell<Vec<&'static str>>,
    pub envs_live: Cell<i32>,
    pub tasks_live: Cell<i32>,
    /// Contents of the last task at the moment it was deleted.
    pub last_task: RefCell<Option<TaskData>>,
    /// Text written to any linked stream.
    pub log: RefCell<String>,
}

impl Shared {
    fn event(&self, name: &'static str) {
        self.events.borrow_mut().push(name);
    }
}

#[derive(Clone, Default)]
pub struct FakeLibrary {
    pub shared: Rc<Shared>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.shared.events.borrow().clone()
    }

    pub fn last_task(&self) -> TaskData {
        self.shared
            .last_task
            .borrow()
            .clone()
            .expect("no task was deleted")
    }
}

pub struct FakeEnv {
    stream: Option<StreamSink>,
}

/// Everything a task stores, in a form that survives a trip through a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    pub numcon: i32,
    pub numvar: i32,
    pub sense: i32,
    pub cfix: f64,
    pub c: Vec<f64>,
    /// Column-wise nonzeros `(row, value)`.
    pub columns: Vec<Vec<(i32, f64)>>,
    /// `(key code, lower, upper)`; values on open sides are stored as 0.
    pub con_bounds: Vec<(i32, f64, f64)>,
    pub var_bounds: Vec<(i32, f64, f64)>,
    pub cones: Vec<(i32, Vec<i32>)>,
    pub integer: Vec<bool>,
    pub iparam: Vec<i32>,
    pub dparam: Vec<f64>,
    pub sparam: Vec<String>,
    pub solutions: BTreeMap<String, SolData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolData {
    pub prosta: i32,
    pub solsta: i32,
    pub skc: Vec<i32>,
    pub skx: Vec<i32>,
    pub items: BTreeMap<String, Vec<f64>>,
}

impl SolData {
    fn sized(numcon: i32, numvar: i32) -> Self {
        let mut items = BTreeMap::new();
        for item in SolItem::ALL {
            let n = match item.accessor() {
                Accessor::Con => numcon,
                Accessor::Var => numvar,
            };
            items.insert(item.name().to_string(), vec![0.0; n as usize]);
        }
        Self {
            prosta: 0,
            solsta: 0,
            skc: vec![0; numcon as usize],
            skx: vec![0; numvar as usize],
            items,
        }
    }

    fn item_mut(&mut self, item: SolItem) -> &mut Vec<f64> {
        self.items.entry(item.name().to_string()).or_default()
    }
}

pub struct FakeTask {
    data: TaskData,
    stream: Option<StreamSink>,
    progress: Option<ProgressFn>,
}

impl FakeTask {
    fn write_log(&self, text: &str) {
        if let Some(sink) = &self.stream {
            sink(text);
        }
    }
}

fn key_code(key: BoundKey) -> i32 {
    match key {
        BoundKey::LowerOnly => 0,
        BoundKey::UpperOnly => 1,
        BoundKey::Fixed => 2,
        BoundKey::Free => 3,
        BoundKey::Ranged => 4,
    }
}

fn key_from_code(code: i32) -> NativeResult<BoundKey> {
    Ok(match code {
        0 => BoundKey::LowerOnly,
        1 => BoundKey::UpperOnly,
        2 => BoundKey::Fixed,
        3 => BoundKey::Free,
        4 => BoundKey::Ranged,
        _ => return Err(Rescode(RES_ERR_IN_ARGUMENT)),
    })
}

fn finite(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

fn index(i: i32, len: usize) -> NativeResult<usize> {
    if i < 0 || i as usize >= len {
        return Err(Rescode(RES_ERR_INDEX));
    }
    Ok(i as usize)
}

fn sense_code(sense: ObjSense) -> i32 {
    match sense {
        ObjSense::Undefined => 0,
        ObjSense::Minimize => 1,
        ObjSense::Maximize => 2,
    }
}

/// A point inside the variable bounds: the lower bound where there is one,
/// else the upper bound, else zero. Integer variables are rounded.
fn pick_point(data: &TaskData) -> Vec<f64> {
    data.var_bounds
        .iter()
        .zip(&data.integer)
        .map(|(&(key, bl, bu), &int)| {
            let x = match key {
                0 | 2 | 4 => bl,
                1 => bu,
                _ => 0.0,
            };
            if int {
                x.ceil()
            } else {
                x
            }
        })
        .collect()
}

fn status_of(key: i32) -> i32 {
    match key {
        0 => SK_LL,
        1 => SK_UL,
        2 => SK_FX,
        _ => SK_BS,
    }
}

impl Library for FakeLibrary {
    type Env = FakeEnv;
    type Task = FakeTask;

    fn make_env(&self) -> NativeResult<FakeEnv> {
        self.shared.event("make_env");
        self.shared.envs_live.set(self.shared.envs_live.get() + 1);
        Ok(FakeEnv { stream: None })
    }

    fn link_env_stream(&self, env: &mut FakeEnv, sink: StreamSink) -> NativeResult<()> {
        self.shared.event("link_env_stream");
        if let Some(code) = self.shared.fail_link_env_stream.get() {
            return Err(Rescode(code));
        }
        env.stream = Some(sink);
        Ok(())
    }

    fn init_env(&self, env: &mut FakeEnv) -> NativeResult<()> {
        self.shared.event("init_env");
        if let Some(code) = self.shared.fail_init_env.get() {
            return Err(Rescode(code));
        }
        if let Some(sink) = &env.stream {
            sink("Environment initialized.\n");
        }
        Ok(())
    }

    fn unlink_env_stream(&self, env: &mut FakeEnv) -> NativeResult<()> {
        self.shared.event("unlink_env_stream");
        env.stream = None;
        Ok(())
    }

    fn delete_env(&self, _env: FakeEnv) -> NativeResult<()> {
        self.shared.event("delete_env");
        self.shared.envs_live.set(self.shared.envs_live.get() - 1);
        Ok(())
    }

    fn make_task(&self, _env: &FakeEnv, _maxcon: i32, _maxvar: i32) -> NativeResult<FakeTask> {
        self.shared.event("make_task");
        self.shared.tasks_live.set(self.shared.tasks_live.get() + 1);
        let data = TaskData {
            iparam: IPARAMS.iter().map(|&(_, v)| v).collect(),
            dparam: DPARAMS.iter().map(|&(_, v)| v).collect(),
            sparam: SPARAMS.iter().map(|&(_, v)| v.to_string()).collect(),
            ..TaskData::default()
        };
        Ok(FakeTask {
            data,
            stream: None,
            progress: None,
        })
    }

    fn link_task_stream(&self, task: &mut FakeTask, sink: StreamSink) -> NativeResult<()> {
        self.shared.event("link_task_stream");
        if let Some(code) = self.shared.fail_link_task_stream.get() {
            return Err(Rescode(code));
        }
        let shared = Rc::clone(&self.shared);
        let tee: StreamSink = Rc::new(move |text: &str| {
            shared.log.borrow_mut().push_str(text);
            sink(text);
        });
        task.stream = Some(tee);
        Ok(())
    }

    fn unlink_task_stream(&self, task: &mut FakeTask) -> NativeResult<()> {
        self.shared.event("unlink_task_stream");
        task.stream = None;
        Ok(())
    }

    fn delete_task(&self, task: FakeTask) -> NativeResult<()> {
        self.shared.event("delete_task");
        self.shared.tasks_live.set(self.shared.tasks_live.get() - 1);
        *self.shared.last_task.borrow_mut() = Some(task.data);
        Ok(())
    }

    fn put_max_num_var(&self, _task: &mut FakeTask, _n: i32) -> NativeResult<()> {
        Ok(())
    }

    fn put_max_num_con(&self, _task: &mut FakeTask, _n: i32) -> NativeResult<()> {
        Ok(())
    }

    fn put_max_num_anz(&self, _task: &mut FakeTask, _n: i32) -> NativeResult<()> {
        Ok(())
    }

    fn append(&self, task: &mut FakeTask, acc: Accessor, num: i32) -> NativeResult<()> {
        let d = &mut task.data;
        let num = num.max(0);
        match acc {
            Accessor::Con => {
                d.numcon += num;
                d.con_bounds.resize(d.numcon as usize, (3, 0.0, 0.0));
            }
            Accessor::Var => {
                d.numvar += num;
                let n = d.numvar as usize;
                d.c.resize(n, 0.0);
                d.columns.resize(n, Vec::new());
                d.var_bounds.resize(n, (3, 0.0, 0.0));
                d.integer.resize(n, false);
            }
        }
        Ok(())
    }

    fn put_cfix(&self, task: &mut FakeTask, cfix: f64) -> NativeResult<()> {
        task.data.cfix = cfix;
        Ok(())
    }

    fn put_cj(&self, task: &mut FakeTask, j: i32, cj: f64) -> NativeResult<()> {
        let j = index(j, task.data.c.len())?;
        task.data.c[j] = cj;
        Ok(())
    }

    fn put_bound(
        &self,
        task: &mut FakeTask,
        acc: Accessor,
        i: i32,
        key: BoundKey,
        lower: f64,
        upper: f64,
    ) -> NativeResult<()> {
        let bounds = match acc {
            Accessor::Con => &mut task.data.con_bounds,
            Accessor::Var => &mut task.data.var_bounds,
        };
        let i = index(i, bounds.len())?;
        bounds[i] = (key_code(key), finite(lower), finite(upper));
        Ok(())
    }

    fn put_avec(
        &self,
        task: &mut FakeTask,
        acc: Accessor,
        i: i32,
        sub: &[i32],
        val: &[f64],
    ) -> NativeResult<()> {
        if acc != Accessor::Var || sub.len() != val.len() {
            return Err(Rescode(RES_ERR_IN_ARGUMENT));
        }
        let j = index(i, task.data.columns.len())?;
        for &r in sub {
            index(r, task.data.numcon as usize)?;
        }
        task.data.columns[j] = sub.iter().copied().zip(val.iter().copied()).collect();
        Ok(())
    }

    fn append_cone(
        &self,
        task: &mut FakeTask,
        kind: i32,
        _par: f64,
        sub: &[i32],
    ) -> NativeResult<()> {
        for &j in sub {
            index(j, task.data.numvar as usize)?;
        }
        task.data.cones.push((kind, sub.to_vec()));
        Ok(())
    }

    fn put_var_type(&self, task: &mut FakeTask, j: i32, vt: VarType) -> NativeResult<()> {
        let j = index(j, task.data.integer.len())?;
        task.data.integer[j] = vt == VarType::Integer;
        Ok(())
    }

    fn put_obj_sense(&self, task: &mut FakeTask, sense: ObjSense) -> NativeResult<()> {
        task.data.sense = sense_code(sense);
        Ok(())
    }

    fn get_obj_sense(&self, task: &FakeTask) -> NativeResult<ObjSense> {
        Ok(match task.data.sense {
            1 => ObjSense::Minimize,
            2 => ObjSense::Maximize,
            _ => ObjSense::Undefined,
        })
    }

    fn get_num_anz(&self, task: &FakeTask) -> NativeResult<i32> {
        Ok(task.data.columns.iter().map(|c| c.len() as i32).sum())
    }

    fn get_num_con(&self, task: &FakeTask) -> NativeResult<i32> {
        Ok(task.data.numcon)
    }

    fn get_num_var(&self, task: &FakeTask) -> NativeResult<i32> {
        Ok(task.data.numvar)
    }

    fn get_num_int_var(&self, task: &FakeTask) -> NativeResult<i32> {
        Ok(task.data.integer.iter().filter(|&&b| b).count() as i32)
    }

    fn get_num_cone(&self, task: &FakeTask) -> NativeResult<i32> {
        Ok(task.data.cones.len() as i32)
    }

    fn get_cfix(&self, task: &FakeTask) -> NativeResult<f64> {
        Ok(task.data.cfix)
    }

    fn get_c(&self, task: &FakeTask, numvar: i32) -> NativeResult<Vec<f64>> {
        Ok(task.data.c.iter().take(numvar.max(0) as usize).copied().collect())
    }

    fn get_a_columns(&self, task: &FakeTask, numvar: i32, maxnz: i32) -> NativeResult<ColumnSlice> {
        let mut slice = ColumnSlice {
            ptr: vec![0],
            sub: Vec::new(),
            val: Vec::new(),
        };
        for column in task.data.columns.iter().take(numvar.max(0) as usize) {
            for &(row, value) in column {
                slice.sub.push(row);
                slice.val.push(value);
            }
            slice.ptr.push(slice.sub.len() as i32);
        }
        if slice.sub.len() > maxnz.max(0) as usize {
            return Err(Rescode(RES_ERR_IN_ARGUMENT));
        }
        Ok(slice)
    }

    fn get_bound_slice(
        &self,
        task: &FakeTask,
        acc: Accessor,
        first: i32,
        last: i32,
    ) -> NativeResult<BoundSlice> {
        let bounds = match acc {
            Accessor::Con => &task.data.con_bounds,
            Accessor::Var => &task.data.var_bounds,
        };
        let mut slice = BoundSlice::default();
        for &(key, bl, bu) in bounds.iter().take(last.max(0) as usize).skip(first.max(0) as usize)
        {
            slice.keys.push(key_from_code(key)?);
            slice.lower.push(bl);
            slice.upper.push(bu);
        }
        Ok(slice)
    }

    fn get_bound(
        &self,
        task: &FakeTask,
        acc: Accessor,
        i: i32,
    ) -> NativeResult<(BoundKey, f64, f64)> {
        let bounds = match acc {
            Accessor::Con => &task.data.con_bounds,
            Accessor::Var => &task.data.var_bounds,
        };
        let (key, bl, bu) = bounds[index(i, bounds.len())?];
        Ok((key_from_code(key)?, bl, bu))
    }

    fn get_num_cone_mem(&self, task: &FakeTask, k: i32) -> NativeResult<i32> {
        let k = index(k, task.data.cones.len())?;
        Ok(task.data.cones[k].1.len() as i32)
    }

    fn get_cone(&self, task: &FakeTask, k: i32) -> NativeResult<(i32, Vec<i32>)> {
        let k = index(k, task.data.cones.len())?;
        Ok(task.data.cones[k].clone())
    }

    fn cone_type_to_str(&self, _task: &FakeTask, kind: i32) -> NativeResult<String> {
        match kind {
            0 => Ok("MSK_CT_QUAD".into()),
            1 => Ok("MSK_CT_RQUAD".into()),
            _ => Err(Rescode(RES_ERR_IN_ARGUMENT)),
        }
    }

    fn get_var_type(&self, task: &FakeTask, j: i32) -> NativeResult<VarType> {
        let j = index(j, task.data.integer.len())?;
        Ok(if task.data.integer[j] {
            VarType::Integer
        } else {
            VarType::Continuous
        })
    }

    fn which_param(&self, _task: &FakeTask, name: &str) -> NativeResult<Option<(ParamKind, i32)>> {
        let position = |names: Vec<&str>| names.iter().position(|&n| n == name);
        if let Some(i) = position(IPARAMS.iter().map(|p| p.0).collect()) {
            return Ok(Some((ParamKind::Int, i as i32)));
        }
        if let Some(i) = position(DPARAMS.iter().map(|p| p.0).collect()) {
            return Ok(Some((ParamKind::Float, i as i32)));
        }
        if let Some(i) = position(SPARAMS.iter().map(|p| p.0).collect()) {
            return Ok(Some((ParamKind::Str, i as i32)));
        }
        Ok(None)
    }

    fn sym_name_to_value(&self, name: &str) -> Option<i32> {
        match name {
            "MSK_CT_QUAD" | "MSK_OFF" => Some(0),
            "MSK_CT_RQUAD" | "MSK_ON" => Some(1),
            _ => None,
        }
    }

    fn num_params(&self, _task: &FakeTask, kind: ParamKind) -> NativeResult<i32> {
        Ok(match kind {
            ParamKind::Int => IPARAMS.len(),
            ParamKind::Float => DPARAMS.len(),
            ParamKind::Str => SPARAMS.len(),
        } as i32)
    }

    fn param_name(&self, _task: &FakeTask, kind: ParamKind, idx: i32) -> NativeResult<String> {
        let name = match kind {
            ParamKind::Int => IPARAMS.get(idx as usize).map(|p| p.0),
            ParamKind::Float => DPARAMS.get(idx as usize).map(|p| p.0),
            ParamKind::Str => SPARAMS.get(idx as usize).map(|p| p.0),
        };
        name.map(str::to_string).ok_or(Rescode(RES_ERR_INDEX))
    }

    fn put_int_param(&self, task: &mut FakeTask, idx: i32, value: i32) -> NativeResult<()> {
        let i = index(idx, task.data.iparam.len())?;
        task.data.iparam[i] = value;
        Ok(())
    }

    fn put_dou_param(&self, task: &mut FakeTask, idx: i32, value: f64) -> NativeResult<()> {
        let i = index(idx, task.data.dparam.len())?;
        task.data.dparam[i] = value;
        Ok(())
    }

    fn put_str_param(&self, task: &mut FakeTask, idx: i32, value: &str) -> NativeResult<()> {
        let i = index(idx, task.data.sparam.len())?;
        task.data.sparam[i] = value.to_string();
        Ok(())
    }

    fn get_int_param(&self, task: &FakeTask, idx: i32) -> NativeResult<i32> {
        Ok(task.data.iparam[index(idx, task.data.iparam.len())?])
    }

    fn get_dou_param(&self, task: &FakeTask, idx: i32) -> NativeResult<f64> {
        Ok(task.data.dparam[index(idx, task.data.dparam.len())?])
    }

    fn str_param_len(&self, task: &FakeTask, idx: i32) -> NativeResult<usize> {
        Ok(task.data.sparam[index(idx, task.data.sparam.len())?].len())
    }

    fn get_str_param(&self, task: &FakeTask, idx: i32, capacity: usize) -> NativeResult<String> {
        let value = &task.data.sparam[index(idx, task.data.sparam.len())?];
        // Room for the terminator is part of the capacity
        Ok(value.chars().take(capacity.saturating_sub(1)).collect())
    }

    fn int_param_symbol(&self, _env: &FakeEnv, idx: i32, value: i32) -> NativeResult<String> {
        let switch = (1..=3).contains(&idx);
        Ok(match (switch, value) {
            (true, 0) => "MSK_OFF".into(),
            (true, 1) => "MSK_ON".into(),
            _ => String::new(),
        })
    }

    fn solution_def(&self, task: &FakeTask, sol: SolType) -> NativeResult<bool> {
        Ok(task.data.solutions.contains_key(sol.name()))
    }

    fn get_solution_status(&self, task: &FakeTask, sol: SolType) -> NativeResult<(i32, i32)> {
        let s = task
            .data
            .solutions
            .get(sol.name())
            .ok_or(Rescode(RES_ERR_IN_ARGUMENT))?;
        Ok((s.prosta, s.solsta))
    }

    fn prosta_to_str(&self, _task: &FakeTask, prosta: i32) -> NativeResult<String> {
        Ok(match prosta {
            PROSTA_PRIMAL_AND_DUAL_FEASIBLE => "PRIMAL_AND_DUAL_FEASIBLE",
            PROSTA_PRIMAL_FEASIBLE => "PRIMAL_FEASIBLE",
            _ => "UNKNOWN",
        }
        .into())
    }

    fn solsta_to_str(&self, _task: &FakeTask, solsta: i32) -> NativeResult<String> {
        Ok(match solsta {
            SOLSTA_OPTIMAL => "OPTIMAL",
            SOLSTA_INTEGER_OPTIMAL => "INTEGER_OPTIMAL",
            _ => "UNKNOWN",
        }
        .into())
    }

    fn get_status_keys(
        &self,
        task: &FakeTask,
        acc: Accessor,
        sol: SolType,
        n: i32,
    ) -> NativeResult<Vec<StatusKey>> {
        let s = task
            .data
            .solutions
            .get(sol.name())
            .ok_or(Rescode(RES_ERR_IN_ARGUMENT))?;
        let keys = match acc {
            Accessor::Con => &s.skc,
            Accessor::Var => &s.skx,
        };
        Ok(keys.iter().take(n.max(0) as usize).map(|&k| StatusKey(k)).collect())
    }

    fn sk_to_str(&self, _task: &FakeTask, sk: StatusKey) -> NativeResult<String> {
        STATUS_KEYS
            .get(sk.0 as usize)
            .map(|s| s.to_string())
            .ok_or(Rescode(RES_ERR_IN_ARGUMENT))
    }

    fn str_to_sk(&self, _task: &FakeTask, name: &str) -> NativeResult<StatusKey> {
        STATUS_KEYS
            .iter()
            .position(|&s| s == name)
            .map(|i| StatusKey(i as i32))
            .ok_or(Rescode(RES_ERR_IN_ARGUMENT))
    }

    fn get_solution_slice(
        &self,
        task: &FakeTask,
        sol: SolType,
        item: SolItem,
        n: i32,
    ) -> NativeResult<Vec<f64>> {
        if let Some(code) = self.shared.fail_solution_slice.get() {
            return Err(Rescode(code));
        }
        let s = task
            .data
            .solutions
            .get(sol.name())
            .ok_or(Rescode(RES_ERR_IN_ARGUMENT))?;
        let mut values = s.items.get(item.name()).cloned().unwrap_or_default();
        values.resize(n.max(0) as usize, 0.0);
        Ok(values)
    }

    fn put_solution_i(
        &self,
        task: &mut FakeTask,
        acc: Accessor,
        i: i32,
        sol: SolType,
        point: SolutionPoint,
    ) -> NativeResult<()> {
        let (numcon, numvar) = (task.data.numcon, task.data.numvar);
        let s = task
            .data
            .solutions
            .entry(sol.name().to_string())
            .or_insert_with(|| SolData::sized(numcon, numvar));
        match acc {
            Accessor::Con => {
                let i = index(i, s.skc.len())?;
                s.skc[i] = point.sk.0;
                s.item_mut(SolItem::Xc)[i] = point.x;
                s.item_mut(SolItem::Slc)[i] = point.sl;
                s.item_mut(SolItem::Suc)[i] = point.su;
            }
            Accessor::Var => {
                let j = index(i, s.skx.len())?;
                s.skx[j] = point.sk.0;
                s.item_mut(SolItem::Xx)[j] = point.x;
                s.item_mut(SolItem::Slx)[j] = point.sl;
                s.item_mut(SolItem::Sux)[j] = point.su;
                s.item_mut(SolItem::Snx)[j] = point.sn;
            }
        }
        Ok(())
    }

    fn put_progress_callback(&self, task: &mut FakeTask, callback: ProgressFn) -> NativeResult<()> {
        task.progress = Some(callback);
        Ok(())
    }

    fn optimize(&self, task: &mut FakeTask) -> NativeResult<Rescode> {
        self.shared.event("optimize");
        task.write_log("Optimizer started.\n");

        if let Some(flag) = self.shared.interrupt_during_optimize.borrow().as_ref() {
            flag.request();
        }
        if let Some(progress) = task.progress.as_mut() {
            if progress() {
                task.write_log("Optimizer terminated by the user.\n");
                return Err(Rescode(RES_TRM_USER_CALLBACK));
            }
        }
        if let Some(code) = self.shared.fail_optimize.get() {
            return Err(Rescode(code));
        }

        let d = &mut task.data;
        let xx = pick_point(d);
        let mut xc = vec![0.0; d.numcon as usize];
        for (j, column) in d.columns.iter().enumerate() {
            for &(row, value) in column {
                xc[row as usize] += value * xx[j];
            }
        }

        let kinds: &[SolType] = if d.integer.iter().any(|&b| b) {
            &[SolType::Integer]
        } else {
            &[SolType::Basic, SolType::Interior]
        };
        for &kind in kinds {
            let mut s = SolData::sized(d.numcon, d.numvar);
            s.prosta = if kind == SolType::Integer {
                PROSTA_PRIMAL_FEASIBLE
            } else {
                PROSTA_PRIMAL_AND_DUAL_FEASIBLE
            };
            s.solsta = if kind == SolType::Integer {
                SOLSTA_INTEGER_OPTIMAL
            } else {
                SOLSTA_OPTIMAL
            };
            s.skc = vec![SK_BS; d.numcon as usize];
            s.skx = d.var_bounds.iter().map(|&(key, _, _)| status_of(key)).collect();
            *s.item_mut(SolItem::Xx) = xx.clone();
            *s.item_mut(SolItem::Xc) = xc.clone();
            d.solutions.insert(kind.name().to_string(), s);
        }

        task.write_log("Optimizer terminated.\n");
        Ok(Rescode(self.shared.trm_code.get()))
    }

    fn solution_summary(&self, task: &mut FakeTask) -> NativeResult<()> {
        let summary = format!(
            "Problem status  : {} solutions defined\n",
            task.data.solutions.len()
        );
        task.write_log(&summary);
        Ok(())
    }

    fn write_data(&self, task: &mut FakeTask, path: &str) -> NativeResult<()> {
        let mut data = task.data.clone();
        if data.iparam[IPAR_OPF_WRITE_SOLUTIONS] == 0 {
            data.solutions.clear();
        }
        if data.iparam[IPAR_WRITE_DATA_PARAM] == 0 {
            data.iparam.clear();
            data.dparam.clear();
            data.sparam.clear();
        }
        let text = serde_json::to_string(&data).map_err(|_| Rescode(RES_ERR_IN_ARGUMENT))?;
        fs::write(path, text).map_err(|_| Rescode(RES_ERR_FILE_OPEN))
    }

    fn read_data(&self, task: &mut FakeTask, path: &str) -> NativeResult<()> {
        let text = fs::read_to_string(path).map_err(|_| Rescode(RES_ERR_FILE_OPEN))?;
        let mut data: TaskData =
            serde_json::from_str(&text).map_err(|_| Rescode(RES_ERR_IN_ARGUMENT))?;
        if data.iparam.is_empty() {
            data.iparam = task.data.iparam.clone();
            data.dparam = task.data.dparam.clone();
            data.sparam = task.data.sparam.clone();
        }
        task.data = data;
        Ok(())
    }

    fn version(&self) -> (i32, i32, i32, i32) {
        (6, 0, 0, 106)
    }

    fn code_description(&self, code: Rescode) -> (String, String) {
        let (symbol, description) = match code.0 {
            0 => ("MSK_RES_OK", "No error occurred."),
            RES_ERR_LICENSE => ("MSK_RES_ERR_LICENSE", "Invalid license."),
            RES_ERR_FILE_OPEN => ("MSK_RES_ERR_FILE_OPEN", "An error occurred while opening a file."),
            RES_ERR_IN_ARGUMENT => ("MSK_RES_ERR_IN_ARGUMENT", "A function argument is incorrect."),
            RES_ERR_INDEX => ("MSK_RES_ERR_INDEX", "An index is out of range."),
            RES_TRM_MAX_ITERATIONS => (
                "MSK_RES_TRM_MAX_ITERATIONS",
                "The optimizer terminated at the maximum number of iterations.",
            ),
            RES_TRM_USER_CALLBACK => (
                "MSK_RES_TRM_USER_CALLBACK",
                "The optimizer terminated due to the return of the user-defined call-back function.",
            ),
            other => return (format!("MSK_RES_{}", other), "Unknown response code".into()),
        };
        (symbol.to_string(), description.to_string())
    }
}

// ----------------------------------------------------------------------------
// Host value builders
// ----------------------------------------------------------------------------

pub fn fields(pairs: Vec<(&str, Value)>) -> Value {
    Value::Struct(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

pub fn row(values: &[f64]) -> Value {
    Value::Row(values.to_vec())
}

/// Dense row-major matrix as a host sparse value.
pub fn sparse(rows: usize, cols: usize, dense: &[f64]) -> Value {
    let mut tri = sprs::TriMat::new((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            let v = dense[i * cols + j];
            if v != 0.0 {
                tri.add_triplet(i, j, v);
            }
        }
    }
    Value::Sparse(tri.to_csc())
}

/// `min x1 + 2 x2  s.t.  x1 + x2 >= 1,  x1 - x2 <= 2,  0 <= x <= 10`.
pub fn lp_2x2() -> Vec<(&'static str, Value)> {
    vec![
        ("sense", Value::text("min")),
        ("c", row(&[1.0, 2.0])),
        ("A", sparse(2, 2, &[1.0, 1.0, 1.0, -1.0])),
        ("blc", row(&[1.0, f64::NEG_INFINITY])),
        ("buc", row(&[f64::INFINITY, 2.0])),
        ("blx", row(&[0.0, 0.0])),
        ("bux", row(&[10.0, 10.0])),
    ]
}

/// Quiet options with the given overrides.
pub fn options(pairs: Vec<(&str, Value)>) -> Value {
    let mut all = vec![("verbose", Value::Scalar(0.0))];
    all.extend(pairs);
    fields(all)
}

pub fn response_code(outcome: &msk_bridge::Outcome) -> f64 {
    outcome
        .response
        .as_ref()
        .map(|r| r.code)
        .expect("every outcome carries a response")
}
