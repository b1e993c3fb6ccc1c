//! The native call surface.
//!
//! [`Library`] lists every native operation the bridge performs, with the
//! library's enumerations lifted into closed Rust enums. Handles are opaque
//! associated types; only [`handles`](crate::handles) creates and destroys
//! them. Calls return the raw [`Rescode`] on failure and the handle layer
//! turns it into a [`BridgeError`](crate::BridgeError).

use crate::bounds::BoundKey;
use crate::error::Rescode;
use crate::params::ParamKind;
use std::rc::Rc;

/// Result of a single native call.
pub type NativeResult<T> = Result<T, Rescode>;

/// Receiver for text written to a native log stream.
pub type StreamSink = Rc<dyn Fn(&str)>;

/// Progress callback; returns `true` to ask the optimizer to stop.
pub type ProgressFn = Box<dyn FnMut() -> bool>;

/// Selects rows (constraints) or columns (variables).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Var,
    Con,
}

/// Objective sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjSense {
    #[default]
    Undefined,
    Minimize,
    Maximize,
}

impl ObjSense {
    /// Parse the host spelling (`min`, `minimize`, `max`, `maximize`).
    ///
    /// `UNDEFINED` is what [`ObjSense::as_host`] gives for a task read with
    /// no sense set, and is accepted so such a problem can be loaded again.
    pub fn from_host(sense: &str) -> Option<Self> {
        match sense {
            "min" | "minimize" => Some(ObjSense::Minimize),
            "max" | "maximize" => Some(ObjSense::Maximize),
            "UNDEFINED" => Some(ObjSense::Undefined),
            _ => None,
        }
    }

    pub fn as_host(&self) -> &'static str {
        match self {
            ObjSense::Minimize => "minimize",
            ObjSense::Maximize => "maximize",
            ObjSense::Undefined => "UNDEFINED",
        }
    }
}

/// Variable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Continuous,
    Integer,
}

/// Solution kinds a task may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SolType {
    Interior,
    Basic,
    Integer,
}

impl SolType {
    /// Enumeration order used by the extractor.
    pub const ALL: [SolType; 3] = [SolType::Interior, SolType::Basic, SolType::Integer];

    /// Host-facing key of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            SolType::Basic => "bas",
            SolType::Interior => "itr",
            SolType::Integer => "int",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bas" => Some(SolType::Basic),
            "itr" => Some(SolType::Interior),
            "int" => Some(SolType::Integer),
            _ => None,
        }
    }
}

/// Value slices stored in a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SolItem {
    Xc,
    Xx,
    Y,
    Slc,
    Suc,
    Slx,
    Sux,
    Snx,
}

impl SolItem {
    pub const ALL: [SolItem; 8] = [
        SolItem::Xc,
        SolItem::Xx,
        SolItem::Y,
        SolItem::Slc,
        SolItem::Suc,
        SolItem::Slx,
        SolItem::Sux,
        SolItem::Snx,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SolItem::Xc => "xc",
            SolItem::Xx => "xx",
            SolItem::Y => "y",
            SolItem::Slc => "slc",
            SolItem::Suc => "suc",
            SolItem::Slx => "slx",
            SolItem::Sux => "sux",
            SolItem::Snx => "snx",
        }
    }

    /// Whether the slice is indexed by constraints or by variables.
    pub fn accessor(&self) -> Accessor {
        match self {
            SolItem::Xc | SolItem::Y | SolItem::Slc | SolItem::Suc => Accessor::Con,
            SolItem::Xx | SolItem::Slx | SolItem::Sux | SolItem::Snx => Accessor::Var,
        }
    }

    /// Item applicability table.
    ///
    /// This alone decides which slices are read for a kind, whatever values
    /// the solver happens to hold.
    pub fn is_defined(&self, sol: SolType) -> bool {
        match self {
            SolItem::Xc | SolItem::Xx => true,
            SolItem::Slc | SolItem::Suc | SolItem::Slx | SolItem::Sux => match sol {
                SolType::Basic | SolType::Interior => true,
                SolType::Integer => false,
            },
            SolItem::Snx => match sol {
                SolType::Interior => true,
                SolType::Basic | SolType::Integer => false,
            },
            SolItem::Y => false,
        }
    }
}

/// Status key as the library encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusKey(pub i32);

impl StatusKey {
    pub const UNKNOWN: StatusKey = StatusKey(0);
}

/// One row or column of a solution, written with `put_solution_i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionPoint {
    pub sk: StatusKey,
    pub x: f64,
    pub sl: f64,
    pub su: f64,
    pub sn: f64,
}

/// Column-compressed slice of the constraint matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSlice {
    /// Column pointers, length `numvar + 1`.
    pub ptr: Vec<i32>,
    /// Row index of every nonzero.
    pub sub: Vec<i32>,
    pub val: Vec<f64>,
}

/// Bound keys and values for a range of rows or columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundSlice {
    pub keys: Vec<BoundKey>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Every native operation the bridge relies on.
///
/// Implemented by `native::Mosek` behind the `native` feature, and by the
/// in-memory double in the integration tests.
pub trait Library {
    /// Native environment handle.
    type Env;
    /// Native task handle.
    type Task;

    // ---- environment ----
    fn make_env(&self) -> NativeResult<Self::Env>;
    fn link_env_stream(&self, env: &mut Self::Env, sink: StreamSink) -> NativeResult<()>;
    fn init_env(&self, env: &mut Self::Env) -> NativeResult<()>;
    fn unlink_env_stream(&self, env: &mut Self::Env) -> NativeResult<()>;
    fn delete_env(&self, env: Self::Env) -> NativeResult<()>;

    // ---- task lifecycle ----
    fn make_task(&self, env: &Self::Env, maxcon: i32, maxvar: i32) -> NativeResult<Self::Task>;
    fn link_task_stream(&self, task: &mut Self::Task, sink: StreamSink) -> NativeResult<()>;
    fn unlink_task_stream(&self, task: &mut Self::Task) -> NativeResult<()>;
    fn delete_task(&self, task: Self::Task) -> NativeResult<()>;

    // ---- problem input ----
    fn put_max_num_var(&self, task: &mut Self::Task, n: i32) -> NativeResult<()>;
    fn put_max_num_con(&self, task: &mut Self::Task, n: i32) -> NativeResult<()>;
    fn put_max_num_anz(&self, task: &mut Self::Task, n: i32) -> NativeResult<()>;
    fn append(&self, task: &mut Self::Task, acc: Accessor, num: i32) -> NativeResult<()>;
    fn put_cfix(&self, task: &mut Self::Task, cfix: f64) -> NativeResult<()>;
    fn put_cj(&self, task: &mut Self::Task, j: i32, cj: f64) -> NativeResult<()>;
    fn put_bound(
        &self,
        task: &mut Self::Task,
        acc: Accessor,
        i: i32,
        key: BoundKey,
        lower: f64,
        upper: f64,
    ) -> NativeResult<()>;
    fn put_avec(
        &self,
        task: &mut Self::Task,
        acc: Accessor,
        i: i32,
        sub: &[i32],
        val: &[f64],
    ) -> NativeResult<()>;
    fn append_cone(
        &self,
        task: &mut Self::Task,
        kind: i32,
        par: f64,
        sub: &[i32],
    ) -> NativeResult<()>;
    fn put_var_type(&self, task: &mut Self::Task, j: i32, vt: VarType) -> NativeResult<()>;
    fn put_obj_sense(&self, task: &mut Self::Task, sense: ObjSense) -> NativeResult<()>;

    // ---- problem output ----
    fn get_obj_sense(&self, task: &Self::Task) -> NativeResult<ObjSense>;
    fn get_num_anz(&self, task: &Self::Task) -> NativeResult<i32>;
    fn get_num_con(&self, task: &Self::Task) -> NativeResult<i32>;
    fn get_num_var(&self, task: &Self::Task) -> NativeResult<i32>;
    fn get_num_int_var(&self, task: &Self::Task) -> NativeResult<i32>;
    fn get_num_cone(&self, task: &Self::Task) -> NativeResult<i32>;
    fn get_cfix(&self, task: &Self::Task) -> NativeResult<f64>;
    fn get_c(&self, task: &Self::Task, numvar: i32) -> NativeResult<Vec<f64>>;
    fn get_a_columns(&self, task: &Self::Task, numvar: i32, maxnz: i32)
        -> NativeResult<ColumnSlice>;
    fn get_bound_slice(
        &self,
        task: &Self::Task,
        acc: Accessor,
        first: i32,
        last: i32,
    ) -> NativeResult<BoundSlice>;
    fn get_bound(
        &self,
        task: &Self::Task,
        acc: Accessor,
        i: i32,
    ) -> NativeResult<(BoundKey, f64, f64)>;
    fn get_num_cone_mem(&self, task: &Self::Task, k: i32) -> NativeResult<i32>;
    /// Cone type and 0-based member list.
    fn get_cone(&self, task: &Self::Task, k: i32) -> NativeResult<(i32, Vec<i32>)>;
    fn cone_type_to_str(&self, task: &Self::Task, kind: i32) -> NativeResult<String>;
    fn get_var_type(&self, task: &Self::Task, j: i32) -> NativeResult<VarType>;

    // ---- parameters ----
    /// Look up a fully prefixed parameter name; `None` if it is unknown.
    fn which_param(&self, task: &Self::Task, name: &str) -> NativeResult<Option<(ParamKind, i32)>>;
    /// Resolve a symbolic constant (e.g. `MSK_CT_QUAD`) to its value.
    fn sym_name_to_value(&self, name: &str) -> Option<i32>;
    fn num_params(&self, task: &Self::Task, kind: ParamKind) -> NativeResult<i32>;
    fn param_name(&self, task: &Self::Task, kind: ParamKind, idx: i32) -> NativeResult<String>;
    fn put_int_param(&self, task: &mut Self::Task, idx: i32, value: i32) -> NativeResult<()>;
    fn put_dou_param(&self, task: &mut Self::Task, idx: i32, value: f64) -> NativeResult<()>;
    fn put_str_param(&self, task: &mut Self::Task, idx: i32, value: &str) -> NativeResult<()>;
    fn get_int_param(&self, task: &Self::Task, idx: i32) -> NativeResult<i32>;
    fn get_dou_param(&self, task: &Self::Task, idx: i32) -> NativeResult<f64>;
    /// Length of a string parameter, terminator not counted.
    fn str_param_len(&self, task: &Self::Task, idx: i32) -> NativeResult<usize>;
    /// Read a string parameter into a buffer of `capacity` bytes.
    fn get_str_param(&self, task: &Self::Task, idx: i32, capacity: usize) -> NativeResult<String>;
    /// Symbolic name of an integer parameter value; empty if it has none.
    fn int_param_symbol(&self, env: &Self::Env, idx: i32, value: i32) -> NativeResult<String>;

    // ---- solutions ----
    fn solution_def(&self, task: &Self::Task, sol: SolType) -> NativeResult<bool>;
    /// Problem status and solution status codes.
    fn get_solution_status(&self, task: &Self::Task, sol: SolType) -> NativeResult<(i32, i32)>;
    fn prosta_to_str(&self, task: &Self::Task, prosta: i32) -> NativeResult<String>;
    fn solsta_to_str(&self, task: &Self::Task, solsta: i32) -> NativeResult<String>;
    fn get_status_keys(
        &self,
        task: &Self::Task,
        acc: Accessor,
        sol: SolType,
        n: i32,
    ) -> NativeResult<Vec<StatusKey>>;
    fn sk_to_str(&self, task: &Self::Task, sk: StatusKey) -> NativeResult<String>;
    fn str_to_sk(&self, task: &Self::Task, name: &str) -> NativeResult<StatusKey>;
    fn get_solution_slice(
        &self,
        task: &Self::Task,
        sol: SolType,
        item: SolItem,
        n: i32,
    ) -> NativeResult<Vec<f64>>;
    fn put_solution_i(
        &self,
        task: &mut Self::Task,
        acc: Accessor,
        i: i32,
        sol: SolType,
        point: SolutionPoint,
    ) -> NativeResult<()>;

    // ---- optimization and files ----
    fn put_progress_callback(&self, task: &mut Self::Task, callback: ProgressFn)
        -> NativeResult<()>;
    /// Run the optimizer; returns the termination code.
    fn optimize(&self, task: &mut Self::Task) -> NativeResult<Rescode>;
    /// Write the solution summary to the task's log stream.
    fn solution_summary(&self, task: &mut Self::Task) -> NativeResult<()>;
    fn write_data(&self, task: &mut Self::Task, path: &str) -> NativeResult<()>;
    fn read_data(&self, task: &mut Self::Task, path: &str) -> NativeResult<()>;

    // ---- misc ----
    /// (major, minor, build, revision)
    fn version(&self) -> (i32, i32, i32, i32);
    /// Symbolic name and description of a response code.
    fn code_description(&self, code: Rescode) -> (String, String);
}
