//! The optimization problem as exchanged with the host.

use sprs::CsMat;

use crate::cones::Cone;
use crate::error::{BridgeError, BridgeResult};
use crate::host::{check_len, Fields, Seek, Value};
use crate::library::ObjSense;
use crate::messages::Messages;
use crate::options::Options;

/// Host field names of a problem.
pub const PROBLEM_KEYS: [&str; 14] = [
    "sense", "c", "c0", "A", "blc", "buc", "blx", "bux", "cones", "intsub", "sol", "iparam",
    "dparam", "sparam",
];

/// A linear/conic problem with optional integer variables, initial solution
/// and parameter settings.
///
/// Constructed only by [`Problem::from_fields`] or by reading a task, so
/// every instance has consistent dimensions.
#[derive(Debug, Clone)]
pub struct Problem {
    pub sense: ObjSense,
    pub c: Vec<f64>,
    pub c0: f64,
    /// Constraint matrix, `numcon x numvar`, compressed by column.
    pub a: CsMat<f64>,
    pub blc: Vec<f64>,
    pub buc: Vec<f64>,
    pub blx: Vec<f64>,
    pub bux: Vec<f64>,
    pub cones: Vec<Cone>,
    /// 1-based indices of integer variables.
    pub intsub: Vec<i32>,
    /// Solutions keyed by kind name (`bas`, `itr`, `int`).
    pub sol: Fields,
    pub iparam: Fields,
    pub dparam: Fields,
    pub sparam: Fields,
}

impl Problem {
    pub fn numcon(&self) -> usize {
        self.a.rows()
    }

    pub fn numvar(&self) -> usize {
        self.a.cols()
    }

    pub fn numanz(&self) -> usize {
        self.a.nnz()
    }

    /// Parse and validate a host problem struct.
    pub fn from_fields(fields: &Fields, msgs: &Messages) -> BridgeResult<Self> {
        msgs.debug("Started reading problem input");
        let seek = Seek::new(fields);

        let a: CsMat<f64> = seek.required("A")?;
        let (numcon, numvar) = (a.rows(), a.cols());

        let sense_name: String = seek.required("sense")?;
        let sense = ObjSense::from_host(&sense_name).ok_or_else(|| {
            BridgeError::value(
                "Variable 'sense' must be either 'min', 'minimize', 'max' or 'maximize'",
            )
        })?;

        let c: Vec<f64> = seek.required("c")?;
        check_len(c.len(), "c", numvar)?;
        let c0 = seek.optional::<f64>("c0")?.unwrap_or(0.0);

        let vector = |name: &str, len: usize| -> BridgeResult<Vec<f64>> {
            let v: Vec<f64> = seek.required(name)?;
            check_len(v.len(), name, len)?;
            Ok(v)
        };
        let blc = vector("blc", numcon)?;
        let buc = vector("buc", numcon)?;
        let blx = vector("blx", numvar)?;
        let bux = vector("bux", numvar)?;

        let cones = match seek.optional::<Vec<Value>>("cones")? {
            Some(cells) => Cone::list_from_value(&cells, numvar)?,
            None => Vec::new(),
        };

        let intsub = seek.optional::<Vec<i32>>("intsub")?.unwrap_or_default();
        if intsub.iter().any(|&j| j < 1 || j as usize > numvar) {
            return Err(BridgeError::input(format!(
                "Vector \"intsub\" has an index outside the variable range 1..{}",
                numvar
            )));
        }

        let sol = seek.optional::<Fields>("sol")?.unwrap_or_default();
        let iparam = seek.optional::<Fields>("iparam")?.unwrap_or_default();
        let dparam = seek.optional::<Fields>("dparam")?.unwrap_or_default();
        let sparam = seek.optional::<Fields>("sparam")?.unwrap_or_default();

        seek.only(&PROBLEM_KEYS)?;

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

    /// Host struct for this problem.
    ///
    /// Cones and integer indices appear only when present; parameter tables
    /// and the solution only when `opts` enables them and they are non-empty.
    pub fn to_value(&self, opts: &Options) -> Value {
        let mut out = Fields::new();
        out.insert("sense".into(), Value::text(self.sense.as_host()));
        out.insert("c".into(), Value::Row(self.c.clone()));
        out.insert("c0".into(), Value::Scalar(self.c0));
        out.insert("A".into(), Value::Sparse(self.a.clone()));
        out.insert("blc".into(), Value::Row(self.blc.clone()));
        out.insert("buc".into(), Value::Row(self.buc.clone()));
        out.insert("blx".into(), Value::Row(self.blx.clone()));
        out.insert("bux".into(), Value::Row(self.bux.clone()));

        if !self.cones.is_empty() {
            out.insert(
                "cones".into(),
                Value::Cell(self.cones.iter().map(Cone::to_value).collect()),
            );
        }
        if !self.intsub.is_empty() {
            out.insert("intsub".into(), Value::Int(self.intsub.clone()));
        }

        if opts.useparam {
            for (name, table) in [
                ("iparam", &self.iparam),
                ("dparam", &self.dparam),
                ("sparam", &self.sparam),
            ] {
                if !table.is_empty() {
                    out.insert(name.into(), Value::Struct(table.clone()));
                }
            }
        }
        if opts.usesol && !self.sol.is_empty() {
            out.insert("sol".into(), Value::Struct(self.sol.clone()));
        }
        Value::Struct(out)
    }
}
