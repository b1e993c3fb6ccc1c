//! Conic constraints in both directions.

use crate::error::{BridgeError, BridgeResult};
use crate::handles::Task;
use crate::host::{Fields, Seek, Value};
use crate::library::Library;
use crate::params::{normalize, remove_prefix};

/// Prefix of cone type symbols.
pub const CONE_PREFIX: &str = "MSK_CT_";

/// A conic constraint over an ordered subset of variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cone {
    /// Type symbol as the host writes it, e.g. `QUAD` or `RQUAD`.
    pub kind: String,
    /// 1-based member variables.
    pub sub: Vec<i32>,
}

impl Cone {
    /// Parse the host cone list, checking members against `numvar`.
    pub fn list_from_value(cells: &[Value], numvar: usize) -> BridgeResult<Vec<Cone>> {
        cells
            .iter()
            .enumerate()
            .map(|(k, cell)| Cone::from_value(cell, k, numvar))
            .collect()
    }

    fn from_value(cell: &Value, k: usize, numvar: usize) -> BridgeResult<Cone> {
        let fields = cell.as_struct().ok_or_else(|| {
            BridgeError::input(format!("The cone at index {} should be a 'struct'", k + 1))
        })?;
        let seek = Seek::new(fields);
        seek.only(&["type", "sub"])?;

        let kind: String = seek.required("type")?;
        let sub: Vec<i32> = seek.required("sub")?;
        if let Some(bad) = sub.iter().find(|&&j| j < 1 || j as usize > numvar) {
            return Err(BridgeError::input(format!(
                "The cone at index {} has member {} outside the variable range 1..{}",
                k + 1,
                bad,
                numvar
            )));
        }
        Ok(Cone { kind, sub })
    }

    pub fn to_value(&self) -> Value {
        let mut fields = Fields::new();
        fields.insert("type".to_string(), Value::text(&self.kind));
        fields.insert("sub".to_string(), Value::Int(self.sub.clone()));
        Value::Struct(fields)
    }
}

/// Append every cone to the task. `k` in error messages is 1-based.
pub fn write_cones<L: Library>(task: &mut Task<'_, L>, cones: &[Cone]) -> BridgeResult<()> {
    for (k, cone) in cones.iter().enumerate() {
        let symbol = normalize(&cone.kind, CONE_PREFIX);
        let kind = task.library().sym_name_to_value(&symbol).ok_or_else(|| {
            BridgeError::value(format!(
                "The type of cone at index {} was not recognized",
                k + 1
            ))
        })?;
        let sub: Vec<i32> = cone.sub.iter().map(|&j| j - 1).collect();
        task.call(|lib, t| lib.append_cone(t, kind, 0.0, &sub))?;
    }
    Ok(())
}

/// Read every cone back from the task.
pub fn read_cones<L: Library>(task: &Task<'_, L>) -> BridgeResult<Vec<Cone>> {
    let count = task.query(|lib, t| lib.get_num_cone(t))?;
    let mut cones = Vec::with_capacity(count.max(0) as usize);

    for k in 0..count {
        let (kind, members) = task.query(|lib, t| lib.get_cone(t, k))?;
        let symbol = task.query(|lib, t| lib.cone_type_to_str(t, kind))?;
        cones.push(Cone {
            kind: remove_prefix(&symbol, CONE_PREFIX),
            sub: members.iter().map(|&j| j + 1).collect(),
        });
    }
    Ok(cones)
}
