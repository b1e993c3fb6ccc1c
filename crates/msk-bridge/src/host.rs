//! Host-side dynamic values and typed accessors.
//!
//! [`Value`] models what a scripting host hands over: scalars, strings, row
//! vectors, cell arrays, structs and sparse matrices. [`Seek`] pulls typed
//! fields out of a struct with field-qualified error messages.
//!
//! Values serialize to JSON as follows:
//!
//! | Value | JSON |
//! |-------|------|
//! | `Empty` | `null` |
//! | `Bool`, `Scalar`, `Text` | bool, number, string |
//! | `Row`, `Int` | array of numbers (`"inf"`, `"-inf"`, `"nan"` for non-finite) |
//! | `Cell` | array |
//! | `Struct` | object |
//! | `Sparse` | `{"sparse": {"size": [m, n], "i": [..], "j": [..], "v": [..]}}`, 1-based |

use crate::error::{BridgeError, BridgeResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Number};
use sprs::{CsMat, TriMat};
use std::collections::BTreeMap;

/// Named fields of a host struct.
pub type Fields = BTreeMap<String, Value>;

/// A dynamically typed host value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Scalar(f64),
    Text(String),
    Row(Vec<f64>),
    Int(Vec<i32>),
    Cell(Vec<Value>),
    Struct(Fields),
    Sparse(CsMat<f64>),
}

impl Value {
    /// Host notion of emptiness: no elements, a NaN scalar, a struct without
    /// fields, or a sparse matrix without nonzeros.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Bool(_) => false,
            Value::Scalar(x) => x.is_nan(),
            Value::Text(s) => s.is_empty(),
            Value::Row(v) => v.is_empty(),
            Value::Int(v) => v.is_empty(),
            Value::Cell(v) => v.is_empty(),
            Value::Struct(f) => f.is_empty(),
            Value::Sparse(a) => a.nnz() == 0,
        }
    }

    /// Number of elements; a struct counts as one.
    pub fn numel(&self) -> usize {
        match self {
            Value::Empty => 0,
            Value::Bool(_) | Value::Scalar(_) | Value::Struct(_) => 1,
            Value::Text(s) => s.chars().count(),
            Value::Row(v) => v.len(),
            Value::Int(v) => v.len(),
            Value::Cell(v) => v.len(),
            Value::Sparse(a) => a.rows() * a.cols(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            Value::Struct(f) => Some(f),
            _ => None,
        }
    }

    /// Single numeric element, if this value holds exactly one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Row(v) if v.len() == 1 => Some(v[0]),
            Value::Int(v) if v.len() == 1 => Some(v[0] as f64),
            _ => None,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Convert from the JSON encoding described in the module docs.
    pub fn from_json(json: &serde_json::Value) -> BridgeResult<Self> {
        use serde_json::Value as J;
        Ok(match json {
            J::Null => Value::Empty,
            J::Bool(b) => Value::Bool(*b),
            J::Number(n) => Value::Scalar(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => Value::Text(s.clone()),
            J::Array(items) => {
                let numbers: Option<Vec<f64>> = items.iter().map(json_number).collect();
                match numbers {
                    Some(row) => Value::Row(row),
                    None => Value::Cell(
                        items
                            .iter()
                            .map(Value::from_json)
                            .collect::<BridgeResult<_>>()?,
                    ),
                }
            }
            J::Object(map) => {
                if map.len() == 1 {
                    if let Some(spec) = map.get("sparse") {
                        return sparse_from_json(spec).map(Value::Sparse);
                    }
                }
                Value::Struct(
                    map.iter()
                        .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
                        .collect::<BridgeResult<_>>()?,
                )
            }
        })
    }

    /// Convert to the JSON encoding described in the module docs.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Empty => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Scalar(x) => number_to_json(*x),
            Value::Text(s) => J::String(s.clone()),
            Value::Row(v) => J::Array(v.iter().map(|x| number_to_json(*x)).collect()),
            Value::Int(v) => J::Array(v.iter().map(|&i| J::from(i)).collect()),
            Value::Cell(v) => J::Array(v.iter().map(Value::to_json).collect()),
            Value::Struct(f) => J::Object(
                f.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Value::Sparse(a) => {
                let mut i = Vec::with_capacity(a.nnz());
                let mut j = Vec::with_capacity(a.nnz());
                let mut v = Vec::with_capacity(a.nnz());
                for (&x, (row, col)) in a.iter() {
                    i.push(row + 1);
                    j.push(col + 1);
                    v.push(number_to_json(x));
                }
                json!({ "sparse": { "size": [a.rows(), a.cols()], "i": i, "j": j, "v": v } })
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(&json).map_err(D::Error::custom)
    }
}

fn json_number(json: &serde_json::Value) -> Option<f64> {
    match json {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" => Some(f64::INFINITY),
            "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
            "nan" => Some(f64::NAN),
            _ => None,
        },
        _ => None,
    }
}

fn number_to_json(x: f64) -> serde_json::Value {
    match Number::from_f64(x) {
        Some(n) => serde_json::Value::Number(n),
        None if x.is_nan() => serde_json::Value::String("nan".into()),
        None if x > 0.0 => serde_json::Value::String("inf".into()),
        None => serde_json::Value::String("-inf".into()),
    }
}

fn sparse_from_json(spec: &serde_json::Value) -> BridgeResult<CsMat<f64>> {
    let bad = || BridgeError::input("A sparse matrix needs 'size', 'i', 'j' and 'v' entries");
    let spec = spec.as_object().ok_or_else(bad)?;
    let dims = |key: &str| -> BridgeResult<Vec<f64>> {
        spec.get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(bad)?
            .iter()
            .map(|x| json_number(x).ok_or_else(bad))
            .collect()
    };

    let size = dims("size")?;
    let (rows, cols) = match size.as_slice() {
        [m, n] => match (whole(*m, 0.0, i32::MAX as f64), whole(*n, 0.0, i32::MAX as f64)) {
            (Some(m), Some(n)) => (m, n),
            _ => return Err(bad()),
        },
        _ => return Err(bad()),
    };
    let (i, j, v) = (dims("i")?, dims("j")?, dims("v")?);
    if i.len() != j.len() || i.len() != v.len() {
        return Err(bad());
    }

    let mut tri = TriMat::new((rows, cols));
    for k in 0..v.len() {
        let (r, c) = (i[k], j[k]);
        match (whole(r, 1.0, rows as f64), whole(c, 1.0, cols as f64)) {
            (Some(r), Some(c)) => tri.add_triplet(r - 1, c - 1, v[k]),
            _ => {
                return Err(BridgeError::input(format!(
                    "Sparse matrix entry ({}, {}) is outside a {}x{} matrix",
                    r, c, rows, cols
                )))
            }
        }
    }
    Ok(tri.to_csc())
}

/// `x` as an index when it is a whole number in `lo..=hi`; NaN never is.
fn whole(x: f64, lo: f64, hi: f64) -> Option<usize> {
    if x >= lo && x <= hi && x.fract() == 0.0 {
        Some(x as usize)
    } else {
        None
    }
}

// ----------------------------------------------------------------------------
// Typed access
// ----------------------------------------------------------------------------

/// Types that can be pulled out of a host value.
pub trait FromHost: Sized {
    /// Type name used in error messages.
    const KIND: &'static str;

    fn from_host(value: &Value) -> Option<Self>;
}

impl FromHost for f64 {
    const KIND: &'static str = "Scalar";

    fn from_host(value: &Value) -> Option<Self> {
        value.as_scalar()
    }
}

impl FromHost for bool {
    const KIND: &'static str = "Boolean";

    fn from_host(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            other => other.as_scalar().map(|x| x != 0.0),
        }
    }
}

impl FromHost for String {
    const KIND: &'static str = "String";

    fn from_host(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromHost for Vec<f64> {
    const KIND: &'static str = "Vector";

    fn from_host(value: &Value) -> Option<Self> {
        match value {
            Value::Row(v) => Some(v.clone()),
            Value::Int(v) => Some(v.iter().map(|&i| i as f64).collect()),
            Value::Scalar(x) => Some(vec![*x]),
            _ => None,
        }
    }
}

impl FromHost for Vec<i32> {
    const KIND: &'static str = "Vector with integer-typed entries";

    fn from_host(value: &Value) -> Option<Self> {
        let to_int = |x: f64| {
            if x.fract() == 0.0 && x >= i32::MIN as f64 && x <= i32::MAX as f64 {
                Some(x as i32)
            } else {
                None
            }
        };
        match value {
            Value::Int(v) => Some(v.clone()),
            Value::Row(v) => v.iter().map(|&x| to_int(x)).collect(),
            Value::Scalar(x) => to_int(*x).map(|i| vec![i]),
            _ => None,
        }
    }
}

impl FromHost for Vec<Value> {
    const KIND: &'static str = "Cell";

    fn from_host(value: &Value) -> Option<Self> {
        match value {
            Value::Cell(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromHost for Fields {
    const KIND: &'static str = "'struct'";

    fn from_host(value: &Value) -> Option<Self> {
        value.as_struct().cloned()
    }
}

impl FromHost for CsMat<f64> {
    const KIND: &'static str = "Sparse Matrix";

    fn from_host(value: &Value) -> Option<Self> {
        match value {
            Value::Sparse(a) if a.is_csc() => Some(a.clone()),
            Value::Sparse(a) => Some(a.to_csc()),
            _ => None,
        }
    }
}

/// Field lookup over a host struct.
#[derive(Debug, Clone, Copy)]
pub struct Seek<'a> {
    fields: &'a Fields,
}

impl<'a> Seek<'a> {
    pub fn new(fields: &'a Fields) -> Self {
        Self { fields }
    }

    /// Raw field value; `None` if absent or empty and `optional` is set.
    pub fn value(&self, name: &str, optional: bool) -> BridgeResult<Option<&'a Value>> {
        match self.fields.get(name) {
            None if optional => Ok(None),
            None => Err(BridgeError::input(format!(
                "An expected variable named '{}' was not found",
                name
            ))),
            Some(v) if v.is_empty() && optional => Ok(None),
            Some(v) if v.is_empty() => Err(BridgeError::input(format!(
                "Variable \"{}\" needs a non-empty definition",
                name
            ))),
            Some(v) => Ok(Some(v)),
        }
    }

    /// Typed field that may be absent or empty.
    pub fn optional<T: FromHost>(&self, name: &str) -> BridgeResult<Option<T>> {
        self.value(name, true)?
            .map(|v| convert(v, name))
            .transpose()
    }

    /// Typed field that must be present and non-empty.
    pub fn required<T: FromHost>(&self, name: &str) -> BridgeResult<T> {
        match self.value(name, false)? {
            Some(v) => convert(v, name),
            None => Err(BridgeError::input(format!(
                "An expected variable named '{}' was not found",
                name
            ))),
        }
    }

    /// Reject keys outside `allowed`.
    pub fn only(&self, allowed: &[&str]) -> BridgeResult<()> {
        for key in self.fields.keys() {
            if !allowed.contains(&key.as_str()) {
                return Err(BridgeError::input(format!(
                    "Variable \"{}\" in structure not recognized",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn convert<T: FromHost>(value: &Value, name: &str) -> BridgeResult<T> {
    T::from_host(value).ok_or_else(|| {
        BridgeError::input(format!("Variable \"{}\" should be a {}", name, T::KIND))
    })
}

/// Check the length of a vector field.
pub fn check_len(len: usize, name: &str, expected: usize) -> BridgeResult<()> {
    if len != expected {
        return Err(BridgeError::input(format!(
            "Vector \"{}\" has the wrong dimensions",
            name
        )));
    }
    Ok(())
}

/// Check the length of a cell field.
pub fn check_cell_len(len: usize, name: &str, expected: usize) -> BridgeResult<()> {
    if len != expected {
        return Err(BridgeError::input(format!(
            "Cell \"{}\" has the wrong dimensions",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_nan_scalar_is_empty() {
        assert!(Value::Scalar(f64::NAN).is_empty());
        assert!(!Value::Scalar(0.0).is_empty());
        assert!(Value::Text(String::new()).is_empty());
        assert!(Value::Struct(Fields::new()).is_empty());
    }

    #[test]
    fn test_seek_missing_and_empty() {
        let f = fields(&[("c0", Value::Empty)]);
        let seek = Seek::new(&f);

        let err = seek.required::<f64>("c").unwrap_err();
        assert_eq!(err.to_string(), "An expected variable named 'c' was not found");

        let err = seek.required::<f64>("c0").unwrap_err();
        assert_eq!(err.to_string(), "Variable \"c0\" needs a non-empty definition");

        assert_eq!(seek.optional::<f64>("c0").unwrap(), None);
    }

    #[test]
    fn test_seek_wrong_type_names_field() {
        let f = fields(&[("A", Value::Row(vec![1.0]))]);
        let err = Seek::new(&f).required::<CsMat<f64>>("A").unwrap_err();
        assert_eq!(err.to_string(), "Variable \"A\" should be a Sparse Matrix");
    }

    #[test]
    fn test_int_vector_from_row() {
        let f = fields(&[("intsub", Value::Row(vec![1.0, 3.0])), ("bad", Value::Row(vec![1.5]))]);
        let seek = Seek::new(&f);
        assert_eq!(seek.required::<Vec<i32>>("intsub").unwrap(), vec![1, 3]);
        assert!(seek.required::<Vec<i32>>("bad").is_err());
    }

    #[test]
    fn test_only_rejects_unknown_keys() {
        let f = fields(&[("sense", Value::text("min")), ("bogus", Value::Scalar(1.0))]);
        let err = Seek::new(&f).only(&["sense"]).unwrap_err();
        assert_eq!(err.to_string(), "Variable \"bogus\" in structure not recognized");
    }

    #[test]
    fn test_json_rows_and_cells() {
        let json = serde_json::json!({
            "blx": [0, "-inf"],
            "skc": ["BS", "UPR"],
            "c0": 2.5,
        });
        let value = Value::from_json(&json).unwrap();
        let f = value.as_struct().unwrap();
        match &f["blx"] {
            Value::Row(v) => assert_eq!(v, &vec![0.0, f64::NEG_INFINITY]),
            other => panic!("expected row, got {:?}", other),
        }
        assert!(matches!(&f["skc"], Value::Cell(v) if v.len() == 2));
        assert_eq!(f["c0"].as_scalar(), Some(2.5));
    }

    #[test]
    fn test_json_sparse() {
        let json = serde_json::json!({
            "sparse": { "size": [2, 3], "i": [1, 2, 2], "j": [1, 1, 3], "v": [1.0, 2.0, 4.0] }
        });
        let value = Value::from_json(&json).unwrap();
        let a = match &value {
            Value::Sparse(a) => a,
            other => panic!("expected sparse, got {:?}", other),
        };
        assert_eq!((a.rows(), a.cols()), (2, 3));
        assert_eq!(a.get(1, 2), Some(&4.0));

        // Written back in 1-based triplet form
        let back = value.to_json();
        assert_eq!(back["sparse"]["size"], serde_json::json!([2, 3]));
        assert_eq!(back["sparse"]["v"].as_array().map(|v| v.len()), Some(3));
    }

    #[test]
    fn test_json_sparse_out_of_range() {
        let json = serde_json::json!({
            "sparse": { "size": [1, 1], "i": [2], "j": [1], "v": [1.0] }
        });
        assert!(Value::from_json(&json).is_err());
    }

    #[test]
    fn test_json_sparse_rejects_non_integral_indices() {
        for bad in ["nan", "inf", "-inf"] {
            let json = serde_json::json!({
                "sparse": { "size": [2, 2], "i": [bad], "j": [1], "v": [1.0] }
            });
            let err = Value::from_json(&json).unwrap_err();
            assert!(matches!(err, BridgeError::Input(_)), "{}: {}", bad, err);
        }

        let json = serde_json::json!({
            "sparse": { "size": [2, 2], "i": [1.5], "j": [1], "v": [1.0] }
        });
        assert!(Value::from_json(&json).is_err());

        let json = serde_json::json!({
            "sparse": { "size": ["inf", 2], "i": [1], "j": [1], "v": [1.0] }
        });
        assert!(Value::from_json(&json).is_err());
    }

    #[test]
    fn test_serde_reads_and_writes_host_encoding() {
        let value: Value =
            serde_json::from_str(r#"{ "bux": [10, "inf"], "sense": "max" }"#).unwrap();
        let f = value.as_struct().unwrap();
        assert!(matches!(&f["bux"], Value::Row(v) if v[1] == f64::INFINITY));

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"bux":[10.0,"inf"],"sense":"max"}"#);

        let err = serde_json::from_str::<Value>(
            r#"{ "sparse": { "size": [1, 1], "i": ["nan"], "j": [1], "v": [1] } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside a 1x1 matrix"));
    }

    #[test]
    fn test_json_infinite_scalars_are_strings() {
        assert_eq!(Value::Scalar(f64::INFINITY).to_json(), serde_json::json!("inf"));
        assert_eq!(
            Value::Row(vec![1.0, f64::NEG_INFINITY]).to_json(),
            serde_json::json!([1.0, "-inf"])
        );
    }
}
