//! Marshaling between dynamic host values and MOSEK optimization tasks.
//!
//! A host environment (a scripting language, or JSON through `msk-cli`)
//! describes a linear, conic or mixed-integer problem as a struct of vectors,
//! a sparse constraint matrix, cones and parameter tables. This crate
//! validates that description, loads it into a native task, optimizes, and
//! turns the task's state back into host values.
//!
//! # Architecture
//!
//! ```text
//! host Value ──> Problem ──> writer ──> Task ──> solve ──> solution ──> Outcome
//!                    ^                    |
//!                    └────── reader <─────┘        (mosek_read)
//! ```
//!
//! Every native call goes through the [`Library`] trait. The `native`
//! feature binds it to the MOSEK 6 C library via `msk-sys`; without it the
//! crate builds without MOSEK installed and can be driven by any other
//! implementation.
//!
//! Native resources are owned by [`Environment`] and [`Task`] and released
//! when they go out of scope, whatever path a call took.
//!
//! # Conventions
//!
//! | Concept | Host side | Native side |
//! |---------|-----------|-------------|
//! | Indices | 1-based | 0-based |
//! | Missing bound | `±inf` | bound key |
//! | Parameter names | `LOG`, `IPAR_LOG`, `MSK_IPAR_LOG` | `MSK_IPAR_LOG` |
//! | Symbolic values | `ON`, `MSK_ON` | integer |
//!
//! # Example
//!
//! ```ignore
//! use msk_bridge::{native::Mosek, Bridge, Value};
//!
//! let problem: Value = serde_json::from_str(text)?;
//! let bridge = Bridge::new(Mosek);
//! let outcome = bridge.mosek(&problem, None);
//! println!("{}", serde_json::to_string(&outcome.into_value())?);
//! ```

pub mod bounds;
pub mod cones;
pub mod error;
pub mod handles;
pub mod host;
pub mod interface;
pub mod library;
pub mod messages;
#[cfg(feature = "native")]
pub mod native;
pub mod options;
pub mod params;
pub mod problem;
pub mod reader;
pub mod response;
pub mod solution;
pub mod solve;
pub mod writer;

pub use bounds::BoundKey;
pub use cones::Cone;
pub use error::{BridgeError, BridgeResult, Rescode};
pub use handles::{Environment, Task};
pub use host::{Fields, Value};
pub use interface::Bridge;
pub use library::{Library, NativeResult, ObjSense, SolItem, SolType};
pub use messages::{Level, Messages};
pub use options::Options;
pub use params::ParamKind;
pub use problem::Problem;
pub use response::{Outcome, Response};
pub use solve::Interrupt;
