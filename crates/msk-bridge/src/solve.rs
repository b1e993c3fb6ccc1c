//! Running the optimizer, and moving tasks to and from data files.

use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult};
use crate::handles::Task;
use crate::host::Value;
use crate::library::Library;
use crate::messages::{Level, Messages};
use crate::options::Options;
use crate::params::{set_parameter, ParamKind};
use crate::response::{Outcome, Response};
use crate::solution::{get_solution, solutions_to_fields};

/// Cooperative cancellation flag.
///
/// Clones share one flag, so a signal handler or another thread can hold a
/// clone and request a stop while the optimizer runs.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Optimize a loaded task and store the termination response and the
/// solutions in `out`.
pub fn solve<L: Library>(
    task: &mut Task<'_, L>,
    opts: &Options,
    interrupt: &Interrupt,
    out: &mut Outcome,
) -> BridgeResult<()> {
    let msgs = Rc::clone(task.environment().messages());

    msgs.debug("Solve: initialization");
    let flag = interrupt.clone();
    let sink = Rc::clone(&msgs);
    task.call(move |lib, t| {
        lib.put_progress_callback(
            t,
            Box::new(move || {
                if flag.is_requested() {
                    sink.output(
                        Level::Error,
                        "Interruption caught, terminating at first chance...",
                    );
                    return true;
                }
                false
            }),
        )
    })?;

    if !opts.writebefore.is_empty() {
        switch(task, "OPF_WRITE_SOLUTIONS", true, &msgs)?;
        task.call(|lib, t| lib.write_data(t, &opts.writebefore))?;
    }

    msgs.debug("Solve: optimization");
    match task.call(|lib, t| lib.optimize(t)) {
        Ok(trmcode) => {
            out.set_response(Response::from_code(task.library(), trmcode), true);
            out.lock_response();
        }
        Err(e) if interrupt.is_requested() => {
            msgs.output(
                Level::Error,
                "Optimization interrupted because of termination signal, e.g. <CTRL> + <C>.",
            );
            return Err(BridgeError::Interrupted(e.to_string()));
        }
        Err(e) => {
            msgs.output(Level::Error, "Optimization interrupted.");
            return Err(e);
        }
    }

    msgs.debug("Solve: extracting solution");
    match extract(task, opts, &msgs) {
        Ok(sol) => {
            out.sol = Some(sol);
            Ok(())
        }
        Err(e) => {
            msgs.output(Level::Error, "An error occurred while extracting the solution.");
            Err(e)
        }
    }
}

fn extract<L: Library>(
    task: &mut Task<'_, L>,
    opts: &Options,
    msgs: &Messages,
) -> BridgeResult<Value> {
    if !opts.writeafter.is_empty() {
        switch(task, "OPF_WRITE_SOLUTIONS", true, msgs)?;
        task.call(|lib, t| lib.write_data(t, &opts.writeafter))?;
    }
    task.call(|lib, t| lib.solution_summary(t))?;
    Ok(Value::Struct(solutions_to_fields(&get_solution(task)?)))
}

/// Set an on/off integer parameter.
fn switch<L: Library>(
    task: &mut Task<'_, L>,
    name: &str,
    on: bool,
    msgs: &Messages,
) -> BridgeResult<()> {
    let value = Value::text(if on { "ON" } else { "OFF" });
    set_parameter(task, ParamKind::Int, name, &value, msgs)
}

fn path_str(path: &Path) -> BridgeResult<&str> {
    path.to_str().ok_or_else(|| {
        BridgeError::input(format!("The file path {} is not valid UTF-8", path.display()))
    })
}

/// Initialize the environment and an empty task, then read a data file
/// into it. The format follows from the file extension.
pub fn load_problem_file<L: Library>(
    task: &mut Task<'_, L>,
    path: &Path,
    msgs: &Messages,
) -> BridgeResult<()> {
    let path = path_str(path)?;
    task.environment().init()?;
    task.init(0, 0)?;

    task.call(|lib, t| lib.read_data(t, path)).inspect_err(|_| {
        msgs.error("An error occurred while loading up the problem from a file");
    })
}

/// Write the loaded task to a data file.
///
/// Solutions are included when `opts.usesol` is set and parameters when
/// `opts.useparam` is set, as far as the file format supports them.
pub fn save_problem_file<L: Library>(
    task: &mut Task<'_, L>,
    path: &Path,
    opts: &Options,
    msgs: &Messages,
) -> BridgeResult<()> {
    let path = path_str(path)?;
    switch(task, "OPF_WRITE_SOLUTIONS", opts.usesol, msgs)?;
    switch(task, "WRITE_DATA_PARAM", opts.useparam, msgs)?;
    switch(task, "OPF_WRITE_PARAMETERS", opts.useparam, msgs)?;
    task.call(|lib, t| lib.write_data(t, path))
}
