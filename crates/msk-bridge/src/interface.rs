//! Entry points called by the host.
//!
//! Every entry point returns an [`Outcome`] rather than a `Result`: failures
//! are folded into its `response` at this boundary, after the messages that
//! led up to them have been released.

use std::path::Path;
use std::rc::Rc;

use crate::error::{BridgeError, BridgeResult};
use crate::handles::{Environment, Task};
use crate::host::{Fields, Value};
use crate::library::Library;
use crate::messages::{Level, Messages};
use crate::options::Options;
use crate::problem::Problem;
use crate::reader::read_problem;
use crate::response::{terminate_successfully, terminate_unsuccessfully, Outcome};
use crate::solve::{load_problem_file, save_problem_file, solve, Interrupt};
use crate::writer::load_problem;

/// Long-lived interface state: the shared environment, the message sink and
/// the cancellation flag.
pub struct Bridge<L: Library> {
    env: Environment<L>,
    msgs: Rc<Messages>,
    interrupt: Interrupt,
}

impl<L: Library> Bridge<L> {
    pub fn new(lib: L) -> Self {
        let msgs = Rc::new(Messages::new());
        Self {
            env: Environment::new(lib, Rc::clone(&msgs)),
            msgs,
            interrupt: Interrupt::new(),
        }
    }

    pub fn environment(&self) -> &Environment<L> {
        &self.env
    }

    pub fn messages(&self) -> &Messages {
        &self.msgs
    }

    /// Handle to the cancellation flag; request it from a signal handler to
    /// stop a running optimization.
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Solve `problem` and return the response and the solutions.
    pub fn mosek(&self, problem: &Value, options: Option<&Value>) -> Outcome {
        self.run("mosek", |out| {
            let problem = struct_arg(problem, "problem")?;
            let options = options.map(|v| struct_arg(v, "options")).transpose()?;

            let opts = self.read_options(options, Options::default())?;
            let problem = Problem::from_fields(problem, &self.msgs)?;

            let mut task = Task::new(&self.env);
            load_problem(&mut task, &problem, &opts, &self.msgs)?;
            solve(&mut task, &opts, &self.interrupt, out)
        })
    }

    /// Read a problem from a data file and return it in `prob`.
    pub fn mosek_read(&self, path: &Path, options: Option<&Value>) -> Outcome {
        self.run("mosek_read", |out| {
            let options = options.map(|v| struct_arg(v, "options")).transpose()?;
            let opts = self.read_options(options, Options::for_files())?;

            let mut task = Task::new(&self.env);
            load_problem_file(&mut task, path, &self.msgs)?;
            let problem = read_problem(&task, &opts, &self.msgs)?;

            out.prob = Some(problem.to_value(&opts));
            Ok(())
        })
    }

    /// Load `problem` into a task and write it to a data file.
    pub fn mosek_write(&self, problem: &Value, path: &Path, options: Option<&Value>) -> Outcome {
        self.run("mosek_write", |_| {
            let problem = struct_arg(problem, "problem")?;
            let options = options.map(|v| struct_arg(v, "options")).transpose()?;

            let opts = self.read_options(options, Options::for_files())?;
            let problem = Problem::from_fields(problem, &self.msgs)?;

            let mut task = Task::new(&self.env);
            load_problem(&mut task, &problem, &opts, &self.msgs)?;
            save_problem_file(&mut task, path, &opts, &self.msgs)
        })
    }

    /// Release the environment. The next call acquires a fresh one.
    pub fn mosek_clean(&mut self) {
        self.msgs.reset();
        self.msgs.set_verbosity(Level::Info as i32 as f64);
        self.interrupt.clear();

        if let Err(e) = self.env.clean() {
            self.msgs.error(&e.to_string());
        }
    }

    /// Library version as `MOSEK major.minor.build.revision`.
    pub fn mosek_version(&self) -> String {
        let (major, minor, build, revision) = self.env.library().version();
        format!("MOSEK {}.{}.{}.{}", major, minor, build, revision)
    }

    fn run(&self, name: &str, body: impl FnOnce(&mut Outcome) -> BridgeResult<()>) -> Outcome {
        self.msgs.reset();
        self.interrupt.clear();
        self.msgs.debug(&format!("Function '{}' was called", name));

        let mut out = Outcome::default();
        let lib = self.env.library();
        match body(&mut out) {
            Ok(()) => {
                let warnings = self.msgs.warnings();
                if warnings > 0 {
                    self.msgs.output(
                        Level::Warning,
                        &format!("The interface completed with {} warning(s)", warnings),
                    );
                }
                terminate_successfully(lib, &mut out, &self.msgs);
            }
            Err(e) => terminate_unsuccessfully(lib, &mut out, &self.msgs, &e),
        }
        out
    }

    fn read_options(&self, options: Option<&Fields>, defaults: Options) -> BridgeResult<Options> {
        match options {
            Some(fields) => Options::from_fields(fields, defaults, &self.msgs),
            None => Options::from_fields(&Fields::new(), defaults, &self.msgs),
        }
    }
}

/// Accept a struct argument; an empty value stands for an empty struct.
fn struct_arg<'a>(value: &'a Value, name: &str) -> BridgeResult<&'a Fields> {
    static EMPTY: Fields = Fields::new();
    match value {
        Value::Struct(fields) => Ok(fields),
        Value::Empty => Ok(&EMPTY),
        _ => Err(BridgeError::input(format!(
            "Input argument {} should be a struct.",
            name
        ))),
    }
}
