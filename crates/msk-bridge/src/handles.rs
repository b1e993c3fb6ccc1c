//! Owning wrappers around the native environment and task handles.
//!
//! An [`Environment`] lives as long as the caller keeps it and is shared by
//! every request; a [`Task`] borrows it for the duration of one request and
//! is torn down when it goes out of scope, whatever path the request took.

use crate::error::{BridgeError, BridgeResult, Rescode};
use crate::library::{Library, NativeResult, StreamSink};
use crate::messages::Messages;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, warn};

/// Lazily initialized solver environment.
///
/// Holds the library binding, the message sink that native log streams
/// write to, and the native environment once [`Environment::init`] has run.
pub struct Environment<L: Library> {
    lib: L,
    msgs: Rc<Messages>,
    inner: RefCell<Option<L::Env>>,
    task_live: Cell<bool>,
}

impl<L: Library> Environment<L> {
    pub fn new(lib: L, msgs: Rc<Messages>) -> Self {
        Self {
            lib,
            msgs,
            inner: RefCell::new(None),
            task_live: Cell::new(false),
        }
    }

    pub fn library(&self) -> &L {
        &self.lib
    }

    pub fn messages(&self) -> &Rc<Messages> {
        &self.msgs
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Acquire the native environment; a no-op when already initialized.
    ///
    /// Steps are allocate, attach the log stream, finalize. A failed step
    /// undoes the ones before it in reverse order.
    pub fn init(&self) -> BridgeResult<()> {
        if self.is_initialized() {
            return Ok(());
        }
        debug!("Initializing solver environment");

        let mut env = self.lib.make_env().map_err(|code| self.init_failed(code))?;

        if let Err(code) = self.lib.link_env_stream(&mut env, self.sink()) {
            if let Err(undo) = self.lib.delete_env(env) {
                warn!("Rollback of environment allocation failed with code {}", undo.0);
            }
            return Err(self.init_failed(code));
        }

        if let Err(code) = self.lib.init_env(&mut env) {
            if let Err(undo) = self.lib.unlink_env_stream(&mut env) {
                warn!("Rollback of environment log stream failed with code {}", undo.0);
            }
            if let Err(undo) = self.lib.delete_env(env) {
                warn!("Rollback of environment allocation failed with code {}", undo.0);
            }
            return Err(self.init_failed(code));
        }

        *self.inner.borrow_mut() = Some(env);
        Ok(())
    }

    /// Release the native environment if it is initialized.
    ///
    /// Both teardown steps run even if the first one fails; the first
    /// failure is reported.
    pub fn clean(&mut self) -> BridgeResult<()> {
        let Some(mut env) = self.inner.get_mut().take() else {
            return Ok(());
        };
        debug!("Releasing solver environment");
        let unlinked = self.lib.unlink_env_stream(&mut env);
        let deleted = self.lib.delete_env(env);
        unlinked.and(deleted).map_err(|code| self.native_error(code))
    }

    /// Build the error for a failed native call, looking up its description.
    pub fn native_error(&self, code: Rescode) -> BridgeError {
        let (symbol, description) = self.lib.code_description(code);
        BridgeError::Native {
            code: code.0,
            symbol,
            description,
        }
    }

    fn init_failed(&self, code: Rescode) -> BridgeError {
        let err = self.native_error(code);
        self.msgs
            .error(&format!("Failed to initialize the MOSEK environment ({})", err));
        err
    }

    fn sink(&self) -> StreamSink {
        let msgs = Rc::clone(&self.msgs);
        Rc::new(move |text: &str| msgs.solver(text))
    }
}

impl<L: Library> Drop for Environment<L> {
    fn drop(&mut self) {
        if let Err(e) = self.clean() {
            warn!("Failed to release solver environment: {}", e);
        }
    }
}

/// A solver task bound to one [`Environment`].
///
/// Created uninitialized; [`Task::init`] acquires the native task. Only one
/// task may be live per environment at a time.
pub struct Task<'e, L: Library> {
    env: &'e Environment<L>,
    inner: Option<L::Task>,
}

impl<'e, L: Library> Task<'e, L> {
    pub fn new(env: &'e Environment<L>) -> Self {
        Self { env, inner: None }
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    pub fn environment(&self) -> &'e Environment<L> {
        self.env
    }

    pub fn library(&self) -> &'e L {
        self.env.library()
    }

    pub fn messages(&self) -> &'e Messages {
        self.env.messages()
    }

    /// Acquire the native task with the given size hints.
    pub fn init(&mut self, maxcon: i32, maxvar: i32) -> BridgeResult<()> {
        if self.inner.is_some() {
            return Err(BridgeError::internal(
                "the task is already initialized (multiple tasks are not supported)",
            ));
        }
        if self.env.task_live.get() {
            return Err(BridgeError::internal(
                "another task is already active on this environment",
            ));
        }

        let env = self.env;
        let lib = env.library();
        let mut task = {
            let guard = env.inner.borrow();
            let native_env = guard.as_ref().ok_or_else(|| {
                BridgeError::internal("the environment must be initialized before a task")
            })?;
            lib.make_task(native_env, maxcon, maxvar)
                .map_err(|code| env.native_error(code))?
        };

        if let Err(code) = lib.link_task_stream(&mut task, env.sink()) {
            if let Err(undo) = lib.delete_task(task) {
                warn!("Rollback of task allocation failed with code {}", undo.0);
            }
            return Err(env.native_error(code));
        }

        debug!(maxcon, maxvar, "Task initialized");
        self.inner = Some(task);
        env.task_live.set(true);
        Ok(())
    }

    /// Run a mutating native call and translate its failure.
    pub fn call<T>(
        &mut self,
        f: impl FnOnce(&L, &mut L::Task) -> NativeResult<T>,
    ) -> BridgeResult<T> {
        let env = self.env;
        let task = self.inner.as_mut().ok_or_else(not_initialized)?;
        f(env.library(), task).map_err(|code| env.native_error(code))
    }

    /// Run a read-only native call and translate its failure.
    pub fn query<T>(&self, f: impl FnOnce(&L, &L::Task) -> NativeResult<T>) -> BridgeResult<T> {
        let task = self.inner.as_ref().ok_or_else(not_initialized)?;
        f(self.env.library(), task).map_err(|code| self.env.native_error(code))
    }

    /// Like [`Task::query`], with the native environment as well.
    pub fn query_env<T>(
        &self,
        f: impl FnOnce(&L, &L::Env, &L::Task) -> NativeResult<T>,
    ) -> BridgeResult<T> {
        let task = self.inner.as_ref().ok_or_else(not_initialized)?;
        let guard = self.env.inner.borrow();
        let env = guard.as_ref().ok_or_else(not_initialized)?;
        f(self.env.library(), env, task).map_err(|code| self.env.native_error(code))
    }
}

impl<L: Library> Drop for Task<'_, L> {
    fn drop(&mut self) {
        let Some(mut task) = self.inner.take() else {
            return;
        };
        let lib = self.env.library();
        if let Err(code) = lib.unlink_task_stream(&mut task) {
            warn!("Failed to detach task log stream (code {})", code.0);
        }
        if let Err(code) = lib.delete_task(task) {
            warn!("Failed to delete task (code {})", code.0);
        }
        self.env.task_live.set(false);
        debug!("Task released");
    }
}

fn not_initialized() -> BridgeError {
    BridgeError::internal("the task is not initialized")
}
