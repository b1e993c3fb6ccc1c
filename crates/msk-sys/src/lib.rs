//! Native FFI bindings to the MOSEK 6 C API.
//!
//! This crate provides low-level unsafe declarations for the subset of the
//! MOSEK 6 task API needed to populate, optimize and read back linear, conic
//! and mixed-integer problems, plus a handful of safe helpers for strings and
//! version queries. Resource management lives one level up, in `msk-bridge`.
//!
//! MOSEK 6 addresses rows and columns through an access mode
//! ([`MSK_ACC_VAR`]/[`MSK_ACC_CON`]) and reports failures through
//! [`MSKrescodee`] return codes; every function below that returns a code
//! must be checked against [`MSK_RES_OK`].
//!
//! # Usage
//!
//! ```ignore
//! use msk_sys::*;
//! use std::ptr;
//!
//! let mut env: MSKenv_t = ptr::null_mut();
//! unsafe {
//!     assert_eq!(MSK_makeenv(&mut env, ptr::null_mut(), None, None, ptr::null()), MSK_RES_OK);
//!     assert_eq!(MSK_initenv(env), MSK_RES_OK);
//!     MSK_deleteenv(&mut env);
//! }
//! ```
//!
//! # Building
//!
//! This crate links against MOSEK from:
//! 1. `$MOSEK_HOME/bin` (the platform directory of an installation)
//! 2. System MOSEK via pkg-config (fallback)
//!
//! # Index widths
//!
//! The declarations assume the 32-bit index build of MOSEK 6 (`MSKidxt`,
//! `MSKlidxt` and `MSKlintt` all `int`), which is what the standard
//! distribution ships on every platform.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_double, c_int, c_void};

// ============================================================================
// TYPES
// ============================================================================

/// Plain integer (matches MSKintt).
pub type MSKintt = c_int;

/// Index type for rows/columns (matches MSKidxt).
pub type MSKidxt = c_int;

/// Index type for nonzero positions (matches MSKlidxt).
pub type MSKlidxt = c_int;

/// Count type for nonzeros (matches MSKlintt).
pub type MSKlintt = c_int;

/// Floating-point number type (matches MSKrealt).
pub type MSKrealt = c_double;

/// Boolean returned by lookups (matches MSKbooleant).
pub type MSKbooleant = c_int;

/// Opaque environment structure.
#[repr(C)]
pub struct MSKenv_s {
    _private: [u8; 0],
}

/// Opaque task structure.
#[repr(C)]
pub struct MSKtask_s {
    _private: [u8; 0],
}

/// Pointer to a MOSEK environment.
pub type MSKenv_t = *mut MSKenv_s;

/// Pointer to a MOSEK task.
pub type MSKtask_t = *mut MSKtask_s;

/// User data pointer passed back to callbacks.
pub type MSKuserhandle_t = *mut c_void;

/// Maximum length of symbolic names and descriptions, terminator included.
pub const MSK_MAX_STR_LEN: usize = 1024;

// ============================================================================
// RETURN CODES
// ============================================================================

/// Response code returned by every MOSEK call.
pub type MSKrescodee = c_int;

/// No error occurred.
pub const MSK_RES_OK: MSKrescodee = 0;

/// An argument passed to a function was invalid.
pub const MSK_RES_ERR_IN_ARGUMENT: MSKrescodee = 1200;

/// Internal error; also used for values outside a known enumeration.
pub const MSK_RES_ERR_INTERNAL: MSKrescodee = 3000;

/// The optimizer terminated because the progress callback asked it to.
pub const MSK_RES_TRM_USER_CALLBACK: MSKrescodee = 10007;

// ============================================================================
// ENUMERATIONS
// ============================================================================

/// Access mode: rows (constraints) or columns (variables).
pub type MSKaccmodee = c_int;
pub const MSK_ACC_VAR: MSKaccmodee = 0;
pub const MSK_ACC_CON: MSKaccmodee = 1;

/// Bound keys.
pub type MSKboundkeye = c_int;
pub const MSK_BK_LO: MSKboundkeye = 0;
pub const MSK_BK_UP: MSKboundkeye = 1;
pub const MSK_BK_FX: MSKboundkeye = 2;
pub const MSK_BK_FR: MSKboundkeye = 3;
pub const MSK_BK_RA: MSKboundkeye = 4;

/// Objective sense.
pub type MSKobjsensee = c_int;
pub const MSK_OBJECTIVE_SENSE_UNDEFINED: MSKobjsensee = 0;
pub const MSK_OBJECTIVE_SENSE_MINIMIZE: MSKobjsensee = 1;
pub const MSK_OBJECTIVE_SENSE_MAXIMIZE: MSKobjsensee = 2;

/// Solution types.
pub type MSKsoltypee = c_int;
pub const MSK_SOL_ITR: MSKsoltypee = 0;
pub const MSK_SOL_BAS: MSKsoltypee = 1;
pub const MSK_SOL_ITG: MSKsoltypee = 2;

/// Solution items.
pub type MSKsoliteme = c_int;
pub const MSK_SOL_ITEM_XC: MSKsoliteme = 0;
pub const MSK_SOL_ITEM_XX: MSKsoliteme = 1;
pub const MSK_SOL_ITEM_Y: MSKsoliteme = 2;
pub const MSK_SOL_ITEM_SLC: MSKsoliteme = 3;
pub const MSK_SOL_ITEM_SUC: MSKsoliteme = 4;
pub const MSK_SOL_ITEM_SLX: MSKsoliteme = 5;
pub const MSK_SOL_ITEM_SUX: MSKsoliteme = 6;
pub const MSK_SOL_ITEM_SNX: MSKsoliteme = 7;

/// Output streams.
pub type MSKstreamtypee = c_int;
pub const MSK_STREAM_LOG: MSKstreamtypee = 0;
pub const MSK_STREAM_MSG: MSKstreamtypee = 1;
pub const MSK_STREAM_ERR: MSKstreamtypee = 2;
pub const MSK_STREAM_WRN: MSKstreamtypee = 3;

/// Variable types.
pub type MSKvariabletypee = c_int;
pub const MSK_VAR_TYPE_CONT: MSKvariabletypee = 0;
pub const MSK_VAR_TYPE_INT: MSKvariabletypee = 1;

/// Parameter classes.
pub type MSKparametertypee = c_int;
pub const MSK_PAR_INVALID_TYPE: MSKparametertypee = 0;
pub const MSK_PAR_DOU_TYPE: MSKparametertypee = 1;
pub const MSK_PAR_INT_TYPE: MSKparametertypee = 2;
pub const MSK_PAR_STR_TYPE: MSKparametertypee = 3;

/// Status keys (only the unknown key is needed by name).
pub type MSKstakeye = c_int;
pub const MSK_SK_UNK: MSKstakeye = 0;

/// Cone types.
pub type MSKconetypee = c_int;
pub const MSK_CT_QUAD: MSKconetypee = 0;
pub const MSK_CT_RQUAD: MSKconetypee = 1;

/// Problem and solution status.
pub type MSKprostae = c_int;
pub type MSKsolstae = c_int;

/// Callback caller codes.
pub type MSKcallbackcodee = c_int;

/// On/off switch values for integer parameters.
pub const MSK_OFF: MSKintt = 0;
pub const MSK_ON: MSKintt = 1;

// ============================================================================
// CALLBACK FUNCTION TYPES
// ============================================================================

/// Stream callback receiving a chunk of solver log text.
pub type MSKstreamfunc = Option<unsafe extern "C" fn(handle: MSKuserhandle_t, str: *const c_char)>;

/// Progress callback polled by the optimizer.
///
/// # Returns
/// Nonzero to ask the optimizer to terminate at the next opportunity.
pub type MSKcallbackfunc = Option<
    unsafe extern "C" fn(
        task: MSKtask_t,
        usrptr: MSKuserhandle_t,
        caller: MSKcallbackcodee,
    ) -> c_int,
>;

/// Custom allocator hooks accepted by `MSK_makeenv` (unused, pass `None`).
pub type MSKmallocfunc =
    Option<unsafe extern "C" fn(usrptr: MSKuserhandle_t, size: usize) -> *mut c_void>;
pub type MSKfreefunc = Option<unsafe extern "C" fn(usrptr: MSKuserhandle_t, buffer: *mut c_void)>;

// ============================================================================
// MOSEK C INTERFACE FUNCTIONS
// ============================================================================

extern "C" {
    // ---- Environment ------------------------------------------------------

    /// Allocate a new environment.
    pub fn MSK_makeenv(
        env: *mut MSKenv_t,
        usrptr: MSKuserhandle_t,
        usrmalloc: MSKmallocfunc,
        usrfree: MSKfreefunc,
        dbgfile: *const c_char,
    ) -> MSKrescodee;

    /// Finalize environment setup (checks out the license).
    pub fn MSK_initenv(env: MSKenv_t) -> MSKrescodee;

    /// Free an environment and null the pointer.
    pub fn MSK_deleteenv(env: *mut MSKenv_t) -> MSKrescodee;

    pub fn MSK_linkfunctoenvstream(
        env: MSKenv_t,
        whichstream: MSKstreamtypee,
        handle: MSKuserhandle_t,
        func: MSKstreamfunc,
    ) -> MSKrescodee;

    pub fn MSK_unlinkfuncfromenvstream(env: MSKenv_t, whichstream: MSKstreamtypee) -> MSKrescodee;

    /// Translate a symbolic constant name (e.g. `MSK_CT_QUAD`) to its value.
    ///
    /// # Returns
    /// Nonzero if the name was found; the value is written as decimal text.
    pub fn MSK_symnamtovalue(name: *const c_char, value: *mut c_char) -> MSKbooleant;

    /// Symbolic name and description of a response code.
    pub fn MSK_getcodedesc(code: MSKrescodee, symname: *mut c_char, str: *mut c_char)
        -> MSKrescodee;

    pub fn MSK_getversion(
        major: *mut MSKintt,
        minor: *mut MSKintt,
        build: *mut MSKintt,
        revision: *mut MSKintt,
    ) -> MSKrescodee;

    /// Symbolic name of an integer parameter value, or an empty string.
    pub fn MSK_iparvaltosymnam(
        env: MSKenv_t,
        whichparam: MSKintt,
        whichvalue: MSKintt,
        symbolicname: *mut c_char,
    ) -> MSKrescodee;

    // ---- Task lifecycle ---------------------------------------------------

    pub fn MSK_maketask(
        env: MSKenv_t,
        maxnumcon: MSKintt,
        maxnumvar: MSKintt,
        task: *mut MSKtask_t,
    ) -> MSKrescodee;

    pub fn MSK_deletetask(task: *mut MSKtask_t) -> MSKrescodee;

    pub fn MSK_linkfunctotaskstream(
        task: MSKtask_t,
        whichstream: MSKstreamtypee,
        handle: MSKuserhandle_t,
        func: MSKstreamfunc,
    ) -> MSKrescodee;

    pub fn MSK_unlinkfuncfromtaskstream(task: MSKtask_t, whichstream: MSKstreamtypee)
        -> MSKrescodee;

    pub fn MSK_putcallbackfunc(
        task: MSKtask_t,
        func: MSKcallbackfunc,
        handle: MSKuserhandle_t,
    ) -> MSKrescodee;

    // ---- Problem input ----------------------------------------------------

    pub fn MSK_putmaxnumvar(task: MSKtask_t, maxnumvar: MSKintt) -> MSKrescodee;
    pub fn MSK_putmaxnumcon(task: MSKtask_t, maxnumcon: MSKintt) -> MSKrescodee;
    pub fn MSK_putmaxnumanz(task: MSKtask_t, maxnumanz: MSKlintt) -> MSKrescodee;

    /// Append `num` empty rows or columns.
    pub fn MSK_append(task: MSKtask_t, accmode: MSKaccmodee, num: MSKintt) -> MSKrescodee;

    pub fn MSK_putcfix(task: MSKtask_t, cfix: MSKrealt) -> MSKrescodee;
    pub fn MSK_putcj(task: MSKtask_t, j: MSKidxt, cj: MSKrealt) -> MSKrescodee;

    pub fn MSK_putbound(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        i: MSKidxt,
        bk: MSKboundkeye,
        bl: MSKrealt,
        bu: MSKrealt,
    ) -> MSKrescodee;

    /// Replace one row or column of A.
    pub fn MSK_putavec(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        i: MSKidxt,
        nzi: MSKlintt,
        asub: *const MSKlidxt,
        aval: *const MSKrealt,
    ) -> MSKrescodee;

    pub fn MSK_appendcone(
        task: MSKtask_t,
        conetype: MSKconetypee,
        conepar: MSKrealt,
        nummem: MSKintt,
        submem: *const MSKidxt,
    ) -> MSKrescodee;

    pub fn MSK_putvartype(task: MSKtask_t, j: MSKidxt, vartype: MSKvariabletypee) -> MSKrescodee;

    pub fn MSK_putobjsense(task: MSKtask_t, sense: MSKobjsensee) -> MSKrescodee;

    // ---- Problem output ---------------------------------------------------

    pub fn MSK_getobjsense(task: MSKtask_t, sense: *mut MSKobjsensee) -> MSKrescodee;
    pub fn MSK_getnumanz(task: MSKtask_t, numanz: *mut MSKintt) -> MSKrescodee;
    pub fn MSK_getnumcon(task: MSKtask_t, numcon: *mut MSKintt) -> MSKrescodee;
    pub fn MSK_getnumvar(task: MSKtask_t, numvar: *mut MSKintt) -> MSKrescodee;
    pub fn MSK_getnumintvar(task: MSKtask_t, numintvar: *mut MSKintt) -> MSKrescodee;
    pub fn MSK_getnumcone(task: MSKtask_t, numcone: *mut MSKintt) -> MSKrescodee;
    pub fn MSK_getcfix(task: MSKtask_t, cfix: *mut MSKrealt) -> MSKrescodee;

    /// Copy the full objective vector into `c` (length numvar).
    pub fn MSK_getc(task: MSKtask_t, c: *mut MSKrealt) -> MSKrescodee;

    /// Column- or row-compressed slice of A.
    ///
    /// `ptrb`/`ptre` may alias as `p` and `p + 1` to obtain a plain pointer
    /// array of length `last - first + 1`.
    pub fn MSK_getaslice(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        first: MSKidxt,
        last: MSKidxt,
        maxnumnz: MSKlintt,
        surp: *mut MSKlintt,
        ptrb: *mut MSKlintt,
        ptre: *mut MSKlintt,
        sub: *mut MSKlidxt,
        val: *mut MSKrealt,
    ) -> MSKrescodee;

    pub fn MSK_getboundslice(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        first: MSKidxt,
        last: MSKidxt,
        bk: *mut MSKboundkeye,
        bl: *mut MSKrealt,
        bu: *mut MSKrealt,
    ) -> MSKrescodee;

    pub fn MSK_getbound(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        i: MSKidxt,
        bk: *mut MSKboundkeye,
        bl: *mut MSKrealt,
        bu: *mut MSKrealt,
    ) -> MSKrescodee;

    pub fn MSK_getnumconemem(task: MSKtask_t, k: MSKidxt, nummem: *mut MSKintt) -> MSKrescodee;

    pub fn MSK_getcone(
        task: MSKtask_t,
        k: MSKidxt,
        conetype: *mut MSKconetypee,
        conepar: *mut MSKrealt,
        nummem: *mut MSKintt,
        submem: *mut MSKidxt,
    ) -> MSKrescodee;

    pub fn MSK_conetypetostr(task: MSKtask_t, conetype: MSKconetypee, str: *mut c_char)
        -> MSKrescodee;

    pub fn MSK_getvartype(task: MSKtask_t, j: MSKidxt, vartype: *mut MSKvariabletypee)
        -> MSKrescodee;

    // ---- Parameters -------------------------------------------------------

    /// Look up a fully prefixed parameter name.
    pub fn MSK_whichparam(
        task: MSKtask_t,
        parname: *const c_char,
        partype: *mut MSKparametertypee,
        param: *mut MSKintt,
    ) -> MSKrescodee;

    pub fn MSK_getnumparam(
        task: MSKtask_t,
        partype: MSKparametertypee,
        numparam: *mut MSKintt,
    ) -> MSKrescodee;

    pub fn MSK_getparamname(
        task: MSKtask_t,
        partype: MSKparametertypee,
        param: MSKintt,
        parname: *mut c_char,
    ) -> MSKrescodee;

    pub fn MSK_putintparam(task: MSKtask_t, param: MSKintt, parvalue: MSKintt) -> MSKrescodee;
    pub fn MSK_putdouparam(task: MSKtask_t, param: MSKintt, parvalue: MSKrealt) -> MSKrescodee;
    pub fn MSK_putstrparam(task: MSKtask_t, param: MSKintt, parvalue: *const c_char)
        -> MSKrescodee;

    pub fn MSK_getintparam(task: MSKtask_t, param: MSKintt, parvalue: *mut MSKintt)
        -> MSKrescodee;
    pub fn MSK_getdouparam(task: MSKtask_t, param: MSKintt, parvalue: *mut MSKrealt)
        -> MSKrescodee;

    /// Read a string parameter.
    ///
    /// Call with `maxlen = 0` and a null `parvalue` to obtain the length
    /// (terminator not counted), then again with a buffer of `len + 1`.
    pub fn MSK_getstrparam(
        task: MSKtask_t,
        param: MSKintt,
        maxlen: usize,
        len: *mut usize,
        parvalue: *mut c_char,
    ) -> MSKrescodee;

    // ---- Solutions --------------------------------------------------------

    pub fn MSK_solutiondef(task: MSKtask_t, whichsol: MSKsoltypee, isdef: *mut MSKintt)
        -> MSKrescodee;

    pub fn MSK_getsolutionstatus(
        task: MSKtask_t,
        whichsol: MSKsoltypee,
        prosta: *mut MSKprostae,
        solsta: *mut MSKsolstae,
    ) -> MSKrescodee;

    pub fn MSK_prostatostr(task: MSKtask_t, prosta: MSKprostae, str: *mut c_char) -> MSKrescodee;
    pub fn MSK_solstatostr(task: MSKtask_t, solsta: MSKsolstae, str: *mut c_char) -> MSKrescodee;

    pub fn MSK_getsolutionstatuskeyslice(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        whichsol: MSKsoltypee,
        first: MSKidxt,
        last: MSKidxt,
        sk: *mut MSKstakeye,
    ) -> MSKrescodee;

    pub fn MSK_sktostr(task: MSKtask_t, sk: MSKstakeye, str: *mut c_char) -> MSKrescodee;
    pub fn MSK_strtosk(task: MSKtask_t, str: *const c_char, sk: *mut MSKintt) -> MSKrescodee;

    pub fn MSK_getsolutionslice(
        task: MSKtask_t,
        whichsol: MSKsoltypee,
        solitem: MSKsoliteme,
        first: MSKidxt,
        last: MSKidxt,
        values: *mut MSKrealt,
    ) -> MSKrescodee;

    /// Set the status key and all values of a single row or column.
    pub fn MSK_putsolutioni(
        task: MSKtask_t,
        accmode: MSKaccmodee,
        i: MSKidxt,
        whichsol: MSKsoltypee,
        sk: MSKstakeye,
        x: MSKrealt,
        sl: MSKrealt,
        su: MSKrealt,
        sn: MSKrealt,
    ) -> MSKrescodee;

    // ---- Optimization and I/O --------------------------------------------

    /// Optimize; the returned code is the call status and `trmcode` the
    /// termination reason.
    pub fn MSK_optimizetrm(task: MSKtask_t, trmcode: *mut MSKrescodee) -> MSKrescodee;

    pub fn MSK_solutionsummary(task: MSKtask_t, whichstream: MSKstreamtypee) -> MSKrescodee;

    /// Write the task using the codec selected by the file extension.
    pub fn MSK_writedata(task: MSKtask_t, filename: *const c_char) -> MSKrescodee;

    /// Read a task using the codec selected by the file extension.
    pub fn MSK_readdata(task: MSKtask_t, filename: *const c_char) -> MSKrescodee;
}

// ============================================================================
// SAFE RUST HELPERS
// ============================================================================

/// A zeroed buffer large enough for any symbolic name MOSEK returns.
pub fn name_buffer() -> [c_char; MSK_MAX_STR_LEN] {
    [0; MSK_MAX_STR_LEN]
}

/// Convert a NUL-terminated buffer filled by MOSEK into an owned string.
///
/// Reads at most `buf.len()` bytes even if the terminator is missing.
pub fn buffer_to_string(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Get the MOSEK library version as (major, minor, build, revision).
pub fn version() -> (i32, i32, i32, i32) {
    let mut major = 0;
    let mut minor = 0;
    let mut build = 0;
    let mut revision = 0;
    unsafe {
        MSK_getversion(&mut major, &mut minor, &mut build, &mut revision);
    }
    (major, minor, build, revision)
}

/// Symbolic name and description of a response code.
///
/// Falls back to a generic description if MOSEK does not know the code.
pub fn code_description(code: MSKrescodee) -> (String, String) {
    let mut symname = name_buffer();
    let mut desc = name_buffer();
    let r = unsafe { MSK_getcodedesc(code, symname.as_mut_ptr(), desc.as_mut_ptr()) };
    if r != MSK_RES_OK {
        return (
            format!("MSK_RES_{}", code),
            "Unknown response code".to_string(),
        );
    }
    (buffer_to_string(&symname), buffer_to_string(&desc))
}

/// Borrow a C string passed into a callback, tolerating null.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for the
/// duration of the call.
pub unsafe fn callback_str<'a>(ptr: *const c_char) -> Option<std::borrow::Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy())
}
