//! [`Library`] backed by the MOSEK 6 C library.
//!
//! Handles own the boxed closures registered as native user data; the boxes
//! are reclaimed when the stream is unlinked or the handle is deleted.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

use msk_sys::*;

use crate::bounds::BoundKey;
use crate::error::Rescode;
use crate::library::{
    Accessor, BoundSlice, ColumnSlice, Library, NativeResult, ObjSense, ProgressFn, SolItem,
    SolType, SolutionPoint, StatusKey, StreamSink, VarType,
};
use crate::params::ParamKind;

/// The MOSEK shared library.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mosek;

/// Native environment plus the stream sink registered on it.
pub struct MosekEnv {
    ptr: MSKenv_t,
    stream: Option<*mut StreamSink>,
}

/// Native task plus the closures registered on it.
pub struct MosekTask {
    ptr: MSKtask_t,
    stream: Option<*mut StreamSink>,
    progress: Option<*mut ProgressFn>,
}

fn check(r: MSKrescodee) -> NativeResult<()> {
    if r == MSK_RES_OK {
        Ok(())
    } else {
        Err(Rescode(r))
    }
}

fn c_string(s: &str) -> NativeResult<CString> {
    CString::new(s).map_err(|_| Rescode(MSK_RES_ERR_IN_ARGUMENT))
}

fn len(n: i32) -> usize {
    n.max(0) as usize
}

// ----------------------------------------------------------------------------
// Enumeration mapping
// ----------------------------------------------------------------------------

fn accmode(acc: Accessor) -> MSKaccmodee {
    match acc {
        Accessor::Var => MSK_ACC_VAR,
        Accessor::Con => MSK_ACC_CON,
    }
}

fn bound_to_native(key: BoundKey) -> MSKboundkeye {
    match key {
        BoundKey::Free => MSK_BK_FR,
        BoundKey::LowerOnly => MSK_BK_LO,
        BoundKey::UpperOnly => MSK_BK_UP,
        BoundKey::Fixed => MSK_BK_FX,
        BoundKey::Ranged => MSK_BK_RA,
    }
}

fn bound_from_native(bk: MSKboundkeye) -> NativeResult<BoundKey> {
    match bk {
        MSK_BK_FR => Ok(BoundKey::Free),
        MSK_BK_LO => Ok(BoundKey::LowerOnly),
        MSK_BK_UP => Ok(BoundKey::UpperOnly),
        MSK_BK_FX => Ok(BoundKey::Fixed),
        MSK_BK_RA => Ok(BoundKey::Ranged),
        _ => Err(Rescode(MSK_RES_ERR_INTERNAL)),
    }
}

fn soltype(sol: SolType) -> MSKsoltypee {
    match sol {
        SolType::Interior => MSK_SOL_ITR,
        SolType::Basic => MSK_SOL_BAS,
        SolType::Integer => MSK_SOL_ITG,
    }
}

fn solitem(item: SolItem) -> MSKsoliteme {
    match item {
        SolItem::Xc => MSK_SOL_ITEM_XC,
        SolItem::Xx => MSK_SOL_ITEM_XX,
        SolItem::Y => MSK_SOL_ITEM_Y,
        SolItem::Slc => MSK_SOL_ITEM_SLC,
        SolItem::Suc => MSK_SOL_ITEM_SUC,
        SolItem::Slx => MSK_SOL_ITEM_SLX,
        SolItem::Sux => MSK_SOL_ITEM_SUX,
        SolItem::Snx => MSK_SOL_ITEM_SNX,
    }
}

fn partype(kind: ParamKind) -> MSKparametertypee {
    match kind {
        ParamKind::Int => MSK_PAR_INT_TYPE,
        ParamKind::Float => MSK_PAR_DOU_TYPE,
        ParamKind::Str => MSK_PAR_STR_TYPE,
    }
}

// ----------------------------------------------------------------------------
// Callback trampolines
// ----------------------------------------------------------------------------

unsafe extern "C" fn stream_callback(handle: MSKuserhandle_t, text: *const c_char) {
    if handle.is_null() {
        return;
    }
    let sink = &*(handle as *const StreamSink);
    if let Some(text) = callback_str(text) {
        sink(&*text);
    }
}

unsafe extern "C" fn progress_callback(
    _task: MSKtask_t,
    handle: MSKuserhandle_t,
    _caller: MSKcallbackcodee,
) -> c_int {
    if handle.is_null() {
        return 0;
    }
    let callback = &mut *(handle as *mut ProgressFn);
    c_int::from(callback())
}

/// Reclaim a box handed out with `Box::into_raw`.
///
/// # Safety
/// `ptr` must come from `Box::into_raw` and must no longer be registered
/// with the library.
unsafe fn release<T>(ptr: Option<*mut T>) {
    if let Some(p) = ptr {
        drop(Box::from_raw(p));
    }
}

// ----------------------------------------------------------------------------
// Library implementation
// ----------------------------------------------------------------------------

impl Library for Mosek {
    type Env = MosekEnv;
    type Task = MosekTask;

    fn make_env(&self) -> NativeResult<MosekEnv> {
        let mut env: MSKenv_t = ptr::null_mut();
        check(unsafe { MSK_makeenv(&mut env, ptr::null_mut(), None, None, ptr::null()) })?;
        Ok(MosekEnv { ptr: env, stream: None })
    }

    fn link_env_stream(&self, env: &mut MosekEnv, sink: StreamSink) -> NativeResult<()> {
        let handle = Box::into_raw(Box::new(sink));
        let r = unsafe {
            MSK_linkfunctoenvstream(
                env.ptr,
                MSK_STREAM_LOG,
                handle as MSKuserhandle_t,
                Some(stream_callback),
            )
        };
        if let Err(code) = check(r) {
            unsafe { release(Some(handle)) };
            return Err(code);
        }
        unsafe { release(env.stream.replace(handle)) };
        Ok(())
    }

    fn init_env(&self, env: &mut MosekEnv) -> NativeResult<()> {
        check(unsafe { MSK_initenv(env.ptr) })
    }

    fn unlink_env_stream(&self, env: &mut MosekEnv) -> NativeResult<()> {
        let r = unsafe { MSK_unlinkfuncfromenvstream(env.ptr, MSK_STREAM_LOG) };
        unsafe { release(env.stream.take()) };
        check(r)
    }

    fn delete_env(&self, mut env: MosekEnv) -> NativeResult<()> {
        let r = unsafe { MSK_deleteenv(&mut env.ptr) };
        unsafe { release(env.stream.take()) };
        check(r)
    }

    fn make_task(&self, env: &MosekEnv, maxcon: i32, maxvar: i32) -> NativeResult<MosekTask> {
        let mut task: MSKtask_t = ptr::null_mut();
        check(unsafe { MSK_maketask(env.ptr, maxcon, maxvar, &mut task) })?;
        Ok(MosekTask {
            ptr: task,
            stream: None,
            progress: None,
        })
    }

    fn link_task_stream(&self, task: &mut MosekTask, sink: StreamSink) -> NativeResult<()> {
        let handle = Box::into_raw(Box::new(sink));
        let r = unsafe {
            MSK_linkfunctotaskstream(
                task.ptr,
                MSK_STREAM_LOG,
                handle as MSKuserhandle_t,
                Some(stream_callback),
            )
        };
        if let Err(code) = check(r) {
            unsafe { release(Some(handle)) };
            return Err(code);
        }
        unsafe { release(task.stream.replace(handle)) };
        Ok(())
    }

    fn unlink_task_stream(&self, task: &mut MosekTask) -> NativeResult<()> {
        let r = unsafe { MSK_unlinkfuncfromtaskstream(task.ptr, MSK_STREAM_LOG) };
        unsafe { release(task.stream.take()) };
        check(r)
    }

    fn delete_task(&self, mut task: MosekTask) -> NativeResult<()> {
        let r = unsafe { MSK_deletetask(&mut task.ptr) };
        unsafe {
            release(task.stream.take());
            release(task.progress.take());
        }
        check(r)
    }

    fn put_max_num_var(&self, task: &mut MosekTask, n: i32) -> NativeResult<()> {
        check(unsafe { MSK_putmaxnumvar(task.ptr, n) })
    }

    fn put_max_num_con(&self, task: &mut MosekTask, n: i32) -> NativeResult<()> {
        check(unsafe { MSK_putmaxnumcon(task.ptr, n) })
    }

    fn put_max_num_anz(&self, task: &mut MosekTask, n: i32) -> NativeResult<()> {
        check(unsafe { MSK_putmaxnumanz(task.ptr, n) })
    }

    fn append(&self, task: &mut MosekTask, acc: Accessor, num: i32) -> NativeResult<()> {
        check(unsafe { MSK_append(task.ptr, accmode(acc), num) })
    }

    fn put_cfix(&self, task: &mut MosekTask, cfix: f64) -> NativeResult<()> {
        check(unsafe { MSK_putcfix(task.ptr, cfix) })
    }

    fn put_cj(&self, task: &mut MosekTask, j: i32, cj: f64) -> NativeResult<()> {
        check(unsafe { MSK_putcj(task.ptr, j, cj) })
    }

    fn put_bound(
        &self,
        task: &mut MosekTask,
        acc: Accessor,
        i: i32,
        key: BoundKey,
        lower: f64,
        upper: f64,
    ) -> NativeResult<()> {
        check(unsafe {
            MSK_putbound(task.ptr, accmode(acc), i, bound_to_native(key), lower, upper)
        })
    }

    fn put_avec(
        &self,
        task: &mut MosekTask,
        acc: Accessor,
        i: i32,
        sub: &[i32],
        val: &[f64],
    ) -> NativeResult<()> {
        if sub.len() != val.len() {
            return Err(Rescode(MSK_RES_ERR_IN_ARGUMENT));
        }
        check(unsafe {
            MSK_putavec(
                task.ptr,
                accmode(acc),
                i,
                sub.len() as MSKlintt,
                sub.as_ptr(),
                val.as_ptr(),
            )
        })
    }

    fn append_cone(
        &self,
        task: &mut MosekTask,
        kind: i32,
        par: f64,
        sub: &[i32],
    ) -> NativeResult<()> {
        check(unsafe { MSK_appendcone(task.ptr, kind, par, sub.len() as MSKintt, sub.as_ptr()) })
    }

    fn put_var_type(&self, task: &mut MosekTask, j: i32, vt: VarType) -> NativeResult<()> {
        let vt = match vt {
            VarType::Continuous => MSK_VAR_TYPE_CONT,
            VarType::Integer => MSK_VAR_TYPE_INT,
        };
        check(unsafe { MSK_putvartype(task.ptr, j, vt) })
    }

    fn put_obj_sense(&self, task: &mut MosekTask, sense: ObjSense) -> NativeResult<()> {
        let sense = match sense {
            ObjSense::Undefined => MSK_OBJECTIVE_SENSE_UNDEFINED,
            ObjSense::Minimize => MSK_OBJECTIVE_SENSE_MINIMIZE,
            ObjSense::Maximize => MSK_OBJECTIVE_SENSE_MAXIMIZE,
        };
        check(unsafe { MSK_putobjsense(task.ptr, sense) })
    }

    fn get_obj_sense(&self, task: &MosekTask) -> NativeResult<ObjSense> {
        let mut sense = 0;
        check(unsafe { MSK_getobjsense(task.ptr, &mut sense) })?;
        match sense {
            MSK_OBJECTIVE_SENSE_UNDEFINED => Ok(ObjSense::Undefined),
            MSK_OBJECTIVE_SENSE_MINIMIZE => Ok(ObjSense::Minimize),
            MSK_OBJECTIVE_SENSE_MAXIMIZE => Ok(ObjSense::Maximize),
            _ => Err(Rescode(MSK_RES_ERR_INTERNAL)),
        }
    }

    fn get_num_anz(&self, task: &MosekTask) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumanz(task.ptr, &mut n) })?;
        Ok(n)
    }

    fn get_num_con(&self, task: &MosekTask) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumcon(task.ptr, &mut n) })?;
        Ok(n)
    }

    fn get_num_var(&self, task: &MosekTask) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumvar(task.ptr, &mut n) })?;
        Ok(n)
    }

    fn get_num_int_var(&self, task: &MosekTask) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumintvar(task.ptr, &mut n) })?;
        Ok(n)
    }

    fn get_num_cone(&self, task: &MosekTask) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumcone(task.ptr, &mut n) })?;
        Ok(n)
    }

    fn get_cfix(&self, task: &MosekTask) -> NativeResult<f64> {
        let mut cfix = 0.0;
        check(unsafe { MSK_getcfix(task.ptr, &mut cfix) })?;
        Ok(cfix)
    }

    fn get_c(&self, task: &MosekTask, numvar: i32) -> NativeResult<Vec<f64>> {
        let mut c = vec![0.0; len(numvar)];
        check(unsafe { MSK_getc(task.ptr, c.as_mut_ptr()) })?;
        Ok(c)
    }

    fn get_a_columns(&self, task: &MosekTask, numvar: i32, maxnz: i32) -> NativeResult<ColumnSlice> {
        let mut slice = ColumnSlice {
            ptr: vec![0; len(numvar) + 1],
            sub: vec![0; len(maxnz)],
            val: vec![0.0; len(maxnz)],
        };
        let mut surp = maxnz;
        let ptrb = slice.ptr.as_mut_ptr();
        check(unsafe {
            MSK_getaslice(
                task.ptr,
                MSK_ACC_VAR,
                0,
                numvar,
                maxnz,
                &mut surp,
                ptrb,
                ptrb.add(1),
                slice.sub.as_mut_ptr(),
                slice.val.as_mut_ptr(),
            )
        })?;
        Ok(slice)
    }

    fn get_bound_slice(
        &self,
        task: &MosekTask,
        acc: Accessor,
        first: i32,
        last: i32,
    ) -> NativeResult<BoundSlice> {
        let n = len(last - first);
        let mut bk = vec![0; n];
        let mut lower = vec![0.0; n];
        let mut upper = vec![0.0; n];
        check(unsafe {
            MSK_getboundslice(
                task.ptr,
                accmode(acc),
                first,
                last,
                bk.as_mut_ptr(),
                lower.as_mut_ptr(),
                upper.as_mut_ptr(),
            )
        })?;
        let keys = bk
            .into_iter()
            .map(bound_from_native)
            .collect::<NativeResult<Vec<_>>>()?;
        Ok(BoundSlice { keys, lower, upper })
    }

    fn get_bound(
        &self,
        task: &MosekTask,
        acc: Accessor,
        i: i32,
    ) -> NativeResult<(BoundKey, f64, f64)> {
        let (mut bk, mut bl, mut bu) = (0, 0.0, 0.0);
        check(unsafe { MSK_getbound(task.ptr, accmode(acc), i, &mut bk, &mut bl, &mut bu) })?;
        Ok((bound_from_native(bk)?, bl, bu))
    }

    fn get_num_cone_mem(&self, task: &MosekTask, k: i32) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumconemem(task.ptr, k, &mut n) })?;
        Ok(n)
    }

    fn get_cone(&self, task: &MosekTask, k: i32) -> NativeResult<(i32, Vec<i32>)> {
        let mut nummem = self.get_num_cone_mem(task, k)?;
        let mut sub = vec![0; len(nummem)];
        let mut kind = 0;
        let mut par = 0.0;
        check(unsafe {
            MSK_getcone(task.ptr, k, &mut kind, &mut par, &mut nummem, sub.as_mut_ptr())
        })?;
        sub.truncate(len(nummem));
        Ok((kind, sub))
    }

    fn cone_type_to_str(&self, task: &MosekTask, kind: i32) -> NativeResult<String> {
        let mut buf = name_buffer();
        check(unsafe { MSK_conetypetostr(task.ptr, kind, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn get_var_type(&self, task: &MosekTask, j: i32) -> NativeResult<VarType> {
        let mut vt = 0;
        check(unsafe { MSK_getvartype(task.ptr, j, &mut vt) })?;
        match vt {
            MSK_VAR_TYPE_CONT => Ok(VarType::Continuous),
            MSK_VAR_TYPE_INT => Ok(VarType::Integer),
            _ => Err(Rescode(MSK_RES_ERR_INTERNAL)),
        }
    }

    fn which_param(&self, task: &MosekTask, name: &str) -> NativeResult<Option<(ParamKind, i32)>> {
        let name = c_string(name)?;
        let mut kind = MSK_PAR_INVALID_TYPE;
        let mut idx = 0;
        check(unsafe { MSK_whichparam(task.ptr, name.as_ptr(), &mut kind, &mut idx) })?;
        Ok(match kind {
            MSK_PAR_INT_TYPE => Some((ParamKind::Int, idx)),
            MSK_PAR_DOU_TYPE => Some((ParamKind::Float, idx)),
            MSK_PAR_STR_TYPE => Some((ParamKind::Str, idx)),
            _ => None,
        })
    }

    fn sym_name_to_value(&self, name: &str) -> Option<i32> {
        let name = CString::new(name).ok()?;
        let mut buf = name_buffer();
        let found = unsafe { MSK_symnamtovalue(name.as_ptr(), buf.as_mut_ptr()) };
        if found == 0 {
            return None;
        }
        buffer_to_string(&buf).trim().parse().ok()
    }

    fn num_params(&self, task: &MosekTask, kind: ParamKind) -> NativeResult<i32> {
        let mut n = 0;
        check(unsafe { MSK_getnumparam(task.ptr, partype(kind), &mut n) })?;
        Ok(n)
    }

    fn param_name(&self, task: &MosekTask, kind: ParamKind, idx: i32) -> NativeResult<String> {
        let mut buf = name_buffer();
        check(unsafe { MSK_getparamname(task.ptr, partype(kind), idx, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn put_int_param(&self, task: &mut MosekTask, idx: i32, value: i32) -> NativeResult<()> {
        check(unsafe { MSK_putintparam(task.ptr, idx, value) })
    }

    fn put_dou_param(&self, task: &mut MosekTask, idx: i32, value: f64) -> NativeResult<()> {
        check(unsafe { MSK_putdouparam(task.ptr, idx, value) })
    }

    fn put_str_param(&self, task: &mut MosekTask, idx: i32, value: &str) -> NativeResult<()> {
        let value = c_string(value)?;
        check(unsafe { MSK_putstrparam(task.ptr, idx, value.as_ptr()) })
    }

    fn get_int_param(&self, task: &MosekTask, idx: i32) -> NativeResult<i32> {
        let mut v = 0;
        check(unsafe { MSK_getintparam(task.ptr, idx, &mut v) })?;
        Ok(v)
    }

    fn get_dou_param(&self, task: &MosekTask, idx: i32) -> NativeResult<f64> {
        let mut v = 0.0;
        check(unsafe { MSK_getdouparam(task.ptr, idx, &mut v) })?;
        Ok(v)
    }

    fn str_param_len(&self, task: &MosekTask, idx: i32) -> NativeResult<usize> {
        let mut n = 0usize;
        check(unsafe { MSK_getstrparam(task.ptr, idx, 0, &mut n, ptr::null_mut()) })?;
        Ok(n)
    }

    fn get_str_param(&self, task: &MosekTask, idx: i32, capacity: usize) -> NativeResult<String> {
        let mut buf: Vec<c_char> = vec![0; capacity.max(1)];
        let mut n = 0usize;
        check(unsafe { MSK_getstrparam(task.ptr, idx, buf.len(), &mut n, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn int_param_symbol(&self, env: &MosekEnv, idx: i32, value: i32) -> NativeResult<String> {
        let mut buf = name_buffer();
        check(unsafe { MSK_iparvaltosymnam(env.ptr, idx, value, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn solution_def(&self, task: &MosekTask, sol: SolType) -> NativeResult<bool> {
        let mut isdef = 0;
        check(unsafe { MSK_solutiondef(task.ptr, soltype(sol), &mut isdef) })?;
        Ok(isdef != 0)
    }

    fn get_solution_status(&self, task: &MosekTask, sol: SolType) -> NativeResult<(i32, i32)> {
        let (mut prosta, mut solsta) = (0, 0);
        check(unsafe { MSK_getsolutionstatus(task.ptr, soltype(sol), &mut prosta, &mut solsta) })?;
        Ok((prosta, solsta))
    }

    fn prosta_to_str(&self, task: &MosekTask, prosta: i32) -> NativeResult<String> {
        let mut buf = name_buffer();
        check(unsafe { MSK_prostatostr(task.ptr, prosta, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn solsta_to_str(&self, task: &MosekTask, solsta: i32) -> NativeResult<String> {
        let mut buf = name_buffer();
        check(unsafe { MSK_solstatostr(task.ptr, solsta, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn get_status_keys(
        &self,
        task: &MosekTask,
        acc: Accessor,
        sol: SolType,
        n: i32,
    ) -> NativeResult<Vec<StatusKey>> {
        let mut sk = vec![0; len(n)];
        check(unsafe {
            MSK_getsolutionstatuskeyslice(
                task.ptr,
                accmode(acc),
                soltype(sol),
                0,
                n,
                sk.as_mut_ptr(),
            )
        })?;
        Ok(sk.into_iter().map(StatusKey).collect())
    }

    fn sk_to_str(&self, task: &MosekTask, sk: StatusKey) -> NativeResult<String> {
        let mut buf = name_buffer();
        check(unsafe { MSK_sktostr(task.ptr, sk.0, buf.as_mut_ptr()) })?;
        Ok(buffer_to_string(&buf))
    }

    fn str_to_sk(&self, task: &MosekTask, name: &str) -> NativeResult<StatusKey> {
        let name = c_string(name)?;
        let mut sk = MSK_SK_UNK;
        check(unsafe { MSK_strtosk(task.ptr, name.as_ptr(), &mut sk) })?;
        Ok(StatusKey(sk))
    }

    fn get_solution_slice(
        &self,
        task: &MosekTask,
        sol: SolType,
        item: SolItem,
        n: i32,
    ) -> NativeResult<Vec<f64>> {
        let mut values = vec![0.0; len(n)];
        check(unsafe {
            MSK_getsolutionslice(
                task.ptr,
                soltype(sol),
                solitem(item),
                0,
                n,
                values.as_mut_ptr(),
            )
        })?;
        Ok(values)
    }

    fn put_solution_i(
        &self,
        task: &mut MosekTask,
        acc: Accessor,
        i: i32,
        sol: SolType,
        point: SolutionPoint,
    ) -> NativeResult<()> {
        check(unsafe {
            MSK_putsolutioni(
                task.ptr,
                accmode(acc),
                i,
                soltype(sol),
                point.sk.0,
                point.x,
                point.sl,
                point.su,
                point.sn,
            )
        })
    }

    fn put_progress_callback(&self, task: &mut MosekTask, callback: ProgressFn) -> NativeResult<()> {
        let handle = Box::into_raw(Box::new(callback));
        let r = unsafe {
            MSK_putcallbackfunc(task.ptr, Some(progress_callback), handle as MSKuserhandle_t)
        };
        if let Err(code) = check(r) {
            unsafe { release(Some(handle)) };
            return Err(code);
        }
        unsafe { release(task.progress.replace(handle)) };
        Ok(())
    }

    fn optimize(&self, task: &mut MosekTask) -> NativeResult<Rescode> {
        let mut trmcode = MSK_RES_OK;
        check(unsafe { MSK_optimizetrm(task.ptr, &mut trmcode) })?;
        Ok(Rescode(trmcode))
    }

    fn solution_summary(&self, task: &mut MosekTask) -> NativeResult<()> {
        check(unsafe { MSK_solutionsummary(task.ptr, MSK_STREAM_LOG) })
    }

    fn write_data(&self, task: &mut MosekTask, path: &str) -> NativeResult<()> {
        let path = c_string(path)?;
        check(unsafe { MSK_writedata(task.ptr, path.as_ptr()) })
    }

    fn read_data(&self, task: &mut MosekTask, path: &str) -> NativeResult<()> {
        let path = c_string(path)?;
        check(unsafe { MSK_readdata(task.ptr, path.as_ptr()) })
    }

    fn version(&self) -> (i32, i32, i32, i32) {
        msk_sys::version()
    }

    fn code_description(&self, code: Rescode) -> (String, String) {
        msk_sys::code_description(code.0)
    }
}
