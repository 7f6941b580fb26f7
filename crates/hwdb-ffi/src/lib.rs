// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! C-compatible bindings for the hardware database.
//!
//! The ABI deals in opaque handles, integer coordinate enumerations and
//! NUL-terminated strings. Every fallible function returns [`HWDB_SUCCESS`] or
//! [`HWDB_FAILURE`] and writes its result through an out pointer; strings and
//! arrays handed out must be released with the matching `hwdb_free_*`
//! function. A handle must not be used from two threads at once.
#![allow(unsafe_code)]
#![deny(missing_docs)]

use std::ffi::{c_char, c_int, CStr, CString};
use std::path::PathBuf;
use std::ptr;

use hwdb_core::coord::{
    AnalogOnHicann, AnanasGlobal, Coordinate, DncOnWafer, FpgaGlobal, FpgaOnWafer, HicannGlobal,
    HicannOnWafer, ReticleGlobal, TriggerGlobal, TriggerOnWafer, Wafer,
};
use hwdb_core::{get_yaml_entries, Database, HwdbError};
use tracing::warn;

/// Return value of a successful call.
pub const HWDB_SUCCESS: c_int = 0;
/// Return value of a failed call; the reason is logged.
pub const HWDB_FAILURE: c_int = -1;

/// Opaque database handle exposed over the C ABI.
pub struct HwdbDatabase {
    inner: Database,
}

fn status(result: Result<(), HwdbError>) -> c_int {
    match result {
        Ok(()) => HWDB_SUCCESS,
        Err(err) => {
            warn!(error = %err, "hwdb call failed");
            HWDB_FAILURE
        }
    }
}

/// Writes `value` through `out`.
///
/// # Safety
/// `out` must be null or valid for writes.
unsafe fn put<T>(out: *mut T, value: T) -> c_int {
    if out.is_null() {
        return HWDB_FAILURE;
    }
    unsafe {
        out.write(value);
    }
    HWDB_SUCCESS
}

/// Writes the result of `f` through `out`, or fails without touching it.
///
/// # Safety
/// `out` must be null or valid for writes.
unsafe fn put_with<T>(out: *mut T, f: impl FnOnce() -> Result<T, HwdbError>) -> c_int {
    if out.is_null() {
        return HWDB_FAILURE;
    }
    match f() {
        Ok(value) => unsafe { put(out, value) },
        Err(err) => status(Err(err)),
    }
}

/// Hands `text` to C as a freshly allocated string.
///
/// # Safety
/// `out` must be null or valid for writes.
unsafe fn put_string(out: *mut *mut c_char, text: String) -> c_int {
    match CString::new(text) {
        Ok(s) => unsafe { put(out, s.into_raw()) },
        Err(_) => HWDB_FAILURE,
    }
}

/// Borrows a C string as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn text<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Path argument; NULL selects the default database file.
///
/// # Safety
/// As for [`text`].
unsafe fn path_or_default(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        Some(Database::default_path())
    } else {
        unsafe { text(ptr) }.map(PathBuf::from)
    }
}

// ---- lifecycle -------------------------------------------------------------

/// Allocates an empty database and stores its handle in `*out`.
///
/// # Safety
/// `out` must be valid for writes. The handle must be released with [`hwdb_free`].
#[no_mangle]
pub unsafe extern "C" fn hwdb_alloc(out: *mut *mut HwdbDatabase) -> c_int {
    let handle = Box::into_raw(Box::new(HwdbDatabase {
        inner: Database::new(),
    }));
    let rc = unsafe { put(out, handle) };
    if rc != HWDB_SUCCESS {
        unsafe { drop(Box::from_raw(handle)) };
    }
    rc
}

/// Releases a database handle.
///
/// # Safety
/// `db` must be a pointer previously returned by [`hwdb_alloc`] that has not
/// already been freed.
#[no_mangle]
pub unsafe extern "C" fn hwdb_free(db: *mut HwdbDatabase) {
    if db.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(db));
    }
}

/// Loads the file at `path` (NULL for the default path) into the empty database.
///
/// # Safety
/// `db` must be a live handle; `path` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hwdb_load(db: *mut HwdbDatabase, path: *const c_char) -> c_int {
    let (Some(db), Some(path)) = (unsafe { db.as_mut() }, unsafe { path_or_default(path) })
    else {
        return HWDB_FAILURE;
    };
    status(db.inner.load(path).map(drop))
}

/// Writes the database to `path`.
///
/// # Safety
/// `db` must be a live handle; `path` must be a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hwdb_store(db: *const HwdbDatabase, path: *const c_char) -> c_int {
    let (Some(db), Some(path)) = (unsafe { db.as_ref() }, unsafe { text(path) }) else {
        return HWDB_FAILURE;
    };
    status(db.inner.store(path))
}

/// Removes every entry.
///
/// # Safety
/// `db` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn hwdb_clear(db: *mut HwdbDatabase) -> c_int {
    let Some(db) = (unsafe { db.as_mut() }) else {
        return HWDB_FAILURE;
    };
    db.inner.clear();
    HWDB_SUCCESS
}

/// Raw text of every document in `path` (NULL for the default path) whose
/// `key` equals `query`; see [`hwdb_core::get_yaml_entries`].
///
/// # Safety
/// String arguments must be null (only `path`) or NUL-terminated; `out` must be
/// valid for writes. Release the result with [`hwdb_free_string`].
#[no_mangle]
pub unsafe extern "C" fn hwdb_get_yaml_entries(
    path: *const c_char,
    key: *const c_char,
    query: *const c_char,
    out: *mut *mut c_char,
) -> c_int {
    let (Some(path), Some(key), Some(query)) =
        (unsafe { path_or_default(path) }, unsafe { text(key) }, unsafe { text(query) })
    else {
        return HWDB_FAILURE;
    };
    match get_yaml_entries(path, key, query) {
        Ok(found) => unsafe { put_string(out, found) },
        Err(err) => status(Err(err)),
    }
}

/// Releases a string returned by this library.
///
/// # Safety
/// `s` must be null or a string returned by this library and not yet freed.
#[no_mangle]
pub unsafe extern "C" fn hwdb_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(s));
    }
}

// ---- existence checks ------------------------------------------------------

/// Shared body of the `hwdb_has_*` functions.
///
/// # Safety
/// `db` must be null or a live handle; `ret` must be null or valid for writes.
unsafe fn has(
    db: *const HwdbDatabase,
    ret: *mut bool,
    check: impl FnOnce(&Database) -> Result<bool, HwdbError>,
) -> c_int {
    let Some(db) = (unsafe { db.as_ref() }) else {
        return HWDB_FAILURE;
    };
    unsafe { put_with(ret, || check(&db.inner)) }
}

/// Whether wafer `wafer_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_wafer_entry(
    db: *const HwdbDatabase,
    wafer_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe { has(db, ret, |db| Ok(db.has_wafer_entry(Wafer::from_index(wafer_id)?))) }
}

/// Whether the FPGA with global enumeration `fpga_global_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_fpga_entry(
    db: *const HwdbDatabase,
    fpga_global_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe {
        has(db, ret, |db| {
            Ok(db.has_fpga_entry(FpgaGlobal::from_index(fpga_global_id)?))
        })
    }
}

/// Whether the reticle with global enumeration `reticle_global_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_reticle_entry(
    db: *const HwdbDatabase,
    reticle_global_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe {
        has(db, ret, |db| {
            Ok(db.has_reticle_entry(ReticleGlobal::from_index(reticle_global_id)?))
        })
    }
}

/// Whether the Ananas board with global enumeration `ananas_global_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_ananas_entry(
    db: *const HwdbDatabase,
    ananas_global_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe {
        has(db, ret, |db| {
            Ok(db.has_ananas_entry(AnanasGlobal::from_index(ananas_global_id)?))
        })
    }
}

/// Whether the HICANN with global enumeration `hicann_global_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_hicann_entry(
    db: *const HwdbDatabase,
    hicann_global_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe {
        has(db, ret, |db| {
            Ok(db.has_hicann_entry(HicannGlobal::from_index(hicann_global_id)?))
        })
    }
}

/// Whether an ADC is connected to analog output `analog` behind the FPGA
/// `fpga_global_id`.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_adc_entry(
    db: *const HwdbDatabase,
    fpga_global_id: usize,
    analog: usize,
    ret: *mut bool,
) -> c_int {
    unsafe {
        has(db, ret, |db| {
            let key = (
                FpgaGlobal::from_index(fpga_global_id)?,
                AnalogOnHicann::from_index(analog)?,
            );
            Ok(db.has_adc_entry(key))
        })
    }
}

/// Whether the DLS setup named `setup_id` is stored.
///
/// # Safety
/// `db` must be a live handle, `setup_id` NUL-terminated and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_dls_entry(
    db: *const HwdbDatabase,
    setup_id: *const c_char,
    ret: *mut bool,
) -> c_int {
    let Some(id) = (unsafe { text(setup_id) }) else {
        return HWDB_FAILURE;
    };
    unsafe { has(db, ret, |db| Ok(db.has_dls_entry(id))) }
}

/// Whether cube `hxcube_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_hxcube_setup_entry(
    db: *const HwdbDatabase,
    hxcube_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe { has(db, ret, |db| Ok(db.has_hxcube_setup_entry(hxcube_id))) }
}

/// Whether jBOA `jboa_id` is stored.
///
/// # Safety
/// `db` must be a live handle and `ret` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_has_jboa_setup_entry(
    db: *const HwdbDatabase,
    jboa_id: usize,
    ret: *mut bool,
) -> c_int {
    unsafe { has(db, ret, |db| Ok(db.has_jboa_setup_entry(jboa_id))) }
}

// ---- listings --------------------------------------------------------------

/// Ids of all stored wafers as a newly allocated array.
///
/// # Safety
/// `db` must be a live handle; `out` and `len` must be valid for writes.
/// Release the array with [`hwdb_free_wafer_coordinates`].
#[no_mangle]
pub unsafe extern "C" fn hwdb_get_wafer_coordinates(
    db: *const HwdbDatabase,
    out: *mut *mut usize,
    len: *mut usize,
) -> c_int {
    let Some(db) = (unsafe { db.as_ref() }) else {
        return HWDB_FAILURE;
    };
    if out.is_null() || len.is_null() {
        return HWDB_FAILURE;
    }
    let ids: Box<[usize]> = db
        .inner
        .get_wafer_coordinates()
        .into_iter()
        .map(Wafer::value)
        .collect();
    unsafe {
        len.write(ids.len());
        out.write(Box::into_raw(ids).cast::<usize>());
    }
    HWDB_SUCCESS
}

/// Releases an array returned by [`hwdb_get_wafer_coordinates`].
///
/// # Safety
/// `ids` and `len` must be exactly as returned and not yet freed.
#[no_mangle]
pub unsafe extern "C" fn hwdb_free_wafer_coordinates(ids: *mut usize, len: usize) {
    if ids.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(ids, len)));
    }
}

// ---- coordinate helpers ----------------------------------------------------

/// Number of FPGAs on a wafer.
#[no_mangle]
pub extern "C" fn hwdb_fpga_on_wafer_size() -> usize {
    FpgaOnWafer::SIZE
}

/// Number of reticles (DNCs) on a wafer.
#[no_mangle]
pub extern "C" fn hwdb_dnc_on_wafer_size() -> usize {
    DncOnWafer::SIZE
}

/// Number of Ananas boards per wafer.
#[no_mangle]
pub extern "C" fn hwdb_ananas_on_wafer_size() -> usize {
    hwdb_core::coord::AnanasOnWafer::SIZE
}

/// Number of HICANNs on a wafer.
#[no_mangle]
pub extern "C" fn hwdb_hicann_on_wafer_size() -> usize {
    HicannOnWafer::SIZE
}

/// Index of the master FPGA of a wafer.
#[no_mangle]
pub extern "C" fn hwdb_master_fpga_enum() -> usize {
    FpgaOnWafer::MASTER.value()
}

/// FPGA wired to reticle `reticle`.
///
/// # Safety
/// `ret` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_reticle_to_fpga(reticle: usize, ret: *mut usize) -> c_int {
    unsafe { put_with(ret, || Ok(DncOnWafer::from_index(reticle)?.to_fpga().value())) }
}

/// Reticle wired to FPGA `fpga`.
///
/// # Safety
/// `ret` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_fpga_to_reticle(fpga: usize, ret: *mut usize) -> c_int {
    unsafe { put_with(ret, || Ok(FpgaOnWafer::from_index(fpga)?.to_dnc().value())) }
}

/// Trigger group of FPGA `fpga`.
///
/// # Safety
/// `ret` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_fpga_to_trigger(fpga: usize, ret: *mut usize) -> c_int {
    unsafe { put_with(ret, || Ok(FpgaOnWafer::from_index(fpga)?.to_trigger().value())) }
}

/// Reticle containing HICANN `hicann`.
///
/// # Safety
/// `ret` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_hicann_to_reticle(hicann: usize, ret: *mut usize) -> c_int {
    unsafe { put_with(ret, || Ok(HicannOnWafer::from_index(hicann)?.to_dnc().value())) }
}

/// FPGA serving HICANN `hicann`.
///
/// # Safety
/// `ret` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_hicann_to_fpga(hicann: usize, ret: *mut usize) -> c_int {
    unsafe { put_with(ret, || Ok(HicannOnWafer::from_index(hicann)?.to_fpga().value())) }
}

/// Ananas board reading out trigger group `trigger`.
///
/// # Safety
/// `ret` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hwdb_trigger_to_ananas(trigger: usize, ret: *mut usize) -> c_int {
    unsafe { put_with(ret, || Ok(TriggerOnWafer::from_index(trigger)?.to_ananas().value())) }
}

macro_rules! neighbour {
    ($(#[$meta:meta])* $name:ident, $step:ident) => {
        $(#[$meta])*
        ///
        /// Fails at the wafer edge.
        ///
        /// # Safety
        /// `ret` must be valid for writes.
        #[no_mangle]
        pub unsafe extern "C" fn $name(hicann: usize, ret: *mut usize) -> c_int {
            unsafe { put_with(ret, || Ok(HicannOnWafer::from_index(hicann)?.$step()?.value())) }
        }
    };
}

neighbour!(
    /// HICANN to the east of `hicann`.
    hwdb_hicann_east,
    east
);
neighbour!(
    /// HICANN to the south of `hicann`.
    hwdb_hicann_south,
    south
);
neighbour!(
    /// HICANN to the west of `hicann`.
    hwdb_hicann_west,
    west
);
neighbour!(
    /// HICANN to the north of `hicann`.
    hwdb_hicann_north,
    north
);

macro_rules! slurm_license {
    ($(#[$meta:meta])* $name:ident, $global:ty) => {
        $(#[$meta])*
        ///
        /// # Safety
        /// `out` must be valid for writes. Release the result with
        /// [`hwdb_free_string`].
        #[no_mangle]
        pub unsafe extern "C" fn $name(global_id: usize, out: *mut *mut c_char) -> c_int {
            match <$global>::from_index(global_id) {
                Ok(coord) => unsafe { put_string(out, coord.to_string()) },
                Err(err) => status(Err(err.into())),
            }
        }
    };
}

slurm_license!(
    /// Slurm license name of an Ananas board, e.g. `W3A0`.
    hwdb_ananas_global_slurm_license,
    AnanasGlobal
);
slurm_license!(
    /// Slurm license name of an FPGA, e.g. `W10F0`.
    hwdb_fpga_global_slurm_license,
    FpgaGlobal
);
slurm_license!(
    /// Slurm license name of a HICANN, e.g. `W5H144`.
    hwdb_hicann_global_slurm_license,
    HicannGlobal
);
slurm_license!(
    /// Slurm license name of a trigger group, e.g. `W10T8`.
    hwdb_trigger_global_slurm_license,
    TriggerGlobal
);
