//! C FFI surface for tau-core.
//!
//! Pattern: opaque SessionHandle + C strings + JSON serialization.
//!
//! Plugin hosts call these via `dart:ffi` or any other C FFI. Codec
//! lookups need no handle; record-URL calls go through a session.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};

use tau_core::{registry, Config, LogLevel, MimeList, RecordSession};

// ---------------------------------------------------------------------------
// Error handling (thread-local last error)
// ---------------------------------------------------------------------------

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn set_error(msg: String) {
    log::debug!("tau-ffi: {}", msg);
    LAST_ERROR.with(|cell| *cell.borrow_mut() = Some(msg));
}

fn clear_error() {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = None);
}

/// Returns the last error message (caller frees with `tau_string_free`).
#[no_mangle]
pub extern "C" fn tau_last_error() -> *mut c_char {
    LAST_ERROR.with(|cell| {
        cell.borrow_mut()
            .take()
            .and_then(|s| CString::new(s).ok())
            .map(|s| s.into_raw())
            .unwrap_or(ptr::null_mut())
    })
}

/// Frees a string returned from tau FFI.
///
/// # Safety
/// Must be a pointer returned from this FFI and not already freed.
#[no_mangle]
pub unsafe extern "C" fn tau_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

// ---------------------------------------------------------------------------
// Opaque handle
// ---------------------------------------------------------------------------

#[repr(C)]
pub struct SessionHandle {
    _private: [u8; 0],
}

struct SessionHandleInner {
    session: RecordSession,
}

/// Sessions opened by this process, across all handles.
static INSTANCE_NUMBER: AtomicU32 = AtomicU32::new(0);

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Sets the storage root directory used by `tau_open`.
///
/// # Safety
/// `path` must be a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn tau_set_root(path: *const c_char) -> i32 {
    clear_error();
    match read_cstr(path) {
        Ok(p) => {
            std::env::set_var(tau_core::config::ROOT_ENV, p);
            1
        }
        Err(e) => {
            set_error(e);
            0
        }
    }
}

/// Opens a record session for `app_id`. Returns an opaque handle.
///
/// # Safety
/// `app_id` must be a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn tau_open(app_id: *const c_char) -> *mut SessionHandle {
    clear_error();
    let app = match read_cstr(app_id) {
        Ok(a) => a,
        Err(e) => {
            set_error(e);
            return ptr::null_mut();
        }
    };

    match RecordSession::open(&Config::from_env(&app)) {
        Ok(session) => {
            let n = INSTANCE_NUMBER.fetch_add(1, Ordering::SeqCst) + 1;
            log::debug!("tau-ffi: opened session {} for {}", n, app);
            Box::into_raw(Box::new(SessionHandleInner { session })) as *mut SessionHandle
        }
        Err(e) => {
            set_error(e.to_string());
            ptr::null_mut()
        }
    }
}

/// Closes the session and releases its resources.
#[no_mangle]
pub extern "C" fn tau_close(handle: *mut SessionHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle as *mut SessionHandleInner));
        }
    }
}

/// Number of sessions `tau_open` has opened in this process.
#[no_mangle]
pub extern "C" fn tau_instance_number() -> u32 {
    INSTANCE_NUMBER.load(Ordering::SeqCst)
}

// ---------------------------------------------------------------------------
// Codec registry
// ---------------------------------------------------------------------------

/// Number of rows in the codec tables.
#[no_mangle]
pub extern "C" fn tau_codec_count() -> u32 {
    registry::CODEC_COUNT as u32
}

/// Codec identifier at `index` (caller frees), or NULL if out of range.
#[no_mangle]
pub extern "C" fn tau_codec_at(index: i32) -> *mut c_char {
    clear_error();
    match registry::checked_index(index.into()).and_then(|i| registry::codec_at(i)) {
        Ok(codec) => to_cstr(codec.name().to_string()),
        Err(e) => err_null(e.to_string()),
    }
}

/// MIME type for the row at `index` (caller frees), or NULL if out of range.
#[no_mangle]
pub extern "C" fn tau_mime_for(index: i32) -> *mut c_char {
    clear_error();
    match registry::checked_index(index.into()).and_then(|i| registry::mime_for(i)) {
        Ok(mime) => to_cstr(mime.to_string()),
        Err(e) => err_null(e.to_string()),
    }
}

/// Container tag for the row at `index` (caller frees), or NULL if out of
/// range. Raw PCM rows return an empty string, not NULL.
#[no_mangle]
pub extern "C" fn tau_format_for(index: i32) -> *mut c_char {
    clear_error();
    match registry::checked_index(index.into()).and_then(|i| registry::format_for(i)) {
        Ok(format) => to_cstr(format.to_string()),
        Err(e) => err_null(e.to_string()),
    }
}

/// All table rows as a JSON array (caller frees).
#[no_mangle]
pub extern "C" fn tau_codecs_json() -> *mut c_char {
    clear_error();
    json_to_cstr(&registry::entries())
}

// ---------------------------------------------------------------------------
// Capability checks
// ---------------------------------------------------------------------------

/// Whether a recorder supporting the MIME types in `supported_json` (a JSON
/// array of strings) can encode the codec at `index`.
/// Returns 1 if supported, 0 if not, -1 on error.
#[no_mangle]
pub extern "C" fn tau_is_encoder_supported(index: i32, supported_json: *const c_char) -> i32 {
    clear_error();
    capability(index, supported_json, |i, host| registry::is_encoder_supported(i, host))
}

/// Whether a player supporting the MIME types in `supported_json` can
/// decode the codec at `index`. Returns 1, 0 or -1 like
/// `tau_is_encoder_supported`.
#[no_mangle]
pub extern "C" fn tau_is_decoder_supported(index: i32, supported_json: *const c_char) -> i32 {
    clear_error();
    capability(index, supported_json, |i, host| registry::is_decoder_supported(i, host))
}

fn capability(
    index: i32,
    supported_json: *const c_char,
    check: impl FnOnce(usize, &MimeList) -> tau_core::Result<bool>,
) -> i32 {
    let json = match read_cstr(supported_json) {
        Ok(j) => j,
        Err(e) => {
            set_error(e);
            return -1;
        }
    };
    let host: MimeList = match serde_json::from_str(&json) {
        Ok(h) => h,
        Err(e) => {
            set_error(format!("invalid mime type list: {}", e));
            return -1;
        }
    };
    match registry::checked_index(index.into()).and_then(|i| check(i, &host)) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(e) => {
            set_error(e.to_string());
            -1
        }
    }
}

// ---------------------------------------------------------------------------
// Record URLs
// ---------------------------------------------------------------------------

/// URL stored for `path` (caller frees). NULL `path` means the last URL
/// path. Returns NULL without an error when nothing is stored.
#[no_mangle]
pub extern "C" fn tau_get_record_url(
    handle: *mut SessionHandle,
    path: *const c_char,
) -> *mut c_char {
    clear_error();
    let session = match session_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_null(e),
    };
    let path_str = match read_opt_cstr(path) {
        Ok(p) => p,
        Err(e) => return err_null(e),
    };
    match session.get_record_url(path_str.as_deref()) {
        Some(url) => to_cstr(url),
        None => ptr::null_mut(),
    }
}

/// Store `url` under `path`. Returns 1 on success, 0 on error.
#[no_mangle]
pub extern "C" fn tau_save_record_url(
    handle: *mut SessionHandle,
    path: *const c_char,
    url: *const c_char,
) -> i32 {
    clear_error();
    let session = match session_ref(handle) {
        Ok(s) => s,
        Err(e) => {
            set_error(e);
            return 0;
        }
    };
    let path_str = match read_cstr(path) {
        Ok(s) => s,
        Err(e) => {
            set_error(e);
            return 0;
        }
    };
    let url_str = match read_cstr(url) {
        Ok(s) => s,
        Err(e) => {
            set_error(e);
            return 0;
        }
    };
    match session.save_record_url(&path_str, &url_str) {
        Ok(_) => 1,
        Err(e) => {
            set_error(e.to_string());
            0
        }
    }
}

/// Delete the record at `path` (NULL means the last URL path).
/// Returns 1 if removed, 0 if absent, -1 on error.
#[no_mangle]
pub extern "C" fn tau_delete_record(handle: *mut SessionHandle, path: *const c_char) -> i32 {
    clear_error();
    let session = match session_ref(handle) {
        Ok(s) => s,
        Err(e) => {
            set_error(e);
            return -1;
        }
    };
    let path_str = match read_opt_cstr(path) {
        Ok(p) => p,
        Err(e) => {
            set_error(e);
            return -1;
        }
    };
    match session.delete_record(path_str.as_deref()) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(e) => {
            set_error(e.to_string());
            -1
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Apply a host log level (0 = VERBOSE .. 6 = NOTHING).
/// Returns 1 on success, 0 for an unknown level.
#[no_mangle]
pub extern "C" fn tau_set_log_level(level: u8) -> i32 {
    clear_error();
    match LogLevel::from_ordinal(level) {
        Some(l) => {
            tau_core::set_log_level(l);
            1
        }
        None => {
            set_error(format!("unknown log level: {}", level));
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Returns the release version (caller frees).
#[no_mangle]
pub extern "C" fn tau_version() -> *mut c_char {
    to_cstr(tau_core::VERSION.to_string())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_ref<'a>(handle: *mut SessionHandle) -> Result<&'a RecordSession, String> {
    if handle.is_null() {
        return Err("null session handle".into());
    }
    let inner = unsafe { &*(handle as *mut SessionHandleInner) };
    Ok(&inner.session)
}

fn read_cstr(ptr: *const c_char) -> Result<String, String> {
    if ptr.is_null() {
        return Err("null string pointer".into());
    }
    unsafe {
        CStr::from_ptr(ptr)
            .to_str()
            .map(String::from)
            .map_err(|_| "invalid utf-8".into())
    }
}

fn read_opt_cstr(ptr: *const c_char) -> Result<Option<String>, String> {
    if ptr.is_null() {
        return Ok(None);
    }
    read_cstr(ptr).map(Some)
}

fn json_to_cstr<T: serde::Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => to_cstr(json),
        Err(e) => err_null(e.to_string()),
    }
}

fn to_cstr(s: String) -> *mut c_char {
    CString::new(s)
        .map(|c| c.into_raw())
        .unwrap_or(ptr::null_mut())
}

fn err_null(msg: String) -> *mut c_char {
    set_error(msg);
    ptr::null_mut()
}

// ---------------------------------------------------------------------------
// FFI Integration Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Open a session via FFI in a temp directory. Returns (dir, handle, guard).
    fn ffi_session(app: &str) -> (TempDir, *mut SessionHandle, std::sync::MutexGuard<'static, ()>) {
        let guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let dir = TempDir::new().expect("tempdir");
        let root = CString::new(dir.path().to_str().unwrap()).unwrap();
        let app_c = CString::new(app).unwrap();
        unsafe {
            tau_set_root(root.as_ptr());
            let handle = tau_open(app_c.as_ptr());
            assert!(!handle.is_null(), "tau_open returned null");
            (dir, handle, guard)
        }
    }

    /// Read a *mut c_char into a String and free it.
    fn read_ffi_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null(), "FFI returned null string");
        let s = unsafe { CStr::from_ptr(ptr).to_str().unwrap().to_string() };
        unsafe { tau_string_free(ptr) };
        s
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    // -------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------

    #[test]
    fn ffi_version() {
        assert_eq!(read_ffi_string(tau_version()), "8.2.0");
    }

    #[test]
    fn ffi_codec_lookups() {
        assert_eq!(tau_codec_count(), 19);
        assert_eq!(read_ffi_string(tau_codec_at(0)), "opusWebM");
        assert_eq!(read_ffi_string(tau_codec_at(10)), "flac");
        assert_eq!(read_ffi_string(tau_mime_for(4)), "audio/mp3");
        assert_eq!(read_ffi_string(tau_format_for(7)), "wav");
    }

    #[test]
    fn ffi_raw_pcm_format_is_empty_not_null() {
        assert_eq!(read_ffi_string(tau_format_for(6)), "");
        assert!(tau_last_error().is_null());
    }

    #[test]
    fn ffi_out_of_range_sets_error() {
        assert!(tau_codec_at(-1).is_null());
        let msg = read_ffi_string(tau_last_error());
        assert!(msg.contains("out of range"));

        assert!(tau_mime_for(19).is_null());
        let msg = read_ffi_string(tau_last_error());
        assert!(msg.contains("19"));
    }

    #[test]
    fn ffi_codecs_json() {
        let json = read_ffi_string(tau_codecs_json());
        let rows: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.len(), 19);
        assert_eq!(rows[0]["codec"], "opusWebM");
        assert_eq!(rows[15]["format"], "");
    }

    #[test]
    fn ffi_set_log_level() {
        let before = log::max_level();
        assert_eq!(tau_set_log_level(6), 1);
        assert_eq!(log::max_level(), log::LevelFilter::Off);
        assert!(tau_last_error().is_null());
        log::set_max_level(before);

        assert_eq!(tau_set_log_level(7), 0);
        let msg = read_ffi_string(tau_last_error());
        assert!(msg.contains("unknown log level"));
    }

    #[test]
    fn ffi_capability_checks() {
        let recorder = c(r#"["audio/webm;codecs=opus"]"#);
        let player = c(r#"["audio/webm;codecs=opus", "audio/mp3"]"#);

        assert_eq!(tau_is_encoder_supported(0, recorder.as_ptr()), 1);
        assert_eq!(tau_is_encoder_supported(4, recorder.as_ptr()), 0);
        assert_eq!(tau_is_decoder_supported(4, player.as_ptr()), 1);
        assert_eq!(tau_is_decoder_supported(10, player.as_ptr()), 0);
        assert!(tau_last_error().is_null());
    }

    #[test]
    fn ffi_capability_errors() {
        let player = c(r#"["audio/mp3"]"#);
        assert_eq!(tau_is_decoder_supported(19, player.as_ptr()), -1);
        assert!(read_ffi_string(tau_last_error()).contains("out of range"));

        let bad = c("audio/mp3");
        assert_eq!(tau_is_encoder_supported(4, bad.as_ptr()), -1);
        assert!(read_ffi_string(tau_last_error()).contains("invalid mime type list"));

        assert_eq!(tau_is_encoder_supported(4, ptr::null()), -1);
        assert!(read_ffi_string(tau_last_error()).contains("null"));
    }

    // -------------------------------------------------------------------
    // Record URLs
    // -------------------------------------------------------------------

    #[test]
    fn ffi_open_close_lifecycle() {
        let (_dir, handle, _guard) = ffi_session("ffi-lifecycle");
        tau_close(handle);
    }

    #[test]
    fn ffi_instance_number_counts_opens() {
        let (_dir, first, _guard) = ffi_session("ffi-instances");
        let after_first = tau_instance_number();
        assert!(after_first >= 1);

        let app = c("ffi-instances");
        let second = unsafe { tau_open(app.as_ptr()) };
        assert!(!second.is_null());
        assert!(tau_instance_number() > after_first);

        tau_close(second);
        tau_close(first);
    }

    #[test]
    fn ffi_null_handle_returns_error() {
        let path = c("/recordings/a.wav");
        let ptr = tau_get_record_url(ptr::null_mut(), path.as_ptr());
        assert!(ptr.is_null());
        let msg = read_ffi_string(tau_last_error());
        assert!(msg.contains("null"));
    }

    #[test]
    fn ffi_save_get_delete() {
        let (_dir, handle, _guard) = ffi_session("ffi-records");
        let path = c("/recordings/a.wav");
        let url = c("blob:xyz");

        assert_eq!(tau_save_record_url(handle, path.as_ptr(), url.as_ptr()), 1);
        let got = read_ffi_string(tau_get_record_url(handle, path.as_ptr()));
        assert_eq!(got, "blob:xyz");

        // NULL path resolves through the last URL path.
        let got = read_ffi_string(tau_get_record_url(handle, ptr::null()));
        assert_eq!(got, "blob:xyz");

        assert_eq!(tau_delete_record(handle, ptr::null()), 1);
        assert_eq!(tau_delete_record(handle, path.as_ptr()), 0);
        assert!(tau_get_record_url(handle, path.as_ptr()).is_null());
        assert!(tau_last_error().is_null());

        tau_close(handle);
    }

    #[test]
    fn ffi_persistent_records_survive_reopen() {
        let (_dir, handle, _guard) = ffi_session("ffi-reopen");
        let path = c("/recordings/keep.webm");
        let url = c("blob:keep");
        let session_path = c("take-1");
        let session_url = c("blob:gone");

        assert_eq!(tau_save_record_url(handle, path.as_ptr(), url.as_ptr()), 1);
        assert_eq!(
            tau_save_record_url(handle, session_path.as_ptr(), session_url.as_ptr()),
            1
        );
        tau_close(handle);

        let app = c("ffi-reopen");
        let handle = unsafe { tau_open(app.as_ptr()) };
        assert!(!handle.is_null());
        assert_eq!(read_ffi_string(tau_get_record_url(handle, path.as_ptr())), "blob:keep");
        assert!(tau_get_record_url(handle, session_path.as_ptr()).is_null());
        tau_close(handle);
    }
}
