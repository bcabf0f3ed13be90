use fire_controller_core::FireError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - the error code passed across the FFI boundary
/// - `msg()` - the message kept for `fire_controller_get_last_error`
pub(crate) trait ControllerError {
    fn code(&self) -> FireControllerErrorCode;

    fn msg(&self) -> &str;
}

/// Default `ControllerError`: an error code plus a formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultControllerError {
    code: FireControllerErrorCode,
    msg: String,
}

impl DefaultControllerError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireControllerErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a parameter outside its accepted range.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireControllerErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<FireError> for DefaultControllerError {
    fn from(error: FireError) -> Self {
        let code = match error {
            FireError::InvalidConfig { .. }
            | FireError::ConfigLoad(_)
            | FireError::ConfigParse(_) => FireControllerErrorCode::InvalidConfig,
            FireError::UnknownFire(_) => FireControllerErrorCode::UnknownFire,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl ControllerError for DefaultControllerError {
    fn code(&self) -> FireControllerErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by fire controller functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireControllerErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Configuration rejected: a field is negative, non-finite, or the
    /// tree destruction time is not positive.
    InvalidConfig = 2,

    /// No live fire has the given id (never ignited or already destroyed).
    UnknownFire = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, FireControllerErrorCode)> =
        const { RefCell::new((None, FireControllerErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireControllerErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireControllerErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// FireControllerErrorCode err = fire_controller_apply_water(controller, fire, 1.0f);
/// if (err != FireControllerErrorCode_Ok) {
///     printf("Water failed: %s\n", fire_controller_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_controller_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `FireControllerErrorCode::Ok` (0) if the last call on this thread
/// succeeded.
#[no_mangle]
pub extern "C" fn fire_controller_get_last_error_code() -> FireControllerErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
