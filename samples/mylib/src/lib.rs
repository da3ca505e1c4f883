//! A tiny shared library exporting a few `extern "C"` functions.
//!
//! Every symbol is exported unmangled with the platform C calling convention,
//! so any host able to `dlopen`/`LoadLibrary` the built `cdylib` can call it.

use std::ffi::CStr;
use std::io::{self, Write};
use std::os::raw::{c_char, c_int};

/// Value written by [`change_ptr_var`].
pub const PTR_VALUE: c_int = 123;
/// Value written by [`change_ref_var`].
pub const REF_VALUE: c_int = 456;

const C_MESSAGE: &CStr = c"This is a string from C code";

/// Writes [`PTR_VALUE`] through `pvar`. A null pointer is ignored.
///
/// # Safety
///
/// `pvar` must be null or point to a writable, aligned `int`.
#[no_mangle]
pub unsafe extern "C" fn change_ptr_var(pvar: *mut c_int) {
    if let Some(var) = pvar.as_mut() {
        *var = PTR_VALUE;
    }
}

/// Writes [`REF_VALUE`] to the bound storage.
///
/// On the C side this is an `int&`: a pointer that is never null.
#[no_mangle]
pub extern "C" fn change_ref_var(var: &mut c_int) {
    *var = REF_VALUE;
}

/// Prints `message` followed by a newline to stdout.
///
/// # Safety
///
/// `message` must point to a NUL-terminated string that stays valid for the
/// duration of the call.
#[no_mangle]
pub unsafe extern "C" fn print_message(message: *const c_char) {
    if message.is_null() {
        return;
    }

    let message = CStr::from_ptr(message);
    // a void C function has nowhere to report a broken stdout
    let _ = write_message(&mut io::stdout().lock(), message);
}

/// Calls [`print_message`] from inside the library with a fixed literal.
#[no_mangle]
pub extern "C" fn c_invoke_print_message() {
    unsafe { print_message(C_MESSAGE.as_ptr()) }
}

fn write_message<W: Write>(out: &mut W, message: &CStr) -> io::Result<()> {
    out.write_all(message.to_bytes())?;
    out.write_all(b"\n")?;
    // the host may own a separate stdout buffer, keep output ordered
    out.flush()
}
