//! Loads `mylib` and calls each of its exports.
//!
//! Usage: `mylib_main [library]`. The library defaults to `mylib`, looked up
//! in `CALLCONV_LIB_DIR` and the working directory, e.g.
//! `CALLCONV_LIB_DIR=target/debug cargo run -p mylib_main`.

use anyhow::Result;
use callconv::hexlify::{hexlify, hexlify_address};
use callconv::{run_cached_load, Library, Platform};
use log::debug;
use std::env;
use std::os::raw::{c_char, c_int};
use std::ptr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn call_exports(lib: &Library) -> Result<()> {
    // `int&` crosses the boundary as a non-null `int*`
    let change_ptr_var = unsafe { lib.get_function::<(*mut c_int,), ()>("change_ptr_var")? };
    let change_ref_var = unsafe { lib.get_function::<(*mut c_int,), ()>("change_ref_var")? };
    let print_message = unsafe { lib.get_function::<(*const c_char,), ()>("print_message")? };
    let c_invoke_print_message = unsafe { lib.get_function::<(), ()>("c_invoke_print_message")? };

    debug!("change_ptr_var at {}", hexlify_address(change_ptr_var.address()));
    debug!("print_message at {}", hexlify_address(print_message.address()));

    let mut value: c_int = 0;
    change_ptr_var.call((&mut value as *mut c_int,));
    println!("change_ptr_var(&value) -> {}", value);
    debug!("value bytes: {}", hexlify(value.to_ne_bytes()));

    change_ptr_var.call((ptr::null_mut(),));
    println!("change_ptr_var(NULL) -> no change");

    change_ref_var.call((&mut value as *mut c_int,));
    println!("change_ref_var(value) -> {}", value);
    debug!("value bytes: {}", hexlify(value.to_ne_bytes()));

    print_message.call((c"This is a string from host code".as_ptr(),));
    c_invoke_print_message.call(());

    Ok(())
}

fn main() -> Result<()> {
    init_logger();

    let name = env::args().nth(1).unwrap_or_else(|| "mylib".to_string());
    println!("callconv with `{}`", Platform::current());

    run_cached_load(&name, |lib| {
        debug!("using {}", lib.path().display());
        call_exports(lib)
    })
}
