pub mod cache;
pub mod hexlify;
pub mod load;
pub mod platform;
mod type_utils;

pub use cache::{run_cached_load, run_cached_load_with_options};
pub use load::{
    candidate_paths, load_external_shared_library, load_with_options, Function, Library,
    LoadError, LoadOptions,
};
pub use platform::Platform;
pub use type_utils::CallArgs;
