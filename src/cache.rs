use crate::load::{load_with_options, Library, LoadOptions};
use crate::platform::Platform;
use anyhow::{anyhow, Result};
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

/// Identifies a load request: the same name may resolve differently
/// under different search directories or platforms.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct Source {
    name: String,
    search_dirs: Vec<PathBuf>,
    platform: Platform,
}

static CACHE: LazyLock<Mutex<HashMap<Source, Arc<Library>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock_cache() -> Result<MutexGuard<'static, HashMap<Source, Arc<Library>>>> {
    CACHE
        .lock()
        .map_err(|_| anyhow!("library cache lock poisoned"))
}

/// Runs `run` with the library `name`, opening it only on the first request
/// in this process. The lock is not held while `run` executes.
pub fn run_cached_load_with_options<T>(
    name: &str,
    options: &LoadOptions,
    run: impl FnOnce(&Library) -> Result<T>,
) -> Result<T> {
    let source = Source {
        name: name.to_string(),
        search_dirs: options.search_dirs.clone(),
        platform: options.platform.clone(),
    };

    let cached = lock_cache()?.get(&source).cloned();
    let lib = match cached {
        Some(lib) => {
            debug!("loading cache: {}", name);
            lib
        }
        None => {
            let lib = Arc::new(load_with_options(name, options)?);
            // another thread may have won the race, keep whichever came first
            lock_cache()?.entry(source).or_insert(lib).clone()
        }
    };

    run(&lib)
}

/// [`run_cached_load_with_options`] with options taken from the environment.
pub fn run_cached_load<T>(name: &str, run: impl FnOnce(&Library) -> Result<T>) -> Result<T> {
    run_cached_load_with_options(name, &LoadOptions::from_env(), run)
}
