use crate::platform::Platform;
use crate::type_utils::CallArgs;
use anyhow::{Context, Result};
#[cfg(unix)]
use libloading::os::unix::{
    Library as LLNativeLibrary, // LL means libloading
    RTLD_LOCAL,
    RTLD_NOW,
};
#[cfg(windows)]
use libloading::os::windows::Library as LLNativeLibrary;
use libloading::Symbol;
use log::{debug, trace};
use std::env;
use std::ffi::{c_void, OsString};
use std::fmt::Display;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Environment variable holding an extra directory to search for libraries.
pub const LIB_DIR_ENV: &str = "CALLCONV_LIB_DIR";

#[derive(Debug)]
pub enum LoadError {
    NotFound { name: String, tried: Vec<PathBuf> },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound { name, tried } => {
                write!(f, "Shared library {} not found (tried:", name)?;
                for path in tried {
                    write!(f, " {}", path.display())?;
                }
                write!(f, ")")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Where and for which platform to look for a shared library.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub search_dirs: Vec<PathBuf>,
    pub platform: Platform,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            search_dirs: env::current_dir().into_iter().collect(),
            platform: Platform::current(),
        }
    }
}

impl LoadOptions {
    /// Defaults, with `CALLCONV_LIB_DIR` searched before the working directory.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(dir) = env::var_os(LIB_DIR_ENV) {
            options.search_dirs.insert(0, PathBuf::from(dir));
        }
        options
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }
}

/// An opened native shared library.
///
/// Dropping it unloads the library, so every [`Function`] borrows from it.
#[derive(Debug)]
pub struct Library {
    raw_library: libloading::Library,
    path: PathBuf,
}

impl Library {
    pub(crate) fn new(raw_library: libloading::Library, path: PathBuf) -> Self {
        Library { raw_library, path }
    }

    /// The candidate path the library was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address of an exported symbol.
    pub fn symbol_address(&self, name: &str) -> Result<usize> {
        let symbol: Symbol<*mut c_void> = unsafe { self.raw_library.get(name.as_bytes())? };
        Ok(*symbol as usize)
    }

    /// Retrieves an exported function with a typed C signature.
    ///
    /// # Safety
    ///
    /// The symbol must be a function taking `Args` and returning `Res` with
    /// the C calling convention. Nothing checks this.
    pub unsafe fn get_function<Args, Res>(&self, name: &str) -> Result<Function<'_, Args, Res>>
    where
        Args: CallArgs<Res>,
    {
        let address = self.symbol_address(name)?;
        let symbol: Symbol<Args::FnPtr> = self.raw_library.get(name.as_bytes())?;
        trace!("{}: {} at {:#x}", self.path.display(), name, address);

        Ok(Function {
            symbol,
            address,
            _signature: PhantomData,
        })
    }
}

/// A function exported by a [`Library`], callable as long as the library lives.
pub struct Function<'lib, Args, Res>
where
    Args: CallArgs<Res>,
{
    symbol: Symbol<'lib, Args::FnPtr>,
    address: usize,
    _signature: PhantomData<fn(Args) -> Res>,
}

impl<Args, Res> Function<'_, Args, Res>
where
    Args: CallArgs<Res>,
{
    pub fn call(&self, args: Args) -> Res {
        // the signature was vouched for in `Library::get_function`
        unsafe { args.call_with(*self.symbol) }
    }

    pub fn address(&self) -> usize {
        self.address
    }
}

#[cfg(unix)]
unsafe fn libloading_load(path: &Path) -> Result<libloading::Library> {
    let lib = LLNativeLibrary::open(Some(path), RTLD_NOW | RTLD_LOCAL)?;
    Ok(lib.into())
}

#[cfg(windows)]
unsafe fn libloading_load(path: &Path) -> Result<libloading::Library> {
    let lib = LLNativeLibrary::new(path)?;
    Ok(lib.into())
}

fn with_extension_appended(path: &Path, extension: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(extension);
    PathBuf::from(s)
}

/// Every path `name` may refer to, in the order they are tried.
///
/// The bare name comes first, then the name with the platform extension, then
/// both with the platform `lib` prefix, and finally all of those joined onto
/// each search directory (relative names only).
pub fn candidate_paths(name: &str, options: &LoadOptions) -> Vec<PathBuf> {
    let given = PathBuf::from(name);
    let platform = &options.platform;

    let mut names = vec![given.clone()];
    if given.extension().is_none() {
        names.push(with_extension_appended(
            &given,
            platform.shared_library_extension(),
        ));
    }

    let prefix = platform.shared_library_prefix();
    if !prefix.is_empty() {
        let prefixed: Vec<PathBuf> = names
            .iter()
            .filter_map(|n| {
                let file_name = n.file_name()?.to_str()?;
                (!file_name.starts_with(prefix))
                    .then(|| n.with_file_name(format!("{}{}", prefix, file_name)))
            })
            .collect();
        names.extend(prefixed);
    }

    let mut candidates = names.clone();
    if given.is_relative() {
        for dir in &options.search_dirs {
            candidates.extend(names.iter().map(|n| dir.join(n)));
        }
    }

    let mut seen = Vec::with_capacity(candidates.len());
    for c in candidates {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

/// Opens the first candidate of `name` that loads.
///
/// A candidate that exists on disk but fails to open is reported as is;
/// if nothing is found at all the error is a [`LoadError::NotFound`].
pub fn load_with_options(name: &str, options: &LoadOptions) -> Result<Library> {
    debug!("load with {}: {}", options.platform, name);

    let candidates = candidate_paths(name, options);

    for candidate in &candidates {
        trace!("trying: {}", candidate.display());

        match unsafe { libloading_load(candidate) } {
            Ok(lib) => {
                debug!("loaded: {}", candidate.display());
                return Ok(Library::new(lib, candidate.clone()));
            }
            Err(e) if candidate.is_file() => {
                return Err(e).with_context(|| format!("Failed to open {}", candidate.display()));
            }
            Err(e) => trace!("{}: {}", candidate.display(), e),
        }
    }

    Err(LoadError::NotFound {
        name: name.to_string(),
        tried: candidates,
    }
    .into())
}

/// Loads an external shared library given as `file_name`, `file_name.ext` or
/// `path/to/file_name.ext`, searching `CALLCONV_LIB_DIR` and the working directory.
pub fn load_external_shared_library(name: &str) -> Result<Library> {
    load_with_options(name, &LoadOptions::from_env())
}
