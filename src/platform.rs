use std::env::consts;
use std::fmt::Display;

/// Description of the platform a shared library is built for.
///
/// `os_type` is the kernel family (`windows`, `linux`, `darwin`, ...), while
/// `os_name` is the concrete system (`android`, `macos`, `ios`, ...).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Platform {
    pub arch: String,
    pub bits: u32,
    pub os_type: String,
    pub os_name: String,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Self {
        Self::from_parts(consts::ARCH, usize::BITS, consts::OS)
    }

    /// Builds a platform from an architecture, a pointer width and an OS name,
    /// normalising the spellings different tools use for the same thing.
    pub fn from_parts(arch: &str, bits: u32, os: &str) -> Self {
        let os_name = os.to_lowercase();
        let os_type = match os_name.as_str() {
            "macos" | "ios" | "darwin" => "darwin".to_string(),
            "android" => "linux".to_string(),
            other => other.to_string(),
        };
        let os_name = if os_name == "darwin" {
            "macos".to_string()
        } else {
            os_name
        };

        Platform {
            arch: normalize_arch(arch),
            bits,
            os_type,
            os_name,
        }
    }

    pub fn is_winnt(&self) -> bool {
        self.os_type == "windows"
    }

    pub fn is_posix(&self) -> bool {
        matches!(self.os_type.as_str(), "linux" | "darwin")
    }

    /// File extension of shared libraries, including the leading dot.
    pub fn shared_library_extension(&self) -> &'static str {
        match self.os_type.as_str() {
            "windows" => ".dll",
            "darwin" => ".dylib",
            _ => ".so",
        }
    }

    /// File name prefix the native toolchains put on shared libraries.
    pub fn shared_library_prefix(&self) -> &'static str {
        if self.is_winnt() {
            ""
        } else {
            "lib"
        }
    }

    /// `{arch}_{bits}`, e.g. `x86_64_64`.
    pub fn tag(&self) -> String {
        format!("{}_{}", self.arch, self.bits)
    }

    /// Library stem suffixed with the platform tag, e.g. `mylib_x86_64_64`.
    pub fn tagged_name(&self, stem: &str) -> String {
        format!("{}_{}", stem, self.tag())
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.tag(), self.os_name)
    }
}

fn normalize_arch(arch: &str) -> String {
    match arch.to_lowercase().as_str() {
        "amd64" | "x64" => "x86_64".to_string(),
        "x86" | "i386" | "i586" => "i686".to_string(),
        "arm64" => "aarch64".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_arch_spellings() {
        assert_eq!(Platform::from_parts("AMD64", 64, "windows").arch, "x86_64");
        assert_eq!(Platform::from_parts("x86", 32, "linux").arch, "i686");
        assert_eq!(Platform::from_parts("arm64", 64, "macos").arch, "aarch64");
        assert_eq!(Platform::from_parts("riscv64", 64, "linux").arch, "riscv64");
    }

    #[test]
    fn splits_os_type_and_name() {
        let mac = Platform::from_parts("aarch64", 64, "macos");
        assert_eq!(mac.os_type, "darwin");
        assert_eq!(mac.os_name, "macos");
        assert!(mac.is_posix());

        let android = Platform::from_parts("aarch64", 64, "android");
        assert_eq!(android.os_type, "linux");
        assert_eq!(android.os_name, "android");

        let darwin = Platform::from_parts("x86_64", 64, "Darwin");
        assert_eq!(darwin.os_name, "macos");

        let windows = Platform::from_parts("x86_64", 64, "windows");
        assert!(windows.is_winnt());
        assert!(!windows.is_posix());
    }

    #[test]
    fn library_naming() {
        let linux = Platform::from_parts("x86_64", 64, "linux");
        assert_eq!(linux.shared_library_extension(), ".so");
        assert_eq!(linux.shared_library_prefix(), "lib");
        assert_eq!(linux.tagged_name("mylib"), "mylib_x86_64_64");

        let windows = Platform::from_parts("x86", 32, "windows");
        assert_eq!(windows.shared_library_extension(), ".dll");
        assert_eq!(windows.shared_library_prefix(), "");
        assert_eq!(windows.tag(), "i686_32");

        let mac = Platform::from_parts("aarch64", 64, "macos");
        assert_eq!(mac.shared_library_extension(), ".dylib");
        assert_eq!(mac.to_string(), "aarch64_64-macos");
    }

    #[test]
    fn current_matches_pointer_width() {
        let platform = Platform::current();
        assert_eq!(platform.bits as usize, std::mem::size_of::<usize>() * 8);
        assert!(!platform.arch.is_empty());
    }
}
