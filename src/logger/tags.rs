/// Log tags identifying the subsystem a message originates from
///
/// Each tag maps to a --debug-<tag> command-line flag for per-module
/// debug output.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Cache,
    Fetch,
    Preload,
}

impl LogTag {
    /// Plain uppercase name used in file logs and alignment
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Cache => "CACHE",
            LogTag::Fetch => "FETCH",
            LogTag::Preload => "PRELOAD",
        }
    }

    /// Lowercase key matched against --debug-<key> flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Cache => "cache",
            LogTag::Fetch => "fetch",
            LogTag::Preload => "preload",
        }
    }
}
