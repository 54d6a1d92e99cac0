/// Error code registry for geotally
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors (fatal, raised before any shard work)
/// - 2000-2999: Line errors (recoverable, local to one input line)
/// - 3000-3999: I/O errors
/// - 4000-4999: Execution errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_JSON: u16 = 1002;
    pub const CONFIG_INVALID_TOML: u16 = 1003;
    pub const CONFIG_INVALID_VALUE: u16 = 1004;
    pub const CONFIG_MISSING_HEADER: u16 = 1005;
    pub const CONFIG_NO_WORKERS: u16 = 1006;
    pub const CONFIG_EMPTY_GRID: u16 = 1007;
    pub const CONFIG_INVALID_FEATURE: u16 = 1008;

    // Line errors (2000-2999)
    pub const LINE_GENERIC: u16 = 2000;
    pub const LINE_INVALID_JSON: u16 = 2001;

    // I/O errors (3000-3999)
    pub const IO_GENERIC: u16 = 3000;
    pub const IO_READ_FAILED: u16 = 3001;
    pub const IO_WRITE_FAILED: u16 = 3002;

    // Execution errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_WORKER_PANICKED: u16 = 4001;
    pub const EXEC_WORKER_CANCELLED: u16 = 4002;
    pub const EXEC_CHANNEL_CLOSED: u16 = 4003;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1000 => "Generic configuration error",
        1001 => "Input file not found",
        1002 => "Invalid JSON in input definition",
        1003 => "Invalid TOML in configuration file",
        1004 => "Invalid value in configuration",
        1005 => "Event file header has no total row count",
        1006 => "Worker count must be at least one",
        1007 => "Grid definition has no features",
        1008 => "Grid feature is not a usable rectangle",

        2000 => "Generic line error",
        2001 => "Line is not valid JSON",

        3000 => "Generic I/O error",
        3001 => "Failed to read input",
        3002 => "Failed to write output",

        4000 => "Generic execution error",
        4001 => "Worker task panicked",
        4002 => "Worker task was cancelled",
        4003 => "Worker channel closed before assignment",

        _ => "Unknown error code",
    }
}
