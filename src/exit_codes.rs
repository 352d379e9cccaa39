//! Exit code constants for the deskscript CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid session state, bad subtask input)
//! - 2: Configuration error (unreadable or invalid config/profile)
//! - 3: I/O failure (writing scripts or the event log, operator prompts)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an operation attempted in the wrong state.
pub const USER_ERROR: i32 = 1;

/// Configuration error: the config file or compose profile is invalid.
pub const CONFIG_ERROR: i32 = 2;

/// I/O failure: a file could not be written or the terminal could not be read.
pub const IO_FAILURE: i32 = 3;
