//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable which points at the root of the software checkout.
pub const SW_ROOT_ENV_VAR: &str = "CREATE_MOW_SW_ROOT";

/// Get the software root directory.
///
/// This is the value of `CREATE_MOW_SW_ROOT` if set, otherwise the current working directory.
pub fn get_sw_root() -> std::io::Result<PathBuf> {
    match std::env::var_os(SW_ROOT_ENV_VAR) {
        Some(p) => Ok(PathBuf::from(p)),
        None => std::env::current_dir()
    }
}
