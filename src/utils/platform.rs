//! Platform-specific helpers.

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the platform-appropriate git command name.
///
/// The command is resolved through PATH at execution time; this only
/// picks the conventional executable name per platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}
