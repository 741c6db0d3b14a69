pub const EXIT_SUCCESS: i32 = 0;
/// Unrecoverable failure: unreadable input, unwritable output directory, or a
/// renderer error in the must-succeed chart tier.
pub const EXIT_FATAL: i32 = 2;
