/// Default state file name, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "previous_hash.txt";
