/// Line prefixes treated as comments in annotation files.
pub const COMMENT_PREFIXES: [&str; 2] = ["@", "#"];

pub const GZ_EXTENSION: &str = "gz";
