#![allow(dead_code)]

pub const GROUPED_7: &str = r#"7
1 2
2 1
3 4
4 3
5 6 7
6 5 7
7 5 6
"#;

pub const EMPTY_7: &str = "7\n";

pub const GROUPED_12: &str = r#"12
1 2
2 1
3 4
4 3
5 6
6 5
7 8 9
8 7 9
9 7 8
10 11 12
11 10 12
12 10 11
"#;

pub const SCATTERED_7: &str = r#"7
1 2 3
2 3 7
3 1 2
4 5
5 1 6
6 4 5
7 4
"#;

pub const TOO_SMALL: &str = "6\n1 2\n";

pub const MALFORMED: &str = "7\n1 x\n";

use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};

/// Writes an instance to a temporary file and builds a command running `tcpc` on it.
pub fn command_for_instance(
    subcommand: &str,
    instance: &str,
) -> Result<(Command, NamedTempFile), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("preferences.txt")?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("tcpc")?;
    cmd.arg(subcommand)
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off");
    Ok((cmd, file))
}
