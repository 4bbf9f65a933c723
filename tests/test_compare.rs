mod common;

use common::*;
use predicates::prelude::predicate;

macro_rules! test_duality {
    ($instance:ident, $encoding:literal, $weight:literal) => {
        paste::item! {
            #[test]
            fn [< test_duality_ $instance:lower _ $encoding >] () -> Result<(), Box<dyn std::error::Error>> {
                let (mut cmd, file) = command_for_instance("compare", $instance)?;
                cmd.arg("--cardinality-encoding")
                    .arg($encoding)
                    .assert()
                    .success()
                    .stdout(predicate::eq(concat!("max ", $weight, "\nmin ", $weight, "\n")));
                file.close()?;
                Ok(())
            }
        }
    };
}

test_duality!(GROUPED_7, "seqcounter", "7");
test_duality!(GROUPED_7, "pairwise", "7");
test_duality!(EMPTY_7, "seqcounter", "0");
test_duality!(GROUPED_12, "pairwise", "12");

#[test]
fn test_duality_scattered() -> Result<(), Box<dyn std::error::Error>> {
    let (mut cmd, file) = command_for_instance("compare", SCATTERED_7)?;
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match("^max ([0-9.]+)\nmin ([0-9.]+)\n$")?);
    file.close()?;
    Ok(())
}
