use super::StopCondition;
use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::{
    io::{Read, Write},
    process::{Command, Stdio},
    thread,
    time::Duration,
};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The way an external solver process ended.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ProcessOutcome {
    /// The process exited by itself; its standard output is given.
    Finished(String),
    /// The stop condition was reached and the process was killed.
    Stopped,
}

/// Runs an external solver, feeding `input` to its standard input and collecting its standard output.
///
/// The process is polled until it exits.
/// If the stop condition is reached before, the process is killed and waited for,
/// so that no solver keeps running after the caller gave up.
/// Feeding and draining the pipes happen in helper threads that end when the pipes close.
pub(crate) fn run_solver_process<R>(
    program: &str,
    options: &[String],
    mut input: R,
    stop_condition: &StopCondition,
) -> Result<ProcessOutcome>
where
    R: Read + Send + 'static,
{
    let mut child = Command::new(program)
        .args(options)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!(r#"while spawning the external solver "{}""#, program))?;
    debug!("external solver started with pid {}", child.id());
    let mut stdin = child
        .stdin
        .take()
        .context("failed to open the standard input of the external solver")?;
    thread::spawn(move || {
        // the solver may exit without reading its whole input
        let _ = std::io::copy(&mut input, &mut stdin).and_then(|_| stdin.flush());
    });
    let mut stdout = child
        .stdout
        .take()
        .context("failed to open the standard output of the external solver")?;
    let output_reader = thread::spawn(move || {
        let mut buffer = String::new();
        stdout.read_to_string(&mut buffer).map(|_| buffer)
    });
    loop {
        if child
            .try_wait()
            .context("while waiting for the external solver")?
            .is_some()
        {
            break;
        }
        if stop_condition.is_stopped() {
            warn!("stop condition reached; killing external solver {}", child.id());
            child
                .kill()
                .context("while killing the external solver")?;
            child
                .wait()
                .context("while waiting for the killed external solver")?;
            return Ok(ProcessOutcome::Stopped);
        }
        thread::sleep(POLL_INTERVAL);
    }
    let output = output_reader
        .join()
        .map_err(|_| anyhow!("the thread reading the external solver output panicked"))?
        .context("while reading the external solver output")?;
    Ok(ProcessOutcome::Finished(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let outcome = run_solver_process(
            "echo",
            &["s UNSATISFIABLE".to_string()],
            "p cnf 0 0\n".as_bytes(),
            &StopCondition::never(),
        )
        .unwrap();
        assert_eq!(
            ProcessOutcome::Finished("s UNSATISFIABLE\n".to_string()),
            outcome
        );
    }

    #[test]
    fn test_reads_input() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let outcome =
            run_solver_process("cat", &[], "c hello\n".as_bytes(), &StopCondition::never())
                .unwrap();
        assert_eq!(ProcessOutcome::Finished("c hello\n".to_string()), outcome);
    }

    #[test]
    fn test_killed_on_stop() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let stop = StopCondition::with_timeout(Duration::from_millis(100));
        let outcome = run_solver_process("sleep", &["30".to_string()], std::io::empty(), &stop)
            .unwrap();
        assert_eq!(ProcessOutcome::Stopped, outcome);
    }

    #[test]
    fn test_unknown_program() {
        assert!(run_solver_process(
            "/this/program/does/not/exist",
            &[],
            std::io::empty(),
            &StopCondition::never()
        )
        .is_err());
    }
}
