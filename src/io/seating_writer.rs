use crate::{model::Seating, solvers::EngineStatus};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the seatings computed by the application.
///
/// The output begins with a status line (`s OPTIMUM FOUND`, `s SATISFIABLE`, `s UNSATISFIABLE` or `s UNKNOWN`).
/// When a seating is available, a line `t <members>` follows for each table,
/// then a line `w <weight>` giving the achieved weight.
///
/// # Example
///
/// ```
/// # use tcpc::io::SeatingWriter;
/// # use tcpc::solvers::EngineStatus;
/// let mut buffer = Vec::new();
/// SeatingWriter::default()
///     .write_no_seating(&mut buffer, EngineStatus::Unsatisfiable)
///     .unwrap();
/// assert_eq!("s UNSATISFIABLE\n", String::from_utf8(buffer).unwrap());
/// ```
#[derive(Default)]
pub struct SeatingWriter;

impl SeatingWriter {
    /// Writes a seating together with the status of the engine that computed it.
    pub fn write_seating(
        &self,
        writer: &mut dyn Write,
        status: EngineStatus,
        seating: &Seating,
    ) -> Result<()> {
        let context = "while writing a seating";
        writeln!(writer, "s {}", status).context(context)?;
        for t in seating.tables() {
            writeln!(writer, "t {}", t).context(context)?;
        }
        writeln!(writer, "w {}", seating.achieved_weight()).context(context)?;
        writer.flush().context(context)
    }

    /// Writes the status of an engine that computed no seating.
    pub fn write_no_seating(&self, writer: &mut dyn Write, status: EngineStatus) -> Result<()> {
        let context = "while writing a status";
        writeln!(writer, "s {}", status).context(context)?;
        writer.flush().context(context)
    }
}
