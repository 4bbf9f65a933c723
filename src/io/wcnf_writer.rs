use crate::{
    encodings::{CardinalityEncoding, CnfFormula, SoftLiteral},
    model::Model,
    sat::Literal,
};
use anyhow::{Context, Result};
use std::io::Write;

/// The flavors of the weighted DIMACS format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WcnfFormat {
    /// The format used up to the 2021 MaxSAT evaluations: a `p wcnf` preamble and hard clauses weighted by the `top` value.
    Legacy,
    /// The format used since the 2022 MaxSAT evaluations: no preamble, hard clauses prefixed by `h`.
    #[default]
    Current,
}

/// A writer for models in the weighted DIMACS (WCNF) format, as read by MaxSAT engines.
///
/// Hard constraints are lowered to CNF first, with the auxiliary variables of the cardinality encodings numbered after the model variables.
/// Soft clauses are the unit clauses of the objective soft literals, with the weights divided by the objective [scale](crate::encodings::Objective::scale).
#[derive(Default)]
pub struct WcnfWriter {
    format: WcnfFormat,
    cardinality_encoding: CardinalityEncoding,
}

impl WcnfWriter {
    /// Builds a writer for the given format.
    pub fn new(format: WcnfFormat) -> Self {
        Self {
            format,
            cardinality_encoding: CardinalityEncoding::default(),
        }
    }

    /// Sets the encoding used to lower the cardinality constraints.
    pub fn set_cardinality_encoding(&mut self, cardinality_encoding: CardinalityEncoding) {
        self.cardinality_encoding = cardinality_encoding;
    }

    /// Writes the model.
    ///
    /// Returns the number of variables of the written instance, auxiliary ones included.
    pub fn write(&self, model: &Model, writer: &mut dyn Write) -> Result<usize> {
        let hard_clauses = model.hard_clauses(self.cardinality_encoding);
        let soft_literals = model.objective().soft_literals();
        self.write_formula(model, &hard_clauses, &soft_literals, writer)
            .context("while writing a WCNF instance")?;
        Ok(hard_clauses.n_vars())
    }

    fn write_formula(
        &self,
        model: &Model,
        hard_clauses: &CnfFormula,
        soft_literals: &[SoftLiteral],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let stats = model.stats();
        writeln!(
            writer,
            "c seating of {} students, {} at 2-seat tables",
            stats.n_students, stats.two_seat_count
        )?;
        writeln!(
            writer,
            "c objective mode {}; soft weights are in units of {}/8",
            model.mode(),
            model.objective().scale()
        )?;
        let hard_prefix = match self.format {
            WcnfFormat::Legacy => {
                let top = 1 + soft_literals.iter().map(|s| s.weight()).sum::<u64>();
                writeln!(
                    writer,
                    "p wcnf {} {} {}",
                    hard_clauses.n_vars(),
                    hard_clauses.n_clauses() + soft_literals.len(),
                    top
                )?;
                top.to_string()
            }
            WcnfFormat::Current => "h".to_string(),
        };
        for cl in hard_clauses.clauses() {
            write_clause(writer, &hard_prefix, cl)?;
        }
        for s in soft_literals {
            write_clause(writer, &s.weight().to_string(), &[s.lit()])?;
        }
        writer.flush()
    }
}

fn write_clause(writer: &mut dyn Write, prefix: &str, lits: &[Literal]) -> std::io::Result<()> {
    write!(writer, "{}", prefix)?;
    for l in lits {
        write!(writer, " {}", l)?;
    }
    writeln!(writer, " 0")
}
