use crate::{
    encodings::HardConstraint,
    model::{EncodingMode, Model},
    sat::{Literal, Variable},
};
use anyhow::{anyhow, Context, Result};
use std::io::Write;

const TERMS_PER_LINE: usize = 8;

/// A writer for models in the CPLEX LP format, as read by mixed-integer programming engines.
///
/// Variables are named after the tables they stand for (`x_1_2`, `x_1_2_3`) and the seat indicators (`y_1`).
/// Cardinality constraints are written as linear (in)equalities, without lowering;
/// a clause `l1 ∨ ... ∨ ln` becomes the inequality stating that the sum of its literals is at least 1,
/// where a negative literal `¬x` counts as `1 - x`.
///
/// # Example
///
/// ```
/// # use tcpc::io::LpWriter;
/// # use tcpc::model::{EncodingMode, Model, PreferenceGraph};
/// let preferences = PreferenceGraph::new_with_preferences(7, &[(1, vec![2]), (2, vec![1])]).unwrap();
/// let model = Model::build(&preferences, EncodingMode::Maximize).unwrap();
/// let mut buffer = Vec::new();
/// LpWriter::default().write(&model, &mut buffer).unwrap();
/// let content = String::from_utf8(buffer).unwrap();
/// assert!(content.contains(" obj: 2 x_1_2\n"));
/// ```
#[derive(Default)]
pub struct LpWriter;

impl LpWriter {
    /// Writes the model.
    pub fn write(&self, model: &Model, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing an LP instance";
        let stats = model.stats();
        writeln!(
            writer,
            "\\ seating of {} students, {} at 2-seat tables",
            stats.n_students, stats.two_seat_count
        )
        .context(context)?;
        self.write_objective(model, writer).context(context)?;
        writeln!(writer, "Subject To").context(context)?;
        for (i, c) in model.hard_constraints().iter().enumerate() {
            self.write_constraint(model, i + 1, c, writer)
                .context(context)?;
        }
        writeln!(writer, "Binary").context(context)?;
        for v in 1..=model.indexer().n_vars() {
            writeln!(writer, " {}", name_of(model, Variable::from(v))?).context(context)?;
        }
        writeln!(writer, "End").context(context)?;
        writer.flush().context(context)
    }

    fn write_objective(&self, model: &Model, writer: &mut dyn Write) -> Result<()> {
        match model.mode() {
            EncodingMode::Maximize => writeln!(writer, "Maximize")?,
            EncodingMode::Minimize => writeln!(writer, "Minimize")?,
        }
        let terms = model.objective().terms();
        if terms.is_empty() {
            writeln!(writer, " obj: 0 {}", name_of(model, model.indexer().seat_var(1))?)?;
            return Ok(());
        }
        let mut words = Vec::with_capacity(terms.len());
        for (i, t) in terms.iter().enumerate() {
            let sign = if i == 0 { "" } else { "+ " };
            words.push(format!(
                "{}{} {}",
                sign,
                t.coefficient(),
                name_of(model, t.var())?
            ));
        }
        write_wrapped(writer, "obj:", &words, "")
    }

    fn write_constraint(
        &self,
        model: &Model,
        index: usize,
        constraint: &HardConstraint,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let lits = constraint.lits();
        let mut words = Vec::with_capacity(lits.len());
        for (i, l) in lits.iter().enumerate() {
            words.push(signed_name(model, *l, i == 0)?);
        }
        let n_negative = lits.iter().filter(|l| !l.is_positive()).count() as isize;
        let rhs = match constraint {
            HardConstraint::Clause(_) => format!(">= {}", 1 - n_negative),
            HardConstraint::AtMost { bound, .. } => {
                format!("<= {}", *bound as isize - n_negative)
            }
            HardConstraint::Exactly { bound, .. } => {
                format!("= {}", *bound as isize - n_negative)
            }
        };
        write_wrapped(writer, &format!("c{}:", index), &words, &rhs)
    }
}

fn name_of(model: &Model, var: Variable) -> Result<String> {
    model
        .indexer()
        .symbol_of(var)
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("variable {} is not a model variable", var))
}

fn signed_name(model: &Model, lit: Literal, first: bool) -> Result<String> {
    let name = name_of(model, lit.var())?;
    Ok(match (lit.is_positive(), first) {
        (true, true) => name,
        (true, false) => format!("+ {}", name),
        (false, _) => format!("- {}", name),
    })
}

fn write_wrapped(writer: &mut dyn Write, label: &str, words: &[String], rhs: &str) -> Result<()> {
    write!(writer, " {}", label)?;
    for (i, w) in words.iter().enumerate() {
        if i > 0 && i % TERMS_PER_LINE == 0 {
            write!(writer, "\n   ")?;
        }
        write!(writer, " {}", w)?;
    }
    if rhs.is_empty() {
        writeln!(writer)?;
    } else {
        writeln!(writer, " {}", rhs)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreferenceGraph;

    fn write_to_string(model: &Model) -> String {
        let mut buffer = Vec::new();
        LpWriter::default().write(model, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn grouped_model(mode: EncodingMode) -> Model {
        let preferences = PreferenceGraph::new_with_preferences(
            7,
            &[
                (1, vec![2]),
                (2, vec![1]),
                (3, vec![4]),
                (4, vec![3]),
                (5, vec![6, 7]),
                (6, vec![5, 7]),
                (7, vec![5, 6]),
            ],
        )
        .unwrap();
        Model::build(&preferences, mode).unwrap()
    }

    #[test]
    fn test_sections() {
        let content = write_to_string(&grouped_model(EncodingMode::Maximize));
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!("\\ seating of 7 students, 4 at 2-seat tables", lines[0]);
        assert_eq!("Maximize", lines[1]);
        assert_eq!(
            " obj: 2 x_1_2 + 2 x_3_4 + 2 x_5_6 + 2 x_5_7 + 2 x_6_7 + 3 x_5_6_7",
            lines[2]
        );
        assert_eq!("Subject To", lines[3]);
        assert_eq!("End", *lines.last().unwrap());
        let binary_index = lines.iter().position(|l| *l == "Binary").unwrap();
        assert_eq!(21 + 35 + 7 + 2, lines.len() - binary_index);
        assert_eq!(" x_1_2", lines[binary_index + 1]);
        assert_eq!(" y_7", lines[lines.len() - 2]);
    }

    #[test]
    fn test_constraints() {
        let content = write_to_string(&grouped_model(EncodingMode::Maximize));
        assert!(content.contains(" - x_1_2 + y_1 >= 0\n"));
        assert!(content.contains(" - x_1_2_3 - y_1 >= -1\n"));
        assert!(content
            .lines()
            .any(|l| l.ends_with("y_5 + y_6 + y_7 = 4")));
        assert!(content.lines().any(|l| l.ends_with(" <= 1")));
    }

    #[test]
    fn test_minimize_objective() {
        let content = write_to_string(&grouped_model(EncodingMode::Minimize));
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!("Minimize", lines[1]);
        assert!(lines[2].starts_with(" obj: 2 x_1_3 + 2 x_1_4"));
        assert!(lines[3].starts_with("    + "));
    }

    #[test]
    fn test_empty_objective() {
        let content = write_to_string(
            &Model::build(&PreferenceGraph::new(7), EncodingMode::Maximize).unwrap(),
        );
        assert!(content.contains(" obj: 0 y_1\n"));
    }

    #[test]
    fn test_fractional_coefficients() {
        let preferences = PreferenceGraph::new_with_preferences(
            7,
            &[(1, vec![2]), (2, vec![3]), (3, vec![1, 2])],
        )
        .unwrap();
        let content = write_to_string(&Model::build(&preferences, EncodingMode::Maximize).unwrap());
        assert!(content.contains(" obj: 2 x_2_3 + 0.75 x_1_2_3\n"));
    }
}
