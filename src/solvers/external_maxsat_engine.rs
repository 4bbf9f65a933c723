use super::specs::{EngineResult, EngineStatus, OptimizationEngine};
use crate::{
    encodings::CardinalityEncoding,
    io::{WcnfFormat, WcnfWriter},
    model::Model,
    sat::Assignment,
    utils::{
        process_runner::{self, ProcessOutcome},
        StopCondition,
    },
};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use std::io::Cursor;

/// An optimization engine delegating the search to an external MaxSAT solver.
///
/// The model is written in the WCNF format and given to the standard input of the solver.
/// The output of the solver must follow the conventions of the MaxSAT evaluations:
/// a status line `s OPTIMUM FOUND`, `s SATISFIABLE`, `s UNSATISFIABLE` or `s UNKNOWN`,
/// cost lines `o <cost>` (the last one is kept),
/// and value lines `v` made of either a list of literals or a single string of `0` and `1`.
///
/// When the stop condition is reached, the solver process is killed and the status is [EngineStatus::Unknown].
pub struct ExternalMaxSatEngine {
    program: String,
    options: Vec<String>,
    format: WcnfFormat,
    cardinality_encoding: CardinalityEncoding,
}

impl ExternalMaxSatEngine {
    /// Builds a new engine running `program` with the given CLI options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tcpc::model::{EncodingMode, Model, PreferenceGraph};
    /// # use tcpc::solvers::{ExternalMaxSatEngine, OptimizationEngine};
    /// # use tcpc::utils::StopCondition;
    /// let model = Model::build(&PreferenceGraph::new(7), EncodingMode::Maximize).unwrap();
    /// let mut engine = ExternalMaxSatEngine::new("/home/me/my_maxsat_solver".to_string(), vec![]);
    /// let result = engine.optimize(&model, &StopCondition::never()).unwrap();
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            program,
            options,
            format: WcnfFormat::default(),
            cardinality_encoding: CardinalityEncoding::default(),
        }
    }

    /// Sets the WCNF flavor given to the solver.
    pub fn set_format(&mut self, format: WcnfFormat) {
        self.format = format;
    }

    /// Sets the encoding used to lower the cardinality constraints of the model.
    pub fn set_cardinality_encoding(&mut self, cardinality_encoding: CardinalityEncoding) {
        self.cardinality_encoding = cardinality_encoding;
    }
}

impl OptimizationEngine for ExternalMaxSatEngine {
    fn optimize(&mut self, model: &Model, stop_condition: &StopCondition) -> Result<EngineResult> {
        let mut writer = WcnfWriter::new(self.format);
        writer.set_cardinality_encoding(self.cardinality_encoding);
        let mut instance = Vec::new();
        let n_vars = writer.write(model, &mut instance)?;
        info!(
            r#"running external MaxSAT solver "{}" on an instance of {} variables"#,
            self.program, n_vars
        );
        match process_runner::run_solver_process(
            &self.program,
            &self.options,
            Cursor::new(instance),
            stop_condition,
        )? {
            ProcessOutcome::Finished(output) => {
                let result = parse_output(&output, n_vars)
                    .context("while parsing the output of the external MaxSAT solver")?;
                info!(
                    "external MaxSAT solver answered {} (reported cost: {:?})",
                    result.status(),
                    result.reported_cost()
                );
                Ok(result)
            }
            ProcessOutcome::Stopped => Ok(EngineResult::without_assignment(EngineStatus::Unknown)),
        }
    }
}

fn parse_status(words: &[&str]) -> Result<EngineStatus> {
    match words.join(" ").as_str() {
        "OPTIMUM FOUND" => Ok(EngineStatus::Optimal),
        "SATISFIABLE" => Ok(EngineStatus::Feasible),
        "UNSATISFIABLE" => Ok(EngineStatus::Unsatisfiable),
        "UNKNOWN" => Ok(EngineStatus::Unknown),
        s => Err(anyhow!(r#"unknown status "{}""#, s)),
    }
}

fn is_bit_string(words: &[&str]) -> bool {
    words.len() == 1 && words[0].len() > 1 && words[0].chars().all(|c| c == '0' || c == '1')
}

fn read_values(words: &[&str], values: &mut Vec<Option<bool>>) -> Result<()> {
    let mut set = |index: usize, value: bool| {
        if index >= values.len() {
            values.resize(index + 1, None);
        }
        values[index] = Some(value);
    };
    if is_bit_string(words) {
        words[0]
            .chars()
            .enumerate()
            .for_each(|(i, c)| set(i, c == '1'));
        return Ok(());
    }
    for w in words {
        let n = w
            .parse::<isize>()
            .map_err(|_| anyhow!(r#""{}" is not a literal"#, w))?;
        if n != 0 {
            set(n.unsigned_abs() - 1, n > 0);
        }
    }
    Ok(())
}

fn parse_output(output: &str, n_vars: usize) -> Result<EngineResult> {
    let mut status = None;
    let mut cost = None;
    let mut values: Option<Vec<Option<bool>>> = None;
    for (i, line) in output.lines().enumerate() {
        let context = || format!("at line {}", i + 1);
        let words = line.split_ascii_whitespace().collect::<Vec<_>>();
        match words.first() {
            None | Some(&"c") => {}
            Some(&"s") => {
                let s = parse_status(&words[1..]).with_context(context)?;
                if status.replace(s).is_some() {
                    return Err(anyhow!("multiple status lines")).with_context(context);
                }
            }
            Some(&"o") => {
                let c = words
                    .get(1)
                    .and_then(|w| w.parse::<u64>().ok())
                    .ok_or_else(|| anyhow!("expected a cost"))
                    .with_context(context)?;
                cost = Some(c);
            }
            Some(&"v") => {
                let v = values.get_or_insert_with(|| vec![None; n_vars]);
                read_values(&words[1..], v).with_context(context)?;
            }
            Some(w) => {
                return Err(anyhow!(r#"unexpected line start "{}""#, w)).with_context(context)
            }
        }
    }
    match status {
        None => bail!("missing status line"),
        Some(s @ (EngineStatus::Optimal | EngineStatus::Feasible)) => match values {
            Some(v) => Ok(EngineResult::with_assignment(s, Assignment::new(v), cost)),
            None => bail!("status {} given without values", s),
        },
        Some(s) => Ok(EngineResult::without_assignment(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EncodingMode, PreferenceGraph, SolutionDecoder, Weight};
    use std::time::Duration;

    #[test]
    fn test_parse_literals() {
        let result = parse_output("c hello\ns OPTIMUM FOUND\no 4\no 3\nv 1 -2\nv 3 0\n", 4).unwrap();
        assert_eq!(EngineStatus::Optimal, result.status());
        assert_eq!(Some(3), result.reported_cost());
        let assignment = result.assignment().unwrap();
        assert_eq!(4, assignment.n_vars());
        assert_eq!(Some(true), assignment.value_of(1));
        assert_eq!(Some(false), assignment.value_of(2));
        assert_eq!(Some(true), assignment.value_of(3));
        assert_eq!(None, assignment.value_of(4));
    }

    #[test]
    fn test_parse_bit_string() {
        let result = parse_output("s SATISFIABLE\nv 0110\n", 3).unwrap();
        assert_eq!(EngineStatus::Feasible, result.status());
        assert_eq!(None, result.reported_cost());
        let assignment = result.assignment().unwrap();
        assert_eq!(4, assignment.n_vars());
        assert_eq!(Some(false), assignment.value_of(1));
        assert_eq!(Some(true), assignment.value_of(3));
    }

    #[test]
    fn test_parse_no_assignment() {
        let result = parse_output("s UNSATISFIABLE\n", 3).unwrap();
        assert_eq!(EngineStatus::Unsatisfiable, result.status());
        assert!(result.assignment().is_none());
        let result = parse_output("s UNKNOWN\n", 3).unwrap();
        assert_eq!(EngineStatus::Unknown, result.status());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_output("", 3).is_err());
        assert!(parse_output("s OPTIMUM FOUND\n", 3).is_err());
        assert!(parse_output("s SATISFIABLE\ns SATISFIABLE\nv 1\n", 3).is_err());
        assert!(parse_output("s FOUND\n", 3).is_err());
        assert!(parse_output("s SATISFIABLE\nv a\n", 3).is_err());
        assert!(parse_output("s SATISFIABLE\no\nv 1\n", 3).is_err());
        assert!(parse_output("x\ns UNSATISFIABLE\n", 3).is_err());
    }

    fn grouped_model() -> Model {
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
        Model::build(&preferences, EncodingMode::Maximize).unwrap()
    }

    #[test]
    fn test_echo_solver() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let model = grouped_model();
        let indexer = model.indexer();
        let selected = [
            indexer.pair_var(1, 2),
            indexer.pair_var(3, 4),
            indexer.triple_var(5, 6, 7),
            indexer.seat_var(1),
            indexer.seat_var(2),
            indexer.seat_var(3),
            indexer.seat_var(4),
        ];
        let bits = (1..=indexer.n_vars())
            .map(|v| {
                if selected.iter().any(|s| usize::from(*s) == v) {
                    '1'
                } else {
                    '0'
                }
            })
            .collect::<String>();
        let mut engine = ExternalMaxSatEngine::new(
            "echo".to_string(),
            vec![format!("s OPTIMUM FOUND\no 6\nv {}", bits)],
        );
        let result = engine.optimize(&model, &StopCondition::never()).unwrap();
        assert_eq!(EngineStatus::Optimal, result.status());
        assert_eq!(Some(6), result.reported_cost());
        assert_eq!(6, model.objective().cost_of(result.assignment().unwrap()));
        let seating = SolutionDecoder::new(&model)
            .decode(result.assignment())
            .unwrap();
        assert_eq!(Weight::from_integer(7), seating.achieved_weight());
    }

    #[test]
    fn test_stopped_solver() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let mut engine = ExternalMaxSatEngine::new("sleep".to_string(), vec!["30".to_string()]);
        engine.set_format(WcnfFormat::Legacy);
        let result = engine
            .optimize(
                &grouped_model(),
                &StopCondition::with_timeout(Duration::from_millis(100)),
            )
            .unwrap();
        assert_eq!(EngineStatus::Unknown, result.status());
    }

    #[test]
    fn test_missing_solver() {
        let mut engine = ExternalMaxSatEngine::new("/this/program/does/not/exist".to_string(), vec![]);
        assert!(engine
            .optimize(&grouped_model(), &StopCondition::never())
            .is_err());
    }
}
