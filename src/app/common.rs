use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, CheckCommand, CompareCommand,
    EncodeCommand, PerfectCommand, SolveCommand,
};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
    time::Duration,
};
use tcpc::{
    encodings::CardinalityEncoding,
    io::PreferencesReader,
    model::{EncodingMode, Model, PreferenceGraph, Seating, SolutionDecoder},
    sat::{
        DefaultSatSolverFactory, ExternalSatSolverFactory, SatSolver, SatSolverFactory,
        SolvingListener, SolvingResult,
    },
    solvers::{
        EngineResult, EngineStatus, ExternalMaxSatEngine, LinearSearchEngine, OptimizationEngine,
    },
    utils::StopCondition,
};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "tcpc, a SAT/MaxSAT based solver for the Team Composition Problem in a Classroom.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(CompareCommand::new()),
        Box::new(EncodeCommand::new()),
        Box::new(PerfectCommand::new()),
        Box::new(SolveCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the preferences")
        .required(true)
}

pub(crate) const ARG_MODE: &str = "MODE";

pub(crate) fn mode_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_MODE)
        .long("mode")
        .empty_values(false)
        .multiple(false)
        .default_value("max")
        .help(r#"the objective encoding mode ("max" for weights, "min" for deficiencies)"#)
        .required(false)
}

const ARG_CARDINALITY_ENCODING: &str = "CARDINALITY_ENCODING";

pub(crate) fn cardinality_encoding_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_CARDINALITY_ENCODING)
        .long("cardinality-encoding")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["seqcounter", "pairwise"])
        .default_value("seqcounter")
        .help("the CNF encoding of the at-most-one constraints")
        .required(false)
}

pub(crate) fn read_cardinality_encoding(arg_matches: &ArgMatches<'_>) -> CardinalityEncoding {
    match arg_matches.value_of(ARG_CARDINALITY_ENCODING) {
        Some("pairwise") => CardinalityEncoding::Pairwise,
        _ => CardinalityEncoding::SequentialCounter,
    }
}

const ARG_PRUNE_ZERO_WEIGHTS: &str = "PRUNE_ZERO_WEIGHTS";

pub(crate) fn prune_zero_weights_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_PRUNE_ZERO_WEIGHTS)
        .long("prune-zero-weights")
        .takes_value(false)
        .help("forbid the tables with a null weight in maximizing mode (may make the problem unsatisfiable)")
        .required(false)
}

const ARG_TIMEOUT: &str = "TIMEOUT";

pub(crate) fn timeout_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_TIMEOUT)
        .long("timeout")
        .empty_values(false)
        .multiple(false)
        .help("the time limit of the engines, in seconds")
        .required(false)
}

pub(crate) fn read_stop_condition(arg_matches: &ArgMatches<'_>) -> Result<StopCondition> {
    let timeout = arg_matches
        .value_of(ARG_TIMEOUT)
        .map(|t| {
            t.parse::<u64>()
                .with_context(|| format!(r#"while parsing the timeout "{}""#, t))
        })
        .transpose()?;
    if let Some(t) = timeout {
        info!("engines are limited to {} seconds", t);
    }
    Ok(StopCondition::with_optional_timeout(
        timeout.map(Duration::from_secs),
    ))
}

pub(crate) fn read_preferences(file_path: &str) -> Result<PreferenceGraph> {
    let preferences =
        read_file_path_with(file_path, &|r| PreferencesReader::default().read(r))?;
    info!(
        "the class has {} students and {} preferences",
        preferences.n_students(),
        preferences.n_preferences()
    );
    Ok(preferences)
}

pub(crate) fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!("while opening file {:?}", canonicalized))?,
    );
    (reader)(&mut file_reader)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

/// Builds the model of the input file, in the mode given on the command line.
pub(crate) fn build_model(arg_matches: &ArgMatches<'_>) -> Result<Model> {
    let mode = EncodingMode::try_from(arg_matches.value_of(ARG_MODE).unwrap_or("max"))?;
    let preferences = read_preferences(arg_matches.value_of(ARG_INPUT).unwrap_or_default())?;
    let prune = arg_matches.is_present(ARG_PRUNE_ZERO_WEIGHTS);
    let model = Model::build_with_options(&preferences, mode, prune)
        .context("while building the seating model")?;
    log_model_stats(&model);
    Ok(model)
}

pub(crate) fn log_model_stats(model: &Model) {
    let stats = model.stats();
    info!(
        "{} students, {} of them at 2-seat tables",
        stats.n_students, stats.two_seat_count
    );
    info!(
        "the {} model has {} variables ({} pairs, {} triples), {} hard constraints and {} objective terms",
        model.mode(),
        stats.n_vars,
        stats.n_pairs,
        stats.n_triples,
        stats.n_hard_constraints,
        stats.n_objective_terms
    );
}

const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";
const ARG_EXTERNAL_MAXSAT_SOLVER: &str = "EXTERNAL_MAXSAT_SOLVER";
const ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS: &str = "EXTERNAL_MAXSAT_SOLVER_OPTIONS";

pub(crate) fn external_sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external SAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("a option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) fn external_maxsat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_MAXSAT_SOLVER)
            .long("external-maxsat-solver")
            .empty_values(false)
            .multiple(false)
            .conflicts_with(ARG_EXTERNAL_SAT_SOLVER)
            .help("a path to an external MaxSAT solver to replace the SAT-based linear search")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS)
            .long("external-maxsat-solver-opt")
            .requires(ARG_EXTERNAL_MAXSAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("a option to give to the external MaxSAT solver")
            .required(false),
    ]
}

fn read_program_and_options(
    arg_matches: &ArgMatches<'_>,
    program_arg: &str,
    options_arg: &str,
) -> Result<Option<(String, Vec<String>)>> {
    let program = match arg_matches.value_of(program_arg) {
        Some(p) => canonicalize_file_path(p)?.to_string_lossy().to_string(),
        None => return Ok(None),
    };
    let options = arg_matches
        .values_of(options_arg)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    Ok(Some((program, options)))
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    match read_program_and_options(
        arg_matches,
        ARG_EXTERNAL_SAT_SOLVER,
        ARG_EXTERNAL_SAT_SOLVER_OPTIONS,
    )? {
        Some((program, options)) => {
            info!("using {:?} for problems requiring a SAT solver", program);
            Ok(Box::new(LoggingSatSolverFactory(Box::new(
                ExternalSatSolverFactory::new(program, options),
            ))))
        }
        None => {
            info!("using the default SAT solver for problems requiring a SAT solver");
            Ok(Box::new(LoggingSatSolverFactory(Box::new(
                DefaultSatSolverFactory,
            ))))
        }
    }
}

pub(crate) fn create_engine(arg_matches: &ArgMatches<'_>) -> Result<Box<dyn OptimizationEngine>> {
    let cardinality_encoding = read_cardinality_encoding(arg_matches);
    match read_program_and_options(
        arg_matches,
        ARG_EXTERNAL_MAXSAT_SOLVER,
        ARG_EXTERNAL_MAXSAT_SOLVER_OPTIONS,
    )? {
        Some((program, options)) => {
            info!("using {:?} as the MaxSAT engine", program);
            let mut engine = ExternalMaxSatEngine::new(program, options);
            engine.set_cardinality_encoding(cardinality_encoding);
            Ok(Box::new(engine))
        }
        None => {
            info!("using the SAT-based linear search as the MaxSAT engine");
            let mut engine =
                LinearSearchEngine::new_with_sat_solver_factory(create_sat_solver_factory(
                    arg_matches,
                )?);
            engine.set_cardinality_encoding(cardinality_encoding);
            Ok(Box::new(engine))
        }
    }
}

/// Optimizes a model and decodes the assignment, if any.
pub(crate) fn optimize_and_decode(
    engine: &mut dyn OptimizationEngine,
    model: &Model,
    stop_condition: &StopCondition,
) -> Result<(EngineResult, Option<Seating>)> {
    let result = engine
        .optimize(model, stop_condition)
        .with_context(|| format!("while optimizing the {} model", model.mode()))?;
    info!("the engine answered {}", result.status());
    let assignment = match result.assignment() {
        Some(a) => a,
        None => {
            if result.status() == EngineStatus::Unsatisfiable {
                warn!("the hard constraints of the model cannot be satisfied");
            }
            return Ok((result, None));
        }
    };
    let cost = model.objective().cost_of(assignment);
    match result.reported_cost() {
        Some(c) if c != cost => warn!(
            "the engine reported a cost of {} while the assignment costs {}",
            c, cost
        ),
        _ => {}
    }
    let seating = SolutionDecoder::new(model)
        .decode(Some(assignment))
        .context("while decoding the engine assignment")?;
    info!(
        "the {} objective value is {}; the achieved weight is {}",
        model.mode(),
        model.objective_value(assignment),
        seating.achieved_weight()
    );
    Ok((result, Some(seating)))
}

struct LoggingSatSolverFactory(Box<dyn SatSolverFactory>);

impl SatSolverFactory for LoggingSatSolverFactory {
    fn new_solver(&self, stop_condition: StopCondition) -> Box<dyn SatSolver> {
        let mut solver = self.0.new_solver(stop_condition);
        solver.add_listener(Box::<SatSolvingLogger>::default());
        solver
    }
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        };
        info!("SAT solver ended with result {}", r);
    }
}
