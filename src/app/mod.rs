mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

mod cli_manager;

mod command;

pub(crate) mod common;

mod compare_command;
pub(crate) use compare_command::CompareCommand;

mod encode_command;
pub(crate) use encode_command::EncodeCommand;

mod perfect_command;
pub(crate) use perfect_command::PerfectCommand;

mod solve_command;
pub(crate) use solve_command::SolveCommand;

mod writable_string;
