use anyhow::Error;
use dialprep_config::ConfigError;
use dialprep_core::CoreError;
use dialprep_table::TableError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("rejected: {0}")]
    Rejected(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn rejected(message: impl Into<String>) -> Error {
    CliError::Rejected(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(_cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(core_exit_code(core_err));
        }
        if let Some(table_err) = cause.downcast_ref::<TableError>() {
            return ExitCode::from(table_exit_code(table_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::MissingRequiredColumn(_) | CoreError::UnknownColumn(_) => EXIT_NOT_FOUND,
        CoreError::ColumnBoundTwice(_)
        | CoreError::InvalidAreaCode(_)
        | CoreError::EmptyKeywords(_)
        | CoreError::IdOverflow(_) => EXIT_INVALID_INPUT,
    }
}

fn table_exit_code(err: &TableError) -> u8 {
    match err {
        TableError::Io(_) | TableError::SheetTooLarge { .. } => EXIT_FAILURE,
        TableError::Csv(_)
        | TableError::UnsupportedFormat(_)
        | TableError::EmptyTable
        | TableError::NoSheets
        | TableError::UnknownEncoding(_) => EXIT_INVALID_INPUT,
        #[cfg(feature = "xlsx")]
        TableError::Workbook(_) => EXIT_INVALID_INPUT,
        #[cfg(feature = "xlsx")]
        TableError::WorkbookWrite(_) => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidDelimiter(_)
        | ConfigError::InvalidFallbackAreaCode(_)
        | ConfigError::InvalidKeywords(_)
        | ConfigError::EmptyValue { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
