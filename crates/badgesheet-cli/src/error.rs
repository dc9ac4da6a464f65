use anyhow::Error;
use badgesheet_config::ConfigError;
use badgesheet_core::CoreError;
use badgesheet_directory::DirectoryError;
use badgesheet_render::RenderError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
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
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(directory_err) = cause.downcast_ref::<DirectoryError>() {
            return ExitCode::from(directory_exit_code(directory_err));
        }
        if let Some(render_err) = cause.downcast_ref::<RenderError>() {
            return ExitCode::from(render_exit_code(render_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidConcurrency(_)
        | ConfigError::InvalidTimeout(_)
        | ConfigError::InvalidDirectoryField { .. }
        | ConfigError::InvalidDomainAliasCount(_)
        | ConfigError::InvalidSheetValue { .. }
        | ConfigError::Core(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn directory_exit_code(err: &DirectoryError) -> u8 {
    match err {
        DirectoryError::Roster(_) | DirectoryError::Url(_) => EXIT_INVALID_INPUT,
        DirectoryError::Io(_)
        | DirectoryError::Http(_)
        | DirectoryError::Api(_)
        | DirectoryError::Decode(_)
        | DirectoryError::Image(_)
        | DirectoryError::Task(_) => EXIT_FAILURE,
    }
}

fn render_exit_code(err: &RenderError) -> u8 {
    match err {
        RenderError::MissingFont(_)
        | RenderError::InvalidFont(_)
        | RenderError::FontRead { .. }
        | RenderError::Unavailable(_) => EXIT_INVALID_INPUT,
        RenderError::Io(_) | RenderError::Pdf(_) => EXIT_FAILURE,
    }
}
