//! Error type for the command-line front end.

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Project error: {0}")]
    Project(#[from] cav_project::ProjectError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] cav_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
