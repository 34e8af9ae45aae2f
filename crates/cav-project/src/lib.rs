//! cav-project: cavity definition file format, validation and model building.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{build_cavity, mode_params};
pub use schema::*;
pub use validate::{ValidationError, validate_cavity};

/// Newest definition format this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model error: {0}")]
    Model(#[from] cav_core::CavError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<CavityDef> {
    let content = std::fs::read_to_string(path)?;
    let def: CavityDef = serde_yaml::from_str(&content)?;
    validate_cavity(&def)?;
    Ok(def)
}

pub fn save_yaml(path: &std::path::Path, def: &CavityDef) -> ProjectResult<()> {
    validate_cavity(def)?;
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<CavityDef> {
    let content = std::fs::read_to_string(path)?;
    let def: CavityDef = serde_json::from_str(&content)?;
    validate_cavity(&def)?;
    Ok(def)
}

pub fn save_json(path: &std::path::Path, def: &CavityDef) -> ProjectResult<()> {
    validate_cavity(def)?;
    let content = serde_json::to_string_pretty(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a definition, picking the format from the file extension
/// (`.json` is JSON, anything else YAML).
pub fn load(path: &std::path::Path) -> ProjectResult<CavityDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
