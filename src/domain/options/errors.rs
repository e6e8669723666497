//! Options - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Error in option \"{option}\": {message}")]
    Validation { option: String, message: String },

    #[error("Not all required params are supplied: {0}")]
    RequiredMissing(String),

    #[error("Priority must be one of: {allowed}. Value received: {value}")]
    UnknownPriority { value: String, allowed: String },
}
