use crate::error::StegiError;

pub type Result<T> = std::result::Result<T, StegiError>;
