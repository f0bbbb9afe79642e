use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown character id: {0}")]
    UnknownCharacter(String),

    #[error("Unknown weapon id: {0}")]
    UnknownWeapon(String),

    #[error("Invalid grid config: {0}")]
    InvalidConfig(String),

    #[error("Deployment position out of bounds: ({0}, {1})")]
    OutOfBounds(i32, i32),

    #[error("Position already occupied: ({0}, {1})")]
    PositionOccupied(i32, i32),

    #[error("Stats table error: {0}")]
    StatsError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
