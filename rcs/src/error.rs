use plm::PlmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcsError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("robot {0:?} does not exist in the current scene")]
    UnknownRobot(String),

    #[error("robot {0:?} was not configured with a pose sensor")]
    MissingPose(String),

    #[error("{0}")]
    Sim(#[from] SimError),

    #[error("{0}")]
    Plm(#[from] PlmError),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("{0}")]
    Morse(#[from] morse::MorseError),

    #[error("simulator unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlmParamsError {
    #[error("expected exactly the keys t1, t2, t3, dr0, dr1, dr2, dr3")]
    KeySet,

    #[error("thresholds must satisfy 0 < t1 < t2 < t3")]
    Thresholds,

    #[error("data rates must satisfy dr0 > dr1 > dr2 > dr3")]
    DataRates,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown communication model {0:?}")]
pub struct ParseModelError(pub String);
