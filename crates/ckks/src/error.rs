use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Math(#[from] fhe_math::Error),

    #[error("parameter error: {0}")]
    Parameters(#[from] crate::parameters::CkksParametersBuilderError),
}

pub type Result<T> = std::result::Result<T, Error>;
