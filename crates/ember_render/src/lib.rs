mod error;
mod filter;
mod software;
mod target;

pub use self::{
    error::FilterError,
    filter::{Distribution, EnvironmentFilter, FilterParams, FilterParamsBuilder},
    software::{SoftwareEnvironment, SoftwareFilter, SoftwareTarget},
    target::{RenderTarget, TargetCache},
};
