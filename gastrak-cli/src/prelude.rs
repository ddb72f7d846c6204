#![allow(unused_imports)]

pub use anyhow::{Context, Error, bail};
pub use tracing::{info, instrument, warn};

pub type Result<T = (), E = Error> = anyhow::Result<T, E>;
