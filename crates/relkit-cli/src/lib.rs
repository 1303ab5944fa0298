//! Library side of the `relkit` command: logging setup and the build
//! pipeline stages.

pub mod logging;
pub mod pipeline;
