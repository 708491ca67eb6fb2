mod rnib;
mod uenib;

pub use rnib::*;
pub use uenib::*;
