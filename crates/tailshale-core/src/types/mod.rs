mod host;
mod key;

pub use host::*;
pub use key::*;
