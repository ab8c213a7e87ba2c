#![forbid(unsafe_code)]

mod types;
mod announcement;
mod update;
mod codec;

pub use self::types::*;
pub use self::announcement::*;
pub use self::update::*;
pub use self::codec::*;
