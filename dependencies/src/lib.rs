pub use hex;
pub use chrono;
pub use clap;
pub use bitflags;
pub use log;
pub use env_logger;
pub use pretty_assertions;
