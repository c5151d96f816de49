pub mod config;
pub mod error;

pub use config::{Config, StrategyEnv, load_dotenv};
pub use error::*;
