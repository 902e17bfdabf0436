pub mod error;
pub mod hshg;

pub use common::shapes;
pub use error::{HshgError, HshgResult};
pub use hshg::{Config, Hshg, UpdateView, INVALID};
