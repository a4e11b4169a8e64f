pub mod cancel;
pub mod exchange;
pub mod initialize;

pub use cancel::*;
pub use exchange::*;
pub use initialize::*;
