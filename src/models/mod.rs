mod comment;
mod deal;
mod filter;
mod map;
mod report;
mod saved;
mod vote;

pub use comment::*;
pub use deal::*;
pub use filter::*;
pub use map::*;
pub use report::*;
pub use saved::*;
pub use vote::*;
