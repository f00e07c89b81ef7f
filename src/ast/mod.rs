pub mod flow;
pub mod node;
pub mod param;

pub use flow::*;
pub use node::*;
pub use param::*;
