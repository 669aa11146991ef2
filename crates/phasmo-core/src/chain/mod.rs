mod definition;
mod loader;
mod resolver;

pub use definition::*;
pub use loader::*;
pub use resolver::*;
