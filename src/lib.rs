mod backend;
pub mod cli;
pub mod error;
mod frontend;
mod interpreter;
pub mod utils;
pub mod vm;

pub use interpreter::Interpreter;
pub use interpreter::DEMO;
pub use vm::CollectStats;
pub use vm::ObjRef;
pub use vm::Object;
pub use vm::Vm;
pub use vm::VmConfig;
