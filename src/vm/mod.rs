pub mod config;
pub mod heap;
mod machine;
pub mod stack;
mod value;

pub use config::VmConfig;
pub use heap::CollectStats;
pub use machine::Vm;
pub use value::HeapObject;
pub use value::ObjRef;
pub use value::Object;
