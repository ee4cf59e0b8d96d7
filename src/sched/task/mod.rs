//! Tarefas: PCB, estados, contexto e recursos por tarefa

pub mod accounting;
pub mod context;
pub mod fd;
pub mod pcb;
pub mod state;
pub mod table;

pub use accounting::Accounting;
pub use context::SwitchContext;
pub use fd::FileDescriptor;
pub use pcb::{CpuMask, ParentFlags, Pcb, TaskInfo, WaitTarget};
pub use state::{SpawnMode, TaskStatus, TaskType};
pub use table::TaskTable;
