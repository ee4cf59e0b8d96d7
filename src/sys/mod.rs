//! Definições de Sistema (tipos fundamentais e códigos de erro)

pub mod error;
pub mod types;

pub use error::{Errno, KernelResult};
pub use types::{PageTableRoot, Pid, SlotId, VirtAddr};
