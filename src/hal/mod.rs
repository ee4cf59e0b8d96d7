//! # Hardware Abstraction Layer
//!
//! Tudo que o núcleo de escalonamento consome do hardware (e dos outros
//! subsistemas do kernel) entra por aqui: troca de contexto, interrupções,
//! relógio e alocação de pilhas/tabelas de página.
//!
//! O kernel hospedeiro implementa [`Platform`] uma vez e passa a instância
//! para [`crate::init`]. Nos testes, uma plataforma simulada dirige o tempo
//! e registra as trocas.

pub mod traits;

pub use traits::clock::ClockOps;
pub use traits::cpu::{CpuOps, StackKind};
pub use traits::mem::MemOps;
pub use traits::Platform;

#[cfg(test)]
pub mod mock;
