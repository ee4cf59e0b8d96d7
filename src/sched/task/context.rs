//! Contexto de execução salvo entre trocas de tarefa

use crate::sys::types::VirtAddr;

/// Quantos registradores callee-saved a primitiva de troca preserva
pub const NUM_SAVED_REGS: usize = 14;

/// Registradores salvos na troca de contexto.
///
/// O layout interno pertence à primitiva `switch_to` da plataforma; o
/// núcleo só transporta o bloco. A ordem dos campos é contrato com o
/// assembly de troca: não reordenar.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchContext {
    /// Registradores callee-saved (conteúdo opaco para o núcleo)
    pub regs: [usize; NUM_SAVED_REGS],
    /// Ponteiro da pilha de kernel
    pub kernel_sp: VirtAddr,
    /// Ponteiro da pilha de usuário
    pub user_sp: VirtAddr,
}

impl SwitchContext {
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_SAVED_REGS],
            kernel_sp: VirtAddr::NULL,
            user_sp: VirtAddr::NULL,
        }
    }
}

impl Default for SwitchContext {
    fn default() -> Self {
        Self::new()
    }
}
