//! Porta de memória (pilhas e tabelas de página)
//!
//! O núcleo de escalonamento nunca aloca memória por conta própria: pede à
//! plataforma e devolve quando o slot é liberado.

use super::cpu::StackKind;
use crate::sys::types::{PageTableRoot, VirtAddr};

/// Abstração do alocador de recursos por tarefa
pub trait MemOps {
    /// Aloca uma pilha e retorna o endereço do topo; `None` sob pressão de
    /// memória (o spawn falha com ENOMEM e desfaz a reserva do slot).
    fn alloc_stack(&self, kind: StackKind) -> Option<VirtAddr>;

    /// Devolve uma pilha alocada por [`MemOps::alloc_stack`]. Recebe o mesmo
    /// topo que foi retornado lá.
    fn release_stack(&self, kind: StackKind, top: VirtAddr);

    /// Cria um espaço de endereçamento novo para processo de usuário.
    fn alloc_page_table(&self) -> Option<PageTableRoot>;

    /// Libera um espaço de endereçamento criado por este porta.
    fn release_page_table(&self, root: PageTableRoot);

    /// Duplica o espaço de endereçamento do pai (eager ou copy-on-write,
    /// política do subsistema de MM).
    fn clone_address_space(&self, parent: PageTableRoot) -> Option<PageTableRoot>;
}
