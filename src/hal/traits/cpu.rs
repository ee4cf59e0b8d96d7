//! Porta de CPU (troca de contexto, interrupções, pilhas de boot)

use crate::sched::task::context::SwitchContext;
use crate::sys::types::VirtAddr;

/// Tipo de pilha pedida à plataforma
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Kernel,
    User,
}

/// Abstração de CPU
pub trait CpuOps {
    /// Troca de contexto opaca: salva os registradores callee-saved da
    /// tarefa de saída em `prev` e restaura os de `next`.
    ///
    /// No kernel real esta chamada só "retorna" quando a tarefa salva em
    /// `prev` voltar a ser escalonada. Contextos recém-criados (nunca
    /// executados) entram pela trampolim da plataforma, que deve soltar o
    /// lock do núcleo herdado da troca; ver
    /// [`crate::sched::core::release_core_lock`].
    fn switch_to(&self, prev: &mut SwitchContext, next: &SwitchContext);

    /// Arma (`true`) ou desarma (`false`) interrupções externas.
    fn set_interrupt_enable(&self, enabled: bool);

    /// Constrói o estado inicial de registradores de uma tarefa nova:
    /// entry point, argumento e frame de retorno sintético.
    fn init_context(&self, ctx: &mut SwitchContext, entry: VirtAddr, arg: usize);

    /// Deriva o contexto do filho em `clone`. O filho deve observar retorno
    /// zero; se `child_stack` não for nula, ela vira a pilha de usuário.
    fn clone_context(&self, parent: &SwitchContext, child_stack: VirtAddr) -> SwitchContext;

    /// Retorna o ID do núcleo atual (sempre 0 enquanto single-core).
    fn core_id(&self) -> usize;
}
