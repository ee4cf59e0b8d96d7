//! # Multitasking & Scheduler Subsystem
//!
//! O módulo `sched` transforma um núcleo de CPU em uma abstração capaz de
//! executar múltiplas tarefas "simultaneamente".
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Abstração de Tarefa:** define o que é um PCB e seu ciclo de vida
//!   (BLOCKED → READY → RUNNING → ZOMBIE/EXITED).
//! - **Filas de Pertencimento:** cada tarefa viva está em no máximo uma fila
//!   (prontos, bloqueados, operação de arquivo, slots livres), gravada como
//!   tag explícita, nunca deduzida de ponteiros.
//! - **Política de Escalonamento:** prioridade efetiva com envelhecimento e
//!   desempate FIFO; round-robin entre iguais; idle como fallback.
//!
//! ## 🏗️ Arquitetura: Cooperative + Preemptive
//! O design é híbrido:
//! 1. **Preemptivo:** o tick do timer desconta quantum e chama o
//!    escalonador quando a fatia acaba.
//! 2. **Cooperativo:** tarefas cedem CPU voluntariamente via `do_yield`,
//!    `do_block` ou syscalls bloqueantes; `do_kill` é cooperativo: marca a
//!    flag e o desmonte acontece no próximo ponto de escalonamento.

pub mod config;
pub mod core;
pub mod lifecycle;
pub mod queue;
pub mod task;

#[cfg(test)]
mod test;

pub use self::core::Core;
pub use self::queue::QueueId;
