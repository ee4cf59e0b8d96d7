//! # Anvil — Núcleo de Escalonamento de Processos
//!
//! O `anvil` é o motor de multitarefa do Redstone OS: PCBs, filas de
//! pertencimento, bloqueio/desbloqueio, timers por tick e contabilidade de
//! tempo de CPU, tudo sobre pools de capacidade fixa.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Tabela de Tarefas:** pool fixo de PCBs; alocar é reservar um slot,
//!   nunca alocar memória dinâmica.
//! - **Escalonador:** seleção por prioridade efetiva com desempate FIFO,
//!   requeue em round-robin e fallback para a tarefa idle.
//! - **Timers:** pool fixo de timers por tick absoluto, base de `sleep` e
//!   `nanosleep`.
//!
//! ## 🏗️ Arquitetura: núcleo portátil + porta de plataforma
//! O hardware (troca de contexto, relógio, pilhas, tabelas de página) entra
//! pelo trait [`hal::Platform`]. O núcleo inteiro é um objeto de contexto
//! ([`Core`]) criado uma única vez no boot; a camada de syscall fala com a
//! instância global via funções `do_*`.
//!
//! ## 🔍 Análise Crítica (Kernel Engineer's View)
//!
//! ### ✅ Pontos Fortes
//! - **Sem ponteiros crus nas filas:** pertencimento é um índice de arena +
//!   tag explícita, então mover tarefa entre filas é aritmética de índice.
//! - **Testável em host:** nenhuma dependência de assembly no caminho de
//!   decisão; uma plataforma simulada dirige ticks e trocas nos testes.
//!
//! ### ⚠️ Pontos de Atenção (Dívida Técnica)
//! - **Lock global único:** o `Core` inteiro vive atrás de um Mutex. Em SMP
//!   isso será o gargalo; runqueues per-CPU ficam para a fase multi-core.

#![cfg_attr(not(test), no_std)]

// Re-export usado pelos macros de log (expansão fora deste crate).
pub use log;

pub mod hal;
pub mod logging;
pub mod sched;
pub mod sys;
pub mod syscall;
pub mod time;

pub use sched::core::{init, Core};
