//! Constantes de configuração do Scheduler

use crate::sys::types::SlotId;

/// Capacidade da tabela de tarefas (pool fixo de PCBs)
pub const NUM_MAX_TASK: usize = 16;

/// Descritores de arquivo por tarefa
pub const NUM_FD: usize = 16;

/// Slot reservado da tarefa idle (nunca liberado)
pub const IDLE_SLOT: SlotId = SlotId(0);

/// Slot reservado da tarefa raiz/init (nunca liberado; adota órfãos)
pub const ROOT_SLOT: SlotId = SlotId(1);

/// Quantos slots iniciais são reservados no boot
pub const NUM_RESERVED_SLOTS: usize = 2;

/// Prioridade base padrão
pub const DEFAULT_PRIORITY: i32 = 1;

/// Quantum padrão (timeslice) em ticks do timer
pub const DEFAULT_QUANTUM: u64 = 10;

/// Tamanho do buffer de nome de tarefa (diagnóstico)
pub const TASK_NAME_LEN: usize = 32;

/// Status de saída gravado quando o término veio de `do_kill`
pub const KILLED_EXIT_STATUS: i32 = 9;
