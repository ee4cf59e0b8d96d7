//! Process Control Block

use bitflags::bitflags;

use super::accounting::Accounting;
use super::context::SwitchContext;
use super::fd::FileDescriptor;
use super::state::{SpawnMode, TaskStatus, TaskType};
use crate::sched::config::{DEFAULT_PRIORITY, NUM_FD, TASK_NAME_LEN};
use crate::sys::types::{PageTableRoot, Pid, SlotId, VirtAddr};

bitflags! {
    /// Máscara de afinidade de CPU (um bit por núcleo)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuMask: u64 {
        const CORE0 = 1 << 0;
    }
}

impl CpuMask {
    /// Pode rodar em qualquer núcleo
    pub const ALL: CpuMask = CpuMask::from_bits_retain(u64::MAX);

    /// A máscara permite o núcleo dado?
    pub const fn allows(self, core_id: usize) -> bool {
        self.bits() & (1u64 << core_id) != 0
    }
}

bitflags! {
    /// Flags da relação com o pai (semântica de wait/reparenting)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParentFlags: u32 {
        /// A tarefa foi adotada por um ancestral depois que o pai original saiu
        const REPARENTED = 1 << 0;
        /// O pai está bloqueado em wait e precisa ser acordado no exit
        const WAIT_NOTIFY = 1 << 1;
    }
}

/// O que uma tarefa bloqueada em wait está esperando
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    /// Qualquer filho que vire zumbi
    AnyChild,
    /// Um filho específico
    Child(Pid),
}

/// Informação de criação de tarefa (entry point e natureza)
#[derive(Debug, Clone, Copy)]
pub struct TaskInfo {
    pub entry: VirtAddr,
    pub task_type: TaskType,
    pub name: &'static str,
}

/// Process Control Block — um por slot da tabela de tarefas
#[derive(Debug, Clone, Copy)]
pub struct Pcb {
    /// ID único entre tarefas não-Exited
    pub pid: Pid,
    /// Natureza (processo/thread, kernel/usuário)
    pub task_type: TaskType,
    /// Destino do slot no exit (zumbi ou limpeza automática)
    pub mode: SpawnMode,
    /// Estado atual no ciclo de vida
    pub status: TaskStatus,
    /// Contexto salvo entre trocas
    pub context: SwitchContext,
    /// Topo da pilha de kernel (como devolvido pela plataforma)
    pub kernel_stack: VirtAddr,
    /// Topo da pilha de usuário
    pub user_stack: VirtAddr,
    /// Raiz da tabela de páginas
    pub pgdir: PageTableRoot,
    /// O slot é dono do pgdir (falso quando compartilhado via CLONE_VM)
    pub owns_pgdir: bool,
    /// Profundidade de disable_preempt; 0 ⇒ interrupções armadas
    pub preempt_count: u32,
    /// Prioridade base
    pub priority: i32,
    /// Prioridade de trabalho (envelhece enquanto espera; volta à base ao
    /// ser selecionada)
    pub temp_priority: i32,
    /// Afinidade de CPU
    pub mask: CpuMask,
    /// Contabilidade de CPU
    pub accounting: Accounting,
    /// Slot do pai (None só para as tarefas reservadas do boot)
    pub parent: Option<SlotId>,
    /// Flags da relação com o pai
    pub parent_flags: ParentFlags,
    /// Alvo de espera enquanto bloqueada em wait
    pub wait_target: Option<WaitTarget>,
    /// Término cooperativo pedido via do_kill
    pub killed: bool,
    /// Status de saída (válido de Zombie em diante)
    pub exit_status: i32,
    /// Tabela de descritores de arquivo (dona exclusiva)
    pub fd: [FileDescriptor; NUM_FD],
    /// Nome para diagnóstico
    pub name: [u8; TASK_NAME_LEN],
}

impl Pcb {
    /// Slot vazio (estado dos slots livres da tabela)
    pub const EMPTY: Pcb = Pcb {
        pid: Pid(0),
        task_type: TaskType::KernelProcess,
        mode: SpawnMode::DEFAULT,
        status: TaskStatus::Exited,
        context: SwitchContext::new(),
        kernel_stack: VirtAddr::NULL,
        user_stack: VirtAddr::NULL,
        pgdir: PageTableRoot::KERNEL,
        owns_pgdir: false,
        preempt_count: 0,
        priority: DEFAULT_PRIORITY,
        temp_priority: DEFAULT_PRIORITY,
        mask: CpuMask::ALL,
        accounting: Accounting::new(),
        parent: None,
        parent_flags: ParentFlags::empty(),
        wait_target: None,
        killed: false,
        exit_status: 0,
        fd: [FileDescriptor::UNUSED; NUM_FD],
        name: [0; TASK_NAME_LEN],
    };

    /// Reinicializa o slot para uma tarefa nova (análogo do
    /// `init_pcb_default`): estado padrão por tipo, contadores zerados.
    pub fn reset(&mut self, pid: Pid, task_type: TaskType, mode: SpawnMode, now: u64) {
        *self = Self::EMPTY;
        self.pid = pid;
        self.task_type = task_type;
        self.mode = mode;
        self.accounting.time_start = now;
        for (i, fd) in self.fd.iter_mut().enumerate() {
            fd.fd_num = i as u8;
        }
    }

    /// Grava o nome (truncado ao buffer fixo)
    pub fn set_name(&mut self, name: &str) {
        self.name = [0; TASK_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(TASK_NAME_LEN - 1);
        self.name[..len].copy_from_slice(&bytes[..len]);
    }

    /// Nome para diagnóstico
    pub fn name_str(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TASK_NAME_LEN);
        core::str::from_utf8(&self.name[..end]).unwrap_or("<inválido>")
    }
}
