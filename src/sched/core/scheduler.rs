//! # Orquestrador de Agendamento (High-Level Scheduler)
//!
//! Lógica de decisão do agendador: quem ocupa a CPU, por quanto tempo, e o
//! que acontece com quem sai.
//!
//! ## Mecanismos de Execução:
//! - **Cooperativo:** tarefas cedem voluntariamente via `do_yield`,
//!   `do_block` ou syscalls bloqueantes.
//! - **Preemptivo:** `do_tick` desconta o quantum da tarefa corrente e chama
//!   `do_scheduler` quando a fatia acaba.
//!
//! ## Seleção:
//! Maior `temp_priority` entre as prontas cuja máscara permite este núcleo;
//! empate fica com a primeira na ordem FIFO da fila. Quem não é escolhida
//! envelhece (+1), quem é escolhida volta à prioridade base: fila nenhuma
//! morre de fome. Fila vazia ⇒ a tarefa idle reservada assume.
//!
//! ## Reentrância:
//! O contador de preempção por tarefa guarda o escalonador contra ticks
//! aninhados: interrupções só são rearmadas quando a profundidade volta a
//! zero, e um tick que chegue com o contador alto não reescalona.

use crate::hal::Platform;
use crate::sched::config::{
    IDLE_SLOT, KILLED_EXIT_STATUS, NUM_MAX_TASK, NUM_RESERVED_SLOTS, ROOT_SLOT,
};
use crate::sched::queue::{QueueId, QueueSet};
use crate::sched::task::pcb::Pcb;
use crate::sched::task::state::{SpawnMode, TaskStatus, TaskType};
use crate::sched::task::table::TaskTable;
use crate::sys::types::{Pid, SlotId, VirtAddr};
use crate::time::timer::TimerPool;

/// O contexto completo do núcleo de escalonamento.
///
/// Criado uma única vez no boot ([`super::init`]); todos os `do_*` operam
/// sobre ele. Tabela, filas e pool de timers vivem aqui dentro, sem
/// estado ambiente.
pub struct Core {
    pub(crate) platform: &'static dyn Platform,
    pub(crate) table: TaskTable,
    pub(crate) queues: QueueSet,
    pub(crate) timers: TimerPool,
    pub(crate) current: SlotId,
    pub(crate) next_pid: u32,
    /// Último tick em que tempo de CPU foi atribuído a alguém
    pub(crate) last_checkpoint: u64,
    pub(crate) core_id: usize,
}

impl Core {
    /// Monta o núcleo com as duas tarefas reservadas do boot: idle (slot 0)
    /// e raiz/init (slot 1). O fluxo de boot do kernel vira a tarefa raiz.
    pub fn new(platform: &'static dyn Platform) -> Self {
        let now = platform.read_ticks();
        let mut core = Self {
            platform,
            table: TaskTable::new(),
            queues: QueueSet::new(),
            timers: TimerPool::new(),
            current: ROOT_SLOT,
            next_pid: Pid::INIT.as_u32() + 1,
            last_checkpoint: now,
            core_id: platform.core_id(),
        };

        for i in NUM_RESERVED_SLOTS..NUM_MAX_TASK {
            core.queues.enqueue(SlotId(i), QueueId::Available);
        }

        // idle: fallback quando a fila de prontos seca; vive fora das filas
        let idle = &mut core.table[IDLE_SLOT];
        idle.reset(
            Pid::IDLE,
            TaskType::KernelProcess,
            SpawnMode::EnterZombieOnExit,
            now,
        );
        idle.status = TaskStatus::Ready;
        idle.priority = 0;
        idle.temp_priority = 0;
        idle.set_name("idle");

        // raiz: primeira tarefa corrente; adota os órfãos de quem sair
        let root = &mut core.table[ROOT_SLOT];
        root.reset(
            Pid::INIT,
            TaskType::KernelProcess,
            SpawnMode::EnterZombieOnExit,
            now,
        );
        root.status = TaskStatus::Running;
        root.set_name("init");

        core
    }

    /// Configura o entry point da tarefa idle (o laço de halt da plataforma)
    pub fn set_idle_entry(&mut self, entry: VirtAddr) {
        let mut ctx = self.table[IDLE_SLOT].context;
        self.platform.init_context(&mut ctx, entry, 0);
        self.table[IDLE_SLOT].context = ctx;
    }

    /// Slot da tarefa corrente
    #[inline]
    pub fn current(&self) -> SlotId {
        self.current
    }

    /// PID da tarefa corrente
    #[inline]
    pub fn current_pid(&self) -> Pid {
        self.table[self.current].pid
    }

    /// Acesso de leitura a um PCB (diagnóstico e testes)
    #[inline]
    pub fn task(&self, slot: SlotId) -> &Pcb {
        &self.table[slot]
    }

    // =========================================================================
    // PREEMPÇÃO
    // =========================================================================

    /// Entra em seção crítica: desarma interrupções e sobe a profundidade
    /// de preempção da tarefa corrente.
    pub fn disable_preempt(&mut self) {
        self.platform.set_interrupt_enable(false);
        self.table[self.current].preempt_count += 1;
    }

    /// Sai de seção crítica. Interrupções só são rearmadas quando a
    /// profundidade da tarefa corrente volta a zero; pares aninhados nunca
    /// rearmam no nível interno.
    pub fn enable_preempt(&mut self) {
        let pcb = &mut self.table[self.current];
        pcb.preempt_count = pcb.preempt_count.saturating_sub(1);
        if pcb.preempt_count == 0 {
            self.platform.set_interrupt_enable(true);
        }
    }

    // =========================================================================
    // ESCALONAMENTO
    // =========================================================================

    /// Seleciona a próxima tarefa: maior prioridade efetiva com máscara
    /// compatível, desempate FIFO. `None` quando nada é elegível.
    fn pick_next(&self) -> Option<SlotId> {
        let mut best: Option<(SlotId, i32)> = None;
        for slot in self.queues.iter(QueueId::Ready) {
            let pcb = &self.table[slot];
            debug_assert!(
                pcb.status == TaskStatus::Ready,
                "fila de prontos com tarefa não-Ready"
            );
            if !pcb.mask.allows(self.core_id) {
                continue;
            }
            match best {
                Some((_, top)) if pcb.temp_priority <= top => {}
                _ => best = Some((slot, pcb.temp_priority)),
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// Envelhece quem ficou esperando e devolve a escolhida à base
    fn apply_aging(&mut self, chosen: SlotId) {
        let Core { queues, table, .. } = self;
        for slot in queues.iter(QueueId::Ready) {
            let pcb = &mut table[slot];
            pcb.temp_priority = pcb.temp_priority.saturating_add(1);
        }
        let pcb = &mut self.table[chosen];
        pcb.temp_priority = pcb.priority;
    }

    /// Função principal de escalonamento.
    ///
    /// Contabiliza o tempo da tarefa de saída, devolve quem ainda roda ao
    /// fim da fila de prontos (round-robin), seleciona a próxima, troca o
    /// contexto pela primitiva opaca da plataforma e restaura o estado de
    /// preempção de quem entra. Tarefas marcadas por `do_kill` encontradas
    /// aqui seguem direto para o caminho de término, sem nunca ganhar a CPU.
    pub fn do_scheduler(&mut self) {
        self.disable_preempt();

        let now = self.platform.read_ticks();
        self.account_kernel_time(now);

        let prev = self.current;

        if self.table[prev].killed && !self.table[prev].status.is_terminated() {
            self.finalize_exit(prev, KILLED_EXIT_STATUS);
        } else if self.table[prev].status == TaskStatus::Running {
            self.table[prev].status = TaskStatus::Ready;
            if prev != IDLE_SLOT {
                self.queues.enqueue(prev, QueueId::Ready);
            }
        }

        let next = loop {
            match self.pick_next() {
                Some(slot) if self.table[slot].killed => {
                    self.finalize_exit(slot, KILLED_EXIT_STATUS);
                }
                Some(slot) => break slot,
                None => break IDLE_SLOT,
            }
        };

        if next != IDLE_SLOT {
            self.queues.dequeue(next);
            self.apply_aging(next);
        }

        self.table[next].status = TaskStatus::Running;
        self.table[next].accounting.reset_quantum();
        self.current = next;

        if prev != next {
            if !self.table[prev].status.is_terminated() {
                let voluntary = self.table[prev].accounting.quantum_left > 0;
                self.table[prev].accounting.account_switch(voluntary);
            }
            crate::ktrace!(
                "(Sched) troca de contexto pid={} -> pid={}",
                self.table[prev].pid.as_u32(),
                self.table[next].pid.as_u32()
            );
            let (prev_pcb, next_pcb) = self.table.pair_mut(prev, next);
            self.platform.switch_to(&mut prev_pcb.context, &next_pcb.context);
            // Ao retomar aqui, `current` aponta para a própria tarefa
            // retomada: quem nos acordou gravou isso antes de trocar.
        }

        self.enable_preempt();
    }

    /// Cede a CPU voluntariamente
    pub fn do_yield(&mut self) {
        crate::ktrace!("(Sched) yield voluntário pid={}", self.current_pid().as_u32());
        self.do_scheduler();
    }

    /// Entrada da interrupção de timer: checa timers vencidos e desconta o
    /// quantum da tarefa corrente; fatia esgotada dispara o escalonador.
    ///
    /// Reentrância: um tick que chegue com o contador de preempção alto não
    /// reescalona; a seção crítica em andamento termina primeiro.
    pub fn do_tick(&mut self) {
        if self.table[self.current].preempt_count > 0 {
            return;
        }
        self.timer_check();
        let acc = &mut self.table[self.current].accounting;
        if acc.quantum_left > 0 {
            acc.quantum_left -= 1;
        }
        if acc.quantum_left == 0 {
            self.do_scheduler();
        }
    }
}
