//! Ciclo de vida de tarefas
//!
//! Criação (spawn/clone/exec), bloqueio/desbloqueio, término (exit/kill),
//! colheita (waitpid/wait4) e reparenting de órfãos. Tudo aqui mexe na
//! tabela e nas filas, então tudo roda dentro de seção crítica de
//! preempção.

use bitflags::bitflags;

use crate::hal::StackKind;
use crate::sched::config::{IDLE_SLOT, NUM_MAX_TASK, ROOT_SLOT};
use crate::sched::core::Core;
use crate::sched::queue::QueueId;
use crate::sched::task::context::SwitchContext;
use crate::sched::task::pcb::{CpuMask, ParentFlags, TaskInfo, WaitTarget};
use crate::sched::task::state::{SpawnMode, TaskStatus};
use crate::sys::error::{Errno, KernelResult};
use crate::sys::types::{PageTableRoot, Pid, SlotId, VirtAddr};
use crate::time::clock::{TimeSpec, NANOS_PER_SEC};

bitflags! {
    /// Flags de `do_clone` (subconjunto da ABI do Linux)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CloneFlags: u32 {
        /// Compartilha o espaço de endereçamento com o pai
        const VM = 0x100;
        const FS = 0x200;
        const FILES = 0x400;
        const SIGHAND = 0x800;
        const THREAD = 0x10000;
    }
}

bitflags! {
    /// Opções de `do_wait4`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WaitOptions: u32 {
        /// Não bloqueia se nenhum filho mudou de estado
        const WNOHANG = 1;
        /// Aceito e ignorado (não há job control)
        const WUNTRACED = 2;
    }
}

/// Codificação do status de saída entregue ao wait (byte alto, estilo POSIX)
pub const fn encode_wait_status(exit_status: i32) -> u16 {
    ((exit_status & 0xff) as u16) << 8
}

impl Core {
    fn alloc_pid(&mut self) -> Pid {
        let pid = Pid(self.next_pid);
        self.next_pid += 1;
        pid
    }

    // =========================================================================
    // CRIAÇÃO
    // =========================================================================

    /// Cria uma tarefa nova a partir de `info`, filha da tarefa corrente,
    /// e a deixa pronta para executar.
    ///
    /// Falha com `EAGAIN` quando a tabela de tarefas está cheia e com
    /// `ENOMEM` quando a plataforma não consegue as pilhas; nos dois casos
    /// nada fica reservado.
    pub fn do_spawn(
        &mut self,
        info: &TaskInfo,
        arg: usize,
        mode: SpawnMode,
    ) -> KernelResult<Pid> {
        self.disable_preempt();
        let result = self.spawn_locked(info, arg, mode);
        self.enable_preempt();
        result
    }

    fn spawn_locked(
        &mut self,
        info: &TaskInfo,
        arg: usize,
        mode: SpawnMode,
    ) -> KernelResult<Pid> {
        let slot = match self.queues.pop_front(QueueId::Available) {
            Some(slot) => slot,
            None => {
                crate::kwarn!("(Task) spawn falhou: tabela de tarefas cheia");
                return Err(Errno::EAGAIN);
            }
        };

        let kernel_stack = match self.platform.alloc_stack(StackKind::Kernel) {
            Some(top) => top,
            None => {
                self.queues.enqueue(slot, QueueId::Available);
                return Err(Errno::ENOMEM);
            }
        };

        let user_stack = if info.task_type.needs_user_stack() {
            match self.platform.alloc_stack(StackKind::User) {
                Some(top) => top,
                None => {
                    self.platform.release_stack(StackKind::Kernel, kernel_stack);
                    self.queues.enqueue(slot, QueueId::Available);
                    return Err(Errno::ENOMEM);
                }
            }
        } else {
            VirtAddr::NULL
        };

        let (pgdir, owns_pgdir) = if info.task_type.needs_address_space() {
            match self.platform.alloc_page_table() {
                Some(root) => (root, true),
                None => {
                    if !user_stack.is_null() {
                        self.platform.release_stack(StackKind::User, user_stack);
                    }
                    self.platform.release_stack(StackKind::Kernel, kernel_stack);
                    self.queues.enqueue(slot, QueueId::Available);
                    return Err(Errno::ENOMEM);
                }
            }
        } else {
            (PageTableRoot::KERNEL, false)
        };

        let now = self.platform.read_ticks();
        let pid = self.alloc_pid();
        let parent = self.current;

        let mut ctx = SwitchContext::new();
        ctx.kernel_sp = kernel_stack;
        ctx.user_sp = user_stack;
        self.platform.init_context(&mut ctx, info.entry, arg);

        let pcb = &mut self.table[slot];
        pcb.reset(pid, info.task_type, mode, now);
        pcb.set_name(info.name);
        pcb.kernel_stack = kernel_stack;
        pcb.user_stack = user_stack;
        pcb.pgdir = pgdir;
        pcb.owns_pgdir = owns_pgdir;
        pcb.parent = Some(parent);
        pcb.context = ctx;
        pcb.status = TaskStatus::Ready;
        self.queues.enqueue(slot, QueueId::Ready);

        crate::kdebug!(
            "(Task) spawn pid={} name={} slot={}",
            pid.as_u32(),
            info.name,
            slot.0
        );
        Ok(pid)
    }

    /// Duplica a tarefa corrente (semântica de fork). O filho recebe uma
    /// cópia do contexto do pai preparada pela plataforma para observar
    /// retorno zero; com `CLONE_VM` o espaço de endereçamento é
    /// compartilhado, senão clonado pelo subsistema de MM.
    pub fn do_clone(
        &mut self,
        flags: CloneFlags,
        stack: VirtAddr,
        _ptid: usize,
        _tls: VirtAddr,
        _ctid: usize,
    ) -> KernelResult<Pid> {
        self.disable_preempt();
        let result = self.clone_locked(flags, stack);
        self.enable_preempt();
        result
    }

    fn clone_locked(&mut self, flags: CloneFlags, stack: VirtAddr) -> KernelResult<Pid> {
        let parent_slot = self.current;
        let slot = match self.queues.pop_front(QueueId::Available) {
            Some(slot) => slot,
            None => {
                crate::kwarn!("(Task) clone falhou: tabela de tarefas cheia");
                return Err(Errno::EAGAIN);
            }
        };

        let kernel_stack = match self.platform.alloc_stack(StackKind::Kernel) {
            Some(top) => top,
            None => {
                self.queues.enqueue(slot, QueueId::Available);
                return Err(Errno::ENOMEM);
            }
        };

        // cópia do PCB do pai: evita aliasing entre os dois slots
        let parent_pcb = self.table[parent_slot];

        let (pgdir, owns_pgdir) = if flags.contains(CloneFlags::VM) {
            // compartilhado: o pai continua dono, o filho nunca libera
            (parent_pcb.pgdir, false)
        } else {
            match self.platform.clone_address_space(parent_pcb.pgdir) {
                Some(root) => (root, true),
                None => {
                    self.platform.release_stack(StackKind::Kernel, kernel_stack);
                    self.queues.enqueue(slot, QueueId::Available);
                    return Err(Errno::ENOMEM);
                }
            }
        };

        let now = self.platform.read_ticks();
        let pid = self.alloc_pid();

        let child_stack = if stack.is_null() {
            parent_pcb.context.user_sp
        } else {
            stack
        };
        let mut ctx = self.platform.clone_context(&parent_pcb.context, child_stack);
        ctx.kernel_sp = kernel_stack;

        let pcb = &mut self.table[slot];
        pcb.reset(pid, parent_pcb.task_type, parent_pcb.mode, now);
        pcb.name = parent_pcb.name;
        pcb.priority = parent_pcb.priority;
        pcb.temp_priority = parent_pcb.priority;
        pcb.mask = parent_pcb.mask;
        pcb.kernel_stack = kernel_stack;
        // a pilha de usuário do filho vive no espaço clonado (ou foi dada
        // pelo chamador); não há alocação própria para devolver no exit
        pcb.user_stack = VirtAddr::NULL;
        // TODO: compartilhar a tabela de FDs sob CLONE_FILES exige contagem
        // de referência no VFS; por enquanto o filho recebe uma cópia.
        pcb.fd = parent_pcb.fd;
        pcb.pgdir = pgdir;
        pcb.owns_pgdir = owns_pgdir;
        pcb.parent = Some(parent_slot);
        pcb.context = ctx;
        pcb.status = TaskStatus::Ready;
        self.queues.enqueue(slot, QueueId::Ready);

        crate::kdebug!(
            "(Task) clone pid={} a partir de pid={}",
            pid.as_u32(),
            parent_pcb.pid.as_u32()
        );
        Ok(pid)
    }

    /// Substitui o contexto de execução da tarefa corrente pela imagem
    /// nova. O carregamento do binário é do colaborador de VFS/loader;
    /// PID, pai e descritores sobrevivem ao exec.
    pub fn do_exec(&mut self, image: &TaskInfo, arg: usize) -> KernelResult<()> {
        self.disable_preempt();
        let result = self.exec_locked(image, arg);
        self.enable_preempt();
        result
    }

    fn exec_locked(&mut self, image: &TaskInfo, arg: usize) -> KernelResult<()> {
        let slot = self.current;

        let new_user_stack = if image.task_type.needs_user_stack() {
            match self.platform.alloc_stack(StackKind::User) {
                Some(top) => top,
                None => return Err(Errno::ENOMEM),
            }
        } else {
            VirtAddr::NULL
        };

        let old_user_stack = self.table[slot].user_stack;
        if !old_user_stack.is_null() {
            self.platform.release_stack(StackKind::User, old_user_stack);
        }

        let kernel_sp = self.table[slot].context.kernel_sp;
        let mut ctx = SwitchContext::new();
        ctx.kernel_sp = kernel_sp;
        ctx.user_sp = new_user_stack;
        self.platform.init_context(&mut ctx, image.entry, arg);

        let pcb = &mut self.table[slot];
        pcb.task_type = image.task_type;
        pcb.set_name(image.name);
        pcb.user_stack = new_user_stack;
        pcb.context = ctx;

        crate::kdebug!("(Task) exec pid={} name={}", pcb.pid.as_u32(), image.name);
        Ok(())
    }

    // =========================================================================
    // TÉRMINO
    // =========================================================================

    /// Termina a tarefa corrente.
    ///
    /// Grava o status, acorda quem espera por ela, entrega os filhos a um
    /// ancestral sobrevivente e escolhe a próxima tarefa. No kernel real a
    /// chamada não retorna: a tarefa saiu do conjunto escalonável.
    pub fn do_exit(&mut self, status: i32) {
        self.disable_preempt();
        let slot = self.current;
        crate::kinfo!(
            "(Task) exit pid={} status={}",
            self.table[slot].pid.as_u32(),
            status
        );
        self.finalize_exit(slot, status);
        self.do_scheduler();
    }

    /// Transição terminal de uma tarefa: RUNNING/READY/BLOCKED → ZOMBIE (ou
    /// EXITED com limpeza automática). Idempotente para quem já terminou:
    /// kill e exit podem correr.
    pub(crate) fn finalize_exit(&mut self, slot: SlotId, status: i32) {
        if self.table[slot].status.is_terminated() {
            return;
        }
        if slot == IDLE_SLOT || slot == ROOT_SLOT {
            crate::kerror!(
                "(Task) tentativa de terminar tarefa reservada pid={}",
                self.table[slot].pid.as_u32()
            );
            return;
        }

        self.queues.dequeue(slot);
        self.table[slot].exit_status = status;

        // o PCB é dono exclusivo dos descritores; devolve tudo agora
        for fd in self.table[slot].fd.iter_mut() {
            if fd.used {
                fd.release();
            }
        }

        self.wake_waiters(slot);
        self.reparent_children(slot);

        match self.table[slot].mode {
            SpawnMode::EnterZombieOnExit => {
                // fora de todas as filas até o pai colher via wait
                self.table[slot].status = TaskStatus::Zombie;
            }
            SpawnMode::AutoCleanupOnExit => {
                self.release_slot(slot);
            }
        }
    }

    /// Acorda tarefas bloqueadas em wait por esta que está saindo
    fn wake_waiters(&mut self, dying: SlotId) {
        if !self.table[dying]
            .parent_flags
            .contains(ParentFlags::WAIT_NOTIFY)
        {
            return;
        }
        let dying_pid = self.table[dying].pid;
        let parent = self.table[dying].parent;
        for i in 0..NUM_MAX_TASK {
            let waiter = SlotId(i);
            if self.table[waiter].status != TaskStatus::Blocked {
                continue;
            }
            let woken = match self.table[waiter].wait_target {
                Some(WaitTarget::Child(pid)) => pid == dying_pid,
                Some(WaitTarget::AnyChild) => parent == Some(waiter),
                None => false,
            };
            if woken {
                let _ = self.do_unblock(waiter);
            }
        }
    }

    /// Entrega os filhos de quem sai ao ancestral vivo mais próximo (ou à
    /// tarefa raiz); órfãos continuam escalonáveis.
    fn reparent_children(&mut self, dying: SlotId) {
        let adopter = self.find_live_ancestor(dying).unwrap_or(ROOT_SLOT);
        for i in 0..NUM_MAX_TASK {
            let child = SlotId(i);
            if child == dying {
                continue;
            }
            if self.table[child].parent == Some(dying)
                && self.table[child].status != TaskStatus::Exited
            {
                self.table[child].parent = Some(adopter);
                self.table[child].parent_flags.insert(ParentFlags::REPARENTED);
                crate::kdebug!(
                    "(Task) órfão pid={} adotado por pid={}",
                    self.table[child].pid.as_u32(),
                    self.table[adopter].pid.as_u32()
                );
            }
        }
    }

    fn find_live_ancestor(&self, slot: SlotId) -> Option<SlotId> {
        let mut cursor = self.table[slot].parent;
        let mut hops = 0;
        while let Some(ancestor) = cursor {
            if self.table[ancestor].status.is_alive() {
                return Some(ancestor);
            }
            cursor = self.table[ancestor].parent;
            hops += 1;
            if hops > NUM_MAX_TASK {
                // corrente de pais nunca deveria ciclar
                break;
            }
        }
        None
    }

    /// Devolve os recursos de plataforma e recicla o slot na fila de livres
    pub(crate) fn release_slot(&mut self, slot: SlotId) {
        debug_assert!(
            slot != IDLE_SLOT && slot != ROOT_SLOT,
            "slots reservados nunca são liberados"
        );
        debug_assert!(self.queues.membership(slot).is_none());

        let pcb = &self.table[slot];
        let kernel_stack = pcb.kernel_stack;
        let user_stack = pcb.user_stack;
        let pgdir = pcb.pgdir;
        let owns_pgdir = pcb.owns_pgdir;

        if !kernel_stack.is_null() {
            self.platform.release_stack(StackKind::Kernel, kernel_stack);
        }
        if !user_stack.is_null() {
            self.platform.release_stack(StackKind::User, user_stack);
        }
        if owns_pgdir {
            self.platform.release_page_table(pgdir);
        }

        let pcb = &mut self.table[slot];
        pcb.kernel_stack = VirtAddr::NULL;
        pcb.user_stack = VirtAddr::NULL;
        pcb.pgdir = PageTableRoot::KERNEL;
        pcb.owns_pgdir = false;
        pcb.status = TaskStatus::Exited;
        pcb.killed = false;
        pcb.wait_target = None;
        self.queues.enqueue(slot, QueueId::Available);
    }

    /// Pede o término cooperativo de uma tarefa: marca a flag e, se ela
    /// está bloqueada, devolve-a à fila de prontos para que alcance o
    /// próximo ponto de escalonamento, onde o desmonte acontece.
    pub fn do_kill(&mut self, pid: Pid) -> KernelResult<()> {
        let slot = match self.table.find_by_pid(pid) {
            Some(slot) => slot,
            None => return Err(Errno::ESRCH),
        };
        if slot == IDLE_SLOT || slot == ROOT_SLOT {
            return Err(Errno::EPERM);
        }
        crate::kinfo!("(Task) kill pid={}", pid.as_u32());
        self.table[slot].killed = true;
        if self.table[slot].status == TaskStatus::Blocked {
            let _ = self.do_unblock(slot);
        }
        Ok(())
    }

    // =========================================================================
    // BLOQUEIO
    // =========================================================================

    /// Move uma tarefa para uma fila de bloqueio. Quem bloqueia a si mesma
    /// deve chamar `do_scheduler` em seguida.
    pub fn do_block(&mut self, slot: SlotId, queue: QueueId) -> KernelResult<()> {
        if !matches!(queue, QueueId::Blocked | QueueId::FileOp) {
            return Err(Errno::EINVAL);
        }
        if slot == IDLE_SLOT {
            // a idle é o fallback do escalonador; bloqueá-la mataria o sistema
            return Err(Errno::EPERM);
        }
        if self.table[slot].status.is_terminated() {
            return Err(Errno::ESRCH);
        }
        self.queues.dequeue(slot);
        self.table[slot].status = TaskStatus::Blocked;
        self.queues.enqueue(slot, queue);
        Ok(())
    }

    /// Devolve uma tarefa bloqueada à fila de prontos.
    ///
    /// Desbloquear quem não está bloqueado é erro do chamador, detectado
    /// pela tag de pertencimento e devolvido como `EINVAL`.
    pub fn do_unblock(&mut self, slot: SlotId) -> KernelResult<()> {
        match self.queues.membership(slot) {
            Some(QueueId::Blocked) | Some(QueueId::FileOp) => {
                self.queues.dequeue(slot);
                let pcb = &mut self.table[slot];
                pcb.status = TaskStatus::Ready;
                pcb.wait_target = None;
                self.queues.enqueue(slot, QueueId::Ready);
                Ok(())
            }
            _ => {
                crate::kwarn!(
                    "(Task) do_unblock em tarefa não bloqueada pid={}",
                    self.table[slot].pid.as_u32()
                );
                Err(Errno::EINVAL)
            }
        }
    }

    // =========================================================================
    // WAIT
    // =========================================================================

    /// Espera um filho terminar e colhe o status dele.
    ///
    /// `pid > 0` espera aquele filho; `pid <= 0` espera qualquer um. Sem
    /// filho correspondente: `ECHILD`. Com `WNOHANG` e nenhum zumbi ainda:
    /// `Ok(Pid(0))`. O slot do filho só volta para a fila de livres depois
    /// desta colheita.
    pub fn do_wait4(
        &mut self,
        pid: i32,
        status_out: Option<&mut u16>,
        options: WaitOptions,
    ) -> KernelResult<Pid> {
        let mut status_out = status_out;
        let caller = self.current;
        let target = if pid > 0 {
            WaitTarget::Child(Pid(pid as u32))
        } else {
            WaitTarget::AnyChild
        };

        if !self.has_child(caller, target) {
            return Err(Errno::ECHILD);
        }

        if let Some(zombie) = self.find_zombie_child(caller, target) {
            return Ok(self.reap(zombie, &mut status_out));
        }

        if options.contains(WaitOptions::WNOHANG) {
            return Ok(Pid(0));
        }

        // marca os filhos elegíveis para nos acordar no exit e dorme
        self.flag_children_for_notify(caller, target);
        self.table[caller].wait_target = Some(target);
        self.do_block(caller, QueueId::Blocked)?;
        self.do_scheduler();

        // só voltamos para cá depois que um exit nos acordou
        if let Some(zombie) = self.find_zombie_child(caller, target) {
            return Ok(self.reap(zombie, &mut status_out));
        }
        // acordado sem zumbi correspondente (ex: kill durante o wait)
        Err(Errno::EINTR)
    }

    /// Forma curta de wait: espera o filho dado, descarta o status
    pub fn do_waitpid(&mut self, pid: i32) -> KernelResult<Pid> {
        self.do_wait4(pid, None, WaitOptions::empty())
    }

    fn has_child(&self, parent: SlotId, target: WaitTarget) -> bool {
        self.table.iter().any(|(_, pcb)| {
            pcb.status != TaskStatus::Exited
                && pcb.parent == Some(parent)
                && match target {
                    WaitTarget::AnyChild => true,
                    WaitTarget::Child(pid) => pcb.pid == pid,
                }
        })
    }

    fn find_zombie_child(&self, parent: SlotId, target: WaitTarget) -> Option<SlotId> {
        self.table.iter().find_map(|(slot, pcb)| {
            let hit = pcb.status == TaskStatus::Zombie
                && pcb.parent == Some(parent)
                && match target {
                    WaitTarget::AnyChild => true,
                    WaitTarget::Child(pid) => pcb.pid == pid,
                };
            if hit {
                Some(slot)
            } else {
                None
            }
        })
    }

    fn flag_children_for_notify(&mut self, parent: SlotId, target: WaitTarget) {
        for i in 0..NUM_MAX_TASK {
            let pcb = &mut self.table[SlotId(i)];
            if pcb.status == TaskStatus::Exited || pcb.parent != Some(parent) {
                continue;
            }
            let hit = match target {
                WaitTarget::AnyChild => true,
                WaitTarget::Child(pid) => pcb.pid == pid,
            };
            if hit {
                pcb.parent_flags.insert(ParentFlags::WAIT_NOTIFY);
            }
        }
    }

    /// Colhe um zumbi: copia o status para o chamador e libera o slot
    fn reap(&mut self, zombie: SlotId, status_out: &mut Option<&mut u16>) -> Pid {
        let pid = self.table[zombie].pid;
        let status = self.table[zombie].exit_status;
        if let Some(out) = status_out.as_deref_mut() {
            *out = encode_wait_status(status);
        }
        crate::kdebug!("(Task) reap de zumbi pid={} status={}", pid.as_u32(), status);
        self.release_slot(zombie);
        pid
    }

    // =========================================================================
    // SLEEP
    // =========================================================================

    /// Bloqueia a tarefa corrente por `ticks` ticks de timer. O wake
    /// acontece depois do prazo e antes da próxima decisão de
    /// escalonamento olhar a fila de prontos.
    pub fn do_sleep(&mut self, ticks: u64) -> KernelResult<()> {
        if ticks == 0 {
            self.do_yield();
            return Ok(());
        }
        let slot = self.current;
        let pid = self.table[slot].pid;
        self.do_block(slot, QueueId::Blocked)?;
        self.timer_create(wake_by_pid, pid.as_u32() as usize, ticks);
        self.do_scheduler();
        Ok(())
    }

    /// Converte o timespec para ticks na base de tempo da plataforma e
    /// dorme. `EINVAL` para timespec malformado.
    pub fn do_nanosleep(&mut self, ts: &TimeSpec) -> KernelResult<()> {
        if ts.tv_sec < 0 || ts.tv_nsec < 0 || ts.tv_nsec >= NANOS_PER_SEC {
            return Err(Errno::EINVAL);
        }
        let base = self.platform.time_base() as u128;
        let ticks =
            ts.tv_sec as u128 * base + (ts.tv_nsec as u128 * base) / NANOS_PER_SEC as u128;
        self.do_sleep(ticks as u64)
    }

    // =========================================================================
    // IDENTIDADE E AFINIDADE
    // =========================================================================

    /// PID da tarefa corrente
    pub fn do_getpid(&self) -> Pid {
        self.table[self.current].pid
    }

    /// PID do pai da tarefa corrente (as reservadas do boot respondem 0)
    pub fn do_getppid(&self) -> Pid {
        match self.table[self.current].parent {
            Some(parent) => self.table[parent].pid,
            None => Pid::IDLE,
        }
    }

    /// Define a máscara de afinidade de CPU de uma tarefa. Máscara vazia é
    /// `EINVAL`: tornaria a tarefa inescalonável para sempre.
    pub fn do_taskset(&mut self, pid: Pid, mask: u64) -> KernelResult<()> {
        if mask == 0 {
            return Err(Errno::EINVAL);
        }
        let slot = match self.table.find_by_pid(pid) {
            Some(slot) => slot,
            None => return Err(Errno::ESRCH),
        };
        self.table[slot].mask = CpuMask::from_bits_retain(mask);
        Ok(())
    }
}

/// Callback de timer que devolve uma tarefa adormecida à fila de prontos.
///
/// O argumento é o PID, não o slot: se a tarefa morreu e o slot foi
/// reciclado nesse meio tempo, o wake não acerta a tarefa errada.
fn wake_by_pid(core: &mut Core, arg: usize) {
    let pid = Pid(arg as u32);
    match core.table.find_by_pid(pid) {
        Some(slot) if core.table[slot].status == TaskStatus::Blocked => {
            let _ = core.do_unblock(slot);
        }
        _ => {
            crate::ktrace!("(Timer) wake para pid={} já finalizado", arg);
        }
    }
}
