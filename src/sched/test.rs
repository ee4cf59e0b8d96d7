//! Testes do Scheduler
//!
//! Todos rodam em host sobre a plataforma simulada: o relógio só anda
//! quando o teste manda e cada decisão de escalonamento fica observável.

use std::collections::HashSet;
use std::sync::atomic::Ordering;

use crate::hal::mock::MockPlatform;
use crate::sched::config::{
    DEFAULT_PRIORITY, IDLE_SLOT, KILLED_EXIT_STATUS, NUM_MAX_TASK, NUM_RESERVED_SLOTS, ROOT_SLOT,
};
use crate::sched::core::Core;
use crate::sched::lifecycle::{encode_wait_status, CloneFlags, WaitOptions};
use crate::sched::queue::QueueId;
use crate::sched::task::pcb::{ParentFlags, TaskInfo};
use crate::sched::task::state::{SpawnMode, TaskStatus, TaskType};
use crate::sys::error::Errno;
use crate::sys::types::{Pid, SlotId, VirtAddr};

fn new_core() -> (Core, &'static MockPlatform) {
    let platform = MockPlatform::leak();
    (Core::new(platform), platform)
}

fn kernel_task(name: &'static str) -> TaskInfo {
    TaskInfo {
        entry: VirtAddr::new(0x4000_0000),
        task_type: TaskType::KernelThread,
        name,
    }
}

fn user_task(name: &'static str) -> TaskInfo {
    TaskInfo {
        entry: VirtAddr::new(0x1000),
        task_type: TaskType::UserProcess,
        name,
    }
}

fn spawn_kernel(core: &mut Core, name: &'static str) -> Pid {
    core.do_spawn(&kernel_task(name), 0, SpawnMode::EnterZombieOnExit)
        .expect("spawn deveria caber na tabela")
}

fn slot_of(core: &Core, pid: Pid) -> SlotId {
    core.table.find_by_pid(pid).expect("pid deveria estar vivo")
}

/// Em quantas filas o slot aparece de fato (varrendo as quatro)
fn queues_containing(core: &Core, slot: SlotId) -> usize {
    [
        QueueId::Available,
        QueueId::Ready,
        QueueId::Blocked,
        QueueId::FileOp,
    ]
    .iter()
    .filter(|&&q| core.queues.iter(q).any(|s| s == slot))
    .count()
}

fn schedule_until_current(core: &mut Core, pid: Pid) {
    for _ in 0..NUM_MAX_TASK * 2 {
        if core.current_pid() == pid {
            return;
        }
        core.do_scheduler();
    }
    panic!("pid {} nunca ganhou a CPU", pid.as_u32());
}

// =============================================================================
// BOOT E TABELA
// =============================================================================

#[test]
fn boot_reserves_idle_and_root() {
    let (core, _) = new_core();
    assert_eq!(core.current(), ROOT_SLOT);
    assert_eq!(core.current_pid(), Pid::INIT);
    assert_eq!(core.task(IDLE_SLOT).pid, Pid::IDLE);
    assert_eq!(core.task(IDLE_SLOT).status, TaskStatus::Ready);
    assert_eq!(core.task(ROOT_SLOT).status, TaskStatus::Running);
    assert_eq!(
        core.queues.len(QueueId::Available),
        NUM_MAX_TASK - NUM_RESERVED_SLOTS
    );
    // reservadas vivem fora das filas
    assert_eq!(queues_containing(&core, IDLE_SLOT), 0);
    assert_eq!(queues_containing(&core, ROOT_SLOT), 0);
}

#[test]
fn spawn_creates_ready_child_of_current() {
    let (mut core, _) = new_core();
    let pid = spawn_kernel(&mut core, "filho");
    let slot = slot_of(&core, pid);
    assert_eq!(core.task(slot).status, TaskStatus::Ready);
    assert_eq!(core.task(slot).parent, Some(ROOT_SLOT));
    assert_eq!(core.task(slot).priority, DEFAULT_PRIORITY);
    assert_eq!(core.queues.membership(slot), Some(QueueId::Ready));
    assert_eq!(core.task(slot).name_str(), "filho");
}

#[test]
fn spawn_fails_with_eagain_when_table_full() {
    let (mut core, _) = new_core();
    let mut pids = HashSet::new();
    for _ in 0..NUM_MAX_TASK - NUM_RESERVED_SLOTS {
        assert!(pids.insert(spawn_kernel(&mut core, "carga")));
    }
    let result = core.do_spawn(&kernel_task("excesso"), 0, SpawnMode::DEFAULT);
    assert_eq!(result, Err(Errno::EAGAIN));
    // todos os pids vivos continuam únicos
    assert_eq!(pids.len(), NUM_MAX_TASK - NUM_RESERVED_SLOTS);
}

#[test]
fn spawn_rolls_back_slot_when_stack_allocation_fails() {
    let (mut core, platform) = new_core();
    let available = core.queues.len(QueueId::Available);
    platform.fail_stack_alloc.store(true, Ordering::SeqCst);
    let result = core.do_spawn(&kernel_task("sem-memória"), 0, SpawnMode::DEFAULT);
    assert_eq!(result, Err(Errno::ENOMEM));
    assert_eq!(core.queues.len(QueueId::Available), available);
    platform.fail_stack_alloc.store(false, Ordering::SeqCst);
}

#[test]
fn user_spawn_rolls_back_stacks_when_page_table_fails() {
    let (mut core, platform) = new_core();
    platform.fail_page_table_alloc.store(true, Ordering::SeqCst);
    let result = core.do_spawn(&user_task("sem-pgdir"), 0, SpawnMode::DEFAULT);
    assert_eq!(result, Err(Errno::ENOMEM));
    // as duas pilhas alocadas no caminho foram devolvidas
    assert_eq!(platform.stacks_alive.load(Ordering::SeqCst), 0);
    platform.fail_page_table_alloc.store(false, Ordering::SeqCst);
}

#[test]
fn user_spawn_allocates_own_address_space() {
    let (mut core, platform) = new_core();
    let pid = core
        .do_spawn(&user_task("programa"), 0, SpawnMode::DEFAULT)
        .unwrap();
    let slot = slot_of(&core, pid);
    let pcb = core.task(slot);
    assert!(pcb.owns_pgdir);
    assert_ne!(pcb.pgdir.as_u64(), 0);
    assert!(!pcb.kernel_stack.is_null());
    assert!(!pcb.user_stack.is_null());
    assert_eq!(platform.page_tables_alive.load(Ordering::SeqCst), 1);
    assert_eq!(platform.stacks_alive.load(Ordering::SeqCst), 2);
}

#[test]
fn live_tasks_never_exceed_capacity_and_pids_stay_unique() {
    let (mut core, _) = new_core();
    // mistura spawn/exit algumas rodadas e confere o invariante global
    for round in 0..3 {
        let mut spawned = Vec::new();
        for i in 0..4 {
            spawned.push(spawn_kernel(&mut core, if i % 2 == 0 { "par" } else { "ímpar" }));
        }
        if round % 2 == 0 {
            let victim = spawned[0];
            schedule_until_current(&mut core, victim);
            core.do_exit(0);
        }
        let mut live = 0;
        let mut pids = HashSet::new();
        for (_, pcb) in core.table.iter() {
            if pcb.status != TaskStatus::Exited {
                live += 1;
                assert!(pids.insert(pcb.pid), "pid duplicado entre vivos");
            }
        }
        assert!(live <= NUM_MAX_TASK);
    }
}

// =============================================================================
// FILAS
// =============================================================================

#[test]
fn task_belongs_to_exactly_one_queue() {
    let (mut core, _) = new_core();
    let pid = spawn_kernel(&mut core, "andarilho");
    let slot = slot_of(&core, pid);

    assert_eq!(queues_containing(&core, slot), 1);
    assert_eq!(core.queues.membership(slot), Some(QueueId::Ready));

    core.do_block(slot, QueueId::FileOp).unwrap();
    assert_eq!(queues_containing(&core, slot), 1);
    assert_eq!(core.queues.membership(slot), Some(QueueId::FileOp));

    core.do_unblock(slot).unwrap();
    assert_eq!(queues_containing(&core, slot), 1);
    assert_eq!(core.queues.membership(slot), Some(QueueId::Ready));

    schedule_until_current(&mut core, pid);
    // RUNNING fica fora de todas as filas
    assert_eq!(queues_containing(&core, slot), 0);
}

#[test]
fn queue_traversal_is_fifo() {
    let (mut core, _) = new_core();
    let pa = spawn_kernel(&mut core, "a");
    let a = slot_of(&core, pa);
    let pb = spawn_kernel(&mut core, "b");
    let b = slot_of(&core, pb);
    let pc = spawn_kernel(&mut core, "c");
    let c = slot_of(&core, pc);
    let order: Vec<SlotId> = core.queues.iter(QueueId::Ready).collect();
    assert_eq!(order, vec![a, b, c]);
}

// =============================================================================
// BLOQUEIO E DESBLOQUEIO
// =============================================================================

#[test]
fn block_then_unblock_returns_task_to_ready_exactly_once() {
    let (mut core, _) = new_core();
    let pid = spawn_kernel(&mut core, "dorminhoco");
    let slot = slot_of(&core, pid);

    core.do_block(slot, QueueId::Blocked).unwrap();
    assert_eq!(core.task(slot).status, TaskStatus::Blocked);
    assert_eq!(core.queues.membership(slot), Some(QueueId::Blocked));

    core.do_unblock(slot).unwrap();
    assert_eq!(core.task(slot).status, TaskStatus::Ready);
    assert_eq!(core.queues.membership(slot), Some(QueueId::Ready));
    assert_eq!(core.queues.len(QueueId::Ready), 1);
}

#[test]
fn unblock_of_non_blocked_task_is_reported_as_einval() {
    let (mut core, _) = new_core();
    let pid = spawn_kernel(&mut core, "acordado");
    let slot = slot_of(&core, pid);

    // pronta, não bloqueada: erro do chamador detectado pela tag
    assert_eq!(core.do_unblock(slot), Err(Errno::EINVAL));
    // idem para a tarefa corrente (RUNNING)
    assert_eq!(core.do_unblock(ROOT_SLOT), Err(Errno::EINVAL));
    // o estado não mudou
    assert_eq!(core.task(slot).status, TaskStatus::Ready);
}

#[test]
fn block_rejects_invalid_targets() {
    let (mut core, _) = new_core();
    let pid = spawn_kernel(&mut core, "alvo");
    let slot = slot_of(&core, pid);
    // só as filas de bloqueio aceitam tarefas
    assert_eq!(core.do_block(slot, QueueId::Ready), Err(Errno::EINVAL));
    assert_eq!(core.do_block(IDLE_SLOT, QueueId::Blocked), Err(Errno::EPERM));
}

// =============================================================================
// ESCALONADOR
// =============================================================================

#[test]
fn round_robin_runs_each_equal_priority_task_once_per_cycle() {
    let (mut core, _) = new_core();
    let a = spawn_kernel(&mut core, "a");
    let b = spawn_kernel(&mut core, "b");
    let c = spawn_kernel(&mut core, "c");

    // quatro tarefas iguais (a raiz inclusa): quatro decisões, quatro
    // correntes distintas: ninguém repete antes de todo mundo rodar
    let mut first_cycle = Vec::new();
    for _ in 0..4 {
        core.do_scheduler();
        first_cycle.push(core.current_pid());
    }
    let unique: HashSet<Pid> = first_cycle.iter().copied().collect();
    assert_eq!(unique.len(), 4);
    assert!(unique.contains(&a) && unique.contains(&b) && unique.contains(&c));

    // o segundo ciclo repete a mesma volta
    let mut second_cycle = Vec::new();
    for _ in 0..4 {
        core.do_scheduler();
        second_cycle.push(core.current_pid());
    }
    assert_eq!(first_cycle, second_cycle);
}

#[test]
fn scheduler_prefers_higher_effective_priority() {
    let (mut core, _) = new_core();
    let low = spawn_kernel(&mut core, "baixa");
    let high = spawn_kernel(&mut core, "alta");
    let high_slot = slot_of(&core, high);
    core.table[high_slot].priority = 5;
    core.table[high_slot].temp_priority = 5;

    core.do_scheduler();
    assert_eq!(core.current_pid(), high);
    let _ = low;
}

#[test]
fn aging_prevents_starvation_of_low_priority_tasks() {
    let (mut core, _) = new_core();
    let low = spawn_kernel(&mut core, "baixa");
    let high = spawn_kernel(&mut core, "alta");
    let high_slot = slot_of(&core, high);
    core.table[high_slot].priority = 5;
    core.table[high_slot].temp_priority = 5;

    // a baixa envelhece a cada decisão perdida e eventualmente passa a alta
    let mut low_ran = false;
    for _ in 0..16 {
        core.do_scheduler();
        if core.current_pid() == low {
            low_ran = true;
            break;
        }
    }
    assert!(low_ran, "prioridade baixa nunca rodou (inanição)");
}

#[test]
fn empty_ready_queue_falls_back_to_idle() {
    let (mut core, _) = new_core();
    // bloqueia a raiz; sem mais ninguém pronto, a idle assume
    core.do_block(ROOT_SLOT, QueueId::Blocked).unwrap();
    core.do_scheduler();
    assert_eq!(core.current(), IDLE_SLOT);
    assert_eq!(core.current_pid(), Pid::IDLE);
    assert_eq!(core.task(IDLE_SLOT).status, TaskStatus::Running);
}

#[test]
fn affinity_mask_excludes_task_from_this_core() {
    let (mut core, _) = new_core();
    let pinned = spawn_kernel(&mut core, "presa");
    // afinidade só com o núcleo 1; este é o núcleo 0
    core.do_taskset(pinned, 0b10).unwrap();

    for _ in 0..8 {
        core.do_scheduler();
        assert_ne!(core.current_pid(), pinned);
    }

    // devolvida ao núcleo 0, volta a ser elegível
    core.do_taskset(pinned, 0b01).unwrap();
    schedule_until_current(&mut core, pinned);
}

#[test]
fn taskset_validates_pid_and_mask() {
    let (mut core, _) = new_core();
    assert_eq!(core.do_taskset(Pid(999), 1), Err(Errno::ESRCH));
    let pid = spawn_kernel(&mut core, "alvo");
    assert_eq!(core.do_taskset(pid, 0), Err(Errno::EINVAL));
    assert_eq!(core.do_taskset(pid, 0b11), Ok(()));
}

#[test]
fn nested_preempt_disable_only_rearms_at_outer_enable() {
    let (mut core, platform) = new_core();

    core.disable_preempt();
    core.disable_preempt();
    assert!(!platform.irq_enabled.load(Ordering::SeqCst));
    assert_eq!(core.task(ROOT_SLOT).preempt_count, 2);

    // transição 2→1: o par interno NÃO pode rearmar interrupções
    core.enable_preempt();
    assert!(!platform.irq_enabled.load(Ordering::SeqCst));

    // transição 1→0: só o par externo rearma
    core.enable_preempt();
    assert!(platform.irq_enabled.load(Ordering::SeqCst));
}

// =============================================================================
// EXIT, WAIT E REPARENTING
// =============================================================================

#[test]
fn exit_turns_task_into_zombie_and_wait_reaps_exact_status() {
    let (mut core, _) = new_core();
    let child = spawn_kernel(&mut core, "efêmera");
    let child_slot = slot_of(&core, child);
    let available_before = core.queues.len(QueueId::Available);

    schedule_until_current(&mut core, child);
    core.do_exit(5);

    // zumbi: fora de todas as filas, status preservado, slot ainda ocupado
    assert_eq!(core.task(child_slot).status, TaskStatus::Zombie);
    assert_eq!(core.task(child_slot).exit_status, 5);
    assert_eq!(queues_containing(&core, child_slot), 0);
    assert_eq!(core.queues.len(QueueId::Available), available_before);
    assert_ne!(core.current_pid(), child);

    schedule_until_current(&mut core, Pid::INIT);
    let mut status = 0u16;
    let reaped = core
        .do_wait4(child.as_u32() as i32, Some(&mut status), WaitOptions::empty())
        .unwrap();
    assert_eq!(reaped, child);
    assert_eq!(status, encode_wait_status(5));
    // o slot só volta para a fila de livres depois da colheita
    assert_eq!(core.queues.len(QueueId::Available), available_before + 1);
    assert_eq!(core.task(child_slot).status, TaskStatus::Exited);
}

#[test]
fn exit_releases_file_descriptors() {
    let (mut core, _) = new_core();
    let child = spawn_kernel(&mut core, "com-arquivos");
    let child_slot = slot_of(&core, child);
    core.table[child_slot].fd[3].used = true;
    core.table[child_slot].fd[3].length = 512;

    schedule_until_current(&mut core, child);
    core.do_exit(0);

    assert!(!core.task(child_slot).fd[3].used);
    assert_eq!(core.task(child_slot).fd[3].length, 0);
}

#[test]
fn wait_blocks_caller_until_child_exit_wakes_it() {
    let (mut core, _) = new_core();
    let child = spawn_kernel(&mut core, "demorada");
    let child_slot = slot_of(&core, child);

    // sem zumbi ainda: a raiz bloqueia e a CPU vai para a filha.
    // Na plataforma real o wait só retornaria depois do wake; na simulada a
    // chamada devolve EINTR e o estado bloqueado fica registrado.
    let result = core.do_wait4(child.as_u32() as i32, None, WaitOptions::empty());
    assert_eq!(result, Err(Errno::EINTR));
    assert_eq!(core.task(ROOT_SLOT).status, TaskStatus::Blocked);
    assert_eq!(core.queues.membership(ROOT_SLOT), Some(QueueId::Blocked));
    assert!(core.task(child_slot).parent_flags.contains(ParentFlags::WAIT_NOTIFY));
    assert_eq!(core.current_pid(), child);

    // o exit da filha acorda a raiz antes da decisão de escalonamento que o
    // próprio exit dispara: a raiz volta direto para a CPU
    core.do_exit(42);
    assert_eq!(core.current_pid(), Pid::INIT);
    assert_eq!(core.task(ROOT_SLOT).status, TaskStatus::Running);
    assert_eq!(core.task(ROOT_SLOT).wait_target, None);
    let mut status = 0u16;
    let reaped = core
        .do_wait4(child.as_u32() as i32, Some(&mut status), WaitOptions::empty())
        .unwrap();
    assert_eq!(reaped, child);
    assert_eq!(status, encode_wait_status(42));
}

#[test]
fn wait_on_unrelated_pid_fails_with_echild() {
    let (mut core, _) = new_core();
    assert_eq!(core.do_waitpid(999), Err(Errno::ECHILD));

    // neta não é filha: também ECHILD
    let child = spawn_kernel(&mut core, "filha");
    schedule_until_current(&mut core, child);
    let grandchild = spawn_kernel(&mut core, "neta");
    schedule_until_current(&mut core, Pid::INIT);
    assert_eq!(core.do_waitpid(grandchild.as_u32() as i32), Err(Errno::ECHILD));
}

#[test]
fn wait_with_wnohang_returns_without_blocking() {
    let (mut core, _) = new_core();
    let child = spawn_kernel(&mut core, "viva");
    let result = core
        .do_wait4(child.as_u32() as i32, None, WaitOptions::WNOHANG)
        .unwrap();
    assert_eq!(result, Pid(0));
    assert_eq!(core.task(ROOT_SLOT).status, TaskStatus::Running);
}

#[test]
fn auto_cleanup_exit_frees_slot_without_zombie() {
    let (mut core, _) = new_core();
    let available_before = core.queues.len(QueueId::Available);
    let child = core
        .do_spawn(&kernel_task("descartável"), 0, SpawnMode::AutoCleanupOnExit)
        .unwrap();
    let child_slot = slot_of(&core, child);

    schedule_until_current(&mut core, child);
    core.do_exit(0);

    assert_eq!(core.task(child_slot).status, TaskStatus::Exited);
    assert_eq!(core.queues.membership(child_slot), Some(QueueId::Available));
    assert_eq!(core.queues.len(QueueId::Available), available_before);
}

#[test]
fn orphans_are_reparented_to_surviving_ancestor() {
    let (mut core, _) = new_core();
    let parent = spawn_kernel(&mut core, "mãe");
    schedule_until_current(&mut core, parent);
    let orphan = spawn_kernel(&mut core, "órfã");
    let orphan_slot = slot_of(&core, orphan);
    assert_eq!(core.task(orphan_slot).parent, Some(slot_of(&core, parent)));

    // a mãe sai; a órfã é adotada pelo ancestral vivo (a raiz)
    core.do_exit(0);
    assert_eq!(core.task(orphan_slot).parent, Some(ROOT_SLOT));
    assert!(core.task(orphan_slot).parent_flags.contains(ParentFlags::REPARENTED));

    // e continua escalonável
    schedule_until_current(&mut core, orphan);

    // a adotante pode colher a órfã (a mãe zumbi continua esperando colheita)
    core.do_exit(7);
    schedule_until_current(&mut core, Pid::INIT);
    let mut status = 0u16;
    let reaped = core
        .do_wait4(orphan.as_u32() as i32, Some(&mut status), WaitOptions::empty())
        .unwrap();
    assert_eq!(reaped, orphan);
    assert_eq!(status, encode_wait_status(7));
}

// =============================================================================
// KILL
// =============================================================================

#[test]
fn kill_is_cooperative_and_lands_at_next_schedule_point() {
    let (mut core, _) = new_core();
    let victim = spawn_kernel(&mut core, "vítima");
    let victim_slot = slot_of(&core, victim);

    core.do_kill(victim).unwrap();
    // nada desmontado ainda: só a flag
    assert!(core.task(victim_slot).killed);
    assert_eq!(core.task(victim_slot).status, TaskStatus::Ready);

    // no próximo ponto de escalonamento a vítima nunca ganha a CPU:
    // segue direto para o caminho de término
    core.do_scheduler();
    assert_ne!(core.current_pid(), victim);
    assert_eq!(core.task(victim_slot).status, TaskStatus::Zombie);
    assert_eq!(core.task(victim_slot).exit_status, KILLED_EXIT_STATUS);
}

#[test]
fn kill_wakes_blocked_victim_so_teardown_can_happen() {
    let (mut core, _) = new_core();
    let victim = spawn_kernel(&mut core, "adormecida");
    let victim_slot = slot_of(&core, victim);
    core.do_block(victim_slot, QueueId::Blocked).unwrap();

    core.do_kill(victim).unwrap();
    assert_eq!(core.task(victim_slot).status, TaskStatus::Ready);

    core.do_scheduler();
    assert_eq!(core.task(victim_slot).status, TaskStatus::Zombie);
}

#[test]
fn kill_validates_target() {
    let (mut core, _) = new_core();
    assert_eq!(core.do_kill(Pid(12345)), Err(Errno::ESRCH));
    assert_eq!(core.do_kill(Pid::IDLE), Err(Errno::EPERM));
    assert_eq!(core.do_kill(Pid::INIT), Err(Errno::EPERM));
}

// =============================================================================
// CLONE E EXEC
// =============================================================================

#[test]
fn clone_duplicates_current_task_with_fresh_pid() {
    let (mut core, _) = new_core();
    core.table[ROOT_SLOT].fd[2].used = true;
    core.table[ROOT_SLOT].fd[2].length = 99;

    let child = core
        .do_clone(CloneFlags::empty(), VirtAddr::NULL, 0, VirtAddr::NULL, 0)
        .unwrap();
    let child_slot = slot_of(&core, child);

    assert_ne!(child, Pid::INIT);
    assert_eq!(core.task(child_slot).parent, Some(ROOT_SLOT));
    assert_eq!(core.task(child_slot).status, TaskStatus::Ready);
    // o filho observa retorno zero no registrador preparado pela plataforma
    assert_eq!(core.task(child_slot).context.regs[13], 0);
    // tabela de FDs copiada (eager)
    assert!(core.task(child_slot).fd[2].used);
    assert_eq!(core.task(child_slot).fd[2].length, 99);
    // espaço de endereçamento próprio quando não há CLONE_VM
    assert!(core.task(child_slot).owns_pgdir);
}

#[test]
fn clone_with_vm_shares_address_space_and_takes_given_stack() {
    let (mut core, _) = new_core();
    let stack = VirtAddr::new(0x7fff_0000);
    let child = core
        .do_clone(CloneFlags::VM, stack, 0, VirtAddr::NULL, 0)
        .unwrap();
    let child_slot = slot_of(&core, child);

    assert_eq!(core.task(child_slot).pgdir, core.task(ROOT_SLOT).pgdir);
    assert!(!core.task(child_slot).owns_pgdir);
    assert_eq!(core.task(child_slot).context.user_sp, stack);
}

#[test]
fn exec_replaces_image_but_keeps_identity() {
    let (mut core, _) = new_core();
    let pid_before = core.do_getpid();
    core.do_exec(&user_task("shell"), 3).unwrap();

    assert_eq!(core.do_getpid(), pid_before);
    let pcb = core.task(ROOT_SLOT);
    assert_eq!(pcb.name_str(), "shell");
    assert_eq!(pcb.task_type, TaskType::UserProcess);
    // contexto reconstruído para a imagem nova (entry no registrador 0)
    assert_eq!(pcb.context.regs[0], 0x1000);
    assert_eq!(pcb.context.regs[1], 3);
    assert!(!pcb.user_stack.is_null());
}

// =============================================================================
// IDENTIDADE E DIAGNÓSTICO
// =============================================================================

#[test]
fn getpid_and_getppid_follow_parent_chain() {
    let (mut core, _) = new_core();
    assert_eq!(core.do_getpid(), Pid::INIT);
    assert_eq!(core.do_getppid(), Pid::IDLE);

    let child = spawn_kernel(&mut core, "filha");
    schedule_until_current(&mut core, child);
    assert_eq!(core.do_getpid(), child);
    assert_eq!(core.do_getppid(), Pid::INIT);
}

#[test]
fn process_show_lists_live_tasks() {
    let (mut core, _) = new_core();
    // idle + raiz
    assert_eq!(core.do_process_show(), 2);
    spawn_kernel(&mut core, "a");
    spawn_kernel(&mut core, "b");
    assert_eq!(core.do_process_show(), 4);
}
