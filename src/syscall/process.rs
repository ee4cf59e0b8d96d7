//! Syscalls de processo: criação, término, espera e identidade

use crate::sched::core::with_core;
use crate::sched::lifecycle::{CloneFlags, WaitOptions};
use crate::sched::task::pcb::TaskInfo;
use crate::sched::task::state::SpawnMode;
use crate::sys::error::KernelResult;
use crate::sys::types::{Pid, VirtAddr};

/// Cria uma tarefa filha da corrente e a enfileira como pronta
pub fn do_spawn(info: &TaskInfo, arg: usize, mode: SpawnMode) -> KernelResult<Pid> {
    with_core(|core| core.do_spawn(info, arg, mode))
}

/// Duplica a tarefa corrente (fork)
pub fn do_clone(
    flags: CloneFlags,
    stack: VirtAddr,
    ptid: usize,
    tls: VirtAddr,
    ctid: usize,
) -> KernelResult<Pid> {
    with_core(|core| core.do_clone(flags, stack, ptid, tls, ctid))
}

/// Substitui a imagem da tarefa corrente
pub fn do_exec(image: &TaskInfo, arg: usize) -> KernelResult<()> {
    with_core(|core| core.do_exec(image, arg))
}

/// Termina a tarefa corrente (não retorna no kernel real)
pub fn do_exit(status: i32) {
    with_core(|core| core.do_exit(status));
}

/// Espera um filho e colhe o status
pub fn do_wait4(pid: i32, status: Option<&mut u16>, options: WaitOptions) -> KernelResult<Pid> {
    with_core(|core| core.do_wait4(pid, status, options))
}

/// Espera o filho dado, descartando o status
pub fn do_waitpid(pid: i32) -> KernelResult<Pid> {
    with_core(|core| core.do_waitpid(pid))
}

/// Pede o término cooperativo de uma tarefa
pub fn do_kill(pid: Pid) -> KernelResult<()> {
    with_core(|core| core.do_kill(pid))
}

/// Cede a CPU voluntariamente
pub fn do_sched_yield() {
    with_core(|core| core.do_yield());
}

/// Invoca o escalonador diretamente (drivers e pontos de bloqueio)
pub fn do_scheduler() {
    with_core(|core| core.do_scheduler());
}

/// PID da tarefa corrente
pub fn do_getpid() -> Pid {
    with_core(|core| core.do_getpid())
}

/// PID do pai da tarefa corrente
pub fn do_getppid() -> Pid {
    with_core(|core| core.do_getppid())
}

/// Define a máscara de afinidade de CPU de uma tarefa
pub fn do_taskset(pid: Pid, mask: u64) -> KernelResult<()> {
    with_core(|core| core.do_taskset(pid, mask))
}

/// Lista as tarefas vivas no log; retorna quantas foram mostradas
pub fn do_process_show() -> usize {
    with_core(|core| core.do_process_show())
}
