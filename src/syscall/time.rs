//! Syscalls de tempo: sleep, relógios e contabilidade

use crate::sched::core::with_core;
use crate::sys::error::KernelResult;
use crate::time::clock::{TimeSpec, Tms};
use crate::time::timer::TimerCallback;

/// Dorme a tarefa corrente por `ticks` ticks de timer
pub fn do_sleep(ticks: u64) -> KernelResult<()> {
    with_core(|core| core.do_sleep(ticks))
}

/// Dorme a tarefa corrente pelo intervalo do timespec
pub fn do_nanosleep(ts: &TimeSpec) -> KernelResult<()> {
    with_core(|core| core.do_nanosleep(ts))
}

/// Relógio de parede (época do boot + tempo decorrido)
pub fn do_gettimeofday(ts: &mut TimeSpec) -> KernelResult<()> {
    with_core(|core| core.do_gettimeofday(ts))
}

/// Leitura de relógio por id
pub fn do_clock_gettime(clock_id: u64, tp: &mut TimeSpec) -> KernelResult<()> {
    with_core(|core| core.do_clock_gettime(clock_id, tp))
}

/// Tempos de CPU da tarefa corrente e dos filhos; retorna o tick atual
pub fn do_times(tms: &mut Tms) -> u64 {
    with_core(|core| core.do_times(tms))
}

/// Arma um timer de callback (API interna para drivers)
pub fn timer_create(callback: TimerCallback, arg: usize, ticks: u64) {
    with_core(|core| core.timer_create(callback, arg, ticks));
}

/// Entrada da interrupção de timer: checa timers e desconta quantum
pub fn do_tick() {
    with_core(|core| core.do_tick());
}

/// Contador de ticks bruto da plataforma
pub fn get_ticks() -> u64 {
    with_core(|core| core.get_ticks())
}

/// Segundos desde o boot
pub fn get_timer() -> u64 {
    with_core(|core| core.get_timer())
}

/// Ticks por segundo
pub fn get_time_base() -> u64 {
    with_core(|core| core.get_time_base())
}

/// Checkpoint de entrada no kernel (o delta foi tempo de usuário)
pub fn user_time_count() {
    with_core(|core| core.user_time_count());
}

/// Checkpoint de saída do kernel (o delta foi tempo de kernel)
pub fn kernel_time_count() {
    with_core(|core| core.kernel_time_count());
}
