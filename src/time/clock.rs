//! Relógio e contabilidade de tempo de CPU
//!
//! `get_ticks`/`get_timer` expõem o contador da plataforma; o relógio de
//! parede é derivado de ticks + época plugável (nunca um valor fixo
//! inventado). A atribuição de tempo kernel/usuário funciona por
//! checkpoint: cada transição de modo cobra o delta desde a última.

use crate::sched::config::NUM_MAX_TASK;
use crate::sched::core::Core;
use crate::sched::task::state::TaskStatus;
use crate::sys::error::{Errno, KernelResult};
use crate::sys::types::SlotId;

pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Relógio de parede (POSIX)
pub const CLOCK_REALTIME: u64 = 0;
/// Tempo monotônico desde o boot
pub const CLOCK_MONOTONIC: u64 = 1;

/// Instante em segundos + nanossegundos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSpec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

impl TimeSpec {
    pub const ZERO: TimeSpec = TimeSpec {
        tv_sec: 0,
        tv_nsec: 0,
    };

    pub const fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }
}

/// Tempos de CPU no formato de `times(2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tms {
    pub tms_utime: u64,
    pub tms_stime: u64,
    pub tms_cutime: u64,
    pub tms_cstime: u64,
}

impl Core {
    // =========================================================================
    // ACESSORES DE TICK
    // =========================================================================

    /// Contador de ticks bruto da plataforma
    #[inline]
    pub fn get_ticks(&self) -> u64 {
        self.platform.read_ticks()
    }

    /// Segundos desde o boot
    #[inline]
    pub fn get_timer(&self) -> u64 {
        self.get_ticks() / self.platform.time_base()
    }

    /// Ticks por segundo
    #[inline]
    pub fn get_time_base(&self) -> u64 {
        self.platform.time_base()
    }

    // =========================================================================
    // CONTABILIDADE KERNEL/USUÁRIO
    // =========================================================================

    /// Cobra da tarefa corrente o tempo decorrido como tempo de kernel
    pub(crate) fn account_kernel_time(&mut self, now: u64) {
        let delta = now.saturating_sub(self.last_checkpoint);
        self.table[self.current].accounting.stime += delta;
        self.last_checkpoint = now;
    }

    /// Checkpoint na entrada do kernel: o delta desde o último checkpoint
    /// foi gasto em modo usuário.
    pub fn user_time_count(&mut self) {
        let now = self.platform.read_ticks();
        let delta = now.saturating_sub(self.last_checkpoint);
        self.table[self.current].accounting.utime += delta;
        self.last_checkpoint = now;
    }

    /// Checkpoint na saída do kernel: o delta desde o último checkpoint
    /// foi gasto em modo kernel.
    pub fn kernel_time_count(&mut self) {
        let now = self.platform.read_ticks();
        self.account_kernel_time(now);
    }

    // =========================================================================
    // RELÓGIOS
    // =========================================================================

    /// Tempo monotônico desde o boot como timespec
    fn monotonic_now(&self) -> TimeSpec {
        let now = self.platform.read_ticks();
        let base = self.platform.time_base();
        debug_assert!(base != 0, "time_base não configurada pela plataforma");
        let sec = (now / base) as i64;
        let rem = now % base;
        let nsec = (rem as u128 * NANOS_PER_SEC as u128 / base as u128) as i64;
        TimeSpec::new(sec, nsec)
    }

    /// Relógio de parede: época do boot (fonte externa plugável) + tempo
    /// monotônico decorrido.
    pub fn do_gettimeofday(&self, ts: &mut TimeSpec) -> KernelResult<()> {
        let epoch = self.platform.wall_clock_base();
        let mono = self.monotonic_now();
        let mut sec = epoch.tv_sec + mono.tv_sec;
        let mut nsec = epoch.tv_nsec + mono.tv_nsec;
        if nsec >= NANOS_PER_SEC {
            sec += 1;
            nsec -= NANOS_PER_SEC;
        }
        ts.tv_sec = sec;
        ts.tv_nsec = nsec;
        Ok(())
    }

    /// Leitura de relógio por id; ids desconhecidos são `EINVAL`
    pub fn do_clock_gettime(&self, clock_id: u64, tp: &mut TimeSpec) -> KernelResult<()> {
        match clock_id {
            CLOCK_REALTIME => self.do_gettimeofday(tp),
            CLOCK_MONOTONIC => {
                *tp = self.monotonic_now();
                Ok(())
            }
            _ => Err(Errno::EINVAL),
        }
    }

    /// Tempos de CPU da tarefa corrente e dos filhos; retorna o tick atual
    pub fn do_times(&self, tms: &mut Tms) -> u64 {
        let current = self.current;
        let acc = self.table[current].accounting;
        tms.tms_utime = acc.utime;
        tms.tms_stime = acc.stime;
        tms.tms_cutime = 0;
        tms.tms_cstime = 0;
        for i in 0..NUM_MAX_TASK {
            let pcb = self.task(SlotId(i));
            if pcb.parent == Some(current) && pcb.status != TaskStatus::Exited {
                tms.tms_cutime += pcb.accounting.utime;
                tms.tms_cstime += pcb.accounting.stime;
            }
        }
        self.platform.read_ticks()
    }
}
