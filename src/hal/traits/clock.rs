//! Porta de relógio (contador de ticks e base de tempo)

use crate::time::clock::TimeSpec;

/// Abstração da fonte de tempo da plataforma
pub trait ClockOps {
    /// Contador de ticks bruto do hardware (monotônico desde o boot).
    fn read_ticks(&self) -> u64;

    /// Ticks por segundo. Nunca zero depois do boot.
    fn time_base(&self) -> u64;

    /// Época de relógio de parede no instante do boot.
    ///
    /// Fonte externa plugável (RTC, rede). O padrão é zero: sem RTC o
    /// `gettimeofday` conta a partir do boot em vez de inventar uma época.
    fn wall_clock_base(&self) -> TimeSpec {
        TimeSpec::ZERO
    }
}
