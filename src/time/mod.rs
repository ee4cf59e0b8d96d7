//! # Tempo: ticks, relógio e timers por software
//!
//! O tick de hardware é a unidade de tempo do núcleo (time-base = ticks por
//! segundo, fornecido pela plataforma). Em cima dele vivem a contabilidade
//! de CPU (stime/utime), o relógio de parede derivado e o pool fixo de
//! timers que implementa sleep/timeout.

pub mod clock;
pub mod timer;


pub use clock::{TimeSpec, Tms, CLOCK_MONOTONIC, CLOCK_REALTIME};
pub use timer::{TimerCallback, NUM_TIMER};
