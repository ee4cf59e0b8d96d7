//! # Interface de Syscalls (thin dispatch)
//!
//! Funções `do_*` livres sobre a instância global do núcleo: a camada de
//! despacho do kernel extrai os argumentos dos registradores (colaborador
//! externo) e chama para cá. Erros viram `isize` negativo via
//! [`crate::sys::Errno::as_isize`] no despacho.

pub mod process;
pub mod time;
