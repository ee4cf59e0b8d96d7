//! # Standard Error Codes (Errno)
//!
//! Define os códigos de erro retornados pelo núcleo de escalonamento.
//! Segue o padrão POSIX/Linux para facilitar compatibilidade futura:
//! valores negativos são usados em retornos de syscalls (isize).
//!
//! Esgotar a tabela de tarefas é erro recuperável (`EAGAIN`); esgotar o pool
//! de timers é bug de contabilidade de recursos do kernel e derruba o
//! sistema por assert, sem passar por aqui.

/// Resultado padrão das operações do núcleo
pub type KernelResult<T> = Result<T, Errno>;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    /// Operation not permitted
    EPERM = 1,
    /// No such file or directory
    ENOENT = 2,
    /// No such process
    ESRCH = 3,
    /// Interrupted system call
    EINTR = 4,
    /// No child processes
    ECHILD = 10,
    /// Try again (tabela de tarefas cheia)
    EAGAIN = 11,
    /// Out of memory (pilha ou tabela de páginas indisponível)
    ENOMEM = 12,
    /// Invalid argument
    EINVAL = 22,
    /// Function not implemented
    ENOSYS = 38,
}

impl Errno {
    /// Converte para isize negativo (formato de retorno em registrador)
    #[inline]
    pub const fn as_isize(self) -> isize {
        -(self as i32 as isize)
    }
}
