// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Sistema de logging do núcleo com custo ZERO em release.
//
// ARQUITETURA:
// - Usa features do Cargo para compile-time filtering: com "no_logs" TODOS
//   os macros viram expressões vazias.
// - O backend é a fachada `log`; quem instala o sink (serial, ring buffer)
//   é o kernel hospedeiro. Este crate não conhece dispositivo nenhum.
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada operação)
//
// COMO USAR:
//   kinfo!("(Sched) troca de contexto pid={} -> pid={}", antigo, novo);
//
// =============================================================================

/// kerror! - Sempre ativo (exceto com no_logs).
/// Usado para erros críticos que podem causar crash.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

/// kwarn! - Ativo exceto com no_logs.
/// Usado para situações suspeitas mas recuperáveis.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

/// kinfo! - Ativo com log_info ou superior.
/// Usado para eventos importantes do fluxo normal.
#[cfg(any(feature = "log_info", feature = "log_debug", feature = "log_trace"))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log_info", feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

/// kdebug! - Ativo apenas com log_debug ou log_trace.
#[cfg(any(feature = "log_debug", feature = "log_trace"))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

/// ktrace! - Ativo apenas com log_trace.
/// Usado para detalhes extremos de cada operação.
#[cfg(feature = "log_trace")]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

#[cfg(not(feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}
