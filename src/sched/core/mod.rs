//! Núcleo do escalonador: objeto de contexto, instância global e boot

pub mod debug;
pub mod scheduler;

pub use scheduler::Core;

use spin::{Mutex, Once};

use crate::hal::Platform;

/// Instância global do núcleo, criada uma única vez no boot.
static SCHED_CORE: Once<Mutex<Core>> = Once::new();

/// Inicializa o subsistema de escalonamento. Chamar uma única vez no boot,
/// antes de qualquer syscall ou interrupção de timer.
pub fn init(platform: &'static dyn Platform) {
    SCHED_CORE.call_once(|| Mutex::new(Core::new(platform)));
    crate::kinfo!("(Sched) sistema de agendamento pronto");
}

/// Executa `f` com o núcleo global travado.
///
/// Usar antes de `init` é violação de invariante de boot e derruba o kernel.
pub fn with_core<R>(f: impl FnOnce(&mut Core) -> R) -> R {
    let core = SCHED_CORE
        .get()
        .expect("núcleo de escalonamento usado antes de init()");
    let mut guard = core.lock();
    f(&mut guard)
}

/// Solta o lock global do núcleo sem passar pelo guard.
///
/// # Safety
/// Somente no início de tarefas recém-criadas: elas entram pela trampolim da
/// plataforma "herdando" o lock adquirido pela troca de contexto que as
/// lançou, sem ter o guard para soltá-lo.
pub unsafe fn release_core_lock() {
    if let Some(core) = SCHED_CORE.get() {
        core.force_unlock();
    }
}
