//! Diagnóstico do escalonador

use super::scheduler::Core;
use crate::sched::task::state::TaskStatus;

impl Core {
    /// Lista as tarefas vivas no log (`ps` do kernel). Retorna quantas
    /// entradas foram mostradas.
    pub fn do_process_show(&self) -> usize {
        crate::kinfo!("[PROCESS TABLE]");
        let mut shown = 0;
        for (slot, pcb) in self.table.iter() {
            if pcb.status == TaskStatus::Exited {
                continue;
            }
            crate::kinfo!(
                "[{:02}] pid={} name={} status={:?} prio={}/{} mask={:#x} stime={} utime={}",
                slot.0,
                pcb.pid.as_u32(),
                pcb.name_str(),
                pcb.status,
                pcb.priority,
                pcb.temp_priority,
                pcb.mask.bits(),
                pcb.accounting.stime,
                pcb.accounting.utime
            );
            shown += 1;
        }
        shown
    }
}
