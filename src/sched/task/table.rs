//! Tabela de tarefas (pool fixo de PCBs)
//!
//! Alocar tarefa é reservar um índice: a memória dos PCBs existe inteira
//! desde o boot. Quem controla quais slots estão livres é a fila
//! `Available`; aqui só mora o armazenamento e as buscas.

use core::ops::{Index, IndexMut};

use super::pcb::Pcb;
use super::state::TaskStatus;
use crate::sched::config::NUM_MAX_TASK;
use crate::sys::types::{Pid, SlotId};

/// Armazenamento de todos os PCBs
pub struct TaskTable {
    slots: [Pcb; NUM_MAX_TASK],
}

impl TaskTable {
    pub const fn new() -> Self {
        Self {
            slots: [Pcb::EMPTY; NUM_MAX_TASK],
        }
    }

    /// Procura o slot de um PID entre as tarefas não-Exited
    pub fn find_by_pid(&self, pid: Pid) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|pcb| pcb.pid == pid && pcb.status != TaskStatus::Exited)
            .map(SlotId)
    }

    /// Percorre todos os slots com seus índices
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Pcb)> {
        self.slots.iter().enumerate().map(|(i, p)| (SlotId(i), p))
    }

    /// Empresta dois slots distintos mutavelmente (necessário na troca de
    /// contexto: salvar em um, restaurar do outro).
    pub fn pair_mut(&mut self, a: SlotId, b: SlotId) -> (&mut Pcb, &mut Pcb) {
        assert!(a != b, "pair_mut exige slots distintos");
        if a.0 < b.0 {
            let (lo, hi) = self.slots.split_at_mut(b.0);
            (&mut lo[a.0], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(a.0);
            (&mut hi[0], &mut lo[b.0])
        }
    }
}

impl Index<SlotId> for TaskTable {
    type Output = Pcb;

    #[inline]
    fn index(&self, slot: SlotId) -> &Pcb {
        &self.slots[slot.0]
    }
}

impl IndexMut<SlotId> for TaskTable {
    #[inline]
    fn index_mut(&mut self, slot: SlotId) -> &mut Pcb {
        &mut self.slots[slot.0]
    }
}
