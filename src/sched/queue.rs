//! Filas de pertencimento de tarefas
//!
//! Reimplementação das listas intrusivas clássicas como arena indexada: cada
//! slot carrega `{prev, next, fila}` e as quatro filas nomeadas são só
//! cabeça/cauda por índice. Mover uma tarefa de fila é O(1) e nunca toca
//! ponteiro cru.
//!
//! Invariante: um slot pertence a no máximo uma fila por vez; RUNNING e
//! ZOMBIE ficam fora de todas.

use crate::sched::config::NUM_MAX_TASK;
use crate::sys::types::SlotId;

/// Filas nomeadas do escalonador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueId {
    /// Slots livres da tabela de tarefas
    Available = 0,
    /// Prontas para executar
    Ready = 1,
    /// Fila geral de bloqueio (sleep, wait)
    Blocked = 2,
    /// Espera de dispositivo/operação de arquivo
    FileOp = 3,
}

impl QueueId {
    pub(crate) const COUNT: usize = 4;

    #[inline]
    const fn idx(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    queue: Option<QueueId>,
}

impl Link {
    const EMPTY: Link = Link {
        prev: None,
        next: None,
        queue: None,
    };
}

/// Conjunto das filas do escalonador sobre a arena de slots
pub struct QueueSet {
    links: [Link; NUM_MAX_TASK],
    head: [Option<SlotId>; QueueId::COUNT],
    tail: [Option<SlotId>; QueueId::COUNT],
    len: [usize; QueueId::COUNT],
}

impl QueueSet {
    pub const fn new() -> Self {
        Self {
            links: [Link::EMPTY; NUM_MAX_TASK],
            head: [None; QueueId::COUNT],
            tail: [None; QueueId::COUNT],
            len: [0; QueueId::COUNT],
        }
    }

    /// Fila a que o slot pertence agora (None = fora de todas)
    #[inline]
    pub fn membership(&self, slot: SlotId) -> Option<QueueId> {
        self.links[slot.0].queue
    }

    #[inline]
    pub fn len(&self, queue: QueueId) -> usize {
        self.len[queue.idx()]
    }

    #[inline]
    pub fn is_empty(&self, queue: QueueId) -> bool {
        self.len[queue.idx()] == 0
    }

    #[inline]
    pub fn front(&self, queue: QueueId) -> Option<SlotId> {
        self.head[queue.idx()]
    }

    /// Insere no fim da fila. O slot não pode pertencer a outra fila.
    pub fn enqueue(&mut self, slot: SlotId, queue: QueueId) {
        debug_assert!(
            self.links[slot.0].queue.is_none(),
            "slot {} já pertence a uma fila",
            slot.0
        );
        let q = queue.idx();
        let old_tail = self.tail[q];
        self.links[slot.0] = Link {
            prev: old_tail,
            next: None,
            queue: Some(queue),
        };
        match old_tail {
            Some(t) => self.links[t.0].next = Some(slot),
            None => self.head[q] = Some(slot),
        }
        self.tail[q] = Some(slot);
        self.len[q] += 1;
    }

    /// Remove o slot de onde quer que esteja. Retorna a fila de origem
    /// (None se já estava fora de todas; remoção dupla é inofensiva aqui,
    /// ao contrário das listas intrusivas de ponteiro).
    pub fn dequeue(&mut self, slot: SlotId) -> Option<QueueId> {
        let Link { prev, next, queue } = self.links[slot.0];
        let q = queue?;
        match prev {
            Some(p) => self.links[p.0].next = next,
            None => self.head[q.idx()] = next,
        }
        match next {
            Some(n) => self.links[n.0].prev = prev,
            None => self.tail[q.idx()] = prev,
        }
        self.links[slot.0] = Link::EMPTY;
        self.len[q.idx()] -= 1;
        Some(q)
    }

    /// Retira a cabeça da fila (ordem FIFO)
    pub fn pop_front(&mut self, queue: QueueId) -> Option<SlotId> {
        let slot = self.head[queue.idx()]?;
        self.dequeue(slot);
        Some(slot)
    }

    /// Percorre a fila em ordem FIFO
    pub fn iter(&self, queue: QueueId) -> QueueIter<'_> {
        QueueIter {
            set: self,
            cursor: self.head[queue.idx()],
        }
    }
}

/// Iterador FIFO sobre uma fila
pub struct QueueIter<'a> {
    set: &'a QueueSet,
    cursor: Option<SlotId>,
}

impl Iterator for QueueIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let slot = self.cursor?;
        self.cursor = self.set.links[slot.0].next;
        Some(slot)
    }
}
