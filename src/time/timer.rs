//! Timers por software sobre o tick de hardware
//!
//! Pool fixo de `NUM_TIMER` slots: cada timer vive OU na lista de livres OU
//! na de pendentes, nunca nas duas. A pendente fica em ordem de inserção e
//! é varrida a cada tick; quem venceu sai da lista, volta ao pool e só
//! então o callback roda; um timer dispara no máximo uma vez por criação.
//!
//! Esgotar o pool é bug de contabilidade de recursos do kernel (alguém
//! vazou timers), não pressão transitória: derruba por assert em vez de
//! devolver erro.

use crate::sched::core::Core;

/// Capacidade do pool de timers
pub const NUM_TIMER: usize = 16;

/// Callback executado quando o timer vence. Recebe o núcleo (para poder
/// desbloquear tarefas ou criar timers novos) e o argumento opaco gravado
/// na criação.
pub type TimerCallback = fn(&mut Core, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Free,
    Pending,
}

#[derive(Clone, Copy)]
struct TimerSlot {
    state: TimerState,
    /// Tick absoluto de vencimento
    timeout_tick: u64,
    callback: Option<TimerCallback>,
    arg: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

impl TimerSlot {
    const EMPTY: TimerSlot = TimerSlot {
        state: TimerState::Free,
        timeout_tick: 0,
        callback: None,
        arg: 0,
        prev: None,
        next: None,
    };
}

/// Pool fixo de timers com lista de livres e lista de pendentes
pub struct TimerPool {
    slots: [TimerSlot; NUM_TIMER],
    free_head: Option<usize>,
    pending_head: Option<usize>,
    pending_tail: Option<usize>,
    pending_len: usize,
}

impl TimerPool {
    pub fn new() -> Self {
        let mut slots = [TimerSlot::EMPTY; NUM_TIMER];
        // encadeia a lista de livres pelo campo next
        for (i, slot) in slots.iter_mut().enumerate() {
            slot.next = if i + 1 < NUM_TIMER { Some(i + 1) } else { None };
        }
        Self {
            slots,
            free_head: Some(0),
            pending_head: None,
            pending_tail: None,
            pending_len: 0,
        }
    }

    fn alloc(&mut self) -> Option<usize> {
        let idx = self.free_head?;
        self.free_head = self.slots[idx].next;
        self.slots[idx].next = None;
        Some(idx)
    }

    fn free(&mut self, idx: usize) {
        self.slots[idx] = TimerSlot::EMPTY;
        self.slots[idx].next = self.free_head;
        self.free_head = Some(idx);
    }

    fn link_pending(&mut self, idx: usize) {
        self.slots[idx].state = TimerState::Pending;
        self.slots[idx].prev = self.pending_tail;
        self.slots[idx].next = None;
        match self.pending_tail {
            Some(tail) => self.slots[tail].next = Some(idx),
            None => self.pending_head = Some(idx),
        }
        self.pending_tail = Some(idx);
        self.pending_len += 1;
    }

    fn unlink_pending(&mut self, idx: usize) {
        let TimerSlot { prev, next, .. } = self.slots[idx];
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.pending_head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.pending_tail = prev,
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
        self.pending_len -= 1;
    }

    /// Quantos timers estão armados
    pub fn pending_len(&self) -> usize {
        self.pending_len
    }

    /// Quantos slots restam no pool
    pub fn free_len(&self) -> usize {
        NUM_TIMER - self.pending_len
    }

    #[cfg(test)]
    pub(crate) fn pending_timeouts(&self) -> impl Iterator<Item = u64> + '_ {
        let mut cursor = self.pending_head;
        core::iter::from_fn(move || {
            let idx = cursor?;
            cursor = self.slots[idx].next;
            Some(self.slots[idx].timeout_tick)
        })
    }
}

impl Core {
    /// Arma um timer: `callback(arg)` roda depois que `ticks` ticks se
    /// passarem. Vencimento é absoluto (tick atual + pedido).
    ///
    /// # Panics
    /// Pool esgotado: invariante de recursos do kernel violada.
    pub fn timer_create(&mut self, callback: TimerCallback, arg: usize, ticks: u64) {
        self.disable_preempt();
        let now = self.platform.read_ticks();
        let idx = match self.timers.alloc() {
            Some(idx) => idx,
            None => panic!("(Timer) pool de timers esgotado"),
        };
        self.timers.slots[idx].timeout_tick = now + ticks;
        self.timers.slots[idx].callback = Some(callback);
        self.timers.slots[idx].arg = arg;
        self.timers.link_pending(idx);
        crate::ktrace!("(Timer) armado slot={} vence em tick={}", idx, now + ticks);
        self.enable_preempt();
    }

    /// Varre os timers pendentes e dispara os vencidos. Chamado uma vez a
    /// cada interrupção de timer, com preempção desabilitada.
    ///
    /// A varredura fotografa a lista de pendentes na entrada: callbacks
    /// podem armar timers novos, e esses não são visitados na mesma
    /// passada.
    pub fn timer_check(&mut self) {
        self.disable_preempt();
        let now = self.platform.read_ticks();

        let mut snapshot = [0usize; NUM_TIMER];
        let mut count = 0;
        let mut cursor = self.timers.pending_head;
        while let Some(idx) = cursor {
            snapshot[count] = idx;
            count += 1;
            cursor = self.timers.slots[idx].next;
        }

        for &idx in &snapshot[..count] {
            let slot = self.timers.slots[idx];
            if slot.state != TimerState::Pending {
                continue;
            }
            if slot.timeout_tick < now {
                // devolve ao pool antes do callback: disparo único por
                // criação, mesmo que o callback rearme
                self.timers.unlink_pending(idx);
                self.timers.free(idx);
                if let Some(callback) = slot.callback {
                    callback(self, slot.arg);
                }
            }
        }

        self.enable_preempt();
    }
}
