//! Plataforma simulada para os testes de host
//!
//! O relógio só anda quando o teste manda (`advance`), a troca de contexto
//! vira um contador e as alocações de pilha/pgdir entregam endereços
//! sintéticos com contagem de vivos: o suficiente para observar cada
//! decisão do escalonador sem hardware.

use core::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use super::traits::clock::ClockOps;
use super::traits::cpu::{CpuOps, StackKind};
use super::traits::mem::MemOps;
use crate::sched::task::context::SwitchContext;
use crate::sys::types::{PageTableRoot, VirtAddr};
use crate::time::clock::TimeSpec;

pub struct MockPlatform {
    pub ticks: AtomicU64,
    pub tick_rate: u64,
    pub wall_base: TimeSpec,
    /// Trocas de contexto efetuadas
    pub switches: AtomicUsize,
    /// Último estado pedido para as interrupções
    pub irq_enabled: AtomicBool,
    /// Pilhas vivas (alocadas - liberadas)
    pub stacks_alive: AtomicUsize,
    /// Tabelas de página vivas
    pub page_tables_alive: AtomicUsize,
    /// Injeção de falha: próxima alocação de pilha falha
    pub fail_stack_alloc: AtomicBool,
    /// Injeção de falha: próxima alocação de pgdir falha
    pub fail_page_table_alloc: AtomicBool,
    next_addr: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            tick_rate: 100,
            wall_base: TimeSpec::ZERO,
            switches: AtomicUsize::new(0),
            irq_enabled: AtomicBool::new(false),
            stacks_alive: AtomicUsize::new(0),
            page_tables_alive: AtomicUsize::new(0),
            fail_stack_alloc: AtomicBool::new(false),
            fail_page_table_alloc: AtomicBool::new(false),
            next_addr: AtomicU64::new(0x8000_0000),
        }
    }

    /// Instância com vida 'static, como o núcleo espera receber no boot
    pub fn leak() -> &'static MockPlatform {
        Box::leak(Box::new(Self::new()))
    }

    pub fn leak_with_wall_base(wall_base: TimeSpec) -> &'static MockPlatform {
        let mut platform = Self::new();
        platform.wall_base = wall_base;
        Box::leak(Box::new(platform))
    }

    /// Avança o relógio simulado
    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl CpuOps for MockPlatform {
    fn switch_to(&self, _prev: &mut SwitchContext, _next: &SwitchContext) {
        self.switches.fetch_add(1, Ordering::SeqCst);
    }

    fn set_interrupt_enable(&self, enabled: bool) {
        self.irq_enabled.store(enabled, Ordering::SeqCst);
    }

    fn init_context(&self, ctx: &mut SwitchContext, entry: VirtAddr, arg: usize) {
        ctx.regs[0] = entry.as_u64() as usize;
        ctx.regs[1] = arg;
    }

    fn clone_context(&self, parent: &SwitchContext, child_stack: VirtAddr) -> SwitchContext {
        let mut child = *parent;
        if !child_stack.is_null() {
            child.user_sp = child_stack;
        }
        // o filho observa retorno zero
        child.regs[13] = 0;
        child
    }

    fn core_id(&self) -> usize {
        0
    }
}

impl ClockOps for MockPlatform {
    fn read_ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    fn time_base(&self) -> u64 {
        self.tick_rate
    }

    fn wall_clock_base(&self) -> TimeSpec {
        self.wall_base
    }
}

impl MemOps for MockPlatform {
    fn alloc_stack(&self, _kind: StackKind) -> Option<VirtAddr> {
        if self.fail_stack_alloc.load(Ordering::SeqCst) {
            return None;
        }
        self.stacks_alive.fetch_add(1, Ordering::SeqCst);
        let base = self.next_addr.fetch_add(0x1_0000, Ordering::SeqCst);
        Some(VirtAddr::new(base + 0x1_0000))
    }

    fn release_stack(&self, _kind: StackKind, _top: VirtAddr) {
        self.stacks_alive.fetch_sub(1, Ordering::SeqCst);
    }

    fn alloc_page_table(&self) -> Option<PageTableRoot> {
        if self.fail_page_table_alloc.load(Ordering::SeqCst) {
            return None;
        }
        self.page_tables_alive.fetch_add(1, Ordering::SeqCst);
        Some(PageTableRoot(
            self.next_addr.fetch_add(0x1000, Ordering::SeqCst),
        ))
    }

    fn release_page_table(&self, _root: PageTableRoot) {
        self.page_tables_alive.fetch_sub(1, Ordering::SeqCst);
    }

    fn clone_address_space(&self, _parent: PageTableRoot) -> Option<PageTableRoot> {
        self.alloc_page_table()
    }
}
