//! Tipos fundamentais do sistema

/// Process ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Pid(pub u32);

impl Pid {
    /// PID da tarefa idle (reservada no boot)
    pub const IDLE: Pid = Pid(0);
    /// PID da tarefa raiz/init (reservada no boot)
    pub const INIT: Pid = Pid(1);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Índice estável de slot na tabela de tarefas.
///
/// Substitui os ponteiros crus para PCB: todo relacionamento entre tarefas
/// (pai, filas, espera) é gravado como índice de arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotId(pub usize);

impl SlotId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Endereço virtual (topo de pilha, entry point)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct VirtAddr(pub u64);

impl VirtAddr {
    pub const NULL: VirtAddr = VirtAddr(0);

    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Raiz de tabela de páginas (handle opaco; o dono real é o subsistema de MM)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PageTableRoot(pub u64);

impl PageTableRoot {
    /// Espaço de endereçamento do kernel (compartilhado, nunca liberado)
    pub const KERNEL: PageTableRoot = PageTableRoot(0);

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}
