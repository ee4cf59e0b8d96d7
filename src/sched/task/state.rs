//! Estados e variantes de task

/// Estado de uma task no ciclo de vida do escalonador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Esperando em uma fila de bloqueio
    Blocked,
    /// Executando na CPU
    Running,
    /// Pronta, na fila de prontos
    Ready,
    /// Terminada, esperando o pai colher o status de saída
    Zombie,
    /// Morta; o slot está (ou está voltando para) a fila de livres
    Exited,
}

impl TaskStatus {
    /// Zombie e Exited já passaram do ponto de não-retorno
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Zombie | Self::Exited)
    }

    /// Sobrevivente para fins de reparenting (pode adotar órfãos)
    pub const fn is_alive(self) -> bool {
        !self.is_terminated()
    }
}

/// Natureza da task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    KernelProcess,
    KernelThread,
    UserProcess,
    UserThread,
}

impl TaskType {
    /// Threads e processos de usuário precisam de pilha de usuário própria
    pub const fn needs_user_stack(self) -> bool {
        matches!(self, Self::UserProcess | Self::UserThread)
    }

    /// Processos de usuário ganham espaço de endereçamento próprio
    pub const fn needs_address_space(self) -> bool {
        matches!(self, Self::UserProcess)
    }
}

/// O que acontece com o slot quando a task termina
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Vira zumbi e espera o pai colher via wait
    EnterZombieOnExit,
    /// Libera o slot imediatamente no exit
    AutoCleanupOnExit,
}

impl SpawnMode {
    pub const DEFAULT: SpawnMode = SpawnMode::AutoCleanupOnExit;
}
