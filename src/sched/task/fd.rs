//! Tabela de descritores de arquivo por tarefa
//!
//! O PCB é dono exclusivo dos seus descritores; o VFS escreve aqui, o
//! escalonador só garante a liberação no exit. Tudo de tamanho fixo
//! (`NUM_FD` slots), sem alocação.

use bitflags::bitflags;

use crate::sys::types::VirtAddr;

bitflags! {
    /// Flags de abertura de um descritor
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u8 {
        const READ   = 1 << 0;
        const WRITE  = 1 << 1;
        const APPEND = 1 << 2;
        const CREATE = 1 << 3;
    }
}

bitflags! {
    /// Proteção de um mapeamento de memória
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MmapProt: u32 {
        const READ  = 1 << 0;
        const WRITE = 1 << 1;
        const EXEC  = 1 << 2;
    }
}

bitflags! {
    /// Flags de um mapeamento de memória
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MmapFlags: u32 {
        const SHARED    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const ANONYMOUS = 1 << 2;
        const FIXED     = 1 << 3;
    }
}

/// Região mapeada em memória associada a um descritor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmapRegion {
    pub start: VirtAddr,
    pub len: usize,
    pub prot: MmapProt,
    pub flags: MmapFlags,
    pub off: i64,
}

/// Um descritor de arquivo aberto
#[derive(Debug, Clone, Copy)]
pub struct FileDescriptor {
    /// Número do dispositivo
    pub dev: u8,
    /// Primeiro cluster do arquivo (layout do FS)
    pub first_clus_num: u32,
    /// Flags de abertura
    pub flags: OpenFlags,
    /// Posição de leitura/escrita
    pub pos: u64,
    /// Tamanho do arquivo
    pub length: u32,
    /// Número do descritor (por padrão o índice na tabela)
    pub fd_num: u8,
    /// Slot em uso
    pub used: bool,
    /// Ponta de pipe associada, se houver
    pub pipe_num: Option<u32>,
    /// Mapeamento de memória associado, se houver
    pub mmap: Option<MmapRegion>,
    /// Contagem de links
    pub nlink: u8,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u32,
    pub blksize: u32,
    pub atime_sec: i64,
    pub atime_nsec: i64,
    pub mtime_sec: i64,
    pub mtime_nsec: i64,
    pub ctime_sec: i64,
    pub ctime_nsec: i64,
}

impl FileDescriptor {
    pub const UNUSED: FileDescriptor = FileDescriptor {
        dev: 0,
        first_clus_num: 0,
        flags: OpenFlags::empty(),
        pos: 0,
        length: 0,
        fd_num: 0,
        used: false,
        pipe_num: None,
        mmap: None,
        nlink: 0,
        uid: 0,
        gid: 0,
        rdev: 0,
        blksize: 0,
        atime_sec: 0,
        atime_nsec: 0,
        mtime_sec: 0,
        mtime_nsec: 0,
        ctime_sec: 0,
        ctime_nsec: 0,
    };

    /// Libera o descritor (chamado no exit da tarefa dona)
    pub fn release(&mut self) {
        let fd_num = self.fd_num;
        *self = Self::UNUSED;
        self.fd_num = fd_num;
    }
}
