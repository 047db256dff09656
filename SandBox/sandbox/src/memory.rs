//! Guest linear memory access with bounds checking, and the host-side
//! allocator for buffers the host hands to the guest.
//!
//! Out-of-bounds access returns `ERR_BAD_POINTER`.

use securemsg_hostapi::HostError;

/// Wasm page size in bytes.
pub const PAGE_SIZE: usize = 65_536;

/// Initial host allocation region size in pages (2 pages = 128 KiB).
pub const HOST_ALLOC_PAGES: u64 = 2;

/// Resolve `[ptr, ptr+len)` to a `usize` range inside `mem_size`.
fn checked_range(mem_size: usize, ptr: i32, len: usize) -> Result<(usize, usize), HostError> {
    if ptr < 0 {
        return Err(HostError::bad_pointer());
    }
    let start = ptr as usize;
    let end = start.checked_add(len).ok_or_else(HostError::bad_pointer)?;
    if end > mem_size {
        return Err(HostError::bad_pointer());
    }
    Ok((start, end))
}

/// Copy `len` bytes out of guest memory at `ptr`.
pub fn read_bytes(mem: &[u8], ptr: i32, len: i32) -> Result<Vec<u8>, HostError> {
    if len < 0 {
        return Err(HostError::bad_pointer());
    }
    let (start, end) = checked_range(mem.len(), ptr, len as usize)?;
    Ok(mem[start..end].to_vec())
}

/// Borrow `len` bytes of guest memory at `ptr` as UTF-8.
pub fn read_str(mem: &[u8], ptr: i32, len: i32) -> Result<&str, HostError> {
    if len < 0 {
        return Err(HostError::bad_pointer());
    }
    let (start, end) = checked_range(mem.len(), ptr, len as usize)?;
    std::str::from_utf8(&mem[start..end]).map_err(|_| HostError::invalid_encoding())
}

/// Write `data` into guest memory at `ptr`.
pub fn write_bytes(mem: &mut [u8], ptr: i32, data: &[u8]) -> Result<(), HostError> {
    let (start, end) = checked_range(mem.len(), ptr, data.len())?;
    mem[start..end].copy_from_slice(data);
    Ok(())
}

/// Write an i32 (little-endian) into guest memory at `ptr`.
pub fn write_i32(mem: &mut [u8], ptr: i32, value: i32) -> Result<(), HostError> {
    write_bytes(mem, ptr, &value.to_le_bytes())
}

/// Check that `[ptr, ptr+len)` lies inside guest memory.
pub fn validate_range(mem_size: usize, ptr: i32, len: i32) -> Result<(), HostError> {
    if len < 0 {
        return Err(HostError::bad_pointer());
    }
    checked_range(mem_size, ptr, len as usize).map(|_| ())
}

fn align8(size: usize) -> usize {
    (size + 7) & !7
}

/// Where the next host buffer goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Guest address of the buffer.
    pub ptr: usize,
    /// Pages to grow memory by before writing. When non-zero, `ptr` is
    /// the current end of memory and a new region starts there.
    pub grow_pages: u64,
    /// Index of the region the buffer lands in.
    pub region: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    start: usize,
    len: usize,
}

/// Bump allocator over host-owned regions of guest memory.
///
/// The guest's own allocator may grow memory between host allocations, so
/// a full region is never extended in place. Instead the next region that
/// fits is used, and when none does a new region is opened at the end of
/// memory as it is at that moment.
///
/// Host buffers only live until the guest copies them out, which it does
/// before the call returns. [`HostAllocator::reset`] rewinds to the first
/// region at the start of every call, so a long-lived instance reuses the
/// same regions instead of growing memory call after call.
#[derive(Debug, Clone, Default)]
pub struct HostAllocator {
    regions: Vec<Region>,
    current: usize,
    bump: usize,
}

impl HostAllocator {
    /// Allocator over the region `[base, base+capacity)`.
    pub fn new(base: usize, capacity: usize) -> Self {
        Self {
            regions: vec![Region { start: base, len: capacity }],
            current: 0,
            bump: 0,
        }
    }

    /// Plan an allocation of `size` bytes given the current memory size.
    ///
    /// Zero-sized requests still get a distinct non-null address.
    pub fn plan(&self, size: usize, mem_size: usize) -> Allocation {
        let aligned = align8(size.max(1));
        for (index, region) in self.regions.iter().enumerate().skip(self.current) {
            let used = if index == self.current { self.bump } else { 0 };
            if used + aligned <= region.len {
                return Allocation {
                    ptr: region.start + used,
                    grow_pages: 0,
                    region: index,
                };
            }
        }
        let pages = aligned.div_ceil(PAGE_SIZE).max(HOST_ALLOC_PAGES as usize);
        Allocation {
            ptr: mem_size,
            grow_pages: pages as u64,
            region: self.regions.len(),
        }
    }

    /// Record a planned allocation of `size` bytes once it has been written.
    pub fn commit(&mut self, allocation: Allocation, size: usize) {
        if allocation.grow_pages > 0 {
            self.regions.push(Region {
                start: allocation.ptr,
                len: allocation.grow_pages as usize * PAGE_SIZE,
            });
        }
        let start = self.regions[allocation.region].start;
        self.current = allocation.region;
        self.bump = allocation.ptr - start + align8(size.max(1));
    }

    /// Rewind to the first region. Buffers handed out earlier are dead.
    pub fn reset(&mut self) {
        self.current = 0;
        self.bump = 0;
    }

    /// Bytes left in the current region.
    pub fn remaining(&self) -> usize {
        self.regions
            .get(self.current)
            .map(|region| region.len - self.bump)
            .unwrap_or(0)
    }

    /// Guest memory owned by the host across all regions.
    pub fn reserved_bytes(&self) -> usize {
        self.regions.iter().map(|region| region.len).sum()
    }
}
