//! Anonymous `MAP_SHARED` mapping that survives `fork(2)`.
//!
//! Pages mapped this way stay shared between parent and children after a
//! fork, unlike ordinary heap memory which becomes copy-on-write.

use core::mem::{size_of, ManuallyDrop};
use core::ptr::NonNull;
use std::io;

use crate::error::{MatmulError, Result};

/// A zero-filled shared buffer of `f64`, unmapped exactly once.
pub struct SharedRegion {
    ptr: NonNull<f64>,
    len: usize,
    bytes: usize,
}

impl SharedRegion {
    /// Map `len` zeroed elements readable and writable by this process and
    /// every process forked from it afterwards.
    pub fn new(len: usize) -> Result<Self> {
        let bytes = match len.checked_mul(size_of::<f64>()) {
            Some(b) if b > 0 => b,
            _ => {
                return Err(MatmulError::SharedMemory(io::Error::from_raw_os_error(
                    libc::EINVAL,
                )))
            }
        };

        let addr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(MatmulError::SharedMemory(io::Error::last_os_error()));
        }
        let ptr = NonNull::new(addr.cast::<f64>())
            .ok_or_else(|| MatmulError::SharedMemory(io::Error::from_raw_os_error(libc::EFAULT)))?;

        log::debug!("[shm] mapped {bytes} bytes at {:p}", ptr.as_ptr());
        Ok(Self { ptr, len, bytes })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start address of the mapping.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub fn as_slice(&self) -> &[f64] {
        // Anonymous mappings are page aligned and zero filled, which is a
        // valid bit pattern for f64.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Unmap now and report failure. Dropping the region unmaps too but
    /// can only log an error.
    pub fn release(self) -> Result<()> {
        let this = ManuallyDrop::new(self);
        unmap(this.ptr, this.bytes).map_err(MatmulError::Release)
    }
}

impl Drop for SharedRegion {
    fn drop(&mut self) {
        if let Err(e) = unmap(self.ptr, self.bytes) {
            log::error!("[shm] munmap of {} bytes failed: {e}", self.bytes);
        }
    }
}

fn unmap(ptr: NonNull<f64>, bytes: usize) -> io::Result<()> {
    let rc = unsafe { libc::munmap(ptr.as_ptr().cast(), bytes) };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    log::debug!("[shm] unmapped {bytes} bytes at {:p}", ptr.as_ptr());
    Ok(())
}
