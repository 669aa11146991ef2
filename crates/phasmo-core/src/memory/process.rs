//! Process discovery and attachment.
//!
//! The attached [`ProcessHandle`] is a scoped resource: it is released on
//! drop and release failures are ignored.

use super::ProcessMemory;
use crate::error::Result;

/// Finds target processes by name and attaches to them for reading.
pub trait ProcessProvider {
    type Handle: ProcessMemory;

    /// PID of the first process whose executable name matches `name`
    /// (case-insensitive), or `None` when it is not running.
    fn find_process(&self, name: &str) -> Result<Option<u32>>;

    fn attach(&self, pid: u32) -> Result<Self::Handle>;
}

/// [`ProcessProvider`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessProvider;

impl ProcessProvider for SystemProcessProvider {
    type Handle = ProcessHandle;

    fn find_process(&self, name: &str) -> Result<Option<u32>> {
        ProcessHandle::find_pid_by_name(name)
    }

    fn attach(&self, pid: u32) -> Result<ProcessHandle> {
        ProcessHandle::open(pid)
    }
}

#[cfg(target_os = "windows")]
pub use self::windows_impl::ProcessHandle;

#[cfg(not(target_os = "windows"))]
pub use self::unsupported::ProcessHandle;

/// Strip the trailing NUL padding from a fixed-size UTF-16 buffer.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn wide_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

#[cfg(target_os = "windows")]
mod windows_impl {
    use std::ffi::c_void;

    use tracing::debug;
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW,
        PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPMODULE,
        TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
    };

    use super::wide_to_string;
    use crate::error::{Error, Result};
    use crate::memory::{ProcessMemory, ReadMemory};

    /// Read-only handle to a foreign process.
    pub struct ProcessHandle {
        handle: HANDLE,
        pub pid: u32,
    }

    impl ProcessHandle {
        pub fn find_pid_by_name(name: &str) -> Result<Option<u32>> {
            // SAFETY: the snapshot handle is closed on every path below and the
            // entry struct is initialized with its own size as ToolHelp requires.
            unsafe {
                let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
                    .map_err(|e| Error::ProcessOpenFailed(e.to_string()))?;

                let mut entry = PROCESSENTRY32W {
                    dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
                    ..Default::default()
                };

                let mut found = None;
                if Process32FirstW(snapshot, &mut entry).is_ok() {
                    loop {
                        if wide_to_string(&entry.szExeFile).eq_ignore_ascii_case(name) {
                            found = Some(entry.th32ProcessID);
                            break;
                        }
                        if Process32NextW(snapshot, &mut entry).is_err() {
                            break;
                        }
                    }
                }

                let _ = CloseHandle(snapshot);
                Ok(found)
            }
        }

        pub fn open(pid: u32) -> Result<Self> {
            // SAFETY: OpenProcess has no preconditions; the handle is owned by
            // the returned value and closed in Drop.
            let handle = unsafe {
                OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, pid)
                    .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?
            };
            debug!("Opened process {}", pid);
            Ok(Self { handle, pid })
        }
    }

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
            let mut buffer = vec![0u8; size];
            let mut bytes_read = 0usize;

            // SAFETY: the buffer is exactly `size` bytes long and outlives the call.
            unsafe {
                ReadProcessMemory(
                    self.handle,
                    address as *const c_void,
                    buffer.as_mut_ptr().cast(),
                    size,
                    Some(&mut bytes_read as *mut usize),
                )
                .map_err(|e| Error::read_failed(address, e.to_string()))?;
            }

            if bytes_read != size {
                return Err(Error::read_failed(
                    address,
                    format!("short read: {} of {} bytes", bytes_read, size),
                ));
            }
            Ok(buffer)
        }
    }

    impl ProcessMemory for ProcessHandle {
        fn module_base_address(&self, name: &str) -> Result<u64> {
            // SAFETY: same snapshot discipline as find_pid_by_name.
            unsafe {
                let snapshot =
                    CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, self.pid)
                        .map_err(|_| Error::ModuleNotFound(name.to_string()))?;

                let mut entry = MODULEENTRY32W {
                    dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
                    ..Default::default()
                };

                let mut found = None;
                if Module32FirstW(snapshot, &mut entry).is_ok() {
                    loop {
                        if wide_to_string(&entry.szModule).eq_ignore_ascii_case(name) {
                            found = Some(entry.modBaseAddr as u64);
                            break;
                        }
                        if Module32NextW(snapshot, &mut entry).is_err() {
                            break;
                        }
                    }
                }

                let _ = CloseHandle(snapshot);
                found.ok_or_else(|| Error::ModuleNotFound(name.to_string()))
            }
        }
    }

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            if !self.handle.is_invalid() {
                // SAFETY: the handle came from OpenProcess and is closed once.
                unsafe {
                    let _ = CloseHandle(self.handle);
                }
                debug!("Closed process {}", self.pid);
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use crate::error::{Error, Result};
    use crate::memory::{ProcessMemory, ReadMemory};

    /// Placeholder handle for targets without a process memory backend.
    ///
    /// No process is ever found, so a monitor on these targets stays in
    /// its waiting state.
    pub struct ProcessHandle {
        pub pid: u32,
    }

    impl ProcessHandle {
        pub fn find_pid_by_name(_name: &str) -> Result<Option<u32>> {
            Ok(None)
        }

        pub fn open(pid: u32) -> Result<Self> {
            Err(Error::Unsupported(format!(
                "cannot attach to pid {}: process memory access requires Windows",
                pid
            )))
        }
    }

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
            Err(Error::read_failed(address, "unsupported platform"))
        }
    }

    impl ProcessMemory for ProcessHandle {
        fn module_base_address(&self, name: &str) -> Result<u64> {
            Err(Error::ModuleNotFound(name.to_string()))
        }
    }
}
