//! Dedicated execution contexts for long-running loops.
//!
//! On ESP-IDF, `std::thread` is a pthread over a FreeRTOS task.
//! `esp_pthread_set_cfg()` sets thread-local configuration for the *next*
//! `pthread_create()` from the calling thread, so the config→spawn pair in
//! [`spawn_task`] must not be interleaved with other thread creation on
//! the same thread.

use std::io;
use std::thread::JoinHandle;

use crate::config::TaskConfig;

/// CPU core identifiers for the ESP32 Xtensa dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 1 (APP_CPU).  Core 0 is left to WiFi and lwIP.
    App = 1,
}

/// Spawn `f` as a task pinned to `task.core` with the task's priority and
/// stack size.
#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub fn spawn_task(
    task: &TaskConfig,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    // SAFETY: the config struct is fully initialised by
    // esp_create_default_pthread_config and `name` is null-terminated.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = task.core as i32;
        cfg.prio = i32::from(task.priority);
        cfg.stack_size = (task.stack_kb * 1024) as i32;
        cfg.thread_name = task.name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    let display_name = task.name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        task.core,
        task.priority,
        task.stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
}

/// Host fallback: a named thread, core and priority ignored.
#[cfg(not(all(target_os = "espidf", feature = "espidf")))]
pub fn spawn_task(
    task: &TaskConfig,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let display_name = task.name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        task.stack_kb
    );

    // Host threads need more headroom than the firmware budget.
    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size((task.stack_kb * 1024).max(64 * 1024))
        .spawn(f)
}
