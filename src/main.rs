//! Fan controller firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                      │
//! │                                                              │
//! │  LedcPwm        GpioEdgeInput    Esp32TimeAdapter  LogSink   │
//! │  (PwmPeripheral)(EdgeInput)      (TimePort)        (Events)  │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  FanRegistry ── FanUnit × N ◀── tacho ISR (PulseCounter)     │
//! │       ▲                                                      │
//! │       ├── FanScheduler (fan-cycle task, APP core)            │
//! │       └── FanService   (web layer)                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};

use fancycle::adapters::log_sink::LogEventSink;
use fancycle::adapters::time::Esp32TimeAdapter;
use fancycle::app::service::FanService;
use fancycle::config::{self, CycleConfig, TachoConfig};
use fancycle::drivers::hw_init::{self, GpioEdgeInput, LedcPwm};
use fancycle::drivers::task_pin::spawn_task;
use fancycle::fan::FanHardware;
use fancycle::registry::FanRegistry;
use fancycle::scheduler::FanScheduler;
use fancycle::shutdown::ShutdownSignal;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  fancycle v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    hw_init::install_isr_service()?;

    // ── 2. Fans ───────────────────────────────────────────────
    let hw = FanHardware {
        pwm: Arc::new(LedcPwm::new()),
        input: Arc::new(GpioEdgeInput::new()),
        clock: Arc::new(Esp32TimeAdapter::new()),
        tacho: TachoConfig::default(),
    };

    let mut registry = FanRegistry::new(hw, CycleConfig::default());
    for fan in config::default_fans() {
        registry.create_fan(fan);
    }
    if let Err(e) = registry.initialize_all() {
        error!("Fan init failed: {}", e);
        return Err(e.into());
    }
    let registry = Arc::new(registry);

    let service = FanService::new(Arc::clone(&registry));
    for status in service.fan_statuses() {
        info!("Fan '{}': power {}%", status.name, status.power);
    }

    // ── 3. Run loop ───────────────────────────────────────────
    let shutdown = Arc::new(ShutdownSignal::new());
    let handle = {
        let registry = Arc::clone(&registry);
        let shutdown = Arc::clone(&shutdown);
        spawn_task(&config::FAN_TASK, move || {
            FanScheduler::new(registry, LogEventSink::new()).run(&shutdown);
        })?
    };

    if handle.join().is_err() {
        error!("Fan task panicked");
    }
    Ok(())
}
