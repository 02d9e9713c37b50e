//! Run loop driven step by step and on a real thread.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fancycle::app::events::FanEvent;
use fancycle::config::{CycleConfig, FAN_BACK, FAN_FRONT, TaskConfig};
use fancycle::drivers::task_pin::{Core, spawn_task};
use fancycle::scheduler::{CyclePhase, FanScheduler};
use fancycle::shutdown::ShutdownSignal;

use crate::mock_hw::{Board, RecordingSink};

const TWO_SECOND_CYCLE: CycleConfig = CycleConfig {
    interval_secs: 2,
    runtime_secs: 2,
};

#[test]
fn two_cycles_alternate_max_power_and_zero() {
    let board = Board::new();
    let reg = board.ready_registry(TWO_SECOND_CYCLE);
    let mut sched = FanScheduler::new(reg, RecordingSink::new());

    for _ in 0..2 {
        assert_eq!(sched.step(), (CyclePhase::Running, 2));
        assert_eq!(board.duty(&FAN_FRONT), 153);
        assert_eq!(board.duty(&FAN_BACK), 179);

        assert_eq!(sched.step(), (CyclePhase::CooldownWait, 0));

        assert_eq!(sched.step(), (CyclePhase::Idle, 2));
        assert_eq!(board.duty(&FAN_FRONT), 0);
        assert_eq!(board.duty(&FAN_BACK), 0);
    }

    // Initial full duty, then on/off twice.
    assert_eq!(board.pwm.history(FAN_FRONT.channel), vec![255, 153, 0, 153, 0]);
}

#[test]
fn speed_report_follows_the_run_window() {
    let board = Board::new();
    let reg = board.ready_registry(TWO_SECOND_CYCLE);
    let mut sched = FanScheduler::new(reg, RecordingSink::new());

    sched.step();
    board.input.emit_pulses(FAN_FRONT.tacho_pin, 2);
    board.clock.advance(2000);
    sched.step();

    assert_eq!(sched.sink().speed_reports(), vec![("Back", 0), ("Front", 60)]);
}

#[test]
fn event_order_for_one_cycle() {
    let board = Board::new();
    let reg = board.ready_registry(TWO_SECOND_CYCLE);
    let mut sched = FanScheduler::new(reg, RecordingSink::new());
    for _ in 0..3 {
        sched.step();
    }

    let phases: Vec<_> = sched
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            FanEvent::PhaseEntered { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![CyclePhase::Running, CyclePhase::CooldownWait, CyclePhase::Idle]
    );
    assert_eq!(
        sched.sink().events.first(),
        Some(&FanEvent::CycleStarted { cycle: 1 })
    );
}

#[test]
fn write_failures_are_reported_and_the_loop_continues() {
    let board = Board::new();
    let reg = board.ready_registry(TWO_SECOND_CYCLE);
    let mut sched = FanScheduler::new(reg, RecordingSink::new());

    board.pwm.fail_writes(true);
    sched.step();
    assert_eq!(sched.sink().power_failures(), vec!["Back", "Front"]);

    board.pwm.fail_writes(false);
    sched.step();
    sched.step();
    assert_eq!(board.duty(&FAN_FRONT), 0);
    assert_eq!(sched.phase(), CyclePhase::Running);
}

#[test]
fn fan_task_stops_on_shutdown() {
    let board = Board::new();
    let reg = board.ready_registry(CycleConfig {
        interval_secs: 600,
        runtime_secs: 600,
    });
    let shutdown = Arc::new(ShutdownSignal::new());
    let task = TaskConfig {
        name: "fan-test\0",
        core: Core::App,
        priority: 4,
        stack_kb: 4,
    };

    let handle = {
        let reg = Arc::clone(&reg);
        let shutdown = Arc::clone(&shutdown);
        spawn_task(&task, move || {
            FanScheduler::new(reg, RecordingSink::new()).run(&shutdown);
        })
        .unwrap()
    };

    // Wait for the first run window to start.
    let deadline = Instant::now() + Duration::from_secs(5);
    while board.duty(&FAN_FRONT) != 153 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(board.duty(&FAN_FRONT), 153);

    let start = Instant::now();
    shutdown.trigger();
    handle.join().unwrap();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(board.duty(&FAN_FRONT), 0);
    assert_eq!(board.duty(&FAN_BACK), 0);
}
