//! FanRegistry construction, lookup and initialisation policy.

use fancycle::Error;
use fancycle::config::{CycleConfig, FAN_BACK, FAN_FRONT, FanConfig};
use fancycle::error::HwInitError;

use crate::mock_hw::Board;

#[test]
fn lookup_by_name() {
    let board = Board::new();
    let reg = board.ready_registry(CycleConfig::default());

    let front = reg.fan("Front").expect("front fan");
    assert_eq!(front.configuration().pwm_pin, FAN_FRONT.pwm_pin);
    assert!(reg.fan("nonexistent").is_none());
}

#[test]
fn every_key_matches_its_fan_name() {
    let board = Board::new();
    let reg = board.ready_registry(CycleConfig::default());

    let all = reg.fans();
    assert_eq!(all.len(), 2);
    for (name, fan) in &all {
        assert_eq!(*name, fan.configuration().name);
    }
    assert_eq!(reg.names(), vec!["Back", "Front"]);
}

#[test]
fn last_create_wins() {
    let board = Board::new();
    let reg = board.registry_with(
        &[
            FAN_BACK,
            FanConfig {
                max_power_percent: 25,
                ..FAN_BACK
            },
        ],
        CycleConfig::default(),
    );
    reg.initialize_all().unwrap();

    assert_eq!(reg.len(), 1);
    assert_eq!(reg.fan("Back").unwrap().configuration().max_power_percent, 25);
    assert_eq!(board.pwm.configure_count(), 1);
}

#[test]
fn shared_timer_is_rejected() {
    let board = Board::new();
    let side = FanConfig {
        name: "Side",
        pwm_pin: 4,
        tacho_pin: 5,
        channel: 7,
        timer: FAN_BACK.timer,
        max_power_percent: 50,
    };
    let reg = board.registry_with(&[FAN_FRONT, FAN_BACK, side], CycleConfig::default());

    assert!(matches!(
        reg.initialize_all(),
        Err(Error::HardwareInit(HwInitError::ResourceConflict { .. }))
    ));
    assert_eq!(board.pwm.configure_count(), 0);
}

#[test]
fn pin_conflict_fails_that_fan() {
    let board = Board::new();
    let looped = FanConfig {
        tacho_pin: FAN_FRONT.pwm_pin,
        ..FAN_FRONT
    };
    let reg = board.registry_with(&[looped], CycleConfig::default());
    assert_eq!(
        reg.initialize_all(),
        Err(Error::HardwareInit(HwInitError::PinConflict {
            pin: FAN_FRONT.pwm_pin
        }))
    );
}

#[test]
fn ledc_failure_propagates() {
    let board = Board::new();
    board
        .pwm
        .fail_next_configure(HwInitError::PwmTimerConfigFailed(0x102));
    let reg = board.registry_with(&[FAN_FRONT], CycleConfig::default());

    assert_eq!(
        reg.initialize_all(),
        Err(Error::HardwareInit(HwInitError::PwmTimerConfigFailed(0x102)))
    );
    assert!(!reg.unit("Front").unwrap().is_initialized());
}

#[test]
fn zero_durations_are_accepted() {
    let board = Board::new();
    let reg = board.ready_registry(CycleConfig {
        interval_secs: 0,
        runtime_secs: 0,
    });
    assert_eq!(reg.interval_secs(), 0);
    assert_eq!(reg.runtime_secs(), 0);
}
