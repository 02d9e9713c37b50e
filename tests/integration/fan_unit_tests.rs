//! FanUnit behaviour through the public capability contract.

use fancycle::Error;
use fancycle::app::ports::EdgeInput;
use fancycle::config::{CycleConfig, FAN_BACK, FAN_FRONT};
use fancycle::drivers::pwm_channel::percent_to_duty;
use fancycle::error::HwInitError;
use fancycle::fan::{FanCapability, FanUnit};

use crate::mock_hw::Board;

fn ready_front(board: &Board) -> FanUnit {
    let fan = FanUnit::new(FAN_FRONT, board.hardware());
    fan.initialize().unwrap();
    fan
}

#[test]
fn power_round_trips_through_configuration() {
    let board = Board::new();
    let fan = ready_front(&board);
    for p in [0, 1, 33, 50, 99, 100] {
        fan.set_power(p).unwrap();
        assert_eq!(fan.configuration().max_power_percent, p);
        assert_eq!(board.duty(&FAN_FRONT), u32::from(percent_to_duty(p)));
    }
}

#[test]
fn full_power_is_full_duty() {
    let board = Board::new();
    let fan = ready_front(&board);
    fan.set_power(100).unwrap();
    assert_eq!(board.duty(&FAN_FRONT), 255);
}

#[test]
fn two_rotations_per_second_read_as_120_rpm() {
    let board = Board::new();
    let fan = ready_front(&board);

    board.input.emit_pulses(FAN_FRONT.tacho_pin, 4);
    board.clock.advance(1000);
    assert_eq!(fan.speed(), Ok(120));
}

#[test]
fn pulses_while_masked_are_not_counted() {
    let board = Board::new();
    let fan = ready_front(&board);

    board.input.disable_interrupt(FAN_FRONT.tacho_pin);
    board.input.emit_pulses(FAN_FRONT.tacho_pin, 10);
    board.input.enable_interrupt(FAN_FRONT.tacho_pin);
    board.input.emit_pulses(FAN_FRONT.tacho_pin, 2);

    board.clock.advance(1000);
    assert_eq!(fan.speed(), Ok(60));
}

#[test]
fn late_read_still_uses_one_window_of_pulses() {
    let board = Board::new();
    let fan = ready_front(&board);

    board.input.emit_pulses(FAN_FRONT.tacho_pin, 2);
    board.clock.advance(5000);
    // The count is scaled by the nominal window, not the elapsed time.
    assert_eq!(fan.speed(), Ok(60));
}

#[test]
fn gpio_failure_aborts_initialisation() {
    let board = Board::new();
    board.input.fail_next_configure(HwInitError::GpioConfigFailed(-1));
    let fan = FanUnit::new(FAN_BACK, board.hardware());

    assert_eq!(
        fan.initialize(),
        Err(Error::HardwareInit(HwInitError::GpioConfigFailed(-1)))
    );
    assert!(!fan.is_initialized());
    assert_eq!(fan.set_power(10), Err(Error::NotInitialized));
}

#[test]
fn fans_on_one_board_sample_independently() {
    let board = Board::new();
    let reg = board.ready_registry(CycleConfig::default());

    board.input.emit_pulses(FAN_FRONT.tacho_pin, 2);
    board.input.emit_pulses(FAN_BACK.tacho_pin, 6);
    board.clock.advance(1000);

    assert_eq!(reg.fan("Front").unwrap().speed(), Ok(60));
    assert_eq!(reg.fan("Back").unwrap().speed(), Ok(180));
}
