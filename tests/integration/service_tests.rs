//! Web-facing facade over a live registry.

use fancycle::Error;
use fancycle::app::service::{FanService, FanStatus, ManagerSettings, ServiceError};
use fancycle::config::{CycleConfig, FAN_FRONT};
use fancycle::scheduler::FanScheduler;

use crate::mock_hw::{Board, RecordingSink};

#[test]
fn statuses_list_every_fan() {
    let board = Board::new();
    let svc = FanService::new(board.ready_registry(CycleConfig::default()));

    board.input.emit_pulses(FAN_FRONT.tacho_pin, 3);
    board.clock.advance(1000);

    assert_eq!(
        svc.fan_statuses(),
        vec![
            FanStatus {
                name: "Back",
                speed: 0,
                power: 70
            },
            FanStatus {
                name: "Front",
                speed: 90,
                power: 60
            },
        ]
    );
}

#[test]
fn status_json_matches_web_ui() {
    let board = Board::new();
    let svc = FanService::new(board.ready_registry(CycleConfig::default()));
    let json = serde_json::to_value(svc.fan_statuses()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "name": "Back", "speed": 0, "power": 70 },
            { "name": "Front", "speed": 0, "power": 60 },
        ])
    );
}

#[test]
fn set_power_validates_and_applies() {
    let board = Board::new();
    let svc = FanService::new(board.ready_registry(CycleConfig::default()));

    assert_eq!(svc.set_fan_power("Side", 50), Err(ServiceError::NotFound));
    assert!(matches!(
        svc.set_fan_power("Front", 101),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert!(matches!(
        svc.set_fan_power("Front", -1),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert_eq!(board.duty(&FAN_FRONT), 255);

    svc.set_fan_power("Front", 40).unwrap();
    assert_eq!(board.duty(&FAN_FRONT), 102);
    assert_eq!(svc.fan_statuses()[1].power, 40);
}

#[test]
fn uninitialised_fan_surfaces_as_fan_error() {
    let board = Board::new();
    let reg = board.registry_with(&[FAN_FRONT], CycleConfig::default());
    let svc = FanService::new(std::sync::Arc::new(reg));

    assert_eq!(
        svc.set_fan_power("Front", 10),
        Err(ServiceError::Fan(Error::NotInitialized))
    );
    assert_eq!(svc.fan_statuses()[0].speed, 0);
}

#[test]
fn settings_update_reaches_the_next_boundary() {
    let board = Board::new();
    let reg = board.ready_registry(CycleConfig::default());
    let svc = FanService::new(std::sync::Arc::clone(&reg));
    let mut sched = FanScheduler::new(reg, RecordingSink::new());

    assert_eq!(
        svc.manager_settings(),
        ManagerSettings {
            interval: 600,
            runtime_of_fans: 600
        }
    );

    assert_eq!(sched.step().1, 600);
    svc.update_manager_settings(ManagerSettings {
        interval: 30,
        runtime_of_fans: 90,
    });
    sched.step();
    assert_eq!(sched.step().1, 30);
    assert_eq!(sched.step().1, 90);
}

#[test]
fn settings_parse_from_request_body() {
    let body = r#"{"interval": 120, "runtimeOfFans": 45}"#;
    let s: ManagerSettings = serde_json::from_str(body).unwrap();
    assert_eq!(s.interval, 120);
    assert_eq!(s.runtime_of_fans, 45);
}
