//! LTR329 ambient light driver tests

use crate::common::{create_mock_board, StatusLog, BMI160};
use mwsignal::board::ReadStatus;
use mwsignal::sensor::ambient_light::{Gain, IntegrationTime, MeasurementRate};
use mwsignal::sensor::Ltr329Config;
use mwsignal::ModuleId;

#[test]
fn test_rate_approximate_end_to_end() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let log = StatusLog::default();

    let mut als = board.ambient_light().unwrap();
    assert_eq!(als.config().measurement_rate(), Some(MeasurementRate::Ms2000));
    assert_eq!(als.set_measurement_rate_approximate(1.0), MeasurementRate::Ms1000);
    assert_eq!(als.measurement_rate(), 1.0);

    als.write_config().unwrap();
    assert_eq!(transport.last_sent(), Some(vec![0x14, 0x02, 0x00, 0x04]));

    als.read_config(log.callback()).unwrap();
    assert_eq!(transport.last_sent(), Some(vec![0x14, 0x82]));

    // The sensor reports a different gain than the one in memory.
    assert!(board.on_notification(&[0x14, 0x82, 0x18, 0x04]).unwrap());
    assert_eq!(log.statuses(), [ReadStatus::Ok]);
    assert_eq!(board.serialize_config(ModuleId::AMBIENT_LIGHT).unwrap(), [0x18, 0x04]);
    assert_eq!(board.ambient_light().unwrap().gain(), 48);
}

#[test]
fn test_getters_follow_setters() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let mut als = board.ambient_light().unwrap();

    for gain in [Gain::X1, Gain::X2, Gain::X4, Gain::X8, Gain::X48, Gain::X96] {
        als.set_gain(gain);
        assert_eq!(als.gain(), gain.multiplier());
    }
    for time in [IntegrationTime::Ms50, IntegrationTime::Ms250, IntegrationTime::Ms400] {
        als.set_integration_time(time);
        assert_eq!(als.integration_time(), time);
    }
    als.set_measurement_rate(MeasurementRate::Ms50);
    assert_eq!(als.measurement_rate(), 20.0);
    assert_eq!(als.set_gain_approximate(5.9), Gain::X4);
    assert_eq!(als.gain(), 4);

    assert!(transport.sent().is_empty());
}

#[test]
fn test_unknown_stored_codes_fall_back() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    board
        .deserialize_config(ModuleId::AMBIENT_LIGHT, &[0b0001_0000, 0x06])
        .unwrap();
    let als = board.ambient_light().unwrap();
    assert_eq!(als.gain(), 1);
    assert_eq!(als.measurement_rate(), 1.0);
}

#[test]
fn test_start_stop() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let mut als = board.ambient_light().unwrap();
    assert!(!als.is_active());
    als.start().unwrap();
    assert!(als.is_active());
    als.stop().unwrap();
    assert!(!als.is_active());
    assert_eq!(transport.sent(), [vec![0x14, 0x01, 0x01], vec![0x14, 0x01, 0x00]]);
    drop(als);
    assert_eq!(board.config::<Ltr329Config>().unwrap().power_control(), 0);
}
