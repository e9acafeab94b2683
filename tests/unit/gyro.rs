//! Bosch gyro driver tests

use crate::common::{create_mock_board, MockTransport, StatusLog, BMI160, BMI270};
use mwsignal::board::{BoardInfo, ModuleInfo, ReadStatus};
use mwsignal::sensor::gyro::{Odr, Range};
use mwsignal::sensor::{ConfigRecord, GyroBoschConfig, GyroVariant};
use mwsignal::{Board, Error, ModuleId, RegisterHeader};

#[test]
fn test_bmi160_without_packed_data() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let gyro = board.gyro().unwrap();
    assert_eq!(gyro.variant(), GyroVariant::Bmi160);
    assert!(gyro.rotation_data_signal().is_ok());
    assert!(matches!(
        gyro.packed_rotation_data_signal(),
        Err(Error::SignalNotFound(_))
    ));
    assert!(!board.has_response_handler(RegisterHeader::new(ModuleId::GYRO, 7)));
}

#[test]
fn test_packed_data_by_revision_or_chip() {
    let (mut board, _) = create_mock_board(BMI160, 1);
    assert!(board.gyro().unwrap().packed_rotation_data_signal().is_ok());

    let (mut board, _) = create_mock_board(BMI270, 0);
    let gyro = board.gyro().unwrap();
    assert_eq!(gyro.variant(), GyroVariant::Bmi270);
    assert_eq!(
        gyro.high_freq_rotation_data_signal().unwrap(),
        gyro.packed_rotation_data_signal().unwrap()
    );
    let packed = board
        .signals()
        .get(RegisterHeader::new(ModuleId::GYRO, 7))
        .unwrap();
    assert_eq!(packed.spec().repeat_count, 3);
}

#[test]
fn test_rotation_is_decomposed_on_init() {
    let (board, _) = create_mock_board(BMI160, 0);
    let rotation = board.signals().get(RegisterHeader::new(ModuleId::GYRO, 5)).unwrap();
    let offsets: Vec<u8> = rotation.components().iter().map(|c| c.byte_offset).collect();
    assert_eq!(offsets, [0, 2, 4]);
}

#[test]
fn test_unknown_implementation_is_skipped() {
    let info = BoardInfo::new().with_module(ModuleId::GYRO, ModuleInfo::new(7, 0));
    let mut board = Board::new(MockTransport::new(), info);
    board.initialize();
    assert!(board.signals().is_empty());
    assert!(matches!(board.gyro(), Err(Error::ModuleNotPresent(ModuleId::GYRO))));
}

#[test]
fn test_write_config() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let mut gyro = board.gyro().unwrap();
    gyro.set_odr(Odr::Hz800);
    gyro.set_range(Range::Dps250);
    gyro.write_config().unwrap();
    assert_eq!(transport.sent(), [vec![0x13, 0x03, 0x2b, 0x03]]);
}

#[test]
fn test_getters_follow_setters() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let mut gyro = board.gyro().unwrap();
    assert_eq!(gyro.odr(), 100.0);
    assert_eq!(gyro.range(), 2000);

    assert_eq!(gyro.set_odr_approximate(1000.0), Odr::Hz800);
    assert_eq!(gyro.odr(), 800.0);
    assert_eq!(gyro.set_range_approximate(400.0), Range::Dps500);
    assert_eq!(gyro.range(), 500);
    // Setters touch memory only.
    drop(gyro);
    assert_eq!(board.config::<GyroBoschConfig>().unwrap().as_bytes(), &[0x2b, 0x02, 0x00]);
}

#[test]
fn test_start_stop_and_sampling() {
    let (mut board, transport) = create_mock_board(BMI270, 0);
    let mut gyro = board.gyro().unwrap();
    gyro.start().unwrap();
    assert!(!gyro.is_active());
    gyro.enable_rotation_sampling().unwrap();
    assert!(gyro.is_active());
    gyro.disable_rotation_sampling().unwrap();
    assert!(!gyro.is_active());
    gyro.stop().unwrap();

    assert_eq!(
        transport.sent(),
        [
            vec![0x13, 0x01, 0x01],
            vec![0x13, 0x02, 0x01, 0x00],
            vec![0x13, 0x02, 0x00, 0x01],
            vec![0x13, 0x01, 0x00],
        ]
    );
}

#[test]
fn test_offsets_on_bmi270_only() {
    let (mut board, transport) = create_mock_board(BMI270, 0);
    board.gyro().unwrap().set_offsets(1, 2, 3).unwrap();
    assert_eq!(transport.last_sent(), Some(vec![0x13, 0x08, 1, 2, 3]));

    let (mut board, transport) = create_mock_board(BMI160, 0);
    assert!(matches!(
        board.gyro().unwrap().set_offsets(1, 2, 3),
        Err(Error::UnsupportedImplementation {
            module: ModuleId::GYRO,
            implementation: 0
        })
    ));
    assert!(transport.sent().is_empty());
}

#[test]
fn test_read_config_chains_interrupt_read() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let log = StatusLog::default();
    board.gyro().unwrap().read_config(log.callback()).unwrap();
    assert_eq!(transport.sent(), [vec![0x13, 0x83]]);

    board.on_notification(&[0x13, 0x83, 0x2d, 0x04]).unwrap();
    // Second half requested, caller not told yet.
    assert_eq!(transport.last_sent(), Some(vec![0x13, 0x82]));
    assert!(log.statuses().is_empty());

    board.on_notification(&[0x13, 0x82, 0x01]).unwrap();
    assert_eq!(log.statuses(), [ReadStatus::Ok]);
    assert_eq!(
        board.config::<GyroBoschConfig>().unwrap().as_bytes(),
        &[0x2d, 0x04, 0x01]
    );
    let gyro = board.gyro().unwrap();
    assert_eq!(gyro.odr(), 3200.0);
    assert_eq!(gyro.range(), 125);
    assert!(gyro.is_active());
}

#[test]
fn test_unsolicited_config_response_updates_record_only() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    board.on_notification(&[0x13, 0x83, 0x27, 0x01]).unwrap();
    assert!(transport.sent().is_empty());
    assert_eq!(board.gyro().unwrap().range(), 1000);
}

#[test]
fn test_short_config_response() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let log = StatusLog::default();
    board.gyro().unwrap().read_config(log.callback()).unwrap();
    board.on_notification(&[0x13, 0x83, 0x2d]).unwrap();
    assert_eq!(log.statuses(), [ReadStatus::Error]);
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(
        board.config::<GyroBoschConfig>().unwrap(),
        &GyroBoschConfig::default()
    );
}

#[test]
fn test_chained_read_send_failure() {
    let (mut board, transport) = create_mock_board(BMI160, 0);
    let log = StatusLog::default();
    board.gyro().unwrap().read_config(log.callback()).unwrap();

    transport.set_link_down(true);
    board.on_notification(&[0x13, 0x83, 0x28, 0x00]).unwrap();
    assert_eq!(log.statuses(), [ReadStatus::Error]);

    // A late interrupt response finds nobody waiting.
    transport.set_link_down(false);
    board.on_notification(&[0x13, 0x82, 0x01]).unwrap();
    assert_eq!(log.statuses(), [ReadStatus::Error]);
}
