pub mod create_device;
pub mod get_device_by_id;
pub mod get_device_by_serial_number;
pub mod get_devices_by_user_id;
