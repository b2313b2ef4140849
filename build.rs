const COMMANDS: &[&str] = &[
    "check_accessibility_permission",
    "request_accessibility_permission",
    "check_full_disk_access_permission",
    "request_full_disk_access_permission",
    "check_screen_recording_permission",
    "request_screen_recording_permission",
    "check_microphone_permission",
    "request_microphone_permission",
    "check_camera_permission",
    "request_camera_permission",
    "check_input_monitoring_permission",
    "request_input_monitoring_permission",
    "check_permission",
    "request_permission",
    "check_photokit_permission",
    "request_photokit_permission",
    "register_photokit_permission_listener",
    "unregister_photokit_permission_listener",
    "get_photokit_permission_listeners",
    "get_photos_count",
];

fn main() {
    // Link the frameworks reached through the Objective-C runtime. Nothing
    // references their symbols directly, so the linker would drop them.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("macos") {
        println!("cargo:rustc-link-lib=framework=Photos");
        println!("cargo:rustc-link-lib=framework=AVFoundation");
    }

    tauri_plugin::Builder::new(COMMANDS).build()
}
