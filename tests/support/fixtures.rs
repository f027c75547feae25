//! Test fixtures and constants.

use std::fs;
use std::path::Path;

/// Remote every library-level test pretends to clone.
pub const REMOTE: &str = "https://github.com/fastlane/certificates";

/// Bundle identifier used across tests.
pub const APP: &str = "tools.fastlane.app";

/// UUID of the profile produced by [`profile_bytes`] unless told otherwise.
pub const PROFILE_UUID: &str = "98264c6b-5151-4349-8d0f-66691e48ae35";

/// Stand-in certificate and key contents.
pub const CERT: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIFake\n-----END CERTIFICATE-----\n";
pub const P12: &[u8] = b"\x30\x82\x0a\x00fake pkcs12";

/// A provisioning profile as the portal hands it out: a signed blob with an
/// XML property list inside.
pub fn profile_bytes(uuid: &str, devices: usize) -> Vec<u8> {
    let devices: String = (0..devices)
        .map(|i| format!("<string>{:040x}</string>", i))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Name</key>
    <string>match AppStore tools.fastlane.app</string>
    <key>ProvisionedDevices</key>
    <array>{}</array>
    <key>TeamIdentifier</key>
    <array><string>ABCDE12345</string></array>
    <key>UUID</key>
    <string>{}</string>
</dict>
</plist>"#,
        devices, uuid
    );
    let mut bytes = vec![0x30, 0x82, 0x1f, 0x00];
    bytes.extend_from_slice(xml.as_bytes());
    bytes.extend_from_slice(&[0xa0, 0x82, 0x0d]);
    bytes
}

/// Write `content` at `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
