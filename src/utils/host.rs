//! Host display settings.

use std::process::{Command, Stdio};
use tracing::{debug, info};

/// `xset` invocations that stop X11 from blanking the screen on its own.
const XSET_COMMANDS: [&[&str]; 3] = [&["s", "off"], &["-dpms"], &["s", "noblank"]];

/// Turn off the X11 screensaver and display power management.
///
/// Best effort: missing `xset` or no X display are logged and ignored, the
/// frame's own screensaver keeps working either way.
pub fn disable_system_screensaver() {
    let mut applied = 0;
    for args in XSET_COMMANDS {
        match Command::new("xset")
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => applied += 1,
            Ok(status) => debug!("xset {} exited with {}", args.join(" "), status),
            Err(e) => {
                debug!("xset not available: {}", e);
                return;
            }
        }
    }
    if applied == XSET_COMMANDS.len() {
        info!("Disabled host screensaver and DPMS");
    }
}
