/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

/// Stack pointer value used when nothing else is configured.
pub const DEFAULT_STACK_POINTER: u16 = 0xffff;

/// Session settings for a [`Proc8080`](../proc_state/struct.Proc8080.html).
///
/// ```
/// use i8080_core::Config;
///
/// let config = Config::default()
///     .with_stack_pointer(0x7fff)
///     .with_stop_at_image_end(false);
/// assert_eq!(config.stack_pointer, 0x7fff);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Value of `SP` when the session starts.
    pub stack_pointer: u16,
    /// Whether [`run`](../proc_state/struct.Proc8080.html#method.run) stops once the
    /// program counter leaves the loaded image.
    pub stop_at_image_end: bool,
}

impl Config {
    pub fn with_stack_pointer(mut self, stack_pointer: u16) -> Config {
        self.stack_pointer = stack_pointer;
        self
    }

    pub fn with_stop_at_image_end(mut self, stop: bool) -> Config {
        self.stop_at_image_end = stop;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            stack_pointer: DEFAULT_STACK_POINTER,
            stop_at_image_end: true,
        }
    }
}

/// Parses a 16-bit address given on the command line, either decimal or `0x` prefixed hex.
pub fn parse_address(raw: &str) -> std::result::Result<u16, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => trimmed.parse::<u16>(),
    };
    parsed.map_err(|err| format!("invalid address '{raw}': {err}"))
}
