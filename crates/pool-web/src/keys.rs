//! Keyboard bindings: A/D or the arrow keys rotate the cue, W/S or up/down
//! change power, space shoots, R re-racks.

use pool_engine::Command;

/// Aim rotation per key press (4 degrees).
pub const AIM_STEP: f32 = 4.0 * std::f32::consts::PI / 180.0;
/// Power change per key press.
pub const POWER_STEP: f32 = 0.1;

pub const KEY_SPACE: u32 = 32;
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_A: u32 = 65;
pub const KEY_D: u32 = 68;
pub const KEY_R: u32 = 82;
pub const KEY_S: u32 = 83;
pub const KEY_W: u32 = 87;

/// Command bound to a DOM key code, if any.
pub fn command_for_key(key_code: u32) -> Option<Command> {
    let aim = |delta_angle: f32, delta_power: f32| Command::AdjustAim { delta_angle, delta_power };
    match key_code {
        KEY_A | KEY_LEFT => Some(aim(-AIM_STEP, 0.0)),
        KEY_D | KEY_RIGHT => Some(aim(AIM_STEP, 0.0)),
        KEY_W | KEY_UP => Some(aim(0.0, POWER_STEP)),
        KEY_S | KEY_DOWN => Some(aim(0.0, -POWER_STEP)),
        KEY_SPACE => Some(Command::Shoot),
        KEY_R => Some(Command::Reset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings() {
        assert_eq!(command_for_key(KEY_SPACE), Some(Command::Shoot));
        assert_eq!(command_for_key(KEY_R), Some(Command::Reset));
        assert_eq!(
            command_for_key(KEY_W),
            Some(Command::AdjustAim { delta_angle: 0.0, delta_power: POWER_STEP })
        );
        assert_eq!(command_for_key(KEY_LEFT), command_for_key(KEY_A));
        assert_eq!(command_for_key(13), None);
    }

    #[test]
    fn aim_step_is_four_degrees() {
        assert!((AIM_STEP.to_degrees() - 4.0).abs() < 1e-4);
    }
}
