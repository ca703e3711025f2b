/// Discrete commands the input layer feeds to the table, at most a handful
/// per frame. Angles are radians, power is a fraction of full strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Strike the cue ball with the current aim.
    Shoot,
    /// Rotate the cue and change power by deltas.
    AdjustAim { delta_angle: f32, delta_power: f32 },
    /// Set absolute aim, e.g. from a pointer drag.
    SetAim { angle: f32, power: f32 },
    /// Re-rack and start over.
    Reset,
}

/// Commands collected between frames.
/// The host pushes as input arrives; the runner drains once per frame.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Take every pending command in arrival order.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let mut q = CommandQueue::new();
        q.push(Command::AdjustAim { delta_angle: 0.1, delta_power: 0.0 });
        q.push(Command::Shoot);
        assert_eq!(q.len(), 2);
        let commands = q.drain();
        assert_eq!(commands[1], Command::Shoot);
        assert!(q.is_empty());
    }

    #[test]
    fn iter_does_not_consume() {
        let mut q = CommandQueue::default();
        q.push(Command::SetAim { angle: 1.0, power: 0.5 });
        assert_eq!(q.iter().count(), 1);
        match q.drain()[0] {
            Command::SetAim { angle, power } => {
                assert_eq!(angle, 1.0);
                assert_eq!(power, 0.5);
            }
            other => panic!("expected SetAim, got {:?}", other),
        }
    }
}
