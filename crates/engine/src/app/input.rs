use crate::actor::MoveDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Quit,
}

const ACTION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    /// Held-key turn: +1 per tick for left, -1 for right, 0 when both or neither.
    pub(crate) fn held_turn(&self) -> i32 {
        i32::from(self.is_down(InputAction::TurnLeft))
            - i32::from(self.is_down(InputAction::TurnRight))
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveForward => 0,
            InputAction::MoveBackward => 1,
            InputAction::StrafeLeft => 2,
            InputAction::StrafeRight => 3,
            InputAction::TurnLeft => 4,
            InputAction::TurnRight => 5,
            InputAction::Quit => 6,
        }
    }

    pub const fn move_direction(self) -> Option<MoveDirection> {
        match self {
            InputAction::MoveForward => Some(MoveDirection::Forward),
            InputAction::MoveBackward => Some(MoveDirection::Backward),
            InputAction::StrafeLeft => Some(MoveDirection::StrafeLeft),
            InputAction::StrafeRight => Some(MoveDirection::StrafeRight),
            _ => None,
        }
    }
}
