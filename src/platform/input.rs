//! Input intent accumulation
//!
//! Browser event handlers feed raw key codes and pointer positions in here;
//! the game loop turns the current state into one `TickInput` per tick and
//! clears the one-shot requests once a tick has consumed them.

use crate::sim::{MenuCommand, TickInput};

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    /// Last pointer x in playfield coordinates while the pointer steers
    pointer_x: Option<f32>,
    launch: bool,
    pause: bool,
    command: Option<MenuCommand>,
    pub idle_mode: bool,
    /// FPS and particle counter overlay
    pub debug: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a `keydown` by `KeyboardEvent.code`. Returns true when the key
    /// is one the game uses (so the host can suppress scrolling).
    pub fn key_down(&mut self, code: &str, ctrl: bool, shift: bool) -> bool {
        match code {
            "KeyD" if ctrl && shift => {
                self.debug = !self.debug;
                log::info!("Debug overlay: {}", self.debug);
            }
            "ArrowLeft" | "KeyA" => self.left = true,
            "ArrowRight" | "KeyD" => self.right = true,
            "Space" => self.launch = true,
            "Escape" => self.pause = true,
            "KeyI" => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
            _ => return false,
        }
        true
    }

    pub fn key_up(&mut self, code: &str) {
        match code {
            "ArrowLeft" | "KeyA" => self.left = false,
            "ArrowRight" | "KeyD" => self.right = false,
            _ => {}
        }
    }

    /// Mouse or touch moved; `x` is already in playfield coordinates
    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    /// Click or tap on the playfield: launch stuck balls and fire
    pub fn tap(&mut self) {
        self.launch = true;
    }

    /// Window lost focus: drop held keys so the paddle doesn't keep sliding
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    pub fn queue_command(&mut self, command: MenuCommand) {
        self.command = Some(command);
    }

    /// Keyboard direction from held keys: -1, 0 or 1
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Input for the next tick. Steering with the keyboard hands control
    /// back from the pointer until it moves again.
    pub fn tick_input(&mut self) -> TickInput {
        let direction = self.direction();
        if direction != 0.0 {
            self.pointer_x = None;
        }

        TickInput {
            direction,
            pointer_x: self.pointer_x,
            fire: false,
            launch: self.launch,
            pause: self.pause,
            command: self.command,
            idle_mode: self.idle_mode,
        }
    }

    /// Clear one-shot inputs after a tick processed them
    pub fn clear_one_shots(&mut self) {
        self.launch = false;
        self.pause = false;
        self.command = None;
    }
}

/// Map a client-space x coordinate onto the playfield
pub fn to_playfield_x(client_x: f32, rect_left: f32, rect_width: f32, playfield_width: f32) -> f32 {
    if rect_width <= 0.0 {
        return playfield_width / 2.0;
    }
    (client_x - rect_left) * playfield_width / rect_width
}
