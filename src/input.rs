/*
 * Input Module
 *
 * This module handles keyboard input for the demo.
 *
 * Features:
 * - Held movement keys become the leader's input direction every frame
 * - Command keys (spawn, despawn, camera, reload) fire once per
 *   press-and-release, never while held
 * - Raw window events are forwarded to egui
 */

use nannou::prelude::*;

use crate::app::{self, Model};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Spawn,
    Despawn,
    CycleCamera,
    ReloadParams,
}

impl Command {
    pub fn for_key(key: Key) -> Option<Self> {
        match key {
            Key::Equals => Some(Command::Spawn),
            Key::Minus => Some(Command::Despawn),
            Key::C => Some(Command::CycleCamera),
            Key::R => Some(Command::ReloadParams),
            _ => None,
        }
    }
}

/// Fires on release, and only after a press was seen. Repeated presses
/// while held (OS key repeat) are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeTrigger {
    held: bool,
}

impl EdgeTrigger {
    pub fn press(&mut self) {
        self.held = true;
    }

    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }
}

#[derive(Debug, Default)]
pub struct CommandKeys {
    spawn: EdgeTrigger,
    despawn: EdgeTrigger,
    cycle_camera: EdgeTrigger,
    reload: EdgeTrigger,
}

impl CommandKeys {
    fn trigger_mut(&mut self, command: Command) -> &mut EdgeTrigger {
        match command {
            Command::Spawn => &mut self.spawn,
            Command::Despawn => &mut self.despawn,
            Command::CycleCamera => &mut self.cycle_camera,
            Command::ReloadParams => &mut self.reload,
        }
    }

    pub fn key_pressed(&mut self, key: Key) {
        if let Some(command) = Command::for_key(key) {
            self.trigger_mut(command).press();
        }
    }

    pub fn key_released(&mut self, key: Key) -> Option<Command> {
        let command = Command::for_key(key)?;
        self.trigger_mut(command).release().then_some(command)
    }
}

/// Leader input direction from held keys; zero when nothing is held.
pub fn leader_direction(is_down: impl Fn(Key) -> bool) -> Vec3 {
    let mut direction = Vec3::ZERO;

    if is_down(Key::W) || is_down(Key::Up) {
        direction.z -= 1.0;
    }
    if is_down(Key::S) || is_down(Key::Down) {
        direction.z += 1.0;
    }
    if is_down(Key::A) || is_down(Key::Left) {
        direction.x -= 1.0;
    }
    if is_down(Key::D) || is_down(Key::Right) {
        direction.x += 1.0;
    }
    if is_down(Key::Space) {
        direction.y += 1.0;
    }
    if is_down(Key::LShift) {
        direction.y -= 1.0;
    }

    crate::vector::safe_normalize(direction).unwrap_or(Vec3::ZERO)
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    model.command_keys.key_pressed(key);
}

// Key released event handler
pub fn key_released(_app: &App, model: &mut Model, key: Key) {
    if let Some(command) = model.command_keys.key_released(key) {
        app::apply_command(model, command);
    }
}

// Pass raw window events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_fires_once_on_release() {
        let mut keys = CommandKeys::default();

        // OS key repeat delivers several presses
        keys.key_pressed(Key::Equals);
        keys.key_pressed(Key::Equals);
        keys.key_pressed(Key::Equals);
        assert_eq!(keys.key_released(Key::Equals), Some(Command::Spawn));
        assert_eq!(keys.key_released(Key::Equals), None);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut keys = CommandKeys::default();
        assert_eq!(keys.key_released(Key::Minus), None);
        assert_eq!(keys.key_released(Key::Q), None);
    }

    #[test]
    fn commands_track_their_own_keys() {
        let mut keys = CommandKeys::default();
        keys.key_pressed(Key::Minus);
        keys.key_pressed(Key::C);
        assert_eq!(keys.key_released(Key::C), Some(Command::CycleCamera));
        assert_eq!(keys.key_released(Key::Minus), Some(Command::Despawn));
        assert_eq!(keys.key_released(Key::R), None);
    }

    #[test]
    fn direction_is_unit_or_zero() {
        assert_eq!(leader_direction(|_| false), Vec3::ZERO);

        let forward = leader_direction(|key| key == Key::W);
        assert_eq!(forward, vec3(0.0, 0.0, -1.0));

        let diagonal = leader_direction(|key| matches!(key, Key::D | Key::Space));
        assert!((diagonal.length() - 1.0).abs() < 1e-5);
        assert!(diagonal.x > 0.0 && diagonal.y > 0.0);

        // Opposite keys cancel out
        assert_eq!(leader_direction(|key| matches!(key, Key::A | Key::D)), Vec3::ZERO);
    }
}
