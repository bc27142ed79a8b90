/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and configuration status to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time and simulation step time
 * - Number of visible agents
 * - Result of the last parameter load
 */

use std::cell::Cell;
use std::time::Duration;

// Debug information to display
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub step_time: Duration,
    // Written by the view, which only has shared access to the model
    pub visible_agents: Cell<usize>,
    pub params_status: String,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            step_time: Duration::ZERO,
            visible_agents: Cell::new(0),
            params_status: String::from("defaults"),
        }
    }
}
