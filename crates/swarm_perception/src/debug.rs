//! Debug visualization collaborator
//!
//! Sensors and agents emit line requests here; rendering them is the host's
//! business. Drawing never fails and is skipped entirely when nobody listens.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use swarm_math::Vec3;

/// RGBA line color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugColor(pub [f32; 4]);

impl DebugColor {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const BLUE: Self = Self([0.0, 0.0, 1.0, 1.0]);
    pub const KHAKI: Self = Self([0.74, 0.72, 0.42, 1.0]);
}

impl Default for DebugColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A recorded line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub from: Vec3,
    pub to: Vec3,
    pub color: DebugColor,
}

/// Receiver of diagnostic line draws
pub trait DebugDraw: Send + Sync {
    /// Draw a segment between two points
    fn line(&self, from: Vec3, to: Vec3, color: DebugColor);

    /// Draw a ray; `direction` carries the length
    fn ray(&self, origin: Vec3, direction: Vec3, color: DebugColor) {
        self.line(origin, origin + direction, color);
    }
}

/// Discards every draw request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDebugDraw;

impl DebugDraw for NullDebugDraw {
    #[inline]
    fn line(&self, _from: Vec3, _to: Vec3, _color: DebugColor) {}
}

/// Collects draw requests so a host can render them after the tick
#[derive(Debug, Default)]
pub struct DebugRecorder {
    lines: Mutex<Vec<DebugLine>>,
}

impl DebugRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines recorded since the last [`DebugRecorder::take`]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Drain the recorded lines
    pub fn take(&self) -> Vec<DebugLine> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl DebugDraw for DebugRecorder {
    fn line(&self, from: Vec3, to: Vec3, color: DebugColor) {
        self.lines.lock().push(DebugLine { from, to, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_collects_and_drains() {
        let recorder = DebugRecorder::new();
        recorder.line(Vec3::ZERO, Vec3::X, DebugColor::RED);
        recorder.ray(Vec3::ZERO, Vec3::Z * 2.0, DebugColor::GREEN);
        assert_eq!(recorder.len(), 2);

        let lines = recorder.take();
        assert_eq!(lines[1].to, Vec3::new(0.0, 0.0, 2.0));
        assert!(recorder.is_empty());
    }
}
