//! Raster scan geometry.
//!
//! A [`ScanDescriptor`] walks an image line by line along its major axis.
//! Lines run along X for an X-major scan (rows) or along Y for a Y-major
//! scan (columns). Positions are emitted in scene units: pixel edges times
//! `step`, shifted by the placement offset. Pixels sampling at or below the
//! skip intensity bound each sweep, and lines made only of them are skipped.

use super::bitmap::RasterImage;
use super::traversal::{ScanDirection, Traversal};
use crate::types::BoxedIterator;
use std::collections::VecDeque;
use std::sync::Arc;

/// One head movement of a raster scan: travel to `(x, y)` at `power`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSegment {
    pub x: f64,
    pub y: f64,
    /// Laser intensity in `[0, 1]` while travelling.
    pub power: f64,
}

impl ScanSegment {
    pub fn is_laser_on(&self) -> bool {
        self.power > 0.0
    }
}

/// Scan of one image, handed to the interpreter inside a raster command.
#[derive(Debug, Clone)]
pub struct ScanDescriptor {
    image: Arc<RasterImage>,
    traversal: Traversal,
    skip_pixel: f64,
    overscan: f64,
    offset_x: f64,
    offset_y: f64,
    step: f64,
}

impl ScanDescriptor {
    /// Describe a scan of `image` placed at `offset`.
    ///
    /// `step` below one is raised to one; negative overscan counts as none.
    pub fn new(
        image: Arc<RasterImage>,
        traversal: Traversal,
        overscan: i32,
        offset: (f64, f64),
        step: i32,
    ) -> Self {
        Self {
            image,
            traversal,
            skip_pixel: 0.0,
            overscan: f64::from(overscan.max(0)),
            offset_x: offset.0,
            offset_y: offset.1,
            step: f64::from(step.max(1)),
        }
    }

    pub fn image(&self) -> &Arc<RasterImage> {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn overscan(&self) -> f64 {
        self.overscan
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Intensity of pixel `(x, y)`.
    pub fn px(&self, x: u32, y: u32) -> f64 {
        self.image.intensity(x, y).unwrap_or(0.0)
    }

    /// Scene position where the first sweep begins.
    ///
    /// An image without any burnable pixel starts at the placement offset.
    pub fn initial_position_in_scene(&self) -> (f64, f64) {
        let forward = !self.starts_reversed();
        self.lines()
            .find_map(|line| {
                self.line_bounds(line).map(|(lo, hi)| {
                    let edge = if forward { lo } else { hi + 1 };
                    self.scene(f64::from(edge) * self.step, line)
                })
            })
            .unwrap_or((self.offset_x, self.offset_y))
    }

    /// Direction flags of the first sweep.
    pub fn initial_direction(&self) -> ScanDirection {
        self.traversal.direction()
    }

    /// Consume the descriptor into its segment sequence.
    pub fn into_segments(self) -> ScanSegments {
        let forward = !self.starts_reversed();
        let lines: Vec<u32> = self.lines().collect();
        ScanSegments {
            descriptor: self,
            lines: lines.into_iter(),
            forward,
            started: false,
            pending: VecDeque::new(),
        }
    }

    fn starts_reversed(&self) -> bool {
        if self.traversal.is_y_major() {
            self.traversal.starts_bottom()
        } else {
            self.traversal.starts_right()
        }
    }

    fn line_count(&self) -> u32 {
        if self.traversal.is_y_major() {
            self.width()
        } else {
            self.height()
        }
    }

    fn line_len(&self) -> u32 {
        if self.traversal.is_y_major() {
            self.height()
        } else {
            self.width()
        }
    }

    /// Line indices in visiting order.
    fn lines(&self) -> BoxedIterator<'static, u32> {
        let count = self.line_count();
        let reversed = if self.traversal.is_y_major() {
            self.traversal.starts_right()
        } else {
            self.traversal.starts_bottom()
        };
        if reversed {
            Box::new((0..count).rev())
        } else {
            Box::new(0..count)
        }
    }

    fn sample(&self, line: u32, pos: u32) -> f64 {
        if self.traversal.is_y_major() {
            self.px(line, pos)
        } else {
            self.px(pos, line)
        }
    }

    fn burns(&self, line: u32, pos: u32) -> bool {
        self.sample(line, pos) > self.skip_pixel
    }

    /// First and last burnable pixel of a line.
    fn line_bounds(&self, line: u32) -> Option<(u32, u32)> {
        let len = self.line_len();
        let lo = (0..len).find(|&pos| self.burns(line, pos))?;
        let hi = (lo..len).rev().find(|&pos| self.burns(line, pos))?;
        Some((lo, hi))
    }

    /// Map a major-axis scene distance and a line index to scene `(x, y)`.
    fn scene(&self, major: f64, line: u32) -> (f64, f64) {
        let minor = f64::from(line) * self.step;
        if self.traversal.is_y_major() {
            (minor + self.offset_x, major + self.offset_y)
        } else {
            (major + self.offset_x, minor + self.offset_y)
        }
    }
}

/// Lazy segment sequence of one scan. Restarting requires a new descriptor.
#[derive(Debug)]
pub struct ScanSegments {
    descriptor: ScanDescriptor,
    lines: std::vec::IntoIter<u32>,
    forward: bool,
    started: bool,
    pending: VecDeque<ScanSegment>,
}

impl ScanSegments {
    fn push(&mut self, major: f64, line: u32, power: f64) {
        let (x, y) = self.descriptor.scene(major, line);
        self.pending.push_back(ScanSegment { x, y, power });
    }

    fn sweep(&mut self, line: u32, lo: u32, hi: u32) {
        let step = self.descriptor.step;
        let start = if self.forward { lo } else { hi + 1 };
        if self.started {
            self.push(f64::from(start) * step, line, 0.0);
        }
        self.started = true;

        let mut end = start;
        if self.forward {
            let mut pos = lo;
            while pos <= hi {
                let value = self.descriptor.sample(line, pos);
                let mut last = pos;
                while last < hi && self.descriptor.sample(line, last + 1) == value {
                    last += 1;
                }
                end = last + 1;
                self.push(f64::from(end) * step, line, value);
                pos = last + 1;
            }
        } else {
            let mut pos = hi;
            loop {
                let value = self.descriptor.sample(line, pos);
                let mut first = pos;
                while first > lo && self.descriptor.sample(line, first - 1) == value {
                    first -= 1;
                }
                end = first;
                self.push(f64::from(end) * step, line, value);
                if first == lo {
                    break;
                }
                pos = first - 1;
            }
        }

        let overscan = self.descriptor.overscan;
        if overscan > 0.0 {
            let major = f64::from(end) * step;
            let major = if self.forward {
                major + overscan
            } else {
                major - overscan
            };
            self.push(major, line, 0.0);
        }

        if !self.descriptor.traversal.is_unidirectional() {
            self.forward = !self.forward;
        }
    }
}

impl Iterator for ScanSegments {
    type Item = ScanSegment;

    fn next(&mut self) -> Option<ScanSegment> {
        loop {
            if let Some(segment) = self.pending.pop_front() {
                return Some(segment);
            }
            let line = self.lines.next()?;
            if let Some((lo, hi)) = self.descriptor.line_bounds(line) {
                self.sweep(line, lo, hi);
            }
        }
    }
}
