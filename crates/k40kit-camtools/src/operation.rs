//! Laser Operations
//!
//! A laser operation is an ordered collection of graphic elements plus the
//! settings used to burn them. Calling [`LaserOperation::generate`] yields
//! the command stream for the whole operation, lazily and in a fixed order:
//!
//! 1. header: rapid mode, absolute positioning, speed, step, power,
//!    d-ratio and acceleration
//! 2. body: outlines for cut/engrave, image scans for raster
//! 3. footer: rapid mode
//!
//! Settings are updated from loosely-typed [`Properties`]. Values that fail
//! to coerce keep the previous setting.

use crate::error::OperationError;
use k40kit_core::types::BoxedIterator;
use k40kit_core::{
    format_duration, Element, LaserCommand, Properties, RasterDirection, ScanDescriptor,
    Traversal, MILS_PER_MM,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;
use std::str::FromStr;

/// Default power on the 0 to 1000 scale.
pub const DEFAULT_POWER: f64 = 1000.0;

/// Default raster overscan, also used when an overscan value is unreadable.
pub const DEFAULT_OVERSCAN: i32 = 20;

/// Status of an operation that has not been spooled yet.
pub const STATUS_QUEUED: &str = "Queued";

/// Kind of laser operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Cut,
    Engrave,
    Raster,
}

impl OperationType {
    /// Default speed in mm/s.
    pub fn default_speed(self) -> f64 {
        match self {
            Self::Cut => 10.0,
            Self::Engrave => 35.0,
            Self::Raster => 150.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cut => "Cut",
            Self::Engrave => "Engrave",
            Self::Raster => "Raster",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationType {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cut" => Ok(Self::Cut),
            "engrave" => Ok(Self::Engrave),
            "raster" => Ok(Self::Raster),
            _ => Err(OperationError::UnknownType(s.to_string())),
        }
    }
}

/// Settings shared by every operation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserSettings {
    /// Speed in mm/s
    pub speed: f64,
    /// Power, 0 to 1000
    pub power: f64,
    /// Apply `dratio` instead of the device default
    pub dratio_custom: bool,
    pub dratio: Option<f64>,
    /// Apply `acceleration` instead of the device default
    pub acceleration_custom: bool,
    pub acceleration: Option<i32>,
}

impl LaserSettings {
    pub fn new(op_type: OperationType) -> Self {
        Self {
            speed: op_type.default_speed(),
            power: DEFAULT_POWER,
            dratio_custom: false,
            dratio: None,
            acceleration_custom: false,
            acceleration: None,
        }
    }

    /// D-ratio to send, `None` meaning the device default.
    pub fn d_ratio(&self) -> Option<f64> {
        self.dratio.filter(|_| self.dratio_custom)
    }

    /// Acceleration to send, `None` meaning the device default.
    pub fn effective_acceleration(&self) -> Option<i32> {
        self.acceleration.filter(|_| self.acceleration_custom)
    }
}

/// Settings specific to raster operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSettings {
    /// Pixel step, at least 1
    pub raster_step: i32,
    pub raster_direction: RasterDirection,
    pub unidirectional: bool,
    /// Overscan past each sweep
    pub overscan: i32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            raster_step: 1,
            raster_direction: RasterDirection::TopToBottom,
            unidirectional: false,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

impl RasterSettings {
    pub fn traversal(&self) -> Traversal {
        Traversal::from_direction(self.raster_direction, self.unidirectional)
    }
}

/// Operation kind with its kind-specific settings.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    Cut,
    Engrave,
    Raster(RasterSettings),
}

impl OperationKind {
    pub fn new(op_type: OperationType) -> Self {
        match op_type {
            OperationType::Cut => Self::Cut,
            OperationType::Engrave => Self::Engrave,
            OperationType::Raster => Self::Raster(RasterSettings::default()),
        }
    }

    pub fn op_type(&self) -> OperationType {
        match self {
            Self::Cut => OperationType::Cut,
            Self::Engrave => OperationType::Engrave,
            Self::Raster(_) => OperationType::Raster,
        }
    }
}

/// Every setting a property map can carry, coerced once.
///
/// `set_properties` applies it and `has_same_properties` compares it, so
/// the two always read a field the same way.
#[derive(Debug, Default)]
struct SettingsUpdate {
    speed: Option<f64>,
    power: Option<f64>,
    dratio: Option<f64>,
    dratio_custom: Option<bool>,
    acceleration: Option<i32>,
    acceleration_custom: Option<bool>,
    raster_step: Option<i32>,
    raster_direction: Option<RasterDirection>,
    unidirectional: Option<bool>,
    overscan: Option<i32>,
}

impl SettingsUpdate {
    fn read(values: &Properties) -> Self {
        let overscan = if values.contains("overscan") {
            Some(
                values
                    .lenient_int("overscan")
                    .and_then(|v| i32::try_from(v).ok())
                    .unwrap_or(DEFAULT_OVERSCAN),
            )
        } else {
            None
        };
        Self {
            speed: values.lenient_float("speed"),
            power: values.lenient_float("power"),
            dratio: values.lenient_float("dratio"),
            dratio_custom: values.lenient_flag("dratio_custom"),
            acceleration: values
                .lenient_int("acceleration")
                .and_then(|v| i32::try_from(v).ok()),
            acceleration_custom: values.lenient_flag("acceleration_custom"),
            raster_step: values
                .lenient_int("raster_step")
                .and_then(|v| i32::try_from(v).ok())
                .filter(|&step| step >= 1),
            raster_direction: values
                .lenient_int("raster_direction")
                .and_then(|v| RasterDirection::try_from(v).ok()),
            unidirectional: values.lenient_flag("unidirectional"),
            overscan,
        }
    }

    fn apply(&self, settings: &mut LaserSettings, kind: &mut OperationKind) {
        set(&mut settings.speed, self.speed);
        set(&mut settings.power, self.power);
        if self.dratio.is_some() {
            settings.dratio = self.dratio;
        }
        set(&mut settings.dratio_custom, self.dratio_custom);
        if self.acceleration.is_some() {
            settings.acceleration = self.acceleration;
        }
        set(&mut settings.acceleration_custom, self.acceleration_custom);
        if let OperationKind::Raster(raster) = kind {
            set(&mut raster.raster_step, self.raster_step);
            set(&mut raster.raster_direction, self.raster_direction);
            set(&mut raster.unidirectional, self.unidirectional);
            set(&mut raster.overscan, self.overscan);
        }
    }

    fn matches(&self, settings: &LaserSettings, kind: &OperationKind) -> bool {
        let base = same(&settings.speed, self.speed)
            && same(&settings.power, self.power)
            && self.dratio.is_none_or(|v| settings.dratio == Some(v))
            && same(&settings.dratio_custom, self.dratio_custom)
            && self
                .acceleration
                .is_none_or(|v| settings.acceleration == Some(v))
            && same(&settings.acceleration_custom, self.acceleration_custom);
        match kind {
            OperationKind::Raster(raster) => {
                base && same(&raster.raster_step, self.raster_step)
                    && same(&raster.raster_direction, self.raster_direction)
                    && same(&raster.unidirectional, self.unidirectional)
                    && same(&raster.overscan, self.overscan)
            }
            OperationKind::Cut | OperationKind::Engrave => base,
        }
    }
}

fn set<T: Copy>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn same<T: PartialEq>(field: &T, value: Option<T>) -> bool {
    value.is_none_or(|v| *field == v)
}

/// A cut, engrave or raster operation over an ordered list of elements.
#[derive(Debug, Clone)]
pub struct LaserOperation {
    kind: OperationKind,
    settings: LaserSettings,
    elements: Vec<Element>,
    status: String,
}

impl LaserOperation {
    pub fn new(op_type: OperationType) -> Self {
        Self {
            kind: OperationKind::new(op_type),
            settings: LaserSettings::new(op_type),
            elements: Vec::new(),
            status: STATUS_QUEUED.to_string(),
        }
    }

    pub fn cut() -> Self {
        Self::new(OperationType::Cut)
    }

    pub fn engrave() -> Self {
        Self::new(OperationType::Engrave)
    }

    pub fn raster() -> Self {
        Self::new(OperationType::Raster)
    }

    /// New operation with settings taken from a property map.
    pub fn with_properties(op_type: OperationType, values: &Properties) -> Self {
        let mut op = Self::new(op_type);
        op.set_properties(values);
        op
    }

    /// New operation holding `element`, configured from its attributes.
    pub fn from_element(op_type: OperationType, element: Element) -> Self {
        let mut op = Self::with_properties(op_type, element.values());
        op.push(element);
        op
    }

    /// Convert `other` into an operation of `op_type`.
    ///
    /// Shared settings and elements are copied. Raster settings carry over
    /// only between raster operations.
    pub fn from_operation(op_type: OperationType, other: &LaserOperation) -> Self {
        let kind = match (&other.kind, op_type) {
            (OperationKind::Raster(raster), OperationType::Raster) => {
                OperationKind::Raster(raster.clone())
            }
            _ => OperationKind::new(op_type),
        };
        Self {
            kind,
            settings: other.settings.clone(),
            elements: other.elements.clone(),
            status: STATUS_QUEUED.to_string(),
        }
    }

    pub fn op_type(&self) -> OperationType {
        self.kind.op_type()
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn settings(&self) -> &LaserSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut LaserSettings {
        &mut self.settings
    }

    pub fn raster_settings(&self) -> Option<&RasterSettings> {
        match &self.kind {
            OperationKind::Raster(raster) => Some(raster),
            _ => None,
        }
    }

    pub fn raster_settings_mut(&mut self) -> Option<&mut RasterSettings> {
        match &mut self.kind {
            OperationKind::Raster(raster) => Some(raster),
            _ => None,
        }
    }

    pub fn speed(&self) -> f64 {
        self.settings.speed
    }

    pub fn power(&self) -> f64 {
        self.settings.power
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Apply every coercible setting in `values`; others keep their value.
    pub fn set_properties(&mut self, values: &Properties) {
        SettingsUpdate::read(values).apply(&mut self.settings, &mut self.kind);
    }

    /// True when `set_properties(values)` would change nothing.
    pub fn has_same_properties(&self, values: &Properties) -> bool {
        SettingsUpdate::read(values).matches(&self.settings, &self.kind)
    }

    /// Command stream for this operation.
    ///
    /// Each call builds a fresh single-pass sequence; raster descriptors are
    /// constructed only as the sequence reaches each image.
    pub fn generate(&self) -> BoxedIterator<'_, LaserCommand> {
        let header = self.header();
        let footer = iter::once(LaserCommand::ModeRapid);
        match &self.kind {
            OperationKind::Cut | OperationKind::Engrave => {
                Box::new(header.into_iter().chain(self.plot_body()).chain(footer))
            }
            OperationKind::Raster(raster) => Box::new(
                header
                    .into_iter()
                    .chain(self.raster_body(raster))
                    .chain(footer),
            ),
        }
    }

    fn header(&self) -> [LaserCommand; 7] {
        let step = self.raster_settings().map_or(0, |r| r.raster_step);
        [
            LaserCommand::ModeRapid,
            LaserCommand::SetAbsolute,
            LaserCommand::SetSpeed(self.settings.speed),
            LaserCommand::SetStep(step),
            LaserCommand::SetPower(self.settings.power),
            LaserCommand::SetDRatio(self.settings.d_ratio()),
            LaserCommand::SetAcceleration(self.settings.effective_acceleration()),
        ]
    }

    fn plot_body(&self) -> impl Iterator<Item = LaserCommand> + '_ {
        let pre_move = iter::once_with(move || {
            let first = self.elements.first()?;
            match first.first_point() {
                Some(p) => Some(LaserCommand::Move(f64::from(p.x), f64::from(p.y))),
                None => {
                    tracing::debug!("No first point on {} element, skipping pre-move", first.kind_name());
                    None
                }
            }
        })
        .flatten();

        let plots = self.elements.iter().filter_map(|element| match element.plot_geometry() {
            Some(path) => Some(LaserCommand::Plot(path)),
            None => {
                tracing::debug!("Skipping {} element without plottable geometry", element.kind_name());
                None
            }
        });

        pre_move
            .chain(iter::once(LaserCommand::ModeProgram))
            .chain(plots)
    }

    fn raster_body<'a>(
        &'a self,
        raster: &'a RasterSettings,
    ) -> impl Iterator<Item = LaserCommand> + 'a {
        let traversal = raster.traversal();
        let scans = self
            .elements
            .iter()
            .filter_map(Element::as_image)
            .flat_map(move |element| {
                let descriptor = ScanDescriptor::new(
                    element.image.clone(),
                    traversal,
                    raster.overscan,
                    element.offset(),
                    raster.raster_step,
                );
                tracing::debug!(
                    "Rastering {}x{} image at {:?}",
                    descriptor.width(),
                    descriptor.height(),
                    descriptor.offset()
                );
                let (x, y) = descriptor.initial_position_in_scene();
                let direction = descriptor.initial_direction();
                [
                    LaserCommand::ModeRapid,
                    LaserCommand::Move(x, y),
                    LaserCommand::SetDirection(direction),
                    LaserCommand::ModeProgram,
                    LaserCommand::Raster(descriptor),
                ]
            });
        iter::once(LaserCommand::SetDirection(traversal.direction())).chain(scans)
    }

    /// Estimated run time in seconds.
    ///
    /// A zero speed makes any non-empty operation take forever.
    pub fn time_estimate_seconds(&self) -> f64 {
        let rate = MILS_PER_MM * self.settings.speed;
        match &self.kind {
            OperationKind::Cut | OperationKind::Engrave => {
                if self.elements.is_empty() {
                    return 0.0;
                }
                if rate == 0.0 {
                    return f64::INFINITY;
                }
                self.elements
                    .iter()
                    .map(|element| element.length().unwrap_or(0.0) / rate)
                    .sum()
            }
            OperationKind::Raster(raster) => {
                let images: Vec<_> = self.elements.iter().filter_map(Element::as_image).collect();
                if images.is_empty() {
                    return 0.0;
                }
                if rate == 0.0 {
                    return f64::INFINITY;
                }
                images
                    .iter()
                    .map(|element| {
                        let step = element
                            .values
                            .lenient_int("raster_step")
                            .filter(|&s| s >= 1)
                            .unwrap_or(i64::from(raster.raster_step));
                        let area = f64::from(element.image.width()) * f64::from(element.image.height());
                        area * step as f64 / rate
                    })
                    .sum()
            }
        }
    }

    /// Estimated run time as `H:MM:SS`.
    pub fn time_estimate(&self) -> String {
        format_duration(self.time_estimate_seconds())
    }
}

impl fmt::Display for LaserOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperationKind::Raster(raster) => write!(
                f,
                "Raster: (speed={}, step={}, direction={}, overscan={})",
                self.settings.speed, raster.raster_step, raster.raster_direction, raster.overscan
            ),
            kind => write!(
                f,
                "{}: (speed={:.6}, power={:.6})",
                kind.op_type(),
                self.settings.speed,
                self.settings.power
            ),
        }
    }
}

impl<'a> IntoIterator for &'a LaserOperation {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Extend<Element> for LaserOperation {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_type() {
        let cut = LaserOperation::cut();
        assert_eq!(cut.speed(), 10.0);
        assert_eq!(cut.power(), 1000.0);
        assert_eq!(cut.status(), "Queued");
        assert_eq!(LaserOperation::engrave().speed(), 35.0);

        let raster = LaserOperation::raster();
        assert_eq!(raster.speed(), 150.0);
        assert_eq!(raster.raster_settings(), Some(&RasterSettings::default()));
    }

    #[test]
    fn test_custom_flag_gates_dratio() {
        let mut op = LaserOperation::cut();
        op.settings_mut().dratio = Some(0.5);
        assert_eq!(op.settings().d_ratio(), None);
        op.settings_mut().dratio_custom = true;
        assert_eq!(op.settings().d_ratio(), Some(0.5));
    }

    #[test]
    fn test_bad_values_keep_previous() {
        let mut op = LaserOperation::raster();
        op.set_properties(
            &Properties::new()
                .with("speed", "fast")
                .with("raster_step", 0)
                .with("raster_direction", 7)
                .with("power", 250),
        );
        assert_eq!(op.speed(), 150.0);
        assert_eq!(op.power(), 250.0);
        let raster = op.raster_settings().unwrap();
        assert_eq!(raster.raster_step, 1);
        assert_eq!(raster.raster_direction, RasterDirection::TopToBottom);
    }

    #[test]
    fn test_unreadable_overscan_falls_back_to_default() {
        let mut op = LaserOperation::raster();
        op.set_properties(&Properties::new().with("overscan", 5));
        assert_eq!(op.raster_settings().unwrap().overscan, 5);
        op.set_properties(&Properties::new().with("overscan", "wide"));
        assert_eq!(op.raster_settings().unwrap().overscan, DEFAULT_OVERSCAN);
        assert!(op.has_same_properties(&Properties::new().with("overscan", "wide")));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LaserOperation::cut().to_string(),
            "Cut: (speed=10.000000, power=1000.000000)"
        );
        assert_eq!(
            LaserOperation::engrave().to_string(),
            "Engrave: (speed=35.000000, power=1000.000000)"
        );
        assert_eq!(
            LaserOperation::raster().to_string(),
            "Raster: (speed=150, step=1, direction=0, overscan=20)"
        );
    }

    #[test]
    fn test_operation_type_from_str() {
        assert_eq!("Raster".parse::<OperationType>(), Ok(OperationType::Raster));
        assert!("weld".parse::<OperationType>().is_err());
    }
}
