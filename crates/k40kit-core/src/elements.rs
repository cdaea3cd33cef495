//! Graphic elements produced by loaders and consumed by operations.
//!
//! Each element carries its placement transform and the loader's
//! loosely-typed attribute map.

use crate::geometry::{self, Path, Point, Transform};
use crate::properties::Properties;
use crate::raster::RasterImage;
use std::sync::Arc;

/// A vector outline.
#[derive(Debug, Clone)]
pub struct PathElement {
    pub path: Path,
    pub transform: Transform,
    pub values: Properties,
}

impl PathElement {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            transform: Transform::identity(),
            values: Properties::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_values(mut self, values: Properties) -> Self {
        self.values = values;
        self
    }

    /// Outline with the placement transform applied.
    pub fn absolute(&self) -> Path {
        self.path.clone().transformed(&self.transform)
    }

    pub fn first_point(&self) -> Option<Point> {
        geometry::first_point(&self.path).map(|p| self.transform.transform_point(p))
    }

    /// Plotted length of the placed outline.
    pub fn length(&self) -> Option<f64> {
        geometry::path_length(&self.absolute())
    }
}

/// A placed raster image.
#[derive(Debug, Clone)]
pub struct ImageElement {
    pub image: Arc<RasterImage>,
    pub transform: Transform,
    pub values: Properties,
}

impl ImageElement {
    pub fn new(image: RasterImage) -> Self {
        Self {
            image: Arc::new(image),
            transform: Transform::identity(),
            values: Properties::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_values(mut self, values: Properties) -> Self {
        self.values = values;
        self
    }

    /// Translation of the placement transform.
    pub fn offset(&self) -> (f64, f64) {
        geometry::translation(&self.transform)
    }
}

/// A text node. It has no plottable geometry until converted to paths.
#[derive(Debug, Clone)]
pub struct TextElement {
    pub text: String,
    pub transform: Transform,
    pub values: Properties,
}

impl TextElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            transform: Transform::identity(),
            values: Properties::new(),
        }
    }
}

/// Any graphic element an operation can hold.
#[derive(Debug, Clone)]
pub enum Element {
    Path(PathElement),
    Image(ImageElement),
    Text(TextElement),
}

impl Element {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Image(_) => "image",
            Self::Text(_) => "text",
        }
    }

    pub fn values(&self) -> &Properties {
        match self {
            Self::Path(e) => &e.values,
            Self::Image(e) => &e.values,
            Self::Text(e) => &e.values,
        }
    }

    pub fn values_mut(&mut self) -> &mut Properties {
        match self {
            Self::Path(e) => &mut e.values,
            Self::Image(e) => &mut e.values,
            Self::Text(e) => &mut e.values,
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            Self::Path(e) => &e.transform,
            Self::Image(e) => &e.transform,
            Self::Text(e) => &e.transform,
        }
    }

    /// Placed outline, for elements that can be plotted.
    pub fn plot_geometry(&self) -> Option<Path> {
        match self {
            Self::Path(e) => Some(e.absolute()),
            Self::Image(_) | Self::Text(_) => None,
        }
    }

    pub fn first_point(&self) -> Option<Point> {
        match self {
            Self::Path(e) => e.first_point(),
            Self::Image(_) | Self::Text(_) => None,
        }
    }

    pub fn length(&self) -> Option<f64> {
        match self {
            Self::Path(e) => e.length(),
            Self::Image(_) | Self::Text(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PathElement> for Element {
    fn from(e: PathElement) -> Self {
        Self::Path(e)
    }
}

impl From<ImageElement> for Element {
    fn from(e: ImageElement) -> Self {
        Self::Image(e)
    }
}

impl From<TextElement> for Element {
    fn from(e: TextElement) -> Self {
        Self::Text(e)
    }
}
