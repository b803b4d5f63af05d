//! User inputs: corner coordinates, grid spacing and image size.

use crate::geom::{segments_cross, Segment};
use crate::grid::GridError;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Geographic coordinates of the four image corners.
///
/// Each point stores longitude in `x` and latitude in `y`, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: Point2<f64>,
    pub top_right: Point2<f64>,
    pub bottom_left: Point2<f64>,
    pub bottom_right: Point2<f64>,
}

/// The four sides of the image quadrilateral in geographic space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoSides {
    /// `top_left -> top_right`
    pub top: Segment,
    /// `bottom_left -> bottom_right`
    pub bottom: Segment,
    /// `top_left -> bottom_left`
    pub left: Segment,
    /// `top_right -> bottom_right`
    pub right: Segment,
}

/// Non-blocking warnings about the corner configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerAdvisory {
    /// Opposite sides cross each other ("figure eight"). The grid is still
    /// built, but coordinates may be geometrically unreliable.
    SelfIntersecting,
}

impl Corners {
    /// Build from `(longitude, latitude)` pairs in TL, TR, BL, BR order.
    pub fn from_lon_lat(tl: [f64; 2], tr: [f64; 2], bl: [f64; 2], br: [f64; 2]) -> Self {
        Self {
            top_left: Point2::new(tl[0], tl[1]),
            top_right: Point2::new(tr[0], tr[1]),
            bottom_left: Point2::new(bl[0], bl[1]),
            bottom_right: Point2::new(br[0], br[1]),
        }
    }

    pub fn sides(&self) -> GeoSides {
        GeoSides {
            top: Segment::new(self.top_left, self.top_right),
            bottom: Segment::new(self.bottom_left, self.bottom_right),
            left: Segment::new(self.top_left, self.bottom_left),
            right: Segment::new(self.top_right, self.bottom_right),
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    pub fn advisories(&self) -> Vec<CornerAdvisory> {
        let s = self.sides();
        let mut out = Vec::new();
        if segments_cross(&s.top, &s.bottom) || segments_cross(&s.left, &s.right) {
            out.push(CornerAdvisory::SelfIntersecting);
        }
        out
    }
}

/// Axis of a delimiter component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterAxis {
    Longitude,
    Latitude,
}

impl std::fmt::Display for DelimiterAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelimiterAxis::Longitude => f.write_str("longitude"),
            DelimiterAxis::Latitude => f.write_str("latitude"),
        }
    }
}

/// Grid spacing in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delimiter {
    pub longitude: f64,
    pub latitude: f64,
}

impl Delimiter {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Both steps must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.longitude.is_finite() || self.longitude <= 0.0 {
            return Err(GridError::InvalidDelimiter {
                axis: DelimiterAxis::Longitude,
            });
        }
        if !self.latitude.is_finite() || self.latitude <= 0.0 {
            return Err(GridError::InvalidDelimiter {
                axis: DelimiterAxis::Latitude,
            });
        }
        Ok(())
    }
}

/// Image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    #[inline]
    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}
