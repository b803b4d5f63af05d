//! Parsing of raw numeric form fields.

use aerialware_core::{CameraInputs, Corners, Delimiter};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Input parsing errors. These never change session state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("field `{field}` is not a number: {value:?}")]
    NonNumeric { field: &'static str, value: String },
}

fn number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim().parse::<f64>().map_err(|_| InputError::NonNumeric {
        field,
        value: raw.to_owned(),
    })
}

/// Text of the corner and delimiter fields as typed by the user.
///
/// `x_*` fields are longitudes, `y_*` fields latitudes, in degrees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerFields {
    pub x_top_left: String,
    pub y_top_left: String,
    pub x_top_right: String,
    pub y_top_right: String,
    pub x_bottom_left: String,
    pub y_bottom_left: String,
    pub x_bottom_right: String,
    pub y_bottom_right: String,
    pub x_delimiter: String,
    pub y_delimiter: String,
}

impl CornerFields {
    /// Parse every field. The first non-numeric field is reported.
    ///
    /// Range checks (delimiter > 0, distinct corners) happen later, when the
    /// values are validated against the image.
    pub fn parse(&self) -> Result<(Corners, Delimiter), InputError> {
        let corners = Corners {
            top_left: Point2::new(
                number("x_top_left", &self.x_top_left)?,
                number("y_top_left", &self.y_top_left)?,
            ),
            top_right: Point2::new(
                number("x_top_right", &self.x_top_right)?,
                number("y_top_right", &self.y_top_right)?,
            ),
            bottom_left: Point2::new(
                number("x_bottom_left", &self.x_bottom_left)?,
                number("y_bottom_left", &self.y_bottom_left)?,
            ),
            bottom_right: Point2::new(
                number("x_bottom_right", &self.x_bottom_right)?,
                number("y_bottom_right", &self.y_bottom_right)?,
            ),
        };
        let delimiter = Delimiter::new(
            number("x_delimiter", &self.x_delimiter)?,
            number("y_delimiter", &self.y_delimiter)?,
        );
        Ok((corners, delimiter))
    }
}

/// Text of the camera fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFields {
    pub ground_resolution: String,
    pub flight_height: String,
}

impl CameraFields {
    pub fn parse(&self) -> Result<CameraInputs, InputError> {
        Ok(CameraInputs {
            ground_resolution_m_per_px: number("ground_resolution", &self.ground_resolution)?,
            flight_height_m: number("flight_height", &self.flight_height)?,
        })
    }
}
