mod client;

use crate::errors::{Error, ErrorKind, ErrorOrigin, Result};
use bytemuck::{Pod, Zeroable};
use ndarray::{Array2, Array3, Axis};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use serde_ndim::de::MakeNDim;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::num::NonZeroU32;

/// Rank of an image array.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr, TryFromPrimitive,
)]
#[repr(i32)]
pub enum ImageArrayRank {
    /// Single plane.
    Rank2 = 2,
    /// Multiple planes, e.g. colour.
    Rank3 = 3,
}

/// Element type of the image as reported by the camera.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum ImageElementType {
    /// 16-bit signed integer, widened to 32 bits on decode.
    Int16 = 1,
    /// 32-bit signed integer.
    Int32 = 2,
    /// 64-bit floating point.
    Double = 3,
}

/// Element type of an ImageBytes payload on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub(crate) enum TransmissionElementType {
    Int16 = 1,
    Int32 = 2,
    Double = 3,
    Single = 4,
    Byte = 6,
    UInt16 = 8,
}

/// Pixels of an image, always in three dimensions `[x, y, plane]`.
#[derive(Debug, PartialEq, Clone)]
pub enum ImagePixels {
    /// Integer pixels.
    Integer(Array3<i32>),
    /// Floating-point pixels.
    Double(Array3<f64>),
}

/// Image downloaded from a camera.
///
/// Single-plane images are stored with a plane axis of length 1. The rank is
/// kept as the camera declared it, so a rank 3 image with one plane stays
/// rank 3.
#[derive(Debug, PartialEq, Clone)]
pub struct ImageArray {
    rank: ImageArrayRank,
    pixels: ImagePixels,
}

const PLANE_AXIS: Axis = Axis(2);

impl ImageArray {
    pub(crate) const fn from_parts(rank: ImageArrayRank, pixels: ImagePixels) -> Self {
        Self { rank, pixels }
    }

    /// Shape as `[x, y, planes]`.
    pub fn shape(&self) -> [usize; 3] {
        let shape = match &self.pixels {
            ImagePixels::Integer(data) => data.shape(),
            ImagePixels::Double(data) => data.shape(),
        };
        [shape[0], shape[1], shape[2]]
    }

    /// Rank the camera reported for this image.
    pub const fn rank(&self) -> ImageArrayRank {
        self.rank
    }

    /// Element type of the pixels.
    ///
    /// 16-bit images are widened on decode and report [`ImageElementType::Int32`].
    pub const fn element_type(&self) -> ImageElementType {
        match self.pixels {
            ImagePixels::Integer(_) => ImageElementType::Int32,
            ImagePixels::Double(_) => ImageElementType::Double,
        }
    }

    /// Pixel data.
    pub const fn pixels(&self) -> &ImagePixels {
        &self.pixels
    }

    /// Take the pixel data.
    pub fn into_pixels(self) -> ImagePixels {
        self.pixels
    }

    /// Decode the nested array returned by a local driver.
    ///
    /// Rank follows the nesting depth, the element type is `Int32` unless some
    /// element is not an integer.
    pub(crate) fn from_nested(value: Value) -> Result<Self> {
        let rank = match nesting_depth(&value) {
            2 => ImageArrayRank::Rank2,
            3 => ImageArrayRank::Rank3,
            depth => {
                return Err(Error::new(
                    ErrorKind::DriverFailure,
                    ErrorOrigin::Driver,
                    format_args!("image array must be nested 2 or 3 levels deep, got {depth}"),
                ));
            }
        };
        let element_type = if all_integers(&value) {
            ImageElementType::Int32
        } else {
            ImageElementType::Double
        };

        Self::from_value_parts(element_type, rank, value).map_err(|err| {
            Error::new(
                ErrorKind::DriverFailure,
                ErrorOrigin::Driver,
                format_args!("driver returned a malformed image array: {err}"),
            )
        })
    }

    fn from_value_parts(
        element_type: ImageElementType,
        rank: ImageArrayRank,
        value: Value,
    ) -> serde_json::Result<Self> {
        let pixels = match element_type {
            ImageElementType::Int16 | ImageElementType::Int32 => {
                ImagePixels::Integer(nested::<i32>(rank, value)?)
            }
            ImageElementType::Double => ImagePixels::Double(nested::<f64>(rank, value)?),
        };
        Ok(Self::from_parts(rank, pixels))
    }
}

impl From<Array3<i32>> for ImageArray {
    fn from(data: Array3<i32>) -> Self {
        Self::from_parts(ImageArrayRank::Rank3, ImagePixels::Integer(data))
    }
}

impl From<Array2<i32>> for ImageArray {
    fn from(data: Array2<i32>) -> Self {
        Self::from_parts(
            ImageArrayRank::Rank2,
            ImagePixels::Integer(data.insert_axis(PLANE_AXIS)),
        )
    }
}

impl From<Array3<f64>> for ImageArray {
    fn from(data: Array3<f64>) -> Self {
        Self::from_parts(ImageArrayRank::Rank3, ImagePixels::Double(data))
    }
}

impl From<Array2<f64>> for ImageArray {
    fn from(data: Array2<f64>) -> Self {
        Self::from_parts(
            ImageArrayRank::Rank2,
            ImagePixels::Double(data.insert_axis(PLANE_AXIS)),
        )
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct NDim<A: MakeNDim<Item: DeserializeOwned>>(#[serde(with = "serde_ndim")] A);

fn nested<T: DeserializeOwned + Clone>(rank: ImageArrayRank, value: Value) -> serde_json::Result<Array3<T>> {
    Ok(match rank {
        ImageArrayRank::Rank2 => NDim::<Array2<T>>::deserialize(value)?.0.insert_axis(PLANE_AXIS),
        ImageArrayRank::Rank3 => NDim::<Array3<T>>::deserialize(value)?.0,
    })
}

fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map_or(0, nesting_depth),
        _ => 0,
    }
}

fn all_integers(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(all_integers),
        Value::Number(number) => number
            .as_i64()
            .is_some_and(|number| i32::try_from(number).is_ok()),
        _ => false,
    }
}

#[cfg(not(target_endian = "little"))]
compile_error!("ImageBytes decoding assumes a little-endian target.");

/// Fixed 44-byte header of an `application/imagebytes` response.
#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable, Pod)]
pub(crate) struct ImageBytesMetadata {
    pub(crate) metadata_version: i32,
    pub(crate) error_number: i32,
    pub(crate) client_transaction_id: Option<NonZeroU32>,
    pub(crate) server_transaction_id: Option<NonZeroU32>,
    pub(crate) data_start: i32,
    pub(crate) image_element_type: i32,
    pub(crate) transmission_element_type: i32,
    pub(crate) rank: i32,
    pub(crate) dimension_1: i32,
    pub(crate) dimension_2: i32,
    pub(crate) dimension_3: i32,
}

pub(crate) const IMAGE_BYTES_TYPE: &str = "application/imagebytes";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_rank_and_type_are_inferred() -> eyre::Result<()> {
        let image = ImageArray::from_nested(json!([[1, 2, 3], [4, 5, 6]]))?;
        assert_eq!(image.rank(), ImageArrayRank::Rank2);
        assert_eq!(image.element_type(), ImageElementType::Int32);
        assert_eq!(image.shape(), [2, 3, 1]);

        let image = ImageArray::from_nested(json!([[[0.5, 1.0]], [[2.0, 3.25]]]))?;
        assert_eq!(image.rank(), ImageArrayRank::Rank3);
        assert_eq!(image.element_type(), ImageElementType::Double);
        assert_eq!(image.shape(), [2, 1, 2]);
        Ok(())
    }

    #[test]
    fn local_flat_array_is_rejected() {
        let err = ImageArray::from_nested(json!([1, 2, 3])).expect_err("rank 1");
        assert_eq!(err.kind(), ErrorKind::DriverFailure);
        assert_eq!(err.origin(), ErrorOrigin::Driver);
    }

    #[test]
    fn ragged_array_is_rejected() {
        assert!(ImageArray::from_nested(json!([[1, 2], [3]])).is_err());
    }

    #[test]
    fn single_plane_rank_3_keeps_its_rank() -> eyre::Result<()> {
        let image = ImageArray::from_nested(json!([[[1], [2]], [[3], [4]]]))?;
        assert_eq!(image.rank(), ImageArrayRank::Rank3);
        assert_eq!(image.shape(), [2, 2, 1]);
        assert_ne!(image, Array2::from_shape_vec((2, 2), vec![1, 2, 3, 4])?.into());
        Ok(())
    }

    #[test]
    fn metadata_is_44_bytes() {
        assert_eq!(size_of::<ImageBytesMetadata>(), 44);
    }
}
