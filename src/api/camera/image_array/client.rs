use super::{
    IMAGE_BYTES_TYPE, ImageArray, ImageArrayRank, ImageBytesMetadata, ImageElementType,
    ImagePixels, NDim, TransmissionElementType as Transmission,
};
use crate::client::{
    HttpRequest, Response, ResponseTransaction, ResponseWithTransaction, ensure_json,
    envelope_error,
};
use crate::errors::{self, ErrorOrigin, translate};
use crate::session::{ImageTransferMode, SessionOptions};
use bytemuck::Pod;
use mime::Mime;
use ndarray::{Array2, Array3};
use serde::Deserialize;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde_json::Value;
use std::fmt::{self, Formatter};
use std::num::NonZeroU32;

const IMAGE_BYTES_OR_JSON: &str = "application/imagebytes, application/json";

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(field_identifier)]
enum KnownKey {
    Type,
    Rank,
    Value,
    #[serde(other)]
    Other,
}

struct JsonImageVisitor;

impl<'de> Visitor<'de> for JsonImageVisitor {
    type Value = ImageArray;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("an image array response")
    }

    // `Type` and `Rank` must precede `Value` so that the pixels can be
    // decoded straight into the right array type.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut element_type = None;
        let mut rank = None;

        let image: ImageArray = loop {
            match map.next_key::<KnownKey>()? {
                Some(KnownKey::Type) => element_type = Some(map.next_value::<ImageElementType>()?),
                Some(KnownKey::Rank) => rank = Some(map.next_value::<ImageArrayRank>()?),
                Some(KnownKey::Value) => {
                    let (Some(element_type), Some(rank)) = (element_type, rank) else {
                        return Err(serde::de::Error::custom(
                            "image Value arrived before its Type and Rank",
                        ));
                    };
                    break match (element_type, rank) {
                        (
                            ImageElementType::Int16 | ImageElementType::Int32,
                            ImageArrayRank::Rank2,
                        ) => map.next_value::<NDim<Array2<i32>>>()?.0.into(),
                        (
                            ImageElementType::Int16 | ImageElementType::Int32,
                            ImageArrayRank::Rank3,
                        ) => map.next_value::<NDim<Array3<i32>>>()?.0.into(),
                        (ImageElementType::Double, ImageArrayRank::Rank2) => {
                            map.next_value::<NDim<Array2<f64>>>()?.0.into()
                        }
                        (ImageElementType::Double, ImageArrayRank::Rank3) => {
                            map.next_value::<NDim<Array3<f64>>>()?.0.into()
                        }
                    };
                }
                Some(KnownKey::Other) => _ = map.next_value::<IgnoredAny>()?,
                None => return Err(serde::de::Error::missing_field("Value")),
            }
        };

        _ = IgnoredAny.visit_map(map)?;

        Ok(image)
    }
}

struct JsonImageArray(ImageArray);

impl<'de> Deserialize<'de> for JsonImageArray {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(JsonImageVisitor).map(Self)
    }
}

fn collect<T: Pod, U>(
    shape: (usize, usize, usize),
    payload: &[u8],
    convert: impl Fn(T) -> U,
) -> eyre::Result<Array3<U>> {
    let data = bytemuck::pod_collect_to_vec::<u8, T>(payload)
        .into_iter()
        .map(convert)
        .collect();
    Ok(Array3::from_shape_vec(shape, data)?)
}

impl Transmission {
    const fn size(self) -> usize {
        match self {
            Self::Byte => size_of::<u8>(),
            Self::Int16 | Self::UInt16 => size_of::<i16>(),
            Self::Int32 | Self::Single => size_of::<i32>(),
            Self::Double => size_of::<f64>(),
        }
    }
}

fn dimension(value: i32) -> eyre::Result<usize> {
    usize::try_from(value).map_err(|err| eyre::eyre!("negative image dimension {value}: {err}"))
}

fn decode_image_bytes(bytes: &[u8]) -> eyre::Result<ResponseWithTransaction<errors::Result<ImageArray>>> {
    let header_len = size_of::<ImageBytesMetadata>();
    let metadata = bytemuck::pod_read_unaligned::<ImageBytesMetadata>(
        bytes
            .get(..header_len)
            .ok_or_else(|| eyre::eyre!("{} bytes are not enough for image metadata", bytes.len()))?,
    );
    eyre::ensure!(
        metadata.metadata_version == 1_i32,
        "unsupported metadata version {}",
        metadata.metadata_version,
    );
    let data_start = usize::try_from(metadata.data_start)?;
    eyre::ensure!(
        data_start >= header_len,
        "image data starts inside the metadata"
    );
    let payload = bytes
        .get(data_start..)
        .ok_or_else(|| eyre::eyre!("image data start {data_start} is past the end of the body"))?;

    let transaction = ResponseTransaction {
        client_transaction_id: metadata.client_transaction_id.map(NonZeroU32::get),
        server_transaction_id: metadata.server_transaction_id.map(NonZeroU32::get),
    };

    if metadata.error_number != 0_i32 {
        return Ok(ResponseWithTransaction {
            transaction,
            response: Err(translate(
                metadata.error_number,
                String::from_utf8_lossy(payload).into_owned(),
                ErrorOrigin::Device,
            )),
        });
    }

    let element_type = ImageElementType::try_from(metadata.image_element_type)?;
    let transmission_type = Transmission::try_from(metadata.transmission_element_type)?;
    let rank = ImageArrayRank::try_from(metadata.rank)?;
    let planes = match rank {
        ImageArrayRank::Rank2 => {
            eyre::ensure!(
                metadata.dimension_3 == 0_i32,
                "rank 2 image declares a third dimension of {}",
                metadata.dimension_3,
            );
            1
        }
        ImageArrayRank::Rank3 => dimension(metadata.dimension_3)?,
    };
    let shape = (
        dimension(metadata.dimension_1)?,
        dimension(metadata.dimension_2)?,
        planes,
    );

    let expected_len = shape
        .0
        .checked_mul(shape.1)
        .and_then(|len| len.checked_mul(shape.2))
        .and_then(|len| len.checked_mul(transmission_type.size()))
        .ok_or_else(|| eyre::eyre!("image dimensions {shape:?} overflow"))?;
    eyre::ensure!(
        payload.len() == expected_len,
        "image payload has {} bytes, header declares {shape:?} of {transmission_type:?} ({expected_len} bytes)",
        payload.len(),
    );

    let pixels = match element_type {
        ImageElementType::Int16 | ImageElementType::Int32 => ImagePixels::Integer(match transmission_type {
            Transmission::Byte => collect(shape, payload, <i32 as From<u8>>::from)?,
            Transmission::Int16 => collect(shape, payload, <i32 as From<i16>>::from)?,
            Transmission::UInt16 => collect(shape, payload, <i32 as From<u16>>::from)?,
            Transmission::Int32 => collect(shape, payload, |value: i32| value)?,
            Transmission::Single | Transmission::Double => {
                eyre::bail!("integer image cannot be transmitted as {transmission_type:?}")
            }
        }),
        ImageElementType::Double => ImagePixels::Double(match transmission_type {
            Transmission::Byte => collect(shape, payload, <f64 as From<u8>>::from)?,
            Transmission::Int16 => collect(shape, payload, <f64 as From<i16>>::from)?,
            Transmission::UInt16 => collect(shape, payload, <f64 as From<u16>>::from)?,
            Transmission::Int32 => collect(shape, payload, <f64 as From<i32>>::from)?,
            Transmission::Single => collect(shape, payload, <f64 as From<f32>>::from)?,
            Transmission::Double => collect(shape, payload, |value: f64| value)?,
        }),
    };

    Ok(ResponseWithTransaction {
        transaction,
        response: Ok(ImageArray::from_parts(rank, pixels)),
    })
}

impl Response for errors::Result<ImageArray> {
    fn prepare_request(request: &mut HttpRequest, options: &SessionOptions) {
        if options.image_transfer == ImageTransferMode::ImageBytes {
            request.accept = IMAGE_BYTES_OR_JSON;
        }
        // Set even for `None`, otherwise the HTTP client picks its own encodings.
        request.accept_encoding = Some(options.image_compression.accept_encoding());
    }

    fn from_http(mime_type: &Mime, bytes: &[u8]) -> eyre::Result<ResponseWithTransaction<Self>> {
        if mime_type.essence_str() == IMAGE_BYTES_TYPE {
            return decode_image_bytes(bytes);
        }

        ensure_json(mime_type)?;
        let transaction = serde_json::from_slice::<ResponseTransaction>(bytes)?;
        let response = match envelope_error(bytes)? {
            Ok(()) => Ok(serde_json::from_slice::<JsonImageArray>(bytes)?.0),
            Err(err) => Err(err),
        };

        Ok(ResponseWithTransaction {
            transaction,
            response,
        })
    }

    fn from_driver(value: Value) -> Self {
        ImageArray::from_nested(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Camera, DeviceClient, DeviceType};
    use crate::client::HttpResponse;
    use crate::errors::ErrorKind;
    use crate::session::{ImageArrayCompression, TimeoutTier};
    use crate::test::{MockDriver, MockTransport};
    use crate::{Client, ServerAddress};
    use serde_json::json;
    use std::sync::Arc;

    fn camera(options: SessionOptions) -> eyre::Result<(Arc<MockTransport>, Camera)> {
        let transport = Arc::new(MockTransport::default());
        let device = Client::with_transport(
            ServerAddress::new("127.0.0.1", 11111),
            Arc::<MockTransport>::clone(&transport),
            options,
        )
        .device(DeviceType::Camera, 0);
        Ok((transport, Camera::try_from(device)?))
    }

    fn image_bytes_options() -> SessionOptions {
        SessionOptions {
            image_transfer: ImageTransferMode::ImageBytes,
            ..Default::default()
        }
    }

    fn metadata_2x3(transmission: Transmission) -> ImageBytesMetadata {
        ImageBytesMetadata {
            metadata_version: 1,
            error_number: 0,
            client_transaction_id: NonZeroU32::new(1),
            server_transaction_id: NonZeroU32::new(7),
            data_start: 44,
            image_element_type: ImageElementType::Int32.into(),
            transmission_element_type: transmission.into(),
            rank: 2,
            dimension_1: 2,
            dimension_2: 3,
            dimension_3: 0,
        }
    }

    fn image_bytes(metadata: ImageBytesMetadata, payload: &[u8]) -> HttpResponse {
        let mut body = bytemuck::bytes_of(&metadata).to_vec();
        body.extend_from_slice(payload);

        HttpResponse {
            status: 200,
            content_type: Some(IMAGE_BYTES_TYPE.to_owned()),
            content_encoding: None,
            body: body.into(),
        }
    }

    fn expected_2x3() -> eyre::Result<ImageArray> {
        Ok(Array2::from_shape_vec((2, 3), vec![1, 2, 3, 4, 5, 6])?.into())
    }

    #[tokio::test]
    async fn int32_image_bytes_decode_exactly() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        let pixels: [i32; 6] = [1, 2, 3, 4, 5, 6];
        let payload = bytemuck::cast_slice::<i32, u8>(&pixels);
        assert_eq!(payload.len(), 24);
        transport.respond(image_bytes(metadata_2x3(Transmission::Int32), payload));

        let image = camera.image_array().await?;
        assert_eq!(image, expected_2x3()?);
        assert_eq!(image.rank(), ImageArrayRank::Rank2);

        let request = &transport.requests()[0];
        assert_eq!(request.accept, IMAGE_BYTES_OR_JSON);
        assert_eq!(request.tier, TimeoutTier::Long);
        assert_eq!(request.accept_encoding, Some("identity"));

        Ok(())
    }

    #[tokio::test]
    async fn short_payload_is_a_decode_error() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        let pixels: [i32; 6] = [1, 2, 3, 4, 5, 6];
        let payload = bytemuck::cast_slice::<i32, u8>(&pixels);
        transport.respond(image_bytes(
            metadata_2x3(Transmission::Int32),
            &payload[..23],
        ));

        let err = camera.image_array().await.expect_err("one byte short");
        assert_eq!(err.origin(), ErrorOrigin::Transport);
        assert_eq!(err.kind(), ErrorKind::DriverFailure);

        Ok(())
    }

    #[tokio::test]
    async fn long_payload_is_a_decode_error() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        let mut payload = bytemuck::cast_slice::<i32, u8>(&[1, 2, 3, 4, 5, 6]).to_vec();
        payload.push(0);
        assert_eq!(payload.len(), 25);
        transport.respond(image_bytes(metadata_2x3(Transmission::Int32), &payload));

        let err = camera.image_array().await.expect_err("one byte too many");
        assert_eq!(err.origin(), ErrorOrigin::Transport);
        assert_eq!(err.kind(), ErrorKind::DriverFailure);

        Ok(())
    }

    #[tokio::test]
    async fn int16_source_images_are_widened() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        let pixels: [i16; 6] = [1, 2, 3, 4, 5, 6];
        transport.respond(image_bytes(
            ImageBytesMetadata {
                image_element_type: ImageElementType::Int16.into(),
                ..metadata_2x3(Transmission::Int16)
            },
            bytemuck::cast_slice::<i16, u8>(&pixels),
        ));
        let image = camera.image_array().await?;
        assert_eq!(image, expected_2x3()?);
        assert_eq!(image.element_type(), ImageElementType::Int32);

        transport.respond_json(json!({
            "Type": 1,
            "Rank": 2,
            "Value": [[1, 2, 3], [4, 5, 6]],
            "ErrorNumber": 0,
            "ErrorMessage": "",
        }));
        assert_eq!(camera.image_array().await?, expected_2x3()?);

        Ok(())
    }

    #[tokio::test]
    async fn declared_rank_survives_a_single_plane() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        let pixels: [i32; 6] = [1, 2, 3, 4, 5, 6];
        transport.respond(image_bytes(
            ImageBytesMetadata {
                rank: 3,
                dimension_3: 1,
                ..metadata_2x3(Transmission::Int32)
            },
            bytemuck::cast_slice::<i32, u8>(&pixels),
        ));

        let image = camera.image_array().await?;
        assert_eq!(image.rank(), ImageArrayRank::Rank3);
        assert_eq!(image.shape(), [2, 3, 1]);
        assert_eq!(
            image.into_pixels(),
            ImagePixels::Integer(Array3::from_shape_vec((2, 3, 1), pixels.to_vec())?)
        );

        Ok(())
    }

    #[tokio::test]
    async fn narrow_transmission_is_widened() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        let pixels: [i16; 6] = [1, 2, 3, 4, 5, 6];
        transport.respond(image_bytes(
            metadata_2x3(Transmission::Int16),
            bytemuck::cast_slice::<i16, u8>(&pixels),
        ));
        assert_eq!(camera.image_array().await?, expected_2x3()?);

        let pixels: [f32; 6] = [1.0; 6];
        transport.respond(image_bytes(
            metadata_2x3(Transmission::Single),
            bytemuck::cast_slice::<f32, u8>(&pixels),
        ));
        assert!(camera.image_array().await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn image_bytes_error_is_a_device_error() -> eyre::Result<()> {
        let (transport, camera) = camera(image_bytes_options())?;

        transport.respond(image_bytes(
            ImageBytesMetadata {
                error_number: 0x40B,
                ..metadata_2x3(Transmission::Int32)
            },
            b"no image taken yet",
        ));

        let err = camera.image_array().await.expect_err("device reported an error");
        assert_eq!(err.origin(), ErrorOrigin::Device);
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(err.message(), "no image taken yet");

        Ok(())
    }

    #[tokio::test]
    async fn json_answer_is_accepted_in_image_bytes_mode() -> eyre::Result<()> {
        let (transport, camera) = camera(SessionOptions {
            image_compression: ImageArrayCompression::GZip,
            ..image_bytes_options()
        })?;

        transport.respond_json(json!({
            "Type": 2,
            "Rank": 2,
            "Value": [[1, 2, 3], [4, 5, 6]],
            "ErrorNumber": 0,
            "ErrorMessage": "",
        }));

        assert_eq!(camera.image_array().await?, expected_2x3()?);
        assert_eq!(transport.requests()[0].accept_encoding, Some("gzip"));

        Ok(())
    }

    #[tokio::test]
    async fn json_mode_asks_for_json_only() -> eyre::Result<()> {
        let (transport, camera) = camera(SessionOptions::default())?;

        transport.respond_json(json!({
            "ErrorNumber": 0,
            "ErrorMessage": "",
            "Type": 3,
            "Rank": 3,
            "Value": [[[0.5, 1.0], [1.5, 2.0]]],
        }));

        let image = camera.image_array().await?;
        assert_eq!(image.shape(), [1, 2, 2]);
        assert_eq!(image.element_type(), ImageElementType::Double);
        assert_eq!(image.rank(), ImageArrayRank::Rank3);
        assert_eq!(transport.requests()[0].accept, "application/json");

        Ok(())
    }

    #[tokio::test]
    async fn local_driver_returns_nested_array() -> eyre::Result<()> {
        let driver = Arc::new(MockDriver::with_version(3).with("ImageArray", json!([[1, 2, 3], [4, 5, 6]])));
        let camera = Camera::try_from(DeviceClient::local(DeviceType::Camera, driver))?;

        assert_eq!(camera.image_array().await?, expected_2x3()?);
        Ok(())
    }
}
