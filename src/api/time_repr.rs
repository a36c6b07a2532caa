use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::time::SystemTime;
use time::format_description::well_known::Iso8601 as WellKnownIso8601;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Textual representation of a timestamp member.
pub(crate) trait TimeFormat {
    fn format(value: OffsetDateTime) -> Result<String, time::error::Format>;

    fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse>;
}

/// ISO 8601 with an explicit offset, e.g. `UTCDate`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Iso8601 {}

impl TimeFormat for Iso8601 {
    fn format(value: OffsetDateTime) -> Result<String, time::error::Format> {
        value.format(&WellKnownIso8601::DEFAULT)
    }

    fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(value, &WellKnownIso8601::DEFAULT)
    }
}

/// FITS `DATE-OBS` form: UTC without an offset, optional fractional seconds.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fits {}

impl TimeFormat for Fits {
    fn format(value: OffsetDateTime) -> Result<String, time::error::Format> {
        value.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
        ))
    }

    fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
        PrimitiveDateTime::parse(
            value,
            format_description!(
                version = 2,
                "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
            ),
        )
        .map(PrimitiveDateTime::assume_utc)
    }
}

pub(crate) struct TimeRepr<F>(SystemTime, PhantomData<F>);

impl<F> Debug for TimeRepr<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<F> From<SystemTime> for TimeRepr<F> {
    fn from(value: SystemTime) -> Self {
        Self(value, PhantomData)
    }
}

impl<F> From<TimeRepr<F>> for SystemTime {
    fn from(wrapper: TimeRepr<F>) -> Self {
        wrapper.0
    }
}

impl<F: TimeFormat> Serialize for TimeRepr<F> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        F::format(OffsetDateTime::from(self.0).to_offset(time::UtcOffset::UTC))
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, F: TimeFormat> Deserialize<'de> for TimeRepr<F> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor<F>(PhantomData<F>);

        impl<F: TimeFormat> serde::de::Visitor<'_> for Visitor<F> {
            type Value = TimeRepr<F>;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a date string")
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
                match F::parse(value) {
                    Ok(value) => Ok(TimeRepr::from(SystemTime::from(value))),
                    Err(err) => Err(serde::de::Error::custom(err)),
                }
            }
        }

        deserializer.deserialize_str(Visitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fits_round_trip() -> eyre::Result<()> {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_250);
        let json = serde_json::to_string(&TimeRepr::<Fits>::from(time))?;
        assert_eq!(json, r#""2023-11-14T22:13:20.250""#);

        let parsed: TimeRepr<Fits> = serde_json::from_str(r#""2023-11-14T22:13:20""#)?;
        assert_eq!(SystemTime::from(parsed), time - Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn iso8601_keeps_offset() -> eyre::Result<()> {
        let parsed: TimeRepr<Iso8601> = serde_json::from_str(r#""2023-11-14T23:13:20+01:00""#)?;
        assert_eq!(
            SystemTime::from(parsed),
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
        Ok(())
    }
}
