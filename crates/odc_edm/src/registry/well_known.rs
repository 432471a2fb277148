use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

use super::PrimitiveDescriptor;
use crate::PrimitiveKind as K;
use crate::convert::{
    BinaryConverter, BooleanConverter, CharConverter, DateConverter, DateTimeOffsetConverter,
    DecimalConverter, DurationConverter, FloatConverter, GuidConverter, IntegerConverter,
    PrimitiveConverter, SpatialConverter, StreamConverter, StringConverter, TimeOfDayConverter,
};
use crate::native::{Native, geography, geometry};
use crate::value::{Decimal, StreamLink};

fn canonical<T: Native>(kind: K, converter: impl PrimitiveConverter) -> PrimitiveDescriptor {
    PrimitiveDescriptor::new(T::native_type(), kind, converter).canonical()
}

fn alias<T: Native>(kind: K, converter: impl PrimitiveConverter) -> PrimitiveDescriptor {
    PrimitiveDescriptor::new(T::native_type(), kind, converter)
}

fn spatial<T: Native>(kind: K, out: &mut Vec<PrimitiveDescriptor>) {
    if let Some(converter) = SpatialConverter::new(kind) {
        out.push(canonical::<T>(kind, converter));
    }
}

/// Descriptors for every native type the library knows out of the box.
pub(super) fn descriptors() -> Vec<PrimitiveDescriptor> {
    let mut out = Vec::with_capacity(48);

    out.push(canonical::<bool>(K::Boolean, BooleanConverter));
    out.push(canonical::<u8>(K::Byte, IntegerConverter::<u8>::new()));
    out.push(canonical::<i8>(K::SByte, IntegerConverter::<i8>::new()));
    out.push(canonical::<i16>(K::Int16, IntegerConverter::<i16>::new()));
    out.push(canonical::<i32>(K::Int32, IntegerConverter::<i32>::new()));
    out.push(canonical::<i64>(K::Int64, IntegerConverter::<i64>::new()));
    out.push(canonical::<f32>(K::Single, FloatConverter::SINGLE));
    out.push(canonical::<f64>(K::Double, FloatConverter::DOUBLE));
    out.push(canonical::<Decimal>(K::Decimal, DecimalConverter));
    out.push(canonical::<Uuid>(K::Guid, GuidConverter));

    out.push(canonical::<DateTime<FixedOffset>>(K::DateTimeOffset, DateTimeOffsetConverter::FIXED));
    out.push(alias::<DateTime<Utc>>(K::DateTimeOffset, DateTimeOffsetConverter::UTC));
    out.push(canonical::<NaiveDate>(K::Date, DateConverter));
    out.push(canonical::<NaiveTime>(K::TimeOfDay, TimeOfDayConverter));
    out.push(canonical::<TimeDelta>(K::Duration, DurationConverter));

    out.push(canonical::<String>(K::String, StringConverter));
    out.push(alias::<char>(K::String, CharConverter));
    out.push(alias::<Vec<char>>(K::String, StringConverter));
    out.push(alias::<Box<str>>(K::String, StringConverter));

    out.push(canonical::<Vec<u8>>(K::Binary, BinaryConverter));
    out.push(alias::<Box<[u8]>>(K::Binary, BinaryConverter));
    out.push(canonical::<StreamLink>(K::Stream, StreamConverter));

    spatial::<geography::Geography>(K::Geography, &mut out);
    spatial::<geography::Point>(K::GeographyPoint, &mut out);
    spatial::<geography::LineString>(K::GeographyLineString, &mut out);
    spatial::<geography::Polygon>(K::GeographyPolygon, &mut out);
    spatial::<geography::MultiPoint>(K::GeographyMultiPoint, &mut out);
    spatial::<geography::MultiLineString>(K::GeographyMultiLineString, &mut out);
    spatial::<geography::MultiPolygon>(K::GeographyMultiPolygon, &mut out);
    spatial::<geography::Collection>(K::GeographyCollection, &mut out);
    spatial::<geometry::Geometry>(K::Geometry, &mut out);
    spatial::<geometry::Point>(K::GeometryPoint, &mut out);
    spatial::<geometry::LineString>(K::GeometryLineString, &mut out);
    spatial::<geometry::Polygon>(K::GeometryPolygon, &mut out);
    spatial::<geometry::MultiPoint>(K::GeometryMultiPoint, &mut out);
    spatial::<geometry::MultiLineString>(K::GeometryMultiLineString, &mut out);
    spatial::<geometry::MultiPolygon>(K::GeometryMultiPolygon, &mut out);
    spatial::<geometry::Collection>(K::GeometryCollection, &mut out);

    // No reverse mapping: `canonical` would be ignored anyway.
    out.push(alias::<u16>(K::UInt16, IntegerConverter::<u16>::new()));
    out.push(alias::<u32>(K::UInt32, IntegerConverter::<u32>::new()));
    out.push(alias::<u64>(K::UInt64, IntegerConverter::<u64>::new()));

    out
}
