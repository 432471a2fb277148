//! Native type to primitive kind resolution.
//!
//! - [`PrimitiveDescriptor`]: one native type, its kind and its converter.
//! - [`TypeRegistry`]: well-known table plus runtime-discovered subtypes.
//! - [`TypeRegistryBuilder`]: builds a registry from custom registrations.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod type_registry;
mod well_known;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::PrimitiveDescriptor;
pub use type_registry::{TypeRegistry, TypeRegistryBuilder};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use chrono::{NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
    use uuid::Uuid;

    use super::{PrimitiveDescriptor, TypeRegistry};
    use crate::convert::{IntegerConverter, NumericParsing, SpatialConverter, StringConverter};
    use crate::native::{Native, NativeType, geography, geometry};
    use crate::value::{Decimal, Shape, SpatialValue, StreamLink};
    use crate::{EdmError, ParserToken, PrimitiveKind, PrimitiveValue, TypeResolutionError};

    struct GeoPointSubtype;
    struct Unrelated;

    fn geo_point_subtype() -> NativeType {
        NativeType::builder::<GeoPointSubtype>()
            .derives_from(geography::Point::native_type())
            .build()
    }

    #[test]
    fn well_known_lookups() {
        let registry = TypeRegistry::new();
        let kind = |ty: NativeType| registry.resolve(&ty).map(|d| d.kind());

        assert_eq!(kind(bool::native_type()), Some(PrimitiveKind::Boolean));
        assert_eq!(kind(char::native_type()), Some(PrimitiveKind::String));
        assert_eq!(kind(<Vec<char>>::native_type()), Some(PrimitiveKind::String));
        assert_eq!(kind(<Box<[u8]>>::native_type()), Some(PrimitiveKind::Binary));
        assert_eq!(kind(<Option<i64>>::native_type()), Some(PrimitiveKind::Int64));
        assert_eq!(kind(u32::native_type()), Some(PrimitiveKind::UInt32));
        assert_eq!(kind(geometry::Collection::native_type()), Some(PrimitiveKind::GeometryCollection));
        // A well-known hit never searches.
        assert_eq!(registry.comparison_count(), 0);
    }

    #[test]
    fn resolves_runtime_subtype_and_caches_it() {
        let registry = TypeRegistry::new();
        let derived = geo_point_subtype();

        let desc = registry.resolve(&derived).unwrap();
        assert_eq!(desc.kind(), PrimitiveKind::GeographyPoint);
        assert_eq!(desc.native(), &geography::Point::native_type());

        let searched = registry.comparison_count();
        assert!(searched > 0);
        let again = registry.resolve(&derived).unwrap();
        assert!(Arc::ptr_eq(&desc, &again));
        assert_eq!(registry.comparison_count(), searched);
    }

    #[test]
    fn negative_results_are_cached() {
        let registry = TypeRegistry::new();
        let unrelated = NativeType::of::<Unrelated>();

        assert!(registry.resolve(&unrelated).is_none());
        let searched = registry.comparison_count();
        assert!(searched > 0);

        assert!(registry.resolve(&unrelated).is_none());
        assert_eq!(registry.comparison_count(), searched);

        registry.reset_discovered_types();
        assert!(registry.resolve(&unrelated).is_none());
        assert_eq!(registry.comparison_count(), searched);
    }

    #[test]
    fn most_derived_ancestor_wins() {
        struct Outer;
        struct Inner;
        struct Candidate;

        let outer = NativeType::derivable::<Outer>();
        let inner = NativeType::builder::<Inner>()
            .sealed(false)
            .derives_from(outer.clone())
            .build();
        let candidate = NativeType::builder::<Candidate>().derives_from(inner.clone()).build();

        // Registration order must not matter.
        for reversed in [false, true] {
            let a = PrimitiveDescriptor::new(inner.clone(), PrimitiveKind::Int32, IntegerConverter::<i32>::new());
            let b = PrimitiveDescriptor::new(outer.clone(), PrimitiveKind::Int64, IntegerConverter::<i64>::new());
            let builder = TypeRegistry::builder();
            let builder = if reversed {
                builder.register(b).register(a)
            } else {
                builder.register(a).register(b)
            };
            let registry = builder.build();
            assert_eq!(registry.resolve(&candidate).unwrap().kind(), PrimitiveKind::Int32);
        }
    }

    #[test]
    fn example_registry() {
        let registry = TypeRegistry::builder()
            .register(
                PrimitiveDescriptor::new(i32::native_type(), PrimitiveKind::Int32, IntegerConverter::<i32>::new())
                    .canonical(),
            )
            .register(
                PrimitiveDescriptor::new(i64::native_type(), PrimitiveKind::Int64, IntegerConverter::<i64>::new())
                    .canonical(),
            )
            .register(PrimitiveDescriptor::new(
                geography::Point::native_type(),
                PrimitiveKind::GeographyPoint,
                SpatialConverter::new(PrimitiveKind::GeographyPoint).unwrap(),
            ))
            .build();

        let desc = registry.resolve(&geo_point_subtype()).unwrap();
        assert_eq!(desc.kind(), PrimitiveKind::GeographyPoint);
        assert!(registry.resolve(&NativeType::of::<Unrelated>()).is_none());
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        struct Email;

        let first = PrimitiveDescriptor::new(NativeType::of::<Email>(), PrimitiveKind::String, StringConverter);
        let second = PrimitiveDescriptor::new(NativeType::of::<Email>(), PrimitiveKind::Int32, IntegerConverter::<i32>::new());
        let registry = TypeRegistry::builder().register(first).register(second).with_well_known().build();
        assert_eq!(registry.resolve(&NativeType::of::<Email>()).unwrap().kind(), PrimitiveKind::String);
    }

    #[test]
    fn reverse_mapping() {
        let registry = TypeRegistry::new();
        let desc = registry.resolve_name("Edm.String").unwrap();
        assert_eq!(desc.native(), &String::native_type());
        let desc = registry.resolve_name("DateTimeOffset").unwrap();
        assert_eq!(desc.native().id(), core::any::TypeId::of::<chrono::DateTime<chrono::FixedOffset>>());

        assert_eq!(
            registry.resolve_name("Edm.UInt64").unwrap_err(),
            TypeResolutionError::UnsupportedReverseMapping("Edm.UInt64")
        );
        assert!(matches!(
            registry.resolve_name("Edm.Nope"),
            Err(TypeResolutionError::UnknownTypeName(_))
        ));

        let desc = registry.resolve_of::<u16>().unwrap();
        assert_eq!(
            desc.protocol_type_name(),
            Err(TypeResolutionError::UnsupportedReverseMapping("Edm.UInt16"))
        );
        let err = registry
            .materialize_as(ParserToken::Textual(String::from("1")), "Edm.UInt16")
            .unwrap_err();
        assert_eq!(
            err,
            EdmError::from(TypeResolutionError::UnsupportedReverseMapping("Edm.UInt16"))
        );
    }

    #[test]
    fn every_kind_round_trips() {
        let registry = TypeRegistry::builder()
            .with_well_known()
            .numeric_parsing(NumericParsing::Strict)
            .build();

        let offset = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let samples: Vec<(NativeType, PrimitiveValue)> = vec![
            (bool::native_type(), PrimitiveValue::Boolean(false)),
            (u8::native_type(), PrimitiveValue::Byte(255)),
            (i8::native_type(), PrimitiveValue::SByte(-128)),
            (i16::native_type(), PrimitiveValue::Int16(-300)),
            (i32::native_type(), PrimitiveValue::Int32(i32::MAX)),
            (i64::native_type(), PrimitiveValue::Int64(i64::MIN)),
            (f32::native_type(), PrimitiveValue::Single(-1.25)),
            (f64::native_type(), PrimitiveValue::Double(6.02214076e23)),
            (Decimal::native_type(), PrimitiveValue::Decimal(Decimal::new(-123_456, 3).unwrap())),
            (String::native_type(), PrimitiveValue::from("a'b&c")),
            (char::native_type(), PrimitiveValue::from('x')),
            (<Vec<u8>>::native_type(), PrimitiveValue::Binary(vec![1, 2, 3])),
            (Uuid::native_type(), PrimitiveValue::Guid(Uuid::from_u128(0x1234))),
            (
                <chrono::DateTime<chrono::FixedOffset>>::native_type(),
                PrimitiveValue::DateTimeOffset(offset.with_ymd_and_hms(2020, 5, 17, 8, 0, 0).unwrap()),
            ),
            (
                <chrono::DateTime<Utc>>::native_type(),
                PrimitiveValue::from(Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap()),
            ),
            (NaiveDate::native_type(), PrimitiveValue::Date(NaiveDate::from_ymd_opt(2000, 2, 29).unwrap())),
            (
                NaiveTime::native_type(),
                PrimitiveValue::TimeOfDay(NaiveTime::from_hms_milli_opt(13, 14, 15, 160).unwrap()),
            ),
            (TimeDelta::native_type(), PrimitiveValue::Duration(TimeDelta::seconds(-3661))),
            (StreamLink::native_type(), PrimitiveValue::Stream(StreamLink::new("Photos(1)/$value"))),
            (
                geography::Polygon::native_type(),
                PrimitiveValue::Spatial(SpatialValue::geography(Shape::Polygon(vec![vec![
                    crate::value::Position::new(0.0, 0.0),
                    crate::value::Position::new(1.0, 0.0),
                    crate::value::Position::new(0.0, 1.0),
                    crate::value::Position::new(0.0, 0.0),
                ]]))),
            ),
            (
                geometry::Geometry::native_type(),
                PrimitiveValue::Spatial(SpatialValue::geometry(Shape::point(3.5, -4.0)).with_srid(3857)),
            ),
            (u16::native_type(), PrimitiveValue::UInt16(u16::MAX)),
            (u32::native_type(), PrimitiveValue::UInt32(7)),
            (u64::native_type(), PrimitiveValue::UInt64(u64::MAX)),
        ];

        for (ty, value) in samples {
            let desc = registry.resolve(&ty).unwrap();
            let text = desc.format(&value).unwrap();
            let back = desc.parse(&text, registry.parsing()).unwrap();
            assert_eq!(back, value, "{ty:?} via `{text}`");
        }
    }

    #[test]
    fn concurrent_resolution_agrees() {
        struct Shared;

        let registry = Arc::new(TypeRegistry::new());
        let derived = geo_point_subtype();
        let shared = NativeType::of::<Shared>();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let derived = derived.clone();
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(
                            registry.resolve(&derived).map(|d| d.kind()),
                            Some(PrimitiveKind::GeographyPoint)
                        );
                        assert!(registry.resolve(&shared).is_none());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let settled = registry.comparison_count();
        registry.resolve(&derived);
        registry.resolve(&shared);
        assert_eq!(registry.comparison_count(), settled);
    }
}
