use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use odc_edm::value::{Position, Shape, SpatialValue};
use odc_edm::{PrimitiveKind, PrimitiveValue, TypeRegistry};
use serde_json::{Map, Number, Value};

use super::escape::{escape_data_string, escape_quoted_literal};
use crate::error::{GraphError, ProtocolUsageError, SerializeError};
use crate::node::{CollectionNode, ComplexNode, ValueNode};
use crate::settings::SerializerSettings;

// -----------------------------------------------------------------------------
// UriLiteral

/// Formats value nodes as URI literals.
pub(crate) struct UriLiteral<'a> {
    pub registry: &'a TypeRegistry,
    pub settings: &'a SerializerSettings,
}

impl UriLiteral<'_> {
    /// The escaped literal of parameter `name`.
    pub fn escaped(&self, name: &str, node: &ValueNode) -> Result<String, SerializeError> {
        Ok(match node {
            ValueNode::Complex(_) | ValueNode::Collection(_) => {
                let json = self.json(name, node)?;
                escape_data_string(&json.to_string())
            }
            _ => escape_quoted_literal(&self.literal(name, node)?),
        })
    }

    /// The unescaped literal of a null, primitive, or enum node.
    pub fn literal(&self, name: &str, node: &ValueNode) -> Result<String, SerializeError> {
        match node {
            ValueNode::Null => Ok("null".into()),
            ValueNode::Primitive { value, .. } => self.primitive(name, value),
            ValueNode::Enum { value, type_name } => Ok(format!("{type_name}'{value}'")),
            ValueNode::Complex(_) | ValueNode::Collection(_) => Ok(self.json(name, node)?.to_string()),
        }
    }

    fn primitive(&self, name: &str, value: &PrimitiveValue) -> Result<String, SerializeError> {
        let text = self.text(name, value)?;
        let kind = value.kind();
        Ok(match kind {
            PrimitiveKind::String => format!("'{}'", text.replace('\'', "''")),
            PrimitiveKind::Single | PrimitiveKind::Double => {
                let digits = text.strip_prefix('-').unwrap_or(&text);
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    text + ".0"
                } else {
                    text
                }
            }
            PrimitiveKind::Duration => format!("duration'{text}'"),
            PrimitiveKind::Binary => format!("binary'{text}'"),
            _ if kind.is_geography() => format!("geography'{text}'"),
            _ if kind.is_geometry() => format!("geometry'{text}'"),
            _ => text,
        })
    }

    /// Canonical wire text of a primitive value.
    fn text(&self, name: &str, value: &PrimitiveValue) -> Result<String, SerializeError> {
        let kind = value.kind();
        if kind == PrimitiveKind::Stream {
            return Err(ProtocolUsageError::InvalidParameterType {
                parameter: name.into(),
                kind: kind.edm_name(),
            }
            .into());
        }
        let desc = self
            .registry
            .resolve_name(kind.edm_name())
            .map_err(|e| GraphError::from_resolution(name, e))?;
        Ok(desc.format(value)?)
    }

    // -------------------------------------------------------------------------
    // JSON

    fn json(&self, name: &str, node: &ValueNode) -> Result<Value, SerializeError> {
        Ok(match node {
            ValueNode::Null => Value::Null,
            ValueNode::Primitive { value, .. } => self.json_primitive(name, value)?,
            ValueNode::Enum { value, .. } => Value::String(value.clone()),
            ValueNode::Complex(complex) => self.json_complex(name, complex)?,
            ValueNode::Collection(CollectionNode { items, .. }) => Value::Array(
                items
                    .iter()
                    .map(|item| self.json(name, item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn json_complex(&self, name: &str, complex: &ComplexNode) -> Result<Value, SerializeError> {
        let mut map = Map::new();
        if self.settings.annotate_structured_literals {
            map.insert("@odata.type".into(), Value::String(format!("#{}", complex.type_name)));
        }
        for property in &complex.properties {
            map.insert(property.name.clone(), self.json(name, &property.value)?);
        }
        Ok(Value::Object(map))
    }

    fn json_primitive(&self, name: &str, value: &PrimitiveValue) -> Result<Value, SerializeError> {
        let text = self.text(name, value)?;
        Ok(match value {
            PrimitiveValue::Boolean(b) => Value::Bool(*b),
            PrimitiveValue::Single(_) | PrimitiveValue::Double(_) => text
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::String(text), Value::Number),
            PrimitiveValue::Decimal(_) => text
                .parse::<Number>()
                .map_or_else(|_| Value::String(text), Value::Number),
            PrimitiveValue::Spatial(spatial) => geo_json(spatial),
            _ => match value.as_integer().and_then(|i| i64::try_from(i).ok()) {
                Some(i) => Value::Number(i.into()),
                None => Value::String(text),
            },
        })
    }
}

// -----------------------------------------------------------------------------
// GeoJSON

fn geo_json(value: &SpatialValue) -> Value {
    let mut map = match shape_json(value.shape()) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let mut crs = Map::new();
    crs.insert("type".into(), "name".into());
    let mut properties = Map::new();
    properties.insert("name".into(), format!("EPSG:{}", value.srid()).into());
    crs.insert("properties".into(), Value::Object(properties));
    map.insert("crs".into(), Value::Object(crs));
    Value::Object(map)
}

fn shape_json(shape: &Shape) -> Value {
    let mut map = Map::new();
    let (tag, body) = match shape {
        Shape::Point(p) => ("Point", p.as_ref().map_or(Value::Array(Vec::new()), position)),
        Shape::LineString(line) => ("LineString", positions(line)),
        Shape::MultiPoint(points) => ("MultiPoint", positions(points)),
        Shape::Polygon(rings) => ("Polygon", Value::Array(rings.iter().map(|r| positions(r)).collect())),
        Shape::MultiLineString(lines) => ("MultiLineString", Value::Array(lines.iter().map(|l| positions(l)).collect())),
        Shape::MultiPolygon(polygons) => (
            "MultiPolygon",
            Value::Array(
                polygons
                    .iter()
                    .map(|p| Value::Array(p.iter().map(|r| positions(r)).collect()))
                    .collect(),
            ),
        ),
        Shape::Collection(shapes) => {
            map.insert("type".into(), "GeometryCollection".into());
            map.insert("geometries".into(), Value::Array(shapes.iter().map(shape_json).collect()));
            return Value::Object(map);
        }
    };
    map.insert("type".into(), tag.into());
    map.insert("coordinates".into(), body);
    Value::Object(map)
}

fn position(p: &Position) -> Value {
    let coords = [Some(p.x), Some(p.y), p.z, p.m];
    Value::Array(
        coords
            .into_iter()
            .flatten()
            .map(|c| Number::from_f64(c).map_or(Value::Null, Value::Number))
            .collect(),
    )
}

fn positions(list: &[Position]) -> Value {
    Value::Array(list.iter().map(position).collect())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use chrono::{NaiveDate, TimeDelta};
    use odc_edm::value::{Shape, SpatialValue};
    use odc_edm::{Decimal, PrimitiveValue, TypeRegistry};
    use serde_json::json;

    use super::UriLiteral;
    use crate::error::{GraphError, ProtocolUsageError, SerializeError};
    use crate::node::{CollectionNode, ComplexNode, ItemKind, PropertyNode, ValueNode};
    use crate::settings::SerializerSettings;

    fn literal(value: impl Into<PrimitiveValue>) -> String {
        let registry = TypeRegistry::new();
        let settings = SerializerSettings::new();
        let uri = UriLiteral {
            registry: &registry,
            settings: &settings,
        };
        uri.literal("p", &ValueNode::primitive(value)).unwrap()
    }

    fn address() -> ValueNode {
        ValueNode::Complex(ComplexNode {
            type_name: "NS.Address".into(),
            properties: Vec::from([
                PropertyNode::new("City", ValueNode::primitive("Redmond")),
                PropertyNode::new("Zip", ValueNode::primitive(98052)),
            ]),
        })
    }

    #[test]
    fn primitive_literals() {
        assert_eq!(literal("it's"), "'it''s'");
        assert_eq!(literal(42), "42");
        assert_eq!(literal(true), "true");
        assert_eq!(literal(1.0_f64), "1.0");
        assert_eq!(literal(-3.0_f32), "-3.0");
        assert_eq!(literal(2.5_f64), "2.5");
        assert_eq!(literal(f64::INFINITY), "INF");
        assert_eq!(literal(Decimal::new(150, 2).unwrap()), "1.50");
        assert_eq!(literal(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()), "2024-05-01");
        assert_eq!(literal(TimeDelta::days(1)), "duration'P1D'");
        assert_eq!(literal(Vec::from([1_u8, 2, 3])), "binary'AQID'");
        assert_eq!(
            literal(SpatialValue::geography(Shape::point(1.0, 2.0))),
            "geography'SRID=4326;POINT (1 2)'"
        );
    }

    #[test]
    fn invalid_primitives() {
        let registry = TypeRegistry::new();
        let settings = SerializerSettings::new();
        let uri = UriLiteral {
            registry: &registry,
            settings: &settings,
        };

        let stream = ValueNode::primitive(odc_edm::value::StreamLink::new("http://host/media"));
        assert_eq!(
            uri.literal("photo", &stream),
            Err(SerializeError::Protocol(ProtocolUsageError::InvalidParameterType {
                parameter: "photo".into(),
                kind: "Edm.Stream",
            }))
        );

        assert_eq!(
            uri.literal("count", &ValueNode::primitive(7_u32)),
            Err(SerializeError::Graph(GraphError::UnsupportedReverseMapping {
                name: "count".into(),
                edm: "Edm.UInt32",
            }))
        );
    }

    #[test]
    fn structured_literals() {
        let registry = TypeRegistry::new();
        let settings = SerializerSettings::new();
        let uri = UriLiteral {
            registry: &registry,
            settings: &settings,
        };

        let text = uri.literal("a", &address()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"@odata.type": "#NS.Address", "City": "Redmond", "Zip": 98052}));
        assert!(text.starts_with("{\"@odata.type\""));

        let plain = SerializerSettings::new().with_annotate_structured_literals(false);
        let uri = UriLiteral {
            registry: &registry,
            settings: &plain,
        };
        let list = ValueNode::Collection(CollectionNode {
            item_type_name: "NS.Address".into(),
            item_kind: ItemKind::Complex,
            items: Vec::from([address(), ValueNode::Null]),
        });
        let parsed: serde_json::Value = serde_json::from_str(&uri.literal("l", &list).unwrap()).unwrap();
        assert_eq!(parsed, json!([{"City": "Redmond", "Zip": 98052}, null]));
    }

    #[test]
    fn json_primitives() {
        let registry = TypeRegistry::new();
        let settings = SerializerSettings::new();
        let uri = UriLiteral {
            registry: &registry,
            settings: &settings,
        };
        let list = ValueNode::Collection(CollectionNode {
            item_type_name: "Edm.Double".into(),
            item_kind: ItemKind::Primitive,
            items: Vec::from([
                ValueNode::primitive(1.5_f64),
                ValueNode::primitive(f64::NAN),
                ValueNode::primitive(Decimal::new(25, 1).unwrap()),
                ValueNode::primitive(SpatialValue::geometry(Shape::point(1.0, 2.0))),
            ]),
        });

        let parsed: serde_json::Value = serde_json::from_str(&uri.literal("l", &list).unwrap()).unwrap();
        assert_eq!(
            parsed,
            json!([
                1.5,
                "NaN",
                2.5,
                {
                    "type": "Point",
                    "coordinates": [1.0, 2.0],
                    "crs": {"type": "name", "properties": {"name": "EPSG:0"}}
                }
            ])
        );
    }

    #[test]
    fn escaping_strategy() {
        let registry = TypeRegistry::new();
        let settings = SerializerSettings::new().with_annotate_structured_literals(false);
        let uri = UriLiteral {
            registry: &registry,
            settings: &settings,
        };

        assert_eq!(uri.escaped("s", &ValueNode::primitive("x y")).unwrap(), "%27x%20y%27");
        assert_eq!(uri.escaped("n", &ValueNode::Null).unwrap(), "null");
        assert_eq!(
            uri.escaped("a", &address()).unwrap(),
            "%7B%22City%22%3A%22Redmond%22%2C%22Zip%22%3A98052%7D"
        );
    }
}
