//! Geography and geometry values and their well-known-text form.
//!
//! The text form is `SRID=<n>;<WKT>`, e.g. `SRID=4326;POINT (-122.1 47.6)`.
//! The `SRID` prefix is optional when parsing; each family has a default.

use alloc::vec::Vec;
use core::fmt::{self, Write};

use crate::PrimitiveKind;

// -----------------------------------------------------------------------------
// SpatialFamily

/// Round-earth (`Geography`) or flat-earth (`Geometry`) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialFamily {
    Geography,
    Geometry,
}

impl SpatialFamily {
    /// SRID used when the text form carries none.
    pub const fn default_srid(self) -> u32 {
        match self {
            Self::Geography => 4326,
            Self::Geometry => 0,
        }
    }

    /// The abstract root kind of the family.
    pub const fn root_kind(self) -> PrimitiveKind {
        match self {
            Self::Geography => PrimitiveKind::Geography,
            Self::Geometry => PrimitiveKind::Geometry,
        }
    }

    /// Returns the family of a spatial kind.
    pub const fn of_kind(kind: PrimitiveKind) -> Option<Self> {
        if kind.is_geography() {
            Some(Self::Geography)
        } else if kind.is_geometry() {
            Some(Self::Geometry)
        } else {
            None
        }
    }
}

// -----------------------------------------------------------------------------
// Position

/// A coordinate. `x` is the longitude for geography values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    #[inline]
    pub const fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }
}

// -----------------------------------------------------------------------------
// Shape

/// The shape of a spatial value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// `None` is the empty point.
    Point(Option<Position>),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    Collection(Vec<Shape>),
}

impl Shape {
    #[inline]
    pub const fn point(x: f64, y: f64) -> Self {
        Self::Point(Some(Position::new(x, y)))
    }

    /// The concrete kind of this shape within `family`.
    pub const fn kind_in(&self, family: SpatialFamily) -> PrimitiveKind {
        use PrimitiveKind as K;
        match (family, self) {
            (SpatialFamily::Geography, Self::Point(_)) => K::GeographyPoint,
            (SpatialFamily::Geography, Self::LineString(_)) => K::GeographyLineString,
            (SpatialFamily::Geography, Self::Polygon(_)) => K::GeographyPolygon,
            (SpatialFamily::Geography, Self::MultiPoint(_)) => K::GeographyMultiPoint,
            (SpatialFamily::Geography, Self::MultiLineString(_)) => K::GeographyMultiLineString,
            (SpatialFamily::Geography, Self::MultiPolygon(_)) => K::GeographyMultiPolygon,
            (SpatialFamily::Geography, Self::Collection(_)) => K::GeographyCollection,
            (SpatialFamily::Geometry, Self::Point(_)) => K::GeometryPoint,
            (SpatialFamily::Geometry, Self::LineString(_)) => K::GeometryLineString,
            (SpatialFamily::Geometry, Self::Polygon(_)) => K::GeometryPolygon,
            (SpatialFamily::Geometry, Self::MultiPoint(_)) => K::GeometryMultiPoint,
            (SpatialFamily::Geometry, Self::MultiLineString(_)) => K::GeometryMultiLineString,
            (SpatialFamily::Geometry, Self::MultiPolygon(_)) => K::GeometryMultiPolygon,
            (SpatialFamily::Geometry, Self::Collection(_)) => K::GeometryCollection,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Point(_) => "POINT",
            Self::LineString(_) => "LINESTRING",
            Self::Polygon(_) => "POLYGON",
            Self::MultiPoint(_) => "MULTIPOINT",
            Self::MultiLineString(_) => "MULTILINESTRING",
            Self::MultiPolygon(_) => "MULTIPOLYGON",
            Self::Collection(_) => "GEOMETRYCOLLECTION",
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Point(p) => p.is_none(),
            Self::LineString(v) | Self::MultiPoint(v) => v.is_empty(),
            Self::Polygon(v) | Self::MultiLineString(v) => v.is_empty(),
            Self::MultiPolygon(v) => v.is_empty(),
            Self::Collection(v) => v.is_empty(),
        }
    }
}

// -----------------------------------------------------------------------------
// SpatialValue

/// A geography or geometry instance.
///
/// # Examples
///
/// ```
/// use odc_edm::value::{Shape, SpatialValue};
/// use odc_edm::PrimitiveKind;
///
/// let p = SpatialValue::geography(Shape::point(-122.1, 47.6));
/// assert_eq!(p.kind(), PrimitiveKind::GeographyPoint);
/// assert_eq!(p.to_string(), "SRID=4326;POINT (-122.1 47.6)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialValue {
    family: SpatialFamily,
    srid: u32,
    shape: Shape,
}

impl SpatialValue {
    pub const fn new(family: SpatialFamily, srid: u32, shape: Shape) -> Self {
        Self {
            family,
            srid,
            shape,
        }
    }

    /// A geography value with the default SRID.
    pub const fn geography(shape: Shape) -> Self {
        Self::new(SpatialFamily::Geography, 4326, shape)
    }

    /// A geometry value with the default SRID.
    pub const fn geometry(shape: Shape) -> Self {
        Self::new(SpatialFamily::Geometry, 0, shape)
    }

    pub const fn with_srid(mut self, srid: u32) -> Self {
        self.srid = srid;
        self
    }

    #[inline]
    pub const fn family(&self) -> SpatialFamily {
        self.family
    }

    #[inline]
    pub const fn srid(&self) -> u32 {
        self.srid
    }

    #[inline]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.shape.kind_in(self.family)
    }

    /// Parses `[SRID=n;]WKT` for the given family.
    pub fn parse(family: SpatialFamily, text: &str) -> Result<Self, &'static str> {
        let text = text.trim();
        let (srid, wkt) = match strip_prefix_ignore_case(text, "SRID=") {
            Some(rest) => {
                let (srid, wkt) = rest.split_once(';').ok_or("missing `;` after SRID")?;
                let srid = srid.trim().parse().map_err(|_| "invalid SRID")?;
                (srid, wkt)
            }
            None => (family.default_srid(), text),
        };

        let mut parser = WktParser {
            input: wkt.as_bytes(),
            pos: 0,
            depth: 0,
        };
        let shape = parser.shape()?;
        parser.skip_ws();
        if parser.pos != parser.input.len() {
            return Err("trailing characters");
        }

        Ok(Self::new(family, srid, shape))
    }
}

impl fmt::Display for SpatialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SRID={};", self.srid)?;
        write_shape(f, &self.shape)
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

// -----------------------------------------------------------------------------
// WKT writer

fn write_shape(f: &mut dyn Write, shape: &Shape) -> fmt::Result {
    f.write_str(shape.tag())?;
    if shape.is_empty() {
        return f.write_str(" EMPTY");
    }
    f.write_str(" ")?;
    match shape {
        Shape::Point(Some(p)) => {
            f.write_char('(')?;
            write_position(f, p)?;
            f.write_char(')')
        }
        Shape::Point(None) => Ok(()),
        Shape::LineString(line) => write_line(f, line),
        Shape::Polygon(rings) | Shape::MultiLineString(rings) => write_rings(f, rings),
        Shape::MultiPoint(points) => {
            f.write_char('(')?;
            for (i, p) in points.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_char('(')?;
                write_position(f, p)?;
                f.write_char(')')?;
            }
            f.write_char(')')
        }
        Shape::MultiPolygon(polygons) => {
            f.write_char('(')?;
            for (i, rings) in polygons.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_rings(f, rings)?;
            }
            f.write_char(')')
        }
        Shape::Collection(shapes) => {
            f.write_char('(')?;
            for (i, s) in shapes.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_shape(f, s)?;
            }
            f.write_char(')')
        }
    }
}

fn write_position(f: &mut dyn Write, p: &Position) -> fmt::Result {
    f.write_str(&super::format_f64(p.x))?;
    f.write_char(' ')?;
    f.write_str(&super::format_f64(p.y))?;
    match (p.z, p.m) {
        (Some(z), Some(m)) => write!(f, " {} {}", super::format_f64(z), super::format_f64(m)),
        (Some(z), None) => write!(f, " {}", super::format_f64(z)),
        (None, Some(m)) => write!(f, " NULL {}", super::format_f64(m)),
        (None, None) => Ok(()),
    }
}

fn write_line(f: &mut dyn Write, line: &[Position]) -> fmt::Result {
    f.write_char('(')?;
    for (i, p) in line.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_position(f, p)?;
    }
    f.write_char(')')
}

fn write_rings(f: &mut dyn Write, rings: &[Vec<Position>]) -> fmt::Result {
    f.write_char('(')?;
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_line(f, ring)?;
    }
    f.write_char(')')
}

// -----------------------------------------------------------------------------
// WKT parser

/// Nested collections deeper than this are rejected.
const MAX_COLLECTION_DEPTH: usize = 32;

struct WktParser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl WktParser<'_> {
    fn skip_ws(&mut self) {
        while self.input.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, c: u8) -> Result<(), &'static str> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(match c {
                b'(' => "expected `(`",
                b')' => "expected `)`",
                _ => "unexpected character",
            })
        }
    }

    fn word(&mut self) -> &[u8] {
        self.skip_ws();
        let start = self.pos;
        while self.input.get(self.pos).is_some_and(u8::is_ascii_alphabetic) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn try_empty(&mut self) -> bool {
        let save = self.pos;
        if self.word().eq_ignore_ascii_case(b"EMPTY") {
            true
        } else {
            self.pos = save;
            false
        }
    }

    fn shape(&mut self) -> Result<Shape, &'static str> {
        let tag = self.word().to_ascii_uppercase();
        let empty = self.try_empty();
        match tag.as_slice() {
            b"POINT" if empty => Ok(Shape::Point(None)),
            b"POINT" => {
                self.expect(b'(')?;
                let p = self.position()?;
                self.expect(b')')?;
                Ok(Shape::Point(Some(p)))
            }
            b"LINESTRING" if empty => Ok(Shape::LineString(Vec::new())),
            b"LINESTRING" => Ok(Shape::LineString(self.line()?)),
            b"POLYGON" if empty => Ok(Shape::Polygon(Vec::new())),
            b"POLYGON" => Ok(Shape::Polygon(self.list(Self::line)?)),
            b"MULTIPOINT" if empty => Ok(Shape::MultiPoint(Vec::new())),
            b"MULTIPOINT" => Ok(Shape::MultiPoint(self.list(Self::multi_point_member)?)),
            b"MULTILINESTRING" if empty => Ok(Shape::MultiLineString(Vec::new())),
            b"MULTILINESTRING" => Ok(Shape::MultiLineString(self.list(Self::line)?)),
            b"MULTIPOLYGON" if empty => Ok(Shape::MultiPolygon(Vec::new())),
            b"MULTIPOLYGON" => Ok(Shape::MultiPolygon(
                self.list(|p: &mut Self| p.list(Self::line))?,
            )),
            b"GEOMETRYCOLLECTION" if empty => Ok(Shape::Collection(Vec::new())),
            b"GEOMETRYCOLLECTION" => {
                self.depth += 1;
                if self.depth > MAX_COLLECTION_DEPTH {
                    return Err("collection nesting too deep");
                }
                let shapes = self.list(Self::shape)?;
                self.depth -= 1;
                Ok(Shape::Collection(shapes))
            }
            _ => Err("unknown shape tag"),
        }
    }

    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, &'static str>,
    ) -> Result<Vec<T>, &'static str> {
        self.expect(b'(')?;
        let mut out = Vec::new();
        loop {
            out.push(item(self)?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(out);
                }
                _ => return Err("expected `,` or `)`"),
            }
        }
    }

    fn line(&mut self) -> Result<Vec<Position>, &'static str> {
        self.list(Self::position)
    }

    // Both `MULTIPOINT ((1 2), (3 4))` and `MULTIPOINT (1 2, 3 4)` are accepted.
    fn multi_point_member(&mut self) -> Result<Position, &'static str> {
        if self.peek() == Some(b'(') {
            self.pos += 1;
            let p = self.position()?;
            self.expect(b')')?;
            Ok(p)
        } else {
            self.position()
        }
    }

    fn position(&mut self) -> Result<Position, &'static str> {
        let x = self.number()?.ok_or("missing x coordinate")?;
        let y = self.number()?.ok_or("missing y coordinate")?;
        let z = self.optional_number()?;
        let m = self.optional_number()?;
        Ok(Position { x, y, z, m })
    }

    fn optional_number(&mut self) -> Result<Option<f64>, &'static str> {
        match self.peek() {
            Some(b',') | Some(b')') | None => Ok(None),
            _ => self.number(),
        }
    }

    // `NULL` is allowed for z when only m is present.
    fn number(&mut self) -> Result<Option<f64>, &'static str> {
        self.skip_ws();
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| !c.is_ascii_whitespace() && *c != b',' && *c != b')' && *c != b'(')
        {
            self.pos += 1;
        }
        let token = core::str::from_utf8(&self.input[start..self.pos]).map_err(|_| "invalid number")?;
        if token.eq_ignore_ascii_case("NULL") {
            return Ok(None);
        }
        super::parse_f64_literal(token)
            .map(Some)
            .ok_or("invalid number")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn parse_point_with_and_without_srid() {
        let a = SpatialValue::parse(SpatialFamily::Geography, "SRID=4326;POINT (1 2)").unwrap();
        let b = SpatialValue::parse(SpatialFamily::Geography, "point(1 2)").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.kind(), PrimitiveKind::GeographyPoint);

        let c = SpatialValue::parse(SpatialFamily::Geometry, "SRID=0;POINT (1 2 3)").unwrap();
        assert_eq!(c.shape(), &Shape::Point(Some(Position::new(1.0, 2.0).with_z(3.0))));
    }

    #[test]
    fn polygon_and_collection_text() {
        let polygon = Shape::Polygon(vec![vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(0.0, 0.0),
        ]]);
        let value = SpatialValue::geometry(Shape::Collection(vec![
            Shape::point(5.0, 6.0),
            polygon,
            Shape::LineString(vec![]),
        ]));
        let text = value.to_string();
        assert_eq!(
            text,
            "SRID=0;GEOMETRYCOLLECTION (POINT (5 6), POLYGON ((0 0, 1 0, 1 1, 0 0)), LINESTRING EMPTY)"
        );
        assert_eq!(SpatialValue::parse(SpatialFamily::Geometry, &text).unwrap(), value);
    }

    #[test]
    fn multipoint_accepts_both_forms() {
        let a = SpatialValue::parse(SpatialFamily::Geography, "MULTIPOINT ((1 2), (3 4))").unwrap();
        let b = SpatialValue::parse(SpatialFamily::Geography, "MULTIPOINT (1 2, 3 4)").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["POINT", "POINT (1)", "POINT (1 2", "CIRCLE (1 2)", "POINT (1 2) x", "SRID=x;POINT (1 2)"] {
            assert!(SpatialValue::parse(SpatialFamily::Geometry, text).is_err(), "{text}");
        }
    }
}
