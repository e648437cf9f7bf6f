use std::collections::BTreeMap;

use geo::{Centroid, MultiPolygon, Point};

use super::{Property, RegionKey};

/// A geographic feature: region key, mutable property mapping and (optionally) its boundary.
#[derive(Debug, Clone)]
pub struct Record {
    pub key: RegionKey,
    pub properties: BTreeMap<String, Property>,
    pub geometry: Option<MultiPolygon<f64>>,
}

impl Record {
    pub fn new(key: impl Into<RegionKey>) -> Self {
        Self { key: key.into(), properties: BTreeMap::new(), geometry: None }
    }

    pub fn with_geometry(mut self, geometry: MultiPolygon<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Numeric value of `attribute`, or NaN when it is absent or not a number.
    #[inline]
    pub fn value(&self, attribute: &str) -> f64 {
        self.properties.get(attribute).map_or(f64::NAN, Property::as_f64)
    }

    /// Set (or overwrite) a property.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Property>) {
        self.properties.insert(attribute.into(), value.into());
    }

    /// Anchor point for proportional symbols: the centroid of the boundary.
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.geometry.as_ref().and_then(|mp| mp.centroid())
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    #[test]
    fn missing_values_read_as_nan() {
        let mut record = Record::new("08001");
        record.set("pop", 12.0);
        record.set("name", "Adams");

        assert_eq!(record.value("pop"), 12.0);
        assert!(record.value("name").is_nan());
        assert!(record.value("absent").is_nan());
    }

    #[test]
    fn centroid_of_square() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let record = Record::new("A").with_geometry(MultiPolygon(vec![square]));
        let c = record.centroid().unwrap();
        assert!((c.x() - 1.0).abs() < 1e-12 && (c.y() - 1.0).abs() < 1e-12);
        assert!(Record::new("B").centroid().is_none());
    }
}
