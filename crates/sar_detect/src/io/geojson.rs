use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::{error::Result, types::DetectionReport};

fn number(value: f64) -> JsonValue {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn feature(id: usize, geometry: Value, properties: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: Some(geojson::feature::Id::Number(Number::from(id))),
        properties: Some(properties),
        foreign_members: None,
    }
}

impl DetectionReport {
    /// Export detections as a FeatureCollection in raster pixel coordinates
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();
        let set = &self.detections;

        for (i, vessel) in set.vessels.iter().enumerate() {
            let mut properties = Map::new();
            properties.insert("kind".to_string(), JsonValue::from("vessel"));
            properties.insert("dark".to_string(), JsonValue::Bool(self.tags.is_dark(i)));
            properties.insert("moving".to_string(), JsonValue::Bool(self.tags.is_moving(i)));
            let point = Value::Point(vec![vessel.x as f64, vessel.y as f64]);
            features.push(feature(features.len(), point, properties));
        }

        for tank in &set.tanks {
            let mut properties = Map::new();
            properties.insert("kind".to_string(), JsonValue::from("tank"));
            properties.insert("radius".to_string(), number(tank.radius as f64));
            let point = Value::Point(vec![tank.x as f64, tank.y as f64]);
            features.push(feature(features.len(), point, properties));
        }

        for pier in &set.piers {
            let mut properties = Map::new();
            properties.insert("kind".to_string(), JsonValue::from("pier"));
            let (x0, y0, x1, y1) = (pier.x0 as f64, pier.y0 as f64, pier.x1 as f64, pier.y1 as f64);
            let ring = vec![
                vec![x0, y0],
                vec![x1, y0],
                vec![x1, y1],
                vec![x0, y1],
                vec![x0, y0],
            ];
            features.push(feature(features.len(), Value::Polygon(vec![ring]), properties));
        }

        let mut foreign_members = Map::new();
        foreign_members.insert("image_width".to_string(), JsonValue::from(self.image_width));
        foreign_members.insert("image_height".to_string(), JsonValue::from(self.image_height));
        foreign_members.insert("seed".to_string(), JsonValue::from(self.seed));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    /// Export to GeoJSON and serialize to a JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}
