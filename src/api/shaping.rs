use std::marker::PhantomData;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Resources that can be shaped need a stable id for link generation.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// A resource reduced to the requested properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedEntity {
    pub id: Uuid,
    pub entity: Map<String, Value>,
}

/// Selects a subset of serialized properties from resources.
///
/// Property names come from the serialized form of `T`, so they match what
/// clients see on the wire. Requested names are matched ignoring case,
/// unknown names are dropped, and an empty field list keeps everything.
pub struct DataShaper<T> {
    _phantom: PhantomData<T>,
}

impl<T> DataShaper<T>
where
    T: Serialize + Identifiable,
{
    pub fn shape_data(entities: &[T], fields: Option<&str>) -> Result<Vec<ShapedEntity>, serde_json::Error> {
        entities.iter().map(|entity| Self::shape_entity(entity, fields)).collect()
    }

    pub fn shape_entity(entity: &T, fields: Option<&str>) -> Result<ShapedEntity, serde_json::Error> {
        let properties = match serde_json::to_value(entity)? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        let requested = requested_fields(fields);
        let entity_map = if requested.is_empty() {
            properties
        } else {
            let mut shaped = Map::new();
            for field in requested {
                if let Some((key, value)) = properties.iter().find(|(key, _)| key.eq_ignore_ascii_case(field)) {
                    if !shaped.contains_key(key) {
                        shaped.insert(key.clone(), value.clone());
                    }
                }
            }
            shaped
        };

        Ok(ShapedEntity { id: entity.id(), entity: entity_map })
    }
}

fn requested_fields(fields: Option<&str>) -> Vec<&str> {
    fields
        .map(|f| f.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Person {
        id: Uuid,
        name: String,
        age: i32,
        job_title: String,
    }

    impl Identifiable for Person {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn person() -> Person {
        Person { id: Uuid::new_v4(), name: "Sam".into(), age: 26, job_title: "Developer".into() }
    }

    #[test]
    fn keeps_all_properties_without_fields() {
        let p = person();
        let shaped = DataShaper::shape_entity(&p, None).unwrap();
        let keys: Vec<_> = shaped.entity.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "age", "jobTitle"]);
        assert_eq!(shaped.id, p.id);
    }

    #[test]
    fn selects_requested_fields_case_insensitively_in_request_order() {
        let p = person();
        let shaped = DataShaper::shape_entity(&p, Some(" AGE ,name, salary,name")).unwrap();
        let keys: Vec<_> = shaped.entity.keys().cloned().collect();
        assert_eq!(keys, vec!["age", "name"]);
        assert_eq!(shaped.id, p.id);
    }

    #[test]
    fn only_unknown_fields_yield_empty_entity() {
        let shaped = DataShaper::shape_data(&[person(), person()], Some("salary")).unwrap();
        assert_eq!(shaped.len(), 2);
        assert!(shaped.iter().all(|s| s.entity.is_empty()));
    }
}
