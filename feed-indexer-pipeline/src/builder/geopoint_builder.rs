//! Delimited-text document builder with geo-point aggregation.

use std::collections::HashSet;
use std::io::Read;

use chrono::Utc;
use csv::{StringRecord, StringRecordsIntoIter};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::builder::csv_builder::{field_name, read_headers, unique_id_from, CsvFormat};
use crate::builder::field_name::FieldNameMapper;
use crate::builder::{DocumentBuilder, DocumentStream};
use crate::errors::PipelineError;
use feed_indexer_shared::{DocumentAction, GeoPoint, IndexDocument};

/// Extends [`CsvDocumentBuilder`](crate::builder::CsvDocumentBuilder) with
/// latitude/longitude aggregation.
///
/// Header names are scanned case-insensitively against two configurable
/// synonym sets to fix a latitude column and a longitude column for the
/// whole stream. Both columns are excluded from normal field emission; when
/// both values of a record parse as floats, a combined geo-point field is
/// added to the content. An unmatched column pair disables aggregation
/// entirely, and a non-numeric value skips the geo field for that record
/// only. Neither case is an error.
#[derive(Debug, Clone)]
pub struct CsvGeoPointBuilder {
    format: CsvFormat,
    use_header_record: bool,
    unique_id_field: usize,
    delta_status_column: String,
    field_name_mapper: FieldNameMapper,
    latitude_field_names: String,
    longitude_field_names: String,
    location_field_name: String,
    add_timestamp_field: Option<String>,
}

impl CsvGeoPointBuilder {
    pub fn new() -> Self {
        Self {
            format: CsvFormat::default(),
            use_header_record: true,
            unique_id_field: 0,
            delta_status_column: "Delta_Status".to_string(),
            field_name_mapper: FieldNameMapper::default(),
            latitude_field_names: "latitude,lat".to_string(),
            longitude_field_names: "longitude,lon".to_string(),
            location_field_name: "location".to_string(),
            add_timestamp_field: None,
        }
    }

    /// Use a custom record format.
    pub fn with_format(mut self, format: CsvFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether the input contains a header row, defaults to true. Without a
    /// header row field names are positional and the synonym scan will never
    /// match, so aggregation is effectively disabled.
    pub fn with_header_record(mut self, use_header: bool) -> Self {
        self.use_header_record = use_header;
        self
    }

    /// Which field position is considered the unique id, defaults to 0.
    pub fn with_unique_id_field(mut self, index: usize) -> Self {
        self.unique_id_field = index;
        self
    }

    /// Name of the status column, defaults to `Delta_Status`.
    pub fn with_delta_status_column(mut self, column: impl Into<String>) -> Self {
        self.delta_status_column = column.into();
        self
    }

    /// Transform applied to output field names, defaults to identity.
    pub fn with_field_name_mapper(mut self, mapper: FieldNameMapper) -> Self {
        self.field_name_mapper = mapper;
        self
    }

    /// Comma-separated synonyms for the latitude column, defaults to
    /// `latitude,lat`.
    pub fn with_latitude_field_names(mut self, names: impl Into<String>) -> Self {
        self.latitude_field_names = names.into();
        self
    }

    /// Comma-separated synonyms for the longitude column, defaults to
    /// `longitude,lon`.
    pub fn with_longitude_field_names(mut self, names: impl Into<String>) -> Self {
        self.longitude_field_names = names.into();
        self
    }

    /// Output field name for the combined geo-point, defaults to `location`.
    pub fn with_location_field_name(mut self, name: impl Into<String>) -> Self {
        self.location_field_name = name.into();
        self
    }

    /// When set, prepend a field with this name carrying epoch milliseconds
    /// at build time to every document. Absent by default.
    pub fn with_timestamp_field(mut self, name: impl Into<String>) -> Self {
        self.add_timestamp_field = Some(name.into());
        self
    }
}

impl Default for CsvGeoPointBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for CsvGeoPointBuilder {
    fn build(&self, input: Box<dyn Read + Send>) -> Result<DocumentStream, PipelineError> {
        let mut records = self.format.open(input);
        let headers = if self.use_header_record {
            read_headers(&mut records)?
        } else {
            Vec::new()
        };
        let columns = LatLonColumns::locate(
            &synonyms(&self.latitude_field_names),
            &synonyms(&self.longitude_field_names),
            &headers,
        );
        debug!(
            header_count = headers.len(),
            aggregation_enabled = columns.enabled(),
            "Opened CSV geo-point document stream"
        );

        Ok(Box::new(CsvGeoPointIter {
            records,
            headers,
            columns,
            unique_id_field: self.unique_id_field,
            delta_status_column: self.delta_status_column.clone(),
            field_name_mapper: self.field_name_mapper,
            location_field_name: self.location_field_name.clone(),
            add_timestamp_field: self.add_timestamp_field.clone(),
            done: false,
        }))
    }
}

fn synonyms(names: &str) -> HashSet<String> {
    names
        .split(',')
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Latitude/longitude column positions, computed once per stream from the
/// header row and immutable for the stream's lifetime.
struct LatLonColumns {
    lat: Option<usize>,
    lon: Option<usize>,
    lat_or_lon_names: HashSet<String>,
}

impl LatLonColumns {
    fn locate(
        latitude_names: &HashSet<String>,
        longitude_names: &HashSet<String>,
        headers: &[String],
    ) -> Self {
        let mut lat = None;
        let mut lon = None;
        for (i, header) in headers.iter().enumerate() {
            let lowered = header.to_lowercase();
            if latitude_names.contains(&lowered) {
                lat = Some(i);
            }
            if longitude_names.contains(&lowered) {
                lon = Some(i);
            }
        }
        Self {
            lat,
            lon,
            lat_or_lon_names: latitude_names.union(longitude_names).cloned().collect(),
        }
    }

    /// Aggregation requires both a matched latitude and longitude column.
    fn enabled(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    fn is_lat_or_lon(&self, name: &str) -> bool {
        self.lat_or_lon_names.contains(&name.to_lowercase())
    }

    /// The combined coordinate for a record, when both columns hold numbers.
    fn geo_point(&self, record: &StringRecord) -> Option<GeoPoint> {
        let (lat_col, lon_col) = (self.lat?, self.lon?);
        let lat: f64 = record.get(lat_col)?.trim().parse().ok()?;
        let lon: f64 = record.get(lon_col)?.trim().parse().ok()?;
        Some(GeoPoint::new(lat, lon))
    }
}

struct CsvGeoPointIter {
    records: StringRecordsIntoIter<Box<dyn Read + Send>>,
    headers: Vec<String>,
    columns: LatLonColumns,
    unique_id_field: usize,
    delta_status_column: String,
    field_name_mapper: FieldNameMapper,
    location_field_name: String,
    add_timestamp_field: Option<String>,
    done: bool,
}

impl CsvGeoPointIter {
    fn document(&self, record: &StringRecord) -> Result<IndexDocument, PipelineError> {
        let unique_id = unique_id_from(record, self.unique_id_field)?;

        let mut action = DocumentAction::Index;
        let mut content = Map::new();

        if let Some(ref timestamp_field) = self.add_timestamp_field {
            content.insert(
                timestamp_field.clone(),
                json!(Utc::now().timestamp_millis()),
            );
        }

        for (i, value) in record.iter().enumerate() {
            let name = field_name(&self.headers, i);
            if name.eq_ignore_ascii_case(&self.delta_status_column) {
                if let Some(resolved) = DocumentAction::from_delta_status(value) {
                    action = resolved;
                }
                continue;
            }
            if self.columns.is_lat_or_lon(&name) {
                continue;
            }
            content.insert(
                self.field_name_mapper.map(&name),
                Value::String(value.to_string()),
            );
        }

        if let Some(point) = self.columns.geo_point(record) {
            content.insert(self.location_field_name.clone(), point.to_value());
        }

        Ok(IndexDocument::with_action(unique_id, action, content))
    }
}

impl Iterator for CsvGeoPointIter {
    type Item = Result<IndexDocument, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.records.next()? {
            Ok(record) => self.document(&record),
            Err(e) => Err(e.into()),
        };
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV_WITH_LATLONG: &str = "\
productuniqueid,productname,latitude,longitude,recordid
UID-1,24-D Amine,53.37969768091292,-0.18346963126415416,210
UID-2,26N35S,52.71896363632868,-1.2391368098336788,233
";

    const CSV_WITHOUT_LATLONG: &str = "\
productuniqueid,productname,latitude,longitude,recordid
UID-1,*A Simazine,,,5
UID-2,*Axial,,,6
UID-3,*Betanal Maxxim,,,21
";

    fn stream(builder: &CsvGeoPointBuilder, input: &str) -> Vec<IndexDocument> {
        builder
            .build(Box::new(Cursor::new(input.to_string())))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_build_with_latlong() {
        let builder = CsvGeoPointBuilder::new();
        let docs = stream(&builder, CSV_WITH_LATLONG);

        assert_eq!(docs.len(), 2);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.unique_id, format!("UID-{}", i + 1));
            let location = doc.content["location"].as_object().unwrap();
            assert!(location.contains_key("lat"));
            assert!(location.contains_key("lon"));
            // The source columns are excluded from normal emission.
            assert!(!doc.content.contains_key("latitude"));
            assert!(!doc.content.contains_key("longitude"));
        }
        // Original coordinate values are recoverable from the geo field.
        assert_eq!(
            docs[0].content["location"]["lat"].as_f64().unwrap(),
            53.37969768091292
        );
        assert_eq!(
            docs[0].content["location"]["lon"].as_f64().unwrap(),
            -0.18346963126415416
        );
    }

    #[test]
    fn test_build_without_latlong_values() {
        let builder = CsvGeoPointBuilder::new();
        let docs = stream(&builder, CSV_WITHOUT_LATLONG);

        assert_eq!(docs.len(), 3);
        for doc in &docs {
            assert!(!doc.content.contains_key("location"));
            assert!(!doc.content.contains_key("latitude"));
            assert!(!doc.content.contains_key("longitude"));
        }
    }

    #[test]
    fn test_non_numeric_coordinate_skips_record_only() {
        let builder = CsvGeoPointBuilder::new();
        let input = "id,lat,lon\nA,53.1,-0.2\nB,not-a-number,-0.3\n";
        let docs = stream(&builder, input);

        assert!(docs[0].content.contains_key("location"));
        assert!(!docs[1].content.contains_key("location"));
    }

    #[test]
    fn test_synonym_matching_is_case_insensitive() {
        let builder = CsvGeoPointBuilder::new();
        let docs = stream(&builder, "id,LAT,Lon\nA,1.5,2.5\n");

        let location = docs[0].content["location"].as_object().unwrap();
        assert_eq!(location["lat"].as_f64().unwrap(), 1.5);
        assert_eq!(location["lon"].as_f64().unwrap(), 2.5);
    }

    #[test]
    fn test_unmatched_pair_disables_aggregation() {
        // Latitude synonym present, longitude missing: not an error, just no
        // geo field.
        let builder = CsvGeoPointBuilder::new();
        let docs = stream(&builder, "id,latitude,other\nA,53.1,x\n");

        assert!(!docs[0].content.contains_key("location"));
        // An unmatched latitude column is still excluded from emission.
        assert!(!docs[0].content.contains_key("latitude"));
        assert_eq!(docs[0].content["other"], "x");
    }

    #[test]
    fn test_custom_location_field_name() {
        let builder = CsvGeoPointBuilder::new().with_location_field_name("geo");
        let docs = stream(&builder, "id,lat,lon\nA,1.0,2.0\n");
        assert!(docs[0].content.contains_key("geo"));
        assert!(!docs[0].content.contains_key("location"));
    }

    #[test]
    fn test_timestamp_field_prepended() {
        let before = Utc::now().timestamp_millis();
        let builder = CsvGeoPointBuilder::new().with_timestamp_field("ingested_at");
        let docs = stream(&builder, "id,lat,lon\nA,1.0,2.0\n");
        let after = Utc::now().timestamp_millis();

        let keys: Vec<&String> = docs[0].content.keys().collect();
        assert_eq!(keys[0], "ingested_at");
        let stamp = docs[0].content["ingested_at"].as_i64().unwrap();
        assert!(stamp >= before && stamp <= after);
    }

    #[test]
    fn test_delta_status_sets_action() {
        let builder = CsvGeoPointBuilder::new();
        let docs = stream(&builder, "id,lat,lon,Delta_Status\nA,1.0,2.0,0\nB,1.0,2.0,1\n");

        assert_eq!(docs[0].action, DocumentAction::Delete);
        assert_eq!(docs[1].action, DocumentAction::Update);
        assert!(!docs[0].content.contains_key("Delta_Status"));
    }

    #[test]
    fn test_field_name_mapper_applies_to_record_fields() {
        let builder =
            CsvGeoPointBuilder::new().with_field_name_mapper(FieldNameMapper::Uppercase);
        let docs = stream(&builder, "id,lat,lon,crop\nA,1.0,2.0,Wheat\n");

        assert_eq!(docs[0].content["CROP"], "Wheat");
        assert!(docs[0].content.contains_key("location"));
    }

    #[test]
    fn test_unique_id_out_of_range_surfaces_error() {
        let builder = CsvGeoPointBuilder::new().with_unique_id_field(9);
        let mut docs = builder
            .build(Box::new(Cursor::new("id,lat,lon\nA,1.0,2.0\n".to_string())))
            .unwrap();

        assert!(matches!(
            docs.next(),
            Some(Err(PipelineError::FieldIndexOutOfRange { index: 9, .. }))
        ));
        assert!(docs.next().is_none());
    }
}
