//! Delimited-text document builder.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use serde_json::{Map, Value};
use tracing::debug;

use crate::builder::field_name::FieldNameMapper;
use crate::builder::{DocumentBuilder, DocumentStream};
use crate::errors::PipelineError;
use feed_indexer_shared::{DocumentAction, IndexDocument};

/// Delimited-record format parameters.
///
/// The parsing configuration is a collaborator of the builders rather than
/// part of them; all builders accept any format that yields ordered fields
/// per record.
#[derive(Debug, Clone, Copy)]
pub struct CsvFormat {
    /// Field delimiter, defaults to `,`.
    pub delimiter: u8,
    /// Quote character, defaults to `"`.
    pub quote: u8,
    /// Escape character; `None` (the default) uses doubled quotes.
    pub escape: Option<u8>,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            escape: None,
        }
    }
}

impl CsvFormat {
    /// Open a record iterator over the given input.
    ///
    /// Header handling is always manual (the first record is consumed by the
    /// builder when header mode is on), and records may have varying field
    /// counts; short or long rows are a per-record concern, not a parse
    /// error.
    pub(crate) fn open(
        &self,
        input: Box<dyn Read + Send>,
    ) -> StringRecordsIntoIter<Box<dyn Read + Send>> {
        ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(self.escape)
            .from_reader(input)
            .into_records()
    }
}

/// Builds one document per delimited record.
///
/// The first record is consumed as field names when header mode is on
/// (the default); otherwise field names are positional (`field_<i>`). The
/// unique id is taken from the configured field position. A configured
/// status column selects the document action by ordinal and is excluded from
/// content; unmatched status values silently leave the action at `Index`.
#[derive(Debug, Clone)]
pub struct CsvDocumentBuilder {
    format: CsvFormat,
    use_header_record: bool,
    unique_id_field: usize,
    delta_status_column: String,
    field_name_mapper: FieldNameMapper,
}

impl CsvDocumentBuilder {
    pub fn new() -> Self {
        Self {
            format: CsvFormat::default(),
            use_header_record: true,
            unique_id_field: 0,
            delta_status_column: "Delta_Status".to_string(),
            field_name_mapper: FieldNameMapper::default(),
        }
    }

    /// Use a custom record format.
    pub fn with_format(mut self, format: CsvFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether the input contains a header row, defaults to true.
    pub fn with_header_record(mut self, use_header: bool) -> Self {
        self.use_header_record = use_header;
        self
    }

    /// Which field position is considered the unique id, defaults to 0.
    pub fn with_unique_id_field(mut self, index: usize) -> Self {
        self.unique_id_field = index;
        self
    }

    /// Name of the status column, defaults to `Delta_Status`. Matched
    /// case-insensitively against field names.
    pub fn with_delta_status_column(mut self, column: impl Into<String>) -> Self {
        self.delta_status_column = column.into();
        self
    }

    /// Transform applied to output field names, defaults to identity.
    pub fn with_field_name_mapper(mut self, mapper: FieldNameMapper) -> Self {
        self.field_name_mapper = mapper;
        self
    }
}

impl Default for CsvDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for CsvDocumentBuilder {
    fn build(&self, input: Box<dyn Read + Send>) -> Result<DocumentStream, PipelineError> {
        let mut records = self.format.open(input);
        let headers = if self.use_header_record {
            read_headers(&mut records)?
        } else {
            Vec::new()
        };
        debug!(header_count = headers.len(), "Opened CSV document stream");

        Ok(Box::new(CsvDocumentIter {
            records,
            headers,
            unique_id_field: self.unique_id_field,
            delta_status_column: self.delta_status_column.clone(),
            field_name_mapper: self.field_name_mapper,
            done: false,
        }))
    }
}

struct CsvDocumentIter {
    records: StringRecordsIntoIter<Box<dyn Read + Send>>,
    headers: Vec<String>,
    unique_id_field: usize,
    delta_status_column: String,
    field_name_mapper: FieldNameMapper,
    done: bool,
}

impl CsvDocumentIter {
    fn document(&self, record: &StringRecord) -> Result<IndexDocument, PipelineError> {
        let unique_id = unique_id_from(record, self.unique_id_field)?;

        let mut action = DocumentAction::Index;
        let mut content = Map::new();
        for (i, value) in record.iter().enumerate() {
            let name = field_name(&self.headers, i);
            if name.eq_ignore_ascii_case(&self.delta_status_column) {
                // Unmatched status codes keep the current action, silently.
                if let Some(resolved) = DocumentAction::from_delta_status(value) {
                    action = resolved;
                }
                continue;
            }
            content.insert(
                self.field_name_mapper.map(&name),
                Value::String(value.to_string()),
            );
        }

        Ok(IndexDocument::with_action(unique_id, action, content))
    }
}

impl Iterator for CsvDocumentIter {
    type Item = Result<IndexDocument, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.records.next()? {
            Ok(record) => self.document(&record),
            Err(e) => Err(e.into()),
        };
        // Fail-fast: the first error terminates the sequence.
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Consume the first record of the stream as the header row.
///
/// An empty input yields an empty header set, which in turn yields an empty
/// document sequence.
pub(crate) fn read_headers(
    records: &mut StringRecordsIntoIter<Box<dyn Read + Send>>,
) -> Result<Vec<String>, PipelineError> {
    match records.next() {
        Some(Ok(record)) => Ok(record.iter().map(str::to_string).collect()),
        Some(Err(e)) => Err(e.into()),
        None => Ok(Vec::new()),
    }
}

/// Resolve the field name for a zero-based position.
pub(crate) fn field_name(headers: &[String], index: usize) -> String {
    headers
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("field_{}", index))
}

/// Extract the unique id, validating the configured position against the
/// record's field count.
pub(crate) fn unique_id_from(
    record: &StringRecord,
    index: usize,
) -> Result<String, PipelineError> {
    match record.get(index) {
        Some(value) => Ok(value.to_string()),
        None => Err(PipelineError::FieldIndexOutOfRange {
            index,
            fields: record.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(builder: &CsvDocumentBuilder, input: &str) -> DocumentStream {
        builder
            .build(Box::new(Cursor::new(input.to_string())))
            .unwrap()
    }

    #[test]
    fn test_build_with_header() {
        let builder = CsvDocumentBuilder::new();
        let docs: Vec<_> = stream(&builder, "id,val\nA,1\nB,2\n")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].unique_id, "A");
        assert_eq!(docs[0].action, DocumentAction::Index);
        // The unique-id column is emitted into content alongside the rest.
        assert!(docs[0].content.contains_key("id"));
        assert_eq!(docs[0].content["id"], "A");
        assert_eq!(docs[0].content["val"], "1");
        assert_eq!(docs[1].unique_id, "B");
        assert_eq!(docs[1].content["val"], "2");
    }

    #[test]
    fn test_build_without_header_uses_positional_names() {
        let builder = CsvDocumentBuilder::new().with_header_record(false);
        let docs: Vec<_> = stream(&builder, "A,1\nB,2\n")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content["field_0"], "A");
        assert_eq!(docs[0].content["field_1"], "1");
    }

    #[test]
    fn test_unique_id_field_selection() {
        let builder = CsvDocumentBuilder::new().with_unique_id_field(1);
        let docs: Vec<_> = stream(&builder, "id,val\nA,1\n")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs[0].unique_id, "1");
    }

    #[test]
    fn test_unique_id_field_out_of_range() {
        let builder = CsvDocumentBuilder::new().with_unique_id_field(5);
        let mut docs = stream(&builder, "id,val\nA,1\nB,2\n");

        match docs.next() {
            Some(Err(PipelineError::FieldIndexOutOfRange { index, fields })) => {
                assert_eq!(index, 5);
                assert_eq!(fields, 2);
            }
            other => panic!("expected FieldIndexOutOfRange, got {:?}", other),
        }
        // Fail-fast: nothing after the error.
        assert!(docs.next().is_none());
    }

    #[test]
    fn test_delta_status_column_sets_action_and_is_excluded() {
        let builder = CsvDocumentBuilder::new();
        let input = "id,val,Delta_Status\nA,1,0\nB,2,1\nC,3,2\nD,4,9\nE,5,bogus\n";
        let docs: Vec<_> = stream(&builder, input).collect::<Result<_, _>>().unwrap();

        let actions: Vec<_> = docs.iter().map(|d| d.action).collect();
        assert_eq!(
            actions,
            vec![
                DocumentAction::Delete,
                DocumentAction::Update,
                DocumentAction::Index,
                DocumentAction::Index,
                DocumentAction::Index,
            ]
        );
        for doc in &docs {
            assert!(!doc.content.contains_key("Delta_Status"));
        }
    }

    #[test]
    fn test_delta_status_column_matched_case_insensitively() {
        let builder = CsvDocumentBuilder::new();
        let docs: Vec<_> = stream(&builder, "id,delta_status\nA,0\n")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs[0].action, DocumentAction::Delete);
        assert!(!docs[0].content.contains_key("delta_status"));
    }

    #[test]
    fn test_parse_error_terminates_stream() {
        let builder = CsvDocumentBuilder::new();
        // Invalid UTF-8 two records in.
        let mut input = b"id,val\nA,1\n".to_vec();
        input.extend_from_slice(&[b'B', b',', 0xFF, 0xFE, b'\n']);
        input.extend_from_slice(b"C,3\n");
        let mut docs = builder.build(Box::new(Cursor::new(input))).unwrap();

        assert!(docs.next().unwrap().is_ok());
        assert!(matches!(
            docs.next(),
            Some(Err(PipelineError::ParseError(_)))
        ));
        assert!(docs.next().is_none());
    }

    #[test]
    fn test_empty_input_yields_no_documents() {
        let builder = CsvDocumentBuilder::new();
        assert_eq!(stream(&builder, "").count(), 0);
    }

    #[test]
    fn test_header_only_input_yields_no_documents() {
        let builder = CsvDocumentBuilder::new();
        assert_eq!(stream(&builder, "id,val\n").count(), 0);
    }

    #[test]
    fn test_custom_delimiter() {
        let format = CsvFormat {
            delimiter: b'\t',
            ..CsvFormat::default()
        };
        let builder = CsvDocumentBuilder::new().with_format(format);
        let docs: Vec<_> = stream(&builder, "id\tval\nA\t1\n")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs[0].content["val"], "1");
    }

    #[test]
    fn test_uppercase_field_name_mapper() {
        let builder =
            CsvDocumentBuilder::new().with_field_name_mapper(FieldNameMapper::Uppercase);
        let docs: Vec<_> = stream(&builder, "id,val\nA,1\n")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs[0].content["VAL"], "1");
        assert!(!docs[0].content.contains_key("val"));
    }
}
