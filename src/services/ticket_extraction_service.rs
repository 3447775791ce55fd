use regex::Regex;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::models::ticket::{TicketRecord, TicketTable, UploadedTicket};
use crate::services::llm_service::{CompletionModel, CompletionOptions, LlmError};
use crate::services::pdf_text_service::{PdfTextError, TextExtractor};
use crate::services::prompt_templates::ticket_prompt;

// first single-level {...} in the completion
const JSON_OBJECT_PATTERN: &str = r"\{([^{}]*)\}";

#[derive(Debug)]
pub enum TicketExtractionError {
    PdfError { file_name: String, source: PdfTextError },
    LlmError(LlmError),
}

impl fmt::Display for TicketExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketExtractionError::PdfError { file_name, source } => {
                write!(f, "{}: {}", file_name, source)
            }
            TicketExtractionError::LlmError(err) => write!(f, "Ticket extraction failed: {}", err),
        }
    }
}

impl Error for TicketExtractionError {}

impl From<LlmError> for TicketExtractionError {
    fn from(err: LlmError) -> Self {
        TicketExtractionError::LlmError(err)
    }
}

#[derive(Debug)]
pub enum TicketParse {
    Record(TicketRecord),
    NoJson,
    Invalid(serde_json::Error),
}

pub struct TicketExtractor {
    llm: Arc<dyn CompletionModel>,
    text_extractor: Arc<dyn TextExtractor>,
    json_object: Regex,
}

impl TicketExtractor {
    pub fn new(llm: Arc<dyn CompletionModel>, text_extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            llm,
            text_extractor,
            json_object: Regex::new(JSON_OBJECT_PATTERN).expect("ticket JSON pattern is valid"),
        }
    }

    /// Builds one row per upload that the model answered with a parsable object.
    ///
    /// Files are handled one after another. An answer without any `{...}` aborts the
    /// whole batch and yields an empty table; an answer whose object is not valid JSON
    /// only drops that file.
    pub async fn create_table(
        &self,
        uploads: &[UploadedTicket],
        days: u32,
    ) -> Result<TicketTable, TicketExtractionError> {
        let mut table = TicketTable::default();

        for upload in uploads {
            log::info!("Extracting ticket fields from {}", upload.file_name);

            let text = self
                .text_extractor
                .extract_text(&upload.bytes)
                .await
                .map_err(|source| TicketExtractionError::PdfError {
                    file_name: upload.file_name.clone(),
                    source,
                })?;

            let prompt = ticket_prompt(&text);
            let completion = self
                .llm
                .complete(&prompt, CompletionOptions::default())
                .await?;

            match self.parse_ticket(&completion, days) {
                TicketParse::Record(record) => table.rows.push(record),
                TicketParse::NoJson => {
                    log::warn!(
                        "No JSON found in the answer for {}, discarding the batch",
                        upload.file_name
                    );
                    return Ok(TicketTable::default());
                }
                TicketParse::Invalid(err) => {
                    log::warn!("Error while parsing answer for {}: {}", upload.file_name, err);
                }
            }
        }

        Ok(table)
    }

    pub fn parse_ticket(&self, completion: &str, days: u32) -> TicketParse {
        let captures = match self.json_object.captures(completion) {
            Some(captures) => captures,
            None => return TicketParse::NoJson,
        };

        let json_string = format!("{{{}}}", &captures[1]);
        log::debug!("Ticket JSON: {}", json_string);

        match serde_json::from_str::<TicketRecord>(&json_string) {
            Ok(mut record) => {
                record.days = days;
                TicketParse::Record(record)
            }
            Err(err) => TicketParse::Invalid(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct Utf8Text;

    impl TextExtractor for Utf8Text {
        fn extract_text<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, Result<String, PdfTextError>> {
            let text = String::from_utf8_lossy(bytes).to_string();
            async move { Ok(text) }.boxed()
        }
    }

    struct ScriptedModel {
        answers: Mutex<VecDeque<String>>,
    }

    impl ScriptedModel {
        fn new(answers: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            })
        }
    }

    impl CompletionModel for ScriptedModel {
        fn complete<'a>(
            &'a self,
            _prompt: &'a str,
            _options: CompletionOptions,
        ) -> BoxFuture<'a, Result<String, LlmError>> {
            let answer = self.answers.lock().unwrap().pop_front();
            async move { answer.ok_or(LlmError::EmptyCompletion) }.boxed()
        }
    }

    fn upload(name: &str) -> UploadedTicket {
        UploadedTicket {
            file_name: name.to_string(),
            bytes: b"ticket".to_vec(),
        }
    }

    const TICKET: &str = r#"{"Full Name":"A B","Depart":"X","Date of Depart":"1 Jan 2024","Arrive":"Y","Date of Arrive":"2 Jan 2024"}"#;

    #[test]
    fn test_full_ticket_is_recovered_with_days() {
        let extractor = TicketExtractor::new(ScriptedModel::new(&[TICKET]), Arc::new(Utf8Text));
        let table = tokio_test::block_on(extractor.create_table(&[upload("a.pdf")], 3)).unwrap();

        assert_eq!(
            table.rows,
            vec![TicketRecord {
                full_name: "A B".to_string(),
                depart: "X".to_string(),
                date_of_depart: "1 Jan 2024".to_string(),
                arrive: "Y".to_string(),
                date_of_arrive: "2 Jan 2024".to_string(),
                days: 3,
            }]
        );
    }

    #[test]
    fn test_object_is_found_inside_chatter() {
        let answer = format!("Sure! Here is the data:\n```json\n{}\n```\nAnything else?", TICKET);
        let extractor = TicketExtractor::new(ScriptedModel::new(&[]), Arc::new(Utf8Text));

        match extractor.parse_ticket(&answer, 1) {
            TicketParse::Record(record) => assert_eq!(record.arrive, "Y"),
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_skips_only_that_file() {
        let model = ScriptedModel::new(&[r#"{"Full Name": Jane}"#, TICKET]);
        let extractor = TicketExtractor::new(model, Arc::new(Utf8Text));
        let table = tokio_test::block_on(
            extractor.create_table(&[upload("bad.pdf"), upload("good.pdf")], 2),
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].full_name, "A B");
    }

    #[test]
    fn test_missing_json_discards_the_batch() {
        let model = ScriptedModel::new(&[TICKET, "I could not find any ticket."]);
        let extractor = TicketExtractor::new(model, Arc::new(Utf8Text));
        let table = tokio_test::block_on(
            extractor.create_table(&[upload("first.pdf"), upload("second.pdf")], 2),
        )
        .unwrap();

        assert!(table.is_empty());
    }

    #[test]
    fn test_nested_braces_are_not_matched_as_one_object() {
        let extractor = TicketExtractor::new(ScriptedModel::new(&[]), Arc::new(Utf8Text));
        let parsed = extractor.parse_ticket(r#"{"outer": {"Full Name": "Inner"}}"#, 1);

        // the innermost object is the first single-level match
        match parsed {
            TicketParse::Record(record) => assert_eq!(record.full_name, "Inner"),
            other => panic!("expected a record, got {:?}", other),
        }
    }
}
