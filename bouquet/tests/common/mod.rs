#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bouquet::error::{BouquetError, Result};
use bouquet::llm::{ChatMessage, TextGenerator};
use bouquet::transcription::Transcriber;

/// Build a minimal PDF with one text line per page, Helvetica, real xref.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let font_id = 3 + page_count * 2;

    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", 3 + i * 2))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"
    ));

    for (i, text) in pages.iter().enumerate() {
        let contents_id = 4 + i * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {contents_id} 0 R >>"
        ));
        let stream = format!("BT /F1 18 Tf 72 720 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));

    pdf.into_bytes()
}

pub fn sample_docx() -> Vec<u8> {
    use docx_rs::*;

    let docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Vendor contacts").bold()))
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("Florist arrives at 10am.")),
        )
        .add_table(Table::new(vec![
            TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("DJ"))),
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text("555-0100"))),
            ]),
            TableRow::new(vec![
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Caterer"))),
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text("555-0199"))),
            ]),
        ]));

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

pub fn sample_csv() -> &'static [u8] {
    b"Time,Event,Location\n3:30pm,Guests arrive,Garden\n4:00pm,Ceremony,Garden\n6:00pm,Dinner,Ballroom\n"
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Transcriber that returns a fixed transcript for every clip.
pub struct FixedTranscriber(pub &'static str);

#[async_trait]
impl Transcriber for FixedTranscriber {
    fn is_available(&self) -> bool {
        true
    }

    async fn transcribe(&self, _audio: &Path) -> Result<String> {
        Ok(self.0.to_string())
    }
}

pub struct NoTranscriber;

#[async_trait]
impl Transcriber for NoTranscriber {
    fn is_available(&self) -> bool {
        false
    }

    async fn transcribe(&self, _audio: &Path) -> Result<String> {
        Err(BouquetError::TranscriptionUnavailable(
            "not configured".to_string(),
        ))
    }
}

/// Generator that records every call and answers with a canned reply.
#[derive(Clone)]
pub struct RecordingGenerator {
    reply: String,
    pub calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> String {
        let calls = self.calls.lock().unwrap();
        calls
            .last()
            .and_then(|messages| messages.last())
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String> {
        Err(BouquetError::Generation("provider exploded".to_string()))
    }
}
