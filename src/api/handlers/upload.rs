use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde::{Deserialize, Serialize};

/// One uploaded file. Contents are accepted but never parsed; only the
/// filename drives the response.
#[derive(Deserialize)]
pub struct UploadedFile {
    pub filename: String,

    /// Base64 file contents, ignored beyond a size report
    pub contents: Option<String>,
}

/// Request for the upload endpoint
#[derive(Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadedFile>,
}

/// Per-file upload result
#[derive(Serialize)]
struct UploadResult {
    filename: String,
    message: String,
}

/// Response for the upload endpoint
#[derive(Serialize)]
struct UploadResponse {
    results: Vec<UploadResult>,
}

/// Classify a file purely by filename substring.
fn classify(file: &UploadedFile) -> String {
    let size_note = file
        .contents
        .as_ref()
        .map(|c| format!(" ({} bytes received)", c.len()))
        .unwrap_or_default();

    if file.filename.contains("pcap") {
        format!("Processing PCAP file: {}{}", file.filename, size_note)
    } else if file.filename.contains("log") {
        format!("Processing log file: {}{}", file.filename, size_note)
    } else {
        format!("Error processing file: unsupported file type: {}", file.filename)
    }
}

/// Accept uploaded capture files.
///
/// No actual parsing occurs; each file gets a canned message based on
/// whether its name contains "pcap" or "log".
pub async fn upload(request: web::Json<UploadRequest>) -> impl Responder {
    let results: Vec<UploadResult> = request
        .files
        .iter()
        .map(|file| {
            info!("Upload received: {}", file.filename);
            UploadResult {
                filename: file.filename.clone(),
                message: classify(file),
            }
        })
        .collect();

    HttpResponse::Ok().json(UploadResponse { results })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(filename: &str) -> UploadedFile {
        UploadedFile {
            filename: filename.to_string(),
            contents: None,
        }
    }

    #[test]
    fn classification_depends_only_on_the_filename() {
        assert!(classify(&file("capture.pcap")).starts_with("Processing PCAP file"));
        assert!(classify(&file("old.pcapng")).starts_with("Processing PCAP file"));
        assert!(classify(&file("system.log")).starts_with("Processing log file"));
        assert!(classify(&file("notes.txt")).starts_with("Error processing file"));
    }

    #[test]
    fn contents_only_affect_the_size_note() {
        let with_contents = UploadedFile {
            filename: "trace.pcap".to_string(),
            contents: Some("AAAA".to_string()),
        };

        let message = classify(&with_contents);
        assert!(message.contains("4 bytes received"));
    }
}
