// Bug Report Page
//
// The form is prefilled with the page the user came from. Submissions are
// validated here; the server logs accepted reports.

use crate::render::{attr, esc};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

pub const REPORT_SOURCE_URL_KEY: &str = "report_source_url";
pub const REPORT_SOURCE_TITLE_KEY: &str = "report_source_title";

pub const MISSING_FIELDS_MESSAGE: &str = "Jenis laporan dan deskripsi wajib diisi.";
pub const SUCCESS_MESSAGE: &str = "Laporan berhasil dikirim! Terima kasih atas masukannya.";

const REPORT_TYPES: &[(&str, &str)] = &[
    ("bug", "Bug / Error Aplikasi"),
    ("suggestion", "Saran Fitur Baru"),
    ("content", "Masalah Konten (Anime/Episode)"),
    ("other", "Lainnya"),
];

/// Page the report is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSource {
    pub url: String,
    pub title: String,
}

/// Raw form fields as posted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct AcceptedReport {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub report_type: String,
    pub page_title: String,
    pub page_url: String,
    pub description: String,
    pub email: Option<String>,
}

impl ReportSubmission {
    /// Type and description are required; the email is optional.
    pub fn validate(self) -> Result<AcceptedReport, &'static str> {
        let report_type = self.report_type.trim();
        let description = self.description.trim();
        if report_type.is_empty() || description.is_empty() {
            return Err(MISSING_FIELDS_MESSAGE);
        }

        let email = Some(self.email.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Ok(AcceptedReport {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            report_type: report_type.to_string(),
            page_title: self.page_title.trim().to_string(),
            page_url: self.page_url.trim().to_string(),
            description: description.to_string(),
            email,
        })
    }

    fn source(&self) -> ReportSource {
        ReportSource {
            url: self.page_url.clone(),
            title: self.page_title.clone(),
        }
    }
}

/// Message shown under the form after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportNotice {
    Sent,
    Rejected(String),
}

/// Render the form. `notice` carries the outcome of a submission, if any.
pub fn render(source: &ReportSource, notice: Option<&ReportNotice>) -> String {
    let options: String = REPORT_TYPES
        .iter()
        .map(|(value, label)| format!(r#"<option value="{}">{}</option>"#, value, label))
        .collect();

    let message = match notice {
        Some(ReportNotice::Sent) => format!(r#"<p class="success">{}</p>"#, SUCCESS_MESSAGE),
        Some(ReportNotice::Rejected(reason)) => format!(r#"<p class="error">{}</p>"#, esc(reason)),
        None => String::new(),
    };

    format!(
        concat!(
            r#"<div class="report-page"><div class="report-container">"#,
            r#"<h1 class="page-title">Lapor Bug atau Beri Saran</h1>"#,
            r#"<p class="report-intro">Kami sangat menghargai masukan Anda! Silakan laporkan bug, error, "#,
            "atau berikan saran untuk membuat NontonAnime lebih baik.</p>",
            r#"<form id="bugReportForm" class="report-form" method="post" action="/report">"#,
            r#"<div class="form-group"><label for="reportType">Jenis Laporan:</label>"#,
            r#"<select id="reportType" name="reportType" required><option value="">-- Pilih Jenis --</option>{}</select></div>"#,
            r#"<div class="form-group"><label for="pageTitle">Halaman yang Bermasalah:</label>"#,
            r#"<input type="text" id="pageTitle" name="pageTitle" value="{}" readonly></div>"#,
            r#"<div class="form-group"><label for="pageUrl">URL Halaman Saat Ini:</label>"#,
            r#"<input type="url" id="pageUrl" name="pageUrl" value="{}" readonly></div>"#,
            r#"<div class="form-group"><label for="description">Deskripsi Lengkap:</label>"#,
            r#"<textarea id="description" name="description" rows="6" required></textarea></div>"#,
            r#"<div class="form-group"><label for="email">Email Anda (Opsional, jika ingin balasan):</label>"#,
            r#"<input type="email" id="email" name="email" placeholder="contoh@email.com"></div>"#,
            r#"<button type="submit" class="btn btn-submit">Kirim Laporan</button>"#,
            r#"<div id="formMessage" class="form-message">{}</div></form></div></div>"#
        ),
        options,
        attr(&source.title),
        attr(&source.url),
        message
    )
}

/// Re-render the form for a rejected submission, keeping its source fields.
pub fn render_rejected(submission: &ReportSubmission, reason: &str) -> String {
    render(&submission.source(), Some(&ReportNotice::Rejected(reason.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(report_type: &str, description: &str) -> ReportSubmission {
        ReportSubmission {
            report_type: report_type.to_string(),
            page_title: "Beranda - NontonAnime".to_string(),
            page_url: "/".to_string(),
            description: description.to_string(),
            email: "  ".to_string(),
        }
    }

    #[test]
    fn test_validate_requires_type_and_description() {
        assert_eq!(submission("", "rusak").validate().unwrap_err(), MISSING_FIELDS_MESSAGE);
        assert_eq!(submission("bug", "   ").validate().unwrap_err(), MISSING_FIELDS_MESSAGE);

        let accepted = submission("bug", " video tidak jalan ").validate().unwrap();
        assert_eq!(accepted.description, "video tidak jalan");
        assert_eq!(accepted.email, None);
    }

    #[test]
    fn test_form_prefilled_and_escaped() {
        let source = ReportSource {
            url: "/anime/x?episode_page=2".to_string(),
            title: "Detail \"Anime\" - NontonAnime".to_string(),
        };
        let html = render(&source, None);
        assert!(html.contains(r#"value="/anime/x?episode_page=2""#));
        assert!(html.contains("Detail &quot;Anime&quot; - NontonAnime"));
        assert!(html.contains(r#"<option value="content">"#));
    }

    #[test]
    fn test_notices() {
        let sent = render(&ReportSource::default(), Some(&ReportNotice::Sent));
        assert!(sent.contains(SUCCESS_MESSAGE));

        let rejected = render_rejected(&submission("", ""), MISSING_FIELDS_MESSAGE);
        assert!(rejected.contains(r#"<p class="error">Jenis laporan dan deskripsi wajib diisi.</p>"#));
        assert!(rejected.contains(r#"value="Beranda - NontonAnime""#));
    }
}
