//! Static project bundle.
//!
//! Packages a dependency-free copy of the name display (HTML shell,
//! stylesheet, plain-DOM script) plus a personalized README into
//! `heartify-project.zip`. The bundled script cannot export images; its
//! download button says so.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportResult;
use crate::export::ExportArtifact;

/// Download name of the project archive.
pub const PROJECT_ARCHIVE_NAME: &str = "heartify-project.zip";

/// README text used in place of a blank first name.
pub const FIRST_NAME_PLACEHOLDER: &str = "Your First Name";
/// README text used in place of a blank second name.
pub const SECOND_NAME_PLACEHOLDER: &str = "Your Second Name";

const README_TEMPLATE: &str = include_str!("../assets/bundle/README.md");
const INDEX_HTML: &str = include_str!("../assets/bundle/index.html");
const INDEX_CSS: &str = include_str!("../assets/bundle/index.css");
const MAIN_JS: &str = include_str!("../assets/bundle/main.js");

/// One file inside the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// Archive-relative path with forward slashes.
    pub path: &'static str,
    pub contents: String,
}

/// The files making up a project export.
#[derive(Debug, Clone)]
pub struct ProjectBundle {
    files: Vec<BundleFile>,
}

impl ProjectBundle {
    /// Assemble the bundle, personalizing the README with the trimmed names
    /// or placeholders when blank.
    pub fn for_names(first: &str, second: &str) -> Self {
        let first = non_blank_or(first, FIRST_NAME_PLACEHOLDER);
        let second = non_blank_or(second, SECOND_NAME_PLACEHOLDER);

        let readme = fill_template(
            README_TEMPLATE,
            &[("{{first_name}}", first), ("{{second_name}}", second)],
        );

        let files = vec![
            BundleFile {
                path: "README.md",
                contents: readme,
            },
            BundleFile {
                path: "index.html",
                contents: INDEX_HTML.to_string(),
            },
            BundleFile {
                path: "src/index.css",
                contents: INDEX_CSS.to_string(),
            },
            BundleFile {
                path: "src/main.js",
                contents: MAIN_JS.to_string(),
            },
        ];

        Self { files }
    }

    pub fn files(&self) -> &[BundleFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&BundleFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Deflate every file into a ZIP archive.
    pub fn to_archive(&self) -> ExportResult<ExportArtifact> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for file in &self.files {
            writer.start_file(file.path, options)?;
            writer.write_all(file.contents.as_bytes())?;
        }
        let bytes = writer.finish()?.into_inner();

        tracing::info!(
            file = PROJECT_ARCHIVE_NAME,
            entries = self.files.len(),
            bytes = bytes.len(),
            "Project bundle archived"
        );
        Ok(ExportArtifact::zip(PROJECT_ARCHIVE_NAME, bytes))
    }
}

/// Build `heartify-project.zip` for the given (possibly blank) names.
pub fn build_project_archive(first: &str, second: &str) -> ExportResult<ExportArtifact> {
    ProjectBundle::for_names(first, second).to_archive()
}

/// Replace every placeholder in one left-to-right pass, so substituted
/// values are never scanned again.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push_str("{{");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
