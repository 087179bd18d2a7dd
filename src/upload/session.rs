use crate::format::format_file_size;
use crate::listeners::{ListenerId, Listeners};
use crate::validators::file_extension;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MAX_FILE_SIZE: f64 = 10.0 * 1024.0 * 1024.0;

/// Anything that can be selected for upload.
pub trait UploadCandidate {
    fn name(&self) -> String;
    /// Size in bytes.
    fn size(&self) -> f64;
}

impl UploadCandidate for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn size(&self) -> f64 {
        web_sys::Blob::size(self)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadOptions {
    /// Accepted extensions, dot included, e.g. `.csv`.
    pub allowed_types: Vec<String>,
    /// Maximum size in bytes.
    pub max_file_size: f64,
    pub multiple: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            allowed_types: vec![".csv".to_owned(), ".xlsx".to_owned(), ".xls".to_owned()],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            multiple: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UploadRejection {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("File exceeds size limit: {}", format_file_size(*max_file_size))]
    TooLarge { max_file_size: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UploadEvent {
    FileAdded { name: String },
    FileRemoved { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Excel,
    Data,
}

impl FileKind {
    pub fn from_name(file_name: &str) -> Self {
        match file_extension(file_name).as_str() {
            "csv" => FileKind::Csv,
            "xlsx" | "xls" => FileKind::Excel,
            _ => FileKind::Data,
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            FileKind::Csv => "fa-file-csv",
            FileKind::Excel => "fa-file-excel",
            FileKind::Data => "fa-file-alt",
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FileKind::Csv => "CSV file",
            FileKind::Excel => "Excel file",
            FileKind::Data => "Data file",
        }
    }
}

/// What the page shows about a selected file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub name: String,
    pub kind: FileKind,
    /// e.g. `1.5 KB • CSV file`
    pub details: String,
}

impl FileSummary {
    pub fn of(file: &impl UploadCandidate) -> Self {
        let name = file.name();
        let kind = FileKind::from_name(&name);
        let details = format!("{} • {}", format_file_size(file.size()), kind.type_name());
        Self {
            name,
            kind,
            details,
        }
    }
}

pub trait UploadView {
    fn show_file(&self, summary: &FileSummary);
    fn show_drop_zone(&self);
    fn show_rejection(&self, rejection: &UploadRejection);
}

pub struct UploadSession<F: UploadCandidate, V: UploadView> {
    files: Vec<F>,
    options: UploadOptions,
    view: V,
    listeners: Listeners<UploadEvent>,
}

impl<F: UploadCandidate, V: UploadView> UploadSession<F, V> {
    pub fn new(options: UploadOptions, view: V) -> Self {
        Self {
            files: vec![],
            options,
            view,
            listeners: Listeners::default(),
        }
    }

    pub fn files(&self) -> &[F] {
        &self.files
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Check the extension first, then the size.
    pub fn validate_file(&self, file: &F) -> Result<(), UploadRejection> {
        let extension = format!(".{}", file_extension(&file.name()));
        let allowed = self
            .options
            .allowed_types
            .iter()
            .any(|allowed_type| allowed_type.to_lowercase() == extension);
        if !allowed {
            return Err(UploadRejection::UnsupportedType(extension));
        }

        if file.size() > self.options.max_file_size {
            return Err(UploadRejection::TooLarge {
                max_file_size: self.options.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate then add every file on its own. Returns how many were added.
    pub fn process_files(&mut self, files: impl IntoIterator<Item = F>) -> usize {
        let mut added = 0;
        for file in files {
            match self.validate_file(&file) {
                Ok(()) => {
                    self.add_file(file);
                    added += 1;
                }
                Err(rejection) => {
                    log::warn!("Rejected `{}`: {rejection}", file.name());
                    self.view.show_rejection(&rejection);
                }
            }
        }
        added
    }

    /// Select `file`, replacing the current selection unless several files are allowed.
    pub fn add_file(&mut self, file: F) {
        if !self.options.multiple {
            self.files.clear();
        }
        let summary = FileSummary::of(&file);
        self.files.push(file);
        self.view.show_file(&summary);
        log::info!("File added: {}", summary.name);
        self.listeners
            .notify(&UploadEvent::FileAdded { name: summary.name });
    }

    pub fn remove_file(&mut self, index: usize) -> Option<F> {
        if index >= self.files.len() {
            return None;
        }
        let file = self.files.remove(index);
        if self.files.is_empty() {
            self.view.show_drop_zone();
        }
        log::info!("File removed at index {index}");
        self.listeners.notify(&UploadEvent::FileRemoved { index });
        Some(file)
    }

    pub fn subscribe(&mut self, listener: impl Fn(&UploadEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::{ide, parameterized};
    use std::cell::RefCell;
    use std::rc::Rc;

    ide!();

    #[derive(Debug, Clone, PartialEq)]
    struct TestFile {
        name: &'static str,
        size: f64,
    }

    impl UploadCandidate for TestFile {
        fn name(&self) -> String {
            self.name.to_owned()
        }

        fn size(&self) -> f64 {
            self.size
        }
    }

    fn file(name: &'static str, size: f64) -> TestFile {
        TestFile { name, size }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ViewCall {
        File(FileSummary),
        DropZone,
        Rejection(String),
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        calls: Rc<RefCell<Vec<ViewCall>>>,
    }

    impl UploadView for RecordingView {
        fn show_file(&self, summary: &FileSummary) {
            self.calls.borrow_mut().push(ViewCall::File(summary.clone()));
        }

        fn show_drop_zone(&self) {
            self.calls.borrow_mut().push(ViewCall::DropZone);
        }

        fn show_rejection(&self, rejection: &UploadRejection) {
            self.calls
                .borrow_mut()
                .push(ViewCall::Rejection(rejection.to_string()));
        }
    }

    fn session(options: UploadOptions) -> UploadSession<TestFile, RecordingView> {
        UploadSession::new(options, RecordingView::default())
    }

    #[parameterized(
        name = { "members.csv", "MEMBERS.CSV", "report.xlsx", "old.xls", "notes.txt", "archive.tar.gz", "README" },
        size = { 1024.0, 1024.0, 1024.0, 1024.0, 1024.0, 1024.0, 1024.0 },
        expected = {
            Ok(()),
            Ok(()),
            Ok(()),
            Ok(()),
            Err(UploadRejection::UnsupportedType(".txt".to_owned())),
            Err(UploadRejection::UnsupportedType(".gz".to_owned())),
            Err(UploadRejection::UnsupportedType(".readme".to_owned())),
        }
    )]
    fn should_validate_extension(
        name: &'static str,
        size: f64,
        expected: Result<(), UploadRejection>,
    ) {
        assert_eq!(expected, session(UploadOptions::default()).validate_file(&file(name, size)));
    }

    #[test]
    fn should_compare_allowed_types_case_insensitively() {
        let session = session(UploadOptions {
            allowed_types: vec![".JSON".to_owned()],
            ..Default::default()
        });
        assert_eq!(Ok(()), session.validate_file(&file("data.json", 10.0)));
    }

    #[parameterized(
        size = { 0.0, 10485760.0, 10485761.0 },
        expected = {
            Ok(()),
            Ok(()),
            Err(UploadRejection::TooLarge { max_file_size: 10485760.0 }),
        }
    )]
    fn should_validate_size(size: f64, expected: Result<(), UploadRejection>) {
        assert_eq!(expected, session(UploadOptions::default()).validate_file(&file("a.csv", size)));
    }

    #[test]
    fn should_check_type_before_size() {
        assert_eq!(
            Err(UploadRejection::UnsupportedType(".exe".to_owned())),
            session(UploadOptions::default()).validate_file(&file("setup.exe", 1e12))
        );
    }

    #[test]
    fn should_describe_rejections() {
        assert_eq!(
            "Unsupported file type: .txt",
            UploadRejection::UnsupportedType(".txt".to_owned()).to_string()
        );
        assert_eq!(
            "File exceeds size limit: 10 MB",
            UploadRejection::TooLarge {
                max_file_size: DEFAULT_MAX_FILE_SIZE
            }
            .to_string()
        );
    }

    #[parameterized(
        name = { "a.csv", "b.XLSX", "c.xls", "d.json" },
        expected = {
            (FileKind::Csv, "fa-file-csv", "CSV file"),
            (FileKind::Excel, "fa-file-excel", "Excel file"),
            (FileKind::Excel, "fa-file-excel", "Excel file"),
            (FileKind::Data, "fa-file-alt", "Data file"),
        }
    )]
    fn should_find_file_kind(name: &str, expected: (FileKind, &str, &str)) {
        let kind = FileKind::from_name(name);
        assert_eq!(expected, (kind, kind.icon_class(), kind.type_name()));
    }

    #[test]
    fn should_keep_only_last_file_in_single_mode() {
        let mut session = session(UploadOptions::default());

        session.add_file(file("first.csv", 10.0));
        session.add_file(file("second.csv", 1536.0));

        assert_eq!(&[file("second.csv", 1536.0)], session.files());
        assert_eq!(
            Some(&ViewCall::File(FileSummary {
                name: "second.csv".to_owned(),
                kind: FileKind::Csv,
                details: "1.5 KB • CSV file".to_owned(),
            })),
            session.view().calls.borrow().last()
        );
    }

    #[test]
    fn should_append_files_in_multiple_mode() {
        let mut session = session(UploadOptions {
            multiple: true,
            ..Default::default()
        });

        session.add_file(file("first.csv", 10.0));
        session.add_file(file("second.csv", 10.0));

        assert_eq!(2, session.files().len());
    }

    #[test]
    fn should_only_add_valid_files() {
        let mut session = session(UploadOptions {
            multiple: true,
            ..Default::default()
        });

        let added = session.process_files(vec![
            file("ok.csv", 10.0),
            file("bad.pdf", 10.0),
            file("huge.xlsx", 1e9),
            file("ok.xls", 10.0),
        ]);

        assert_eq!(2, added);
        assert_eq!(
            vec!["ok.csv", "ok.xls"],
            session.files().iter().map(|file| file.name).collect::<Vec<_>>()
        );
        let rejections = session
            .view()
            .calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, ViewCall::Rejection(_)))
            .count();
        assert_eq!(2, rejections);
    }

    #[test]
    fn should_restore_drop_zone_once_empty() {
        let mut session = session(UploadOptions {
            multiple: true,
            ..Default::default()
        });
        session.add_file(file("a.csv", 10.0));
        session.add_file(file("b.csv", 10.0));

        assert_eq!(Some(file("a.csv", 10.0)), session.remove_file(0));
        assert_ne!(Some(&ViewCall::DropZone), session.view().calls.borrow().last());

        assert_eq!(None, session.remove_file(3));
        assert_eq!(Some(file("b.csv", 10.0)), session.remove_file(0));
        assert_eq!(Some(&ViewCall::DropZone), session.view().calls.borrow().last());
    }

    #[test]
    fn should_notify_listeners() {
        let mut session = session(UploadOptions::default());
        let events = Rc::new(RefCell::new(vec![]));
        let recorded = events.clone();
        let id = session.subscribe(move |event| recorded.borrow_mut().push(event.clone()));

        session.process_files(vec![file("a.csv", 10.0), file("b.txt", 10.0)]);
        session.remove_file(0);
        session.remove_file(0);
        assert!(session.unsubscribe(id));
        session.add_file(file("c.csv", 10.0));

        assert_eq!(
            vec![
                UploadEvent::FileAdded {
                    name: "a.csv".to_owned()
                },
                UploadEvent::FileRemoved { index: 0 },
            ],
            *events.borrow()
        );
    }
}
