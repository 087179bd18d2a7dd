use crate::Result;
use crate::component::alert::{AlertLevel, create_alert, unwrap_or_alert};
use crate::upload::session::{
    FileSummary, UploadOptions, UploadRejection, UploadSession, UploadView,
};
use crate::utils::{
    add_class, add_event_handler, create_element_with_class, get_document, query_document_optional,
    query_selector_all, query_selector_optional, remove_class, set_visible,
};
use js_sys::{Array, Function};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, DragEvent, Element, Event, File, FileList, HtmlElement, HtmlInputElement};

const DRAG_OVER_CLASS: &str = "dragover";
const SHOW_CLASS: &str = "show";

type SharedSession = Rc<RefCell<UploadSession<File, DomUploadView>>>;

/// The drop zone (`.upload-box`) and the selected file panel (`.file-info`) of a page.
pub struct DomUploadView {
    document: Document,
}

impl DomUploadView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn try_show_file(&self, summary: &FileSummary) -> Result<()> {
        if let Some(upload_box) = query_document_optional(&self.document, ".upload-box") {
            set_visible(&upload_box, false);
        }
        let Some(file_info) = query_document_optional(&self.document, ".file-info") else {
            return Ok(());
        };
        add_class(&file_info, SHOW_CLASS);

        if let Some(file_icon) = query_selector_optional(&file_info, ".file-icon") {
            file_icon.set_inner_html("");
            create_element_with_class(
                &self.document,
                "i",
                Some(&file_icon),
                None,
                &format!("fas {}", summary.kind.icon_class()),
            )?;
        }
        if let Some(file_name) = query_selector_optional(&file_info, ".file-details-info h5") {
            file_name.set_text_content(Some(&summary.name));
        }
        if let Some(file_details) = query_selector_optional(&file_info, ".file-details-info p") {
            file_details.set_text_content(Some(&summary.details));
        }
        Ok(())
    }
}

impl UploadView for DomUploadView {
    fn show_file(&self, summary: &FileSummary) {
        unwrap_or_alert(self.try_show_file(summary));
    }

    fn show_drop_zone(&self) {
        if let Some(upload_box) = query_document_optional(&self.document, ".upload-box") {
            set_visible(&upload_box, true);
        }
        if let Some(file_info) = query_document_optional(&self.document, ".file-info") {
            remove_class(&file_info, SHOW_CLASS);
        }
    }

    fn show_rejection(&self, rejection: &UploadRejection) {
        create_alert(&rejection.to_string(), AlertLevel::Error);
    }
}

/// File selection by drag and drop or file picker, bound to the current page.
#[wasm_bindgen]
pub struct FileUpload {
    session: SharedSession,
}

#[wasm_bindgen]
impl FileUpload {
    /// `options` follows `{ allowedTypes, maxFileSize, multiple }`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<FileUpload, JsValue> {
        let options = if options.is_undefined() || options.is_null() {
            UploadOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let document = get_document().map_err(|error| JsValue::from_str(error.msg()))?;
        let session = UploadSession::new(options, DomUploadView::new(document.clone()));
        let upload = FileUpload {
            session: Rc::new(RefCell::new(session)),
        };
        unwrap_or_alert(upload.bind_events(&document));
        Ok(upload)
    }

    /// Validate and add `files`. Returns how many were added.
    pub fn process_files(&self, files: FileList) -> usize {
        process_file_list(&self.session, &files)
    }

    pub fn files(&self) -> Array {
        self.session
            .borrow()
            .files()
            .iter()
            .map(|file| JsValue::from(file.clone()))
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.session.borrow().files().len()
    }

    pub fn remove_file(&self, index: usize) -> bool {
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.remove_file(index).is_some(),
            Err(_) => {
                log::warn!("Upload is busy, ignoring removal");
                false
            }
        }
    }

    /// Call `listener` with `{type: "fileAdded", name}` or `{type: "fileRemoved", index}`.
    pub fn subscribe(&self, listener: Function) -> u32 {
        let id = self.session.borrow_mut().subscribe(move |event| {
            let listener = listener.clone();
            let event = event
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .unwrap_or(JsValue::NULL);
            // Deferred so that the listener may use the upload itself.
            spawn_local(async move {
                if let Err(error) = listener.call1(&JsValue::NULL, &event) {
                    log::error!("Upload listener failed: {error:?}");
                }
            });
        });
        id.into()
    }

    pub fn unsubscribe(&self, id: u32) -> bool {
        self.session.borrow_mut().unsubscribe(id.into())
    }
}

impl FileUpload {
    fn bind_events(&self, document: &Document) -> Result<()> {
        for upload_box in query_selector_all(document, ".upload-box") {
            bind_drop_zone(&upload_box, &self.session)?;
        }

        for input in query_selector_all(document, "input[type=\"file\"]") {
            let session = self.session.clone();
            add_event_handler(&input, "change", move |event: Event| {
                let files = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                    .and_then(|input| input.files());
                if let Some(files) = files {
                    process_file_list(&session, &files);
                }
            })?;
        }
        Ok(())
    }
}

fn bind_drop_zone(upload_box: &Element, session: &SharedSession) -> Result<()> {
    let target = upload_box.clone();
    add_event_handler(upload_box, "dragover", move |event: DragEvent| {
        event.prevent_default();
        add_class(&target, DRAG_OVER_CLASS);
    })?;

    let target = upload_box.clone();
    add_event_handler(upload_box, "dragleave", move |event: DragEvent| {
        event.prevent_default();
        remove_class(&target, DRAG_OVER_CLASS);
    })?;

    let target = upload_box.clone();
    let session = session.clone();
    add_event_handler(upload_box, "drop", move |event: DragEvent| {
        event.prevent_default();
        remove_class(&target, DRAG_OVER_CLASS);
        if let Some(files) = event.data_transfer().and_then(|transfer| transfer.files()) {
            process_file_list(&session, &files);
        }
    })?;

    let target = upload_box.clone();
    add_event_handler(upload_box, "click", move |event: Event| {
        // Clicks bubbling up from the input itself must not reopen the picker.
        let from_input = event
            .target()
            .is_some_and(|origin| origin.dyn_ref::<HtmlInputElement>().is_some());
        if from_input {
            return;
        }
        if let Some(input) = query_selector_optional(&target, "input[type=\"file\"]")
            .and_then(|input| input.dyn_into::<HtmlElement>().ok())
        {
            input.click();
        }
    })?;
    Ok(())
}

fn process_file_list(session: &SharedSession, files: &FileList) -> usize {
    let files = (0..files.length()).filter_map(|index| files.get(index));
    match session.try_borrow_mut() {
        Ok(mut session) => session.process_files(files),
        Err(_) => {
            log::warn!("Upload is busy, ignoring files");
            0
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::upload::session::FileKind;
    use crate::utils::{get_body, has_class};
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn should_show_and_hide_file_info() {
        let document = get_document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_inner_html(
            r#"<div class="upload-box"></div>
            <div class="file-info"><div class="file-icon"></div>
            <div class="file-details-info"><h5></h5><p></p></div></div>"#,
        );
        get_body().unwrap().append_child(&container).unwrap();
        let view = DomUploadView::new(document.clone());

        view.show_file(&FileSummary {
            name: "members.csv".to_owned(),
            kind: FileKind::Csv,
            details: "1.5 KB • CSV file".to_owned(),
        });

        let file_info = document.query_selector(".file-info").unwrap().unwrap();
        assert!(has_class(&file_info, "show"));
        assert!(file_info.query_selector(".fa-file-csv").unwrap().is_some());
        assert_eq!(
            Some("members.csv".to_owned()),
            file_info.query_selector("h5").unwrap().unwrap().text_content()
        );

        view.show_drop_zone();
        assert!(!has_class(&file_info, "show"));

        container.remove();
    }
}
