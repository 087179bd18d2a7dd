use crate::utils::{query_document_optional, query_selector_all, toggle_class};
use std::collections::BTreeMap;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement};

const ACTIVE_CLASS: &str = "active";
const PANEL_SELECTORS: [&str; 3] = [".wizard-step", ".step-content", "[id^=\"step-\"]"];

pub trait WizardView {
    fn render_step(&self, step: u32, total_steps: u32);
    fn set_navigation(&self, prev_enabled: bool, next_enabled: bool);
}

/// Step of a panel: the number leading a `step-<N>` id suffix, else its position among
/// panels of its kind.
pub fn panel_step(id: &str, ordinal: u32) -> Option<u32> {
    let Some(suffix) = id.strip_prefix("step-") else {
        return Some(ordinal);
    };
    let digits_end = suffix
        .find(|character: char| !character.is_ascii_digit())
        .unwrap_or(suffix.len());
    suffix[..digits_end].parse().ok()
}

pub struct DomWizardView {
    indicators: Vec<Element>,
    panels: BTreeMap<u32, Vec<Element>>,
    step_label: Option<Element>,
    prev_button: Option<HtmlButtonElement>,
    next_button: Option<HtmlButtonElement>,
}

impl DomWizardView {
    /// Look up every wizard element of `document` once. Missing ones are simply not rendered.
    pub fn new(document: &Document) -> Self {
        Self {
            indicators: query_selector_all(document, ".wizard-steps .step"),
            panels: find_panels(document),
            step_label: query_document_optional(document, ".step-indicator"),
            prev_button: find_button(document, "prev-btn"),
            next_button: find_button(document, "next-btn"),
        }
    }

    /// A view with nothing to render.
    pub fn empty() -> Self {
        Self {
            indicators: vec![],
            panels: BTreeMap::new(),
            step_label: None,
            prev_button: None,
            next_button: None,
        }
    }

    pub fn indicators(&self) -> &[Element] {
        &self.indicators
    }

    pub fn prev_button(&self) -> Option<&HtmlButtonElement> {
        self.prev_button.as_ref()
    }

    pub fn next_button(&self) -> Option<&HtmlButtonElement> {
        self.next_button.as_ref()
    }
}

impl WizardView for DomWizardView {
    fn render_step(&self, step: u32, total_steps: u32) {
        for (index, indicator) in (1..).zip(&self.indicators) {
            toggle_class(indicator, ACTIVE_CLASS, index == step);
        }
        for (panel_step, panels) in &self.panels {
            for panel in panels {
                toggle_class(panel, ACTIVE_CLASS, *panel_step == step);
            }
        }
        if let Some(step_label) = &self.step_label {
            step_label.set_text_content(Some(&format!("Step {step} / {total_steps}")));
        }
        log::debug!("Wizard shows step {step}");
    }

    fn set_navigation(&self, prev_enabled: bool, next_enabled: bool) {
        if let Some(prev_button) = &self.prev_button {
            prev_button.set_disabled(!prev_enabled);
        }
        if let Some(next_button) = &self.next_button {
            next_button.set_disabled(!next_enabled);
        }
    }
}

fn find_panels(document: &Document) -> BTreeMap<u32, Vec<Element>> {
    let mut panels: BTreeMap<u32, Vec<Element>> = BTreeMap::new();
    for selector in PANEL_SELECTORS {
        for (ordinal, panel) in (1..).zip(query_selector_all(document, selector)) {
            let Some(step) = panel_step(&panel.id(), ordinal) else {
                continue;
            };
            let step_panels = panels.entry(step).or_default();
            if !step_panels.contains(&panel) {
                step_panels.push(panel);
            }
        }
    }
    panels
}

fn find_button(document: &Document, id: &str) -> Option<HtmlButtonElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::{ide, parameterized};

    ide!();

    #[parameterized(
        id = {
            "step-3", "step-12", "step-2-details", "step-4a", "", "upload-panel", "step-summary",
            "step-",
        },
        ordinal = { 1, 1, 1, 1, 2, 4, 1, 1 },
        expected = { Some(3), Some(12), Some(2), Some(4), Some(2), Some(4), None, None }
    )]
    fn should_find_panel_step(id: &str, ordinal: u32, expected: Option<u32>) {
        assert_eq!(expected, panel_step(id, ordinal));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::utils::{get_body, get_document, has_class};
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn should_render_current_step() {
        let document = get_document().unwrap();
        let body = get_body().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_inner_html(
            r#"<div class="wizard-steps"><span class="step"></span><span class="step"></span></div>
            <section class="wizard-step" id="step-1"></section>
            <section class="wizard-step" id="step-2"></section>
            <p class="step-indicator"></p>
            <button id="prev-btn"></button><button id="next-btn"></button>"#,
        );
        body.append_child(&container).unwrap();

        let view = DomWizardView::new(&document);
        view.render_step(2, 2);
        view.set_navigation(true, false);

        let panel = document.get_element_by_id("step-2").unwrap();
        assert!(has_class(&panel, "active"));
        assert!(!has_class(&document.get_element_by_id("step-1").unwrap(), "active"));
        assert!(has_class(&view.indicators()[1], "active"));
        assert!(view.next_button().unwrap().disabled());
        assert!(!view.prev_button().unwrap().disabled());
        assert_eq!(
            Some("Step 2 / 2".to_owned()),
            document.query_selector(".step-indicator").unwrap().unwrap().text_content()
        );

        container.remove();
    }
}
