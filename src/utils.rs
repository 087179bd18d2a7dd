use crate::Result;
use crate::error::{DEFAULT_ERROR_MESSAGE, Error};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, Location, Window,
};

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub fn get_window() -> Result<Window> {
    web_sys::window().ok_or_else(|| Error::new(DEFAULT_ERROR_MESSAGE, "No global `window` exists"))
}

pub fn get_document() -> Result<Document> {
    get_window()?
        .document()
        .ok_or_else(|| Error::new(DEFAULT_ERROR_MESSAGE, "Should have a document on window"))
}

pub fn get_body() -> Result<HtmlElement> {
    get_document()?
        .body()
        .ok_or_else(|| Error::new(DEFAULT_ERROR_MESSAGE, "Document should have a body"))
}

pub fn get_location() -> Result<Location> {
    Ok(get_window()?.location())
}

pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element> {
    document.get_element_by_id(id).ok_or_else(|| {
        Error::new(
            DEFAULT_ERROR_MESSAGE,
            &format!("`{id}` element does not exist"),
        )
    })
}

pub fn get_element_by_id_dyn<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    Ok(get_element_by_id(document, id)?.dyn_into()?)
}

/// Query a single element inside `parent`, failing if none matches.
pub fn query_selector_single_element(parent: &Element, selector: &str) -> Result<Element> {
    parent.query_selector(selector)?.ok_or_else(|| {
        Error::new(
            DEFAULT_ERROR_MESSAGE,
            &format!("No element matches selector `{selector}`"),
        )
    })
}

/// Like [`query_selector_single_element`], but a missing element is not an error.
pub fn query_selector_optional(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok().flatten()
}

pub fn query_document_optional(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// Every element of the document matching `selector`, in document order.
/// An invalid selector yields no element.
pub fn query_selector_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("Invalid selector `{selector}`");
        return vec![];
    };
    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn create_element(document: &Document, name: &str) -> Result<Element> {
    Ok(document.create_element(name)?)
}

pub fn create_element_with_class(
    document: &Document,
    name: &str,
    parent: Option<&Element>,
    text: Option<&str>,
    class: &str,
) -> Result<Element> {
    let new_element = create_element(document, name)?;
    new_element.set_class_name(class);

    if let Some(text) = text {
        new_element.set_text_content(Some(text));
    }

    if let Some(parent) = parent {
        append_child(parent, &new_element)?;
    }

    Ok(new_element)
}

pub fn append_child(container: &Element, child: &Element) -> Result<()> {
    container.append_child(child)?;
    Ok(())
}

pub fn clear_element(element: &Element) {
    element.set_inner_html("");
}

pub fn add_class(element: &Element, class: &str) {
    if let Err(error) = element.class_list().add_1(class) {
        log::warn!("Can't add class `{class}`: {error:?}");
    }
}

pub fn remove_class(element: &Element, class: &str) {
    if let Err(error) = element.class_list().remove_1(class) {
        log::warn!("Can't remove class `{class}`: {error:?}");
    }
}

pub fn toggle_class(element: &Element, class: &str, force: bool) {
    if force {
        add_class(element, class);
    } else {
        remove_class(element, class);
    }
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn set_attribute(element: &Element, name: &str, value: &str) -> Result<()> {
    element.set_attribute(name, value)?;
    Ok(())
}

pub fn remove_attribute(element: &Element, name: &str) -> Result<()> {
    element.remove_attribute(name)?;
    Ok(())
}

/// Show or hide an element through its inline `display` style.
pub fn set_visible(element: &Element, visible: bool) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = element.style();
    let result = if visible {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
    if let Err(error) = result {
        log::warn!("Can't change visibility of element: {error:?}");
    }
}

/// Attach `handler` to `event` on `target` for the lifetime of the page.
pub fn add_event_handler<E>(
    target: &EventTarget,
    event: &str,
    handler: impl Fn(E) + 'static,
) -> Result<()>
where
    E: JsCast + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: Event| match event.dyn_into::<E>() {
        Ok(event) => handler(event),
        Err(event) => log::warn!("Unexpected event type: {:?}", event.type_()),
    }) as Box<dyn Fn(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn get_value_from_element(element: &HtmlInputElement) -> String {
    element.value()
}

/// Read the value of the input `id`, if it exists.
pub fn get_input_value(document: &Document, id: &str) -> Option<String> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| get_value_from_element(&input))
}

/// Set the value of the input `id`, if it exists.
pub fn set_input_value(document: &Document, id: &str, value: &str) {
    if let Some(input) = document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn should_get_window() {
        assert!(get_window().is_ok());
    }

    #[wasm_bindgen_test]
    fn should_fail_on_unknown_element() {
        let document = get_document().unwrap();
        assert!(get_element_by_id(&document, "does-not-exist").is_err());
    }

    #[wasm_bindgen_test]
    fn should_toggle_classes() {
        let document = get_document().unwrap();
        let element = create_element(&document, "div").unwrap();

        toggle_class(&element, "active", true);
        assert!(has_class(&element, "active"));

        toggle_class(&element, "active", false);
        assert!(!has_class(&element, "active"));
    }

    #[wasm_bindgen_test]
    fn should_query_all_in_document_order() {
        let document = get_document().unwrap();
        let body = get_body().unwrap();
        for i in 0..3 {
            let element = create_element_with_class(
                &document,
                "span",
                Some(&*body),
                Some(&i.to_string()),
                "query-all-test",
            )
            .unwrap();
            assert!(element.is_connected());
        }

        let elements = query_selector_all(&document, ".query-all-test");
        let texts = elements
            .iter()
            .filter_map(|element| element.text_content())
            .collect::<Vec<_>>();
        assert_eq!(vec!["0", "1", "2"], texts);
        elements.iter().for_each(Element::remove);
    }
}
