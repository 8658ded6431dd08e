//! Button injection into the host's file listings.
//!
//! Each page layout that shows files implements `CandidateLayout`: it lists the
//! elements that may carry a file together with the key identifying it. The
//! matching itself goes through `FileIndex::resolve`, so layouts only deal
//! with the DOM.

use common::file_index::{parse_module_element_id, CandidateKey, FileIndex};
use common::model::file::FileDescriptor;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

/// Class of the injected buttons, used by the delegated click listener.
pub const BUTTON_CLASS: &str = "amanote-button";
/// Attribute of a button holding the id of its file.
pub const FILE_ID_ATTR: &str = "file-id";
/// Marks an element that already received its button.
const INJECTED_ATTR: &str = "data-amanote-injected";

/// A page element that may hold a supported file.
pub struct Candidate {
    pub key: CandidateKey,
    /// Element marked once handled.
    pub element: Element,
    /// The button goes right after this element.
    pub anchor: Element,
    /// Links switched to `inline-block` so the button sits next to them.
    pub links: Vec<Element>,
}

pub trait CandidateLayout {
    fn list_candidate_elements(&self, document: &Document) -> Vec<Candidate>;
}

/// Standalone resource module: `<li class="modtype_resource" id="module-12">`.
pub struct ResourceCard;

impl CandidateLayout for ResourceCard {
    fn list_candidate_elements(&self, document: &Document) -> Vec<Candidate> {
        select_all(document, ".modtype_resource")
            .into_iter()
            .filter_map(|element| {
                let module_id = parse_module_element_id(&element.id())?;
                let anchor = element.query_selector(".activityinstance").ok().flatten()?;
                let links = element
                    .query_selector_all("a")
                    .map(elements)
                    .unwrap_or_default();

                Some(Candidate {
                    key: CandidateKey::ModuleId(module_id),
                    element,
                    anchor,
                    links,
                })
            })
            .collect()
    }
}

/// File entry of a folder tree: `<span class="fp-filename-icon"><a href=...>`.
pub struct FolderEntry;

impl CandidateLayout for FolderEntry {
    fn list_candidate_elements(&self, document: &Document) -> Vec<Candidate> {
        select_all(document, ".fp-filename-icon")
            .into_iter()
            .filter_map(|element| {
                let link = element.query_selector("a").ok().flatten()?;
                let href = link.get_attribute("href")?;

                Some(Candidate {
                    key: CandidateKey::Url(href),
                    element,
                    anchor: link.clone(),
                    links: vec![link],
                })
            })
            .collect()
    }
}

/// Adds a button to every candidate resolving to a known file. Candidates
/// handled by a previous pass are left alone. Returns the number of buttons
/// added.
pub fn inject_buttons(
    document: &Document,
    index: &FileIndex,
    logo: &str,
    layouts: &[&dyn CandidateLayout],
) -> usize {
    let mut injected = 0;

    for layout in layouts {
        for candidate in layout.list_candidate_elements(document) {
            if candidate.element.has_attribute(INJECTED_ATTR) {
                continue;
            }
            let Some(file) = index.resolve(&candidate.key) else {
                continue;
            };
            let Some(button) = build_button(document, file, logo) else {
                continue;
            };

            // Unmarked elements would get another button on every rescan.
            if candidate.element.set_attribute(INJECTED_ATTR, "1").is_err() {
                continue;
            }
            if candidate.anchor.after_with_node_1(&button).is_err() {
                let _ = candidate.element.remove_attribute(INJECTED_ATTR);
                continue;
            }
            for link in &candidate.links {
                set_inline_block(link);
            }
            injected += 1;
        }
    }

    injected
}

/// `file-id` of the button `target` belongs to, `target` being the button
/// itself or anything inside it.
pub fn button_file_id(target: &Element) -> Option<String> {
    let button = target.closest(&format!(".{}", BUTTON_CLASS)).ok()??;
    button.get_attribute(FILE_ID_ATTR)
}

fn build_button(document: &Document, file: &FileDescriptor, logo: &str) -> Option<Element> {
    let button = document.create_element("a").ok()?;
    button.set_class_name(&format!("ml-2 {}", BUTTON_CLASS));
    button.set_attribute(FILE_ID_ATTR, &file.id.to_string()).ok()?;
    button.set_attribute("role", "button").ok()?;
    if let Some(html) = button.dyn_ref::<HtmlElement>() {
        let style = html.style();
        style.set_property("display", "inline-block").ok();
        style.set_property("cursor", "pointer").ok();
    }

    let img = document.create_element("img").ok()?;
    img.set_attribute("src", logo).ok()?;
    img.set_attribute("width", "75px").ok()?;
    img.set_attribute("alt", "Amanote").ok()?;
    button.append_child(&img).ok()?;

    Some(button)
}

fn set_inline_block(element: &Element) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.style().set_property("display", "inline-block").ok();
    }
}

fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
