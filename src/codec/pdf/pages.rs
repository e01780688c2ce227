//! Page tree rebuilding.
//!
//! The output document gets a fresh, flat page tree: one `/Pages` node whose
//! `/Kids` lists every page of the base document in reading order. Page
//! objects themselves are reused untouched apart from `/Parent` and any
//! attributes they used to inherit from intermediate tree nodes.

use crate::error::{Error, Result};
use lopdf::{dictionary, Document, Object, ObjectId};
use tracing::debug;

/// Page attributes a page may inherit from its ancestors (PDF 32000 7.7.3.4).
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 256;

/// Replace the document's page tree with a flat one holding the same pages
/// in the same order. Returns the number of pages.
pub fn flatten_page_tree(doc: &mut Document) -> Result<usize> {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    for &page_id in &page_ids {
        let inherited = inherited_attributes(doc, page_id);
        let page = page_dictionary_mut(doc, page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    let pages_id = doc.new_object_id();
    for &page_id in &page_ids {
        page_dictionary_mut(doc, page_id)?.set("Parent", pages_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| Error::parse("pdf", format!("missing document catalog: {}", e)))?;
    doc.get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| Error::parse("pdf", format!("invalid document catalog: {}", e)))?
        .set("Pages", pages_id);

    let pruned = doc.prune_objects();
    debug!(
        pages = page_ids.len(),
        pruned = pruned.len(),
        "rebuilt page tree"
    );

    Ok(page_ids.len())
}

/// Collect the inheritable attributes a page does not define itself,
/// taking each from its nearest ancestor.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    found
}

fn page_dictionary_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut lopdf::Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| Error::parse("pdf", format!("invalid page {:?}: {}", page_id, e)))
}
