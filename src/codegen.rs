//! Generator: compiles an application tree into runnable JS artifacts.
//!
//! The generator walks a read-only `Application` and emits an ordered
//! sequence of named artifacts. Artifact `[0]` is the entry module the
//! bundler loads: one top-level function per page plus one exported root
//! function composing them. Artifact `[1]` is a JSON manifest describing
//! the generated module.
//!
//! The generator is stateless and re-entrant. It performs no I/O, never
//! mutates the tree, and cannot fail on a structurally valid tree: the one
//! fatal condition is an empty `id` or `name` on a node, which makes
//! structural paths and output identifiers impossible to form. Expression
//! strings are emitted verbatim; a malformed expression is the consumer's
//! failure, at execution time, not the generator's.

use crate::error::GenerateError;
use crate::model::{Application, Page, PropertyBag, PropertyValue};
use crate::sanitize::sanitize_identifier;
use serde::{Deserialize, Serialize};
use serde_json::json;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// One named unit of generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,
    pub content: String,
}

/// Construct factories the generated module imports. Fixed header so output
/// stays byte-stable regardless of which kinds a tree actually uses.
const RUNTIME_IMPORT: &str =
    "import { app, page, text, button, image } from \"@atelier/runtime\";";

/// Separator for structural paths (ancestor display names joined together).
const PATH_SEPARATOR: &str = ".";

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile `app` into its output artifacts. Invoking this twice on
/// value-equal trees yields byte-identical artifact sequences.
pub fn generate(app: &Application) -> Result<Vec<Artifact>, GenerateError> {
    verify_identities(app)?;

    tracing::debug!(
        app = %app.name,
        pages = app.pages.len(),
        "generating application source"
    );

    let app_ident = sanitize_identifier(&app.name);
    let mut module = String::new();
    module.push_str(RUNTIME_IMPORT);
    module.push_str("\n\n");

    let mut page_calls = Vec::new();
    for page in &app.pages {
        let page_fn = format!("{}{}", app_ident, sanitize_identifier(&page.name));
        tracing::trace!(page = %page.name, function = %page_fn, "emitting page");
        module.push_str(&emit_page_function(app, page, &page_fn));
        module.push_str("\n\n");
        page_calls.push(format!("{}()", page_fn));
    }

    module.push_str(&emit_root_function(app, &app_ident, &page_calls));

    let entry_name = format!("{}Main.js", app_ident);
    let manifest = emit_manifest(app, &app_ident, &entry_name);

    Ok(vec![
        Artifact {
            name: entry_name,
            content: module,
        },
        Artifact {
            name: format!("{}.manifest.json", app_ident),
            content: manifest,
        },
    ])
}

/// Fail fast on the one contract violation generation cannot absorb.
/// Runs over the whole tree before any output is built so a violation deep
/// in the tree never leaves partial artifacts behind.
fn verify_identities(app: &Application) -> Result<(), GenerateError> {
    require_identity(&app.id, &app.name)?;
    for page in &app.pages {
        require_identity(&page.id, &page.name)?;
        for element in &page.elements {
            require_identity(element.id(), element.name())?;
        }
    }
    Ok(())
}

fn require_identity(id: &str, name: &str) -> Result<(), GenerateError> {
    if id.trim().is_empty() {
        return Err(GenerateError::MissingId {
            name: name.to_string(),
        });
    }
    if name.trim().is_empty() {
        return Err(GenerateError::MissingName { id: id.to_string() });
    }
    Ok(())
}

fn emit_page_function(app: &Application, page: &Page, page_fn: &str) -> String {
    let path = join_path(&app.name, &page.name);
    let elements: Vec<String> = page
        .elements
        .iter()
        .map(|element| {
            let element_path = join_path(&path, element.name());
            format!(
                "{}(\"{}\", {})",
                element.kind_name(),
                escape_js_string(&element_path),
                emit_properties(element.properties())
            )
        })
        .collect();

    if elements.is_empty() {
        format!(
            "function {}() {{\n  return page(\"{}\", {}, []);\n}}",
            page_fn,
            escape_js_string(&path),
            emit_properties(&page.properties)
        )
    } else {
        format!(
            "function {}() {{\n  return page(\"{}\", {}, [\n    {},\n  ]);\n}}",
            page_fn,
            escape_js_string(&path),
            emit_properties(&page.properties),
            elements.join(",\n    ")
        )
    }
}

fn emit_root_function(app: &Application, app_ident: &str, page_calls: &[String]) -> String {
    if page_calls.is_empty() {
        format!(
            "export default function {}Main() {{\n  return app(\"{}\", {}, []);\n}}\n",
            app_ident,
            escape_js_string(&app.name),
            emit_properties(&app.properties)
        )
    } else {
        format!(
            "export default function {}Main() {{\n  return app(\"{}\", {}, [\n    {},\n  ]);\n}}\n",
            app_ident,
            escape_js_string(&app.name),
            emit_properties(&app.properties),
            page_calls.join(",\n    ")
        )
    }
}

/// Emit a property bag as a JS object. Literals become JSON literals of the
/// matching kind; expression strings are spliced in verbatim so they stay
/// live expressions in the generated module. Bag iteration order is the
/// map's key order, so output is deterministic.
fn emit_properties(bag: &PropertyBag) -> String {
    if bag.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = bag
        .iter()
        .map(|(name, value)| {
            let emitted = match value {
                PropertyValue::Literal(literal) => {
                    serde_json::to_string(literal).unwrap_or_else(|_| "null".to_string())
                }
                PropertyValue::Expression(code) => code.clone(),
            };
            format!("\"{}\": {}", escape_js_string(name), emitted)
        })
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn emit_manifest(app: &Application, app_ident: &str, entry_name: &str) -> String {
    let pages: Vec<serde_json::Value> = app
        .pages
        .iter()
        .map(|page| {
            json!({
                "name": page.name,
                "path": join_path(&app.name, &page.name),
                "construct": format!("{}{}", app_ident, sanitize_identifier(&page.name)),
                "elements": page.elements.len(),
            })
        })
        .collect();

    let manifest = json!({
        "app": app.name,
        "entry": entry_name,
        "pages": pages,
    });

    let mut content =
        serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| manifest.to_string());
    content.push('\n');
    content
}

fn join_path(prefix: &str, name: &str) -> String {
    format!("{}{}{}", prefix, PATH_SEPARATOR, name)
}

fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ButtonElement, Element, Page, TextElement};

    fn one_page_app() -> Application {
        Application::new("app-1", "test1").with_page(
            Page::new("page-1", "Page 1")
                .with_element(Element::Text(
                    TextElement::new("el-1", "Text 1")
                        .with_property("text", PropertyValue::expression("\"Hi there!\"")),
                ))
                .with_element(Element::Text(
                    TextElement::new("el-2", "Text 2")
                        .with_property("text", PropertyValue::expression("2 + 2")),
                )),
        )
    }

    #[test]
    fn names_the_entry_artifact_after_the_app() {
        let artifacts = generate(&one_page_app()).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].name, "test1Main.js");
        assert_eq!(artifacts[1].name, "test1.manifest.json");
    }

    #[test]
    fn expressions_are_emitted_verbatim_and_literals_as_literals() {
        let app = Application::new("app-1", "test1").with_page(
            Page::new("page-1", "Page 1").with_element(Element::Button(
                ButtonElement::new("el-1", "Button 1")
                    .with_property("enabled", PropertyValue::expression("user.isAdmin"))
                    .with_property("label", PropertyValue::literal("Go \"now\"")),
            )),
        );
        let artifacts = generate(&app).unwrap();
        let content = &artifacts[0].content;
        // Live expression: no quotes around the code.
        assert!(content.contains("\"enabled\": user.isAdmin"));
        // Literal: JSON-encoded string of the matching kind.
        assert!(content.contains("\"label\": \"Go \\\"now\\\"\""));
    }

    #[test]
    fn page_functions_compose_into_the_exported_root() {
        let app = Application::new("app-1", "test1")
            .with_page(Page::new("page-1", "Page 1"))
            .with_page(Page::new("page-2", "Page 2"));
        let artifacts = generate(&app).unwrap();
        let content = &artifacts[0].content;
        assert!(content.contains("function test1Page1()"));
        assert!(content.contains("function test1Page2()"));
        assert!(content.contains("export default function test1Main()"));
        let root_pos = content.find("export default").unwrap();
        assert!(content[root_pos..].contains("test1Page1(),\n    test1Page2(),"));
    }

    #[test]
    fn structural_paths_join_ancestor_names() {
        let artifacts = generate(&one_page_app()).unwrap();
        let content = &artifacts[0].content;
        assert!(content.contains("page(\"test1.Page 1\""));
        assert!(content.contains("text(\"test1.Page 1.Text 1\""));
        assert!(content.contains("text(\"test1.Page 1.Text 2\""));
    }

    #[test]
    fn generation_is_idempotent_over_value_equal_trees() {
        let app = one_page_app();
        let copy = app.clone();
        assert_eq!(generate(&app).unwrap(), generate(&copy).unwrap());
    }

    #[test]
    fn swapping_siblings_only_reorders_their_lines() {
        let app = one_page_app();
        let mut swapped = app.clone();
        swapped.pages[0].elements.swap(0, 1);

        let before = generate(&app).unwrap()[0].content.clone();
        let after = generate(&swapped).unwrap()[0].content.clone();
        assert_ne!(before, after);

        let before_lines: Vec<&str> = before.lines().collect();
        let after_lines: Vec<&str> = after.lines().collect();
        assert_eq!(before_lines.len(), after_lines.len());

        let differing: Vec<usize> = (0..before_lines.len())
            .filter(|&i| before_lines[i] != after_lines[i])
            .collect();
        // Exactly the two element lines differ, and they swapped places.
        assert_eq!(differing.len(), 2);
        assert_eq!(before_lines[differing[0]], after_lines[differing[1]]);
        assert_eq!(before_lines[differing[1]], after_lines[differing[0]]);
    }

    #[test]
    fn app_without_pages_still_generates() {
        let app = Application::new("app-1", "Empty App");
        let artifacts = generate(&app).unwrap();
        assert_eq!(artifacts[0].name, "EmptyAppMain.js");
        assert!(artifacts[0]
            .content
            .contains("return app(\"Empty App\", {}, []);"));
    }

    #[test]
    fn empty_name_or_id_is_a_contract_violation() {
        let mut app = one_page_app();
        app.pages[0].elements[0] = Element::Text(TextElement::new("el-1", ""));
        assert_eq!(
            generate(&app),
            Err(GenerateError::MissingName {
                id: "el-1".to_string()
            })
        );

        let mut app = one_page_app();
        app.pages[0].id = String::new();
        assert_eq!(
            generate(&app),
            Err(GenerateError::MissingId {
                name: "Page 1".to_string()
            })
        );
    }

    #[test]
    fn manifest_describes_the_generated_module() {
        let artifacts = generate(&one_page_app()).unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&artifacts[1].content).unwrap();
        assert_eq!(manifest["app"], "test1");
        assert_eq!(manifest["entry"], "test1Main.js");
        assert_eq!(manifest["pages"][0]["construct"], "test1Page1");
        assert_eq!(manifest["pages"][0]["path"], "test1.Page 1");
        assert_eq!(manifest["pages"][0]["elements"], 2);
    }

    #[test]
    fn escape_js_string_handles_quotes_and_newlines() {
        assert_eq!(escape_js_string("a\"b"), "a\\\"b");
        assert_eq!(escape_js_string("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_js_string("back\\slash"), "back\\\\slash");
    }
}
